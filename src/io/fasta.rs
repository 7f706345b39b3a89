use anyhow::Result;
use std::io::BufRead;

/// 一条蛋白记录。accession 取自 UniProt 风格表头
/// （`sp|P12345|NAME` 取中段），普通表头退化为首个空白分隔词。
#[derive(Debug, Clone)]
pub struct FastaRecord {
    pub accession: String,
    pub desc: Option<String>,
    pub seq: Vec<u8>,
}

pub struct FastaReader<R: BufRead> {
    reader: R,
    buf: String,
    done: bool,
    peek_header: Option<String>,
}

/// 从表头首词中抽取 accession
fn accession_of(token: &str) -> String {
    let mut parts = token.split('|');
    match (parts.next(), parts.next()) {
        (Some("sp") | Some("tr"), Some(acc)) if !acc.is_empty() => acc.to_string(),
        _ => token.to_string(),
    }
}

impl<R: BufRead> FastaReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            done: false,
            peek_header: None,
        }
    }

    pub fn next_record(&mut self) -> Result<Option<FastaRecord>> {
        if self.done {
            return Ok(None);
        }

        // 定位表头行
        let header = if let Some(h) = self.peek_header.take() {
            h
        } else {
            loop {
                self.buf.clear();
                let n = self.reader.read_line(&mut self.buf)?;
                if n == 0 {
                    self.done = true;
                    return Ok(None);
                }
                if self.buf.starts_with('>') {
                    let h = self.buf[1..].trim().to_string();
                    break h;
                }
            }
        };

        // 解析 accession 与描述
        let mut parts = header.splitn(2, char::is_whitespace);
        let accession = accession_of(parts.next().unwrap_or(""));
        let desc = parts
            .next()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        // 读序列行，遇到下一条表头为止
        let mut seq: Vec<u8> = Vec::new();
        loop {
            self.buf.clear();
            let n = self.reader.read_line(&mut self.buf)?;
            if n == 0 {
                self.done = true;
                break;
            }
            if self.buf.starts_with('>') {
                let h = self.buf[1..].trim().to_string();
                self.peek_header = Some(h);
                break;
            }
            for &b in self.buf.as_bytes() {
                match b {
                    b'\n' | b'\r' | b' ' | b'\t' => {}
                    _ => seq.push(b.to_ascii_uppercase()),
                }
            }
        }

        Ok(Some(FastaRecord {
            accession,
            desc,
            seq,
        }))
    }

    /// 读完整个文件，返回全部记录
    pub fn read_all(&mut self) -> Result<Vec<FastaRecord>> {
        let mut out = Vec::new();
        while let Some(rec) = self.next_record()? {
            out.push(rec);
        }
        Ok(out)
    }
}
