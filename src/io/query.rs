use anyhow::Result as AnyResult;
use std::io::BufRead;

use crate::error::Result;
use crate::search::pattern::AminoAcidPattern;
use crate::search::tag::Tag;
use crate::util::aa;

/// 查询文件的行类型
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    Peptide,
    Pattern,
    Tag,
}

/// 解析后的单条查询
#[derive(Debug, Clone)]
pub enum Query {
    Peptide(String),
    Pattern(AminoAcidPattern),
    Tag(Tag),
}

/// 查询文件中的一行（1 基行号，用于报错定位）
#[derive(Debug, Clone)]
pub struct QueryLine {
    pub line_no: usize,
    pub text: String,
}

/// 行式查询读取器：跳过空行与 '#' 注释行
pub struct QueryReader<R: BufRead> {
    reader: R,
    buf: String,
    line_no: usize,
    done: bool,
}

impl<R: BufRead> QueryReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: String::new(),
            line_no: 0,
            done: false,
        }
    }

    pub fn next_line(&mut self) -> AnyResult<Option<QueryLine>> {
        if self.done {
            return Ok(None);
        }
        loop {
            self.buf.clear();
            let n = self.reader.read_line(&mut self.buf)?;
            if n == 0 {
                self.done = true;
                return Ok(None);
            }
            self.line_no += 1;
            let text = self.buf.trim();
            if text.is_empty() || text.starts_with('#') {
                continue;
            }
            return Ok(Some(QueryLine {
                line_no: self.line_no,
                text: text.to_string(),
            }));
        }
    }
}

/// 将一行文本解析为查询。校验在此完成，
/// 非法行可被批处理调用方记录后跳过，不中断整批。
pub fn parse_query(kind: QueryKind, text: &str) -> Result<Query> {
    match kind {
        QueryKind::Peptide => {
            aa::encode_seq(text.as_bytes())?;
            Ok(Query::Peptide(text.to_uppercase()))
        }
        QueryKind::Pattern => Ok(Query::Pattern(AminoAcidPattern::parse(text)?)),
        QueryKind::Tag => {
            let tag = Tag::parse(text)?;
            tag.validate()?;
            Ok(Query::Tag(tag))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MapError;
    use std::io::Cursor;

    #[test]
    fn reader_skips_blank_and_comment_lines() {
        let data = b"# peptide list\nMKWVTF\n\n  \nARTKQTARK\n";
        let mut r = QueryReader::new(Cursor::new(&data[..]));
        let l1 = r.next_line().unwrap().unwrap();
        assert_eq!(l1.line_no, 2);
        assert_eq!(l1.text, "MKWVTF");
        let l2 = r.next_line().unwrap().unwrap();
        assert_eq!(l2.line_no, 5);
        assert_eq!(l2.text, "ARTKQTARK");
        assert!(r.next_line().unwrap().is_none());
    }

    #[test]
    fn parse_peptide_lines() {
        assert!(matches!(
            parse_query(QueryKind::Peptide, "mkwvtf"),
            Ok(Query::Peptide(p)) if p == "MKWVTF"
        ));
        assert_eq!(
            parse_query(QueryKind::Peptide, "MK*R").unwrap_err(),
            MapError::UnknownResidue('*')
        );
    }

    #[test]
    fn parse_pattern_lines() {
        assert!(matches!(
            parse_query(QueryKind::Pattern, "[TEST]TE[ST]"),
            Ok(Query::Pattern(_))
        ));
        assert!(parse_query(QueryKind::Pattern, "A[]C").is_err());
    }

    #[test]
    fn parse_tag_lines() {
        assert!(matches!(
            parse_query(QueryKind::Tag, "1115.49,LTSESSV,1094.59"),
            Ok(Query::Tag(_))
        ));
        // 仅有间隙、无片段锚点
        assert!(parse_query(QueryKind::Tag, "114.04,128.06").is_err());
    }
}
