use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};
use crate::io::fasta::FastaRecord;
use crate::util::aa;

/// 蛋白在语料中的区间（名称、长度、起始偏移）
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProteinSpan {
    pub accession: String,
    pub offset: u32,
    pub len: u32,
}

/// 将全部蛋白序列编码并串接为一条符号文本，每条蛋白后跟一个分隔符。
/// 返回 (文本, 区间表)；区间表与蛋白在库中的顺序一致。
pub fn build_corpus(records: &[FastaRecord]) -> Result<(Vec<u8>, Vec<ProteinSpan>)> {
    if records.is_empty() {
        return Err(MapError::EmptyDatabase);
    }

    let total: usize = records.iter().map(|r| r.seq.len()).sum();
    if total == 0 {
        return Err(MapError::EmptyDatabase);
    }

    let mut text: Vec<u8> = Vec::with_capacity(total + records.len());
    let mut spans: Vec<ProteinSpan> = Vec::with_capacity(records.len());

    for rec in records {
        let offset = text.len() as u32;
        for &b in &rec.seq {
            text.push(aa::encode(b)?);
        }
        spans.push(ProteinSpan {
            accession: rec.accession.clone(),
            offset,
            len: rec.seq.len() as u32,
        });
        text.push(aa::SENTINEL);
    }

    Ok((text, spans))
}
