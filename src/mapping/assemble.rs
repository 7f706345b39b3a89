use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::error::{MapError, Result};
use crate::index::fm::FMIndex;
use crate::search::Hit;
use crate::util::aa;

/// 查询到蛋白的一次映射，start 为蛋白内 0 基偏移
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeptideProteinMapping {
    pub query: String,
    pub accession: String,
    pub start: u32,
    pub matched: String,
    pub edits: u32,
}

/// 将语料偏移命中换算为蛋白坐标。
/// 命中落在分隔符上或任何蛋白区间之外意味着索引不变量被破坏，
/// 返回 `CorruptIndex`（当前查询不可恢复，索引需重建）。
/// 同一 (accession, start) 只保留编辑数最小的一条；结果顺序不作保证。
pub fn assemble(
    hits: &[Hit],
    fm: &FMIndex,
    query: &str,
) -> Result<Vec<PeptideProteinMapping>> {
    let mut best: HashMap<(usize, u32), (u32, Vec<u8>)> = HashMap::new();
    for h in hits {
        let Some((span_idx, start)) = fm.span_of_position(h.position) else {
            return Err(MapError::CorruptIndex(format!(
                "hit offset {} does not fall inside any protein",
                h.position
            )));
        };
        match best.entry((span_idx, start)) {
            Entry::Occupied(mut e) => {
                if h.edits < e.get().0 {
                    e.insert((h.edits, h.matched.clone()));
                }
            }
            Entry::Vacant(e) => {
                e.insert((h.edits, h.matched.clone()));
            }
        }
    }

    Ok(best
        .into_iter()
        .map(|((span_idx, start), (edits, matched))| PeptideProteinMapping {
            query: query.to_string(),
            accession: fm.spans()[span_idx].accession.clone(),
            start,
            matched: aa::decode_seq(&matched),
            edits,
        })
        .collect())
}
