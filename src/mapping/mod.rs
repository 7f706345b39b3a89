//! 批量映射管线：加载索引、读取查询行、并行搜索、写出 CSV。

use anyhow::{Context, Result};
use rayon::prelude::*;
use std::collections::HashMap;
use std::io::Write;

use crate::error::MapError;
use crate::index::fm::FMIndex;
use crate::io::query::{self, Query, QueryKind, QueryReader};
use crate::mapping::assemble::{assemble, PeptideProteinMapping};
use crate::search::{self, SearchParams};
use crate::util::aa;

pub mod assemble;

/// 映射运行选项
#[derive(Debug, Clone)]
pub struct MapOpt {
    pub kind: QueryKind,
    pub params: SearchParams,
    /// 输出匹配串时附带蛋白内的前后侧翼残基
    pub flanking: bool,
    pub threads: usize,
}

/// 对查询文件中的每一行执行映射并写出 CSV。
/// 非法行打印行号后跳过；`CorruptIndex` 中止整个运行（索引不可信）。
pub fn map_queries(
    index_path: &str,
    queries_path: &str,
    out_path: Option<&str>,
    opt: &MapOpt,
) -> Result<()> {
    let fm = FMIndex::load_from_file(index_path)
        .with_context(|| format!("cannot load index from '{}'", index_path))?;

    let fh = std::fs::File::open(queries_path)
        .with_context(|| format!("cannot open query file '{}'", queries_path))?;
    let mut reader = QueryReader::new(std::io::BufReader::new(fh));

    // 先整批解析：非法行立即报告并跳过，合法行进入并行搜索
    let mut queries: Vec<(usize, String, Query)> = Vec::new();
    while let Some(line) = reader.next_line()? {
        match query::parse_query(opt.kind, &line.text) {
            Ok(q) => queries.push((line.line_no, line.text, q)),
            Err(e) => eprintln!("line {}: skipped: {}", line.line_no, e),
        }
    }

    // 索引只读共享，各查询独立搜索，无需额外同步
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(opt.threads)
        .build()
        .context("cannot build thread pool")?;
    let results: Vec<(usize, std::result::Result<Vec<PeptideProteinMapping>, MapError>)> =
        pool.install(|| {
            queries
                .par_iter()
                .map(|(line_no, text, q)| (*line_no, run_query(&fm, q, text, &opt.params)))
                .collect()
        });

    let mut out: Box<dyn Write> = if let Some(p) = out_path {
        Box::new(std::io::BufWriter::new(
            std::fs::File::create(p).with_context(|| format!("cannot create '{}'", p))?,
        ))
    } else {
        Box::new(std::io::BufWriter::new(std::io::stdout()))
    };

    let spans_by_accession: HashMap<&str, usize> = fm
        .spans()
        .iter()
        .enumerate()
        .map(|(i, s)| (s.accession.as_str(), i))
        .collect();

    writeln!(out, "query,accession,startIndex,matched,edits")?;
    let mut n_rows = 0usize;
    for (line_no, res) in results {
        match res {
            Ok(mut rows) => {
                // 库层不保证顺序；落盘前按蛋白与位置排序，保证输出稳定
                rows.sort_by(|a, b| {
                    a.accession
                        .cmp(&b.accession)
                        .then(a.start.cmp(&b.start))
                        .then(a.matched.cmp(&b.matched))
                });
                for m in rows {
                    let matched = if opt.flanking {
                        flanked(&fm, &spans_by_accession, &m)
                    } else {
                        m.matched.clone()
                    };
                    writeln!(
                        out,
                        "{},{},{},{},{}",
                        m.query, m.accession, m.start, matched, m.edits
                    )?;
                    n_rows += 1;
                }
            }
            Err(e @ MapError::CorruptIndex(_)) => {
                anyhow::bail!("line {}: {} (aborting, the index cannot be trusted)", line_no, e);
            }
            Err(e) => eprintln!("line {}: skipped: {}", line_no, e),
        }
    }
    out.flush()?;
    eprintln!("{} mappings written", n_rows);
    Ok(())
}

fn run_query(
    fm: &FMIndex,
    q: &Query,
    label: &str,
    params: &SearchParams,
) -> std::result::Result<Vec<PeptideProteinMapping>, MapError> {
    let hits = match q {
        Query::Peptide(p) => search::search_peptide(fm, p, params)?,
        Query::Pattern(p) => search::search_pattern(fm, p, params)?,
        Query::Tag(t) => search::search_tag(fm, t, params)?,
    };
    assemble(&hits, fm, label)
}

/// 匹配串加侧翼残基，形如 `K.PEPTIDE.R`；蛋白端点用 '-' 占位
fn flanked(
    fm: &FMIndex,
    spans_by_accession: &HashMap<&str, usize>,
    m: &PeptideProteinMapping,
) -> String {
    let Some(&span_idx) = spans_by_accession.get(m.accession.as_str()) else {
        return m.matched.clone();
    };
    let span = &fm.spans()[span_idx];
    let offset = span.offset as usize + m.start as usize;
    let corpus = fm.corpus();

    let before = if offset > 0 && corpus[offset - 1] != aa::SENTINEL {
        aa::decode(corpus[offset - 1]) as char
    } else {
        '-'
    };
    let end = offset + m.matched.len();
    let after = if end < corpus.len() && corpus[end] != aa::SENTINEL {
        aa::decode(corpus[end]) as char
    } else {
        '-'
    };
    format!("{}.{}.{}", before, m.matched, after)
}
