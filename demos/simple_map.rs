//! 演示如何在 library 模式下使用 pepmap-rust 进行肽段 / 标签映射。
//!
//! 运行方式：
//! ```bash
//! cargo run --example simple_map
//! ```

use pepmap_rust::index::{bwt, corpus, fm, sa};
use pepmap_rust::io::fasta::FastaRecord;
use pepmap_rust::mapping::assemble::assemble;
use pepmap_rust::search::pattern::AminoAcidPattern;
use pepmap_rust::search::tag::Tag;
use pepmap_rust::search::{self, SearchParams};
use pepmap_rust::util::aa::{self, MatchingMode};

fn main() {
    // 1. 构建蛋白库
    let records = vec![
        FastaRecord {
            accession: "P1".to_string(),
            desc: None,
            seq: b"MKMMKMMRMMMKPMMRMM".to_vec(),
        },
        FastaRecord {
            accession: "P2".to_string(),
            desc: None,
            seq: b"LTSESSVKGAIRW".to_vec(),
        },
    ];
    for r in &records {
        println!("蛋白 {}: {}", r.accession, String::from_utf8_lossy(&r.seq));
    }

    // 2. 构建 FM 索引
    let (text, spans) = corpus::build_corpus(&records).unwrap();
    let sa_arr = sa::build_sa(&text);
    let bwt_arr = bwt::build_bwt(&text, &sa_arr);
    let fm_idx = fm::FMIndex::build(
        text,
        bwt_arr,
        &sa_arr,
        spans,
        aa::SIGMA as u8,
        fm::DEFAULT_OCC_BLOCK,
        fm::DEFAULT_SA_SHIFT,
    )
    .unwrap();
    println!(
        "FM 索引构建完成：语料长度={}, 占用={} 字节",
        fm_idx.corpus_len(),
        fm_idx.allocated_bytes()
    );

    let exact = SearchParams {
        matching: MatchingMode::String,
        ..SearchParams::default()
    };

    // 3. 精确肽段搜索
    let hits = search::search_peptide(&fm_idx, "MKMMK", &exact).unwrap();
    let maps = assemble(&hits, &fm_idx, "MKMMK").unwrap();
    println!("\n精确搜索 'MKMMK': {} 处", maps.len());
    for m in &maps {
        println!("  {}:{} matched={} edits={}", m.accession, m.start, m.matched, m.edits);
    }

    // 4. 一次替换的近似搜索
    let approx = SearchParams {
        max_substitutions: 1,
        matching: MatchingMode::String,
        ..SearchParams::default()
    };
    let hits = search::search_peptide(&fm_idx, "MKMMR", &approx).unwrap();
    let maps = assemble(&hits, &fm_idx, "MKMMR").unwrap();
    println!("\n近似搜索 'MKMMR'（≤1 替换）: {} 处", maps.len());
    for m in &maps {
        println!("  {}:{} matched={} edits={}", m.accession, m.start, m.matched, m.edits);
    }

    // 5. 歧义模式搜索
    let pat = AminoAcidPattern::parse("LTSE[SD]SV").unwrap();
    let hits = search::search_pattern(&fm_idx, &pat, &exact).unwrap();
    let maps = assemble(&hits, &fm_idx, &pat.to_string()).unwrap();
    println!("\n模式搜索 '{}': {} 处", pat, maps.len());
    for m in &maps {
        println!("  {}:{} matched={}", m.accession, m.start, m.matched);
    }

    // 6. 序列标签搜索：GA 与 R 之间隔一个 I（113.08406 Da）
    let tag = Tag::parse("GA,113.08406,R").unwrap();
    let hits = search::search_tag(&fm_idx, &tag, &exact).unwrap();
    let maps = assemble(&hits, &fm_idx, &tag.to_string()).unwrap();
    println!("\n标签搜索 '{}': {} 处", tag, maps.len());
    for m in &maps {
        println!("  {}:{} matched={}", m.accession, m.start, m.matched);
    }

    println!("\n完成！");
}
