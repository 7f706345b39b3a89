//! # pepmap-rust
//!
//! 基于 FM 索引的肽段 / 序列标签到蛋白库映射器。
//!
//! 本 crate 提供了面向蛋白质组的全文索引与近似匹配功能，包括：
//!
//! - **索引构建**：将蛋白库串接为单条符号语料（后缀数组 + BWT + 采样 Occ/SA）
//! - **近似搜索**：有界回溯的肽段 / 歧义模式 / 质量间隙标签搜索，
//!   支持替换、插入、删除预算与 I/L 等价类
//! - **结果装配**：语料偏移回映为 (蛋白 accession, 蛋白内位置) 并去重
//!
//! ## 快速示例
//!
//! ```rust,no_run
//! use pepmap_rust::index::{bwt, corpus, fm, sa};
//! use pepmap_rust::io::fasta::FastaRecord;
//! use pepmap_rust::mapping::assemble::assemble;
//! use pepmap_rust::search::{self, SearchParams};
//! use pepmap_rust::util::aa;
//!
//! // 构建 FM 索引
//! let records = vec![FastaRecord {
//!     accession: "P1".to_string(),
//!     desc: None,
//!     seq: b"MKWVTFISLLLLFSSAYSR".to_vec(),
//! }];
//! let (text, spans) = corpus::build_corpus(&records).unwrap();
//! let sa_arr = sa::build_sa(&text);
//! let bwt_arr = bwt::build_bwt(&text, &sa_arr);
//! let fm_idx = fm::FMIndex::build(
//!     text,
//!     bwt_arr,
//!     &sa_arr,
//!     spans,
//!     aa::SIGMA as u8,
//!     fm::DEFAULT_OCC_BLOCK,
//!     fm::DEFAULT_SA_SHIFT,
//! )
//! .unwrap();
//!
//! // 肽段搜索并回映蛋白坐标
//! let hits = search::search_peptide(&fm_idx, "FISLL", &SearchParams::default()).unwrap();
//! let maps = assemble(&hits, &fm_idx, "FISLL").unwrap();
//! for m in &maps {
//!     println!("{} @ {}:{}", m.query, m.accession, m.start);
//! }
//! ```
//!
//! ## 模块说明
//!
//! - [`io`] — 蛋白 FASTA 与查询行文件解析
//! - [`index`] — 语料串接与 FM 索引构建（后缀数组、BWT、采样表）
//! - [`search`] — 有界回溯近似搜索（肽段 / 歧义模式 / 标签）
//! - [`mapping`] — 命中装配与批量映射管线
//! - [`util`] — 氨基酸编码 / 歧义码展开 / 残基质量表
//! - [`error`] — 核心错误类型

pub mod error;
pub mod index;
pub mod io;
pub mod mapping;
pub mod search;
pub mod util;
