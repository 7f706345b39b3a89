use anyhow::Result as AnyResult;
use serde::{Deserialize, Serialize};

use crate::error::{MapError, Result};
use crate::index::corpus::ProteinSpan;
use crate::util::aa;

/// 半开后缀数组区间 [lo, hi)，表示当前已匹配模式后缀的全部出现
pub type Interval = (usize, usize);

/// 索引构建元信息
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IndexMeta {
    pub fasta_file: Option<String>,
    pub build_args: Option<String>,
    pub build_timestamp: Option<String>,
}

/// FM 索引：
/// - 任意有限字母表，字母以 [0..sigma) 编码（0 预留为蛋白分隔符）。
/// - 定长分块的 Occ 采样（块内顺扫补偿）。
/// - 稀疏后缀数组采样（每 2^sa_shift 行存一项），
///   位置还原通过 LF 游走回退到最近采样行。
/// - 构建后只读，可在多线程间共享。
#[derive(Debug, Serialize, Deserialize)]
pub struct FMIndex {
    pub sigma: u8,
    occ_block: u32,
    sa_shift: u32,
    /// less[c] = 文本中字母 < c 的累计数量
    less: Vec<u32>,
    /// BWT 序列（与文本同长度）
    bwt: Vec<u8>,
    /// Occ 采样（按块存储，行优先展平）：occ_samples[block_id * sigma + c]
    occ_samples: Vec<u32>,
    /// 稀疏采样的后缀数组：sampled_sa[i >> sa_shift] = SA[i]（i 为采样行）
    sampled_sa: Vec<u32>,
    /// 原始语料（定位校验与侧翼残基还原用）
    text: Vec<u8>,
    /// 蛋白区间表（名称、长度、起始偏移）
    spans: Vec<ProteinSpan>,
    pub meta: IndexMeta,
}

/// 默认 Occ 采样块长
pub const DEFAULT_OCC_BLOCK: usize = 128;
/// 默认后缀数组采样位移（每 8 行存一项）
pub const DEFAULT_SA_SHIFT: u32 = 3;

impl FMIndex {
    pub fn build(
        text: Vec<u8>,
        bwt: Vec<u8>,
        sa: &[u32],
        spans: Vec<ProteinSpan>,
        sigma: u8,
        occ_block: usize,
        sa_shift: u32,
    ) -> Result<Self> {
        let n = bwt.len();
        if n == 0 {
            return Err(MapError::EmptyCorpus);
        }
        let sigma_us = sigma as usize;

        // less 表
        let mut freq = vec![0u32; sigma_us];
        for &ch in &bwt {
            freq[ch as usize] += 1;
        }
        let mut less = vec![0u32; sigma_us];
        let mut acc = 0u32;
        for i in 0..sigma_us {
            less[i] = acc;
            acc += freq[i];
        }

        // 采样 Occ
        let num_blocks = (n + occ_block - 1) / occ_block;
        let mut occ_samples = vec![0u32; num_blocks * sigma_us];
        let mut running = vec![0u32; sigma_us];
        for bi in 0..num_blocks {
            occ_samples[bi * sigma_us..(bi + 1) * sigma_us].copy_from_slice(&running);
            let start = bi * occ_block;
            let end = ((bi + 1) * occ_block).min(n);
            for &ch in &bwt[start..end] {
                running[ch as usize] += 1;
            }
        }

        // 采样 SA
        let step = 1usize << sa_shift;
        let mut sampled_sa = vec![0u32; (n + step - 1) / step];
        for (i, &p) in sa.iter().enumerate() {
            if i & (step - 1) == 0 {
                sampled_sa[i >> sa_shift] = p;
            }
        }

        Ok(Self {
            sigma,
            occ_block: occ_block as u32,
            sa_shift,
            less,
            bwt,
            occ_samples,
            sampled_sa,
            text,
            spans,
            meta: IndexMeta::default(),
        })
    }

    pub fn set_meta(&mut self, meta: IndexMeta) {
        self.meta = meta;
    }

    /// 语料长度（含分隔符）
    #[inline]
    pub fn corpus_len(&self) -> usize {
        self.bwt.len()
    }

    #[inline]
    pub fn corpus(&self) -> &[u8] {
        &self.text
    }

    #[inline]
    pub fn spans(&self) -> &[ProteinSpan] {
        &self.spans
    }

    /// BWT[0..pos) 中 c 的出现次数
    #[inline]
    pub fn occ(&self, c: u8, pos: usize) -> u32 {
        if pos == 0 {
            return 0;
        }
        let sigma_us = self.sigma as usize;
        let block = self.occ_block as usize;
        let bi = (pos - 1) / block;
        let base = self.occ_samples[bi * sigma_us + c as usize];
        let start = bi * block;
        let mut add = 0u32;
        for &ch in &self.bwt[start..pos] {
            if ch == c {
                add += 1;
            }
        }
        base + add
    }

    /// 文本中字母 < c 的累计数量
    #[inline]
    pub fn less(&self, c: u8) -> u32 {
        self.less[c as usize]
    }

    /// 整个后缀数组区间
    #[inline]
    pub fn full_interval(&self) -> Interval {
        (0, self.bwt.len())
    }

    /// 区间内后缀数
    #[inline]
    pub fn interval_size((lo, hi): Interval) -> usize {
        hi.saturating_sub(lo)
    }

    /// 在区间 [lo, hi) 上前置字符 c 后的新区间；lo' >= hi' 表示无法延伸
    #[inline]
    pub fn backward_extend(&self, (lo, hi): Interval, c: u8) -> Interval {
        let base = self.less[c as usize] as usize;
        (
            base + self.occ(c, lo) as usize,
            base + self.occ(c, hi) as usize,
        )
    }

    /// 反向搜索精确匹配，pat 为已编码符号（不应包含分隔符 0）
    pub fn backward_search(&self, pat: &[u8]) -> Option<Interval> {
        let mut iv = self.full_interval();
        for &a in pat.iter().rev() {
            iv = self.backward_extend(iv, a);
            if iv.0 >= iv.1 {
                return None;
            }
        }
        Some(iv)
    }

    /// LF 映射：行 i 的 BWT 字符在首列中的行号
    #[inline]
    fn lf(&self, i: usize) -> usize {
        let c = self.bwt[i];
        self.less[c as usize] as usize + self.occ(c, i) as usize
    }

    /// 由后缀数组行号还原文本偏移：LF 游走至最近采样行。
    /// 游走步数超过文本长度说明索引已损坏。
    pub fn resolve_position(&self, row: usize) -> Result<u32> {
        let n = self.bwt.len();
        if row >= n {
            return Err(MapError::CorruptIndex(format!(
                "suffix array row {} out of range {}",
                row, n
            )));
        }
        let mask = (1usize << self.sa_shift) - 1;
        let mut i = row;
        let mut steps = 0u32;
        while i & mask != 0 {
            i = self.lf(i);
            steps += 1;
            if steps as usize > n {
                return Err(MapError::CorruptIndex(
                    "LF walk did not reach a sampled row".to_string(),
                ));
            }
        }
        // 游走越过文本起点时位置回绕一圈
        let pos = self.sampled_sa[i >> self.sa_shift] as usize + steps as usize;
        Ok((pos % n) as u32)
    }

    /// 区间内全部后缀的文本偏移
    pub fn resolve_interval(&self, (lo, hi): Interval) -> Result<Vec<u32>> {
        (lo..hi).map(|row| self.resolve_position(row)).collect()
    }

    /// 将文本偏移映射到 (蛋白序号, 蛋白内偏移)。落在分隔符位置时返回 None。
    pub fn span_of_position(&self, pos: u32) -> Option<(usize, u32)> {
        let mut lo = 0usize;
        let mut hi = self.spans.len();
        while lo < hi {
            let mid = (lo + hi) / 2;
            let s = &self.spans[mid];
            if pos < s.offset {
                hi = mid;
            } else if pos >= s.offset + s.len {
                lo = mid + 1;
            } else {
                return Some((mid, pos - s.offset));
            }
        }
        None
    }

    /// 索引各结构占用的字节数（诊断用）
    pub fn allocated_bytes(&self) -> usize {
        self.bwt.len()
            + self.text.len()
            + self.less.len() * 4
            + self.occ_samples.len() * 4
            + self.sampled_sa.len() * 4
            + self
                .spans
                .iter()
                .map(|s| s.accession.len() + 8)
                .sum::<usize>()
    }

    pub fn save_to_file(&self, path: &str) -> AnyResult<()> {
        let mut f = std::fs::File::create(path)?;
        bincode::serialize_into(&mut f, self)?;
        Ok(())
    }

    pub fn load_from_file(path: &str) -> AnyResult<Self> {
        let f = std::fs::File::open(path)?;
        let idx: Self = bincode::deserialize_from(std::io::BufReader::new(f))?;
        Ok(idx)
    }
}
