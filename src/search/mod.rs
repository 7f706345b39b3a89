//! 有界回溯近似搜索：在 FM 索引上自右向左延伸查询，
//! 在替换/插入/删除预算内枚举全部匹配的语料偏移。

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use crate::error::{MapError, Result};
use crate::index::fm::{FMIndex, Interval};
use crate::search::pattern::AminoAcidPattern;
use crate::search::tag::{Tag, TagComponent};
use crate::util::aa::{self, MatchingMode};

pub mod pattern;
pub mod tag;

/// 搜索参数。`limit_x` 为查询中 X 残基的占比上限，超出直接返回空结果；
/// `fragment_tolerance` 为标签间隙的质量容差 [Da]；
/// `x_counts_as_edit` 决定 X 展开为具体残基时是否消耗一次替换预算。
#[derive(Debug, Clone)]
pub struct SearchParams {
    pub max_substitutions: u32,
    pub max_insertions: u32,
    pub max_deletions: u32,
    pub matching: MatchingMode,
    pub limit_x: f64,
    pub fragment_tolerance: f64,
    pub x_counts_as_edit: bool,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            max_substitutions: 0,
            max_insertions: 0,
            max_deletions: 0,
            matching: MatchingMode::IndistinguishableAminoAcids,
            limit_x: 0.25,
            fragment_tolerance: 0.02,
            x_counts_as_edit: false,
        }
    }
}

/// 一次命中：语料偏移、实际匹配到的符号串（语料顺序）、消耗的编辑数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hit {
    pub position: u32,
    pub matched: Vec<u8>,
    pub edits: u32,
}

/// 查询单元：一个残基位置（允许的语料符号集）或一个质量间隙
enum Unit {
    Pos(Vec<u8>),
    Gap(f64),
}

/// 回溯分支（显式栈元素，避免递归深度受查询长度牵制）
#[derive(Clone)]
struct Branch {
    /// 尚未消费的单元数，自右向左消费
    remaining: usize,
    iv: Interval,
    subs: u32,
    ins: u32,
    dels: u32,
    /// 当前间隙内已累计的质量
    gap_acc: f64,
    /// 自右向左收集的匹配符号，输出时反转为语料顺序
    matched: Vec<u8>,
}

/// 搜索字面肽段序列
pub fn search_peptide(fm: &FMIndex, peptide: &str, params: &SearchParams) -> Result<Vec<Hit>> {
    if peptide.is_empty() {
        return Err(MapError::InvalidPattern("empty peptide".to_string()));
    }
    let syms = aa::encode_seq(peptide.as_bytes())?;
    if x_fraction(&syms) > params.limit_x {
        return Ok(Vec::new());
    }
    let units: Vec<Unit> = syms
        .iter()
        .map(|&a| Unit::Pos(aa::candidates(a, params.matching, params.x_counts_as_edit)))
        .collect();
    run(fm, &units, params)
}

/// 搜索歧义模式：每个位置取允许符号候选集合的并集
pub fn search_pattern(
    fm: &FMIndex,
    pattern: &AminoAcidPattern,
    params: &SearchParams,
) -> Result<Vec<Hit>> {
    let mut units = Vec::with_capacity(pattern.len());
    for alts in pattern.positions() {
        if alts.is_empty() {
            return Err(MapError::InvalidPattern(
                "pattern position with no allowed residues".to_string(),
            ));
        }
        let mut free: Vec<u8> = Vec::new();
        for &a in alts {
            free.extend(aa::candidates(a, params.matching, params.x_counts_as_edit));
        }
        free.sort_unstable();
        free.dedup();
        units.push(Unit::Pos(free));
    }
    run(fm, &units, params)
}

/// 搜索序列标签：片段按残基匹配，间隙按累计质量闭合；
/// 编辑预算只作用于片段内的位置
pub fn search_tag(fm: &FMIndex, tag: &Tag, params: &SearchParams) -> Result<Vec<Hit>> {
    tag.validate()?;
    let mut units = Vec::new();
    let mut anchor_syms: Vec<u8> = Vec::new();
    for comp in &tag.components {
        match comp {
            TagComponent::Sequence(s) => {
                for &b in s.as_bytes() {
                    let a = aa::encode(b)?;
                    anchor_syms.push(a);
                    units.push(Unit::Pos(aa::candidates(
                        a,
                        params.matching,
                        params.x_counts_as_edit,
                    )));
                }
            }
            TagComponent::MassGap(m) => units.push(Unit::Gap(*m)),
        }
    }
    if x_fraction(&anchor_syms) > params.limit_x {
        return Ok(Vec::new());
    }
    run(fm, &units, params)
}

/// 查询中 X 残基占比
fn x_fraction(syms: &[u8]) -> f64 {
    if syms.is_empty() {
        return 0.0;
    }
    let count = syms.iter().filter(|&&a| aa::decode(a) == b'X').count();
    count as f64 / syms.len() as f64
}

/// 回溯主循环。每个分支在以下边上分叉：
/// - 匹配边：当前候选集合内的符号，预算不变；
/// - 错配边：候选集合外的任意残基符号，替换预算 -1；
/// - 插入边：消费查询位置但不消费语料符号，插入预算 -1；
/// - 删除边：消费语料符号但不消费查询位置，删除预算 -1；
/// - 间隙边：累计残基质量直至落入容差窗口。
/// 区间为空立即剪枝；分隔符从不是候选符号，匹配不会跨越蛋白边界。
fn run(fm: &FMIndex, units: &[Unit], params: &SearchParams) -> Result<Vec<Hit>> {
    let n_pos = units.iter().filter(|u| matches!(u, Unit::Pos(_))).count();
    if n_pos == 0 {
        return Err(MapError::InvalidPattern(
            "query has no residue positions".to_string(),
        ));
    }
    if n_pos > fm.corpus_len() {
        return Ok(Vec::new());
    }

    // 每个语料偏移仅保留最优路径：(编辑数, 插入+删除数, 匹配串) 最小者
    let mut best: HashMap<u32, (u32, u32, Vec<u8>)> = HashMap::new();

    let mut stack = vec![Branch {
        remaining: units.len(),
        iv: fm.full_interval(),
        subs: params.max_substitutions,
        ins: params.max_insertions,
        dels: params.max_deletions,
        gap_acc: 0.0,
        matched: Vec::new(),
    }];

    while let Some(b) = stack.pop() {
        if b.remaining == 0 {
            // 纯插入路径没有消费任何语料符号，不构成匹配
            if b.matched.is_empty() {
                continue;
            }
            let indels =
                (params.max_insertions - b.ins) + (params.max_deletions - b.dels);
            let edits = (params.max_substitutions - b.subs) + indels;
            let matched: Vec<u8> = b.matched.iter().rev().copied().collect();
            for pos in fm.resolve_interval(b.iv)? {
                match best.entry(pos) {
                    Entry::Occupied(mut e) => {
                        let cur = e.get_mut();
                        if (edits, indels, &matched) < (cur.0, cur.1, &cur.2) {
                            *cur = (edits, indels, matched.clone());
                        }
                    }
                    Entry::Vacant(e) => {
                        e.insert((edits, indels, matched.clone()));
                    }
                }
            }
            continue;
        }

        match &units[b.remaining - 1] {
            Unit::Gap(target) => {
                // 累计质量已落入容差窗口：闭合间隙
                if (b.gap_acc - target).abs() <= params.fragment_tolerance {
                    let mut next = b.clone();
                    next.remaining -= 1;
                    next.gap_acc = 0.0;
                    stack.push(next);
                }
                // 继续向间隙内前置一个有质量定义的残基
                for c in 1..fm.sigma {
                    let Some(m) = aa::monoisotopic_mass(c) else {
                        continue;
                    };
                    if b.gap_acc + m > target + params.fragment_tolerance {
                        continue;
                    }
                    let iv = fm.backward_extend(b.iv, c);
                    if iv.0 >= iv.1 {
                        continue;
                    }
                    let mut next = b.clone();
                    next.iv = iv;
                    next.gap_acc += m;
                    next.matched.push(c);
                    stack.push(next);
                }
            }
            Unit::Pos(free) => {
                // 匹配边
                for &c in free {
                    let iv = fm.backward_extend(b.iv, c);
                    if iv.0 >= iv.1 {
                        continue;
                    }
                    let mut next = b.clone();
                    next.remaining -= 1;
                    next.iv = iv;
                    next.matched.push(c);
                    stack.push(next);
                }
                // 错配边（替换）
                if b.subs > 0 {
                    for c in 1..fm.sigma {
                        if free.contains(&c) {
                            continue;
                        }
                        let iv = fm.backward_extend(b.iv, c);
                        if iv.0 >= iv.1 {
                            continue;
                        }
                        let mut next = b.clone();
                        next.remaining -= 1;
                        next.iv = iv;
                        next.subs -= 1;
                        next.matched.push(c);
                        stack.push(next);
                    }
                }
                // 插入边：查询残基在蛋白中缺失
                if b.ins > 0 {
                    let mut next = b.clone();
                    next.remaining -= 1;
                    next.ins -= 1;
                    stack.push(next);
                }
                // 删除边：蛋白中多出一个残基
                if b.dels > 0 {
                    for c in 1..fm.sigma {
                        let iv = fm.backward_extend(b.iv, c);
                        if iv.0 >= iv.1 {
                            continue;
                        }
                        let mut next = b.clone();
                        next.iv = iv;
                        next.dels -= 1;
                        next.matched.push(c);
                        stack.push(next);
                    }
                }
            }
        }
    }

    Ok(best
        .into_iter()
        .map(|(position, (edits, _, matched))| Hit {
            position,
            matched,
            edits,
        })
        .collect())
}
