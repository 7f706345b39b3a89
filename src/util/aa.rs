use crate::error::{MapError, Result};

/// 字母表大小：{0:$(蛋白分隔符), 1..=26:A..Z}。
/// 26 个字母全部是合法的氨基酸单字母码：20 个标准残基加 U/O，
/// 以及歧义码 B(D/N)、Z(E/Q)、J(I/L)、X(任意标准残基)。
pub const SIGMA: usize = 27;

/// 蛋白边界分隔符，永远不会与任何查询符号匹配
pub const SENTINEL: u8 = 0;

/// 序列匹配模式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchingMode {
    /// 逐字符严格匹配
    String,
    /// 展开歧义码（X/B/Z/J）
    AminoAcid,
    /// 在歧义码基础上将 I/L 视为不可区分
    IndistinguishableAminoAcids,
}

#[inline]
const fn sym(c: u8) -> u8 {
    c - b'A' + 1
}

/// 残基字符编码为符号，大小写不敏感
#[inline]
pub fn encode(b: u8) -> Result<u8> {
    let up = b.to_ascii_uppercase();
    if up.is_ascii_uppercase() {
        Ok(sym(up))
    } else {
        Err(MapError::UnknownResidue(b as char))
    }
}

/// 符号解码回单字母码，分隔符显示为 '$'
#[inline]
pub fn decode(a: u8) -> u8 {
    if a == SENTINEL {
        b'$'
    } else {
        b'A' + a - 1
    }
}

/// 整条残基串编码；遇到非法字符立即报错
pub fn encode_seq(seq: &[u8]) -> Result<Vec<u8>> {
    seq.iter().map(|&b| encode(b)).collect()
}

/// 符号串解码为字符串
pub fn decode_seq(symbols: &[u8]) -> String {
    symbols.iter().map(|&a| decode(a) as char).collect()
}

/// 20 个标准残基（X 的展开集）
const STANDARD: [u8; 20] = [
    sym(b'A'),
    sym(b'C'),
    sym(b'D'),
    sym(b'E'),
    sym(b'F'),
    sym(b'G'),
    sym(b'H'),
    sym(b'I'),
    sym(b'K'),
    sym(b'L'),
    sym(b'M'),
    sym(b'N'),
    sym(b'P'),
    sym(b'Q'),
    sym(b'R'),
    sym(b'S'),
    sym(b'T'),
    sym(b'V'),
    sym(b'W'),
    sym(b'Y'),
];

const SUB_B: [u8; 2] = [sym(b'D'), sym(b'N')];
const SUB_Z: [u8; 2] = [sym(b'E'), sym(b'Q')];
const SUB_J: [u8; 2] = [sym(b'I'), sym(b'L')];

/// 歧义码集合（可展开为多个具体残基的符号）
pub const COMBINATION_CODES: [u8; 4] = [sym(b'B'), sym(b'J'), sym(b'X'), sym(b'Z')];

/// 歧义码展开为具体残基集合；具体残基展开为其自身
pub fn expansion(a: u8) -> &'static [u8] {
    match decode(a) {
        b'X' => &STANDARD,
        b'B' => &SUB_B,
        b'Z' => &SUB_Z,
        b'J' => &SUB_J,
        _ => &[],
    }
}

/// 符号是否为歧义码
#[inline]
pub fn is_combination(a: u8) -> bool {
    matches!(decode(a), b'B' | b'J' | b'X' | b'Z')
}

/// 查询符号在给定匹配模式下可接受的语料符号集合（升序去重）。
/// `AminoAcid` 模式下歧义码展开为具体残基，具体残基同时匹配覆盖它的
/// 歧义码；`IndistinguishableAminoAcids` 额外令 I/L 互相匹配。
/// `x_strict` 为 true 时查询中的 X 不展开，只与语料中的 X 字面匹配。
pub fn candidates(a: u8, mode: MatchingMode, x_strict: bool) -> Vec<u8> {
    let mut out = vec![a];
    match mode {
        MatchingMode::String => {}
        MatchingMode::AminoAcid | MatchingMode::IndistinguishableAminoAcids => {
            if !(x_strict && decode(a) == b'X') {
                out.extend_from_slice(expansion(a));
            }
            for &code in &COMBINATION_CODES {
                if expansion(code).contains(&a) {
                    out.push(code);
                }
            }
            if mode == MatchingMode::IndistinguishableAminoAcids {
                match decode(a) {
                    b'I' => out.push(sym(b'L')),
                    b'L' => out.push(sym(b'I')),
                    _ => {}
                }
            }
        }
    }
    out.sort_unstable();
    out.dedup();
    out
}

/// 残基单同位素质量 [Da]；歧义码与分隔符无定义质量
pub fn monoisotopic_mass(a: u8) -> Option<f64> {
    match decode(a) {
        b'G' => Some(57.02146),
        b'A' => Some(71.03711),
        b'S' => Some(87.03203),
        b'P' => Some(97.05276),
        b'V' => Some(99.06841),
        b'T' => Some(101.04768),
        b'C' => Some(103.00919),
        b'I' | b'L' => Some(113.08406),
        b'N' => Some(114.04293),
        b'D' => Some(115.02694),
        b'Q' => Some(128.05858),
        b'K' => Some(128.09496),
        b'E' => Some(129.04259),
        b'M' => Some(131.04049),
        b'H' => Some(137.05891),
        b'F' => Some(147.06841),
        b'R' => Some(156.10111),
        b'U' => Some(150.95364),
        b'Y' => Some(163.06333),
        b'W' => Some(186.07931),
        b'O' => Some(237.14773),
        _ => None,
    }
}

/// 残基串的单同位素质量和；含无质量符号时返回 None
pub fn mass_of(symbols: &[u8]) -> Option<f64> {
    symbols
        .iter()
        .try_fold(0.0, |acc, &a| monoisotopic_mass(a).map(|m| acc + m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encode_decode_roundtrip() {
        for c in b'A'..=b'Z' {
            let a = encode(c).unwrap();
            assert_eq!(decode(a), c);
        }
        assert_eq!(encode(b'k').unwrap(), encode(b'K').unwrap());
        assert_eq!(decode(SENTINEL), b'$');
    }

    #[test]
    fn invalid_characters_rejected() {
        assert_eq!(encode(b'1'), Err(MapError::UnknownResidue('1')));
        assert_eq!(encode(b'*'), Err(MapError::UnknownResidue('*')));
        assert!(encode_seq(b"PEPT1DE").is_err());
    }

    #[test]
    fn ambiguity_expansion() {
        assert_eq!(expansion(encode(b'X').unwrap()).len(), 20);
        let b = expansion(encode(b'B').unwrap());
        assert_eq!(b, &[encode(b'D').unwrap(), encode(b'N').unwrap()]);
        let z = expansion(encode(b'Z').unwrap());
        assert_eq!(z, &[encode(b'E').unwrap(), encode(b'Q').unwrap()]);
        assert!(expansion(encode(b'A').unwrap()).is_empty());
    }

    #[test]
    fn candidates_string_mode() {
        let i = encode(b'I').unwrap();
        assert_eq!(candidates(i, MatchingMode::String, false), vec![i]);
    }

    #[test]
    fn candidates_amino_acid_mode() {
        // D 同时匹配覆盖它的 B 和 X
        let d = encode(b'D').unwrap();
        let cs = candidates(d, MatchingMode::AminoAcid, false);
        assert!(cs.contains(&d));
        assert!(cs.contains(&encode(b'B').unwrap()));
        assert!(cs.contains(&encode(b'X').unwrap()));
        assert!(!cs.contains(&encode(b'Z').unwrap()));

        let x = encode(b'X').unwrap();
        let cs = candidates(x, MatchingMode::AminoAcid, false);
        assert_eq!(cs.len(), 21); // X 自身 + 20 个标准残基
    }

    #[test]
    fn candidates_indistinguishable_il() {
        let i = encode(b'I').unwrap();
        let l = encode(b'L').unwrap();
        let j = encode(b'J').unwrap();
        let cs = candidates(i, MatchingMode::IndistinguishableAminoAcids, false);
        assert!(cs.contains(&l));
        assert!(cs.contains(&j));
        let cs = candidates(i, MatchingMode::AminoAcid, false);
        assert!(!cs.contains(&l));
    }

    #[test]
    fn candidates_strict_x() {
        let x = encode(b'X').unwrap();
        let cs = candidates(x, MatchingMode::AminoAcid, true);
        assert_eq!(cs, vec![x]);
    }

    #[test]
    fn masses() {
        assert_eq!(monoisotopic_mass(encode(b'G').unwrap()), Some(57.02146));
        assert_eq!(
            monoisotopic_mass(encode(b'I').unwrap()),
            monoisotopic_mass(encode(b'L').unwrap())
        );
        assert_eq!(monoisotopic_mass(encode(b'X').unwrap()), None);
        assert_eq!(monoisotopic_mass(SENTINEL), None);

        let kg = encode_seq(b"KG").unwrap();
        let m = mass_of(&kg).unwrap();
        assert!((m - (128.09496 + 57.02146)).abs() < 1e-9);
        assert!(mass_of(&encode_seq(b"KXG").unwrap()).is_none());
    }
}
