use std::fmt;

use crate::error::{MapError, Result};
use crate::util::aa;

/// 歧义模式：每个位置一组允许的残基。
/// 文本形式为方括号语法，如 `[TEST]TE[ST]` 表示首位可为 T/E/S/T。
/// 解析与 `Display` 严格互逆（保留方括号内的原始顺序与重复）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AminoAcidPattern {
    positions: Vec<Vec<u8>>,
}

impl AminoAcidPattern {
    pub fn parse(s: &str) -> Result<Self> {
        let bytes = s.as_bytes();
        let mut positions: Vec<Vec<u8>> = Vec::new();
        let mut i = 0usize;
        while i < bytes.len() {
            match bytes[i] {
                b'[' => {
                    let mut alts = Vec::new();
                    i += 1;
                    while i < bytes.len() && bytes[i] != b']' {
                        alts.push(aa::encode(bytes[i])?);
                        i += 1;
                    }
                    if i == bytes.len() {
                        return Err(MapError::InvalidPattern(format!("unclosed '[' in '{}'", s)));
                    }
                    if alts.is_empty() {
                        return Err(MapError::InvalidPattern(format!(
                            "empty alternative set in '{}'",
                            s
                        )));
                    }
                    positions.push(alts);
                    i += 1;
                }
                b']' => {
                    return Err(MapError::InvalidPattern(format!("unmatched ']' in '{}'", s)));
                }
                c => {
                    positions.push(vec![aa::encode(c)?]);
                    i += 1;
                }
            }
        }
        if positions.is_empty() {
            return Err(MapError::InvalidPattern("empty pattern".to_string()));
        }
        Ok(Self { positions })
    }

    /// 模式长度（位置数）
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// 各位置允许的符号集合（原始顺序，未去重）
    pub fn positions(&self) -> &[Vec<u8>] {
        &self.positions
    }
}

impl fmt::Display for AminoAcidPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for alts in &self.positions {
            if alts.len() == 1 {
                write!(f, "{}", aa::decode(alts[0]) as char)?;
            } else {
                write!(f, "[")?;
                for &a in alts {
                    write!(f, "{}", aa::decode(a) as char)?;
                }
                write!(f, "]")?;
            }
        }
        Ok(())
    }
}
