use std::fmt;

use crate::error::{MapError, Result};

/// 标签成分：确定的残基片段，或两段片段间的质量间隙 [Da]
#[derive(Debug, Clone, PartialEq)]
pub enum TagComponent {
    Sequence(String),
    MassGap(f64),
}

/// 序列标签：片段与质量间隙的有序组合，
/// 文本形式为逗号分隔、数值字段视为间隙，如 `1115.49,LTSESSV,1094.59`。
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub components: Vec<TagComponent>,
}

impl Tag {
    pub fn parse(s: &str) -> Result<Self> {
        if s.trim().is_empty() {
            return Err(MapError::InvalidPattern("empty tag".to_string()));
        }
        let mut components = Vec::new();
        for field in s.split(',') {
            let field = field.trim();
            if field.is_empty() {
                return Err(MapError::InvalidPattern(format!(
                    "empty component in tag '{}'",
                    s
                )));
            }
            // 纯字母字段一律视为片段（"NAN" 是合法肽段而非数值），
            // 其余字段按间隙质量解析
            if field.bytes().all(|b| b.is_ascii_alphabetic()) {
                components.push(TagComponent::Sequence(field.to_uppercase()));
            } else if let Ok(mass) = field.parse::<f64>() {
                components.push(TagComponent::MassGap(mass));
            } else {
                return Err(MapError::InvalidPattern(format!(
                    "unrecognised tag component '{}'",
                    field
                )));
            }
        }
        Ok(Self { components })
    }

    /// 结构校验：至少一个片段锚点，间隙不相邻且为正值
    pub fn validate(&self) -> Result<()> {
        if !self
            .components
            .iter()
            .any(|c| matches!(c, TagComponent::Sequence(_)))
        {
            return Err(MapError::InvalidPattern(
                "tag has no sequence anchor".to_string(),
            ));
        }
        let mut prev_gap = false;
        for c in &self.components {
            match c {
                TagComponent::MassGap(m) => {
                    if prev_gap {
                        return Err(MapError::InvalidPattern(
                            "consecutive mass gaps in tag".to_string(),
                        ));
                    }
                    if !m.is_finite() || *m <= 0.0 {
                        return Err(MapError::InvalidPattern(format!(
                            "non-positive mass gap {} in tag",
                            m
                        )));
                    }
                    prev_gap = true;
                }
                TagComponent::Sequence(s) => {
                    if s.is_empty() {
                        return Err(MapError::InvalidPattern(
                            "empty sequence component in tag".to_string(),
                        ));
                    }
                    prev_gap = false;
                }
            }
        }
        Ok(())
    }

    /// 片段部分的残基总数
    pub fn anchor_len(&self) -> usize {
        self.components
            .iter()
            .map(|c| match c {
                TagComponent::Sequence(s) => s.len(),
                TagComponent::MassGap(_) => 0,
            })
            .sum()
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.components.iter().enumerate() {
            if i > 0 {
                write!(f, ",")?;
            }
            match c {
                TagComponent::Sequence(s) => write!(f, "{}", s)?,
                TagComponent::MassGap(m) => write!(f, "{}", m)?,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_gap_seq_gap() {
        let t = Tag::parse("1115.49,LTSESSV,1094.59").unwrap();
        assert_eq!(t.components.len(), 3);
        assert_eq!(t.components[0], TagComponent::MassGap(1115.49));
        assert_eq!(
            t.components[1],
            TagComponent::Sequence("LTSESSV".to_string())
        );
        t.validate().unwrap();
        assert_eq!(t.anchor_len(), 7);
    }

    #[test]
    fn display_roundtrip() {
        for s in [
            "1115.49,LTSESSV,1094.59",
            "MKWVTF",
            "GA,113.08406,R",
            "128.09496,PEPTIDE",
        ] {
            let t = Tag::parse(s).unwrap();
            assert_eq!(t.to_string(), s);
        }
    }

    #[test]
    fn validation_rejects_gap_only_tags() {
        let t = Tag::parse("114.04,128.06").unwrap();
        assert!(matches!(t.validate(), Err(MapError::InvalidPattern(_))));
    }

    #[test]
    fn validation_rejects_consecutive_gaps() {
        let t = Tag {
            components: vec![
                TagComponent::Sequence("MK".to_string()),
                TagComponent::MassGap(114.04),
                TagComponent::MassGap(128.06),
                TagComponent::Sequence("R".to_string()),
            ],
        };
        assert!(matches!(t.validate(), Err(MapError::InvalidPattern(_))));
    }

    #[test]
    fn validation_rejects_non_positive_gaps() {
        let t = Tag {
            components: vec![
                TagComponent::MassGap(-10.0),
                TagComponent::Sequence("MK".to_string()),
            ],
        };
        assert!(matches!(t.validate(), Err(MapError::InvalidPattern(_))));
    }

    #[test]
    fn malformed_tags_rejected() {
        assert!(matches!(
            Tag::parse(""),
            Err(MapError::InvalidPattern(_))
        ));
        assert!(matches!(
            Tag::parse("MK,,R"),
            Err(MapError::InvalidPattern(_))
        ));
        assert!(matches!(
            Tag::parse("MK,P3PTIDE"),
            Err(MapError::InvalidPattern(_))
        ));
    }

    #[test]
    fn alphabetic_fields_are_sequences_even_if_numeric_looking() {
        // "NAN" 能被 f64 解析，但它是合法肽段
        let t = Tag::parse("NAN,128.09496,R").unwrap();
        assert_eq!(t.components[0], TagComponent::Sequence("NAN".to_string()));
        assert_eq!(t.components[1], TagComponent::MassGap(128.09496));
        // 显式写出的非有限间隙被结构校验拒绝
        let t = Tag::parse("MK,+inf,R").unwrap();
        assert!(matches!(t.validate(), Err(MapError::InvalidPattern(_))));
    }
}
