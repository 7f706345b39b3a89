use std::fmt;

/// 核心错误类型。查询校验类错误在索引遍历开始前抛出，
/// `CorruptIndex` 表示索引内部不变量被破坏，当前查询不可恢复。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MapError {
    /// 字符不在氨基酸字母表内
    UnknownResidue(char),
    /// 蛋白库为空
    EmptyDatabase,
    /// 语料为空，无法建索引
    EmptyCorpus,
    /// 歧义模式 / 序列标签格式非法
    InvalidPattern(String),
    /// 索引不变量被破坏（定位落在分隔符上、LF 游走不收敛等）
    CorruptIndex(String),
}

impl fmt::Display for MapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MapError::UnknownResidue(c) => {
                write!(f, "unknown amino acid residue '{}'", c)
            }
            MapError::EmptyDatabase => write!(f, "protein database contains no sequences"),
            MapError::EmptyCorpus => write!(f, "cannot build an index over an empty corpus"),
            MapError::InvalidPattern(msg) => write!(f, "invalid query pattern: {}", msg),
            MapError::CorruptIndex(msg) => write!(f, "corrupt index: {}", msg),
        }
    }
}

impl std::error::Error for MapError {}

pub type Result<T> = std::result::Result<T, MapError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages() {
        assert_eq!(
            MapError::UnknownResidue('7').to_string(),
            "unknown amino acid residue '7'"
        );
        assert!(MapError::CorruptIndex("offset 12 on separator".to_string())
            .to_string()
            .contains("corrupt index"));
    }
}
