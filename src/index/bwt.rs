/// 根据后缀数组构建 Burrows-Wheeler 变换。
/// text 为数值化字母表（0..SIGMA），sa 为后缀数组。
pub fn build_bwt(text: &[u8], sa: &[u32]) -> Vec<u8> {
    let n = text.len();
    if n == 0 {
        return Vec::new();
    }
    sa.iter()
        .map(|&p| {
            let i = p as usize;
            if i == 0 {
                text[n - 1]
            } else {
                text[i - 1]
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::sa::build_sa;

    #[test]
    fn bwt_small() {
        // "MKMK$" -> 13 11 13 11 0
        let text = [13u8, 11, 13, 11, 0];
        let sa = build_sa(&text);
        let bwt = build_bwt(&text, &sa);
        assert_eq!(bwt.len(), text.len());
        // 行 0 对应后缀 "$"，其前一个字符是 K
        assert_eq!(sa[0], 4);
        assert_eq!(bwt[0], 11);
        // BWT 是文本的一个置换
        let mut a = bwt.clone();
        let mut b = text.to_vec();
        a.sort_unstable();
        b.sort_unstable();
        assert_eq!(a, b);
    }

    #[test]
    fn bwt_empty() {
        assert!(build_bwt(&[], &[]).is_empty());
    }
}
