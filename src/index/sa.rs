/// 构建后缀数组（倍增法，O(n log^2 n) 排序）。
/// 输入为数值化文本（0 为蛋白分隔符，1..=26 为残基符号），
/// 允许文本中出现多个 0。正确性优先于渐进最优。
pub fn build_sa(text: &[u8]) -> Vec<u32> {
    let n = text.len();
    if n == 0 {
        return Vec::new();
    }

    let mut sa: Vec<u32> = (0..n as u32).collect();
    let mut rank: Vec<u32> = text.iter().map(|&c| u32::from(c)).collect();
    let mut tmp: Vec<u32> = vec![0; n];

    let mut k = 1usize;
    while k < n {
        // (rank[i], rank[i+k]) 作为 2k 前缀的排序键；越界视为最小
        let key = |i: usize| (rank[i], if i + k < n { Some(rank[i + k]) } else { None });
        sa.sort_unstable_by(|&a, &b| key(a as usize).cmp(&key(b as usize)));

        tmp[sa[0] as usize] = 0;
        for t in 1..n {
            let prev = sa[t - 1] as usize;
            let cur = sa[t] as usize;
            tmp[cur] = tmp[prev] + u32::from(key(cur) != key(prev));
        }

        rank.copy_from_slice(&tmp);
        if rank[sa[n - 1] as usize] as usize == n - 1 {
            break;
        }
        k <<= 1;
    }

    sa
}
