use itertools::Itertools;

/// a row or column sum vector. always non-negative; the sampler never
/// constructs one with a negative entry (propagation errors out first).
pub type Marginal = Vec<u32>;

/// the permutation `pi` such that `v[pi[0]] <= v[pi[1]] <= ...`, ties
/// broken by original index. used to bring residual marginals into
/// ascending order before a column sweep and to undo that reordering
/// on the way out.
pub fn ordering(v: &[u32]) -> Vec<usize> {
    (0..v.len())
        .sorted_by_key(|&i| (v[i], i))
        .collect::<Vec<_>>()
}

/// apply a permutation (as produced by [`ordering`]) to a slice,
/// returning `out[k] = v[perm[k]]`.
pub fn permuted<T: Copy>(v: &[T], perm: &[usize]) -> Vec<T> {
    perm.iter().map(|&i| v[i]).collect()
}

/// the inverse of a permutation: `inverse[perm[k]] = k`.
pub fn invert(perm: &[usize]) -> Vec<usize> {
    let mut inverse = vec![0usize; perm.len()];
    for (k, &i) in perm.iter().enumerate() {
        inverse[i] = k;
    }
    inverse
}

/// sum of non-negative marginal entries, used to check the m-by-n
/// consistency precondition (row sum total equals column sum total).
pub fn total(v: &[u32]) -> u64 {
    v.iter().map(|&x| x as u64).sum()
}

/// the conjugate partition of a (not-necessarily sorted) sequence `c`:
/// `conjugate(c)[k]` is the number of entries of `c` strictly greater
/// than `k`, for `k = 0..m`. `m` is the length the caller wants the
/// conjugate padded/truncated to (the row-marginal length it will be
/// compared against).
pub fn conjugate(c: &[u32], m: usize) -> Vec<u32> {
    (0..m)
        .map(|k| c.iter().filter(|&&cj| cj > k as u32).count() as u32)
        .collect()
}

/// `a` majorizes `b`: both sorted non-increasing, every prefix sum of
/// `a` is >= the corresponding prefix sum of `b`, and the totals agree.
/// sequences are zero-padded to a common length first.
pub fn majorizes(a: &[u32], b: &[u32]) -> bool {
    let len = a.len().max(b.len());
    let mut a = a.to_vec();
    let mut b = b.to_vec();
    a.resize(len, 0);
    b.resize(len, 0);
    a.sort_unstable_by(|x, y| y.cmp(x));
    b.sort_unstable_by(|x, y| y.cmp(x));
    if total(&a) != total(&b) {
        return false;
    }
    let mut running_a = 0u64;
    let mut running_b = 0u64;
    for (&x, &y) in a.iter().zip(b.iter()) {
        running_a += x as u64;
        running_b += y as u64;
        if running_a < running_b {
            return false;
        }
    }
    true
}

/// the Gale-Ryser feasibility oracle: a 0/1 matrix with row sums `r`
/// and column sums `c` exists iff `r` is majorized by the conjugate of
/// `c` (or symmetrically). returns false immediately if the two
/// marginals don't even sum to the same total.
pub fn feasible(r: &[u32], c: &[u32]) -> bool {
    if total(r) != total(c) {
        return false;
    }
    let cstar = conjugate(c, r.len());
    majorizes(r, &cstar) || majorizes(&cstar, r)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_sorts_ascending_with_index_tiebreak() {
        let v = [3u32, 1, 1, 2];
        let perm = ordering(&v);
        let sorted = permuted(&v, &perm);
        assert_eq!(sorted, vec![1, 1, 2, 3]);
        assert_eq!(perm, vec![1, 2, 3, 0]);
    }

    #[test]
    fn invert_round_trips() {
        let v = [3u32, 1, 1, 2];
        let perm = ordering(&v);
        let inverse = invert(&perm);
        let restored = permuted(&permuted(&v, &perm), &inverse);
        assert_eq!(restored.as_slice(), &v);
    }

    #[test]
    fn conjugate_of_constant_partition() {
        // c = (2,2,2), conjugate over m=3: conjugate[k] = #{j : c[j] > k}
        let c = [2u32, 2, 2];
        assert_eq!(conjugate(&c, 3), vec![3, 0, 0]);
    }

    #[test]
    fn feasible_accepts_square_constant_marginals() {
        assert!(feasible(&[3, 3, 3], &[3, 3, 3]));
    }

    #[test]
    fn feasible_rejects_mismatched_totals() {
        assert!(!feasible(&[4, 0, 0], &[1, 1, 1]));
    }

    #[test]
    fn feasible_accepts_permutation_marginals() {
        assert!(feasible(&[1, 1, 1], &[1, 1, 1]));
    }

    #[test]
    fn feasible_rejects_overloaded_row() {
        // totals agree (5 == 5) but a single row of 1 column can never
        // reach 5 across only 4 columns: true structural infeasibility,
        // not just a total mismatch.
        assert!(!feasible(&[5], &[2, 1, 1, 1]));
    }
}
