//! the BCT sampler with a user-supplied forced-zero mask: same
//! acceptance machinery as the unconstrained sampler, but driven by a
//! most-constrained-cell heuristic instead of a left-to-right column
//! sweep, since there's no column order to exploit once some cells are
//! pinned to zero in advance.

use crate::error::Invalid;
use crate::mask::Mask;
use crate::matrix::Matrix;
use crate::propagate::{propagate, propagate_tentative};
use crate::reject::{acceptance_weight, decide, update_q, Bit};
use crate::retry::with_retries;
use rand::Rng;

/// uniformly sample a 0/1 matrix with row sums `r`, column sums `c`,
/// and every cell marked in `w` (the forced-zero mask) held at 0.
pub fn sample_bct_with_zeros<R: Rng>(
    r: &[u32],
    c: &[u32],
    w: &Mask,
    rng: &mut R,
) -> Result<Matrix, Invalid> {
    with_retries(|rng| attempt(r, c, w, rng), rng)
}

fn attempt<R: Rng>(r0: &[u32], c0: &[u32], w: &Mask, rng: &mut R) -> Result<Matrix, Invalid> {
    let start = propagate(r0, c0, w)?;
    let mut r = start.r;
    let mut c = start.c;
    let mut a = start.forced;
    let mut mask = start.mask;

    while !mask.all_decided() {
        let q = update_q(&r, &c);
        let (i, j) = select_cell(&r, &c, &mask);

        let branch0 = propagate_tentative(&r, &c, &mask, i, j, 0);
        let branch1 = propagate_tentative(&r, &c, &mask, i, j, 1);

        match (branch0, branch1) {
            (Err(_), Err(_)) => {
                log::warn!("both branches errored at cell ({i}, {j}); falling back to k=0");
                mask.set(i, j, true);
            }
            (Ok(chosen), Err(_)) | (Err(_), Ok(chosen)) => {
                r = chosen.r;
                c = chosen.c;
                a = a.add(&chosen.forced);
                mask = chosen.mask;
            }
            (Ok(b0), Ok(b1)) => {
                let w0 = acceptance_weight(i, j, &b0);
                let w1 = acceptance_weight(i, j, &b1);
                match decide(w0, w1, q[j], rng) {
                    Some(Bit::Zero) => {
                        r = b0.r;
                        c = b0.c;
                        a = a.add(&b0.forced);
                        mask = b0.mask;
                    }
                    Some(Bit::One) => {
                        r = b1.r;
                        c = b1.c;
                        a = a.add(&b1.forced);
                        mask = b1.mask;
                    }
                    None => {
                        log::debug!("both branch weights below tolerance at ({i}, {j}); leaving cell at 0");
                        mask.set(i, j, true);
                    }
                }
            }
        }
    }

    if a.matches_marginals(r0, c0) && respects_mask(&a, w) {
        Ok(a)
    } else {
        Err(Invalid::ValidationFailed)
    }
}

/// the next free cell maximizing `min(r[i], c[j])`, the remaining
/// capacity of whichever side is tighter; ties broken by smallest row
/// index then smallest column index.
fn select_cell(r: &[u32], c: &[u32], mask: &Mask) -> (usize, usize) {
    let mut best: Option<(u32, usize, usize)> = None;
    for i in 0..mask.rows() {
        for j in 0..mask.cols() {
            if mask.get(i, j) {
                continue;
            }
            let score = r[i].min(c[j]);
            best = match best {
                None => Some((score, i, j)),
                Some((best_score, ..)) if score > best_score => Some((score, i, j)),
                other => other,
            };
        }
    }
    let (_, i, j) = best.expect("select_cell called with a fully-decided mask");
    (i, j)
}

/// every cell forced to 0 by the caller's original mask is 0 in `a`.
fn respects_mask(a: &Matrix, w: &Mask) -> bool {
    for i in 0..w.rows() {
        for j in 0..w.cols() {
            if w.get(i, j) && a.get(i, j) != 0 {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn empty_mask_behaves_like_unconstrained_sampler() {
        let mask = Mask::none_decided(3, 3);
        let mut rng = SmallRng::seed_from_u64(1);
        let table = sample_bct_with_zeros(&[1, 1, 1], &[1, 1, 1], &mask, &mut rng).unwrap();
        assert_eq!(table.row_sums(), vec![1, 1, 1]);
        assert_eq!(table.col_sums(), vec![1, 1, 1]);
    }

    #[test]
    fn forced_zero_cell_is_never_set() {
        let mut mask = Mask::none_decided(2, 2);
        mask.set(0, 0, true);
        let mut rng = SmallRng::seed_from_u64(2);
        let table = sample_bct_with_zeros(&[1, 1], &[1, 1], &mask, &mut rng).unwrap();
        assert_eq!(table.get(0, 0), 0);
        assert_eq!(table.row_sums(), vec![1, 1]);
        assert_eq!(table.col_sums(), vec![1, 1]);
    }

    #[test]
    fn unique_table_forced_by_corner_masks() {
        // masking both off-diagonal cells of a 2x2 with r=c=(1,1)
        // leaves only the identity permutation matrix.
        let mut mask = Mask::none_decided(2, 2);
        mask.set(0, 1, true);
        mask.set(1, 0, true);
        let mut rng = SmallRng::seed_from_u64(3);
        let table = sample_bct_with_zeros(&[1, 1], &[1, 1], &mask, &mut rng).unwrap();
        assert_eq!(table.get(0, 0), 1);
        assert_eq!(table.get(1, 1), 1);
        assert_eq!(table.get(0, 1), 0);
        assert_eq!(table.get(1, 0), 0);
    }

    #[test]
    fn select_cell_picks_the_tightest_free_cell() {
        let mask = Mask::none_decided(2, 2);
        let r = vec![3, 1];
        let c = vec![3, 1];
        // min(r,c) is 3 at (0,0), 1 elsewhere; tightest should be (0,0).
        assert_eq!(select_cell(&r, &c, &mask), (0, 0));
    }
}
