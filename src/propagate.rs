//! the deterministic-fill fixpoint: forcing cells to 0 or 1 whenever a
//! row or column's residual marginal leaves no freedom, iterated to a
//! fixpoint. shared by both BCT samplers.

use crate::error::Invalid;
use crate::mask::Mask;
use crate::matrix::Matrix;

/// the result of running the propagator to fixpoint: updated residual
/// marginals, the cells newly forced to 1 during this call (`forced`),
/// and the evolving mask with every forced cell (0 or 1) now marked
/// decided.
#[derive(Clone, Debug)]
pub struct Propagated {
    pub r: Vec<u32>,
    pub c: Vec<u32>,
    pub forced: Matrix,
    pub mask: Mask,
}

/// run row-pass/column-pass forcing to a fixpoint.
///
/// - a row with zero free cells remaining and residual 0 is already
///   satisfied; nothing to force.
/// - a row with residual 0 and free cells remaining forces those cells
///   to 0 (marks them decided, no change to `c`).
/// - a row whose residual equals its free-cell count forces every free
///   cell in that row to 1 (decrements `r[i]` and `c[j]`, marks decided).
/// - a row whose residual exceeds its free-cell count is an
///   oversaturation error: no completion exists.
///
/// symmetric rules apply per column. iterate until a full row+column
/// pass makes no change.
pub fn propagate(r: &[u32], c: &[u32], mask: &Mask) -> Result<Propagated, Invalid> {
    let rows = mask.rows();
    let cols = mask.cols();
    let mut r = r.to_vec();
    let mut c = c.to_vec();
    let mut mask = mask.clone();
    let mut forced = Matrix::zeros(rows, cols);

    loop {
        let mut changed = false;

        for i in 0..rows {
            let free = mask.free_in_row(i) as u32;
            if r[i] > free {
                return Err(Invalid::Oversaturated);
            }
            if free == 0 {
                continue;
            }
            if r[i] == 0 {
                for j in 0..cols {
                    if !mask.get(i, j) {
                        mask.set(i, j, true);
                        changed = true;
                    }
                }
            } else if r[i] == free {
                for j in 0..cols {
                    if !mask.get(i, j) {
                        mask.set(i, j, true);
                        forced.set(i, j, 1);
                        r[i] -= 1;
                        if c[j] == 0 {
                            return Err(Invalid::Oversaturated);
                        }
                        c[j] -= 1;
                        changed = true;
                    }
                }
            }
        }

        for j in 0..cols {
            let free = mask.free_in_col(j) as u32;
            if c[j] > free {
                return Err(Invalid::Oversaturated);
            }
            if free == 0 {
                continue;
            }
            if c[j] == 0 {
                for i in 0..rows {
                    if !mask.get(i, j) {
                        mask.set(i, j, true);
                        changed = true;
                    }
                }
            } else if c[j] == free {
                for i in 0..rows {
                    if !mask.get(i, j) {
                        mask.set(i, j, true);
                        forced.set(i, j, 1);
                        c[j] -= 1;
                        if r[i] == 0 {
                            return Err(Invalid::Oversaturated);
                        }
                        r[i] -= 1;
                        changed = true;
                    }
                }
            }
        }

        if !changed {
            break;
        }
    }

    Ok(Propagated { r, c, forced, mask })
}

/// the lookahead variant: assign cell `(i, j)` to
/// `k` up front, decrementing `r[i]`/`c[j]` and recording the forced
/// cell when `k == 1`, then run [`propagate`] to fixpoint from there.
/// `mask` must already have `(i, j)` free; this function marks it
/// decided as part of the tentative assignment.
pub fn propagate_tentative(
    r: &[u32],
    c: &[u32],
    mask: &Mask,
    i: usize,
    j: usize,
    k: u8,
) -> Result<Propagated, Invalid> {
    let mut r = r.to_vec();
    let mut c = c.to_vec();
    let mut mask = mask.clone();
    let mut forced = Matrix::zeros(mask.rows(), mask.cols());

    mask.set(i, j, true);
    if k == 1 {
        if r[i] == 0 || c[j] == 0 {
            return Err(Invalid::Oversaturated);
        }
        r[i] -= 1;
        c[j] -= 1;
        forced.set(i, j, 1);
    }

    let rest = propagate(&r, &c, &mask)?;
    Ok(Propagated {
        r: rest.r,
        c: rest.c,
        forced: forced.add(&rest.forced),
        mask: rest.mask,
    })
}
