//! the unconstrained BCT sampler: column-by-column PDC with
//! deterministic forcing, exact rejection, and a transpose fallback
//! for columns that get stuck against Gale-Ryser infeasibility.

use crate::error::Invalid;
use crate::marginal::{feasible, invert, ordering, permuted};
use crate::mask::Mask;
use crate::matrix::Matrix;
use crate::propagate::{propagate, propagate_tentative};
use crate::reject::{acceptance_weight, decide, update_q, Bit};
use crate::retry::with_retries;
use rand::Rng;

/// a column that keeps failing the feasibility check this many times
/// in a row triggers the transpose rescue.
const COLUMN_REPEAT_LIMIT: usize = 1000;

/// safety backstop on how many times we're willing to flip the whole
/// problem: a sane bound so a pathological shape can't spin forever
/// inside one attempt (the outer retry wrapper would eventually give
/// up on it anyway).
const TRANSPOSE_LIMIT: usize = 10_000;

/// uniformly sample a 0/1 matrix with row sums `r` and column sums `c`,
/// retrying internally until success or the retry cap is hit.
pub fn sample_bct<R: Rng>(r: &[u32], c: &[u32], rng: &mut R) -> Result<Matrix, Invalid> {
    if !feasible(r, c) {
        return Err(Invalid::Infeasible);
    }
    with_retries(|rng| attempt(r, c, rng), rng)
}

/// a single (non-retried) sampling attempt.
fn attempt<R: Rng>(r: &[u32], c: &[u32], rng: &mut R) -> Result<Matrix, Invalid> {
    let row_order = ordering(r);
    let col_order = ordering(c);
    let sorted_r = permuted(r, &row_order);
    let sorted_c = permuted(c, &col_order);

    let (table, transposed) = sweep(sorted_r, sorted_c, rng)?;
    let table = if transposed { table.transpose() } else { table };
    let table = table
        .permute_rows(&invert(&row_order))
        .permute_cols(&invert(&col_order));

    if table.matches_marginals(r, c) {
        Ok(table)
    } else {
        Err(Invalid::ValidationFailed)
    }
}

/// the column sweep itself, operating in a working orientation that
/// may be transposed relative to the caller's. returns the table in
/// that working orientation plus whether an odd number of transposes
/// were applied, so the caller can undo it.
fn sweep<R: Rng>(
    mut r: Vec<u32>,
    mut c: Vec<u32>,
    rng: &mut R,
) -> Result<(Matrix, bool), Invalid> {
    let mut m = r.len();
    let mut n = c.len();
    let mut a = Matrix::zeros(m, n);
    let mut mask = Mask::none_decided(m, n);
    let mut transposed = false;
    let mut transpose_count = 0usize;

    let mut j = 0usize;
    let mut repeats = 0usize;
    let mut snapshot = (r.clone(), c.clone(), a.clone(), mask.clone());

    while n > 0 && j + 1 < n {
        let q_before = update_q(&r, &c);

        for i in 0..m {
            if mask.get(i, j) {
                continue;
            }
            let branch0 = propagate_tentative(&r, &c, &mask, i, j, 0);
            let branch1 = propagate_tentative(&r, &c, &mask, i, j, 1);

            match (branch0, branch1) {
                (Err(_), Err(_)) => {
                    log::debug!("both lookahead branches errored at ({i}, {j}); leaving cell at 0");
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
                    match decide(w0, w1, q_before[j], rng) {
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

        let fixed = propagate(&r, &c, &mask)?;
        r = fixed.r;
        c = fixed.c;
        a = a.add(&fixed.forced);
        mask = fixed.mask;

        if feasible(&r, &c) {
            j += 1;
            repeats = 0;
            snapshot = (r.clone(), c.clone(), a.clone(), mask.clone());
            continue;
        }

        repeats += 1;
        let (sr, sc, sa, sm) = snapshot.clone();
        r = sr;
        c = sc;
        a = sa;
        mask = sm;

        if repeats >= COLUMN_REPEAT_LIMIT {
            std::mem::swap(&mut m, &mut n);
            std::mem::swap(&mut r, &mut c);
            a = a.transpose();
            mask = mask.transpose();
            transposed = !transposed;
            transpose_count += 1;
            if transpose_count > TRANSPOSE_LIMIT {
                return Err(Invalid::ValidationFailed);
            }
            log::debug!("column sweep transposed after {COLUMN_REPEAT_LIMIT} stuck repeats");
            j = 0;
            repeats = 0;
            snapshot = (r.clone(), c.clone(), a.clone(), mask.clone());
        }
    }

    let fixed = propagate(&r, &c, &mask)?;
    a = a.add(&fixed.forced);

    Ok((a, transposed))
}
