//! the rejection-probability evaluator: exact acceptance
//! weights for a tentative bit assignment, and the biased-coin plus
//! inner-rejection machinery that turns those weights into a committed
//! bit.

use crate::matrix::Matrix;
use crate::numeric::{self, lgamma, poisson_binomial_pmf};
use crate::propagate::Propagated;
use rand::Rng;
use std::collections::BTreeSet;

/// columns with q at or above this are "saturated" and dropped from
/// the Poisson-binomial row factor.
const ROW_FILTER_EPSILON: f64 = 1e-14;

/// an inner-rejection loop is almost-surely terminating but we cap it
/// for safety; exceeding the cap is treated the same as "both
/// branches below tolerance".
const INNER_REJECTION_CAP: usize = 1_000_000;

/// the per-column success-probability heuristic: `q[j] = 1` if
/// the column is already exhausted, else `c[j] / (m - z)` where `z` is
/// the number of rows whose residual has hit zero.
pub fn update_q(r: &[u32], c: &[u32]) -> Vec<f64> {
    let free_rows = free_rows_count(r) as f64;
    c.iter()
        .map(|&cj| if cj == 0 { 1.0 } else { cj as f64 / free_rows })
        .collect()
}

/// number of rows with strictly positive residual: the denominator of
/// [`update_q`] and the `free_j` term of the column factor below.
pub fn free_rows_count(r: &[u32]) -> usize {
    r.iter().filter(|&&ri| ri > 0).count()
}

/// the column factor of the acceptance weight. this intentionally uses
/// `c[j] * log(1 - q[j]) + (free - c[j]) * log(q[j])` rather than the
/// textbook binomial-pmf convention: the source computes it this way,
/// treating `q[j]` as the probability of a *zero* rather than a one.
/// normalizing by the max across branches (done by the caller) makes
/// this equivalent to the standard convention, so it is reproduced
/// bit-for-bit rather than "corrected".
fn column_factor(c_j: u32, free_rows: usize, q_j: f64) -> f64 {
    if free_rows == 0 {
        return if c_j == 0 { 1.0 } else { 0.0 };
    }
    if q_j <= 0.0 {
        return if c_j == 0 { 1.0 } else { 0.0 };
    }
    if q_j >= 1.0 {
        return if c_j as usize == free_rows { 1.0 } else { 0.0 };
    }
    let free = free_rows as f64;
    let cj = c_j as f64;
    let log_weight = lgamma(free + 1.0) - lgamma(cj + 1.0) - lgamma(free - cj + 1.0)
        + cj * (1.0 - q_j).ln()
        + (free - cj) * q_j.ln();
    log_weight.exp()
}

/// the row factor: Poisson-binomial pmf of the touched row's residual
/// over the still-in-play columns (q below the saturation threshold).
fn row_factor(r_i: u32, q: &[f64]) -> f64 {
    let restricted: Vec<f64> = q
        .iter()
        .copied()
        .filter(|&qj| qj < 1.0 - ROW_FILTER_EPSILON)
        .collect();
    poisson_binomial_pmf(&restricted, r_i as i64)
}

/// rows and columns touched by a tentative decision: the decided cell
/// itself, plus anything the propagator went on to force.
fn touched(i: usize, j: usize, forced: &Matrix) -> (BTreeSet<usize>, BTreeSet<usize>) {
    let mut rows = BTreeSet::new();
    let mut cols = BTreeSet::new();
    rows.insert(i);
    cols.insert(j);
    for ri in 0..forced.rows() {
        for cj in 0..forced.cols() {
            if forced.get(ri, cj) == 1 {
                rows.insert(ri);
                cols.insert(cj);
            }
        }
    }
    (rows, cols)
}

/// the exact acceptance weight for one branch of a tentative (i, j, k)
/// assignment, evaluated on the post-propagation residual state.
pub fn acceptance_weight(i: usize, j: usize, branch: &Propagated) -> f64 {
    let q = update_q(&branch.r, &branch.c);
    let free_rows = free_rows_count(&branch.r);
    let (rows, cols) = touched(i, j, &branch.forced);
    let column_product: f64 = cols
        .iter()
        .map(|&cj| column_factor(branch.c[cj], free_rows, q[cj]))
        .product();
    let row_product: f64 = rows.iter().map(|&ri| row_factor(branch.r[ri], &q)).product();
    column_product * row_product
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bit {
    Zero,
    One,
}

/// decide between the two branches of a tentative bit assignment,
/// given their acceptance weights `w0`/`w1` and the column's current
/// success-probability heuristic `q_j`. returns `None` if both weights
/// are below tolerance, or if the inner rejection loop exceeds its cap
/// without accepting either side, both being the "both-branch-zero"
/// failure mode.
pub fn decide<R: Rng>(w0: f64, w1: f64, q_j: f64, rng: &mut R) -> Option<Bit> {
    let below = |w: f64| w < numeric::EPSILON;
    match (below(w0), below(w1)) {
        (true, true) => return None,
        (true, false) => return Some(Bit::One),
        (false, true) => return Some(Bit::Zero),
        (false, false) => {}
    }

    let peak = w0.max(w1);
    let w0n = w0 / peak;
    let w1n = w1 / peak;
    let p = q_j / (1.0 + q_j);
    let bias = rand::distr::Bernoulli::new(p.clamp(0.0, 1.0)).expect("p in [0, 1]");

    for _ in 0..INNER_REJECTION_CAP {
        let proposal = if rng.sample(bias) { Bit::One } else { Bit::Zero };
        let acceptance = match proposal {
            Bit::One => w1n,
            Bit::Zero => w0n,
        };
        if rng.random::<f64>() < acceptance {
            return Some(proposal);
        }
    }
    None
}
