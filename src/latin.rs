//! uniform random Latin squares via recursive bit decomposition:
//! each row/column value is built up bit by bit, the low bit from one
//! unconstrained BCT draw and every subsequent bit from a forced-zero
//! BCT draw confined to whichever stratum that bit belongs to. the two
//! strata at a given level are independent once their masks are fixed,
//! so they're drawn in parallel via `rayon::join`.

use crate::bct::sample_bct;
use crate::error::Invalid;
use crate::mask::Mask;
use crate::matrix::Matrix;
use crate::retry::with_retries;
use crate::zeros::sample_bct_with_zeros;
use rand::Rng;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;

/// uniformly sample an n x n Latin square over {0, ..., n-1}: every row
/// and every column is a permutation of that range. retries internally
/// if a candidate fails the final permutation check or an inner BCT
/// draw comes back invalid.
pub fn sample_latin_square<R: Rng>(n: usize, rng: &mut R) -> Result<Matrix, Invalid> {
    if n == 0 {
        return Ok(Matrix::zeros(0, 0));
    }
    with_retries(|rng| attempt(n, rng), rng)
}

fn attempt<R: Rng>(n: usize, rng: &mut R) -> Result<Matrix, Invalid> {
    let table = match n {
        1 => base_one(),
        2 => base_two(rng),
        3 => base_three(rng),
        _ => build(n, rng)?,
    };
    if is_latin_square(&table, n) {
        Ok(table)
    } else {
        log::warn!("latin square candidate for n={n} failed the permutation check, restarting");
        Err(Invalid::ValidationFailed)
    }
}

fn base_one() -> Matrix {
    Matrix::from_rows(vec![vec![0]])
}

fn base_two<R: Rng>(rng: &mut R) -> Matrix {
    if rng.random::<bool>() {
        Matrix::from_rows(vec![vec![0, 1], vec![1, 0]])
    } else {
        Matrix::from_rows(vec![vec![1, 0], vec![0, 1]])
    }
}

/// a cyclic order-3 square under a uniform column permutation and a
/// fair swap of its first two rows: 12 distinct squares exist at order
/// 3, reachable this way with equal probability.
fn base_three<R: Rng>(rng: &mut R) -> Matrix {
    let cyclic: Vec<Vec<u8>> = (0..3).map(|i| (0..3).map(|j| ((i + j) % 3) as u8).collect()).collect();

    let mut col_order: Vec<usize> = (0..3).collect();
    col_order.shuffle(rng);

    let mut rows: Vec<Vec<u8>> = cyclic
        .iter()
        .map(|row| col_order.iter().map(|&j| row[j]).collect())
        .collect();

    if rng.random::<bool>() {
        rows.swap(0, 1);
    }
    Matrix::from_rows(rows)
}

/// the n >= 4 recursive bit-decomposition case.
fn build<R: Rng>(n: usize, rng: &mut R) -> Result<Matrix, Invalid> {
    let half = (n / 2) as u32;
    let marginal = vec![half; n];

    let low_bit = sample_bct(&marginal, &marginal, rng)?;
    let zero_side = mask_from_ones(&low_bit);
    let one_side = zero_side.complement();

    let next_marginal = halve(&marginal);
    let higher_bits = recurse(&next_marginal, &next_marginal, &zero_side, &one_side, rng)?;

    Ok(low_bit.add(&higher_bits.scale(2)))
}

/// one level of the recursion: `z`/`o` are forced-zero masks for the
/// "this bit is 0" and "this bit is 1" strata respectively. terminates
/// once both strata have at most one free cell left (no further bit
/// can distinguish anything).
fn recurse<R: Rng>(
    r: &[u32],
    c: &[u32],
    z: &Mask,
    o: &Mask,
    rng: &mut R,
) -> Result<Matrix, Invalid> {
    if z.total_free() <= 1 && o.total_free() <= 1 {
        return Ok(Matrix::zeros(z.rows(), z.cols()));
    }

    if o.total_free() == 0 {
        return single_side(r, c, z, rng);
    }
    if z.total_free() == 0 {
        return single_side(r, c, o, rng);
    }

    let seed_z = rng.random::<u64>();
    let seed_o = rng.random::<u64>();
    let (left, right) = rayon::join(
        || -> Result<Matrix, Invalid> {
            let mut child = SmallRng::seed_from_u64(seed_z);
            single_side(r, c, z, &mut child)
        },
        || -> Result<Matrix, Invalid> {
            let mut child = SmallRng::seed_from_u64(seed_o);
            single_side(r, c, o, &mut child)
        },
    );
    Ok(left?.add(&right?))
}

/// draw this level's bit within one stratum and recurse into its own
/// two sub-strata for the next bit.
fn single_side<R: Rng>(r: &[u32], c: &[u32], active: &Mask, rng: &mut R) -> Result<Matrix, Invalid> {
    let bit = sample_bct_with_zeros(r, c, active, rng)?;
    let (next_active, next_inactive) = split(active, &bit);
    let next_r = halve(r);
    let next_c = halve(c);
    let rest = recurse(&next_r, &next_c, &next_active, &next_inactive, rng)?;
    Ok(bit.add(&rest.scale(2)))
}

/// derive the next level's forced-zero masks for a stratum from its
/// current forced-zero mask and this level's bit draw within it:
/// `next_active = active | bit`, `next_inactive = active | !bit`.
fn split(active: &Mask, bit: &Matrix) -> (Mask, Mask) {
    let rows = active.rows();
    let cols = active.cols();
    let mut next_active = vec![vec![false; cols]; rows];
    let mut next_inactive = vec![vec![false; cols]; rows];
    for i in 0..rows {
        for j in 0..cols {
            if active.get(i, j) {
                next_active[i][j] = true;
                next_inactive[i][j] = true;
            } else if bit.get(i, j) == 1 {
                next_active[i][j] = true;
            } else {
                next_inactive[i][j] = true;
            }
        }
    }
    (Mask::from_rows(next_active), Mask::from_rows(next_inactive))
}

fn mask_from_ones(w: &Matrix) -> Mask {
    let rows = (0..w.rows())
        .map(|i| (0..w.cols()).map(|j| w.get(i, j) == 1).collect())
        .collect();
    Mask::from_rows(rows)
}

fn halve(v: &[u32]) -> Vec<u32> {
    v.iter().map(|&x| x / 2).collect()
}

fn is_latin_square(table: &Matrix, n: usize) -> bool {
    for i in 0..n {
        let mut seen = vec![false; n];
        for j in 0..n {
            let v = table.get(i, j) as usize;
            if v >= n || seen[v] {
                return false;
            }
            seen[v] = true;
        }
    }
    for j in 0..n {
        let mut seen = vec![false; n];
        for i in 0..n {
            let v = table.get(i, j) as usize;
            if v >= n || seen[v] {
                return false;
            }
            seen[v] = true;
        }
    }
    true
}
