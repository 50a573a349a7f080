//! statistical/uniformity properties that don't belong inside any
//! single module's unit tests: they exercise the public API end to end
//! and check the *distribution* of outputs, not just one sample.

use bctsample::{Mask, feasible, sample_bct, sample_bct_with_zeros, sample_latin_square};
use rand::SeedableRng;
use rand::rngs::SmallRng;
use std::collections::HashMap;

/// the 6 permutation matrices of order 3 should come up roughly equally
/// often; a chi-square goodness-of-fit test against the uniform null
/// should not reject at a very loose threshold over a few thousand draws.
#[test]
fn permutation_matrices_are_drawn_uniformly() {
    let mut rng = SmallRng::seed_from_u64(12345);
    let mut counts: HashMap<Vec<u8>, u32> = HashMap::new();
    let draws = 6000u32;

    for _ in 0..draws {
        let table = sample_bct(&[1, 1, 1], &[1, 1, 1], &mut rng).unwrap();
        let flat: Vec<u8> = (0..3).flat_map(|i| table.row(i).to_vec()).collect();
        *counts.entry(flat).or_insert(0) += 1;
    }

    assert_eq!(counts.len(), 6, "expected all 6 permutation matrices to appear");
    let expected = draws as f64 / 6.0;
    let chi_square: f64 = counts
        .values()
        .map(|&observed| {
            let diff = observed as f64 - expected;
            diff * diff / expected
        })
        .sum();
    // 5 degrees of freedom, chi-square critical value at p=0.001 is ~20.5;
    // this is a loose smoke test, not a tight statistical proof.
    assert!(chi_square < 30.0, "chi-square statistic too large: {chi_square}");
}

/// 2x2 blocks of all-2 row/col sums over a 4x4 grid have exactly 90
/// valid 0/1 fillings; every valid filling should be reachable.
#[test]
fn four_by_four_uniform_marginals_cover_many_distinct_tables() {
    let mut rng = SmallRng::seed_from_u64(54321);
    let mut seen: HashMap<Vec<u8>, u32> = HashMap::new();
    for _ in 0..4000 {
        let table = sample_bct(&[2, 2, 2, 2], &[2, 2, 2, 2], &mut rng).unwrap();
        let flat: Vec<u8> = (0..4).flat_map(|i| table.row(i).to_vec()).collect();
        *seen.entry(flat).or_insert(0) += 1;
    }
    // 90 is the exact count of 4x4 0/1 matrices with every row/col sum
    // equal to 2; we don't require hitting all of them, just a large
    // and roughly even spread.
    assert!(seen.len() > 40, "expected broad coverage of the 90 valid tables, got {}", seen.len());
    let max = *seen.values().max().unwrap();
    let min = *seen.values().min().unwrap();
    assert!(max < min * 6, "distribution looks too skewed: max={max} min={min}");
}

#[test]
fn order_four_latin_squares_cover_many_distinct_diagonals() {
    let mut rng = SmallRng::seed_from_u64(9);
    let mut diagonals: HashMap<Vec<u8>, u32> = HashMap::new();
    for _ in 0..2000 {
        let table = sample_latin_square(4, &mut rng).unwrap();
        let diag: Vec<u8> = (0..4).map(|i| table.get(i, i)).collect();
        *diagonals.entry(diag).or_insert(0) += 1;
    }
    assert!(diagonals.len() > 4, "diagonal should take on a variety of values");
}

#[test]
fn order_five_latin_squares_produce_many_distinct_outputs() {
    let mut rng = SmallRng::seed_from_u64(31);
    let mut seen: HashMap<Vec<u8>, u32> = HashMap::new();
    for _ in 0..500 {
        let table = sample_latin_square(5, &mut rng).unwrap();
        let flat: Vec<u8> = (0..5).flat_map(|i| table.row(i).to_vec()).collect();
        *seen.entry(flat).or_insert(0) += 1;
    }
    assert!(seen.len() > 50, "expected a wide spread of distinct order-5 squares, got {}", seen.len());
}

#[test]
fn fixed_seed_permutation_matrix_is_reproducible() {
    let mut a = SmallRng::seed_from_u64(2026);
    let mut b = SmallRng::seed_from_u64(2026);
    let ta = sample_bct(&[1, 1, 1], &[1, 1, 1], &mut a).unwrap();
    let tb = sample_bct(&[1, 1, 1], &[1, 1, 1], &mut b).unwrap();
    assert_eq!(ta, tb);
}

#[test]
fn feasibility_oracle_agrees_with_sampler_outcome() {
    assert!(feasible(&[3, 3, 3], &[3, 3, 3]));
    assert!(!feasible(&[9, 0, 0], &[3, 3, 3]));

    let mut rng = SmallRng::seed_from_u64(1);
    assert!(sample_bct(&[9, 0, 0], &[3, 3, 3], &mut rng).is_err());
}

#[test]
fn forced_zero_diagonal_yields_a_derangement_style_matrix() {
    let mut mask = Mask::none_decided(4, 4);
    for i in 0..4 {
        mask.set(i, i, true);
    }
    let mut rng = SmallRng::seed_from_u64(7);
    let table = sample_bct_with_zeros(&[1, 1, 1, 1], &[1, 1, 1, 1], &mask, &mut rng).unwrap();
    for i in 0..4 {
        assert_eq!(table.get(i, i), 0);
    }
    assert_eq!(table.row_sums(), vec![1, 1, 1, 1]);
    assert_eq!(table.col_sums(), vec![1, 1, 1, 1]);
}

#[test]
fn small_latin_squares_of_every_supported_order_are_valid() {
    for n in 1..=6 {
        let mut rng = SmallRng::seed_from_u64(n as u64 * 13);
        let table = sample_latin_square(n, &mut rng).unwrap();
        for i in 0..n {
            let mut row_seen = vec![false; n];
            let mut col_seen = vec![false; n];
            for j in 0..n {
                let rv = table.get(i, j) as usize;
                let cv = table.get(j, i) as usize;
                assert!(!row_seen[rv]);
                row_seen[rv] = true;
                assert!(!col_seen[cv]);
                col_seen[cv] = true;
            }
        }
    }
}

#[test]
fn saturated_row_is_pinned_across_many_draws() {
    let mut rng = SmallRng::seed_from_u64(4);
    for _ in 0..50 {
        let table = sample_bct(&[5, 0, 0, 0, 0], &[1, 1, 1, 1, 1], &mut rng).unwrap();
        assert_eq!(table.row(0), &[1, 1, 1, 1, 1]);
    }
}
