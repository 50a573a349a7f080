//! log-gamma, binomial and Poisson-binomial densities used by the
//! rejection-probability evaluator. everything here is exact (up to
//! double-precision floating error), never sampled.

/// any probability below this is treated as exactly zero: the bit it
/// would accept is forbidden.
pub const EPSILON: f64 = 1e-15;

/// Lanczos approximation to the natural log of the gamma function,
/// accurate to ~15 significant digits for x > 0. this is the one
/// transcendental building block every exact-probability computation
/// in this crate bottoms out on.
pub fn lgamma(x: f64) -> f64 {
    const G: f64 = 7.0;
    const COEFFICIENTS: [f64; 9] = [
        0.999_999_999_999_809_9,
        676.520_368_121_885_1,
        -1_259.139_216_722_402_8,
        771.323_428_777_653_1,
        -176.615_029_162_140_6,
        12.507_343_278_686_905,
        -0.138_571_095_265_720_12,
        9.984_369_578_019_572e-6,
        1.505_632_735_149_311_6e-7,
    ];

    if x < 0.5 {
        // reflection formula: Gamma(x)Gamma(1-x) = pi / sin(pi x)
        let pi = std::f64::consts::PI;
        (pi / (pi * x).sin()).ln() - lgamma(1.0 - x)
    } else {
        let x = x - 1.0;
        let mut a = COEFFICIENTS[0];
        let t = x + G + 0.5;
        for (i, &c) in COEFFICIENTS.iter().enumerate().skip(1) {
            a += c / (x + i as f64);
        }
        0.5 * (2.0 * std::f64::consts::PI).ln() + (x + 0.5) * t.ln() - t + a.ln()
    }
}

/// `log( C(n, k) * p^k * (1-p)^(n-k) )` computed via lgamma so it stays
/// numerically stable for large `n`. callers are responsible for the
/// degenerate `p == 0` / `p == 1` cases where `ln(0)` would appear with
/// a zero coefficient; we guard those here by returning `-inf` only
/// when the coefficient genuinely needs the vanishing term.
pub fn log_binomial_pmf(n: u32, k: u32, p: f64) -> f64 {
    if k > n {
        return f64::NEG_INFINITY;
    }
    let n = n as f64;
    let k = k as f64;
    let log_coefficient = lgamma(n + 1.0) - lgamma(k + 1.0) - lgamma(n - k + 1.0);
    let log_success = if k == 0.0 { 0.0 } else { k * p.ln() };
    let log_failure = if k == n { 0.0 } else { (n - k) * (1.0 - p).ln() };
    log_coefficient + log_success + log_failure
}

/// Poisson-binomial pmf: the distribution of a sum of independent,
/// not-necessarily-identical Bernoulli(q_i) variables. computed by a
/// forward recurrence on the generating-function coefficients,
/// O(k * (r+1)) time and stable for the small k this crate calls it
/// with (one term per row/column still in play). returns 0 outside
/// [0, k].
pub fn poisson_binomial_pmf(q: &[f64], r: i64) -> f64 {
    let k = q.len();
    if r < 0 || r as usize > k {
        return 0.0;
    }
    // dp[j] after processing i variables = P(sum of first i == j)
    let mut dp = vec![0.0f64; k + 1];
    dp[0] = 1.0;
    for &qi in q {
        for j in (0..=k).rev() {
            let with_success = if j > 0 { dp[j - 1] * qi } else { 0.0 };
            let with_failure = dp[j] * (1.0 - qi);
            dp[j] = with_success + with_failure;
        }
    }
    dp[r as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lgamma_matches_factorials() {
        // Gamma(n+1) = n!
        for n in 0..10u64 {
            let factorial = (1..=n).product::<u64>().max(1) as f64;
            let got = lgamma(n as f64 + 1.0).exp();
            assert!((got - factorial).abs() / factorial.max(1.0) < 1e-9, "n={n} got={got} want={factorial}");
        }
    }

    #[test]
    fn lgamma_half_integer() {
        // Gamma(1/2) = sqrt(pi)
        let got = lgamma(0.5).exp();
        assert!((got - std::f64::consts::PI.sqrt()).abs() < 1e-9);
    }

    #[test]
    fn log_binomial_pmf_sums_to_one() {
        let n = 6;
        let p = 0.37;
        let total: f64 = (0..=n).map(|k| log_binomial_pmf(n, k, p).exp()).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn log_binomial_pmf_matches_coin_flip() {
        // P(X=1) for n=2, p=0.5 is 0.5
        let got = log_binomial_pmf(2, 1, 0.5).exp();
        assert!((got - 0.5).abs() < 1e-12);
    }

    #[test]
    fn poisson_binomial_reduces_to_binomial_when_identical() {
        let q = vec![0.3; 5];
        for r in 0..=5 {
            let pb = poisson_binomial_pmf(&q, r);
            let binom = log_binomial_pmf(5, r as u32, 0.3).exp();
            assert!((pb - binom).abs() < 1e-9, "r={r} pb={pb} binom={binom}");
        }
    }

    #[test]
    fn poisson_binomial_sums_to_one() {
        let q = vec![0.1, 0.9, 0.5, 0.2];
        let total: f64 = (0..=4).map(|r| poisson_binomial_pmf(&q, r)).sum();
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn poisson_binomial_out_of_range_is_zero() {
        let q = vec![0.5, 0.5];
        assert_eq!(poisson_binomial_pmf(&q, -1), 0.0);
        assert_eq!(poisson_binomial_pmf(&q, 3), 0.0);
    }
}
