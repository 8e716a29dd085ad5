//! Estimator kernel
//!
//! The numeric core shared by the cardinality and similarity queries:
//! the bias-corrected raw estimate, the small-range linear-counting
//! correction, and the expected-collision correction that calibrates the
//! Jaccard estimator.
//!
//! There is no large-range correction. With a 64-bit hash the large-range
//! branch is unreachable for feasible cardinalities.

use crate::register::{LZ_BITS, SIG_BITS};

/// Leading constant of the collision-rate approximation from the
/// HyperMinHash paper (Yu & Weber 2017)
const COLLISION_RATE: f64 = 0.169919487159739093975315012348;

/// Returns the alpha constant for bias correction given the register count
///
/// The literature tabulates alpha for the three smallest register counts;
/// everything larger uses the asymptotic form `0.7213 / (1 + 1.079 / m)`.
pub(crate) fn alpha(m: f64) -> f64 {
    match m as usize {
        16 => 0.673,
        32 => 0.697,
        64 => 0.709,
        _ => 0.7213 / (1.0 + 1.079 / m),
    }
}

/// Bias-corrected harmonic-mean estimate `alpha_m * m^2 / sum`
pub(crate) fn raw_estimate(m: f64, sum: f64) -> f64 {
    alpha(m) * m * m / sum
}

/// Linear counting estimate `m * ln(m / zeros)` for small cardinalities
///
/// Callers must ensure `zeros > 0`.
pub(crate) fn linear_counting(m: f64, zeros: f64) -> f64 {
    m * (m / zeros).ln()
}

/// Expected number of register pairs that coincidentally pack the same
/// value when two independent sketches of estimated cardinalities `n` and
/// `m` are compared bucket by bucket.
///
/// Three regimes, per the HyperMinHash paper:
/// - beyond `2^(2^q + r)` elements every bucket pair collides, so the
///   correction is unbounded and the similarity clamp takes over;
/// - above `2^(p + 5)` a closed-form approximation of the collision rate;
/// - below that, the exact sum of per-cell collision probabilities over
///   the `2^q x 2^r` register value space.
pub(crate) fn expected_collisions(n: f64, m: f64, precision: u8) -> f64 {
    let (n, m) = if n >= m { (n, m) } else { (m, n) };
    let p = i32::from(precision);
    let r = SIG_BITS as i32;

    if n > 2.0_f64.powi((1 << LZ_BITS) + r) {
        return f64::INFINITY;
    }
    if n > 2.0_f64.powi(p + 5) {
        let d = (4.0 * n / m) / ((1.0 + n) / m).powi(2);
        return COLLISION_RATE * 2.0_f64.powi(p - r) * d + 0.5;
    }
    collision_sum(n, m, p) + 0.5
}

/// Exact expected collisions: for each leading-zero band `i` and signature
/// sub-cell `j`, the probability that the minimum of `n` (resp. `m`)
/// uniform hashes falls into that sub-cell of one fixed bucket, multiplied
/// out and summed over the `2^p` buckets.
fn collision_sum(n: f64, m: f64, p: i32) -> f64 {
    let bands = 1i32 << LZ_BITS;
    let r = SIG_BITS as i32;
    let sub_cells = 1i32 << SIG_BITS;

    let mut x = 0.0;
    for i in 1..=bands {
        // the saturated top band covers everything below its upper edge
        let den = if i == bands {
            2.0_f64.powi(p + r + i - 1)
        } else {
            2.0_f64.powi(p + r + i)
        };
        for j in 0..sub_cells {
            let b1 = f64::from(sub_cells + j) / den;
            let b2 = f64::from(sub_cells + j + 1) / den;
            let pr_n = (1.0 - b1).powf(n) - (1.0 - b2).powf(n);
            let pr_m = (1.0 - b1).powf(m) - (1.0 - b2).powf(m);
            x += pr_n * pr_m;
        }
    }
    x * 2.0_f64.powi(p)
}
