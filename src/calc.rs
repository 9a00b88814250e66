// Copyright (c) 2026 The bloomsize authors
//
// Licensed under the MIT license.

//! Closed-form Bloom filter sizing, and a numeric refinement of it.
//!
//! With `n` items, `m` bits and `k` hash functions, the probability of a
//! false positive is approximately
//!
//! p = (1 - e<sup>-kn/m</sup>)<sup>k</sup>
//!
//! [`bits_needed`] and [`hashes_needed`] solve this for the optimal `m` and
//! `k`. When `k` is fixed by the hash family instead, [`optimize_size`]
//! walks `m` until the formula hits the target `p`.
use std::f64;

use tracing::trace;

use crate::bitvec::WORD_BITS;
use crate::error::{Error, Result};
use crate::hash::HashFamily;

/// `ln` squared.
const LN_SQR: f64 = f64::consts::LN_2 * f64::consts::LN_2;

/// Tolerance on the false positive probability when refining a size.
pub const EPSILON: f64 = 1e-5;

/// Upper bound on refinement steps.
pub const MAX_ITERATIONS: usize = 50;

/// Initial scale of a refinement step; each step moves `m` by
/// `m * EPSILON * hurry`.
pub const INITIAL_HURRY: u32 = 300;

/// Validated sizing inputs.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SizingParams {
    items: usize,
    fp_rate: f64,
    hashes: Option<usize>,
}

impl SizingParams {
    /// Bundle an expected item count and a target false positive rate.
    pub fn new(items: usize, fp_rate: f64) -> Result<Self> {
        check_items(items)?;
        check_probability(fp_rate)?;

        Ok(Self {
            items,
            fp_rate,
            hashes: None,
        })
    }

    /// Fix the number of hash functions instead of deriving it.
    pub fn with_hashes(self, hashes: usize) -> Result<Self> {
        check_hashes(hashes)?;

        Ok(Self {
            hashes: Some(hashes),
            ..self
        })
    }

    /// Expected number of items (`n`).
    pub fn items(&self) -> usize {
        self.items
    }

    /// Target false positive rate (`p`).
    pub fn fp_rate(&self) -> f64 {
        self.fp_rate
    }

    /// The fixed hash count if any, else the optimal one for [`Self::bits_needed`].
    pub fn hashes(&self) -> usize {
        self.hashes
            .unwrap_or_else(|| optimal_hashes(self.items, self.bits_needed()).max(1))
    }

    /// See [`bits_needed`].
    pub fn bits_needed(&self) -> usize {
        optimal_bits(self.items, self.fp_rate)
    }

    /// False positive probability of a filter of `nbits` bits.
    pub fn probability_at(&self, nbits: usize) -> f64 {
        probability_false(self.items, nbits, self.hashes())
    }

    /// See [`optimize_size_with_hashes`].
    pub fn optimize_size(&self) -> usize {
        make_multiple(refine(self.items, self.hashes(), self.fp_rate)).max(WORD_BITS)
    }
}

/// Round `m` up to the next multiple of the word width.
///
/// Saturates at the largest multiple below `usize::MAX`.
pub fn make_multiple(m: usize) -> usize {
    match m % WORD_BITS {
        0 => m,
        rem => m
            .checked_add(WORD_BITS - rem)
            .unwrap_or(usize::MAX - usize::MAX % WORD_BITS),
    }
}

/// Return the minimal number of bits for `n` items at false positive rate `p`.
///
/// m = -n ln(p) / ln(2)<sup>2</sup>
pub fn bits_needed(n: usize, p: f64) -> Result<usize> {
    check_items(n)?;
    check_probability(p)?;

    Ok(optimal_bits(n, p))
}

/// Return the optimal number of hash functions for `n` items in `m` bits.
///
/// k = round(m/n ln(2))
pub fn hashes_needed(n: usize, m: usize) -> Result<usize> {
    check_items(n)?;

    Ok(optimal_hashes(n, m))
}

/// Return the false positive probability of `n` items in `m` bits with `k` hashes.
///
/// The exact form 1 - (1 - 1/m)<sup>kn</sup> of the fill ratio is not used;
/// the exponential approximation is.
pub fn probability_false(n: usize, m: usize, k: usize) -> f64 {
    let k = k as f64;
    let n = n as f64;
    let m = m as f64;

    (1. - (-k * n / m).exp()).powf(k)
}

/// Return the size, in bits, for `n` items at false positive rate `p` when
/// the number of hashes is the one `hasher` uses.
pub fn optimize_size<H: HashFamily>(n: usize, p: f64, hasher: &H) -> Result<usize> {
    optimize_size_with_hashes(n, hasher.num_hashes(), p)
}

/// Return the size, in bits, for `n` items at false positive rate `p` with
/// `k` hashes.
///
/// This is [`refine_bits`] rounded up to a multiple of 64, and never less
/// than 64.
pub fn optimize_size_with_hashes(n: usize, k: usize, p: f64) -> Result<usize> {
    Ok(make_multiple(refine_bits(n, k, p)?).max(WORD_BITS))
}

/// Start from [`bits_needed`] and step the size until [`probability_false`]
/// is within [`EPSILON`] of `p`, or [`MAX_ITERATIONS`] steps were taken.
///
/// The step size halves whenever the direction flips. With the current
/// constants a step is small enough that this does not happen.
pub fn refine_bits(n: usize, k: usize, p: f64) -> Result<usize> {
    check_items(n)?;
    check_hashes(k)?;
    check_probability(p)?;

    Ok(refine(n, k, p))
}

fn refine(n: usize, k: usize, p: f64) -> usize {
    let mut m = optimal_bits(n, p);
    let mut hurry = INITIAL_HURRY;
    let mut last_nudge = 0;

    for i in 0..MAX_ITERATIONS {
        let probability = probability_false(n, m, k);
        let nudge = compare(probability, p);
        trace!(iteration = i, m, probability, nudge, "refining size");

        if nudge == 0 {
            break;
        }
        if i > 0 && nudge != last_nudge {
            hurry /= 2;
        }
        let step = nudge as f64 * m as f64 * EPSILON * hurry as f64;
        m = (m as f64 + step) as usize;
        last_nudge = nudge;
    }
    m
}

fn optimal_bits(n: usize, p: f64) -> usize {
    (-((p.ln() * (n as f64)) / LN_SQR)).ceil() as usize
}

fn optimal_hashes(n: usize, m: usize) -> usize {
    ((m as f64 / n as f64) * f64::consts::LN_2).round() as usize
}

/// `1` when `test` is above `target`, `-1` below, `0` within [`EPSILON`].
fn compare(test: f64, target: f64) -> i8 {
    let diff = test - target;
    if diff.abs() < EPSILON {
        0
    } else if diff > 0. {
        1
    } else {
        -1
    }
}

fn check_items(n: usize) -> Result<()> {
    if n == 0 {
        return Err(Error::InvalidItemCount);
    }
    Ok(())
}

fn check_hashes(k: usize) -> Result<()> {
    if k == 0 {
        return Err(Error::InvalidHashCount);
    }
    Ok(())
}

fn check_probability(p: f64) -> Result<()> {
    // Also rejects NaN.
    if !(p > 0. && p < 1.) {
        return Err(Error::InvalidProbability(p));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hash::SipHashFamily;

    #[test]
    fn test_make_multiple() {
        assert_eq!(make_multiple(0), 0);
        assert_eq!(make_multiple(1), 64);
        assert_eq!(make_multiple(63), 64);
        assert_eq!(make_multiple(64), 64);
        assert_eq!(make_multiple(65), 128);
        assert_eq!(make_multiple(9591), 9600);
    }

    #[test]
    fn test_make_multiple_saturates() {
        let largest = usize::MAX - usize::MAX % 64;

        assert_eq!(make_multiple(largest), largest);
        assert_eq!(make_multiple(largest + 1), largest);
        assert_eq!(make_multiple(usize::MAX - 10), largest);
        assert_eq!(make_multiple(usize::MAX), largest);
        assert_eq!(largest % 64, 0);
    }

    #[test]
    fn test_bits_needed() {
        assert_eq!(bits_needed(10, 0.04).unwrap(), 67);
        assert_eq!(bits_needed(1000, 0.01).unwrap(), 9586);
        assert_eq!(bits_needed(5000, 0.01).unwrap(), 47926);
        assert_eq!(bits_needed(100000, 0.01).unwrap(), 958506);
    }

    #[test]
    fn test_bits_needed_rejects_degenerate_input() {
        for p in [0., 1., -0.5, 1.5, f64::NAN, f64::INFINITY] {
            assert!(
                matches!(bits_needed(1000, p), Err(Error::InvalidProbability(_))),
                "p = {} should be rejected",
                p
            );
        }
        assert!(matches!(bits_needed(0, 0.01), Err(Error::InvalidItemCount)));
    }

    #[test]
    fn test_hashes_needed() {
        assert_eq!(hashes_needed(10, 67).unwrap(), 5);
        assert_eq!(hashes_needed(1000, 9586).unwrap(), 7);
        assert_eq!(hashes_needed(5000, 47926).unwrap(), 7);
        assert_eq!(hashes_needed(100, 100).unwrap(), 1);
        assert!(matches!(hashes_needed(0, 64), Err(Error::InvalidItemCount)));
    }

    #[test]
    fn test_probability_false() {
        let p = probability_false(1000, 9586, 7);
        assert!((p - 0.010034).abs() < 1e-6, "got {}", p);

        let p = probability_false(1000, 9591, 7);
        assert!((p - 0.010010).abs() < 1e-6, "got {}", p);

        assert_eq!(probability_false(0, 64, 7), 0.);
    }

    #[test]
    fn test_probability_is_monotonic_in_size() {
        for k in [1, 3, 7, 12] {
            let mut last = 1.;
            for m in (64..20_000).step_by(64) {
                let p = probability_false(1000, m, k);
                assert!(p <= last, "k = {}, m = {}: {} > {}", k, m, p, last);
                last = p;
            }
        }
    }

    #[test]
    fn test_refine_bits_converges() {
        for (n, k, p) in [
            (1000, 7, 0.01),
            (5000, 7, 0.01),
            (10000, 7, 0.01),
            (500, 7, 0.01),
            (1000, 7, 0.008),
            (1000, 7, 0.012),
        ] {
            let m = refine_bits(n, k, p).unwrap();
            let actual = probability_false(n, m, k);

            assert!(
                (actual - p).abs() < EPSILON,
                "n = {}, k = {}, p = {}: m = {} gives {}",
                n,
                k,
                p,
                m,
                actual
            );
        }
        assert_eq!(refine_bits(1000, 7, 0.01).unwrap(), 9591);
    }

    #[test]
    fn test_optimize_size() {
        let m = optimize_size_with_hashes(1000, 7, 0.01).unwrap();
        assert_eq!(m, 9600);
        assert_eq!(m % 64, 0);
        // Rounding up only lowers the probability.
        assert!(probability_false(1000, m, 7) <= 0.01 + EPSILON);

        let family = SipHashFamily::new();
        assert_eq!(optimize_size(1000, 0.01, &family).unwrap(), m);
    }

    #[test]
    fn test_optimize_size_tiny() {
        let m = optimize_size_with_hashes(1, 7, 0.01).unwrap();
        assert_eq!(m, 64);

        let m = optimize_size_with_hashes(1, 1, 0.99).unwrap();
        assert_eq!(m, 64);
    }

    #[test]
    fn test_optimize_size_rejects_degenerate_input() {
        assert!(matches!(
            optimize_size_with_hashes(1000, 7, 0.),
            Err(Error::InvalidProbability(_))
        ));
        assert!(matches!(
            optimize_size_with_hashes(1000, 0, 0.01),
            Err(Error::InvalidHashCount)
        ));
        assert!(matches!(
            optimize_size_with_hashes(0, 7, 0.01),
            Err(Error::InvalidItemCount)
        ));
    }

    #[test]
    fn test_compare() {
        assert_eq!(compare(0.010001, 0.01), 0);
        assert_eq!(compare(0.01002, 0.01), 1);
        assert_eq!(compare(0.00998, 0.01), -1);
    }

    #[test]
    fn test_sizing_params() {
        let params = SizingParams::new(1000, 0.01).unwrap();
        assert_eq!(params.items(), 1000);
        assert_eq!(params.fp_rate(), 0.01);
        assert_eq!(params.bits_needed(), 9586);
        assert_eq!(params.hashes(), 7);
        assert_eq!(params.optimize_size(), 9600);

        let params = params.with_hashes(3).unwrap();
        assert_eq!(params.hashes(), 3);
        assert_eq!(
            params.optimize_size(),
            optimize_size_with_hashes(1000, 3, 0.01).unwrap()
        );
        assert_eq!(params.probability_at(9600), probability_false(1000, 9600, 3));

        assert!(SizingParams::new(0, 0.01).is_err());
        assert!(SizingParams::new(10, 1.).is_err());
        assert!(SizingParams::new(10, 0.1).unwrap().with_hashes(0).is_err());
    }
}
