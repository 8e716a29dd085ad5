//! HyperMinHash: cardinality, union, intersection and similarity in one
//! fixed-memory sketch
//!
//! HyperMinHash (Yu & Weber 2017) augments each HyperLogLog register with a
//! short MinHash-style signature. The leading-zero field alone makes the
//! sketch a regular HyperLogLog, so distinct counts and lossless unions
//! work exactly as they do there; the signature field additionally captures
//! the low bits of the lexicographically minimal hash per bucket, which is
//! what lets two sketches estimate their Jaccard similarity and, combined
//! with the union cardinality, the size of their intersection.
//!
//! # Algorithm Overview
//!
//! Per inserted item, one 64-bit hash is split three ways:
//! 1. The top `p` bits select one of `2^p` buckets
//! 2. The leading zeros of the remaining `64 - p` bits (plus one, capped
//!    at 63) form the HyperLogLog value
//! 3. The low 10 bits form the signature suffix
//!
//! The bucket keeps the maximum packed `(lz, sig)` cell it has ever seen.
//! Cardinality uses the harmonic mean of the `lz` fields with bias
//! correction and a linear-counting fallback for small counts. Similarity
//! counts buckets where both sketches hold the same non-zero cell and
//! subtracts the number of matches two unrelated sets would produce by
//! chance.
//!
//! # Time Complexity
//!
//! - Update: O(1)
//! - Cardinality / similarity / merge: O(m) where m = 2^precision
//!
//! # Space Complexity
//!
//! 2 bytes per register: 32 KiB at the default precision 14, independent
//! of how many items are added.
//!
//! # References
//!
//! - Yu, Y. W., Weber, G. "HyperMinHash: MinHash in LogLog space" (2017)
//! - Flajolet et al. "HyperLogLog: the analysis of a near-optimal
//!   cardinality estimation algorithm" (2007)

use crate::common::hash::hash_64;
use crate::common::{validation, Mergeable, Result, Sketch, SketchError};
use crate::estimator::{expected_collisions, linear_counting, raw_estimate};
use crate::register::{reg_sum_and_zeros, Register, SIG_BITS};

/// HyperMinHash sketch
///
/// Uses `2^p` packed 16-bit registers. A sketch answers distinct-count
/// queries on its own stream and similarity/intersection queries against
/// any other sketch built with the same precision.
///
/// The sketch is a plain value type: `add` mutates in place, queries are
/// pure, and nothing inside is synchronised. Share a sketch across threads
/// only behind external synchronisation; independent sketches are fully
/// independent.
///
/// # Examples
///
/// ```
/// use hyperminhash::HyperMinHash;
///
/// let mut visitors = HyperMinHash::default();
/// visitors.add(b"alice");
/// visitors.add(b"bob");
/// visitors.add(b"alice"); // duplicate
///
/// assert_eq!(visitors.cardinality(), 2);
/// ```
#[derive(Clone, Debug)]
pub struct HyperMinHash {
    /// Precision parameter: number of registers is m = 2^precision
    precision: u8,

    /// Register array, all-zero at construction
    registers: Vec<Register>,
}

impl HyperMinHash {
    /// Precision used by [`Default`], matching the original sketch shape
    pub const DEFAULT_PRECISION: u8 = 14;

    /// Seed for the built-in hash adapter
    const HASH_SEED: u64 = 0;

    /// Creates a sketch with `2^precision` zero registers
    ///
    /// # Errors
    ///
    /// Returns `InvalidParameter` if precision is outside `[4, 18]`.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyperminhash::HyperMinHash;
    ///
    /// let sk = HyperMinHash::new(14).unwrap();
    /// assert!(sk.is_empty());
    /// assert_eq!(sk.num_registers(), 16384);
    /// ```
    pub fn new(precision: u8) -> Result<Self> {
        validation::validate_precision(precision)?;
        Ok(HyperMinHash {
            precision,
            registers: vec![Register::default(); 1 << precision],
        })
    }

    /// Returns the precision parameter
    #[inline]
    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Returns the number of registers (m = 2^precision)
    #[inline]
    pub fn num_registers(&self) -> usize {
        1 << self.precision
    }

    /// Returns the standard error of the cardinality estimate,
    /// approximately `1.04 / sqrt(m)`
    pub fn standard_error(&self) -> f64 {
        1.04 / (self.num_registers() as f64).sqrt()
    }

    /// Returns a reference to the internal registers
    pub fn registers(&self) -> &[Register] {
        &self.registers
    }

    /// True if no item has ever been added
    pub fn is_empty(&self) -> bool {
        self.registers.iter().all(|r| r.is_zero())
    }

    /// Adds a byte string to the sketch
    ///
    /// Duplicates are idempotent and insertion order does not affect the
    /// final state. The empty payload is a legal input.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyperminhash::HyperMinHash;
    ///
    /// let mut sk = HyperMinHash::default();
    /// sk.add(b"item");
    /// sk.add(b"");
    /// assert!(!sk.is_empty());
    /// ```
    pub fn add(&mut self, value: &[u8]) {
        self.add_hash(hash_64(value, Self::HASH_SEED));
    }

    /// Adds a pre-computed 64-bit hash to the sketch
    ///
    /// This is the hash-agnostic entry point: the sketch's contract only
    /// requires a uniform 64-bit hash, so callers may substitute any
    /// hasher by feeding its output here instead of using [`add`].
    ///
    /// [`add`]: HyperMinHash::add
    #[inline]
    pub fn add_hash(&mut self, hash: u64) {
        let p = u32::from(self.precision);
        let idx = (hash >> (64 - p)) as usize;
        // Low p bits set, so the zero run cannot extend past the 64-p bits
        // that follow the bucket index.
        let floor = u64::MAX >> (64 - p);
        let lz = ((hash << p) | floor).leading_zeros() as u8 + 1;
        let sig = (hash & u64::from((1u16 << SIG_BITS) - 1)) as u16;

        let candidate = Register::pack(lz, sig);
        if candidate > self.registers[idx] {
            self.registers[idx] = candidate;
        }
    }

    /// Estimates the number of distinct items added
    ///
    /// Relative error is about `1.04 / sqrt(m)` (0.8% at the default
    /// precision) once the sketch has seen a few thousand distinct items.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyperminhash::HyperMinHash;
    ///
    /// let mut sk = HyperMinHash::default();
    /// for i in 0..1000u32 {
    ///     sk.add(&i.to_le_bytes());
    /// }
    /// let est = sk.cardinality();
    /// assert!(est > 950 && est < 1050);
    /// ```
    pub fn cardinality(&self) -> u64 {
        self.estimate_cardinality().round() as u64
    }

    /// The cardinality estimate before rounding
    fn estimate_cardinality(&self) -> f64 {
        let m = self.num_registers() as f64;
        let (sum, zeros) = reg_sum_and_zeros(&self.registers);

        let raw = raw_estimate(m, sum);
        if raw <= 2.5 * m && zeros > 0 {
            return linear_counting(m, zeros as f64);
        }
        raw
    }

    /// Merges two sketches into a fresh one, leaving both operands
    /// untouched
    ///
    /// The result takes the register-wise maximum and is exactly the
    /// sketch the concatenation of both input streams would have built:
    /// merging is associative, commutative, and idempotent.
    ///
    /// # Errors
    ///
    /// Returns `IncompatibleSketches` if precisions differ.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyperminhash::HyperMinHash;
    ///
    /// let mut a = HyperMinHash::default();
    /// let mut b = HyperMinHash::default();
    /// for i in 0..500u32 {
    ///     a.add(&i.to_le_bytes());
    ///     b.add(&(i + 500).to_le_bytes());
    /// }
    ///
    /// let union = a.merge(&b).unwrap();
    /// let est = union.cardinality();
    /// assert!(est > 950 && est < 1050);
    /// ```
    pub fn merge(&self, other: &Self) -> Result<Self> {
        self.check_compatible(other)?;

        let mut merged = self.clone();
        for (reg, &other_reg) in merged.registers.iter_mut().zip(&other.registers) {
            if other_reg > *reg {
                *reg = other_reg;
            }
        }
        Ok(merged)
    }

    /// Estimates the Jaccard similarity `|A ∩ B| / |A ∪ B|` of the two
    /// underlying sets, in `[0, 1]`
    ///
    /// Counts buckets where both sketches hold the same non-zero register
    /// and subtracts the matches two independent sets of the observed
    /// cardinalities would produce by chance. Disjoint inputs therefore
    /// estimate 0 rather than the spurious collision rate.
    ///
    /// # Errors
    ///
    /// Returns `IncompatibleSketches` if precisions differ.
    pub fn similarity(&self, other: &Self) -> Result<f64> {
        self.check_compatible(other)?;

        let mut matches = 0u64;
        let mut occupied = 0u64;
        for (&a, &b) in self.registers.iter().zip(&other.registers) {
            if !a.is_zero() && a == b {
                matches += 1;
            }
            if !a.is_zero() || !b.is_zero() {
                occupied += 1;
            }
        }
        if matches == 0 || occupied == 0 {
            return Ok(0.0);
        }

        let spurious = expected_collisions(
            self.cardinality() as f64,
            other.cardinality() as f64,
            self.precision,
        );
        let matches = matches as f64;
        if matches < spurious {
            return Ok(0.0);
        }
        Ok((matches - spurious) / occupied as f64)
    }

    /// Estimates the number of distinct items the two underlying sets
    /// share: `similarity * |A ∪ B|`, with the union cardinality taken
    /// from the merged sketch
    ///
    /// Disjoint inputs estimate exactly 0. When one set contains the
    /// other, the estimate approaches the smaller set's cardinality.
    ///
    /// # Errors
    ///
    /// Returns `IncompatibleSketches` if precisions differ.
    ///
    /// # Examples
    ///
    /// ```
    /// use hyperminhash::HyperMinHash;
    ///
    /// let mut a = HyperMinHash::default();
    /// let mut b = HyperMinHash::default();
    /// for i in 0..1000u32 {
    ///     a.add(&i.to_le_bytes());
    ///     b.add(&(i + 500).to_le_bytes());
    /// }
    ///
    /// // true overlap is 500
    /// let overlap = a.intersection(&b).unwrap();
    /// assert!(overlap > 350 && overlap < 650);
    /// ```
    pub fn intersection(&self, other: &Self) -> Result<u64> {
        let similarity = self.similarity(other)?;
        let union = self.merge(other)?.cardinality();
        Ok((similarity * union as f64).round() as u64)
    }

    fn check_compatible(&self, other: &Self) -> Result<()> {
        if self.precision != other.precision {
            return Err(SketchError::IncompatibleSketches {
                reason: format!(
                    "precision mismatch: {} vs {}",
                    self.precision, other.precision
                ),
            });
        }
        Ok(())
    }
}

impl Default for HyperMinHash {
    fn default() -> Self {
        HyperMinHash {
            precision: Self::DEFAULT_PRECISION,
            registers: vec![Register::default(); 1 << Self::DEFAULT_PRECISION],
        }
    }
}

impl Sketch for HyperMinHash {
    type Item = Vec<u8>;

    fn update(&mut self, item: &Self::Item) {
        self.add(item);
    }

    fn estimate(&self) -> f64 {
        self.estimate_cardinality()
    }

    fn is_empty(&self) -> bool {
        self.is_empty()
    }
}

impl Mergeable for HyperMinHash {
    /// In-place variant of [`HyperMinHash::merge`]: folds `other` into
    /// `self` with the same register-wise maximum
    fn merge(&mut self, other: &Self) -> Result<()> {
        self.check_compatible(other)?;

        for (reg, &other_reg) in self.registers.iter_mut().zip(&other.registers) {
            if other_reg > *reg {
                *reg = other_reg;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_sketch() {
        let sk = HyperMinHash::new(14).unwrap();
        assert!(sk.is_empty());
        assert_eq!(sk.precision(), 14);
        assert_eq!(sk.num_registers(), 16384);
        assert_eq!(sk.cardinality(), 0);
    }

    #[test]
    fn test_invalid_precision() {
        assert!(HyperMinHash::new(3).is_err());
        assert!(HyperMinHash::new(19).is_err());
        assert!(HyperMinHash::new(4).is_ok());
        assert!(HyperMinHash::new(18).is_ok());
    }

    #[test]
    fn test_default_precision() {
        let sk = HyperMinHash::default();
        assert_eq!(sk.precision(), HyperMinHash::DEFAULT_PRECISION);
        assert_eq!(sk.num_registers(), 16384);
    }

    #[test]
    fn test_add_single() {
        let mut sk = HyperMinHash::default();
        sk.add(b"hello");
        assert!(!sk.is_empty());
        assert_eq!(sk.cardinality(), 1);
    }

    #[test]
    fn test_add_empty_payload() {
        let mut sk = HyperMinHash::default();
        sk.add(b"");
        assert!(!sk.is_empty());
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut sk = HyperMinHash::default();
        sk.add(b"same");
        let snapshot = sk.registers().to_vec();
        for _ in 0..100 {
            sk.add(b"same");
        }
        assert_eq!(snapshot, sk.registers());
    }

    #[test]
    fn test_add_hash_matches_add() {
        let mut via_add = HyperMinHash::default();
        let mut via_hash = HyperMinHash::default();
        via_add.add(b"payload");
        via_hash.add_hash(hash_64(b"payload", 0));
        assert_eq!(via_add.registers(), via_hash.registers());
    }

    #[test]
    fn test_merge_precision_mismatch() {
        let a = HyperMinHash::new(12).unwrap();
        let b = HyperMinHash::new(14).unwrap();
        assert!(matches!(
            a.merge(&b),
            Err(SketchError::IncompatibleSketches { .. })
        ));
        assert!(a.similarity(&b).is_err());
        assert!(a.intersection(&b).is_err());
    }

    #[test]
    fn test_merge_leaves_operands_untouched() {
        let mut a = HyperMinHash::default();
        let mut b = HyperMinHash::default();
        a.add(b"left");
        b.add(b"right");
        let a_before = a.registers().to_vec();
        let b_before = b.registers().to_vec();

        let _ = a.merge(&b).unwrap();
        assert_eq!(a_before, a.registers());
        assert_eq!(b_before, b.registers());
    }

    #[test]
    fn test_in_place_merge_matches_merge() {
        let mut a = HyperMinHash::default();
        let mut b = HyperMinHash::default();
        for i in 0..100u32 {
            a.add(&i.to_le_bytes());
            b.add(&(i + 50).to_le_bytes());
        }

        let fresh = a.merge(&b).unwrap();
        Mergeable::merge(&mut a, &b).unwrap();
        assert_eq!(fresh.registers(), a.registers());
    }

    #[test]
    fn test_similarity_identical_sketches() {
        let mut sk = HyperMinHash::default();
        for i in 0..1000u32 {
            sk.add(&i.to_le_bytes());
        }
        let sim = sk.similarity(&sk.clone()).unwrap();
        assert!(sim > 0.95, "self-similarity {} should be ~1", sim);
    }

    #[test]
    fn test_similarity_empty_sketches() {
        let a = HyperMinHash::default();
        let b = HyperMinHash::default();
        assert_eq!(a.similarity(&b).unwrap(), 0.0);
        assert_eq!(a.intersection(&b).unwrap(), 0);
    }

    #[test]
    fn test_similarity_one_empty() {
        let mut a = HyperMinHash::default();
        a.add(b"x");
        let b = HyperMinHash::default();
        assert_eq!(a.similarity(&b).unwrap(), 0.0);
    }

    #[test]
    fn test_sketch_trait() {
        let mut sk = HyperMinHash::default();
        Sketch::update(&mut sk, &b"item".to_vec());
        assert!(!Sketch::is_empty(&sk));
        assert!(Sketch::estimate(&sk) > 0.0);
    }
}
