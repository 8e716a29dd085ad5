//! hyperminhash: cardinality, union, intersection and Jaccard similarity
//! estimation in LogLog space
//!
//! A [`HyperMinHash`] sketch estimates the number of distinct elements in a
//! multiset from a few kilobytes of state, like HyperLogLog. Unlike plain
//! HyperLogLog it also estimates the Jaccard similarity and the
//! intersection cardinality of two sketches. Each of its `2^p` registers
//! packs a 6-bit leading-zero count next to a 10-bit MinHash-style
//! signature in one 16-bit word: 32 KiB per sketch at the default
//! precision, independent of how much data flows through it.
//!
//! # Examples
//!
//! ```
//! use hyperminhash::HyperMinHash;
//!
//! let mut monday = HyperMinHash::default();
//! let mut tuesday = HyperMinHash::default();
//!
//! for i in 0..1000u32 {
//!     monday.add(format!("user_{i}").as_bytes());
//!     tuesday.add(format!("user_{}", i + 500).as_bytes());
//! }
//!
//! // ~1000 distinct users per day
//! assert!(monday.cardinality() > 950 && monday.cardinality() < 1050);
//!
//! // ~1500 across both days, ~500 returning
//! let both = monday.merge(&tuesday).unwrap();
//! assert!(both.cardinality() > 1400 && both.cardinality() < 1600);
//! let returning = monday.intersection(&tuesday).unwrap();
//! assert!(returning > 350 && returning < 650);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod common;
mod estimator;
pub mod register;
pub mod sketch;

// Re-export core types for convenience
pub use common::{hash, Mergeable, Result, Sketch, SketchError};
pub use register::{reg_sum_and_zeros, Register};
pub use sketch::HyperMinHash;
