//! Core traits for sketch implementations

use super::error::SketchError;

/// Core operations any data sketch supports: updating with new items,
/// producing an estimate, and checking emptiness.
pub trait Sketch {
    /// The type of items this sketch can process
    type Item;

    /// Update the sketch with a new item
    fn update(&mut self, item: &Self::Item);

    /// Get the estimated result from the sketch
    ///
    /// For cardinality sketches this is the estimated number of unique
    /// items, before any rounding the public query surface applies.
    fn estimate(&self) -> f64;

    /// Check if the sketch is empty (no items added)
    fn is_empty(&self) -> bool;
}

/// Trait for sketches that support merging
///
/// Merging combines two independently built sketches so the result
/// represents the union of both input streams. Essential for distributed
/// aggregation, where sketches are computed per shard and combined.
pub trait Mergeable: Sketch {
    /// Merge another sketch into this one, in place
    ///
    /// # Errors
    ///
    /// Returns `SketchError::IncompatibleSketches` if the sketches have
    /// different configurations (e.g. different precision).
    fn merge(&mut self, other: &Self) -> Result<(), SketchError>;
}
