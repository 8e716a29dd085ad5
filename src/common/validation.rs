//! Parameter bounds checking for sketch constructors

use crate::common::{Result, SketchError};

/// Validate that precision is within acceptable range (4-18)
pub fn validate_precision(precision: u8) -> Result<()> {
    if !(4..=18).contains(&precision) {
        return Err(SketchError::InvalidParameter {
            param: "precision".to_string(),
            value: precision.to_string(),
            constraint: "must be in range [4, 18]".to_string(),
        });
    }
    Ok(())
}
