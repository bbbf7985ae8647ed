//! Tuning knobs for the collision engine, validated at construction.
//!
//! GJK and EPA share one iteration cap (the engines terminate and report
//! their best answer rather than error if they never converge — see
//! `gjk3d`/`epa3d`'s module docs), and `collide()` rounds its MTV to a grid
//! before reporting it. Those are the only two values worth exposing as
//! configuration; EPA's per-dimension convergence tolerances are pinned
//! constants, not tunables.

use crate::error::{GeoError, Result};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionConfig {
    pub max_iterations: usize,
    pub mtv_precision: f64,
}

impl CollisionConfig {
    /// Validates that the iteration cap and rounding grid are both positive.
    pub fn new(max_iterations: usize, mtv_precision: f64) -> Result<Self> {
        if max_iterations == 0 {
            return Err(GeoError::invalid_config("max_iterations must be at least 1"));
        }
        if mtv_precision <= 0.0 {
            return Err(GeoError::invalid_config("mtv_precision must be positive"));
        }
        Ok(Self { max_iterations, mtv_precision })
    }
}

impl Default for CollisionConfig {
    /// 64 iterations (matches the reference codebase's GJK/EPA loops), MTV
    /// rounded to a `0.1` grid per the worked example.
    fn default() -> Self {
        Self { max_iterations: 64, mtv_precision: 0.1 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_iterations() {
        assert!(CollisionConfig::new(0, 0.1).is_err());
    }

    #[test]
    fn rejects_non_positive_precision() {
        assert!(CollisionConfig::new(64, 0.0).is_err());
        assert!(CollisionConfig::new(64, -0.1).is_err());
    }

    #[test]
    fn accepts_defaults() {
        assert_eq!(CollisionConfig::new(64, 0.1).unwrap(), CollisionConfig::default());
    }
}
