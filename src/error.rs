//! Crate-level error type.
//!
//! Most engines in this crate never fail on valid input: GJK/EPA, QuickHull and
//! Fortune's sweep treat their iteration caps as a non-error terminal state, the
//! R-tree reports delete misses as `false`, and A* reports "no path" by simply
//! omitting the goal from the returned visited set. `GeoError` exists only for
//! the handful of cases where the caller hands us something we can actually
//! detect as invalid up front.

use thiserror::Error;

/// Result type alias used throughout this crate.
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors surfaced by this crate's public API.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GeoError {
    /// An R-tree was constructed with a fanout that can never satisfy the
    /// Guttman split invariant (`MinChildren < 2`).
    #[error("invalid r-tree configuration: {0}")]
    InvalidConfig(String),

    /// A shape was built through a validating constructor with inputs that
    /// violate the shape's own invariants (e.g. negative box extents).
    #[error("degenerate shape: {0}")]
    DegenerateShape(String),
}

impl GeoError {
    /// Construct an [`GeoError::InvalidConfig`].
    pub fn invalid_config<S: Into<String>>(message: S) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Construct an [`GeoError::DegenerateShape`].
    pub fn degenerate_shape<S: Into<String>>(message: S) -> Self {
        Self::DegenerateShape(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_carry_through() {
        let err = GeoError::invalid_config("min_children must be >= 2");
        assert!(err.to_string().contains("min_children"));
    }
}
