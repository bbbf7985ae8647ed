//! Narrow-phase collision detection: GJK for intersection tests, EPA for the
//! minimum translation vector, in both 2D and 3D.

pub mod config;
pub mod epa2d;
pub mod epa3d;
pub mod gjk2d;
pub mod gjk3d;
pub mod mtv;

pub use config::CollisionConfig;
pub use mtv::{collide, CollisionResult, Dimension};
