//! Computational-geometry and discrete-algorithm primitives for real-time
//! simulation and game logic: convex collision detection (GJK/EPA), an
//! R-tree spatial index, A* pathfinding over arbitrary graphs, 3D convex
//! hull construction (QuickHull), Fortune's-algorithm Voronoi diagrams, and
//! a 7-card poker hand evaluator.
//!
//! Each engine is independent past the shared [`geometry`] substrate; see
//! each module's documentation for its own contract.

pub mod astar;
pub mod collision;
pub mod error;
pub mod geometry;
pub mod hull;
pub mod poker;
pub mod rtree;
pub mod voronoi;

pub use error::{GeoError, Result};
