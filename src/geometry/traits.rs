//! Capability contracts shared by every shape in the crate (see spec §6).
//!
//! The shape variant set is closed (`Point`, `Aabb`, `Sphere`, `Ellipsoid`,
//! `Line`, `Triangle`, `Polyhedron`, `MultiObject`, `RotatableBox`, `Border`),
//! so we model it as a tagged union (`Shape`) rather than trait objects: every
//! engine that needs dynamic dispatch over "some shape" matches on `Shape`,
//! while engines that are generic over a single concrete type (the R-tree,
//! for instance) take `T: Spatial` directly.

use crate::geometry::aabb::Aabb;
use crate::geometry::point::Point;

/// A shape that can be located, bounded, and translated.
pub trait Spatial {
    /// The shape's anchor point (`Point1` in the spec's vocabulary).
    fn point1(&self) -> Point;

    /// The shape's axis-aligned bounding box.
    fn bounds(&self) -> Aabb;

    /// The shape's center point.
    fn center(&self) -> Point;
}

/// A [`Spatial`] shape that additionally exposes a support function, making
/// it usable as a GJK/EPA collision participant.
pub trait Collide: Spatial {
    /// `support(d) = argmax_{x in shape} x . d`.
    fn support(&self, direction: Point) -> Point;
}
