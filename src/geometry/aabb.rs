//! Axis-aligned bounding box: anchor point + non-negative size triple.

use crate::error::{GeoError, Result};
use crate::geometry::point::Point;
use crate::geometry::traits::{Collide, Spatial};

/// Axis-aligned bounding box, stored as an anchor `p1` and a non-negative
/// size triple `(w, h, l)`; `p2 = p1 + (w, h, l)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub p1: Point,
    pub sizes: Point,
}

impl Aabb {
    /// Build an AABB from an anchor and sizes without validating that the
    /// sizes are non-negative (the invariant is the caller's responsibility;
    /// see [`Aabb::try_new`] for a validating constructor).
    pub fn new(p1: Point, sizes: Point) -> Self {
        Self { p1, sizes }
    }

    /// Build an AABB, rejecting negative sizes.
    pub fn try_new(p1: Point, sizes: Point) -> Result<Self> {
        if sizes.x < 0.0 || sizes.y < 0.0 || sizes.z < 0.0 {
            return Err(GeoError::degenerate_shape(
                "box sizes must be non-negative",
            ));
        }
        Ok(Self::new(p1, sizes))
    }

    /// Build an AABB from two opposite corners, normalizing which is the
    /// anchor.
    pub fn from_corners(a: Point, b: Point) -> Self {
        let p1 = Point::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z));
        let p2 = Point::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z));
        Self::new(p1, p2.sub(&p1))
    }

    /// The box's far corner, `p1 + sizes`.
    pub fn p2(&self) -> Point {
        self.p1.add(&self.sizes)
    }

    /// Width (x extent).
    pub fn width(&self) -> f64 {
        self.sizes.x
    }

    /// Height (y extent).
    pub fn height(&self) -> f64 {
        self.sizes.y
    }

    /// Length/depth (z extent).
    pub fn length(&self) -> f64 {
        self.sizes.z
    }

    /// True when `point` lies within the box (inclusive of its boundary).
    pub fn contains_point(&self, point: &Point) -> bool {
        let p2 = self.p2();
        point.x >= self.p1.x
            && point.x <= p2.x
            && point.y >= self.p1.y
            && point.y <= p2.y
            && point.z >= self.p1.z
            && point.z <= p2.z
    }

    /// True when `other` is entirely contained within this box.
    pub fn contains(&self, other: &Aabb) -> bool {
        let p2 = self.p2();
        let o2 = other.p2();
        other.p1.x >= self.p1.x
            && other.p1.y >= self.p1.y
            && other.p1.z >= self.p1.z
            && o2.x <= p2.x
            && o2.y <= p2.y
            && o2.z <= p2.z
    }

    /// True when this box and `other` overlap (touching boundaries count).
    pub fn intersects(&self, other: &Aabb) -> bool {
        let p2 = self.p2();
        let o2 = other.p2();
        self.p1.x <= o2.x
            && p2.x >= other.p1.x
            && self.p1.y <= o2.y
            && p2.y >= other.p1.y
            && self.p1.z <= o2.z
            && p2.z >= other.p1.z
    }

    /// The overlap region with `other`, if the two boxes intersect with
    /// positive volume.
    pub fn intersect(&self, other: &Aabb) -> Option<Aabb> {
        if !self.intersects(other) {
            return None;
        }
        let p2 = self.p2();
        let o2 = other.p2();
        let lo = Point::new(
            self.p1.x.max(other.p1.x),
            self.p1.y.max(other.p1.y),
            self.p1.z.max(other.p1.z),
        );
        let hi = Point::new(p2.x.min(o2.x), p2.y.min(o2.y), p2.z.min(o2.z));
        let merged = Aabb::from_corners(lo, hi);
        if merged.volume() > 0.0 {
            Some(merged)
        } else {
            None
        }
    }

    /// The smallest box containing both `self` and `other`.
    pub fn union(&self, other: &Aabb) -> Aabb {
        let p2 = self.p2();
        let o2 = other.p2();
        let lo = Point::new(
            self.p1.x.min(other.p1.x),
            self.p1.y.min(other.p1.y),
            self.p1.z.min(other.p1.z),
        );
        let hi = Point::new(p2.x.max(o2.x), p2.y.max(o2.y), p2.z.max(o2.z));
        Aabb::from_corners(lo, hi)
    }

    /// Volume (zero if any size is zero, as with a flattened 2D box).
    pub fn volume(&self) -> f64 {
        self.sizes.x * self.sizes.y * self.sizes.z
    }

    /// Surface area ("margin"), used by R*-tree-style split heuristics that
    /// prefer low-perimeter groupings.
    pub fn margin(&self) -> f64 {
        let s = self.sizes;
        2.0 * (s.x * s.y + s.y * s.z + s.z * s.x)
    }

    /// Split into the 8 octants of this box (halving each axis). Degenerate
    /// on any axis whose size is zero (the octants simply collapse on that
    /// axis).
    pub fn octant_split(&self) -> [Aabb; 8] {
        let half = Point::new(self.sizes.x / 2.0, self.sizes.y / 2.0, self.sizes.z / 2.0);
        let p1 = self.p1;
        let mut children = Vec::with_capacity(8);
        for dx in 0..2 {
            for dy in 0..2 {
                for dz in 0..2 {
                    let offset = Point::new(
                        dx as f64 * half.x,
                        dy as f64 * half.y,
                        dz as f64 * half.z,
                    );
                    children.push(Aabb::new(p1.add(&offset), half));
                }
            }
        }
        children.try_into().unwrap_or_else(|_| unreachable!())
    }

    /// The 8 vertices of this box as a polyhedron-style vertex list, in a
    /// fixed corner order.
    pub fn to_vertices(&self) -> Vec<Point> {
        let p1 = self.p1;
        let s = self.sizes;
        vec![
            p1,
            p1.add(&Point::new(s.x, 0.0, 0.0)),
            p1.add(&Point::new(s.x, s.y, 0.0)),
            p1.add(&Point::new(0.0, s.y, 0.0)),
            p1.add(&Point::new(0.0, 0.0, s.z)),
            p1.add(&Point::new(s.x, 0.0, s.z)),
            p1.add(&Point::new(s.x, s.y, s.z)),
            p1.add(&Point::new(0.0, s.y, s.z)),
        ]
    }

    /// The 4 vertices of this box treated as a flat polygon (valid when
    /// `length() == 0`).
    pub fn to_polygon(&self) -> Vec<Point> {
        let p1 = self.p1;
        let s = self.sizes;
        vec![
            p1,
            p1.add(&Point::new(s.x, 0.0, 0.0)),
            p1.add(&Point::new(s.x, s.y, 0.0)),
            p1.add(&Point::new(0.0, s.y, 0.0)),
        ]
    }

    /// Translate by `diff`, returning a new box.
    pub fn moved(&self, diff: Point) -> Aabb {
        Aabb::new(self.p1.add(&diff), self.sizes)
    }

    /// Squared minimum distance from `point` to this box (0 if the point is
    /// inside). Used by the R-tree's nearest-neighbor search.
    pub fn min_dist_squared(&self, point: &Point) -> f64 {
        let p2 = self.p2();
        let clamp = |v: f64, lo: f64, hi: f64| v.max(lo).min(hi);
        let closest = Point::new(
            clamp(point.x, self.p1.x, p2.x),
            clamp(point.y, self.p1.y, p2.y),
            clamp(point.z, self.p1.z, p2.z),
        );
        point.sub(&closest).normal_square()
    }

    /// MinMaxDist(point, box): the smallest of the worst-case distances to
    /// each face, used by the R-tree's nearest-neighbor pruning (Roussopoulos
    /// et al.).
    pub fn min_max_dist_squared(&self, point: &Point) -> f64 {
        let p2 = self.p2();
        let axis = |pt: f64, lo: f64, hi: f64| -> (f64, f64) {
            let mid = (lo + hi) / 2.0;
            if pt <= mid {
                (lo, hi)
            } else {
                (hi, lo)
            }
        };
        let (rm_x, rm_x_far) = axis(point.x, self.p1.x, p2.x);
        let (rm_y, rm_y_far) = axis(point.y, self.p1.y, p2.y);
        let (rm_z, rm_z_far) = axis(point.z, self.p1.z, p2.z);

        let dx = (point.x - rm_x).powi(2);
        let dy = (point.y - rm_y).powi(2);
        let dz = (point.z - rm_z).powi(2);

        let far_dx = (point.x - rm_x_far).powi(2);
        let far_dy = (point.y - rm_y_far).powi(2);
        let far_dz = (point.z - rm_z_far).powi(2);

        let candidates = [
            dx + far_dy + far_dz,
            far_dx + dy + far_dz,
            far_dx + far_dy + dz,
        ];
        candidates.iter().cloned().fold(f64::INFINITY, f64::min)
    }
}

impl Spatial for Aabb {
    fn point1(&self) -> Point {
        self.p1
    }

    fn bounds(&self) -> Aabb {
        *self
    }

    fn center(&self) -> Point {
        self.p1.add(&self.sizes.scale(0.5))
    }
}

impl Collide for Aabb {
    fn support(&self, direction: Point) -> Point {
        let p2 = self.p2();
        Point::new(
            if direction.x >= 0.0 { p2.x } else { self.p1.x },
            if direction.y >= 0.0 { p2.y } else { self.p1.y },
            if direction.z >= 0.0 { p2.z } else { self.p1.z },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_box_at(x: f64, y: f64, z: f64) -> Aabb {
        Aabb::new(Point::new(x, y, z), Point::new(1.0, 1.0, 1.0))
    }

    #[test]
    fn union_is_commutative() {
        let a = unit_box_at(0.0, 0.0, 0.0);
        let b = unit_box_at(5.0, 5.0, 5.0);
        assert_eq!(a.union(&b), b.union(&a));
    }

    #[test]
    fn intersection_is_contained_and_positive_volume() {
        let a = unit_box_at(0.0, 0.0, 0.0);
        let b = Aabb::new(Point::new(0.5, 0.5, 0.5), Point::new(1.0, 1.0, 1.0));
        let c = a.intersect(&b).expect("should intersect");
        assert!(a.contains(&c));
        assert!(b.contains(&c));
        assert!(c.volume() > 0.0);
    }

    #[test]
    fn disjoint_boxes_do_not_intersect() {
        let a = unit_box_at(0.0, 0.0, 0.0);
        let b = unit_box_at(10.0, 10.0, 10.0);
        assert!(a.intersect(&b).is_none());
    }

    #[test]
    fn octant_split_covers_the_box() {
        let a = Aabb::new(Point::zero(), Point::new(2.0, 2.0, 2.0));
        let children = a.octant_split();
        assert_eq!(children.len(), 8);
        let mut union = children[0];
        for c in &children[1..] {
            union = union.union(c);
        }
        assert_eq!(union, a);
    }

    #[test]
    fn negative_sizes_rejected_by_validating_constructor() {
        assert!(Aabb::try_new(Point::zero(), Point::new(-1.0, 1.0, 1.0)).is_err());
    }

    #[test]
    fn support_picks_far_corner_along_direction() {
        let b = unit_box_at(0.0, 0.0, 0.0);
        let s = b.support(Point::new(1.0, 1.0, 1.0));
        assert_eq!(s, Point::new(1.0, 1.0, 1.0));
    }
}
