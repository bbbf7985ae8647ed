//! Top-level collision query: GJK for a yes/no answer, EPA for the minimum
//! translation vector, with the rounding and degenerate-case handling the
//! spec requires of callers (coincident centers, zero MTV after rounding).

use crate::geometry::{Shape, Spatial};
use crate::geometry::point::Point;

use crate::collision::{epa2d, epa3d, gjk2d, gjk3d, CollisionConfig};

/// Which plane/space a query runs in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Two,
    Three,
}

/// Result of a collision query: whether the shapes overlap, and by how much
/// (zero when they don't).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionResult {
    pub collided: bool,
    pub mtv: Point,
}

impl CollisionResult {
    fn none() -> Self {
        Self { collided: false, mtv: Point::zero() }
    }
}

/// The perturbation applied to `b` when `a` and `b` share a center, so GJK's
/// initial direction never starts degenerate.
const COINCIDENT_NUDGE: Point = Point { x: 0.1, y: 0.1, z: 0.1 };

/// Runs a full collision query between `a` and `b`, reporting whether they
/// intersect and, if so, the minimum translation vector needed to separate
/// them (rounded per `config.mtv_precision`; a collision whose rounded MTV is
/// the zero vector is reported as no collision).
pub fn collide(a: &Shape, b: &Shape, dimension: Dimension, config: &CollisionConfig) -> CollisionResult {
    let b_effective = if a.center().approx_equal(&b.center(), 1e-9) {
        b.moved(COINCIDENT_NUDGE)
    } else {
        b.clone()
    };

    let raw_mtv = match dimension {
        Dimension::Two => gjk2d::test_collision(a, &b_effective, config.max_iterations)
            .map(|simplex| epa2d::compute_mtv(a, &b_effective, simplex, config.max_iterations)),
        Dimension::Three => gjk3d::test_collision(a, &b_effective, config.max_iterations)
            .map(|simplex| epa3d::compute_mtv(a, &b_effective, simplex, config.max_iterations)),
    };

    match raw_mtv {
        None => CollisionResult::none(),
        Some(mtv) => {
            // EPA resolves the Minkowski difference `a - b`, so the raw
            // vector separates `b` from `a`. Callers want the vector to move
            // `a` by instead, which is the negation.
            let rounded = mtv.scale(-1.0).round(config.mtv_precision);
            if rounded == Point::zero() {
                CollisionResult::none()
            } else {
                CollisionResult { collided: true, mtv: rounded }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::shapes::Sphere;

    #[test]
    fn coincident_centers_are_nudged_before_testing() {
        let a = Shape::Sphere(Sphere::new(Point::zero(), 1.0));
        let b = Shape::Sphere(Sphere::new(Point::zero(), 1.0));
        let result = collide(&a, &b, Dimension::Three, &CollisionConfig::default());
        assert!(result.collided);
    }

    #[test]
    fn disjoint_shapes_report_no_collision() {
        let a = Shape::Sphere(Sphere::new(Point::zero(), 1.0));
        let b = Shape::Sphere(Sphere::new(Point::new(100.0, 0.0, 0.0), 1.0));
        let result = collide(&a, &b, Dimension::Three, &CollisionConfig::default());
        assert!(!result.collided);
        assert_eq!(result.mtv, Point::zero());
    }

    #[test]
    fn touching_spheres_round_to_no_collision() {
        // Centers 2.0 apart, radius 1.0 each: surfaces touch exactly, so the
        // true MTV is zero and must round down to "no collision".
        let a = Shape::Sphere(Sphere::new(Point::zero(), 1.0));
        let b = Shape::Sphere(Sphere::new(Point::new(2.0, 0.0, 0.0), 1.0));
        let result = collide(&a, &b, Dimension::Three, &CollisionConfig::default());
        assert!(!result.collided);
    }
}
