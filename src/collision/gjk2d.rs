//! GJK restricted to the xy-plane (`z == 0` throughout).
//!
//! The simplex never exceeds a triangle, so the case analysis collapses to a
//! line test and a single triangle test (no tetrahedron case).

use crate::geometry::{Collide, Point};

/// Default iteration cap; see [`crate::collision::gjk3d::MAX_ITERATIONS`].
pub const MAX_ITERATIONS: usize = 64;

pub fn support<A: Collide, B: Collide>(a: &A, b: &B, direction: Point) -> Point {
    a.support(direction).sub(&b.support(direction.scale(-1.0)))
}

/// Runs 2D GJK to completion, iterating at most `max_iterations` times.
/// Returns the enclosing triangle on collision, `None` if the shapes are
/// disjoint.
pub fn test_collision<A: Collide, B: Collide>(a: &A, b: &B, max_iterations: usize) -> Option<Vec<Point>> {
    let mut direction = b.point1().sub(&a.point1());
    if direction.normal_square() == 0.0 {
        direction = Point::new(1.0, 0.0, 0.0);
    }

    let mut simplex = vec![support(a, b, direction)];
    direction = simplex[0].scale(-1.0);

    for _ in 0..max_iterations {
        let candidate = support(a, b, direction);
        if candidate.dot(&direction) < 0.0 {
            return None;
        }
        simplex.push(candidate);

        if do_simplex(&mut simplex, &mut direction) {
            return Some(simplex);
        }
    }
    None
}

fn do_simplex(simplex: &mut Vec<Point>, direction: &mut Point) -> bool {
    match simplex.len() {
        2 => line_case(simplex, direction),
        3 => triangle_case(simplex, direction),
        _ => false,
    }
}

fn line_case(simplex: &mut Vec<Point>, direction: &mut Point) -> bool {
    let a = simplex[1];
    let b = simplex[0];
    let ab = b.sub(&a);
    let ao = a.scale(-1.0);

    *direction = triple_product(ab, ao, ab);
    if direction.normal_square() < 1e-20 {
        // ab and ao are collinear; either perpendicular axis works.
        *direction = Point::new(-ab.y, ab.x, 0.0);
    }
    let _ = b;
    false
}

fn triangle_case(simplex: &mut Vec<Point>, direction: &mut Point) -> bool {
    let a = simplex[2];
    let b = simplex[1];
    let c = simplex[0];

    let ab = b.sub(&a);
    let ac = c.sub(&a);
    let ao = a.scale(-1.0);

    let ab_perp = triple_product(ac, ab, ab);
    let ac_perp = triple_product(ab, ac, ac);

    if ab_perp.dot(&ao) > 0.0 {
        *simplex = vec![b, a];
        *direction = ab_perp;
        return false;
    }

    if ac_perp.dot(&ao) > 0.0 {
        *simplex = vec![c, a];
        *direction = ac_perp;
        return false;
    }

    true
}

/// `a x (b x c)`, computed from dot products so it works with planar
/// (`z == 0`) points without relying on a degenerate double cross product.
fn triple_product(a: Point, b: Point, c: Point) -> Point {
    b.scale(a.dot(&c)).sub(&c.scale(a.dot(&b)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::shapes::Sphere;

    #[test]
    fn overlapping_circles_collide() {
        let a = Sphere::new(Point::new2(0.0, 0.0), 1.0);
        let b = Sphere::new(Point::new2(1.5, 0.0), 1.0);
        assert!(test_collision(&a, &b, MAX_ITERATIONS).is_some());
    }

    #[test]
    fn distant_circles_do_not_collide() {
        let a = Sphere::new(Point::new2(0.0, 0.0), 1.0);
        let b = Sphere::new(Point::new2(10.0, 0.0), 1.0);
        assert!(test_collision(&a, &b, MAX_ITERATIONS).is_none());
    }
}
