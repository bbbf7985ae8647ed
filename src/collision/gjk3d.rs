//! Gilbert-Johnson-Keerthi (GJK) in full 3D.
//!
//! Determines whether two convex shapes intersect by walking a simplex
//! through Minkowski-difference space toward the origin. On success the
//! final tetrahedron is handed to [`crate::collision::epa3d`] to compute the
//! minimum translation vector.

use crate::geometry::{Collide, Point};

/// Default iteration cap; reaching it without enclosing the origin is
/// treated as "no collision" rather than an error (see spec §4.1). Callers
/// going through [`crate::collision::collide`] get this from
/// [`crate::collision::CollisionConfig::max_iterations`] instead.
pub const MAX_ITERATIONS: usize = 64;

/// Support point of the Minkowski difference `A - B` along `direction`.
pub fn support<A: Collide, B: Collide>(a: &A, b: &B, direction: Point) -> Point {
    a.support(direction).sub(&b.support(direction.scale(-1.0)))
}

/// Runs GJK to completion, iterating at most `max_iterations` times. Returns
/// the enclosing tetrahedron (oldest to newest) on collision, `None` if the
/// shapes are disjoint.
pub fn test_collision<A: Collide, B: Collide>(a: &A, b: &B, max_iterations: usize) -> Option<Vec<Point>> {
    let mut direction = a.point1().sub(&b.point1());
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

/// Reduces `simplex` to the feature closest to the origin, updating
/// `direction` to point from that feature toward the origin. Returns `true`
/// once the origin is enclosed by a full tetrahedron.
fn do_simplex(simplex: &mut Vec<Point>, direction: &mut Point) -> bool {
    match simplex.len() {
        2 => line_case(simplex, direction),
        3 => triangle_case(simplex, direction),
        4 => tetrahedron_case(simplex, direction),
        _ => false,
    }
}

fn line_case(simplex: &mut Vec<Point>, direction: &mut Point) -> bool {
    let a = simplex[1];
    let b = simplex[0];
    let ab = b.sub(&a);
    let ao = a.scale(-1.0);

    if ab.dot(&ao) > 0.0 {
        *direction = perpendicular_toward(ab, ao);
        *simplex = vec![b, a];
    } else {
        *direction = ao;
        *simplex = vec![a];
    }
    false
}

fn triangle_case(simplex: &mut Vec<Point>, direction: &mut Point) -> bool {
    let a = simplex[2];
    let b = simplex[1];
    let c = simplex[0];

    let ab = b.sub(&a);
    let ac = c.sub(&a);
    let ao = a.scale(-1.0);
    let abc = ab.cross(&ac);

    if abc.cross(&ac).dot(&ao) > 0.0 {
        if ac.dot(&ao) > 0.0 {
            *simplex = vec![c, a];
            *direction = perpendicular_toward(ac, ao);
        } else {
            edge_ab_region(a, b, ab, ao, simplex, direction);
        }
        return false;
    }

    if ab.cross(&abc).dot(&ao) > 0.0 {
        edge_ab_region(a, b, ab, ao, simplex, direction);
        return false;
    }

    if abc.dot(&ao) > 0.0 {
        *simplex = vec![c, b, a];
        *direction = abc;
    } else {
        *simplex = vec![b, c, a];
        *direction = abc.scale(-1.0);
    }
    false
}

fn edge_ab_region(a: Point, b: Point, ab: Point, ao: Point, simplex: &mut Vec<Point>, direction: &mut Point) {
    if ab.dot(&ao) > 0.0 {
        *simplex = vec![b, a];
        *direction = perpendicular_toward(ab, ao);
    } else {
        *simplex = vec![a];
        *direction = ao;
    }
}

fn tetrahedron_case(simplex: &mut Vec<Point>, direction: &mut Point) -> bool {
    let a = simplex[3];
    let b = simplex[2];
    let c = simplex[1];
    let d = simplex[0];

    let ao = a.scale(-1.0);

    let abc = b.sub(&a).cross(&c.sub(&a));
    if abc.dot(&ao) > 0.0 {
        *simplex = vec![c, b, a];
        return triangle_case(simplex, direction);
    }

    let acd = c.sub(&a).cross(&d.sub(&a));
    if acd.dot(&ao) > 0.0 {
        *simplex = vec![d, c, a];
        return triangle_case(simplex, direction);
    }

    let adb = d.sub(&a).cross(&b.sub(&a));
    if adb.dot(&ao) > 0.0 {
        *simplex = vec![b, d, a];
        return triangle_case(simplex, direction);
    }

    true
}

/// `(ab x ao) x ab`, the component of `ao` perpendicular to `ab`, pointing
/// toward the origin.
fn perpendicular_toward(ab: Point, ao: Point) -> Point {
    let perp = ab.cross(&ao).cross(&ab);
    if perp.normal_square() < 1e-20 {
        // ab and ao are parallel; any vector perpendicular to ab will do.
        let alt = ab.cross(&Point::new(1.0, 0.0, 0.0));
        if alt.normal_square() < 1e-20 {
            ab.cross(&Point::new(0.0, 1.0, 0.0))
        } else {
            alt
        }
    } else {
        perp
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Sphere;

    #[test]
    fn overlapping_spheres_collide() {
        let a = Sphere::new(Point::new(0.0, 0.0, 0.0), 1.0);
        let b = Sphere::new(Point::new(1.0, 0.0, 0.0), 1.0);
        assert!(test_collision(&a, &b, MAX_ITERATIONS).is_some());
    }

    #[test]
    fn distant_spheres_do_not_collide() {
        let a = Sphere::new(Point::new(0.0, 0.0, 0.0), 1.0);
        let b = Sphere::new(Point::new(10.0, 0.0, 0.0), 1.0);
        assert!(test_collision(&a, &b, MAX_ITERATIONS).is_none());
    }

    #[test]
    fn spec_scenario_two_close_spheres() {
        let a = Sphere::new(Point::new(100.0, 100.0, 100.0), 10.0);
        let b = Sphere::new(Point::new(115.0, 100.0, 100.0), 10.0);
        assert!(test_collision(&a, &b, MAX_ITERATIONS).is_some());
    }
}
