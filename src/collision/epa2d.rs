//! 2D Expanding Polytope Algorithm: grows the GJK triangle into a convex
//! polygon edge by edge until the closest edge stops improving.

use crate::geometry::{Collide, Point};

const MAX_VERTICES: usize = 64;
const TOLERANCE: f64 = 1e-6;

struct Edge {
    index: usize,
    normal: Point,
    distance: f64,
}

fn edge_at(polygon: &[Point], index: usize) -> Edge {
    let a = polygon[index];
    let b = polygon[(index + 1) % polygon.len()];
    let edge = b.sub(&a);
    // Outward normal: rotate the edge vector -90 degrees, matching the
    // winding established when the initial triangle is built CCW.
    let mut normal = Point::new(edge.y, -edge.x, 0.0).normalize();
    if normal.dot(&a) < 0.0 {
        normal = normal.scale(-1.0);
    }
    Edge { index, normal, distance: normal.dot(&a) }
}

fn closest_edge(polygon: &[Point]) -> Edge {
    (0..polygon.len())
        .map(|i| edge_at(polygon, i))
        .min_by(|x, y| x.distance.partial_cmp(&y.distance).unwrap())
        .expect("polygon always has at least one edge")
}

/// Ensures the initial GJK triangle winds counter-clockwise, as the edge
/// normal formula assumes.
fn wind_ccw(mut triangle: Vec<Point>) -> Vec<Point> {
    let area2 = (triangle[1].x - triangle[0].x) * (triangle[2].y - triangle[0].y)
        - (triangle[2].x - triangle[0].x) * (triangle[1].y - triangle[0].y);
    if area2 < 0.0 {
        triangle.swap(1, 2);
    }
    triangle
}

/// Expands the GJK-produced triangle `simplex` into the minimum translation
/// vector separating `a` and `b` in the xy-plane. Iterates at most
/// `max_iterations` times.
pub fn compute_mtv<A: Collide, B: Collide>(a: &A, b: &B, simplex: Vec<Point>, max_iterations: usize) -> Point {
    let mut polygon = wind_ccw(simplex);

    for _ in 0..max_iterations {
        let edge = closest_edge(&polygon);
        let support = crate::collision::gjk2d::support(a, b, edge.normal);
        let support_distance = support.dot(&edge.normal);

        if support_distance - edge.distance < TOLERANCE || polygon.len() >= MAX_VERTICES {
            return edge.normal.scale(support_distance);
        }

        polygon.insert(edge.index + 1, support);
    }

    let edge = closest_edge(&polygon);
    edge.normal.scale(edge.distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::gjk2d::{self, MAX_ITERATIONS};
    use crate::geometry::Sphere;

    #[test]
    fn overlapping_circles_produce_separating_mtv() {
        let a = Sphere::new(Point::new2(0.0, 0.0), 1.0);
        let b = Sphere::new(Point::new2(1.0, 0.0), 1.0);
        let simplex = gjk2d::test_collision(&a, &b, MAX_ITERATIONS).expect("should collide");
        let mtv = compute_mtv(&a, &b, simplex, MAX_ITERATIONS);
        assert!((mtv.normal() - 1.0).abs() < 1e-2);
    }
}
