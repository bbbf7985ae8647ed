//! Expanding Polytope Algorithm: recovers the minimum translation vector
//! (MTV) from the tetrahedron GJK leaves behind.

use crate::geometry::{Collide, Point};

const MAX_FACES: usize = 64;
const TOLERANCE: f64 = 1e-4;

struct Face {
    indices: [usize; 3],
    normal: Point,
    distance: f64,
}

fn build_face(vertices: &[Point], indices: [usize; 3]) -> Face {
    let a = vertices[indices[0]];
    let b = vertices[indices[1]];
    let c = vertices[indices[2]];
    let mut normal = b.sub(&a).cross(&c.sub(&a)).normalize();
    // Faces of the initial tetrahedron enclose the origin, so the outward
    // side is the one facing away from it.
    if normal.dot(&a) < 0.0 {
        normal = normal.scale(-1.0);
    }
    let distance = normal.dot(&a);
    Face { indices, normal, distance }
}

/// Expands the tetrahedron `simplex` (as returned by
/// [`crate::collision::gjk3d::test_collision`]) until the closest face's
/// support point stops improving, returning the contact normal scaled by
/// penetration depth. Iterates at most `max_iterations` times.
pub fn compute_mtv<A: Collide, B: Collide>(a: &A, b: &B, simplex: Vec<Point>, max_iterations: usize) -> Point {
    let mut vertices = simplex;
    let mut faces = vec![
        build_face(&vertices, [0, 1, 2]),
        build_face(&vertices, [0, 2, 3]),
        build_face(&vertices, [0, 3, 1]),
        build_face(&vertices, [1, 3, 2]),
    ];

    for _ in 0..max_iterations {
        let closest = faces
            .iter()
            .enumerate()
            .min_by(|(_, x), (_, y)| x.distance.partial_cmp(&y.distance).unwrap())
            .map(|(i, _)| i)
            .expect("polytope always has at least one face");

        let normal = faces[closest].normal;
        let support = crate::collision::gjk3d::support(a, b, normal);
        let support_distance = support.dot(&normal);

        if support_distance - faces[closest].distance < TOLERANCE || faces.len() >= MAX_FACES {
            return normal.scale(support_distance);
        }

        let new_index = vertices.len();
        vertices.push(support);

        // Remove every face the new point can see, collecting the boundary
        // (horizon) edges that bounded exactly one removed face.
        let mut edges: Vec<(usize, usize)> = Vec::new();
        faces.retain(|face| {
            let visible = face.normal.dot(&support.sub(&vertices[face.indices[0]])) > 0.0;
            if visible {
                add_edge(&mut edges, face.indices[0], face.indices[1]);
                add_edge(&mut edges, face.indices[1], face.indices[2]);
                add_edge(&mut edges, face.indices[2], face.indices[0]);
            }
            !visible
        });

        for (i, j) in edges {
            faces.push(build_face(&vertices, [i, j, new_index]));
        }
    }

    let closest = faces
        .iter()
        .min_by(|x, y| x.distance.partial_cmp(&y.distance).unwrap())
        .expect("polytope always has at least one face");
    closest.normal.scale(closest.distance)
}

/// Adds an edge, or cancels it out if its reverse is already present (shared
/// between two removed faces, so it is interior, not horizon).
fn add_edge(edges: &mut Vec<(usize, usize)>, i: usize, j: usize) {
    if let Some(pos) = edges.iter().position(|&(a, b)| a == j && b == i) {
        edges.remove(pos);
    } else {
        edges.push((i, j));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::gjk3d::{self, MAX_ITERATIONS};
    use crate::geometry::Sphere;

    #[test]
    fn overlapping_spheres_produce_separating_mtv() {
        let a = Sphere::new(Point::new(0.0, 0.0, 0.0), 1.0);
        let b = Sphere::new(Point::new(1.0, 0.0, 0.0), 1.0);
        let simplex = gjk3d::test_collision(&a, &b, gjk3d::MAX_ITERATIONS).expect("should collide");
        let mtv = compute_mtv(&a, &b, simplex, MAX_ITERATIONS);
        // Penetration depth is 1.0 along x; direction may point either way.
        assert!((mtv.normal() - 1.0).abs() < 1e-2);
    }
}
