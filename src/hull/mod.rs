//! QuickHull in 3D: builds the convex hull of a point cloud by repeatedly
//! picking the point farthest outside a face, removing every face it sees,
//! and re-triangulating the resulting hole (the "horizon").
//!
//! Faces are kept in an arena and marked `disabled` rather than physically
//! removed, so earlier face indices referenced by in-flight horizon
//! bookkeeping never dangle mid-iteration.

use std::collections::HashMap;

use crate::error::{GeoError, Result};
use crate::geometry::Point;

const EPSILON: f64 = 1e-9;

struct Face {
    vertices: [usize; 3],
    normal: Point,
    outside: Vec<usize>,
    disabled: bool,
}

impl Face {
    fn distance(&self, points: &[Point], p: usize) -> f64 {
        self.normal.dot(&points[p].sub(&points[self.vertices[0]]))
    }
}

/// A triangulated convex hull: `vertices` are a compacted subset of the
/// input points, `indices` are CCW triangles (outward-facing) over them.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexHull {
    pub vertices: Vec<Point>,
    pub indices: Vec<[usize; 3]>,
}

/// Builds the convex hull of `points`. Requires at least 3 non-collinear
/// points. A coplanar point cloud is not an error: the hull degenerates to
/// the planar polygon traced by its boundary, triangulated as a fan.
pub fn build(points: &[Point]) -> Result<ConvexHull> {
    match classify(points) {
        None => Err(GeoError::degenerate_shape("need at least 3 non-collinear points")),
        Some(Initial::Planar(normal)) => planar_hull(points, normal),
        Some(Initial::Tetra(tetra)) => build_3d(points, tetra),
    }
}

fn build_3d(points: &[Point], tetra: [usize; 4]) -> Result<ConvexHull> {
    let mut faces = initial_faces(points, tetra);
    assign_points(points, &mut faces, &tetra);

    loop {
        let Some(face_idx) = faces.iter().position(|f| !f.disabled && !f.outside.is_empty()) else {
            break;
        };

        let eye = *faces[face_idx]
            .outside
            .iter()
            .max_by(|&&a, &&b| {
                faces[face_idx]
                    .distance(points, a)
                    .partial_cmp(&faces[face_idx].distance(points, b))
                    .unwrap()
            })
            .expect("outside set is non-empty");

        let visible: Vec<usize> = faces
            .iter()
            .enumerate()
            .filter(|(_, f)| !f.disabled && f.distance(points, eye) > EPSILON)
            .map(|(i, _)| i)
            .collect();

        let orphans: Vec<usize> = visible
            .iter()
            .flat_map(|&i| faces[i].outside.iter().copied())
            .filter(|&p| p != eye)
            .collect();

        let horizon = find_horizon(&faces, &visible);

        for &vi in &visible {
            faces[vi].disabled = true;
        }

        let mut new_faces = Vec::with_capacity(horizon.len());
        for (v0, v1) in horizon {
            let normal = points[v1].sub(&points[v0]).cross(&points[eye].sub(&points[v0])).normalize();
            faces.push(Face { vertices: [v0, v1, eye], normal, outside: Vec::new(), disabled: false });
            new_faces.push(faces.len() - 1);
        }

        for p in orphans {
            let mut best: Option<(usize, f64)> = None;
            for &nf in &new_faces {
                let d = faces[nf].distance(points, p);
                if d > EPSILON && best.map_or(true, |(_, bd)| d > bd) {
                    best = Some((nf, d));
                }
            }
            if let Some((nf, _)) = best {
                faces[nf].outside.push(p);
            }
        }
    }

    Ok(compact(points, faces))
}

/// An edge is on the horizon when its reverse does not appear on any other
/// visible face: the faces on either side of a shared interior edge wind
/// opposite directions along it, but a horizon edge only has one visible
/// neighbor.
fn find_horizon(faces: &[Face], visible: &[usize]) -> Vec<(usize, usize)> {
    let mut present: HashMap<(usize, usize), ()> = HashMap::new();
    for &vi in visible {
        let v = faces[vi].vertices;
        for k in 0..3 {
            present.insert((v[k], v[(k + 1) % 3]), ());
        }
    }

    let mut horizon = Vec::new();
    for &vi in visible {
        let v = faces[vi].vertices;
        for k in 0..3 {
            let (a, b) = (v[k], v[(k + 1) % 3]);
            if !present.contains_key(&(b, a)) {
                horizon.push((a, b));
            }
        }
    }
    horizon
}

/// The initial simplex a point cloud reduces to: a full tetrahedron, or (when
/// no point lies off the plane through three of them) a bare plane normal
/// signaling a 2D-degenerate cloud.
enum Initial {
    Tetra([usize; 4]),
    Planar(Point),
}

fn classify(points: &[Point]) -> Option<Initial> {
    if points.len() < 3 {
        return None;
    }

    let (mut min_i, mut max_i) = (0usize, 0usize);
    for i in 1..points.len() {
        if points[i].x < points[min_i].x {
            min_i = i;
        }
        if points[i].x > points[max_i].x {
            max_i = i;
        }
    }
    if min_i == max_i {
        return None;
    }

    let axis = points[max_i].sub(&points[min_i]);
    let axis_len = axis.normal();
    if axis_len < EPSILON {
        return None;
    }

    let mut third = None;
    let mut best_dist = EPSILON;
    for i in 0..points.len() {
        if i == min_i || i == max_i {
            continue;
        }
        let d = points[i].sub(&points[min_i]).cross(&axis).normal() / axis_len;
        if d > best_dist {
            best_dist = d;
            third = Some(i);
        }
    }
    let third = third?;

    let plane_normal = points[max_i].sub(&points[min_i]).cross(&points[third].sub(&points[min_i]));
    let mut fourth = None;
    let mut best_plane_dist = EPSILON;
    for i in 0..points.len() {
        if i == min_i || i == max_i || i == third {
            continue;
        }
        let d = points[i].sub(&points[min_i]).dot(&plane_normal).abs();
        if d > best_plane_dist {
            best_plane_dist = d;
            fourth = Some(i);
        }
    }

    match fourth {
        Some(fourth) => Some(Initial::Tetra([min_i, max_i, third, fourth])),
        None => Some(Initial::Planar(plane_normal)),
    }
}

/// Builds the convex hull of a coplanar point cloud as a fan-triangulated
/// polygon: projects onto an orthonormal basis of the plane, runs a 2D
/// monotone-chain hull, then triangulates the resulting boundary.
fn planar_hull(points: &[Point], normal: Point) -> Result<ConvexHull> {
    let normal = normal.normalize();
    let arbitrary = if normal.x.abs() < 0.9 { Point::new(1.0, 0.0, 0.0) } else { Point::new(0.0, 1.0, 0.0) };
    let u = normal.cross(&arbitrary).normalize();
    let v = normal.cross(&u).normalize();

    let projected: Vec<(usize, f64, f64)> =
        points.iter().enumerate().map(|(i, p)| (i, p.dot(&u), p.dot(&v))).collect();
    let hull_indices = monotone_chain(&projected);
    if hull_indices.len() < 3 {
        return Err(GeoError::degenerate_shape("need at least 3 non-collinear points"));
    }

    let vertices: Vec<Point> = hull_indices.iter().map(|&i| points[i]).collect();
    let mut indices = Vec::with_capacity(vertices.len() - 2);
    for i in 1..vertices.len() - 1 {
        indices.push([0, i, i + 1]);
    }
    Ok(ConvexHull { vertices, indices })
}

/// Andrew's monotone chain: returns the indices of `points` on their 2D
/// convex hull, counter-clockwise, excluding any point on the boundary but
/// not at a corner.
fn monotone_chain(points: &[(usize, f64, f64)]) -> Vec<usize> {
    let mut sorted = points.to_vec();
    sorted.sort_by(|a, b| a.1.partial_cmp(&b.1).unwrap().then(a.2.partial_cmp(&b.2).unwrap()));
    if sorted.len() < 3 {
        return sorted.into_iter().map(|p| p.0).collect();
    }

    let cross = |o: (usize, f64, f64), a: (usize, f64, f64), b: (usize, f64, f64)| -> f64 {
        (a.1 - o.1) * (b.2 - o.2) - (a.2 - o.2) * (b.1 - o.1)
    };

    let mut lower: Vec<(usize, f64, f64)> = Vec::new();
    for &p in &sorted {
        while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0 {
            lower.pop();
        }
        lower.push(p);
    }

    let mut upper: Vec<(usize, f64, f64)> = Vec::new();
    for &p in sorted.iter().rev() {
        while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0 {
            upper.pop();
        }
        upper.push(p);
    }

    lower.pop();
    upper.pop();
    lower.extend(upper);
    lower.into_iter().map(|p| p.0).collect()
}

fn initial_faces(points: &[Point], tetra: [usize; 4]) -> Vec<Face> {
    let [a, b, c, d] = tetra;
    vec![
        make_face(points, a, b, c, d),
        make_face(points, a, c, d, b),
        make_face(points, a, d, b, c),
        make_face(points, b, d, c, a),
    ]
}

fn make_face(points: &[Point], v0: usize, v1: usize, v2: usize, opposite: usize) -> Face {
    let mut vertices = [v0, v1, v2];
    let mut normal = points[v1].sub(&points[v0]).cross(&points[v2].sub(&points[v0]));
    if normal.dot(&points[opposite].sub(&points[v0])) > 0.0 {
        vertices.swap(1, 2);
        normal = normal.scale(-1.0);
    }
    Face { vertices, normal: normal.normalize(), outside: Vec::new(), disabled: false }
}

fn assign_points(points: &[Point], faces: &mut [Face], tetra: &[usize; 4]) {
    for i in 0..points.len() {
        if tetra.contains(&i) {
            continue;
        }
        let mut best: Option<(usize, f64)> = None;
        for (fi, face) in faces.iter().enumerate() {
            let d = face.distance(points, i);
            if d > EPSILON && best.map_or(true, |(_, bd)| d > bd) {
                best = Some((fi, d));
            }
        }
        if let Some((fi, _)) = best {
            faces[fi].outside.push(i);
        }
    }
}

fn compact(points: &[Point], faces: Vec<Face>) -> ConvexHull {
    let mut remap: HashMap<usize, usize> = HashMap::new();
    let mut vertices = Vec::new();
    let mut indices = Vec::new();

    for face in faces.into_iter().filter(|f| !f.disabled) {
        let mut tri = [0usize; 3];
        for (slot, &orig) in tri.iter_mut().zip(face.vertices.iter()) {
            *slot = *remap.entry(orig).or_insert_with(|| {
                vertices.push(points[orig]);
                vertices.len() - 1
            });
        }
        indices.push(tri);
    }

    ConvexHull { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube_points() -> Vec<Point> {
        let mut pts = Vec::new();
        for x in [0.0, 1.0] {
            for y in [0.0, 1.0] {
                for z in [0.0, 1.0] {
                    pts.push(Point::new(x, y, z));
                }
            }
        }
        pts
    }

    #[test]
    fn cube_hull_has_eight_vertices_and_twelve_triangles() {
        let hull = build(&cube_points()).unwrap();
        assert_eq!(hull.vertices.len(), 8);
        assert_eq!(hull.indices.len(), 12);
    }

    #[test]
    fn interior_points_are_excluded_from_the_hull() {
        let mut pts = cube_points();
        pts.push(Point::new(0.5, 0.5, 0.5));
        let hull = build(&pts).unwrap();
        assert_eq!(hull.vertices.len(), 8);
        assert!(!hull.vertices.contains(&Point::new(0.5, 0.5, 0.5)));
    }

    #[test]
    fn coplanar_points_form_a_planar_polygon_instead_of_erroring() {
        // A square on z=1 with one point on its border and one strictly
        // interior; neither should survive into the hull boundary.
        let pts = vec![
            Point::new(0.0, 0.0, 1.0),
            Point::new(0.0, 5.0, 1.0),  // border midpoint, excluded
            Point::new(0.0, 10.0, 1.0),
            Point::new(10.0, 0.0, 1.0),
            Point::new(10.0, 10.0, 1.0),
            Point::new(5.0, 5.0, 1.0), // interior, excluded
        ];
        let hull = build(&pts).unwrap();
        assert_eq!(hull.vertices.len(), 4);
        assert!(!hull.vertices.contains(&Point::new(0.0, 5.0, 1.0)));
        assert!(!hull.vertices.contains(&Point::new(5.0, 5.0, 1.0)));
        assert_eq!(hull.indices.len(), 2);
    }

    #[test]
    fn collinear_points_are_rejected() {
        let pts = vec![Point::new(0.0, 0.0, 0.0), Point::new(1.0, 0.0, 0.0), Point::new(2.0, 0.0, 0.0)];
        assert!(build(&pts).is_err());
    }

    #[test]
    fn hull_faces_wind_outward() {
        let hull = build(&cube_points()).unwrap();
        let centroid = hull.vertices.iter().fold(Point::zero(), |acc, p| acc.add(p)).scale(1.0 / hull.vertices.len() as f64);
        for tri in &hull.indices {
            let [a, b, c] = *tri;
            let normal = hull.vertices[b].sub(&hull.vertices[a]).cross(&hull.vertices[c].sub(&hull.vertices[a]));
            let to_centroid = centroid.sub(&hull.vertices[a]);
            assert!(normal.dot(&to_centroid) < 0.0);
        }
    }
}
