//! Assembles the raw edge set from [`super::fortune::sweep`] into a
//! doubly-connected edge list: rays are clipped to a bounding box, shared
//! vertices are interned, and each site's boundary is walked into a
//! counter-clockwise half-edge cycle.

use crate::geometry::{Aabb, Point};
use crate::voronoi::fortune::RawEdge;

pub struct HalfEdge {
    pub origin: usize,
    pub twin: Option<usize>,
    pub next: usize,
    pub face: usize,
}

pub struct Face {
    pub site: Point,
    pub half_edge: usize,
}

/// A Voronoi diagram: interned vertices, half-edges, and one face per input
/// site, clipped to `bounds`.
pub struct Dcel {
    pub vertices: Vec<Point>,
    pub half_edges: Vec<HalfEdge>,
    pub faces: Vec<Face>,
    pub bounds: Aabb,
}

const MERGE_EPSILON: f64 = 1e-6;

struct VertexPool {
    points: Vec<Point>,
}

impl VertexPool {
    fn new() -> Self {
        Self { points: Vec::new() }
    }

    fn intern(&mut self, p: Point) -> usize {
        for (i, existing) in self.points.iter().enumerate() {
            if existing.distance(&p) < MERGE_EPSILON {
                return i;
            }
        }
        self.points.push(p);
        self.points.len() - 1
    }
}

/// Builds the final diagram from `edges` (clipping any still-growing ray
/// against `bounds`) and the per-site boundary each one traces out.
pub fn assemble(sites: &[Point], edges: &[RawEdge], bounds: Aabb) -> Dcel {
    let mut pool = VertexPool::new();

    // Each site's boundary is the set of vertices on edges touching it.
    let mut site_vertices: Vec<Vec<usize>> = vec![Vec::new(); sites.len()];

    for edge in edges {
        let start = edge.start;
        let end = edge.end.unwrap_or_else(|| clip_ray(edge.start, edge.direction, bounds));

        let v0 = pool.intern(start);
        let v1 = pool.intern(end);

        site_vertices[edge.site_left].push(v0);
        site_vertices[edge.site_left].push(v1);
        site_vertices[edge.site_right].push(v0);
        site_vertices[edge.site_right].push(v1);
    }

    let mut half_edges = Vec::new();
    let mut faces = Vec::new();
    // Maps an (ordered) vertex pair to the half-edge created for it, so the
    // second face to trace the same boundary segment can link as its twin.
    let mut edge_lookup: std::collections::HashMap<(usize, usize), usize> = std::collections::HashMap::new();

    for (site_idx, verts) in site_vertices.iter().enumerate() {
        let mut unique: Vec<usize> = Vec::new();
        for &v in verts {
            if !unique.contains(&v) {
                unique.push(v);
            }
        }
        if unique.len() < 2 {
            continue;
        }

        let site = sites[site_idx];
        unique.sort_by(|&a, &b| {
            angle_around(site, pool.points[a]).total_cmp(&angle_around(site, pool.points[b]))
        });

        let face_idx = faces.len();
        let first_half_edge = half_edges.len();

        for i in 0..unique.len() {
            let from = unique[i];
            let to = unique[(i + 1) % unique.len()];
            let this_idx = half_edges.len();
            let next_idx = if i + 1 == unique.len() { first_half_edge } else { this_idx + 1 };
            half_edges.push(HalfEdge { origin: from, twin: None, next: next_idx, face: face_idx });

            if let Some(&twin_idx) = edge_lookup.get(&(to, from)) {
                half_edges[this_idx].twin = Some(twin_idx);
                half_edges[twin_idx].twin = Some(this_idx);
            } else {
                edge_lookup.insert((from, to), this_idx);
            }
        }

        faces.push(Face { site, half_edge: first_half_edge });
    }

    Dcel { vertices: pool.points, half_edges, faces, bounds }
}

fn angle_around(center: Point, p: Point) -> f64 {
    (p.y - center.y).atan2(p.x - center.x)
}

/// Intersects the ray `start + t*direction` (`t >= 0`) with `bounds`,
/// returning the first boundary crossing.
fn clip_ray(start: Point, direction: Point, bounds: Aabb) -> Point {
    let p2 = bounds.p2();
    let mut best_t = f64::INFINITY;

    let mut consider = |t: f64| {
        if t > 1e-9 && t < best_t {
            best_t = t;
        }
    };

    if direction.x.abs() > 1e-12 {
        consider((bounds.p1.x - start.x) / direction.x);
        consider((p2.x - start.x) / direction.x);
    }
    if direction.y.abs() > 1e-12 {
        consider((bounds.p1.y - start.y) / direction.y);
        consider((p2.y - start.y) / direction.y);
    }

    if best_t.is_finite() {
        start.add(&direction.scale(best_t))
    } else {
        start
    }
}
