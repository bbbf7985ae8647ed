//! Voronoi diagrams via Fortune's sweep-line algorithm.
//!
//! [`build`] runs the sweep ([`fortune::sweep`]) and clips the resulting
//! rays into a bounded doubly-connected edge list ([`dcel::assemble`]).

mod dcel;
mod fortune;

pub use dcel::{Dcel, Face, HalfEdge};

use crate::error::{GeoError, Result};
use crate::geometry::{Aabb, Point};

/// Builds the Voronoi diagram of `sites`, clipped to `bounds`. Requires at
/// least 2 distinct sites; `bounds` must be supplied by the caller (it is
/// not derived from the sites) since a region of interest is generally wider
/// than the sites' own extent.
pub fn build(sites: &[Point], bounds: Aabb) -> Result<Dcel> {
    if sites.len() < 2 {
        return Err(GeoError::degenerate_shape("need at least 2 sites to build a Voronoi diagram"));
    }

    let (edges, _vertices) = fortune::sweep(sites);
    Ok(dcel::assemble(sites, &edges, bounds))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn two_sites_produce_two_faces() {
        let sites = vec![Point::new2(0.0, 0.0), Point::new2(10.0, 0.0)];
        let bounds = Aabb::from_corners(Point::new2(-50.0, -50.0), Point::new2(50.0, 50.0));
        let diagram = build(&sites, bounds).unwrap();
        assert_eq!(diagram.faces.len(), 2);
    }

    #[test]
    fn three_sites_produce_one_vertex_equidistant_from_all() {
        let sites = vec![Point::new2(0.0, 0.0), Point::new2(10.0, 0.0), Point::new2(5.0, 10.0)];
        let bounds = Aabb::from_corners(Point::new2(-50.0, -50.0), Point::new2(50.0, 50.0));
        let diagram = build(&sites, bounds).unwrap();
        assert_eq!(diagram.faces.len(), 3);
        // Every face should trace at least a couple of boundary vertices.
        for face in &diagram.faces {
            let mut count = 0;
            let mut he = face.half_edge;
            loop {
                count += 1;
                he = diagram.half_edges[he].next;
                if he == face.half_edge || count > 16 {
                    break;
                }
            }
            assert!(count >= 2);
        }
    }

    #[test]
    fn grid_of_sites_has_a_face_per_site() {
        let mut sites = Vec::new();
        for x in 0..4 {
            for y in 0..4 {
                sites.push(Point::new2(x as f64 * 3.0, y as f64 * 3.0));
            }
        }
        let bounds = Aabb::from_corners(Point::new2(-50.0, -50.0), Point::new2(50.0, 50.0));
        let diagram = build(&sites, bounds).unwrap();
        assert_eq!(diagram.faces.len(), 16);
    }

    #[test]
    fn too_few_sites_is_rejected() {
        let bounds = Aabb::from_corners(Point::new2(-50.0, -50.0), Point::new2(50.0, 50.0));
        assert!(build(&[Point::zero()], bounds).is_err());
    }
}
