//! Fortune's sweep: a status structure of beach-line arcs and a priority
//! queue of site/circle events, producing the raw edge set a Voronoi
//! diagram is built from.
//!
//! The sweep line moves from high `y` to low `y`. Arcs are kept in a plain
//! `Vec` in left-to-right order rather than a balanced tree — simpler to get
//! right, and the engine's target sizes (hundreds to low thousands of
//! sites) don't make the O(n) neighbor scan a bottleneck worth the
//! complexity of a self-balancing beach line.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::geometry::Point;

/// An edge of the (unclipped) Voronoi diagram: the perpendicular bisector
/// of `site_left`/`site_right`, bounded by `start` and, once a circle event
/// fixes it, `end`. While `end` is `None` the edge is still growing in
/// `direction`.
#[derive(Debug, Clone, Copy)]
pub struct RawEdge {
    pub site_left: usize,
    pub site_right: usize,
    pub start: Point,
    pub direction: Point,
    pub end: Option<Point>,
}

struct ArcRecord {
    site: usize,
    circle_event: Option<usize>,
    left_edge: Option<usize>,
    right_edge: Option<usize>,
}

#[derive(Clone, Copy)]
struct HeapKey {
    y: f64,
    x: f64,
    event: usize,
}

impl PartialEq for HeapKey {
    fn eq(&self, other: &Self) -> bool {
        self.y == other.y && self.x == other.x
    }
}
impl Eq for HeapKey {}
impl PartialOrd for HeapKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
impl Ord for HeapKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.y.total_cmp(&other.y).then_with(|| self.x.total_cmp(&other.x))
    }
}

enum EventKind {
    Site(usize),
    Circle { arc: usize, center: Point },
}

struct Event {
    kind: EventKind,
    valid: bool,
}

/// Runs the sweep over `sites`, returning the raw edge list and the finite
/// Voronoi vertices discovered at circle events.
pub fn sweep(sites: &[Point]) -> (Vec<RawEdge>, Vec<Point>) {
    let mut arcs: Vec<ArcRecord> = Vec::new();
    let mut beachline: Vec<usize> = Vec::new();
    let mut edges: Vec<RawEdge> = Vec::new();
    let mut vertices: Vec<Point> = Vec::new();
    let mut events: Vec<Event> = Vec::new();
    let mut heap: BinaryHeap<HeapKey> = BinaryHeap::new();

    for (i, site) in sites.iter().enumerate() {
        let event_idx = events.len();
        events.push(Event { kind: EventKind::Site(i), valid: true });
        heap.push(HeapKey { y: site.y, x: site.x, event: event_idx });
    }

    while let Some(key) = heap.pop() {
        if !events[key.event].valid {
            continue;
        }
        events[key.event].valid = false;
        match events[key.event].kind {
            EventKind::Site(site_idx) => {
                handle_site_event(
                    site_idx,
                    sites,
                    &mut arcs,
                    &mut beachline,
                    &mut edges,
                    &mut events,
                    &mut heap,
                );
            }
            EventKind::Circle { arc, center } => {
                handle_circle_event(
                    arc,
                    center,
                    sites,
                    &mut arcs,
                    &mut beachline,
                    &mut edges,
                    &mut vertices,
                    &mut events,
                    &mut heap,
                );
            }
        }
    }

    // Any edge still growing never met a circle event; leave `end` as
    // `None` for the caller to clip against a bounding box.
    (edges, vertices)
}

fn handle_site_event(
    site_idx: usize,
    sites: &[Point],
    arcs: &mut Vec<ArcRecord>,
    beachline: &mut Vec<usize>,
    edges: &mut Vec<RawEdge>,
    events: &mut Vec<Event>,
    heap: &mut BinaryHeap<HeapKey>,
) {
    let site = sites[site_idx];

    if beachline.is_empty() {
        let arc_id = arcs.len();
        arcs.push(ArcRecord { site: site_idx, circle_event: None, left_edge: None, right_edge: None });
        beachline.push(arc_id);
        return;
    }

    let sweep_y = site.y;
    let above = find_arc_above(beachline, arcs, sites, site.x, sweep_y);
    let above_arc = above;
    let above_site = sites[arcs[beachline[above_arc]].site];

    // Invalidate the circle event the split arc was waiting on, if any.
    if let Some(ev) = arcs[beachline[above_arc]].circle_event.take() {
        events[ev].valid = false;
    }

    // Split `above` into (above_site, new_site, above_site), connected by
    // two new edges growing from the same breakpoint.
    let edge_dir = bisector_direction(above_site, site);
    let start = Point::new(site.x, parabola_y(above_site, site.x, sweep_y), 0.0);

    let left_edge_id = edges.len();
    edges.push(RawEdge { site_left: arcs[beachline[above_arc]].site, site_right: site_idx, start, direction: edge_dir, end: None });
    let right_edge_id = edges.len();
    edges.push(RawEdge {
        site_left: site_idx,
        site_right: arcs[beachline[above_arc]].site,
        start,
        direction: edge_dir.scale(-1.0),
        end: None,
    });

    let left_copy_id = arcs.len();
    arcs.push(ArcRecord {
        site: arcs[beachline[above_arc]].site,
        circle_event: None,
        left_edge: arcs[beachline[above_arc]].left_edge,
        right_edge: Some(left_edge_id),
    });
    let new_arc_id = arcs.len();
    arcs.push(ArcRecord { site: site_idx, circle_event: None, left_edge: Some(left_edge_id), right_edge: Some(right_edge_id) });
    let right_copy_id = arcs.len();
    let original_right_edge = arcs[beachline[above_arc]].right_edge;
    arcs.push(ArcRecord { site: arcs[beachline[above_arc]].site, circle_event: None, left_edge: Some(right_edge_id), right_edge: original_right_edge });

    beachline.splice(above_arc..=above_arc, [left_copy_id, new_arc_id, right_copy_id]);

    check_circle_event(above_arc, beachline, arcs, sites, sweep_y, events, heap);
    check_circle_event(above_arc + 2, beachline, arcs, sites, sweep_y, events, heap);
}

fn handle_circle_event(
    arc_id: usize,
    vertex: Point,
    sites: &[Point],
    arcs: &mut Vec<ArcRecord>,
    beachline: &mut Vec<usize>,
    edges: &mut Vec<RawEdge>,
    vertices: &mut Vec<Point>,
    events: &mut Vec<Event>,
    heap: &mut BinaryHeap<HeapKey>,
) {
    let Some(pos) = beachline.iter().position(|&id| id == arc_id) else { return };
    if pos == 0 || pos + 1 >= beachline.len() {
        return;
    }

    let vertex_idx = vertices.len();
    vertices.push(vertex);

    let left_id = beachline[pos - 1];
    let right_id = beachline[pos + 1];

    if let Some(e) = arcs[arc_id].left_edge {
        edges[e].end = Some(vertex);
    }
    if let Some(e) = arcs[arc_id].right_edge {
        edges[e].end = Some(vertex);
    }

    for &neighbor in &[left_id, right_id] {
        if let Some(ev) = arcs[neighbor].circle_event.take() {
            events[ev].valid = false;
        }
    }

    beachline.remove(pos);

    let new_edge_id = edges.len();
    let left_site = sites[arcs[left_id].site];
    let right_site = sites[arcs[right_id].site];
    edges.push(RawEdge {
        site_left: arcs[left_id].site,
        site_right: arcs[right_id].site,
        start: vertex,
        direction: bisector_direction(left_site, right_site),
        end: None,
    });
    arcs[left_id].right_edge = Some(new_edge_id);
    arcs[right_id].left_edge = Some(new_edge_id);

    let _ = vertex_idx;

    if pos >= 1 {
        check_circle_event(pos - 1, beachline, arcs, sites, vertex.y, events, heap);
    }
    if pos < beachline.len() {
        check_circle_event(pos, beachline, arcs, sites, vertex.y, events, heap);
    }
}

/// Schedules a circle event for the arc at beachline position `idx` if its
/// immediate neighbors converge below the current sweep line.
fn check_circle_event(
    idx: usize,
    beachline: &[usize],
    arcs: &mut Vec<ArcRecord>,
    sites: &[Point],
    sweep_y: f64,
    events: &mut Vec<Event>,
    heap: &mut BinaryHeap<HeapKey>,
) {
    if idx == 0 || idx + 1 >= beachline.len() {
        return;
    }
    let left = sites[arcs[beachline[idx - 1]].site];
    let mid = sites[arcs[beachline[idx]].site];
    let right = sites[arcs[beachline[idx + 1]].site];

    let Some((center, radius)) = circumcenter_and_radius(left, mid, right) else { return };
    let event_y = center.y - radius;
    if event_y > sweep_y + 1e-9 {
        // Converges above the sweep line: already happened or numerically
        // invalid, not a future event.
        return;
    }

    let arc_id = beachline[idx];
    let event_idx = events.len();
    events.push(Event { kind: EventKind::Circle { arc: arc_id, center }, valid: true });
    arcs[arc_id].circle_event = Some(event_idx);
    heap.push(HeapKey { y: event_y, x: center.x, event: event_idx });
}

/// The center and radius of the circle through three sites, `None` if the
/// three points don't converge (collinear, or the middle site's arc can
/// never vanish — left-to-right turn is not a right turn).
fn circumcenter_and_radius(a: Point, b: Point, c: Point) -> Option<(Point, f64)> {
    // Only a clockwise (left, mid, right) turn corresponds to a beach-line
    // arc that can be squeezed out; a counter-clockwise turn never converges.
    let cross = (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x);
    if cross >= 0.0 {
        return None;
    }

    let ax2ay2 = a.x * a.x + a.y * a.y;
    let bx2by2 = b.x * b.x + b.y * b.y;
    let cx2cy2 = c.x * c.x + c.y * c.y;

    let d = 2.0 * (a.x * (b.y - c.y) + b.x * (c.y - a.y) + c.x * (a.y - b.y));
    if d.abs() < 1e-12 {
        return None;
    }

    let ux = (ax2ay2 * (b.y - c.y) + bx2by2 * (c.y - a.y) + cx2cy2 * (a.y - b.y)) / d;
    let uy = (ax2ay2 * (c.x - b.x) + bx2by2 * (a.x - c.x) + cx2cy2 * (b.x - a.x)) / d;
    let center = Point::new(ux, uy, 0.0);
    let radius = center.distance(&a);
    Some((center, radius))
}

/// The beach-line position whose arc currently lies above `x` at sweep
/// height `sweep_y` (linear scan over breakpoints).
fn find_arc_above(beachline: &[usize], arcs: &[ArcRecord], sites: &[Point], x: f64, sweep_y: f64) -> usize {
    for i in 0..beachline.len() - 1 {
        let left_site = sites[arcs[beachline[i]].site];
        let right_site = sites[arcs[beachline[i + 1]].site];
        let bp = breakpoint_x(left_site, right_site, sweep_y);
        if x < bp {
            return i;
        }
    }
    beachline.len() - 1
}

/// The x-coordinate at which the parabolas of `p1` (left) and `p2` (right)
/// cross, given sweep line `directrix`.
fn breakpoint_x(p1: Point, p2: Point, directrix: f64) -> f64 {
    let d1 = 2.0 * (p1.y - directrix);
    let d2 = 2.0 * (p2.y - directrix);

    if d1.abs() < 1e-9 {
        return p1.x;
    }
    if d2.abs() < 1e-9 {
        return p2.x;
    }
    if (p1.y - p2.y).abs() < 1e-9 {
        return (p1.x + p2.x) / 2.0;
    }

    let a = 1.0 / d1 - 1.0 / d2;
    let b = -2.0 * (p1.x / d1 - p2.x / d2);
    let c = (p1.x * p1.x + p1.y * p1.y - directrix * directrix) / d1 - (p2.x * p2.x + p2.y * p2.y - directrix * directrix) / d2;

    let disc = (b * b - 4.0 * a * c).max(0.0).sqrt();
    let x1 = (-b + disc) / (2.0 * a);
    let x2 = (-b - disc) / (2.0 * a);
    if p1.y < p2.y {
        x1.max(x2)
    } else {
        x1.min(x2)
    }
}

/// The y-coordinate of the parabola focused at `site` at horizontal
/// position `x`, given sweep line `directrix`.
fn parabola_y(site: Point, x: f64, directrix: f64) -> f64 {
    let dp = 2.0 * (site.y - directrix);
    if dp.abs() < 1e-9 {
        return site.y;
    }
    ((x - site.x).powi(2) + site.y * site.y - directrix * directrix) / dp
}

/// A unit vector perpendicular to the segment `a -> b`, oriented to point
/// away from the swept (upper) region so newly grown edges head downward.
fn bisector_direction(a: Point, b: Point) -> Point {
    let d = b.sub(&a);
    let perp = Point::new(d.y, -d.x, 0.0).normalize();
    if perp.y <= 0.0 {
        perp
    } else {
        perp.scale(-1.0)
    }
}
