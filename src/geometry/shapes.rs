//! Concrete shape variants and the `Shape` tagged union that lets engines
//! needing dynamic dispatch (the R-tree payload slot, GJK test harnesses)
//! work over "any shape" without trait objects.

use crate::geometry::aabb::Aabb;
use crate::geometry::point::Point;
use crate::geometry::traits::{Collide, Spatial};

/// A sphere: center + radius.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Point,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: Point, radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn moved(&self, diff: Point) -> Sphere {
        Sphere::new(self.center.add(&diff), self.radius)
    }
}

impl Spatial for Sphere {
    fn point1(&self) -> Point {
        self.center.sub(&Point::new(self.radius, self.radius, self.radius))
    }

    fn bounds(&self) -> Aabb {
        let r = Point::new(self.radius, self.radius, self.radius);
        Aabb::new(self.center.sub(&r), r.scale(2.0))
    }

    fn center(&self) -> Point {
        self.center
    }
}

impl Collide for Sphere {
    fn support(&self, direction: Point) -> Point {
        self.center.add(&direction.normalize().scale(self.radius))
    }
}

/// An axis-aligned ellipsoid: center + per-axis radii.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ellipsoid {
    pub center: Point,
    pub radii: Point,
}

impl Ellipsoid {
    pub fn new(center: Point, radii: Point) -> Self {
        Self { center, radii }
    }

    pub fn moved(&self, diff: Point) -> Ellipsoid {
        Ellipsoid::new(self.center.add(&diff), self.radii)
    }
}

impl Spatial for Ellipsoid {
    fn point1(&self) -> Point {
        self.center.sub(&self.radii)
    }

    fn bounds(&self) -> Aabb {
        Aabb::new(self.center.sub(&self.radii), self.radii.scale(2.0))
    }

    fn center(&self) -> Point {
        self.center
    }
}

impl Collide for Ellipsoid {
    fn support(&self, direction: Point) -> Point {
        // support(d) = center + (R^2 . d) / |R . d|, R the per-axis radii.
        let scaled = Point::new(
            self.radii.x * self.radii.x * direction.x,
            self.radii.y * self.radii.y * direction.y,
            self.radii.z * self.radii.z * direction.z,
        );
        let denom = Point::new(self.radii.x * direction.x, self.radii.y * direction.y, self.radii.z * direction.z)
            .normal();
        if denom == 0.0 {
            self.center
        } else {
            self.center.add(&scaled.scale(1.0 / denom))
        }
    }
}

/// A line segment between two endpoints.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub a: Point,
    pub b: Point,
}

impl Line {
    pub fn new(a: Point, b: Point) -> Self {
        Self { a, b }
    }

    pub fn moved(&self, diff: Point) -> Line {
        Line::new(self.a.add(&diff), self.b.add(&diff))
    }
}

impl Spatial for Line {
    fn point1(&self) -> Point {
        self.a
    }

    fn bounds(&self) -> Aabb {
        Aabb::from_corners(self.a, self.b)
    }

    fn center(&self) -> Point {
        self.a.add(&self.b).scale(0.5)
    }
}

impl Collide for Line {
    fn support(&self, direction: Point) -> Point {
        if self.a.dot(&direction) >= self.b.dot(&direction) {
            self.a
        } else {
            self.b
        }
    }
}

/// A single triangle, given by its three vertices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    pub a: Point,
    pub b: Point,
    pub c: Point,
}

impl Triangle {
    pub fn new(a: Point, b: Point, c: Point) -> Self {
        Self { a, b, c }
    }

    pub fn moved(&self, diff: Point) -> Triangle {
        Triangle::new(self.a.add(&diff), self.b.add(&diff), self.c.add(&diff))
    }

    /// Outward-facing (CCW-wound) normal.
    pub fn normal(&self) -> Point {
        self.b.sub(&self.a).cross(&self.c.sub(&self.a)).normalize()
    }
}

impl Spatial for Triangle {
    fn point1(&self) -> Point {
        self.a
    }

    fn bounds(&self) -> Aabb {
        let lo = Point::new(
            self.a.x.min(self.b.x).min(self.c.x),
            self.a.y.min(self.b.y).min(self.c.y),
            self.a.z.min(self.b.z).min(self.c.z),
        );
        let hi = Point::new(
            self.a.x.max(self.b.x).max(self.c.x),
            self.a.y.max(self.b.y).max(self.c.y),
            self.a.z.max(self.b.z).max(self.c.z),
        );
        Aabb::from_corners(lo, hi)
    }

    fn center(&self) -> Point {
        self.a.add(&self.b).add(&self.c).scale(1.0 / 3.0)
    }
}

impl Collide for Triangle {
    fn support(&self, direction: Point) -> Point {
        furthest_point(&[self.a, self.b, self.c], direction)
    }
}

/// A convex polyhedron given by its vertex set.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyhedron {
    pub vertices: Vec<Point>,
}

impl Polyhedron {
    pub fn new(vertices: Vec<Point>) -> Self {
        Self { vertices }
    }

    pub fn moved(&self, diff: Point) -> Polyhedron {
        Polyhedron::new(self.vertices.iter().map(|v| v.add(&diff)).collect())
    }
}

impl Spatial for Polyhedron {
    fn point1(&self) -> Point {
        self.vertices.first().copied().unwrap_or_else(Point::zero)
    }

    fn bounds(&self) -> Aabb {
        bounds_of(&self.vertices)
    }

    fn center(&self) -> Point {
        centroid_of(&self.vertices)
    }
}

impl Collide for Polyhedron {
    fn support(&self, direction: Point) -> Point {
        furthest_point(&self.vertices, direction)
    }
}

/// A composite shape: the union of several sub-shapes. Its support function
/// is the sub-shape support point with the largest dot product along the
/// search direction, not a merge of bounding volumes.
#[derive(Debug, Clone, PartialEq)]
pub struct MultiObject {
    pub parts: Vec<Shape>,
}

impl MultiObject {
    pub fn new(parts: Vec<Shape>) -> Self {
        Self { parts }
    }

    pub fn moved(&self, diff: Point) -> MultiObject {
        MultiObject::new(self.parts.iter().map(|p| p.moved(diff)).collect())
    }
}

impl Spatial for MultiObject {
    fn point1(&self) -> Point {
        self.parts.first().map(|p| p.point1()).unwrap_or_else(Point::zero)
    }

    fn bounds(&self) -> Aabb {
        let mut iter = self.parts.iter();
        match iter.next() {
            Some(first) => iter.fold(first.bounds(), |acc, p| acc.union(&p.bounds())),
            None => Aabb::new(Point::zero(), Point::zero()),
        }
    }

    fn center(&self) -> Point {
        if self.parts.is_empty() {
            return Point::zero();
        }
        let sum = self
            .parts
            .iter()
            .fold(Point::zero(), |acc, p| acc.add(&p.center()));
        sum.scale(1.0 / self.parts.len() as f64)
    }
}

impl Collide for MultiObject {
    fn support(&self, direction: Point) -> Point {
        let mut best: Option<Point> = None;
        let mut best_dot = f64::NEG_INFINITY;
        for part in &self.parts {
            let candidate = part.support(direction);
            let dot = candidate.dot(&direction);
            if dot > best_dot {
                best_dot = dot;
                best = Some(candidate);
            }
        }
        best.unwrap_or_else(Point::zero)
    }
}

/// An axis-aligned box rotated about its center by Euler angles (x, y, z),
/// precomputed into a rotated vertex set for bounds/support queries.
#[derive(Debug, Clone, PartialEq)]
pub struct RotatableBox {
    pub original: Aabb,
    pub rotation: Point,
    rotated_vertices: Vec<Point>,
}

impl RotatableBox {
    pub fn new(original: Aabb, rotation: Point) -> Self {
        let center = original.center();
        let rotated_vertices = original
            .to_vertices()
            .into_iter()
            .map(|v| rotate_point(v.sub(&center), rotation).add(&center))
            .collect();
        Self {
            original,
            rotation,
            rotated_vertices,
        }
    }

    pub fn vertices(&self) -> &[Point] {
        &self.rotated_vertices
    }

    pub fn moved(&self, diff: Point) -> RotatableBox {
        RotatableBox::new(self.original.moved(diff), self.rotation)
    }
}

impl Spatial for RotatableBox {
    fn point1(&self) -> Point {
        bounds_of(&self.rotated_vertices).p1
    }

    fn bounds(&self) -> Aabb {
        bounds_of(&self.rotated_vertices)
    }

    fn center(&self) -> Point {
        self.original.center()
    }
}

impl Collide for RotatableBox {
    fn support(&self, direction: Point) -> Point {
        furthest_point(&self.rotated_vertices, direction)
    }
}

/// A static world boundary. Functions like an `Aabb` for bounds/support
/// purposes but is kept as a distinct variant so callers can distinguish
/// "the edge of the world" from ordinary box shapes when matching on
/// [`Shape`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Border {
    pub bounds: Aabb,
}

impl Border {
    pub fn new(bounds: Aabb) -> Self {
        Self { bounds }
    }

    pub fn moved(&self, diff: Point) -> Border {
        Border::new(self.bounds.moved(diff))
    }
}

impl Spatial for Border {
    fn point1(&self) -> Point {
        self.bounds.point1()
    }

    fn bounds(&self) -> Aabb {
        self.bounds
    }

    fn center(&self) -> Point {
        self.bounds.center()
    }
}

impl Collide for Border {
    fn support(&self, direction: Point) -> Point {
        self.bounds.support(direction)
    }
}

/// Tagged union over the closed shape variant set.
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Point(Point),
    Box(Aabb),
    Sphere(Sphere),
    Ellipsoid(Ellipsoid),
    Line(Line),
    Triangle(Triangle),
    Polyhedron(Polyhedron),
    MultiObject(MultiObject),
    RotatableBox(RotatableBox),
    Border(Border),
}

impl Shape {
    /// Translate this shape by `diff`, returning a new shape of the same
    /// variant.
    pub fn moved(&self, diff: Point) -> Shape {
        match self {
            Shape::Point(p) => Shape::Point(p.add(&diff)),
            Shape::Box(b) => Shape::Box(b.moved(diff)),
            Shape::Sphere(s) => Shape::Sphere(s.moved(diff)),
            Shape::Ellipsoid(e) => Shape::Ellipsoid(e.moved(diff)),
            Shape::Line(l) => Shape::Line(l.moved(diff)),
            Shape::Triangle(t) => Shape::Triangle(t.moved(diff)),
            Shape::Polyhedron(p) => Shape::Polyhedron(p.moved(diff)),
            Shape::MultiObject(m) => Shape::MultiObject(m.moved(diff)),
            Shape::RotatableBox(r) => Shape::RotatableBox(r.moved(diff)),
            Shape::Border(b) => Shape::Border(b.moved(diff)),
        }
    }
}

impl Spatial for Shape {
    fn point1(&self) -> Point {
        match self {
            Shape::Point(p) => *p,
            Shape::Box(b) => b.point1(),
            Shape::Sphere(s) => s.point1(),
            Shape::Ellipsoid(e) => e.point1(),
            Shape::Line(l) => l.point1(),
            Shape::Triangle(t) => t.point1(),
            Shape::Polyhedron(p) => p.point1(),
            Shape::MultiObject(m) => m.point1(),
            Shape::RotatableBox(r) => r.point1(),
            Shape::Border(b) => b.point1(),
        }
    }

    fn bounds(&self) -> Aabb {
        match self {
            Shape::Point(p) => Aabb::new(*p, Point::zero()),
            Shape::Box(b) => b.bounds(),
            Shape::Sphere(s) => s.bounds(),
            Shape::Ellipsoid(e) => e.bounds(),
            Shape::Line(l) => l.bounds(),
            Shape::Triangle(t) => t.bounds(),
            Shape::Polyhedron(p) => p.bounds(),
            Shape::MultiObject(m) => m.bounds(),
            Shape::RotatableBox(r) => r.bounds(),
            Shape::Border(b) => b.bounds(),
        }
    }

    fn center(&self) -> Point {
        match self {
            Shape::Point(p) => *p,
            Shape::Box(b) => b.center(),
            Shape::Sphere(s) => s.center(),
            Shape::Ellipsoid(e) => e.center(),
            Shape::Line(l) => l.center(),
            Shape::Triangle(t) => t.center(),
            Shape::Polyhedron(p) => p.center(),
            Shape::MultiObject(m) => m.center(),
            Shape::RotatableBox(r) => r.center(),
            Shape::Border(b) => b.center(),
        }
    }
}

impl Collide for Shape {
    fn support(&self, direction: Point) -> Point {
        match self {
            Shape::Point(p) => *p,
            Shape::Box(b) => b.support(direction),
            Shape::Sphere(s) => s.support(direction),
            Shape::Ellipsoid(e) => e.support(direction),
            Shape::Line(l) => l.support(direction),
            Shape::Triangle(t) => t.support(direction),
            Shape::Polyhedron(p) => p.support(direction),
            Shape::MultiObject(m) => m.support(direction),
            Shape::RotatableBox(r) => r.support(direction),
            Shape::Border(b) => b.support(direction),
        }
    }
}

/// Shared helper: the vertex with maximum dot product along `direction`.
pub(crate) fn furthest_point(vertices: &[Point], direction: Point) -> Point {
    let mut best = vertices.first().copied().unwrap_or_else(Point::zero);
    let mut best_dot = best.dot(&direction);
    for &v in vertices.iter().skip(1) {
        let d = v.dot(&direction);
        if d > best_dot {
            best_dot = d;
            best = v;
        }
    }
    best
}

fn bounds_of(vertices: &[Point]) -> Aabb {
    if vertices.is_empty() {
        return Aabb::new(Point::zero(), Point::zero());
    }
    let mut lo = vertices[0];
    let mut hi = vertices[0];
    for &v in &vertices[1..] {
        lo = Point::new(lo.x.min(v.x), lo.y.min(v.y), lo.z.min(v.z));
        hi = Point::new(hi.x.max(v.x), hi.y.max(v.y), hi.z.max(v.z));
    }
    Aabb::from_corners(lo, hi)
}

fn centroid_of(vertices: &[Point]) -> Point {
    if vertices.is_empty() {
        return Point::zero();
    }
    let sum = vertices.iter().fold(Point::zero(), |acc, v| acc.add(v));
    sum.scale(1.0 / vertices.len() as f64)
}

fn rotate_point(p: Point, angles: Point) -> Point {
    // Rotate about X, then Y, then Z (extrinsic), matching the rotation
    // convention the original game-logic collaborator expects.
    let (sx, cx) = angles.x.sin_cos();
    let after_x = Point::new(p.x, p.y * cx - p.z * sx, p.y * sx + p.z * cx);

    let (sy, cy) = angles.y.sin_cos();
    let after_y = Point::new(
        after_x.x * cy + after_x.z * sy,
        after_x.y,
        -after_x.x * sy + after_x.z * cy,
    );

    let (sz, cz) = angles.z.sin_cos();
    Point::new(
        after_y.x * cz - after_y.y * sz,
        after_y.x * sz + after_y.y * cz,
        after_y.z,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sphere_support_is_on_surface() {
        let s = Sphere::new(Point::zero(), 5.0);
        let p = s.support(Point::new(1.0, 0.0, 0.0));
        assert_eq!(p, Point::new(5.0, 0.0, 0.0));
    }

    #[test]
    fn multi_object_support_picks_max_dot() {
        let a = Shape::Sphere(Sphere::new(Point::new(-10.0, 0.0, 0.0), 1.0));
        let b = Shape::Sphere(Sphere::new(Point::new(10.0, 0.0, 0.0), 1.0));
        let multi = MultiObject::new(vec![a, b]);
        let support = multi.support(Point::new(1.0, 0.0, 0.0));
        assert_eq!(support, Point::new(11.0, 0.0, 0.0));
    }

    #[test]
    fn rotatable_box_preserves_volume_under_rotation() {
        let base = Aabb::new(Point::new(-1.0, -1.0, -1.0), Point::new(2.0, 2.0, 2.0));
        let rotated = RotatableBox::new(base, Point::new(0.3, 0.5, 0.1));
        // Bounding box of a rotated cube must be at least as large as the
        // original in every axis.
        let b = rotated.bounds();
        assert!(b.sizes.x >= base.sizes.x - 1e-9);
    }

    #[test]
    fn shape_move_round_trips() {
        let s = Shape::Sphere(Sphere::new(Point::new(1.0, 1.0, 1.0), 2.0));
        let moved = s.moved(Point::new(1.0, 0.0, 0.0)).moved(Point::new(-1.0, 0.0, 0.0));
        assert_eq!(moved, s);
    }
}
