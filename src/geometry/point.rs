//! Point / vector primitive shared by every engine in this crate.
//!
//! `Point` is the one vector type the rest of the crate builds on. It is
//! deliberately not a thin wrapper over a linear-algebra crate: several of its
//! operations have contract details (division by zero, zero-vector
//! normalization) that a general-purpose vector type does not give us for
//! free, so we carry them explicitly the way the reference codebase's own
//! `Vector2D`/`Vector3D` types do.

use std::ops::{Add, Div, Mul, Neg, Sub};

/// Default epsilon used by [`Point::approx_equal`] and throughout the crate
/// wherever a caller does not supply their own precision.
pub const DEFAULT_EPSILON: f64 = 1e-9;

/// A point (or free vector) in 3-space. 2D callers simply leave `z` at zero;
/// every operation here treats `z` like any other coordinate, so 2D shapes
/// and 3D shapes share one representation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    /// Construct from all three coordinates.
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Construct a 2D point; `z` defaults to 0.
    pub fn new2(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Construct from a single coordinate; `y` and `z` default to 0.
    pub fn new1(x: f64) -> Self {
        Self { x, y: 0.0, z: 0.0 }
    }

    /// The zero vector.
    pub fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Coordinate accessor by index; out-of-range indices read as 0 rather
    /// than panicking, matching the capability contract in the spec.
    pub fn coordinate(&self, i: usize) -> f64 {
        match i {
            0 => self.x,
            1 => self.y,
            2 => self.z,
            _ => 0.0,
        }
    }

    /// The three coordinates as a tuple.
    pub fn coordinates(&self) -> (f64, f64, f64) {
        (self.x, self.y, self.z)
    }

    /// Component-wise addition.
    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    /// Component-wise subtraction.
    pub fn sub(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    /// Uniform scale.
    pub fn scale(&self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor, self.z * factor)
    }

    /// Component-wise multiplication.
    pub fn multiply(&self, other: &Point) -> Point {
        Point::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }

    /// Component-wise division. A component of `other` that is zero leaves
    /// the corresponding component of `self` unchanged rather than producing
    /// infinity or NaN.
    pub fn divide(&self, other: &Point) -> Point {
        Point::new(
            if other.x != 0.0 { self.x / other.x } else { self.x },
            if other.y != 0.0 { self.y / other.y } else { self.y },
            if other.z != 0.0 { self.z / other.z } else { self.z },
        )
    }

    /// Dot product.
    pub fn dot(&self, other: &Point) -> f64 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// 3D cross product.
    pub fn cross(&self, other: &Point) -> Point {
        Point::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Squared magnitude (`normal_square` in the spec's vocabulary).
    pub fn normal_square(&self) -> f64 {
        self.dot(self)
    }

    /// Magnitude (`normal` in the spec's vocabulary).
    pub fn normal(&self) -> f64 {
        self.normal_square().sqrt()
    }

    /// Normalize to unit length. The zero vector normalizes to itself rather
    /// than dividing by zero.
    pub fn normalize(&self) -> Point {
        let len = self.normal();
        if len == 0.0 {
            *self
        } else {
            self.scale(1.0 / len)
        }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        self.sub(other).normal()
    }

    /// Manhattan (L1) distance to another point.
    pub fn manhattan_distance(&self, other: &Point) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs() + (self.z - other.z).abs()
    }

    /// Round every component to the nearest multiple of `precision`.
    pub fn round(&self, precision: f64) -> Point {
        if precision == 0.0 {
            return *self;
        }
        Point::new(
            (self.x / precision).round() * precision,
            (self.y / precision).round() * precision,
            (self.z / precision).round() * precision,
        )
    }

    /// Reflect this vector across a surface with the given (not necessarily
    /// unit) normal.
    pub fn reflect(&self, normal: &Point) -> Point {
        let n = normal.normalize();
        self.sub(&n.scale(2.0 * self.dot(&n)))
    }

    /// Refract this (incident, unit) vector through a surface with the given
    /// unit normal and ratio of refractive indices `eta`. Returns the zero
    /// vector on total internal reflection.
    pub fn refract(&self, normal: &Point, eta: f64) -> Point {
        let n = normal.normalize();
        let cos_i = -self.dot(&n);
        let sin_t2 = eta * eta * (1.0 - cos_i * cos_i);
        if sin_t2 > 1.0 {
            return Point::zero();
        }
        let cos_t = (1.0 - sin_t2).sqrt();
        self.scale(eta).add(&n.scale(eta * cos_i - cos_t))
    }

    /// Approximate equality using the supplied epsilon, compared
    /// per-component as the spec's precision helper requires.
    pub fn approx_equal(&self, other: &Point, epsilon: f64) -> bool {
        (self.x - other.x).abs() < epsilon
            && (self.y - other.y).abs() < epsilon
            && (self.z - other.z).abs() < epsilon
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, rhs: Point) -> Point {
        Point::add(&self, &rhs)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, rhs: Point) -> Point {
        Point::sub(&self, &rhs)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, rhs: f64) -> Point {
        self.scale(rhs)
    }
}

impl Div<f64> for Point {
    type Output = Point;
    fn div(self, rhs: f64) -> Point {
        if rhs == 0.0 {
            self
        } else {
            self.scale(1.0 / rhs)
        }
    }
}

impl Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y, -self.z)
    }
}

/// Approximate-equality helper exposed to collaborators per §6: any caller
/// that needs to compare two floats without pulling in the whole crate can
/// use this free function with the documented default epsilon.
pub fn approximately_equal(a: f64, b: f64, epsilon: f64) -> bool {
    (a - b).abs() < epsilon
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn coordinate_out_of_range_reads_zero() {
        let p = Point::new(1.0, 2.0, 3.0);
        assert_eq!(p.coordinate(5), 0.0);
        assert_eq!(p.coordinate(2), 3.0);
    }

    #[test]
    fn divide_by_zero_component_leaves_unchanged() {
        let a = Point::new(4.0, 9.0, 2.0);
        let b = Point::new(2.0, 0.0, 1.0);
        let result = a.divide(&b);
        assert_eq!(result, Point::new(2.0, 9.0, 2.0));
    }

    #[test]
    fn normalize_zero_is_zero() {
        assert_eq!(Point::zero().normalize(), Point::zero());
    }

    #[test]
    fn normalize_unit_length() {
        let p = Point::new(3.0, 4.0, 0.0);
        assert_relative_eq!(p.normalize().normal(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn cross_product_right_handed() {
        let x = Point::new(1.0, 0.0, 0.0);
        let y = Point::new(0.0, 1.0, 0.0);
        assert_eq!(x.cross(&y), Point::new(0.0, 0.0, 1.0));
    }

    #[test]
    fn manhattan_vs_euclidean() {
        let a = Point::zero();
        let b = Point::new(3.0, 4.0, 0.0);
        assert_eq!(a.manhattan_distance(&b), 7.0);
        assert_eq!(a.distance(&b), 5.0);
    }

    #[test]
    fn round_to_precision() {
        let p = Point::new(1.23, 4.56, 7.89);
        assert_eq!(p.round(0.1), Point::new(1.2, 4.6, 7.9));
    }

    #[test]
    fn reflect_off_flat_surface() {
        let incoming = Point::new(1.0, -1.0, 0.0);
        let normal = Point::new(0.0, 1.0, 0.0);
        let reflected = incoming.reflect(&normal);
        assert_relative_eq!(reflected.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(reflected.y, 1.0, epsilon = 1e-12);
    }
}
