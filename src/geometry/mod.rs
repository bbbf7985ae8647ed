//! Geometry substrate shared by every engine: points, AABBs, and the closed
//! set of collidable shapes.

pub mod aabb;
pub mod point;
pub mod shapes;
pub mod traits;

pub use aabb::Aabb;
pub use point::{approximately_equal, Point, DEFAULT_EPSILON};
pub use shapes::{Border, Ellipsoid, Line, MultiObject, Polyhedron, RotatableBox, Shape, Sphere, Triangle};
pub use traits::{Collide, Spatial};
