//! Core of the ray tracing toolkit: vectors, line segments, rays and the
//! propagation of rays through a scene of [`Deflector`]s.

pub use either;
pub use nalgebra;

use nalgebra::{Unit, Vector2, Vector3};

mod deflect;
mod error;
mod line;
mod params;
mod path;
mod ray;
mod vector;

pub use deflect::*;
pub use error::*;
pub use line::*;
pub use params::*;
pub use path::*;
pub use ray::*;
pub use vector::*;

pub type Float = f64;

pub type Vec2 = Vector2<Float>;
pub type Vec3 = Vector3<Float>;

/// A unit-length 2D direction.
pub type Dir2 = Unit<Vec2>;
