//! Shapes rays can bump into, pairwise intersections between them,
//! boolean operations on their outlines, and emitters casting rays through them.

mod bezier;
mod boolean;
mod circle;
mod emitter;
mod intersect;
mod object;
mod rectangle;
mod scene;
mod shape;

pub use bezier::*;
pub use boolean::*;
pub use circle::*;
pub use emitter::*;
pub use intersect::*;
pub use object::*;
pub use rectangle::*;
pub use scene::*;
pub use shape::*;

use arrayvec::ArrayVec;
use prisme::*;

/// Two points closer than this are considered the same.
pub const POINT_EPS: Float = 1e-9;
