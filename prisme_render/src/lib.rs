//! Drawing shapes, rays and whole scenes through an explicit [`DrawContext`],
//! onto any [`Canvas`] backend.

use std::{rc::Rc, sync::Arc};

use prisme::*;
use prisme_shapes::*;

mod canvas;
mod document;
mod error;
mod recording;
mod renderable;
mod style;

pub use canvas::*;
pub use document::*;
pub use error::*;
pub use recording::*;
pub use renderable::*;
pub use style::*;

pub use prisme;
pub use prisme_shapes;
pub use svg;
