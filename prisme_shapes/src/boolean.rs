//! Boolean operations on outlines, by sweeping around a shape's center.
//!
//! The outline of the primary shape is cut at every point where it crosses
//! another shape, and each piece is kept or dropped depending on whether
//! it's midpoint lies inside the others. This only makes sense for shapes
//! whose outline is a function of the angle around their center: circles and
//! rectangles.

use super::*;

use core::f64::consts::TAU;
use log::trace;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BooleanOp {
    /// Keep the parts of the outline outside every other shape.
    Union,
    /// Same as [`Self::Union`], also dropping the parts outside the rectangle.
    UnionClippedTo(Rectangle),
    /// Keep the parts of the outline inside at least one other shape.
    Intersect,
    /// Keep the parts of the outline inside every other shape.
    IntersectAll,
}

impl BooleanOp {
    fn keeps(&self, p: &Vec2, others: &[&Shape]) -> bool {
        let mut inside = others.iter().map(|s| s.contains(p));

        match self {
            Self::Union => !inside.any(|b| b),
            Self::UnionClippedTo(clip) => !inside.any(|b| b) && clip.contains(p),
            Self::Intersect => inside.any(|b| b),
            Self::IntersectAll => inside.all(|b| b),
        }
    }
}

/// The parts of the outline of `primary` selected by `op` against `others`.
///
/// `primary` itself may be one of `others`, it is then ignored (compared by address).
/// If the outlines cross at less than two points, or `primary` is neither a circle
/// nor a rectangle, the whole outline of `primary` is returned.
#[must_use]
pub fn boolean(primary: &Shape, others: &[Shape], op: &BooleanOp) -> BezierPath {
    let others: Vec<&Shape> = others
        .iter()
        .filter(|s| !core::ptr::eq(*s, primary))
        .collect();

    if !matches!(primary, Shape::Circle(_) | Shape::Rectangle(_)) {
        return primary.to_path();
    }

    let mut points = Vec::new();
    for other in &others {
        for p in primary.intersections(other) {
            push_unique(&mut points, p);
        }
    }

    if let BooleanOp::UnionClippedTo(clip) = op {
        for p in primary.intersections(&Shape::Rectangle(*clip)) {
            push_unique(&mut points, p);
        }
    }

    if points.len() < 2 {
        trace!("{} intersections, keeping the whole outline", points.len());
        return primary.to_path();
    }

    let center = primary.center();

    let mut angles: Vec<Float> = points
        .iter()
        .map(|p| (p - center).polar_angle())
        .collect();
    angles.sort_by(Float::total_cmp);
    angles.push(angles[0] + TAU);

    let mut path = BezierPath::new();
    let mut kept_all = true;

    for w in angles.windows(2) {
        let (start, end) = (w[0], w[1]);
        let mid = primary.boundary_point((start + end) / 2.);

        if op.keeps(&mid, &others) {
            path = outline_between(path, primary, start, end);
        } else {
            kept_all = false;
        }
    }

    if kept_all {
        path.close()
    } else {
        path
    }
}

/// Applies `op` to every shape of `shapes`, against all the others.
#[must_use]
pub fn boolean_all(shapes: &[Shape], op: &BooleanOp) -> Vec<BezierPath> {
    shapes.iter().map(|s| boolean(s, shapes, op)).collect()
}

/// Appends the outline of `shape` going counter-clockwise from `start` to `end`.
fn outline_between(path: BezierPath, shape: &Shape, start: Float, end: Float) -> BezierPath {
    match shape {
        Shape::Circle(c) => path.arc(c.center, c.effective_radius(), start, end),
        Shape::Rectangle(r) => {
            let center = r.center();

            let mut corners: Vec<(Float, Vec2)> = r
                .corners()
                .into_iter()
                .map(|p| {
                    let mut angle = (p - center).polar_angle();
                    while angle <= start {
                        angle += TAU;
                    }
                    (angle, p)
                })
                .filter(|(angle, _)| *angle < end)
                .collect();
            corners.sort_by(|a, b| a.0.total_cmp(&b.0));

            let from = r.boundary_point(start);
            let path = match path.current_point() {
                Some(p) if (p - from).norm() <= POINT_EPS => path,
                _ => path.move_to(from),
            };

            corners
                .into_iter()
                .map(|(_, p)| p)
                .chain([r.boundary_point(end)])
                .fold(path, |path, p| path.line_to(p))
        }
        _ => path,
    }
}
