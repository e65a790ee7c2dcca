//! Pairwise intersection points between shapes.
//!
//! Degenerate inputs (parallel or zero-length lines, concentric circles...)
//! simply have no intersections.

use super::*;

/// Pushes `p` unless a point closer than [`POINT_EPS`] is already present.
///
/// Shapes made of several segments report crossings at shared corners twice.
#[inline]
pub fn push_unique(points: &mut Vec<Vec2>, p: Vec2) {
    if points.iter().all(|q| (q - p).norm() > POINT_EPS) {
        points.push(p);
    }
}

/// The point where both segments cross, if any.
#[inline]
#[must_use]
pub fn line_line(a: &Line, b: &Line) -> Option<Vec2> {
    a.intersection(b)
}

/// The points of the segment `line` that are on `circle`.
#[must_use]
pub fn line_circle(line: &Line, circle: &Circle) -> ArrayVec<Vec2, 2> {
    // `|start + mu * d - center|^2 = r^2`, a quadratic in `mu`
    let d = line.vector();
    let w = line.start - circle.center;
    let r = circle.effective_radius();

    let a = d.norm_squared();
    let b = 2. * d.dot(&w);
    let c = w.norm_squared() - r * r;

    let mut points = ArrayVec::new();

    if a == 0. {
        return points;
    }

    let delta = b * b - 4. * a * c;

    if delta < 0. {
        return points;
    }

    let root = delta.sqrt();
    let unit = 0.0..=1.0;

    for mu in [(-b - root) / (2. * a), (-b + root) / (2. * a)] {
        if unit.contains(&mu) {
            let p = line.at(mu);
            if points.iter().all(|q: &Vec2| (q - p).norm() > POINT_EPS) {
                points.push(p);
            }
        }
    }

    points
}

/// Both points where two circles cross, if they do. Circles touching at
/// a single point, or one containing the other, don't intersect.
#[must_use]
pub fn circle_circle(c1: &Circle, c2: &Circle) -> ArrayVec<Vec2, 2> {
    let mut points = ArrayVec::new();

    let (r1, r2) = (c1.effective_radius(), c2.effective_radius());
    let v = c2.center - c1.center;
    let d = v.norm();

    if d >= r1 + r2 || d <= (r1 - r2).abs() {
        return points;
    }

    // distance from `c1.center` to the chord joining both points
    let a = (r1 * r1 - r2 * r2 + d * d) / (2. * d);
    let h = (r1 * r1 - a * a).max(0.).sqrt();

    let u = v / d;
    let mid = c1.center + u * a;
    let offset = u.perpendicular() * h;

    points.push(mid + offset);
    points.push(mid - offset);
    points
}

fn against_edges(edges: &[Line], mut f: impl FnMut(&Line, &mut Vec<Vec2>)) -> Vec<Vec2> {
    let mut points = Vec::new();
    for edge in edges {
        f(edge, &mut points);
    }
    points
}

#[must_use]
pub fn line_polyline(line: &Line, edges: &[Line]) -> Vec<Vec2> {
    against_edges(edges, |edge, points| {
        if let Some(p) = line_line(line, edge) {
            push_unique(points, p);
        }
    })
}

#[must_use]
pub fn circle_polyline(circle: &Circle, edges: &[Line]) -> Vec<Vec2> {
    against_edges(edges, |edge, points| {
        for p in line_circle(edge, circle) {
            push_unique(points, p);
        }
    })
}

#[must_use]
pub fn polyline_polyline(a: &[Line], b: &[Line]) -> Vec<Vec2> {
    against_edges(a, |edge, points| {
        for p in line_polyline(edge, b) {
            push_unique(points, p);
        }
    })
}

#[inline]
#[must_use]
pub fn line_rectangle(line: &Line, rect: &Rectangle) -> Vec<Vec2> {
    line_polyline(line, &rect.edges())
}

#[inline]
#[must_use]
pub fn circle_rectangle(circle: &Circle, rect: &Rectangle) -> Vec<Vec2> {
    circle_polyline(circle, &rect.edges())
}

#[inline]
#[must_use]
pub fn rectangle_rectangle(a: &Rectangle, b: &Rectangle) -> Vec<Vec2> {
    polyline_polyline(&a.edges(), &b.edges())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn circle_through_a_diagonal() {
        let c = Circle::new([100., 100.], 100.);
        let l = Line::new([0., 0.], [200., 200.]);

        let points = line_circle(&l, &c);
        assert_eq!(points.len(), 2);

        for p in points {
            assert_relative_eq!((p - c.center).norm(), 100., epsilon = 1e-9);
            assert!(l.contains(&p, 1e-9));
        }
    }

    #[test]
    fn segment_stopping_short_of_the_circle() {
        let c = Circle::new([0., 0.], 1.);

        // the infinite line crosses twice, the segment only once
        let l = Line::new([0., 0.], [5., 0.]);
        let points = line_circle(&l, &c);
        assert_eq!(points.len(), 1);
        assert_relative_eq!(points[0], Vec2::new(1., 0.));

        let short = Line::new([-0.5, 0.], [0.5, 0.]);
        assert!(line_circle(&short, &c).is_empty());
    }

    #[test]
    fn tangent_line_touches_once() {
        let c = Circle::new([0., 0.], 1.);
        let l = Line::new([-2., 1.], [2., 1.]);

        let points = line_circle(&l, &c);
        assert_eq!(points.len(), 1);
        assert_relative_eq!(points[0], Vec2::new(0., 1.));
    }

    #[test]
    fn degenerate_line_never_intersects() {
        let c = Circle::new([0., 0.], 1.);
        let l = Line::new([1., 0.], [1., 0.]);

        assert!(line_circle(&l, &c).is_empty());
    }

    #[test]
    fn two_circles() {
        let c1 = Circle::new([0., 0.], 5.);
        let c2 = Circle::new([8., 0.], 5.);

        let points = circle_circle(&c1, &c2);
        assert_eq!(points.len(), 2);

        for p in &points {
            assert_relative_eq!((p - c1.center).norm(), 5., epsilon = 1e-9);
            assert_relative_eq!((p - c2.center).norm(), 5., epsilon = 1e-9);
        }
        assert_relative_eq!(points[0], Vec2::new(4., 3.), epsilon = 1e-9);
        assert_relative_eq!(points[1], Vec2::new(4., -3.), epsilon = 1e-9);
    }

    #[test]
    fn separate_nested_and_concentric_circles() {
        let c = Circle::new([0., 0.], 5.);

        assert!(circle_circle(&c, &Circle::new([20., 0.], 5.)).is_empty());
        // externally tangent
        assert!(circle_circle(&c, &Circle::new([10., 0.], 5.)).is_empty());
        assert!(circle_circle(&c, &Circle::new([1., 0.], 1.)).is_empty());
        assert!(circle_circle(&c, &Circle::new([0., 0.], 5.)).is_empty());
    }

    #[test]
    fn line_through_a_rectangle() {
        let r = Rectangle::from_corner(0., 0., 2., 2.);
        let l = Line::new([-1., 1.], [3., 1.]);

        let mut points = line_rectangle(&l, &r);
        points.sort_by(|a, b| a.x.total_cmp(&b.x));

        assert_eq!(points.len(), 2);
        assert_relative_eq!(points[0], Vec2::new(0., 1.));
        assert_relative_eq!(points[1], Vec2::new(2., 1.));
    }

    #[test]
    fn corners_are_reported_once() {
        let r = Rectangle::from_corner(0., 0., 2., 2.);
        let diagonal = Line::new([-1., -1.], [3., 3.]);

        assert_eq!(line_rectangle(&diagonal, &r).len(), 2);
    }

    #[test]
    fn circle_and_rectangle() {
        let r = Rectangle::from_corner(0., 0., 2., 2.);
        let c = Circle::new([2., 1.], 0.5);

        let points = circle_rectangle(&c, &r);
        assert_eq!(points.len(), 2);
        for p in points {
            assert_relative_eq!(p.x, 2.);
        }
    }

    #[test]
    fn overlapping_rectangles() {
        let a = Rectangle::from_corner(0., 0., 2., 2.);
        let b = Rectangle::from_corner(1., 1., 2., 2.);

        let mut points = rectangle_rectangle(&a, &b);
        points.sort_by(|p, q| p.x.total_cmp(&q.x));

        assert_eq!(points.len(), 2);
        assert_relative_eq!(points[0], Vec2::new(1., 2.));
        assert_relative_eq!(points[1], Vec2::new(2., 1.));
    }
}
