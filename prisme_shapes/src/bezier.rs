use super::*;

use core::f64::consts::FRAC_PI_2;

/// Number of segments each curve is split into when flattening.
pub const FLATTEN_STEPS: usize = 16;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum PathElement {
    MoveTo(Vec2),
    LineTo(Vec2),
    /// Control point, end point.
    QuadTo(Vec2, Vec2),
    /// Two control points, end point.
    CubicTo(Vec2, Vec2, Vec2),
    /// Go back to the start of the current sub-path.
    Close,
}

impl PathElement {
    #[must_use]
    pub fn translated(self, v: &Vec2) -> Self {
        match self {
            Self::MoveTo(p) => Self::MoveTo(p + v),
            Self::LineTo(p) => Self::LineTo(p + v),
            Self::QuadTo(c, p) => Self::QuadTo(c + v, p + v),
            Self::CubicTo(c1, c2, p) => Self::CubicTo(c1 + v, c2 + v, p + v),
            Self::Close => Self::Close,
        }
    }

    /// The point the pen is left at, `None` for [`Self::Close`].
    #[inline]
    #[must_use]
    pub fn end_point(&self) -> Option<Vec2> {
        match self {
            Self::MoveTo(p) | Self::LineTo(p) | Self::QuadTo(_, p) | Self::CubicTo(_, _, p) => {
                Some(*p)
            }
            Self::Close => None,
        }
    }
}

/// A single segment of a [`BezierPath`], with it's start point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Curve {
    Linear([Vec2; 2]),
    Quadratic([Vec2; 3]),
    Cubic([Vec2; 4]),
}

impl Curve {
    #[must_use]
    pub fn point_at(&self, t: Float) -> Vec2 {
        let s = 1. - t;
        match self {
            Self::Linear([a, b]) => lerp(t, a, b),
            Self::Quadratic([a, b, c]) => a * (s * s) + b * (2. * s * t) + c * (t * t),
            Self::Cubic([a, b, c, d]) => {
                a * (s * s * s) + b * (3. * s * s * t) + c * (3. * s * t * t) + d * (t * t * t)
            }
        }
    }

    #[inline]
    #[must_use]
    pub fn start(&self) -> Vec2 {
        match self {
            Self::Linear([a, _]) | Self::Quadratic([a, ..]) | Self::Cubic([a, ..]) => *a,
        }
    }

    #[inline]
    #[must_use]
    pub fn end(&self) -> Vec2 {
        match self {
            Self::Linear([.., b]) | Self::Quadratic([.., b]) | Self::Cubic([.., b]) => *b,
        }
    }

    /// Points along this curve, `start` excluded, `end` included.
    pub fn flatten(&self, steps: usize) -> impl Iterator<Item = Vec2> + '_ {
        let steps = match self {
            Self::Linear(_) => 1,
            _ => steps.max(1),
        };

        (1..=steps).map(move |i| self.point_at(i as Float / steps as Float))
    }
}

/// A sequence of sub-paths made of straight lines and quadratic or cubic Bézier curves.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct BezierPath {
    elements: Vec<PathElement>,
}

impl BezierPath {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn from_elements(elements: Vec<PathElement>) -> Self {
        Self { elements }
    }

    #[inline]
    #[must_use]
    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    #[inline]
    pub fn push(&mut self, element: PathElement) {
        self.elements.push(element);
    }

    /// The point the pen currently is at.
    #[must_use]
    pub fn current_point(&self) -> Option<Vec2> {
        let mut subpath_start = None;
        let mut current = None;

        for el in &self.elements {
            match el {
                PathElement::MoveTo(p) => {
                    subpath_start = Some(*p);
                    current = Some(*p);
                }
                PathElement::Close => current = subpath_start,
                el => current = el.end_point(),
            }
        }

        current
    }

    #[must_use]
    pub fn move_to(mut self, p: impl Into<Vec2>) -> Self {
        self.push(PathElement::MoveTo(p.into()));
        self
    }

    /// Starts a new sub-path at `p` if there is no current point.
    #[must_use]
    pub fn line_to(mut self, p: impl Into<Vec2>) -> Self {
        let p = p.into();
        if self.current_point().is_none() {
            return self.move_to(p);
        }
        self.push(PathElement::LineTo(p));
        self
    }

    #[must_use]
    pub fn quad_to(self, control: impl Into<Vec2>, p: impl Into<Vec2>) -> Self {
        let control = control.into();
        let mut path = self.ensure_started(control);
        path.push(PathElement::QuadTo(control, p.into()));
        path
    }

    #[must_use]
    pub fn cubic_to(
        self,
        control1: impl Into<Vec2>,
        control2: impl Into<Vec2>,
        p: impl Into<Vec2>,
    ) -> Self {
        let control1 = control1.into();
        let mut path = self.ensure_started(control1);
        path.push(PathElement::CubicTo(control1, control2.into(), p.into()));
        path
    }

    #[must_use]
    pub fn close(mut self) -> Self {
        self.push(PathElement::Close);
        self
    }

    fn ensure_started(self, p: Vec2) -> Self {
        if self.current_point().is_none() {
            self.move_to(p)
        } else {
            self
        }
    }

    /// Appends a circular arc, approximated with cubic curves, going from `start_angle`
    /// to `end_angle` (counter-clockwise if `end_angle > start_angle`).
    ///
    /// Continues the current sub-path if the pen already is at the arc's start,
    /// otherwise a new one is started there.
    #[must_use]
    pub fn arc(
        self,
        center: impl Into<Vec2>,
        radius: Float,
        start_angle: Float,
        end_angle: Float,
    ) -> Self {
        let center = center.into();
        let point = |angle| center + Vec2::from_angle(angle) * radius;

        let start = point(start_angle);
        let mut path = match self.current_point() {
            Some(p) if (p - start).norm() <= POINT_EPS => self,
            _ => self.move_to(start),
        };

        let sweep = end_angle - start_angle;
        let pieces = (sweep.abs() / FRAC_PI_2).ceil().max(1.) as usize;
        let step = sweep / pieces as Float;
        // length of the tangent handles of a cubic approximating an arc of angle `step`
        let k = 4. / 3. * (step / 4.).tan() * radius;

        for i in 0..pieces {
            let a = start_angle + step * i as Float;
            let b = a + step;

            let (p0, p3) = (point(a), point(b));
            let c1 = p0 + Vec2::from_angle(a).perpendicular() * k;
            let c2 = p3 - Vec2::from_angle(b).perpendicular() * k;

            path.push(PathElement::CubicTo(c1, c2, p3));
        }

        path
    }

    /// A path going through `points` in order.
    #[must_use]
    pub fn polyline(points: impl IntoIterator<Item = Vec2>, closed: bool) -> Self {
        let path = points
            .into_iter()
            .fold(Self::new(), |path, p| path.line_to(p));

        if closed && !path.is_empty() {
            path.close()
        } else {
            path
        }
    }

    #[must_use]
    pub fn translated(&self, v: &Vec2) -> Self {
        Self::from_elements(self.elements.iter().map(|el| el.translated(v)).collect())
    }

    /// Appends all the elements of `other`.
    pub fn append(&mut self, other: &Self) {
        self.elements.extend_from_slice(&other.elements);
    }

    /// Every point in this path, control points included.
    #[must_use]
    pub fn control_points(&self) -> Vec<Vec2> {
        self.elements
            .iter()
            .flat_map(|el| -> ArrayVec<Vec2, 3> {
                match *el {
                    PathElement::MoveTo(p) | PathElement::LineTo(p) => [p].into_iter().collect(),
                    PathElement::QuadTo(c, p) => [c, p].into_iter().collect(),
                    PathElement::CubicTo(c1, c2, p) => ArrayVec::from([c1, c2, p]),
                    PathElement::Close => ArrayVec::new(),
                }
            })
            .collect()
    }

    /// All the drawn segments, in order. A closing segment is included only
    /// if the pen isn't already at the start of the sub-path.
    #[must_use]
    pub fn curves(&self) -> Vec<Curve> {
        let mut curves = Vec::new();
        let mut subpath_start = Vec2::zeros();
        let mut current = Vec2::zeros();

        for el in &self.elements {
            match *el {
                PathElement::MoveTo(p) => {
                    subpath_start = p;
                    current = p;
                    continue;
                }
                PathElement::LineTo(p) => curves.push(Curve::Linear([current, p])),
                PathElement::QuadTo(c, p) => curves.push(Curve::Quadratic([current, c, p])),
                PathElement::CubicTo(c1, c2, p) => {
                    curves.push(Curve::Cubic([current, c1, c2, p]));
                }
                PathElement::Close => {
                    if current != subpath_start {
                        curves.push(Curve::Linear([current, subpath_start]));
                    }
                    current = subpath_start;
                    continue;
                }
            }
            if let Some(p) = el.end_point() {
                current = p;
            }
        }

        curves
    }

    /// The point at parameter `t`: the integer part selects the curve
    /// (in the order of [`Self::curves`]) and the fractional part the position on it.
    ///
    /// `t` is clamped to the path's range, `None` if there are no curves.
    #[must_use]
    pub fn point_at(&self, t: Float) -> Option<Vec2> {
        let curves = self.curves();
        let n = curves.len();
        if n == 0 {
            return None;
        }

        let t = t.clamp(0., n as Float);
        let i = (t.floor() as usize).min(n - 1);
        Some(curves[i].point_at(t - i as Float))
    }

    /// Approximates every sub-path with a polyline, splitting curves into `steps` segments.
    #[must_use]
    pub fn flatten(&self, steps: usize) -> Vec<Vec<Vec2>> {
        let mut polylines: Vec<Vec<Vec2>> = Vec::new();
        let mut subpath_start = Vec2::zeros();
        let mut current: Option<Vec<Vec2>> = None;

        for el in &self.elements {
            let polyline = match el {
                PathElement::MoveTo(p) => {
                    polylines.extend(current.take());
                    subpath_start = *p;
                    current = Some(vec![*p]);
                    continue;
                }
                _ => current.get_or_insert_with(|| vec![subpath_start]),
            };

            let from = polyline.last().copied().unwrap_or(subpath_start);

            let curve = match *el {
                PathElement::LineTo(p) => Curve::Linear([from, p]),
                PathElement::QuadTo(c, p) => Curve::Quadratic([from, c, p]),
                PathElement::CubicTo(c1, c2, p) => Curve::Cubic([from, c1, c2, p]),
                _ => {
                    if from != subpath_start {
                        polyline.push(subpath_start);
                    }
                    polylines.extend(current.take());
                    continue;
                }
            };

            polyline.extend(curve.flatten(steps));
        }

        polylines.extend(current);
        polylines
    }

    /// The segments of [`Self::flatten`], with [`FLATTEN_STEPS`].
    #[must_use]
    pub fn flattened_lines(&self) -> Vec<Line> {
        self.flatten(FLATTEN_STEPS)
            .iter()
            .flat_map(|polyline| polyline.windows(2).map(|w| Line::new(w[0], w[1])))
            .collect()
    }

    /// The smallest axis aligned rectangle containing the flattened path.
    ///
    /// `None` if the path is empty.
    #[must_use]
    pub fn bounding_box(&self) -> Option<Rectangle> {
        let mut points = self.flatten(FLATTEN_STEPS).into_iter().flatten();
        let first = points.next()?;

        let (min, max) = points.fold((first, first), |(min, max), p| (min.inf(&p), max.sup(&p)));
        let size = max - min;

        Rectangle::try_from_corner(min.x, min.y, size.x, size.y).ok()
    }

    /// Even-odd containment test on the flattened path, every sub-path being implicitly closed.
    #[must_use]
    pub fn contains(&self, p: &Vec2) -> bool {
        let mut inside = false;

        for polyline in self.flatten(FLATTEN_STEPS) {
            let closing = polyline.last().zip(polyline.first());
            let edges = polyline
                .windows(2)
                .map(|w| (w[0], w[1]))
                .chain(closing.map(|(a, b)| (*a, *b)));

            for (a, b) in edges {
                if (a.y > p.y) != (b.y > p.y) {
                    let x = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
                    if p.x < x {
                        inside = !inside;
                    }
                }
            }
        }

        inside
    }

    /// Every `(t, n)` such that `ray.at(t)` is on the flattened path, `n` being
    /// the normal of the flattened segment hit, pointing to it's left.
    #[must_use]
    pub fn normals_at_intersections(&self, ray: &Ray) -> Vec<(Float, Dir2)> {
        self.flattened_lines()
            .iter()
            .filter_map(|l| {
                let n = Dir2::try_new(l.normal(), 0.)?;
                l.ray_intersection(ray).map(|t| (t, n))
            })
            .collect()
    }
}

impl Deflector for BezierPath {
    fn closest_hit(&self, ray: &Ray, ctx: SimulationCtx) -> Option<Hit> {
        ctx.closest(
            self.normals_at_intersections(ray)
                .into_iter()
                .map(|(t, n)| Hit::new(t, Deflection::Reflect(n))),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use core::f64::consts::TAU;

    fn unit_square() -> BezierPath {
        BezierPath::polyline(
            [[0., 0.], [1., 0.], [1., 1.], [0., 1.]].map(Vec2::from),
            true,
        )
    }

    #[test]
    fn builder_tracks_the_pen() {
        let path = BezierPath::new()
            .line_to([1., 1.])
            .quad_to([2., 2.], [3., 1.])
            .cubic_to([4., 0.], [5., 0.], [6., 1.]);

        assert_eq!(path.elements()[0], PathElement::MoveTo(Vec2::new(1., 1.)));
        assert_eq!(path.current_point(), Some(Vec2::new(6., 1.)));
        assert_eq!(path.curves().len(), 2);

        let closed = path.close();
        assert_eq!(closed.current_point(), Some(Vec2::new(1., 1.)));
        assert_eq!(closed.curves().len(), 3);
    }

    #[test]
    fn curve_evaluation() {
        let quad = Curve::Quadratic([[0., 0.].into(), [1., 2.].into(), [2., 0.].into()]);
        assert_relative_eq!(quad.point_at(0.5), Vec2::new(1., 1.));
        assert_relative_eq!(quad.point_at(1.), Vec2::new(2., 0.));

        let flat: Vec<_> = quad.flatten(4).collect();
        assert_eq!(flat.len(), 4);
        assert_relative_eq!(flat[3], quad.end());
    }

    #[test]
    fn arcs_stay_on_the_circle() {
        let path = BezierPath::new().arc([2., 3.], 5., 0., TAU).close();

        // full turn: 4 quarter arcs
        assert_eq!(path.elements().len(), 6);

        for polyline in path.flatten(8) {
            for p in polyline {
                let r = (p - Vec2::new(2., 3.)).norm();
                assert_relative_eq!(r, 5., max_relative = 1e-3);
            }
        }

        assert_relative_eq!(path.point_at(1.).unwrap(), Vec2::new(2., 8.), epsilon = 1e-9);
    }

    #[test]
    fn consecutive_arcs_share_a_sub_path() {
        let path = BezierPath::new()
            .arc([0., 0.], 1., 0., 1.)
            .arc([0., 0.], 1., 1., 2.);

        let moves = path
            .elements()
            .iter()
            .filter(|el| matches!(el, PathElement::MoveTo(_)))
            .count();
        assert_eq!(moves, 1);
    }

    #[test]
    fn even_odd_containment() {
        let square = unit_square();
        assert!(square.contains(&Vec2::new(0.5, 0.5)));
        assert!(!square.contains(&Vec2::new(1.5, 0.5)));

        // a hole
        let mut with_hole = square.clone();
        with_hole.append(&unit_square().translated(&Vec2::new(0.25, 0.25)));
        assert!(!with_hole.contains(&Vec2::new(0.75, 0.75)));
        assert!(with_hole.contains(&Vec2::new(0.1, 0.1)));
    }

    #[test]
    fn bounding_box_of_curves() {
        let bb = unit_square().bounding_box().unwrap();
        assert_relative_eq!(bb.center(), Vec2::new(0.5, 0.5));
        assert_relative_eq!(bb.area(), 1.);

        assert_eq!(BezierPath::new().bounding_box(), None);
    }

    #[test]
    fn rays_bounce_off_flattened_outline() {
        let square = unit_square();
        let ray = Ray::new_normalize([-1., 0.5], [1., 0.]);

        let hit = ray.closest_hit(&square, 1e-6).unwrap();
        assert_relative_eq!(ray.at(hit.dist), Vec2::new(0., 0.5), epsilon = 1e-12);

        let inside = Ray::new_normalize([0.5, 0.5], [0., 1.]);
        let hit = inside.closest_hit(&square, 1e-6).unwrap();
        assert_relative_eq!(inside.at(hit.dist), Vec2::new(0.5, 1.), epsilon = 1e-12);
    }
}
