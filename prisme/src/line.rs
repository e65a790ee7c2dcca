use super::*;

/// Tolerance used to decide whether a 2x2 system is degenerate (parallel lines).
const PARALLEL_EPS: Float = Float::EPSILON * 64.0;

/// The perpendicular product `a.x * b.y - a.y * b.x`.
///
/// Equal to the z component of the 3D cross product of `a` and `b`.
#[inline]
#[must_use]
pub fn cross(a: &Vec2, b: &Vec2) -> Float {
    a.x * b.y - a.y * b.x
}

/// A line segment, going from `start` to `end`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Line {
    pub start: Vec2,
    pub end: Vec2,
}

impl Line {
    #[inline]
    #[must_use]
    pub fn new(start: impl Into<Vec2>, end: impl Into<Vec2>) -> Self {
        Self {
            start: start.into(),
            end: end.into(),
        }
    }

    /// `end - start`
    #[inline]
    #[must_use]
    pub fn vector(&self) -> Vec2 {
        self.end - self.start
    }

    #[inline]
    #[must_use]
    pub fn length(&self) -> Float {
        self.vector().norm()
    }

    #[inline]
    #[must_use]
    pub fn midpoint(&self) -> Vec2 {
        self.at(0.5)
    }

    /// The unit vector perpendicular to this segment, a quarter turn
    /// counter-clockwise from its direction.
    ///
    /// Zero if the segment is degenerate.
    #[inline]
    #[must_use]
    pub fn normal(&self) -> Vec2 {
        self.vector().perpendicular().normalized_or_self()
    }

    /// `dy / dx`, infinite for vertical segments.
    #[inline]
    #[must_use]
    pub fn slope(&self) -> Float {
        let v = self.vector();
        v.y / v.x
    }

    /// The angle of this segment's direction w.r.t. the x axis.
    #[inline]
    #[must_use]
    pub fn angle(&self) -> Float {
        self.vector().polar_angle()
    }

    /// The point at parameter `t`, `t = 0` is `start` and `t = 1` is `end`.
    ///
    /// Not clamped.
    #[inline]
    #[must_use]
    pub fn at(&self, t: Float) -> Vec2 {
        lerp(t, &self.start, &self.end)
    }

    #[inline]
    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }

    #[inline]
    #[must_use]
    pub fn translated(&self, v: &Vec2) -> Self {
        Self::new(self.start + v, self.end + v)
    }

    /// The component-wise minimum and maximum of both endpoints.
    #[inline]
    #[must_use]
    pub fn bounds(&self) -> [Vec2; 2] {
        [self.start.inf(&self.end), self.start.sup(&self.end)]
    }

    /// Which side of the (infinite) line `p` lies on, positive on the side `self.normal()` points to.
    #[inline]
    #[must_use]
    pub fn side(&self, p: &Vec2) -> Float {
        cross(&self.vector(), &(p - self.start))
    }

    /// The parameter `t` of the point of the infinite line closest to `p`.
    ///
    /// `None` if the segment is degenerate.
    #[inline]
    #[must_use]
    pub fn project(&self, p: &Vec2) -> Option<Float> {
        let v = self.vector();
        let len_sq = v.norm_squared();
        (len_sq > 0.).then(|| (p - self.start).dot(&v) / len_sq)
    }

    /// The point of this segment closest to `p`.
    #[must_use]
    pub fn closest_point(&self, p: &Vec2) -> Vec2 {
        self.project(p)
            .map_or(self.start, |t| self.at(t.clamp(0., 1.)))
    }

    /// Whether `p` lies on this segment, allowing a distance of `eps` from it.
    #[must_use]
    pub fn contains(&self, p: &Vec2, eps: Float) -> bool {
        (self.closest_point(p) - p).norm() <= eps
    }

    /// Solves `self.at(s) = other.at(t)` for `[s, t]`.
    ///
    /// Returns `None` if the segments are parallel or degenerate.
    #[must_use]
    pub fn intersection_params(&self, other: &Line) -> Option<[Float; 2]> {
        let r = self.vector();
        let q = other.vector();
        let denom = cross(&r, &q);

        if denom.abs() <= PARALLEL_EPS * r.norm() * q.norm() || denom == 0. {
            return None;
        }

        let w = other.start - self.start;
        Some([cross(&w, &q) / denom, cross(&w, &r) / denom])
    }

    /// The point where both segments cross, if any.
    #[must_use]
    pub fn intersection(&self, other: &Line) -> Option<Vec2> {
        let unit = 0.0..=1.0;
        self.intersection_params(other)
            .filter(|[s, t]| unit.contains(s) && unit.contains(t))
            .map(|[s, _]| self.at(s))
    }

    /// The distance `t` such that [`ray.at(t)`](Ray::at) lies on this segment.
    ///
    /// `t` may be negative. Returns `None` if `ray` is parallel to the segment
    /// or misses it.
    #[must_use]
    pub fn ray_intersection(&self, ray: &Ray) -> Option<Float> {
        let d = ray.direction.as_ref();
        let q = self.vector();
        let denom = cross(d, &q);

        if denom.abs() <= PARALLEL_EPS * q.norm() || denom == 0. {
            return None;
        }

        let w = self.start - ray.origin;
        let t = cross(&w, &q) / denom;
        let s = cross(&w, d) / denom;

        (0.0..=1.0).contains(&s).then_some(t)
    }
}

impl From<[Vec2; 2]> for Line {
    #[inline]
    fn from([start, end]: [Vec2; 2]) -> Self {
        Self { start, end }
    }
}

impl From<Line> for [Vec2; 2] {
    #[inline]
    fn from(Line { start, end }: Line) -> Self {
        [start, end]
    }
}

/// A lone segment reflects rays specularly, from both sides.
impl Deflector for Line {
    fn closest_hit(&self, ray: &Ray, ctx: SimulationCtx) -> Option<Hit> {
        let n = Dir2::try_new(self.normal(), 0.)?;
        ctx.closest(
            self.ray_intersection(ray)
                .map(|t| Hit::new(t, Deflection::Reflect(n))),
        )
    }
}
