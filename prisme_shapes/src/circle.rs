use super::*;

use core::f64::consts::TAU;

/// All points at a certain distance (`radius`) from a certain point (`center`).
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Circle {
    pub center: Vec2,
    radius: Float,
    /// Added to `radius` in all intersection and containment computations,
    /// e. g. to compensate for the width of a plotter's pen.
    radius_offset: Float,
}

impl Circle {
    #[inline]
    pub fn try_new(center: impl Into<Vec2>, radius: Float) -> Result<Self, GeometryError> {
        if !(radius.is_finite() && radius > 0.) {
            return Err(GeometryError::InvalidRadius(radius));
        }

        Ok(Self {
            center: center.into(),
            radius,
            radius_offset: 0.,
        })
    }

    /// A panicking version of [`Self::try_new`]
    ///
    /// # Panics
    ///
    /// if `radius` isn't positive and finite
    #[inline]
    #[must_use]
    pub fn new(center: impl Into<Vec2>, radius: Float) -> Self {
        match Self::try_new(center, radius) {
            Ok(circle) => circle,
            Err(e) => panic!("{e}"),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_radius_offset(self, radius_offset: Float) -> Self {
        Self {
            radius_offset,
            ..self
        }
    }

    #[inline]
    #[must_use]
    pub fn with_center(self, center: impl Into<Vec2>) -> Self {
        Self {
            center: center.into(),
            ..self
        }
    }

    #[inline]
    #[must_use]
    pub fn translated(self, v: &Vec2) -> Self {
        self.with_center(self.center + v)
    }

    #[inline]
    #[must_use]
    pub const fn radius(&self) -> Float {
        self.radius
    }

    #[inline]
    #[must_use]
    pub const fn radius_offset(&self) -> Float {
        self.radius_offset
    }

    /// The radius used for intersections and containment.
    #[inline]
    #[must_use]
    pub fn effective_radius(&self) -> Float {
        (self.radius + self.radius_offset).max(0.)
    }

    #[inline]
    #[must_use]
    pub fn circumference(&self) -> Float {
        TAU * self.radius
    }

    /// The point of the (effective) circle at `angle` radians from the x axis.
    #[inline]
    #[must_use]
    pub fn point_at(&self, angle: Float) -> Vec2 {
        self.center + Vec2::from_angle(angle) * self.effective_radius()
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, p: &Vec2) -> bool {
        (p - self.center).norm() <= self.effective_radius()
    }

    /// The unit vector pointing from the center towards `p`.
    #[inline]
    #[must_use]
    pub fn outward_normal(&self, p: &Vec2) -> Option<Dir2> {
        Dir2::try_new(p - self.center, 0.)
    }

    #[must_use]
    pub fn bounding_box(&self) -> Rectangle {
        let r = self.effective_radius();
        Rectangle::from_center(self.center, [2. * r, 2. * r], 0.)
    }

    /// Returns the distances `[t1, t2]`, `t1 <= t2` (possibly negative), such that
    /// `ray.at(t)` is on this circle.
    #[inline]
    #[must_use]
    pub fn ray_intersections(&self, ray: &Ray) -> Option<[Float; 2]> {
        // substituting `V` for `P + t * D` in the circle equation:
        // `||V - C||^2 = r^2` results in a quadratic equation in `t`.
        // `D` is a unit vector, so the leading coefficient is 1.

        let v = ray.origin - self.center;
        let r = self.effective_radius();

        let b = v.dot(ray.direction.as_ref());
        let c = v.norm_squared() - r * r;

        let delta = b.mul_add(b, -c);

        (delta >= 0.).then(|| {
            let root = delta.sqrt();
            [-b - root, -b + root]
        })
    }

    /// Up to two pairs `(t, n)` such that `ray.at(t)` is on this circle,
    /// and `n` is the outward normal there.
    #[must_use]
    pub fn normals_at_intersections(&self, ray: &Ray) -> ArrayVec<(Float, Dir2), 2> {
        self.ray_intersections(ray)
            .into_iter()
            .flatten()
            .filter_map(|t| self.outward_normal(&ray.at(t)).map(|n| (t, n)))
            .collect()
    }
}

impl Deflector for Circle {
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

    #[test]
    fn invalid_radii() {
        assert_eq!(
            Circle::try_new([0., 0.], 0.),
            Err(GeometryError::InvalidRadius(0.))
        );
        assert!(Circle::try_new([0., 0.], -1.).is_err());
        assert!(Circle::try_new([0., 0.], Float::NAN).is_err());
    }

    #[test]
    fn radius_offset_inflates() {
        let c = Circle::new([0., 0.], 10.).with_radius_offset(0.5);

        assert_relative_eq!(c.effective_radius(), 10.5);
        assert!(c.contains(&Vec2::new(10.25, 0.)));
        assert_relative_eq!(c.bounding_box().width(), 21.);
    }

    #[test]
    fn nearest_forward_hit() {
        let c = Circle::new([10., 0.], 2.);
        let ray = Ray::new_normalize([0., 0.], [1., 0.]);

        let hit = ray.closest_hit(&c, 1e-6).unwrap();
        assert_relative_eq!(hit.dist, 8.);
        assert_relative_eq!(ray.at(hit.dist), Vec2::new(8., 0.));

        let away = Ray::new_normalize([0., 0.], [-1., 0.]);
        assert_eq!(away.closest_hit(&c, 1e-6), None);
    }

    #[test]
    fn leaving_the_surface_does_not_hit_it_again() {
        let c = Circle::new([0., 0.], 1.);
        let ray = Ray::new_normalize(c.point_at(0.3), Vec2::from_angle(0.3));

        assert_eq!(ray.closest_hit(&c, 1e-6), None);
    }

    #[test]
    fn ray_from_inside_hits_the_far_side() {
        let c = Circle::new([0., 0.], 5.);
        let ray = Ray::new_normalize([1., 0.], [0., 1.]);

        let hit = ray.closest_hit(&c, 1e-6).unwrap();
        assert_relative_eq!((ray.at(hit.dist) - c.center).norm(), 5., epsilon = 1e-9);
        assert!(hit.dist > 0.);
    }
}
