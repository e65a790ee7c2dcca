use super::*;

/// Unclamped linear interpolation between `start` and `end`.
///
/// `t` may lie outside `[0, 1]`, in which case the result is extrapolated
/// along the line through both points.
#[inline]
#[must_use]
pub fn lerp(t: Float, start: &Vec2, end: &Vec2) -> Vec2 {
    start + (end - start) * t
}

/// Planar operations on top of what [`nalgebra`] already provides.
pub trait VectorExt: Sized {
    /// The unit vector pointing at `angle` radians, counter-clockwise from the x axis.
    fn from_angle(angle: Float) -> Self;

    /// The angle of `self` with respect to the x axis, in `[-π, π]`.
    fn polar_angle(&self) -> Float;

    /// The signed angle, in `[-π, π]`, rotating `self` onto `other`.
    ///
    /// Returns `0.0` if either vector is zero.
    fn angle_between(&self, other: &Self) -> Float;

    #[must_use]
    fn rotated(&self, angle: Float) -> Self;

    fn rotate(&mut self, angle: Float);

    #[must_use]
    fn rotated_around(&self, pivot: &Self, angle: Float) -> Self;

    /// `self` rotated by a quarter turn, counter-clockwise.
    #[must_use]
    fn perpendicular(&self) -> Self;

    /// `self` scaled to unit length, or `self` unchanged if it is zero.
    #[must_use]
    fn normalized_or_self(&self) -> Self;

    /// Promote to 3D with `z = 0`.
    fn to_3d(&self) -> Vec3;
}

impl VectorExt for Vec2 {
    #[inline]
    fn from_angle(angle: Float) -> Self {
        let (sin, cos) = angle.sin_cos();
        Vec2::new(cos, sin)
    }

    #[inline]
    fn polar_angle(&self) -> Float {
        self.y.atan2(self.x)
    }

    fn angle_between(&self, other: &Self) -> Float {
        let norms = self.norm() * other.norm();
        if norms <= Float::EPSILON {
            return 0.;
        }

        let (a, b) = (self.to_3d(), other.to_3d());
        let angle = (a.dot(&b) / norms).clamp(-1., 1.).acos();

        if a.cross(&b).z < 0. {
            -angle
        } else {
            angle
        }
    }

    #[inline]
    fn rotated(&self, angle: Float) -> Self {
        let (sin, cos) = angle.sin_cos();
        Vec2::new(self.x * cos - self.y * sin, self.x * sin + self.y * cos)
    }

    #[inline]
    fn rotate(&mut self, angle: Float) {
        *self = self.rotated(angle);
    }

    #[inline]
    fn rotated_around(&self, pivot: &Self, angle: Float) -> Self {
        pivot + (self - pivot).rotated(angle)
    }

    #[inline]
    fn perpendicular(&self) -> Self {
        Vec2::new(-self.y, self.x)
    }

    #[inline]
    fn normalized_or_self(&self) -> Self {
        self.try_normalize(0.).unwrap_or(*self)
    }

    #[inline]
    fn to_3d(&self) -> Vec3 {
        Vec3::new(self.x, self.y, 0.)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use core::f64::consts::{FRAC_PI_2, FRAC_PI_4, PI};

    #[test]
    fn signed_angle_between() {
        let x = Vec2::x();
        let y = Vec2::y();

        assert_relative_eq!(x.angle_between(&y), FRAC_PI_2);
        assert_relative_eq!(y.angle_between(&x), -FRAC_PI_2);
        assert_relative_eq!(x.angle_between(&-x), PI);
        assert_relative_eq!(x.angle_between(&Vec2::new(1., 1.)), FRAC_PI_4);
    }

    #[test]
    fn angle_between_zero_vector_is_zero() {
        assert_eq!(Vec2::zeros().angle_between(&Vec2::x()), 0.);
    }

    #[test]
    fn normalizing_zero_is_a_no_op() {
        let v = Vec2::zeros().normalized_or_self();
        assert_eq!(v, Vec2::zeros());
        assert!(v.iter().all(|c| c.is_finite()));

        assert_relative_eq!(Vec2::new(3., 4.).normalized_or_self().norm(), 1.);
    }

    #[test]
    fn lerp_extrapolates() {
        let a = Vec2::new(0., 0.);
        let b = Vec2::new(10., 20.);

        assert_relative_eq!(lerp(0.5, &a, &b), Vec2::new(5., 10.));
        assert_relative_eq!(lerp(1.5, &a, &b), Vec2::new(15., 30.));
        assert_relative_eq!(lerp(-1., &a, &b), Vec2::new(-10., -20.));
    }

    #[test]
    fn rotation() {
        let mut v = Vec2::x();
        v.rotate(FRAC_PI_2);
        assert_relative_eq!(v, Vec2::y(), epsilon = 1e-12);

        let p = Vec2::new(2., 1.).rotated_around(&Vec2::new(1., 1.), PI);
        assert_relative_eq!(p, Vec2::new(0., 1.), epsilon = 1e-12);

        assert_relative_eq!(Vec2::from_angle(FRAC_PI_2), Vec2::y(), epsilon = 1e-12);
        assert_relative_eq!(Vec2::new(-1., 0.).polar_angle(), PI);
    }
}
