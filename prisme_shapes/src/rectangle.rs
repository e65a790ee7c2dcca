use super::*;

/// A rectangle, rotated by `rotation` radians around it's center.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Rectangle {
    center: Vec2,
    half_size: Vec2,
    rotation: Float,
}

impl Rectangle {
    /// Create a rectangle from it's center, size (`[width, height]`) and rotation.
    pub fn try_from_center(
        center: impl Into<Vec2>,
        size: impl Into<Vec2>,
        rotation: Float,
    ) -> Result<Self, GeometryError> {
        let center = center.into();
        let size = size.into();

        if !size.iter().all(|s| s.is_finite() && *s >= 0.) {
            return Err(GeometryError::InvalidSize {
                width: size.x,
                height: size.y,
            });
        }

        if !(center.iter().all(|c| c.is_finite()) && rotation.is_finite()) {
            return Err(GeometryError::NonFinite);
        }

        Ok(Self {
            center,
            half_size: size / 2.,
            rotation,
        })
    }

    /// Create an axis-aligned rectangle from it's corner with the smallest
    /// coordinates, and it's size.
    #[inline]
    pub fn try_from_corner(
        x: Float,
        y: Float,
        width: Float,
        height: Float,
    ) -> Result<Self, GeometryError> {
        Self::try_from_center(
            [x + width / 2., y + height / 2.],
            [width, height],
            0.,
        )
    }

    /// A panicking version of [`Self::try_from_center`]
    ///
    /// # Panics
    ///
    /// if the size is negative, or any parameter is not finite
    #[inline]
    #[must_use]
    pub fn from_center(center: impl Into<Vec2>, size: impl Into<Vec2>, rotation: Float) -> Self {
        match Self::try_from_center(center, size, rotation) {
            Ok(rect) => rect,
            Err(e) => panic!("{e}"),
        }
    }

    /// A panicking version of [`Self::try_from_corner`]
    ///
    /// # Panics
    ///
    /// if the size is negative, or any parameter is not finite
    #[inline]
    #[must_use]
    pub fn from_corner(x: Float, y: Float, width: Float, height: Float) -> Self {
        match Self::try_from_corner(x, y, width, height) {
            Ok(rect) => rect,
            Err(e) => panic!("{e}"),
        }
    }

    #[inline]
    #[must_use]
    pub const fn center(&self) -> Vec2 {
        self.center
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.half_size * 2.
    }

    #[inline]
    #[must_use]
    pub fn width(&self) -> Float {
        self.half_size.x * 2.
    }

    #[inline]
    #[must_use]
    pub fn height(&self) -> Float {
        self.half_size.y * 2.
    }

    #[inline]
    #[must_use]
    pub const fn half_size(&self) -> Vec2 {
        self.half_size
    }

    #[inline]
    #[must_use]
    pub const fn rotation(&self) -> Float {
        self.rotation
    }

    #[inline]
    #[must_use]
    pub fn is_axis_aligned(&self) -> bool {
        self.rotation.rem_euclid(core::f64::consts::FRAC_PI_2) == 0.
    }

    /// The corner with the smallest coordinates, before rotation.
    #[inline]
    #[must_use]
    pub fn origin(&self) -> Vec2 {
        self.center - self.half_size
    }

    #[inline]
    #[must_use]
    pub fn area(&self) -> Float {
        self.width() * self.height()
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
    pub fn rotated(self, angle: Float) -> Self {
        Self {
            rotation: self.rotation + angle,
            ..self
        }
    }

    /// Express `p` in this rectangle's frame: centered, and unrotated.
    #[inline]
    #[must_use]
    pub fn to_local(&self, p: &Vec2) -> Vec2 {
        (p - self.center).rotated(-self.rotation)
    }

    #[inline]
    #[must_use]
    pub fn to_world(&self, p: &Vec2) -> Vec2 {
        self.center + p.rotated(self.rotation)
    }

    /// The four corners, counter-clockwise, starting from the one at [`Self::origin`] before rotation.
    #[must_use]
    pub fn corners(&self) -> [Vec2; 4] {
        let (w, h) = (self.half_size.x, self.half_size.y);
        [[-w, -h], [w, -h], [w, h], [-w, h]].map(|c| self.to_world(&c.into()))
    }

    /// The four sides, in the same order as [`Self::corners`].
    #[must_use]
    pub fn edges(&self) -> [Line; 4] {
        let [a, b, c, d] = self.corners();
        [
            Line::new(a, b),
            Line::new(b, c),
            Line::new(c, d),
            Line::new(d, a),
        ]
    }

    #[inline]
    #[must_use]
    pub fn contains(&self, p: &Vec2) -> bool {
        let local = self.to_local(p);
        local.x.abs() <= self.half_size.x && local.y.abs() <= self.half_size.y
    }

    /// The smallest axis-aligned rectangle containing `self`.
    #[must_use]
    pub fn bounding_box(&self) -> Rectangle {
        if self.rotation == 0. {
            return *self;
        }

        let corners = self.corners();
        let (min, max) = corners[1..]
            .iter()
            .fold((corners[0], corners[0]), |(min, max), c| (min.inf(c), max.sup(c)));

        Self {
            center: (min + max) / 2.,
            half_size: (max - min) / 2.,
            rotation: 0.,
        }
    }

    /// Up to two pairs `(t, n)` such that `ray.at(t)` is on the border of this
    /// rectangle, `n` being the outward normal of the side it's on.
    ///
    /// Uses the slab method in the rectangle's frame. Both the entry and
    /// exit points are returned, so that rays starting inside hit the border too.
    #[must_use]
    pub fn normals_at_intersections(&self, ray: &Ray) -> ArrayVec<(Float, Dir2), 2> {
        let o = self.to_local(&ray.origin);
        let d = ray.direction.rotated(-self.rotation);

        let mut near = (Float::NEG_INFINITY, Vec2::zeros());
        let mut far = (Float::INFINITY, Vec2::zeros());

        let mut out = ArrayVec::new();

        for axis in 0..2 {
            let half = self.half_size[axis];
            let mut axis_normal = Vec2::zeros();
            axis_normal[axis] = 1.;

            if d[axis].abs() <= Float::EPSILON {
                // parallel to this slab, either always or never inside it
                if o[axis].abs() > half {
                    return out;
                }
                continue;
            }

            let inv = d[axis].recip();
            let mut lo = ((-half - o[axis]) * inv, -axis_normal);
            let mut hi = ((half - o[axis]) * inv, axis_normal);

            if lo.0 > hi.0 {
                core::mem::swap(&mut lo, &mut hi);
            }

            if lo.0 > near.0 {
                near = lo;
            }
            if hi.0 < far.0 {
                far = hi;
            }
        }

        if near.0 > far.0 {
            return out;
        }

        for (t, n) in [near, far] {
            if t.is_finite() {
                out.push((t, Dir2::new_unchecked(n.rotated(self.rotation))));
            }
        }

        out
    }

    /// The point of the border in the direction `angle` from the center.
    #[must_use]
    pub fn boundary_point(&self, angle: Float) -> Vec2 {
        let ray = Ray::from_angle(self.center, angle);
        self.normals_at_intersections(&ray)
            .iter()
            .map(|(t, _)| *t)
            .find(|t| *t >= 0.)
            .map_or(self.center, |t| ray.at(t))
    }
}

impl Deflector for Rectangle {
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
    use core::f64::consts::FRAC_PI_4;

    #[test]
    fn corner_and_center_constructions_agree() {
        let a = Rectangle::from_corner(10., 20., 30., 40.);
        let b = Rectangle::from_center([25., 40.], [30., 40.], 0.);

        assert_eq!(a, b);
        assert_relative_eq!(a.origin(), Vec2::new(10., 20.));
        assert_relative_eq!(a.corners()[2], Vec2::new(40., 60.));
    }

    #[test]
    fn negative_size_is_rejected() {
        assert_eq!(
            Rectangle::try_from_corner(0., 0., -1., 2.),
            Err(GeometryError::InvalidSize {
                width: -1.,
                height: 2.
            })
        );
    }

    #[test]
    fn rotated_containment() {
        let r = Rectangle::from_center([0., 0.], [2., 2.], FRAC_PI_4);

        // the rotated square's corners lie on the axes
        assert!(r.contains(&Vec2::new(1.4, 0.)));
        assert!(!r.contains(&Vec2::new(0.9, 0.9)));

        let bb = r.bounding_box();
        assert_relative_eq!(bb.width(), 2f64.sqrt() * 2., epsilon = 1e-12);
    }

    #[test]
    fn slab_entry_from_outside() {
        let r = Rectangle::from_corner(2., -1., 2., 2.);

        let ray = Ray::new_normalize([0., 0.], [1., 0.]);
        let hit = ray.closest_hit(&r, 1e-6).unwrap();
        assert_relative_eq!(hit.dist, 2.);
        assert_eq!(
            hit.deflection,
            Deflection::Reflect(Dir2::new_unchecked(Vec2::new(-1., 0.)))
        );

        // same, but backwards
        let ray = Ray::new_normalize([6., 0.], [-1., 0.]);
        let hit = ray.closest_hit(&r, 1e-6).unwrap();
        assert_relative_eq!(ray.at(hit.dist), Vec2::new(4., 0.));
    }

    #[test]
    fn slab_exit_from_inside() {
        let r = Rectangle::from_corner(0., 0., 10., 10.);
        let ray = Ray::new_normalize([5., 5.], [0., -1.]);

        let hit = ray.closest_hit(&r, 1e-6).unwrap();
        assert_relative_eq!(ray.at(hit.dist), Vec2::new(5., 0.));
    }

    #[test]
    fn never_returns_hits_behind() {
        let r = Rectangle::from_corner(0., 0., 1., 1.);

        for dir in [[1., 0.], [0., 1.], [1., 1.], [-1., 0.3]] {
            let ray = Ray::new_normalize([-2., 0.5], dir);
            if let Some(hit) = ray.closest_hit(&r, 1e-6) {
                assert!(hit.dist > 0.);
            }
        }

        // starting on the border, moving away
        let ray = Ray::new_normalize([1., 0.5], [1., 0.]);
        assert_eq!(ray.closest_hit(&r, 1e-6), None);
    }

    #[test]
    fn parallel_ray_outside_misses() {
        let r = Rectangle::from_corner(0., 0., 1., 1.);
        let ray = Ray::new_normalize([-1., 2.], [1., 0.]);

        assert_eq!(ray.closest_hit(&r, 1e-6), None);
    }

    #[test]
    fn boundary_points() {
        let r = Rectangle::from_center([0., 0.], [4., 2.], 0.);

        assert_relative_eq!(r.boundary_point(0.), Vec2::new(2., 0.), epsilon = 1e-12);
        assert_relative_eq!(r.boundary_point(FRAC_PI_4), Vec2::new(1., 1.), epsilon = 1e-12);
    }
}
