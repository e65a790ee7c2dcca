use super::*;

/// Why a ray stopped propagating.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Termination {
    /// Hit an object that absorbs rays.
    Absorbed,
    /// Hit nothing: the ray leaves the scene.
    Escaped,
    /// Ran into [`RayParams::iteration_cap`].
    IterationCap,
    /// Started repeating a previous segment, see [`RayParams::loop_detection`].
    Loop,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum RayState {
    #[default]
    Traveling,
    Terminated(Termination),
}

/// A light ray, represented as a half-line, along with the path it travelled so far.
#[derive(Clone, Debug, PartialEq)]
pub struct Ray {
    /// The starting point of the half-line, advances as the ray propagates.
    pub origin: Vec2,
    pub direction: Dir2,
    path: Vec<Line>,
    state: RayState,
    iteration_count: usize,
}

impl Ray {
    #[inline]
    #[must_use]
    pub fn new(origin: impl Into<Vec2>, direction: Dir2) -> Self {
        Self {
            origin: origin.into(),
            direction,
            path: Vec::new(),
            state: RayState::Traveling,
            iteration_count: 0,
        }
    }

    #[inline]
    pub fn try_new_normalize(
        origin: impl Into<Vec2>,
        direction: impl Into<Vec2>,
    ) -> Result<Self, GeometryError> {
        Dir2::try_new(direction.into(), 0.)
            .map(|dir| Self::new(origin, dir))
            .ok_or(GeometryError::ZeroDirection)
    }

    /// # Panics
    ///
    /// if `direction` is zero
    #[inline]
    #[must_use]
    pub fn new_normalize(origin: impl Into<Vec2>, direction: impl Into<Vec2>) -> Self {
        match Self::try_new_normalize(origin, direction) {
            Ok(ray) => ray,
            Err(e) => panic!("{e}"),
        }
    }

    /// A ray leaving `origin` at `angle` radians, counter-clockwise from the x axis.
    #[inline]
    #[must_use]
    pub fn from_angle(origin: impl Into<Vec2>, angle: Float) -> Self {
        Self::new(origin, Dir2::new_unchecked(Vec2::from_angle(angle)))
    }

    /// Get the point at distance `t` (can be negative) from the ray's origin.
    #[inline]
    #[must_use]
    pub fn at(&self, t: Float) -> Vec2 {
        self.origin + self.direction.as_ref() * t
    }

    /// Move the ray's origin forward (or backward if `t < 0.0`) by `t`, without recording it.
    #[inline]
    pub fn advance(&mut self, t: Float) {
        self.origin = self.at(t);
    }

    /// Reflect the ray's direction w.r.t. the surface with the given normal.
    #[inline]
    pub fn reflect_dir(&mut self, normal: &Dir2) {
        if let Some(dir) = Deflection::Reflect(*normal).apply(&self.direction) {
            self.direction = dir;
        }
    }

    /// Returns the closest hit between `self` and `mirror`, if any, ignoring
    /// those closer than `eps`.
    ///
    /// It is possible that [`self.at(t)`](Self::at) lands slightly "beyond" a surface
    /// due to roundoff errors, making the ray bump into it again on it's next step.
    /// Requiring the ray to travel at least `eps` mitigates this.
    #[inline]
    #[must_use]
    pub fn closest_hit(&self, mirror: &(impl Deflector + ?Sized), eps: Float) -> Option<Hit> {
        mirror.closest_hit(self, SimulationCtx::new(eps))
    }

    /// Moves the ray to `hit`, recording the travelled segment, then lets the
    /// hit object alter it.
    pub fn bounce(&mut self, hit: &Hit) -> Line {
        let end = self.at(hit.dist);
        let segment = Line::new(self.origin, end);

        self.path.push(segment);
        self.origin = end;
        self.iteration_count += 1;

        match hit.deflection.apply(&self.direction) {
            Some(dir) => self.direction = dir,
            None => self.terminate(Termination::Absorbed),
        }

        segment
    }

    /// Stops the ray, if it wasn't already.
    #[inline]
    pub fn terminate(&mut self, reason: Termination) {
        if !self.is_terminated() {
            self.state = RayState::Terminated(reason);
        }
    }

    /// Cast this ray through `scene` until it terminates.
    #[must_use]
    pub fn cast(self, scene: &(impl Deflector + ?Sized), params: &RayParams) -> Self {
        let mut path = RayPath::new(scene, self, *params);
        path.by_ref().for_each(drop);
        path.into_ray()
    }

    /// The segments travelled so far, in order.
    #[inline]
    #[must_use]
    pub fn path(&self) -> &[Line] {
        &self.path
    }

    #[inline]
    #[must_use]
    pub fn into_path(self) -> Vec<Line> {
        self.path
    }

    /// The starting point of the path, or the current origin if the ray hasn't moved yet.
    #[inline]
    #[must_use]
    pub fn start(&self) -> Vec2 {
        self.path.first().map_or(self.origin, |l| l.start)
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> RayState {
        self.state
    }

    #[inline]
    #[must_use]
    pub fn is_terminated(&self) -> bool {
        matches!(self.state, RayState::Terminated(_))
    }

    #[inline]
    #[must_use]
    pub fn termination(&self) -> Option<Termination> {
        match self.state {
            RayState::Terminated(reason) => Some(reason),
            RayState::Traveling => None,
        }
    }

    #[inline]
    #[must_use]
    pub fn iteration_count(&self) -> usize {
        self.iteration_count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use core::f64::consts::FRAC_PI_4;

    #[test]
    fn zero_direction_is_rejected() {
        assert_eq!(
            Ray::try_new_normalize([0., 0.], [0., 0.]),
            Err(GeometryError::ZeroDirection)
        );
    }

    #[test]
    fn ray_against_diagonal() {
        let diagonal = Line::new([0., 0.], [100., 100.]);

        let down = Ray::from_angle([0., 100.], -FRAC_PI_4);
        let hit = down.closest_hit(&diagonal, 1e-6).unwrap();
        assert_relative_eq!(down.at(hit.dist), Vec2::new(50., 50.), epsilon = 1e-9);

        let up = Ray::from_angle([0., 100.], FRAC_PI_4);
        assert_eq!(up.closest_hit(&diagonal, 1e-6), None);
    }

    #[test]
    fn bounce_records_the_segment() {
        let mut ray = Ray::new_normalize([0., 0.], [1., 0.]);
        let hit = Hit::new(
            2.,
            Deflection::Reflect(Dir2::new_normalize(Vec2::new(-1., 0.))),
        );

        let segment = ray.bounce(&hit);

        assert_eq!(segment, Line::new([0., 0.], [2., 0.]));
        assert_eq!(ray.path(), &[segment]);
        assert_relative_eq!(ray.origin, Vec2::new(2., 0.));
        assert_relative_eq!(ray.direction.into_inner(), Vec2::new(-1., 0.));
        assert_eq!(ray.iteration_count(), 1);
        assert!(!ray.is_terminated());

        ray.bounce(&Hit::new(1., Deflection::Terminate));
        assert_eq!(ray.termination(), Some(Termination::Absorbed));
    }
}
