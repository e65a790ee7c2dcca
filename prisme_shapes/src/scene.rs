use super::*;

use log::debug;

/// Objects, emitters casting rays through them, and the edges of the canvas.
#[derive(Clone, Debug, PartialEq, Default)]
pub struct Scene {
    pub objects: Vec<Object>,
    pub emitters: Vec<Emitter>,
    /// Absorbs every ray reaching it. Hits on it have index `objects.len()`.
    pub bounds: Option<Rectangle>,
    pub params: RayParams,
}

impl Scene {
    #[inline]
    #[must_use]
    pub fn new(bounds: Option<Rectangle>) -> Self {
        Self {
            bounds,
            ..Default::default()
        }
    }

    /// Adds `object`, returning it's index.
    pub fn add_object(&mut self, object: impl Into<Object>) -> usize {
        self.objects.push(object.into());
        self.objects.len() - 1
    }

    pub fn add_emitter(&mut self, emitter: impl Into<Emitter>) {
        self.emitters.push(emitter.into());
    }

    /// Casts the rays of every emitter, in order.
    #[must_use]
    pub fn run(&self) -> Vec<Emission> {
        debug!(
            "running scene: {} objects, {} emitters",
            self.objects.len(),
            self.emitters.len()
        );

        self.emitters
            .iter()
            .map(|e| e.emit(self, &self.params))
            .collect()
    }
}

impl Deflector for Scene {
    fn closest_hit(&self, ray: &Ray, ctx: SimulationCtx) -> Option<Hit> {
        let bounds_index = self.objects.len();

        let object_hit = self.objects.as_slice().closest_hit(ray, ctx);

        let bounds_hit = self
            .bounds
            .filter(|_| ctx.skipped() != Some(bounds_index))
            .and_then(|b| Absorbing(b).closest_hit(ray, ctx.nested()))
            .map(|hit| hit.with_index(bounds_index));

        ctx.closest(object_hit.into_iter().chain(bounds_hit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn bounds_absorb_after_one_step() {
        let scene = Scene::new(Some(Rectangle::from_corner(0., 0., 100., 100.)));
        let ray = Ray::new_normalize([50., 50.], [1., 0.3]).cast(&scene, &scene.params);

        assert_eq!(ray.path().len(), 1);
        assert_eq!(ray.termination(), Some(Termination::Absorbed));
    }

    #[test]
    fn hits_are_tagged_with_object_indices() {
        let mut scene = Scene::new(Some(Rectangle::from_corner(-10., -10., 20., 20.)));
        let i = scene.add_object(Object::reflector(Line::new([2., -1.], [2., 1.])));

        let ray = Ray::new_normalize([0., 0.], [1., 0.]);
        let ctx = scene.params.ctx();

        assert_eq!(scene.closest_hit(&ray, ctx).unwrap().index, Some(i));

        let past_the_wall = scene.closest_hit(&ray, ctx.skipping(Some(i))).unwrap();
        assert_eq!(past_the_wall.index, Some(1));
        assert_relative_eq!(past_the_wall.dist, 10.);
    }

    #[test]
    fn circle_emitter_skips_its_own_circle() {
        let mut scene = Scene::new(Some(Rectangle::from_corner(0., 0., 1200., 800.)));
        let circle = Circle::new([600., 400.], 50.);
        let index = scene.add_object(Object::reflector(circle));

        let mut emitter = CircleEmitter::new(circle, 90.);
        emitter.scene_index = Some(index);
        scene.add_emitter(emitter);

        let emissions = scene.run();
        assert_eq!(emissions.len(), 1);
        assert_eq!(emissions[0].rays.len(), 4);

        for ray in &emissions[0].rays {
            assert_eq!(ray.path().len(), 1);
            assert_eq!(ray.termination(), Some(Termination::Absorbed));
        }
    }
}
