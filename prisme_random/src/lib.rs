//! Random shapes, objects, emitters and scenes, for testing and demos.

use prisme::*;
use prisme_shapes::*;

use core::{f64::consts::TAU, iter};
pub use rand;

/// The canvas used by [`Random::random`].
#[must_use]
pub fn default_canvas() -> Rectangle {
    Rectangle::from_corner(0., 0., 800., 600.)
}

pub trait Random: Sized {
    /// Generate a random value lying (mostly) inside `canvas`, using the provided `rng`.
    ///
    /// This method must not fail. If creating a value is faillible, keep trying until success
    fn random_in(rng: &mut (impl rand::Rng + ?Sized), canvas: &Rectangle) -> Self;

    fn random(rng: &mut (impl rand::Rng + ?Sized)) -> Self {
        Self::random_in(rng, &default_canvas())
    }
}

/// A uniformly distributed point inside `canvas`.
pub fn rand_point(rng: &mut (impl rand::Rng + ?Sized), canvas: &Rectangle) -> Vec2 {
    // the rng generates floats in 0.0..1.0, scale and translate the range accordingly
    let local = canvas
        .half_size()
        .map(|h| (rng.gen::<Float>() - 0.5) * h * 2.);

    canvas.to_world(&local)
}

pub fn rand_angle(rng: &mut (impl rand::Rng + ?Sized)) -> Float {
    rng.gen::<Float>() * TAU
}

pub fn rand_dir(rng: &mut (impl rand::Rng + ?Sized)) -> Dir2 {
    Dir2::new_unchecked(Vec2::from_angle(rand_angle(rng)))
}

/// A length of about `min_fraction..max_fraction` times the smallest side of `canvas`.
fn rand_length(
    rng: &mut (impl rand::Rng + ?Sized),
    canvas: &Rectangle,
    min_fraction: Float,
    max_fraction: Float,
) -> Float {
    let side = canvas.width().min(canvas.height()).max(1.);
    side * (min_fraction + rng.gen::<Float>() * (max_fraction - min_fraction))
}

impl Random for Vec2 {
    fn random_in(rng: &mut (impl rand::Rng + ?Sized), canvas: &Rectangle) -> Self {
        rand_point(rng, canvas)
    }
}

impl Random for Ray {
    fn random_in(rng: &mut (impl rand::Rng + ?Sized), canvas: &Rectangle) -> Self {
        Self::new(rand_point(rng, canvas), rand_dir(rng))
    }
}

impl Random for Line {
    fn random_in(rng: &mut (impl rand::Rng + ?Sized), canvas: &Rectangle) -> Self {
        loop {
            let line = Self::new(rand_point(rng, canvas), rand_point(rng, canvas));
            if line.length() > Float::EPSILON {
                break line;
            }
        }
    }
}

impl Random for Circle {
    fn random_in(rng: &mut (impl rand::Rng + ?Sized), canvas: &Rectangle) -> Self {
        let radius = rand_length(rng, canvas, 0.02, 0.15);
        Self::new(rand_point(rng, canvas), radius)
    }
}

impl Random for Rectangle {
    fn random_in(rng: &mut (impl rand::Rng + ?Sized), canvas: &Rectangle) -> Self {
        let size = [
            rand_length(rng, canvas, 0.05, 0.3),
            rand_length(rng, canvas, 0.05, 0.3),
        ];
        let rotation = if rng.gen_bool(0.5) { 0. } else { rand_angle(rng) };

        Self::from_center(rand_point(rng, canvas), size, rotation)
    }
}

impl Random for BezierPath {
    /// A closed loop of 3 to 5 random curves around a random point.
    fn random_in(rng: &mut (impl rand::Rng + ?Sized), canvas: &Rectangle) -> Self {
        let center = rand_point(rng, canvas);
        let num_points = rng.gen_range(3..=5);

        let mut angles: Vec<Float> = iter::repeat_with(|| rand_angle(rng))
            .take(num_points)
            .collect();
        angles.sort_by(Float::total_cmp);

        let points: Vec<Vec2> = angles
            .into_iter()
            .map(|a| center + Vec2::from_angle(a) * rand_length(rng, canvas, 0.05, 0.2))
            .collect();

        let Some((first, rest)) = points.split_first() else {
            return Self::new();
        };

        let mut path = Self::new().move_to(*first);
        for p in rest {
            path = if rng.gen_bool(0.5) {
                path.line_to(*p)
            } else {
                let control = center + (p - center).rotated(rng.gen_range(-0.5..0.5)) * 1.3;
                path.quad_to(control, *p)
            };
        }

        path.close()
    }
}

impl Random for Shape {
    fn random_in(rng: &mut (impl rand::Rng + ?Sized), canvas: &Rectangle) -> Self {
        match rng.gen_range(0usize..4) {
            0 => Line::random_in(rng, canvas).into(),
            1 => Circle::random_in(rng, canvas).into(),
            2 => Rectangle::random_in(rng, canvas).into(),
            3 => BezierPath::random_in(rng, canvas).into(),
            _ => unreachable!(),
        }
    }
}

impl Random for Response {
    /// Mostly reflectors.
    fn random_in(rng: &mut (impl rand::Rng + ?Sized), _canvas: &Rectangle) -> Self {
        match rng.gen_range(0usize..10) {
            0 => Self::Absorb,
            1 => Self::Collimate,
            _ => Self::Reflect,
        }
    }
}

impl Random for Object {
    /// Only lines collimate, other shapes either reflect or absorb.
    fn random_in(rng: &mut (impl rand::Rng + ?Sized), canvas: &Rectangle) -> Self {
        let shape = Shape::random_in(rng, canvas);
        let response = match (&shape, Response::random_in(rng, canvas)) {
            (Shape::Line(_), response) => response,
            (_, Response::Collimate) => Response::Reflect,
            (_, response) => response,
        };

        Self::new(shape, response)
    }
}

impl Random for DrawStyle {
    fn random_in(rng: &mut (impl rand::Rng + ?Sized), _canvas: &Rectangle) -> Self {
        if rng.gen_bool(0.8) {
            Self::Path
        } else {
            Self::Endpoints
        }
    }
}

impl Random for PointEmitter {
    fn random_in(rng: &mut (impl rand::Rng + ?Sized), canvas: &Rectangle) -> Self {
        Self {
            style: DrawStyle::random_in(rng, canvas),
            ..Self::new(rand_point(rng, canvas), rand_dir(rng))
        }
    }
}

impl Random for CircleEmitter {
    /// Casts between 8 and 72 evenly spaced rays.
    fn random_in(rng: &mut (impl rand::Rng + ?Sized), canvas: &Rectangle) -> Self {
        const STEPS: [Float; 5] = [5., 10., 15., 30., 45.];
        let ray_step = STEPS[rng.gen_range(0..STEPS.len())];

        Self {
            style: DrawStyle::random_in(rng, canvas),
            ..Self::new(Circle::random_in(rng, canvas), ray_step)
        }
    }
}

impl Random for LineEmitter {
    /// Casts between 2 and 20 rays.
    fn random_in(rng: &mut (impl rand::Rng + ?Sized), canvas: &Rectangle) -> Self {
        let line = Line::random_in(rng, canvas);
        let ray_step = line.length() / rng.gen_range(1..20) as Float;

        Self {
            style: DrawStyle::random_in(rng, canvas),
            ..Self::new(line, ray_step)
        }
    }
}

impl Random for Emitter {
    fn random_in(rng: &mut (impl rand::Rng + ?Sized), canvas: &Rectangle) -> Self {
        match rng.gen_range(0usize..3) {
            0 => PointEmitter::random_in(rng, canvas).into(),
            1 => CircleEmitter::random_in(rng, canvas).into(),
            2 => LineEmitter::random_in(rng, canvas).into(),
            _ => unreachable!(),
        }
    }
}

impl Random for Scene {
    fn random_in(rng: &mut (impl rand::Rng + ?Sized), canvas: &Rectangle) -> Self {
        const MIN_NUM_OBJECTS: usize = 1;
        const MAX_NUM_OBJECTS: usize = 16;
        const MIN_NUM_EMITTERS: usize = 1;
        const MAX_NUM_EMITTERS: usize = 4;

        let num_objects = rng.gen_range(MIN_NUM_OBJECTS..MAX_NUM_OBJECTS);
        let num_emitters = rng.gen_range(MIN_NUM_EMITTERS..MAX_NUM_EMITTERS);

        random_scene(rng, canvas, num_objects, num_emitters)
    }
}

pub fn gen_random<T: Random>(
    n: usize,
    rng: &mut (impl rand::Rng + ?Sized),
    canvas: &Rectangle,
) -> Vec<T> {
    iter::repeat_with(|| T::random_in(rng, canvas))
        .take(n)
        .collect()
}

/// A scene bounded by `canvas`, with the given number of objects and emitters.
///
/// Circle emitters lying on one of the scene's circles are attached to it, so
/// that their rays leave it instead of bouncing back in.
pub fn random_scene(
    rng: &mut (impl rand::Rng + ?Sized),
    canvas: &Rectangle,
    num_objects: usize,
    num_emitters: usize,
) -> Scene {
    let mut scene = Scene::new(Some(*canvas));
    scene.objects = gen_random(num_objects, rng, canvas);

    for _ in 0..num_emitters {
        let mut emitter = Emitter::random_in(rng, canvas);

        if let Emitter::Circle(e) = &mut emitter {
            if rng.gen_bool(0.3) {
                let index = scene.add_object(e.circle);
                e.scene_index = Some(index);
            }
        }

        scene.add_emitter(emitter);
    }

    scene
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(0x5eed)
    }

    #[test]
    fn points_stay_inside_the_canvas() {
        let mut rng = rng();
        let canvas = Rectangle::from_center([10., -5.], [4., 2.], 0.7);

        for _ in 0..200 {
            let p = Vec2::random_in(&mut rng, &canvas);
            assert!(canvas.contains(&p), "{p} outside of the canvas");
        }
    }

    #[test]
    fn shapes_are_valid() {
        let mut rng = rng();
        let canvas = default_canvas();

        for _ in 0..200 {
            match Shape::random_in(&mut rng, &canvas) {
                Shape::Line(l) => assert!(l.length() > 0.),
                Shape::Circle(c) => assert!(c.radius() > 0.),
                Shape::Rectangle(r) => assert!(r.area() > 0.),
                Shape::Bezier(b) => assert!(b.bounding_box().is_some()),
            }
        }
    }

    #[test]
    fn only_lines_collimate() {
        let mut rng = rng();

        for object in gen_random::<Object>(300, &mut rng, &default_canvas()) {
            if object.response == Response::Collimate {
                assert!(matches!(object.shape, Shape::Line(_)));
            }
        }
    }

    #[test]
    fn emitters_cast_rays() {
        let mut rng = rng();

        for emitter in gen_random::<Emitter>(100, &mut rng, &default_canvas()) {
            assert!(!emitter.seed().is_empty());
        }
    }

    #[test]
    fn circle_emitters_attach_to_their_circle() {
        let mut rng = rng();

        let scene = random_scene(&mut rng, &default_canvas(), 2, 200);

        let attached: Vec<_> = scene
            .emitters
            .iter()
            .filter_map(|e| match e {
                Emitter::Circle(c) => c.scene_index.map(|i| (c, i)),
                _ => None,
            })
            .collect();

        assert!(!attached.is_empty());
        assert_eq!(scene.objects.len(), 2 + attached.len());

        for (emitter, i) in attached {
            assert_eq!(scene.objects[i], Object::reflector(emitter.circle));
        }
    }

    #[test]
    fn scenes_run() {
        let mut rng = rng();
        let canvas = default_canvas();

        let scene = random_scene(&mut rng, &canvas, 8, 3);

        assert!(scene.objects.len() >= 8);
        assert_eq!(scene.emitters.len(), 3);
        assert_eq!(scene.bounds, Some(canvas));

        let emissions = scene.run();
        assert_eq!(emissions.len(), 3);

        for ray in emissions.iter().flat_map(|e| &e.rays) {
            assert!(ray.is_terminated());
            assert!(ray.iteration_count() <= scene.params.iteration_cap);
        }
    }
}
