use super::*;

use log::{debug, warn};

/// Most rays a single circle or line emitter casts, whatever it's `ray_step`.
pub const MAX_EMITTED_RAYS: usize = 100_000;

/// How the rays of an [`Emission`] are meant to be drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum DrawStyle {
    /// Every segment travelled.
    #[default]
    Path,
    /// Only the end point of every segment.
    Endpoints,
}

/// The rays cast by an emitter, once they stopped propagating.
#[derive(Clone, Debug, PartialEq)]
pub struct Emission {
    pub rays: Vec<Ray>,
    pub style: DrawStyle,
    /// The emitter's own shape, if it should be drawn too.
    pub outline: Option<Shape>,
}

/// Something that casts rays through a scene.
pub trait Emit {
    /// The rays this emitter casts, not propagated yet.
    fn seed(&self) -> Vec<Ray>;

    fn style(&self) -> DrawStyle {
        DrawStyle::default()
    }

    fn outline(&self) -> Option<Shape> {
        None
    }

    /// Index of the scene object this emitter lies on. It is ignored by the first step
    /// of every ray.
    fn scene_index(&self) -> Option<usize> {
        None
    }

    /// Casts every ray from [`Self::seed`] through `scene`.
    fn emit<M: Deflector + ?Sized>(&self, scene: &M, params: &RayParams) -> Emission
    where
        Self: Sized,
    {
        let rays: Vec<_> = self
            .seed()
            .into_iter()
            .map(|ray| {
                let mut path = RayPath::new(scene, ray, *params).excluding(self.scene_index());
                path.by_ref().for_each(drop);
                path.into_ray()
            })
            .collect();

        debug!(
            "cast {} rays, {} segments in total",
            rays.len(),
            rays.iter().map(|r| r.path().len()).sum::<usize>(),
        );

        Emission {
            rays,
            style: self.style(),
            outline: self.outline(),
        }
    }
}

/// Casts a single ray.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointEmitter {
    pub origin: Vec2,
    pub direction: Dir2,
    pub style: DrawStyle,
}

impl PointEmitter {
    #[inline]
    #[must_use]
    pub fn new(origin: impl Into<Vec2>, direction: Dir2) -> Self {
        Self {
            origin: origin.into(),
            direction,
            style: DrawStyle::Path,
        }
    }
}

impl Emit for PointEmitter {
    fn seed(&self) -> Vec<Ray> {
        vec![Ray::new(self.origin, self.direction)]
    }

    fn style(&self) -> DrawStyle {
        self.style
    }
}

/// Casts rays radially outwards from the border of a circle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CircleEmitter {
    pub circle: Circle,
    /// Angle between two consecutive rays, in degrees.
    pub ray_step: Float,
    pub style: DrawStyle,
    /// Whether the circle itself should be drawn.
    pub outline: bool,
    pub scene_index: Option<usize>,
}

impl CircleEmitter {
    #[inline]
    #[must_use]
    pub fn new(circle: Circle, ray_step: Float) -> Self {
        Self {
            circle,
            ray_step,
            style: DrawStyle::Path,
            outline: true,
            scene_index: None,
        }
    }

    /// The angles, in degrees, rays are cast at: `ray_step, 2 * ray_step, ...` up
    /// to `360` included.
    ///
    /// Empty if `ray_step` isn't positive, or is larger than a full turn. Only the
    /// first [`MAX_EMITTED_RAYS`] are kept.
    #[must_use]
    pub fn angles(&self) -> Vec<Float> {
        if !(self.ray_step.is_finite() && self.ray_step > 0.) {
            return Vec::new();
        }

        // saturates for tiny steps
        let count = (360. / self.ray_step + 1e-9).floor() as usize;
        if count > MAX_EMITTED_RAYS {
            warn!("a ray step of {}° casts {count} rays, keeping {MAX_EMITTED_RAYS}", self.ray_step);
        }

        (1..=count.min(MAX_EMITTED_RAYS))
            .map(|i| i as Float * self.ray_step)
            .collect()
    }
}

impl Emit for CircleEmitter {
    fn seed(&self) -> Vec<Ray> {
        self.angles()
            .into_iter()
            .map(|deg| {
                let angle = deg.to_radians();
                Ray::from_angle(self.circle.point_at(angle), angle)
            })
            .collect()
    }

    fn style(&self) -> DrawStyle {
        self.style
    }

    fn outline(&self) -> Option<Shape> {
        self.outline.then_some(Shape::Circle(self.circle))
    }

    fn scene_index(&self) -> Option<usize> {
        self.scene_index
    }
}

/// Casts parallel rays along a segment, towards [`Line::normal`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineEmitter {
    pub line: Line,
    /// Distance between two consecutive rays.
    pub ray_step: Float,
    pub style: DrawStyle,
    pub scene_index: Option<usize>,
}

impl LineEmitter {
    #[inline]
    #[must_use]
    pub fn new(line: Line, ray_step: Float) -> Self {
        Self {
            line,
            ray_step,
            style: DrawStyle::Path,
            scene_index: None,
        }
    }

    /// The parameters along the line rays start at: multiples of `ray_step / length`
    /// strictly smaller than `1 + ray_step / length`.
    ///
    /// The last one may lie slightly past the end of the segment. Only the
    /// first [`MAX_EMITTED_RAYS`] are kept.
    #[must_use]
    pub fn params(&self) -> Vec<Float> {
        let length = self.line.length();

        if !(self.ray_step.is_finite() && self.ray_step > 0. && length > 0.) {
            return Vec::new();
        }

        let stride = self.ray_step / length;
        let end = 1. + stride - 1e-9;

        let params: Vec<_> = (0..=MAX_EMITTED_RAYS)
            .map(|i| i as Float * stride)
            .take_while(|t| *t < end)
            .collect();

        if params.len() > MAX_EMITTED_RAYS {
            warn!("a ray step of {} casts too many rays, keeping {MAX_EMITTED_RAYS}", self.ray_step);
            return params[..MAX_EMITTED_RAYS].to_vec();
        }

        params
    }
}

impl Emit for LineEmitter {
    fn seed(&self) -> Vec<Ray> {
        let Some(direction) = Dir2::try_new(self.line.normal(), 0.) else {
            return Vec::new();
        };

        self.params()
            .into_iter()
            .map(|t| Ray::new(self.line.at(t), direction))
            .collect()
    }

    fn style(&self) -> DrawStyle {
        self.style
    }

    fn outline(&self) -> Option<Shape> {
        Some(Shape::Line(self.line))
    }

    fn scene_index(&self) -> Option<usize> {
        self.scene_index
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Emitter {
    Point(PointEmitter),
    Circle(CircleEmitter),
    Line(LineEmitter),
}

impl Emit for Emitter {
    fn seed(&self) -> Vec<Ray> {
        match self {
            Self::Point(e) => e.seed(),
            Self::Circle(e) => e.seed(),
            Self::Line(e) => e.seed(),
        }
    }

    fn style(&self) -> DrawStyle {
        match self {
            Self::Point(e) => e.style(),
            Self::Circle(e) => e.style(),
            Self::Line(e) => e.style(),
        }
    }

    fn outline(&self) -> Option<Shape> {
        match self {
            Self::Point(e) => e.outline(),
            Self::Circle(e) => e.outline(),
            Self::Line(e) => e.outline(),
        }
    }

    fn scene_index(&self) -> Option<usize> {
        match self {
            Self::Point(e) => e.scene_index(),
            Self::Circle(e) => e.scene_index(),
            Self::Line(e) => e.scene_index(),
        }
    }
}

impl From<PointEmitter> for Emitter {
    fn from(e: PointEmitter) -> Self {
        Self::Point(e)
    }
}

impl From<CircleEmitter> for Emitter {
    fn from(e: CircleEmitter) -> Self {
        Self::Circle(e)
    }
}

impl From<LineEmitter> for Emitter {
    fn from(e: LineEmitter) -> Self {
        Self::Line(e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn circle_emitter_angles() {
        let e = CircleEmitter::new(Circle::new([0., 0.], 1.), 90.);
        assert_eq!(e.angles(), [90., 180., 270., 360.]);

        let e = CircleEmitter::new(Circle::new([0., 0.], 1.), 7.);
        assert_eq!(e.angles().len(), 51);

        for step in [0., -10., 361., Float::NAN] {
            assert!(CircleEmitter::new(Circle::new([0., 0.], 1.), step).angles().is_empty());
        }
    }

    #[test]
    fn circle_emitter_rays_point_outwards() {
        let c = Circle::new([3., 4.], 2.);
        let rays = CircleEmitter::new(c, 45.).seed();

        assert_eq!(rays.len(), 8);
        for ray in rays {
            assert_relative_eq!((ray.origin - c.center).norm(), 2., epsilon = 1e-12);
            let outward = (ray.origin - c.center).normalize();
            assert_relative_eq!(ray.direction.into_inner(), outward, epsilon = 1e-12);
        }
    }

    #[test]
    fn line_emitter_stride() {
        let line = Line::new([0., 0.], [10., 0.]);

        let params = LineEmitter::new(line, 2.).params();
        assert_eq!(params.len(), 6);
        assert_relative_eq!(*params.last().unwrap(), 1., epsilon = 1e-12);

        // 0, 3, 6, 9 and 12, past the end
        assert_eq!(LineEmitter::new(line, 3.).params().len(), 5);

        assert!(LineEmitter::new(line, 0.).params().is_empty());
        assert!(LineEmitter::new(Line::new([1., 1.], [1., 1.]), 1.).seed().is_empty());
    }

    #[test]
    fn tiny_steps_are_capped() {
        let circle = CircleEmitter::new(Circle::new([0., 0.], 1.), 1e-300);
        let angles = circle.angles();
        assert_eq!(angles.len(), MAX_EMITTED_RAYS);
        assert_eq!(angles[0], 1e-300);

        let line = LineEmitter::new(Line::new([0., 0.], [1., 0.]), 1e-300);
        let params = line.params();
        assert_eq!(params.len(), MAX_EMITTED_RAYS);
        assert_eq!(params[0], 0.);
    }

    #[test]
    fn line_emitter_rays_are_parallel() {
        let line = Line::new([0., 0.], [4., 0.]);
        let rays = LineEmitter::new(line, 1.).seed();

        assert_eq!(rays.len(), 5);
        for (i, ray) in rays.iter().enumerate() {
            assert_relative_eq!(ray.origin, Vec2::new(i as Float, 0.), epsilon = 1e-12);
            assert_relative_eq!(ray.direction.into_inner(), Vec2::new(0., 1.));
        }
    }

    #[test]
    fn emission_carries_style_and_outline() {
        let wall = [Line::new([-10., 5.], [10., 5.])];

        let mut e = LineEmitter::new(Line::new([0., 0.], [1., 0.]), 1.);
        e.style = DrawStyle::Endpoints;

        let emission = Emitter::from(e).emit(&wall, &RayParams::default());

        assert_eq!(emission.style, DrawStyle::Endpoints);
        assert_eq!(emission.outline, Some(Shape::Line(e.line)));
        assert_eq!(emission.rays.len(), 2);

        for ray in &emission.rays {
            assert_relative_eq!(ray.path()[0].end.y, 5., epsilon = 1e-9);
        }
    }

    #[test]
    fn point_emitter_casts_once() {
        let emission = PointEmitter::new([0., 0.], Vec2::x_axis()).emit(
            &[Circle::new([5., 0.], 1.)],
            &RayParams {
                iteration_cap: 1,
                ..Default::default()
            },
        );

        assert_eq!(emission.rays.len(), 1);
        assert_eq!(emission.outline, None);
        assert_eq!(emission.rays[0].path().len(), 1);
    }
}
