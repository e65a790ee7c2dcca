use super::*;

/// What happens to a ray hitting an [`Object`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum Response {
    /// Specular reflection about the surface's normal.
    #[default]
    Reflect,
    /// The ray stops there.
    Absorb,
    /// Rays arriving from the side the surface's normal points away from leave along
    /// that normal. Rays arriving from the other side are absorbed.
    Collimate,
}

impl Response {
    /// How a ray traveling along `dir` is deflected by a surface with normal `normal`.
    #[must_use]
    pub fn deflection(&self, dir: &Dir2, normal: Dir2) -> Deflection {
        match self {
            Self::Reflect => Deflection::Reflect(normal),
            Self::Absorb => Deflection::Terminate,
            Self::Collimate if dir.dot(normal.as_ref()) > 0. => Deflection::Redirect(normal),
            Self::Collimate => Deflection::Terminate,
        }
    }
}

/// A shape placed in a scene, along with how it reacts to rays.
#[derive(Clone, Debug, PartialEq)]
pub struct Object {
    pub shape: Shape,
    pub response: Response,
}

impl Object {
    #[inline]
    #[must_use]
    pub fn new(shape: impl Into<Shape>, response: Response) -> Self {
        Self {
            shape: shape.into(),
            response,
        }
    }

    #[inline]
    #[must_use]
    pub fn reflector(shape: impl Into<Shape>) -> Self {
        Self::new(shape, Response::Reflect)
    }

    #[inline]
    #[must_use]
    pub fn absorber(shape: impl Into<Shape>) -> Self {
        Self::new(shape, Response::Absorb)
    }

    /// A lens collimating rays crossing `line` towards [`Line::normal`].
    #[inline]
    #[must_use]
    pub fn fresnel(line: Line) -> Self {
        Self::new(line, Response::Collimate)
    }

    #[inline]
    #[must_use]
    pub fn bounding_box(&self) -> Rectangle {
        self.shape.bounding_box()
    }
}

impl From<Shape> for Object {
    fn from(shape: Shape) -> Self {
        Self::reflector(shape)
    }
}

impl From<Line> for Object {
    fn from(line: Line) -> Self {
        Self::reflector(line)
    }
}

impl From<Circle> for Object {
    fn from(circle: Circle) -> Self {
        Self::reflector(circle)
    }
}

impl From<Rectangle> for Object {
    fn from(rect: Rectangle) -> Self {
        Self::reflector(rect)
    }
}

impl From<BezierPath> for Object {
    fn from(path: BezierPath) -> Self {
        Self::reflector(path)
    }
}

impl Deflector for Object {
    fn closest_hit(&self, ray: &Ray, ctx: SimulationCtx) -> Option<Hit> {
        ctx.closest(
            self.shape
                .normals_at_intersections(ray)
                .into_iter()
                .map(|(t, n)| Hit::new(t, self.response.deflection(&ray.direction, n))),
        )
    }
}

/// Absorbs every ray hitting the wrapped object.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Absorbing<M>(pub M);

impl<M: Deflector> Deflector for Absorbing<M> {
    #[inline]
    fn closest_hit(&self, ray: &Ray, ctx: SimulationCtx) -> Option<Hit> {
        self.0
            .closest_hit(ray, ctx)
            .map(|hit| hit.map_deflection(|_| Deflection::Terminate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn reflectors_by_default() {
        let o: Object = Shape::from(Circle::new([5., 0.], 1.)).into();
        assert_eq!(o.response, Response::Reflect);

        let ray = Ray::new_normalize([0., 0.], [1., 0.]).cast(
            &[o],
            &RayParams {
                iteration_cap: 3,
                ..Default::default()
            },
        );

        assert_eq!(ray.path().len(), 1);
        assert_relative_eq!(ray.direction.into_inner(), Vec2::new(-1., 0.));
        assert_eq!(ray.termination(), Some(Termination::Escaped));
    }

    #[test]
    fn bare_shapes_become_reflectors() {
        let mut scene = Scene::default();
        let i = scene.add_object(Circle::new([0., 0.], 1.));
        let j = scene.add_object(Rectangle::from_corner(0., 0., 1., 1.));

        assert_eq!((i, j), (0, 1));
        assert_eq!(scene.objects[0], Object::reflector(Circle::new([0., 0.], 1.)));
        assert!(scene.objects.iter().all(|o| o.response == Response::Reflect));
    }

    #[test]
    fn fresnel_collimates_from_the_transmitting_side() {
        // normal points towards +x
        let lens = Object::fresnel(Line::new([2., 1.], [2., -1.]));
        let probe = Ray::new_normalize([0., 0.], [1., 0.]);
        let (_, n) = lens.shape.normals_at_intersections(&probe)[0];
        assert_relative_eq!(n.into_inner(), Vec2::new(1., 0.));

        let ray = Ray::new_normalize([0., 0.], [1., 0.25])
            .cast(&[lens.clone()], &RayParams::default());
        assert_eq!(ray.path().len(), 1);
        assert_relative_eq!(ray.direction.into_inner(), Vec2::new(1., 0.));
        assert_eq!(ray.termination(), Some(Termination::Escaped));

        let back = Ray::new_normalize([4., 0.], [-1., 0.2]).cast(&[lens], &RayParams::default());
        assert_eq!(back.path().len(), 1);
        assert_eq!(back.termination(), Some(Termination::Absorbed));
    }

    #[test]
    fn absorbing_anything() {
        let bounds = Absorbing(Rectangle::from_corner(0., 0., 10., 10.));
        let ray = Ray::new_normalize([5., 5.], [1., 1.]).cast(&bounds, &RayParams::default());

        assert_eq!(ray.path().len(), 1);
        assert_eq!(ray.termination(), Some(Termination::Absorbed));
        assert_relative_eq!(ray.origin, Vec2::new(10., 10.), epsilon = 1e-9);
    }
}
