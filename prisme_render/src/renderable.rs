use super::*;

/// Something that can be drawn in a [`DrawContext`], with it's current style.
#[impl_trait_for_tuples::impl_for_tuples(16)]
pub trait Renderable {
    fn render(&self, ctx: &mut DrawContext<'_>);
}

impl Renderable for Vec2 {
    fn render(&self, ctx: &mut DrawContext<'_>) {
        ctx.point(self);
    }
}

impl Renderable for Line {
    fn render(&self, ctx: &mut DrawContext<'_>) {
        ctx.line(self);
    }
}

impl Renderable for Circle {
    fn render(&self, ctx: &mut DrawContext<'_>) {
        ctx.circle(self);
    }
}

impl Renderable for Rectangle {
    fn render(&self, ctx: &mut DrawContext<'_>) {
        ctx.rectangle(self);
    }
}

impl Renderable for BezierPath {
    fn render(&self, ctx: &mut DrawContext<'_>) {
        ctx.path(self);
    }
}

impl Renderable for Shape {
    fn render(&self, ctx: &mut DrawContext<'_>) {
        match self {
            Self::Line(l) => l.render(ctx),
            Self::Circle(c) => c.render(ctx),
            Self::Rectangle(r) => r.render(ctx),
            Self::Bezier(b) => b.render(ctx),
        }
    }
}

/// Absorbers are drawn in grey, lenses in blue.
impl Renderable for Object {
    fn render(&self, ctx: &mut DrawContext<'_>) {
        ctx.scoped(|ctx| {
            match self.response {
                Response::Reflect => {}
                Response::Absorb => ctx.set_stroke(Some(Color::GREY)),
                Response::Collimate => ctx.set_stroke(Some(Color::BLUE)),
            }
            self.shape.render(ctx);
        });
    }
}

/// The path travelled by the ray.
impl Renderable for Ray {
    fn render(&self, ctx: &mut DrawContext<'_>) {
        self.path().render(ctx);
    }
}

impl Renderable for Emission {
    fn render(&self, ctx: &mut DrawContext<'_>) {
        for ray in &self.rays {
            match self.style {
                DrawStyle::Path => ray.render(ctx),
                DrawStyle::Endpoints => {
                    for segment in ray.path() {
                        ctx.point(&segment.end);
                    }
                }
            }
        }

        if let Some(outline) = &self.outline {
            outline.render(ctx);
        }
    }
}

/// The emitter's geometry. See [`Emission`] for the rays it casts.
impl Renderable for Emitter {
    fn render(&self, ctx: &mut DrawContext<'_>) {
        match self {
            Self::Point(e) => ctx.point(&e.origin),
            Self::Circle(e) => ctx.circle(&e.circle),
            Self::Line(e) => ctx.line(&e.line),
        }
    }
}

/// The objects, and the bounds of the scene. Rays have to be cast and drawn separately.
impl Renderable for Scene {
    fn render(&self, ctx: &mut DrawContext<'_>) {
        if let Some(bounds) = &self.bounds {
            ctx.scoped(|ctx| {
                ctx.set_stroke(Some(Color::GREY));
                bounds.render(ctx);
            });
        }
        self.objects.render(ctx);
    }
}

impl<T: Renderable> Renderable for [T] {
    fn render(&self, ctx: &mut DrawContext<'_>) {
        self.iter().for_each(|a| a.render(ctx));
    }
}

impl<const N: usize, T: Renderable> Renderable for [T; N] {
    fn render(&self, ctx: &mut DrawContext<'_>) {
        self.as_slice().render(ctx);
    }
}

impl<T: Renderable> Renderable for Vec<T> {
    fn render(&self, ctx: &mut DrawContext<'_>) {
        self.as_slice().render(ctx);
    }
}

impl<T: Renderable> Renderable for Option<T> {
    fn render(&self, ctx: &mut DrawContext<'_>) {
        if let Some(a) = self {
            a.render(ctx);
        }
    }
}

impl<T: Renderable + ?Sized> Renderable for Box<T> {
    fn render(&self, ctx: &mut DrawContext<'_>) {
        self.as_ref().render(ctx);
    }
}

impl<T: Renderable + ?Sized> Renderable for Arc<T> {
    fn render(&self, ctx: &mut DrawContext<'_>) {
        self.as_ref().render(ctx);
    }
}

impl<T: Renderable + ?Sized> Renderable for Rc<T> {
    fn render(&self, ctx: &mut DrawContext<'_>) {
        self.as_ref().render(ctx);
    }
}

impl<T: Renderable + ?Sized> Renderable for &T {
    fn render(&self, ctx: &mut DrawContext<'_>) {
        (*self).render(ctx);
    }
}

impl<T: Renderable + ?Sized> Renderable for &mut T {
    fn render(&self, ctx: &mut DrawContext<'_>) {
        (*self as &T).render(ctx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn styles_are_scoped() {
        let mut canvas = RecordingCanvas::default();
        let mut ctx = DrawContext::new(&mut canvas);

        let objects = (
            Object::absorber(Circle::new([0., 0.], 1.)),
            Object::reflector(Line::new([0., 0.], [1., 1.])),
        );
        ctx.draw(&objects);

        let styles: Vec<_> = canvas.commands().iter().map(DrawCommand::style).collect();
        assert_eq!(styles[0].stroke, Some(Color::GREY));
        assert_eq!(styles[1].stroke, Some(Color::BLACK));
    }

    #[test]
    fn emissions_in_both_styles() {
        let wall = [Line::new([-5., 2.], [5., 2.])];
        let mut emitter = LineEmitter::new(Line::new([0., 0.], [2., 0.]), 1.);

        let emission = emitter.emit(&wall, &RayParams::default());

        let mut canvas = RecordingCanvas::default();
        DrawContext::new(&mut canvas).draw(&emission);

        // 3 rays, one segment each, and the emitter's line
        let lines = canvas
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line(..)))
            .count();
        assert_eq!(lines, 4);

        emitter.style = DrawStyle::Endpoints;
        let emission = emitter.emit(&wall, &RayParams::default());

        let mut canvas = RecordingCanvas::default();
        DrawContext::new(&mut canvas).draw(&emission);

        let points = canvas
            .commands()
            .iter()
            .filter(|c| matches!(c, DrawCommand::Point(..)))
            .count();
        assert_eq!(points, 3);
    }

    #[test]
    fn collections_and_wrappers() {
        let items = (
            [Circle::new([0., 0.], 1.), Circle::new([2., 0.], 1.)],
            Rc::new(Rectangle::from_corner(0., 0., 1., 1.)),
            Some(Line::new([0., 0.], [1., 0.])),
            None::<Vec2>,
        );

        let mut canvas = RecordingCanvas::default();
        DrawContext::new(&mut canvas).draw(&items);

        assert_eq!(canvas.commands().len(), 4);
    }
}
