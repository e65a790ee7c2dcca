use super::*;

use log::warn;

/// A drawing backend.
///
/// Every call carries the full [`Style`] it should be drawn with, backends keep no pen state.
pub trait Canvas {
    fn line(&mut self, line: &Line, style: &Style);
    fn circle(&mut self, circle: &Circle, style: &Style);
    fn rectangle(&mut self, rect: &Rectangle, style: &Style);
    /// A closed polygon going through `points`.
    fn polygon(&mut self, points: &[Vec2], style: &Style);
    fn path(&mut self, path: &BezierPath, style: &Style);
    /// A dot, sized after `style.stroke_width`.
    fn point(&mut self, p: &Vec2, style: &Style);
}

impl<C: Canvas + ?Sized> Canvas for &mut C {
    fn line(&mut self, line: &Line, style: &Style) {
        (**self).line(line, style);
    }

    fn circle(&mut self, circle: &Circle, style: &Style) {
        (**self).circle(circle, style);
    }

    fn rectangle(&mut self, rect: &Rectangle, style: &Style) {
        (**self).rectangle(rect, style);
    }

    fn polygon(&mut self, points: &[Vec2], style: &Style) {
        (**self).polygon(points, style);
    }

    fn path(&mut self, path: &BezierPath, style: &Style) {
        (**self).path(path, style);
    }

    fn point(&mut self, p: &Vec2, style: &Style) {
        (**self).point(p, style);
    }
}

/// The state of one render pass: the canvas drawn onto, and the current style.
pub struct DrawContext<'a> {
    canvas: &'a mut dyn Canvas,
    style: Style,
    saved: Vec<Style>,
}

impl<'a> DrawContext<'a> {
    #[inline]
    pub fn new(canvas: &'a mut dyn Canvas) -> Self {
        Self {
            canvas,
            style: Style::default(),
            saved: Vec::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn style(&self) -> &Style {
        &self.style
    }

    #[inline]
    pub fn style_mut(&mut self) -> &mut Style {
        &mut self.style
    }

    #[inline]
    pub fn set_style(&mut self, style: Style) {
        self.style = style;
    }

    #[inline]
    pub fn set_stroke(&mut self, color: Option<Color>) {
        self.style.stroke = color;
    }

    #[inline]
    pub fn set_fill(&mut self, color: Option<Color>) {
        self.style.fill = color;
    }

    #[inline]
    pub fn set_stroke_width(&mut self, width: Float) {
        self.style.stroke_width = width;
    }

    /// Push the current style, to be brought back by [`Self::restore`].
    #[inline]
    pub fn save(&mut self) {
        self.saved.push(self.style);
    }

    pub fn restore(&mut self) {
        match self.saved.pop() {
            Some(style) => self.style = style,
            None => warn!("`DrawContext::restore` called without a matching `save`"),
        }
    }

    /// Runs `f` with a copy of the current style, restored afterwards.
    pub fn scoped<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.save();
        let r = f(self);
        self.restore();
        r
    }

    pub fn line(&mut self, line: &Line) {
        self.canvas.line(line, &self.style);
    }

    pub fn circle(&mut self, circle: &Circle) {
        self.canvas.circle(circle, &self.style);
    }

    pub fn rectangle(&mut self, rect: &Rectangle) {
        self.canvas.rectangle(rect, &self.style);
    }

    pub fn polygon(&mut self, points: &[Vec2]) {
        self.canvas.polygon(points, &self.style);
    }

    pub fn path(&mut self, path: &BezierPath) {
        self.canvas.path(path, &self.style);
    }

    pub fn point(&mut self, p: &Vec2) {
        self.canvas.point(p, &self.style);
    }

    /// Draws `item` in this context.
    #[inline]
    pub fn draw(&mut self, item: &(impl Renderable + ?Sized)) {
        item.render(self);
    }
}
