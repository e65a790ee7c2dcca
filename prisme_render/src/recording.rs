use super::*;

/// A single call made to a [`Canvas`].
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCommand {
    Line(Line, Style),
    Circle(Circle, Style),
    Rectangle(Rectangle, Style),
    Polygon(Vec<Vec2>, Style),
    Path(BezierPath, Style),
    Point(Vec2, Style),
}

impl DrawCommand {
    #[must_use]
    pub fn style(&self) -> Style {
        match self {
            Self::Line(_, s)
            | Self::Circle(_, s)
            | Self::Rectangle(_, s)
            | Self::Polygon(_, s)
            | Self::Path(_, s)
            | Self::Point(_, s) => *s,
        }
    }
}

/// A [`Canvas`] that only remembers what was drawn on it, in order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RecordingCanvas {
    commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    #[inline]
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    #[inline]
    #[must_use]
    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    /// Replays every recorded command onto `canvas`.
    pub fn replay(&self, canvas: &mut dyn Canvas) {
        for command in &self.commands {
            match command {
                DrawCommand::Line(l, s) => canvas.line(l, s),
                DrawCommand::Circle(c, s) => canvas.circle(c, s),
                DrawCommand::Rectangle(r, s) => canvas.rectangle(r, s),
                DrawCommand::Polygon(points, s) => canvas.polygon(points, s),
                DrawCommand::Path(p, s) => canvas.path(p, s),
                DrawCommand::Point(p, s) => canvas.point(p, s),
            }
        }
    }
}

impl Canvas for RecordingCanvas {
    fn line(&mut self, line: &Line, style: &Style) {
        self.commands.push(DrawCommand::Line(*line, *style));
    }

    fn circle(&mut self, circle: &Circle, style: &Style) {
        self.commands.push(DrawCommand::Circle(*circle, *style));
    }

    fn rectangle(&mut self, rect: &Rectangle, style: &Style) {
        self.commands.push(DrawCommand::Rectangle(*rect, *style));
    }

    fn polygon(&mut self, points: &[Vec2], style: &Style) {
        self.commands.push(DrawCommand::Polygon(points.to_vec(), *style));
    }

    fn path(&mut self, path: &BezierPath, style: &Style) {
        self.commands.push(DrawCommand::Path(path.clone(), *style));
    }

    fn point(&mut self, p: &Vec2, style: &Style) {
        self.commands.push(DrawCommand::Point(*p, *style));
    }
}
