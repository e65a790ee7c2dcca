use super::*;

use num_traits::AsPrimitive;
use std::path::Path;
use svg::{
    node::element::{self as el, path::Data},
    Document, Node,
};

fn n(x: Float) -> f32 {
    x.as_()
}

fn data_point(p: &Vec2) -> Vec<f32> {
    vec![n(p.x), n(p.y)]
}

/// A [`Canvas`] drawing into an SVG document, with the y axis pointing down.
pub struct SvgCanvas {
    document: Document,
    width: Float,
    height: Float,
}

impl SvgCanvas {
    pub fn try_new(width: Float, height: Float) -> Result<Self, RenderError> {
        if !(width.is_finite() && height.is_finite() && width > 0. && height > 0.) {
            return Err(RenderError::InvalidSize { width, height });
        }

        let document = Document::new()
            .set("width", n(width))
            .set("height", n(height))
            .set("viewBox", (0f32, 0f32, n(width), n(height)));

        Ok(Self {
            document,
            width,
            height,
        })
    }

    /// A canvas covering `bounds`.
    ///
    /// # Panics
    ///
    /// if `bounds` has an empty area
    #[must_use]
    pub fn covering(bounds: &Rectangle) -> Self {
        let bb = bounds.bounding_box();
        let canvas = match Self::try_new(bb.width(), bb.height()) {
            Ok(canvas) => canvas,
            Err(e) => panic!("{e}"),
        };

        let origin = bb.origin();
        Self {
            document: canvas
                .document
                .set("viewBox", (n(origin.x), n(origin.y), n(bb.width()), n(bb.height()))),
            ..canvas
        }
    }

    /// Fills the whole canvas with `color`.
    #[must_use]
    pub fn with_background(mut self, color: Color) -> Self {
        let background = el::Rectangle::new()
            .set("width", "100%")
            .set("height", "100%")
            .set("fill", color.to_css());
        self.document.append(background);
        self
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> [Float; 2] {
        [self.width, self.height]
    }

    #[inline]
    #[must_use]
    pub fn document(&self) -> &Document {
        &self.document
    }

    #[inline]
    #[must_use]
    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), RenderError> {
        svg::save(path, &self.document)?;
        Ok(())
    }

    fn add(&mut self, mut node: impl Node + 'static, style: &Style) {
        match style.stroke {
            Some(color) => {
                node.assign("stroke", color.to_css());
                if !color.is_opaque() {
                    node.assign("stroke-opacity", n(color.alpha));
                }
                node.assign("stroke-width", n(style.stroke_width));
            }
            None => node.assign("stroke", "none"),
        }

        match style.fill {
            Some(color) => {
                node.assign("fill", color.to_css());
                if !color.is_opaque() {
                    node.assign("fill-opacity", n(color.alpha));
                }
            }
            None => node.assign("fill", "none"),
        }

        self.document.append(node);
    }
}

/// The `d` attribute of a `path` element drawing `path`.
#[must_use]
pub fn path_data(path: &BezierPath) -> Data {
    path.elements()
        .iter()
        .fold(Data::new(), |data, element| match element {
            PathElement::MoveTo(p) => data.move_to(data_point(p)),
            PathElement::LineTo(p) => data.line_to(data_point(p)),
            PathElement::QuadTo(c, p) => {
                data.quadratic_curve_to([data_point(c), data_point(p)].concat())
            }
            PathElement::CubicTo(c1, c2, p) => {
                data.cubic_curve_to([data_point(c1), data_point(c2), data_point(p)].concat())
            }
            PathElement::Close => data.close(),
        })
}

impl Canvas for SvgCanvas {
    fn line(&mut self, line: &Line, style: &Style) {
        let node = el::Line::new()
            .set("x1", n(line.start.x))
            .set("y1", n(line.start.y))
            .set("x2", n(line.end.x))
            .set("y2", n(line.end.y));
        self.add(node, style);
    }

    fn circle(&mut self, circle: &Circle, style: &Style) {
        let node = el::Circle::new()
            .set("cx", n(circle.center.x))
            .set("cy", n(circle.center.y))
            .set("r", n(circle.effective_radius()));
        self.add(node, style);
    }

    fn rectangle(&mut self, rect: &Rectangle, style: &Style) {
        let origin = rect.origin();
        let center = rect.center();

        let mut node = el::Rectangle::new()
            .set("x", n(origin.x))
            .set("y", n(origin.y))
            .set("width", n(rect.width()))
            .set("height", n(rect.height()));

        if rect.rotation() != 0. {
            node = node.set(
                "transform",
                format!(
                    "rotate({} {} {})",
                    rect.rotation().to_degrees(),
                    center.x,
                    center.y
                ),
            );
        }

        self.add(node, style);
    }

    fn polygon(&mut self, points: &[Vec2], style: &Style) {
        let points = points
            .iter()
            .map(|p| format!("{},{}", p.x, p.y))
            .collect::<Vec<_>>()
            .join(" ");
        self.add(el::Polygon::new().set("points", points), style);
    }

    fn path(&mut self, path: &BezierPath, style: &Style) {
        if path.is_empty() {
            return;
        }
        self.add(el::Path::new().set("d", path_data(path)), style);
    }

    fn point(&mut self, p: &Vec2, style: &Style) {
        let color = style.stroke.or(style.fill).unwrap_or(Color::BLACK);
        let node = el::Circle::new()
            .set("cx", n(p.x))
            .set("cy", n(p.y))
            .set("r", n(style.stroke_width.max(0.5)));
        self.add(node, &Style::filled(color));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_canvases() {
        assert!(matches!(
            SvgCanvas::try_new(0., 10.),
            Err(RenderError::InvalidSize { .. })
        ));
        assert!(SvgCanvas::try_new(Float::INFINITY, 10.).is_err());
    }

    #[test]
    fn writes_elements() {
        let mut canvas = SvgCanvas::try_new(100., 50.).unwrap();

        {
            let mut ctx = DrawContext::new(&mut canvas);
            ctx.draw(&Circle::new([10., 20.], 5.));
            ctx.set_stroke(None);
            ctx.set_fill(Some(Color::RED));
            ctx.draw(&Rectangle::from_center([50., 25.], [10., 10.], 0.5));
            ctx.draw(&BezierPath::new().move_to([0., 0.]).quad_to([1., 1.], [2., 0.]));
        }

        let out = canvas.document().to_string();

        assert!(out.contains("<circle"));
        assert!(out.contains("cx=\"10\""));
        assert!(out.contains("r=\"5\""));
        assert!(out.contains("<rect"));
        assert!(out.contains("rotate("));
        assert!(out.contains("fill=\"rgb(220,40,40)\""));
        assert!(out.contains("<path"));
    }

    #[test]
    fn empty_paths_are_skipped() {
        let mut canvas = SvgCanvas::try_new(10., 10.).unwrap();
        let before = canvas.document().to_string();

        canvas.path(&BezierPath::new(), &Style::default());

        assert_eq!(canvas.document().to_string(), before);
    }
}
