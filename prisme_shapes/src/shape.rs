use super::*;

use core::f64::consts::TAU;

/// Every kind of shape that can be placed in a scene.
#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Line(Line),
    Circle(Circle),
    Rectangle(Rectangle),
    Bezier(BezierPath),
}

impl Shape {
    /// All the points where the outlines of `self` and `other` cross.
    #[must_use]
    pub fn intersections(&self, other: &Shape) -> Vec<Vec2> {
        use Shape as S;

        match (self, other) {
            (S::Line(a), S::Line(b)) => line_line(a, b).into_iter().collect(),
            (S::Line(l), S::Circle(c)) | (S::Circle(c), S::Line(l)) => {
                line_circle(l, c).into_iter().collect()
            }
            (S::Line(l), S::Rectangle(r)) | (S::Rectangle(r), S::Line(l)) => line_rectangle(l, r),
            (S::Circle(a), S::Circle(b)) => circle_circle(a, b).into_iter().collect(),
            (S::Circle(c), S::Rectangle(r)) | (S::Rectangle(r), S::Circle(c)) => {
                circle_rectangle(c, r)
            }
            (S::Rectangle(a), S::Rectangle(b)) => rectangle_rectangle(a, b),
            (S::Bezier(p), S::Line(l)) | (S::Line(l), S::Bezier(p)) => {
                line_polyline(l, &p.flattened_lines())
            }
            (S::Bezier(p), S::Circle(c)) | (S::Circle(c), S::Bezier(p)) => {
                circle_polyline(c, &p.flattened_lines())
            }
            (S::Bezier(p), S::Rectangle(r)) | (S::Rectangle(r), S::Bezier(p)) => {
                polyline_polyline(&p.flattened_lines(), &r.edges())
            }
            (S::Bezier(a), S::Bezier(b)) => {
                polyline_polyline(&a.flattened_lines(), &b.flattened_lines())
            }
        }
    }

    /// Whether `p` is inside this shape. Lines only contain the points on them.
    #[must_use]
    pub fn contains(&self, p: &Vec2) -> bool {
        match self {
            Self::Line(l) => l.contains(p, POINT_EPS),
            Self::Circle(c) => c.contains(p),
            Self::Rectangle(r) => r.contains(p),
            Self::Bezier(b) => b.contains(p),
        }
    }

    #[must_use]
    pub fn center(&self) -> Vec2 {
        match self {
            Self::Line(l) => l.midpoint(),
            Self::Circle(c) => c.center,
            Self::Rectangle(r) => r.center(),
            Self::Bezier(b) => b.bounding_box().map_or_else(Vec2::zeros, |bb| bb.center()),
        }
    }

    /// The smallest axis-aligned rectangle containing this shape.
    #[must_use]
    pub fn bounding_box(&self) -> Rectangle {
        match self {
            Self::Line(l) => {
                let [min, max] = l.bounds();
                let size = max - min;
                Rectangle::from_center((min + max) / 2., size, 0.)
            }
            Self::Circle(c) => c.bounding_box(),
            Self::Rectangle(r) => r.bounding_box(),
            Self::Bezier(b) => b
                .bounding_box()
                .unwrap_or_else(|| Rectangle::from_corner(0., 0., 0., 0.)),
        }
    }

    /// The point of the outline in the direction `angle` from [`Self::center`],
    /// the furthest one if there are several.
    #[must_use]
    pub fn boundary_point(&self, angle: Float) -> Vec2 {
        match self {
            Self::Circle(c) => c.point_at(angle),
            Self::Rectangle(r) => r.boundary_point(angle),
            other => {
                let ray = Ray::from_angle(other.center(), angle);
                other
                    .normals_at_intersections(&ray)
                    .into_iter()
                    .map(|(t, _)| t)
                    .filter(|t| *t >= 0.)
                    .max_by(Float::total_cmp)
                    .map_or(ray.origin, |t| ray.at(t))
            }
        }
    }

    /// Every `(t, n)` such that `ray.at(t)` is on the outline of this shape,
    /// `n` being the normal of the outline there.
    ///
    /// For circles and rectangles `n` points outwards, for lines and paths it's
    /// a quarter turn counter-clockwise from the direction of the segment hit.
    #[must_use]
    pub fn normals_at_intersections(&self, ray: &Ray) -> Vec<(Float, Dir2)> {
        match self {
            Self::Line(l) => Dir2::try_new(l.normal(), 0.)
                .zip(l.ray_intersection(ray))
                .map(|(n, t)| (t, n))
                .into_iter()
                .collect(),
            Self::Circle(c) => c.normals_at_intersections(ray).into_iter().collect(),
            Self::Rectangle(r) => r.normals_at_intersections(ray).into_iter().collect(),
            Self::Bezier(b) => b.normals_at_intersections(ray),
        }
    }

    /// The outline of this shape, as a path.
    #[must_use]
    pub fn to_path(&self) -> BezierPath {
        match self {
            Self::Line(l) => BezierPath::new().move_to(l.start).line_to(l.end),
            Self::Circle(c) => BezierPath::new()
                .arc(c.center, c.effective_radius(), 0., TAU)
                .close(),
            Self::Rectangle(r) => BezierPath::polyline(r.corners(), true),
            Self::Bezier(b) => b.clone(),
        }
    }

    #[must_use]
    pub fn translated(&self, v: &Vec2) -> Self {
        match self {
            Self::Line(l) => Self::Line(l.translated(v)),
            Self::Circle(c) => Self::Circle(c.translated(v)),
            Self::Rectangle(r) => Self::Rectangle(r.translated(v)),
            Self::Bezier(b) => Self::Bezier(b.translated(v)),
        }
    }
}

impl Deflector for Shape {
    fn closest_hit(&self, ray: &Ray, ctx: SimulationCtx) -> Option<Hit> {
        match self {
            Self::Line(l) => l.closest_hit(ray, ctx),
            Self::Circle(c) => c.closest_hit(ray, ctx),
            Self::Rectangle(r) => r.closest_hit(ray, ctx),
            Self::Bezier(b) => b.closest_hit(ray, ctx),
        }
    }
}

impl From<Line> for Shape {
    fn from(l: Line) -> Self {
        Self::Line(l)
    }
}

impl From<Circle> for Shape {
    fn from(c: Circle) -> Self {
        Self::Circle(c)
    }
}

impl From<Rectangle> for Shape {
    fn from(r: Rectangle) -> Self {
        Self::Rectangle(r)
    }
}

impl From<BezierPath> for Shape {
    fn from(b: BezierPath) -> Self {
        Self::Bezier(b)
    }
}
