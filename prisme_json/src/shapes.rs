use super::*;

use serde_json::json;
use std::sync::OnceLock;

impl JsonSer for Vec2 {
    fn to_json(&self) -> Value {
        json!([self.x, self.y])
    }
}

impl JsonDes for Vec2 {
    /// An array of two numbers: `[x, y]`.
    fn from_json(json: &Value) -> Result<Self, JsonError> {
        json.as_array()
            .and_then(|a| json_vector(a))
            .ok_or(JsonError::invalid("vector", "an array of 2 numbers"))
    }
}

impl JsonSer for Ray {
    /// Serialize a ray into a JSON object.
    ///
    /// The format of the returned object is explained in [`Self::from_json`]
    fn to_json(&self) -> Value {
        json!({
            "origin": self.origin.to_json(),
            "direction": self.direction.as_ref().to_json(),
        })
    }
}

impl JsonDes for Ray {
    /// Deserialize a new ray from a JSON object.
    ///
    /// The JSON object must follow the following format:
    ///
    /// ```json
    /// {
    ///     "origin": [9., 8.],
    ///     "direction": [7., 6.], // must be non-zero, needn't be normalized
    /// }
    /// ```
    fn from_json(json: &Value) -> Result<Self, JsonError> {
        let origin = vector_field(json, "origin")?;
        let direction = vector_field(json, "direction")?;

        Ok(Self::try_new_normalize(origin, direction)?)
    }
}

impl JsonType for Line {
    fn json_type() -> String {
        "line".into()
    }
}

impl JsonSer for Line {
    fn to_json(&self) -> Value {
        json!({
            "start": self.start.to_json(),
            "end": self.end.to_json(),
        })
    }
}

impl JsonDes for Line {
    /// ```json
    /// {
    ///     "start": [1., 2.],
    ///     "end": [3., 4.],
    /// }
    /// ```
    fn from_json(json: &Value) -> Result<Self, JsonError> {
        Ok(Self::new(
            vector_field(json, "start")?,
            vector_field(json, "end")?,
        ))
    }
}

impl JsonType for Circle {
    fn json_type() -> String {
        "circle".into()
    }
}

impl JsonSer for Circle {
    fn to_json(&self) -> Value {
        json!({
            "center": self.center.to_json(),
            "radius": self.radius(),
            "radius_offset": self.radius_offset(),
        })
    }
}

impl JsonDes for Circle {
    /// ```json
    /// {
    ///     "center": [1., 2.],
    ///     "radius": 3., // positive
    ///     "radius_offset": 0.5, // optional, defaults to 0
    /// }
    /// ```
    fn from_json(json: &Value) -> Result<Self, JsonError> {
        let circle = Self::try_new(vector_field(json, "center")?, float_field(json, "radius")?)?;

        Ok(match optional(json, "radius_offset") {
            Some(_) => circle.with_radius_offset(float_field(json, "radius_offset")?),
            None => circle,
        })
    }
}

impl JsonType for Rectangle {
    fn json_type() -> String {
        "rectangle".into()
    }
}

impl JsonSer for Rectangle {
    fn to_json(&self) -> Value {
        json!({
            "center": self.center().to_json(),
            "size": self.size().to_json(),
            "rotation": self.rotation(),
        })
    }
}

impl JsonDes for Rectangle {
    /// Either centered:
    ///
    /// ```json
    /// {
    ///     "center": [1., 2.],
    ///     "size": [3., 4.], // width, height
    ///     "rotation": 0.5, // radians, optional
    /// }
    /// ```
    ///
    /// or axis-aligned, from the corner with the smallest coordinates:
    ///
    /// ```json
    /// { "x": 0., "y": 0., "width": 3., "height": 4. }
    /// ```
    fn from_json(json: &Value) -> Result<Self, JsonError> {
        if optional(json, "center").is_none() {
            return Ok(Self::try_from_corner(
                float_field(json, "x")?,
                float_field(json, "y")?,
                float_field(json, "width")?,
                float_field(json, "height")?,
            )?);
        }

        let rotation = match optional(json, "rotation") {
            Some(_) => float_field(json, "rotation")?,
            None => 0.,
        };

        Ok(Self::try_from_center(
            vector_field(json, "center")?,
            vector_field(json, "size")?,
            rotation,
        )?)
    }
}

impl JsonSer for PathElement {
    fn to_json(&self) -> Value {
        let (op, points) = match self {
            Self::MoveTo(p) => ("move_to", vec![*p]),
            Self::LineTo(p) => ("line_to", vec![*p]),
            Self::QuadTo(c, p) => ("quad_to", vec![*c, *p]),
            Self::CubicTo(c1, c2, p) => ("cubic_to", vec![*c1, *c2, *p]),
            Self::Close => ("close", vec![]),
        };

        json!({ "op": op, "points": points.to_json() })
    }
}

impl JsonDes for PathElement {
    /// ```json
    /// {
    ///     "op": "cubic_to", // or "move_to", "line_to", "quad_to", "close"
    ///     "points": [[0., 1.], [1., 1.], [1., 0.]], // control points first, then the end point
    /// }
    /// ```
    fn from_json(json: &Value) -> Result<Self, JsonError> {
        let op = required(json, "op")?
            .as_str()
            .ok_or(JsonError::invalid("op", "a string"))?;

        let points: Vec<Vec2> = match optional(json, "points") {
            Some(points) => JsonDes::from_json(points)?,
            None => Vec::new(),
        };

        match (op, points.as_slice()) {
            ("move_to", [p]) => Ok(Self::MoveTo(*p)),
            ("line_to", [p]) => Ok(Self::LineTo(*p)),
            ("quad_to", [c, p]) => Ok(Self::QuadTo(*c, *p)),
            ("cubic_to", [c1, c2, p]) => Ok(Self::CubicTo(*c1, *c2, *p)),
            ("close", []) => Ok(Self::Close),
            ("move_to" | "line_to" | "quad_to" | "cubic_to" | "close", _) => Err(
                JsonError::invalid("points", "as many points as the operation needs"),
            ),
            (other, _) => Err(JsonError::UnknownType {
                kind: "path operation",
                name: other.into(),
            }),
        }
    }
}

impl JsonType for BezierPath {
    fn json_type() -> String {
        "bezier".into()
    }
}

impl JsonSer for BezierPath {
    fn to_json(&self) -> Value {
        self.elements().to_json()
    }
}

impl JsonDes for BezierPath {
    /// An array of [`PathElement`]s, see [`PathElement::from_json`].
    fn from_json(json: &Value) -> Result<Self, JsonError> {
        Vec::from_json(json).map(Self::from_elements)
    }
}

impl JsonType for Shape {
    fn json_type() -> String {
        "shape".into()
    }
}

impl JsonSer for Shape {
    fn to_json(&self) -> Value {
        match self {
            Self::Line(l) => tagged(l),
            Self::Circle(c) => tagged(c),
            Self::Rectangle(r) => tagged(r),
            Self::Bezier(b) => tagged(b),
        }
    }
}

impl JsonDes for Shape {
    /// ```json
    /// {
    ///     "type": "circle", // or "line", "rectangle", "bezier"
    ///     "data": // <layout depends on the value at "type">
    /// }
    /// ```
    fn from_json(json: &Value) -> Result<Self, JsonError> {
        static DESERIALIZERS: OnceLock<HashMap<String, Deserializer<Shape>>> = OnceLock::new();

        #[rustfmt::skip]
        let deserializers = DESERIALIZERS.get_or_init(|| HashMap::from([
            (Line::json_type(), (|v| Line::from_json(v).map(Shape::from)) as Deserializer<Shape>),
            (Circle::json_type(), |v| Circle::from_json(v).map(Shape::from)),
            (Rectangle::json_type(), |v| Rectangle::from_json(v).map(Shape::from)),
            (BezierPath::json_type(), |v| BezierPath::from_json(v).map(Shape::from)),
        ]));

        deserialize_tagged(json, "shape", deserializers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ray_direction_is_normalized() {
        let ray = Ray::from_json(&json!({ "origin": [1, 2], "direction": [0, 3] })).unwrap();

        assert_eq!(ray.origin, Vec2::new(1., 2.));
        assert_relative_eq!(ray.direction.into_inner(), Vec2::new(0., 1.));
    }

    #[test]
    fn zero_directions_are_rejected() {
        let err = Ray::from_json(&json!({ "origin": [0, 0], "direction": [0, 0] })).unwrap_err();
        assert!(matches!(err, JsonError::Geometry(GeometryError::ZeroDirection)));

        let err = Ray::from_json(&json!({ "origin": [0, 0] })).unwrap_err();
        assert!(matches!(err, JsonError::Missing("direction")));
    }

    #[test]
    fn circles() {
        let c = Circle::from_json(&json!({ "center": [1, 1], "radius": 2 })).unwrap();
        assert_eq!(c, Circle::new([1., 1.], 2.));

        let c = Circle::new([0., 0.], 1.).with_radius_offset(0.25);
        assert_eq!(Circle::from_json(&c.to_json()).unwrap(), c);

        let err = Circle::from_json(&json!({ "center": [0, 0], "radius": -1 })).unwrap_err();
        assert!(matches!(err, JsonError::Geometry(GeometryError::InvalidRadius(_))));
    }

    #[test]
    fn rectangles_in_both_layouts() {
        let from_corner =
            Rectangle::from_json(&json!({ "x": 0, "y": 0, "width": 4, "height": 2 })).unwrap();
        assert_eq!(from_corner.center(), Vec2::new(2., 1.));
        assert_eq!(from_corner.size(), Vec2::new(4., 2.));

        let rotated = Rectangle::from_center([1., 2.], [3., 4.], 0.5);
        assert_eq!(Rectangle::from_json(&rotated.to_json()).unwrap(), rotated);

        assert!(Rectangle::from_json(&json!({ "x": 0, "y": 0, "width": -1, "height": 2 })).is_err());
    }

    #[test]
    fn path_elements() {
        let path = BezierPath::new()
            .move_to([0., 0.])
            .line_to([1., 0.])
            .quad_to([2., 1.], [1., 2.])
            .cubic_to([0., 3.], [-1., 2.], [0., 1.])
            .close();

        assert_eq!(BezierPath::from_json(&path.to_json()).unwrap(), path);

        let too_few = json!([{ "op": "cubic_to", "points": [[0, 0]] }]);
        assert!(matches!(
            BezierPath::from_json(&too_few),
            Err(JsonError::Invalid { field: "points", .. })
        ));

        let unknown = json!([{ "op": "arc_to", "points": [] }]);
        assert!(matches!(
            BezierPath::from_json(&unknown),
            Err(JsonError::UnknownType { .. })
        ));
    }

    #[test]
    fn shapes_are_tagged() {
        let json = json!({
            "type": "line",
            "data": { "start": [0, 0], "end": [1, 1] },
        });
        let shape = Shape::from_json(&json).unwrap();

        assert_eq!(shape, Shape::Line(Line::new([0., 0.], [1., 1.])));
        assert_eq!(shape.to_json()["type"], "line");

        let err = Shape::from_json(&json!({ "type": "hexagon", "data": {} })).unwrap_err();
        assert!(matches!(err, JsonError::UnknownType { kind: "shape", .. }));
    }
}
