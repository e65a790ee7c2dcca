use super::*;

use serde_json::json;
use std::sync::OnceLock;

fn name_of(json: &Value, kind: &'static str) -> Result<String, JsonError> {
    json.as_str()
        .map(str::to_lowercase)
        .ok_or(JsonError::invalid(kind, "a string"))
}

fn unknown(kind: &'static str, name: String) -> JsonError {
    JsonError::UnknownType { kind, name }
}

fn style_field(json: &Value) -> Result<DrawStyle, JsonError> {
    optional(json, "style").map_or(Ok(DrawStyle::default()), DrawStyle::from_json)
}

impl JsonSer for Response {
    fn to_json(&self) -> Value {
        json!(match self {
            Self::Reflect => "reflect",
            Self::Absorb => "absorb",
            Self::Collimate => "collimate",
        })
    }
}

impl JsonDes for Response {
    /// One of `"reflect"`, `"absorb"` or `"collimate"`.
    fn from_json(json: &Value) -> Result<Self, JsonError> {
        match name_of(json, "response")?.as_str() {
            "reflect" => Ok(Self::Reflect),
            "absorb" => Ok(Self::Absorb),
            "collimate" => Ok(Self::Collimate),
            other => Err(unknown("response", other.into())),
        }
    }
}

impl JsonSer for Object {
    fn to_json(&self) -> Value {
        json!({
            "shape": self.shape.to_json(),
            "response": self.response.to_json(),
        })
    }
}

impl JsonDes for Object {
    /// ```json
    /// {
    ///     "shape": { "type": "circle", "data": { ... } },
    ///     "response": "absorb", // optional, defaults to "reflect"
    /// }
    /// ```
    ///
    /// A bare shape (without the `"shape"` field) is read as a reflector.
    fn from_json(json: &Value) -> Result<Self, JsonError> {
        let Some(shape) = optional(json, "shape") else {
            return Shape::from_json(json).map(Self::reflector);
        };

        let response = optional(json, "response")
            .map_or(Ok(Response::default()), Response::from_json)?;

        Ok(Self::new(Shape::from_json(shape)?, response))
    }
}

impl JsonSer for DrawStyle {
    fn to_json(&self) -> Value {
        json!(match self {
            Self::Path => "path",
            Self::Endpoints => "endpoints",
        })
    }
}

impl JsonDes for DrawStyle {
    /// Either `"path"` or `"endpoints"`.
    fn from_json(json: &Value) -> Result<Self, JsonError> {
        match name_of(json, "style")?.as_str() {
            "path" => Ok(Self::Path),
            "endpoints" => Ok(Self::Endpoints),
            other => Err(unknown("draw style", other.into())),
        }
    }
}

impl JsonSer for Termination {
    fn to_json(&self) -> Value {
        json!(match self {
            Self::Absorbed => "absorbed",
            Self::Escaped => "escaped",
            Self::IterationCap => "iteration_cap",
            Self::Loop => "loop",
        })
    }
}

impl JsonType for PointEmitter {
    fn json_type() -> String {
        "point".into()
    }
}

impl JsonSer for PointEmitter {
    fn to_json(&self) -> Value {
        json!({
            "origin": self.origin.to_json(),
            "direction": self.direction.as_ref().to_json(),
            "style": self.style.to_json(),
        })
    }
}

impl JsonDes for PointEmitter {
    /// Same layout as a [`Ray`], with an optional `"style"`.
    fn from_json(json: &Value) -> Result<Self, JsonError> {
        let ray = Ray::from_json(json)?;

        Ok(Self {
            style: style_field(json)?,
            ..Self::new(ray.origin, ray.direction)
        })
    }
}

impl JsonType for CircleEmitter {
    fn json_type() -> String {
        "circle".into()
    }
}

impl JsonSer for CircleEmitter {
    fn to_json(&self) -> Value {
        json!({
            "circle": self.circle.to_json(),
            "ray_step": self.ray_step,
            "style": self.style.to_json(),
            "outline": self.outline,
            "scene_index": self.scene_index,
        })
    }
}

impl JsonDes for CircleEmitter {
    /// ```json
    /// {
    ///     "circle": { "center": [0., 0.], "radius": 1. },
    ///     "ray_step": 10., // degrees between two rays
    ///     "style": "path", // optional
    ///     "outline": true, // optional, whether to draw the circle
    ///     "scene_index": 3, // optional, index of the scene object the circle is
    /// }
    /// ```
    fn from_json(json: &Value) -> Result<Self, JsonError> {
        Ok(Self {
            style: style_field(json)?,
            outline: bool_field(json, "outline", true)?,
            scene_index: index_field(json, "scene_index")?,
            ..Self::new(
                Circle::from_json(required(json, "circle")?)?,
                float_field(json, "ray_step")?,
            )
        })
    }
}

impl JsonType for LineEmitter {
    fn json_type() -> String {
        "line".into()
    }
}

impl JsonSer for LineEmitter {
    fn to_json(&self) -> Value {
        json!({
            "line": self.line.to_json(),
            "ray_step": self.ray_step,
            "style": self.style.to_json(),
            "scene_index": self.scene_index,
        })
    }
}

impl JsonDes for LineEmitter {
    /// ```json
    /// {
    ///     "line": { "start": [0., 0.], "end": [1., 0.] },
    ///     "ray_step": 0.1, // distance between two rays
    ///     "style": "path", // optional
    ///     "scene_index": 3, // optional
    /// }
    /// ```
    fn from_json(json: &Value) -> Result<Self, JsonError> {
        Ok(Self {
            style: style_field(json)?,
            scene_index: index_field(json, "scene_index")?,
            ..Self::new(
                Line::from_json(required(json, "line")?)?,
                float_field(json, "ray_step")?,
            )
        })
    }
}

impl JsonSer for Emitter {
    fn to_json(&self) -> Value {
        match self {
            Self::Point(e) => tagged(e),
            Self::Circle(e) => tagged(e),
            Self::Line(e) => tagged(e),
        }
    }
}

impl JsonDes for Emitter {
    /// ```json
    /// {
    ///     "type": "circle", // or "point", "line"
    ///     "data": // <layout depends on the value at "type">
    /// }
    /// ```
    fn from_json(json: &Value) -> Result<Self, JsonError> {
        static DESERIALIZERS: OnceLock<HashMap<String, Deserializer<Emitter>>> = OnceLock::new();

        #[rustfmt::skip]
        let deserializers = DESERIALIZERS.get_or_init(|| HashMap::from([
            (PointEmitter::json_type(), (|v| PointEmitter::from_json(v).map(Emitter::from)) as Deserializer<Emitter>),
            (CircleEmitter::json_type(), |v| CircleEmitter::from_json(v).map(Emitter::from)),
            (LineEmitter::json_type(), |v| LineEmitter::from_json(v).map(Emitter::from)),
        ]));

        deserialize_tagged(json, "emitter", deserializers)
    }
}

impl JsonSer for RayParams {
    fn to_json(&self) -> Value {
        json!({
            "epsilon": self.epsilon,
            "iteration_cap": self.iteration_cap,
            "exclude_last_hit": self.exclude_last_hit,
            "loop_detection": self.loop_detection,
        })
    }
}

impl JsonDes for RayParams {
    /// Every field is optional, missing ones take their [default](RayParams::default) value.
    ///
    /// ```json
    /// {
    ///     "epsilon": 1e-6,
    ///     "iteration_cap": 1000,
    ///     "exclude_last_hit": false,
    ///     "loop_detection": 1e-9, // or null to disable it
    /// }
    /// ```
    fn from_json(json: &Value) -> Result<Self, JsonError> {
        let default = Self::default();

        let params = match optional(json, "epsilon") {
            Some(_) => default.try_with_epsilon(float_field(json, "epsilon")?)?,
            None => default,
        };

        let loop_detection = optional(json, "loop_detection")
            .map(|_| float_field(json, "loop_detection"))
            .transpose()?;

        Ok(Self {
            iteration_cap: index_field(json, "iteration_cap")?.unwrap_or(default.iteration_cap),
            exclude_last_hit: bool_field(json, "exclude_last_hit", default.exclude_last_hit)?,
            loop_detection,
            ..params
        })
    }
}

impl JsonSer for Scene {
    fn to_json(&self) -> Value {
        json!({
            "bounds": self.bounds.to_json(),
            "objects": self.objects.to_json(),
            "emitters": self.emitters.to_json(),
            "params": self.params.to_json(),
        })
    }
}

impl JsonDes for Scene {
    /// ```json
    /// {
    ///     "bounds": { "x": 0., "y": 0., "width": 800., "height": 600. }, // optional
    ///     "objects": [ ... ], // see `Object::from_json`
    ///     "emitters": [ ... ], // see `Emitter::from_json`
    ///     "params": { ... }, // optional, see `RayParams::from_json`
    /// }
    /// ```
    fn from_json(json: &Value) -> Result<Self, JsonError> {
        Ok(Self {
            bounds: optional(json, "bounds")
                .map(Rectangle::from_json)
                .transpose()?,
            objects: optional(json, "objects").map_or(Ok(Vec::new()), Vec::from_json)?,
            emitters: optional(json, "emitters").map_or(Ok(Vec::new()), Vec::from_json)?,
            params: optional(json, "params").map_or(Ok(RayParams::default()), RayParams::from_json)?,
        })
    }
}

impl JsonSer for Emission {
    /// The paths travelled by every ray, each one a list of segments, along
    /// with why it stopped.
    fn to_json(&self) -> Value {
        let rays: Vec<_> = self
            .rays
            .iter()
            .map(|ray| {
                json!({
                    "path": ray.path().to_json(),
                    "termination": ray.termination().to_json(),
                })
            })
            .collect();

        json!({
            "style": self.style.to_json(),
            "rays": rays,
        })
    }
}
