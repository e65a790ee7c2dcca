//! (De)serialization of shapes, objects, emitters and whole scenes to and from JSON.

mod error;
mod scene;
mod shapes;

pub use error::*;

use prisme::*;
use prisme_shapes::*;

use serde_json::Value;
use std::{collections::HashMap, rc::Rc, sync::Arc};

pub use serde_json;

/// Exactly `D` numbers, `None` if `values` has another length or holds anything else.
pub fn json_floats<const D: usize>(values: &[Value]) -> Option<[Float; D]> {
    let floats = values.iter().map(Value::as_f64).collect::<Option<Vec<_>>>()?;
    floats.try_into().ok()
}

/// `[x, y]`
pub fn json_vector(values: &[Value]) -> Option<Vec2> {
    json_floats::<2>(values).map(Vec2::from)
}

pub fn map_json_array<C: FromIterator<T>, T>(
    json: &Value,
    map: impl FnMut(&Value) -> Result<T, JsonError>,
) -> Result<C, JsonError> {
    json.as_array()
        .ok_or(JsonError::invalid("array", "an array"))?
        .iter()
        .map(map)
        .collect()
}

/// The value at `name` in `json`, `null` counting as absent.
#[inline]
#[must_use]
pub fn optional<'a>(json: &'a Value, name: &str) -> Option<&'a Value> {
    json.get(name).filter(|v| !v.is_null())
}

#[inline]
pub fn required<'a>(json: &'a Value, name: &'static str) -> Result<&'a Value, JsonError> {
    optional(json, name).ok_or(JsonError::Missing(name))
}

pub fn float_field(json: &Value, name: &'static str) -> Result<Float, JsonError> {
    required(json, name)?
        .as_f64()
        .ok_or(JsonError::invalid(name, "a number"))
}

pub fn vector_field(json: &Value, name: &'static str) -> Result<Vec2, JsonError> {
    required(json, name)?
        .as_array()
        .and_then(|a| json_vector(a))
        .ok_or(JsonError::invalid(name, "an array of 2 numbers"))
}

pub fn bool_field(json: &Value, name: &'static str, default: bool) -> Result<bool, JsonError> {
    optional(json, name).map_or(Ok(default), |v| {
        v.as_bool().ok_or(JsonError::invalid(name, "a boolean"))
    })
}

pub fn index_field(json: &Value, name: &'static str) -> Result<Option<usize>, JsonError> {
    optional(json, name)
        .map(|v| {
            v.as_u64()
                .and_then(|i| usize::try_from(i).ok())
                .ok_or(JsonError::invalid(name, "a non-negative integer"))
        })
        .transpose()
}

/// Types stored under a `{"type": ..., "data": ...}` tag, see [`tagged`].
pub trait JsonType {
    /// The value of the `"type"` field, e.g. `"circle"`.
    fn json_type() -> String;
}

pub trait JsonSer {
    fn to_json(&self) -> Value;
}

impl<T: JsonSer> JsonSer for [T] {
    fn to_json(&self) -> Value {
        Value::Array(self.iter().map(T::to_json).collect())
    }
}

impl<const N: usize, T: JsonSer> JsonSer for [T; N] {
    fn to_json(&self) -> Value {
        self.as_slice().to_json()
    }
}

impl<T: JsonSer> JsonSer for Vec<T> {
    fn to_json(&self) -> Value {
        self.as_slice().to_json()
    }
}

/// `None` is `null`.
impl<T: JsonSer> JsonSer for Option<T> {
    fn to_json(&self) -> Value {
        self.as_ref().map_or(Value::Null, T::to_json)
    }
}

/// Pointers and references are written as the value they point to.
macro_rules! to_json_through_pointer {
    ($($pointer:ty),* $(,)?) => {$(
        impl<T: JsonSer + ?Sized> JsonSer for $pointer {
            fn to_json(&self) -> Value {
                T::to_json(self)
            }
        }
    )*};
}

to_json_through_pointer!(Box<T>, Rc<T>, Arc<T>, &T, &mut T);

pub trait JsonDes {
    /// Deserialize from a JSON value.
    ///
    /// Returns an error if `json`'s format or values are invalid.
    fn from_json(json: &Value) -> Result<Self, JsonError>
    where
        Self: Sized;

    /// Parse `s`, then deserialize it.
    fn from_json_str(s: &str) -> Result<Self, JsonError>
    where
        Self: Sized,
    {
        Self::from_json(&serde_json::from_str(s)?)
    }
}

impl<T: JsonDes> JsonDes for Vec<T> {
    fn from_json(json: &Value) -> Result<Self, JsonError> {
        map_json_array(json, T::from_json)
    }
}

impl<T: JsonDes> JsonDes for Box<T> {
    fn from_json(json: &Value) -> Result<Self, JsonError> {
        T::from_json(json).map(Box::new)
    }
}

/// Deserializes one variant of a sum type.
pub type Deserializer<T> = fn(&Value) -> Result<T, JsonError>;

/// Reads a value of the form:
///
/// ```json
/// {
///     "type": "string",
///     "data": // <layout depends on the value at "type">
/// }
/// ```
///
/// picking the function reading `"data"` from `deserializers`.
pub fn deserialize_tagged<T>(
    json: &Value,
    kind: &'static str,
    deserializers: &HashMap<String, Deserializer<T>>,
) -> Result<T, JsonError> {
    let name = required(json, "type")?
        .as_str()
        .ok_or(JsonError::invalid("type", "a string"))?;

    let data = required(json, "data")?;

    let deserializer = deserializers
        .get(name)
        .ok_or_else(|| JsonError::UnknownType {
            kind,
            name: name.into(),
        })?;

    deserializer(data)
}

/// The inverse of [`deserialize_tagged`].
pub fn tagged<T: JsonType + JsonSer + ?Sized>(value: &T) -> Value {
    serde_json::json!({
        "type": T::json_type(),
        "data": value.to_json(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn float_arrays() {
        let values = [json!(1.), json!(2.5)];
        assert_eq!(json_floats::<2>(&values), Some([1., 2.5]));
        assert_eq!(json_floats::<3>(&values), None);
        assert_eq!(json_vector(&[json!(1), json!("a")]), None);
    }

    #[test]
    fn null_fields_count_as_missing() {
        let json = json!({ "a": null, "b": 3 });

        assert!(optional(&json, "a").is_none());
        assert!(matches!(required(&json, "a"), Err(JsonError::Missing("a"))));
        assert_eq!(index_field(&json, "b").unwrap(), Some(3));
        assert_eq!(index_field(&json, "c").unwrap(), None);
        assert!(bool_field(&json, "b", false).is_err());
        assert!(bool_field(&json, "c", true).unwrap());
    }

    #[test]
    fn mapping_arrays() {
        let numbers: Vec<Float> = map_json_array(&json!([1, 2, 3]), |v| {
            v.as_f64().ok_or(JsonError::invalid("n", "a number"))
        })
        .unwrap();
        assert_eq!(numbers, [1., 2., 3.]);

        let not_an_array: Result<Vec<Float>, _> = map_json_array(&json!(1), |_| Ok(0.));
        assert!(not_an_array.is_err());
    }

    #[test]
    fn pointers_serialize_as_their_target() {
        let circle = Circle::new([1., 2.], 3.);
        let expected = circle.to_json();

        assert_eq!(Box::new(circle).to_json(), expected);
        assert_eq!(Rc::new(circle).to_json(), expected);
        assert_eq!(Arc::new(circle).to_json(), expected);
        assert_eq!((&circle).to_json(), expected);
        assert_eq!(Some(circle).to_json(), expected);
        assert_eq!(None::<Circle>.to_json(), Value::Null);

        assert_eq!(tagged(&circle), json!({ "type": "circle", "data": expected }));
    }
}
