//! The shorthand input tree.
//!
//! A shorthand value is one of: a token (`"string?"`), a variant list
//! (`["string", "number"]`), a nested mapping, or a pre-built fragment.
use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::error::ShorthandError;
use crate::fragment::Fragment;

pub type ShorthandMap = IndexMap<String, Shorthand>;

#[derive(Debug, Clone, PartialEq)]
pub enum Shorthand {
    Token(String),
    Variants(Vec<Shorthand>),
    Object(ShorthandMap),
    /// Already a schema node; parsed as-is.
    Schema(Fragment),
}

impl Shorthand {
    /// JSON view of what the developer wrote, used in diagnostics.
    pub fn to_value(&self) -> Value {
        match self {
            Self::Token(s) => Value::from(s.as_str()),
            Self::Variants(xs) => Value::Array(xs.iter().map(Self::to_value).collect()),
            Self::Object(map) => Value::Object(map_to_value(map)),
            Self::Schema(f) => f.to_document(),
        }
    }
}

pub fn map_to_value(map: &ShorthandMap) -> serde_json::Map<String, Value> {
    map.iter().map(|(k, v)| (k.clone(), v.to_value())).collect()
}

/// Read a top-level shorthand mapping from a JSON value.
pub fn map_from_value(value: Value) -> Result<ShorthandMap, ShorthandError> {
    match Shorthand::try_from(value)? {
        Shorthand::Object(map) => Ok(map),
        other => Err(ShorthandError::Unsupported {
            found: format!("{} at top level (expected an object)", other.to_value()),
        }),
    }
}

// ————————————————————————————————————————————————————————————————————————————
// CONVERSIONS
// ————————————————————————————————————————————————————————————————————————————

impl TryFrom<Value> for Shorthand {
    type Error = ShorthandError;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        match value {
            Value::String(s) => Ok(Self::Token(s)),
            Value::Array(xs) => xs
                .into_iter()
                .map(Self::try_from)
                .collect::<Result<Vec<_>, _>>()
                .map(Self::Variants),
            Value::Object(m) => m
                .into_iter()
                .map(|(k, v)| Self::try_from(v).map(|s| (k, s)))
                .collect::<Result<ShorthandMap, _>>()
                .map(Self::Object),
            // scalar literals are pre-built fragments (e.g. `$additionalProperties: false`)
            v @ (Value::Bool(_) | Value::Number(_)) => Ok(Self::Schema(Fragment::raw(v))),
            Value::Null => Err(ShorthandError::Unsupported { found: "null".into() }),
        }
    }
}

impl From<&str> for Shorthand {
    fn from(s: &str) -> Self {
        Self::Token(s.to_owned())
    }
}

impl From<Fragment> for Shorthand {
    fn from(f: Fragment) -> Self {
        Self::Schema(f)
    }
}

impl Serialize for Shorthand {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Shorthand {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::try_from(value).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_shapes_map_to_variants() {
        let s = Shorthand::try_from(json!({
            "name": "string",
            "tags": ["string", "number"],
            "extra": false,
            "nested": {"x": "integer"}
        }))
        .unwrap();
        let Shorthand::Object(map) = s else { panic!("expected object") };
        assert_eq!(map["name"], Shorthand::from("string"));
        assert_eq!(map["tags"], Shorthand::Variants(vec!["string".into(), "number".into()]));
        assert_eq!(map["extra"], Shorthand::Schema(Fragment::raw(json!(false))));
        assert!(matches!(map["nested"], Shorthand::Object(_)));
        // natural order is kept
        assert_eq!(map.keys().collect::<Vec<_>>(), ["name", "tags", "extra", "nested"]);
    }

    #[test]
    fn null_is_rejected() {
        let err = Shorthand::try_from(json!({"a": null})).unwrap_err();
        assert!(matches!(err, ShorthandError::Unsupported { .. }));
    }

    #[test]
    fn top_level_must_be_object() {
        let err = map_from_value(json!(["string"])).unwrap_err();
        assert!(err.to_string().contains("expected an object"));
    }

    #[test]
    fn to_value_reflects_input() {
        let src = json!({"a": "string?", "b": ["true", "false"], "c": 3});
        let map = map_from_value(src.clone()).unwrap();
        assert_eq!(Value::Object(map_to_value(&map)), src);
    }

    #[test]
    fn deserializes_through_serde() {
        let s: Shorthand = serde_json::from_str(r#"["uuid", {"id": "string!"}]"#).unwrap();
        assert!(matches!(s, Shorthand::Variants(ref xs) if xs.len() == 2));
    }
}
