//! Strongly-typed schema fragments, and their rendering into the schema
//! document form consumed by the external validation compiler.
//!
//! Fragments are built once by the parsers and never mutated afterwards.
use indexmap::IndexMap;
use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq)]
pub struct Fragment {
    pub kind: Kind,
    pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Kind {
    /// Matches every value (`{}`).
    Any,
    /// Declared type name passed through verbatim (`number`, `integer`, ...).
    Primitive(String),
    String {
        format: Option<String>,
        min_length: Option<u64>,
    },
    /// Literal `true` / `false`.
    Boolean { constant: bool },
    Array {
        items: Box<Fragment>,
        min_items: Option<u64>,
    },
    Object(ObjectSchema),
    /// Top-level variant list, rendered as `anyOf`.
    Union(Vec<Fragment>),
    /// Internal variant list, rendered as a bare array (directive values).
    Sequence(Vec<Fragment>),
    /// Class-membership check; the parameter is `<name>` or `<name>?`.
    InstanceOf(String),
    /// Pre-built document node, passed through unchanged.
    Raw(Value),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ObjectSchema {
    pub properties: IndexMap<String, Fragment>,
    /// `None` when no field is required; never `Some(vec![])`.
    pub required: Option<Vec<String>>,
    /// Schema-level settings from `$`-prefixed keys, prefix stripped.
    pub directives: IndexMap<String, Fragment>,
}

// ————————————————————————————————————————————————————————————————————————————
// CONSTRUCTORS
// ————————————————————————————————————————————————————————————————————————————

impl Fragment {
    fn of(kind: Kind) -> Self {
        Self { kind, nullable: false }
    }
    pub fn any() -> Self {
        Self::of(Kind::Any)
    }
    pub fn primitive(type_name: impl Into<String>) -> Self {
        Self::of(Kind::Primitive(type_name.into()))
    }
    pub fn string() -> Self {
        Self::of(Kind::String { format: None, min_length: None })
    }
    pub fn boolean(constant: bool) -> Self {
        Self::of(Kind::Boolean { constant })
    }
    pub fn array(items: Fragment) -> Self {
        Self::of(Kind::Array { items: Box::new(items), min_items: None })
    }
    pub fn object(schema: ObjectSchema) -> Self {
        Self::of(Kind::Object(schema))
    }
    pub fn union(variants: Vec<Fragment>) -> Self {
        Self::of(Kind::Union(variants))
    }
    pub fn sequence(items: Vec<Fragment>) -> Self {
        Self::of(Kind::Sequence(items))
    }
    pub fn instance_of(param: impl Into<String>) -> Self {
        Self::of(Kind::InstanceOf(param.into()))
    }
    pub fn raw(value: Value) -> Self {
        Self::of(Kind::Raw(value))
    }

    pub fn with_nullable(mut self, nullable: bool) -> Self {
        self.nullable = nullable;
        self
    }
}

// ————————————————————————————————————————————————————————————————————————————
// QUERIES
// ————————————————————————————————————————————————————————————————————————————

impl Fragment {
    /// Whether the rendered document would carry `nullable: true`.
    ///
    /// Pre-built nodes and nested objects may get their flag from the raw
    /// value or from a `$nullable` directive rather than from `self.nullable`.
    pub fn is_nullable(&self) -> bool {
        if self.nullable {
            return true;
        }
        match &self.kind {
            Kind::Raw(value) => value.get("nullable") == Some(&Value::Bool(true)),
            Kind::Object(obj) => obj
                .directives
                .get("nullable")
                .is_some_and(|d| d.to_document() == Value::Bool(true)),
            _ => false,
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// RENDERING
// ————————————————————————————————————————————————————————————————————————————

impl Fragment {
    /// Render into the external compiler's native schema document form.
    pub fn to_document(&self) -> Value {
        let mut o = Map::new();
        match &self.kind {
            Kind::Any => {}
            Kind::Primitive(name) => {
                o.insert("type".into(), Value::from(name.as_str()));
            }
            Kind::String { format, min_length } => {
                o.insert("type".into(), Value::from("string"));
                if let Some(format) = format {
                    o.insert("format".into(), Value::from(format.as_str()));
                }
                if let Some(n) = min_length {
                    o.insert("minLength".into(), Value::from(*n));
                }
            }
            Kind::Boolean { constant } => {
                o.insert("type".into(), Value::from("boolean"));
                o.insert("const".into(), Value::Bool(*constant));
            }
            Kind::Array { items, min_items } => {
                o.insert("type".into(), Value::from("array"));
                o.insert("items".into(), items.to_document());
                if let Some(n) = min_items {
                    o.insert("minItems".into(), Value::from(*n));
                }
            }
            Kind::Object(obj) => obj.render_into(&mut o),
            Kind::Union(variants) => {
                o.insert("anyOf".into(), render_all(variants));
            }
            Kind::Sequence(items) => return render_all(items),
            Kind::InstanceOf(param) => {
                // nullability lives inside `param`; never emit a sibling flag
                o.insert("instanceof".into(), Value::from(param.as_str()));
                return Value::Object(o);
            }
            Kind::Raw(value) => return value.clone(),
        }
        if self.nullable {
            o.insert("nullable".into(), Value::Bool(true));
        }
        Value::Object(o)
    }
}

impl ObjectSchema {
    fn render_into(&self, o: &mut Map<String, Value>) {
        o.insert("type".into(), Value::from("object"));
        let props = self
            .properties
            .iter()
            .map(|(k, f)| (k.clone(), f.to_document()))
            .collect::<Map<_, _>>();
        o.insert("properties".into(), Value::Object(props));
        if let Some(required) = &self.required {
            o.insert(
                "required".into(),
                Value::Array(required.iter().map(|s| Value::from(s.as_str())).collect()),
            );
        }
        // directives land last so they can override the base keywords
        for (k, f) in &self.directives {
            o.insert(k.clone(), f.to_document());
        }
    }
}

fn render_all(xs: &[Fragment]) -> Value {
    Value::Array(xs.iter().map(Fragment::to_document).collect())
}

impl Serialize for Fragment {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_document().serialize(serializer)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn any_renders_empty_object() {
        assert_eq!(Fragment::any().to_document(), json!({}));
        assert_eq!(Fragment::any().with_nullable(true).to_document(), json!({"nullable": true}));
    }

    #[test]
    fn instance_of_never_emits_nullable() {
        let f = Fragment::instance_of("date?").with_nullable(true);
        assert_eq!(f.to_document(), json!({"instanceof": "date?"}));
    }

    #[test]
    fn object_omits_required_when_none() {
        let mut obj = ObjectSchema::default();
        obj.properties.insert("flag".into(), Fragment::boolean(true).with_nullable(true));
        assert_eq!(
            Fragment::object(obj).to_document(),
            json!({
                "type": "object",
                "properties": {"flag": {"type": "boolean", "const": true, "nullable": true}}
            })
        );
    }

    #[test]
    fn directives_render_after_base_keys() {
        let mut obj = ObjectSchema::default();
        obj.directives.insert("additionalProperties".into(), Fragment::raw(json!(false)));
        obj.directives.insert(
            "oneOf".into(),
            Fragment::sequence(vec![Fragment::string(), Fragment::primitive("number")]),
        );
        let doc = Fragment::object(obj).to_document();
        assert_eq!(doc["additionalProperties"], json!(false));
        assert_eq!(doc["oneOf"], json!([{"type": "string"}, {"type": "number"}]));
        let keys = doc.as_object().unwrap().keys().cloned().collect::<Vec<_>>();
        assert_eq!(keys, ["type", "properties", "additionalProperties", "oneOf"]);
    }

    #[test]
    fn nullable_detection_for_raw_and_objects() {
        assert!(Fragment::raw(json!({"type": "x", "nullable": true})).is_nullable());
        assert!(!Fragment::raw(json!(false)).is_nullable());

        let mut obj = ObjectSchema::default();
        assert!(!Fragment::object(obj.clone()).is_nullable());
        obj.directives.insert("nullable".into(), Fragment::raw(json!(true)));
        assert!(Fragment::object(obj).is_nullable());
    }

    #[test]
    fn serializes_as_document() {
        let f = Fragment::array(Fragment::string());
        let s = serde_json::to_string(&f).unwrap();
        assert_eq!(s, r#"{"type":"array","items":{"type":"string"}}"#);
    }
}
