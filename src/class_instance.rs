//! Class-instance extension: the `instanceof` custom keyword.
//!
//! The keyword parameter is `"<name>"` or `"<name>?"`. The trailing `?`
//! is the keyword's own nullability marker; compilers must decode it here
//! instead of reading a schema-level `nullable` flag.
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{json, Value};

use crate::error::ShorthandError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NativeClass {
    Buffer,
    RegExp,
    Function,
    Date,
}

impl NativeClass {
    pub fn name(self) -> &'static str {
        match self {
            Self::Buffer => "buffer",
            Self::RegExp => "regexp",
            Self::Function => "function",
            Self::Date => "date",
        }
    }
}

static REGISTRY: Lazy<IndexMap<&'static str, NativeClass>> = Lazy::new(|| {
    [NativeClass::Buffer, NativeClass::RegExp, NativeClass::Function, NativeClass::Date]
        .into_iter()
        .map(|c| (c.name(), c))
        .collect()
});

/// Case-insensitive registry lookup.
pub fn lookup(name: &str) -> Option<NativeClass> {
    REGISTRY.get(name.to_lowercase().as_str()).copied()
}

pub fn class_names() -> impl Iterator<Item = &'static str> {
    REGISTRY.keys().copied()
}

// ————————————————————————————————————————————————————————————————————————————
// KEYWORD
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InstanceOf {
    pub class: NativeClass,
    pub nullable: bool,
}

impl InstanceOf {
    pub const KEYWORD: &'static str = "instanceof";

    /// Decode a keyword parameter.
    ///
    /// Unlike token lookup this is case-sensitive: only the lowercase
    /// spellings listed by [`InstanceOf::definition`] are accepted.
    pub fn parse(param: &str) -> Result<Self, ShorthandError> {
        let (name, nullable) = match param.strip_suffix('?') {
            Some(name) => (name, true),
            None => (param, false),
        };
        let class = REGISTRY.get(name).copied().ok_or_else(|| ShorthandError::UnknownClass {
            token: param.to_owned(),
            known: class_names().collect::<Vec<_>>().join(", "),
        })?;
        Ok(Self { class, nullable })
    }

    pub fn param(&self) -> String {
        if self.nullable {
            format!("{}?", self.class.name())
        } else {
            self.class.name().to_owned()
        }
    }

    /// Runtime membership test for a compiler's keyword implementation.
    pub fn check(&self, value: &NativeValue<'_>) -> bool {
        if value.is_null() {
            return self.nullable;
        }
        value.class() == Some(self.class)
    }

    /// Meta-schema for the keyword's own value.
    pub fn definition() -> Value {
        let accepted = class_names()
            .flat_map(|name| [name.to_owned(), format!("{name}?")])
            .collect::<Vec<_>>();
        json!({ "type": "string", "enum": accepted })
    }
}

// ————————————————————————————————————————————————————————————————————————————
// VALUES
// ————————————————————————————————————————————————————————————————————————————

/// Borrowed view over the runtime values the keyword can classify.
#[derive(Clone, Copy)]
pub enum NativeValue<'a> {
    Json(&'a Value),
    Buffer(&'a [u8]),
    RegExp(&'a Regex),
    Date(&'a DateTime<Utc>),
    Function(&'a dyn Fn(&[Value]) -> Value),
}

impl NativeValue<'_> {
    pub fn class(&self) -> Option<NativeClass> {
        match self {
            Self::Json(_) => None,
            Self::Buffer(_) => Some(NativeClass::Buffer),
            Self::RegExp(_) => Some(NativeClass::RegExp),
            Self::Date(_) => Some(NativeClass::Date),
            Self::Function(_) => Some(NativeClass::Function),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Json(Value::Null))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_is_fixed_and_case_insensitive() {
        assert_eq!(class_names().collect::<Vec<_>>(), ["buffer", "regexp", "function", "date"]);
        assert_eq!(lookup("Date"), Some(NativeClass::Date));
        assert_eq!(lookup("REGEXP"), Some(NativeClass::RegExp));
        assert_eq!(lookup("promise"), None);
    }

    #[test]
    fn parse_decodes_trailing_marker() {
        let k = InstanceOf::parse("date?").unwrap();
        assert_eq!(k, InstanceOf { class: NativeClass::Date, nullable: true });
        assert_eq!(k.param(), "date?");
        let k = InstanceOf::parse("buffer").unwrap();
        assert!(!k.nullable);
    }

    #[test]
    fn unknown_class_names_the_token() {
        let err = InstanceOf::parse("promise").unwrap_err();
        let ShorthandError::UnknownClass { token, .. } = &err else { panic!("{err:?}") };
        assert_eq!(token, "promise");
        assert!(err.to_string().contains("`promise`"));
    }

    #[test]
    fn parse_only_accepts_canonical_spelling() {
        assert!(InstanceOf::parse("Date").is_err());
        assert!(InstanceOf::parse("BUFFER?").is_err());
        let def = InstanceOf::definition();
        for name in class_names() {
            let param = Value::from(name);
            assert!(def["enum"].as_array().unwrap().contains(&param));
            assert!(InstanceOf::parse(name).is_ok());
        }
    }

    #[test]
    fn check_respects_nullability_and_class() {
        let now = Utc::now();
        let rx = Regex::new("^a+$").unwrap();
        let null = Value::Null;
        let text = Value::from("2024-01-01");

        let date = InstanceOf::parse("date").unwrap();
        assert!(date.check(&NativeValue::Date(&now)));
        assert!(!date.check(&NativeValue::Json(&null)));
        assert!(!date.check(&NativeValue::Json(&text)));
        assert!(!date.check(&NativeValue::RegExp(&rx)));

        let maybe = InstanceOf::parse("regexp?").unwrap();
        assert!(maybe.check(&NativeValue::Json(&null)));
        assert!(maybe.check(&NativeValue::RegExp(&rx)));

        let f = |_: &[Value]| Value::Null;
        let func = InstanceOf::parse("function").unwrap();
        assert!(func.check(&NativeValue::Function(&f)));
        assert!(InstanceOf::parse("buffer").unwrap().check(&NativeValue::Buffer(b"abc")));
    }

    #[test]
    fn definition_lists_every_parameter() {
        let def = InstanceOf::definition();
        let accepted = def["enum"].as_array().unwrap();
        assert_eq!(accepted.len(), 8);
        assert!(accepted.contains(&Value::from("function?")));
    }
}
