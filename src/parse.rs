//! Shorthand → schema fragment compiler.
//!
//! Three mutually recursive entry points:
//! - [`parse_token`] — a single string token (`"string?"`, `"date"`, `"number[]!"`).
//! - [`parse_value`] — any shorthand value; dispatches on its shape.
//! - [`parse_object`] — a mapping of field name → shorthand.
//!
//! Every parse returns the fragment together with whether the field it
//! describes must be present.
use tracing::{debug, trace, warn};

use crate::class_instance::{self, InstanceOf};
use crate::error::ShorthandError;
use crate::fragment::{Fragment, Kind, ObjectSchema};
use crate::shorthand::{Shorthand, ShorthandMap};

/// Key prefix marking a schema-level directive instead of a data field.
pub const DIRECTIVE_PREFIX: char = '$';

const OPTIONAL_SUFFIX: char = '?';
const PRESENCE_SUFFIX: char = '!';
const ARRAY_SUFFIX: &str = "[]";

#[derive(Debug, Clone, PartialEq)]
pub struct Parsed {
    pub fragment: Fragment,
    pub required: bool,
}

// ————————————————————————————————————————————————————————————————————————————
// TOKENS
// ————————————————————————————————————————————————————————————————————————————

/// Parse one shorthand token.
///
/// Suffix markers are peeled right to left: `?` (nullable, not required),
/// then `!` (non-empty), then `[]` (array of the remainder). Class names
/// short-circuit after `?` so that `"date?"` keeps its marker inside the
/// keyword parameter.
///
/// Only registered class names (matched case-insensitively, then lowercased)
/// become class-instance fragments. Any other bare name, e.g. `"promise"`,
/// passes through as a primitive `{type: "promise"}` for the external
/// compiler to accept or reject; `UnknownClass` is raised only for explicit
/// `instanceof` references in pre-built fragments.
pub fn parse_token(token: &str, is_internal: bool) -> Result<Parsed, ShorthandError> {
    // decided from the raw token, before anything is stripped
    let required = !token.ends_with(OPTIONAL_SUFFIX);

    let (base, nullable) = match token.strip_suffix(OPTIONAL_SUFFIX) {
        Some(rest) => (rest, true),
        None => (token, false),
    };

    if class_instance::lookup(base).is_some() {
        let param = token.to_lowercase();
        trace!(token, param = %param, "class-instance token");
        return Ok(Parsed { fragment: Fragment::instance_of(param), required });
    }

    let (base, require_presence) = match base.strip_suffix(PRESENCE_SUFFIX) {
        Some(rest) => (rest, true),
        None => (base, false),
    };

    if let Some(element) = base.strip_suffix(ARRAY_SUFFIX) {
        let items = parse_token(element, is_internal)?.fragment;
        let fragment = Fragment {
            kind: Kind::Array {
                items: Box::new(items),
                min_items: require_presence.then_some(1),
            },
            nullable,
        };
        return Ok(Parsed { fragment, required });
    }

    let fragment = match base {
        "uuid" => Fragment {
            kind: Kind::String { format: Some("uuid".into()), min_length: None },
            nullable,
        },
        "true" => Fragment::boolean(true).with_nullable(nullable),
        "false" => Fragment::boolean(false).with_nullable(nullable),
        "string" => Fragment {
            kind: Kind::String {
                format: None,
                min_length: require_presence.then_some(1),
            },
            nullable,
        },
        "any" => Fragment::any().with_nullable(nullable),
        other => Fragment::primitive(other).with_nullable(nullable),
    };

    if require_presence && base != "string" {
        // accepted but has no effect outside strings and arrays
        warn!(token, "presence marker `!` has no effect on this type");
    }

    Ok(Parsed { fragment, required })
}

// ————————————————————————————————————————————————————————————————————————————
// VALUES
// ————————————————————————————————————————————————————————————————————————————

/// Parse any shorthand value.
///
/// Variant lists become a union unless `is_internal`, in which case the bare
/// list is kept for the caller (directive values that expect arrays).
pub fn parse_value(value: &Shorthand, is_internal: bool) -> Result<Parsed, ShorthandError> {
    match value {
        Shorthand::Token(token) => parse_token(token, is_internal),
        Shorthand::Variants(variants) => {
            let mut fragments = Vec::with_capacity(variants.len());
            let mut required = true;
            for variant in variants {
                let parsed = parse_value(variant, true)?;
                required &= parsed.required;
                fragments.push(parsed.fragment);
            }
            let fragment = if is_internal {
                Fragment::sequence(fragments)
            } else {
                Fragment::union(fragments)
            };
            Ok(Parsed { fragment, required })
        }
        Shorthand::Object(map) => {
            let fragment = parse_object(map)?;
            let required = !fragment.is_nullable();
            Ok(Parsed { fragment, required })
        }
        Shorthand::Schema(fragment) => {
            check_prebuilt(fragment)?;
            Ok(Parsed { required: !fragment.is_nullable(), fragment: fragment.clone() })
        }
    }
}

/// Class references inside pre-built nodes are resolved eagerly so an
/// unknown class fails here rather than inside the external compiler.
fn check_prebuilt(fragment: &Fragment) -> Result<(), ShorthandError> {
    match &fragment.kind {
        Kind::InstanceOf(param) => InstanceOf::parse(param).map(|_| ()),
        Kind::Raw(value) => match value.get(InstanceOf::KEYWORD) {
            Some(serde_json::Value::String(param)) => InstanceOf::parse(param).map(|_| ()),
            Some(other) => Err(ShorthandError::Unsupported {
                found: format!("`{}` parameter {other}", InstanceOf::KEYWORD),
            }),
            None => Ok(()),
        },
        _ => Ok(()),
    }
}

// ————————————————————————————————————————————————————————————————————————————
// OBJECTS
// ————————————————————————————————————————————————————————————————————————————

/// Parse a field mapping into an object fragment.
pub fn parse_object(map: &ShorthandMap) -> Result<Fragment, ShorthandError> {
    let mut schema = ObjectSchema::default();

    for (name, value) in map {
        if let Some(directive) = name.strip_prefix(DIRECTIVE_PREFIX) {
            let parsed = parse_value(value, true)?;
            debug!(directive, "attaching schema directive");
            schema.directives.insert(directive.to_owned(), parsed.fragment);
            continue;
        }

        let parsed = parse_value(value, false)?;
        schema.properties.insert(name.clone(), parsed.fragment);
        if parsed.required {
            schema.required.get_or_insert_with(Vec::new).push(name.clone());
        }
    }

    Ok(Fragment::object(schema))
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
