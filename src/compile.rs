//! Boundary to the external schema-validation compiler.
//!
//! The compiler itself is opaque: anything implementing [`SchemaCompiler`]
//! can turn the produced document into a [`Validator`]. This module only
//! sequences parse → render → compile and attaches diagnostics on failure.
use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{debug, debug_span};

use crate::class_instance::InstanceOf;
use crate::error::CompileError;
use crate::parse::parse_object;
use crate::shorthand::{map_to_value, ShorthandMap};

// ————————————————————————————————————————————————————————————————————————————
// COLLABORATOR INTERFACE
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// JSON Pointer to the offending value in the input.
    pub path: String,
    pub message: String,
}

pub trait Validator {
    fn validate(&self, instance: &Value) -> Result<(), Vec<ValidationIssue>>;

    /// Standalone, dependency-light rendering for embedding elsewhere.
    fn standalone_source(&self) -> Option<String> {
        None
    }
}

pub trait SchemaCompiler {
    type Validator: Validator;
    type Error: std::error::Error + Send + Sync + 'static;

    fn compile(&self, schema: &Value, keywords: &Keywords) -> Result<Self::Validator, Self::Error>;
}

/// Custom keywords and string formats the produced documents rely on.
#[derive(Debug, Clone, PartialEq)]
pub struct Keywords {
    /// keyword name → meta-schema of its value
    pub custom: IndexMap<&'static str, Value>,
    pub formats: Vec<&'static str>,
}

impl Keywords {
    pub fn standard() -> Self {
        let mut custom = IndexMap::new();
        custom.insert(InstanceOf::KEYWORD, InstanceOf::definition());
        Self { custom, formats: vec!["uuid"] }
    }

    pub fn to_value(&self) -> Value {
        json!({
            "keywords": self.custom,
            "formats": self.formats,
        })
    }
}

impl Default for Keywords {
    fn default() -> Self {
        Self::standard()
    }
}

// ————————————————————————————————————————————————————————————————————————————
// COMPILED ARTIFACT
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outcome {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
}

/// What the host splices into its output: a checker, the validator, and
/// the schema document it was built from.
#[derive(Debug)]
pub struct Compiled<V> {
    validator: V,
    schema: Value,
}

impl<V: Validator> Compiled<V> {
    pub fn check(&self, input: &Value) -> Outcome {
        match self.validator.validate(input) {
            Ok(()) => Outcome { valid: true, errors: Vec::new() },
            Err(errors) => Outcome { valid: false, errors },
        }
    }
    pub fn validator(&self) -> &V {
        &self.validator
    }
    pub fn schema(&self) -> &Value {
        &self.schema
    }
}

// ————————————————————————————————————————————————————————————————————————————
// PIPELINE
// ————————————————————————————————————————————————————————————————————————————

/// Parse a shorthand mapping into a schema document.
pub fn document_from_shorthand(shorthand: &ShorthandMap) -> Result<Value, CompileError> {
    let fragment = parse_object(shorthand).map_err(|source| CompileError::Parse {
        source,
        shorthand: pretty(&Value::Object(map_to_value(shorthand))),
    })?;
    Ok(fragment.to_document())
}

/// Parse a shorthand mapping and hand the document to `compiler`.
pub fn compile_shorthand<C: SchemaCompiler>(
    compiler: &C,
    shorthand: &ShorthandMap,
) -> Result<Compiled<C::Validator>, CompileError> {
    let _span = debug_span!("compile_shorthand", fields = shorthand.len()).entered();

    let schema = document_from_shorthand(shorthand)?;
    debug!("schema document ready");

    let validator = compiler
        .compile(&schema, &Keywords::standard())
        .map_err(|source| CompileError::Compilation {
            source: Box::new(source),
            schema: pretty(&schema),
        })?;
    debug!("validator compiled");

    Ok(Compiled { validator, schema })
}

fn pretty(value: &Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

// ————————————————————————————————————————————————————————————————————————————
// TESTS
// ————————————————————————————————————————————————————————————————————————————
