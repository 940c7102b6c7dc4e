//! Compile compact shorthand type descriptions (`"string?"`, `"number[]"`,
//! `"date"`) into schema documents for an external validation compiler.
//!
//! ```
//! use serde_json::json;
//! use shorthand_schema::{document_from_shorthand, shorthand::map_from_value};
//!
//! let shorthand = map_from_value(json!({"name": "string", "age": "number?"})).unwrap();
//! let schema = document_from_shorthand(&shorthand).unwrap();
//! assert_eq!(schema["required"], json!(["name"]));
//! ```
pub mod class_instance;
pub mod cli;
pub mod compile;
pub mod error;
pub mod fragment;
pub mod parse;
pub mod path_de;
pub mod shorthand;

pub use compile::{compile_shorthand, document_from_shorthand, Compiled, Keywords, SchemaCompiler, Validator};
pub use error::{CompileError, ShorthandError};
pub use fragment::{Fragment, Kind, ObjectSchema};
pub use parse::{parse_object, parse_token, parse_value, Parsed};
pub use shorthand::{Shorthand, ShorthandMap};
