//! Error types for the shorthand compiler and the compilation boundary.

// ————————————————————————————————————————————————————————————————————————————
// PARSE
// ————————————————————————————————————————————————————————————————————————————

/// Failures raised while walking a shorthand tree.
#[derive(Debug, thiserror::Error)]
pub enum ShorthandError {
    /// A class-instance reference names a class that is not in the registry.
    #[error("unknown class reference `{token}` (expected one of: {known})")]
    UnknownClass { token: String, known: String },

    /// A value that has no shorthand meaning (e.g. JSON `null`).
    #[error("unsupported shorthand value {found}")]
    Unsupported { found: String },

    /// The shorthand source itself is not valid JSON.
    #[error("invalid shorthand source: {0}")]
    Json(String),
}

// ————————————————————————————————————————————————————————————————————————————
// COMPILE
// ————————————————————————————————————————————————————————————————————————————

/// Failures from the full shorthand → validator pipeline.
///
/// Each variant carries a pretty-printed rendering of whatever the developer
/// actually wrote (or the document we produced from it) so the message is
/// diagnosable on its own.
#[derive(Debug, thiserror::Error)]
pub enum CompileError {
    #[error("{source}\nwhile parsing shorthand:\n{shorthand}")]
    Parse {
        #[source]
        source: ShorthandError,
        shorthand: String,
    },

    #[error("{source}\nwhile compiling schema:\n{schema}")]
    Compilation {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
        schema: String,
    },
}

impl CompileError {
    /// The rendered shorthand or schema document attached to this error.
    pub fn context(&self) -> &str {
        match self {
            Self::Parse { shorthand, .. } => shorthand,
            Self::Compilation { schema, .. } => schema,
        }
    }
}
