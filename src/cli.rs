//! Minimal CLI: shorthand JSON → schema document
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;

// ————————————————————————————————————————————————————————————————————————————
// TYPES
// ————————————————————————————————————————————————————————————————————————————

/// compile shorthand type descriptions into schema documents
#[derive(Parser, Debug)]
pub struct CommandLineInterface {
    /// verbose logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// compile shorthand files and print the schema documents
    Schema(SchemaOut),
    /// print the custom keywords and formats the documents rely on
    Keywords(KeywordsOut),
}

#[derive(Args, Debug, Clone)]
struct InputSettings {
    /// One or more inputs. May be literal paths or quoted glob patterns
    #[arg(long, short, num_args = 1.., required = true)]
    input: Vec<String>,
}

#[derive(clap::Parser, Debug)]
struct SchemaOut {
    #[command(flatten)]
    input_settings: InputSettings,

    /// output .json file (stdout if omitted); multiple inputs are written as a JSON array
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// single-line output
    #[arg(long)]
    compact: bool,
}

#[derive(clap::Parser, Debug)]
struct KeywordsOut {
    /// output .json file (stdout if omitted)
    #[arg(short, long)]
    out: Option<PathBuf>,
}

// ————————————————————————————————————————————————————————————————————————————
// IMPLEMENTATION
// ————————————————————————————————————————————————————————————————————————————

impl InputSettings {
    fn load_documents(&self) -> Result<Vec<Value>> {
        let source_paths = resolve_file_path_patterns(&self.input)
            .context("failed to resolve input file paths")?;
        let mut documents = Vec::with_capacity(source_paths.len());
        for source_path in source_paths {
            let source_path_str = source_path.to_string_lossy().to_string();
            tracing::debug!(path = %source_path_str, "compiling shorthand");
            let source = std::fs::read_to_string(&source_path)
                .with_context(|| format!("failed to read source file ({source_path_str})"))?;
            let shorthand = crate::path_de::shorthand_map_from_str(&source)
                .with_context(|| format!("failed to parse shorthand file ({source_path_str})"))?;
            let document = crate::compile::document_from_shorthand(&shorthand)
                .with_context(|| format!("failed to compile shorthand file ({source_path_str})"))?;
            documents.push(document);
        }
        Ok(documents)
    }
}

impl CommandLineInterface {
    pub fn load() -> Self {
        Self::parse()
    }
    pub fn verbose(&self) -> bool {
        self.verbose
    }
    pub fn run(&self) -> Result<()> {
        match &self.cmd {
            Command::Schema(target) => {
                let mut documents = target.input_settings.load_documents()?;
                let output = if documents.len() == 1 {
                    documents.remove(0)
                } else {
                    Value::Array(documents)
                };
                let src = if target.compact {
                    serde_json::to_string(&output)?
                } else {
                    serde_json::to_string_pretty(&output)?
                };
                emit(target.out.as_deref(), &src)
            }
            Command::Keywords(target) => {
                let keywords = crate::compile::Keywords::standard().to_value();
                let src = serde_json::to_string_pretty(&keywords)?;
                emit(target.out.as_deref(), &src)
            }
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn emit(out: Option<&Path>, src: &str) -> Result<()> {
    let Some(out) = out else {
        println!("{src}");
        return Ok(());
    };
    if let Some(parent) = out.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    std::fs::write(out, src).with_context(|| format!("failed to write {}", out.display()))
}

fn resolve_file_path_patterns<I>(patterns: I) -> Result<Vec<PathBuf>>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    fn has_glob_chars(s: &str) -> bool {
        // Minimal glob detection for the `glob` crate syntax.
        s.bytes().any(|b| matches!(b, b'*' | b'?' | b'[' | b'{'))
    }

    let mut out = Vec::<PathBuf>::new();

    for raw in patterns {
        let pattern = raw.as_ref();

        if has_glob_chars(pattern) {
            let mut matched_any = false;
            for entry in glob::glob(pattern)? {
                out.push(entry?);
                matched_any = true;
            }
            if !matched_any {
                anyhow::bail!("glob pattern matched no files: {pattern}");
            }
        } else {
            out.push(PathBuf::from(pattern));
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_schema_command() {
        let cli = CommandLineInterface::try_parse_from([
            "shorthand-schema", "schema", "-i", "a.json", "b/*.json", "--compact", "-v",
        ])
        .unwrap();
        assert!(cli.verbose());
        let Command::Schema(target) = &cli.cmd else { panic!("{cli:?}") };
        assert_eq!(target.input_settings.input, ["a.json", "b/*.json"]);
        assert!(target.compact);
    }

    #[test]
    fn literal_paths_pass_through() {
        let paths = resolve_file_path_patterns(["x/y.json"]).unwrap();
        assert_eq!(paths, [PathBuf::from("x/y.json")]);
    }

    #[test]
    fn empty_glob_is_an_error() {
        assert!(resolve_file_path_patterns(["/definitely/not/here/*.json"]).is_err());
    }
}
