//! Reading source content from files or stdin.
//!
//! Inputs are either Markdown or a JSON object carrying the Markdown under a
//! configured key (the shape produced by the text-generation step upstream).

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::error::{CliError, CliResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputSource {
    File(PathBuf),
    Stdin,
}

impl InputSource {
    /// `-` selects stdin; anything else is a path.
    pub fn from_arg(arg: &Path) -> Self {
        if arg.as_os_str() == "-" {
            InputSource::Stdin
        } else {
            InputSource::File(arg.to_path_buf())
        }
    }

    pub fn label(&self) -> String {
        match self {
            InputSource::File(path) => path.display().to_string(),
            InputSource::Stdin => "<stdin>".to_owned(),
        }
    }

    /// Path used to derive the output file name.
    pub fn output_hint(&self) -> &Path {
        match self {
            InputSource::File(path) => path,
            InputSource::Stdin => Path::new("stdin"),
        }
    }

    fn is_json_file(&self) -> bool {
        match self {
            InputSource::File(path) => path
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("json")),
            InputSource::Stdin => false,
        }
    }
}

/// Load the Markdown for `source`. JSON files, and stdin that looks like a
/// JSON object, are unwrapped through `json_key`.
pub fn read_markdown(source: &InputSource, json_key: &str) -> CliResult<String> {
    let raw = match source {
        InputSource::File(path) => fs::read_to_string(path).map_err(|error| CliError::Read {
            input: source.label(),
            error,
        })?,
        InputSource::Stdin => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|error| CliError::Read {
                    input: source.label(),
                    error,
                })?;
            buffer
        }
    };

    let sniffed_json = *source == InputSource::Stdin && raw.trim_start().starts_with('{');
    let markdown = if source.is_json_file() || sniffed_json {
        extract_json(&raw, json_key, &source.label())?
    } else {
        raw
    };

    if markdown.trim().is_empty() {
        return Err(CliError::NoContent {
            input: source.label(),
        });
    }
    Ok(markdown)
}

fn extract_json(raw: &str, json_key: &str, label: &str) -> CliResult<String> {
    let value: Value = serde_json::from_str(raw).map_err(|error| CliError::InvalidJson {
        input: label.to_owned(),
        error,
    })?;

    match value.get(json_key).and_then(Value::as_str) {
        Some(text) => Ok(text.to_owned()),
        None => {
            log::warn!("{label}: key '{json_key}' is missing or not a string");
            Err(CliError::NoContent {
                input: label.to_owned(),
            })
        }
    }
}
