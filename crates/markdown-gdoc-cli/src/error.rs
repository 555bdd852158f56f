use std::io;
use std::path::PathBuf;

use markdown_gdoc_config::ConfigError;
use markdown_gdoc_core::CompileError;
use thiserror::Error;

/// Process exit codes reported by the `markdown-gdoc` binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum ExitCode {
    Success = 0,
    InvalidInput = 1,
    Config = 2,
    Io = 4,
    InvariantViolation = 5,
}

impl ExitCode {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Success),
            1 => Some(Self::InvalidInput),
            2 => Some(Self::Config),
            4 => Some(Self::Io),
            5 => Some(Self::InvariantViolation),
            _ => None,
        }
    }

    pub fn code(self) -> i32 {
        self as i32
    }
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error("no content in {input}")]
    NoContent { input: String },

    #[error("invalid JSON in {input}: {error}")]
    InvalidJson {
        input: String,
        #[source]
        error: serde_json::Error,
    },

    #[error("stdin (`-`) can only be given once")]
    RepeatedStdin,

    #[error("inputs {first} and {second} would both write {path}")]
    OutputCollision {
        first: String,
        second: String,
        path: PathBuf,
    },

    #[error("header image is not configured (set header.image_uri or pass --image-uri)")]
    MissingHeaderImage,

    #[error("failed to read {input}: {error}")]
    Read {
        input: String,
        #[source]
        error: io::Error,
    },

    #[error("failed to write {path}: {error}")]
    Write {
        path: PathBuf,
        #[source]
        error: io::Error,
    },

    #[error("failed to serialize requests: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Compile(#[from] CompileError),
}

impl CliError {
    pub fn exit_code(&self) -> ExitCode {
        match self {
            Self::NoContent { .. }
            | Self::InvalidJson { .. }
            | Self::RepeatedStdin
            | Self::OutputCollision { .. }
            | Self::MissingHeaderImage => ExitCode::InvalidInput,
            Self::Read { .. } | Self::Write { .. } => ExitCode::Io,
            Self::Config(_) => ExitCode::Config,
            Self::Compile(_) | Self::Serialize(_) => ExitCode::InvariantViolation,
        }
    }
}

pub type CliResult<T> = Result<T, CliError>;
