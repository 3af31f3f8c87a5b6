//! Error types for symbol binding.
//!
//! Three families exist. [`ConfigError`] and [`GrammarError`] are fatal and
//! abort a whole construction or registration pass. [`LoadError`] describes a
//! single rejected library candidate; it is absorbed by the resolver and only
//! shows up as part of [`ConfigError::NoCompatibleLibrary`].

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Process-level configuration failures.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("search path variable `{var}` is not set")]
    MissingSearchPath { var: String },

    #[error(
        "no compatible `{library}` in search path [{}]{}",
        display_paths(.search_path),
        display_attempts(.attempts)
    )]
    NoCompatibleLibrary {
        library: String,
        search_path: Vec<PathBuf>,
        attempts: Vec<ProbeAttempt>,
    },

    #[error("config file not found: {0}")]
    NotFound(String),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Symbol names that break the naming grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("symbol `{symbol}` does not start with `{prefix}`")]
    MissingPrefix { symbol: String, prefix: String },

    #[error("not supported type `{token}` in symbol `{symbol}`")]
    UnsupportedType { symbol: String, token: String },

    #[error("not supported element type `{element}` in token `{token}` of symbol `{symbol}`")]
    UnsupportedElementType {
        symbol: String,
        token: String,
        element: String,
    },
}

/// Why a single library candidate was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("file does not exist")]
    NotFound,

    #[error("failed to load: {0}")]
    Open(String),

    #[error("missing entry point `{0}`")]
    MissingEntryPoint(String),
}

/// One probed candidate and what happened to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeAttempt {
    pub path: PathBuf,
    pub outcome: std::result::Result<(), LoadError>,
}

impl fmt::Display for ProbeAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.outcome {
            Ok(()) => write!(f, "{}: ok", self.path.display()),
            Err(e) => write!(f, "{}: {}", self.path.display(), e),
        }
    }
}

/// Top-level error for the binding pipeline.
#[derive(Debug, Error)]
pub enum BindError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Grammar(#[from] GrammarError),

    #[error("entry point `{name}` could not be resolved: {reason}")]
    EntryPoint { name: String, reason: String },
}

pub type Result<T> = std::result::Result<T, BindError>;

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(":")
}

fn display_attempts(attempts: &[ProbeAttempt]) -> String {
    attempts.iter().map(|a| format!("\n  {}", a)).collect()
}
