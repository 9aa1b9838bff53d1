//! Structured error types shared across Boltz crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`BoltzError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (dimensions, parameter values, paths).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the Boltz workspace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum BoltzError {
    /// Invalid model dimensions or sampling parameters.
    #[error("configuration error: {0}")]
    Config(ErrorInfo),
    /// Invalid state identifiers or spin values.
    #[error("codec error: {0}")]
    Codec(ErrorInfo),
    /// Requested sampling backend cannot be located, loaded or trusted.
    #[error("backend unavailable: {0}")]
    Backend(ErrorInfo),
    /// Configuration file IO and parsing errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl BoltzError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            BoltzError::Config(info)
            | BoltzError::Codec(info)
            | BoltzError::Backend(info)
            | BoltzError::Serde(info) => info,
        }
    }

    /// Shorthand for a configuration error.
    pub fn config(code: &str, message: impl Into<String>) -> Self {
        BoltzError::Config(ErrorInfo::new(code, message))
    }

    /// Shorthand for a backend error.
    pub fn backend(code: &str, message: impl Into<String>) -> Self {
        BoltzError::Backend(ErrorInfo::new(code, message))
    }
}
