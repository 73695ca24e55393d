//! Crate-level error types.

use std::fmt;

use crate::mol::MolError;

/// Errors produced by the chembed crate.
///
/// Field-level diagnostics for user-submitted values use
/// [`crate::widget::ValidationError`] instead; those accompany a completed
/// request rather than failing it.
#[derive(Debug)]
pub enum ChembedError {
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML deployment-configuration parsing failure.
    ConfigParse(String),
    /// Unrecognized chemical format selector. This is a templating or
    /// deployment mistake, never user input.
    UnknownFormat(String),
    /// Molfile reading/writing failure.
    Mol(MolError),
}

impl fmt::Display for ChembedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ConfigParse(msg) => {
                write!(f, "config parse error: {msg}")
            }
            Self::UnknownFormat(value) => {
                write!(f, "unknown chemical format: {value}")
            }
            Self::Mol(e) => write!(f, "molfile error: {e}"),
        }
    }
}

impl std::error::Error for ChembedError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Mol(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for ChembedError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<MolError> for ChembedError {
    fn from(e: MolError) -> Self {
        Self::Mol(e)
    }
}
