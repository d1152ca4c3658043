use std::path::PathBuf;

use flexi_syntax::SourcePosition;
use thiserror::Error;

/// A fatal validation failure raised while compiling layout attributes.
///
/// Every variant names the offending attribute or token together with the
/// position of the element it was found on.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DslError {
    #[error("{at}: '{value}' is not a valid value for attribute '{attribute}'")]
    InvalidAttributeValue { attribute: String, value: String, at: Location },
    #[error("{at}: '{token}' is not a valid value for breakpoint '{breakpoint}'")]
    InvalidBreakpointToken { token: String, breakpoint: String, at: Location },
    #[error("{at}: '{value}' is not a valid column value for breakpoint '{breakpoint}' (expected 1..={columns})")]
    InvalidColumnRange { value: i64, breakpoint: String, columns: u32, at: Location },
    #[error("{at}: '{value}' is not a valid column offset for breakpoint '{breakpoint}' (expected 0..{columns})")]
    InvalidOffsetRange { value: i64, breakpoint: String, columns: u32, at: Location },
}

/// `<tag>` at `line:column`, used to point at the element that failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub tag: String,
    pub position: SourcePosition,
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "<{}> at {}:{}", self.tag, self.position.line, self.position.column)
    }
}

/// Failure to load a project configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config JSON")]
    Json(#[from] serde_json::Error),
}
