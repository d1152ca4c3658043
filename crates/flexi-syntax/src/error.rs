use thiserror::Error;

/// A parse error from the template front-end.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("template parse error at {line}:{column}: {message}")]
pub struct ParseError {
    pub message: String,
    /// 1-based source line number where the error occurred.
    pub line: usize,
    /// 0-based source column where the error occurred.
    pub column: usize,
}

impl ParseError {
    pub(crate) fn new(msg: impl Into<String>, line: usize, column: usize) -> Self {
        Self { message: msg.into(), line, column }
    }
}
