use weft_core::text::TextError;

pub type Result<T> = std::result::Result<T, AnalyzeError>;

/// Errors surfaced by the analyzer and driver.
#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    /// Input shape is wrong (wrong file count, missing required argument).
    #[error("precondition failed: {0}")]
    Precondition(String),

    /// A required identity or descriptor could not be resolved.
    #[error("not found: {0}")]
    NotFound(String),

    /// An upstream compiler, parser, or decoder rejected its input.
    #[error("parse failed: {0}")]
    Parse(String),

    /// An invariant failed; indicates an indexer bug, not bad input.
    #[error("internal error: {0}")]
    Internal(String),

    /// Schema-comment analysis failed. The driver records this as a
    /// diagnostic on the input file and continues with the main walk.
    #[error("schema comment analysis failed: {0}")]
    SchemaComments(String),
}

impl From<TextError> for AnalyzeError {
    fn from(err: TextError) -> Self {
        // Locations come from the parser over the same text; running off the
        // line index means the trees are out of sync.
        AnalyzeError::Internal(err.to_string())
    }
}
