/// Errors raised by the amendment core.
///
/// The comparators and mergers are total over well-formed input and never
/// return these; they surface from configuration checks only.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
