//! Error types for the triage pipeline

/// Reasons the primary classifier can fail.
///
/// None of these reach the HTTP caller: the pipeline converts every variant
/// into a keyword-fallback classification.
#[derive(Debug, thiserror::Error)]
pub enum TriageError {
    #[error("Completion request failed: {0}")]
    CompletionFailed(String),

    #[error("Completion timed out after {0}s")]
    Timeout(u64),

    #[error("Severity value outside the expected enum: {0}")]
    InvalidSeverity(String),
}
