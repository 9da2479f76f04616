use thiserror::Error;

/// Caller-facing error taxonomy for the pipeline operations.
///
/// Advisory stages (question generation, profile building) never surface
/// here; they fall back deterministically instead. Empty search results and
/// an empty index are normal outcomes, not errors.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Invalid caller input, rejected at the operation boundary
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Every derived search query failed upstream; there is no fallback content
    #[error("news search unavailable: {0}")]
    SearchUnavailable(anyhow::Error),

    /// Embedding or index construction failed; the prior index is preserved
    #[error("feed indexing failed: {0}")]
    IndexingFailed(anyhow::Error),

    /// The question embedding or answer generation failed
    #[error("question answering failed: {0}")]
    AnswerFailed(anyhow::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
