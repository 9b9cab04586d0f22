use std::path::PathBuf;
use thiserror::Error;

/// Failures of the clip pipeline. Every variant aborts the current
/// clip or batch; nothing here is silently downgraded to a default
/// (the only designed fallback is the zero-frame padding in the
/// assembler, which is not an error path).
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Frame provider or decoder failure for one clip path.
    #[error("failed to read clip frame {path:?}: {source}")]
    ClipRead {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    /// Heatmap estimator failure; no partial clip tensor is returned.
    #[error("heatmap estimation failed: {0}")]
    Estimation(#[source] anyhow::Error),

    /// Collation retained zero clips; stacking has no defined result.
    #[error("collate received no non-empty clips")]
    EmptyBatch,

    /// A per-clip tensor deviates from the batch shape, which means an
    /// upstream contract violation (misconfigured frame count or dim).
    #[error("clip tensor shape {got:?} does not match expected {expected:?}")]
    ShapeMismatch {
        got: Vec<usize>,
        expected: Vec<usize>,
    },

    /// Label availability must be uniform across a batch; a mix of
    /// labelled and unlabelled clips cannot be aligned with the ids.
    #[error("clip {id:?} breaks the batch label contract")]
    LabelMismatch { id: String },
}
