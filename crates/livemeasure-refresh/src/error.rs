//! Refresh failure modes.

use thiserror::Error;

use livemeasure_formula::{EngineError, GridError};
use livemeasure_matrix::MatrixError;
use livemeasure_types::ProjectId;

/// Fatal refresh failures. A project that was never analyzed is not an
/// error; it is skipped silently with no event.
#[derive(Debug, Error)]
pub enum RefreshError {
    /// The touched batch for a project group contains no root project.
    /// Raised before any mutation.
    #[error("no root project found in component batch")]
    MissingProject,

    /// Branch context could not be resolved for the project.
    #[error("branch not found for project {0}")]
    MissingBranch(ProjectId),

    /// Project configuration produced an unusable rating grid.
    #[error("invalid project configuration: {0}")]
    InvalidConfig(#[from] GridError),

    /// A formula failed; carries the metric key and component.
    #[error(transparent)]
    Engine(#[from] EngineError),

    #[error(transparent)]
    Matrix(#[from] MatrixError),

    /// A collaborator call failed.
    #[error("{stage} failed: {source}")]
    Source {
        stage: &'static str,
        #[source]
        source: anyhow::Error,
    },
}

impl RefreshError {
    pub(crate) fn source_stage(stage: &'static str) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| RefreshError::Source { stage, source }
    }
}
