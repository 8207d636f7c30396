//! Analysis errors.

use thiserror::Error;

/// A panic caught inside one analysis worker.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("analysis worker {index} panicked: {message}")]
pub struct WorkerError {
    /// Position of the sibling subtree the worker was given.
    pub index: usize,
    pub message: std::string::String,
}

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error(transparent)]
    Worker(#[from] WorkerError),
    #[error("failed to build analysis worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}
