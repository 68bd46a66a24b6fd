//! Error types for the editor

use thiserror::Error;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Engine error: {0}")]
    Common(#[from] adork_playground_common::CommonError),

    #[error("Pipeline task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}
