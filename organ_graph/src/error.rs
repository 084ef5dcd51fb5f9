//! Error types for the organ graph.

use thiserror::Error;

use crate::organs::OrganId;

#[derive(Error, Debug)]
pub enum GraphError {
    #[error("unknown node: {0}")]
    UnknownNode(OrganId),

    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GraphError>;

impl GraphError {
    pub fn invalid_snapshot(reason: impl Into<String>) -> Self {
        Self::InvalidSnapshot(reason.into())
    }
}
