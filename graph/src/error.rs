use thiserror::Error;

use crate::core::ObjectId;
use crate::resolve::EndpointRole;

/// Errors raised while resolving endpoints and walking history
#[derive(Error, Debug)]
pub enum GraphError {
    #[error("{role}={endpoint}: no such commit or reference")]
    NotFound { role: EndpointRole, endpoint: String },

    #[error("{role}={endpoint}: cannot resolve to a commit: {reason}")]
    Resolution {
        role: EndpointRole,
        endpoint: String,
        reason: String,
    },

    #[error("end commit {end} is not reachable from start commit {start}")]
    Unreachable { start: ObjectId, end: ObjectId },

    #[error("history walk from {end} ended without reaching start commit {start}")]
    TraversalExhausted { start: ObjectId, end: ObjectId },

    #[error("invalid object id: {0}")]
    InvalidObjectId(String),

    #[error("git error: {0}")]
    Git(#[from] git2::Error),
}

pub type Result<T> = std::result::Result<T, GraphError>;
