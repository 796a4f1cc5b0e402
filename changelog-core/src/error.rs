use graph::{GraphError, ObjectId};
use thiserror::Error;

/// Errors raised while building a changelog
#[derive(Error, Debug)]
pub enum ChangelogError {
    #[error(transparent)]
    Graph(#[from] GraphError),

    #[error("commit {0} from the range has no metadata in the repository")]
    Lookup(ObjectId),

    #[error("failed to render template '{template}': {reason}")]
    Render { template: String, reason: String },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ChangelogError>;
