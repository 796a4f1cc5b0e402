pub mod core;
pub mod error;
pub mod git_backend;
pub mod resolve;
pub mod store;
pub mod walk;

pub use core::{CommitNode, Dag, ObjectId, RefTarget, OID_HEX_LEN};
pub use error::{GraphError, Result};
pub use git_backend::GitStore;
pub use resolve::{resolve, Endpoint, EndpointRole};
pub use store::HistoryStore;
pub use walk::{is_ancestor, walk};
