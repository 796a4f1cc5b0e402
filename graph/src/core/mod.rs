pub mod id;
pub mod node;
pub mod dag;

pub use id::{ObjectId, OID_HEX_LEN};
pub use node::{CommitNode, RefTarget};
pub use dag::Dag;
