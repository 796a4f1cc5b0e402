use chrono::{DateTime, Utc};

use super::id::ObjectId;

/// A commit node in the DAG
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitNode {
    /// Commit hash
    pub id: ObjectId,
    /// Parent commit IDs, in commit order
    pub parents: Vec<ObjectId>,
    /// Committer timestamp
    pub timestamp: DateTime<Utc>,
    /// Author name
    pub author: String,
    /// Full commit message
    pub message: String,
}

impl CommitNode {
    pub fn new(
        id: ObjectId,
        parents: Vec<ObjectId>,
        timestamp: DateTime<Utc>,
        author: String,
        message: String,
    ) -> Self {
        Self {
            id,
            parents,
            timestamp,
            author,
            message,
        }
    }

    /// First line of the commit message
    pub fn summary(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }

    /// Check if this is a root commit (no parents)
    pub fn is_root(&self) -> bool {
        self.parents.is_empty()
    }

    /// Check if this is a merge commit (multiple parents)
    pub fn is_merge(&self) -> bool {
        self.parents.len() > 1
    }
}

/// Where a reference points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefTarget {
    /// Straight at an object
    Direct(ObjectId),
    /// At another reference, by name
    Symbolic(String),
}
