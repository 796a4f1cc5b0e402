//! Read-only access to a commit history.
//!
//! The resolver and walker only talk to history through [`HistoryStore`], so
//! they run the same against a git repository or an in-memory [`Dag`].
//!
//! [`Dag`]: crate::core::Dag

use std::collections::{HashSet, VecDeque};

use crate::core::{CommitNode, ObjectId, RefTarget};
use crate::error::Result;

pub trait HistoryStore {
    /// Look up a commit by id. `None` when the id names no commit.
    fn find_commit(&self, id: &ObjectId) -> Result<Option<CommitNode>>;

    /// Look up a reference by full name. `None` when it does not exist.
    fn find_reference(&self, name: &str) -> Result<Option<RefTarget>>;

    /// Follow tag objects down to a commit. `None` when the object is
    /// missing or does not lead to a commit.
    fn peel_to_commit(&self, id: &ObjectId) -> Result<Option<ObjectId>>;

    /// Whether `candidate` is reachable from `descendant` through parent
    /// edges. Every commit is its own ancestor.
    fn is_ancestor(&self, candidate: &ObjectId, descendant: &ObjectId) -> Result<bool> {
        if candidate == descendant {
            return Ok(true);
        }

        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([*descendant]);

        while let Some(id) = queue.pop_front() {
            if !seen.insert(id) {
                continue;
            }
            let Some(commit) = self.find_commit(&id)? else {
                continue;
            };
            for parent in commit.parents {
                if parent == *candidate {
                    return Ok(true);
                }
                queue.push_back(parent);
            }
        }

        Ok(false)
    }
}

impl<S: HistoryStore + ?Sized> HistoryStore for &S {
    fn find_commit(&self, id: &ObjectId) -> Result<Option<CommitNode>> {
        (**self).find_commit(id)
    }

    fn find_reference(&self, name: &str) -> Result<Option<RefTarget>> {
        (**self).find_reference(name)
    }

    fn peel_to_commit(&self, id: &ObjectId) -> Result<Option<ObjectId>> {
        (**self).peel_to_commit(id)
    }

    fn is_ancestor(&self, candidate: &ObjectId, descendant: &ObjectId) -> Result<bool> {
        (**self).is_ancestor(candidate, descendant)
    }
}
