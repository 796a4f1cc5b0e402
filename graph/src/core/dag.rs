use std::collections::HashMap;

use super::{id::ObjectId, node::{CommitNode, RefTarget}};
use crate::error::Result;
use crate::store::HistoryStore;

/// In-memory commit history with its references
#[derive(Debug, Clone)]
pub struct Dag {
    /// All nodes indexed by commit ID
    pub nodes: HashMap<ObjectId, CommitNode>,
    /// References by full name
    pub refs: HashMap<String, RefTarget>,
    /// Tag objects: tag ID -> tagged object ID
    pub tags: HashMap<ObjectId, ObjectId>,
}

impl Dag {
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            refs: HashMap::new(),
            tags: HashMap::new(),
        }
    }

    /// Add a commit node to the DAG
    pub fn add_node(&mut self, node: CommitNode) {
        self.nodes.insert(node.id, node);
    }

    /// Point a reference straight at an object
    pub fn set_reference(&mut self, name: &str, target: ObjectId) {
        self.refs.insert(name.to_string(), RefTarget::Direct(target));
    }

    /// Point a reference at another reference
    pub fn set_symbolic_reference(&mut self, name: &str, target: &str) {
        self.refs
            .insert(name.to_string(), RefTarget::Symbolic(target.to_string()));
    }

    /// Record a tag object pointing at `target`
    pub fn add_tag_object(&mut self, tag: ObjectId, target: ObjectId) {
        self.tags.insert(tag, target);
    }
}

impl Default for Dag {
    fn default() -> Self {
        Self::new()
    }
}

impl HistoryStore for Dag {
    fn find_commit(&self, id: &ObjectId) -> Result<Option<CommitNode>> {
        Ok(self.nodes.get(id).cloned())
    }

    fn find_reference(&self, name: &str) -> Result<Option<RefTarget>> {
        Ok(self.refs.get(name).cloned())
    }

    fn peel_to_commit(&self, id: &ObjectId) -> Result<Option<ObjectId>> {
        let mut current = *id;
        // at most one hop per tag object
        for _ in 0..=self.tags.len() {
            if self.nodes.contains_key(&current) {
                return Ok(Some(current));
            }
            match self.tags.get(&current) {
                Some(target) => current = *target,
                None => return Ok(None),
            }
        }
        Ok(None)
    }
}
