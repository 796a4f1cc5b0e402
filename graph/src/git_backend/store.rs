use std::path::Path;

use chrono::{TimeZone, Utc};
use git2::{ErrorCode, ReferenceType, Repository};
use tracing::debug;

use crate::core::{CommitNode, ObjectId, RefTarget};
use crate::error::{GraphError, Result};
use crate::store::HistoryStore;

/// History store backed by a local git repository
pub struct GitStore {
    repo: Repository,
}

impl GitStore {
    /// Open the repository at `repo_path`, or discover it from the
    /// environment and current directory when no path is given.
    pub fn open(repo_path: Option<&Path>) -> Result<Self> {
        let repo = match repo_path {
            Some(path) => Repository::open(path),
            None => Repository::open_from_env(),
        }?;
        debug!("opened repository at {}", repo.path().display());

        Ok(Self { repo })
    }

    pub fn from_repository(repo: Repository) -> Self {
        Self { repo }
    }

    /// Convert a git2::Commit to CommitNode
    fn commit_to_node(&self, commit: &git2::Commit) -> Result<CommitNode> {
        let timestamp = Utc
            .timestamp_opt(commit.time().seconds(), 0)
            .single()
            .ok_or_else(|| {
                GraphError::Git(git2::Error::from_str(&format!(
                    "commit {} has an invalid timestamp",
                    commit.id()
                )))
            })?;

        let author = String::from_utf8_lossy(commit.author().name_bytes()).into_owned();
        let message = String::from_utf8_lossy(commit.message_bytes()).into_owned();

        Ok(CommitNode::new(
            commit.id().into(),
            commit.parent_ids().map(ObjectId::from).collect(),
            timestamp,
            author,
            message,
        ))
    }
}

/// Absent objects and malformed names read as "nothing there"
fn absent<T>(result: std::result::Result<T, git2::Error>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(e) if matches!(e.code(), ErrorCode::NotFound | ErrorCode::InvalidSpec) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

impl HistoryStore for GitStore {
    fn find_commit(&self, id: &ObjectId) -> Result<Option<CommitNode>> {
        let oid = git2::Oid::try_from(*id)?;
        let Some(object) = absent(self.repo.find_object(oid, None))? else {
            return Ok(None);
        };
        match object.as_commit() {
            Some(commit) => Ok(Some(self.commit_to_node(commit)?)),
            None => Ok(None),
        }
    }

    fn find_reference(&self, name: &str) -> Result<Option<RefTarget>> {
        let Some(reference) = absent(self.repo.find_reference(name))? else {
            return Ok(None);
        };

        let target = match reference.kind() {
            Some(ReferenceType::Symbolic) => reference
                .symbolic_target()
                .map(|target| RefTarget::Symbolic(target.to_string())),
            _ => reference.target().map(|oid| RefTarget::Direct(oid.into())),
        };
        Ok(target)
    }

    fn peel_to_commit(&self, id: &ObjectId) -> Result<Option<ObjectId>> {
        let oid = git2::Oid::try_from(*id)?;
        let Some(object) = absent(self.repo.find_object(oid, None))? else {
            return Ok(None);
        };
        match object.peel_to_commit() {
            Ok(commit) => Ok(Some(commit.id().into())),
            Err(e) => {
                debug!("{} does not peel to a commit: {}", id, e.message());
                Ok(None)
            }
        }
    }

    fn is_ancestor(&self, candidate: &ObjectId, descendant: &ObjectId) -> Result<bool> {
        if candidate == descendant {
            return Ok(true);
        }
        let candidate = git2::Oid::try_from(*candidate)?;
        let descendant = git2::Oid::try_from(*descendant)?;
        Ok(self.repo.graph_descendant_of(descendant, candidate)?)
    }
}
