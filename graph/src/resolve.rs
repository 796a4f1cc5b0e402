//! Turning user-supplied endpoint strings into commits.

use std::collections::HashSet;
use std::fmt;

use tracing::{debug, info};

use crate::core::{CommitNode, ObjectId, RefTarget};
use crate::error::{GraphError, Result};
use crate::store::HistoryStore;

/// Longest chain of symbolic references followed before giving up
pub const MAX_SYMBOLIC_DEPTH: usize = 10;

/// Prefixes tried, in order, when a name is not a full reference
const REF_LOOKUP_RULES: &[(&str, &str)] = &[
    ("", ""),
    ("refs/", ""),
    ("refs/tags/", ""),
    ("refs/heads/", ""),
    ("refs/remotes/", ""),
    ("refs/remotes/", "/HEAD"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndpointRole {
    Start,
    End,
}

impl fmt::Display for EndpointRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointRole::Start => write!(f, "start-commit"),
            EndpointRole::End => write!(f, "end-commit"),
        }
    }
}

/// One end of the requested range, as typed by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub role: EndpointRole,
    pub spec: String,
}

impl Endpoint {
    pub fn start(spec: impl Into<String>) -> Self {
        Self {
            role: EndpointRole::Start,
            spec: spec.into(),
        }
    }

    pub fn end(spec: impl Into<String>) -> Self {
        Self {
            role: EndpointRole::End,
            spec: spec.into(),
        }
    }

    fn not_found(&self) -> GraphError {
        GraphError::NotFound {
            role: self.role,
            endpoint: self.spec.clone(),
        }
    }

    fn unresolved(&self, reason: String) -> GraphError {
        GraphError::Resolution {
            role: self.role,
            endpoint: self.spec.clone(),
            reason,
        }
    }
}

/// Resolve an endpoint to the commit it names.
///
/// A full 40-digit hex string is looked up as a commit id. Anything else is
/// a reference name, expanded the way git expands short names (`main` finds
/// `refs/heads/main`). Symbolic references are followed until a direct one
/// is reached, and its target is peeled through annotated tags to a commit.
pub fn resolve<S: HistoryStore + ?Sized>(store: &S, endpoint: &Endpoint) -> Result<CommitNode> {
    let commit_id = if ObjectId::is_hex_id(&endpoint.spec) {
        let id: ObjectId = endpoint.spec.parse()?;
        if store.find_commit(&id)?.is_none() {
            return Err(endpoint.not_found());
        }
        id
    } else {
        let (name, target) = lookup_reference(store, &endpoint.spec)?
            .ok_or_else(|| endpoint.not_found())?;
        follow_reference(store, endpoint, name, target)?
    };

    let commit = store
        .find_commit(&commit_id)?
        .ok_or_else(|| endpoint.unresolved(format!("{} is not a commit", commit_id)))?;

    info!("{}={}: commit id: {}", endpoint.role, endpoint.spec, commit.id);
    Ok(commit)
}

/// Find the first reference matching `name` under git's lookup rules
fn lookup_reference<S: HistoryStore + ?Sized>(
    store: &S,
    name: &str,
) -> Result<Option<(String, RefTarget)>> {
    for (prefix, suffix) in REF_LOOKUP_RULES {
        let candidate = format!("{}{}{}", prefix, name, suffix);
        if let Some(target) = store.find_reference(&candidate)? {
            debug!("{} matched reference {}", name, candidate);
            return Ok(Some((candidate, target)));
        }
    }
    Ok(None)
}

fn follow_reference<S: HistoryStore + ?Sized>(
    store: &S,
    endpoint: &Endpoint,
    name: String,
    target: RefTarget,
) -> Result<ObjectId> {
    let mut visited = HashSet::from([name.clone()]);
    let mut current = name;
    let mut target = target;

    loop {
        match target {
            RefTarget::Direct(id) => {
                return store.peel_to_commit(&id)?.ok_or_else(|| {
                    endpoint.unresolved(format!(
                        "{} points at {}, which does not lead to a commit",
                        current, id
                    ))
                });
            }
            RefTarget::Symbolic(next) => {
                debug!("{}={}: {} points to {}", endpoint.role, endpoint.spec, current, next);

                if !visited.insert(next.clone()) {
                    return Err(endpoint.unresolved(format!(
                        "symbolic reference cycle at {}",
                        next
                    )));
                }
                if visited.len() > MAX_SYMBOLIC_DEPTH + 1 {
                    return Err(endpoint.unresolved(format!(
                        "more than {} levels of symbolic references",
                        MAX_SYMBOLIC_DEPTH
                    )));
                }

                target = store.find_reference(&next)?.ok_or_else(|| {
                    endpoint.unresolved(format!("{} points to missing reference {}", current, next))
                })?;
                current = next;
            }
        }
    }
}
