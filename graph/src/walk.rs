//! Ancestry checks and the ordered walk between two commits.

use std::collections::{BinaryHeap, HashMap, HashSet, VecDeque};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::core::{CommitNode, ObjectId};
use crate::error::{GraphError, Result};
use crate::store::HistoryStore;

/// Whether `candidate` occurred at or before `descendant` in history
pub fn is_ancestor<S: HistoryStore + ?Sized>(
    store: &S,
    candidate: &CommitNode,
    descendant: &CommitNode,
) -> Result<bool> {
    store.is_ancestor(&candidate.id, &descendant.id)
}

/// What the walk keeps of each visited commit
struct Visit {
    timestamp: DateTime<Utc>,
    parents: Vec<ObjectId>,
}

/// Collect the commits from `end` down to, but excluding, `start`.
///
/// The result lists every commit that is an ancestor of `end` and a strict
/// descendant of `start`, children before parents. Among commits whose
/// children have all been listed, the newest committer timestamp goes
/// first, and the larger id breaks exact ties.
///
/// Every ancestor of `end` is read from the store down to the root commits
/// before the range is cut out, so the cost follows the depth of the history
/// behind `end` rather than the size of the range. Only ids, parents and
/// timestamps are kept while collecting.
pub fn walk<S: HistoryStore + ?Sized>(
    store: &S,
    end: &CommitNode,
    start: &CommitNode,
) -> Result<Vec<ObjectId>> {
    if !is_ancestor(store, start, end)? {
        return Err(GraphError::Unreachable {
            start: start.id,
            end: end.id,
        });
    }

    let visits = collect_ancestors(store, end)?;
    let span = descendants_within(&visits, &start.id);
    debug!(
        "walk {}..{}: {} ancestors, {} in range",
        start.id,
        end.id,
        visits.len(),
        span.len()
    );

    // children still to be emitted, per commit in the span
    let mut pending: HashMap<ObjectId, usize> = span.iter().map(|id| (*id, 0)).collect();
    for id in &span {
        for parent in &visits[id].parents {
            if let Some(count) = pending.get_mut(parent) {
                *count += 1;
            }
        }
    }

    let mut ready: BinaryHeap<(DateTime<Utc>, ObjectId)> = pending
        .iter()
        .filter(|(_, count)| **count == 0)
        .map(|(id, _)| (visits[id].timestamp, *id))
        .collect();

    let mut chain = Vec::with_capacity(span.len());
    while let Some((_, id)) = ready.pop() {
        if id == start.id {
            info!("{} commits between {} and {}", chain.len(), start.id, end.id);
            return Ok(chain);
        }
        chain.push(id);

        for parent in &visits[&id].parents {
            if let Some(count) = pending.get_mut(parent) {
                *count -= 1;
                if *count == 0 {
                    ready.push((visits[parent].timestamp, *parent));
                }
            }
        }
    }

    Err(GraphError::TraversalExhausted {
        start: start.id,
        end: end.id,
    })
}

/// Every commit reachable from `tip`, including itself
fn collect_ancestors<S: HistoryStore + ?Sized>(
    store: &S,
    tip: &CommitNode,
) -> Result<HashMap<ObjectId, Visit>> {
    let mut visits = HashMap::new();
    visits.insert(
        tip.id,
        Visit {
            timestamp: tip.timestamp,
            parents: tip.parents.clone(),
        },
    );

    let mut stack = tip.parents.clone();
    while let Some(id) = stack.pop() {
        if visits.contains_key(&id) {
            continue;
        }
        let Some(commit) = store.find_commit(&id)? else {
            // Shallow histories stop at commits whose parents are absent
            warn!("parent commit {} is missing from the store", id);
            continue;
        };
        stack.extend(commit.parents.iter().copied());
        visits.insert(
            id,
            Visit {
                timestamp: commit.timestamp,
                parents: commit.parents,
            },
        );
    }

    Ok(visits)
}

/// Commits in `visits` that descend from `root`, including `root`
fn descendants_within(visits: &HashMap<ObjectId, Visit>, root: &ObjectId) -> HashSet<ObjectId> {
    let mut children: HashMap<ObjectId, Vec<ObjectId>> = HashMap::new();
    for (id, visit) in visits {
        for parent in &visit.parents {
            children.entry(*parent).or_default().push(*id);
        }
    }

    let mut span = HashSet::new();
    if !visits.contains_key(root) {
        return span;
    }

    let mut queue = VecDeque::from([*root]);
    while let Some(id) = queue.pop_front() {
        if !span.insert(id) {
            continue;
        }
        if let Some(kids) = children.get(&id) {
            queue.extend(kids.iter().copied());
        }
    }
    span
}
