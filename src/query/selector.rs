//! The selector engine: evaluates a `Path` against an element tree.
//!
//! Selection descends one tree level per step. At each level only element
//! children are candidates; those matching the current step are either
//! results (last step) or the roots of the next level's search. Results are
//! concatenated in candidate order, so the output follows document order.

use super::error::SelectError;
use super::path::Path;
use super::step::Step;
use crate::document::node::Element;
use tracing::{debug, trace};

/// Selects the elements below `node` matched by `path`.
///
/// The first step is tested against `node`'s element children, the second
/// against their element children, and so on. `node` itself is never part
/// of the result.
///
/// # Errors
///
/// - `SelectError::MalformedPath` if `path` has no steps
/// - `SelectError::PredicateFailure` if any predicate fails; the traversal
///   stops and nothing is returned
pub fn select<'a, N: Element>(node: &'a N, path: &Path<N>) -> Result<Vec<&'a N>, SelectError> {
    let (head, rest) = path
        .steps
        .split_first()
        .ok_or(SelectError::MalformedPath)?;

    debug!(%path, root = node.name(), "selecting");
    let mut results = Vec::new();
    select_level(node, head, rest, &mut results)?;
    debug!(matches = results.len(), "selection finished");

    Ok(results)
}

/// Like `select`, but also returns the location of each match.
///
/// A location is the sequence of element-child indices leading from `node`
/// to the match; text and comment children are not counted.
pub fn select_with_paths<'a, N: Element>(
    node: &'a N,
    path: &Path<N>,
) -> Result<Vec<(Vec<usize>, &'a N)>, SelectError> {
    let (head, rest) = path
        .steps
        .split_first()
        .ok_or(SelectError::MalformedPath)?;

    debug!(%path, root = node.name(), "selecting with locations");
    let mut results = Vec::new();
    select_level_with_path(node, head, rest, &[], &mut results)?;
    debug!(matches = results.len(), "selection finished");

    Ok(results)
}

fn select_level<'a, N: Element>(
    node: &'a N,
    head: &Step<N>,
    rest: &[Step<N>],
    results: &mut Vec<&'a N>,
) -> Result<(), SelectError> {
    let mut candidates = Vec::new();
    for child in node.child_elements() {
        if head.matches(child)? {
            candidates.push(child);
        }
    }
    trace!(step = %head, parent = node.name(), candidates = candidates.len(), "level matched");

    match rest.split_first() {
        None => results.extend(candidates),
        Some((next, remaining)) => {
            for candidate in candidates {
                select_level(candidate, next, remaining, results)?;
            }
        }
    }

    Ok(())
}

fn select_level_with_path<'a, N: Element>(
    node: &'a N,
    head: &Step<N>,
    rest: &[Step<N>],
    current_path: &[usize],
    results: &mut Vec<(Vec<usize>, &'a N)>,
) -> Result<(), SelectError> {
    let mut candidates = Vec::new();
    for (idx, child) in node.child_elements().enumerate() {
        if head.matches(child)? {
            let mut new_path = current_path.to_vec();
            new_path.push(idx);
            candidates.push((new_path, child));
        }
    }
    trace!(step = %head, parent = node.name(), candidates = candidates.len(), "level matched");

    match rest.split_first() {
        None => results.extend(candidates),
        Some((next, remaining)) => {
            for (candidate_path, candidate) in candidates {
                select_level_with_path(candidate, next, remaining, &candidate_path, results)?;
            }
        }
    }

    Ok(())
}
