//! Dependency resolution for the module graph
//!
//! Produces a linear construction order where every declared dependency
//! precedes its dependents. Among modules whose dependencies are all
//! satisfied, registration order is preserved, so runs are deterministic.

use hashbrown::HashMap;

use crate::error::GraphError;

/// Build the handle-to-index map, rejecting duplicate handles.
pub(crate) fn index_handles(
    handles: &[&'static str],
) -> Result<HashMap<&'static str, usize>, GraphError> {
    let mut by_handle = HashMap::with_capacity(handles.len());
    for (idx, &handle) in handles.iter().enumerate() {
        if by_handle.insert(handle, idx).is_some() {
            return Err(GraphError::DuplicateHandle { handle });
        }
    }
    Ok(by_handle)
}

/// Topologically order modules by their declared dependencies.
///
/// Returns indices into the input slices. Fails if a declared dependency is
/// missing from the set, or if the declarations form a cycle; in the cycle
/// case no ordering is produced at all, so no member is ever initialised.
pub fn resolve_order(
    handles: &[&'static str],
    dependencies: &[Vec<&'static str>],
) -> Result<Vec<usize>, GraphError> {
    debug_assert_eq!(handles.len(), dependencies.len());
    let by_handle = index_handles(handles)?;

    // Remaining-dependency counts, validated up front.
    let mut pending: Vec<usize> = Vec::with_capacity(handles.len());
    for (idx, deps) in dependencies.iter().enumerate() {
        for &dep in deps {
            if !by_handle.contains_key(dep) {
                return Err(GraphError::MissingDependency {
                    module: handles[idx],
                    dependency: dep,
                });
            }
        }
        pending.push(deps.len());
    }

    let mut order = Vec::with_capacity(handles.len());
    let mut placed = vec![false; handles.len()];

    // Repeatedly take the first registered module whose dependencies are all
    // placed. Quadratic, but module counts are small and the scan keeps
    // registration order stable among ready modules.
    while order.len() < handles.len() {
        let next = (0..handles.len()).find(|&i| !placed[i] && pending[i] == 0);
        let Some(next) = next else {
            let mut cycle: Vec<&'static str> = (0..handles.len())
                .filter(|&i| !placed[i])
                .map(|i| handles[i])
                .collect();
            cycle.sort_unstable();
            return Err(GraphError::CyclicDependency { handles: cycle });
        };

        placed[next] = true;
        order.push(next);
        for (idx, deps) in dependencies.iter().enumerate() {
            if !placed[idx] {
                pending[idx] -= deps.iter().filter(|&&d| d == handles[next]).count();
            }
        }
    }

    tracing::debug!(
        order = ?order.iter().map(|&i| handles[i]).collect::<Vec<_>>(),
        "module graph resolved"
    );
    Ok(order)
}
