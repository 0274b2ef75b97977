use crate::{
    error::{GraphError, Result},
    handle::{Direction, Handle, NodeId},
    hashgraph::{incoming_side, reciprocal_of, HashGraph},
    pathhandlegraph::StepHandle,
};

use fnv::{FnvHashMap, FnvHashSet};

use log::{error, info};

/// Check the internal consistency of a graph, returning
/// `CorruptData` describing the first problem found:
///
/// * node IDs are within the min/max bounds
/// * every edge list entry points to an existing node, and has a
///   matching entry on the other end of the edge (reversing
///   self-loops are their own match)
/// * every path is a well-formed linked list with the right step
///   count, on existing nodes
/// * every step is in exactly one occurrence bucket, the one of its
///   node
pub fn validate(graph: &HashGraph) -> Result<()> {
    info!("validating graph");

    validate_nodes(graph)?;
    let edge_entries = validate_edges(graph)?;
    let steps = validate_paths(graph)?;
    validate_occurrences(graph, steps)?;

    info!(
        "graph is valid: {} nodes, {} edge list entries, {} paths, {} steps",
        graph.graph.len(),
        edge_entries,
        graph.paths.len(),
        steps
    );

    Ok(())
}

fn fail(message: String) -> Result<()> {
    error!("{}", message);
    Err(GraphError::corrupt(message))
}

fn validate_nodes(graph: &HashGraph) -> Result<()> {
    for &id in graph.graph.keys() {
        if !id.is_packable() || id < graph.min_id || id > graph.max_id {
            return fail(format!(
                "node {} outside the ID bounds {}..={}",
                id, graph.min_id, graph.max_id
            ));
        }
    }
    Ok(())
}

type EntryKey = (NodeId, Direction, Handle);

fn validate_edges(graph: &HashGraph) -> Result<usize> {
    let mut entries: FnvHashMap<EntryKey, usize> = FnvHashMap::default();

    for (&id, node) in graph.graph.iter() {
        for &side in &[Direction::Left, Direction::Right] {
            for &target in node.edges(side) {
                if !graph.graph.contains_key(&target.id()) {
                    fail(format!(
                        "node {} has an edge to missing node {}",
                        id,
                        target.id()
                    ))?;
                }
                *entries.entry((id, side, target)).or_default() += 1;
            }
        }
    }

    for (&(id, side, target), &count) in entries.iter() {
        let fwd = Handle::pack(id, false);
        let reciprocal =
            (target.id(), incoming_side(target), reciprocal_of(fwd, side));
        let other = entries.get(&reciprocal).copied().unwrap_or(0);
        if other != count {
            fail(format!(
                "edge from the {:?} side of node {} to {:?} is stored {} \
                 times, its reciprocal {} times",
                side, id, target, count, other
            ))?;
        }
    }

    Ok(entries.values().sum())
}

fn validate_paths(graph: &HashGraph) -> Result<usize> {
    let mut total = 0;

    for (&path_id, path) in graph.paths.iter() {
        if graph.path_id.get(&path.name) != Some(&path_id) {
            fail(format!("path {} is not registered by name", path_id))?;
        }

        let mut prev = None;
        let mut count = 0;

        for (ix, rec) in path.steps() {
            if rec.prev != prev {
                fail(format!("path {} has a broken back link", path_id))?;
            }
            if !graph.graph.contains_key(&rec.handle.id()) {
                fail(format!(
                    "path {} has a step on missing node {}",
                    path_id,
                    rec.handle.id()
                ))?;
            }

            let step = StepHandle::new(path_id, ix);
            if !graph.occurrences().get(rec.handle.id()).contains(&step) {
                fail(format!(
                    "path {} has a step on node {} missing from the \
                     occurrence index",
                    path_id,
                    rec.handle.id()
                ))?;
            }

            prev = Some(ix);
            count += 1;
            if count > path.len() {
                break;
            }
        }

        if prev != path.tail() || count != path.len() {
            fail(format!(
                "path {} has {} linked steps, expected {}",
                path_id,
                count,
                path.len()
            ))?;
        }

        total += count;
    }

    if graph.path_id.len() != graph.paths.len() {
        fail(format!(
            "{} path names registered for {} paths",
            graph.path_id.len(),
            graph.paths.len()
        ))?;
    }

    Ok(total)
}

fn validate_occurrences(graph: &HashGraph, steps: usize) -> Result<()> {
    let mut seen: FnvHashSet<StepHandle> = FnvHashSet::default();

    for (id, bucket) in graph.occurrences().iter() {
        for &step in bucket {
            let handle = graph
                .get_path(&step.path)
                .and_then(|p| p.get(step.step))
                .map(|rec| rec.handle);

            match handle {
                Some(h) if h.id() == id => {}
                Some(h) => fail(format!(
                    "step on node {} is in the occurrence bucket of node {}",
                    h.id(),
                    id
                ))?,
                None => fail(format!(
                    "occurrence bucket of node {} holds a removed step",
                    id
                ))?,
            }

            if !seen.insert(step) {
                fail(format!(
                    "step on node {} is in the occurrence index twice",
                    id
                ))?;
            }
        }
    }

    let indexed = graph.occurrences().total_len();
    if indexed != steps {
        fail(format!(
            "occurrence index holds {} steps, the paths hold {}",
            indexed, steps
        ))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use crate::handle::Edge;
    use crate::mutablehandlegraph::*;
    use crate::pathhandlegraph::*;

    fn example() -> HashGraph {
        let mut graph = HashGraph::new();
        let h1 = graph.append_handle(b"ACGT").unwrap();
        let h2 = graph.append_handle(b"TTT").unwrap();
        graph.create_edge(Edge(h1, h2)).unwrap();
        graph.create_edge(Edge(h2, h2.flip())).unwrap();
        let p = graph.create_path_handle(b"p").unwrap();
        graph.append_occurrence(p, h1).unwrap();
        graph.append_occurrence(p, h2).unwrap();
        graph
    }

    #[test]
    fn valid_graph_passes() {
        assert!(validate(&example()).is_ok());
        assert!(validate(&HashGraph::new()).is_ok());
    }

    #[test]
    fn missing_reciprocal_fails() {
        let mut graph = example();
        let node = graph.graph.get_mut(&NodeId::from(2u64)).unwrap();
        node.left_edges.clear();
        assert!(matches!(
            validate(&graph),
            Err(GraphError::CorruptData { .. })
        ));
    }

    #[test]
    fn stale_occurrences_fail() {
        let mut graph = example();
        let p = graph.get_path_handle(b"p").unwrap();
        let first = graph.get_first_occurrence(p).unwrap();
        graph.paths.get_mut(&p).unwrap().remove(first.step);
        assert!(matches!(
            validate(&graph),
            Err(GraphError::CorruptData { .. })
        ));
    }
}
