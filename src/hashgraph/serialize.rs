/*!

Binary encoding of a `HashGraph`.

All integers are fixed width and big-endian. The stream consists of
a header with the max node ID, min node ID, and the next path ID
(signed 64-bit each), followed by the nodes, then the paths:

* node count (u64), then for each node, in ascending ID order: the
  node ID (i64), the sequence length (u64) and bytes, then the left
  and right edge lists, each as a count (u64) followed by the encoded
  handles (i64).
* path count (u64), then for each path, in ascending ID order: the
  path ID (i64), the name length (u64) and bytes, the step count
  (u64), and the encoded handles of the steps in path order (i64).

An empty graph has a max ID of 0 and a min ID of `i64::MAX`. Negative
IDs anywhere in the stream are rejected when loading.

The occurrence index is not stored; it's rebuilt from the paths when
the graph is loaded.

*/

use std::io::{self, BufReader, BufWriter, Read, Write};

use log::debug;

use crate::{
    error::{GraphError, Result},
    handle::{Handle, NodeId},
    pathhandlegraph::{PathId, StepHandle},
};

use super::{HashGraph, Node, Occurrences, Path};

fn write_u64<W: Write>(out: &mut W, value: u64) -> Result<()> {
    out.write_all(&value.to_be_bytes())?;
    Ok(())
}

fn write_i64<W: Write>(out: &mut W, value: i64) -> Result<()> {
    out.write_all(&value.to_be_bytes())?;
    Ok(())
}

fn write_bytes<W: Write>(out: &mut W, bytes: &[u8]) -> Result<()> {
    write_u64(out, bytes.len() as u64)?;
    out.write_all(bytes)?;
    Ok(())
}

fn write_handles<W: Write>(out: &mut W, handles: &[Handle]) -> Result<()> {
    write_u64(out, handles.len() as u64)?;
    for h in handles {
        write_i64(out, h.as_integer() as i64)?;
    }
    Ok(())
}

/// A stream that ends early is corrupt; other I/O errors are passed
/// on as they are.
fn read_error(err: io::Error) -> GraphError {
    if err.kind() == io::ErrorKind::UnexpectedEof {
        GraphError::corrupt("unexpected end of stream")
    } else {
        GraphError::Io(err)
    }
}

fn read_u64<R: Read>(input: &mut R) -> Result<u64> {
    let mut buf = [0u8; 8];
    input.read_exact(&mut buf).map_err(read_error)?;
    Ok(u64::from_be_bytes(buf))
}

fn read_i64<R: Read>(input: &mut R) -> Result<i64> {
    let mut buf = [0u8; 8];
    input.read_exact(&mut buf).map_err(read_error)?;
    Ok(i64::from_be_bytes(buf))
}

/// Read a length-prefixed byte string. The length is not trusted for
/// allocation; a length past the end of the stream is an error.
fn read_bytes<R: Read>(input: &mut R) -> Result<Vec<u8>> {
    let len = read_u64(input)?;
    let mut bytes = Vec::new();
    Read::take(&mut *input, len)
        .read_to_end(&mut bytes)
        .map_err(read_error)?;
    if bytes.len() as u64 != len {
        return Err(GraphError::corrupt(format!(
            "expected {} bytes, stream ended after {}",
            len,
            bytes.len()
        )));
    }
    Ok(bytes)
}

fn read_handles<R: Read>(input: &mut R) -> Result<Vec<Handle>> {
    let count = read_u64(input)?;
    let mut handles = Vec::new();
    for _ in 0..count {
        handles.push(Handle::from_integer(read_i64(input)? as u64));
    }
    Ok(handles)
}

fn read_node_id<R: Read>(input: &mut R) -> Result<NodeId> {
    let id = NodeId(read_i64(input)? as u64);
    if id.is_packable() {
        Ok(id)
    } else {
        Err(GraphError::corrupt(format!("invalid node ID {}", id)))
    }
}

impl HashGraph {
    /// Write the graph to `out` in the binary format.
    pub fn serialize<W: Write>(&self, out: &mut W) -> Result<()> {
        write_i64(out, self.max_id.0 as i64)?;
        write_i64(out, self.min_id.0 as i64)?;
        write_i64(out, self.next_path_id as i64)?;

        write_u64(out, self.graph.len() as u64)?;
        for (id, node) in self.graph.iter() {
            write_i64(out, id.0 as i64)?;
            write_bytes(out, &node.sequence)?;
            write_handles(out, &node.left_edges)?;
            write_handles(out, &node.right_edges)?;
        }

        write_u64(out, self.paths.len() as u64)?;
        for (path_id, path) in self.paths.iter() {
            write_i64(out, path_id.0 as i64)?;
            write_bytes(out, &path.name)?;
            write_u64(out, path.len() as u64)?;
            for handle in path.handles() {
                write_i64(out, handle.as_integer() as i64)?;
            }
        }

        Ok(())
    }

    /// Read a graph in the binary format from `input`. Fails with
    /// `CorruptData` if the stream is truncated or describes an
    /// inconsistent graph.
    pub fn deserialize<R: Read>(input: &mut R) -> Result<HashGraph> {
        let mut graph = HashGraph::new();

        // an empty graph stores the min ID as `NodeId::MAX_PACKABLE`,
        // which still reads as a valid ID
        let max_id = read_node_id(input)?;
        let min_id = read_node_id(input)?;
        let next_path_id = read_i64(input)?;
        if next_path_id < 1 {
            return Err(GraphError::corrupt(format!(
                "invalid next path ID {}",
                next_path_id
            )));
        }

        let node_count = read_u64(input)?;
        for _ in 0..node_count {
            let id = read_node_id(input)?;
            let node = Node {
                sequence: read_bytes(input)?,
                left_edges: read_handles(input)?,
                right_edges: read_handles(input)?,
            };
            if graph.graph.contains_key(&id) {
                return Err(GraphError::corrupt(format!(
                    "node {} occurs more than once",
                    id
                )));
            }
            graph.insert_node(id, node);
        }

        if !graph.graph.is_empty()
            && (graph.max_id > max_id || graph.min_id < min_id)
        {
            return Err(GraphError::corrupt(format!(
                "node IDs outside the stored bounds {}..={}",
                min_id, max_id
            )));
        }
        graph.max_id = max_id;
        graph.min_id = min_id;

        for (id, node) in graph.graph.iter() {
            let dangling = node
                .left_edges
                .iter()
                .chain(node.right_edges.iter())
                .find(|h| !graph.graph.contains_key(&h.id()));
            if let Some(h) = dangling {
                return Err(GraphError::corrupt(format!(
                    "node {} has an edge to missing node {}",
                    id,
                    h.id()
                )));
            }
        }

        let path_count = read_u64(input)?;
        for _ in 0..path_count {
            let raw_id = read_i64(input)?;
            if raw_id < 1 || raw_id >= next_path_id {
                return Err(GraphError::corrupt(format!(
                    "invalid path ID {}",
                    raw_id
                )));
            }
            let path_id = PathId(raw_id as u64);
            let name = read_bytes(input)?;

            if graph.paths.contains_key(&path_id) {
                return Err(GraphError::corrupt(format!(
                    "path {} occurs more than once",
                    path_id
                )));
            }

            let mut path = Path::new(name, path_id);
            if graph.path_id.contains_key(&path.name) {
                return Err(GraphError::corrupt(format!(
                    "path name {} occurs more than once",
                    path.name
                )));
            }

            let step_count = read_u64(input)?;
            for _ in 0..step_count {
                let handle = Handle::from_integer(read_i64(input)? as u64);
                if !graph.graph.contains_key(&handle.id()) {
                    return Err(GraphError::corrupt(format!(
                        "path {} has a step on missing node {}",
                        path_id,
                        handle.id()
                    )));
                }
                path.push_back(handle);
            }

            graph.path_id.insert(path.name.clone(), path_id);
            graph.paths.insert(path_id, path);
        }

        graph.next_path_id = next_path_id as u64;
        graph.occurrences = rebuild_occurrences(&graph);

        debug!(
            "loaded graph with {} nodes and {} paths",
            graph.graph.len(),
            graph.paths.len()
        );

        Ok(graph)
    }

    /// Write the graph to a file.
    pub fn save<P: AsRef<std::path::Path>>(&self, path: P) -> Result<()> {
        let file = std::fs::File::create(path.as_ref())?;
        let mut out = BufWriter::new(file);
        self.serialize(&mut out)?;
        out.flush()?;
        debug!(
            "saved graph with {} nodes and {} paths to {}",
            self.graph.len(),
            self.paths.len(),
            path.as_ref().display()
        );
        Ok(())
    }

    /// Read a graph from a file written by [`HashGraph::save`].
    pub fn load<P: AsRef<std::path::Path>>(path: P) -> Result<HashGraph> {
        let file = std::fs::File::open(path.as_ref())?;
        let mut input = BufReader::new(file);
        HashGraph::deserialize(&mut input)
    }
}

fn rebuild_occurrences(graph: &HashGraph) -> Occurrences {
    let mut occurrences = Occurrences::default();
    for (&path_id, path) in graph.paths.iter() {
        for (ix, rec) in path.steps() {
            occurrences.insert(rec.handle.id(), StepHandle::new(path_id, ix));
        }
    }
    occurrences
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::io::Cursor;

    use crate::handle::Edge;
    use crate::handlegraph::*;
    use crate::mutablehandlegraph::*;
    use crate::pathhandlegraph::*;

    fn example_graph() -> HashGraph {
        let mut graph = HashGraph::new();
        let h1 = graph.create_handle(b"ACGT", 3u64).unwrap();
        let h2 = graph.create_handle(b"TTT", 5u64).unwrap();
        let h3 = graph.create_handle(b"G", 8u64).unwrap();

        graph.create_edge(Edge(h1, h2)).unwrap();
        graph.create_edge(Edge(h2, h3.flip())).unwrap();
        graph.create_edge(Edge(h3, h3.flip())).unwrap();

        let p1 = graph.create_path_handle(b"first").unwrap();
        let p2 = graph.create_path_handle(b"second").unwrap();
        let p3 = graph.create_path_handle(b"gone").unwrap();
        for &h in &[h1, h2, h3.flip()] {
            graph.append_occurrence(p1, h).unwrap();
        }
        graph.append_occurrence(p2, h2.flip()).unwrap();
        graph.destroy_path(p3).unwrap();

        graph
    }

    fn to_bytes(graph: &HashGraph) -> Vec<u8> {
        let mut bytes = Vec::new();
        graph.serialize(&mut bytes).unwrap();
        bytes
    }

    fn path_handles(graph: &HashGraph, name: &[u8]) -> Vec<Handle> {
        let path = graph.get_path_handle(name).unwrap();
        graph.get_path(&path).unwrap().handles().collect()
    }

    #[test]
    fn header_layout() {
        let mut graph = HashGraph::new();
        graph.create_handle(b"AC", 2u64).unwrap();

        let bytes = to_bytes(&graph);

        assert_eq!(&bytes[0..8], &2i64.to_be_bytes());
        assert_eq!(&bytes[8..16], &2i64.to_be_bytes());
        assert_eq!(&bytes[16..24], &1i64.to_be_bytes());
        // node count, node ID, sequence
        assert_eq!(&bytes[24..32], &1u64.to_be_bytes());
        assert_eq!(&bytes[32..40], &2i64.to_be_bytes());
        assert_eq!(&bytes[40..48], &2u64.to_be_bytes());
        assert_eq!(&bytes[48..50], b"AC");
        // empty edge lists, then zero paths
        assert_eq!(bytes.len(), 50 + 8 * 3);
    }

    #[test]
    fn empty_header_layout() {
        let bytes = to_bytes(&HashGraph::new());

        assert_eq!(&bytes[0..8], &0i64.to_be_bytes());
        assert_eq!(&bytes[8..16], &std::i64::MAX.to_be_bytes());
        assert_eq!(&bytes[16..24], &1i64.to_be_bytes());
        assert_eq!(&bytes[24..32], &0u64.to_be_bytes());
        assert_eq!(&bytes[32..40], &0u64.to_be_bytes());
        assert_eq!(bytes.len(), 40);

        // the min ID is reset by clear as well
        let mut graph = example_graph();
        graph.clear();
        assert_eq!(to_bytes(&graph), bytes);
    }

    #[test]
    fn negative_header_ids_are_corrupt() {
        let bytes = to_bytes(&HashGraph::new());

        for &field in &[0, 8] {
            let mut broken = bytes.clone();
            broken[field..field + 8].copy_from_slice(&(-1i64).to_be_bytes());
            assert!(
                matches!(
                    HashGraph::deserialize(&mut Cursor::new(&broken)),
                    Err(GraphError::CorruptData { .. })
                ),
                "negative ID at byte {}",
                field
            );
        }
    }

    #[test]
    fn roundtrip_preserves_graph() {
        let graph = example_graph();
        let bytes = to_bytes(&graph);

        let loaded = HashGraph::deserialize(&mut Cursor::new(&bytes)).unwrap();

        assert_eq!(graph.graph, loaded.graph);
        assert_eq!(graph.min_node_id(), loaded.min_node_id());
        assert_eq!(graph.max_node_id(), loaded.max_node_id());
        assert_eq!(loaded.path_count(), 2);
        assert_eq!(
            path_handles(&graph, b"first"),
            path_handles(&loaded, b"first")
        );
        assert_eq!(
            path_handles(&graph, b"second"),
            path_handles(&loaded, b"second")
        );
        assert_eq!(to_bytes(&loaded), bytes);

        // occurrences are rebuilt from the paths
        let h2 = Handle::pack(5u64, false);
        assert_eq!(loaded.occurrences_of_handle(h2, false).len(), 2);
        assert_eq!(loaded.occurrences_of_handle(h2.flip(), true).len(), 1);
        crate::util::validate::validate(&loaded).unwrap();

        // path IDs of destroyed paths aren't reused after loading
        let mut loaded = loaded;
        let p4 = loaded.create_path_handle(b"new").unwrap();
        assert_eq!(p4, PathId(4));
    }

    #[test]
    fn loaded_graph_is_editable() {
        let graph = example_graph();
        let bytes = to_bytes(&graph);
        let mut loaded =
            HashGraph::deserialize(&mut Cursor::new(&bytes)).unwrap();

        let h1 = Handle::pack(3u64, false);
        let parts = loaded.divide_handle(h1, &[2]).unwrap();
        assert_eq!(parts[1].id(), NodeId::from(9u64));

        let first = path_handles(&loaded, b"first");
        assert_eq!(first.len(), 4);
        assert_eq!(&first[0..2], parts.as_slice());
        crate::util::validate::validate(&loaded).unwrap();
    }

    #[test]
    fn save_and_load_file() {
        let graph = example_graph();
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("graph.bin");

        graph.save(&file).unwrap();
        let loaded = HashGraph::load(&file).unwrap();

        assert_eq!(graph.graph, loaded.graph);
        assert_eq!(to_bytes(&graph), to_bytes(&loaded));

        assert!(matches!(
            HashGraph::load(dir.path().join("missing.bin")),
            Err(GraphError::Io(_))
        ));
    }

    #[test]
    fn empty_graph_roundtrip() {
        let graph = HashGraph::new();
        let bytes = to_bytes(&graph);
        let loaded = HashGraph::deserialize(&mut Cursor::new(&bytes)).unwrap();
        assert_eq!(loaded.node_count(), 0);
        assert_eq!(loaded.min_node_id(), NodeId::MAX_PACKABLE);
        assert_eq!(loaded.min_node_id(), graph.min_node_id());
        assert_eq!(loaded.max_node_id(), graph.max_node_id());

        // the first node added after loading sets both bounds
        let mut loaded = loaded;
        let h = loaded.append_handle(b"A").unwrap();
        assert_eq!(h.id(), NodeId::from(1u64));
        assert_eq!(loaded.min_node_id(), h.id());
    }

    #[test]
    fn truncated_stream_is_corrupt() {
        let bytes = to_bytes(&example_graph());

        for &len in &[0, 7, 24, 40, bytes.len() - 1] {
            let res = HashGraph::deserialize(&mut Cursor::new(&bytes[..len]));
            assert!(
                matches!(res, Err(GraphError::CorruptData { .. })),
                "truncated to {} bytes",
                len
            );
        }
    }

    #[test]
    fn inconsistent_data_is_corrupt() {
        let mut graph = HashGraph::new();
        let h1 = graph.append_handle(b"A").unwrap();
        let h2 = graph.append_handle(b"C").unwrap();
        graph.create_edge(Edge(h1, h2)).unwrap();

        // edge to a node that's not in the stream
        let mut broken = graph.clone();
        broken.graph.remove(&h2.id());
        let bytes = to_bytes(&broken);
        assert!(matches!(
            HashGraph::deserialize(&mut Cursor::new(&bytes)),
            Err(GraphError::CorruptData { .. })
        ));

        // step on a node that's not in the stream
        let mut broken = HashGraph::new();
        broken.append_handle(b"A").unwrap();
        let p = broken.create_path_handle(b"p").unwrap();
        broken.paths.get_mut(&p).unwrap().push_back(Handle::pack(7u64, false));
        let bytes = to_bytes(&broken);
        assert!(matches!(
            HashGraph::deserialize(&mut Cursor::new(&bytes)),
            Err(GraphError::CorruptData { .. })
        ));

        // the same node twice
        let mut bytes = to_bytes(&HashGraph::new());
        bytes.truncate(24);
        bytes.extend_from_slice(&2u64.to_be_bytes());
        for _ in 0..2 {
            bytes.extend_from_slice(&1i64.to_be_bytes());
            bytes.extend_from_slice(&0u64.to_be_bytes());
            bytes.extend_from_slice(&0u64.to_be_bytes());
            bytes.extend_from_slice(&0u64.to_be_bytes());
        }
        bytes.extend_from_slice(&0u64.to_be_bytes());
        assert!(matches!(
            HashGraph::deserialize(&mut Cursor::new(&bytes)),
            Err(GraphError::CorruptData { .. })
        ));

        // a sequence length far past the end of the stream
        let mut bytes = to_bytes(&HashGraph::new());
        bytes.truncate(24);
        bytes.extend_from_slice(&1u64.to_be_bytes());
        bytes.extend_from_slice(&1i64.to_be_bytes());
        bytes.extend_from_slice(&std::u64::MAX.to_be_bytes());
        assert!(matches!(
            HashGraph::deserialize(&mut Cursor::new(&bytes)),
            Err(GraphError::CorruptData { .. })
        ));
    }
}
