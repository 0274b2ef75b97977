/*!
A mutable, in-memory bidirected sequence graph, with named paths
embedded in it.

# Overview

Every node holds a DNA sequence, and can be visited in either
orientation; visiting a node in reverse reads the reverse complement
of its sequence. Edges connect oriented nodes, and paths are ordered
walks of oriented nodes through the graph. Structural edits to the
graph, like splitting a node or flipping its stored orientation, keep
the paths that visit it consistent.

The graph interface is split into a number of traits, grouped in three
categories:

* [`handlegraph`] is for immutable access to the nodes and edges of a graph
* [`mutablehandlegraph`] is for mutable access to nodes and edges
* [`pathhandlegraph`] is for both immutable and mutable access to the paths embedded in a graph

[`HashGraph`](hashgraph::HashGraph) implements all of them, and can be
written to and read from a compact binary format.


# `Handle`s and `NodeId`s

The core types, used all over the various traits, are defined in [`handle`]:

* [`NodeId`](handle::NodeId) is a newtype used as a node identifier
* [`Handle`](handle::Handle) represents a specific orientation of a node
* [`Edge`](handle::Edge) is a newtype for edges in a specific order

# Errors

Fallible operations return [`error::Result`]. Mutations check their
inputs before changing anything, so a failed mutation leaves the graph
as it was.

# Misc.

* [`util::dna`] has reverse complement functions for sequences
* [`util::validate`] checks the internal consistency of a graph

*/

pub mod error;
pub mod handle;

pub mod handlegraph;
pub mod mutablehandlegraph;
pub mod pathhandlegraph;

pub mod hashgraph;
pub mod util;
