use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    fs::File,
    io::{BufWriter, Write},
    ops::Range,
    path::Path,
};

use cuboid::{CubeState, NamedMove};
use fxhash::FxBuildHasher;
use indexmap::IndexSet;
use itertools::Itertools;
use log::info;

use crate::GraphError;

/// The index of a vertex, in the order the search discovered it. The root is
/// always vertex 0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VertexId(pub usize);

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Applying `label` to the state at `source` gives the state at `target`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Edge {
    pub source: VertexId,
    pub label: NamedMove,
    pub target: VertexId,
}

/// The two sides of a two-colouring of the graph. `even` holds the root.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bipartition {
    pub even: Vec<VertexId>,
    pub odd: Vec<VertexId>,
}

/// A finished state graph. Edges keep every move that was applied, so two
/// moves from the same state that land on the same target are two edges.
#[derive(Clone, Debug)]
pub struct StateGraph {
    states: IndexSet<CubeState, FxBuildHasher>,
    depths: Vec<usize>,
    edges: Vec<Edge>,
    // The edges leaving each vertex are contiguous since a vertex is expanded
    // exactly once
    out_ranges: Vec<Range<usize>>,
    permitted: Vec<NamedMove>,
}

impl StateGraph {
    pub(crate) fn rooted(root: CubeState, permitted: Vec<NamedMove>) -> StateGraph {
        let mut states = IndexSet::with_hasher(FxBuildHasher::default());
        states.insert(root);
        StateGraph {
            states,
            depths: vec![0],
            edges: vec![],
            out_ranges: vec![0..0],
            permitted,
        }
    }

    /// Insert `state` if it is new, returning its id and whether it was.
    pub(crate) fn discover(&mut self, state: CubeState, depth: usize) -> (VertexId, bool) {
        let (index, inserted) = self.states.insert_full(state);
        if inserted {
            self.depths.push(depth);
            self.out_ranges.push(0..0);
        }
        (VertexId(index), inserted)
    }

    /// Record the edges leaving `source`. Must be called once per expanded
    /// vertex, with its edges in order.
    pub(crate) fn expand(&mut self, source: VertexId, edges: impl IntoIterator<Item = Edge>) {
        let start = self.edges.len();
        self.edges.extend(edges);
        self.out_ranges[source.0] = start..self.edges.len();
    }

    pub(crate) fn state_at(&self, id: VertexId) -> &CubeState {
        &self.states[id.0]
    }

    pub fn root(&self) -> VertexId {
        VertexId(0)
    }

    pub fn vertex_count(&self) -> usize {
        self.states.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn vertex(&self, id: VertexId) -> Option<&CubeState> {
        self.states.get_index(id.0)
    }

    /// Every vertex in discovery order.
    pub fn vertices(&self) -> impl Iterator<Item = (VertexId, &CubeState)> {
        self.states
            .iter()
            .enumerate()
            .map(|(index, state)| (VertexId(index), state))
    }

    pub fn id_of(&self, state: &CubeState) -> Option<VertexId> {
        self.states.get_index_of(state).map(VertexId)
    }

    pub fn contains(&self, state: &CubeState) -> bool {
        self.states.contains(state)
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The edges leaving `id`, in the order the permitted moves were given.
    /// Empty for a vertex that was never expanded because of a depth bound.
    pub fn out_edges(&self, id: VertexId) -> &[Edge] {
        self.out_ranges
            .get(id.0)
            .and_then(|range| self.edges.get(range.clone()))
            .unwrap_or_default()
    }

    /// The distinct targets of the edges leaving `id`, in first-seen order.
    pub fn neighbors(&self, id: VertexId) -> Vec<VertexId> {
        self.out_edges(id)
            .iter()
            .map(|edge| edge.target)
            .unique()
            .collect()
    }

    /// The number of moves on a shortest path from the root.
    pub fn depth(&self, id: VertexId) -> Option<usize> {
        self.depths.get(id.0).copied()
    }

    /// The largest depth of any vertex.
    pub fn diameter_from_root(&self) -> usize {
        self.depths.iter().copied().max().unwrap_or(0)
    }

    pub fn permitted_moves(&self) -> &[NamedMove] {
        &self.permitted
    }

    /// Two-colour the graph with its edges taken as undirected, or `None` if
    /// it has an odd cycle.
    pub fn bipartition(&self) -> Option<Bipartition> {
        // Every vertex is reached from the root, so if a two-colouring exists
        // the parity of the search depth is one
        let is_odd = |id: VertexId| self.depths[id.0] % 2 == 1;
        if self
            .edges
            .iter()
            .any(|edge| is_odd(edge.source) == is_odd(edge.target))
        {
            return None;
        }

        let (odd, even): (Vec<_>, Vec<_>) = (0..self.vertex_count())
            .map(VertexId)
            .partition(|&id| is_odd(id));
        Some(Bipartition { even, odd })
    }

    /// The neighbour set of every vertex with edges taken as undirected.
    pub fn adjacency(&self) -> BTreeMap<usize, BTreeSet<usize>> {
        let mut adjacency = (0..self.vertex_count())
            .map(|index| (index, BTreeSet::new()))
            .collect::<BTreeMap<_, _>>();
        for edge in &self.edges {
            adjacency
                .entry(edge.source.0)
                .or_default()
                .insert(edge.target.0);
            adjacency
                .entry(edge.target.0)
                .or_default()
                .insert(edge.source.0);
        }
        adjacency
    }

    /// Every move labelling an edge between `u` and `v`, in either direction.
    pub fn moves_between(&self, u: VertexId, v: VertexId) -> BTreeSet<NamedMove> {
        self.out_edges(u)
            .iter()
            .filter(|edge| edge.target == v)
            .chain(self.out_edges(v).iter().filter(|edge| edge.target == u))
            .map(|edge| edge.label)
            .collect()
    }

    /// The simple undirected graph as `(u, v)` pairs with `u < v`, ascending.
    pub fn simple_edges(&self) -> Vec<(usize, usize)> {
        self.adjacency()
            .into_iter()
            .flat_map(|(u, neighbours)| {
                neighbours
                    .into_iter()
                    .filter(move |&v| u < v)
                    .map(move |v| (u, v))
            })
            .collect()
    }

    /// Write the simple undirected graph as an edge list: a first line with
    /// the vertex and edge counts, then one `u v` line per edge.
    ///
    /// # Errors
    ///
    /// If writing fails.
    pub fn write_edge_list(&self, mut writer: impl Write) -> Result<(), GraphError> {
        let edges = self.simple_edges();
        writeln!(writer, "{} {}", self.vertex_count(), edges.len())?;
        for (u, v) in edges {
            writeln!(writer, "{u} {v}")?;
        }
        writer.flush()?;
        Ok(())
    }

    /// # Errors
    ///
    /// If the file cannot be created or written.
    pub fn save_edge_list(&self, path: impl AsRef<Path>) -> Result<(), GraphError> {
        let path = path.as_ref();
        self.write_edge_list(BufWriter::new(File::create(path)?))?;
        info!("Wrote the edge list to {}", path.display());
        Ok(())
    }
}
