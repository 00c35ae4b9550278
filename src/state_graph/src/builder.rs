//! Breadth-first construction of the state graph.

use std::collections::VecDeque;

use cuboid::{
    CubeError, CubeState, Dimensions, MoveCatalog, NamedMove, RestrictedCube, Transformation,
};
use itertools::Itertools;
use log::{debug, info};
use rayon::prelude::*;

use crate::{
    GraphError,
    graph::{Edge, StateGraph},
};

/// Explores the states reachable from a starting state using only the
/// permitted moves. Every permitted move is resolved into a transformation up
/// front, so a bad move is reported before any search happens.
#[derive(Clone, Debug)]
pub struct StateGraphBuilder {
    dims: Dimensions,
    moves: Vec<(NamedMove, Transformation)>,
    max_depth: Option<usize>,
}

impl StateGraphBuilder {
    /// Repeated permitted moves are kept once, at their first position.
    ///
    /// # Errors
    ///
    /// If a permitted move does not exist on the catalog's dimensions.
    pub fn new(
        catalog: &MoveCatalog,
        permitted: impl IntoIterator<Item = NamedMove>,
    ) -> Result<StateGraphBuilder, CubeError> {
        let moves = permitted
            .into_iter()
            .unique()
            .map(|mv| Ok((mv, catalog.transformation(mv)?)))
            .collect::<Result<Vec<_>, CubeError>>()?;

        Ok(StateGraphBuilder {
            dims: catalog.dimensions(),
            moves,
            max_depth: None,
        })
    }

    /// A builder for the moves a restricted cube allows. Build it from
    /// `cube.state()` to explore from the cube's current state.
    ///
    /// # Errors
    ///
    /// See `StateGraphBuilder::new`.
    pub fn for_cube(cube: &RestrictedCube) -> Result<StateGraphBuilder, CubeError> {
        StateGraphBuilder::new(
            &MoveCatalog::new(cube.state().dimensions()),
            cube.permitted(),
        )
    }

    /// Stop expanding at `max_depth` moves from the root. States at that depth
    /// are still discovered and get incoming edges, but no outgoing ones.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> StateGraphBuilder {
        self.max_depth = Some(max_depth);
        self
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    pub fn permitted_moves(&self) -> impl Iterator<Item = NamedMove> + '_ {
        self.moves.iter().map(|(mv, _)| *mv)
    }

    fn expands_at(&self, depth: usize) -> bool {
        self.max_depth.is_none_or(|max_depth| depth < max_depth)
    }

    fn start(&self, initial: &CubeState) -> Result<StateGraph, CubeError> {
        if initial.dimensions() != self.dims {
            return Err(CubeError::InvalidDimensions(format!(
                "the moves are for a {} puzzle but the initial state is {}",
                self.dims,
                initial.dimensions()
            )));
        }

        info!(
            "Building state graph: dimensions={} permitted=[{}] max_depth={:?}",
            self.dims,
            self.permitted_moves().join(" "),
            self.max_depth
        );

        Ok(StateGraph::rooted(
            initial.clone(),
            self.permitted_moves().collect(),
        ))
    }

    fn finish(graph: &StateGraph) {
        info!(
            "Built state graph: vertices={} edges={} diameter_from_root={}",
            graph.vertex_count(),
            graph.edge_count(),
            graph.diameter_from_root()
        );
    }

    /// Explore every state reachable from `initial`, discovering states in
    /// first-in first-out order.
    ///
    /// # Errors
    ///
    /// `InvalidDimensions` if `initial` is not the size the moves were built
    /// for.
    pub fn build(&self, initial: &CubeState) -> Result<StateGraph, GraphError> {
        let mut graph = self.start(initial)?;
        let mut queue = VecDeque::from([graph.root()]);
        let mut level = 0;

        while let Some(source) = queue.pop_front() {
            let depth = graph.depth(source).unwrap_or_default();
            if depth > level {
                debug!("Finished level {level}: vertices={}", graph.vertex_count());
                level = depth;
            }
            if !self.expands_at(depth) {
                continue;
            }

            let state = graph.state_at(source).clone();
            let mut edges = Vec::with_capacity(self.moves.len());
            for (label, transformation) in &self.moves {
                let (target, discovered) = graph.discover(transformation.apply(&state)?, depth + 1);
                if discovered {
                    queue.push_back(target);
                }
                edges.push(Edge {
                    source,
                    label: *label,
                    target,
                });
            }
            graph.expand(source, edges);
        }

        Self::finish(&graph);
        Ok(graph)
    }

    /// The same search as `build`, one level at a time, with the moves of a
    /// level applied in parallel. New states are then merged in the order
    /// `build` would have found them, so both produce identical graphs.
    ///
    /// # Errors
    ///
    /// See `StateGraphBuilder::build`.
    pub fn build_parallel(&self, initial: &CubeState) -> Result<StateGraph, GraphError> {
        let mut graph = self.start(initial)?;
        let mut frontier = vec![graph.root()];
        let mut depth = 0;

        while !frontier.is_empty() && self.expands_at(depth) {
            let successors = frontier
                .par_iter()
                .map(|&source| {
                    let state = graph.state_at(source);
                    self.moves
                        .iter()
                        .map(|(label, transformation)| Ok((*label, transformation.apply(state)?)))
                        .collect::<Result<Vec<_>, CubeError>>()
                })
                .collect::<Result<Vec<_>, CubeError>>()?;

            let mut next = vec![];
            for (source, successors) in frontier.into_iter().zip(successors) {
                let edges = successors
                    .into_iter()
                    .map(|(label, state)| {
                        let (target, discovered) = graph.discover(state, depth + 1);
                        if discovered {
                            next.push(target);
                        }
                        Edge {
                            source,
                            label,
                            target,
                        }
                    })
                    .collect_vec();
                graph.expand(source, edges);
            }

            debug!(
                "Finished level {depth}: vertices={} frontier={}",
                graph.vertex_count(),
                next.len()
            );
            frontier = next;
            depth += 1;
        }

        Self::finish(&graph);
        Ok(graph)
    }
}

/// The state graph of the solved puzzle of size `dims` under `permitted`.
///
/// # Errors
///
/// If a permitted move does not exist on a puzzle of size `dims`.
pub fn make_graph(
    dims: Dimensions,
    permitted: impl IntoIterator<Item = NamedMove>,
) -> Result<StateGraph, GraphError> {
    StateGraphBuilder::new(&MoveCatalog::new(dims), permitted)?.build(&CubeState::solved(dims))
}
