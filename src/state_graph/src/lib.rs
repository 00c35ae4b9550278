#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

//! The graph of every state a cuboid puzzle can reach from a starting state
//! under a restricted set of moves.

use cuboid::CubeError;
use thiserror::Error;

pub mod builder;
pub mod graph;

pub use builder::{StateGraphBuilder, make_graph};
pub use graph::{Bipartition, Edge, StateGraph, VertexId};

#[derive(Error, Debug)]
pub enum GraphError {
    #[error(transparent)]
    Cube(#[from] CubeError),
    #[error("Could not write the edge list: {0}")]
    Io(#[from] std::io::Error),
}
