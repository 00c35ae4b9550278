#![warn(clippy::pedantic)]
#![allow(clippy::must_use_candidate)]

//! Cuboid twisty puzzles of arbitrary `LxWxH` dimensions: the facelet model,
//! immutable puzzle states, and the layer moves that act on them.

use thiserror::Error;

pub mod catalog;
pub mod geometry;
pub mod moves;
pub mod state;

pub use catalog::{MoveCatalog, MoveSequence, NamedMove, RestrictedCube, Turn, parse_moves};
pub use geometry::{Axis, Dimensions, Face, Sign};
pub use moves::{MoveDescriptor, Rotation, Transformation, apply};
pub use state::{CubeState, FaceGrid, Facelet};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CubeError {
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),
    #[error("Invalid move token `{token}` at position {position}")]
    InvalidMoveToken { token: String, position: usize },
    #[error("Layer {layer} is out of range for the {axis} axis, which has {extent} layers")]
    InvalidLayerIndex {
        axis: Axis,
        layer: usize,
        extent: usize,
    },
    #[error("The move {mv} at position {position} has no valid resolution on a {dimensions} puzzle")]
    UnsupportedMoveForDimensions {
        mv: String,
        dimensions: Dimensions,
        position: usize,
    },
    #[error("The move {token} is not one of the permitted moves")]
    MoveNotPermitted { token: String },
}

impl CubeError {
    /// Point a move error at the token at `position` of a move sequence.
    #[must_use]
    pub(crate) fn at(self, position: usize) -> CubeError {
        match self {
            CubeError::InvalidMoveToken { token, .. } => {
                CubeError::InvalidMoveToken { token, position }
            }
            CubeError::UnsupportedMoveForDimensions { mv, dimensions, .. } => {
                CubeError::UnsupportedMoveForDimensions {
                    mv,
                    dimensions,
                    position,
                }
            }
            other => other,
        }
    }
}
