//! Turning a single layer of the puzzle.

use std::{fmt, sync::Arc};

use crate::{
    CubeError,
    geometry::{Axis, Dimensions, Face},
    state::{CubeState, Facelet},
};

/// How far a layer turns, as seen looking at it from the positive end of its
/// axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rotation {
    Clockwise,
    Half,
    CounterClockwise,
}

impl Rotation {
    /// The number of counter-clockwise quarter turns this rotation amounts to.
    pub fn quarter_turns(self) -> usize {
        match self {
            Rotation::Clockwise => 3,
            Rotation::Half => 2,
            Rotation::CounterClockwise => 1,
        }
    }

    #[must_use]
    pub fn inverse(self) -> Rotation {
        match self {
            Rotation::Clockwise => Rotation::CounterClockwise,
            Rotation::Half => Rotation::Half,
            Rotation::CounterClockwise => Rotation::Clockwise,
        }
    }

    pub fn is_quarter(self) -> bool {
        self != Rotation::Half
    }
}

/// A geometric layer move: the layer at index `layer` along `axis`, counted
/// from the negative end, turned by `rotation`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MoveDescriptor {
    pub axis: Axis,
    pub layer: usize,
    pub rotation: Rotation,
}

impl MoveDescriptor {
    pub fn new(axis: Axis, layer: usize, rotation: Rotation) -> MoveDescriptor {
        MoveDescriptor {
            axis,
            layer,
            rotation,
        }
    }

    #[must_use]
    pub fn inverse(self) -> MoveDescriptor {
        MoveDescriptor {
            rotation: self.rotation.inverse(),
            ..self
        }
    }
}

impl fmt::Display for MoveDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rotation = match self.rotation {
            Rotation::Clockwise => "cw",
            Rotation::Half => "180",
            Rotation::CounterClockwise => "ccw",
        };
        write!(f, "{}[{}]{rotation}", self.axis, self.layer)
    }
}

/// The slots of one face that a move writes to.
#[derive(Clone, Debug, PartialEq, Eq)]
struct Relocation {
    face: Face,
    // (destination index, source face, source index)
    writes: Vec<(usize, Face, usize)>,
}

/// A move resolved against a set of dimensions into the permutation of slots it
/// induces. Building one does the geometry once, so that it can be applied to
/// any number of states.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transformation {
    dims: Dimensions,
    descriptor: MoveDescriptor,
    relocations: Arc<[Relocation]>,
}

impl Transformation {
    /// Select the facelets of the turned layer (the layer itself plus the
    /// border rows and columns of the four faces around it), rotate each of
    /// them about the layer's axis, and record where it lands.
    ///
    /// # Errors
    ///
    /// `InvalidLayerIndex` if the layer does not exist on these dimensions, and
    /// `UnsupportedMoveForDimensions` for a quarter turn of a layer that is not
    /// square, which would not carry the puzzle onto itself.
    pub fn new(dims: Dimensions, descriptor: MoveDescriptor) -> Result<Self, CubeError> {
        let MoveDescriptor {
            axis,
            layer,
            rotation,
        } = descriptor;

        let extent = dims.extent(axis);
        if layer >= extent {
            return Err(CubeError::InvalidLayerIndex {
                axis,
                layer,
                extent,
            });
        }

        let unsupported = || CubeError::UnsupportedMoveForDimensions {
            mv: descriptor.to_string(),
            dimensions: dims,
            position: 0,
        };

        if rotation.is_quarter() && !dims.is_square_section(axis) {
            return Err(unsupported());
        }

        let mut relocations = Face::ALL.map(|face| Relocation {
            face,
            writes: vec![],
        });

        for source_face in Face::ALL {
            let (rows, cols) = source_face.grid_shape(dims);
            for row in 0..rows {
                for col in 0..cols {
                    let point = dims.slot_to_point(source_face, row, col);
                    if dims.layer_of(point, axis) != layer {
                        continue;
                    }

                    let rotated = (0..rotation.quarter_turns())
                        .fold(point, |point, _| axis.rotate_quarter(point));
                    let (face, dest_row, dest_col) =
                        dims.point_to_slot(rotated).ok_or_else(unsupported)?;

                    let source_index = row * cols + col;
                    let dest_index = dest_row * face.grid_shape(dims).1 + dest_col;
                    // The centre of an odd layer's face turns in place
                    if (face, dest_index) != (source_face, source_index) {
                        relocations[face as usize].writes.push((
                            dest_index,
                            source_face,
                            source_index,
                        ));
                    }
                }
            }
        }

        Ok(Transformation {
            dims,
            descriptor,
            relocations: relocations
                .into_iter()
                .filter(|relocation| !relocation.writes.is_empty())
                .collect(),
        })
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    pub fn descriptor(&self) -> MoveDescriptor {
        self.descriptor
    }

    /// The number of facelets this move relocates.
    pub fn moved_facelet_count(&self) -> usize {
        self.relocations
            .iter()
            .map(|relocation| relocation.writes.len())
            .sum()
    }

    /// Apply the move to `state`, producing a new state. Faces the move does
    /// not touch are shared with `state`.
    ///
    /// # Errors
    ///
    /// `InvalidDimensions` if `state` has different dimensions from the ones
    /// this transformation was built for.
    pub fn apply(&self, state: &CubeState) -> Result<CubeState, CubeError> {
        if state.dimensions() != self.dims {
            return Err(CubeError::InvalidDimensions(format!(
                "the move {} was built for a {} puzzle but the state is {}",
                self.descriptor,
                self.dims,
                state.dimensions()
            )));
        }

        let mut faces = state.faces().clone();
        for relocation in self.relocations.iter() {
            let mut target = state.facelets(relocation.face).to_vec();
            for &(dest, source_face, source) in &relocation.writes {
                target[dest] = state.facelets(source_face)[source];
            }
            faces[relocation.face as usize] = Arc::<[Facelet]>::from(target);
        }

        Ok(CubeState::from_faces(self.dims, faces))
    }
}

/// Apply one layer move to `state`. The input is never modified.
///
/// # Errors
///
/// See `Transformation::new`.
pub fn apply(state: &CubeState, descriptor: MoveDescriptor) -> Result<CubeState, CubeError> {
    Transformation::new(state.dimensions(), descriptor)?.apply(state)
}

impl CubeState {
    /// Shorthand for `moves::apply`.
    ///
    /// # Errors
    ///
    /// See `Transformation::new`.
    pub fn apply(&self, descriptor: MoveDescriptor) -> Result<CubeState, CubeError> {
        apply(self, descriptor)
    }
}
