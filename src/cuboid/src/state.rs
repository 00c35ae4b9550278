use std::{fmt, sync::Arc};

use itertools::Itertools;

use crate::geometry::{Dimensions, Face};

/// The identity of a single sticker, assigned when the solved state is built
/// and carried unchanged as moves relocate it. The high bits hold the face the
/// sticker started on and the low bits its row-major slot index on that face.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Facelet(u32);

impl Facelet {
    const INDEX_BITS: u32 = 29;
    pub const MAX_SLOTS_PER_FACE: usize = 1 << Self::INDEX_BITS;

    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn new(face: Face, index: usize) -> Facelet {
        debug_assert!(index < Self::MAX_SLOTS_PER_FACE);
        Facelet(((face as u32) << Self::INDEX_BITS) | index as u32)
    }

    /// The face this facelet belongs to in the solved state.
    pub fn home_face(self) -> Face {
        Face::ALL[(self.0 >> Self::INDEX_BITS) as usize]
    }

    /// The row-major slot index this facelet occupies in the solved state.
    pub fn home_index(self) -> usize {
        (self.0 & ((1 << Self::INDEX_BITS) - 1)) as usize
    }

    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for Facelet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.home_face(), self.home_index())
    }
}

/// An immutable configuration of a cuboid puzzle: for every face, the grid of
/// facelets currently occupying its slots.
///
/// States compare and hash structurally, so two states reached by different
/// move sequences are indistinguishable when every slot holds the same
/// facelet. Moves produce new states and share every face they leave alone.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CubeState {
    dims: Dimensions,
    faces: [Arc<[Facelet]>; 6],
}

impl CubeState {
    /// The solved state, in which every slot holds the facelet that was
    /// numbered for it.
    pub fn solved(dims: Dimensions) -> CubeState {
        CubeState {
            dims,
            faces: Face::ALL.map(|face| {
                (0..face.slot_count(dims))
                    .map(|index| Facelet::new(face, index))
                    .collect()
            }),
        }
    }

    pub fn from_dimensions(dims: Dimensions) -> CubeState {
        CubeState::solved(dims)
    }

    pub(crate) fn from_faces(dims: Dimensions, faces: [Arc<[Facelet]>; 6]) -> CubeState {
        debug_assert!(
            Face::ALL
                .into_iter()
                .all(|face| faces[face as usize].len() == face.slot_count(dims))
        );
        CubeState { dims, faces }
    }

    pub(crate) fn faces(&self) -> &[Arc<[Facelet]>; 6] {
        &self.faces
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    /// The facelets of `face` in row-major order.
    pub fn facelets(&self, face: Face) -> &[Facelet] {
        &self.faces[face as usize]
    }

    pub fn face(&self, face: Face) -> FaceGrid<'_> {
        let (rows, cols) = face.grid_shape(self.dims);
        FaceGrid {
            face,
            rows,
            cols,
            facelets: self.facelets(face),
        }
    }

    /// A read-only view of every face, in `Face::ALL` order.
    pub fn decode(&self) -> [FaceGrid<'_>; 6] {
        Face::ALL.map(|face| self.face(face))
    }

    pub fn is_solved(&self) -> bool {
        *self == CubeState::solved(self.dims)
    }

    /// Every facelet of the state, sorted.
    pub fn facelet_multiset(&self) -> Vec<Facelet> {
        self.faces.iter().flat_map(|face| face.iter().copied()).sorted().collect()
    }
}

impl fmt::Display for CubeState {
    /// Prints the net of the puzzle with U above, L F R B in a band, and D
    /// below; every facelet is written as the letter of its home face.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn row_string(row: &[Facelet]) -> String {
            row.iter().map(|facelet| facelet.home_face().letter()).join(" ")
        }

        let indent = " ".repeat(2 * self.face(Face::L).cols + 1);
        let band = [Face::L, Face::F, Face::R, Face::B].map(|face| self.face(face));

        let mut lines = vec![];
        for row in self.face(Face::U).iter_rows() {
            lines.push(format!("{indent}{}", row_string(row)));
        }
        lines.push(String::new());
        for r in 0..self.dims.length() {
            lines.push(band.iter().map(|grid| row_string(grid.row(r))).join("  "));
        }
        lines.push(String::new());
        for row in self.face(Face::D).iter_rows() {
            lines.push(format!("{indent}{}", row_string(row)));
        }

        f.write_str(&lines.join("\n"))
    }
}

/// The grid of facelets on one face of a `CubeState`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceGrid<'a> {
    pub face: Face,
    pub rows: usize,
    pub cols: usize,
    facelets: &'a [Facelet],
}

impl<'a> FaceGrid<'a> {
    pub fn get(&self, row: usize, col: usize) -> Option<Facelet> {
        if row < self.rows && col < self.cols {
            Some(self.facelets[row * self.cols + col])
        } else {
            None
        }
    }

    /// # Panics
    ///
    /// If `row` is out of range.
    pub fn row(&self, row: usize) -> &'a [Facelet] {
        &self.facelets[row * self.cols..(row + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &'a [Facelet]> {
        self.facelets.chunks(self.cols)
    }

    pub fn as_slice(&self) -> &'a [Facelet] {
        self.facelets
    }
}
