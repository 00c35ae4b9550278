//! Face layout of a cuboid puzzle and the surface coordinates used to turn
//! its layers.

#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    clippy::cast_sign_loss
)]

use std::{fmt, str::FromStr};

use crate::{CubeError, state::Facelet};

// X runs from left to right, Y from down to up, and Z from back to front, so
// the coordinate system is right-handed.

/// A point on the puzzle surface in doubled, origin-centred coordinates. Layer
/// `i` of an axis with `n` layers sits at `2i - (n - 1)` and the two faces
/// normal to that axis sit at `-n` and `n`.
pub(crate) type Point = [i32; 3];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub const ALL: [Self; 3] = [Axis::X, Axis::Y, Axis::Z];

    /// Rotate `point` a quarter turn counter-clockwise, as seen looking down
    /// from the positive end of this axis.
    pub(crate) fn rotate_quarter(self, [x, y, z]: Point) -> Point {
        match self {
            Axis::X => [x, -z, y],
            Axis::Y => [z, y, -x],
            Axis::Z => [-y, x, z],
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Axis::X => "x",
            Axis::Y => "y",
            Axis::Z => "z",
        })
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Sign {
    Negative,
    Positive,
}

/// One of the six faces of the puzzle. The declaration order is the order in
/// which faces are stored, compared and printed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Face {
    U,
    L,
    F,
    R,
    B,
    D,
}

impl Face {
    pub const ALL: [Self; 6] = {
        use Face::*;
        let v = [U, L, F, R, B, D];

        let mut i = 0;
        while i < v.len() {
            assert!(i == v[i] as usize);
            i += 1;
        }

        v
    };

    /// The axis this face is normal to, and which end of it the face sits on.
    pub fn normal(self) -> (Axis, Sign) {
        match self {
            Face::R => (Axis::X, Sign::Positive),
            Face::L => (Axis::X, Sign::Negative),
            Face::U => (Axis::Y, Sign::Positive),
            Face::D => (Axis::Y, Sign::Negative),
            Face::F => (Axis::Z, Sign::Positive),
            Face::B => (Axis::Z, Sign::Negative),
        }
    }

    pub fn opposite(self) -> Face {
        match self {
            Face::U => Face::D,
            Face::D => Face::U,
            Face::L => Face::R,
            Face::R => Face::L,
            Face::F => Face::B,
            Face::B => Face::F,
        }
    }

    pub fn letter(self) -> char {
        match self {
            Face::U => 'U',
            Face::L => 'L',
            Face::F => 'F',
            Face::R => 'R',
            Face::B => 'B',
            Face::D => 'D',
        }
    }

    pub fn from_letter(letter: char) -> Option<Face> {
        Face::ALL.into_iter().find(|face| face.letter() == letter)
    }

    /// The `(rows, cols)` of this face's grid.
    ///
    /// Every face is read from outside the puzzle. The four side faces have a
    /// row per layer of the Y axis, read top to bottom; F reads its columns left
    /// to right, R front to back, B right to left and L back to front. U reads
    /// its rows back to front and D front to back, both with columns left to
    /// right, so that the net unfolds around F.
    pub fn grid_shape(self, dims: Dimensions) -> (usize, usize) {
        let (length, width, height) = (dims.length(), dims.width(), dims.height());
        match self {
            Face::U | Face::D => (height, width),
            Face::F | Face::B => (length, width),
            Face::L | Face::R => (length, height),
        }
    }

    pub fn slot_count(self, dims: Dimensions) -> usize {
        let (rows, cols) = self.grid_shape(dims);
        rows * cols
    }
}

impl fmt::Display for Face {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.letter())
    }
}

/// The size of a cuboid puzzle, read the way the front face is read: `length`
/// rows (the Y axis), `width` columns (the X axis) and `height` layers deep
/// (the Z axis, counted from the back).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Dimensions {
    length: u16,
    width: u16,
    height: u16,
}

impl Dimensions {
    /// # Errors
    ///
    /// If any component is zero, or the puzzle has a face too large to number
    /// its facelets.
    pub fn new(length: u16, width: u16, height: u16) -> Result<Dimensions, CubeError> {
        if length == 0 || width == 0 || height == 0 {
            return Err(CubeError::InvalidDimensions(format!(
                "{length}x{width}x{height} has a non-positive component"
            )));
        }

        let dims = Dimensions {
            length,
            width,
            height,
        };

        if Face::ALL
            .into_iter()
            .any(|face| face.slot_count(dims) > Facelet::MAX_SLOTS_PER_FACE)
        {
            return Err(CubeError::InvalidDimensions(format!(
                "{dims} has a face with more than {} facelets",
                Facelet::MAX_SLOTS_PER_FACE
            )));
        }

        Ok(dims)
    }

    pub fn length(self) -> usize {
        usize::from(self.length)
    }

    pub fn width(self) -> usize {
        usize::from(self.width)
    }

    pub fn height(self) -> usize {
        usize::from(self.height)
    }

    /// The number of layers along `axis`.
    pub fn extent(self, axis: Axis) -> usize {
        match axis {
            Axis::X => self.width(),
            Axis::Y => self.length(),
            Axis::Z => self.height(),
        }
    }

    /// Whether the layers along `axis` are square, which is what allows them
    /// to be turned by a quarter turn.
    pub fn is_square_section(self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.length == self.height,
            Axis::Y => self.width == self.height,
            Axis::Z => self.width == self.length,
        }
    }

    pub fn facelet_count(self) -> usize {
        Face::ALL.into_iter().map(|face| face.slot_count(self)).sum()
    }

    fn extent_i32(self, axis: Axis) -> i32 {
        self.extent(axis) as i32
    }

    /// The surface point of the slot at `(row, col)` on `face`.
    pub(crate) fn slot_to_point(self, face: Face, row: usize, col: usize) -> Point {
        let (nx, ny, nz) = (
            self.extent_i32(Axis::X),
            self.extent_i32(Axis::Y),
            self.extent_i32(Axis::Z),
        );
        let centred = |index: usize, extent: i32| 2 * index as i32 - (extent - 1);

        match face {
            Face::U => [centred(col, nx), ny, centred(row, nz)],
            Face::D => [centred(col, nx), -ny, -centred(row, nz)],
            Face::F => [centred(col, nx), -centred(row, ny), nz],
            Face::B => [-centred(col, nx), -centred(row, ny), -nz],
            Face::L => [-nx, -centred(row, ny), centred(col, nz)],
            Face::R => [nx, -centred(row, ny), -centred(col, nz)],
        }
    }

    /// The slot at a surface point, or `None` if the point is not the centre
    /// of a facelet.
    pub(crate) fn point_to_slot(self, [x, y, z]: Point) -> Option<(Face, usize, usize)> {
        let (nx, ny, nz) = (
            self.extent_i32(Axis::X),
            self.extent_i32(Axis::Y),
            self.extent_i32(Axis::Z),
        );
        // Rejects both faces of the axis, so a point on an edge of the bounding
        // box maps to no slot
        let uncentred = |coord: i32, extent: i32| {
            let shifted = coord + extent - 1;
            (shifted >= 0 && shifted % 2 == 0 && shifted / 2 < extent)
                .then_some((shifted / 2) as usize)
        };

        let (face, row, col) = if y == ny {
            (Face::U, uncentred(z, nz)?, uncentred(x, nx)?)
        } else if y == -ny {
            (Face::D, uncentred(-z, nz)?, uncentred(x, nx)?)
        } else if z == nz {
            (Face::F, uncentred(-y, ny)?, uncentred(x, nx)?)
        } else if z == -nz {
            (Face::B, uncentred(-y, ny)?, uncentred(-x, nx)?)
        } else if x == -nx {
            (Face::L, uncentred(-y, ny)?, uncentred(z, nz)?)
        } else if x == nx {
            (Face::R, uncentred(-y, ny)?, uncentred(-z, nz)?)
        } else {
            return None;
        };

        Some((face, row, col))
    }

    /// The layer along `axis` that a surface point belongs to. Facelets on the
    /// two faces normal to the axis belong to the outermost layers.
    pub(crate) fn layer_of(self, point: Point, axis: Axis) -> usize {
        let n = self.extent_i32(axis);
        let coord = point[axis as usize];
        if coord <= -n {
            0
        } else if coord >= n {
            self.extent(axis) - 1
        } else {
            ((coord + n - 1) / 2) as usize
        }
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}x{}", self.length, self.width, self.height)
    }
}

impl FromStr for Dimensions {
    type Err = CubeError;

    /// Parse an `LxWxH` triple such as `3x2x1`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CubeError::InvalidDimensions(format!("`{s}` is not of the form LxWxH"));

        let components = s
            .trim()
            .split(['x', 'X', '×'])
            .map(|component| component.trim().parse::<u16>().map_err(|_| invalid()))
            .collect::<Result<Vec<_>, _>>()?;

        match components[..] {
            [length, width, height] => Dimensions::new(length, width, height),
            _ => Err(invalid()),
        }
    }
}
