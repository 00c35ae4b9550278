//! Named moves in standard cube notation, and the catalog of the ones that
//! exist on a given puzzle.

use std::{collections::BTreeSet, fmt, str::FromStr, sync::Arc};

use itertools::Itertools;
use log::trace;

use crate::{
    CubeError,
    geometry::{Dimensions, Face, Sign},
    moves::{MoveDescriptor, Rotation, Transformation},
    state::CubeState,
};

/// How a named move turns its layer, as seen looking at the face it is named
/// after.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Turn {
    Clockwise,
    Double,
    CounterClockwise,
}

impl Turn {
    pub const ALL: [Self; 3] = [Turn::Clockwise, Turn::Double, Turn::CounterClockwise];

    pub fn suffix(self) -> &'static str {
        match self {
            Turn::Clockwise => "",
            Turn::Double => "2",
            Turn::CounterClockwise => "'",
        }
    }

    #[must_use]
    pub fn inverse(self) -> Turn {
        match self {
            Turn::Clockwise => Turn::CounterClockwise,
            Turn::Double => Turn::Double,
            Turn::CounterClockwise => Turn::Clockwise,
        }
    }
}

/// A move of the catalog: the `depth`-th layer counted inward from `face`,
/// turned by `turn`. Written `[depth]FACE[2|']`, with the depth left out when
/// it is 1, so `R`, `U2`, `F'`, `2R` and `3L2` are all named moves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamedMove {
    pub face: Face,
    pub depth: u16,
    pub turn: Turn,
}

macro_rules! outer_moves {
    ($($face:ident: $cw:ident, $double:ident, $ccw:ident;)*) => {
        impl NamedMove {
            $(
                pub const $cw: NamedMove = NamedMove::outer(Face::$face, Turn::Clockwise);
                pub const $double: NamedMove = NamedMove::outer(Face::$face, Turn::Double);
                pub const $ccw: NamedMove = NamedMove::outer(Face::$face, Turn::CounterClockwise);
            )*
        }
    };
}

outer_moves! {
    U: U, U2, U_PRIME;
    L: L, L2, L_PRIME;
    F: F, F2, F_PRIME;
    R: R, R2, R_PRIME;
    B: B, B2, B_PRIME;
    D: D, D2, D_PRIME;
}

impl NamedMove {
    pub const fn outer(face: Face, turn: Turn) -> NamedMove {
        NamedMove {
            face,
            depth: 1,
            turn,
        }
    }

    pub const fn new(face: Face, depth: u16, turn: Turn) -> NamedMove {
        NamedMove { face, depth, turn }
    }

    #[must_use]
    pub fn inverse(self) -> NamedMove {
        NamedMove {
            turn: self.turn.inverse(),
            ..self
        }
    }

    /// Resolve this move to the layer it turns on a puzzle of size `dims`.
    /// A layer counted from a face on the positive end of its axis is indexed
    /// from that end, so on an axis with a single layer both opposite faces
    /// resolve to layer 0, turning it in opposite directions.
    ///
    /// # Errors
    ///
    /// `UnsupportedMoveForDimensions` if the depth reaches past the puzzle or
    /// the move is a quarter turn of a layer that is not square.
    pub fn resolve(self, dims: Dimensions) -> Result<MoveDescriptor, CubeError> {
        let (axis, sign) = self.face.normal();
        let extent = dims.extent(axis);
        let depth = usize::from(self.depth);

        let unsupported = || CubeError::UnsupportedMoveForDimensions {
            mv: self.to_string(),
            dimensions: dims,
            position: 0,
        };

        if depth == 0 || depth > extent {
            return Err(unsupported());
        }

        let layer = match sign {
            Sign::Positive => extent - depth,
            Sign::Negative => depth - 1,
        };

        // Clockwise seen from the negative end is counter-clockwise seen from
        // the positive end
        let rotation = match (self.turn, sign) {
            (Turn::Double, _) => Rotation::Half,
            (Turn::Clockwise, Sign::Positive) | (Turn::CounterClockwise, Sign::Negative) => {
                Rotation::Clockwise
            }
            (Turn::CounterClockwise, Sign::Positive) | (Turn::Clockwise, Sign::Negative) => {
                Rotation::CounterClockwise
            }
        };

        if rotation.is_quarter() && !dims.is_square_section(axis) {
            return Err(unsupported());
        }

        Ok(MoveDescriptor::new(axis, layer, rotation))
    }
}

impl fmt::Display for NamedMove {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.depth != 1 {
            write!(f, "{}", self.depth)?;
        }
        write!(f, "{}{}", self.face, self.turn.suffix())
    }
}

impl FromStr for NamedMove {
    type Err = CubeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || CubeError::InvalidMoveToken {
            token: s.to_owned(),
            position: 0,
        };

        let digits = s.chars().take_while(char::is_ascii_digit).count();
        let (depth, rest) = s.split_at(digits);
        let depth = if depth.is_empty() {
            1
        } else {
            depth.parse::<u16>().map_err(|_| invalid())?
        };
        if depth == 0 {
            return Err(invalid());
        }

        let mut chars = rest.chars();
        let face = chars.next().and_then(Face::from_letter).ok_or_else(invalid)?;
        let turn = match chars.as_str() {
            "" => Turn::Clockwise,
            "2" => Turn::Double,
            "'" => Turn::CounterClockwise,
            _ => return Err(invalid()),
        };

        Ok(NamedMove { face, depth, turn })
    }
}

/// Parse a whitespace-separated move string into named moves, reporting the
/// first token that is not a move along with its position in the string.
///
/// # Errors
///
/// `InvalidMoveToken` for the first malformed token.
pub fn parse_moves(moves: &str) -> Result<Vec<NamedMove>, CubeError> {
    parse_tokens(moves, None)
}

/// Tokens are parsed, and resolved against `dims` when given, one at a time
/// so that the error is always the leftmost failing token.
fn parse_tokens(moves: &str, dims: Option<Dimensions>) -> Result<Vec<NamedMove>, CubeError> {
    moves
        .split_whitespace()
        .enumerate()
        .map(|(position, token)| {
            let mv = token
                .parse::<NamedMove>()
                .map_err(|_| CubeError::InvalidMoveToken {
                    token: token.to_owned(),
                    position,
                })?;
            if let Some(dims) = dims {
                mv.resolve(dims).map_err(|err| err.at(position))?;
            }
            Ok(mv)
        })
        .collect()
}

/// Anything that can be expanded into an ordered list of named moves: a move
/// string, a single move, or a sequence of moves.
pub trait MoveSequence {
    /// # Errors
    ///
    /// If the moves are written as a string that does not parse.
    fn into_moves(self) -> Result<Vec<NamedMove>, CubeError>;

    /// The moves, each checked to exist on `dims`.
    ///
    /// # Errors
    ///
    /// The leftmost move that does not parse or does not exist on `dims`,
    /// carrying its position in the sequence.
    fn into_moves_for(self, dims: Dimensions) -> Result<Vec<NamedMove>, CubeError>
    where
        Self: Sized,
    {
        let moves = self.into_moves()?;
        for (position, mv) in moves.iter().enumerate() {
            mv.resolve(dims).map_err(|err| err.at(position))?;
        }
        Ok(moves)
    }
}

impl MoveSequence for &str {
    fn into_moves(self) -> Result<Vec<NamedMove>, CubeError> {
        parse_moves(self)
    }

    fn into_moves_for(self, dims: Dimensions) -> Result<Vec<NamedMove>, CubeError> {
        parse_tokens(self, Some(dims))
    }
}

impl MoveSequence for &String {
    fn into_moves(self) -> Result<Vec<NamedMove>, CubeError> {
        parse_moves(self)
    }

    fn into_moves_for(self, dims: Dimensions) -> Result<Vec<NamedMove>, CubeError> {
        parse_tokens(self, Some(dims))
    }
}

impl MoveSequence for NamedMove {
    fn into_moves(self) -> Result<Vec<NamedMove>, CubeError> {
        Ok(vec![self])
    }
}

impl MoveSequence for &[NamedMove] {
    fn into_moves(self) -> Result<Vec<NamedMove>, CubeError> {
        Ok(self.to_vec())
    }
}

impl<const N: usize> MoveSequence for [NamedMove; N] {
    fn into_moves(self) -> Result<Vec<NamedMove>, CubeError> {
        Ok(self.to_vec())
    }
}

impl MoveSequence for Vec<NamedMove> {
    fn into_moves(self) -> Result<Vec<NamedMove>, CubeError> {
        Ok(self)
    }
}

impl MoveSequence for &Vec<NamedMove> {
    fn into_moves(self) -> Result<Vec<NamedMove>, CubeError> {
        Ok(self.clone())
    }
}

/// Every named move that exists on a puzzle of the given dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MoveCatalog {
    dims: Dimensions,
    moves: Vec<NamedMove>,
}

impl MoveCatalog {
    /// Enumerate the catalog face by face, then by depth, then by turn. Quarter
    /// turns of layers that are not square are left out.
    #[allow(clippy::cast_possible_truncation)]
    pub fn new(dims: Dimensions) -> MoveCatalog {
        let moves = Face::ALL
            .into_iter()
            .flat_map(|face| {
                let extent = dims.extent(face.normal().0);
                (1..=extent)
                    .cartesian_product(Turn::ALL)
                    .map(move |(depth, turn)| NamedMove::new(face, depth as u16, turn))
            })
            .filter(|mv| mv.resolve(dims).is_ok())
            .collect_vec();

        trace!("The {dims} catalog has {} moves", moves.len());

        MoveCatalog { dims, moves }
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dims
    }

    pub fn moves(&self) -> &[NamedMove] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn contains(&self, mv: NamedMove) -> bool {
        self.moves.contains(&mv)
    }

    /// # Errors
    ///
    /// See `NamedMove::resolve`.
    pub fn resolve(&self, mv: NamedMove) -> Result<MoveDescriptor, CubeError> {
        mv.resolve(self.dims)
    }

    /// # Errors
    ///
    /// See `NamedMove::resolve` and `Transformation::new`.
    pub fn transformation(&self, mv: NamedMove) -> Result<Transformation, CubeError> {
        Transformation::new(self.dims, self.resolve(mv)?)
    }

    /// Look up a single move token.
    ///
    /// # Errors
    ///
    /// `InvalidMoveToken` if the token is not a move at all, and
    /// `UnsupportedMoveForDimensions` if it names a move these dimensions do not
    /// have.
    pub fn lookup(&self, token: &str) -> Result<NamedMove, CubeError> {
        let mv = token.parse::<NamedMove>()?;
        self.resolve(mv)?;
        Ok(mv)
    }

    /// Parse a whitespace-separated move string, checking that every move
    /// exists on these dimensions.
    ///
    /// # Errors
    ///
    /// The leftmost token that fails, as an `InvalidMoveToken` or an
    /// `UnsupportedMoveForDimensions` carrying its position.
    pub fn parse(&self, moves: &str) -> Result<Vec<NamedMove>, CubeError> {
        parse_tokens(moves, Some(self.dims))
    }

    /// Apply `moves` to `state` from left to right.
    ///
    /// # Errors
    ///
    /// If the moves do not parse or do not exist on these dimensions, or if
    /// `state` has different dimensions from the catalog.
    pub fn apply(
        &self,
        state: &CubeState,
        moves: impl MoveSequence,
    ) -> Result<CubeState, CubeError> {
        moves
            .into_moves_for(self.dims)?
            .into_iter()
            .try_fold(state.clone(), |state, mv| {
                self.transformation(mv)?.apply(&state)
            })
    }
}

impl CubeState {
    /// Apply `moves` from left to right, resolving them against this state's
    /// own dimensions.
    ///
    /// # Errors
    ///
    /// See `MoveCatalog::apply`.
    pub fn apply_moves(&self, moves: impl MoveSequence) -> Result<CubeState, CubeError> {
        let dims = self.dimensions();
        moves
            .into_moves_for(dims)?
            .into_iter()
            .try_fold(self.clone(), |state, mv| {
                Transformation::new(dims, mv.resolve(dims)?)?.apply(&state)
            })
    }
}

/// A puzzle that may only be turned by a fixed set of moves.
#[derive(Clone, Debug)]
pub struct RestrictedCube {
    state: CubeState,
    permitted: Arc<BTreeSet<NamedMove>>,
}

impl RestrictedCube {
    /// # Errors
    ///
    /// If a permitted move does not exist on the state's dimensions.
    pub fn new(
        state: CubeState,
        permitted: impl IntoIterator<Item = NamedMove>,
    ) -> Result<RestrictedCube, CubeError> {
        let permitted = permitted.into_iter().collect::<BTreeSet<_>>();
        for mv in &permitted {
            mv.resolve(state.dimensions())?;
        }

        Ok(RestrictedCube {
            state,
            permitted: Arc::new(permitted),
        })
    }

    /// The solved puzzle of the given size.
    ///
    /// # Errors
    ///
    /// See `RestrictedCube::new`.
    pub fn from_dimensions(
        dims: Dimensions,
        permitted: impl IntoIterator<Item = NamedMove>,
    ) -> Result<RestrictedCube, CubeError> {
        RestrictedCube::new(CubeState::solved(dims), permitted)
    }

    pub fn state(&self) -> &CubeState {
        &self.state
    }

    pub fn into_state(self) -> CubeState {
        self.state
    }

    /// The permitted moves, sorted.
    pub fn permitted(&self) -> impl Iterator<Item = NamedMove> + '_ {
        self.permitted.iter().copied()
    }

    pub fn is_permitted(&self, mv: NamedMove) -> bool {
        self.permitted.contains(&mv)
    }

    /// Apply `moves` from left to right.
    ///
    /// # Errors
    ///
    /// `MoveNotPermitted` for the first move outside the permitted set; no move
    /// is applied in that case.
    pub fn apply(&self, moves: impl MoveSequence) -> Result<RestrictedCube, CubeError> {
        let moves = moves.into_moves_for(self.state.dimensions())?;
        if let Some(mv) = moves.iter().find(|mv| !self.is_permitted(**mv)) {
            return Err(CubeError::MoveNotPermitted {
                token: mv.to_string(),
            });
        }

        Ok(RestrictedCube {
            state: self.state.apply_moves(moves)?,
            permitted: Arc::clone(&self.permitted),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Axis;

    fn dims(s: &str) -> Dimensions {
        s.parse().unwrap()
    }

    #[test]
    fn test_tokens() {
        for token in ["R", "U2", "F'", "2R", "3L2", "12B'"] {
            let mv = token.parse::<NamedMove>().unwrap();
            assert_eq!(mv.to_string(), token);
        }
        assert_eq!("R2".parse::<NamedMove>().unwrap(), NamedMove::R2);
        assert_eq!("1D'".parse::<NamedMove>().unwrap(), NamedMove::D_PRIME);

        for bad in ["", "r", "X", "R3", "R''", "0R", "2", "R 2", "R2'"] {
            assert!(
                matches!(
                    bad.parse::<NamedMove>(),
                    Err(CubeError::InvalidMoveToken { .. })
                ),
                "{bad} should not parse"
            );
        }
    }

    #[test]
    fn test_parse_moves_reports_position() {
        assert_eq!(
            parse_moves("  L2\tU2 \n"),
            Ok(vec![NamedMove::L2, NamedMove::U2])
        );
        assert_eq!(parse_moves(""), Ok(vec![]));
        assert_eq!(
            parse_moves("R U R' Q U'"),
            Err(CubeError::InvalidMoveToken {
                token: "Q".to_owned(),
                position: 3
            })
        );
    }

    #[test]
    fn test_resolve() {
        let cube = dims("3x3x3");
        assert_eq!(
            NamedMove::R.resolve(cube),
            Ok(MoveDescriptor::new(Axis::X, 2, Rotation::Clockwise))
        );
        assert_eq!(
            NamedMove::L.resolve(cube),
            Ok(MoveDescriptor::new(Axis::X, 0, Rotation::CounterClockwise))
        );
        assert_eq!(
            "2R'".parse::<NamedMove>().unwrap().resolve(cube),
            Ok(MoveDescriptor::new(Axis::X, 1, Rotation::CounterClockwise))
        );
        assert_eq!(
            NamedMove::B2.resolve(cube),
            Ok(MoveDescriptor::new(Axis::Z, 0, Rotation::Half))
        );
        assert!(matches!(
            "4R".parse::<NamedMove>().unwrap().resolve(cube),
            Err(CubeError::UnsupportedMoveForDimensions { .. })
        ));
    }

    #[test]
    fn test_degenerate_axis_resolves_to_the_only_layer() {
        let flat = dims("3x2x1");
        assert_eq!(
            NamedMove::F2.resolve(flat),
            Ok(MoveDescriptor::new(Axis::Z, 0, Rotation::Half))
        );
        assert_eq!(
            NamedMove::B2.resolve(flat),
            Ok(MoveDescriptor::new(Axis::Z, 0, Rotation::Half))
        );
        assert!(matches!(
            "2F2".parse::<NamedMove>().unwrap().resolve(flat),
            Err(CubeError::UnsupportedMoveForDimensions { .. })
        ));
        assert!(matches!(
            NamedMove::F.resolve(flat),
            Err(CubeError::UnsupportedMoveForDimensions { .. })
        ));

        let single = dims("1x1x1");
        assert_eq!(
            NamedMove::R.resolve(single),
            NamedMove::L_PRIME.resolve(single)
        );
    }

    #[test]
    fn test_catalog_contents() {
        let cube = MoveCatalog::new(dims("3x3x3"));
        assert_eq!(cube.len(), 6 * 3 * 3);
        assert_eq!(cube.moves()[..3], [NamedMove::U, NamedMove::U2, NamedMove::U_PRIME]);

        // Only half turns fit, with two depths on X, three on Y and one on Z
        let flat = MoveCatalog::new(dims("3x2x1"));
        assert_eq!(flat.len(), 2 * 2 + 2 * 3 + 2);
        assert!(flat.moves().iter().all(|mv| mv.turn == Turn::Double));
        assert!(flat.contains(NamedMove::R2));
        assert!(!flat.contains(NamedMove::R));

        assert_eq!(flat.lookup("D2"), Ok(NamedMove::D2));
        assert!(matches!(
            flat.lookup("D"),
            Err(CubeError::UnsupportedMoveForDimensions { .. })
        ));
        assert!(matches!(
            flat.lookup("Dw"),
            Err(CubeError::InvalidMoveToken { .. })
        ));
    }

    #[test]
    fn test_catalog_parse() {
        let flat = MoveCatalog::new(dims("3x2x1"));
        assert_eq!(flat.parse("L2 U2"), Ok(vec![NamedMove::L2, NamedMove::U2]));
        assert!(matches!(
            flat.parse("L2 U"),
            Err(CubeError::UnsupportedMoveForDimensions { .. })
        ));
        assert_eq!(
            flat.parse("L2 U2 ?"),
            Err(CubeError::InvalidMoveToken {
                token: "?".to_owned(),
                position: 2
            })
        );
    }

    #[test]
    fn test_leftmost_failing_token_is_reported() {
        let flat = MoveCatalog::new(dims("3x2x1"));
        let solved = CubeState::solved(flat.dimensions());
        let unsupported_u = CubeError::UnsupportedMoveForDimensions {
            mv: "U".to_owned(),
            dimensions: flat.dimensions(),
            position: 1,
        };

        assert_eq!(flat.parse("L2 U Q"), Err(unsupported_u.clone()));
        assert_eq!(flat.apply(&solved, "L2 U Q"), Err(unsupported_u.clone()));
        assert_eq!(solved.apply_moves("L2 U Q"), Err(unsupported_u.clone()));
        assert_eq!(
            flat.apply(&solved, [NamedMove::L2, NamedMove::U, NamedMove::R]),
            Err(unsupported_u)
        );
        assert_eq!(
            flat.apply(&solved, "L2 Q U"),
            Err(CubeError::InvalidMoveToken {
                token: "Q".to_owned(),
                position: 1
            })
        );
    }

    #[test]
    fn test_move_inputs_agree() {
        let catalog = MoveCatalog::new(dims("3x3x3"));
        let solved = CubeState::solved(catalog.dimensions());

        let from_str = catalog.apply(&solved, "L2 U2").unwrap();
        let from_slice = catalog
            .apply(&solved, &[NamedMove::L2, NamedMove::U2][..])
            .unwrap();
        let chained = catalog
            .apply(&catalog.apply(&solved, NamedMove::L2).unwrap(), NamedMove::U2)
            .unwrap();

        assert_eq!(from_str, from_slice);
        assert_eq!(from_str, chained);
        assert_eq!(from_str, solved.apply_moves(vec![NamedMove::L2, NamedMove::U2]).unwrap());
        assert_ne!(from_str, solved);
    }

    #[test]
    fn test_restricted_cube() {
        let cube = RestrictedCube::from_dimensions(
            dims("3x3x3"),
            [NamedMove::R2, NamedMove::L2, NamedMove::U2, NamedMove::D2],
        )
        .unwrap();
        assert!(cube.is_permitted(NamedMove::U2));

        let turned = cube.apply("L2 U2").unwrap();
        assert_eq!(turned.state(), &cube.state().apply_moves("L2 U2").unwrap());
        assert_eq!(
            turned.apply("L2 F2").unwrap_err(),
            CubeError::MoveNotPermitted {
                token: "F2".to_owned()
            }
        );

        assert!(matches!(
            RestrictedCube::from_dimensions(dims("3x2x1"), [NamedMove::R]),
            Err(CubeError::UnsupportedMoveForDimensions { .. })
        ));
    }
}
