use arrayvec::ArrayVec;
use rand::{Rng, distr::StandardUniform, prelude::Distribution};

use super::{SHAPE_SIZE, board::Cell};

/// Enum representing the type of piece.
///
/// The discriminant is the piece's color id: it is what a settled cell of
/// this kind reports at the presentation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum PieceKind {
    O = 1,
    I = 2,
    T = 3,
    S = 4,
    Z = 5,
    J = 6,
    L = 7,
}

impl Distribution<PieceKind> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceKind {
        match rng.random_range(1..=7) {
            1 => PieceKind::O,
            2 => PieceKind::I,
            3 => PieceKind::T,
            4 => PieceKind::S,
            5 => PieceKind::Z,
            6 => PieceKind::J,
            _ => PieceKind::L,
        }
    }
}

impl PieceKind {
    /// Number of piece types (7).
    pub const LEN: usize = 7;

    /// All kinds in color-id order.
    pub const ALL: [Self; Self::LEN] = [
        PieceKind::O,
        PieceKind::I,
        PieceKind::T,
        PieceKind::S,
        PieceKind::Z,
        PieceKind::J,
        PieceKind::L,
    ];

    /// Color id of this kind (`1..=7`).
    #[must_use]
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Parses a color id back into a kind.
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(PieceKind::O),
            2 => Some(PieceKind::I),
            3 => Some(PieceKind::T),
            4 => Some(PieceKind::S),
            5 => Some(PieceKind::Z),
            6 => Some(PieceKind::J),
            7 => Some(PieceKind::L),
            _ => None,
        }
    }

    /// Single character name of this kind.
    #[must_use]
    pub const fn as_char(self) -> char {
        match self {
            PieceKind::O => 'O',
            PieceKind::I => 'I',
            PieceKind::T => 'T',
            PieceKind::S => 'S',
            PieceKind::Z => 'Z',
            PieceKind::J => 'J',
            PieceKind::L => 'L',
        }
    }
}

/// A piece shape inside its fixed 5×5 bounding grid.
///
/// Shapes are values: rotation returns a new shape. The grid is sized so
/// every canonical shape can rotate freely without leaving it, which keeps
/// rotation itself total; only placing the rotated shape on the board can
/// fail.
///
/// The canonical layouts (row, column), chosen to match the classic
/// hand-held rendition of the game:
///
/// ```text
/// O (1,1)(1,2)(2,1)(2,2)    I (2,0)(2,1)(2,2)(2,3)
/// T (1,2)(2,1)(2,2)(2,3)    S (1,1)(2,1)(2,2)(3,2)
/// Z (2,1)(2,2)(3,2)(3,3)    J (1,1)(2,1)(2,2)(2,3)
/// L (1,3)(2,1)(2,2)(2,3)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceShape {
    cells: [[Cell; SHAPE_SIZE]; SHAPE_SIZE],
}

const CANONICAL_SHAPES: [PieceShape; PieceKind::LEN] = {
    use Cell::Empty as E;
    const O: Cell = Cell::Piece(PieceKind::O);
    const I: Cell = Cell::Piece(PieceKind::I);
    const T: Cell = Cell::Piece(PieceKind::T);
    const S: Cell = Cell::Piece(PieceKind::S);
    const Z: Cell = Cell::Piece(PieceKind::Z);
    const J: Cell = Cell::Piece(PieceKind::J);
    const L: Cell = Cell::Piece(PieceKind::L);
    const EMPTY: [Cell; SHAPE_SIZE] = [E; SHAPE_SIZE];
    [
        PieceShape {
            cells: [EMPTY, [E, O, O, E, E], [E, O, O, E, E], EMPTY, EMPTY],
        },
        PieceShape {
            cells: [EMPTY, EMPTY, [I, I, I, I, E], EMPTY, EMPTY],
        },
        PieceShape {
            cells: [EMPTY, [E, E, T, E, E], [E, T, T, T, E], EMPTY, EMPTY],
        },
        PieceShape {
            cells: [EMPTY, [E, S, E, E, E], [E, S, S, E, E], [E, E, S, E, E], EMPTY],
        },
        PieceShape {
            cells: [EMPTY, EMPTY, [E, Z, Z, E, E], [E, E, Z, Z, E], EMPTY],
        },
        PieceShape {
            cells: [EMPTY, [E, J, E, E, E], [E, J, J, J, E], EMPTY, EMPTY],
        },
        PieceShape {
            cells: [EMPTY, [E, E, E, L, E], [E, L, L, L, E], EMPTY, EMPTY],
        },
    ]
};

impl PieceShape {
    /// The base orientation of the given kind.
    #[must_use]
    pub const fn canonical(kind: PieceKind) -> Self {
        CANONICAL_SHAPES[kind.code() as usize - 1]
    }

    #[must_use]
    pub fn grid(&self) -> &[[Cell; SHAPE_SIZE]; SHAPE_SIZE] {
        &self.cells
    }

    /// Offsets of the occupied cells relative to the shape's top-left
    /// corner, as `(dx, dy)` pairs in row-major scan order.
    ///
    /// Every shape has exactly four blocks.
    #[must_use]
    #[expect(clippy::cast_possible_truncation)]
    pub fn occupied_cells(&self) -> ArrayVec<(i32, i32), 4> {
        let mut cells = ArrayVec::new();
        for (dy, row) in self.cells.iter().enumerate() {
            for (dx, cell) in row.iter().enumerate() {
                if !cell.is_empty() {
                    cells.push((dx as i32, dy as i32));
                }
            }
        }
        cells
    }

    /// Rotates 90° clockwise: `dst[c][N-1-r] = src[r][c]`.
    #[must_use]
    pub fn rotated_cw(&self) -> Self {
        let mut cells = [[Cell::Empty; SHAPE_SIZE]; SHAPE_SIZE];
        for (r, row) in self.cells.iter().enumerate() {
            for (c, &cell) in row.iter().enumerate() {
                cells[c][SHAPE_SIZE - 1 - r] = cell;
            }
        }
        Self { cells }
    }

    /// Rotates 90° counter-clockwise: `dst[N-1-c][r] = src[r][c]`.
    #[must_use]
    pub fn rotated_ccw(&self) -> Self {
        let mut cells = [[Cell::Empty; SHAPE_SIZE]; SHAPE_SIZE];
        for (r, row) in self.cells.iter().enumerate() {
            for (c, &cell) in row.iter().enumerate() {
                cells[SHAPE_SIZE - 1 - c][r] = cell;
            }
        }
        Self { cells }
    }

    /// One rotation step for the given kind.
    ///
    /// O is rotation-invariant. I, S and Z oscillate between their two real
    /// orientations: the probe cell (row 1, column 2) is occupied exactly in
    /// the rotated state, so its value picks the direction that returns the
    /// shape toward canonical. T, J and L cycle clockwise with period 4.
    #[must_use]
    pub fn rotated(&self, kind: PieceKind) -> Self {
        match kind {
            PieceKind::O => *self,
            PieceKind::I | PieceKind::S | PieceKind::Z => {
                if self.cells[1][2].is_empty() {
                    self.rotated_cw()
                } else {
                    self.rotated_ccw()
                }
            }
            PieceKind::T | PieceKind::J | PieceKind::L => self.rotated_cw(),
        }
    }
}

/// A piece in play: kind, current shape, and the top-left offset of its
/// bounding grid in board coordinates.
///
/// `y` starts negative: the spawn offset hangs the shape two rows above
/// the visible field so tall pieces enter without instant collision.
/// Pieces are values; movement and rotation return new instances, and the
/// engine only stores one after collision-checking it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Piece {
    kind: PieceKind,
    shape: PieceShape,
    x: i32,
    y: i32,
}

impl Piece {
    pub const SPAWN_X: i32 = 3;
    pub const SPAWN_Y: i32 = -2;

    #[must_use]
    pub fn new(kind: PieceKind, shape: PieceShape) -> Self {
        Self {
            kind,
            shape,
            x: Self::SPAWN_X,
            y: Self::SPAWN_Y,
        }
    }

    #[must_use]
    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    #[must_use]
    pub fn shape(&self) -> &PieceShape {
        &self.shape
    }

    #[must_use]
    pub fn x(&self) -> i32 {
        self.x
    }

    #[must_use]
    pub fn y(&self) -> i32 {
        self.y
    }

    /// The same piece translated by `(dx, dy)`.
    #[must_use]
    pub fn shifted(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..*self
        }
    }

    /// The same piece moved back to the spawn offset.
    #[must_use]
    pub fn at_spawn(&self) -> Self {
        Self {
            x: Self::SPAWN_X,
            y: Self::SPAWN_Y,
            ..*self
        }
    }

    /// The piece with a replacement shape and horizontal position, as
    /// produced by a successful (possibly kicked) rotation.
    #[must_use]
    pub fn reshaped(&self, shape: PieceShape, x: i32) -> Self {
        Self {
            shape,
            x,
            ..*self
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cells_of(shape: &PieceShape) -> Vec<(usize, usize)> {
        shape
            .occupied_cells()
            .into_iter()
            .map(|(dx, dy)| (dy as usize, dx as usize))
            .collect()
    }

    #[test]
    fn canonical_shapes_match_the_classic_layouts() {
        let expected: [(PieceKind, [(usize, usize); 4]); 7] = [
            (PieceKind::O, [(1, 1), (1, 2), (2, 1), (2, 2)]),
            (PieceKind::I, [(2, 0), (2, 1), (2, 2), (2, 3)]),
            (PieceKind::T, [(1, 2), (2, 1), (2, 2), (2, 3)]),
            (PieceKind::S, [(1, 1), (2, 1), (2, 2), (3, 2)]),
            (PieceKind::Z, [(2, 1), (2, 2), (3, 2), (3, 3)]),
            (PieceKind::J, [(1, 1), (2, 1), (2, 2), (2, 3)]),
            (PieceKind::L, [(1, 3), (2, 1), (2, 2), (2, 3)]),
        ];
        for (kind, cells) in expected {
            assert_eq!(
                cells_of(&PieceShape::canonical(kind)),
                cells.to_vec(),
                "canonical {} shape",
                kind.as_char(),
            );
        }
    }

    #[test]
    fn every_shape_has_exactly_four_blocks() {
        for kind in PieceKind::ALL {
            let mut shape = PieceShape::canonical(kind);
            for _ in 0..4 {
                assert_eq!(shape.occupied_cells().len(), 4);
                shape = shape.rotated(kind);
            }
        }
    }

    #[test]
    fn o_is_rotation_invariant() {
        let shape = PieceShape::canonical(PieceKind::O);
        assert_eq!(shape.rotated(PieceKind::O), shape);
    }

    #[test]
    fn i_s_z_oscillate_between_two_orientations() {
        for kind in [PieceKind::I, PieceKind::S, PieceKind::Z] {
            let base = PieceShape::canonical(kind);
            let once = base.rotated(kind);
            let twice = once.rotated(kind);
            assert_ne!(once, base, "{} must leave canonical", kind.as_char());
            assert_eq!(twice, base, "{} must return after two", kind.as_char());
        }
    }

    #[test]
    fn t_j_l_cycle_with_period_four() {
        for kind in [PieceKind::T, PieceKind::J, PieceKind::L] {
            let base = PieceShape::canonical(kind);
            let mut shape = base;
            for step in 1..4 {
                shape = shape.rotated(kind);
                assert_ne!(shape, base, "{} repeated at step {step}", kind.as_char());
            }
            assert_eq!(shape.rotated(kind), base);
        }
    }

    #[test]
    fn clockwise_and_counter_clockwise_are_inverses() {
        for kind in PieceKind::ALL {
            let shape = PieceShape::canonical(kind);
            assert_eq!(shape.rotated_cw().rotated_ccw(), shape);
            assert_eq!(shape.rotated_ccw().rotated_cw(), shape);
        }
    }

    #[test]
    fn the_i_probe_cell_tracks_orientation() {
        let horizontal = PieceShape::canonical(PieceKind::I);
        assert!(horizontal.grid()[1][2].is_empty());

        // Clockwise from (2,0)..(2,3) lands the bar on column 2.
        let vertical = horizontal.rotated(PieceKind::I);
        assert!(!vertical.grid()[1][2].is_empty());
        assert_eq!(
            cells_of(&vertical),
            vec![(0, 2), (1, 2), (2, 2), (3, 2)],
        );
    }

    #[test]
    fn kind_codes_round_trip() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_code(kind.code()), Some(kind));
        }
        assert_eq!(PieceKind::from_code(0), None);
        assert_eq!(PieceKind::from_code(8), None);
    }

    #[test]
    fn sampled_kinds_are_always_valid() {
        let mut rng = rand::rng();
        for _ in 0..100 {
            let kind: PieceKind = rng.random();
            assert!((1..=7).contains(&kind.code()));
        }
    }

    #[test]
    fn pieces_spawn_above_the_visible_field() {
        let piece = Piece::new(PieceKind::T, PieceShape::canonical(PieceKind::T));
        assert_eq!((piece.x(), piece.y()), (Piece::SPAWN_X, Piece::SPAWN_Y));
        assert_eq!(piece.shifted(2, 5).x(), Piece::SPAWN_X + 2);
        assert_eq!(piece.shifted(2, 5).at_spawn(), piece);
    }
}
