use serde::{Deserialize, Serialize};

use super::{
    FIELD_HEIGHT, FIELD_WIDTH,
    piece::{Piece, PieceKind},
};

/// A single cell of the playing field.
///
/// Settled cells remember which piece kind produced them; the kind doubles
/// as the cell's color id at the presentation boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Piece(PieceKind),
}

impl Cell {
    #[must_use]
    pub fn is_empty(self) -> bool {
        self == Cell::Empty
    }

    /// Wire value of the cell: `0` for empty, the piece color id `1..=7`
    /// otherwise.
    #[must_use]
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Piece(kind) => kind.code(),
        }
    }

    /// Parses a wire value back into a cell.
    #[must_use]
    pub fn from_code(code: u8) -> Option<Self> {
        if code == 0 {
            Some(Cell::Empty)
        } else {
            PieceKind::from_code(code).map(Cell::Piece)
        }
    }
}

impl Serialize for Cell {
    // Cells cross the engine boundary as their numeric color code, so a
    // serialized board is a plain grid of small integers.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.code())
    }
}

impl<'de> Deserialize<'de> for Cell {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let code = u8::deserialize(deserializer)?;
        Cell::from_code(code)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid cell code: {code}")))
    }
}

/// The settled-cell grid beneath the falling piece.
///
/// Dimensions are fixed for the life of the engine. Only [`Board::commit`]
/// and [`Board::clear_full_lines`] mutate the grid; rejected moves never
/// touch it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    rows: [[Cell; FIELD_WIDTH]; FIELD_HEIGHT],
}

impl Default for Board {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl Board {
    pub const EMPTY: Self = Self {
        rows: [[Cell::Empty; FIELD_WIDTH]; FIELD_HEIGHT],
    };

    #[must_use]
    pub fn rows(&self) -> &[[Cell; FIELD_WIDTH]; FIELD_HEIGHT] {
        &self.rows
    }

    pub fn reset(&mut self) {
        self.rows = Self::EMPTY.rows;
    }

    /// Whether the cell at board coordinates is occupied.
    ///
    /// Rows above the visible field (`y < 0`) never count as occupied so a
    /// freshly spawned piece can hang over the top edge. Coordinates beyond
    /// the other three edges count as solid.
    #[must_use]
    pub fn is_cell_occupied(&self, x: i32, y: i32) -> bool {
        if y < 0 {
            return false;
        }
        let (Ok(x), Ok(y)) = (usize::try_from(x), usize::try_from(y)) else {
            return true;
        };
        match self.rows.get(y).and_then(|row| row.get(x)) {
            Some(cell) => !cell.is_empty(),
            None => true,
        }
    }

    /// Writes the piece's occupied cells into the field at the piece's
    /// offset.
    ///
    /// Cells outside the field are skipped silently: the caller has already
    /// collision-checked the position, so anything out of bounds is in the
    /// invisible spawn margin above row zero.
    pub fn commit(&mut self, piece: &Piece) {
        for (dx, dy) in piece.shape().occupied_cells() {
            let (Ok(x), Ok(y)) = (
                usize::try_from(piece.x() + dx),
                usize::try_from(piece.y() + dy),
            ) else {
                continue;
            };
            if let Some(cell) = self.rows.get_mut(y).and_then(|row| row.get_mut(x)) {
                *cell = Cell::Piece(piece.kind());
            }
        }
    }

    /// Removes every full row and shifts the rows above it down.
    ///
    /// A row is full when all of its cells are occupied. The scan runs
    /// bottom-up and compacts as it goes, so one cleared row never carries
    /// another full row past the scan. Returns the number of rows removed.
    pub fn clear_full_lines(&mut self) -> usize {
        let mut count = 0;
        for y in (0..FIELD_HEIGHT).rev() {
            if self.rows[y].iter().all(|cell| !cell.is_empty()) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y + count] = self.rows[y];
            }
        }
        for row in &mut self.rows[..count] {
            *row = [Cell::Empty; FIELD_WIDTH];
        }
        count
    }

    /// Builds a board from ASCII art for tests.
    ///
    /// `#` is a settled cell, `.` is empty. Rows run top to bottom and must
    /// be exactly [`FIELD_WIDTH`] cells wide; missing trailing rows stay
    /// empty.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let mut board = Self::EMPTY;
        for (y, line) in art.lines().filter(|line| !line.trim().is_empty()).enumerate() {
            let cells: Vec<char> = line.chars().filter(|c| *c == '#' || *c == '.').collect();
            assert_eq!(
                cells.len(),
                FIELD_WIDTH,
                "row {y} must have exactly {FIELD_WIDTH} cells",
            );
            for (x, ch) in cells.iter().enumerate() {
                if *ch == '#' {
                    board.rows[y][x] = Cell::Piece(PieceKind::O);
                }
            }
        }
        board
    }

    #[cfg(test)]
    pub(crate) fn occupied_count(&self) -> usize {
        self.rows
            .iter()
            .flatten()
            .filter(|cell| !cell.is_empty())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::{super::piece::PieceShape, *};

    #[test]
    fn empty_board_has_no_occupied_cells() {
        let board = Board::EMPTY;
        for y in 0..FIELD_HEIGHT {
            for x in 0..FIELD_WIDTH {
                assert!(
                    !board.is_cell_occupied(i32::try_from(x).unwrap(), i32::try_from(y).unwrap()),
                    "cell ({x}, {y}) should start empty",
                );
            }
        }
    }

    #[test]
    fn cells_above_the_field_never_count_as_occupied() {
        let board = Board::from_ascii(
            "##########
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........",
        );
        assert!(board.is_cell_occupied(0, 0));
        assert!(!board.is_cell_occupied(0, -1));
        assert!(!board.is_cell_occupied(0, -100));
    }

    #[test]
    fn coordinates_beyond_walls_and_floor_count_as_solid() {
        let board = Board::EMPTY;
        assert!(board.is_cell_occupied(-1, 0));
        assert!(board.is_cell_occupied(FIELD_WIDTH as i32, 0));
        assert!(board.is_cell_occupied(0, FIELD_HEIGHT as i32));
    }

    #[test]
    fn commit_writes_the_piece_color() {
        let mut board = Board::EMPTY;
        let piece = Piece::new(PieceKind::I, PieceShape::canonical(PieceKind::I)).shifted(0, 2);
        // I occupies shape row 2, so the blocks land on board row 2.
        board.commit(&piece);
        assert_eq!(board.occupied_count(), 4);
        for x in 3..7 {
            assert_eq!(board.rows[2][x as usize], Cell::Piece(PieceKind::I));
            assert!(board.is_cell_occupied(x, 2));
        }
    }

    #[test]
    fn commit_skips_cells_above_the_field() {
        let mut board = Board::EMPTY;
        // At the spawn offset the O piece straddles the top edge: its upper
        // blocks sit on row -1, its lower blocks on row 0.
        let piece = Piece::new(PieceKind::O, PieceShape::canonical(PieceKind::O));
        board.commit(&piece);
        assert_eq!(board.occupied_count(), 2);
        assert!(board.is_cell_occupied(4, 0));
        assert!(board.is_cell_occupied(5, 0));
    }

    #[test]
    fn commit_of_a_fully_hidden_piece_writes_nothing() {
        let mut board = Board::EMPTY;
        let piece = Piece::new(PieceKind::O, PieceShape::canonical(PieceKind::O)).shifted(0, -1);
        board.commit(&piece);
        assert_eq!(board.occupied_count(), 0);
    }

    #[test]
    fn a_partially_filled_row_is_not_cleared() {
        let mut board = Board::from_ascii(
            "..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             #########.",
        );
        assert_eq!(board.clear_full_lines(), 0);
        assert_eq!(board.occupied_count(), 9);
    }

    #[test]
    fn clearing_the_bottom_half_leaves_the_top_untouched() {
        let mut art = String::new();
        art.push_str("#.........\n");
        for _ in 1..10 {
            art.push_str("..........\n");
        }
        for _ in 10..20 {
            art.push_str("##########\n");
        }
        let mut board = Board::from_ascii(&art);

        assert_eq!(board.clear_full_lines(), 10);
        // The marker from row 0 drops by the ten cleared rows.
        assert_eq!(board.occupied_count(), 1);
        assert!(board.is_cell_occupied(0, 10));

        // A second pass finds nothing left to clear.
        assert_eq!(board.clear_full_lines(), 0);
        assert!(board.is_cell_occupied(0, 10));
    }

    #[test]
    fn rows_above_a_cleared_row_shift_down_in_order() {
        let mut board = Board::from_ascii(
            "..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..#.......
             ..........
             ##########
             .#........
             ##########",
        );
        assert_eq!(board.clear_full_lines(), 2);
        // Row 15's marker falls past both cleared rows, row 18's past one.
        assert!(board.is_cell_occupied(2, 17));
        assert!(board.is_cell_occupied(1, 19));
        assert_eq!(board.occupied_count(), 2);
    }

    #[test]
    fn interleaved_full_rows_are_all_removed() {
        let mut board = Board::from_ascii(
            "..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ..........
             ##########
             ...#......
             ##########
             ....#.....
             ##########
             .....#....",
        );
        assert_eq!(board.clear_full_lines(), 3);
        assert!(board.is_cell_occupied(3, 17));
        assert!(board.is_cell_occupied(4, 18));
        assert!(board.is_cell_occupied(5, 19));
        assert_eq!(board.occupied_count(), 3);
    }

    #[test]
    fn clearing_every_row_empties_the_board() {
        let mut art = String::new();
        for _ in 0..20 {
            art.push_str("##########\n");
        }
        let mut board = Board::from_ascii(&art);
        assert_eq!(board.clear_full_lines(), FIELD_HEIGHT);
        assert_eq!(board.occupied_count(), 0);
    }

    #[test]
    fn cell_codes_round_trip() {
        assert_eq!(Cell::Empty.code(), 0);
        assert_eq!(Cell::from_code(0), Some(Cell::Empty));
        for code in 1..=7 {
            let cell = Cell::from_code(code).unwrap();
            assert_eq!(cell.code(), code);
            assert!(!cell.is_empty());
        }
        assert_eq!(Cell::from_code(8), None);
    }

    #[test]
    fn cells_serialize_as_color_codes() {
        let row = [
            Cell::Empty,
            Cell::Piece(PieceKind::O),
            Cell::Piece(PieceKind::L),
        ];
        let json = serde_json::to_string(&row).unwrap();
        assert_eq!(json, "[0,1,7]");

        let parsed: [Cell; 3] = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, row);
        assert!(serde_json::from_str::<Cell>("8").is_err());
    }
}
