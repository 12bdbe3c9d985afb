//! Pure collision predicates over a piece shape, a candidate offset, and
//! the settled board.
//!
//! Translation and rotation report obstacles differently: a sideways or
//! downward move only needs to know whether it is blocked, while the
//! rotation recovery in the engine steers by *which* edge the rotated
//! shape ran into.

use super::{
    FIELD_HEIGHT, FIELD_WIDTH,
    board::Board,
    piece::PieceShape,
};

const WIDTH: i32 = FIELD_WIDTH as i32;
const HEIGHT: i32 = FIELD_HEIGHT as i32;

/// What a translated piece would run into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveObstacle {
    /// A block would leave the bottom of the field.
    Floor,
    /// A block would hit a wall or a settled cell.
    Base,
}

/// What a rotated piece would run into.
///
/// The left/right split is what makes the engine's kick recovery possible.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RotateObstacle {
    Floor,
    Left,
    Right,
    Base,
}

/// Checks a shape at `(x, y)` against the field for a translation.
///
/// Cells are scanned in row-major order and the first violation wins.
/// Blocks still above the visible field only collide with the walls, never
/// with settled cells.
#[must_use]
pub fn move_obstacle(shape: &PieceShape, x: i32, y: i32, board: &Board) -> Option<MoveObstacle> {
    for (dx, dy) in shape.occupied_cells() {
        let bx = x + dx;
        let by = y + dy;
        if by >= HEIGHT {
            return Some(MoveObstacle::Floor);
        }
        if !(0..WIDTH).contains(&bx) {
            return Some(MoveObstacle::Base);
        }
        if board.is_cell_occupied(bx, by) {
            return Some(MoveObstacle::Base);
        }
    }
    None
}

/// Checks a rotation candidate at `(x, y)` against the field.
///
/// The whole shape is scanned and a later violation overwrites an earlier
/// one; the kick recovery keys off the final report, so the scan order is
/// part of the rotation feel and must stay row-major.
#[must_use]
pub fn rotate_obstacle(
    shape: &PieceShape,
    x: i32,
    y: i32,
    board: &Board,
) -> Option<RotateObstacle> {
    let mut obstacle = None;
    for (dx, dy) in shape.occupied_cells() {
        let bx = x + dx;
        let by = y + dy;
        if by >= HEIGHT {
            obstacle = Some(RotateObstacle::Floor);
        } else if bx < 0 {
            obstacle = Some(RotateObstacle::Left);
        } else if bx >= WIDTH {
            obstacle = Some(RotateObstacle::Right);
        } else if board.is_cell_occupied(bx, by) {
            obstacle = Some(RotateObstacle::Base);
        }
    }
    obstacle
}
