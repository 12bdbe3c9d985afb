use serde::{Deserialize, Serialize};

use super::{game::RunFlag, scoreboard::Scoreboard};
use crate::core::{Board, Cell, FIELD_HEIGHT, FIELD_WIDTH, Piece, SHAPE_SIZE};

/// Read-only view of the engine for a presentation layer.
///
/// The falling piece is already composited into the board grid, so a
/// renderer never needs piece coordinates; the preview of the next piece
/// comes as its bare shape grid. One snapshot is produced per
/// [`GameEngine::step`](super::GameEngine::step) call.
///
/// [`RunFlag::Terminated`] marks the view of a torn-down engine: the
/// grids are empty and the caller should stop requesting snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub board: [[Cell; FIELD_WIDTH]; FIELD_HEIGHT],
    pub next: [[Cell; SHAPE_SIZE]; SHAPE_SIZE],
    pub score: u32,
    pub high_score: u32,
    pub level: u32,
    pub speed: u32,
    pub flag: RunFlag,
}

impl Snapshot {
    pub(crate) fn compose(
        board: &Board,
        current: Option<&Piece>,
        next: &Piece,
        scoreboard: &Scoreboard,
        flag: RunFlag,
    ) -> Self {
        // Compositing reuses the commit path on a copy of the field, so the
        // falling piece is clipped at the top edge exactly like a settling
        // one.
        let mut composed = board.clone();
        if let Some(piece) = current {
            composed.commit(piece);
        }
        Self {
            board: *composed.rows(),
            next: *next.shape().grid(),
            score: scoreboard.score(),
            high_score: scoreboard.high_score(),
            level: scoreboard.level(),
            speed: scoreboard.speed(),
            flag,
        }
    }

    pub(crate) fn terminated() -> Self {
        Self {
            board: [[Cell::Empty; FIELD_WIDTH]; FIELD_HEIGHT],
            next: [[Cell::Empty; SHAPE_SIZE]; SHAPE_SIZE],
            score: 0,
            high_score: 0,
            level: 1,
            speed: 0,
            flag: RunFlag::Terminated,
        }
    }
}
