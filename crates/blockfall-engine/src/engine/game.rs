use rand::Rng as _;
use serde::{Deserialize, Serialize};

use super::{
    clock::{Clock, SystemClock},
    piece_source::{PieceSeed, PieceSource},
    scoreboard::{ScoreStore, Scoreboard},
    snapshot::Snapshot,
};
use crate::core::{Board, Piece, RotateObstacle, move_obstacle, rotate_obstacle};

/// Player intent delivered to the engine, at most one per step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    Pause,
    Terminate,
    Left,
    Right,
    Up,
    Down,
    Rotate,
}

/// The engine's finite states. Exactly one is active per step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum EngineState {
    /// Waiting on the start screen.
    Start,
    /// Promoting the next piece into play.
    Spawn,
    /// The piece is falling and steerable.
    Moving,
    /// One gravity step is due.
    Shifting,
    /// The piece has landed and settles into the field.
    Attaching,
    /// Gameplay suspended.
    Pause,
    /// The spawned piece collided; the session is over.
    GameOver,
    /// Terminal: the engine is torn down.
    Exit,
}

/// Coarse run indicator exposed through the snapshot.
///
/// `Terminated` is terminal and doubles as the "stop requesting
/// snapshots" signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, derive_more::IsVariant)]
pub enum RunFlag {
    Running,
    Paused,
    AwaitingStart,
    Terminated,
}

/// The game engine: owns field, pieces, and scoring, and advances them one
/// discrete tick per [`step`](Self::step) call.
///
/// The engine is single-threaded and synchronous. Time enters only through
/// the injected [`Clock`], compared against the last gravity tick; the
/// high score leaves only through the injected [`ScoreStore`]. Rejected
/// moves leave the state exactly as it was.
pub struct GameEngine {
    board: Board,
    current: Option<Piece>,
    next: Piece,
    source: PieceSource,
    scoreboard: Scoreboard,
    state: EngineState,
    flag: RunFlag,
    pending: Option<Action>,
    last_tick_ms: u64,
    clock: Box<dyn Clock>,
}

impl std::fmt::Debug for GameEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameEngine")
            .field("state", &self.state)
            .field("flag", &self.flag)
            .field("current", &self.current)
            .field("scoreboard", &self.scoreboard)
            .finish_non_exhaustive()
    }
}

impl GameEngine {
    /// Creates an engine with a random piece seed and the real clock.
    #[must_use]
    pub fn new(store: Box<dyn ScoreStore>) -> Self {
        Self::with_seed(store, rand::rng().random())
    }

    /// Like [`Self::new`], but with a deterministic piece sequence.
    #[must_use]
    pub fn with_seed(store: Box<dyn ScoreStore>, seed: PieceSeed) -> Self {
        Self::with_parts(store, seed, Box::new(SystemClock::new()))
    }

    /// Fully injected constructor; tests drive the clock by hand.
    #[must_use]
    pub fn with_parts(store: Box<dyn ScoreStore>, seed: PieceSeed, clock: Box<dyn Clock>) -> Self {
        let mut source = PieceSource::with_seed(seed);
        let next = source.next_piece();
        let last_tick_ms = clock.now_ms();
        Self {
            board: Board::EMPTY,
            current: None,
            next,
            source,
            scoreboard: Scoreboard::new(store),
            state: EngineState::Start,
            flag: RunFlag::Running,
            pending: None,
            last_tick_ms,
            clock,
        }
    }

    #[must_use]
    pub fn state(&self) -> EngineState {
        self.state
    }

    #[must_use]
    pub fn flag(&self) -> RunFlag {
        self.flag
    }

    #[must_use]
    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Records the player's intent for the next step.
    ///
    /// `hold = false` means "no event this tick": it clears any pending
    /// intent so the step evaluates elapsed-time effects only. There is no
    /// queue; a later call overwrites an earlier one.
    pub fn handle_input(&mut self, action: Action, hold: bool) {
        self.pending = hold.then_some(action);
    }

    /// Runs exactly one state action and returns the view to render.
    pub fn step(&mut self) -> Snapshot {
        let input = self.pending.take();
        match self.state {
            EngineState::Start => self.start_screen(input),
            EngineState::Spawn => self.spawn_piece(),
            EngineState::Moving => self.move_piece(input),
            EngineState::Shifting => self.shift_piece(),
            EngineState::Attaching => self.attach_piece(),
            EngineState::Pause => self.paused(input),
            EngineState::GameOver => self.game_over(),
            EngineState::Exit => self.terminate(),
        }
        self.snapshot()
    }

    fn start_screen(&mut self, input: Option<Action>) {
        match input {
            Some(Action::Start) => {
                self.board.reset();
                self.scoreboard.reset();
                self.flag = RunFlag::Running;
                self.state = EngineState::Spawn;
            }
            Some(Action::Terminate) => self.state = EngineState::Exit,
            _ => {}
        }
    }

    fn spawn_piece(&mut self) {
        let current = std::mem::replace(&mut self.next, self.source.next_piece()).at_spawn();
        self.state = if move_obstacle(current.shape(), current.x(), current.y(), &self.board)
            .is_some()
        {
            EngineState::GameOver
        } else {
            EngineState::Moving
        };
        self.current = Some(current);
    }

    fn move_piece(&mut self, input: Option<Action>) {
        match input {
            Some(Action::Left) => self.try_translate(-1),
            Some(Action::Right) => self.try_translate(1),
            Some(Action::Down) => self.state = EngineState::Shifting,
            Some(Action::Rotate) => self.try_rotate(),
            Some(Action::Pause | Action::Terminate) => {
                self.flag = RunFlag::Paused;
                self.state = EngineState::Pause;
            }
            Some(Action::Start | Action::Up) | None => {}
        }
        // Gravity only applies if the input left the piece in flight.
        if self.state.is_moving() {
            let now = self.clock.now_ms();
            if now.saturating_sub(self.last_tick_ms) >= self.scoreboard.drop_interval_ms() {
                self.last_tick_ms = now;
                self.state = EngineState::Shifting;
            }
        }
    }

    fn try_translate(&mut self, dx: i32) {
        let Some(piece) = self.current else { return };
        let moved = piece.shifted(dx, 0);
        if move_obstacle(moved.shape(), moved.x(), moved.y(), &self.board).is_none() {
            self.current = Some(moved);
        }
    }

    /// Rotation with the fixed kick sequence.
    ///
    /// The candidate shape is tested at the current offset, then rescued
    /// through an ordered probe chain: one nudge off the right wall, up to
    /// two off the left wall, and on a base hit the offsets +1, -2, +3 in
    /// turn. The chain is intentionally not an exhaustive kick table; it
    /// rejects some rotations a full table would allow, and the probe
    /// order is part of the game feel. If every probe fails the rotation
    /// is discarded and the piece keeps its shape and position.
    fn try_rotate(&mut self) {
        let Some(piece) = self.current else { return };
        let candidate = piece.shape().rotated(piece.kind());
        let y = piece.y();
        let mut x = piece.x();

        let mut obstacle = rotate_obstacle(&candidate, x, y, &self.board);
        if obstacle == Some(RotateObstacle::Right) {
            x -= 1;
            obstacle = rotate_obstacle(&candidate, x, y, &self.board);
        }
        let mut nudges = 2;
        while obstacle == Some(RotateObstacle::Left) && nudges > 0 {
            x += 1;
            obstacle = rotate_obstacle(&candidate, x, y, &self.board);
            nudges -= 1;
        }
        for dx in [1, -2, 3] {
            if obstacle != Some(RotateObstacle::Base) {
                break;
            }
            x += dx;
            obstacle = rotate_obstacle(&candidate, x, y, &self.board);
        }

        if obstacle.is_none() {
            self.current = Some(piece.reshaped(candidate, x));
        }
    }

    fn shift_piece(&mut self) {
        let Some(piece) = self.current else {
            self.state = EngineState::Moving;
            return;
        };
        let dropped = piece.shifted(0, 1);
        if move_obstacle(dropped.shape(), dropped.x(), dropped.y(), &self.board).is_none() {
            self.current = Some(dropped);
            self.state = EngineState::Moving;
        } else {
            self.state = EngineState::Attaching;
        }
    }

    fn attach_piece(&mut self) {
        if let Some(piece) = &self.current {
            self.board.commit(piece);
        }
        let cleared = self.board.clear_full_lines();
        if cleared > 0 {
            self.scoreboard.apply_clear(cleared);
        }
        self.state = EngineState::Spawn;
    }

    fn paused(&mut self, input: Option<Action>) {
        match input {
            Some(Action::Pause) => {
                self.flag = RunFlag::Running;
                self.state = EngineState::Moving;
            }
            Some(Action::Terminate) => self.state = EngineState::Exit,
            _ => {}
        }
    }

    fn game_over(&mut self) {
        self.scoreboard.persist_record();
        self.flag = RunFlag::AwaitingStart;
        self.state = EngineState::Start;
    }

    /// Tears the engine down: persists a record score, resets the owned
    /// state, and flies the terminal flag. A second pass is a no-op, so
    /// repeated terminate requests stay safe.
    fn terminate(&mut self) {
        if self.flag.is_terminated() {
            return;
        }
        self.scoreboard.persist_record();
        self.board.reset();
        self.current = None;
        self.flag = RunFlag::Terminated;
    }

    fn snapshot(&self) -> Snapshot {
        if self.flag.is_terminated() {
            Snapshot::terminated()
        } else {
            Snapshot::compose(
                &self.board,
                self.current.as_ref(),
                &self.next,
                &self.scoreboard,
                self.flag,
            )
        }
    }
}
