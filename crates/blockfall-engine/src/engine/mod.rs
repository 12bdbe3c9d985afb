//! Game engine logic and state management.
//!
//! This module drives the core data structures through one game:
//!
//! - [`GameEngine`] - the finite-state machine owning board, pieces, and
//!   scoring
//! - [`PieceSource`] - seeded randomizer producing the next piece
//! - [`Scoreboard`] - line-clear scoring, level/speed curve, high-score
//!   persistence
//! - [`Snapshot`] - the read-only view handed to a presentation layer
//! - [`Clock`] / [`ScoreStore`] - injected environment capabilities
//!
//! # Game flow
//!
//! One [`GameEngine::step`] call runs exactly one state action:
//!
//! 1. `Start` waits for the start action and resets the session
//! 2. `Spawn` promotes the next piece (or ends the game if it collides)
//! 3. `Moving` applies player input and the gravity timer
//! 4. `Shifting` drops the piece one row, `Attaching` settles it
//! 5. line clears feed the scoreboard, then back to `Spawn`
//!
//! Pause, game-over, and exit transitions are reachable from every
//! non-terminal state via the corresponding actions.

pub use self::{clock::*, game::*, piece_source::*, scoreboard::*, snapshot::*};

mod clock;
mod game;
mod piece_source;
mod scoreboard;
mod snapshot;
