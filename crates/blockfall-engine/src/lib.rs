//! Core engine for a falling-block puzzle game.
//!
//! The crate owns the playing field, the falling piece, and the scoring
//! state, and advances them through a deterministic finite-state machine.
//! Everything a frontend needs is reachable through two calls:
//!
//! 1. [`GameEngine::handle_input`] records at most one pending action.
//! 2. [`GameEngine::step`] runs exactly one state action and returns a
//!    read-only [`Snapshot`] for rendering.
//!
//! Rendering, key mapping, and the event loop live outside this crate.
//! The two environment effects the engine needs are injected as
//! capabilities: a monotonic [`Clock`] for the gravity timer and a
//! [`ScoreStore`] for the persisted high score.

pub use self::{core::*, engine::*};

pub mod core;
pub mod engine;

/// Failure of the injected high-score storage.
///
/// Storage trouble never interrupts gameplay: a failed read falls back to
/// a high score of zero and a failed write is dropped.
#[derive(Debug, derive_more::Display, derive_more::Error)]
pub enum ScoreStoreError {
    #[display("failed to read stored high score")]
    Read,
    #[display("failed to write high score")]
    Write,
}
