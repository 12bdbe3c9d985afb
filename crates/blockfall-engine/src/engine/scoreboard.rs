use std::{cell::Cell, fs, path::PathBuf, rc::Rc};

use crate::ScoreStoreError;

/// Highest reachable level; the level freezes here no matter how far the
/// score climbs.
const MAX_LEVEL: u32 = 10;
/// Score needed per level step.
const SCORE_PER_LEVEL: u32 = 600;
/// Gravity interval at level 1.
const BASE_DROP_MS: u64 = 700;
/// Gravity speed-up per speed step.
const DROP_STEP_MS: u64 = 52;

/// Persisted high-score capability.
///
/// The engine reads once at startup (and again on every game start) and
/// writes whenever a finished or terminated game beat the stored value.
/// Implementations own durability; the engine treats a failed read as
/// "no high score yet" and drops a failed write.
pub trait ScoreStore {
    fn read(&self) -> Result<u32, ScoreStoreError>;
    fn write(&mut self, score: u32) -> Result<(), ScoreStoreError>;
}

/// High score stored as a decimal integer in a plain text file.
#[derive(Debug)]
pub struct FileScoreStore {
    path: PathBuf,
}

impl FileScoreStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl ScoreStore for FileScoreStore {
    fn read(&self) -> Result<u32, ScoreStoreError> {
        let text = fs::read_to_string(&self.path).map_err(|_| ScoreStoreError::Read)?;
        text.trim().parse().map_err(|_| ScoreStoreError::Read)
    }

    fn write(&mut self, score: u32) -> Result<(), ScoreStoreError> {
        fs::write(&self.path, score.to_string()).map_err(|_| ScoreStoreError::Write)
    }
}

/// In-memory store for tests and throwaway sessions.
///
/// Clones share the same value, so a test can hand one clone to the
/// engine and inspect the other after play.
#[derive(Debug, Clone, Default)]
pub struct MemoryScoreStore {
    value: Rc<Cell<u32>>,
}

impl MemoryScoreStore {
    #[must_use]
    pub fn new(initial: u32) -> Self {
        Self {
            value: Rc::new(Cell::new(initial)),
        }
    }

    #[must_use]
    pub fn value(&self) -> u32 {
        self.value.get()
    }
}

impl ScoreStore for MemoryScoreStore {
    fn read(&self) -> Result<u32, ScoreStoreError> {
        Ok(self.value.get())
    }

    fn write(&mut self, score: u32) -> Result<(), ScoreStoreError> {
        self.value.set(score);
        Ok(())
    }
}

/// Scoring state of one session: score, level/speed curve, and the
/// persisted high score.
///
/// Line clears are worth `100 * (2^n - 1)`: 100, 300, 700 and 1500 points
/// for one to four rows. The level follows the score (one step per 600
/// points) until it freezes at [`MAX_LEVEL`]; the speed is always
/// `level - 1` and feeds the gravity interval.
pub struct Scoreboard {
    score: u32,
    level: u32,
    speed: u32,
    high_score: u32,
    store: Box<dyn ScoreStore>,
}

impl std::fmt::Debug for Scoreboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scoreboard")
            .field("score", &self.score)
            .field("level", &self.level)
            .field("speed", &self.speed)
            .field("high_score", &self.high_score)
            .finish_non_exhaustive()
    }
}

impl Scoreboard {
    #[must_use]
    pub fn new(store: Box<dyn ScoreStore>) -> Self {
        let mut scoreboard = Self {
            score: 0,
            level: 1,
            speed: 0,
            high_score: 0,
            store,
        };
        scoreboard.reload_high_score();
        scoreboard
    }

    #[must_use]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[must_use]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub fn speed(&self) -> u32 {
        self.speed
    }

    #[must_use]
    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    /// Resets the session counters and re-reads the stored high score.
    pub fn reset(&mut self) {
        self.score = 0;
        self.level = 1;
        self.speed = 0;
        self.reload_high_score();
    }

    pub fn reload_high_score(&mut self) {
        self.high_score = self.store.read().unwrap_or(0);
    }

    /// Awards the cleared rows and recomputes level and speed.
    pub fn apply_clear(&mut self, lines: usize) {
        self.score += line_score(lines);
        self.update_level_and_speed();
    }

    fn update_level_and_speed(&mut self) {
        if self.level <= MAX_LEVEL {
            self.level = (self.score / SCORE_PER_LEVEL + 1).min(MAX_LEVEL);
            self.speed = self.level - 1;
        }
    }

    /// Writes the score through the store if it beats the stored value.
    ///
    /// The in-memory high score is deliberately left alone: the session
    /// keeps showing the value it started against, and the next game start
    /// reloads the updated one.
    pub fn persist_record(&mut self) {
        if self.score > self.high_score {
            let _ = self.store.write(self.score);
        }
    }

    /// Milliseconds between gravity drops at the current speed.
    #[must_use]
    pub fn drop_interval_ms(&self) -> u64 {
        BASE_DROP_MS - u64::from(self.speed) * DROP_STEP_MS
    }
}

/// `100 * (2^n - 1)` points for `n` simultaneously cleared rows.
fn line_score(lines: usize) -> u32 {
    100 * ((1u32 << lines) - 1)
}
