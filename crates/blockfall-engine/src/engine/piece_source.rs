use std::fmt::Write as _;

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::core::{Piece, PieceKind, PieceShape};

/// Seed for deterministic piece generation.
///
/// 128 bits feeding the piece randomizer. The same seed reproduces the
/// same sequence of kinds and starting orientations, which is what makes
/// engine runs replayable in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

impl PieceSeed {
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(bytes)
    }
}

impl Serialize for PieceSeed {
    // Serialized as a 32-character hex string.
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let value = u128::from_be_bytes(self.0);
        let mut hex = String::with_capacity(32);
        write!(&mut hex, "{value:032x}").unwrap();
        serializer.serialize_str(&hex)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex = String::deserialize(deserializer)?;
        if hex.len() != 32 {
            return Err(serde::de::Error::custom(format!(
                "invalid seed: expected 32 hex characters, got {}",
                hex.len()
            )));
        }
        let value = u128::from_str_radix(&hex, 16)
            .map_err(|e| serde::de::Error::custom(format!("invalid seed: {hex} ({e})")))?;
        Ok(Self(value.to_be_bytes()))
    }
}

impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

/// Randomizer producing the next piece to play.
///
/// Kinds are drawn uniformly from the seven types, and every kind except
/// the rotation-invariant O additionally starts in a uniformly random
/// orientation: the canonical shape with zero to three rotation steps
/// applied.
#[derive(Debug, Clone)]
pub struct PieceSource {
    rng: Pcg32,
}

impl Default for PieceSource {
    fn default() -> Self {
        Self::new()
    }
}

impl PieceSource {
    /// Creates a source with a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::with_seed(rand::rng().random())
    }

    /// Like [`Self::new`], but deterministic for the given seed.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            rng: Pcg32::from_seed(seed.0),
        }
    }

    /// Draws the next piece, positioned at the spawn offset.
    pub fn next_piece(&mut self) -> Piece {
        let kind: PieceKind = self.rng.random();
        let mut shape = PieceShape::canonical(kind);
        if kind != PieceKind::O {
            for _ in 0..self.rng.random_range(0..4) {
                shape = shape.rotated(kind);
            }
        }
        Piece::new(kind, shape)
    }
}
