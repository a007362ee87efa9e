use std::{fmt::Write as _, str::FromStr};

use rand::{
    Rng, SeedableRng as _,
    distr::{Distribution, StandardUniform},
};
use rand_pcg::Pcg32;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::PieceKind;

/// Picks the kind of every spawned piece, uniformly from the 7-entry catalogue.
///
/// The generator is seeded once when the session starts and keeps its state
/// for the whole session, so a given [`PieceSeed`] always yields the same
/// sequence of pieces.
///
/// # Example
///
/// ```
/// use blockfall_engine::{PieceGenerator, PieceSeed};
///
/// let seed = PieceSeed::from(42);
/// let mut a = PieceGenerator::with_seed(seed);
/// let mut b = PieceGenerator::with_seed(seed);
///
/// for _ in 0..10 {
///     assert_eq!(a.next_kind(), b.next_kind());
/// }
/// ```
#[derive(Debug, Clone)]
pub struct PieceGenerator {
    seed: PieceSeed,
    rng: Pcg32,
}

/// Seed for deterministic piece generation.
///
/// This is a 128-bit (16-byte) seed used to initialize the random number
/// generator. Using the same seed produces the same sequence of pieces,
/// which makes recorded sessions replayable and tests deterministic.
///
/// Serialized and parsed as a 32-character hex string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PieceSeed([u8; 16]);

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("invalid hex seed: {reason}")]
pub struct ParsePieceSeedError {
    reason: String,
}

impl FromStr for PieceSeed {
    type Err = ParsePieceSeedError;

    fn from_str(hex_str: &str) -> Result<Self, Self::Err> {
        if hex_str.len() != 32 {
            return Err(ParsePieceSeedError {
                reason: format!("expected 32 characters, got {}", hex_str.len()),
            });
        }
        let num = u128::from_str_radix(hex_str, 16).map_err(|e| ParsePieceSeedError {
            reason: format!("{hex_str} ({e})"),
        })?;
        Ok(Self(num.to_be_bytes()))
    }
}

impl From<u64> for PieceSeed {
    fn from(value: u64) -> Self {
        Self(u128::from(value).to_be_bytes())
    }
}

impl Serialize for PieceSeed {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let num = u128::from_be_bytes(self.0);
        let mut hex_str = String::with_capacity(2 * self.0.len());
        write!(&mut hex_str, "{num:032x}").map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&hex_str)
    }
}

impl<'de> Deserialize<'de> for PieceSeed {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let hex_str = String::deserialize(deserializer)?;
        hex_str.parse().map_err(serde::de::Error::custom)
    }
}

/// Allows generating random `PieceSeed` values using the standard random distribution.
impl Distribution<PieceSeed> for StandardUniform {
    fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> PieceSeed {
        let mut seed = [0; 16];
        rng.fill(&mut seed);
        PieceSeed(seed)
    }
}

impl PieceGenerator {
    /// Creates a generator whose whole piece sequence is fixed by `seed`.
    #[must_use]
    pub fn with_seed(seed: PieceSeed) -> Self {
        Self {
            seed,
            rng: Pcg32::from_seed(seed.0),
        }
    }

    /// Returns the seed this generator was created with.
    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }

    /// Draws the kind of the next piece.
    pub fn next_kind(&mut self) -> PieceKind {
        self.rng.random()
    }
}
