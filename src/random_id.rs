//! Random integer ids for ephemeral, client-side identifiers
//!
//! Not suitable where unpredictability matters (tokens, secrets). Use a
//! CSPRNG-backed API for those.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::consts::{RANDOM_ID_MAX, RANDOM_ID_MIN};
use crate::error::InvalidRangeError;

/// Inclusive id range, always `min <= max`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawIdRange", into = "RawIdRange")]
pub struct IdRange {
    min: i64,
    max: i64,
}

#[derive(Serialize, Deserialize)]
struct RawIdRange {
    min: i64,
    max: i64,
}

impl TryFrom<RawIdRange> for IdRange {
    type Error = InvalidRangeError;

    fn try_from(raw: RawIdRange) -> Result<Self, Self::Error> {
        IdRange::new(raw.min, raw.max)
    }
}

impl From<IdRange> for RawIdRange {
    fn from(range: IdRange) -> Self {
        RawIdRange {
            min: range.min,
            max: range.max,
        }
    }
}

impl Default for IdRange {
    fn default() -> Self {
        Self {
            min: RANDOM_ID_MIN,
            max: RANDOM_ID_MAX,
        }
    }
}

impl IdRange {
    pub fn new(min: i64, max: i64) -> Result<Self, InvalidRangeError> {
        if min > max {
            return Err(InvalidRangeError { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn min(&self) -> i64 {
        self.min
    }

    pub fn max(&self) -> i64 {
        self.max
    }

    pub fn contains(&self, id: i64) -> bool {
        (self.min..=self.max).contains(&id)
    }

    /// Uniformly sample one id from the range
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> i64 {
        rng.random_range(self.min..=self.max)
    }
}

/// Random id in the default range `[100_000_000, 900_000_000]`
pub fn random_id() -> i64 {
    IdRange::default().sample(&mut rand::rng())
}

/// Random id in `[min, max]`
pub fn random_id_in(min: i64, max: i64) -> Result<i64, InvalidRangeError> {
    let range = IdRange::new(min, max)?;
    Ok(range.sample(&mut rand::rng()))
}

/// Reproducible id sequence from a seed
///
/// Same seed and range always yield the same ids, which makes fixtures and
/// replays stable.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    rng: Pcg32,
    range: IdRange,
}

impl IdGenerator {
    pub fn seeded(seed: u64, range: IdRange) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            range,
        }
    }

    /// Seeded from the thread-local generator
    pub fn from_entropy(range: IdRange) -> Self {
        Self {
            rng: Pcg32::from_rng(&mut rand::rng()),
            range,
        }
    }

    pub fn range(&self) -> IdRange {
        self.range
    }

    pub fn next_id(&mut self) -> i64 {
        self.range.sample(&mut self.rng)
    }
}

impl Iterator for IdGenerator {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        Some(self.next_id())
    }
}
