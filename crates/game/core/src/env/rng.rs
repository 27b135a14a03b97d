//! Deterministic random number source.
//!
//! A combat session draws every roll from a single sequential stream. Given
//! the same seed and the same sequence of public calls, the stream yields
//! identical values, so an encounter can be replayed exactly.

/// Sequential source of uniformly distributed random values.
///
/// Only [`next_u32`](RngSource::next_u32) must be implemented; everything else
/// is derived from it so that every implementation consumes the stream in the
/// same order for the same call.
pub trait RngSource {
    /// Generate the next raw 32-bit value and advance the stream.
    fn next_u32(&mut self) -> u32;

    /// Generate an integer in `[min, max]` inclusive.
    fn next_int(&mut self, min: u32, max: u32) -> u32 {
        if min >= max {
            return min;
        }
        let range = u64::from(max - min) + 1;
        min + (u64::from(self.next_u32()) % range) as u32
    }

    /// Generate a float in `[0, 1)`.
    fn next_float(&mut self) -> f64 {
        f64::from(self.next_u32()) / (f64::from(u32::MAX) + 1.0)
    }

    /// Returns true with probability `percent` / 100.
    fn percent_chance(&mut self, percent: f64) -> bool {
        self.next_float() * 100.0 < percent
    }

    /// Roll a die with N sides (1-N inclusive).
    fn roll_die(&mut self, sides: u32) -> u32 {
        self.next_int(1, sides.max(1))
    }

    /// Roll a d20.
    fn roll_d20(&mut self) -> u32 {
        self.roll_die(20)
    }

    /// Roll a d100 (1-100 inclusive).
    fn roll_d100(&mut self) -> u32 {
        self.roll_die(100)
    }

    /// Pick one element uniformly. Returns `None` for an empty slice.
    fn choose<'s, T>(&mut self, items: &'s [T]) -> Option<&'s T>
    where
        Self: Sized,
    {
        if items.is_empty() {
            return None;
        }
        let index = self.next_int(0, items.len() as u32 - 1) as usize;
        items.get(index)
    }

    /// Fisher–Yates shuffle in place.
    fn shuffle<T>(&mut self, items: &mut [T])
    where
        Self: Sized,
    {
        for i in (1..items.len()).rev() {
            let j = self.next_int(0, i as u32) as usize;
            items.swap(i, j);
        }
    }
}

/// PCG random number generator (Permuted Congruential Generator).
///
/// Uses the PCG-XSH-RR variant: 64-bit LCG state, 32-bit permuted output.
///
/// # References
///
/// - PCG paper: <https://www.pcg-random.org/>
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PcgRng {
    state: u64,
}

impl PcgRng {
    /// PCG multiplier constant.
    const MULTIPLIER: u64 = 6364136223846793005;

    /// PCG increment constant.
    const INCREMENT: u64 = 1442695040888963407;

    /// Creates a stream from a session seed.
    pub fn seeded(seed: u64) -> Self {
        // Scramble the seed so that small neighbouring seeds diverge at once.
        let mut state = seed ^ 0x9e3779b97f4a7c15;
        state ^= state >> 33;
        state = state.wrapping_mul(0xff51afd7ed558ccd);
        state ^= state >> 33;
        Self { state }
    }

    /// `state' = (state × multiplier + increment) mod 2^64`
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation.
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }
}

impl RngSource for PcgRng {
    fn next_u32(&mut self) -> u32 {
        self.state = Self::pcg_step(self.state);
        Self::pcg_output(self.state)
    }
}

/// Replays a fixed list of raw values, cycling when exhausted.
///
/// Values are returned verbatim from `next_u32`, so a value `v` drawn through
/// `roll_die(sides)` yields `v % sides + 1`. Use [`ScriptedRng::die_faces`]
/// to script die faces directly.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScriptedRng {
    values: Vec<u32>,
    cursor: usize,
}

impl ScriptedRng {
    pub fn new(values: Vec<u32>) -> Self {
        Self { values, cursor: 0 }
    }

    /// Scripts die faces: face `f` is stored as `f - 1` so that any die with
    /// at least `f` sides rolls exactly `f`.
    pub fn die_faces(faces: &[u32]) -> Self {
        Self::new(faces.iter().map(|f| f.saturating_sub(1)).collect())
    }

    /// Number of values drawn so far.
    pub fn draws(&self) -> usize {
        self.cursor
    }
}

impl RngSource for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        if self.values.is_empty() {
            return 0;
        }
        let value = self.values[self.cursor % self.values.len()];
        self.cursor += 1;
        value
    }
}
