//! Dice notation (`NdS`, `NdS+M`, `NdS-M`).

use std::fmt;
use std::str::FromStr;

use crate::env::RngSource;

/// Errors produced when parsing dice notation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DiceParseError {
    #[error("dice notation '{0}' is missing the 'd' separator")]
    MissingSeparator(String),

    #[error("dice notation '{0}' has an invalid number")]
    InvalidNumber(String),

    #[error("dice notation '{0}' must roll at least one die with at least one side")]
    Empty(String),
}

/// A dice expression such as `2d6+1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct DiceRoll {
    pub count: u32,
    pub sides: u32,
    pub modifier: i32,
}

impl DiceRoll {
    pub const fn new(count: u32, sides: u32) -> Self {
        Self {
            count,
            sides,
            modifier: 0,
        }
    }

    #[must_use]
    pub const fn with_modifier(mut self, modifier: i32) -> Self {
        self.modifier = modifier;
        self
    }

    /// Smallest possible total.
    pub fn min(&self) -> u32 {
        (self.count as i32 + self.modifier).max(0) as u32
    }

    /// Largest possible total.
    pub fn max(&self) -> u32 {
        ((self.count * self.sides) as i32 + self.modifier).max(0) as u32
    }

    /// Rolls every die in order and adds the modifier, floored at 0.
    pub fn roll<R: RngSource + ?Sized>(&self, rng: &mut R) -> u32 {
        let faces: u32 = (0..self.count).map(|_| rng.roll_die(self.sides)).sum();
        (faces as i64 + i64::from(self.modifier)).max(0) as u32
    }
}

impl fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}d{}", self.count, self.sides)?;
        match self.modifier {
            0 => Ok(()),
            m if m > 0 => write!(f, "+{m}"),
            m => write!(f, "{m}"),
        }
    }
}

impl FromStr for DiceRoll {
    type Err = DiceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim().to_ascii_lowercase();
        let (count, rest) = text
            .split_once('d')
            .ok_or_else(|| DiceParseError::MissingSeparator(s.to_string()))?;

        let (sides, modifier) = match rest.find(['+', '-']) {
            Some(at) => (&rest[..at], &rest[at..]),
            None => (rest, ""),
        };

        let invalid = || DiceParseError::InvalidNumber(s.to_string());
        // "d6" is shorthand for "1d6"
        let count: u32 = if count.is_empty() {
            1
        } else {
            count.parse().map_err(|_| invalid())?
        };
        let sides: u32 = sides.parse().map_err(|_| invalid())?;
        let modifier: i32 = if modifier.is_empty() {
            0
        } else {
            modifier
                .trim_start_matches('+')
                .parse()
                .map_err(|_| invalid())?
        };

        if count == 0 || sides == 0 {
            return Err(DiceParseError::Empty(s.to_string()));
        }

        Ok(Self {
            count,
            sides,
            modifier,
        })
    }
}

impl TryFrom<String> for DiceRoll {
    type Error = DiceParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DiceRoll> for String {
    fn from(value: DiceRoll) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{PcgRng, ScriptedRng};

    #[test]
    fn parses_common_notation() {
        assert_eq!("1d8".parse::<DiceRoll>(), Ok(DiceRoll::new(1, 8)));
        assert_eq!(
            "2d6+3".parse::<DiceRoll>(),
            Ok(DiceRoll::new(2, 6).with_modifier(3))
        );
        assert_eq!(
            "1D4-1".parse::<DiceRoll>(),
            Ok(DiceRoll::new(1, 4).with_modifier(-1))
        );
        assert_eq!("d20".parse::<DiceRoll>(), Ok(DiceRoll::new(1, 20)));
    }

    #[test]
    fn rejects_malformed_notation() {
        assert!(matches!(
            "12".parse::<DiceRoll>(),
            Err(DiceParseError::MissingSeparator(_))
        ));
        assert!(matches!(
            "2d".parse::<DiceRoll>(),
            Err(DiceParseError::InvalidNumber(_))
        ));
        assert!(matches!(
            "0d6".parse::<DiceRoll>(),
            Err(DiceParseError::Empty(_))
        ));
    }

    #[test]
    fn display_is_canonical() {
        assert_eq!(DiceRoll::new(2, 10).to_string(), "2d10");
        assert_eq!(DiceRoll::new(1, 6).with_modifier(2).to_string(), "1d6+2");
        assert_eq!(DiceRoll::new(1, 6).with_modifier(-2).to_string(), "1d6-2");
    }

    #[test]
    fn roll_sums_each_die_plus_modifier() {
        let mut rng = ScriptedRng::die_faces(&[3, 5]);
        assert_eq!(DiceRoll::new(2, 6).with_modifier(1).roll(&mut rng), 9);
    }

    #[test]
    fn roll_stays_within_bounds() {
        let dice = DiceRoll::new(2, 12);
        let mut rng = PcgRng::seeded(17);
        for _ in 0..500 {
            let total = dice.roll(&mut rng);
            assert!((dice.min()..=dice.max()).contains(&total));
        }
    }
}
