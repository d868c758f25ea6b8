//! Stat value objects - the six primary attributes, level, and save types.
//!
//! Provides type safety for stat references instead of using magic strings
//! like "might" or "dex" throughout the rules.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;

/// Lowest value a primary stat may take.
pub const STAT_MIN: i32 = 1;
/// Highest value a primary stat may take.
pub const STAT_MAX: i32 = 10;

/// Primary character attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stat {
    /// Might - physical power and toughness
    Might,
    /// Dexterity - agility and reflexes
    Dexterity,
    /// Awareness - perception and instinct
    Awareness,
    /// Reason - intellect and memory
    Reason,
    /// Presence - force of personality
    Presence,
    /// Luck - fortune, also the size of the luck pool
    Luck,
}

impl Stat {
    /// Returns the lowercase key used in configuration and roll data.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Might => "might",
            Self::Dexterity => "dexterity",
            Self::Awareness => "awareness",
            Self::Reason => "reason",
            Self::Presence => "presence",
            Self::Luck => "luck",
        }
    }

    /// Returns the capitalised display name.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Might => "Might",
            Self::Dexterity => "Dexterity",
            Self::Awareness => "Awareness",
            Self::Reason => "Reason",
            Self::Presence => "Presence",
            Self::Luck => "Luck",
        }
    }

    pub fn all() -> [Stat; 6] {
        [
            Self::Might,
            Self::Dexterity,
            Self::Awareness,
            Self::Reason,
            Self::Presence,
            Self::Luck,
        ]
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Stat {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "might" | "mit" => Ok(Self::Might),
            "dexterity" | "dex" => Ok(Self::Dexterity),
            "awareness" | "awr" => Ok(Self::Awareness),
            "reason" | "rsn" => Ok(Self::Reason),
            "presence" | "prs" => Ok(Self::Presence),
            "luck" | "luk" => Ok(Self::Luck),
            _ => Err(DomainError::parse(format!("Unknown stat: {}", s))),
        }
    }
}

/// The six primary stats of a character.
///
/// Deserialization range-checks every value like [`PrimaryStats::new`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawPrimaryStats")]
pub struct PrimaryStats {
    pub might: i32,
    pub dexterity: i32,
    pub awareness: i32,
    pub reason: i32,
    pub presence: i32,
    pub luck: i32,
}

/// Unchecked wire form of [`PrimaryStats`].
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawPrimaryStats {
    might: i32,
    dexterity: i32,
    awareness: i32,
    reason: i32,
    presence: i32,
    luck: i32,
}

impl TryFrom<RawPrimaryStats> for PrimaryStats {
    type Error = DomainError;

    fn try_from(raw: RawPrimaryStats) -> Result<Self, Self::Error> {
        Self::new(
            raw.might,
            raw.dexterity,
            raw.awareness,
            raw.reason,
            raw.presence,
            raw.luck,
        )
    }
}

impl PrimaryStats {
    /// Create validated stats; every value must lie in `[1, 10]`.
    pub fn new(
        might: i32,
        dexterity: i32,
        awareness: i32,
        reason: i32,
        presence: i32,
        luck: i32,
    ) -> Result<Self, DomainError> {
        let stats = Self {
            might,
            dexterity,
            awareness,
            reason,
            presence,
            luck,
        };
        stats.validate()?;
        Ok(stats)
    }

    /// Every stat set to the same value, unchecked. Handy for fixtures.
    pub fn uniform(value: i32) -> Self {
        Self {
            might: value,
            dexterity: value,
            awareness: value,
            reason: value,
            presence: value,
            luck: value,
        }
    }

    /// Check every stat against `[STAT_MIN, STAT_MAX]`.
    pub fn validate(&self) -> Result<(), DomainError> {
        for stat in Stat::all() {
            let value = self.get(stat);
            if !(STAT_MIN..=STAT_MAX).contains(&value) {
                return Err(DomainError::validation(format!(
                    "{} must be between {} and {}, got {}",
                    stat.display_name(),
                    STAT_MIN,
                    STAT_MAX,
                    value
                )));
            }
        }
        Ok(())
    }

    pub fn get(&self, stat: Stat) -> i32 {
        match stat {
            Stat::Might => self.might,
            Stat::Dexterity => self.dexterity,
            Stat::Awareness => self.awareness,
            Stat::Reason => self.reason,
            Stat::Presence => self.presence,
            Stat::Luck => self.luck,
        }
    }

    pub fn with(mut self, stat: Stat, value: i32) -> Self {
        match stat {
            Stat::Might => self.might = value,
            Stat::Dexterity => self.dexterity = value,
            Stat::Awareness => self.awareness = value,
            Stat::Reason => self.reason = value,
            Stat::Presence => self.presence = value,
            Stat::Luck => self.luck = value,
        }
        self
    }
}

impl Default for PrimaryStats {
    fn default() -> Self {
        Self::uniform(STAT_MIN)
    }
}

/// Character level, `1..=10`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Level(u8);

impl Level {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 10;

    pub fn new(value: u8) -> Result<Self, DomainError> {
        if !(Self::MIN..=Self::MAX).contains(&value) {
            return Err(DomainError::validation(format!(
                "Level must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                value
            )));
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Level {
    fn default() -> Self {
        Self(Self::MIN)
    }
}

impl TryFrom<u8> for Level {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.0
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The three saving throws.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveType {
    Reflex,
    Endure,
    Will,
}

impl SaveType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Reflex => "reflex",
            Self::Endure => "endure",
            Self::Will => "will",
        }
    }

    pub fn all() -> [SaveType; 3] {
        [Self::Reflex, Self::Endure, Self::Will]
    }
}

impl fmt::Display for SaveType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for SaveType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reflex" => Ok(Self::Reflex),
            "endure" => Ok(Self::Endure),
            "will" => Ok(Self::Will),
            _ => Err(DomainError::parse(format!("Unknown save type: {}", s))),
        }
    }
}
