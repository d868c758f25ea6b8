//! Favor and hinder - the advantage/disadvantage step applied to a check.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Net favor/hinder on a single roll.
///
/// Favor adds a d6 to the check, hinder subtracts one. Multiple sources never
/// stack beyond a single step in either direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FavorHinder {
    Hinder,
    #[default]
    None,
    Favor,
}

impl FavorHinder {
    /// Clamp an arbitrary favor-minus-hinder count into a single step.
    pub fn from_net(net: i32) -> Self {
        match net.signum() {
            1 => Self::Favor,
            -1 => Self::Hinder,
            _ => Self::None,
        }
    }

    /// The signed step: -1, 0 or +1.
    pub fn as_i32(&self) -> i32 {
        match self {
            Self::Hinder => -1,
            Self::None => 0,
            Self::Favor => 1,
        }
    }

    /// Combine two independent steps, cancelling one-for-one.
    pub fn combine(self, other: FavorHinder) -> Self {
        Self::from_net(self.as_i32() + other.as_i32())
    }
}

impl From<i32> for FavorHinder {
    fn from(net: i32) -> Self {
        Self::from_net(net)
    }
}

impl fmt::Display for FavorHinder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Hinder => "hinder",
            Self::None => "none",
            Self::Favor => "favor",
        };
        write!(f, "{}", label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn net_counts_clamp_to_one_step() {
        assert_eq!(FavorHinder::from_net(3), FavorHinder::Favor);
        assert_eq!(FavorHinder::from_net(-2), FavorHinder::Hinder);
        assert_eq!(FavorHinder::from_net(0), FavorHinder::None);
    }

    #[test]
    fn combine_cancels() {
        assert_eq!(
            FavorHinder::Favor.combine(FavorHinder::Hinder),
            FavorHinder::None
        );
        assert_eq!(
            FavorHinder::Favor.combine(FavorHinder::Favor),
            FavorHinder::Favor
        );
        assert_eq!(
            FavorHinder::None.combine(FavorHinder::Hinder),
            FavorHinder::Hinder
        );
    }
}
