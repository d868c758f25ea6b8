//! Countdown dice: d6 → d4 → expired.
//!
//! Each step rolls the current die. A 1 or 2 shrinks it one size; a d4 that
//! shrinks ends the effect. An expired die stays expired.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DomainError;
use crate::random::{roll_die, RandomPort};

/// Highest roll on which the die shrinks.
pub const SHRINK_ON_OR_BELOW: i32 = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum CountdownDie {
    #[default]
    D6,
    D4,
    Expired,
}

impl CountdownDie {
    pub fn faces(&self) -> u8 {
        match self {
            Self::D6 => 6,
            Self::D4 => 4,
            Self::Expired => 0,
        }
    }

    pub fn is_expired(&self) -> bool {
        matches!(self, Self::Expired)
    }

    fn shrunk(&self) -> Self {
        match self {
            Self::D6 => Self::D4,
            Self::D4 | Self::Expired => Self::Expired,
        }
    }
}

impl TryFrom<u8> for CountdownDie {
    type Error = DomainError;

    fn try_from(faces: u8) -> Result<Self, Self::Error> {
        match faces {
            6 => Ok(Self::D6),
            4 => Ok(Self::D4),
            0 => Ok(Self::Expired),
            other => Err(DomainError::validation(format!(
                "Countdown die must be 6, 4 or 0, got {}",
                other
            ))),
        }
    }
}

impl From<CountdownDie> for u8 {
    fn from(die: CountdownDie) -> Self {
        die.faces()
    }
}

impl fmt::Display for CountdownDie {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expired => write!(f, "expired"),
            die => write!(f, "d{}", die.faces()),
        }
    }
}

/// One countdown step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownStep {
    pub previous: CountdownDie,
    /// `None` when the die was already expired
    pub roll: Option<i32>,
    pub next: CountdownDie,
    pub shrunk: bool,
    pub ended: bool,
    pub continues: bool,
}

/// Advance a countdown die by one roll.
pub fn step(current: CountdownDie, random: &dyn RandomPort) -> CountdownStep {
    if current.is_expired() {
        return CountdownStep {
            previous: current,
            roll: None,
            next: CountdownDie::Expired,
            shrunk: false,
            ended: true,
            continues: false,
        };
    }

    let roll = roll_die(random, current.faces() as u32);
    let shrunk = roll <= SHRINK_ON_OR_BELOW;
    let next = if shrunk { current.shrunk() } else { current };
    CountdownStep {
        previous: current,
        roll: Some(roll),
        next,
        shrunk,
        ended: next.is_expired(),
        continues: !next.is_expired(),
    }
}

/// Advance a countdown stored as a raw die size (6, 4 or 0).
pub fn step_faces(faces: u8, random: &dyn RandomPort) -> Result<CountdownStep, DomainError> {
    Ok(step(CountdownDie::try_from(faces)?, random))
}

/// A named effect running on a countdown die.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownEffect {
    pub name: String,
    pub die: CountdownDie,
}

impl CountdownEffect {
    pub fn new(name: impl Into<String>, die: CountdownDie) -> Self {
        Self {
            name: name.into(),
            die,
        }
    }
}

/// Result of ticking every countdown at once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountdownTick {
    /// Each effect with the step it took, in input order
    pub steps: Vec<(String, CountdownStep)>,
    /// Names of effects that ended on this tick
    pub ended: Vec<String>,
}

/// Step every effect in order and update its die in place.
///
/// Effects that were already expired do not roll and are not reported as
/// ending again.
pub fn tick_countdowns(effects: &mut [CountdownEffect], random: &dyn RandomPort) -> CountdownTick {
    let mut tick = CountdownTick::default();
    for effect in effects.iter_mut() {
        let was_expired = effect.die.is_expired();
        let result = step(effect.die, random);
        effect.die = result.next;
        if result.ended && !was_expired {
            tick.ended.push(effect.name.clone());
        }
        tick.steps.push((effect.name.clone(), result));
    }
    tick
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::FixedRandom;
    use proptest::prelude::*;

    #[test]
    fn high_roll_keeps_die() {
        let result = step(CountdownDie::D6, &FixedRandom::constant(3));
        assert_eq!(result.roll, Some(3));
        assert_eq!(result.next, CountdownDie::D6);
        assert!(!result.shrunk);
        assert!(result.continues);
    }

    #[test]
    fn low_roll_shrinks_d6_to_d4() {
        let result = step(CountdownDie::D6, &FixedRandom::constant(2));
        assert_eq!(result.next, CountdownDie::D4);
        assert!(result.shrunk);
        assert!(!result.ended);
        assert!(result.continues);
    }

    #[test]
    fn low_roll_on_d4_ends() {
        let result = step(CountdownDie::D4, &FixedRandom::constant(1));
        assert_eq!(result.next, CountdownDie::Expired);
        assert!(result.shrunk);
        assert!(result.ended);
        assert!(!result.continues);
    }

    #[test]
    fn expired_is_terminal_and_does_not_roll() {
        let random = FixedRandom::constant(6);
        let result = step(CountdownDie::Expired, &random);
        assert_eq!(result.roll, None);
        assert_eq!(result.next, CountdownDie::Expired);
        assert!(result.ended);
        assert!(!result.continues);
        assert_eq!(random.draws(), 0);
    }

    #[test]
    fn raw_sizes_are_validated() {
        assert!(step_faces(6, &FixedRandom::constant(4)).is_ok());
        assert!(step_faces(0, &FixedRandom::constant(4)).is_ok());
        assert!(matches!(
            step_faces(8, &FixedRandom::constant(4)),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn serde_uses_die_size() {
        assert_eq!(serde_json::to_string(&CountdownDie::D4).unwrap(), "4");
        let die: CountdownDie = serde_json::from_str("0").unwrap();
        assert_eq!(die, CountdownDie::Expired);
        assert!(serde_json::from_str::<CountdownDie>("8").is_err());
    }

    #[test]
    fn tick_reports_newly_ended_effects() {
        let mut effects = vec![
            CountdownEffect::new("Burning", CountdownDie::D4),
            CountdownEffect::new("Bless", CountdownDie::D6),
            CountdownEffect::new("Spent", CountdownDie::Expired),
        ];
        let tick = tick_countdowns(&mut effects, &FixedRandom::new(vec![1, 5]));
        assert_eq!(tick.ended, vec!["Burning"]);
        assert_eq!(tick.steps.len(), 3);
        assert_eq!(effects[0].die, CountdownDie::Expired);
        assert_eq!(effects[1].die, CountdownDie::D6);
        assert_eq!(effects[2].die, CountdownDie::Expired);
    }

    proptest! {
        #[test]
        fn transitions_follow_the_ladder(
            roll in 1..=6i32,
            start in prop::sample::select(vec![6u8, 4]),
        ) {
            let die = CountdownDie::try_from(start).unwrap();
            let result = step(die, &FixedRandom::constant(roll));
            let rolled = result.roll.unwrap();
            prop_assert!(rolled >= 1 && rolled <= start as i32);
            if rolled >= 3 {
                prop_assert_eq!(result.next, die);
            } else {
                prop_assert!(result.next.faces() < die.faces());
            }
            prop_assert_eq!(result.ended, !result.continues);
        }
    }
}
