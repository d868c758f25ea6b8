//! The d20 check.
//!
//! Roll a d20, add a d6 on favor or subtract one on hinder, add the flat
//! modifier and compare against the difficulty. Critical and fumble look at
//! the natural d20 only.

use serde::{Deserialize, Serialize};

use crate::error::DomainError;
use crate::random::{roll_die, RandomPort};
use crate::value_objects::{FavorHinder, SaveType};

use super::derived::{SecondaryStats, CRIT_MAX, CRIT_MIN};

pub const CHECK_DIE: u32 = 20;
pub const FAVOR_DIE: u32 = 6;

/// Inputs of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRequest {
    pub difficulty: i32,
    #[serde(default = "default_crit_threshold")]
    pub crit_threshold: i32,
    #[serde(default)]
    pub favor_hinder: FavorHinder,
    #[serde(default)]
    pub modifier: i32,
}

fn default_crit_threshold() -> i32 {
    CRIT_MAX
}

impl CheckRequest {
    pub fn new(difficulty: i32) -> Self {
        Self {
            difficulty,
            crit_threshold: CRIT_MAX,
            favor_hinder: FavorHinder::None,
            modifier: 0,
        }
    }

    pub fn with_crit_threshold(mut self, threshold: i32) -> Self {
        self.crit_threshold = threshold;
        self
    }

    pub fn with_favor_hinder(mut self, favor_hinder: FavorHinder) -> Self {
        self.favor_hinder = favor_hinder;
        self
    }

    pub fn with_modifier(mut self, modifier: i32) -> Self {
        self.modifier = modifier;
        self
    }

    /// Request for a skill, using its derived difficulty and crit threshold.
    pub fn skill(derived: &SecondaryStats, skill: &str) -> Result<Self, DomainError> {
        let target = derived
            .skill(skill)
            .ok_or_else(|| DomainError::unknown_check_target("skill", skill))?;
        Ok(Self::new(target.difficulty).with_crit_threshold(target.crit_threshold))
    }

    /// Request for an attack, using its derived difficulty and crit threshold.
    pub fn attack(derived: &SecondaryStats, attack_type: &str) -> Result<Self, DomainError> {
        let target = derived
            .attack(attack_type)
            .ok_or_else(|| DomainError::unknown_check_target("attack", attack_type))?;
        Ok(Self::new(target.difficulty).with_crit_threshold(target.crit_threshold))
    }

    /// Request for a save. Saves always crit on a natural 20.
    pub fn save(derived: &SecondaryStats, save: SaveType) -> Self {
        Self::new(derived.saves.get(save))
    }
}

/// Result of a check, echoing its inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutcome {
    /// The natural d20
    pub natural: i32,
    /// Signed favor die: positive on favor, negative on hinder, 0 if none
    pub favor_die: i32,
    pub modifier: i32,
    pub total: i32,
    pub difficulty: i32,
    pub crit_threshold: i32,
    pub favor_hinder: FavorHinder,
    pub success: bool,
    pub critical: bool,
    pub fumble: bool,
}

impl CheckOutcome {
    /// e.g. `d20(14) + d6(3) + 2 = 19` or `d20(9) - d6(4) = 5`
    pub fn breakdown(&self) -> String {
        let mut out = format!("d{}({})", CHECK_DIE, self.natural);
        if self.favor_die > 0 {
            out.push_str(&format!(" + d{}({})", FAVOR_DIE, self.favor_die));
        } else if self.favor_die < 0 {
            out.push_str(&format!(" - d{}({})", FAVOR_DIE, -self.favor_die));
        }
        if self.modifier > 0 {
            out.push_str(&format!(" + {}", self.modifier));
        } else if self.modifier < 0 {
            out.push_str(&format!(" - {}", -self.modifier));
        }
        format!("{} = {}", out, self.total)
    }

    /// Short verdict label for display.
    pub fn verdict(&self) -> &'static str {
        match (self.success, self.critical, self.fumble) {
            (_, true, _) => "critical",
            (_, _, true) => "fumble",
            (true, _, _) => "success",
            (false, _, _) => "failure",
        }
    }
}

/// Resolve one check.
///
/// The d20 is drawn before the favor die. A crit threshold outside `[1, 20]`
/// is clamped first.
pub fn resolve_check(request: &CheckRequest, random: &dyn RandomPort) -> CheckOutcome {
    let crit_threshold = request.crit_threshold.clamp(CRIT_MIN, CRIT_MAX);
    let natural = roll_die(random, CHECK_DIE);
    let favor_die = match request.favor_hinder {
        FavorHinder::Favor => roll_die(random, FAVOR_DIE),
        FavorHinder::Hinder => -roll_die(random, FAVOR_DIE),
        FavorHinder::None => 0,
    };
    let total = natural + favor_die + request.modifier;

    CheckOutcome {
        natural,
        favor_die,
        modifier: request.modifier,
        total,
        difficulty: request.difficulty,
        crit_threshold,
        favor_hinder: request.favor_hinder,
        success: total >= request.difficulty,
        critical: natural >= crit_threshold,
        fumble: natural == 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::Character;
    use crate::random::FixedRandom;
    use crate::rules::RulesConfig;
    use crate::value_objects::{Level, PrimaryStats};
    use proptest::prelude::*;

    #[test]
    fn plain_check_against_difficulty() {
        let random = FixedRandom::new(vec![12]);
        let outcome = resolve_check(&CheckRequest::new(12), &random);
        assert_eq!(outcome.natural, 12);
        assert_eq!(outcome.favor_die, 0);
        assert_eq!(outcome.total, 12);
        assert!(outcome.success);
        assert!(!outcome.critical);
        assert!(!outcome.fumble);
        assert_eq!(random.draws(), 1);
    }

    #[test]
    fn favor_adds_and_hinder_subtracts_a_d6() {
        let request = CheckRequest::new(15).with_modifier(2);

        let favored = resolve_check(
            &request.with_favor_hinder(FavorHinder::Favor),
            &FixedRandom::new(vec![10, 4]),
        );
        assert_eq!(favored.favor_die, 4);
        assert_eq!(favored.total, 16);
        assert!(favored.success);

        let hindered = resolve_check(
            &request.with_favor_hinder(FavorHinder::Hinder),
            &FixedRandom::new(vec![10, 4]),
        );
        assert_eq!(hindered.favor_die, -4);
        assert_eq!(hindered.total, 8);
        assert!(!hindered.success);
    }

    #[test]
    fn natural_one_fumbles_even_on_success() {
        let outcome = resolve_check(
            &CheckRequest::new(2).with_modifier(5),
            &FixedRandom::constant(1),
        );
        assert!(outcome.fumble);
        assert!(outcome.success);
        assert_eq!(outcome.verdict(), "fumble");
    }

    #[test]
    fn lowered_crit_threshold() {
        let request = CheckRequest::new(30).with_crit_threshold(18);
        let outcome = resolve_check(&request, &FixedRandom::constant(18));
        assert!(outcome.critical);
        assert!(!outcome.success);

        let clamped = CheckRequest::new(10).with_crit_threshold(0);
        assert_eq!(resolve_check(&clamped, &FixedRandom::constant(5)).crit_threshold, 1);
    }

    #[test]
    fn breakdown_renders_each_part() {
        let outcome = resolve_check(
            &CheckRequest::new(10)
                .with_favor_hinder(FavorHinder::Favor)
                .with_modifier(2),
            &FixedRandom::new(vec![14, 3]),
        );
        assert_eq!(outcome.breakdown(), "d20(14) + d6(3) + 2 = 19");

        let outcome = resolve_check(
            &CheckRequest::new(10)
                .with_favor_hinder(FavorHinder::Hinder)
                .with_modifier(-1),
            &FixedRandom::new(vec![9, 4]),
        );
        assert_eq!(outcome.breakdown(), "d20(9) - d6(4) - 1 = 4");
    }

    #[test]
    fn request_deserializes_with_defaults() {
        let request: CheckRequest = serde_json::from_str(r#"{"difficulty": 12}"#).unwrap();
        assert_eq!(request, CheckRequest::new(12));
    }

    fn derived() -> SecondaryStats {
        let stats = PrimaryStats::new(5, 4, 3, 4, 2, 3).unwrap();
        let mut character = Character::new("Wren", stats, Level::default());
        character
            .skill_crit_adjustments
            .insert("sneak".to_string(), -1);
        character.derive(&RulesConfig::default())
    }

    #[test]
    fn specialised_requests_read_derived_stats() {
        let derived = derived();

        let sneak = CheckRequest::skill(&derived, "sneak").unwrap();
        assert_eq!(sneak.difficulty, 16);
        assert_eq!(sneak.crit_threshold, 19);

        let melee = CheckRequest::attack(&derived, "melee").unwrap();
        assert_eq!(melee.difficulty, 10);

        let will = CheckRequest::save(&derived, SaveType::Will);
        assert_eq!(will.difficulty, 14);
        assert_eq!(will.crit_threshold, 20);
    }

    #[test]
    fn unknown_targets_are_usage_errors() {
        let derived = derived();
        assert_eq!(
            CheckRequest::skill(&derived, "juggling").unwrap_err(),
            DomainError::unknown_check_target("skill", "juggling")
        );
        assert_eq!(
            CheckRequest::attack(&derived, "siege").unwrap_err(),
            DomainError::unknown_check_target("attack", "siege")
        );
    }

    fn favor_strategy() -> impl Strategy<Value = FavorHinder> {
        prop_oneof![
            Just(FavorHinder::Hinder),
            Just(FavorHinder::None),
            Just(FavorHinder::Favor),
        ]
    }

    proptest! {
        #[test]
        fn outcome_flags_follow_their_definitions(
            natural in 1..=20i32,
            favor_roll in 1..=6i32,
            difficulty in -5..=30i32,
            threshold in -5..=25i32,
            modifier in -10..=10i32,
            favor in favor_strategy(),
        ) {
            let request = CheckRequest {
                difficulty,
                crit_threshold: threshold,
                favor_hinder: favor,
                modifier,
            };
            let outcome = resolve_check(&request, &FixedRandom::new(vec![natural, favor_roll]));

            prop_assert_eq!(outcome.natural, natural);
            prop_assert_eq!(outcome.total, outcome.natural + outcome.favor_die + modifier);
            prop_assert_eq!(outcome.success, outcome.total >= difficulty);
            prop_assert_eq!(outcome.critical, natural >= threshold.clamp(1, 20));
            prop_assert_eq!(outcome.fumble, natural == 1);

            match favor {
                FavorHinder::Favor => prop_assert!((1..=6).contains(&outcome.favor_die)),
                FavorHinder::Hinder => prop_assert!((-6..=-1).contains(&outcome.favor_die)),
                FavorHinder::None => prop_assert_eq!(outcome.favor_die, 0),
            }
        }
    }
}
