//! Rules configuration tables supplied by the host.
//!
//! Every table has a documented default, and missing or malformed entries
//! never make derivation fail. They are skipped or fall back to the default.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::value_objects::Stat;

/// Base item slots before might, fatigue and bonuses.
pub const DEFAULT_BASE_ITEM_SLOTS: i32 = 8;
/// Walking speed when the table has no entry for a dexterity value.
pub const DEFAULT_SPEED: i32 = 30;
/// Dexterity domain of the speed table; values outside are clamped first.
pub const SPEED_DEXTERITY_MIN: i32 = 2;
pub const SPEED_DEXTERITY_MAX: i32 = 7;

/// A skill or attack entry: which attribute governs it.
///
/// The stat is kept as text so a host can ship entries this version does not
/// understand; those entries are skipped during derivation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoverningStat {
    pub stat: String,
    #[serde(default)]
    pub label: Option<String>,
}

impl GoverningStat {
    pub fn new(stat: Stat) -> Self {
        Self {
            stat: stat.as_str().to_string(),
            label: None,
        }
    }

    /// The governing stat, if the entry names one this engine knows.
    pub fn resolve(&self) -> Option<Stat> {
        Stat::from_str(&self.stat).ok()
    }
}

/// Lookup tables that drive the derived statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RulesConfig {
    /// Walking speed keyed by (clamped) dexterity
    pub speed_by_dexterity: BTreeMap<i32, i32>,
    /// Speed used when the table has no entry
    pub default_speed: i32,
    /// Skill id → governing stat
    pub skills: BTreeMap<String, GoverningStat>,
    /// Attack type → governing stat
    pub attacks: BTreeMap<String, GoverningStat>,
    /// Item slots every character starts with
    pub base_item_slots: i32,
}

impl RulesConfig {
    /// Walking speed before bonuses for a dexterity value.
    pub fn base_speed(&self, dexterity: i32) -> i32 {
        let dexterity = dexterity.clamp(SPEED_DEXTERITY_MIN, SPEED_DEXTERITY_MAX);
        self.speed_by_dexterity
            .get(&dexterity)
            .copied()
            .unwrap_or(self.default_speed)
    }

    /// Overlay another configuration: its table entries win, scalars replace.
    pub fn merged_with(mut self, overrides: RulesConfig) -> Self {
        self.speed_by_dexterity.extend(overrides.speed_by_dexterity);
        self.skills.extend(overrides.skills);
        self.attacks.extend(overrides.attacks);
        self.default_speed = overrides.default_speed;
        self.base_item_slots = overrides.base_item_slots;
        self
    }
}

impl Default for RulesConfig {
    fn default() -> Self {
        let speed_by_dexterity = BTreeMap::from([
            (2, 25),
            (3, 30),
            (4, 30),
            (5, 35),
            (6, 35),
            (7, 40),
        ]);

        let skills = [
            ("arcana", Stat::Reason),
            ("brawl", Stat::Might),
            ("craft", Stat::Reason),
            ("detect", Stat::Awareness),
            ("finesse", Stat::Dexterity),
            ("influence", Stat::Presence),
            ("leadership", Stat::Presence),
            ("medicine", Stat::Reason),
            ("mysticism", Stat::Awareness),
            ("performance", Stat::Presence),
            ("sneak", Stat::Dexterity),
            ("survival", Stat::Awareness),
        ]
        .into_iter()
        .map(|(id, stat)| (id.to_string(), GoverningStat::new(stat)))
        .collect();

        let attacks = [
            ("melee", Stat::Might),
            ("brawl", Stat::Might),
            ("finesse", Stat::Dexterity),
            ("ranged", Stat::Awareness),
        ]
        .into_iter()
        .map(|(id, stat)| (id.to_string(), GoverningStat::new(stat)))
        .collect();

        Self {
            speed_by_dexterity,
            default_speed: DEFAULT_SPEED,
            skills,
            attacks,
            base_item_slots: DEFAULT_BASE_ITEM_SLOTS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tables_cover_vagabond_rules() {
        let config = RulesConfig::default();
        assert_eq!(config.skills.len(), 12);
        assert_eq!(config.attacks.len(), 4);
        assert_eq!(config.base_item_slots, 8);
        assert_eq!(
            config.skills["arcana"].resolve(),
            Some(Stat::Reason),
            "arcana is governed by reason"
        );
    }

    #[test]
    fn base_speed_clamps_dexterity_into_table_domain() {
        let config = RulesConfig::default();
        assert_eq!(config.base_speed(1), 25);
        assert_eq!(config.base_speed(2), 25);
        assert_eq!(config.base_speed(4), 30);
        assert_eq!(config.base_speed(6), 35);
        assert_eq!(config.base_speed(10), 40);
    }

    #[test]
    fn base_speed_falls_back_to_default() {
        let config = RulesConfig {
            speed_by_dexterity: BTreeMap::new(),
            ..RulesConfig::default()
        };
        assert_eq!(config.base_speed(5), DEFAULT_SPEED);
    }

    #[test]
    fn partial_config_deserializes_with_defaults() {
        let config: RulesConfig =
            serde_json::from_str(r#"{"baseItemSlots": 10}"#).unwrap();
        assert_eq!(config.base_item_slots, 10);
        assert_eq!(config.default_speed, DEFAULT_SPEED);
        assert_eq!(config.skills.len(), 12);
    }

    #[test]
    fn unknown_governing_stat_does_not_resolve() {
        let entry = GoverningStat {
            stat: "charm".to_string(),
            label: None,
        };
        assert_eq!(entry.resolve(), None);
    }

    #[test]
    fn merged_with_overlays_tables() {
        let overrides = RulesConfig {
            speed_by_dexterity: BTreeMap::from([(7, 45)]),
            skills: BTreeMap::from([(
                "alchemy".to_string(),
                GoverningStat::new(Stat::Reason),
            )]),
            attacks: BTreeMap::new(),
            ..RulesConfig::default()
        };
        let merged = RulesConfig::default().merged_with(overrides);
        assert_eq!(merged.base_speed(7), 45);
        assert_eq!(merged.base_speed(2), 25);
        assert_eq!(merged.skills.len(), 13);
        assert_eq!(merged.attacks.len(), 4);
    }
}
