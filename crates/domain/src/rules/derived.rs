//! Derived statistics.
//!
//! Secondary values are a pure projection of a character's inputs and the
//! rules tables. They are recomputed from scratch on every call and never
//! patched in place, so effects that push a crit threshold around are always
//! re-clamped against the current base.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entities::Character;
use crate::value_objects::{SaveType, Stat};

use super::config::RulesConfig;

/// Every check starts from this number.
pub const BASE_DIFFICULTY: i32 = 20;
/// Lowest valid crit threshold.
pub const CRIT_MIN: i32 = 1;
/// Highest valid crit threshold (a natural 20).
pub const CRIT_MAX: i32 = 20;

/// Difficulty for a skill or attack check.
///
/// Trained checks count the governing stat twice.
pub fn check_difficulty(stat_value: i32, trained: bool) -> i32 {
    if trained {
        BASE_DIFFICULTY - stat_value * 2
    } else {
        BASE_DIFFICULTY - stat_value
    }
}

/// Crit threshold after additive effects, always within `[1, 20]`.
pub fn clamp_crit_threshold(adjustment: i32) -> i32 {
    CRIT_MAX.saturating_add(adjustment).clamp(CRIT_MIN, CRIT_MAX)
}

/// Difficulty and crit threshold of one skill or attack.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckTarget {
    pub stat: Stat,
    pub trained: bool,
    pub difficulty: i32,
    pub crit_threshold: i32,
}

/// Reflex, endure and will difficulties.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDifficulties {
    pub reflex: i32,
    pub endure: i32,
    pub will: i32,
}

impl SaveDifficulties {
    pub fn get(&self, save: SaveType) -> i32 {
        match save {
            SaveType::Reflex => self.reflex,
            SaveType::Endure => self.endure,
            SaveType::Will => self.will,
        }
    }
}

/// Item capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemSlots {
    pub max: i32,
    pub used: i32,
    pub bonus: i32,
    pub overburdened: bool,
}

/// All values derived from a character's primary inputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecondaryStats {
    pub hp_max: i32,
    pub speed: i32,
    pub item_slots: ItemSlots,
    pub luck_max: i32,
    pub saves: SaveDifficulties,
    pub skills: BTreeMap<String, CheckTarget>,
    pub attacks: BTreeMap<String, CheckTarget>,
}

impl SecondaryStats {
    pub fn skill(&self, id: &str) -> Option<&CheckTarget> {
        self.skills.get(id)
    }

    pub fn attack(&self, id: &str) -> Option<&CheckTarget> {
        self.attacks.get(id)
    }
}

/// Recompute every secondary value for `character`.
///
/// Never fails: config entries naming an unknown stat are skipped.
pub fn derive_character_stats(character: &Character, config: &RulesConfig) -> SecondaryStats {
    let stats = &character.stats;
    let bonuses = &character.bonuses;
    let level = character.level.value() as i32;

    // Stats and level are range-checked; host bonuses are not, so they saturate.
    let hp_max = stats.might.saturating_mul(level).saturating_add(bonuses.hp);
    let speed = config.base_speed(stats.dexterity).saturating_add(bonuses.speed);

    let slot_bonus = character
        .slot_bonuses
        .iter()
        .fold(0i32, |acc, b| acc.saturating_add(b.value));
    let slot_max = config
        .base_item_slots
        .saturating_add(stats.might)
        .saturating_sub(character.fatigue)
        .saturating_add(slot_bonus);
    let used = character.item_slots_used();
    let item_slots = ItemSlots {
        max: slot_max,
        used,
        bonus: slot_bonus,
        overburdened: used > slot_max,
    };

    let saves = SaveDifficulties {
        reflex: (BASE_DIFFICULTY - (stats.dexterity + stats.awareness))
            .saturating_sub(bonuses.reflex),
        endure: (BASE_DIFFICULTY - stats.might * 2).saturating_sub(bonuses.endure),
        will: (BASE_DIFFICULTY - (stats.reason + stats.presence)).saturating_sub(bonuses.will),
    };

    let mut skills = BTreeMap::new();
    for (id, entry) in &config.skills {
        let Some(stat) = entry.resolve() else {
            continue;
        };
        let trained = character.trained_skills.contains(id);
        let adjustment = character
            .skill_crit_adjustments
            .get(id)
            .copied()
            .unwrap_or(0);
        skills.insert(
            id.clone(),
            CheckTarget {
                stat,
                trained,
                difficulty: check_difficulty(stats.get(stat), trained),
                crit_threshold: clamp_crit_threshold(adjustment),
            },
        );
    }

    let mut attacks = BTreeMap::new();
    for (id, entry) in &config.attacks {
        let Some(stat) = entry.resolve() else {
            continue;
        };
        let trained = !character.untrained_attacks.contains(id);
        let adjustment = character
            .attack_crit_adjustments
            .get(id)
            .copied()
            .unwrap_or(0);
        attacks.insert(
            id.clone(),
            CheckTarget {
                stat,
                trained,
                difficulty: check_difficulty(stats.get(stat), trained),
                crit_threshold: clamp_crit_threshold(adjustment),
            },
        );
    }

    SecondaryStats {
        hp_max,
        speed,
        item_slots,
        luck_max: stats.luck,
        saves,
        skills,
        attacks,
    }
}
