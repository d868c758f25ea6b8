//! Flattened roll data for `@key` references in formulas.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::entities::Character;
use crate::value_objects::{DiceFormula, DiceParseError, SaveType, Stat};

use super::derived::SecondaryStats;

/// A flat `key -> value` projection of a character and its derived stats.
///
/// Keys: the six stat names, `level`, `fatigue`, `hp.max`, `speed`,
/// `luck.max`, `slots.max`, `slots.used`, `saves.<type>`,
/// `skills.<id>.difficulty`, `skills.<id>.crit`, `attacks.<id>.difficulty`,
/// `attacks.<id>.crit`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RollData(BTreeMap<String, i32>);

impl RollData {
    pub fn from_character(character: &Character, derived: &SecondaryStats) -> Self {
        let mut data = BTreeMap::new();
        for stat in Stat::all() {
            data.insert(stat.as_str().to_string(), character.stats.get(stat));
        }
        data.insert("level".to_string(), character.level.value() as i32);
        data.insert("fatigue".to_string(), character.fatigue);
        data.insert("hp.max".to_string(), derived.hp_max);
        data.insert("speed".to_string(), derived.speed);
        data.insert("luck.max".to_string(), derived.luck_max);
        data.insert("slots.max".to_string(), derived.item_slots.max);
        data.insert("slots.used".to_string(), derived.item_slots.used);
        for save in SaveType::all() {
            data.insert(format!("saves.{}", save.as_str()), derived.saves.get(save));
        }
        for (id, target) in &derived.skills {
            data.insert(format!("skills.{}.difficulty", id), target.difficulty);
            data.insert(format!("skills.{}.crit", id), target.crit_threshold);
        }
        for (id, target) in &derived.attacks {
            data.insert(format!("attacks.{}.difficulty", id), target.difficulty);
            data.insert(format!("attacks.{}.crit", id), target.crit_threshold);
        }
        Self(data)
    }

    pub fn get(&self, key: &str) -> Option<i32> {
        self.0.get(key).copied()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: i32) {
        self.0.insert(key.into(), value);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Parse `formula`, substituting `@key` references from this data.
    pub fn parse_formula(&self, formula: &str) -> Result<DiceFormula, DiceParseError> {
        DiceFormula::parse_with(formula, |key| self.get(key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::RulesConfig;
    use crate::value_objects::{Level, PrimaryStats};

    fn sample() -> RollData {
        let stats = PrimaryStats::new(5, 4, 3, 4, 2, 3).unwrap();
        let character =
            Character::new("Wren", stats, Level::new(2).unwrap()).with_trained_skill("arcana");
        let derived = character.derive(&RulesConfig::default());
        RollData::from_character(&character, &derived)
    }

    #[test]
    fn flattens_stats_and_derived_values() {
        let data = sample();
        assert_eq!(data.get("might"), Some(5));
        assert_eq!(data.get("level"), Some(2));
        assert_eq!(data.get("hp.max"), Some(10));
        assert_eq!(data.get("speed"), Some(30));
        assert_eq!(data.get("saves.reflex"), Some(13));
        assert_eq!(data.get("skills.arcana.difficulty"), Some(12));
        assert_eq!(data.get("skills.arcana.crit"), Some(20));
        assert_eq!(data.get("attacks.melee.difficulty"), Some(10));
        assert_eq!(data.get("nonsense"), None);
    }

    #[test]
    fn formulas_resolve_references() {
        let data = sample();
        let formula = data.parse_formula("1d6+@might").unwrap();
        assert_eq!(formula.display(), "1d6+5");

        let err = data.parse_formula("1d6+@charm").unwrap_err();
        assert_eq!(err, DiceParseError::UnknownReference("charm".to_string()));
    }
}
