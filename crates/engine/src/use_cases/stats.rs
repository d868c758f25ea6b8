//! Derived statistics for a character.

use std::sync::Arc;

use vagabond_domain::{derive_character_stats, Character, RollData, RulesConfig, SecondaryStats};

pub struct DeriveStats {
    rules: Arc<RulesConfig>,
}

impl DeriveStats {
    pub fn new(rules: Arc<RulesConfig>) -> Self {
        Self { rules }
    }

    pub fn execute(&self, character: &Character) -> SecondaryStats {
        let derived = derive_character_stats(character, &self.rules);
        tracing::debug!(
            character = %character.name,
            hp_max = derived.hp_max,
            speed = derived.speed,
            slots_max = derived.item_slots.max,
            overburdened = derived.item_slots.overburdened,
            "Derived stats recomputed"
        );
        if derived.item_slots.overburdened {
            tracing::warn!(
                character = %character.name,
                used = derived.item_slots.used,
                max = derived.item_slots.max,
                "Character is overburdened"
            );
        }
        derived
    }

    /// Flattened roll data, recomputed from scratch.
    pub fn roll_data(&self, character: &Character) -> RollData {
        RollData::from_character(character, &self.execute(character))
    }
}

#[cfg(test)]
mod tests {
    use vagabond_domain::{Level, PrimaryStats};

    use super::*;

    #[test]
    fn uses_configured_rules() {
        let rules = RulesConfig {
            base_item_slots: 10,
            ..RulesConfig::default()
        };
        let stats = PrimaryStats::new(5, 4, 3, 4, 2, 3).unwrap();
        let character = Character::new("Wren", stats, Level::new(2).unwrap());
        let derive = DeriveStats::new(Arc::new(rules));

        let derived = derive.execute(&character);
        assert_eq!(derived.item_slots.max, 15);
        assert_eq!(derived.hp_max, 10);
        assert_eq!(derive.roll_data(&character).get("slots.max"), Some(15));
    }
}
