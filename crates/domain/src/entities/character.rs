//! Actors - player characters and NPCs as the rules engine sees them.
//!
//! These are the raw inputs the host hands over. Nothing here is derived;
//! see [`crate::rules::derive_character_stats`] for the secondary values.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::gear::{slots_used, Armor, Slotted, Weapon};
use crate::ids::ActorId;
use crate::rules::{derive_character_stats, MoraleStatus, RulesConfig, SecondaryStats};
use crate::value_objects::{Level, PrimaryStats};

/// Flat bonuses applied on top of the derived formulas.
///
/// Save bonuses lower the difficulty (a +1 reflex bonus makes reflex saves
/// one easier).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StatBonuses {
    pub hp: i32,
    pub speed: i32,
    pub reflex: i32,
    pub endure: i32,
    pub will: i32,
}

/// One contribution to the item-slot bonus (a backpack, a perk, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotBonus {
    pub source: String,
    pub value: i32,
}

impl SlotBonus {
    pub fn new(source: impl Into<String>, value: i32) -> Self {
        Self {
            source: source.into(),
            value,
        }
    }
}

/// A player character's rules inputs.
///
/// All fields are public because the derived values are always recomputed
/// from them; there is no cached state that could go stale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    #[serde(default)]
    pub id: ActorId,
    pub name: String,
    pub stats: PrimaryStats,
    #[serde(default)]
    pub level: Level,
    #[serde(default)]
    pub fatigue: i32,
    /// Skills the character is trained in
    #[serde(default)]
    pub trained_skills: BTreeSet<String>,
    /// Attacks explicitly marked untrained (attacks are trained by default)
    #[serde(default)]
    pub untrained_attacks: BTreeSet<String>,
    #[serde(default)]
    pub bonuses: StatBonuses,
    #[serde(default)]
    pub slot_bonuses: Vec<SlotBonus>,
    #[serde(default)]
    pub weapons: Vec<Weapon>,
    #[serde(default)]
    pub armor: Option<Armor>,
    /// Slots taken by carried items not listed as weapons or armor
    #[serde(default)]
    pub other_slots_used: i32,
    /// Additive crit-threshold changes from active effects, by skill id
    #[serde(default)]
    pub skill_crit_adjustments: BTreeMap<String, i32>,
    /// Additive crit-threshold changes from active effects, by attack type
    #[serde(default)]
    pub attack_crit_adjustments: BTreeMap<String, i32>,
}

impl Character {
    pub fn new(name: impl Into<String>, stats: PrimaryStats, level: Level) -> Self {
        Self {
            id: ActorId::new(),
            name: name.into(),
            stats,
            level,
            fatigue: 0,
            trained_skills: BTreeSet::new(),
            untrained_attacks: BTreeSet::new(),
            bonuses: StatBonuses::default(),
            slot_bonuses: Vec::new(),
            weapons: Vec::new(),
            armor: None,
            other_slots_used: 0,
            skill_crit_adjustments: BTreeMap::new(),
            attack_crit_adjustments: BTreeMap::new(),
        }
    }

    pub fn with_trained_skill(mut self, skill: impl Into<String>) -> Self {
        self.trained_skills.insert(skill.into());
        self
    }

    pub fn with_slot_bonus(mut self, bonus: SlotBonus) -> Self {
        self.slot_bonuses.push(bonus);
        self
    }

    pub fn with_fatigue(mut self, fatigue: i32) -> Self {
        self.fatigue = fatigue;
        self
    }

    pub fn with_weapon(mut self, weapon: Weapon) -> Self {
        self.weapons.push(weapon);
        self
    }

    pub fn with_armor(mut self, armor: Armor) -> Self {
        self.armor = Some(armor);
        self
    }

    /// Weapons and armor, for the slot count.
    pub fn carried_items(&self) -> Vec<&dyn Slotted> {
        let mut items: Vec<&dyn Slotted> =
            self.weapons.iter().map(|w| w as &dyn Slotted).collect();
        if let Some(armor) = &self.armor {
            items.push(armor);
        }
        items
    }

    /// Every slot in use: listed gear plus everything else carried.
    pub fn item_slots_used(&self) -> i32 {
        slots_used(&self.carried_items()).saturating_add(self.other_slots_used)
    }

    /// A carried weapon by name, ignoring case.
    pub fn weapon(&self, name: &str) -> Option<&Weapon> {
        self.weapons.iter().find(|w| w.name.eq_ignore_ascii_case(name))
    }

    pub fn is_trained(&self, skill: &str) -> bool {
        self.trained_skills.contains(skill)
    }

    /// Recompute every secondary value from the current inputs.
    pub fn derive(&self, config: &RulesConfig) -> SecondaryStats {
        derive_character_stats(self, config)
    }
}

/// A non-player character. Only NPCs check morale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Npc {
    #[serde(default)]
    pub id: ActorId,
    pub name: String,
    /// 2d6 target; the NPC holds on a roll at or under this value
    pub morale: i32,
    #[serde(default)]
    pub hit_points: i32,
    #[serde(default)]
    pub armor: i32,
    #[serde(default)]
    pub morale_status: MoraleStatus,
}

impl Npc {
    pub fn new(name: impl Into<String>, morale: i32) -> Self {
        Self {
            id: ActorId::new(),
            name: name.into(),
            morale,
            hit_points: 0,
            armor: 0,
            morale_status: MoraleStatus::default(),
        }
    }

    pub fn is_broken(&self) -> bool {
        self.morale_status.broken
    }
}

/// Any actor the host may pass to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Actor {
    Character(Character),
    Npc(Npc),
}

impl Actor {
    pub fn id(&self) -> ActorId {
        match self {
            Self::Character(c) => c.id,
            Self::Npc(n) => n.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Character(c) => &c.name,
            Self::Npc(n) => &n.name,
        }
    }

    /// Article-prefixed kind, for error messages.
    pub fn kind_label(&self) -> &'static str {
        match self {
            Self::Character(_) => "a character",
            Self::Npc(_) => "an NPC",
        }
    }

    pub fn as_npc(&self) -> Option<&Npc> {
        match self {
            Self::Npc(npc) => Some(npc),
            Self::Character(_) => None,
        }
    }

    pub fn as_npc_mut(&mut self) -> Option<&mut Npc> {
        match self {
            Self::Npc(npc) => Some(npc),
            Self::Character(_) => None,
        }
    }
}

impl From<Character> for Actor {
    fn from(character: Character) -> Self {
        Self::Character(character)
    }
}

impl From<Npc> for Actor {
    fn from(npc: Npc) -> Self {
        Self::Npc(npc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn character_deserializes_with_defaults() {
        let json = r#"{
            "name": "Wren",
            "stats": {
                "might": 5, "dexterity": 4, "awareness": 3,
                "reason": 4, "presence": 2, "luck": 3
            },
            "level": 2,
            "trainedSkills": ["arcana"]
        }"#;
        let character: Character = serde_json::from_str(json).unwrap();
        assert_eq!(character.level.value(), 2);
        assert!(character.is_trained("arcana"));
        assert_eq!(character.fatigue, 0);
        assert!(character.slot_bonuses.is_empty());
    }

    #[test]
    fn out_of_range_stats_are_rejected_on_load() {
        let json = r#"{
            "name": "Wren",
            "stats": {
                "might": 2147483647, "dexterity": 4, "awareness": 3,
                "reason": 4, "presence": 2, "luck": 3
            },
            "level": 2
        }"#;
        assert!(serde_json::from_str::<Character>(json).is_err());
    }

    #[test]
    fn carried_gear_counts_toward_slots() {
        let json = r#"{
            "name": "Wren",
            "stats": {
                "might": 5, "dexterity": 4, "awareness": 3,
                "reason": 4, "presence": 2, "luck": 3
            },
            "weapons": [
                {"name": "Greatsword", "damage": "d10", "grip": "2h", "slots": 2},
                {"name": "Dagger", "damage": "d4", "grip": "1h", "slots": 1}
            ],
            "armor": {"name": "Chain", "rating": 2, "slots": 3},
            "otherSlotsUsed": 4
        }"#;
        let character: Character = serde_json::from_str(json).unwrap();
        assert_eq!(character.carried_items().len(), 3);
        assert_eq!(character.item_slots_used(), 10);
        assert_eq!(
            character.weapon("greatsword").map(|w| w.damage.display()),
            Some("1d10".to_string())
        );
        assert!(character.weapon("Bow").is_none());
    }

    #[test]
    fn actor_kind_helpers() {
        let npc: Actor = Npc::new("Goblin", 6).into();
        assert_eq!(npc.kind_label(), "an NPC");
        assert!(npc.as_npc().is_some());

        let pc: Actor = Character::new("Wren", PrimaryStats::uniform(3), Level::default()).into();
        assert_eq!(pc.kind_label(), "a character");
        assert!(pc.as_npc().is_none());
        assert_eq!(pc.name(), "Wren");
    }

    #[test]
    fn new_npc_starts_steady() {
        let npc = Npc::new("Bandit", 7);
        assert!(!npc.is_broken());
        assert!(!npc.morale_status.checked_this_combat);
        assert!(npc.morale_status.last_trigger.is_none());
        assert!(npc.morale_status.last_result.is_none());
    }

    #[test]
    fn actor_serde_is_tagged() {
        let actor: Actor =
            serde_json::from_str(r#"{"type":"npc","name":"Wolf","morale":5}"#).unwrap();
        assert_eq!(actor.as_npc().map(|n| n.morale), Some(5));
    }
}
