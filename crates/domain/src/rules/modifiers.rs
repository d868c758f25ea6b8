//! Favor/hinder resolution from externally stored flags.
//!
//! Flags live outside the engine (on the host's actor document). The resolver
//! only reads them, by key, through [`FlagLookup`].
//!
//! Key convention:
//!
//! | Roll            | Keys consulted                                                  |
//! |-----------------|-----------------------------------------------------------------|
//! | any             | `favor.all`, `hinder.all`                                       |
//! | skill `<id>`    | `favor.skills.<id>`, `hinder.skills.<id>`                       |
//! | attack          | `favor.attacks`, `hinder.attacks`                               |
//! | attack `<type>` | additionally `favor.attacks.<type>`, `hinder.attacks.<type>`    |
//! | save `<type>`   | `favor.saves.<type>`, `hinder.saves.<type>`                     |

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

use crate::value_objects::{FavorHinder, SaveType};

/// Source label used for a favor/hinder picked by the player at roll time.
pub const SITUATIONAL_SOURCE: &str = "situational";

/// Read-only boolean flag lookup.
pub trait FlagLookup {
    /// Whether `key` is set. Absent keys are false.
    fn flag(&self, key: &str) -> bool;
}

impl FlagLookup for HashMap<String, bool> {
    fn flag(&self, key: &str) -> bool {
        self.get(key).copied().unwrap_or(false)
    }
}

impl FlagLookup for BTreeMap<String, bool> {
    fn flag(&self, key: &str) -> bool {
        self.get(key).copied().unwrap_or(false)
    }
}

impl<F: FlagLookup + ?Sized> FlagLookup for &F {
    fn flag(&self, key: &str) -> bool {
        (**self).flag(key)
    }
}

/// No flags set at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFlags;

impl FlagLookup for NoFlags {
    fn flag(&self, _key: &str) -> bool {
        false
    }
}

/// What axis a roll is on, for flag matching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RollAxis {
    Skill { id: String },
    Attack {
        #[serde(rename = "attackType")]
        attack_type: Option<String>,
    },
    Save { save: SaveType },
}

impl RollAxis {
    pub fn skill(id: impl Into<String>) -> Self {
        Self::Skill { id: id.into() }
    }

    pub fn attack(attack_type: impl Into<String>) -> Self {
        Self::Attack {
            attack_type: Some(attack_type.into()),
        }
    }

    pub fn save(save: SaveType) -> Self {
        Self::Save { save }
    }

    /// Flag key suffixes (after `favor.` / `hinder.`) consulted for this axis.
    fn suffixes(&self) -> Vec<String> {
        let mut suffixes = vec!["all".to_string()];
        match self {
            Self::Skill { id } => suffixes.push(format!("skills.{}", id)),
            Self::Attack { attack_type } => {
                suffixes.push("attacks".to_string());
                if let Some(attack_type) = attack_type {
                    suffixes.push(format!("attacks.{}", attack_type));
                }
            }
            Self::Save { save } => suffixes.push(format!("saves.{}", save.as_str())),
        }
        suffixes
    }
}

/// Net favor/hinder with the flags that produced it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetModifier {
    pub net: FavorHinder,
    pub favor_sources: Vec<String>,
    pub hinder_sources: Vec<String>,
}

impl NetModifier {
    /// Fold in a favor/hinder chosen at roll time as one more source.
    pub fn with_situational(mut self, situational: FavorHinder) -> Self {
        match situational {
            FavorHinder::Favor => self.favor_sources.push(SITUATIONAL_SOURCE.to_string()),
            FavorHinder::Hinder => self.hinder_sources.push(SITUATIONAL_SOURCE.to_string()),
            FavorHinder::None => return self,
        }
        self.net = net_of(&self.favor_sources, &self.hinder_sources);
        self
    }
}

fn net_of(favor: &[String], hinder: &[String]) -> FavorHinder {
    FavorHinder::from_net(favor.len() as i32 - hinder.len() as i32)
}

/// Compute the net favor/hinder for a roll.
///
/// Favor and hinder cancel one-for-one and the result never exceeds a single
/// step: two favors and one hinder is still just favor.
pub fn resolve_net_modifier(flags: &dyn FlagLookup, axis: &RollAxis) -> NetModifier {
    let mut favor_sources = Vec::new();
    let mut hinder_sources = Vec::new();

    for suffix in axis.suffixes() {
        let favor_key = format!("favor.{}", suffix);
        if flags.flag(&favor_key) {
            favor_sources.push(favor_key);
        }
        let hinder_key = format!("hinder.{}", suffix);
        if flags.flag(&hinder_key) {
            hinder_sources.push(hinder_key);
        }
    }

    NetModifier {
        net: net_of(&favor_sources, &hinder_sources),
        favor_sources,
        hinder_sources,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(keys: &[&str]) -> HashMap<String, bool> {
        keys.iter().map(|k| (k.to_string(), true)).collect()
    }

    #[test]
    fn no_flags_is_neutral() {
        let result = resolve_net_modifier(&NoFlags, &RollAxis::skill("arcana"));
        assert_eq!(result.net, FavorHinder::None);
        assert!(result.favor_sources.is_empty());
        assert!(result.hinder_sources.is_empty());
    }

    #[test]
    fn single_favor_flag_gives_favor() {
        let flags = flags(&["favor.skills.arcana"]);
        let result = resolve_net_modifier(&flags, &RollAxis::skill("arcana"));
        assert_eq!(result.net, FavorHinder::Favor);
        assert_eq!(result.favor_sources, vec!["favor.skills.arcana"]);
    }

    #[test]
    fn favor_and_hinder_cancel() {
        let flags = flags(&["favor.attacks", "hinder.attacks"]);
        let result = resolve_net_modifier(&flags, &RollAxis::attack("melee"));
        assert_eq!(result.net, FavorHinder::None);
        assert_eq!(result.favor_sources.len(), 1);
        assert_eq!(result.hinder_sources.len(), 1);
    }

    #[test]
    fn two_favor_one_hinder_clamps_to_one_step() {
        let flags = flags(&["favor.all", "favor.saves.will", "hinder.saves.will"]);
        let result = resolve_net_modifier(&flags, &RollAxis::save(SaveType::Will));
        assert_eq!(result.net, FavorHinder::Favor);
        assert_eq!(result.net.as_i32(), 1);
    }

    #[test]
    fn flags_for_other_axes_are_ignored() {
        let flags = flags(&["favor.skills.sneak", "hinder.saves.reflex"]);
        let result = resolve_net_modifier(&flags, &RollAxis::skill("arcana"));
        assert_eq!(result.net, FavorHinder::None);
    }

    #[test]
    fn false_flags_do_not_count() {
        let mut flags = flags(&["hinder.attacks.ranged"]);
        flags.insert("favor.attacks.ranged".to_string(), false);
        let result = resolve_net_modifier(&flags, &RollAxis::attack("ranged"));
        assert_eq!(result.net, FavorHinder::Hinder);
        assert_eq!(result.hinder_sources, vec!["hinder.attacks.ranged"]);
    }

    #[test]
    fn untyped_attack_only_reads_generic_keys() {
        let flags = flags(&["favor.attacks.melee"]);
        let axis = RollAxis::Attack { attack_type: None };
        assert_eq!(resolve_net_modifier(&flags, &axis).net, FavorHinder::None);
    }

    #[test]
    fn situational_favor_counts_as_a_source() {
        let flags = flags(&["hinder.skills.detect"]);
        let result = resolve_net_modifier(&flags, &RollAxis::skill("detect"))
            .with_situational(FavorHinder::Favor);
        assert_eq!(result.net, FavorHinder::None);
        assert_eq!(result.favor_sources, vec![SITUATIONAL_SOURCE]);
    }
}
