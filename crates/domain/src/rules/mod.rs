//! The rules resolution engine.
//!
//! Everything here is a pure function of its inputs plus an injected
//! [`RandomPort`](crate::random::RandomPort) for dice.

pub mod check;
pub mod config;
pub mod countdown;
pub mod damage;
pub mod derived;
pub mod modifiers;
pub mod morale;
pub mod progression;
pub mod roll_data;

pub use check::{resolve_check, CheckOutcome, CheckRequest};
pub use self::config::{GoverningStat, RulesConfig};
pub use countdown::{
    step as step_countdown, step_faces, tick_countdowns, CountdownDie, CountdownEffect,
    CountdownStep, CountdownTick,
};
pub use damage::{resolve_damage, resolve_damage_str, DamageRoll};
pub use derived::{
    check_difficulty, clamp_crit_threshold, derive_character_stats, CheckTarget, ItemSlots,
    SaveDifficulties, SecondaryStats,
};
pub use modifiers::{resolve_net_modifier, FlagLookup, NetModifier, NoFlags, RollAxis};
pub use morale::{
    prompt_morale_check, roll_group_morale, roll_morale, GroupMoraleOutcome, MoraleCheck,
    MoralePrompt, MoraleResult, MoraleStatus, MoraleTrigger,
};
pub use progression::{
    compute_feature_diff, compute_resource_totals, select_class_entries, AppliedFeature,
    FeatureDiff, FeatureTag, ResourceTotals, Tagged,
};
pub use roll_data::RollData;
