//! Vagabond rules domain.
//!
//! Pure rules: derived statistics, d20 checks with favor/hinder, damage with
//! critical doubling, countdown dice, morale and class progression. Dice are
//! rolled through [`RandomPort`]; this crate owns no RNG and does no I/O.

pub mod entities;
pub mod error;
pub mod ids;
pub mod random;
pub mod rules;
pub mod value_objects;

pub use entities::{
    apply_armor, slots_used, Actor, Armor, Character, ClassDefinition, ClassFeature, Coins, Grip,
    Npc, ProgressionEntry, SlotBonus, Slotted, StatBonuses, Weapon,
};
pub use error::DomainError;
pub use ids::ActorId;
pub use random::{roll_die, FixedRandom, RandomPort};
pub use rules::{
    compute_feature_diff, compute_resource_totals, derive_character_stats, prompt_morale_check,
    resolve_check, resolve_damage, resolve_net_modifier, roll_group_morale, roll_morale,
    select_class_entries, step_countdown, tick_countdowns, CheckOutcome, CheckRequest,
    CountdownDie, CountdownEffect, CountdownStep, CountdownTick, DamageRoll, FeatureDiff,
    FeatureTag, FlagLookup, GroupMoraleOutcome, MoraleCheck, MoralePrompt, MoraleResult,
    MoraleStatus, MoraleTrigger, NetModifier, NoFlags, ResourceTotals, RollAxis, RollData,
    RulesConfig, SecondaryStats,
};
pub use value_objects::{
    double_dice, DiceFormula, DiceParseError, DiceRollResult, FavorHinder, Level, PrimaryStats,
    SaveType, Stat,
};
