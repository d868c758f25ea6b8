//! Check and damage use cases.
//!
//! Derived stats are recomputed right before every check so difficulties and
//! crit thresholds always reflect the character as it is now.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use vagabond_domain::rules::derive_character_stats;
use vagabond_domain::{
    apply_armor, resolve_check, resolve_damage, resolve_net_modifier, CheckOutcome, CheckRequest,
    Character, DamageRoll, DiceFormula, DiceParseError, DomainError, FavorHinder, FlagLookup,
    NetModifier, RandomPort, RollAxis, RollData, RulesConfig, SaveType, SecondaryStats,
};

#[derive(Debug, Error)]
pub enum CheckError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("Dice parse error: {0}")]
    DiceParse(#[from] DiceParseError),
}

/// What is being checked: `skill:<id>`, `attack:<type>` or `save:<type>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CheckKind {
    Skill(String),
    Attack(String),
    Save(SaveType),
}

impl CheckKind {
    pub fn axis(&self) -> RollAxis {
        match self {
            Self::Skill(id) => RollAxis::skill(id.clone()),
            Self::Attack(attack_type) => RollAxis::attack(attack_type.clone()),
            Self::Save(save) => RollAxis::save(*save),
        }
    }

    fn base_request(&self, derived: &SecondaryStats) -> Result<CheckRequest, DomainError> {
        match self {
            Self::Skill(id) => CheckRequest::skill(derived, id),
            Self::Attack(attack_type) => CheckRequest::attack(derived, attack_type),
            Self::Save(save) => Ok(CheckRequest::save(derived, *save)),
        }
    }
}

impl fmt::Display for CheckKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Skill(id) => write!(f, "skill:{}", id),
            Self::Attack(attack_type) => write!(f, "attack:{}", attack_type),
            Self::Save(save) => write!(f, "save:{}", save),
        }
    }
}

impl FromStr for CheckKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (kind, id) = s
            .split_once(':')
            .ok_or_else(|| DomainError::parse(format!("Expected <kind>:<id>, got '{}'", s)))?;
        let id = id.trim();
        if id.is_empty() {
            return Err(DomainError::parse(format!("Missing check id in '{}'", s)));
        }
        match kind.trim().to_lowercase().as_str() {
            "skill" => Ok(Self::Skill(id.to_lowercase())),
            "attack" => Ok(Self::Attack(id.to_lowercase())),
            "save" => Ok(Self::Save(id.parse()?)),
            other => Err(DomainError::parse(format!("Unknown check kind: {}", other))),
        }
    }
}

impl TryFrom<String> for CheckKind {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CheckKind> for String {
    fn from(kind: CheckKind) -> Self {
        kind.to_string()
    }
}

/// A resolved check with the modifiers that fed it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub character: String,
    pub kind: CheckKind,
    pub modifiers: NetModifier,
    pub outcome: CheckOutcome,
    pub breakdown: String,
}

/// Roll a skill, attack or save check for a character.
pub struct RollCheck {
    rules: Arc<RulesConfig>,
    random: Arc<dyn RandomPort>,
}

impl RollCheck {
    pub fn new(rules: Arc<RulesConfig>, random: Arc<dyn RandomPort>) -> Self {
        Self { rules, random }
    }

    /// Execute a check.
    ///
    /// `situational` is a favor/hinder picked at roll time; it nets against
    /// the flags like any other source.
    pub fn execute(
        &self,
        character: &Character,
        flags: &dyn FlagLookup,
        kind: &CheckKind,
        situational: FavorHinder,
        modifier: i32,
    ) -> Result<CheckReport, CheckError> {
        let derived = derive_character_stats(character, &self.rules);
        let request = kind.base_request(&derived)?;
        let modifiers = resolve_net_modifier(flags, &kind.axis()).with_situational(situational);
        let request = request
            .with_favor_hinder(modifiers.net)
            .with_modifier(modifier);

        let outcome = resolve_check(&request, self.random.as_ref());
        tracing::debug!(
            character = %character.name,
            check = %kind,
            natural = outcome.natural,
            favor_die = outcome.favor_die,
            total = outcome.total,
            difficulty = outcome.difficulty,
            success = outcome.success,
            critical = outcome.critical,
            fumble = outcome.fumble,
            "Check rolled"
        );

        Ok(CheckReport {
            character: character.name.clone(),
            kind: kind.clone(),
            modifiers,
            breakdown: outcome.breakdown(),
            outcome,
        })
    }
}

/// A damage roll, optionally reduced by armor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageReport {
    pub damage: DamageRoll,
    pub breakdown: String,
    /// Damage left after armor, when an armor rating was given
    pub after_armor: Option<i32>,
}

/// Roll a damage formula.
pub struct RollDamage {
    random: Arc<dyn RandomPort>,
}

impl RollDamage {
    pub fn new(random: Arc<dyn RandomPort>) -> Self {
        Self { random }
    }

    /// `@key` references in `formula` resolve against `roll_data` when given.
    pub fn execute(
        &self,
        formula: &str,
        is_critical: bool,
        roll_data: Option<&RollData>,
        armor: Option<i32>,
    ) -> Result<DamageReport, CheckError> {
        let formula = match roll_data {
            Some(data) => data.parse_formula(formula)?,
            None => DiceFormula::parse(formula)?,
        };
        let damage = resolve_damage(&formula, is_critical, self.random.as_ref())?;
        let after_armor = armor.map(|rating| apply_armor(damage.total, rating));
        tracing::debug!(
            formula = %damage.rolled_formula,
            critical = is_critical,
            total = damage.total,
            after_armor = ?after_armor,
            "Damage rolled"
        );

        Ok(DamageReport {
            breakdown: damage.breakdown(),
            damage,
            after_armor,
        })
    }

    /// Roll the damage of a weapon the character carries.
    pub fn execute_weapon(
        &self,
        character: &Character,
        weapon: &str,
        is_critical: bool,
        roll_data: Option<&RollData>,
        armor: Option<i32>,
    ) -> Result<DamageReport, CheckError> {
        let weapon = character
            .weapon(weapon)
            .ok_or_else(|| DomainError::unknown_check_target("weapon", weapon))?;
        tracing::debug!(character = %character.name, weapon = %weapon.name, "Weapon damage");
        self.execute(&weapon.damage.display(), is_critical, roll_data, armor)
    }
}
