//! Damage rolls with critical doubling.

use serde::{Deserialize, Serialize};

use crate::random::RandomPort;
use crate::value_objects::{DiceFormula, DiceParseError, DiceRollResult};

/// A rolled damage expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageRoll {
    /// The formula as written
    pub base_formula: DiceFormula,
    /// The formula actually rolled (dice doubled on a critical)
    pub rolled_formula: DiceFormula,
    pub is_critical: bool,
    pub roll: DiceRollResult,
    /// Signed total; a formula with negative terms can go below zero
    pub total: i32,
}

impl DamageRoll {
    pub fn breakdown(&self) -> String {
        self.roll.breakdown()
    }
}

/// Roll damage. On a critical every dice count is doubled and flat terms are
/// left alone.
pub fn resolve_damage(
    formula: &DiceFormula,
    is_critical: bool,
    random: &dyn RandomPort,
) -> Result<DamageRoll, DiceParseError> {
    let rolled_formula = if is_critical {
        formula.doubled()?
    } else {
        formula.clone()
    };
    let roll = rolled_formula.roll(random);
    Ok(DamageRoll {
        base_formula: formula.clone(),
        rolled_formula,
        is_critical,
        total: roll.total,
        roll,
    })
}

/// Parse and roll a formula string.
pub fn resolve_damage_str(
    formula: &str,
    is_critical: bool,
    random: &dyn RandomPort,
) -> Result<DamageRoll, DiceParseError> {
    resolve_damage(&DiceFormula::parse(formula)?, is_critical, random)
}
