//! Gear - the numeric side of weapons and armor.
//!
//! Only the values that feed the rules live here: damage formulas, grip,
//! slot cost, armor rating and coin value. Inventory bookkeeping belongs to
//! the host.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::DomainError;
use crate::value_objects::DiceFormula;

/// Copper per silver piece.
pub const COPPER_PER_SILVER: u32 = 10;
/// Copper per gold piece.
pub const COPPER_PER_GOLD: u32 = 100;

/// How a weapon is held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Grip {
    #[serde(rename = "1h")]
    OneHanded,
    #[serde(rename = "2h")]
    TwoHanded,
    #[serde(rename = "versatile")]
    Versatile,
    #[serde(rename = "fist")]
    Fist,
}

impl Grip {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OneHanded => "1h",
            Self::TwoHanded => "2h",
            Self::Versatile => "versatile",
            Self::Fist => "fist",
        }
    }

    /// Hands occupied when wielded normally.
    pub fn hands(&self) -> u8 {
        match self {
            Self::TwoHanded => 2,
            Self::OneHanded | Self::Versatile | Self::Fist => 1,
        }
    }
}

impl fmt::Display for Grip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Grip {
    type Err = DomainError;

    /// Accepts both table short forms (`1H`, `2H`, `V`, `F`) and stored names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1h" => Ok(Self::OneHanded),
            "2h" => Ok(Self::TwoHanded),
            "v" | "versatile" => Ok(Self::Versatile),
            "f" | "fist" => Ok(Self::Fist),
            _ => Err(DomainError::parse(format!("Unknown grip: {}", s))),
        }
    }
}

/// A coin value, stored in copper.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Coins(u32);

impl Coins {
    pub fn from_copper(copper: u32) -> Self {
        Self(copper)
    }

    pub fn copper(&self) -> u32 {
        self.0
    }

    /// Parse a price like "2g 5s", "30s" or "8c". `-` and blank mean free.
    pub fn parse(input: &str) -> Result<Self, DomainError> {
        let input = input.trim().to_lowercase();
        if input.is_empty() || input == "-" {
            return Ok(Self(0));
        }

        let mut total: u32 = 0;
        for token in input.split(|c: char| c.is_whitespace() || c == ',') {
            if token.is_empty() {
                continue;
            }
            let Some(unit) = token.chars().last() else {
                continue;
            };
            let amount = &token[..token.len() - unit.len_utf8()];
            let rate = match unit {
                'g' => COPPER_PER_GOLD,
                's' => COPPER_PER_SILVER,
                'c' => 1,
                _ => {
                    return Err(DomainError::parse(format!(
                        "Unknown coin denomination in '{}'",
                        token
                    )))
                }
            };
            let amount: u32 = amount
                .parse()
                .map_err(|_| DomainError::parse(format!("Invalid coin amount in '{}'", token)))?;
            total = amount
                .checked_mul(rate)
                .and_then(|v| total.checked_add(v))
                .ok_or_else(|| DomainError::parse(format!("Coin value overflow: {}", input)))?;
        }
        Ok(Self(total))
    }
}

impl fmt::Display for Coins {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let gold = self.0 / COPPER_PER_GOLD;
        let silver = (self.0 % COPPER_PER_GOLD) / COPPER_PER_SILVER;
        let copper = self.0 % COPPER_PER_SILVER;

        let mut parts = Vec::new();
        if gold > 0 {
            parts.push(format!("{}g", gold));
        }
        if silver > 0 {
            parts.push(format!("{}s", silver));
        }
        if copper > 0 || parts.is_empty() {
            parts.push(format!("{}c", copper));
        }
        write!(f, "{}", parts.join(" "))
    }
}

/// Anything that occupies inventory slots.
pub trait Slotted {
    fn slots(&self) -> i32;
}

/// A weapon's rules-relevant profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Weapon {
    pub name: String,
    pub damage: DiceFormula,
    pub grip: Grip,
    #[serde(default)]
    pub slots: i32,
    #[serde(default)]
    pub value: Coins,
}

impl Weapon {
    /// Build from table text, e.g. `("Longsword", "d8", "V", "1", "8g")`.
    pub fn from_table_row(
        name: impl Into<String>,
        damage: &str,
        grip: &str,
        slots: &str,
        value: &str,
    ) -> Result<Self, DomainError> {
        let slots = match slots.trim() {
            "" | "-" => 0,
            s => s
                .parse()
                .map_err(|_| DomainError::parse(format!("Invalid slot count: {}", s)))?,
        };
        Ok(Self {
            name: name.into(),
            damage: DiceFormula::parse(damage)?,
            grip: grip.parse()?,
            slots,
            value: Coins::parse(value)?,
        })
    }
}

impl Slotted for Weapon {
    fn slots(&self) -> i32 {
        self.slots
    }
}

/// Armor worn by a character.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Armor {
    pub name: String,
    pub rating: i32,
    #[serde(default)]
    pub slots: i32,
    #[serde(default)]
    pub value: Coins,
}

impl Slotted for Armor {
    fn slots(&self) -> i32 {
        self.slots
    }
}

/// Total slots used by a set of items.
pub fn slots_used(items: &[&dyn Slotted]) -> i32 {
    items
        .iter()
        .fold(0i32, |acc, item| acc.saturating_add(item.slots()))
}

/// Damage left after armor soaks its rating; never negative.
pub fn apply_armor(damage: i32, armor_rating: i32) -> i32 {
    damage.saturating_sub(armor_rating.max(0)).max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grip_accepts_short_forms() {
        assert_eq!("1H".parse::<Grip>().unwrap(), Grip::OneHanded);
        assert_eq!("2H".parse::<Grip>().unwrap(), Grip::TwoHanded);
        assert_eq!("V".parse::<Grip>().unwrap(), Grip::Versatile);
        assert_eq!("fist".parse::<Grip>().unwrap(), Grip::Fist);
        assert!("3h".parse::<Grip>().is_err());
        assert_eq!(Grip::TwoHanded.hands(), 2);
    }

    #[test]
    fn coins_parse_mixed_denominations() {
        assert_eq!(Coins::parse("2g 5s").unwrap().copper(), 250);
        assert_eq!(Coins::parse("30s").unwrap().copper(), 300);
        assert_eq!(Coins::parse("8c").unwrap().copper(), 8);
        assert_eq!(Coins::parse("-").unwrap().copper(), 0);
        assert_eq!(Coins::parse("").unwrap().copper(), 0);
        assert!(Coins::parse("5p").is_err());
        assert!(Coins::parse("xg").is_err());
    }

    #[test]
    fn coins_display() {
        assert_eq!(Coins::from_copper(253).to_string(), "2g 5s 3c");
        assert_eq!(Coins::from_copper(0).to_string(), "0c");
        assert_eq!(Coins::from_copper(40).to_string(), "4s");
    }

    #[test]
    fn weapon_from_table_row_normalises_damage() {
        let sword = Weapon::from_table_row("Longsword", "d8", "V", "1", "8g").unwrap();
        assert_eq!(sword.damage.display(), "1d8");
        assert_eq!(sword.grip, Grip::Versatile);
        assert_eq!(sword.slots, 1);
        assert_eq!(sword.value.copper(), 800);

        let fist = Weapon::from_table_row("Unarmed", "1", "F", "-", "-").unwrap();
        assert_eq!(fist.damage.display(), "1");
        assert_eq!(fist.slots, 0);
    }

    #[test]
    fn slots_used_sums_mixed_items() {
        let sword = Weapon::from_table_row("Greatsword", "d10", "2H", "2", "10g").unwrap();
        let mail = Armor {
            name: "Chain".to_string(),
            rating: 2,
            slots: 3,
            value: Coins::default(),
        };
        assert_eq!(slots_used(&[&sword, &mail]), 5);
    }

    #[test]
    fn armor_never_heals() {
        assert_eq!(apply_armor(7, 2), 5);
        assert_eq!(apply_armor(1, 3), 0);
        assert_eq!(apply_armor(4, -1), 4);
    }

    #[test]
    fn armor_handles_extreme_values() {
        assert_eq!(apply_armor(-10, i32::MAX), 0);
        assert_eq!(apply_armor(i32::MIN, i32::MAX), 0);
        assert_eq!(apply_armor(i32::MAX, 0), i32::MAX);
    }

    #[test]
    fn weapon_serde_uses_formula_strings() {
        let json = r#"{"name":"Dagger","damage":"d4","grip":"1h","slots":1,"value":200}"#;
        let dagger: Weapon = serde_json::from_str(json).unwrap();
        assert_eq!(dagger.damage.display(), "1d4");
        assert_eq!(dagger.grip, Grip::OneHanded);
        assert_eq!(dagger.value.copper(), 200);
    }
}
