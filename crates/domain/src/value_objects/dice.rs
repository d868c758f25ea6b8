//! Dice formula value objects and parsing
//!
//! Supports damage expressions like "1d6", "2d8-2", "d6+1d4+1" and flat
//! values like "1". Terms may also reference roll data (`1d6+@might`) when
//! parsed through [`DiceFormula::parse_with`].

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::random::{roll_die, RandomPort};

/// Most dice a single term may roll as written.
pub const MAX_DICE_COUNT: u32 = 1000;
/// Largest die a term may roll.
pub const MAX_DIE_FACES: u32 = 1000;

/// Error when parsing a dice formula
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DiceParseError {
    /// The formula string is empty
    #[error("Empty dice formula")]
    Empty,
    /// Invalid format - expected terms like XdY, dY or Z joined by + or -
    #[error("Invalid dice format: {0}")]
    InvalidFormat(String),
    /// Dice count must be between 1 and [`MAX_DICE_COUNT`]
    #[error("Dice count must be between 1 and {}", MAX_DICE_COUNT)]
    InvalidDiceCount,
    /// Die size must be between 2 and [`MAX_DIE_FACES`]
    #[error("Die size must be between 2 and {}", MAX_DIE_FACES)]
    InvalidDieSize,
    /// A value, or the formula's possible total, does not fit in an `i32`
    #[error("Modifier value overflow")]
    ModifierOverflow,
    /// `@name` did not resolve against the supplied roll data
    #[error("Unknown roll data reference: @{0}")]
    UnknownReference(String),
}

/// One additive term of a formula.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiceTerm {
    /// `count` dice of `faces` sides, subtracted when `negative`
    Dice {
        count: u32,
        faces: u32,
        negative: bool,
    },
    /// A flat signed value
    Flat(i32),
}

impl DiceTerm {
    fn min(&self) -> i64 {
        match *self {
            Self::Dice {
                count,
                faces,
                negative,
            } => {
                if negative {
                    -(count as i64 * faces as i64)
                } else {
                    count as i64
                }
            }
            Self::Flat(value) => value as i64,
        }
    }

    fn max(&self) -> i64 {
        match *self {
            Self::Dice {
                count,
                faces,
                negative,
            } => {
                if negative {
                    -(count as i64)
                } else {
                    count as i64 * faces as i64
                }
            }
            Self::Flat(value) => value as i64,
        }
    }
}

/// A parsed dice formula like "2d6+3"
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DiceFormula {
    terms: Vec<DiceTerm>,
}

impl DiceFormula {
    /// Create a single-term formula `countdfaces`
    pub fn dice(count: u32, faces: u32) -> Result<Self, DiceParseError> {
        Self::from_terms(vec![DiceTerm::Dice {
            count,
            faces,
            negative: false,
        }])
    }

    /// Build a formula from already-split terms, validating each dice term.
    pub fn from_terms(terms: Vec<DiceTerm>) -> Result<Self, DiceParseError> {
        if terms.is_empty() {
            return Err(DiceParseError::Empty);
        }
        for term in &terms {
            if let DiceTerm::Dice { count, faces, .. } = *term {
                if !(1..=MAX_DICE_COUNT).contains(&count) {
                    return Err(DiceParseError::InvalidDiceCount);
                }
                if !(2..=MAX_DIE_FACES).contains(&faces) {
                    return Err(DiceParseError::InvalidDieSize);
                }
            }
        }
        check_range(&terms)?;
        Ok(Self { terms })
    }

    /// Parse a formula string like "1d20+5", "2d8-2", "d6", "3"
    ///
    /// Supported terms, joined by `+` or `-`:
    /// - "XdY" - Roll X dice of size Y
    /// - "dY" - Roll 1 die of size Y (shorthand)
    /// - "Z" - Flat value
    pub fn parse(input: &str) -> Result<Self, DiceParseError> {
        Self::parse_with(input, |_| None)
    }

    /// Parse a formula whose flat terms may be `@name` references.
    ///
    /// `resolve` maps a reference name (without the `@`) to its value.
    pub fn parse_with<F>(input: &str, resolve: F) -> Result<Self, DiceParseError>
    where
        F: Fn(&str) -> Option<i32>,
    {
        let compact: String = input
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_lowercase();
        if compact.is_empty() {
            return Err(DiceParseError::Empty);
        }

        let mut terms = Vec::new();
        for (negative, body) in split_signed(&compact)? {
            terms.push(parse_term(body, negative, &resolve)?);
        }
        Self::from_terms(terms)
    }

    pub fn terms(&self) -> &[DiceTerm] {
        &self.terms
    }

    /// Sum of all flat terms
    pub fn flat_total(&self) -> i32 {
        self.terms
            .iter()
            .map(|t| match t {
                DiceTerm::Flat(v) => *v,
                DiceTerm::Dice { .. } => 0,
            })
            .fold(0i32, i32::saturating_add)
    }

    /// Whether the formula rolls any dice at all
    pub fn has_dice(&self) -> bool {
        self.terms
            .iter()
            .any(|t| matches!(t, DiceTerm::Dice { .. }))
    }

    /// The critical-hit form: every dice count doubled, flat terms untouched.
    pub fn doubled(&self) -> Result<Self, DiceParseError> {
        let terms = self
            .terms
            .iter()
            .map(|term| match *term {
                DiceTerm::Dice {
                    count,
                    faces,
                    negative,
                } => count
                    .checked_mul(2)
                    .map(|count| DiceTerm::Dice {
                        count,
                        faces,
                        negative,
                    })
                    .ok_or(DiceParseError::ModifierOverflow),
                flat => Ok(flat),
            })
            .collect::<Result<Vec<_>, _>>()?;
        check_range(&terms)?;
        Ok(Self { terms })
    }

    /// Roll the dice and return the result
    pub fn roll(&self, random: &dyn RandomPort) -> DiceRollResult {
        let mut dice = Vec::new();
        for term in &self.terms {
            if let DiceTerm::Dice {
                count,
                faces,
                negative,
            } = *term
            {
                let rolls = (0..count).map(|_| roll_die(random, faces)).collect();
                dice.push(TermRoll {
                    count,
                    faces,
                    negative,
                    rolls,
                });
            }
        }

        // Bounded by check_range, so the narrowing never saturates
        let dice_total: i64 = dice.iter().map(|t| t.subtotal() as i64).sum();
        let modifier_applied = self.flat_total();

        DiceRollResult {
            formula: self.clone(),
            dice,
            dice_total: saturate(dice_total),
            modifier_applied,
            total: saturate(dice_total + modifier_applied as i64),
        }
    }

    /// Get the minimum possible roll
    pub fn min_roll(&self) -> i64 {
        self.terms.iter().map(DiceTerm::min).sum()
    }

    /// Get the maximum possible roll
    pub fn max_roll(&self) -> i64 {
        self.terms.iter().map(DiceTerm::max).sum()
    }

    /// Format as a canonical display string (e.g., "1d6", "4d8-2")
    pub fn display(&self) -> String {
        let mut out = String::new();
        for (i, term) in self.terms.iter().enumerate() {
            let (negative, body) = match *term {
                DiceTerm::Dice {
                    count,
                    faces,
                    negative,
                } => (negative, format!("{}d{}", count, faces)),
                DiceTerm::Flat(value) => (value < 0, value.unsigned_abs().to_string()),
            };
            if negative {
                out.push('-');
            } else if i > 0 {
                out.push('+');
            }
            out.push_str(&body);
        }
        out
    }
}

impl fmt::Display for DiceFormula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display())
    }
}

impl std::str::FromStr for DiceFormula {
    type Err = DiceParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DiceFormula {
    type Error = DiceParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DiceFormula> for String {
    fn from(formula: DiceFormula) -> Self {
        formula.display()
    }
}

/// Double the dice of a formula string without rolling anything.
///
/// `double_dice("1d6") == "2d6"`, `double_dice("2d8-2") == "4d8-2"`.
pub fn double_dice(formula: &str) -> Result<String, DiceParseError> {
    Ok(DiceFormula::parse(formula)?.doubled()?.display())
}

/// Reject formulas whose possible totals leave the `i32` range, counting the
/// dice and flat parts on their own as well as together.
fn check_range(terms: &[DiceTerm]) -> Result<(), DiceParseError> {
    let fits = |v: i64| i32::try_from(v).is_ok();
    let (mut dice_min, mut dice_max, mut flat) = (0i64, 0i64, 0i64);
    for term in terms {
        match term {
            DiceTerm::Dice { .. } => {
                dice_min += term.min();
                dice_max += term.max();
            }
            DiceTerm::Flat(value) => flat += *value as i64,
        }
        if !fits(dice_min) || !fits(dice_max) || !fits(flat) {
            return Err(DiceParseError::ModifierOverflow);
        }
    }
    if fits(dice_min + flat) && fits(dice_max + flat) {
        Ok(())
    } else {
        Err(DiceParseError::ModifierOverflow)
    }
}

fn saturate(value: i64) -> i32 {
    i32::try_from(value).unwrap_or(if value < 0 { i32::MIN } else { i32::MAX })
}

fn split_signed(compact: &str) -> Result<Vec<(bool, &str)>, DiceParseError> {
    let mut parts = Vec::new();
    let mut negative = false;
    let mut start = 0;
    let bytes = compact.as_bytes();

    // A leading sign belongs to the first term
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        negative = bytes[0] == b'-';
        start = 1;
    }

    for (i, c) in compact.char_indices().skip(start) {
        if c == '+' || c == '-' {
            parts.push((negative, &compact[start..i]));
            negative = c == '-';
            start = i + 1;
        }
    }
    parts.push((negative, &compact[start..]));

    if parts.iter().any(|(_, body)| body.is_empty()) {
        return Err(DiceParseError::InvalidFormat(format!(
            "Dangling operator in '{}'",
            compact
        )));
    }
    Ok(parts)
}

fn parse_term<F>(body: &str, negative: bool, resolve: &F) -> Result<DiceTerm, DiceParseError>
where
    F: Fn(&str) -> Option<i32>,
{
    if let Some(name) = body.strip_prefix('@') {
        let value =
            resolve(name).ok_or_else(|| DiceParseError::UnknownReference(name.to_string()))?;
        let value = if negative {
            value.checked_neg().ok_or(DiceParseError::ModifierOverflow)?
        } else {
            value
        };
        return Ok(DiceTerm::Flat(value));
    }

    if let Some(d_pos) = body.find('d') {
        let count_str = &body[..d_pos];
        let faces_str = &body[d_pos + 1..];

        let count: u32 = if count_str.is_empty() {
            1 // "d6" means "1d6"
        } else {
            parse_number(count_str, "dice count").map_err(|err| match err {
                DiceParseError::ModifierOverflow => DiceParseError::InvalidDiceCount,
                other => other,
            })?
        };
        if !(1..=MAX_DICE_COUNT).contains(&count) {
            return Err(DiceParseError::InvalidDiceCount);
        }

        let faces: u32 = parse_number(faces_str, "die size").map_err(|err| match err {
            DiceParseError::ModifierOverflow => DiceParseError::InvalidDieSize,
            other => other,
        })?;
        if !(2..=MAX_DIE_FACES).contains(&faces) {
            return Err(DiceParseError::InvalidDieSize);
        }

        return Ok(DiceTerm::Dice {
            count,
            faces,
            negative,
        });
    }

    let value: i32 = parse_number(body, "modifier")?;
    Ok(DiceTerm::Flat(if negative { -value } else { value }))
}

fn parse_number<T: std::str::FromStr>(s: &str, what: &str) -> Result<T, DiceParseError> {
    if s.is_empty() || !s.chars().all(|c| c.is_ascii_digit()) {
        return Err(DiceParseError::InvalidFormat(format!(
            "Invalid {}: '{}'",
            what, s
        )));
    }
    s.parse().map_err(|_| DiceParseError::ModifierOverflow)
}

/// Rolls produced by one dice term
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TermRoll {
    pub count: u32,
    pub faces: u32,
    pub negative: bool,
    /// Individual die results, always positive
    pub rolls: Vec<i32>,
}

impl TermRoll {
    /// Signed contribution of this term to the total
    pub fn subtotal(&self) -> i32 {
        let sum: i64 = self.rolls.iter().map(|&r| r as i64).sum();
        saturate(if self.negative { -sum } else { sum })
    }
}

/// Result of rolling a formula
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiceRollResult {
    /// The formula that was rolled
    pub formula: DiceFormula,
    /// Rolls grouped by dice term
    pub dice: Vec<TermRoll>,
    /// Signed sum of all dice
    pub dice_total: i32,
    /// Sum of flat terms
    pub modifier_applied: i32,
    /// Final total (dice_total + modifier)
    pub total: i32,
}

impl DiceRollResult {
    /// All individual die results in roll order
    pub fn individual_rolls(&self) -> Vec<i32> {
        self.dice.iter().flat_map(|t| t.rolls.iter().copied()).collect()
    }

    /// Format as a breakdown string (e.g., "1d20(14) + 5 = 19", "2d6[4, 5] + 3 = 12")
    pub fn breakdown(&self) -> String {
        let mut out = String::new();
        for (i, term) in self.dice.iter().enumerate() {
            let rolled = if term.rolls.len() == 1 {
                format!("{}d{}({})", term.count, term.faces, term.rolls[0])
            } else {
                let rolls: Vec<String> = term.rolls.iter().map(|r| r.to_string()).collect();
                format!("{}d{}[{}]", term.count, term.faces, rolls.join(", "))
            };
            if term.negative {
                out.push_str(if i == 0 { "-" } else { " - " });
            } else if i > 0 {
                out.push_str(" + ");
            }
            out.push_str(&rolled);
        }

        if self.modifier_applied != 0 || out.is_empty() {
            if out.is_empty() {
                out.push_str(&self.modifier_applied.to_string());
            } else if self.modifier_applied > 0 {
                out.push_str(&format!(" + {}", self.modifier_applied));
            } else {
                out.push_str(&format!(" - {}", -self.modifier_applied));
            }
        }

        format!("{} = {}", out, self.total)
    }
}
