//! Value objects - Immutable objects defined by their attributes

mod dice;
mod favor;
mod stat;

pub use dice::{
    double_dice, DiceFormula, DiceParseError, DiceRollResult, DiceTerm, TermRoll, MAX_DICE_COUNT,
    MAX_DIE_FACES,
};
pub use favor::FavorHinder;
pub use stat::{Level, PrimaryStats, SaveType, Stat, STAT_MAX, STAT_MIN};
