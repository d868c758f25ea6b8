//! Use cases - orchestrate derivation and resolution, and log what happened.

pub mod checks;
pub mod countdown;
pub mod morale;
pub mod progression;
pub mod stats;

pub use checks::{CheckError, CheckKind, CheckReport, DamageReport, RollCheck, RollDamage};
pub use countdown::TickCountdowns;
pub use morale::{MoraleError, MoraleUseCases};
pub use progression::{ApplyClassLevel, ProgressionReport};
pub use stats::DeriveStats;
