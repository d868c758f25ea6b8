//! Vagabond rules engine.
//!
//! ## Structure
//!
//! - `use_cases/` - Derive, check, damage, morale, countdown and progression flows
//! - `infrastructure/` - Configuration, random sources and JSON input
//! - `app` - Application composition

pub mod app;
pub mod infrastructure;
pub mod use_cases;

pub use app::App;
