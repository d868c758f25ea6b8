//! Application state and composition.

use std::sync::Arc;

use vagabond_domain::{RandomPort, RulesConfig};

use crate::infrastructure::config::{ConfigError, EngineConfig};
use crate::infrastructure::random::random_source;
use crate::use_cases;

/// Main application state.
///
/// Holds the rules tables, the random source and every use case wired to them.
pub struct App {
    pub rules: Arc<RulesConfig>,
    pub random: Arc<dyn RandomPort>,
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub stats: use_cases::DeriveStats,
    pub check: use_cases::RollCheck,
    pub damage: use_cases::RollDamage,
    pub morale: use_cases::MoraleUseCases,
    pub countdown: use_cases::TickCountdowns,
    pub progression: use_cases::ApplyClassLevel,
}

impl App {
    pub fn new(rules: RulesConfig, random: Arc<dyn RandomPort>) -> Self {
        let rules = Arc::new(rules);
        let use_cases = UseCases {
            stats: use_cases::DeriveStats::new(rules.clone()),
            check: use_cases::RollCheck::new(rules.clone(), random.clone()),
            damage: use_cases::RollDamage::new(random.clone()),
            morale: use_cases::MoraleUseCases::new(random.clone()),
            countdown: use_cases::TickCountdowns::new(random.clone()),
            progression: use_cases::ApplyClassLevel::new(),
        };
        Self {
            rules,
            random,
            use_cases,
        }
    }

    /// Build from engine settings: load the rules tables and pick the random source.
    pub fn from_config(config: &EngineConfig) -> Result<Self, ConfigError> {
        let rules = config.rules()?;
        if config.seed.is_some() {
            tracing::info!(seed = ?config.seed, "Using seeded dice");
        }
        Ok(Self::new(rules, random_source(config.seed)))
    }
}
