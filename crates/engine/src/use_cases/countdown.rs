//! Countdown dice on active effects.

use std::sync::Arc;

use vagabond_domain::rules::step_faces;
use vagabond_domain::{
    tick_countdowns, CountdownEffect, CountdownStep, CountdownTick, DomainError, RandomPort,
};

pub struct TickCountdowns {
    random: Arc<dyn RandomPort>,
}

impl TickCountdowns {
    pub fn new(random: Arc<dyn RandomPort>) -> Self {
        Self { random }
    }

    /// Roll every effect's countdown die once, in order.
    pub fn execute(&self, effects: &mut [CountdownEffect]) -> CountdownTick {
        let tick = tick_countdowns(effects, self.random.as_ref());
        for (name, step) in &tick.steps {
            tracing::debug!(
                effect = %name,
                roll = ?step.roll,
                next = %step.next,
                "Countdown rolled"
            );
        }
        for name in &tick.ended {
            tracing::info!(effect = %name, "Countdown ended");
        }
        tick
    }

    /// Step a single die given by its raw size (6, 4 or 0).
    pub fn step(&self, faces: u8) -> Result<CountdownStep, DomainError> {
        let step = step_faces(faces, self.random.as_ref())?;
        tracing::debug!(
            from = %step.previous,
            roll = ?step.roll,
            next = %step.next,
            "Countdown rolled"
        );
        Ok(step)
    }
}
