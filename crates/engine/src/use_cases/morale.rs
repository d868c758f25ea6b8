//! Morale use cases.

use std::sync::Arc;

use thiserror::Error;
use vagabond_domain::{
    prompt_morale_check, roll_group_morale, roll_morale, Actor, DomainError, GroupMoraleOutcome,
    MoraleCheck, MoralePrompt, MoraleTrigger, RandomPort,
};

#[derive(Debug, Error)]
pub enum MoraleError {
    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// Container for morale use cases.
pub struct MoraleUseCases {
    random: Arc<dyn RandomPort>,
}

impl MoraleUseCases {
    pub fn new(random: Arc<dyn RandomPort>) -> Self {
        Self { random }
    }

    /// Roll morale for one NPC. `Ok(None)` when it is already broken.
    pub fn roll(
        &self,
        actor: &mut Actor,
        trigger: MoraleTrigger,
    ) -> Result<Option<MoraleCheck>, MoraleError> {
        let check = roll_morale(actor, trigger, self.random.as_ref())?;
        match &check {
            Some(check) => {
                tracing::debug!(
                    npc = %actor.name(),
                    trigger = %trigger,
                    roll = check.roll,
                    morale = check.morale,
                    passed = check.passed,
                    "Morale rolled"
                );
                if check.fled {
                    tracing::info!(npc = %actor.name(), trigger = %trigger, "NPC broke and fled");
                }
            }
            None => {
                tracing::debug!(npc = %actor.name(), "Morale check skipped for broken NPC");
            }
        }
        Ok(check)
    }

    /// Ask the GM for a morale check, if one makes sense for `actor`.
    pub fn prompt(&self, actor: &Actor, trigger: MoraleTrigger) -> Option<MoralePrompt> {
        let prompt = prompt_morale_check(actor, trigger);
        if prompt.is_none() {
            tracing::debug!(actor = %actor.name(), trigger = %trigger, "No morale prompt");
        }
        prompt
    }

    /// One roll for the whole selection against its weakest member.
    pub fn roll_group(&self, actors: &mut [Actor], trigger: MoraleTrigger) -> GroupMoraleOutcome {
        let outcome = roll_group_morale(actors, trigger, self.random.as_ref());
        if let Some(warning) = &outcome.warning {
            tracing::warn!(trigger = %trigger, "{}", warning);
        }
        if let Some(check) = &outcome.check {
            tracing::debug!(
                trigger = %trigger,
                roll = check.roll,
                morale = check.morale,
                participants = outcome.participants.len(),
                "Group morale rolled"
            );
            if check.fled {
                tracing::info!(
                    participants = outcome.participants.len(),
                    "Group broke and fled"
                );
            }
        }
        outcome
    }

    /// Clear morale state on every NPC for a new encounter.
    pub fn reset_encounter(&self, actors: &mut [Actor]) {
        let mut reset = 0usize;
        for npc in actors.iter_mut().filter_map(Actor::as_npc_mut) {
            npc.morale_status.reset();
            reset += 1;
        }
        tracing::info!(npcs = reset, "Morale reset for new encounter");
    }
}

#[cfg(test)]
mod tests {
    use vagabond_domain::{Character, FixedRandom, Level, Npc, PrimaryStats};

    use super::*;

    fn use_cases(values: Vec<i32>) -> MoraleUseCases {
        MoraleUseCases::new(Arc::new(FixedRandom::new(values)))
    }

    #[test]
    fn roll_then_suppress() {
        let morale = use_cases(vec![6, 6]);
        let mut goblin: Actor = Npc::new("Goblin", 7).into();

        let check = morale.roll(&mut goblin, MoraleTrigger::FirstAllyDeath).unwrap().unwrap();
        assert!(check.fled);
        assert!(morale.roll(&mut goblin, MoraleTrigger::Manual).unwrap().is_none());
        assert!(morale.prompt(&goblin, MoraleTrigger::Manual).is_none());
    }

    #[test]
    fn characters_cannot_roll_morale() {
        let morale = use_cases(vec![3]);
        let mut pc: Actor =
            Character::new("Wren", PrimaryStats::uniform(4), Level::default()).into();
        let err = morale.roll(&mut pc, MoraleTrigger::Manual).unwrap_err();
        assert!(matches!(
            err,
            MoraleError::Domain(DomainError::WrongActorKind { .. })
        ));
    }

    #[test]
    fn reset_encounter_restores_every_npc() {
        let morale = use_cases(vec![6]);
        let mut group: Vec<Actor> = vec![Npc::new("A", 3).into(), Npc::new("B", 4).into()];
        let outcome = morale.roll_group(&mut group, MoraleTrigger::LeaderDefeated);
        assert!(outcome.fled());

        morale.reset_encounter(&mut group);
        assert!(group.iter().all(|a| a.as_npc().is_some_and(|n| !n.is_broken())));
        assert!(morale.prompt(&group[0], MoraleTrigger::Manual).is_some());
    }

    #[test]
    fn empty_group_returns_warning() {
        let outcome = use_cases(vec![3]).roll_group(&mut [], MoraleTrigger::Manual);
        assert!(outcome.check.is_none());
        assert!(outcome.warning.is_some());
    }
}
