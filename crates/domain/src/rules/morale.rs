//! NPC morale.
//!
//! An NPC holds when 2d6 comes up at or under its morale score and flees
//! otherwise. Fleeing breaks the NPC for the rest of the encounter: further
//! checks and prompts are suppressed until [`MoraleStatus::reset`].

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entities::Actor;
use crate::error::DomainError;
use crate::ids::ActorId;
use crate::random::{roll_die, RandomPort};

pub const MORALE_DICE: u32 = 2;
pub const MORALE_DIE_FACES: u32 = 6;

/// Why a morale check was called for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MoraleTrigger {
    FirstAllyDeath,
    HalfGroupDefeated,
    LeaderDefeated,
    /// A lone NPC dropped to half its hit points
    SoloHalfHp,
    Manual,
}

impl MoraleTrigger {
    pub fn description(&self) -> &'static str {
        match self {
            Self::FirstAllyDeath => "first ally death",
            Self::HalfGroupDefeated => "half the group defeated",
            Self::LeaderDefeated => "leader defeated",
            Self::SoloHalfHp => "reduced to half hit points",
            Self::Manual => "called by the GM",
        }
    }
}

impl fmt::Display for MoraleTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MoraleResult {
    Passed,
    Fled,
}

/// Per-NPC morale bookkeeping.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MoraleStatus {
    pub checked_this_combat: bool,
    /// Sticky until reset
    pub broken: bool,
    pub last_trigger: Option<MoraleTrigger>,
    pub last_result: Option<MoraleResult>,
}

impl MoraleStatus {
    /// Start a new encounter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn record(&mut self, trigger: MoraleTrigger, result: MoraleResult) {
        self.checked_this_combat = true;
        self.last_trigger = Some(trigger);
        self.last_result = Some(result);
        if result == MoraleResult::Fled {
            self.broken = true;
        }
    }
}

/// A rolled morale check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoraleCheck {
    pub trigger: MoraleTrigger,
    pub dice: Vec<i32>,
    pub roll: i32,
    /// The score rolled against
    pub morale: i32,
    pub passed: bool,
    pub fled: bool,
}

impl MoraleCheck {
    pub fn result(&self) -> MoraleResult {
        if self.passed {
            MoraleResult::Passed
        } else {
            MoraleResult::Fled
        }
    }
}

fn roll_2d6(trigger: MoraleTrigger, morale: i32, random: &dyn RandomPort) -> MoraleCheck {
    let dice: Vec<i32> = (0..MORALE_DICE)
        .map(|_| roll_die(random, MORALE_DIE_FACES))
        .collect();
    let roll = dice.iter().sum();
    let passed = roll <= morale;
    MoraleCheck {
        trigger,
        dice,
        roll,
        morale,
        passed,
        fled: !passed,
    }
}

/// Roll morale for one NPC and record the result on it.
///
/// A broken NPC yields `Ok(None)` without rolling.
pub fn roll_morale(
    actor: &mut Actor,
    trigger: MoraleTrigger,
    random: &dyn RandomPort,
) -> Result<Option<MoraleCheck>, DomainError> {
    let kind = actor.kind_label();
    let npc = actor
        .as_npc_mut()
        .ok_or_else(|| DomainError::wrong_actor_kind("Morale check", "an NPC", kind))?;
    if npc.is_broken() {
        return Ok(None);
    }

    let check = roll_2d6(trigger, npc.morale, random);
    npc.morale_status.record(trigger, check.result());
    Ok(Some(check))
}

/// A request for the GM to roll morale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MoralePrompt {
    pub actor_id: ActorId,
    pub name: String,
    pub morale: i32,
    pub trigger: MoraleTrigger,
}

/// Ask for a morale check. `None` for non-NPCs and broken NPCs.
pub fn prompt_morale_check(actor: &Actor, trigger: MoraleTrigger) -> Option<MoralePrompt> {
    let npc = actor.as_npc()?;
    if npc.is_broken() {
        return None;
    }
    Some(MoralePrompt {
        actor_id: npc.id,
        name: npc.name.clone(),
        morale: npc.morale,
        trigger,
    })
}

/// Result of a group morale check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMoraleOutcome {
    /// `None` when nobody in the selection could check
    pub check: Option<MoraleCheck>,
    /// NPCs that took part in the roll
    pub participants: Vec<ActorId>,
    /// Set when the roll was skipped
    pub warning: Option<String>,
}

impl GroupMoraleOutcome {
    pub fn fled(&self) -> bool {
        self.check.as_ref().is_some_and(|c| c.fled)
    }
}

/// Roll once for a group against its lowest morale score.
///
/// Only NPCs that are not broken take part. Every participant records the
/// result, and all of them break if the group flees.
pub fn roll_group_morale(
    actors: &mut [Actor],
    trigger: MoraleTrigger,
    random: &dyn RandomPort,
) -> GroupMoraleOutcome {
    let lowest = actors
        .iter()
        .filter_map(Actor::as_npc)
        .filter(|npc| !npc.is_broken())
        .map(|npc| npc.morale)
        .min();

    let Some(morale) = lowest else {
        return GroupMoraleOutcome {
            check: None,
            participants: Vec::new(),
            warning: Some("No NPCs able to check morale in the selection".to_string()),
        };
    };

    let check = roll_2d6(trigger, morale, random);
    let mut participants = Vec::new();
    for npc in actors.iter_mut().filter_map(Actor::as_npc_mut) {
        if npc.is_broken() {
            continue;
        }
        npc.morale_status.record(trigger, check.result());
        participants.push(npc.id);
    }

    GroupMoraleOutcome {
        check: Some(check),
        participants,
        warning: None,
    }
}
