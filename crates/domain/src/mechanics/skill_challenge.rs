//! Skill challenges: a run of checks toward a success or failure verdict.

use serde::{Deserialize, Serialize};

use super::bonus_if;
use crate::check::{roll_check, CheckRoll};
use crate::entities::{ChallengeRewards, ChallengeStatus, SkillChallenge, TrapEffect, CREATIVE_DC_PENALTY};
use crate::ports::{ActorStats, DiceRoller, Proficiency};
use crate::value_objects::{Ability, Skill};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ChallengeAttempt {
    /// Refused before rolling; nothing on the challenge changed
    Rejected { reason: String },
    Resolved { check: CheckRoll },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillChallengeResult {
    pub attempt: ChallengeAttempt,
    pub status: ChallengeStatus,
    pub current_successes: u32,
    pub current_failures: u32,
    pub message: String,
    /// Set on the attempt that wins the challenge
    pub rewards: Option<ChallengeRewards>,
    /// Set on the attempt that loses the challenge
    pub consequence: Option<TrapEffect>,
}

impl SkillChallengeResult {
    pub fn success(&self) -> bool {
        matches!(&self.attempt, ChallengeAttempt::Resolved { check } if check.success)
    }

    fn rejected(challenge: &SkillChallenge, reason: String) -> Self {
        Self {
            message: reason.clone(),
            attempt: ChallengeAttempt::Rejected { reason },
            status: challenge.status,
            current_successes: challenge.current_successes,
            current_failures: challenge.current_failures,
            rewards: None,
            consequence: None,
        }
    }
}

/// Ability and proficiency for a named approach. Ability names are used as
/// raw ability checks; unknown skills fall back to Dexterity.
fn approach_modifier(actor: &dyn ActorStats, skill_name: &str) -> i32 {
    if let Ok(ability) = skill_name.parse::<Ability>() {
        return actor.ability_modifier(ability);
    }
    match Skill::from_name(skill_name) {
        Some(skill) => {
            actor.ability_modifier(skill.ability())
                + bonus_if(actor, actor.is_proficient(Proficiency::Skill(skill)))
        }
        None => actor.ability_modifier(Ability::Dexterity),
    }
}

/// Make one attempt at the challenge using `skill_name`.
pub fn attempt_skill_challenge(
    actor: &dyn ActorStats,
    challenge: &mut SkillChallenge,
    skill_name: &str,
    dice: &dyn DiceRoller,
) -> SkillChallengeResult {
    if challenge.status.is_terminal() {
        return SkillChallengeResult::rejected(
            challenge,
            format!("The challenge is already over ({:?}).", challenge.status),
        );
    }

    let listed = challenge.find_skill(skill_name);
    let dc = match listed.and_then(|idx| challenge.available_skills.get(idx)) {
        Some(skill) if skill.is_exhausted() => {
            return SkillChallengeResult::rejected(
                challenge,
                format!("{} cannot be used again in this challenge.", skill.skill_name),
            );
        }
        Some(skill) => challenge.base_dc + skill.dc_modifier.unwrap_or(0),
        None if challenge.allow_creative_skills => challenge.base_dc + CREATIVE_DC_PENALTY,
        None => {
            return SkillChallengeResult::rejected(
                challenge,
                format!("{} will not help here.", skill_name),
            );
        }
    };

    let check = roll_check(dice, approach_modifier(actor, skill_name), dc);

    if let Some(skill) = listed.and_then(|idx| challenge.available_skills.get_mut(idx)) {
        skill.uses += 1;
    }
    if check.success {
        challenge.current_successes += 1;
    } else {
        challenge.current_failures += 1;
    }
    challenge.log.push(format!(
        "{}: {} ({})",
        skill_name,
        if check.success { "success" } else { "failure" },
        check.breakdown()
    ));

    // Failure wins when both thresholds are reached at once.
    if challenge.current_failures >= challenge.max_failures {
        challenge.status = ChallengeStatus::Failure;
    } else if challenge.current_successes >= challenge.required_successes {
        challenge.status = ChallengeStatus::Success;
    }

    let (message, rewards, consequence) = match challenge.status {
        ChallengeStatus::Success => {
            tracing::info!(challenge_id = %challenge.id, "Skill challenge won");
            (
                challenge.on_success.message.clone(),
                challenge.on_success.rewards.clone(),
                None,
            )
        }
        ChallengeStatus::Failure => {
            tracing::info!(challenge_id = %challenge.id, "Skill challenge lost");
            (
                challenge.on_failure.message.clone(),
                None,
                challenge.on_failure.consequence.clone(),
            )
        }
        ChallengeStatus::Active => (
            format!(
                "{} {}. ({}/{} successes, {}/{} failures)",
                skill_name,
                if check.success { "succeeds" } else { "fails" },
                challenge.current_successes,
                challenge.required_successes,
                challenge.current_failures,
                challenge.max_failures
            ),
            None,
            None,
        ),
    };

    SkillChallengeResult {
        attempt: ChallengeAttempt::Resolved { check },
        status: challenge.status,
        current_successes: challenge.current_successes,
        current_failures: challenge.current_failures,
        message,
        rewards,
        consequence,
    }
}
