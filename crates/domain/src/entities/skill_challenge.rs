use serde::{Deserialize, Serialize};

use crate::entities::{StatusCondition, TrapEffect};
use crate::error::DomainError;
use crate::ids::{ChallengeId, ItemId};

/// DC penalty for an approach that is not on the challenge's skill list.
pub const CREATIVE_DC_PENALTY: i32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeStatus {
    #[default]
    Active,
    Success,
    Failure,
}

impl ChallengeStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, ChallengeStatus::Active)
    }
}

/// A skill the challenge explicitly accepts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeSkill {
    /// A skill name ("Athletics") or an ability name ("Strength")
    pub skill_name: String,
    #[serde(default)]
    pub description: String,
    pub dc_modifier: Option<i32>,
    pub max_uses: Option<u32>,
    #[serde(default)]
    pub uses: u32,
}

impl ChallengeSkill {
    pub fn new(skill_name: impl Into<String>) -> Self {
        Self {
            skill_name: skill_name.into(),
            description: String::new(),
            dc_modifier: None,
            max_uses: None,
            uses: 0,
        }
    }

    pub fn with_dc_modifier(mut self, modifier: i32) -> Self {
        self.dc_modifier = Some(modifier);
        self
    }

    pub fn with_max_uses(mut self, max_uses: u32) -> Self {
        self.max_uses = Some(max_uses);
        self
    }

    pub fn is_exhausted(&self) -> bool {
        self.max_uses.is_some_and(|max| self.uses >= max)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeRewards {
    pub xp: Option<u32>,
    #[serde(default)]
    pub items: Vec<ItemId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeSuccess {
    pub message: String,
    pub rewards: Option<ChallengeRewards>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChallengeFailure {
    pub message: String,
    pub consequence: Option<TrapEffect>,
}

impl ChallengeFailure {
    pub fn with_condition(message: impl Into<String>, condition: StatusCondition) -> Self {
        Self {
            message: message.into(),
            consequence: Some(TrapEffect::default().with_condition(condition)),
        }
    }
}

/// A structured contest: accumulate successes before failures run out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillChallenge {
    pub id: ChallengeId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub required_successes: u32,
    pub max_failures: u32,
    #[serde(rename = "baseDC")]
    pub base_dc: i32,
    pub available_skills: Vec<ChallengeSkill>,
    #[serde(default)]
    pub allow_creative_skills: bool,
    #[serde(default)]
    pub current_successes: u32,
    #[serde(default)]
    pub current_failures: u32,
    #[serde(default)]
    pub status: ChallengeStatus,
    #[serde(default)]
    pub log: Vec<String>,
    #[serde(default)]
    pub on_success: ChallengeSuccess,
    #[serde(default)]
    pub on_failure: ChallengeFailure,
}

impl SkillChallenge {
    pub fn new(
        id: ChallengeId,
        name: impl Into<String>,
        required_successes: u32,
        max_failures: u32,
        base_dc: i32,
    ) -> Result<Self, DomainError> {
        if required_successes == 0 {
            return Err(DomainError::validation(
                "Skill challenge needs at least one required success",
            ));
        }
        if max_failures == 0 {
            return Err(DomainError::validation(
                "Skill challenge needs at least one allowed failure",
            ));
        }
        Ok(Self {
            id,
            name: name.into(),
            description: String::new(),
            required_successes,
            max_failures,
            base_dc,
            available_skills: Vec::new(),
            allow_creative_skills: false,
            current_successes: 0,
            current_failures: 0,
            status: ChallengeStatus::Active,
            log: Vec::new(),
            on_success: ChallengeSuccess::default(),
            on_failure: ChallengeFailure::default(),
        })
    }

    pub fn with_skill(mut self, skill: ChallengeSkill) -> Self {
        self.available_skills.push(skill);
        self
    }

    pub fn allowing_creative_skills(mut self) -> Self {
        self.allow_creative_skills = true;
        self
    }

    pub fn on_success(mut self, success: ChallengeSuccess) -> Self {
        self.on_success = success;
        self
    }

    pub fn on_failure(mut self, failure: ChallengeFailure) -> Self {
        self.on_failure = failure;
        self
    }

    pub fn find_skill(&self, skill_name: &str) -> Option<usize> {
        self.available_skills
            .iter()
            .position(|s| s.skill_name.eq_ignore_ascii_case(skill_name))
    }
}
