use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::ports::{ActorStats, Proficiency};
use crate::value_objects::{Ability, AbilityScores, Size};

/// The canonical actor: ability scores, level and training.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub name: String,
    pub level: u8,
    #[serde(default)]
    pub classes: Vec<String>,
    pub abilities: AbilityScores,
    #[serde(default)]
    pub proficiencies: HashSet<Proficiency>,
    #[serde(default)]
    pub languages: Vec<String>,
    #[serde(default)]
    pub size: Size,
}

impl Character {
    pub fn new(name: impl Into<String>, level: u8) -> Self {
        Self {
            name: name.into(),
            level: level.max(1),
            classes: Vec::new(),
            abilities: AbilityScores::default(),
            proficiencies: HashSet::new(),
            languages: vec!["Common".to_string()],
            size: Size::Medium,
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_score(mut self, ability: Ability, score: i32) -> Self {
        self.abilities = self.abilities.with_score(ability, score);
        self
    }

    pub fn with_proficiency(mut self, proficiency: Proficiency) -> Self {
        self.proficiencies.insert(proficiency);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.languages.push(language.into());
        self
    }

    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }
}

impl ActorStats for Character {
    fn ability_modifier(&self, ability: Ability) -> i32 {
        self.abilities.modifier(ability)
    }

    /// +2 at levels 1-4, rising by one every four levels.
    fn proficiency_bonus(&self) -> i32 {
        2 + (i32::from(self.level.max(1)) - 1) / 4
    }

    fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c.eq_ignore_ascii_case(class))
    }

    fn is_proficient(&self, proficiency: Proficiency) -> bool {
        self.proficiencies.contains(&proficiency)
    }

    fn size(&self) -> Size {
        self.size
    }

    fn knows_language(&self, language: &str) -> bool {
        self.languages.iter().any(|l| l.eq_ignore_ascii_case(language))
    }
}
