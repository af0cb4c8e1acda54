use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::ids::{ItemId, LockId, PuzzleId, TrapId};
use crate::value_objects::DiceFormula;

/// DC used for hints and deciphering when none is authored.
pub const DEFAULT_HINT_DC: i32 = 15;

/// How a cipher's plaintext was scrambled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CipherMethod {
    /// Caesar shift by the given amount (may be negative)
    Shift(i32),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CipherData {
    pub method: CipherMethod,
    /// Filled in by `initialize_cipher` when left empty at authoring time
    #[serde(default)]
    pub encrypted_text: String,
    pub decrypted_text: String,
    /// Character positions of the plaintext shown to players
    #[serde(default)]
    pub revealed_indices: BTreeSet<usize>,
    /// Script the text is written in; readers of it decipher with proficiency
    pub language: Option<String>,
}

impl CipherData {
    pub fn shift(decrypted_text: impl Into<String>, amount: i32) -> Self {
        Self {
            method: CipherMethod::Shift(amount),
            encrypted_text: String::new(),
            decrypted_text: decrypted_text.into(),
            revealed_indices: BTreeSet::new(),
            language: None,
        }
    }

    pub fn in_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Positions of every letter in the plaintext.
    pub fn letter_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.decrypted_text
            .char_indices()
            .filter(|(_, c)| c.is_ascii_alphabetic())
            .map(|(idx, _)| idx)
    }

    pub fn all_letters_revealed(&self) -> bool {
        self.letter_indices()
            .all(|idx| self.revealed_indices.contains(&idx))
    }
}

/// Puzzle variants and their in-progress input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PuzzleKind {
    Riddle {
        #[serde(rename = "acceptedAnswers")]
        accepted_answers: Vec<String>,
    },
    Sequence {
        solution: Vec<String>,
        #[serde(default)]
        input: Vec<String>,
    },
    Combination {
        solution: Vec<String>,
        #[serde(default)]
        input: Vec<String>,
    },
    ItemPlacement {
        #[serde(rename = "requiredItems")]
        required_items: Vec<ItemId>,
        #[serde(default)]
        placed: Vec<ItemId>,
    },
    Cipher(CipherData),
}

/// Rewards wired to solving the puzzle.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleSuccess {
    pub message: String,
    pub unlock_id: Option<LockId>,
    pub trigger_event: Option<String>,
}

/// Penalties for a wrong attempt.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleFailure {
    pub message: String,
    pub trap_id: Option<TrapId>,
    pub damage: Option<DiceFormula>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Puzzle {
    pub id: PuzzleId,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub kind: PuzzleKind,
    pub hint: Option<String>,
    #[serde(rename = "hintDC")]
    pub hint_dc: Option<i32>,
    pub max_attempts: Option<u32>,
    #[serde(default)]
    pub current_attempts: u32,
    #[serde(default)]
    pub is_solved: bool,
    #[serde(default)]
    pub is_failed: bool,
    pub on_success: PuzzleSuccess,
    pub on_failure: Option<PuzzleFailure>,
}

impl Puzzle {
    pub fn new(
        id: PuzzleId,
        name: impl Into<String>,
        kind: PuzzleKind,
        success_message: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            kind,
            hint: None,
            hint_dc: None,
            max_attempts: None,
            current_attempts: 0,
            is_solved: false,
            is_failed: false,
            on_success: PuzzleSuccess {
                message: success_message.into(),
                ..PuzzleSuccess::default()
            },
            on_failure: None,
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>, dc: i32) -> Self {
        self.hint = Some(hint.into());
        self.hint_dc = Some(dc);
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = Some(max_attempts);
        self
    }

    pub fn unlocks(mut self, lock_id: LockId) -> Self {
        self.on_success.unlock_id = Some(lock_id);
        self
    }

    pub fn with_failure(mut self, failure: PuzzleFailure) -> Self {
        self.on_failure = Some(failure);
        self
    }

    pub fn hint_dc(&self) -> i32 {
        self.hint_dc.unwrap_or(DEFAULT_HINT_DC)
    }

    /// Solved or failed puzzles accept no further input.
    pub fn is_concluded(&self) -> bool {
        self.is_solved || self.is_failed
    }

    pub fn cipher(&self) -> Option<&CipherData> {
        match &self.kind {
            PuzzleKind::Cipher(data) => Some(data),
            _ => None,
        }
    }

    /// Count a failed attempt; returns true when this exhausts the puzzle.
    pub fn record_failed_attempt(&mut self) -> bool {
        self.current_attempts += 1;
        if let Some(max) = self.max_attempts {
            if self.current_attempts >= max {
                self.is_failed = true;
                tracing::info!(puzzle_id = %self.id, attempts = self.current_attempts, "Puzzle failed");
            }
        }
        self.is_failed
    }
}
