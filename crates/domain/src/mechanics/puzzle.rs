//! Riddles, sequences, combinations and item placement.
//!
//! Plates and mechanisms feed puzzles through signals; the orchestrator
//! delivers each signal here as ordinary input.

use serde::{Deserialize, Serialize};

use super::{answers_match, bonus_if, cipher};
use crate::check::{roll_check, CheckRoll};
use crate::entities::{Puzzle, PuzzleKind};
use crate::ids::{ItemId, TrapId};
use crate::ports::{ActorStats, DiceRoller, Proficiency};
use crate::value_objects::{Ability, DiceFormula, LinkUpdate, LockAction, Skill};

/// Penalty attached to a wrong attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleConsequence {
    pub trap_id: Option<TrapId>,
    pub damage: Option<DiceFormula>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PuzzleResult {
    pub success: bool,
    pub is_solved: bool,
    pub is_failed: bool,
    pub message: String,
    pub consequence: Option<PuzzleConsequence>,
    pub link_updates: Vec<LinkUpdate>,
}

impl PuzzleResult {
    fn rejected(puzzle: &Puzzle, message: impl Into<String>) -> Self {
        Self {
            success: false,
            is_solved: puzzle.is_solved,
            is_failed: puzzle.is_failed,
            message: message.into(),
            consequence: None,
            link_updates: Vec::new(),
        }
    }
}

enum Step {
    Solved,
    Correct,
    Wrong,
    Duplicate,
}

fn step_sequence(solution: &[String], input: &mut Vec<String>, value: &str) -> Step {
    input.push(value.to_string());
    let expected = solution.get(input.len() - 1);
    if expected.is_some_and(|e| e == value) {
        if input.len() == solution.len() {
            Step::Solved
        } else {
            Step::Correct
        }
    } else {
        input.clear();
        Step::Wrong
    }
}

fn step_placement(required: &[ItemId], placed: &mut Vec<ItemId>, value: &str) -> Step {
    let item = ItemId::new(value);
    if !required.contains(&item) {
        return Step::Wrong;
    }
    if placed.contains(&item) {
        return Step::Duplicate;
    }
    placed.push(item);
    if required.iter().all(|r| placed.contains(r)) {
        Step::Solved
    } else {
        Step::Correct
    }
}

/// Feed one piece of input to a puzzle: an answer, a lever signal, an item id
/// or, for ciphers, a full translation.
pub fn attempt_puzzle_input(puzzle: &mut Puzzle, input: &str) -> PuzzleResult {
    if puzzle.is_solved {
        return PuzzleResult::rejected(puzzle, "Puzzle is already solved.");
    }
    if puzzle.is_failed {
        return PuzzleResult::rejected(puzzle, "The mechanism is jammed or broken.");
    }

    let step = match &mut puzzle.kind {
        PuzzleKind::Riddle { accepted_answers } => {
            if accepted_answers.iter().any(|a| answers_match(a, input)) {
                Step::Solved
            } else {
                Step::Wrong
            }
        }
        PuzzleKind::Sequence { solution, input: entered }
        | PuzzleKind::Combination { solution, input: entered } => {
            step_sequence(solution, entered, input)
        }
        PuzzleKind::ItemPlacement {
            required_items,
            placed,
        } => step_placement(required_items, placed, input),
        PuzzleKind::Cipher(data) => {
            if cipher::reveal_on_match(data, input) {
                Step::Solved
            } else {
                Step::Wrong
            }
        }
    };

    match step {
        Step::Solved => {
            puzzle.is_solved = true;
            tracing::info!(puzzle_id = %puzzle.id, "Puzzle solved");
            let link_updates = puzzle
                .on_success
                .unlock_id
                .iter()
                .map(|lock_id| LinkUpdate::LockToggle {
                    lock_id: lock_id.clone(),
                    action: LockAction::Unlock,
                })
                .collect();
            PuzzleResult {
                success: true,
                is_solved: true,
                is_failed: false,
                message: puzzle.on_success.message.clone(),
                consequence: None,
                link_updates,
            }
        }
        Step::Correct => PuzzleResult {
            success: true,
            is_solved: false,
            is_failed: false,
            message: "Something clicks into place.".to_string(),
            consequence: None,
            link_updates: Vec::new(),
        },
        Step::Duplicate => PuzzleResult::rejected(puzzle, "Item already placed."),
        Step::Wrong => {
            let is_failed = puzzle.record_failed_attempt();
            let failure = puzzle.on_failure.as_ref();
            let default_message = if puzzle.cipher().is_some() {
                "That is not the correct translation."
            } else {
                "Nothing happens, or something went wrong."
            };
            let consequence = failure
                .filter(|f| f.trap_id.is_some() || f.damage.is_some())
                .map(|f| PuzzleConsequence {
                    trap_id: f.trap_id.clone(),
                    damage: f.damage.clone(),
                });
            PuzzleResult {
                success: false,
                is_solved: false,
                is_failed,
                message: failure
                    .map(|f| f.message.clone())
                    .unwrap_or_else(|| default_message.to_string()),
                consequence,
                link_updates: Vec::new(),
            }
        }
    }
}

/// The hint, if `check_total` meets the puzzle's hint DC.
pub fn check_puzzle_hint(check_total: i32, puzzle: &Puzzle) -> Option<&str> {
    let hint = puzzle.hint.as_deref()?;
    (check_total >= puzzle.hint_dc()).then_some(hint)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HintResult {
    pub check: Option<CheckRoll>,
    pub hint: Option<String>,
}

/// Study a puzzle for a hint: Intelligence (Investigation) vs the hint DC.
pub fn attempt_puzzle_hint(actor: &dyn ActorStats, puzzle: &Puzzle, dice: &dyn DiceRoller) -> HintResult {
    if puzzle.hint.is_none() {
        return HintResult {
            check: None,
            hint: None,
        };
    }

    let modifier = actor.ability_modifier(Ability::Intelligence)
        + bonus_if(
            actor,
            actor.is_proficient(Proficiency::Skill(Skill::Investigation)),
        );
    let check = roll_check(dice, modifier, puzzle.hint_dc());
    HintResult {
        hint: check_puzzle_hint(check.total, puzzle).map(str::to_string),
        check: Some(check),
    }
}
