//! Puzzles, ciphers and skill challenges.

use delve_domain::{
    attempt_cipher_solution, attempt_decipher, attempt_puzzle_hint, attempt_puzzle_input,
    attempt_skill_challenge, ActorStats, ChallengeId, DecipherResult, HintResult, LinkUpdate,
    LockAction, Puzzle, PuzzleConsequence, PuzzleId, PuzzleResult, SkillChallengeResult,
};

use super::{Interaction, InteractionService};
use crate::error::EngineError;

/// What a decipher attempt owes the rest of the dungeon once it concludes
/// the puzzle, in the shape puzzle input produces.
fn decipher_conclusion(puzzle: &Puzzle, result: &DecipherResult) -> Option<PuzzleResult> {
    let concluded = result.check.is_some() && (result.is_solved || result.is_failed);
    if !concluded {
        return None;
    }

    let link_updates = match (&puzzle.on_success.unlock_id, result.is_solved) {
        (Some(lock_id), true) => vec![LinkUpdate::LockToggle {
            lock_id: lock_id.clone(),
            action: LockAction::Unlock,
        }],
        _ => Vec::new(),
    };
    let consequence = puzzle
        .on_failure
        .as_ref()
        .filter(|_| result.is_failed)
        .map(|failure| PuzzleConsequence {
            trap_id: failure.trap_id.clone(),
            damage: failure.damage.clone(),
        });

    Some(PuzzleResult {
        success: result.success,
        is_solved: result.is_solved,
        is_failed: result.is_failed,
        message: result.message.clone(),
        consequence,
        link_updates,
    })
}

impl InteractionService {
    /// Feed an answer, item id or signal to a puzzle.
    pub fn submit_puzzle_input(
        &mut self,
        puzzle_id: &PuzzleId,
        input: &str,
    ) -> Result<Interaction<PuzzleResult>, EngineError> {
        self.registry.check_puzzle_links(puzzle_id)?;
        let puzzle = self.registry.puzzle_mut(puzzle_id)?;
        let result = attempt_puzzle_input(puzzle, input);
        let follow_up = result.clone();
        self.settle_puzzle(result, puzzle_id, &follow_up)
    }

    /// Guess a cipher's full plaintext.
    pub fn guess_cipher(
        &mut self,
        puzzle_id: &PuzzleId,
        guess: &str,
    ) -> Result<Interaction<PuzzleResult>, EngineError> {
        self.registry.check_puzzle_links(puzzle_id)?;
        let puzzle = self.registry.puzzle_mut(puzzle_id)?;
        let result = attempt_cipher_solution(puzzle, guess);
        let follow_up = result.clone();
        self.settle_puzzle(result, puzzle_id, &follow_up)
    }

    pub fn decipher(
        &mut self,
        actor: &dyn ActorStats,
        puzzle_id: &PuzzleId,
    ) -> Result<Interaction<DecipherResult>, EngineError> {
        self.registry.check_puzzle_links(puzzle_id)?;
        let puzzle = self.registry.puzzle_mut(puzzle_id)?;
        let result = attempt_decipher(actor, puzzle, self.dice.as_ref());

        let conclusion = decipher_conclusion(self.registry.puzzle(puzzle_id)?, &result);
        match conclusion {
            Some(conclusion) => self.settle_puzzle(result, puzzle_id, &conclusion),
            None => self.settle(result, Vec::new(), &[]),
        }
    }

    pub fn request_hint(
        &self,
        actor: &dyn ActorStats,
        puzzle_id: &PuzzleId,
    ) -> Result<HintResult, EngineError> {
        let puzzle = self.registry.puzzle(puzzle_id)?;
        Ok(attempt_puzzle_hint(actor, puzzle, self.dice.as_ref()))
    }

    fn settle_puzzle<R>(
        &mut self,
        result: R,
        puzzle_id: &PuzzleId,
        outcome: &PuzzleResult,
    ) -> Result<Interaction<R>, EngineError> {
        let updates = self.registry.puzzle_follow_ups(outcome);
        let damage = outcome
            .consequence
            .as_ref()
            .and_then(|c| c.damage.as_ref())
            .map(|formula| self.roll_damage(format!("puzzle:{}", puzzle_id), formula, None))
            .into_iter()
            .collect();
        self.settle(result, damage, &updates)
    }

    pub fn attempt_challenge(
        &mut self,
        actor: &dyn ActorStats,
        challenge_id: &ChallengeId,
        skill_name: &str,
    ) -> Result<Interaction<SkillChallengeResult>, EngineError> {
        let challenge = self.registry.challenge_mut(challenge_id)?;
        let result = attempt_skill_challenge(actor, challenge, skill_name, self.dice.as_ref());

        let damage = result
            .consequence
            .as_ref()
            .and_then(|effect| self.roll_effect(format!("challenge:{}", challenge_id), effect))
            .into_iter()
            .collect();
        self.settle(result, damage, &[])
    }
}
