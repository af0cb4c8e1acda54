//! Ciphers: Caesar shifts with progressive, partial-credit decryption.

use serde::{Deserialize, Serialize};

use super::{answers_match, bonus_if};
use super::puzzle::{attempt_puzzle_input, PuzzleResult};
use crate::check::{roll_check, CheckRoll};
use crate::entities::{CipherData, CipherMethod, Puzzle, PuzzleKind};
use crate::ports::{ActorStats, DiceRoller, DiceRollerExt, Proficiency};
use crate::value_objects::{Ability, Skill};

/// Shift every ASCII letter by `shift` places, preserving case. Everything
/// else passes through untouched.
pub fn caesar_shift(text: &str, shift: i32) -> String {
    let shift = shift.rem_euclid(26) as u8;
    text.chars()
        .map(|c| {
            if !c.is_ascii_alphabetic() {
                return c;
            }
            let base = if c.is_ascii_lowercase() { b'a' } else { b'A' };
            char::from((c as u8 - base + shift) % 26 + base)
        })
        .collect()
}

pub fn decode_caesar(text: &str, shift: i32) -> String {
    caesar_shift(text, -shift)
}

/// Derive the ciphertext from the plaintext if it was left blank.
pub fn initialize_cipher(puzzle: &mut Puzzle) {
    if let PuzzleKind::Cipher(data) = &mut puzzle.kind {
        if data.encrypted_text.is_empty() && !data.decrypted_text.is_empty() {
            data.encrypted_text = match data.method {
                CipherMethod::Shift(amount) => caesar_shift(&data.decrypted_text, amount),
            };
        }
    }
}

/// The text as players currently see it: revealed letters in plaintext,
/// the rest still enciphered.
pub fn displayed_text(puzzle: &Puzzle) -> String {
    let Some(data) = puzzle.cipher() else {
        return String::new();
    };
    if puzzle.is_solved {
        return data.decrypted_text.clone();
    }

    data.encrypted_text
        .char_indices()
        .map(|(idx, c)| {
            if c.is_ascii_alphabetic() && data.revealed_indices.contains(&idx) {
                data.decrypted_text[idx..].chars().next().unwrap_or(c)
            } else {
                c
            }
        })
        .collect()
}

/// Reveal everything when `guess` is the plaintext, ignoring case.
pub(crate) fn reveal_on_match(data: &mut CipherData, guess: &str) -> bool {
    if !answers_match(&data.decrypted_text, guess) {
        return false;
    }
    let letters: Vec<usize> = data.letter_indices().collect();
    data.revealed_indices.extend(letters);
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecipherResult {
    pub success: bool,
    pub check: Option<CheckRoll>,
    pub revealed_count: usize,
    pub is_solved: bool,
    pub is_failed: bool,
    pub message: String,
}

/// Work at the cipher with an Intelligence check. Success reveals
/// `1 + margin / 3` more letters.
pub fn attempt_decipher(actor: &dyn ActorStats, puzzle: &mut Puzzle, dice: &dyn DiceRoller) -> DecipherResult {
    let Some(language) = puzzle.cipher().map(|data| data.language.clone()) else {
        return DecipherResult {
            success: false,
            check: None,
            revealed_count: 0,
            is_solved: puzzle.is_solved,
            is_failed: puzzle.is_failed,
            message: "Not a cipher.".to_string(),
        };
    };

    if puzzle.is_concluded() {
        return DecipherResult {
            success: puzzle.is_solved,
            check: None,
            revealed_count: 0,
            is_solved: puzzle.is_solved,
            is_failed: puzzle.is_failed,
            message: if puzzle.is_solved {
                "Already solved.".to_string()
            } else {
                "The text is beyond saving.".to_string()
            },
        };
    }

    let proficient = actor.is_proficient(Proficiency::Skill(Skill::Investigation))
        || language.as_deref().is_some_and(|l| actor.knows_language(l));
    let modifier = actor.ability_modifier(Ability::Intelligence) + bonus_if(actor, proficient);
    let check = roll_check(dice, modifier, puzzle.hint_dc());

    if !check.success {
        let is_failed = puzzle.record_failed_attempt();
        return DecipherResult {
            success: false,
            check: Some(check),
            revealed_count: 0,
            is_solved: false,
            is_failed,
            message: match (&puzzle.on_failure, is_failed) {
                (Some(failure), true) => failure.message.clone(),
                (None, true) => "You fail to make sense of it.".to_string(),
                _ => "The cipher baffles you.".to_string(),
            },
        };
    }

    let to_reveal = (1 + check.margin / 3) as usize;
    let mut revealed_count = 0;
    let mut solved = false;
    if let PuzzleKind::Cipher(data) = &mut puzzle.kind {
        let mut hidden: Vec<usize> = data
            .letter_indices()
            .filter(|idx| !data.revealed_indices.contains(idx))
            .collect();
        // Partial Fisher-Yates: the first `n` slots end up a uniform sample.
        let n = to_reveal.min(hidden.len());
        for i in 0..n {
            let j = i + dice.pick_index(hidden.len() - i);
            hidden.swap(i, j);
        }
        data.revealed_indices.extend(hidden.iter().take(n).copied());
        revealed_count = n;
        solved = data.all_letters_revealed();
    }

    tracing::info!(puzzle_id = %puzzle.id, revealed_count, solved, "Cipher partially deciphered");
    if solved {
        puzzle.is_solved = true;
    }

    DecipherResult {
        success: true,
        check: Some(check),
        revealed_count,
        is_solved: solved,
        is_failed: false,
        message: if solved {
            puzzle.on_success.message.clone()
        } else {
            format!("You decipher part of the text. ({} characters revealed)", revealed_count)
        },
    }
}

/// Guess the whole plaintext at once.
pub fn attempt_cipher_solution(puzzle: &mut Puzzle, guess: &str) -> PuzzleResult {
    if puzzle.cipher().is_none() {
        return PuzzleResult {
            success: false,
            is_solved: puzzle.is_solved,
            is_failed: puzzle.is_failed,
            message: "Not a cipher.".to_string(),
            consequence: None,
            link_updates: Vec::new(),
        };
    }
    attempt_puzzle_input(puzzle, guess)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::PuzzleId;
    use crate::mechanics::test_support::commoner;
    use crate::ports::MockDiceRoller;

    fn scroll(text: &str) -> Puzzle {
        let mut puzzle = Puzzle::new(
            PuzzleId::new("scroll"),
            "Ancient scroll",
            PuzzleKind::Cipher(CipherData::shift(text, 3)),
            "The meaning becomes clear.",
        );
        initialize_cipher(&mut puzzle);
        puzzle
    }

    /// d20 faces in order, and every index pick takes the first candidate.
    fn d20_then_first_pick(faces: &[i32]) -> MockDiceRoller {
        let mut dice = MockDiceRoller::new();
        let mut faces = faces.to_vec().into_iter();
        dice.expect_roll_die()
            .withf(|sides| *sides == 20)
            .returning(move |_| faces.next().unwrap_or(1));
        dice.expect_roll_die()
            .withf(|sides| *sides != 20)
            .returning(|_| 1);
        dice
    }

    fn revealed(puzzle: &Puzzle) -> usize {
        puzzle.cipher().map_or(0, |d| d.revealed_indices.len())
    }

    #[test]
    fn caesar_round_trip_preserves_case_and_punctuation() {
        assert_eq!(caesar_shift("Abc, xyz!", 3), "Def, abc!");
        assert_eq!(caesar_shift("abc", -1), "zab");
        assert_eq!(decode_caesar("Def, abc!", 3), "Abc, xyz!");
    }

    #[test]
    fn initialize_fills_ciphertext_and_display_starts_enciphered() {
        let puzzle = scroll("Go west");
        assert_eq!(puzzle.cipher().map(|d| d.encrypted_text.as_str()), Some("Jr zhvw"));
        assert_eq!(displayed_text(&puzzle), "Jr zhvw");
    }

    #[test]
    fn success_reveals_one_plus_a_third_of_margin() {
        // 18 vs DC 15: margin 3 reveals two letters
        let mut puzzle = scroll("Go west");
        let result = attempt_decipher(&commoner(), &mut puzzle, &d20_then_first_pick(&[18]));
        assert!(result.success);
        assert_eq!(result.revealed_count, 2);
        assert_eq!(revealed(&puzzle), 2);
        assert_eq!(displayed_text(&puzzle), "Go zhvw");
    }

    #[test]
    fn reveal_is_monotonic_and_solves_exactly_when_complete() {
        let mut puzzle = scroll("Go west");
        let mut last = 0;
        for _ in 0..6 {
            let result = attempt_decipher(&commoner(), &mut puzzle, &d20_then_first_pick(&[15]));
            let now = revealed(&puzzle);
            assert!(now >= last);
            last = now;
            let all_letters = puzzle.cipher().is_some_and(|d| d.all_letters_revealed());
            assert_eq!(puzzle.is_solved, all_letters);
            assert_eq!(result.is_solved, all_letters);
        }
        assert!(puzzle.is_solved);
        assert_eq!(displayed_text(&puzzle), "Go west");
    }

    #[test]
    fn failures_count_toward_max_attempts() {
        let mut puzzle = scroll("Go west").with_max_attempts(2);
        assert!(!attempt_decipher(&commoner(), &mut puzzle, &d20_then_first_pick(&[3])).is_failed);
        let last = attempt_decipher(&commoner(), &mut puzzle, &d20_then_first_pick(&[3]));
        assert!(last.is_failed);
        assert_eq!(revealed(&puzzle), 0);
    }

    #[test]
    fn knowing_the_language_grants_proficiency() {
        // 13 + 2 (proficiency) = 15
        let mut puzzle = Puzzle::new(
            PuzzleId::new("tablet"),
            "Dwarven tablet",
            PuzzleKind::Cipher(CipherData::shift("Dig", 5).in_language("Dwarvish")),
            "Read.",
        );
        initialize_cipher(&mut puzzle);
        let dwarf = commoner().with_language("Dwarvish");
        assert!(attempt_decipher(&dwarf, &mut puzzle, &d20_then_first_pick(&[13])).success);
    }

    #[test]
    fn full_guess_solves_ignoring_case() {
        let mut puzzle = scroll("Go west");
        let wrong = attempt_cipher_solution(&mut puzzle, "go east");
        assert!(!wrong.success);
        assert_eq!(wrong.message, "That is not the correct translation.");
        assert_eq!(puzzle.current_attempts, 1);

        let padded = attempt_cipher_solution(&mut puzzle, "go west ");
        assert!(!padded.success);
        assert_eq!(puzzle.current_attempts, 2);

        let right = attempt_cipher_solution(&mut puzzle, "GO WEST");
        assert!(right.is_solved);
        assert!(puzzle.cipher().is_some_and(|d| d.all_letters_revealed()));
    }

    #[test]
    fn non_ciphers_are_refused() {
        let mut riddle = Puzzle::new(
            PuzzleId::new("r"),
            "Riddle",
            PuzzleKind::Riddle {
                accepted_answers: vec!["time".into()],
            },
            "Yes.",
        );
        assert_eq!(attempt_cipher_solution(&mut riddle, "time").message, "Not a cipher.");
        assert!(!riddle.is_solved);
    }
}
