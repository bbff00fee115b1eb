/// Wordle is a game where you have to guess a word. The word is chosen by the game, and you
/// have `ceil(len / 2) + 3` attempts to guess it. After each attempt, the game tells you which
/// letters you guessed correctly, and which letters are in the word but in the wrong position.
///
/// This module implements the guess evaluation engine.
use std::collections::HashMap;

use log::*;
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Verdict is the classification of a single position within one guess.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Verdict {
    Correct,
    Present,
    Absent,
}

/// KeyStatus is the best verdict ever observed for a letter across all attempts.
/// Variants are declared in precedence order so `max` picks the winner.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub enum KeyStatus {
    Unused,
    Absent,
    Present,
    Correct,
}

/// State represents the current player state of a round.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum State {
    Playing,
    Won,
    Lost,
}

/// Outcome is what `play_turn` reports back after a guess is accepted.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Outcome {
    Continue,
    Won,
    Lost,
}

/// Letter is one evaluated position of an attempted word.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Letter {
    pub symbol: char,
    pub verdict: Verdict,
}

/// Game represents a single Wordle board that can be rendered and presented
/// to the player.
#[derive(Debug)]
pub struct Game {
    pub state: State,
    pub attempts: Vec<Vec<Letter>>,
    pub max_attempts: usize,
    pub word_length: usize,
}

impl Game {
    /// `attempted_letters` returns a sorted deduplicated vector of all the letters that
    /// have been attempted so far.
    pub fn attempted_letters(&self) -> Vec<char> {
        let mut letters = self
            .attempts
            .iter()
            .flat_map(|a| a.iter())
            .map(|l| l.symbol)
            .collect::<Vec<_>>();
        letters.sort();
        letters.dedup();
        letters
    }

    pub fn remaining_attempts(&self) -> usize {
        self.max_attempts.saturating_sub(self.attempts.len())
    }
}

/// `evaluate` compares `guess` against `target` position by position.
///
/// Exact matches are resolved first and consume their letter from the target's
/// pool. Remaining positions are then marked present only while the pool still
/// holds that letter, so a letter is never credited more often than it occurs
/// in the target.
pub fn evaluate(target: &[char], guess: &[char]) -> Result<Vec<Verdict>, GameError> {
    if guess.len() != target.len() {
        return Err(GameError::InvalidLength {
            expected: target.len(),
            actual: guess.len(),
        });
    }

    let mut remaining = target.iter().fold(HashMap::new(), |mut acc, c| {
        *acc.entry(*c).or_insert(0usize) += 1;
        acc
    });

    let mut verdicts = vec![Verdict::Absent; guess.len()];
    for (i, (g, t)) in guess.iter().zip(target).enumerate() {
        if g == t {
            verdicts[i] = Verdict::Correct;
            if let Some(n) = remaining.get_mut(g) {
                *n -= 1;
            }
        }
    }

    for (i, g) in guess.iter().enumerate() {
        if verdicts[i] == Verdict::Correct {
            continue;
        }
        match remaining.get_mut(g) {
            Some(n) if *n > 0 => {
                *n -= 1;
                verdicts[i] = Verdict::Present;
            }
            _ => {}
        }
    }

    Ok(verdicts)
}

/// `key_status` scans every attempt for `symbol` and returns the best verdict seen:
/// correct if it was ever placed right, present if it was guessed elsewhere and the
/// target contains it, absent if it was guessed and the target lacks it.
///
/// History is rescanned on every call; boards are a handful of short words.
pub fn key_status<S: AsRef<[char]>>(target: &[char], history: &[S], symbol: char) -> KeyStatus {
    history
        .iter()
        .flat_map(|guess| guess.as_ref().iter().enumerate())
        .filter(|(_, c)| **c == symbol)
        .map(|(i, c)| {
            if target.get(i) == Some(c) {
                KeyStatus::Correct
            } else if target.contains(c) {
                KeyStatus::Present
            } else {
                KeyStatus::Absent
            }
        })
        .max()
        .unwrap_or(KeyStatus::Unused)
}

/// `max_attempts` is the guess budget for a target of `len` letters.
pub fn max_attempts(len: usize) -> usize {
    len.div_ceil(2) + 3
}

/// `choose_target` picks a target from `words`, preferring ones not yet `played`.
pub fn choose_target<R: Rng + ?Sized>(
    words: &[String],
    played: impl Fn(&str) -> bool,
    rng: &mut R,
) -> Result<String, GameError> {
    let fresh = words
        .iter()
        .filter(|w| !played(w.to_uppercase().as_str()))
        .collect::<Vec<_>>();

    fresh
        .choose(rng)
        .copied()
        .or_else(|| words.choose(rng))
        .map(|w| w.to_uppercase())
        .ok_or(GameError::EmptyList("target words"))
}

fn normalize(word: &str) -> Vec<char> {
    word.trim().chars().flat_map(char::to_uppercase).collect()
}

/// Wordle represents a single Wordle round.
#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct Wordle {
    /// The target word that the player is trying to guess.
    target_word: Vec<char>,

    /// The words that the player has attempted so far.
    attempts: Vec<Vec<char>>,
}

impl Wordle {
    /// `new` creates a new Wordle round with the given target word.
    pub fn new(target_word: &str) -> Result<Wordle, GameError> {
        let target = normalize(target_word);
        if target.is_empty() || !target.iter().all(|c| c.is_alphabetic()) {
            return Err(GameError::InvalidTarget(target_word.to_string()));
        }

        debug!("new wordle round, {} letters", target.len());
        Ok(Wordle {
            target_word: target,
            attempts: Vec::new(),
        })
    }

    pub fn target_word(&self) -> String {
        self.target_word.iter().collect()
    }

    pub fn word_length(&self) -> usize {
        self.target_word.len()
    }

    pub fn max_attempts(&self) -> usize {
        max_attempts(self.target_word.len())
    }

    pub fn attempts(&self) -> impl Iterator<Item = String> + '_ {
        self.attempts.iter().map(|a| a.iter().collect())
    }

    /// `state` derives the round state from the attempt history.
    pub fn state(&self) -> State {
        if self.attempts.last() == Some(&self.target_word) {
            State::Won
        } else if self.attempts.len() >= self.max_attempts() {
            State::Lost
        } else {
            State::Playing
        }
    }

    /// `game` returns a Game instance that can be rendered and presented to the player.
    pub fn game(&self) -> Game {
        let attempts = self
            .attempts
            .iter()
            .map(|a| self.letters(a))
            .collect::<Vec<_>>();

        Game {
            state: self.state(),
            attempts,
            max_attempts: self.max_attempts(),
            word_length: self.word_length(),
        }
    }

    // Attempts are validated on entry, so evaluation cannot fail here.
    fn letters(&self, word: &[char]) -> Vec<Letter> {
        evaluate(&self.target_word, word)
            .unwrap_or_default()
            .into_iter()
            .zip(word)
            .map(|(verdict, symbol)| Letter {
                symbol: *symbol,
                verdict,
            })
            .collect()
    }

    /// `assess` evaluates `word` against the target without recording it.
    pub fn assess(&self, word: &str) -> Result<Vec<Letter>, GameError> {
        let word = normalize(word);
        evaluate(&self.target_word, &word)?;
        Ok(self.letters(&word))
    }

    /// `key_status` returns the keyboard status of `symbol` for this round.
    pub fn key_status(&self, symbol: char) -> KeyStatus {
        let symbol = symbol.to_uppercase().next().unwrap_or(symbol);
        key_status(&self.target_word, &self.attempts, symbol)
    }

    /// `keyboard` returns the status of every letter in `layout`, in order.
    pub fn keyboard(&self, layout: &str) -> Vec<(char, KeyStatus)> {
        layout
            .chars()
            .filter(|c| c.is_alphabetic())
            .map(|c| (c, self.key_status(c)))
            .collect()
    }

    /// `play_turn` records a guess and reports whether the round continues.
    pub fn play_turn(&mut self, word: &str) -> Result<Outcome, GameError> {
        let word = normalize(word);
        if self.state() != State::Playing {
            return Err(GameError::RoundAlreadyOver);
        }
        evaluate(&self.target_word, &word)?;

        self.attempts.push(word);
        let outcome = match self.state() {
            State::Playing => Outcome::Continue,
            State::Won => Outcome::Won,
            State::Lost => Outcome::Lost,
        };
        debug!(
            "wordle attempt {}/{}: {:?}",
            self.attempts.len(),
            self.max_attempts(),
            outcome
        );
        Ok(outcome)
    }
}
