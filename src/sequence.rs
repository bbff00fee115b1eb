/// Sequence asks the player to rebuild an ordered procedure from a shuffled pool of its
/// steps. Wrong picks count as strikes and reveal the step that was expected.
use std::collections::HashSet;

use rand::{seq::SliceRandom, Rng};

use crate::error::GameError;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Pick {
    Correct { done: bool },
    Wrong { expected: usize },
}

#[derive(Debug, Clone)]
pub struct Sequence {
    steps: Vec<String>,
    // Indices into `steps` in display order; placed steps become `None`.
    pool: Vec<Option<usize>>,
    placed: usize,
    strikes: u32,
    revealed: HashSet<usize>,
}

impl Sequence {
    pub fn new<R: Rng + ?Sized>(steps: Vec<String>, rng: &mut R) -> Result<Sequence, GameError> {
        if steps.is_empty() {
            return Err(GameError::EmptyList("sequence steps"));
        }

        let mut pool = (0..steps.len()).map(Some).collect::<Vec<_>>();
        pool.shuffle(rng);

        Ok(Sequence {
            steps,
            pool,
            placed: 0,
            strikes: 0,
            revealed: HashSet::new(),
        })
    }

    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    /// `pool` yields the steps still to be placed as `(slot, step)` in display order.
    pub fn pool(&self) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.pool
            .iter()
            .enumerate()
            .filter_map(|(slot, s)| s.map(|i| (slot, self.steps[i].as_str())))
    }

    pub fn placed(&self) -> &[String] {
        &self.steps[..self.placed]
    }

    pub fn strikes(&self) -> u32 {
        self.strikes
    }

    pub fn is_revealed(&self, step: usize) -> bool {
        self.revealed.contains(&step)
    }

    pub fn is_done(&self) -> bool {
        self.placed == self.steps.len()
    }

    /// Percentage of steps placed.
    pub fn progress(&self) -> usize {
        self.placed * 100 / self.steps.len()
    }

    /// `pick` plays the step shown in pool slot `slot`.
    pub fn pick(&mut self, slot: usize) -> Result<Pick, GameError> {
        if self.is_done() {
            return Err(GameError::RoundAlreadyOver);
        }
        let step = self
            .pool
            .get(slot)
            .copied()
            .flatten()
            .ok_or(GameError::InvalidChoice {
                choice: slot,
                choices: self.pool.len(),
            })?;

        if step == self.placed {
            self.pool[slot] = None;
            self.revealed.insert(step);
            self.placed += 1;
            Ok(Pick::Correct {
                done: self.is_done(),
            })
        } else {
            self.strikes += 1;
            self.revealed.insert(self.placed);
            Ok(Pick::Wrong {
                expected: self.placed,
            })
        }
    }
}
