/// Checklist walks through an installation guide. Steps can be ticked off in any order
/// and unticked again.
use serde::{Deserialize, Serialize};

use crate::error::GameError;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Step {
    pub title: String,
    pub desc: String,
    #[serde(default)]
    pub hint: String,
}

#[derive(Debug, Clone)]
pub struct Checklist {
    steps: Vec<Step>,
    done: Vec<bool>,
}

impl Checklist {
    pub fn new(steps: Vec<Step>) -> Result<Checklist, GameError> {
        if steps.is_empty() {
            return Err(GameError::EmptyList("checklist steps"));
        }
        Ok(Checklist {
            done: vec![false; steps.len()],
            steps,
        })
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn is_ticked(&self, step: usize) -> bool {
        self.done.get(step).copied().unwrap_or(false)
    }

    pub fn completed(&self) -> usize {
        self.done.iter().filter(|d| **d).count()
    }

    /// Percentage of ticked steps, rounded to the nearest integer.
    pub fn progress(&self) -> usize {
        let n = self.steps.len();
        (self.completed() * 200 + n) / (2 * n)
    }

    pub fn is_done(&self) -> bool {
        self.done.iter().all(|d| *d)
    }

    /// `toggle` flips step `step` and returns whether it is now ticked.
    pub fn toggle(&mut self, step: usize) -> Result<bool, GameError> {
        let done = self.done.get_mut(step).ok_or(GameError::InvalidChoice {
            choice: step,
            choices: self.steps.len(),
        })?;
        *done = !*done;
        Ok(*done)
    }

    /// `complete_all` ticks every remaining step.
    pub fn complete_all(&mut self) {
        self.done.iter_mut().for_each(|d| *d = true);
    }

    pub fn reset(&mut self) {
        self.done.iter_mut().for_each(|d| *d = false);
    }
}
