/// Relword shows a column of everyday apps next to a shuffled column of open alternatives.
/// The player selects an app on the left, then the alternative it maps to on the right.
use log::*;
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Points for each correct connection.
pub const LINK_REWARD: u32 = 10;
/// Score at which the round is won, capped by what the links can earn.
pub const WIN_SCORE: u32 = 20;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Link {
    pub app: String,
    pub alt: String,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Connect {
    /// Nothing was selected on the left, or the right item is already connected.
    Ignored,
    Linked { won: bool },
    Missed,
}

#[derive(Debug, Clone)]
pub struct Relword {
    links: Vec<Link>,
    // Right column in display order, as indices into `links`.
    right: Vec<usize>,
    selected: Option<usize>,
    // (left, right) display positions.
    connections: Vec<(usize, usize)>,
    score: u32,
    goal: u32,
}

impl Relword {
    pub fn new<R: Rng + ?Sized>(links: Vec<Link>, rng: &mut R) -> Result<Relword, GameError> {
        if links.is_empty() {
            return Err(GameError::EmptyList("word links"));
        }

        let mut right = (0..links.len()).collect::<Vec<_>>();
        right.shuffle(rng);
        let goal = WIN_SCORE.min(links.len() as u32 * LINK_REWARD);

        Ok(Relword {
            links,
            right,
            selected: None,
            connections: Vec::new(),
            score: 0,
            goal,
        })
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Apps in the left column, in display order.
    pub fn left(&self) -> impl Iterator<Item = &str> + '_ {
        self.links.iter().map(|l| l.app.as_str())
    }

    /// Alternatives in the right column, in display order.
    pub fn right(&self) -> impl Iterator<Item = &str> + '_ {
        self.right.iter().map(|i| self.links[*i].alt.as_str())
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn connections(&self) -> &[(usize, usize)] {
        &self.connections
    }

    pub fn is_left_connected(&self, left: usize) -> bool {
        self.connections.iter().any(|(l, _)| *l == left)
    }

    pub fn is_right_connected(&self, right: usize) -> bool {
        self.connections.iter().any(|(_, r)| *r == right)
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn is_won(&self) -> bool {
        self.score >= self.goal
    }

    /// `select` picks an app on the left. Returns false if it is already connected.
    pub fn select(&mut self, left: usize) -> Result<bool, GameError> {
        if self.is_won() {
            return Err(GameError::RoundAlreadyOver);
        }
        if left >= self.links.len() {
            return Err(GameError::InvalidChoice {
                choice: left,
                choices: self.links.len(),
            });
        }
        if self.is_left_connected(left) {
            return Ok(false);
        }

        self.selected = Some(left);
        Ok(true)
    }

    /// `connect` links the selected app to the alternative at `right`. A miss clears the
    /// selection and costs nothing.
    pub fn connect(&mut self, right: usize) -> Result<Connect, GameError> {
        if self.is_won() {
            return Err(GameError::RoundAlreadyOver);
        }
        if right >= self.right.len() {
            return Err(GameError::InvalidChoice {
                choice: right,
                choices: self.right.len(),
            });
        }
        let Some(left) = self.selected else {
            return Ok(Connect::Ignored);
        };
        if self.is_right_connected(right) {
            return Ok(Connect::Ignored);
        }

        self.selected = None;
        // Compare by text: two apps may share the same alternative.
        if self.links[left].alt != self.links[self.right[right]].alt {
            return Ok(Connect::Missed);
        }

        self.connections.push((left, right));
        self.score += LINK_REWARD;
        debug!("linked {} to {}", self.links[left].app, self.links[left].alt);
        Ok(Connect::Linked {
            won: self.is_won(),
        })
    }
}
