/// Memory is a pairs game: every pair contributes a word tile and a definition tile, the
/// deck is shuffled face down onto a grid, and the player flips two tiles at a time looking
/// for a word and its definition.
///
/// This module implements the board itself. Pacing between the second flip and the
/// resolution lives in `memory_round`.
use std::{collections::HashSet, fmt::Display};

use log::*;
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Score awarded for every matched pair.
pub const MATCH_REWARD: u32 = 1;

/// PairId ties the two tiles of a pair together.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PairId(pub u32);

impl Display for PairId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Pair is one entry of the pair list: a word and its definition.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Pair {
    pub id: PairId,
    pub word: String,
    pub def: String,
}

/// TileKind says which side of a pair a tile carries.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    Word,
    Definition,
}

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub pair: PairId,
    pub kind: TileKind,
    pub text: String,
}

/// TileState is the per-tile state machine: `Closed -> Open -> {Closed, Found}`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum TileState {
    Closed,
    Open,
    Found,
}

/// Phase is the whole-board state.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum Phase {
    Idle,
    Busy,
    Won,
}

/// Flip reports what `open` did with a tile.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Flip {
    /// The call was ignored: the board is busy or won, or the tile is already face up.
    Ignored,
    /// First tile of a new attempt is face up.
    Opened,
    /// Second tile is face up and the board is waiting for `resolve`.
    Pending,
}

/// Resolution is the result of comparing the two open tiles.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Resolution {
    Matched { pair: PairId, won: bool },
    Mismatched,
}

/// Deck is the shuffled tile sequence laid out row-major on a `rows x cols` grid.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Deck {
    rows: usize,
    cols: usize,
    tiles: Vec<Tile>,
}

impl Deck {
    /// `build` creates one word tile and one definition tile per pair, shuffles them and
    /// lays them out on the grid. The grid must hold the deck exactly.
    pub fn build<R: Rng + ?Sized>(
        pairs: &[Pair],
        rows: usize,
        cols: usize,
        rng: &mut R,
    ) -> Result<Deck, GameError> {
        let size = pairs.len() * 2;
        if size == 0 || rows.checked_mul(cols) != Some(size) {
            return Err(GameError::InvalidShape {
                rows,
                cols,
                tiles: size,
            });
        }

        let mut seen = HashSet::new();
        let mut tiles = Vec::with_capacity(size);
        for pair in pairs {
            if !seen.insert(pair.id) {
                return Err(GameError::DuplicatePair(pair.id));
            }
            tiles.push(Tile {
                pair: pair.id,
                kind: TileKind::Word,
                text: pair.word.clone(),
            });
            tiles.push(Tile {
                pair: pair.id,
                kind: TileKind::Definition,
                text: pair.def.clone(),
            });
        }
        tiles.shuffle(rng);

        Ok(Deck { rows, cols, tiles })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    pub fn get(&self, position: usize) -> Option<&Tile> {
        self.tiles.get(position)
    }

    /// `position` converts a grid coordinate to a tile index.
    pub fn position(&self, row: usize, col: usize) -> Option<usize> {
        (row < self.rows && col < self.cols).then_some(row * self.cols + col)
    }
}

/// Board is one round of the memory game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Board {
    deck: Deck,
    states: Vec<TileState>,
    open: Vec<usize>,
    score: u32,
    phase: Phase,
}

impl Board {
    pub fn new(deck: Deck) -> Board {
        debug!("new memory board, {}x{}", deck.rows, deck.cols);
        Board {
            states: vec![TileState::Closed; deck.len()],
            open: Vec::with_capacity(2),
            score: 0,
            phase: Phase::Idle,
            deck,
        }
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn tile_state(&self, position: usize) -> Option<TileState> {
        self.states.get(position).copied()
    }

    pub fn open_tiles(&self) -> &[usize] {
        &self.open
    }

    pub fn found(&self) -> usize {
        self.states
            .iter()
            .filter(|s| **s == TileState::Found)
            .count()
    }

    /// `found_pairs` lists the pairs already matched, in id order.
    pub fn found_pairs(&self) -> Vec<PairId> {
        let mut pairs = self
            .deck
            .tiles
            .iter()
            .zip(&self.states)
            .filter(|(_, s)| **s == TileState::Found)
            .map(|(t, _)| t.pair)
            .collect::<Vec<_>>();
        pairs.sort();
        pairs.dedup();
        pairs
    }

    pub fn is_won(&self) -> bool {
        self.found() == self.deck.len()
    }

    /// `open` turns the tile at `position` face up. Calls made while a resolution is
    /// pending, after the board is won, or on a tile that is already face up are ignored.
    pub fn open(&mut self, position: usize) -> Result<Flip, GameError> {
        let state = self
            .tile_state(position)
            .ok_or(GameError::InvalidPosition {
                position,
                tiles: self.deck.len(),
            })?;

        if self.phase != Phase::Idle || state != TileState::Closed {
            return Ok(Flip::Ignored);
        }

        self.states[position] = TileState::Open;
        self.open.push(position);
        if self.open.len() < 2 {
            return Ok(Flip::Opened);
        }

        self.phase = Phase::Busy;
        Ok(Flip::Pending)
    }

    /// `resolve` compares the two open tiles. Returns `None` when nothing is pending.
    pub fn resolve(&mut self) -> Option<Resolution> {
        if self.phase != Phase::Busy {
            return None;
        }
        let (a, b) = match self.open[..] {
            [a, b] => (a, b),
            _ => return None,
        };

        let (ta, tb) = (&self.deck.tiles[a], &self.deck.tiles[b]);
        let resolution = if ta.pair == tb.pair && ta.kind != tb.kind {
            let pair = ta.pair;
            self.states[a] = TileState::Found;
            self.states[b] = TileState::Found;
            self.score += MATCH_REWARD;
            Resolution::Matched {
                pair,
                won: self.is_won(),
            }
        } else {
            self.states[a] = TileState::Closed;
            self.states[b] = TileState::Closed;
            Resolution::Mismatched
        };

        self.open.clear();
        self.phase = if self.is_won() { Phase::Won } else { Phase::Idle };
        debug!("memory resolution: {:?}", resolution);
        Some(resolution)
    }
}
