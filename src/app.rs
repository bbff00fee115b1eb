/// App is the main bot application state. It keeps the active game per chat, the game
/// content shared by every chat, and player scores.
use anyhow::{bail, Result};
use log::*;
use mobot::*;
use rand::Rng;
use std::{
    collections::{HashMap, HashSet},
    fmt::Display,
    sync::Arc,
    time::Duration,
};
use tokio::sync::RwLock;

use minigamebot::{
    checklist::{Checklist, Step},
    memory::{Board, Deck, Pair},
    memory_round::MemoryRound,
    quiz::{Question, Quiz},
    relword::{Link, Relword},
    sequence::Sequence,
    wordle::{self, Outcome, Wordle},
    GameError,
};

/// XP for a solved Wordle, plus `WORDLE_XP` per unused attempt.
pub const WORDLE_XP: u32 = 10;
/// XP per correct quiz answer.
pub const QUIZ_XP: u32 = 10;
/// XP per sequence step, minus `STRIKE_PENALTY` per wrong pick.
pub const STEP_XP: u32 = 10;
pub const STRIKE_PENALTY: u32 = 5;

pub enum Move {
    Valid,
    InvalidWord,
    InvalidLength,
    Won,
    Lost,
}

/// Score represents a user's score.
#[derive(Clone, Default, Debug, PartialEq, Eq)]
pub struct Score {
    pub games: u32,
    pub wins: u32,
    pub xp: u32,
}

impl Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rate = if self.games == 0 {
            0.0
        } else {
            self.wins as f32 / self.games as f32 * 100.0
        };
        write!(
            f,
            "{:.0}% ({}/{}), {} XP",
            rate, self.wins, self.games, self.xp
        )
    }
}

/// Scores is the in-memory score table shared by every chat.
#[derive(Clone, Default)]
pub struct Scores(Arc<RwLock<HashMap<String, Score>>>);

impl Scores {
    /// Returns the user's current score
    pub async fn get(&self, user: &str) -> Score {
        self.0.read().await.get(user).cloned().unwrap_or_default()
    }

    /// Increments the number of games this user played.
    pub async fn inc_games(&self, user: &str) {
        self.0.write().await.entry(user.to_string()).or_default().games += 1;
    }

    /// Adds `xp` to the user's score, counting a win if `won`.
    pub async fn award(&self, user: &str, xp: u32, won: bool) -> Score {
        let mut scores = self.0.write().await;
        let score = scores.entry(user.to_string()).or_default();
        score.xp += xp;
        if won {
            score.wins += 1;
        }
        debug!("awarded {} XP to {} (won: {})", xp, user, won);
        score.clone()
    }
}

/// Content is the static game material every chat draws from.
#[derive(Clone, Default)]
pub struct Content {
    pub target_words: Vec<String>,
    pub valid_words: HashSet<String>,
    pub pairs: Vec<Pair>,
    pub questions: Vec<Question>,
    pub steps: Vec<String>,
    pub links: Vec<Link>,
    pub install_steps: Vec<Step>,
    pub grid: (usize, usize),
    pub flip_delay: Duration,
}

/// ActiveGame is the game a chat is currently playing.
#[derive(Clone)]
pub enum ActiveGame {
    Wordle(Wordle),
    Memory(MemoryRound),
    Quiz(Quiz),
    Sequence(Sequence),
    Relword(Relword),
    Checklist(Checklist),
}

/// App represents the bot state for one chat.
#[derive(Clone, Default, BotState)]
pub struct App {
    // App global
    pub game_name: String,
    content: Arc<Content>,
    scores: Scores,

    // Per chat ID
    pub game: Option<ActiveGame>,
    played_words: HashSet<String>,
}

impl App {
    /// Creates a new App instance.
    pub fn new(game_name: String, content: Content) -> App {
        App {
            game_name,
            content: Arc::new(content),
            ..Default::default()
        }
    }

    pub fn scores(&self) -> Scores {
        self.scores.clone()
    }

    /// Returns true if the chat has a game that still accepts moves.
    pub async fn is_playing(&self) -> bool {
        match &self.game {
            None => false,
            Some(ActiveGame::Wordle(w)) => w.state() == wordle::State::Playing,
            Some(ActiveGame::Memory(round)) => !round.board().await.is_won(),
            Some(ActiveGame::Quiz(quiz)) => !quiz.is_finished(),
            Some(ActiveGame::Sequence(seq)) => !seq.is_done(),
            Some(ActiveGame::Relword(game)) => !game.is_won(),
            Some(ActiveGame::Checklist(list)) => !list.is_done(),
        }
    }

    /// Ends the current game. A memory round still waiting on a resolution is stopped
    /// so it cannot touch the chat after the game has gone.
    pub async fn end_game(&mut self) {
        if let Some(ActiveGame::Memory(round)) = self.game.take() {
            round.stop().await;
        }
    }

    /// Picks a target word, preferring words this chat has not played yet.
    pub fn pick_target<R: Rng>(&self, rng: &mut R) -> Result<String, GameError> {
        wordle::choose_target(
            &self.content.target_words,
            |w| self.played_words.contains(w),
            rng,
        )
    }

    /// Starts a Wordle round on `target_word`.
    pub async fn start_wordle(&mut self, target_word: &str) -> Result<()> {
        let wordle = Wordle::new(target_word)?;
        self.end_game().await;
        self.played_words.insert(wordle.target_word());
        self.game = Some(ActiveGame::Wordle(wordle));
        Ok(())
    }

    /// Shuffles a fresh memory board from the configured pairs.
    pub fn new_board<R: Rng>(&self, rng: &mut R) -> Result<Board, GameError> {
        let (rows, cols) = self.content.grid;
        Ok(Board::new(Deck::build(&self.content.pairs, rows, cols, rng)?))
    }

    /// Starts a memory round on `board`. If a memory round is already running its
    /// board is swapped in place, cancelling any pending resolution.
    pub async fn start_memory(&mut self, board: Board) -> MemoryRound {
        if let Some(ActiveGame::Memory(round)) = &self.game {
            round.restart(board).await;
            return round.clone();
        }

        self.end_game().await;
        let round = MemoryRound::new(board, self.content.flip_delay);
        self.game = Some(ActiveGame::Memory(round.clone()));
        round
    }

    pub async fn start_quiz(&mut self) -> Result<()> {
        let quiz = Quiz::new(self.content.questions.clone())?;
        self.end_game().await;
        self.game = Some(ActiveGame::Quiz(quiz));
        Ok(())
    }

    pub fn new_sequence<R: Rng>(&self, rng: &mut R) -> Result<Sequence, GameError> {
        Sequence::new(self.content.steps.clone(), rng)
    }

    pub async fn start_sequence(&mut self, sequence: Sequence) {
        self.end_game().await;
        self.game = Some(ActiveGame::Sequence(sequence));
    }

    pub fn new_relword<R: Rng>(&self, rng: &mut R) -> Result<Relword, GameError> {
        Relword::new(self.content.links.clone(), rng)
    }

    pub async fn start_relword(&mut self, relword: Relword) {
        self.end_game().await;
        self.game = Some(ActiveGame::Relword(relword));
    }

    pub async fn start_checklist(&mut self) -> Result<()> {
        let list = Checklist::new(self.content.install_steps.clone())?;
        self.end_game().await;
        self.game = Some(ActiveGame::Checklist(list));
        Ok(())
    }

    /// Returns true if the word is a valid word.
    pub fn is_valid_word(&self, word: &str) -> bool {
        self.content.valid_words.is_empty()
            || self
                .content
                .valid_words
                .contains(&word.trim().to_ascii_lowercase())
    }

    /// Plays a Wordle guess for `user`, awarding XP on a win.
    pub async fn play_word(&mut self, user: &str, word: &str) -> Result<Move> {
        if !self.is_valid_word(word) {
            return Ok(Move::InvalidWord);
        }

        let wordle = match &mut self.game {
            Some(ActiveGame::Wordle(wordle)) => wordle,
            _ => bail!("no wordle round in progress"),
        };

        let outcome = match wordle.play_turn(word) {
            Err(GameError::InvalidLength { .. }) => return Ok(Move::InvalidLength),
            other => other?,
        };

        match outcome {
            Outcome::Won => {
                let remaining = wordle.game().remaining_attempts() as u32;
                let xp = WORDLE_XP * (remaining + 1);
                self.scores.award(user, xp, true).await;
                Ok(Move::Won)
            }
            Outcome::Lost => Ok(Move::Lost),
            Outcome::Continue => Ok(Move::Valid),
        }
    }
}

/// XP earned by a finished quiz.
pub fn quiz_xp(quiz: &Quiz) -> u32 {
    quiz.score() as u32 * QUIZ_XP
}

/// A quiz counts as a win when at least half the answers are correct.
pub fn quiz_won(quiz: &Quiz) -> bool {
    quiz.score() * 2 >= quiz.len()
}

/// XP earned by a finished sequence.
pub fn sequence_xp(sequence: &Sequence) -> u32 {
    (sequence.steps().len() as u32 * STEP_XP).saturating_sub(sequence.strikes() * STRIKE_PENALTY)
}

/// A sequence counts as a win when it was rebuilt with fewer strikes than steps.
pub fn sequence_won(sequence: &Sequence) -> bool {
    (sequence.strikes() as usize) < sequence.steps().len()
}
