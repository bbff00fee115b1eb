//! Mini-game engines: a Wordle guess evaluator, a memory pairs board with a deferred
//! resolution timer, and a few smaller games (quiz, ordering puzzle, word links and an
//! installation checklist).

pub mod checklist;
pub mod deferred;
pub mod error;
pub mod memory;
pub mod memory_round;
pub mod quiz;
pub mod relword;
pub mod sequence;
pub mod wordle;
pub mod words;

pub use error::GameError;

#[cfg(test)]
mod memory_round_test;
#[cfg(test)]
mod wordle_test;
