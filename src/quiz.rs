/// Quiz walks the player through a list of multiple choice questions, one point per
/// correct answer.
use serde::{Deserialize, Serialize};

use crate::error::GameError;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Question {
    pub prompt: String,
    pub choices: Vec<String>,
    /// Index into `choices` of the right answer.
    pub answer: usize,
}

/// Answer is what the player picked for one question.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Answer {
    pub choice: usize,
    pub correct: bool,
}

#[derive(Debug, Clone)]
pub struct Quiz {
    questions: Vec<Question>,
    answers: Vec<Option<Answer>>,
    index: usize,
    finished: bool,
}

impl Quiz {
    pub fn new(questions: Vec<Question>) -> Result<Quiz, GameError> {
        if questions.is_empty() {
            return Err(GameError::EmptyList("quiz questions"));
        }
        if let Some(q) = questions.iter().find(|q| q.answer >= q.choices.len()) {
            return Err(GameError::InvalidChoice {
                choice: q.answer,
                choices: q.choices.len(),
            });
        }

        Ok(Quiz {
            answers: vec![None; questions.len()],
            questions,
            index: 0,
            finished: false,
        })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> &Question {
        &self.questions[self.index]
    }

    /// The answer given to the current question, once it is locked.
    pub fn answer(&self) -> Option<Answer> {
        self.answers[self.index]
    }

    pub fn score(&self) -> usize {
        self.answers.iter().flatten().filter(|a| a.correct).count()
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// `choose` locks in `choice` for the current question. A question can only be
    /// answered once; later calls return the answer already given.
    pub fn choose(&mut self, choice: usize) -> Result<Answer, GameError> {
        if self.finished {
            return Err(GameError::RoundAlreadyOver);
        }
        if let Some(answer) = self.answers[self.index] {
            return Ok(answer);
        }

        let question = self.current();
        if choice >= question.choices.len() {
            return Err(GameError::InvalidChoice {
                choice,
                choices: question.choices.len(),
            });
        }

        let answer = Answer {
            choice,
            correct: choice == question.answer,
        };
        self.answers[self.index] = Some(answer);
        Ok(answer)
    }

    /// `next` moves past an answered question. Returns false if the current question is
    /// still open. Moving past the last question finishes the quiz.
    pub fn next(&mut self) -> Result<bool, GameError> {
        if self.finished {
            return Err(GameError::RoundAlreadyOver);
        }
        if self.answers[self.index].is_none() {
            return Ok(false);
        }

        if self.index + 1 >= self.questions.len() {
            self.finished = true;
        } else {
            self.index += 1;
        }
        Ok(true)
    }

    /// `previous` steps back to review the prior question. Its answer stays locked.
    pub fn previous(&mut self) -> bool {
        if self.finished || self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    pub fn restart(&mut self) {
        self.answers.iter_mut().for_each(|a| *a = None);
        self.index = 0;
        self.finished = false;
    }
}
