use std::sync::Arc;

use anyhow::anyhow;
use log::*;
use mobot::api::escape_md;
use mobot::*;

use minigamebot::{
    checklist::Checklist,
    memory::{Board, Flip, Resolution, TileState, MATCH_REWARD},
    quiz::Quiz,
    relword::{Connect, Relword, LINK_REWARD},
    sequence::{Pick, Sequence},
    wordle::{self, KeyStatus, Verdict},
    GameError,
};

use crate::app::*;

const KEYBOARD: &str = "QWERTYUIOP ASDFGHJKL ZXCVBNM";

/// emoji_letter takes a capital letter and returns the corresponding emoji letter
/// inside the Regional Indicator Symbol range.
fn emoji_letter(l: char) -> char {
    let base = 0x1F1E6;
    let target = l.to_ascii_uppercase();
    if !target.is_ascii_uppercase() {
        return target;
    }

    std::char::from_u32(base + target as u32 - 'A' as u32).unwrap_or('?')
}

/// render_wordle takes a wordle::Game and returns a MarkdownV2 representation of it.
/// Emoji codepoints: https://emojipedia.org/emoji/
pub fn render_wordle(game: &wordle::Game) -> String {
    let mut s = String::from("Your attempts:\n\n");
    for attempt in &game.attempts {
        for letter in attempt {
            let c = escape_md(&letter.symbol.to_string());
            match letter.verdict {
                Verdict::Correct => s.push_str(&format!(" {}", emoji_letter(letter.symbol))),
                Verdict::Present => s.push_str(&format!(" * `{}` *  ", c)),
                Verdict::Absent => s.push_str(&format!(" || ~{}~ ||  ", c)),
            }
        }
        s.push_str("\n\n");
    }
    s
}

/// render_keyboard shows every letter the player has tried, grouped by status.
pub fn render_keyboard(keys: &[(char, KeyStatus)]) -> String {
    let group = |status: KeyStatus| {
        keys.iter()
            .filter(|(_, s)| *s == status)
            .map(|(c, _)| c.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    };

    [
        ("\u{1F7E9}", KeyStatus::Correct),
        ("\u{1F7E8}", KeyStatus::Present),
        ("\u{2B1B}", KeyStatus::Absent),
    ]
    .iter()
    .map(|(icon, status)| (icon, group(*status)))
    .filter(|(_, letters)| !letters.is_empty())
    .map(|(icon, letters)| format!("{} {}", icon, letters))
    .collect::<Vec<_>>()
    .join("\n")
}

/// render_memory draws the grid with tile numbers for closed tiles.
pub fn render_memory(board: &Board) -> String {
    let deck = board.deck();
    let mut s = String::new();
    for row in 0..deck.rows() {
        let cells = (0..deck.cols())
            .filter_map(|col| deck.position(row, col))
            .map(|p| match board.tile_state(p) {
                Some(TileState::Found) => "\u{2705}".to_string(),
                Some(TileState::Open) => "\u{1F50D}".to_string(),
                _ => format!("[{:>2}]", p + 1),
            })
            .collect::<Vec<_>>();
        s.push_str(&cells.join(" "));
        s.push('\n');
    }

    let open = board
        .open_tiles()
        .iter()
        .filter_map(|p| deck.get(*p).map(|t| format!("{}: {}", p + 1, t.text)))
        .collect::<Vec<_>>();
    if !open.is_empty() {
        s.push('\n');
        s.push_str(&open.join("\n"));
        s.push('\n');
    }

    s.push_str(&format!("\nScore: {}", board.score()));
    s
}

/// render_quiz shows the current question and its numbered choices.
pub fn render_quiz(quiz: &Quiz) -> String {
    let q = quiz.current();
    let answer = quiz.answer();
    let mut s = format!("Question {}/{}\n{}\n\n", quiz.index() + 1, quiz.len(), q.prompt);
    for (i, choice) in q.choices.iter().enumerate() {
        let mark = match answer {
            Some(_) if i == q.answer => "\u{2705}",
            Some(a) if a.choice == i => "\u{274C}",
            _ => "  ",
        };
        s.push_str(&format!("{} {}. {}\n", mark, i + 1, choice));
    }
    s
}

/// render_sequence shows the placed steps and the numbered pool of remaining ones.
pub fn render_sequence(seq: &Sequence) -> String {
    let mut s = format!("Progress: {}%  Strikes: {}\n\n", seq.progress(), seq.strikes());
    for (i, step) in seq.placed().iter().enumerate() {
        s.push_str(&format!("\u{2714} {}. {}\n", i + 1, step));
    }
    if !seq.is_done() {
        s.push('\n');
        for (slot, step) in seq.pool() {
            s.push_str(&format!("[{}] {}\n", slot + 1, step));
        }
    }
    s
}

/// render_relword lists both columns side by side, numbered from 1.
pub fn render_relword(game: &Relword) -> String {
    let mut s = format!("Score: {}\n\n", game.score());
    for (i, app) in game.left().enumerate() {
        let mark = if game.is_left_connected(i) {
            "\u{2705}"
        } else if game.selected() == Some(i) {
            "\u{1F449}"
        } else {
            "  "
        };
        s.push_str(&format!("{} {}. {}\n", mark, i + 1, app));
    }
    s.push('\n');
    for (i, alt) in game.right().enumerate() {
        let mark = if game.is_right_connected(i) {
            "\u{2705}"
        } else {
            "  "
        };
        s.push_str(&format!("{} {}. {}\n", mark, i + 1, alt));
    }
    s
}

/// render_checklist shows every step with its tick box and the overall progress.
pub fn render_checklist(list: &Checklist) -> String {
    let mut s = format!(
        "Steps: {}/{}  Progress: {}%\n\n",
        list.completed(),
        list.steps().len(),
        list.progress()
    );
    for (i, step) in list.steps().iter().enumerate() {
        let mark = if list.is_ticked(i) { "\u{2611}" } else { "\u{2610}" };
        s.push_str(&format!("{} {}. {}\n   {}\n", mark, i + 1, step.title, step.desc));
        if !step.hint.is_empty() {
            s.push_str(&format!("   > {}\n", step.hint));
        }
    }
    s
}

/// parse_number reads a 1-based number typed by the player.
fn parse_number(text: &str) -> Option<usize> {
    text.trim().parse::<usize>().ok()?.checked_sub(1)
}

pub async fn handle_new_game(
    e: &Event,
    state: &State<App>,
    kind: &str,
) -> Result<Action, anyhow::Error> {
    let from = e.update.get_message()?.clone().from.unwrap_or_default();
    let user = from.id.to_string();
    let mut app = state.get().write().await;

    let reply = match kind {
        "wordle" => {
            let target_word = app.pick_target(&mut rand::thread_rng())?;
            app.start_wordle(&target_word).await?;
            info!(
                "Starting new wordle with {} ({}), target word: {}.",
                from.first_name,
                from.username.clone().unwrap_or("unknown".into()),
                target_word
            );
            format!(
                "Guess the {}-letter word. You have {} attempts.",
                target_word.chars().count(),
                wordle::max_attempts(target_word.chars().count())
            )
        }
        "memory" => {
            let board = app.new_board(&mut rand::thread_rng())?;
            let round = app.start_memory(board).await;
            info!("Starting new memory round with {}.", from.first_name);
            format!(
                "Find each word and its definition. Send a tile number to flip it.\n\n{}",
                render_memory(&round.board().await)
            )
        }
        "quiz" => {
            app.start_quiz().await?;
            info!("Starting new quiz with {}.", from.first_name);
            match &app.game {
                Some(ActiveGame::Quiz(quiz)) => render_quiz(quiz),
                _ => return Err(anyhow!("quiz did not start")),
            }
        }
        "sequence" => {
            let sequence = app.new_sequence(&mut rand::thread_rng())?;
            let reply = format!(
                "Put the steps in order. Send the number of the next step.\n\n{}",
                render_sequence(&sequence)
            );
            app.start_sequence(sequence).await;
            info!("Starting new sequence with {}.", from.first_name);
            reply
        }
        "relword" => {
            let relword = app.new_relword(&mut rand::thread_rng())?;
            let reply = format!(
                "Link each app to its open alternative. Send two numbers, e.g. \"2 5\".\n\n{}",
                render_relword(&relword)
            );
            app.start_relword(relword).await;
            info!("Starting new word matching round with {}.", from.first_name);
            reply
        }
        "install" => {
            app.start_checklist().await?;
            info!("Starting new install checklist with {}.", from.first_name);
            match &app.game {
                Some(ActiveGame::Checklist(list)) => format!(
                    "Send a step number to tick or untick it, \"all\" to finish or \"reset\".\n\n{}",
                    render_checklist(list)
                ),
                _ => return Err(anyhow!("checklist did not start")),
            }
        }
        _ => return Err(anyhow!("unknown game {}", kind)),
    };

    app.scores().inc_games(&user).await;
    let score = app.scores().get(&user).await;
    let greeting = if score.games == 1 {
        "This is your first game.".to_string()
    } else {
        format!("Your score: {}.", score)
    };

    Ok(Action::ReplyText(format!(
        "Hi {}, Welcome to {}!\n{}\n\n{}",
        from.first_name, app.game_name, greeting, reply
    )))
}

pub async fn handle_bot_command(e: &Event, state: &State<App>) -> Result<Action, anyhow::Error> {
    // Get the command
    let command = e
        .update
        .get_message()?
        .text
        .clone()
        .ok_or(anyhow!("No command"))?;
    let command = command
        .split_whitespace()
        .next()
        .unwrap_or_default()
        .split('@')
        .next()
        .unwrap_or_default()
        .to_string();

    let reply = match command.as_str() {
        "/help" | "/start" => {
            let game_name = state.get().read().await.game_name.clone();
            format!(
                "Welcome to {}! Pick a game:

/wordle - guess the hidden word
/memory - match words with their definitions
/quiz - answer multiple choice questions
/sequence - put the steps in order
/relword - link apps to their open alternatives
/install - walk through a Linux install

Type /score to see your score or /quit to stop the current game.",
                game_name
            )
        }

        "/wordle" => return handle_new_game(e, state, "wordle").await,
        "/memory" => return handle_new_game(e, state, "memory").await,
        "/quiz" => return handle_new_game(e, state, "quiz").await,
        "/sequence" => return handle_new_game(e, state, "sequence").await,
        "/relword" => return handle_new_game(e, state, "relword").await,
        "/install" => return handle_new_game(e, state, "install").await,

        "/quit" => {
            state.get().write().await.end_game().await;
            "Game over. Type /help to pick another one.".into()
        }

        "/score" => {
            let from = e.update.get_message()?.clone().from.unwrap_or_default();
            let score = state
                .get()
                .read()
                .await
                .scores()
                .get(&from.id.to_string())
                .await;
            if score.games == 0 {
                "You have not played any games yet.".to_string()
            } else {
                format!("Your score: {}", score)
            }
        }

        _ => "I don't know that command.".into(),
    };

    Ok(Action::ReplyText(reply))
}

async fn play_wordle(
    e: &Event,
    state: &State<App>,
    message: &str,
) -> Result<Action, anyhow::Error> {
    let from = e.update.get_message()?.clone().from.unwrap_or_default();
    let mut app = state.get().write().await;
    let turn = app.play_word(&from.id.to_string(), message).await?;

    let (mut reply, target_word, keyboard) = match &app.game {
        Some(ActiveGame::Wordle(wordle)) => (
            render_wordle(&wordle.game()),
            wordle.target_word(),
            render_keyboard(&wordle.keyboard(KEYBOARD)),
        ),
        _ => return Err(anyhow!("no wordle round in progress")),
    };
    let score = app.scores().get(&from.id.to_string()).await;

    match turn {
        Move::InvalidWord => {
            reply = format!(
                "Sorry {}, that's not a valid word\\. Try again\\.",
                escape_md(from.first_name.as_str())
            )
        }
        Move::InvalidLength => {
            reply = format!(
                "Sorry {}, the word must be {} letters long\\. Try again\\.",
                escape_md(from.first_name.as_str()),
                target_word.chars().count()
            )
        }
        Move::Valid => reply.push_str(
            format!(
                "\nNice try\\. Guess another word\\?\n{}",
                escape_md(keyboard.as_str())
            )
            .as_str(),
        ),
        Move::Won => {
            reply.push_str(
                escape_md(format!("\nYou won! \u{1F46F}\nYour score: {}", score).as_str()).as_str(),
            );
            info!(
                "{} ({}) won with {}",
                from.first_name,
                from.username.clone().unwrap_or("unknown".into()),
                message
            );
        }
        Move::Lost => {
            reply.push_str(
                escape_md(
                    format!(
                        "\nYou lost! Target word: {} \u{1F979}\nYour score: {}",
                        target_word, score
                    )
                    .as_str(),
                )
                .as_str(),
            );
            info!(
                "{} ({}) lost with {} (target: {})",
                from.first_name,
                from.username.clone().unwrap_or("unknown".into()),
                message,
                target_word
            );
        }
    }

    Ok(Action::ReplyMarkdown(reply))
}

async fn play_memory(
    e: &Event,
    state: &State<App>,
    message: &str,
) -> Result<Action, anyhow::Error> {
    let round = match &state.get().read().await.game {
        Some(ActiveGame::Memory(round)) => round.clone(),
        _ => return Err(anyhow!("no memory round in progress")),
    };
    let Some(position) = parse_number(message) else {
        return Ok(Action::ReplyText("Send the number of a tile.".into()));
    };

    let from = e.update.get_message()?.clone().from.unwrap_or_default();
    let user = from.id.to_string();
    let scores = state.get().read().await.scores();
    let chat_id = e.update.chat_id()?;
    let api = Arc::clone(&e.api);

    let opened = round
        .open(position, move |resolution, board| async move {
            let mut text = render_memory(&board);
            match resolution {
                Resolution::Matched { won: true, .. } => {
                    let total = scores.award(&user, MATCH_REWARD, true).await;
                    text.push_str(&format!("\n\nAll tiles found, you won! Your score: {}", total));
                    info!("{} finished a memory round", user);
                }
                Resolution::Matched { .. } => {
                    scores.award(&user, MATCH_REWARD, false).await;
                    text.push_str("\n\nMatch!");
                }
                Resolution::Mismatched => text.push_str("\n\nNo match, try again."),
            }

            if let Err(err) = api
                .send_message(&api::SendMessageRequest {
                    chat_id,
                    text,
                    ..Default::default()
                })
                .await
            {
                error!("Error sending memory resolution: {}", err);
            }
        })
        .await;

    let reply = match opened {
        Ok((Flip::Ignored, _)) => "That tile can't be flipped right now.".to_string(),
        Ok((Flip::Opened, board)) => render_memory(&board),
        Ok((Flip::Pending, board)) => format!("{}\n\nChecking...", render_memory(&board)),
        Err(GameError::InvalidPosition { tiles, .. }) => {
            format!("Pick a tile between 1 and {}.", tiles)
        }
        Err(err) => return Err(err.into()),
    };

    Ok(Action::ReplyText(reply))
}

async fn play_quiz(
    e: &Event,
    state: &State<App>,
    message: &str,
) -> Result<Action, anyhow::Error> {
    let from = e.update.get_message()?.clone().from.unwrap_or_default();
    let mut app = state.get().write().await;
    let scores = app.scores();
    let quiz = match &mut app.game {
        Some(ActiveGame::Quiz(quiz)) => quiz,
        _ => return Err(anyhow!("no quiz in progress")),
    };

    let reply = match message.trim().to_lowercase().as_str() {
        "next" | "n" => match quiz.next()? {
            false => "Answer the question first.".to_string(),
            true if quiz.is_finished() => {
                let total = scores
                    .award(&from.id.to_string(), quiz_xp(quiz), quiz_won(quiz))
                    .await;
                format!(
                    "Quiz finished: {}/{} correct.\nYour score: {}",
                    quiz.score(),
                    quiz.len(),
                    total
                )
            }
            true => render_quiz(quiz),
        },
        "prev" | "p" => {
            quiz.previous();
            render_quiz(quiz)
        }
        text => match parse_number(text).map(|i| quiz.choose(i)) {
            Some(Ok(answer)) => format!(
                "{}\n{}\nSend \"next\" to continue.",
                render_quiz(quiz),
                if answer.correct { "Correct!" } else { "Wrong." }
            ),
            Some(Err(GameError::InvalidChoice { choices, .. })) => {
                format!("Send a number between 1 and {}.", choices)
            }
            None => format!(
                "Send a number between 1 and {}, or \"next\".",
                quiz.current().choices.len()
            ),
            Some(Err(err)) => return Err(err.into()),
        },
    };

    Ok(Action::ReplyText(reply))
}

async fn play_sequence(
    e: &Event,
    state: &State<App>,
    message: &str,
) -> Result<Action, anyhow::Error> {
    let from = e.update.get_message()?.clone().from.unwrap_or_default();
    let mut app = state.get().write().await;
    let scores = app.scores();
    let seq = match &mut app.game {
        Some(ActiveGame::Sequence(seq)) => seq,
        _ => return Err(anyhow!("no sequence in progress")),
    };

    let Some(slot) = parse_number(message) else {
        return Ok(Action::ReplyText("Send the number of the next step.".into()));
    };

    let reply = match seq.pick(slot) {
        Ok(Pick::Correct { done: true }) => {
            let total = scores
                .award(&from.id.to_string(), sequence_xp(seq), sequence_won(seq))
                .await;
            format!(
                "{}\nAll steps in order with {} strikes!\nYour score: {}",
                render_sequence(seq),
                seq.strikes(),
                total
            )
        }
        Ok(Pick::Correct { done: false }) => format!("Correct \u{2713}\n\n{}", render_sequence(seq)),
        Ok(Pick::Wrong { expected }) => format!(
            "Wrong order \u{2717}. The next step was: {}\n\n{}",
            seq.steps()[expected],
            render_sequence(seq)
        ),
        Err(GameError::InvalidChoice { .. }) => "That step is not in the pool.".to_string(),
        Err(err) => return Err(err.into()),
    };

    Ok(Action::ReplyText(reply))
}

async fn play_relword(
    e: &Event,
    state: &State<App>,
    message: &str,
) -> Result<Action, anyhow::Error> {
    let from = e.update.get_message()?.clone().from.unwrap_or_default();
    let mut app = state.get().write().await;
    let scores = app.scores();
    let game = match &mut app.game {
        Some(ActiveGame::Relword(game)) => game,
        _ => return Err(anyhow!("no word matching round in progress")),
    };

    let numbers = message
        .split_whitespace()
        .map(parse_number)
        .collect::<Option<Vec<_>>>()
        .unwrap_or_default();

    // One number selects an app, or connects the app already selected.
    let played = match numbers.as_slice() {
        [left, right] => match game.select(*left) {
            Ok(true) => game.connect(*right),
            Ok(false) => Ok(Connect::Ignored),
            Err(err) => Err(err),
        },
        [n] if game.selected().is_some() => game.connect(*n),
        [n] => game.select(*n).map(|_| Connect::Ignored),
        _ => {
            return Ok(Action::ReplyText(
                "Send an app number and an alternative number, e.g. \"2 5\".".into(),
            ))
        }
    };

    let reply = match played {
        Ok(Connect::Linked { won: true }) => {
            let total = scores
                .award(&from.id.to_string(), game.score(), true)
                .await;
            format!(
                "{}\nWell done, all linked up!\nYour score: {}",
                render_relword(game),
                total
            )
        }
        Ok(Connect::Linked { won: false }) => {
            format!("Linked! +{}\n\n{}", LINK_REWARD, render_relword(game))
        }
        Ok(Connect::Missed) => format!("Not a match.\n\n{}", render_relword(game)),
        Ok(Connect::Ignored) => render_relword(game),
        Err(GameError::InvalidChoice { choices, .. }) => {
            format!("Pick numbers between 1 and {}.", choices)
        }
        Err(err) => return Err(err.into()),
    };

    Ok(Action::ReplyText(reply))
}

async fn play_checklist(
    e: &Event,
    state: &State<App>,
    message: &str,
) -> Result<Action, anyhow::Error> {
    let from = e.update.get_message()?.clone().from.unwrap_or_default();
    let mut app = state.get().write().await;
    let scores = app.scores();
    let list = match &mut app.game {
        Some(ActiveGame::Checklist(list)) => list,
        _ => return Err(anyhow!("no checklist in progress")),
    };

    match message.trim().to_lowercase().as_str() {
        "all" => list.complete_all(),
        "reset" => list.reset(),
        text => match parse_number(text).map(|i| list.toggle(i)) {
            Some(Ok(_)) => {}
            Some(Err(GameError::InvalidChoice { choices, .. })) => {
                return Ok(Action::ReplyText(format!(
                    "Send a step number between 1 and {}.",
                    choices
                )))
            }
            Some(Err(err)) => return Err(err.into()),
            None => {
                return Ok(Action::ReplyText(
                    "Send a step number, \"all\" or \"reset\".".into(),
                ))
            }
        },
    }

    let mut reply = render_checklist(list);
    if list.is_done() {
        let total = scores.award(&from.id.to_string(), 0, true).await;
        reply.push_str(&format!(
            "\nInstallation finished \u{1F389}\nYour score: {}",
            total
        ));
    }

    Ok(Action::ReplyText(reply))
}

/// handle_chat_event is the main Telegram handler for the bot.
pub async fn handle_chat_event(e: Event, state: State<App>) -> Result<Action, anyhow::Error> {
    // Get the message
    let message = e
        .update
        .get_message()?
        .text
        .clone()
        .ok_or(anyhow!("No text"))?;

    if message.starts_with('/') {
        return handle_bot_command(&e, &state).await;
    }

    // If there's no active game, show the menu.
    let kind = match &state.get().read().await.game {
        Some(ActiveGame::Wordle(_)) => "wordle",
        Some(ActiveGame::Memory(_)) => "memory",
        Some(ActiveGame::Quiz(_)) => "quiz",
        Some(ActiveGame::Sequence(_)) => "sequence",
        Some(ActiveGame::Relword(_)) => "relword",
        Some(ActiveGame::Checklist(_)) => "install",
        None => "",
    };
    if kind.is_empty() || !state.get().read().await.is_playing().await {
        return Ok(Action::ReplyText(
            "No game in progress. Type /help to pick one.".into(),
        ));
    }

    let from = e.update.get_message()?.clone().from.unwrap_or_default();
    info!(
        "{} ({}) played {:?} in {}",
        from.first_name,
        from.username.clone().unwrap_or("unknown".into()),
        message,
        kind
    );

    match kind {
        "wordle" => play_wordle(&e, &state, &message).await,
        "memory" => play_memory(&e, &state, &message).await,
        "quiz" => play_quiz(&e, &state, &message).await,
        "relword" => play_relword(&e, &state, &message).await,
        "install" => play_checklist(&e, &state, &message).await,
        _ => play_sequence(&e, &state, &message).await,
    }
}
