use std::{collections::HashSet, time::Duration};

use anyhow::Context;
use argh::FromArgs;
use log::*;
use mobot::*;

use minigamebot::{memory_round::FLIP_DELAY, words};

mod app;
mod handlers;

#[cfg(test)]
mod app_test;

#[derive(FromArgs)]
/// A Telegram bot for a handful of word and memory mini-games.
struct Args {
    /// name the bot greets players with
    #[argh(option, short = 'n', default = "String::from(\"Mini Games\")")]
    name: String,

    /// file containing target words for wordle, one per line
    #[argh(option, short = 't', default = "String::from(\"target_words.txt\")")]
    target_words: String,

    /// file containing valid words for wordle, one per line
    #[argh(option, short = 'v', default = "String::from(\"valid_words.txt\")")]
    valid_words: String,

    /// JSON file of memory pairs
    #[argh(option, short = 'p', default = "String::from(\"pairs.json\")")]
    pairs: String,

    /// JSON file of quiz questions
    #[argh(option, short = 'q', default = "String::from(\"quiz.json\")")]
    quiz: String,

    /// file containing the sequence steps in order, one per line
    #[argh(option, short = 's', default = "String::from(\"steps.txt\")")]
    steps: String,

    /// JSON file of app/alternative links for the word matching game
    #[argh(option, short = 'l', default = "String::from(\"links.json\")")]
    links: String,

    /// JSON file of installation checklist steps
    #[argh(option, short = 'i', default = "String::from(\"install.json\")")]
    install: String,

    /// memory grid shape as ROWSxCOLS
    #[argh(option, default = "String::from(\"3x4\")")]
    grid: String,

    /// delay in milliseconds before two flipped memory tiles are compared
    #[argh(option, default = "FLIP_DELAY.as_millis() as u64")]
    flip_delay_ms: u64,
}

fn load_content(args: &Args) -> anyhow::Result<app::Content> {
    let valid_words = words::read_lines(&args.valid_words)?
        .unwrap_or_default()
        .into_iter()
        .map(|w| w.to_ascii_lowercase())
        .collect::<HashSet<_>>();

    Ok(app::Content {
        target_words: words::playable_targets(words::lines_or(
            &args.target_words,
            words::TARGET_WORDS,
        )?)?,
        valid_words,
        pairs: words::json_or(&args.pairs, words::default_pairs)?,
        questions: words::json_or(&args.quiz, words::default_questions)?,
        steps: words::lines_or(&args.steps, words::STEPS)?,
        links: words::json_or(&args.links, words::default_links)?,
        install_steps: words::json_or(&args.install, words::default_install_steps)?,
        grid: words::parse_grid(&args.grid)?,
        flip_delay: Duration::from_millis(args.flip_delay_ms),
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    mobot::init_logger();
    let args: Args = argh::from_env();

    let content = load_content(&args)?;
    info!(
        "Loaded {} target words, {} pairs, {} questions, {} steps, {} links, {} install steps.",
        content.target_words.len(),
        content.pairs.len(),
        content.questions.len(),
        content.steps.len(),
        content.links.len(),
        content.install_steps.len()
    );

    let token = std::env::var("TELEGRAM_TOKEN").context("TELEGRAM_TOKEN is not set")?;
    let client = Client::new(token);

    info!("Starting bot...");
    Router::new(client)
        .with_state(app::App::new(args.name, content))
        .add_route(Route::Default, handlers::handle_chat_event)
        .start()
        .await;

    Ok(())
}
