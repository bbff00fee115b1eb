use std::time::Duration;

use rand::{rngs::StdRng, SeedableRng};

use crate::app::*;
use crate::handlers::{
    render_checklist, render_keyboard, render_memory, render_relword, render_wordle,
};
use minigamebot::{
    memory::{Flip, Phase, Resolution},
    wordle::KeyStatus,
    words,
};

fn content() -> Content {
    Content {
        target_words: vec!["hello".to_string(), "world".to_string()],
        pairs: words::default_pairs(),
        questions: words::default_questions(),
        steps: words::STEPS.iter().map(|s| s.to_string()).collect(),
        links: words::default_links(),
        install_steps: words::default_install_steps(),
        grid: (3, 4),
        flip_delay: Duration::from_millis(100),
        ..Default::default()
    }
}

#[test]
fn score_display() {
    let score = Score {
        games: 4,
        wins: 1,
        xp: 30,
    };
    assert_eq!(score.to_string(), "25% (1/4), 30 XP");
    assert_eq!(Score::default().to_string(), "0% (0/0), 0 XP");
}

#[tokio::test]
async fn wordle_win_awards_xp() {
    let mut app = App::new("BadWordle".into(), content());
    let mut rng = StdRng::seed_from_u64(0);
    let target = app.pick_target(&mut rng).unwrap();
    app.start_wordle(&target).await.unwrap();
    assert!(app.is_playing().await);

    // Played words are avoided while fresh ones remain.
    let next = app.pick_target(&mut rng).unwrap();
    assert_ne!(next, target);

    assert!(matches!(
        app.play_word("42", "hi").await.unwrap(),
        Move::InvalidLength
    ));
    assert!(matches!(
        app.play_word("42", "abcde").await.unwrap(),
        Move::Valid
    ));
    assert!(matches!(
        app.play_word("42", &target).await.unwrap(),
        Move::Won
    ));
    assert!(!app.is_playing().await);

    // Five letters allow six attempts; two were used.
    let score = app.scores().get("42").await;
    assert_eq!(score.wins, 1);
    assert_eq!(score.xp, WORDLE_XP * 5);
    assert!(app.play_word("42", &target).await.is_err());
}

#[tokio::test]
async fn valid_word_list_is_enforced() {
    let mut content = content();
    content.valid_words = ["hello", "world"].iter().map(|s| s.to_string()).collect();
    let mut app = App::new("BadWordle".into(), content);
    app.start_wordle("hello").await.unwrap();

    assert!(matches!(
        app.play_word("1", "abcde").await.unwrap(),
        Move::InvalidWord
    ));
    assert!(matches!(
        app.play_word("1", "WORLD").await.unwrap(),
        Move::Valid
    ));
}

#[tokio::test(start_paused = true)]
async fn switching_games_stops_pending_memory_resolution() {
    let mut app = App::new("Games".into(), content());
    let board = app.new_board(&mut StdRng::seed_from_u64(3)).unwrap();
    let round = app.start_memory(board).await;

    let tiles = round.board().await.deck().tiles().to_vec();
    let other = tiles.iter().position(|t| t.pair != tiles[0].pair).unwrap();
    let (tx, mut rx) = tokio::sync::mpsc::unbounded_channel::<Resolution>();

    round.open(0, |_, _| async {}).await.unwrap();
    let (flip, _) = round
        .open(other, move |r, _| async move {
            let _ = tx.send(r);
        })
        .await
        .unwrap();
    assert_eq!(flip, Flip::Pending);

    app.start_quiz().await.unwrap();
    assert!(matches!(app.game, Some(ActiveGame::Quiz(_))));

    tokio::time::sleep(Duration::from_secs(1)).await;
    assert_eq!(rx.recv().await, None);
    // The abandoned board was left as it was when the game ended.
    assert_eq!(round.board().await.phase(), Phase::Busy);
}

#[tokio::test(start_paused = true)]
async fn new_memory_round_reuses_and_resets_board() {
    let mut app = App::new("Games".into(), content());
    let board = app.new_board(&mut StdRng::seed_from_u64(1)).unwrap();
    let first = app.start_memory(board).await;
    first.open(0, |_, _| async {}).await.unwrap();

    let board = app.new_board(&mut StdRng::seed_from_u64(2)).unwrap();
    let second = app.start_memory(board).await;
    let fresh = second.board().await;
    assert!(fresh.open_tiles().is_empty());
    // Both handles share the same round.
    assert_eq!(first.board().await.deck(), fresh.deck());
}

#[test]
fn xp_for_quiz_and_sequence() {
    let mut quiz = minigamebot::quiz::Quiz::new(words::default_questions()).unwrap();
    let answer = quiz.current().answer;
    quiz.choose(answer).unwrap();
    assert_eq!(quiz_xp(&quiz), QUIZ_XP);

    let mut rng = StdRng::seed_from_u64(0);
    let mut seq =
        minigamebot::sequence::Sequence::new(vec!["a".into(), "b".into()], &mut rng).unwrap();
    let wrong = seq.pool().find(|(_, s)| *s == "b").unwrap().0;
    seq.pick(wrong).unwrap();
    assert_eq!(sequence_xp(&seq), 2 * STEP_XP - STRIKE_PENALTY);
}

#[test]
fn only_successful_rounds_count_as_wins() {
    let questions = words::default_questions();
    let mut quiz = minigamebot::quiz::Quiz::new(questions.clone()).unwrap();
    for q in &questions {
        let wrong = (q.answer + 1) % q.choices.len();
        quiz.choose(wrong).unwrap();
        quiz.next().unwrap();
    }
    assert!(quiz.is_finished());
    assert_eq!(quiz_xp(&quiz), 0);
    assert!(!quiz_won(&quiz));

    quiz.restart();
    for (i, q) in questions.iter().enumerate() {
        let choice = if i < 4 { q.answer } else { (q.answer + 1) % q.choices.len() };
        quiz.choose(choice).unwrap();
        quiz.next().unwrap();
    }
    // 4 of 7 is at least half.
    assert!(quiz_won(&quiz));

    let mut rng = StdRng::seed_from_u64(0);
    let mut seq =
        minigamebot::sequence::Sequence::new(vec!["a".into(), "b".into()], &mut rng).unwrap();
    let wrong = seq.pool().find(|(_, s)| *s == "b").unwrap().0;
    seq.pick(wrong).unwrap();
    assert!(sequence_won(&seq));
    seq.pick(wrong).unwrap();
    assert!(!sequence_won(&seq));
}

#[tokio::test]
async fn relword_and_checklist_rounds() {
    let mut app = App::new("Games".into(), content());

    let relword = app.new_relword(&mut StdRng::seed_from_u64(0)).unwrap();
    app.start_relword(relword).await;
    assert!(matches!(app.game, Some(ActiveGame::Relword(_))));
    assert!(app.is_playing().await);

    app.start_checklist().await.unwrap();
    match &mut app.game {
        Some(ActiveGame::Checklist(list)) => list.complete_all(),
        _ => panic!("expected a checklist"),
    }
    assert!(!app.is_playing().await);
}

#[test]
fn rendering() {
    let mut wordle = minigamebot::wordle::Wordle::new("LLAMA").unwrap();
    wordle.play_turn("ALLEY").unwrap();
    let text = render_wordle(&wordle.game());
    assert!(text.contains("`A`"));
    assert!(text.contains("~E~"));
    assert!(text.contains('\u{1F1F1}'));

    let keys = render_keyboard(&[
        ('A', KeyStatus::Present),
        ('L', KeyStatus::Correct),
        ('E', KeyStatus::Absent),
        ('Q', KeyStatus::Unused),
    ]);
    assert_eq!(keys, "\u{1F7E9} L\n\u{1F7E8} A\n\u{2B1B} E");

    let app = App::new("Games".into(), content());
    let board = app.new_board(&mut StdRng::seed_from_u64(0)).unwrap();
    let text = render_memory(&board);
    assert!(text.contains("[ 1]"));
    assert!(text.contains("[12]"));
    assert!(text.ends_with("Score: 0"));

    let mut relword = app.new_relword(&mut StdRng::seed_from_u64(0)).unwrap();
    relword.select(9).unwrap();
    let text = render_relword(&relword);
    assert!(text.starts_with("Score: 0"));
    assert!(text.contains("\u{1F449} 10. Windows"));

    let mut list = minigamebot::checklist::Checklist::new(words::default_install_steps()).unwrap();
    list.toggle(0).unwrap();
    let text = render_checklist(&list);
    assert!(text.starts_with("Steps: 1/6  Progress: 17%"));
    assert!(text.contains("\u{2611} 1. Télécharger l'ISO"));
    assert!(text.contains("> reboot"));
}
