use crate::error::GameError;
use crate::wordle::*;
use rand::{rngs::StdRng, SeedableRng};
use Verdict::*;

fn chars(s: &str) -> Vec<char> {
    s.chars().collect()
}

#[test]
fn it_works() {
    let mut wordle = Wordle::new("hello").unwrap();
    assert_eq!(wordle.play_turn("bolle").unwrap(), Outcome::Continue);

    let game = wordle.game();
    let first = game.attempts.first().unwrap();
    assert_eq!(
        first[0],
        Letter {
            symbol: 'B',
            verdict: Absent
        }
    );
    assert_eq!(first[1].verdict, Present);
    assert_eq!(first[2].verdict, Correct);
    assert_eq!(first[3].verdict, Correct);
    assert_eq!(first[4].verdict, Present);
}

#[test]
fn duplicate_letters_are_not_double_counted() {
    let verdicts = evaluate(&chars("LLAMA"), &chars("ALLEY")).unwrap();
    assert_eq!(verdicts, vec![Present, Correct, Present, Absent, Absent]);

    // Three Bs guessed against a single B in the target.
    let verdicts = evaluate(&chars("ROBIN"), &chars("BBBXX")).unwrap();
    assert_eq!(verdicts, vec![Absent, Absent, Correct, Absent, Absent]);

    // Exact matches win over earlier misplaced copies.
    let verdicts = evaluate(&chars("ABBEY"), &chars("BBBBB")).unwrap();
    assert_eq!(verdicts, vec![Absent, Correct, Correct, Absent, Absent]);

    let verdicts = evaluate(&chars("SPEED"), &chars("EERIE")).unwrap();
    assert_eq!(verdicts, vec![Present, Present, Absent, Absent, Absent]);
}

#[test]
fn credited_letters_never_exceed_target_counts() {
    let cases = [
        ("LLAMA", "ALLEY"),
        ("LLAMA", "LLLLL"),
        ("ABBEY", "BABES"),
        ("DURABLE", "ELBARUD"),
        ("RESPONSABLE", "SSSSSSSSSSS"),
        ("INCLUSIF", "IIIIIIII"),
    ];

    for (target, guess) in cases {
        let (t, g) = (chars(target), chars(guess));
        let verdicts = evaluate(&t, &g).unwrap();
        for symbol in g.iter() {
            let credited = g
                .iter()
                .zip(&verdicts)
                .filter(|(c, v)| *c == symbol && **v != Absent)
                .count();
            let available = t.iter().filter(|c| *c == symbol).count();
            assert!(
                credited <= available,
                "{} credited {} times for {}/{}",
                symbol,
                credited,
                target,
                guess
            );
        }
        assert_eq!(verdicts, evaluate(&t, &g).unwrap());
    }
}

#[test]
fn evaluate_rejects_length_mismatch() {
    assert_eq!(
        evaluate(&chars("DURABLE"), &chars("DURAB")),
        Err(GameError::InvalidLength {
            expected: 7,
            actual: 5
        })
    );
}

#[test]
fn exact_guess_wins() {
    let mut wordle = Wordle::new("durable").unwrap();
    assert_eq!(wordle.play_turn("DURABLE").unwrap(), Outcome::Won);
    assert_eq!(wordle.state(), State::Won);
    assert!(wordle.game().attempts[0]
        .iter()
        .all(|l| l.verdict == Correct));
    assert_eq!(
        wordle.play_turn("DURABLE"),
        Err(GameError::RoundAlreadyOver)
    );
}

#[test]
fn round_is_lost_on_the_last_allowed_guess() {
    let mut wordle = Wordle::new("LLAMA").unwrap();
    assert_eq!(wordle.max_attempts(), 6);

    let mut wordle4 = Wordle::new("ROOK").unwrap();
    assert_eq!(wordle4.max_attempts(), 5);
    for _ in 0..4 {
        assert_eq!(wordle4.play_turn("BOOK").unwrap(), Outcome::Continue);
    }
    assert_eq!(wordle4.play_turn("LOOK").unwrap(), Outcome::Lost);
    assert_eq!(wordle4.state(), State::Lost);
    assert_eq!(wordle4.play_turn("ROOK"), Err(GameError::RoundAlreadyOver));

    assert_eq!(wordle.play_turn("ALLEY").unwrap(), Outcome::Continue);
    assert_eq!(wordle.game().remaining_attempts(), 5);
}

#[test]
fn invalid_length_does_not_count_as_attempt() {
    let mut wordle = Wordle::new("DURABLE").unwrap();
    assert_eq!(
        wordle.play_turn("DURA"),
        Err(GameError::InvalidLength {
            expected: 7,
            actual: 4
        })
    );
    assert_eq!(wordle.attempts().count(), 0);
    assert_eq!(wordle.state(), State::Playing);
}

#[test]
fn invalid_targets_are_rejected() {
    assert!(matches!(Wordle::new(""), Err(GameError::InvalidTarget(_))));
    assert!(matches!(
        Wordle::new("AB1"),
        Err(GameError::InvalidTarget(_))
    ));
}

#[test]
fn keyboard_keeps_best_verdict() {
    let mut wordle = Wordle::new("LLAMA").unwrap();
    assert_eq!(wordle.key_status('L'), KeyStatus::Unused);

    wordle.play_turn("ALLEY").unwrap();
    assert_eq!(wordle.key_status('L'), KeyStatus::Correct);
    assert_eq!(wordle.key_status('A'), KeyStatus::Present);
    assert_eq!(wordle.key_status('e'), KeyStatus::Absent);
    assert_eq!(wordle.key_status('Z'), KeyStatus::Unused);

    // A later miss never downgrades a letter.
    wordle.play_turn("MAZZL").unwrap();
    assert_eq!(wordle.key_status('L'), KeyStatus::Correct);
    assert_eq!(wordle.key_status('M'), KeyStatus::Present);
    assert_eq!(wordle.key_status('A'), KeyStatus::Present);

    let keys = wordle.keyboard("LAZQ");
    assert_eq!(
        keys,
        vec![
            ('L', KeyStatus::Correct),
            ('A', KeyStatus::Present),
            ('Z', KeyStatus::Absent),
            ('Q', KeyStatus::Unused)
        ]
    );
}

#[test]
fn key_status_over_raw_history() {
    let target = chars("DURABLE");
    let history = vec![chars("ELBARUD")];
    assert_eq!(key_status(&target, &history, 'A'), KeyStatus::Correct);
    assert_eq!(key_status(&target, &history, 'E'), KeyStatus::Present);
    assert_eq!(key_status(&target, &history, 'X'), KeyStatus::Unused);
}

#[test]
fn attempted_letters_are_sorted_and_unique() {
    let mut wordle = Wordle::new("HELLO").unwrap();
    wordle.play_turn("WORLD").unwrap();
    wordle.play_turn("LLAMA").unwrap();
    assert_eq!(
        wordle.game().attempted_letters(),
        vec!['A', 'D', 'L', 'M', 'O', 'R', 'W']
    );
}

#[test]
fn choose_target_prefers_unplayed_words() {
    let mut rng = StdRng::seed_from_u64(7);
    let words = vec!["inclusif".to_string(), "durable".to_string()];

    for _ in 0..10 {
        let target = choose_target(&words, |w| w == "INCLUSIF", &mut rng).unwrap();
        assert_eq!(target, "DURABLE");
    }

    let target = choose_target(&words, |_| true, &mut rng).unwrap();
    assert!(target == "DURABLE" || target == "INCLUSIF");

    assert_eq!(
        choose_target(&[], |_| false, &mut rng),
        Err(GameError::EmptyList("target words"))
    );
}
