use std::time::Duration;

use rand::{rngs::StdRng, SeedableRng};
use tokio::sync::{mpsc, oneshot};

use crate::memory::*;
use crate::memory_round::*;
use crate::words::default_pairs;

fn board(seed: u64) -> Board {
    let mut rng = StdRng::seed_from_u64(seed);
    Board::new(Deck::build(&default_pairs(), 3, 4, &mut rng).unwrap())
}

fn find_pair(board: &Board, pair: PairId) -> (usize, usize) {
    let tiles = board.deck().tiles();
    let a = tiles.iter().position(|t| t.pair == pair).unwrap();
    let b = tiles.iter().rposition(|t| t.pair == pair).unwrap();
    (a, b)
}

async fn ignore(_: Resolution, _: Board) {}

#[tokio::test(start_paused = true)]
async fn resolution_waits_for_the_delay() {
    let round = MemoryRound::new(board(1), FLIP_DELAY);
    let (a, b) = find_pair(&round.board().await, PairId(2));
    let (tx, rx) = oneshot::channel();

    let (flip, _) = round.open(a, ignore).await.unwrap();
    assert_eq!(flip, Flip::Opened);

    let (flip, snapshot) = round
        .open(b, move |resolution, board| async move {
            let _ = tx.send((resolution, board));
        })
        .await
        .unwrap();
    assert_eq!(flip, Flip::Pending);
    assert_eq!(snapshot.phase(), Phase::Busy);
    assert!(round.is_resolving().await);

    tokio::time::sleep(FLIP_DELAY / 2).await;
    assert_eq!(round.board().await.phase(), Phase::Busy);

    let (resolution, after) = rx.await.unwrap();
    assert_eq!(
        resolution,
        Resolution::Matched {
            pair: PairId(2),
            won: false
        }
    );
    assert_eq!(after.score(), MATCH_REWARD);
    assert_eq!(round.board().await.phase(), Phase::Idle);
    assert_eq!(round.board().await.tile_state(a), Some(TileState::Found));
}

#[tokio::test(start_paused = true)]
async fn opens_are_ignored_while_resolving() {
    let round = MemoryRound::new(board(2), FLIP_DELAY);
    let (tx, mut rx) = mpsc::unbounded_channel();

    let tiles = round.board().await.deck().tiles().to_vec();
    let other = tiles.iter().position(|t| t.pair != tiles[0].pair).unwrap();
    let third = (1..tiles.len()).find(|p| *p != other).unwrap();

    round.open(0, ignore).await.unwrap();
    let tx2 = tx.clone();
    round
        .open(other, move |r, _| async move {
            let _ = tx2.send(r);
        })
        .await
        .unwrap();

    let before = format!("{:?}", round.board().await);
    let (flip, _) = round
        .open(third, move |r, _| async move {
            let _ = tx.send(r);
        })
        .await
        .unwrap();
    assert_eq!(flip, Flip::Ignored);
    assert_eq!(format!("{:?}", round.board().await), before);

    assert_eq!(rx.recv().await, Some(Resolution::Mismatched));
    // Only one resolution was scheduled.
    assert_eq!(rx.recv().await, None);

    let board = round.board().await;
    assert_eq!(board.tile_state(0), Some(TileState::Closed));
    assert_eq!(board.tile_state(other), Some(TileState::Closed));
    assert!(!board.is_won());
}

#[tokio::test(start_paused = true)]
async fn restart_cancels_pending_resolution() {
    let round = MemoryRound::new(board(3), Duration::from_millis(500));
    let (a, b) = find_pair(&round.board().await, PairId(1));
    let (tx, mut rx) = mpsc::unbounded_channel::<Resolution>();

    round.open(a, ignore).await.unwrap();
    round
        .open(b, move |r, _| async move {
            let _ = tx.send(r);
        })
        .await
        .unwrap();

    round.restart(board(4)).await;
    assert!(!round.is_resolving().await);

    tokio::time::sleep(Duration::from_secs(2)).await;

    // The callback was dropped with its task, so the channel closed without a message.
    assert_eq!(rx.recv().await, None);
    let fresh = round.board().await;
    assert_eq!(fresh.phase(), Phase::Idle);
    assert_eq!(fresh.found(), 0);
    assert_eq!(fresh.score(), 0);
    assert_eq!(fresh.deck(), board(4).deck());
}

#[tokio::test(start_paused = true)]
async fn slow_delivery_survives_the_next_attempt() {
    let round = MemoryRound::new(board(6), Duration::from_millis(100));
    let tiles = round.board().await.deck().tiles().to_vec();
    let other = tiles.iter().position(|t| t.pair != tiles[0].pair).unwrap();
    let (tx, rx) = oneshot::channel();

    round.open(0, ignore).await.unwrap();
    round
        .open(other, move |r, _| async move {
            tokio::time::sleep(Duration::from_millis(500)).await;
            let _ = tx.send(r);
        })
        .await
        .unwrap();

    // The mismatch is applied while its callback is still running.
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(round.board().await.phase(), Phase::Idle);

    let next = (1..=6)
        .map(PairId)
        .find(|id| *id != tiles[0].pair && *id != tiles[other].pair)
        .unwrap();
    let (a, b) = find_pair(&round.board().await, next);
    round.open(a, ignore).await.unwrap();
    let (flip, _) = round.open(b, ignore).await.unwrap();
    assert_eq!(flip, Flip::Pending);

    assert_eq!(rx.await, Ok(Resolution::Mismatched));
}

#[tokio::test(start_paused = true)]
async fn full_round_is_won() {
    let round = MemoryRound::new(board(5), Duration::from_millis(10));
    let mut last = None;

    for id in 1..=6 {
        let (a, b) = find_pair(&round.board().await, PairId(id));
        let (tx, rx) = oneshot::channel();
        round.open(a, ignore).await.unwrap();
        round
            .open(b, move |r, _| async move {
                let _ = tx.send(r);
            })
            .await
            .unwrap();
        last = Some(rx.await.unwrap());
    }

    assert_eq!(
        last,
        Some(Resolution::Matched {
            pair: PairId(6),
            won: true
        })
    );
    let board = round.board().await;
    assert!(board.is_won());
    assert_eq!(board.phase(), Phase::Won);
    assert_eq!(board.score(), 6 * MATCH_REWARD);
}
