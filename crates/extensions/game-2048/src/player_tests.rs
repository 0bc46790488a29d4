use super::*;
use crate::testing::{FakeOracle, GameCall, ScriptedGame};
use tilebot_protocols::{Board, GameStatus::*};

fn board() -> Board {
    let mut board = Board::empty();
    board.set(0, 0, 1);
    board.set(3, 3, 6);
    board
}

fn settings(multithread: bool) -> PlayerSettings {
    PlayerSettings {
        multithread,
        won_pause: Duration::ZERO,
    }
}

#[test]
fn test_best_direction_picks_max() {
    assert_eq!(best_direction([1.0, 5.0, 3.0, 2.0]), Some(Direction::Down));
    assert_eq!(best_direction([0.0, 0.0, 0.0, 7.5]), Some(Direction::Right));
}

#[test]
fn test_best_direction_ties_go_to_first() {
    assert_eq!(best_direction([2.0, 4.0, 4.0, 4.0]), Some(Direction::Down));
    assert_eq!(best_direction([3.0, 3.0, 3.0, 3.0]), Some(Direction::Up));
}

#[test]
fn test_best_direction_no_moves() {
    assert_eq!(best_direction([0.0; 4]), None);
    assert_eq!(best_direction([f32::NAN; 4]), None);
}

#[test]
fn test_best_direction_skips_nan() {
    assert_eq!(best_direction([f32::NAN, 1.0, f32::NAN, 0.5]), Some(Direction::Down));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_find_best_move_multithread() {
    let fake = FakeOracle::new([1.0, 2.0, 9.0, 3.0]);
    let oracle: Arc<dyn MoveOracle> = fake.clone();
    let best = find_best_move(&oracle, &board(), true).await.unwrap();
    assert_eq!(best, Some(Direction::Left));

    let calls = fake.calls.lock().clone();
    assert_eq!(calls.len(), 4);
    assert!(calls.iter().all(|(packed, _)| *packed == board().pack()));
}

#[tokio::test]
async fn test_find_best_move_single_worker() {
    let fake = FakeOracle::new([0.0, 0.0, 0.0, 0.0]);
    let oracle: Arc<dyn MoveOracle> = fake.clone();
    assert_eq!(find_best_move(&oracle, &board(), false).await.unwrap(), None);

    let directions: Vec<Direction> = fake.calls.lock().iter().map(|(_, d)| *d).collect();
    assert_eq!(directions, Direction::ALL.to_vec());
}

#[tokio::test]
async fn test_play_until_ended() {
    let game = ScriptedGame::new(&[Running, Running, Running], board());
    let player = Player::new(game.clone(), FakeOracle::new([1.0, 0.0, 0.0, 2.0]), settings(false));

    let summary = player.play().await.unwrap();
    assert_eq!(summary.moves, 3);
    assert_eq!(summary.score, 12);
    assert_eq!(summary.max_tile, 64);
    assert_eq!(game.calls(), vec![GameCall::Move(Direction::Right); 3]);
}

#[tokio::test]
async fn test_play_stops_when_no_move_scores() {
    let game = ScriptedGame::new(&[Running, Running], board());
    let player = Player::new(game.clone(), FakeOracle::new([0.0; 4]), settings(true));

    let summary = player.play().await.unwrap();
    assert_eq!(summary.moves, 0);
    assert!(game.calls().is_empty());
}

#[tokio::test]
async fn test_play_continues_after_win() {
    let game = ScriptedGame::new(&[Running, Won, Running], board());
    let player = Player::new(game.clone(), FakeOracle::new([5.0, 0.0, 0.0, 0.0]), settings(false));

    player.play().await.unwrap();
    assert_eq!(
        game.calls(),
        vec![
            GameCall::Move(Direction::Up),
            GameCall::Continue,
            GameCall::Move(Direction::Up),
            GameCall::Move(Direction::Up),
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn test_won_pause_is_waited() {
    let game = ScriptedGame::new(&[Won], board());
    let player = Player::new(
        game.clone(),
        FakeOracle::new([0.0; 4]),
        PlayerSettings {
            multithread: false,
            won_pause: Duration::from_millis(750),
        },
    );

    let before = tokio::time::Instant::now();
    player.play().await.unwrap();
    assert!(before.elapsed() >= Duration::from_millis(750));
    assert_eq!(game.calls(), vec![GameCall::Continue]);
}

#[tokio::test]
async fn test_run_restarts_ended_game() {
    let game = ScriptedGame::new(&[Ended, Running], board());
    let player = Player::new(game.clone(), FakeOracle::new([0.0, 1.0, 0.0, 0.0]), settings(false));

    let summary = player.run().await.unwrap();
    assert_eq!(summary.moves, 1);
    assert_eq!(
        game.calls(),
        vec![GameCall::Setup, GameCall::Restart, GameCall::Move(Direction::Down)]
    );
}

#[tokio::test]
async fn test_run_keeps_running_game() {
    let game = ScriptedGame::new(&[Running], board());
    let player = Player::new(game.clone(), FakeOracle::new([0.0; 4]), settings(false));

    player.run().await.unwrap();
    assert_eq!(game.calls(), vec![GameCall::Setup]);
}
