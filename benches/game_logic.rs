use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use tetris_training::core::{
    collides, Board, GameState, Leaderboard, MemoryStore, QuestionBank, Session, SessionConfig,
    Silent, Tetromino,
};
use tetris_training::types::{GameAction, PieceKind, Rotation};

fn playing_state() -> GameState {
    let mut state = GameState::new(12345);
    state.set_playing(true);
    state.spawn_piece();
    state
}

fn bench_gravity(c: &mut Criterion) {
    let mut state = playing_state();

    c.bench_function("gravity_step", |b| {
        b.iter(|| {
            if !state.is_playing() || state.game_over() {
                state = playing_state();
            }
            state.apply_action(black_box(GameAction::SoftDrop));
        })
    });
}

fn bench_line_clear(c: &mut Criterion) {
    let board = Board::from_rows(&["##########"; 4]);

    c.bench_function("clear_4_lines", |b| {
        b.iter(|| black_box(&board).clear_lines())
    });
}

fn bench_place(c: &mut Criterion) {
    let board = Board::new();
    let piece = Tetromino::at(PieceKind::T, Rotation::South, 3, 18);

    c.bench_function("place_piece", |b| {
        b.iter(|| black_box(&board).place(black_box(&piece)))
    });
}

fn bench_collision(c: &mut Criterion) {
    let board = Board::from_rows(&["#.#.#.#.#.", ".#.#.#.#.#"]);
    let piece = Tetromino::at(PieceKind::L, Rotation::East, 4, 10);

    c.bench_function("collides_rotate", |b| {
        b.iter(|| collides(black_box(&board), black_box(&piece), 0, 0, 1))
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let mut session = Session::new(
        SessionConfig::default(),
        Arc::new(QuestionBank::builtin()),
        Box::new(Leaderboard::new(MemoryStore::new())),
        Arc::new(Silent),
    );
    session.start();
    session.fetch_pending_question();

    c.bench_function("session_snapshot", |b| b.iter(|| black_box(session.snapshot())));
}

criterion_group!(
    benches,
    bench_gravity,
    bench_line_clear,
    bench_place,
    bench_collision,
    bench_snapshot
);
criterion_main!(benches);
