use criterion::{black_box, criterion_group, criterion_main, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::Duration;
use tapchess::{Board, ChessClock, ClockConfig, Coord, GameController, Side};

const BOARDS: [(&str, &str); 4] = [
    ("initial", "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR"),
    ("sparse", "4k3/8/3p4/8/8/2N5/8/4K3"),
    ("middle", "r3k2r/pp1n1ppp/2p5/8/3P4/2N5/PP3PPP/R3K2R"),
    ("full_rank", "rrrrrrrr/8/8/8/8/8/8/RRRRRRRR"),
];

fn boards() -> impl Iterator<Item = (&'static str, Board)> {
    BOARDS
        .iter()
        .map(|&(name, placement)| (name, Board::from_placement(placement).unwrap()))
}

fn bench_make_move(c: &mut Criterion) {
    let mut group = c.benchmark_group("make_move");
    for (name, board) in boards() {
        let moves: Vec<(Coord, Coord)> = board
            .occupancy(Side::White)
            .into_iter()
            .flat_map(|from| Coord::iter().filter(move |to| *to != from).map(move |to| (from, to)))
            .collect();
        group.bench_function(name, |b| {
            b.iter(|| {
                for &(from, to) in &moves {
                    let mut copy = board.clone();
                    let _ = black_box(copy.make_move(from, to));
                }
            })
        });
    }
}

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("placement");
    for (name, board) in boards() {
        let placement = board.as_placement();
        group.bench_function(format!("parse_{}", name), |b| {
            b.iter(|| black_box(Board::from_placement(&placement).unwrap()))
        });
        group.bench_function(format!("format_{}", name), |b| {
            b.iter(|| black_box(board.as_placement()))
        });
    }
}

fn bench_touches(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(42);
    let touches: Vec<(i32, i32)> = (0..4096)
        .map(|_| (rng.gen_range(-1..9), rng.gen_range(-1..9)))
        .collect();

    c.bench_function("random_touches", |b| {
        b.iter(|| {
            let mut game = GameController::new();
            for &(row, col) in &touches {
                black_box(game.handle_cell_touch(row, col));
            }
            black_box(game.outcome().copied())
        })
    });
}

fn bench_clock(c: &mut Criterion) {
    let config = ClockConfig::with_time_limit(Duration::from_secs(600));
    c.bench_function("clock_until_expired", |b| {
        b.iter(|| {
            let mut clock = ChessClock::new(config).unwrap();
            clock.switch_to(Side::White);
            let mut ticks = 0;
            while clock.tick().is_some() {
                ticks += 1;
            }
            black_box(ticks)
        })
    });
}

criterion_group!(benches, bench_make_move, bench_parse, bench_touches, bench_clock);
criterion_main!(benches);
