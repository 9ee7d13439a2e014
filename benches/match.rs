// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use chessmate::core::{ChessCoordinate, Color};
use chessmate::ChessMatch;

fn sq(s: &str) -> ChessCoordinate {
    s.parse().unwrap()
}

fn play(plies: &[(&str, &str)]) -> ChessMatch {
    let mut m = ChessMatch::new();
    for &(source, target) in plies {
        m.perform_move_str(source, target).unwrap();
    }
    m
}

fn criterion_benchmark(c: &mut Criterion) {
    c.bench_function("opening-pawn-push", |b| {
        let m = ChessMatch::new();
        b.iter(|| {
            let mut m = black_box(&m).clone();
            m.perform_move(sq("e2"), sq("e4")).unwrap();
        });
    });

    c.bench_function("possible-moves-queen", |b| {
        let m = play(&[("e2", "e4"), ("e7", "e5")]);
        b.iter(|| black_box(&m).possible_moves(black_box(sq("d1"))).unwrap());
    });

    c.bench_function("self-check-rejection", |b| {
        let m = play(&[("e2", "e4"), ("e7", "e5"), ("f1", "c4"), ("d8", "h4"), ("g1", "f3"), ("h4", "f2")]);
        b.iter(|| {
            let mut m = black_box(&m).clone();
            let _ = m.perform_move(sq("e1"), sq("f1"));
        });
    });

    c.bench_function("fools-mate-detection", |b| {
        let m = play(&[("f2", "f3"), ("e7", "e5"), ("g2", "g4")]);
        b.iter(|| {
            let mut m = black_box(&m).clone();
            m.perform_move(sq("d8"), sq("h4")).unwrap();
        });
    });

    c.bench_function("test-check-mate-opening", |b| {
        let m = ChessMatch::new();
        b.iter(|| {
            let mut m = black_box(&m).clone();
            m.test_check_mate(Color::Light)
        });
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
