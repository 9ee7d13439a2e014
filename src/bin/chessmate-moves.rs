// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::path::PathBuf;

use anyhow::Context;
use chessmate::{core::ChessCoordinate, render::BoardView, ChessMatch, Layout};
use structopt::StructOpt;

/// Replays a list of moves and prints the squares reachable from one square afterwards.
#[derive(Debug, StructOpt)]
struct Options {
    /// Square whose reachable squares to print, e.g. e2.
    #[structopt(name = "SQUARE")]
    square: ChessCoordinate,

    /// Moves to replay first, each as source and target squares, e.g. e2e4.
    #[structopt(short, long)]
    moves: Vec<String>,

    /// JSON file describing the opening layout.
    #[structopt(long, parse(from_os_str))]
    layout: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    let ops = Options::from_args();
    let layout = match ops.layout {
        Some(ref path) => Layout::from_path(path)?,
        None => Layout::standard(),
    };

    let mut chess_match = ChessMatch::with_layout(&layout)?;
    for mov in &ops.moves {
        if mov.len() != 4 || !mov.is_ascii() {
            anyhow::bail!("moves are written as two squares, e.g. e2e4: {}", mov);
        }

        let (source, target) = mov.split_at(2);
        chess_match
            .perform_move_str(source, target)
            .with_context(|| format!("failed to replay {}", mov))?;
    }

    let moves = chess_match.possible_moves(ops.square)?;
    let pieces = chess_match.pieces();
    print!("{}", BoardView::new(&pieces).with_highlight(moves));
    for coord in moves.coordinates() {
        println!("{}", coord);
    }

    Ok(())
}
