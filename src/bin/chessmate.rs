// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.
use std::{
    fs::File,
    io::{self, BufRead, Write},
    path::PathBuf,
};

use anyhow::{anyhow, Context};
use chessmate::{
    core::ChessCoordinate,
    render::{BoardView, MatchView},
    tracing::moves::MoveLogLayer,
    ChessMatch, Layout,
};
use structopt::StructOpt;
use tracing::Level;
use tracing_subscriber::{filter::LevelFilter, prelude::*, FmtSubscriber};

/// Play a match of chess on the console.
#[derive(Debug, StructOpt)]
struct Options {
    /// JSON file describing the opening layout.
    #[structopt(long, parse(from_os_str))]
    layout: Option<PathBuf>,
    /// Start with only kings and rooks on the board.
    #[structopt(long, conflicts_with = "layout")]
    reduced: bool,
    /// File to write a JSON log of every move attempt to.
    #[structopt(long, parse(from_os_str))]
    move_log: Option<PathBuf>,
    /// Log match internals to stderr.
    #[structopt(short, long)]
    verbose: bool,
}

fn init_logging(ops: &Options) -> anyhow::Result<()> {
    let level = if ops.verbose { Level::DEBUG } else { Level::WARN };
    if let Some(ref move_log) = ops.move_log {
        let file = File::create(move_log)
            .with_context(|| format!("failed to open move log {}", move_log.display()))?;
        tracing_subscriber::registry()
            .with(tracing_subscriber::fmt::layer().with_filter(LevelFilter::from_level(level)))
            .with(MoveLogLayer::new(file))
            .try_init()?;
    } else {
        let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
        tracing::subscriber::set_global_default(subscriber)?;
    }

    Ok(())
}

fn prompt(lines: &mut impl Iterator<Item = io::Result<String>>, label: &str) -> anyhow::Result<String> {
    print!("{}: ", label);
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(line?.trim().to_owned()),
        None => Err(anyhow!("end of input")),
    }
}

fn main() -> anyhow::Result<()> {
    let ops = Options::from_args();
    init_logging(&ops)?;

    let layout = match (&ops.layout, ops.reduced) {
        (Some(path), _) => Layout::from_path(path)?,
        (None, true) => Layout::rooks_and_kings(),
        (None, false) => Layout::standard(),
    };
    let mut chess_match = ChessMatch::with_layout(&layout)?;

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    while !chess_match.check_mate() {
        println!();
        print!("{}", MatchView(&chess_match));
        println!();

        let source = prompt(&mut lines, "Source")?;
        let source: ChessCoordinate = match source.parse() {
            Ok(coord) => coord,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        let possible_moves = match chess_match.possible_moves(source) {
            Ok(moves) => moves,
            Err(e) => {
                println!("{}", e);
                continue;
            }
        };

        let pieces = chess_match.pieces();
        println!();
        print!("{}", BoardView::new(&pieces).with_highlight(possible_moves));
        println!();

        let target = prompt(&mut lines, "Target")?;
        let result = target
            .parse::<ChessCoordinate>()
            .map_err(Into::into)
            .and_then(|target| chess_match.perform_move(source, target));
        match result {
            Ok(Some(captured)) => println!("Captured {}", captured.symbol()),
            Ok(None) => {}
            Err(e) => println!("{}", e),
        }
    }

    println!();
    print!("{}", MatchView(&chess_match));
    Ok(())
}
