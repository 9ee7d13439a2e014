// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Plain-text rendering of a match for console front ends.

use std::fmt;

use crate::{
    chess_match::ChessMatch,
    core::{colors, SquareSet, COLUMNS, ROWS},
    pieces::PieceView,
};

/// An occupancy snapshot, optionally with a set of reachable squares to highlight.
pub struct BoardView<'a> {
    pieces: &'a [[Option<PieceView>; COLUMNS]; ROWS],
    highlight: SquareSet,
}

impl<'a> BoardView<'a> {
    pub fn new(pieces: &'a [[Option<PieceView>; COLUMNS]; ROWS]) -> BoardView<'a> {
        BoardView {
            pieces,
            highlight: SquareSet::empty(),
        }
    }

    pub fn with_highlight(mut self, highlight: SquareSet) -> BoardView<'a> {
        self.highlight = highlight;
        self
    }
}

impl fmt::Display for BoardView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let highlight = self.highlight.to_matrix();
        for (row, cells) in self.pieces.iter().enumerate() {
            write!(f, "{} ", ROWS - row)?;
            for (column, cell) in cells.iter().enumerate() {
                let symbol = cell.map_or('-', |p| p.symbol());
                if highlight[row][column] {
                    write!(f, "[{}]", symbol)?;
                } else {
                    write!(f, " {} ", symbol)?;
                }
            }

            writeln!(f)?;
        }

        write!(f, " ")?;
        for file in ('a'..='h').take(COLUMNS) {
            write!(f, "  {}", file)?;
        }

        writeln!(f)
    }
}

/// The board plus captured material and match status.
pub struct MatchView<'a>(pub &'a ChessMatch);

impl fmt::Display for MatchView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let chess_match = self.0;
        let pieces = chess_match.pieces();
        write!(f, "{}", BoardView::new(&pieces))?;
        writeln!(f)?;

        let captured = chess_match.captured_pieces();
        writeln!(f, "Captured pieces:")?;
        for color in colors() {
            let symbols: String = captured
                .iter()
                .filter(|p| p.color == color)
                .map(|p| p.symbol())
                .collect();
            writeln!(f, "{}: [{}]", color, symbols)?;
        }

        writeln!(f)?;
        writeln!(f, "Turn: {}", chess_match.turn())?;
        if chess_match.check_mate() {
            writeln!(f, "CHECKMATE!")?;
            writeln!(f, "Winner: {}", chess_match.current_player())?;
        } else {
            writeln!(f, "Waiting player: {}", chess_match.current_player())?;
            if chess_match.check() {
                writeln!(f, "CHECK!")?;
            }
        }

        Ok(())
    }
}
