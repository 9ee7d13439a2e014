// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Pieces and their movement capability.
//!
//! Every piece is a tagged variant: a [`PieceKind`] plus color, move counter and the grid cell it currently occupies.
//! Reachability is a pure function of the board and the piece, dispatched on the kind in [`movegen`].

pub mod movegen;

use serde::Serialize;

use crate::{
    board::Board,
    core::{ChessCoordinate, Color, GridPosition, PieceKind, SquareSet},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChessPiece {
    kind: PieceKind,
    color: Color,
    move_count: u32,
    position: Option<GridPosition>,
}

impl ChessPiece {
    pub fn new(kind: PieceKind, color: Color) -> ChessPiece {
        ChessPiece {
            kind,
            color,
            move_count: 0,
            position: None,
        }
    }

    pub fn kind(&self) -> PieceKind {
        self.kind
    }

    pub fn color(&self) -> Color {
        self.color
    }

    /// Number of moves this piece has made, net of undone moves. Only castling eligibility looks at it.
    pub fn move_count(&self) -> u32 {
        self.move_count
    }

    /// The grid cell holding this piece, or None if it is not on the board.
    pub fn position(&self) -> Option<GridPosition> {
        self.position
    }

    pub fn chess_position(&self) -> Option<ChessCoordinate> {
        self.position.map(ChessCoordinate::from_grid)
    }

    pub(crate) fn set_position(&mut self, position: Option<GridPosition>) {
        self.position = position;
    }

    pub fn record_move_executed(&mut self) {
        self.move_count += 1;
    }

    pub fn record_move_undone(&mut self) {
        debug_assert!(self.move_count > 0, "undoing a move that never happened");
        self.move_count -= 1;
    }

    /// The squares this piece can reach on the given board. `in_check` is the match's check flag, which gates
    /// castling for kings.
    pub fn possible_moves(&self, board: &Board, in_check: bool) -> SquareSet {
        movegen::reachable_squares(self, board, in_check)
    }

    pub fn possible_move(&self, board: &Board, in_check: bool, target: GridPosition) -> bool {
        self.possible_moves(board, in_check).contains(target)
    }

    pub fn has_any_possible_move(&self, board: &Board, in_check: bool) -> bool {
        !self.possible_moves(board, in_check).is_empty()
    }

    pub fn view(&self) -> PieceView {
        PieceView {
            color: self.color,
            kind: self.kind,
            position: self.chess_position(),
        }
    }
}

/// A read-only description of a piece, handed to front ends.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PieceView {
    pub color: Color,
    pub kind: PieceKind,
    /// None once the piece has been captured.
    pub position: Option<ChessCoordinate>,
}

impl PieceView {
    pub fn symbol(&self) -> char {
        self.kind.symbol(self.color)
    }
}
