// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The board: a passive 8x8 store of piece occupants.
//!
//! The board owns every piece of a match in an arena addressed by [`PieceId`]. Grid cells hold ids, and each piece
//! records the cell it sits on, so the two views always agree. The board enforces no chess rules at all; the match
//! controller simulates moves on it and unwinds them with the same `place_piece`/`remove_piece` pair.

use std::fmt;

use crate::{
    core::{GridPosition, COLUMNS, ROWS},
    pieces::ChessPiece,
};

/// Stable handle to a piece in the board's arena. Ids are never reused, even after a capture.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PieceId(u8);

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Board {
    cells: [[Option<PieceId>; COLUMNS]; ROWS],
    pieces: Vec<ChessPiece>,
}

impl Board {
    pub fn new() -> Board {
        Board {
            cells: [[None; COLUMNS]; ROWS],
            pieces: Vec::new(),
        }
    }

    pub fn rows(&self) -> usize {
        ROWS
    }

    pub fn columns(&self) -> usize {
        COLUMNS
    }

    /// Adds a piece to the arena without placing it on the grid.
    pub fn add_piece(&mut self, piece: ChessPiece) -> PieceId {
        assert!(self.pieces.len() < u8::MAX as usize, "piece arena is full");
        let id = PieceId(self.pieces.len() as u8);
        self.pieces.push(piece);
        id
    }

    pub fn piece(&self, id: PieceId) -> &ChessPiece {
        &self.pieces[id.0 as usize]
    }

    pub(crate) fn piece_mut(&mut self, id: PieceId) -> &mut ChessPiece {
        &mut self.pieces[id.0 as usize]
    }

    pub fn piece_at(&self, position: GridPosition) -> Option<PieceId> {
        self.cells[position.row()][position.column()]
    }

    pub fn has_piece(&self, position: GridPosition) -> bool {
        self.piece_at(position).is_some()
    }

    /// Stores a piece in the given cell and records the position on the piece. The cell must be empty.
    pub fn place_piece(&mut self, id: PieceId, position: GridPosition) {
        debug_assert!(
            !self.has_piece(position),
            "placing {:?} on occupied cell {}",
            id,
            position
        );
        self.cells[position.row()][position.column()] = Some(id);
        self.piece_mut(id).set_position(Some(position));
    }

    /// Clears the given cell, returning its prior occupant with its recorded position cleared as well.
    pub fn remove_piece(&mut self, position: GridPosition) -> Option<PieceId> {
        let id = self.cells[position.row()][position.column()].take()?;
        self.piece_mut(id).set_position(None);
        Some(id)
    }
}

impl Default for Board {
    fn default() -> Self {
        Board::new()
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for row in 0..self.rows() {
            for column in 0..self.columns() {
                match self.piece_at(GridPosition::new(row, column)) {
                    Some(id) => {
                        let piece = self.piece(id);
                        write!(f, " {} ", piece.kind().symbol(piece.color()))?
                    }
                    None => write!(f, " . ")?,
                }
            }

            writeln!(f, "| {}", self.rows() - row)?;
        }

        for _ in 0..self.columns() {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for file in ('a'..='h').take(self.columns()) {
            write!(f, " {} ", file)?;
        }

        writeln!(f)?;
        Ok(())
    }
}
