// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! The match controller. A `ChessMatch` owns the board and all match state, and is the only thing that mutates
//! either. Every ply goes through [`ChessMatch::perform_move`], which executes the move on the board, tests whether
//! it left the mover's own king in check, and either commits it or unwinds it exactly.

use thiserror::Error;

use crate::{
    board::{Board, PieceId},
    core::*,
    layout::{Layout, LayoutError},
    pieces::{ChessPiece, PieceView},
    tracing::constants,
};

/// Rule violations. None of these change the state of the match.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MatchError {
    #[error(transparent)]
    InvalidCoordinate(#[from] CoordinateError),
    #[error("there is no piece on the source square")]
    EmptySource,
    #[error("the chosen piece is not yours")]
    WrongOwner,
    #[error("there are no possible moves for the chosen piece")]
    NoLegalMoves,
    #[error("the chosen piece can't move to the target square")]
    IllegalTarget,
    #[error("you can't put yourself in check")]
    SelfCheck,
}

/// What `make_move` did, so that `undo_move` can reverse it exactly.
#[derive(Copy, Clone, Debug)]
struct Captured {
    id: PieceId,
    /// Index the piece held in the on-board list before it was captured.
    slot: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChessMatch {
    board: Board,
    turn: u32,
    current_player: Color,
    check: bool,
    check_mate: bool,
    pieces_on_the_board: Vec<PieceId>,
    captured_pieces: Vec<PieceId>,
}

impl ChessMatch {
    /// Starts a match from the standard opening position.
    pub fn new() -> ChessMatch {
        ChessMatch::with_layout(&Layout::standard()).expect("standard layout is valid")
    }

    /// Starts a match from a custom layout.
    pub fn with_layout(layout: &Layout) -> Result<ChessMatch, LayoutError> {
        layout.validate()?;
        let mut chess_match = ChessMatch {
            board: Board::new(),
            turn: 1,
            current_player: layout.first_player,
            check: false,
            check_mate: false,
            pieces_on_the_board: Vec::with_capacity(layout.placements.len()),
            captured_pieces: Vec::new(),
        };

        for placement in &layout.placements {
            chess_match.place_new_piece(placement.square, ChessPiece::new(placement.kind, placement.color));
        }

        // A custom layout may open with the first player already in check, or mated.
        let first = chess_match.current_player;
        chess_match.check = chess_match.test_check(first);
        chess_match.check_mate = chess_match.test_check_mate(first);

        tracing::debug!(
            pieces = chess_match.pieces_on_the_board.len(),
            %first,
            check = chess_match.check,
            "match initialized"
        );
        Ok(chess_match)
    }

    fn place_new_piece(&mut self, square: ChessCoordinate, piece: ChessPiece) {
        let id = self.board.add_piece(piece);
        self.board.place_piece(id, square.to_grid());
        self.pieces_on_the_board.push(id);
    }
}

//
// Status accessors.
//

impl ChessMatch {
    pub fn turn(&self) -> u32 {
        self.turn
    }

    pub fn current_player(&self) -> Color {
        self.current_player
    }

    /// Whether the player to move is in check.
    pub fn check(&self) -> bool {
        self.check
    }

    pub fn check_mate(&self) -> bool {
        self.check_mate
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Snapshot of the board, indexed by grid row then column.
    pub fn pieces(&self) -> [[Option<PieceView>; COLUMNS]; ROWS] {
        let mut mat = [[None; COLUMNS]; ROWS];
        for (row, cells) in mat.iter_mut().enumerate() {
            for (column, cell) in cells.iter_mut().enumerate() {
                *cell = self
                    .board
                    .piece_at(GridPosition::new(row, column))
                    .map(|id| self.board.piece(id).view());
            }
        }

        mat
    }

    pub fn piece_at(&self, square: ChessCoordinate) -> Option<PieceView> {
        self.board
            .piece_at(square.to_grid())
            .map(|id| self.board.piece(id).view())
    }

    /// Pieces captured so far, in capture order.
    pub fn captured_pieces(&self) -> Vec<PieceView> {
        self.captured_pieces
            .iter()
            .map(|&id| self.board.piece(id).view())
            .collect()
    }
}

//
// Move validation and execution.
//

impl ChessMatch {
    /// The squares reachable from `source` for highlighting. Squares that would expose the mover's own king are
    /// still included; only `perform_move` rejects those.
    pub fn possible_moves(&self, source: ChessCoordinate) -> Result<SquareSet, MatchError> {
        let position = source.to_grid();
        let id = self.validate_source_position(position)?;
        let moves = self.reachable(id);
        tracing::trace!(%source, reachable = moves.len(), "possible moves");
        Ok(moves)
    }

    /// Executes one ply, returning the captured piece if there was one.
    pub fn perform_move(
        &mut self,
        source: ChessCoordinate,
        target: ChessCoordinate,
    ) -> Result<Option<PieceView>, MatchError> {
        let _span = tracing::debug_span!(
            constants::PERFORM_MOVE,
            %source,
            %target,
            player = %self.current_player,
            turn = self.turn
        )
        .entered();

        let result = self.try_perform_move(source.to_grid(), target.to_grid());
        if let Err(ref err) = result {
            tracing::debug!(event = constants::MOVE_REJECTED, reason = %err);
        }

        result
    }

    /// Like `perform_move`, with both squares given as text such as `"e2"`.
    pub fn perform_move_str(&mut self, source: &str, target: &str) -> Result<Option<PieceView>, MatchError> {
        let source: ChessCoordinate = source.parse()?;
        let target: ChessCoordinate = target.parse()?;
        self.perform_move(source, target)
    }

    fn try_perform_move(
        &mut self,
        source: GridPosition,
        target: GridPosition,
    ) -> Result<Option<PieceView>, MatchError> {
        self.validate_source_position(source)?;
        self.validate_target_position(source, target)?;
        let captured = self.make_move(source, target);

        if self.test_check(self.current_player) {
            self.undo_move(source, target, captured);
            return Err(MatchError::SelfCheck);
        }

        let captured = captured.map(|c| self.board.piece(c.id).view());
        tracing::debug!(
            event = constants::MOVE_COMMITTED,
            captured = %captured.map_or('-', |p| p.symbol())
        );

        let opponent = self.current_player.toggle();
        self.check = self.test_check(opponent);
        if self.check {
            tracing::info!(event = constants::CHECK, player = %opponent, "{} is in check", opponent);
        }

        if self.test_check_mate(opponent) {
            self.check_mate = true;
            tracing::info!(
                event = constants::CHECK_MATE,
                winner = %self.current_player,
                "checkmate, {} wins",
                self.current_player
            );
        } else {
            self.next_turn();
        }

        Ok(captured)
    }

    fn validate_source_position(&self, position: GridPosition) -> Result<PieceId, MatchError> {
        let id = self.board.piece_at(position).ok_or(MatchError::EmptySource)?;
        if self.board.piece(id).color() != self.current_player {
            return Err(MatchError::WrongOwner);
        }

        if !self.board.piece(id).has_any_possible_move(&self.board, self.check) {
            return Err(MatchError::NoLegalMoves);
        }

        Ok(id)
    }

    fn validate_target_position(&self, source: GridPosition, target: GridPosition) -> Result<(), MatchError> {
        let id = self.board.piece_at(source).ok_or(MatchError::EmptySource)?;
        if !self.board.piece(id).possible_move(&self.board, self.check, target) {
            return Err(MatchError::IllegalTarget);
        }

        Ok(())
    }

    fn reachable(&self, id: PieceId) -> SquareSet {
        self.board.piece(id).possible_moves(&self.board, self.check)
    }

    fn next_turn(&mut self) {
        self.turn += 1;
        self.current_player = self.current_player.toggle();
    }
}

//
// Make and unmake. These mutate the board unconditionally; callers have already established that the move is
// reachable for the piece on `source`.
//

/// Rook source and target columns, relative to the king's source, if a king move of this many columns is a castle.
fn castling_rook_offsets(king_columns: i32) -> Option<(i32, i32)> {
    match king_columns {
        2 => Some((3, 1)),
        -2 => Some((-4, -1)),
        _ => None,
    }
}

impl ChessMatch {
    fn make_move(&mut self, source: GridPosition, target: GridPosition) -> Option<Captured> {
        let id = self
            .board
            .remove_piece(source)
            .expect("invalid move: no piece at source square");
        self.board.piece_mut(id).record_move_executed();

        let captured = self.board.remove_piece(target).map(|captured| {
            let slot = self
                .pieces_on_the_board
                .iter()
                .position(|&p| p == captured)
                .expect("captured piece was not on the board");
            self.pieces_on_the_board.remove(slot);
            self.captured_pieces.push(captured);
            Captured { id: captured, slot }
        });

        self.board.place_piece(id, target);

        if let Some((rook_source, rook_target)) = self.castling_rook_squares(id, source, target) {
            let rook = self
                .board
                .remove_piece(rook_source)
                .expect("invalid move: castle without rook");
            self.board.place_piece(rook, rook_target);
            self.board.piece_mut(rook).record_move_executed();
        }

        captured
    }

    fn undo_move(&mut self, source: GridPosition, target: GridPosition, captured: Option<Captured>) {
        let id = self
            .board
            .remove_piece(target)
            .expect("invalid undo: no piece at target square");
        self.board.piece_mut(id).record_move_undone();
        self.board.place_piece(id, source);

        if let Some(Captured { id: captured, slot }) = captured {
            self.board.place_piece(captured, target);
            let popped = self.captured_pieces.pop();
            debug_assert_eq!(Some(captured), popped);
            self.pieces_on_the_board.insert(slot, captured);
        }

        if let Some((rook_source, rook_target)) = self.castling_rook_squares(id, source, target) {
            let rook = self
                .board
                .remove_piece(rook_target)
                .expect("invalid undo: castle without rook");
            self.board.place_piece(rook, rook_source);
            self.board.piece_mut(rook).record_move_undone();
        }
    }

    /// If moving `id` from `source` to `target` is a castle, the rook's source and target squares.
    fn castling_rook_squares(
        &self,
        id: PieceId,
        source: GridPosition,
        target: GridPosition,
    ) -> Option<(GridPosition, GridPosition)> {
        if self.board.piece(id).kind() != PieceKind::King || source.row() != target.row() {
            return None;
        }

        let columns = target.column() as i32 - source.column() as i32;
        let (from, to) = castling_rook_offsets(columns)?;
        let rook_source = source.offset(0, from).expect("invalid move: castle rook off the board");
        let rook_target = source.offset(0, to).expect("invalid move: castle rook off the board");
        Some((rook_source, rook_target))
    }
}

//
// Check and checkmate detection.
//

impl ChessMatch {
    fn king(&self, color: Color) -> PieceId {
        self.pieces_on_the_board
            .iter()
            .copied()
            .find(|&id| {
                let piece = self.board.piece(id);
                piece.color() == color && piece.kind() == PieceKind::King
            })
            .unwrap_or_else(|| panic!("there is no {} king on the board", color))
    }

    /// Whether `color`'s king is attacked by any opposing piece.
    ///
    /// # Panics
    ///
    /// Panics if `color` has no king on the board; every legal position has exactly one.
    pub fn test_check(&self, color: Color) -> bool {
        let king_position = self
            .board
            .piece(self.king(color))
            .position()
            .expect("king on the board has no position");

        self.pieces_on_the_board
            .iter()
            .filter(|&&id| self.board.piece(id).color() != color)
            .any(|&id| self.reachable(id).contains(king_position))
    }

    /// Whether `color` is in check and no reachable move of any of its pieces gets it out. Each candidate move is
    /// made, tested and unmade, so the match is unchanged afterwards.
    pub fn test_check_mate(&mut self, color: Color) -> bool {
        if !self.test_check(color) {
            return false;
        }

        let ours: Vec<PieceId> = self
            .pieces_on_the_board
            .iter()
            .copied()
            .filter(|&id| self.board.piece(id).color() == color)
            .collect();

        for id in ours {
            let source = self
                .board
                .piece(id)
                .position()
                .expect("piece on the board has no position");
            for target in self.reachable(id) {
                let captured = self.make_move(source, target);
                let still_in_check = self.test_check(color);
                self.undo_move(source, target, captured);
                if !still_in_check {
                    return false;
                }
            }
        }

        true
    }
}

impl Default for ChessMatch {
    fn default() -> Self {
        ChessMatch::new()
    }
}
