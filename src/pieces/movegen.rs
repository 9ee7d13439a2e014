// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Per-kind movement rules. Each rule maps (board, piece) to the set of squares the piece can reach: blocked by
//! intervening pieces, never onto a friendly piece, always including enemy-occupied capture squares.
//!
//! These are pseudo-legal: a reachable square may still expose the mover's own king. The match controller filters
//! that out when a move is actually performed.
use crate::{
    board::Board,
    core::*,
    pieces::ChessPiece,
};

const KNIGHT_OFFSETS: [(i32, i32); 8] = [
    (-2, -1),
    (-2, 1),
    (-1, -2),
    (-1, 2),
    (1, -2),
    (1, 2),
    (2, -1),
    (2, 1),
];

pub fn reachable_squares(piece: &ChessPiece, board: &Board, in_check: bool) -> SquareSet {
    let from = match piece.position() {
        Some(from) => from,
        None => return SquareSet::empty(),
    };

    let us = piece.color();
    match piece.kind() {
        PieceKind::Pawn => pawn_moves(board, from, us, piece.move_count()),
        PieceKind::Knight => knight_moves(board, from, us),
        PieceKind::Bishop => slider_moves(board, from, us, &DIAGONALS),
        PieceKind::Rook => slider_moves(board, from, us, &ORTHOGONALS),
        PieceKind::Queen => {
            slider_moves(board, from, us, &DIAGONALS) | slider_moves(board, from, us, &ORTHOGONALS)
        }
        PieceKind::King => king_moves(board, piece, from, in_check),
    }
}

fn is_opponent_piece(board: &Board, position: GridPosition, us: Color) -> bool {
    match board.piece_at(position) {
        Some(id) => board.piece(id).color() != us,
        None => false,
    }
}

fn can_move_to(board: &Board, position: GridPosition, us: Color) -> bool {
    !board.has_piece(position) || is_opponent_piece(board, position, us)
}

pub fn slider_moves(board: &Board, from: GridPosition, us: Color, dirs: &[Direction]) -> SquareSet {
    let mut moves = SquareSet::empty();
    for &dir in dirs {
        let mut cursor = from.towards(dir);
        while let Some(sq) = cursor {
            if board.has_piece(sq) {
                if is_opponent_piece(board, sq, us) {
                    moves.insert(sq);
                }
                break;
            }

            moves.insert(sq);
            cursor = sq.towards(dir);
        }
    }

    moves
}

pub fn knight_moves(board: &Board, from: GridPosition, us: Color) -> SquareSet {
    KNIGHT_OFFSETS
        .iter()
        .filter_map(|&(rows, columns)| from.offset(rows, columns))
        .filter(|&sq| can_move_to(board, sq, us))
        .collect()
}

pub fn pawn_moves(board: &Board, from: GridPosition, us: Color, move_count: u32) -> SquareSet {
    let (up, up_left, up_right) = match us {
        Color::Light => (Direction::North, Direction::NorthWest, Direction::NorthEast),
        Color::Dark => (Direction::South, Direction::SouthWest, Direction::SouthEast),
    };

    let mut moves = SquareSet::empty();

    // Single and double pushes. The double push is only available on the pawn's first move.
    if let Some(single) = from.towards(up) {
        if !board.has_piece(single) {
            moves.insert(single);
            if move_count == 0 {
                if let Some(double) = single.towards(up) {
                    if !board.has_piece(double) {
                        moves.insert(double);
                    }
                }
            }
        }
    }

    for dir in [up_left, up_right] {
        if let Some(target) = from.towards(dir) {
            if is_opponent_piece(board, target, us) {
                moves.insert(target);
            }
        }
    }

    moves
}

/// A rook that can take part in castling: same color, never moved.
fn castling_rook(board: &Board, position: Option<GridPosition>, us: Color) -> bool {
    let id = match position.and_then(|pos| board.piece_at(pos)) {
        Some(id) => id,
        None => return false,
    };

    let rook = board.piece(id);
    rook.kind() == PieceKind::Rook && rook.color() == us && rook.move_count() == 0
}

fn all_empty(board: &Board, from: GridPosition, columns: &[i32]) -> bool {
    columns.iter().all(|&c| match from.offset(0, c) {
        Some(sq) => !board.has_piece(sq),
        None => false,
    })
}

pub fn king_moves(board: &Board, king: &ChessPiece, from: GridPosition, in_check: bool) -> SquareSet {
    let us = king.color();
    let mut moves: SquareSet = ORTHOGONALS
        .iter()
        .chain(DIAGONALS.iter())
        .filter_map(|&dir| from.towards(dir))
        .filter(|&sq| can_move_to(board, sq, us))
        .collect();

    if king.move_count() != 0 || in_check {
        return moves;
    }

    // Kingside: rook three columns east, the two squares between must be empty.
    if castling_rook(board, from.offset(0, 3), us) && all_empty(board, from, &[1, 2]) {
        if let Some(target) = from.offset(0, 2) {
            moves.insert(target);
        }
    }

    // Queenside: rook four columns west, the three squares between must be empty.
    if castling_rook(board, from.offset(0, -4), us) && all_empty(board, from, &[-1, -2, -3]) {
        if let Some(target) = from.offset(0, -2) {
            moves.insert(target);
        }
    }

    moves
}

#[cfg(test)]
mod tests {
    use super::reachable_squares;
    use crate::{board::Board, core::*, pieces::ChessPiece};

    fn at(s: &str) -> GridPosition {
        s.parse::<ChessCoordinate>().unwrap().to_grid()
    }

    fn board_with(pieces: &[(&str, Color, PieceKind)]) -> Board {
        let mut board = Board::new();
        for &(square, color, kind) in pieces {
            let id = board.add_piece(ChessPiece::new(kind, color));
            board.place_piece(id, at(square));
        }

        board
    }

    fn moves_from(board: &Board, square: &str, in_check: bool) -> Vec<String> {
        let id = board.piece_at(at(square)).expect("no piece on square");
        let mut names: Vec<_> = reachable_squares(board.piece(id), board, in_check)
            .coordinates()
            .iter()
            .map(|c| c.to_string())
            .collect();
        names.sort();
        names
    }

    fn assert_moves_generated(board: &Board, square: &str, expected: &[&str]) {
        let mut expected: Vec<_> = expected.iter().map(|s| s.to_string()).collect();
        expected.sort();
        let actual = moves_from(board, square, false);
        if actual != expected {
            println!("{}", board);
            panic!("moves from {}: got {:?}, expected {:?}", square, actual, expected);
        }
    }

    mod rooks {
        use super::*;

        #[test]
        fn open_board() {
            let board = board_with(&[("d4", Color::Light, PieceKind::Rook)]);
            assert_eq!(14, moves_from(&board, "d4", false).len());
        }

        #[test]
        fn blocked_and_capture() {
            let board = board_with(&[
                ("a1", Color::Light, PieceKind::Rook),
                ("a3", Color::Light, PieceKind::Pawn),
                ("c1", Color::Dark, PieceKind::Knight),
            ]);
            assert_moves_generated(&board, "a1", &["a2", "b1", "c1"]);
        }
    }

    mod bishops {
        use super::*;

        #[test]
        fn smoke_capture() {
            let board = board_with(&[
                ("d4", Color::Light, PieceKind::Bishop),
                ("c5", Color::Dark, PieceKind::Pawn),
                ("e5", Color::Dark, PieceKind::Pawn),
                ("c3", Color::Dark, PieceKind::Pawn),
                ("e3", Color::Light, PieceKind::Pawn),
            ]);
            assert_moves_generated(&board, "d4", &["c5", "e5", "c3"]);
        }
    }

    mod queens {
        use super::*;

        #[test]
        fn corner() {
            let board = board_with(&[("a1", Color::Dark, PieceKind::Queen)]);
            assert_eq!(21, moves_from(&board, "a1", false).len());
        }
    }

    mod knights {
        use super::*;

        #[test]
        fn corner_jumps() {
            let board = board_with(&[
                ("b1", Color::Light, PieceKind::Knight),
                ("d2", Color::Light, PieceKind::Pawn),
                ("a3", Color::Dark, PieceKind::Pawn),
            ]);
            assert_moves_generated(&board, "b1", &["a3", "c3"]);
        }
    }

    mod pawns {
        use super::*;

        #[test]
        fn light_first_move() {
            let board = board_with(&[("e2", Color::Light, PieceKind::Pawn)]);
            assert_moves_generated(&board, "e2", &["e3", "e4"]);
        }

        #[test]
        fn dark_first_move() {
            let board = board_with(&[("e7", Color::Dark, PieceKind::Pawn)]);
            assert_moves_generated(&board, "e7", &["e6", "e5"]);
        }

        #[test]
        fn no_double_push_after_moving() {
            let mut board = board_with(&[("e3", Color::Light, PieceKind::Pawn)]);
            let id = board.piece_at(at("e3")).unwrap();
            board.piece_mut(id).record_move_executed();
            assert_moves_generated(&board, "e3", &["e4"]);
        }

        #[test]
        fn blocked() {
            let board = board_with(&[
                ("e2", Color::Light, PieceKind::Pawn),
                ("e3", Color::Dark, PieceKind::Knight),
            ]);
            assert_moves_generated(&board, "e2", &[]);
        }

        #[test]
        fn double_push_blocked() {
            let board = board_with(&[
                ("e2", Color::Light, PieceKind::Pawn),
                ("e4", Color::Dark, PieceKind::Knight),
            ]);
            assert_moves_generated(&board, "e2", &["e3"]);
        }

        #[test]
        fn diagonal_captures_only_enemies() {
            let mut board = board_with(&[
                ("d4", Color::Light, PieceKind::Pawn),
                ("c5", Color::Dark, PieceKind::Pawn),
                ("e5", Color::Light, PieceKind::Pawn),
            ]);
            let id = board.piece_at(at("d4")).unwrap();
            board.piece_mut(id).record_move_executed();
            assert_moves_generated(&board, "d4", &["d5", "c5"]);
        }

        #[test]
        fn double_push_follows_move_count_not_rank() {
            // A pawn placed off its home rank by a layout still has its first move.
            let board = board_with(&[
                ("d4", Color::Light, PieceKind::Pawn),
                ("g5", Color::Dark, PieceKind::Pawn),
            ]);
            assert_moves_generated(&board, "d4", &["d5", "d6"]);
            assert_moves_generated(&board, "g5", &["g4", "g3"]);
        }
    }

    mod kings {
        use super::*;

        #[test]
        fn adjacent_squares() {
            let board = board_with(&[
                ("e4", Color::Light, PieceKind::King),
                ("e5", Color::Light, PieceKind::Pawn),
                ("d5", Color::Dark, PieceKind::Pawn),
            ]);
            assert_moves_generated(&board, "e4", &["d5", "f5", "d4", "f4", "d3", "e3", "f3"]);
        }

        #[test]
        fn castling_both_sides() {
            let board = board_with(&[
                ("e1", Color::Light, PieceKind::King),
                ("a1", Color::Light, PieceKind::Rook),
                ("h1", Color::Light, PieceKind::Rook),
            ]);
            assert_moves_generated(&board, "e1", &["d1", "d2", "e2", "f2", "f1", "g1", "c1"]);
        }

        #[test]
        fn no_castling_in_check() {
            let board = board_with(&[
                ("e1", Color::Light, PieceKind::King),
                ("h1", Color::Light, PieceKind::Rook),
            ]);
            assert!(!moves_from(&board, "e1", true).contains(&"g1".to_string()));
        }

        #[test]
        fn no_castling_through_pieces() {
            let board = board_with(&[
                ("e8", Color::Dark, PieceKind::King),
                ("a8", Color::Dark, PieceKind::Rook),
                ("b8", Color::Dark, PieceKind::Knight),
                ("h8", Color::Dark, PieceKind::Rook),
                ("g8", Color::Light, PieceKind::Bishop),
            ]);
            let moves = moves_from(&board, "e8", false);
            assert!(!moves.contains(&"c8".to_string()));
            assert!(!moves.contains(&"g8".to_string()));
            assert_eq!(5, moves.len());
        }

        #[test]
        fn no_castling_with_moved_rook() {
            let mut board = board_with(&[
                ("e1", Color::Light, PieceKind::King),
                ("h1", Color::Light, PieceKind::Rook),
            ]);
            let rook = board.piece_at(at("h1")).unwrap();
            board.piece_mut(rook).record_move_executed();
            assert!(!moves_from(&board, "e1", false).contains(&"g1".to_string()));
        }

        #[test]
        fn no_castling_with_enemy_rook() {
            let board = board_with(&[
                ("e1", Color::Light, PieceKind::King),
                ("h1", Color::Dark, PieceKind::Rook),
            ]);
            assert!(!moves_from(&board, "e1", false).contains(&"g1".to_string()));
        }
    }
}
