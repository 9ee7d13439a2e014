// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! `chessmate` is a rule-enforcing chess match engine.
//!
//! It keeps the board, generates the squares each piece can reach, refuses moves that would leave the mover's own
//! king in check, detects check and checkmate, and carries out castling. It does no rendering or input handling of
//! its own beyond the small console helpers in [`render`]; front ends drive a [`ChessMatch`] one ply at a time.

pub mod board;
pub mod chess_match;
pub mod core;
pub mod layout;
pub mod pieces;
pub mod render;
pub mod tracing;

pub use chess_match::{ChessMatch, MatchError};
pub use layout::{Layout, LayoutError};
