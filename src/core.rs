// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Module `core` contains the coordinate model and the small value types used pervasively throughout `chessmate`.

mod coord;
mod squareset;
mod types;

pub use coord::{position_exists, ChessCoordinate, CoordinateError, GridPosition, COLUMNS, ROWS};
pub use squareset::{SquareSet, SquareSetIterator};
pub use types::{colors, Color, Direction, PieceKind, DIAGONALS, ORTHOGONALS};
