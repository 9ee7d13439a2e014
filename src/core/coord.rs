// Copyright 2017-2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use std::{convert::TryFrom, fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::Direction;

/// Number of rows on the grid.
pub const ROWS: usize = 8;

/// Number of columns on the grid.
pub const COLUMNS: usize = 8;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum CoordinateError {
    #[error("invalid coordinate {file}{rank}: valid values are from a1 to h8")]
    OutOfRange { file: char, rank: i32 },
    #[error("expected a file letter followed by a rank digit, got {0:?}")]
    WrongLength(String),
    #[error("invalid file: {0}")]
    InvalidFile(char),
    #[error("invalid rank: {0}")]
    InvalidRank(char),
}

/// A raw cell address on the grid. Row 0 is the topmost rank as stored (rank 8), column 0 is file `a`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GridPosition {
    row: u8,
    column: u8,
}

impl GridPosition {
    /// Creates a grid position. Callers are expected to stay inside the grid; use `checked` for untrusted values.
    pub fn new(row: usize, column: usize) -> GridPosition {
        assert!(
            row < ROWS && column < COLUMNS,
            "grid position ({}, {}) out of range",
            row,
            column
        );
        GridPosition {
            row: row as u8,
            column: column as u8,
        }
    }

    /// Creates a grid position if the given row and column lie on the grid.
    pub fn checked(row: i32, column: i32) -> Option<GridPosition> {
        if position_exists(row, column) {
            Some(GridPosition::new(row as usize, column as usize))
        } else {
            None
        }
    }

    pub const fn row(self) -> usize {
        self.row as usize
    }

    pub const fn column(self) -> usize {
        self.column as usize
    }

    /// Index of this position in row-major order, 0 through 63.
    pub const fn index(self) -> usize {
        self.row as usize * COLUMNS + self.column as usize
    }

    pub(crate) fn from_index(index: usize) -> GridPosition {
        GridPosition::new(index / COLUMNS, index % COLUMNS)
    }

    /// Returns the position displaced by the given deltas, or None if that falls off the grid.
    pub fn offset(self, rows: i32, columns: i32) -> Option<GridPosition> {
        GridPosition::checked(self.row as i32 + rows, self.column as i32 + columns)
    }

    /// Returns the closest position in the given direction, or None at the edge of the grid.
    pub fn towards(self, dir: Direction) -> Option<GridPosition> {
        let (rows, columns) = dir.as_offset();
        self.offset(rows as i32, columns as i32)
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Grid-bounds validation for raw row/column pairs.
pub fn position_exists(row: i32, column: i32) -> bool {
    row >= 0 && (row as usize) < ROWS && column >= 0 && (column as usize) < COLUMNS
}

/// A user-facing square name: a file letter `a`-`h` and a rank number 1-8.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChessCoordinate {
    file: char,
    rank: u8,
}

impl ChessCoordinate {
    pub fn new(file: char, rank: i32) -> Result<ChessCoordinate, CoordinateError> {
        if !('a'..='h').contains(&file) || !(1..=8).contains(&rank) {
            return Err(CoordinateError::OutOfRange { file, rank });
        }

        Ok(ChessCoordinate {
            file,
            rank: rank as u8,
        })
    }

    pub const fn file(self) -> char {
        self.file
    }

    pub const fn rank(self) -> u8 {
        self.rank
    }

    pub fn to_grid(self) -> GridPosition {
        GridPosition::new(ROWS - self.rank as usize, (self.file as u8 - b'a') as usize)
    }

    pub fn from_grid(position: GridPosition) -> ChessCoordinate {
        ChessCoordinate {
            file: (b'a' + position.column) as char,
            rank: (ROWS - position.row()) as u8,
        }
    }
}

impl fmt::Display for ChessCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.file, self.rank)
    }
}

impl FromStr for ChessCoordinate {
    type Err = CoordinateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let chars: Vec<char> = s.chars().collect();
        let (file, rank) = match chars.as_slice() {
            &[file, rank] => (file, rank),
            _ => return Err(CoordinateError::WrongLength(s.to_owned())),
        };

        if !('a'..='h').contains(&file) {
            return Err(CoordinateError::InvalidFile(file));
        }

        let rank = match rank.to_digit(10) {
            Some(digit) if (1..=8).contains(&digit) => digit as i32,
            _ => return Err(CoordinateError::InvalidRank(rank)),
        };

        ChessCoordinate::new(file, rank)
    }
}

impl TryFrom<String> for ChessCoordinate {
    type Error = CoordinateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ChessCoordinate> for String {
    fn from(coord: ChessCoordinate) -> String {
        coord.to_string()
    }
}
