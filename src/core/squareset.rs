// Copyright 2021 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use crate::core::{ChessCoordinate, GridPosition, COLUMNS, ROWS};
use std::fmt;
use std::ops;

/// A set of grid positions, used as the reachability matrix of a piece. The implementation mirrors
/// [`std::collections::HashSet`] but stores one bit per square in row-major order.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct SquareSet(u64);

impl SquareSet {
    /// Creates a new, empty SquareSet.
    pub const fn empty() -> SquareSet {
        SquareSet(0)
    }

    /// Tests whether or not the given position is contained within this SquareSet.
    pub const fn contains(&self, position: GridPosition) -> bool {
        self.0 & (1u64 << position.index()) != 0
    }

    pub fn insert(&mut self, position: GridPosition) {
        self.0 |= 1u64 << position.index();
    }

    pub const fn len(&self) -> u32 {
        self.0.count_ones()
    }

    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub const fn or(self, other: SquareSet) -> SquareSet {
        SquareSet(self.0 | other.0)
    }

    /// Expands this set into the boolean matrix form, indexed by grid row then column.
    pub fn to_matrix(self) -> [[bool; COLUMNS]; ROWS] {
        let mut matrix = [[false; COLUMNS]; ROWS];
        for position in self {
            matrix[position.row()][position.column()] = true;
        }

        matrix
    }

    /// The squares in this set as chess coordinates, in grid order.
    pub fn coordinates(self) -> Vec<ChessCoordinate> {
        self.into_iter().map(ChessCoordinate::from_grid).collect()
    }
}

impl ops::BitOr for SquareSet {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(rhs)
    }
}

impl ops::BitOrAssign for SquareSet {
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.or(rhs);
    }
}

impl IntoIterator for SquareSet {
    type Item = GridPosition;
    type IntoIter = SquareSetIterator;

    fn into_iter(self) -> Self::IntoIter {
        SquareSetIterator(self.0)
    }
}

impl FromIterator<GridPosition> for SquareSet {
    fn from_iter<I: IntoIterator<Item = GridPosition>>(iter: I) -> Self {
        let mut set = SquareSet::empty();
        for position in iter {
            set.insert(position);
        }

        set
    }
}

impl fmt::Display for SquareSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..ROWS {
            for column in 0..COLUMNS {
                if self.contains(GridPosition::new(row, column)) {
                    write!(f, " 1 ")?;
                } else {
                    write!(f, " . ")?;
                }
            }

            writeln!(f, "| {}", ROWS - row)?;
        }

        for _ in 0..COLUMNS {
            write!(f, "---")?;
        }

        writeln!(f)?;
        for file in ('a'..='h').take(COLUMNS) {
            write!(f, " {} ", file)?;
        }

        writeln!(f)?;
        Ok(())
    }
}

/// An iterator over positions stored in a [`SquareSet`], in row-major order.
pub struct SquareSetIterator(u64);

impl Iterator for SquareSetIterator {
    type Item = GridPosition;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0 == 0 {
            None
        } else {
            let next = self.0.trailing_zeros() as usize;
            self.0 &= self.0 - 1;
            Some(GridPosition::from_index(next))
        }
    }
}
