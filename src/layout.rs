// Copyright 2017-2022 Sean Gillespie.
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

//! Opening layouts. A layout says which side moves first and where every piece starts; the standard 32-piece
//! setup is only one of them. Layouts can be built in code or loaded from JSON:
//!
//! ```json
//! { "first_player": "Light",
//!   "placements": [ { "square": "e1", "color": "Light", "kind": "King" } ] }
//! ```

use std::{collections::HashSet, fs, io, path::Path};

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::{ChessCoordinate, Color, PieceKind};

#[derive(Debug, Error)]
pub enum LayoutError {
    #[error("two pieces placed on {0}")]
    Occupied(ChessCoordinate),
    #[error("invalid layout: {0}")]
    Json(#[from] serde_json::Error),
    #[error("failed to read layout: {0}")]
    Io(#[from] io::Error),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub square: ChessCoordinate,
    pub color: Color,
    pub kind: PieceKind,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default = "default_first_player")]
    pub first_player: Color,
    pub placements: Vec<Placement>,
}

fn default_first_player() -> Color {
    Color::Light
}

const BACK_RANK: [PieceKind; 8] = [
    PieceKind::Rook,
    PieceKind::Knight,
    PieceKind::Bishop,
    PieceKind::Queen,
    PieceKind::King,
    PieceKind::Bishop,
    PieceKind::Knight,
    PieceKind::Rook,
];

lazy_static! {
    static ref STANDARD: Layout = {
        let mut layout = Layout::empty(Color::Light);
        for (color, back, front) in [(Color::Light, 1, 2), (Color::Dark, 8, 7)] {
            for (file, &kind) in ('a'..='h').zip(BACK_RANK.iter()) {
                layout.push(file, back, color, kind);
            }
            for file in 'a'..='h' {
                layout.push(file, front, color, PieceKind::Pawn);
            }
        }
        layout
    };
}

impl Layout {
    /// A layout with no pieces.
    pub fn empty(first_player: Color) -> Layout {
        Layout {
            first_player,
            placements: Vec::new(),
        }
    }

    /// The standard opening position, Light to move.
    pub fn standard() -> Layout {
        STANDARD.clone()
    }

    /// Kings and rooks on their standard squares, nothing else. Useful for exercising castling.
    pub fn rooks_and_kings() -> Layout {
        let mut layout = Layout::empty(Color::Light);
        for (color, rank) in [(Color::Light, 1), (Color::Dark, 8)] {
            layout.push('a', rank, color, PieceKind::Rook);
            layout.push('e', rank, color, PieceKind::King);
            layout.push('h', rank, color, PieceKind::Rook);
        }
        layout
    }

    // Only used with the constant squares of the built-in layouts.
    fn push(&mut self, file: char, rank: i32, color: Color, kind: PieceKind) {
        let square = ChessCoordinate::new(file, rank).expect("built-in layout square out of range");
        self.placements.push(Placement {
            square,
            color,
            kind,
        });
    }

    /// Adds a piece to this layout.
    pub fn place(mut self, square: ChessCoordinate, color: Color, kind: PieceKind) -> Layout {
        self.placements.push(Placement {
            square,
            color,
            kind,
        });
        self
    }

    pub fn from_json(json: &str) -> Result<Layout, LayoutError> {
        let layout: Layout = serde_json::from_str(json)?;
        layout.validate()?;
        Ok(layout)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Layout, LayoutError> {
        let json = fs::read_to_string(path)?;
        Layout::from_json(&json)
    }

    pub fn to_json(&self) -> Result<String, LayoutError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks that no square holds more than one piece. Coordinates are already range-checked on construction.
    pub fn validate(&self) -> Result<(), LayoutError> {
        let mut seen = HashSet::new();
        for placement in &self.placements {
            if !seen.insert(placement.square) {
                return Err(LayoutError::Occupied(placement.square));
            }
        }

        Ok(())
    }
}

impl Default for Layout {
    fn default() -> Self {
        Layout::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sq(s: &str) -> ChessCoordinate {
        s.parse().unwrap()
    }

    fn kind_at(layout: &Layout, square: &str) -> Option<(Color, PieceKind)> {
        layout
            .placements
            .iter()
            .find(|p| p.square == sq(square))
            .map(|p| (p.color, p.kind))
    }

    #[test]
    fn standard_has_32_pieces() {
        let layout = Layout::standard();
        assert_eq!(32, layout.placements.len());
        assert_eq!(Color::Light, layout.first_player);
        assert!(layout.validate().is_ok());
        assert_eq!(Some((Color::Light, PieceKind::Rook)), kind_at(&layout, "a1"));
        assert_eq!(Some((Color::Light, PieceKind::King)), kind_at(&layout, "e1"));
        assert_eq!(Some((Color::Dark, PieceKind::Queen)), kind_at(&layout, "d8"));
        assert_eq!(Some((Color::Dark, PieceKind::Pawn)), kind_at(&layout, "h7"));
        assert_eq!(None, kind_at(&layout, "e4"));
    }

    #[test]
    fn rooks_and_kings() {
        let layout = Layout::rooks_and_kings();
        assert_eq!(6, layout.placements.len());
        assert_eq!(Some((Color::Dark, PieceKind::Rook)), kind_at(&layout, "h8"));
    }

    #[test]
    fn json_round_trip() {
        let layout = Layout::rooks_and_kings();
        let json = layout.to_json().unwrap();
        assert_eq!(layout, Layout::from_json(&json).unwrap());
    }

    #[test]
    fn json_defaults_first_player() {
        let layout = Layout::from_json(
            r#"{ "placements": [ { "square": "e1", "color": "Light", "kind": "King" } ] }"#,
        )
        .unwrap();
        assert_eq!(Color::Light, layout.first_player);
        assert_eq!(Some((Color::Light, PieceKind::King)), kind_at(&layout, "e1"));
    }

    #[test]
    fn json_rejects_bad_square() {
        let err = Layout::from_json(
            r#"{ "placements": [ { "square": "e9", "color": "Light", "kind": "King" } ] }"#,
        )
        .unwrap_err();
        assert!(matches!(err, LayoutError::Json(_)));
    }

    #[test]
    fn rejects_double_placement() {
        let layout = Layout::empty(Color::Dark)
            .place(sq("e1"), Color::Light, PieceKind::King)
            .place(sq("e1"), Color::Dark, PieceKind::Rook);
        assert!(matches!(layout.validate(), Err(LayoutError::Occupied(s)) if s == sq("e1")));
    }

    #[test]
    fn loads_from_path() {
        let path = std::env::temp_dir().join(format!("chessmate-layout-{}.json", std::process::id()));
        let layout = Layout::rooks_and_kings().place(sq("d4"), Color::Dark, PieceKind::Queen);
        fs::write(&path, layout.to_json().unwrap()).unwrap();

        let loaded = Layout::from_path(&path);
        fs::remove_file(&path).unwrap();
        assert_eq!(layout, loaded.unwrap());
    }

    #[test]
    fn missing_file_is_io_error() {
        let path = std::env::temp_dir().join("chessmate-no-such-layout.json");
        let err = Layout::from_path(&path).unwrap_err();
        assert!(matches!(err, LayoutError::Io(ref e) if e.kind() == io::ErrorKind::NotFound));
    }
}
