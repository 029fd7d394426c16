//! Composite grouping keys.
//!
//! Keys are value-equality structs so that grouping never depends on string
//! concatenation (`"A|B" + "C"` and `"A" + "B|C"` must stay distinct).

use serde::{Deserialize, Serialize};
use std::fmt;

/// Key for the game-level rollup: one row per (genre, year, game).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GameYearKey {
    pub genre: String,
    pub year: i32,
    pub game: String,
}

impl GameYearKey {
    pub fn new(genre: impl Into<String>, year: i32, game: impl Into<String>) -> Self {
        Self {
            genre: genre.into(),
            year,
            game: game.into(),
        }
    }

    /// The coarser genre-year key this game-year rolls up into.
    pub fn genre_year(&self) -> GenreYearKey {
        GenreYearKey::new(self.genre.clone(), self.year)
    }
}

impl fmt::Display for GameYearKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.genre, self.year, self.game)
    }
}

/// Key for the genre-level rollup: one row per (genre, year).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GenreYearKey {
    pub genre: String,
    pub year: i32,
}

impl GenreYearKey {
    pub fn new(genre: impl Into<String>, year: i32) -> Self {
        Self {
            genre: genre.into(),
            year,
        }
    }
}

impl fmt::Display for GenreYearKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.genre, self.year)
    }
}
