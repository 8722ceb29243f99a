//! Built-in opening signature table.
//!
//! The first three entries reproduce the classic lookup table; the rest
//! extend it. Entries sharing a prefix are listed specific-first, except where
//! the classic entries already shadow them.

use crate::database::OpeningDatabase;
use crate::opening::Opening;

/// Creates the built-in signature table.
#[must_use]
pub fn builtin_database() -> OpeningDatabase {
    OpeningDatabase::with_openings(vec![
        Opening::new("Sicilian Defense", "e4 c5").with_eco("B20"),
        Opening::new("Ruy Lopez", "e4 e5 Nf3 Nc6 Bb5").with_eco("C60"),
        Opening::new("Queen's Gambit", "d4 d5 c4").with_eco("D06"),
        // 1.e4 e5
        Opening::new("Italian Game", "e4 e5 Nf3 Nc6 Bc4").with_eco("C50"),
        Opening::new("Scotch Game", "e4 e5 Nf3 Nc6 d4").with_eco("C44"),
        Opening::new("Petrov's Defense", "e4 e5 Nf3 Nf6").with_eco("C42"),
        Opening::new("Philidor Defense", "e4 e5 Nf3 d6").with_eco("C41"),
        Opening::new("King's Gambit", "e4 e5 f4").with_eco("C30"),
        Opening::new("Vienna Game", "e4 e5 Nc3").with_eco("C25"),
        Opening::new("Bishop's Opening", "e4 e5 Bc4").with_eco("C23"),
        Opening::new("King's Pawn Game", "e4 e5").with_eco("C20"),
        // 1.e4 other
        Opening::new("French Defense", "e4 e6").with_eco("C00"),
        Opening::new("Caro-Kann Defense", "e4 c6").with_eco("B10"),
        Opening::new("Scandinavian Defense", "e4 d5").with_eco("B01"),
        Opening::new("Alekhine's Defense", "e4 Nf6").with_eco("B02"),
        Opening::new("Pirc Defense", "e4 d6").with_eco("B07"),
        Opening::new("Modern Defense", "e4 g6").with_eco("B06"),
        // 1.d4
        Opening::new("Nimzo-Indian Defense", "d4 Nf6 c4 e6 Nc3 Bb4").with_eco("E20"),
        Opening::new("Queen's Indian Defense", "d4 Nf6 c4 e6 Nf3 b6").with_eco("E12"),
        Opening::new("King's Indian Defense", "d4 Nf6 c4 g6").with_eco("E60"),
        Opening::new("London System", "d4 d5 Bf4")
            .with_eco("D02")
            .with_signature("d4 Nf6 Bf4"),
        Opening::new("Dutch Defense", "d4 f5").with_eco("A80"),
        Opening::new("Queen's Pawn Game", "d4").with_eco("A40"),
        // Flank openings
        Opening::new("English Opening", "c4").with_eco("A10"),
        Opening::new("Reti Opening", "Nf3").with_eco("A04"),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UNKNOWN_OPENING;

    fn classify(moves: &str) -> String {
        let moves: Vec<&str> = moves.split_whitespace().collect();
        builtin_database().classify(&moves, 10).to_string()
    }

    #[test]
    fn test_classic_entries() {
        assert_eq!(classify("e4 c5 Nf3 d6 d4 cxd4"), "Sicilian Defense");
        assert_eq!(classify("e4 e5 Nf3 Nc6 Bb5 a6 Ba4 Nf6 O-O Be7"), "Ruy Lopez");
        assert_eq!(classify("d4 d5 c4 e6 Nc3 Nf6"), "Queen's Gambit");
    }

    #[test]
    fn test_classic_entries_shadow_later_ones() {
        // Slav lines still start with d4 d5 c4.
        assert_eq!(classify("d4 d5 c4 c6"), "Queen's Gambit");
    }

    #[test]
    fn test_extended_entries() {
        assert_eq!(classify("e4 e5 Nf3 Nc6 Bc4 Bc5"), "Italian Game");
        assert_eq!(classify("e4 e5 Nf3 Nc6 Nc3"), "King's Pawn Game");
        assert_eq!(classify("d4 Nf6 c4 e6 Nc3 Bb4"), "Nimzo-Indian Defense");
        assert_eq!(classify("d4 Nf6 Bf4"), "London System");
        assert_eq!(classify("d4 Nf6 c4 c5"), "Queen's Pawn Game");
        assert_eq!(classify("Nf3 d5 g3"), "Reti Opening");
    }

    #[test]
    fn test_unknown() {
        assert_eq!(classify("b3 e5 Bb2"), UNKNOWN_OPENING);
        assert_eq!(classify(""), UNKNOWN_OPENING);
    }

    #[test]
    fn test_table_is_valid_json_table() {
        let db = builtin_database();
        let reloaded = OpeningDatabase::from_json(&db.to_json().unwrap()).unwrap();
        assert_eq!(reloaded.len(), db.len());
    }
}
