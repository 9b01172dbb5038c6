use std::fmt;

/// Classical guitar hand positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Position {
    I,
    II,
    III,
    IV,
    V,
}

impl Position {
    pub const ALL: [Position; 5] = [
        Position::I,
        Position::II,
        Position::III,
        Position::IV,
        Position::V,
    ];

    /// Position from its 1-based selector index (1 = I .. 5 = V)
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            1 => Some(Position::I),
            2 => Some(Position::II),
            3 => Some(Position::III),
            4 => Some(Position::IV),
            5 => Some(Position::V),
            _ => None,
        }
    }

    /// Position from its roman numeral, case-insensitive
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn index(self) -> u8 {
        match self {
            Position::I => 1,
            Position::II => 2,
            Position::III => 3,
            Position::IV => 4,
            Position::V => 5,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Position::I => "I",
            Position::II => "II",
            Position::III => "III",
            Position::IV => "IV",
            Position::V => "V",
        }
    }

    /// Inclusive fret range (min, max) covered by the hand
    pub fn fret_range(self) -> (u8, u8) {
        match self {
            Position::I => (0, 4),
            Position::II => (2, 5),
            Position::III => (5, 8),
            Position::IV => (7, 10),
            Position::V => (9, 12),
        }
    }

    /// Fret under the index finger
    pub fn base_fret(self) -> u8 {
        match self {
            Position::I => 1,
            Position::II => 2,
            Position::III => 5,
            Position::IV => 7,
            Position::V => 9,
        }
    }

    pub fn center(self) -> f64 {
        let (min, max) = self.fret_range();
        f64::from(min + max) / 2.0
    }

    pub fn contains(self, fret: u8) -> bool {
        let (min, max) = self.fret_range();
        (min..=max).contains(&fret)
    }

    /// Position band a fret falls into when no position is imposed
    pub fn for_fret(fret: u8) -> Self {
        match fret {
            0..=4 => Position::I,
            5..=6 => Position::II,
            7..=8 => Position::III,
            9..=10 => Position::IV,
            _ => Position::V,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Position band implied by a fret number
pub fn determine_position(fret: u8) -> Position {
    Position::for_fret(fret)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_round_trip() {
        for position in Position::ALL {
            assert_eq!(Position::from_index(position.index()), Some(position));
        }
        assert_eq!(Position::from_index(0), None);
        assert_eq!(Position::from_index(6), None);
    }

    #[test]
    fn test_from_name() {
        assert_eq!(Position::from_name("iii"), Some(Position::III));
        assert_eq!(Position::from_name(" IV "), Some(Position::IV));
        assert_eq!(Position::from_name("VI"), None);
    }

    #[test]
    fn test_position_table() {
        assert_eq!(Position::III.fret_range(), (5, 8));
        assert_eq!(Position::III.base_fret(), 5);
        assert_eq!(Position::III.center(), 6.5);
        assert_eq!(Position::I.center(), 2.0);
        assert!(Position::V.contains(12));
        assert!(!Position::V.contains(13));
    }

    #[test]
    fn test_determine_position_bands() {
        assert_eq!(determine_position(0), Position::I);
        assert_eq!(determine_position(4), Position::I);
        assert_eq!(determine_position(5), Position::II);
        assert_eq!(determine_position(6), Position::II);
        assert_eq!(determine_position(8), Position::III);
        assert_eq!(determine_position(10), Position::IV);
        assert_eq!(determine_position(11), Position::V);
        assert_eq!(determine_position(19), Position::V);
    }
}
