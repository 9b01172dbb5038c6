use std::fmt;

use super::position::Position;

/// A string/fret pair that produces a given pitch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    /// 1-based string number, 1 = highest
    pub string: u8,
    /// 0 = open string
    pub fret: u8,
}

impl Location {
    pub fn new(string: u8, fret: u8) -> Self {
        Self { string, fret }
    }

    pub fn is_open(&self) -> bool {
        self.fret == 0
    }
}

/// A resolved location with left-hand finger and hand position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Fingering {
    pub location: Location,
    /// 0 = open string, 1 = index .. 4 = little finger.
    /// Fixed positions may report values above 4 for stretches.
    pub finger: u8,
    pub position: Position,
}

impl Fingering {
    pub fn string(&self) -> u8 {
        self.location.string
    }

    pub fn fret(&self) -> u8 {
        self.location.fret
    }

    /// Fret and string distances to a candidate location
    pub fn distance_to(&self, location: &Location) -> (u8, u8) {
        (
            self.location.fret.abs_diff(location.fret),
            self.location.string.abs_diff(location.string),
        )
    }
}

impl fmt::Display for Fingering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "string {} fret {} finger {} (Pos. {})",
            self.location.string, self.location.fret, self.finger, self.position
        )
    }
}
