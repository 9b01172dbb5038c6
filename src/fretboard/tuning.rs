use super::fingering::Location;

/// Number of strings on the instrument
pub const STRING_COUNT: usize = 6;

/// Highest playable fret on any string
pub const MAX_FRET: i32 = 19;

/// Open-string pitches, string 1 (highest) first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tuning([u8; STRING_COUNT]);

impl Tuning {
    /// Standard classical guitar tuning, E4 B3 G3 D3 A2 E2
    pub const STANDARD: Tuning = Tuning([64, 59, 55, 50, 45, 40]);

    /// Standard tuning with the sixth string lowered to D2
    pub const DROP_D: Tuning = Tuning([64, 59, 55, 50, 45, 38]);

    pub fn new(open_strings: [u8; STRING_COUNT]) -> Self {
        Self(open_strings)
    }

    /// Look up a named preset ("standard", "drop-d")
    pub fn preset(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "standard" | "eadgbe" => Some(Self::STANDARD),
            "drop-d" | "dropd" | "drop_d" => Some(Self::DROP_D),
            _ => None,
        }
    }

    /// Open-string pitch of a 1-based string number
    pub fn open_pitch(&self, string: u8) -> Option<u8> {
        let index = usize::from(string).checked_sub(1)?;
        self.0.get(index).copied()
    }

    pub fn strings(&self) -> &[u8; STRING_COUNT] {
        &self.0
    }

    /// Every string/fret that sounds `pitch`, ordered by string number.
    /// Empty when the pitch lies outside the fret window on all strings.
    pub fn locate_fret(&self, pitch: u8) -> Vec<Location> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, &open)| {
                let fret = i32::from(pitch) - i32::from(open);
                (0..=MAX_FRET)
                    .contains(&fret)
                    .then(|| Location::new(i as u8 + 1, fret as u8))
            })
            .collect()
    }
}

impl Default for Tuning {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// Locate `pitch` on a standard-tuned guitar
pub fn locate_fret(pitch: u8) -> Vec<Location> {
    Tuning::STANDARD.locate_fret(pitch)
}
