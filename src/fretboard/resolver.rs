use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use super::fingering::{Fingering, Location};
use super::position::{Position, determine_position};
use super::tuning::Tuning;

/// How the hand position is chosen for each note
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Pick the most comfortable location per note
    #[default]
    Automatic,
    /// Keep the hand in one position where possible
    Fixed(Position),
}

impl Mode {
    /// Mode from a numeric selector: 1-5 pick a position, anything else is automatic
    pub fn from_selector(selector: u8) -> Self {
        Position::from_index(selector).map_or(Mode::Automatic, Mode::Fixed)
    }

    pub fn selector(self) -> u8 {
        match self {
            Mode::Automatic => 0,
            Mode::Fixed(position) => position.index(),
        }
    }

    pub fn position(self) -> Option<Position> {
        match self {
            Mode::Automatic => None,
            Mode::Fixed(position) => Some(position),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Automatic => f.write_str("Auto"),
            Mode::Fixed(position) => write!(f, "Pos. {}", position),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid position `{0}` (expected auto, 0-5 or I-V)")]
pub struct ParseModeError(pub String);

impl FromStr for Mode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("auto") || trimmed.eq_ignore_ascii_case("automatic") {
            return Ok(Mode::Automatic);
        }
        if let Ok(selector) = trimmed.parse::<u8>() {
            return match selector {
                0 => Ok(Mode::Automatic),
                _ => Position::from_index(selector)
                    .map(Mode::Fixed)
                    .ok_or_else(|| ParseModeError(s.to_string())),
            };
        }
        Position::from_name(trimmed)
            .map(Mode::Fixed)
            .ok_or_else(|| ParseModeError(s.to_string()))
    }
}

/// Pick the best fingering among `locations` for the given mode.
/// `previous` is the last resolved note and biases towards small hand moves.
pub fn resolve(
    locations: &[Location],
    mode: Mode,
    previous: Option<&Fingering>,
) -> Option<Fingering> {
    if locations.is_empty() {
        return None;
    }

    match mode {
        Mode::Automatic => resolve_automatic(locations, previous),
        Mode::Fixed(position) => resolve_fixed(locations, position, previous),
    }
}

fn resolve_fixed(
    locations: &[Location],
    position: Position,
    previous: Option<&Fingering>,
) -> Option<Fingering> {
    let base = position.base_fret();

    let candidates: Vec<Location> = locations
        .iter()
        .copied()
        .filter(|loc| {
            if loc.is_open() {
                position == Position::I
            } else {
                position.contains(loc.fret)
            }
        })
        .collect();

    let chosen = if candidates.is_empty() {
        // Nothing fits the position: take the location closest to the index finger
        first_min_by_key(locations, |loc| f64::from(loc.fret.abs_diff(base)))?
    } else {
        first_min_by_key(&candidates, |loc| fixed_score(loc, position, previous))?
    };

    Some(Fingering {
        location: chosen,
        finger: fixed_finger(chosen.fret, base),
        position,
    })
}

fn fixed_finger(fret: u8, base: u8) -> u8 {
    if fret == 0 {
        0
    } else {
        (i32::from(fret) - i32::from(base) + 1).max(1) as u8
    }
}

fn fixed_score(loc: &Location, position: Position, previous: Option<&Fingering>) -> f64 {
    let mut score = 0.0;

    if fixed_finger(loc.fret, position.base_fret()) > 4 {
        score += 10.0;
    }

    // Middle strings carry melodies best
    if loc.string == 3 || loc.string == 4 {
        score -= 2.0;
    }

    if let Some(prev) = previous {
        let (fret_distance, string_distance) = prev.distance_to(loc);
        score += f64::from(fret_distance) * 0.5;
        score += f64::from(string_distance) * 1.5;
        if fret_distance <= 4 {
            score -= 3.0;
        }
    }

    score + (f64::from(loc.fret) - position.center()).abs() * 0.3
}

fn resolve_automatic(locations: &[Location], previous: Option<&Fingering>) -> Option<Fingering> {
    let chosen = first_min_by_key(locations, |loc| automatic_score(loc, previous))?;

    Some(Fingering {
        location: chosen,
        finger: automatic_finger(chosen.fret),
        position: determine_position(chosen.fret),
    })
}

// Cycles 1-4 by fret number; it is not anchored to a hand position.
fn automatic_finger(fret: u8) -> u8 {
    if fret == 0 { 0 } else { (fret % 4 + 1).clamp(1, 4) }
}

fn automatic_score(loc: &Location, previous: Option<&Fingering>) -> f64 {
    let mut score = match loc.fret {
        0..=5 => -2.0,
        6..=9 => 1.0,
        _ => 3.0,
    };

    if (2..=5).contains(&loc.string) {
        score -= 1.0;
    }

    if loc.fret > 12 {
        score += 5.0;
    }

    if let Some(prev) = previous {
        let (fret_distance, string_distance) = prev.distance_to(loc);
        score += f64::from(fret_distance + string_distance) * 0.5;
    }

    score
}

/// Minimum by score; on ties the earliest location wins
fn first_min_by_key<F>(locations: &[Location], mut score: F) -> Option<Location>
where
    F: FnMut(&Location) -> f64,
{
    let mut best: Option<(Location, f64)> = None;
    for loc in locations {
        let s = score(loc);
        match best {
            Some((_, best_score)) if s >= best_score => {}
            _ => best = Some((*loc, s)),
        }
    }
    best.map(|(loc, _)| loc)
}

/// Stateless resolver bound to a tuning
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Resolver {
    tuning: Tuning,
}

impl Resolver {
    pub fn new(tuning: Tuning) -> Self {
        Self { tuning }
    }

    pub fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    pub fn locate(&self, pitch: u8) -> Vec<Location> {
        self.tuning.locate_fret(pitch)
    }

    /// Resolve a single pitch with optional context
    pub fn resolve_pitch(
        &self,
        pitch: u8,
        mode: Mode,
        previous: Option<&Fingering>,
    ) -> Option<Fingering> {
        resolve(&self.locate(pitch), mode, previous)
    }

    /// Lazily resolve a phrase, threading the last playable note as context
    pub fn fingerings<I>(&self, pitches: I, mode: Mode) -> Fingerings<'_, I::IntoIter>
    where
        I: IntoIterator<Item = u8>,
    {
        Fingerings {
            resolver: self,
            pitches: pitches.into_iter(),
            mode,
            previous: None,
        }
    }

    /// One slot per pitch; `None` where the pitch cannot be played
    pub fn resolve_sequence(&self, pitches: &[u8], mode: Mode) -> Vec<Option<Fingering>> {
        self.fingerings(pitches.iter().copied(), mode).collect()
    }
}

/// Iterator returned by [`Resolver::fingerings`]
pub struct Fingerings<'a, I> {
    resolver: &'a Resolver,
    pitches: I,
    mode: Mode,
    previous: Option<Fingering>,
}

impl<I> Iterator for Fingerings<'_, I>
where
    I: Iterator<Item = u8>,
{
    type Item = Option<Fingering>;

    fn next(&mut self) -> Option<Self::Item> {
        let pitch = self.pitches.next()?;
        let fingering = self
            .resolver
            .resolve_pitch(pitch, self.mode, self.previous.as_ref());

        match fingering {
            Some(f) => {
                log::debug!("pitch {}: {}", pitch, f);
                self.previous = Some(f);
            }
            None => log::warn!("pitch {} is not playable on this tuning", pitch),
        }

        Some(fingering)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.pitches.size_hint()
    }
}

/// Resolve a phrase on a standard-tuned guitar
pub fn resolve_sequence(pitches: &[u8], mode: Mode) -> Vec<Option<Fingering>> {
    Resolver::default().resolve_sequence(pitches, mode)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fretboard::tuning::locate_fret;

    fn fingering(string: u8, fret: u8, finger: u8, position: Position) -> Fingering {
        Fingering {
            location: Location::new(string, fret),
            finger,
            position,
        }
    }

    #[test]
    fn test_empty_locations_resolve_to_none() {
        assert_eq!(resolve(&[], Mode::Automatic, None), None);
        for position in Position::ALL {
            assert_eq!(resolve(&[], Mode::Fixed(position), None), None);
        }
    }

    #[test]
    fn test_automatic_high_e_prefers_second_string() {
        // s1f0 scores -2, s2f5 scores -3 (low fret plus inner string)
        let result = resolve(&locate_fret(64), Mode::Automatic, None);
        assert_eq!(result, Some(fingering(2, 5, 2, Position::II)));
    }

    #[test]
    fn test_automatic_previous_note_pulls_towards_it() {
        let prev = fingering(1, 0, 0, Position::I);
        let result = resolve(&locate_fret(64), Mode::Automatic, Some(&prev));
        assert_eq!(result, Some(fingering(1, 0, 0, Position::I)));
    }

    #[test]
    fn test_automatic_finger_cycles() {
        assert_eq!(automatic_finger(0), 0);
        assert_eq!(automatic_finger(3), 4);
        assert_eq!(automatic_finger(4), 1);
        assert_eq!(automatic_finger(5), 2);
        assert_eq!(automatic_finger(7), 4);
        assert_eq!(automatic_finger(19), 4);
    }

    #[test]
    fn test_fixed_position_three_on_low_d() {
        // Open D is not allowed outside position I, A string fret 5 is
        let result = resolve(&locate_fret(50), Mode::Fixed(Position::III), None);
        assert_eq!(result, Some(fingering(5, 5, 1, Position::III)));
    }

    #[test]
    fn test_fixed_position_rejects_open_outside_first() {
        let result = resolve(&locate_fret(55), Mode::Fixed(Position::III), None);
        assert_eq!(result, Some(fingering(4, 5, 1, Position::III)));
    }

    #[test]
    fn test_fixed_position_one_prefers_middle_string() {
        // s2f0 scores 0.6, s3f4 scores -2 + 0.6
        let result = resolve(&locate_fret(59), Mode::Fixed(Position::I), None);
        assert_eq!(result, Some(fingering(3, 4, 4, Position::I)));
    }

    #[test]
    fn test_fixed_position_one_context_keeps_open_string() {
        let prev = fingering(2, 1, 1, Position::I);
        let result = resolve(&locate_fret(59), Mode::Fixed(Position::I), Some(&prev));
        assert_eq!(result, Some(fingering(2, 0, 0, Position::I)));
    }

    #[test]
    fn test_fixed_fallback_closest_to_base() {
        // Low E only exists as an open string, which position III forbids
        let result = resolve(&locate_fret(40), Mode::Fixed(Position::III), None);
        assert_eq!(result, Some(fingering(6, 0, 0, Position::III)));

        let result = resolve(&locate_fret(45), Mode::Fixed(Position::V), None);
        assert_eq!(result, Some(fingering(6, 5, 1, Position::V)));
    }

    #[test]
    fn test_fixed_fallback_stretch_finger_is_not_clamped() {
        let result = resolve(&locate_fret(83), Mode::Fixed(Position::I), None);
        assert_eq!(result, Some(fingering(1, 19, 19, Position::I)));
    }

    #[test]
    fn test_fixed_fallback_tie_takes_first_string() {
        let tuning = Tuning::new([68, 60, 55, 50, 45, 40]);
        // s1f5 and s2f13 are both four frets from base 9
        let result = resolve(&tuning.locate_fret(73), Mode::Fixed(Position::V), None);
        assert_eq!(result, Some(fingering(1, 5, 1, Position::V)));
    }

    #[test]
    fn test_score_tie_takes_first_location() {
        let locations = [Location::new(3, 2), Location::new(4, 2)];
        let result = resolve(&locations, Mode::Automatic, None);
        assert_eq!(result.map(|f| f.string()), Some(3));
    }

    #[test]
    fn test_resolve_is_pure() {
        let prev = fingering(3, 4, 4, Position::I);
        let locations = locate_fret(62);
        for mode in [Mode::Automatic, Mode::Fixed(Position::II), Mode::Fixed(Position::IV)] {
            let a = resolve(&locations, mode, Some(&prev));
            let b = resolve(&locations, mode, Some(&prev));
            assert_eq!(a, b);
        }
    }

    #[test]
    fn test_sequence_skips_context_for_unplayable() {
        let resolver = Resolver::default();
        let result = resolver.resolve_sequence(&[64, 30, 64], Mode::Automatic);
        assert_eq!(result.len(), 3);
        assert_eq!(result[0], Some(fingering(2, 5, 2, Position::II)));
        assert_eq!(result[1], None);
        let expected = resolver.resolve_pitch(64, Mode::Automatic, result[0].as_ref());
        assert_eq!(result[2], expected);
    }

    #[test]
    fn test_fingerings_iterator_is_lazy_and_sized() {
        let resolver = Resolver::default();
        let mut iter = resolver.fingerings(vec![50, 52, 53], Mode::Fixed(Position::III));
        assert_eq!(iter.size_hint(), (3, Some(3)));
        assert!(iter.next().is_some());
        assert_eq!(iter.size_hint(), (2, Some(2)));
    }

    #[test]
    fn test_mode_from_selector() {
        assert_eq!(Mode::from_selector(0), Mode::Automatic);
        assert_eq!(Mode::from_selector(3), Mode::Fixed(Position::III));
        assert_eq!(Mode::from_selector(9), Mode::Automatic);
        assert_eq!(Mode::Fixed(Position::IV).selector(), 4);
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("auto".parse(), Ok(Mode::Automatic));
        assert_eq!("0".parse(), Ok(Mode::Automatic));
        assert_eq!("2".parse(), Ok(Mode::Fixed(Position::II)));
        assert_eq!("iv".parse(), Ok(Mode::Fixed(Position::IV)));
        assert!("7".parse::<Mode>().is_err());
        assert!("up high".parse::<Mode>().is_err());
    }

    #[test]
    fn test_mode_display() {
        assert_eq!(Mode::Automatic.to_string(), "Auto");
        assert_eq!(Mode::Fixed(Position::III).to_string(), "Pos. III");
    }
}
