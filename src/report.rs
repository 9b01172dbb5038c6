//! Plain-text fingering score.
//!
//! Notes are laid out four to a system, the way the staff renderer groups
//! them. A fixed-position render labels the first system with its position.

use std::fmt::Write;

use crate::fretboard::{Fingering, Mode, Position, Resolver};
use crate::types::note::pitch_name;

/// Notes drawn per system
pub const NOTES_PER_GROUP: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportEntry {
    pub pitch: u8,
    pub fingering: Option<Fingering>,
}

/// A resolved phrase ready for printing
#[derive(Debug, Clone)]
pub struct Report {
    mode: Mode,
    octave_shift: i8,
    entries: Vec<ReportEntry>,
}

impl Report {
    /// Resolve `pitches` and collect them for printing
    pub fn build(resolver: &Resolver, pitches: &[u8], mode: Mode, octave_shift: i8) -> Self {
        let entries = pitches
            .iter()
            .zip(resolver.resolve_sequence(pitches, mode))
            .map(|(&pitch, fingering)| ReportEntry { pitch, fingering })
            .collect();

        Self {
            mode,
            octave_shift,
            entries,
        }
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    /// Distinct positions in order of first use
    pub fn positions_used(&self) -> Vec<Position> {
        let mut used = Vec::new();
        for position in self.entries.iter().filter_map(|e| e.fingering.map(|f| f.position)) {
            if !used.contains(&position) {
                used.push(position);
            }
        }
        used
    }

    pub fn unplayable(&self) -> usize {
        self.entries.iter().filter(|e| e.fingering.is_none()).count()
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        for (group_index, group) in self.entries.chunks(NOTES_PER_GROUP).enumerate() {
            if group_index == 0 {
                if let Mode::Fixed(position) = self.mode {
                    let _ = writeln!(out, "Pos. {}", position);
                }
            } else {
                out.push('\n');
            }

            for (i, entry) in group.iter().enumerate() {
                let number = group_index * NOTES_PER_GROUP + i + 1;
                let name = pitch_name(entry.pitch, self.octave_shift);
                let _ = match entry.fingering {
                    Some(f) => writeln!(
                        out,
                        "{:>3}  {:<5} string {}  fret {:>2}  finger {}  Pos. {}",
                        number,
                        name,
                        f.string(),
                        f.fret(),
                        f.finger,
                        f.position
                    ),
                    None => writeln!(out, "{:>3}  {:<5} -", number, name),
                };
            }
        }

        let used: Vec<&str> = self.positions_used().iter().map(|p| p.name()).collect();
        let _ = writeln!(out, "\nMode: {}", self.mode);
        let _ = write!(out, "Positions used: ");
        if used.is_empty() {
            out.push_str("none");
        } else {
            out.push_str(&used.join(", "));
        }
        out.push('\n');

        let unplayable = self.unplayable();
        if unplayable > 0 {
            let _ = writeln!(out, "Unplayable notes: {}", unplayable);
        }

        out
    }
}
