use std::fs;
use std::path::Path;

use midly::{MidiMessage, Smf, TrackEventKind};
use thiserror::Error;

/// Errors when reading a phrase from a Standard MIDI File
#[derive(Debug, Error)]
pub enum MidiFileError {
    #[error("failed to read MIDI file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse MIDI file: {0}")]
    Parse(#[from] midly::Error),
}

#[derive(Debug, Clone, Copy)]
struct NoteStart {
    tick: u64,
    track: usize,
    order: usize,
    key: u8,
}

/// Read the melody of a MIDI file as pitches in onset order.
/// Only note-ons with non-zero velocity count; `channel` (0-15) restricts
/// to a single channel and at most `max_notes` pitches are returned.
pub fn load_pitches(
    path: impl AsRef<Path>,
    channel: Option<u8>,
    max_notes: usize,
) -> Result<Vec<u8>, MidiFileError> {
    let bytes = fs::read(path.as_ref())?;
    pitches_from_bytes(&bytes, channel, max_notes)
}

/// Same as [`load_pitches`] for an in-memory file
pub fn pitches_from_bytes(
    bytes: &[u8],
    channel: Option<u8>,
    max_notes: usize,
) -> Result<Vec<u8>, MidiFileError> {
    let smf = Smf::parse(bytes)?;

    let mut starts = Vec::new();
    for (track, events) in smf.tracks.iter().enumerate() {
        let mut tick = 0u64;
        for (order, event) in events.iter().enumerate() {
            tick += u64::from(event.delta.as_int());

            let TrackEventKind::Midi {
                channel: event_channel,
                message: MidiMessage::NoteOn { key, vel },
            } = event.kind
            else {
                continue;
            };

            if vel.as_int() == 0 {
                continue;
            }
            if channel.is_some_and(|ch| ch != event_channel.as_int()) {
                continue;
            }

            starts.push(NoteStart {
                tick,
                track,
                order,
                key: key.as_int(),
            });
        }
    }

    starts.sort_by_key(|n| (n.tick, n.track, n.order));

    log::info!(
        "MIDI file: {} tracks, {} note onsets",
        smf.tracks.len(),
        starts.len()
    );

    Ok(starts.into_iter().take(max_notes).map(|n| n.key).collect())
}
