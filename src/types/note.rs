use thiserror::Error;

/// Pitch-class names, sharps only
const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NoteNameError {
    #[error("empty note name")]
    Empty,
    #[error("invalid note letter `{0}`")]
    InvalidLetter(char),
    #[error("invalid character `{0}` in note name")]
    InvalidCharacter(char),
    #[error("invalid octave `{0}`")]
    InvalidOctave(String),
    #[error("note {0} is outside the MIDI range 0-127")]
    OutOfRange(i32),
}

/// Name a MIDI pitch, e.g. 61 -> "C#4".
/// `octave_shift` moves the printed octave only, the pitch class is unchanged.
pub fn pitch_name(pitch: u8, octave_shift: i8) -> String {
    let name = NOTE_NAMES[usize::from(pitch % 12)];
    let octave = i32::from(pitch / 12) - 1 + i32::from(octave_shift);
    format!("{}{}", name, octave)
}

/// Parse a note name to its MIDI number.
/// Examples: "c1" -> 24, "d1" -> 26, "gb1" -> 30, "E4" -> 64
pub fn parse_note_name(name: &str) -> Result<u8, NoteNameError> {
    let note_str = name.trim().to_lowercase();

    let mut chars = note_str.chars();
    let note_char = chars.next().ok_or(NoteNameError::Empty)?;

    let base_note = match note_char {
        'c' => 0,
        'd' => 2,
        'e' => 4,
        'f' => 5,
        'g' => 7,
        'a' => 9,
        'b' => 11,
        other => return Err(NoteNameError::InvalidLetter(other)),
    };

    let mut offset = 0;
    let mut octave_str = String::new();
    for ch in chars {
        match ch {
            '#' | 's' if octave_str.is_empty() => offset = 1,
            'b' | 'f' if octave_str.is_empty() => offset = -1,
            '0'..='9' | '-' => octave_str.push(ch),
            other => return Err(NoteNameError::InvalidCharacter(other)),
        }
    }

    let octave: i32 = octave_str
        .parse()
        .map_err(|_| NoteNameError::InvalidOctave(octave_str.clone()))?;

    // C-1 = 0, C0 = 12, C1 = 24
    let midi_note = (octave + 1) * 12 + base_note + offset;
    u8::try_from(midi_note)
        .ok()
        .filter(|n| *n <= 127)
        .ok_or(NoteNameError::OutOfRange(midi_note))
}

/// Parse a pitch given either as a MIDI number ("64") or a note name ("e4")
pub fn parse_pitch(token: &str) -> Result<u8, NoteNameError> {
    let token = token.trim();
    match token.parse::<i32>() {
        Ok(n) => u8::try_from(n)
            .ok()
            .filter(|n| *n <= 127)
            .ok_or(NoteNameError::OutOfRange(n)),
        Err(_) => parse_note_name(token),
    }
}

/// Convert MIDI note number to frequency in Hz
/// Uses equal temperament: f = 440 * 2^((n-69)/12)
pub fn midi_note_to_frequency(note: u8) -> f32 {
    const A4: f32 = 440.0;
    const A4_MIDI: i32 = 69;

    let semitones = note as i32 - A4_MIDI;
    A4 * 2.0_f32.powf(semitones as f32 / 12.0)
}
