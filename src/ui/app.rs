use crate::fretboard::{Fingering, Mode, Resolver};
use crate::types::events::PhraseEvent;

/// Number of recent notes kept on screen
pub const HISTORY: usize = 16;

/// UI application state
/// Holds the live phrase and display settings; the resolver itself stays stateless
pub struct App {
    pub resolver: Resolver,
    /// Current hand-position mode
    pub mode: Mode,
    /// Octave shift applied to displayed note names
    pub octave_shift: i8,
    /// Recent pitches, oldest first
    pub phrase: Vec<u8>,
    /// One resolved slot per entry of `phrase`
    pub fingerings: Vec<Option<Fingering>>,
    /// Connected MIDI input
    pub device_name: String,
    /// Whether to quit the application
    pub should_quit: bool,
    /// Whether to show help screen
    pub show_help: bool,
}

impl App {
    pub fn new(resolver: Resolver, mode: Mode, octave_shift: i8, device_name: String) -> Self {
        Self {
            resolver,
            mode,
            octave_shift,
            phrase: Vec::with_capacity(HISTORY),
            fingerings: Vec::with_capacity(HISTORY),
            device_name,
            should_quit: false,
            show_help: false,
        }
    }

    /// Apply an event from the MIDI thread
    pub fn handle_phrase_event(&mut self, event: PhraseEvent) {
        log::debug!("MIDI event on channel {}: {:?}", event.channel() + 1, event);
        match event {
            PhraseEvent::NoteOn { note, .. } => self.push_note(note),
            PhraseEvent::Clear { .. } => self.clear(),
        }
    }

    /// Append a note, resolving it against the last playable note
    pub fn push_note(&mut self, pitch: u8) {
        if self.phrase.len() == HISTORY {
            self.phrase.remove(0);
            self.fingerings.remove(0);
        }

        let previous = self.fingerings.iter().rev().flatten().next().copied();
        let fingering = self
            .resolver
            .resolve_pitch(pitch, self.mode, previous.as_ref());

        self.phrase.push(pitch);
        self.fingerings.push(fingering);
    }

    /// Switch mode and re-resolve the visible phrase
    pub fn set_mode(&mut self, mode: Mode) {
        self.mode = mode;
        self.fingerings = self.resolver.resolve_sequence(&self.phrase, mode);
    }

    pub fn shift_octave(&mut self, delta: i8) {
        self.octave_shift = (self.octave_shift + delta).clamp(-3, 3);
    }

    pub fn clear(&mut self) {
        self.phrase.clear();
        self.fingerings.clear();
    }

    /// Most recent note and its fingering
    pub fn latest(&self) -> Option<(u8, Option<Fingering>)> {
        let pitch = *self.phrase.last()?;
        Some((pitch, self.fingerings.last().copied().flatten()))
    }

    /// Mark app for quit
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Toggle help screen visibility
    pub fn toggle_help(&mut self) {
        self.show_help = !self.show_help;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fretboard::Position;

    fn app(mode: Mode) -> App {
        App::new(Resolver::default(), mode, 0, "test".to_string())
    }

    #[test]
    fn test_push_matches_sequence_resolution() {
        let mut app = app(Mode::Automatic);
        let pitches = [64, 30, 62, 60, 59];
        for pitch in pitches {
            app.push_note(pitch);
        }
        assert_eq!(app.fingerings, Resolver::default().resolve_sequence(&pitches, Mode::Automatic));
    }

    #[test]
    fn test_history_is_bounded() {
        let mut app = app(Mode::Automatic);
        for pitch in 40..(40 + HISTORY as u8 + 4) {
            app.push_note(pitch);
        }
        assert_eq!(app.phrase.len(), HISTORY);
        assert_eq!(app.fingerings.len(), HISTORY);
        assert_eq!(app.phrase[0], 44);
    }

    #[test]
    fn test_set_mode_re_resolves() {
        let mut app = app(Mode::Automatic);
        app.push_note(50);
        app.set_mode(Mode::Fixed(Position::III));
        let (_, fingering) = app.latest().unwrap();
        assert_eq!(fingering.map(|f| (f.string(), f.fret())), Some((5, 5)));
    }

    #[test]
    fn test_phrase_events() {
        let mut app = app(Mode::Automatic);
        app.handle_phrase_event(PhraseEvent::note_on(0, 64));
        assert_eq!(app.latest().map(|(p, _)| p), Some(64));
        app.handle_phrase_event(PhraseEvent::clear(0));
        assert!(app.latest().is_none());
    }

    #[test]
    fn test_octave_shift_is_clamped() {
        let mut app = app(Mode::Automatic);
        for _ in 0..5 {
            app.shift_octave(1);
        }
        assert_eq!(app.octave_shift, 3);
        app.shift_octave(-7);
        assert_eq!(app.octave_shift, -3);
    }
}
