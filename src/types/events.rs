/// Events sent from the MIDI input thread to the UI thread
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhraseEvent {
    /// A note was struck and should be appended to the phrase
    NoteOn { channel: u8, note: u8 },
    /// All notes off (CC 123) - clears the live phrase
    Clear { channel: u8 },
}

impl PhraseEvent {
    pub fn note_on(channel: u8, note: u8) -> Self {
        PhraseEvent::NoteOn { channel, note }
    }

    pub fn clear(channel: u8) -> Self {
        PhraseEvent::Clear { channel }
    }

    /// Get the channel for this event
    pub fn channel(&self) -> u8 {
        match self {
            PhraseEvent::NoteOn { channel, .. } => *channel,
            PhraseEvent::Clear { channel } => *channel,
        }
    }
}
