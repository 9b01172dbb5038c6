use crate::types::events::PhraseEvent;

/// Channel filter value meaning "accept every channel"
pub const OMNI: u8 = 255;

/// MIDI message types we care about
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MidiMessage {
    NoteOn { channel: u8, note: u8, velocity: u8 },
    NoteOff { channel: u8, note: u8, velocity: u8 },
    ControlChange { channel: u8, controller: u8, value: u8 },
    Unknown,
}

impl MidiMessage {
    /// Parse raw MIDI bytes into a message
    /// Handles standard MIDI protocol: [status, data1, data2]
    pub fn parse(bytes: &[u8]) -> Self {
        let [status, data1, data2, ..] = *bytes else {
            return MidiMessage::Unknown;
        };

        let channel = status & 0x0F;

        match status & 0xF0 {
            // MIDI spec: Note On with velocity 0 is actually Note Off
            0x90 if data2 == 0 => MidiMessage::NoteOff {
                channel,
                note: data1,
                velocity: 0,
            },
            0x90 => MidiMessage::NoteOn {
                channel,
                note: data1,
                velocity: data2,
            },
            0x80 => MidiMessage::NoteOff {
                channel,
                note: data1,
                velocity: data2,
            },
            0xB0 => MidiMessage::ControlChange {
                channel,
                controller: data1,
                value: data2,
            },
            _ => MidiMessage::Unknown,
        }
    }

    /// Convert to a phrase event
    /// Filters by MIDI channel: 255 = omni (all channels), 0-15 = specific channel
    pub fn to_phrase_event(&self, channel_filter: u8) -> Option<PhraseEvent> {
        match *self {
            MidiMessage::NoteOn { channel, note, .. } if accepts(channel_filter, channel) => {
                Some(PhraseEvent::note_on(channel, note))
            }
            // CC 123 = All Notes Off (MIDI panic)
            MidiMessage::ControlChange {
                channel,
                controller: 123,
                ..
            } if accepts(channel_filter, channel) => Some(PhraseEvent::clear(channel)),
            _ => None,
        }
    }
}

fn accepts(channel_filter: u8, channel: u8) -> bool {
    channel_filter == OMNI || channel == channel_filter
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_note_on() {
        let bytes = [0x90, 60, 100]; // Note On, channel 0, middle C, velocity 100
        let msg = MidiMessage::parse(&bytes);
        assert_eq!(
            msg,
            MidiMessage::NoteOn {
                channel: 0,
                note: 60,
                velocity: 100
            }
        );
    }

    #[test]
    fn test_parse_note_off() {
        let bytes = [0x83, 60, 64]; // Note Off, channel 3, middle C
        let msg = MidiMessage::parse(&bytes);
        assert_eq!(
            msg,
            MidiMessage::NoteOff {
                channel: 3,
                note: 60,
                velocity: 64
            }
        );
    }

    #[test]
    fn test_note_on_velocity_zero_is_note_off() {
        let bytes = [0x90, 60, 0];
        let msg = MidiMessage::parse(&bytes);
        assert!(matches!(msg, MidiMessage::NoteOff { .. }));
    }

    #[test]
    fn test_short_messages_are_unknown() {
        assert_eq!(MidiMessage::parse(&[]), MidiMessage::Unknown);
        assert_eq!(MidiMessage::parse(&[0x90, 60]), MidiMessage::Unknown);
        assert_eq!(MidiMessage::parse(&[0xE0, 0, 64]), MidiMessage::Unknown);
    }

    #[test]
    fn test_channel_filter() {
        let msg = MidiMessage::parse(&[0x91, 64, 90]);
        assert_eq!(msg.to_phrase_event(OMNI), Some(PhraseEvent::note_on(1, 64)));
        assert_eq!(msg.to_phrase_event(1), Some(PhraseEvent::note_on(1, 64)));
        assert_eq!(msg.to_phrase_event(0), None);
    }

    #[test]
    fn test_all_notes_off_clears() {
        let msg = MidiMessage::parse(&[0xB0, 123, 0]);
        assert_eq!(msg.to_phrase_event(OMNI), Some(PhraseEvent::clear(0)));

        let other_cc = MidiMessage::parse(&[0xB0, 7, 100]);
        assert_eq!(other_cc.to_phrase_event(OMNI), None);
    }

    #[test]
    fn test_note_off_is_ignored() {
        let msg = MidiMessage::parse(&[0x80, 60, 0]);
        assert_eq!(msg.to_phrase_event(OMNI), None);
    }
}
