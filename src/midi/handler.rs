use anyhow::{Result, anyhow};
use crossbeam_channel::Sender;
use midir::{MidiInput, MidiInputConnection};

use super::message::MidiMessage;
use crate::types::events::PhraseEvent;

/// MIDI input handler
/// Keeps the device connection alive and forwards notes to the UI thread
pub struct MidiHandler {
    _connection: MidiInputConnection<()>,
    port_name: String,
}

impl MidiHandler {
    /// Connect to the MIDI input at `device_index` (as listed by [`MidiHandler::list_devices`])
    /// `channel_filter` is 0-15, or 255 for omni
    pub fn new_with_device(
        event_tx: Sender<PhraseEvent>,
        device_index: usize,
        channel_filter: u8,
    ) -> Result<Self> {
        let midi_in = MidiInput::new("fretwise-input")?;
        let ports = midi_in.ports();

        let selected_port = ports
            .get(device_index)
            .ok_or_else(|| anyhow!("MIDI device index {} not available", device_index))?;
        let port_name = midi_in
            .port_name(selected_port)
            .unwrap_or_else(|_| "Unknown".to_string());

        log::info!("Connecting to MIDI input: {}", port_name);

        let connection = midi_in
            .connect(
                selected_port,
                "fretwise-input",
                move |_timestamp, bytes, _| {
                    let message = MidiMessage::parse(bytes);
                    if let Some(event) = message.to_phrase_event(channel_filter) {
                        // Use try_send to avoid blocking MIDI thread
                        let _ = event_tx.try_send(event);
                    }
                },
                (),
            )
            .map_err(|e| anyhow!("Failed to connect to MIDI port: {}", e))?;

        Ok(Self {
            _connection: connection,
            port_name,
        })
    }

    pub fn port_name(&self) -> &str {
        &self.port_name
    }

    /// List all available MIDI input devices
    pub fn list_devices() -> Result<Vec<String>> {
        let midi_in = MidiInput::new("fretwise-list")?;
        let ports = midi_in.ports();

        let mut devices = Vec::new();
        for port in ports.iter() {
            if let Ok(name) = midi_in.port_name(port) {
                devices.push(name);
            }
        }

        Ok(devices)
    }
}
