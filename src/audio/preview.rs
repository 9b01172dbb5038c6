use anyhow::{Result, anyhow};
use cpal::traits::{DeviceTrait, StreamTrait};
use std::time::Duration;

use super::{envelope::Envelope, oscillator::Oscillator};
use crate::config::PreviewConfig;
use crate::types::note::midi_note_to_frequency;

/// Output gain for preview tones
const GAIN: f32 = 0.3;

/// Share of each beat the note sounds before its release starts
const GATE: f32 = 0.85;

/// Plays a phrase as evenly spaced quarter notes
pub struct PhrasePlayer {
    frequencies: Vec<f32>,
    samples_per_note: u64,
    gate_samples: u64,
    tail_samples: u64,
    position: u64,
    oscillator: Oscillator,
    envelope: Envelope,
}

impl PhrasePlayer {
    pub fn new(sample_rate: f32, pitches: &[u8], config: &PreviewConfig) -> Self {
        let samples_per_note = ((config.beat_seconds() * sample_rate) as u64).max(1);
        Self {
            frequencies: pitches.iter().map(|&p| midi_note_to_frequency(p)).collect(),
            samples_per_note,
            gate_samples: (samples_per_note as f32 * GATE) as u64,
            tail_samples: (config.release.max(0.001) * sample_rate) as u64,
            position: 0,
            oscillator: Oscillator::new(sample_rate),
            envelope: Envelope::new(sample_rate, config.attack, config.release),
        }
    }

    /// Total length including the last release tail
    pub fn total_samples(&self) -> u64 {
        self.frequencies.len() as u64 * self.samples_per_note + self.tail_samples
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.total_samples()
    }

    pub fn next_sample(&mut self) -> f32 {
        let index = (self.position / self.samples_per_note) as usize;
        let offset = self.position % self.samples_per_note;

        if let Some(&frequency) = self.frequencies.get(index) {
            if offset == 0 {
                self.oscillator.start(frequency);
                self.envelope.note_on();
            } else if offset == self.gate_samples {
                self.envelope.note_off();
            }
        }

        self.position += 1;
        self.oscillator.next_sample() * self.envelope.next_sample() * GAIN
    }

    /// Fill an interleaved buffer, writing the same sample to every channel
    pub fn fill(&mut self, output: &mut [f32], num_channels: usize) {
        for frame in output.chunks_mut(num_channels.max(1)) {
            let sample = if self.is_finished() {
                0.0
            } else {
                self.next_sample()
            };
            frame.fill(sample);
        }
    }
}

/// Play `pitches` on `device` and block until the phrase has finished
pub fn play(device: &cpal::Device, pitches: &[u8], config: &PreviewConfig) -> Result<()> {
    if pitches.is_empty() {
        return Ok(());
    }

    let supported = device.default_output_config()?;
    let num_channels = supported.channels() as usize;
    let sample_format = supported.sample_format();
    let stream_config: cpal::StreamConfig = supported.into();
    let sample_rate = stream_config.sample_rate as f32;

    let player = PhrasePlayer::new(sample_rate, pitches, config);
    let duration = Duration::from_secs_f32(player.total_samples() as f32 / sample_rate);
    let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(1);

    log::info!(
        "Previewing {} notes at {} bpm ({:.1}s)",
        pitches.len(),
        config.bpm,
        duration.as_secs_f32()
    );

    let stream = match sample_format {
        cpal::SampleFormat::F32 => {
            build_stream::<f32>(device, &stream_config, player, num_channels, done_tx)?
        }
        cpal::SampleFormat::I16 => {
            build_stream::<i16>(device, &stream_config, player, num_channels, done_tx)?
        }
        cpal::SampleFormat::U16 => {
            build_stream::<u16>(device, &stream_config, player, num_channels, done_tx)?
        }
        other => return Err(anyhow!("Unsupported sample format: {:?}", other)),
    };

    stream.play()?;

    // The callback signals once the tail has rendered; the timeout covers a stalled device
    if done_rx.recv_timeout(duration + Duration::from_secs(1)).is_err() {
        log::warn!("Audio preview did not report completion");
    }

    Ok(())
}

fn build_stream<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    mut player: PhrasePlayer,
    num_channels: usize,
    done_tx: crossbeam_channel::Sender<()>,
) -> Result<cpal::Stream>
where
    T: cpal::Sample + cpal::SizedSample + cpal::FromSample<f32>,
{
    let mut temp_buffer = vec![0.0f32; 512 * num_channels];

    let stream = device.build_output_stream(
        config,
        move |data: &mut [T], _: &cpal::OutputCallbackInfo| {
            if temp_buffer.len() < data.len() {
                temp_buffer.resize(data.len(), 0.0);
            }

            let buffer = &mut temp_buffer[..data.len()];
            player.fill(buffer, num_channels);

            for (out, sample) in data.iter_mut().zip(buffer.iter()) {
                *out = T::from_sample(*sample);
            }

            if player.is_finished() {
                let _ = done_tx.try_send(());
            }
        },
        |err| log::error!("Audio stream error: {}", err),
        None,
    )?;

    Ok(stream)
}
