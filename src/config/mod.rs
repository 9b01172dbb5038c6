use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::fretboard::{Mode, STRING_COUNT, Tuning};
use crate::midi::message::OMNI;
use crate::types::note::parse_pitch;

/// Top-level configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FretwiseConfig {
    #[serde(default)]
    pub tuning: TuningSpec,

    #[serde(default)]
    pub position: PositionSpec,

    /// Octave shift applied to printed note names
    #[serde(default)]
    pub octave: i8,

    /// Number of notes taken from a MIDI file
    #[serde(default = "default_max_notes")]
    pub max_notes: usize,

    #[serde(default)]
    pub devices: DeviceConfig,

    #[serde(default)]
    pub midich: MidiChannelSpec,

    #[serde(default)]
    pub preview: PreviewConfig,
}

impl Default for FretwiseConfig {
    fn default() -> Self {
        Self {
            tuning: TuningSpec::default(),
            position: PositionSpec::default(),
            octave: 0,
            max_notes: default_max_notes(),
            devices: DeviceConfig::default(),
            midich: MidiChannelSpec::default(),
            preview: PreviewConfig::default(),
        }
    }
}

impl FretwiseConfig {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: FretwiseConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse YAML config: {}", path.display()))?;

        config
            .validate()
            .with_context(|| format!("Invalid configuration: {}", path.display()))?;

        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        self.tuning().context("Invalid tuning")?;
        self.mode().context("Invalid position")?;

        if !(-3..=3).contains(&self.octave) {
            return Err(anyhow!("Octave shift must be between -3 and 3"));
        }
        if self.max_notes == 0 {
            return Err(anyhow!("max_notes must be at least 1"));
        }

        if let MidiChannelSpec::Channel(ch) = self.midich {
            if !(1..=16).contains(&ch) {
                return Err(anyhow!("MIDI channel must be between 1 and 16"));
            }
        }

        self.preview.validate().context("Invalid preview settings")?;

        Ok(())
    }

    pub fn tuning(&self) -> Result<Tuning> {
        self.tuning.resolve()
    }

    pub fn mode(&self) -> Result<Mode> {
        self.position.resolve()
    }

    /// Get the MIDI channel filter value (0-15 for specific channel, 255 for omni)
    pub fn midi_channel_filter(&self) -> u8 {
        match &self.midich {
            MidiChannelSpec::Channel(ch) => ch.saturating_sub(1), // Convert 1-16 to 0-15
            MidiChannelSpec::Omni(_) => OMNI,
        }
    }

    /// Channel restriction for MIDI files, `None` for omni
    pub fn midi_channel(&self) -> Option<u8> {
        match self.midi_channel_filter() {
            OMNI => None,
            ch => Some(ch),
        }
    }
}

/// Tuning: a preset name or six open-string pitches (numbers or note names), string 1 first
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TuningSpec {
    Preset(String),
    Strings(Vec<NoteSpec>),
}

impl Default for TuningSpec {
    fn default() -> Self {
        TuningSpec::Preset("standard".to_string())
    }
}

impl TuningSpec {
    pub fn resolve(&self) -> Result<Tuning> {
        match self {
            TuningSpec::Preset(name) => {
                Tuning::preset(name).ok_or_else(|| anyhow!("Unknown tuning preset: {}", name))
            }
            TuningSpec::Strings(notes) => {
                if notes.len() != STRING_COUNT {
                    return Err(anyhow!(
                        "Tuning must list {} strings, got {}",
                        STRING_COUNT,
                        notes.len()
                    ));
                }
                let mut strings = [0u8; STRING_COUNT];
                for (slot, note) in strings.iter_mut().zip(notes) {
                    *slot = note.pitch()?;
                }
                Ok(Tuning::new(strings))
            }
        }
    }
}

/// A pitch written as a MIDI number or a note name like "e2"
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum NoteSpec {
    Number(u8),
    Name(String),
}

impl NoteSpec {
    pub fn pitch(&self) -> Result<u8> {
        match self {
            NoteSpec::Number(n) if *n <= 127 => Ok(*n),
            NoteSpec::Number(n) => Err(anyhow!("Note out of range: {}", n)),
            NoteSpec::Name(name) => {
                parse_pitch(name).with_context(|| format!("Invalid note: {}", name))
            }
        }
    }
}

/// Hand position: 0-5 or a name ("auto", "III")
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum PositionSpec {
    Index(u8),
    Name(String),
}

impl Default for PositionSpec {
    fn default() -> Self {
        PositionSpec::Index(0)
    }
}

impl PositionSpec {
    pub fn resolve(&self) -> Result<Mode> {
        let mode = match self {
            PositionSpec::Index(index) => index.to_string().parse::<Mode>()?,
            PositionSpec::Name(name) => name.parse::<Mode>()?,
        };
        Ok(mode)
    }
}

/// Device configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct DeviceConfig {
    /// MIDI input: index or name substring, first device when absent
    #[serde(default)]
    pub midiin: Option<String>,
    /// Audio output: index or name substring, default device when absent
    #[serde(default)]
    pub audioout: Option<String>,
}

/// MIDI channel specification - either a specific channel (1-16) or omni
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum MidiChannelSpec {
    Channel(u8),
    Omni(String), // "omni" or "all"
}

impl Default for MidiChannelSpec {
    fn default() -> Self {
        MidiChannelSpec::Omni("omni".to_string())
    }
}

/// Audio preview settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PreviewConfig {
    #[serde(default = "default_bpm")]
    pub bpm: f32,

    #[serde(default = "default_attack")]
    pub attack: f32,

    #[serde(default = "default_release")]
    pub release: f32,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            bpm: default_bpm(),
            attack: default_attack(),
            release: default_release(),
        }
    }
}

impl PreviewConfig {
    pub fn validate(&self) -> Result<()> {
        if self.bpm < 20.0 || self.bpm > 300.0 {
            return Err(anyhow!("BPM must be between 20 and 300"));
        }
        if self.attack < 0.0 || self.attack > 2.0 {
            return Err(anyhow!("Attack must be between 0.0 and 2.0 seconds"));
        }
        if self.release < 0.0 || self.release > 5.0 {
            return Err(anyhow!("Release must be between 0.0 and 5.0 seconds"));
        }
        Ok(())
    }

    /// Length of one quarter note in seconds
    pub fn beat_seconds(&self) -> f32 {
        60.0 / self.bpm
    }
}

// Default value functions for serde
fn default_max_notes() -> usize {
    16
}

fn default_bpm() -> f32 {
    90.0
}

fn default_attack() -> f32 {
    0.01
}

fn default_release() -> f32 {
    0.2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fretboard::Position;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: FretwiseConfig = serde_yaml::from_str("{}").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.tuning().unwrap(), Tuning::STANDARD);
        assert_eq!(config.mode().unwrap(), Mode::Automatic);
        assert_eq!(config.max_notes, 16);
        assert_eq!(config.midi_channel_filter(), OMNI);
        assert_eq!(config.midi_channel(), None);
        assert_eq!(config.preview.bpm, 90.0);
    }

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
tuning: [e4, b3, g3, d3, a2, 38]
position: III
octave: 1
max_notes: 8
devices:
  midiin: "keystation"
  audioout: "1"
midich: 2
preview:
  bpm: 120
  release: 0.5
"#;

        let config: FretwiseConfig = serde_yaml::from_str(yaml).unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.tuning().unwrap(), Tuning::DROP_D);
        assert_eq!(config.mode().unwrap(), Mode::Fixed(Position::III));
        assert_eq!(config.octave, 1);
        assert_eq!(config.devices.midiin.as_deref(), Some("keystation"));
        assert_eq!(config.midi_channel_filter(), 1);
        assert_eq!(config.midi_channel(), Some(1));
        assert_eq!(config.preview.attack, 0.01);
        assert!((config.preview.beat_seconds() - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_numeric_position_and_preset() {
        let yaml = r#"
tuning: drop-d
position: 4
"#;
        let config: FretwiseConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.tuning().unwrap(), Tuning::DROP_D);
        assert_eq!(config.mode().unwrap(), Mode::Fixed(Position::IV));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        for yaml in [
            "tuning: [64, 59, 55]",
            "tuning: open-g",
            "tuning: [e4, b3, g3, d3, a2, x2]",
            "position: 6",
            "position: VI",
            "octave: 5",
            "max_notes: 0",
            "midich: 17",
            "preview: { bpm: 5 }",
        ] {
            let config: FretwiseConfig = serde_yaml::from_str(yaml).unwrap();
            assert!(config.validate().is_err(), "accepted {}", yaml);
        }
    }

    #[test]
    fn test_parse_omni_channel() {
        let config: FretwiseConfig = serde_yaml::from_str("midich: all").unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.midi_channel_filter(), OMNI);
    }
}
