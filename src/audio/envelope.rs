/// Attack/release envelope for preview tones
/// Ramps linearly to full level, holds while the gate is open, then fades out
pub struct Envelope {
    state: EnvelopeState,
    attack_samples: u64,
    release_samples: u64,
    current_level: f32,
    sample_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum EnvelopeState {
    Idle,
    Attack { start_sample: u64 },
    Hold,
    Release { start_sample: u64, release_level: f32 },
}

impl Envelope {
    /// Times in seconds; a minimum of 1ms avoids clicks
    pub fn new(sample_rate: f32, attack: f32, release: f32) -> Self {
        Self {
            state: EnvelopeState::Idle,
            attack_samples: (attack.max(0.001) * sample_rate) as u64,
            release_samples: (release.max(0.001) * sample_rate) as u64,
            current_level: 0.0,
            sample_count: 0,
        }
    }

    pub fn note_on(&mut self) {
        self.state = EnvelopeState::Attack {
            start_sample: self.sample_count,
        };
    }

    pub fn note_off(&mut self) {
        self.state = EnvelopeState::Release {
            start_sample: self.sample_count,
            release_level: self.current_level,
        };
    }

    pub fn is_active(&self) -> bool {
        !matches!(self.state, EnvelopeState::Idle)
    }

    pub fn next_sample(&mut self) -> f32 {
        match self.state {
            EnvelopeState::Idle => {
                self.current_level = 0.0;
            }

            EnvelopeState::Attack { start_sample } => {
                let elapsed = self.sample_count - start_sample;
                if elapsed >= self.attack_samples {
                    self.current_level = 1.0;
                    self.state = EnvelopeState::Hold;
                } else {
                    self.current_level = elapsed as f32 / self.attack_samples as f32;
                }
            }

            EnvelopeState::Hold => {
                self.current_level = 1.0;
            }

            EnvelopeState::Release {
                start_sample,
                release_level,
            } => {
                let elapsed = self.sample_count - start_sample;
                if elapsed >= self.release_samples {
                    self.current_level = 0.0;
                    self.state = EnvelopeState::Idle;
                } else {
                    let progress = elapsed as f32 / self.release_samples as f32;
                    self.current_level = release_level * (1.0 - progress);
                }
            }
        }

        self.sample_count += 1;
        self.current_level
    }
}
