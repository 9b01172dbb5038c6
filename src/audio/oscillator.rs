use std::f32::consts::PI;

/// Sine oscillator with phase accumulation
pub struct Oscillator {
    /// Current phase position (0.0 to 1.0)
    phase: f32,
    /// Phase increment per sample (frequency / sample_rate)
    phase_delta: f32,
    sample_rate: f32,
}

impl Oscillator {
    pub fn new(sample_rate: f32) -> Self {
        Self {
            phase: 0.0,
            phase_delta: 440.0 / sample_rate,
            sample_rate,
        }
    }

    /// Set the frequency and restart the cycle for a clean attack
    pub fn start(&mut self, frequency: f32) {
        self.phase_delta = frequency / self.sample_rate;
        self.phase = 0.0;
    }

    /// Generate next sample and advance phase
    pub fn next_sample(&mut self) -> f32 {
        let output = (self.phase * 2.0 * PI).sin();

        self.phase += self.phase_delta;
        if self.phase >= 1.0 {
            self.phase -= 1.0;
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_zero_crossing() {
        let mut osc = Oscillator::new(44100.0);
        osc.start(220.0);
        assert!(osc.next_sample().abs() < 1e-6);
    }

    #[test]
    fn test_quarter_cycle_peaks() {
        // 4 samples per cycle at this rate
        let mut osc = Oscillator::new(1760.0);
        osc.start(440.0);
        osc.next_sample();
        assert!((osc.next_sample() - 1.0).abs() < 1e-4);
    }
}
