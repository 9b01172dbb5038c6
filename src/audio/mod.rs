pub mod envelope;
pub mod oscillator;
pub mod preview;
