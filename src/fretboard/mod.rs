//! Fretboard model and the fingering resolver.
//!
//! Pitches are located on every string of a [`Tuning`], then [`resolve`]
//! picks one location per note and assigns a finger and hand [`Position`].

pub mod fingering;
pub mod position;
pub mod resolver;
pub mod tuning;

pub use fingering::{Fingering, Location};
pub use position::{Position, determine_position};
pub use resolver::{Fingerings, Mode, ParseModeError, Resolver, resolve, resolve_sequence};
pub use tuning::{MAX_FRET, STRING_COUNT, Tuning, locate_fret};
