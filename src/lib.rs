//! # fretwise
//!
//! Classical-guitar fingering for melodic phrases: every pitch is placed on a
//! string and fret, given a left-hand finger and a hand position.
//!
//! ## Example
//! ```rust
//! use fretwise::fretboard::{Mode, Position, Resolver};
//!
//! let resolver = Resolver::default();
//! let phrase = resolver.resolve_sequence(&[50, 52, 53], Mode::Fixed(Position::III));
//! let first = phrase[0].expect("D3 is playable");
//! assert_eq!((first.string(), first.fret(), first.finger), (5, 5, 1));
//! ```

pub mod audio;
pub mod config;
pub mod fretboard;
pub mod midi;
pub mod report;
pub mod types;
pub mod ui;
