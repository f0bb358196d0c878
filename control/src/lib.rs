//! Decision logic of a sync separator for component video.
//!
//! It classifies sync pulses coming from a comparator, counts lines within a
//! frame and drives two outputs out of that: a vertical sync marking the
//! first pulse of each vertical sync train, and a line gate active only
//! during the picture portion of lines that carry video.
//!
//! The crate owns no peripherals. It is meant to be called from the interrupt
//! raised by the comparator, with the gate timer and the vertical sync pin
//! passed in through the `OneShot` and `OutputLatch` traits:
//!
//! ```text
//!   [ Comparator ] --(edge)--> [ Gate timer ] --> Line gate
//!         |
//!      (sample)
//!         V
//!   [ SyncSeparator ] --(enable)--> [ Gate timer ]
//!         |
//!         +--> Vertical sync
//! ```

#![cfg_attr(not(test), no_std)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::cast_possible_truncation)]

pub mod config;
pub mod gate;
pub mod line_counter;
mod log;
pub mod separator;
pub mod signal;

pub use config::{Configuration, ConfigurationError, LineWindow, Threshold};
pub use gate::{OneShot, OutputLatch, SoftOneShot};
pub use line_counter::{LineCounter, LineReaction, Pulse, SyncEvent};
pub use separator::SyncSeparator;
