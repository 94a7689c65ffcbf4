#![warn(missing_docs)]

//! ladder-fx is a resonant ladder filter effect built around a lock-free parameter core.
//!
//! # Parameters
//! The effect exposes four parameters: `CUTOFF` (Hz), `RESONANCE`, `DRIVE` and the mode choice
//! `TYPE`. They live in a [`ParameterStore`](store::ParameterStore) of atomics that the host, the
//! editor and the audio thread share without locking.
//!
//! ## Continuous parameters
//! Cutoff, resonance and drive are picked up at block boundaries: at the start of every block the
//! [`FilterProcessor`](processor::FilterProcessor) compares each against the value it last pushed
//! into the kernel and pushes only those that changed.
//!
//! ## Mode selection
//! The six filter modes are selected through discrete selection events that reach the kernel
//! immediately, from whichever thread raised them. See [`mode`].
//!
//! ## State
//! The full parameter set is saved to and restored from an opaque blob. See [`state`].
//!
//! # Example
//! Running the effect without any host:
//!
//! ```
//! use ladder_fx::prelude::*;
//!
//! let mut effect = LadderEffect::new();
//! effect.prepare(ProcessSpec {
//!     sample_rate: 44100.0,
//!     max_block_size: 64,
//!     num_channels: 2,
//! });
//!
//! let params = effect.get_parameter_object();
//! params.set_parameter(ParameterId::Cutoff.index() as i32, 0.5);
//!
//! let mut left = vec![0.25f32; 64];
//! let mut right = vec![-0.25f32; 64];
//! {
//!     let mut channels = [left.as_mut_slice(), right.as_mut_slice()];
//!     let mut buffer = AudioBuffer::new(&mut channels);
//!     effect.process(&mut buffer, &[]);
//! }
//! assert!(left.iter().chain(right.iter()).all(|s| s.is_finite()));
//! ```

#[macro_use]
extern crate log;
#[macro_use]
extern crate bitflags;

pub mod buffer;
pub mod channels;
pub mod editor;
pub mod effect;
pub mod error;
pub mod event;
pub mod kernel;
pub mod ladder;
pub mod mode;
pub mod params;
pub mod plugin;
pub mod prelude;
pub mod processor;
pub mod state;
pub mod store;
pub mod util;

pub use crate::effect::{LadderEffect, LadderParameters};
pub use crate::error::{LayoutError, StateError};
