//! The seam between the processing core and the filter that actually shapes the audio.

use std::sync::Arc;

use crate::buffer::AudioBuffer;
use crate::mode::{FilterMode, ModeControl};

/// Processing configuration handed to a kernel before playback.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ProcessSpec {
    /// Sample rate in Hz.
    pub sample_rate: f64,
    /// Largest block the host will deliver.
    pub max_block_size: usize,
    /// Number of channels to process.
    pub num_channels: usize,
}

impl Default for ProcessSpec {
    fn default() -> ProcessSpec {
        ProcessSpec {
            sample_rate: 44100.0,
            max_block_size: 512,
            num_channels: 2,
        }
    }
}

/// A stateful filter the core drives.
///
/// All setters except the mode take `&mut self` and are only called from the audio thread (or
/// before playback). The mode lives in a shared [`ModeControl`] so that selection events may
/// write it from another thread while `process` runs.
pub trait FilterKernel: Send {
    /// Configure for `spec`. May clear filter history.
    fn prepare(&mut self, spec: &ProcessSpec);

    /// Clear filter history without changing any setting.
    fn reset(&mut self);

    /// Switch processing on or off. A disabled kernel leaves audio untouched.
    fn set_enabled(&mut self, enabled: bool);

    /// Set the cutoff frequency in Hz.
    fn set_cutoff_hz(&mut self, cutoff_hz: f32);

    /// Set the resonance amount.
    fn set_resonance(&mut self, resonance: f32);

    /// Set the drive amount.
    fn set_drive(&mut self, drive: f32);

    /// Handle to the kernel's mode field, writable from any thread.
    fn mode_control(&self) -> Arc<ModeControl>;

    /// Switch to `mode` immediately.
    fn set_mode(&self, mode: FilterMode) {
        self.mode_control().set(mode);
    }

    /// Filter `buffer` in place.
    fn process(&mut self, buffer: &mut AudioBuffer<f32>);
}
