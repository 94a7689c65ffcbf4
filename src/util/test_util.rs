//! Assertions and a recording kernel shared by unit and integration tests.

use std::sync::Arc;

use crate::buffer::AudioBuffer;
use crate::kernel::{FilterKernel, ProcessSpec};
use crate::mode::{FilterMode, ModeControl};

/// Assert that two `f32`s are equal within `f32::EPSILON`.
#[inline(always)]
pub fn assert_f32_equal(a: f32, b: f32) {
    assert!((a - b).abs() < f32::EPSILON, "{} != {}", a, b);
}

/// Assert that two `f32`s are equal within `tolerance`.
#[inline(always)]
pub fn assert_f32_near(a: f32, b: f32, tolerance: f32) {
    assert!((a - b).abs() <= tolerance, "{} differs from {} by more than {}", a, b, tolerance);
}

/// Assert that every sample in `samples` is finite.
pub fn assert_all_finite(samples: &[f32]) {
    for (i, s) in samples.iter().enumerate() {
        assert!(s.is_finite(), "sample {} is not finite: {}", i, s);
    }
}

/// A kernel that records every call made to it and leaves audio untouched.
#[derive(Debug, Default)]
pub struct CountingKernel {
    /// Mode field, shared with selectors.
    pub mode: Arc<ModeControl>,
    /// Last spec passed to `prepare`.
    pub spec: Option<ProcessSpec>,
    /// Whether the kernel is switched on.
    pub enabled: bool,
    /// Last cutoff pushed.
    pub cutoff_hz: Option<f32>,
    /// Last resonance pushed.
    pub resonance: Option<f32>,
    /// Last drive pushed.
    pub drive: Option<f32>,
    /// Number of `prepare` calls.
    pub prepare_calls: usize,
    /// Number of `set_cutoff_hz` calls.
    pub cutoff_calls: usize,
    /// Number of `set_resonance` calls.
    pub resonance_calls: usize,
    /// Number of `set_drive` calls.
    pub drive_calls: usize,
    /// Number of `process` calls.
    pub process_calls: usize,
}

impl CountingKernel {
    /// Total continuous-parameter pushes so far.
    pub fn update_calls(&self) -> usize {
        self.cutoff_calls + self.resonance_calls + self.drive_calls
    }

    /// Forget all call counts, keeping the pushed values.
    pub fn clear_counts(&mut self) {
        self.prepare_calls = 0;
        self.cutoff_calls = 0;
        self.resonance_calls = 0;
        self.drive_calls = 0;
        self.process_calls = 0;
    }

    /// Current mode.
    pub fn current_mode(&self) -> FilterMode {
        self.mode.get()
    }
}

impl FilterKernel for CountingKernel {
    fn prepare(&mut self, spec: &ProcessSpec) {
        self.spec = Some(*spec);
        self.prepare_calls += 1;
    }

    fn reset(&mut self) {}

    fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    fn set_cutoff_hz(&mut self, cutoff_hz: f32) {
        self.cutoff_hz = Some(cutoff_hz);
        self.cutoff_calls += 1;
    }

    fn set_resonance(&mut self, resonance: f32) {
        self.resonance = Some(resonance);
        self.resonance_calls += 1;
    }

    fn set_drive(&mut self, drive: f32) {
        self.drive = Some(drive);
        self.drive_calls += 1;
    }

    fn mode_control(&self) -> Arc<ModeControl> {
        Arc::clone(&self.mode)
    }

    fn process(&mut self, _buffer: &mut AudioBuffer<f32>) {
        self.process_calls += 1;
    }
}
