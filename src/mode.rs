//! Filter modes and the discrete mode selection.
//!
//! Unlike the continuous parameters, which are applied at the next block boundary, a mode
//! selection is pushed into the kernel at once, on whichever thread raised it. The kernel keeps
//! its mode in a [`ModeControl`] so that this write may race with `process` safely.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

use num_enum::{FromPrimitive, IntoPrimitive};

/// Display labels of the six modes, in selection order. Choice `n` maps to `MODE_LABELS[n - 1]`.
pub const MODE_LABELS: [&str; 6] = ["LPF12", "HPF12", "BPF12", "LPF24", "HPF24", "BPF24"];

/// Response type and slope of the ladder filter.
///
/// The discriminants are the 1-indexed selection choices. Any other integer converts to
/// [`FilterMode::Lpf12`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, FromPrimitive, IntoPrimitive)]
#[repr(u8)]
pub enum FilterMode {
    /// Low-pass, 12 dB/oct.
    #[num_enum(default)]
    Lpf12 = 1,
    /// High-pass, 12 dB/oct.
    Hpf12 = 2,
    /// Band-pass, 12 dB/oct.
    Bpf12 = 3,
    /// Low-pass, 24 dB/oct.
    Lpf24 = 4,
    /// High-pass, 24 dB/oct.
    Hpf24 = 5,
    /// Band-pass, 24 dB/oct.
    Bpf24 = 6,
}

impl FilterMode {
    /// All modes in selection order.
    pub const ALL: [FilterMode; 6] = [
        FilterMode::Lpf12,
        FilterMode::Hpf12,
        FilterMode::Bpf12,
        FilterMode::Lpf24,
        FilterMode::Hpf24,
        FilterMode::Bpf24,
    ];

    /// Resolve a selection choice. Choices outside `1..=6` fall back to `Lpf12`.
    pub fn from_choice(choice: i32) -> FilterMode {
        u8::try_from(choice).map(FilterMode::from).unwrap_or_default()
    }

    /// The 1-indexed selection choice of this mode.
    pub fn choice(self) -> i32 {
        i32::from(u8::from(self))
    }

    /// Display label, e.g. `"LPF24"`.
    pub fn label(self) -> &'static str {
        MODE_LABELS[(self.choice() - 1) as usize]
    }

    /// Look a mode up by its display label, ignoring ASCII case.
    pub fn from_label(label: &str) -> Option<FilterMode> {
        FilterMode::ALL
            .iter()
            .copied()
            .find(|m| m.label().eq_ignore_ascii_case(label.trim()))
    }
}

impl Default for FilterMode {
    fn default() -> FilterMode {
        FilterMode::Lpf12
    }
}

impl fmt::Display for FilterMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The kernel's mode field: one atomic byte, written by any thread, read by the audio thread.
#[derive(Debug)]
pub struct ModeControl {
    mode: AtomicU8,
}

impl ModeControl {
    /// A control holding `mode`.
    pub fn new(mode: FilterMode) -> ModeControl {
        ModeControl {
            mode: AtomicU8::new(mode.into()),
        }
    }

    /// The current mode.
    #[inline]
    pub fn get(&self) -> FilterMode {
        FilterMode::from(self.mode.load(Ordering::Relaxed))
    }

    /// Replace the mode. Takes effect from the next sample the kernel renders.
    #[inline]
    pub fn set(&self, mode: FilterMode) {
        self.mode.store(mode.into(), Ordering::Relaxed);
    }
}

impl Default for ModeControl {
    fn default() -> ModeControl {
        ModeControl::new(FilterMode::default())
    }
}

/// Handles discrete mode selection events for one kernel.
///
/// Cheap to clone; every clone drives the same kernel.
#[derive(Clone, Debug)]
pub struct ModeSelector {
    control: Arc<ModeControl>,
}

impl ModeSelector {
    /// A selector driving `control`.
    pub fn new(control: Arc<ModeControl>) -> ModeSelector {
        ModeSelector { control }
    }

    /// Apply a selection event: resolve `choice` and push the mode into the kernel immediately.
    ///
    /// Returns the mode that was applied.
    pub fn select(&self, choice: i32) -> FilterMode {
        let mode = FilterMode::from_choice(choice);
        self.control.set(mode);
        mode
    }

    /// The mode the kernel currently runs with.
    pub fn current(&self) -> FilterMode {
        self.control.get()
    }
}
