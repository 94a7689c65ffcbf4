//! The processing core: keeps a filter kernel in step with the parameter store.
//!
//! Once per block the core reads the three continuous parameters, compares each against the value
//! it last pushed into the kernel, pushes only those that differ, and then lets the kernel filter
//! the block. Parameters therefore never change in the middle of a block, and the output for a
//! given automation timeline is the same whatever block sizes the host picks.
//!
//! The filter mode takes another route: selection events go straight into the kernel through a
//! [`ModeSelector`], without waiting for a block boundary.
//!
//! Blocks run with subnormal floats flushed to zero, so a decaying filter tail never hits the slow
//! path.

use std::sync::Arc;

use crate::buffer::AudioBuffer;
use crate::kernel::{FilterKernel, ProcessSpec};
use crate::mode::{FilterMode, ModeSelector};
use crate::params::ParameterId;
use crate::store::ParameterStore;
use crate::util::NoDenormals;

/// Mode pushed into the kernel on `prepare`.
///
/// This is not the selection default (`Lpf12`): a freshly prepared instance runs four-pole
/// low-pass until the first selection event. The one exception is a `prepare` that follows a
/// state restore, which keeps the restored mode instead.
pub const STARTUP_MODE: FilterMode = FilterMode::Lpf24;

/// The continuous settings last pushed into the kernel.
///
/// At the start of every block this equals the kernel's own configuration.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FilterSnapshot {
    /// Cutoff frequency in Hz.
    pub cutoff_hz: f32,
    /// Resonance amount.
    pub resonance: f32,
    /// Drive amount.
    pub drive: f32,
}

impl FilterSnapshot {
    /// Read the current values from `store`.
    #[inline]
    pub fn read(store: &ParameterStore) -> FilterSnapshot {
        FilterSnapshot {
            cutoff_hz: store.get(ParameterId::Cutoff),
            resonance: store.get(ParameterId::Resonance),
            drive: store.get(ParameterId::Drive),
        }
    }
}

// Record `new` in `last` if it differs exactly; report whether it did.
#[inline]
fn take_if_changed(last: &mut f32, new: f32) -> bool {
    #[allow(clippy::float_cmp)]
    let changed = *last != new;
    if changed {
        *last = new;
    }
    changed
}

/// Owns a filter kernel and drives it from a shared [`ParameterStore`].
pub struct FilterProcessor<K: FilterKernel> {
    store: Arc<ParameterStore>,
    kernel: K,
    snapshot: FilterSnapshot,
    spec: Option<ProcessSpec>,
}

impl<K: FilterKernel> FilterProcessor<K> {
    /// Wrap `kernel`. Nothing is pushed into it until [`prepare`](Self::prepare).
    pub fn new(store: Arc<ParameterStore>, kernel: K) -> FilterProcessor<K> {
        let snapshot = FilterSnapshot::read(&store);
        FilterProcessor {
            store,
            kernel,
            snapshot,
            spec: None,
        }
    }

    /// Configure for playback. Called before the first block and whenever the host changes
    /// sample rate, block size or channel count.
    ///
    /// Snapshots the store, prepares and enables the kernel, sets the mode, and pushes the
    /// snapshot so kernel and snapshot agree from the first block on.
    ///
    /// The mode is [`STARTUP_MODE`], unless the store was restored from saved state since the
    /// last `prepare`; then the restored choice is kept.
    pub fn prepare(&mut self, spec: ProcessSpec) {
        self.snapshot = FilterSnapshot::read(&self.store);

        self.kernel.prepare(&spec);
        self.kernel.set_enabled(true);
        let mode = if self.store.take_restored() {
            FilterMode::from_choice(self.store.get(ParameterId::Type).round() as i32)
        } else {
            STARTUP_MODE
        };
        self.kernel.set_mode(mode);
        self.kernel.set_cutoff_hz(self.snapshot.cutoff_hz);
        self.kernel.set_resonance(self.snapshot.resonance);
        self.kernel.set_drive(self.snapshot.drive);

        self.spec = Some(spec);
        debug!(
            "Prepared at {} Hz, {} samples, {} channels: {:?}, {}",
            spec.sample_rate, spec.max_block_size, spec.num_channels, self.snapshot, mode
        );
    }

    /// Stop processing until the next `prepare`.
    pub fn release(&mut self) {
        self.kernel.set_enabled(false);
        self.spec = None;
    }

    /// Push every continuous parameter whose store value differs from the snapshot.
    ///
    /// Each parameter is read with a single atomic load and handled on its own. Wait-free, no
    /// allocation.
    pub fn sync_parameters(&mut self) {
        let cutoff_hz = self.store.get(ParameterId::Cutoff);
        if take_if_changed(&mut self.snapshot.cutoff_hz, cutoff_hz) {
            self.kernel.set_cutoff_hz(cutoff_hz);
        }

        let resonance = self.store.get(ParameterId::Resonance);
        if take_if_changed(&mut self.snapshot.resonance, resonance) {
            self.kernel.set_resonance(resonance);
        }

        let drive = self.store.get(ParameterId::Drive);
        if take_if_changed(&mut self.snapshot.drive, drive) {
            self.kernel.set_drive(drive);
        }
    }

    /// Process one block in place: sync parameters, then filter.
    ///
    /// Before the first `prepare` the block passes through untouched. Channels beyond the
    /// prepared channel count have no filter state and are silenced.
    pub fn process(&mut self, buffer: &mut AudioBuffer<f32>) {
        let num_channels = match self.spec {
            Some(spec) => spec.num_channels,
            None => return,
        };
        let _no_denormals = NoDenormals::new();

        for channel in num_channels..buffer.channels() {
            buffer.clear_channel(channel);
        }

        self.sync_parameters();
        self.kernel.process(buffer);
    }

    /// A handle for raising mode selection events from any thread.
    pub fn mode_selector(&self) -> ModeSelector {
        ModeSelector::new(self.kernel.mode_control())
    }

    /// Values last pushed into the kernel.
    pub fn snapshot(&self) -> FilterSnapshot {
        self.snapshot
    }

    /// The owned kernel.
    pub fn kernel(&self) -> &K {
        &self.kernel
    }

    /// The owned kernel, mutably.
    pub fn kernel_mut(&mut self) -> &mut K {
        &mut self.kernel
    }

    /// The store this core reads from.
    pub fn store(&self) -> &Arc<ParameterStore> {
        &self.store
    }
}
