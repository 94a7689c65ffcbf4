//! The parameter store shared between the control thread and the audio thread.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::params::{ParameterFlags, ParameterId};
use crate::util::ParameterTransfer;

/// Current raw values of all parameters.
///
/// One writer (host automation or the editor) and one reader (the audio callback) share the store
/// without locks: a read is a single relaxed atomic load and a write is a single atomic store plus
/// a change flag. Every write is clamped into the parameter's range, and discrete parameters are
/// snapped to their grid.
pub struct ParameterStore {
    transfer: ParameterTransfer,
    // Set by a state restore, consumed by the next prepare.
    restore_pending: AtomicBool,
}

impl ParameterStore {
    /// A store holding every parameter's default.
    pub fn new() -> ParameterStore {
        ParameterStore {
            transfer: ParameterTransfer::new(&defaults()),
            restore_pending: AtomicBool::new(false),
        }
    }

    /// Raw value of `id`. Wait-free; safe to call from the audio callback.
    #[inline]
    pub fn get(&self, id: ParameterId) -> f32 {
        self.transfer.get(id.index())
    }

    /// Write the raw value of `id`, clamped into its range. Discrete parameters are also snapped
    /// to their interval, so a mode choice is always a whole number.
    ///
    /// NaN is refused and leaves the stored value untouched. Returns the value actually stored.
    pub fn set(&self, id: ParameterId, value: f32) -> Option<f32> {
        if value.is_nan() {
            warn!("Ignoring NaN written to parameter {}.", id);
            return None;
        }
        let info = id.info();
        let value = if info.flags.contains(ParameterFlags::DISCRETE) {
            info.range.snap(value)
        } else {
            info.range.clamp(value)
        };
        self.transfer.set(id.index(), value);
        Some(value)
    }

    /// Value of `id` on the host's normalized `0..=1` scale.
    pub fn get_normalized(&self, id: ParameterId) -> f32 {
        id.info().range.to_normalized(self.get(id))
    }

    /// Write `id` from the host's normalized `0..=1` scale.
    pub fn set_normalized(&self, id: ParameterId, normalized: f32) -> Option<f32> {
        if normalized.is_nan() {
            warn!("Ignoring NaN written to parameter {}.", id);
            return None;
        }
        self.set(id, id.info().range.from_normalized(normalized))
    }

    /// All raw values, in host index order.
    pub fn values(&self) -> [f32; ParameterId::COUNT] {
        let mut values = [0.0; ParameterId::COUNT];
        for id in ParameterId::ALL {
            values[id.index()] = self.get(id);
        }
        values
    }

    /// Overwrite every parameter at once. Each value is clamped like a single write.
    pub fn replace(&self, values: &[f32; ParameterId::COUNT]) {
        for id in ParameterId::ALL {
            self.set(id, values[id.index()]);
        }
    }

    /// Flag that the values now in the store came from a state restore.
    pub fn mark_restored(&self) {
        self.restore_pending.store(true, Ordering::Release);
    }

    /// Whether a restore happened since the last call; clears the flag.
    pub fn take_restored(&self) -> bool {
        self.restore_pending.swap(false, Ordering::AcqRel)
    }

    /// Parameters written since their change flag was last cleared, with their current values.
    /// With `acquire` set, the reported flags are cleared.
    pub fn changed(&self, acquire: bool) -> impl Iterator<Item = (ParameterId, f32)> + '_ {
        self.transfer
            .changed(acquire)
            .map(|(index, value)| (ParameterId::ALL[index], value))
    }
}

impl Default for ParameterStore {
    fn default() -> ParameterStore {
        ParameterStore::new()
    }
}

/// Default raw values, in host index order.
pub fn defaults() -> [f32; ParameterId::COUNT] {
    let mut values = [0.0; ParameterId::COUNT];
    for id in ParameterId::ALL {
        values[id.index()] = id.info().default;
    }
    values
}

#[cfg(test)]
mod tests {
    use super::{defaults, ParameterStore};
    use crate::params::ParameterId;

    #[test]
    fn starts_at_defaults_with_nothing_changed() {
        let store = ParameterStore::new();
        assert_eq!(store.values(), [2000.0, 0.0, 1.0, 1.0]);
        assert_eq!(store.changed(false).count(), 0);
    }

    #[test]
    fn writes_are_clamped() {
        let store = ParameterStore::new();
        assert_eq!(store.set(ParameterId::Cutoff, 5.0), Some(20.0));
        assert_eq!(store.set(ParameterId::Resonance, 2.0), Some(0.75));
        assert_eq!(store.set(ParameterId::Drive, 0.0), Some(1.0));
        assert_eq!(store.get(ParameterId::Drive), 1.0);
    }

    #[test]
    fn nan_is_refused() {
        let store = ParameterStore::new();
        store.set(ParameterId::Drive, 4.0);
        assert_eq!(store.set(ParameterId::Drive, f32::NAN), None);
        assert_eq!(store.set_normalized(ParameterId::Drive, f32::NAN), None);
        assert_eq!(store.get(ParameterId::Drive), 4.0);
    }

    #[test]
    fn raw_writes_are_not_snapped() {
        let store = ParameterStore::new();
        store.set(ParameterId::Cutoff, 500.25);
        assert_eq!(store.get(ParameterId::Cutoff), 500.25);
    }

    #[test]
    fn discrete_writes_are_snapped() {
        let store = ParameterStore::new();
        assert_eq!(store.set(ParameterId::Type, 2.4), Some(2.0));
        assert_eq!(store.set(ParameterId::Type, 4.6), Some(5.0));
        assert_eq!(store.set(ParameterId::Type, 40.0), Some(6.0));
        assert_eq!(store.get(ParameterId::Type), 6.0);
    }

    #[test]
    fn restore_flag_is_taken_once() {
        let store = ParameterStore::new();
        assert!(!store.take_restored());
        store.mark_restored();
        assert!(store.take_restored());
        assert!(!store.take_restored());
    }

    #[test]
    fn change_flags_drain() {
        let store = ParameterStore::new();
        store.set(ParameterId::Type, 4.0);
        store.set(ParameterId::Cutoff, 300.0);

        let changed: Vec<_> = store.changed(true).collect();
        assert_eq!(changed, vec![(ParameterId::Cutoff, 300.0), (ParameterId::Type, 4.0)]);
        assert_eq!(store.changed(true).count(), 0);
    }

    #[test]
    fn replace_clamps_and_snaps_each_value() {
        let store = ParameterStore::new();
        store.replace(&[5.0, 2.0, 0.0, 2.4]);
        assert_eq!(store.values(), [20.0, 0.75, 1.0, 2.0]);

        store.replace(&defaults());
        assert_eq!(store.values(), ParameterStore::new().values());
    }
}
