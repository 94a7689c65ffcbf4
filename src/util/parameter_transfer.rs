use std::sync::atomic::{AtomicUsize, Ordering};

use super::AtomicFloat;

const WORD_BITS: usize = usize::BITS as usize;

/// A fixed set of `f32` values shared between threads, each with a "changed since last read" bit.
///
/// Writers call [`set`](ParameterTransfer::set) from any thread. Readers either load a single value
/// with [`get`](ParameterTransfer::get) (one relaxed atomic load, safe on the audio thread) or drain
/// the changed set with [`changed`](ParameterTransfer::changed).
///
/// At most `usize::BITS` slots are supported, which keeps the change mask in one word.
pub struct ParameterTransfer {
    values: Box<[AtomicFloat]>,
    changed: AtomicUsize,
}

impl ParameterTransfer {
    /// Create a transfer with one slot per entry of `initial`. No slot starts out changed.
    pub fn new(initial: &[f32]) -> Self {
        assert!(initial.len() <= WORD_BITS, "too many slots for a single change word");
        ParameterTransfer {
            values: initial.iter().map(|&v| AtomicFloat::new(v)).collect(),
            changed: AtomicUsize::new(0),
        }
    }

    /// Store `value` in slot `index` and flag it as changed.
    pub fn set(&self, index: usize, value: f32) {
        self.values[index].set(value);
        self.changed.fetch_or(1 << index, Ordering::AcqRel);
    }

    /// Current value of slot `index`.
    #[inline]
    pub fn get(&self, index: usize) -> f32 {
        self.values[index].get()
    }

    /// Iterate over the slots flagged as changed, in increasing index order, yielding
    /// `(index, value)`. With `acquire` set, every yielded slot has its flag cleared.
    ///
    /// A value written concurrently with the iteration is never lost: its flag is either
    /// observed now or left set for the next drain. A burst of writes to one slot may be
    /// reported once, with the latest value.
    pub fn changed(&self, acquire: bool) -> Changed<'_> {
        Changed {
            transfer: self,
            next: 0,
            acquire,
        }
    }
}

/// Iterator over changed slots, returned by [`ParameterTransfer::changed`].
pub struct Changed<'pt> {
    transfer: &'pt ParameterTransfer,
    next: usize,
    acquire: bool,
}

impl<'pt> Iterator for Changed<'pt> {
    type Item = (usize, f32);

    fn next(&mut self) -> Option<(usize, f32)> {
        if self.next >= self.transfer.values.len() {
            return None;
        }

        let pending = self.transfer.changed.load(Ordering::Acquire) >> self.next;
        if pending == 0 {
            self.next = self.transfer.values.len();
            return None;
        }

        let index = self.next + pending.trailing_zeros() as usize;
        if index >= self.transfer.values.len() {
            self.next = index;
            return None;
        }
        if self.acquire {
            self.transfer.changed.fetch_and(!(1 << index), Ordering::AcqRel);
        }
        self.next = index + 1;

        Some((index, self.transfer.get(index)))
    }
}
