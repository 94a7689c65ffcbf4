use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

/// A lock-free `f32` cell shared between the control thread and the audio thread.
///
/// Every access is a single relaxed load or store of the value's bit pattern, so reading from the
/// audio callback is wait-free. There is no change notification here; see
/// [`ParameterTransfer`](super::ParameterTransfer) for that.
pub struct AtomicFloat {
    bits: AtomicU32,
}

impl AtomicFloat {
    /// New atomic float from a raw `f32` bit pattern.
    pub const fn from_bits(bits: u32) -> AtomicFloat {
        AtomicFloat {
            bits: AtomicU32::new(bits),
        }
    }

    /// New atomic float holding `value`.
    pub fn new(value: f32) -> AtomicFloat {
        AtomicFloat::from_bits(value.to_bits())
    }

    /// Current value.
    #[inline]
    pub fn get(&self) -> f32 {
        f32::from_bits(self.bits.load(Ordering::Relaxed))
    }

    /// Overwrite the value.
    #[inline]
    pub fn set(&self, value: f32) {
        self.bits.store(value.to_bits(), Ordering::Relaxed)
    }
}

impl Default for AtomicFloat {
    fn default() -> Self {
        AtomicFloat::from_bits(0)
    }
}

impl fmt::Debug for AtomicFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.get(), f)
    }
}

impl fmt::Display for AtomicFloat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.get(), f)
    }
}
