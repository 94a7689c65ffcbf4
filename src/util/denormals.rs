#[cfg(target_arch = "x86")]
use std::arch::x86::{_mm_getcsr, _mm_setcsr};
#[cfg(target_arch = "x86_64")]
use std::arch::x86_64::{_mm_getcsr, _mm_setcsr};

#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
const FTZ: u32 = 1 << 15;
#[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
const DAZ: u32 = 1 << 6;

/// Flushes subnormal floats to zero on the current thread for as long as it lives.
///
/// Sets FTZ and DAZ in the SSE control register and puts the previous register back on drop. On
/// other targets it does nothing; kernels still keep their own state out of the subnormal range.
pub struct NoDenormals {
    #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
    previous: u32,
}

impl NoDenormals {
    /// Enter a no-denormals scope.
    #[inline]
    #[allow(deprecated)]
    pub fn new() -> NoDenormals {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        {
            // SAFETY: only the FTZ/DAZ bits change, and the old register is restored on drop.
            let previous = unsafe { _mm_getcsr() };
            unsafe { _mm_setcsr(previous | FTZ | DAZ) };
            return NoDenormals { previous };
        }
        #[cfg(not(any(target_arch = "x86", target_arch = "x86_64")))]
        {
            NoDenormals {}
        }
    }
}

impl Default for NoDenormals {
    fn default() -> NoDenormals {
        NoDenormals::new()
    }
}

impl Drop for NoDenormals {
    #[inline]
    #[allow(deprecated)]
    fn drop(&mut self) {
        #[cfg(any(target_arch = "x86", target_arch = "x86_64"))]
        unsafe {
            _mm_setcsr(self.previous);
        }
    }
}
