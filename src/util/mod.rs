//! Lock-free building blocks shared by the parameter store and the processing core.

mod atomic_float;
mod denormals;
mod parameter_transfer;
pub mod test_util;

pub use self::atomic_float::AtomicFloat;
pub use self::denormals::NoDenormals;
pub use self::parameter_transfer::{Changed, ParameterTransfer};
