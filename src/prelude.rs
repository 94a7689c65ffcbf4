//! A collection of commonly used items for driving or embedding the effect.

#[doc(no_inline)]
pub use crate::buffer::AudioBuffer;
#[doc(no_inline)]
pub use crate::channels::{BusLayout, ChannelSet};
#[doc(no_inline)]
pub use crate::editor::{Editor, FilterEditor};
#[doc(no_inline)]
pub use crate::effect::{LadderEffect, LadderParameters};
#[doc(no_inline)]
pub use crate::event::{Event, MidiEvent};
#[doc(no_inline)]
pub use crate::kernel::{FilterKernel, ProcessSpec};
#[doc(no_inline)]
pub use crate::mode::{FilterMode, ModeSelector};
#[doc(no_inline)]
pub use crate::params::ParameterId;
#[doc(no_inline)]
pub use crate::plugin::{CanDo, Category, Info, Plugin, PluginParameters, Supported};
#[doc(no_inline)]
pub use crate::util::{AtomicFloat, ParameterTransfer};
