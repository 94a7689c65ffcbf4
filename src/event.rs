//! Events the host may deliver alongside an audio block.
//!
//! The filter accepts MIDI input so that hosts can route it, but no event changes its output.

/// A host event attached to one block.
#[derive(Copy, Clone, Debug)]
pub enum Event<'a> {
    /// A short MIDI message.
    Midi(MidiEvent),

    /// A system exclusive message. Interpreting the payload is up to the receiver.
    SysEx(SysExEvent<'a>),
}

/// A short MIDI message.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct MidiEvent {
    /// Raw status and data bytes.
    pub data: [u8; 3],

    /// Number of samples into the current block at which this event occurs.
    ///
    /// E.g. with a block size of 512 and a value of 123, the event lands on `samples[123]`.
    pub delta_frames: i32,

    /// Played live rather than by the host sequencer.
    pub live: bool,
}

/// A system exclusive message.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SysExEvent<'a> {
    /// The SysEx payload.
    pub payload: &'a [u8],

    /// Number of samples into the current block at which this event occurs.
    pub delta_frames: i32,
}
