//! Channel sets and bus layout negotiation.
//!
//! The host proposes a layout before `prepare` is ever called. This is the only place where the
//! plugin refuses something rather than recovering silently.

use std::fmt;

use crate::error::LayoutError;

/// The channel set of one bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChannelSet {
    /// Bus is switched off.
    Disabled,
    /// One channel.
    Mono,
    /// Left and right.
    Stereo,
    /// Any other channel count, without speaker semantics.
    Discrete(usize),
}

impl ChannelSet {
    /// Build a set from a bare channel count.
    pub fn from_count(count: usize) -> ChannelSet {
        match count {
            0 => ChannelSet::Disabled,
            1 => ChannelSet::Mono,
            2 => ChannelSet::Stereo,
            n => ChannelSet::Discrete(n),
        }
    }

    /// Number of channels in this set.
    pub fn size(&self) -> usize {
        match *self {
            ChannelSet::Disabled => 0,
            ChannelSet::Mono => 1,
            ChannelSet::Stereo => 2,
            ChannelSet::Discrete(n) => n,
        }
    }
}

impl fmt::Display for ChannelSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            ChannelSet::Disabled => f.write_str("disabled"),
            ChannelSet::Mono => f.write_str("mono"),
            ChannelSet::Stereo => f.write_str("stereo"),
            ChannelSet::Discrete(n) => write!(f, "{} discrete channels", n),
        }
    }
}

/// The main input and output bus proposed by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BusLayout {
    /// Main input bus.
    pub input: ChannelSet,
    /// Main output bus.
    pub output: ChannelSet,
}

impl BusLayout {
    /// Same channel set on input and output.
    pub fn symmetric(set: ChannelSet) -> BusLayout {
        BusLayout {
            input: set,
            output: set,
        }
    }

    /// Mono in, mono out.
    pub fn mono() -> BusLayout {
        BusLayout::symmetric(ChannelSet::Mono)
    }

    /// Stereo in, stereo out.
    pub fn stereo() -> BusLayout {
        BusLayout::symmetric(ChannelSet::Stereo)
    }

    /// Accept mono or stereo output with an identical input; refuse everything else.
    pub fn check_mono_or_stereo(&self) -> Result<(), LayoutError> {
        match self.output {
            ChannelSet::Mono | ChannelSet::Stereo => {}
            other => return Err(LayoutError::UnsupportedOutput(other)),
        }

        if self.input != self.output {
            return Err(LayoutError::Mismatched {
                input: self.input,
                output: self.output,
            });
        }

        Ok(())
    }
}

impl Default for BusLayout {
    fn default() -> BusLayout {
        BusLayout::stereo()
    }
}

#[cfg(test)]
mod tests {
    use super::{BusLayout, ChannelSet};
    use crate::error::LayoutError;

    #[test]
    fn accepts_mono_and_stereo() {
        assert!(BusLayout::mono().check_mono_or_stereo().is_ok());
        assert!(BusLayout::stereo().check_mono_or_stereo().is_ok());
    }

    #[test]
    fn refuses_surround_output() {
        let layout = BusLayout::symmetric(ChannelSet::from_count(6));
        match layout.check_mono_or_stereo() {
            Err(LayoutError::UnsupportedOutput(ChannelSet::Discrete(6))) => {}
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn refuses_mismatched_buses() {
        let layout = BusLayout {
            input: ChannelSet::Mono,
            output: ChannelSet::Stereo,
        };
        match layout.check_mono_or_stereo() {
            Err(LayoutError::Mismatched { input, output }) => {
                assert_eq!(input, ChannelSet::Mono);
                assert_eq!(output, ChannelSet::Stereo);
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn disabled_output_is_unsupported() {
        let layout = BusLayout::symmetric(ChannelSet::Disabled);
        assert!(layout.check_mono_or_stereo().is_err());
    }

    #[test]
    fn counts_round_trip() {
        for n in 0..8 {
            assert_eq!(ChannelSet::from_count(n).size(), n);
        }
    }
}
