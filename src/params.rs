//! The parameter layout: identifiers, ranges, defaults and display formatting.

use std::fmt;
use std::str::FromStr;

use crate::mode::FilterMode;

bitflags! {
    /// Capabilities of one parameter as advertised to the host.
    pub struct ParameterFlags: u32 {
        /// The host may record and play back automation for this parameter.
        const AUTOMATABLE = 1;
        /// The parameter takes whole-numbered steps only.
        const DISCRETE = 1 << 1;
        /// Moving this parameter is a mode selection, applied immediately.
        const SELECTION = 1 << 2;
    }
}

/// The four host-visible parameters, in host index order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParameterId {
    /// Cutoff frequency in Hz.
    Cutoff,
    /// Feedback amount.
    Resonance,
    /// Input gain into the saturating stages.
    Drive,
    /// Filter mode, as a 1-indexed choice.
    Type,
}

impl ParameterId {
    /// Number of parameters.
    pub const COUNT: usize = 4;

    /// All parameters in host index order.
    pub const ALL: [ParameterId; ParameterId::COUNT] = [
        ParameterId::Cutoff,
        ParameterId::Resonance,
        ParameterId::Drive,
        ParameterId::Type,
    ];

    /// Host index of this parameter.
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Parameter at host index `index`, if any.
    pub fn from_index(index: i32) -> Option<ParameterId> {
        usize::try_from(index)
            .ok()
            .and_then(|i| ParameterId::ALL.get(i).copied())
    }

    /// Stable identifier, also used as the key in persisted state.
    pub fn as_str(self) -> &'static str {
        match self {
            ParameterId::Cutoff => "CUTOFF",
            ParameterId::Resonance => "RESONANCE",
            ParameterId::Drive => "DRIVE",
            ParameterId::Type => "TYPE",
        }
    }

    /// Static description of this parameter.
    pub fn info(self) -> ParameterInfo {
        match self {
            ParameterId::Cutoff => ParameterInfo {
                id: self,
                name: "Cutoff",
                label: "Hz",
                range: ParameterRange::new(20.0, 20000.0).with_interval(1.0).with_skew(0.2),
                default: 2000.0,
                flags: ParameterFlags::AUTOMATABLE,
            },
            ParameterId::Resonance => ParameterInfo {
                id: self,
                name: "Resonance",
                label: "",
                range: ParameterRange::new(0.0, 0.75),
                default: 0.0,
                flags: ParameterFlags::AUTOMATABLE,
            },
            ParameterId::Drive => ParameterInfo {
                id: self,
                name: "Drive",
                label: "x",
                range: ParameterRange::new(1.0, 10.0),
                default: 1.0,
                flags: ParameterFlags::AUTOMATABLE,
            },
            ParameterId::Type => ParameterInfo {
                id: self,
                name: "Type",
                label: "",
                range: ParameterRange::new(1.0, 6.0).with_interval(1.0),
                default: FilterMode::default().choice() as f32,
                flags: ParameterFlags::AUTOMATABLE
                    | ParameterFlags::DISCRETE
                    | ParameterFlags::SELECTION,
            },
        }
    }
}

impl fmt::Display for ParameterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterId {
    type Err = String;

    fn from_str(s: &str) -> Result<ParameterId, String> {
        ParameterId::ALL
            .iter()
            .copied()
            .find(|id| id.as_str() == s)
            .ok_or_else(|| format!("unknown parameter `{}`", s))
    }
}

/// Maps a raw engineering value to the host's normalized `0..=1` control range and back.
///
/// `interval` snaps values coming from the normalized side to a grid (0 disables snapping).
/// `skew` bends the normalized curve: below 1 it spends more of the control travel on the low
/// end. Neither affects values written in raw units.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterRange {
    /// Lowest raw value.
    pub start: f32,
    /// Highest raw value.
    pub end: f32,
    /// Snapping grid for normalized writes.
    pub interval: f32,
    /// Exponent applied to the normalized proportion.
    pub skew: f32,
}

impl ParameterRange {
    /// A linear range without snapping.
    pub const fn new(start: f32, end: f32) -> ParameterRange {
        ParameterRange {
            start,
            end,
            interval: 0.0,
            skew: 1.0,
        }
    }

    /// Same range, snapping normalized writes to multiples of `interval` above `start`.
    pub const fn with_interval(mut self, interval: f32) -> ParameterRange {
        self.interval = interval;
        self
    }

    /// Same range with a skewed normalized curve.
    pub const fn with_skew(mut self, skew: f32) -> ParameterRange {
        self.skew = skew;
        self
    }

    /// Clamp `value` into `start..=end`.
    pub fn clamp(&self, value: f32) -> f32 {
        value.max(self.start).min(self.end)
    }

    /// Snap `value` to the interval grid, then clamp.
    pub fn snap(&self, value: f32) -> f32 {
        if self.interval > 0.0 {
            let steps = ((value - self.start) / self.interval).round();
            self.clamp(self.start + steps * self.interval)
        } else {
            self.clamp(value)
        }
    }

    /// Raw value to normalized `0..=1`.
    pub fn to_normalized(&self, value: f32) -> f32 {
        let proportion = ((self.clamp(value) - self.start) / (self.end - self.start)).max(0.0).min(1.0);
        if self.skew == 1.0 {
            proportion
        } else {
            proportion.powf(self.skew)
        }
    }

    /// Normalized `0..=1` to a snapped raw value.
    pub fn from_normalized(&self, normalized: f32) -> f32 {
        let mut proportion = normalized.max(0.0).min(1.0);
        if self.skew != 1.0 && proportion > 0.0 {
            proportion = proportion.powf(1.0 / self.skew);
        }
        self.snap(self.start + (self.end - self.start) * proportion)
    }
}

/// Static description of one parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterInfo {
    /// Identifier.
    pub id: ParameterId,
    /// Display name.
    pub name: &'static str,
    /// Unit label, possibly empty.
    pub label: &'static str,
    /// Raw value range.
    pub range: ParameterRange,
    /// Raw default value.
    pub default: f32,
    /// Host-facing capabilities.
    pub flags: ParameterFlags,
}

impl ParameterInfo {
    /// Format a raw value for display, without the unit label.
    pub fn format(&self, value: f32) -> String {
        match self.id {
            ParameterId::Cutoff => format!("{:.0}", value),
            ParameterId::Resonance | ParameterId::Drive => format!("{:.2}", value),
            ParameterId::Type => FilterMode::from_choice(value.round() as i32).label().to_string(),
        }
    }

    /// Parse user text into a raw value. Accepts a number, an optional trailing unit label and,
    /// for the mode parameter, a mode label.
    pub fn parse(&self, text: &str) -> Option<f32> {
        let text = text.trim();
        if self.id == ParameterId::Type {
            if let Some(mode) = FilterMode::from_label(text) {
                return Some(mode.choice() as f32);
            }
        }

        let number = if self.label.is_empty() {
            text
        } else {
            text.strip_suffix(self.label).unwrap_or(text).trim_end()
        };
        number.parse::<f32>().ok().filter(|v| v.is_finite())
    }
}

#[cfg(test)]
mod tests {
    use super::{ParameterFlags, ParameterId, ParameterRange};
    use crate::util::test_util::{assert_f32_equal, assert_f32_near};

    #[test]
    fn layout_matches_host_contract() {
        let cutoff = ParameterId::Cutoff.info();
        assert_eq!((cutoff.range.start, cutoff.range.end, cutoff.default), (20.0, 20000.0, 2000.0));

        let res = ParameterId::Resonance.info();
        assert_eq!((res.range.start, res.range.end, res.default), (0.0, 0.75, 0.0));

        let drive = ParameterId::Drive.info();
        assert_eq!((drive.range.start, drive.range.end, drive.default), (1.0, 10.0, 1.0));

        let ty = ParameterId::Type.info();
        assert_eq!(ty.default, 1.0);
        assert!(ty.flags.contains(ParameterFlags::DISCRETE | ParameterFlags::SELECTION));
    }

    #[test]
    fn index_and_identifier_lookup() {
        for (i, id) in ParameterId::ALL.iter().enumerate() {
            assert_eq!(id.index(), i);
            assert_eq!(ParameterId::from_index(i as i32), Some(*id));
            assert_eq!(id.as_str().parse::<ParameterId>(), Ok(*id));
        }
        assert_eq!(ParameterId::from_index(4), None);
        assert_eq!(ParameterId::from_index(-1), None);
        assert!("GAIN".parse::<ParameterId>().is_err());
    }

    #[test]
    fn skewed_range_spends_travel_on_low_end() {
        let range = ParameterId::Cutoff.info().range;
        // A fifth of the way up the raw range sits well above the midpoint of the control.
        assert!(range.to_normalized(4016.0) > 0.7);
        assert_f32_equal(range.to_normalized(20.0), 0.0);
        assert_f32_equal(range.to_normalized(20000.0), 1.0);
        assert_eq!(range.from_normalized(0.0), 20.0);
        assert_eq!(range.from_normalized(1.0), 20000.0);
    }

    #[test]
    fn normalized_writes_snap_to_interval() {
        let range = ParameterId::Cutoff.info().range;
        let raw = range.from_normalized(0.5);
        assert_eq!(raw, raw.round());

        let ty = ParameterId::Type.info().range;
        assert_eq!(ty.from_normalized(0.0), 1.0);
        assert_eq!(ty.from_normalized(0.6), 4.0);
        assert_eq!(ty.from_normalized(1.0), 6.0);
    }

    #[test]
    fn normalized_round_trip_is_close() {
        let range = ParameterRange::new(1.0, 10.0);
        for raw in [1.0f32, 2.5, 7.25, 10.0] {
            assert_f32_near(range.from_normalized(range.to_normalized(raw)), raw, 1e-5);
        }
    }

    #[test]
    fn formats_and_parses_text() {
        let cutoff = ParameterId::Cutoff.info();
        assert_eq!(cutoff.format(2000.4), "2000");
        assert_eq!(cutoff.parse("500 Hz"), Some(500.0));
        assert_eq!(cutoff.parse("abc"), None);

        let ty = ParameterId::Type.info();
        assert_eq!(ty.format(4.0), "LPF24");
        assert_eq!(ty.parse("hpf12"), Some(2.0));
        assert_eq!(ty.parse("3"), Some(3.0));
    }
}
