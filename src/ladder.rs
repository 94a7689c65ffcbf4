//! A transistor ladder filter: five cascaded one-pole stages with saturating feedback.
//!
//! Each sample runs through
//!
//! ```text
//! dx = gain * tanh(drive * input)
//! a  = dx - 4 * res * (gain2 * tanh(drive2 * s[4]) - comp * dx)
//! b..e = one-pole stages, each fed by the previous stage's output
//! out = mix[mode] . (a, b, c, d, e)
//! ```
//!
//! Taking different weighted sums of the stage outputs gives the six modes: the 12 dB/oct modes
//! use the first two stages, the 24 dB/oct modes all four. Feedback is saturated independently of
//! the input, so resonance keeps its character at high drive.

use std::f64::consts::PI;
use std::sync::Arc;

use crate::buffer::AudioBuffer;
use crate::kernel::{FilterKernel, ProcessSpec};
use crate::mode::{FilterMode, ModeControl};

const STAGES: usize = 5;

// Output scaling shared by all modes.
const MIX_GAIN: f32 = 1.2;

// Stage values below this are flushed to zero, far above the subnormal range.
const SILENCE: f32 = 1e-20;

#[inline]
fn flush(x: f32) -> f32 {
    if x.abs() < SILENCE {
        0.0
    } else {
        x
    }
}

/// Stage weights and feedback compensation of one mode.
fn mix(mode: FilterMode) -> ([f32; STAGES], f32) {
    let (weights, comp) = match mode {
        FilterMode::Lpf12 => ([0.0, 0.0, 1.0, 0.0, 0.0], 0.5),
        FilterMode::Hpf12 => ([1.0, -2.0, 1.0, 0.0, 0.0], 0.0),
        FilterMode::Bpf12 => ([0.0, 0.0, -1.0, 1.0, 0.0], 0.5),
        FilterMode::Lpf24 => ([0.0, 0.0, 0.0, 0.0, 1.0], 0.5),
        FilterMode::Hpf24 => ([1.0, -4.0, 6.0, -4.0, 1.0], 0.0),
        FilterMode::Bpf24 => ([0.0, 0.0, 1.0, -2.0, 1.0], 0.5),
    };
    let mut scaled = [0.0; STAGES];
    for (s, w) in scaled.iter_mut().zip(weights.iter()) {
        *s = w * MIX_GAIN;
    }
    (scaled, comp)
}

/// Gain compensation for a given drive, keeping perceived level roughly constant.
fn drive_gain(drive: f32) -> f32 {
    drive.powf(-2.642) * 0.6103 + 0.3903
}

/// A stereo-or-more ladder filter.
pub struct LadderFilter {
    mode: Arc<ModeControl>,
    enabled: bool,

    sample_rate: f64,
    // One set of stage states per channel, sized on prepare.
    state: Vec<[f32; STAGES]>,

    cutoff_hz: f32,
    // exp(-2 pi fc / fs): the one-pole feedback coefficient.
    cutoff_coeff: f32,
    resonance: f32,
    scaled_resonance: f32,
    drive: f32,
    drive2: f32,
    gain: f32,
    gain2: f32,
}

impl LadderFilter {
    /// A filter in `Lpf12` mode with neutral settings. Call `prepare` before processing.
    pub fn new() -> LadderFilter {
        let mut filter = LadderFilter {
            mode: Arc::new(ModeControl::default()),
            enabled: false,
            sample_rate: ProcessSpec::default().sample_rate,
            state: Vec::new(),
            cutoff_hz: 200.0,
            cutoff_coeff: 0.0,
            resonance: 0.0,
            scaled_resonance: 0.0,
            drive: 1.0,
            drive2: 1.0,
            gain: 1.0,
            gain2: 1.0,
        };
        filter.update_cutoff();
        filter.set_resonance(0.0);
        filter.set_drive(1.0);
        filter
    }

    /// Cutoff frequency currently in effect.
    pub fn cutoff_hz(&self) -> f32 {
        self.cutoff_hz
    }

    /// Resonance currently in effect.
    pub fn resonance(&self) -> f32 {
        self.resonance
    }

    /// Drive currently in effect.
    pub fn drive(&self) -> f32 {
        self.drive
    }

    /// Mode currently in effect.
    pub fn mode(&self) -> FilterMode {
        self.mode.get()
    }

    /// Whether processing is switched on.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn update_cutoff(&mut self) {
        let nyquist_guard = self.sample_rate * 0.49;
        let fc = f64::from(self.cutoff_hz).min(nyquist_guard);
        self.cutoff_coeff = (-2.0 * PI * fc / self.sample_rate).exp() as f32;
    }

    #[inline]
    fn tick(&self, s: &mut [f32; STAGES], input: f32, weights: &[f32; STAGES], comp: f32) -> f32 {
        let a1 = self.cutoff_coeff;
        let g = 1.0 - a1;
        let b0 = g * 0.769_230_77;
        let b1 = g * 0.230_769_23;

        let dx = self.gain * (self.drive * input).tanh();
        let a = dx - 4.0 * self.scaled_resonance * (self.gain2 * (self.drive2 * s[4]).tanh() - dx * comp);

        let b = b1 * s[0] + a1 * s[1] + b0 * a;
        let c = b1 * s[1] + a1 * s[2] + b0 * b;
        let d = b1 * s[2] + a1 * s[3] + b0 * c;
        let e = b1 * s[3] + a1 * s[4] + b0 * d;

        // A decaying tail settles on exact zero instead of crawling through subnormals.
        let (a, b, c, d, e) = (flush(a), flush(b), flush(c), flush(d), flush(e));
        *s = [a, b, c, d, e];

        a * weights[0] + b * weights[1] + c * weights[2] + d * weights[3] + e * weights[4]
    }
}

impl Default for LadderFilter {
    fn default() -> LadderFilter {
        LadderFilter::new()
    }
}

impl FilterKernel for LadderFilter {
    fn prepare(&mut self, spec: &ProcessSpec) {
        self.sample_rate = spec.sample_rate;
        self.state = vec![[0.0; STAGES]; spec.num_channels];
        self.update_cutoff();
    }

    fn reset(&mut self) {
        for s in self.state.iter_mut() {
            *s = [0.0; STAGES];
        }
    }

    fn set_enabled(&mut self, enabled: bool) {
        if enabled != self.enabled {
            self.reset();
        }
        self.enabled = enabled;
    }

    fn set_cutoff_hz(&mut self, cutoff_hz: f32) {
        self.cutoff_hz = cutoff_hz;
        self.update_cutoff();
    }

    fn set_resonance(&mut self, resonance: f32) {
        self.resonance = resonance;
        // Map 0..1 onto 0.1..1 of the feedback path.
        self.scaled_resonance = 0.1 + resonance * 0.9;
    }

    fn set_drive(&mut self, drive: f32) {
        self.drive = drive;
        self.gain = drive_gain(drive);
        self.drive2 = drive * 0.04 + 0.96;
        self.gain2 = drive_gain(self.drive2);
    }

    fn mode_control(&self) -> Arc<ModeControl> {
        Arc::clone(&self.mode)
    }

    /// Filters the first `num_channels` channels of the last `prepare`. Any channel past those
    /// has no state and is left as it is.
    fn process(&mut self, buffer: &mut AudioBuffer<f32>) {
        if !self.enabled {
            return;
        }

        // Mode is read once per block; a concurrent selection lands on the next block.
        let (weights, comp) = mix(self.mode.get());

        let mut state = std::mem::take(&mut self.state);
        for (channel, s) in buffer.iter_mut().zip(state.iter_mut()) {
            for sample in channel.iter_mut() {
                *sample = self.tick(s, *sample, &weights, comp);
            }
        }
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::LadderFilter;
    use crate::buffer::AudioBuffer;
    use crate::kernel::{FilterKernel, ProcessSpec};
    use crate::mode::FilterMode;
    use crate::util::test_util::assert_all_finite;

    const RATE: f64 = 44100.0;

    fn prepared(mode: FilterMode, cutoff: f32) -> LadderFilter {
        let mut filter = LadderFilter::new();
        filter.prepare(&ProcessSpec {
            sample_rate: RATE,
            max_block_size: 512,
            num_channels: 1,
        });
        filter.set_enabled(true);
        filter.set_mode(mode);
        filter.set_cutoff_hz(cutoff);
        filter
    }

    fn sine(freq: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|n| (2.0 * std::f32::consts::PI * freq * n as f32 / RATE as f32).sin() * 0.5)
            .collect()
    }

    fn rms(samples: &[f32]) -> f32 {
        (samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32).sqrt()
    }

    fn run(filter: &mut LadderFilter, mut samples: Vec<f32>) -> Vec<f32> {
        {
            let mut channels = [samples.as_mut_slice()];
            let mut buffer = AudioBuffer::new(&mut channels);
            filter.process(&mut buffer);
        }
        samples
    }

    #[test]
    fn disabled_filter_passes_audio_through() {
        let mut filter = LadderFilter::new();
        filter.prepare(&ProcessSpec::default());
        let input = sine(440.0, 256);
        assert_eq!(run(&mut filter, input.clone()), input);
    }

    #[test]
    fn low_pass_attenuates_above_cutoff() {
        let mut filter = prepared(FilterMode::Lpf24, 200.0);
        let out = run(&mut filter, sine(5000.0, 4096));
        assert!(rms(&out[2048..]) < 0.01 * rms(&sine(5000.0, 4096)));
    }

    #[test]
    fn high_pass_attenuates_below_cutoff() {
        let mut filter = prepared(FilterMode::Hpf24, 5000.0);
        let low = run(&mut filter, sine(100.0, 8192));
        let mut filter = prepared(FilterMode::Hpf24, 5000.0);
        let high = run(&mut filter, sine(15000.0, 8192));
        assert!(rms(&low[4096..]) < 0.1 * rms(&high[4096..]));
    }

    #[test]
    fn steeper_mode_attenuates_more() {
        let mut two_pole = prepared(FilterMode::Lpf12, 500.0);
        let mut four_pole = prepared(FilterMode::Lpf24, 500.0);
        let a = run(&mut two_pole, sine(8000.0, 4096));
        let b = run(&mut four_pole, sine(8000.0, 4096));
        assert!(rms(&b[2048..]) < rms(&a[2048..]));
    }

    #[test]
    fn output_stays_finite_at_extremes() {
        for mode in FilterMode::ALL {
            let mut filter = prepared(mode, 20000.0);
            filter.set_resonance(0.75);
            filter.set_drive(10.0);
            let out = run(&mut filter, sine(3000.0, 2048));
            assert_all_finite(&out);
        }
    }

    #[test]
    fn block_size_does_not_change_output() {
        let input = sine(1234.0, 1024);

        let mut whole = prepared(FilterMode::Bpf12, 800.0);
        let expected = run(&mut whole, input.clone());

        let mut split = prepared(FilterMode::Bpf12, 800.0);
        let mut got = Vec::new();
        for chunk in input.chunks(100) {
            got.extend(run(&mut split, chunk.to_vec()));
        }
        assert_eq!(got, expected);
    }

    #[test]
    fn silent_tail_never_goes_subnormal() {
        for mode in FilterMode::ALL {
            let mut filter = prepared(mode, 200.0);
            filter.set_resonance(0.5);

            let mut impulse = vec![0.0; 512];
            impulse[0] = 0.5;
            run(&mut filter, impulse);

            let mut last = Vec::new();
            for _ in 0..400 {
                last = run(&mut filter, vec![0.0; 512]);
                assert!(last.iter().all(|s| !s.is_subnormal()), "{} went subnormal", mode);
            }
            assert!(last.iter().all(|s| *s == 0.0), "{} never settled", mode);
        }
    }

    #[test]
    fn mode_switch_through_shared_control() {
        let filter = prepared(FilterMode::Lpf12, 1000.0);
        let control = filter.mode_control();
        control.set(FilterMode::Hpf12);
        assert_eq!(filter.mode(), FilterMode::Hpf12);
    }
}
