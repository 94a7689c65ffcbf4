//! Host-facing plugin interface.
//!
//! This is the capability set a format adapter (VST, CLAP, a test host) binds to. It knows nothing
//! about any particular plugin ABI.

use std::str::FromStr;
use std::sync::Arc;

use crate::buffer::AudioBuffer;
use crate::channels::BusLayout;
use crate::editor::Editor;
use crate::error::LayoutError;
use crate::event::Event;
use crate::kernel::ProcessSpec;

/// Plugin type. Only used by the host to categorize the plugin.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Category {
    /// Unknown / not implemented
    Unknown,
    /// Any effect
    Effect,
    /// Instrument
    Synth,
    /// Scope, tuner, spectrum analyser, etc.
    Analysis,
    /// Dynamics, etc.
    Mastering,
    /// Tone generator, etc.
    Generator,
}

/// Static plugin information.
#[derive(Clone, Debug)]
pub struct Info {
    /// Plugin name.
    pub name: String,

    /// Plugin vendor.
    pub vendor: String,

    /// Number of presets.
    pub presets: i32,

    /// Number of parameters.
    pub parameters: i32,

    /// Number of main input channels.
    pub inputs: i32,

    /// Number of main output channels.
    pub outputs: i32,

    /// Unique plugin ID, used by hosts to match saved state to a plugin.
    pub unique_id: i32,

    /// Plugin version (e.g. 0001 = `v0.0.0.1`, 1283 = `v1.2.8.3`).
    pub version: i32,

    /// Plugin category.
    pub category: Category,

    /// Latency of the plugin in samples.
    pub initial_delay: i32,

    /// State is exchanged as an opaque chunk (`get_state`/`set_state`) rather than by reading
    /// and writing parameters one by one.
    pub preset_chunks: bool,

    /// Whether this plugin can process `f64` buffers.
    pub f64_precision: bool,

    /// If this is true, the plugin will not produce sound when the input is silence.
    pub silent_when_stopped: bool,
}

impl Default for Info {
    fn default() -> Info {
        Info {
            name: "Plugin".to_string(),
            vendor: String::new(),

            presets: 1, // hosts cope badly with zero
            parameters: 0,
            inputs: 2, // stereo in, out
            outputs: 2,

            unique_id: 0, // must be changed
            version: 1,

            category: Category::Effect,

            initial_delay: 0,

            preset_chunks: false,
            f64_precision: false,
            silent_when_stopped: false,
        }
    }
}

/// Answer to a [`CanDo`] query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Supported {
    /// Feature is supported.
    Yes,
    /// Feature may be supported.
    Maybe,
    /// Feature is not supported.
    No,
}

/// Features a host may ask about at run time.
#[derive(Clone, Debug, PartialEq, Eq)]
#[allow(missing_docs)]
pub enum CanDo {
    SendEvents,
    SendMidiEvent,
    ReceiveEvents,
    ReceiveMidiEvent,
    ReceiveTimeInfo,
    Offline,
    Bypass,

    Other(String),
}

impl FromStr for CanDo {
    type Err = String;

    fn from_str(s: &str) -> Result<CanDo, String> {
        use self::CanDo::*;

        Ok(match s {
            "sendEvents" => SendEvents,
            "sendMidiEvent" => SendMidiEvent,
            "receiveEvents" => ReceiveEvents,
            "receiveMidiEvent" => ReceiveMidiEvent,
            "receiveTimeInfo" => ReceiveTimeInfo,
            "offline" => Offline,
            "bypass" => Bypass,
            otherwise => Other(otherwise.to_string()),
        })
    }
}

/// Implemented by every plugin.
///
/// All methods except `get_info`, `prepare`, `process` and `get_parameter_object` have a default
/// implementation.
#[allow(unused_variables)]
pub trait Plugin: Send {
    /// Static information about this plugin.
    fn get_info(&self) -> Info;

    /// Called once the host has finished creating the instance.
    fn init(&mut self) {
        trace!("Initialized plugin.");
    }

    /// Whether the plugin can run with `layout`. Called before `prepare`.
    fn check_layout(&self, layout: &BusLayout) -> Result<(), LayoutError> {
        Ok(())
    }

    /// Configure for playback. Called before the first `process` and whenever sample rate, block
    /// size or channel count change.
    fn prepare(&mut self, spec: ProcessSpec);

    /// Playback stopped; the next `process` will be preceded by `prepare`.
    fn release_resources(&mut self) {}

    /// Process one block in place. `events` are the host events for this block.
    ///
    /// Runs on the real-time thread: must not block, lock or allocate.
    fn process(&mut self, buffer: &mut AudioBuffer<f32>, events: &[Event]);

    /// The parameter object, shared with the host and the editor.
    fn get_parameter_object(&mut self) -> Arc<dyn PluginParameters>;

    /// Whether the plugin supports `can_do`.
    fn can_do(&self, can_do: CanDo) -> Supported {
        info!("Host is asking if plugin can: {:?}.", can_do);
        Supported::Maybe
    }

    /// Length of the output tail after the input falls silent, in seconds.
    fn get_tail_seconds(&self) -> f64 {
        0.0
    }

    /// The editor, if the plugin has one. Hosts may also run the plugin headless.
    fn get_editor(&mut self) -> Option<Box<dyn Editor>> {
        None
    }
}

/// Parameter access shared between the host, the editor and the plugin.
///
/// Every method takes `&self` and may be called from any thread, concurrently with `process`.
#[allow(unused_variables)]
pub trait PluginParameters: Send + Sync {
    /// Unit label for parameter `index` (e.g. "Hz", "dB").
    fn get_parameter_label(&self, index: i32) -> String {
        "".to_string()
    }

    /// Display text for the current value of parameter `index` (e.g. "2000", "LPF24").
    fn get_parameter_text(&self, index: i32) -> String {
        format!("{:.3}", self.get_parameter(index))
    }

    /// Name of parameter `index`.
    fn get_parameter_name(&self, index: i32) -> String {
        format!("Param {}", index)
    }

    /// Normalized `0..=1` value of parameter `index`.
    fn get_parameter(&self, index: i32) -> f32 {
        0.0
    }

    /// Write parameter `index` from a normalized `0..=1` value.
    fn set_parameter(&self, index: i32, value: f32) {}

    /// Whether parameter `index` can be automated.
    fn can_be_automated(&self, index: i32) -> bool {
        false
    }

    /// Set parameter `index` from user text. Returns whether the text was used.
    fn string_to_parameter(&self, index: i32, text: String) -> bool {
        false
    }

    /// Serialize the full plugin state into an opaque blob.
    fn get_state(&self) -> Vec<u8> {
        Vec::new()
    }

    /// Restore state from a blob produced by `get_state`. A blob that cannot be used is ignored.
    fn set_state(&self, data: &[u8]) {}
}
