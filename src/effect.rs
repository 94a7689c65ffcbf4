//! The ladder filter effect: parameter store, processing core and editor wired together.

use std::sync::Arc;

use crate::buffer::AudioBuffer;
use crate::channels::BusLayout;
use crate::editor::{Editor, FilterEditor};
use crate::error::LayoutError;
use crate::event::Event;
use crate::kernel::{FilterKernel, ProcessSpec};
use crate::ladder::LadderFilter;
use crate::mode::{FilterMode, ModeSelector};
use crate::params::{ParameterFlags, ParameterId};
use crate::plugin::{CanDo, Category, Info, Plugin, PluginParameters, Supported};
use crate::processor::FilterProcessor;
use crate::state;
use crate::store::ParameterStore;

/// Host-visible parameters of the effect.
///
/// Shared between the host, the editor and the audio thread. Continuous writes land in the store
/// and reach the kernel at the next block; mode writes reach the kernel at once.
pub struct LadderParameters {
    store: Arc<ParameterStore>,
    selector: ModeSelector,
}

impl LadderParameters {
    /// Parameters over `store`, raising mode selections through `selector`.
    pub fn new(store: Arc<ParameterStore>, selector: ModeSelector) -> LadderParameters {
        LadderParameters { store, selector }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<ParameterStore> {
        &self.store
    }

    /// Raw value of `id`.
    pub fn get_value(&self, id: ParameterId) -> f32 {
        self.store.get(id)
    }

    /// Write `id` in raw units. A write to the mode is a selection event.
    pub fn set_value(&self, id: ParameterId, value: f32) {
        match id {
            ParameterId::Type => {
                if !value.is_nan() {
                    self.select_mode(value.round() as i32);
                }
            }
            _ => {
                self.store.set(id, value);
            }
        }
    }

    /// Raise a mode selection event for `choice` (1-indexed). Unknown choices select `Lpf12`.
    pub fn select_mode(&self, choice: i32) -> FilterMode {
        let mode = self.selector.select(choice);
        self.store.set(ParameterId::Type, mode.choice() as f32);
        mode
    }

    /// Mode the kernel runs with right now.
    pub fn current_mode(&self) -> FilterMode {
        self.selector.current()
    }
}

impl PluginParameters for LadderParameters {
    fn get_parameter_label(&self, index: i32) -> String {
        ParameterId::from_index(index)
            .map(|id| id.info().label.to_string())
            .unwrap_or_default()
    }

    fn get_parameter_text(&self, index: i32) -> String {
        match ParameterId::from_index(index) {
            Some(id) => id.info().format(self.store.get(id)),
            None => "".to_string(),
        }
    }

    fn get_parameter_name(&self, index: i32) -> String {
        ParameterId::from_index(index)
            .map(|id| id.info().name.to_string())
            .unwrap_or_default()
    }

    fn get_parameter(&self, index: i32) -> f32 {
        match ParameterId::from_index(index) {
            Some(id) => self.store.get_normalized(id),
            None => 0.0,
        }
    }

    fn set_parameter(&self, index: i32, value: f32) {
        let id = match ParameterId::from_index(index) {
            Some(id) => id,
            None => return,
        };
        if id.info().flags.contains(ParameterFlags::SELECTION) {
            if !value.is_nan() {
                let choice = id.info().range.from_normalized(value);
                self.select_mode(choice as i32);
            }
        } else {
            self.store.set_normalized(id, value);
        }
    }

    fn can_be_automated(&self, index: i32) -> bool {
        ParameterId::from_index(index)
            .map(|id| id.info().flags.contains(ParameterFlags::AUTOMATABLE))
            .unwrap_or(false)
    }

    fn string_to_parameter(&self, index: i32, text: String) -> bool {
        let id = match ParameterId::from_index(index) {
            Some(id) => id,
            None => return false,
        };
        match id.info().parse(&text) {
            Some(value) => {
                self.set_value(id, value);
                true
            }
            None => false,
        }
    }

    fn get_state(&self) -> Vec<u8> {
        match state::save(&self.store) {
            Ok(blob) => {
                debug!("Saved state ({} bytes).", blob.len());
                blob
            }
            Err(e) => {
                error!("Could not serialize state: {}", e);
                Vec::new()
            }
        }
    }

    fn set_state(&self, data: &[u8]) {
        match state::restore(&self.store, data) {
            Ok(()) => {
                // Push the restored mode now for an instance that is already playing. An instance
                // prepared later keeps it too, since the restore is flagged on the store.
                let mode = self.selector.select(self.store.get(ParameterId::Type).round() as i32);
                info!("Restored state ({} bytes), mode {}.", data.len(), mode);
            }
            Err(e) => warn!("Ignoring state blob: {}", e),
        }
    }
}

/// Resonant ladder filter effect.
pub struct LadderEffect<K: FilterKernel = LadderFilter> {
    params: Arc<LadderParameters>,
    processor: FilterProcessor<K>,
}

impl LadderEffect<LadderFilter> {
    /// An effect with default parameters and the built-in ladder kernel.
    pub fn new() -> LadderEffect<LadderFilter> {
        LadderEffect::with_kernel(LadderFilter::new())
    }
}

impl Default for LadderEffect<LadderFilter> {
    fn default() -> LadderEffect<LadderFilter> {
        LadderEffect::new()
    }
}

impl<K: FilterKernel> LadderEffect<K> {
    /// An effect driving `kernel`.
    pub fn with_kernel(kernel: K) -> LadderEffect<K> {
        let store = Arc::new(ParameterStore::new());
        let processor = FilterProcessor::new(Arc::clone(&store), kernel);
        let params = Arc::new(LadderParameters::new(store, processor.mode_selector()));
        trace!("Created ladder effect.");
        LadderEffect { params, processor }
    }

    /// The shared parameter object.
    pub fn parameters(&self) -> &Arc<LadderParameters> {
        &self.params
    }

    /// The processing core.
    pub fn processor(&self) -> &FilterProcessor<K> {
        &self.processor
    }
}

impl<K: FilterKernel> Plugin for LadderEffect<K> {
    fn get_info(&self) -> Info {
        Info {
            name: "Ladder Filter".to_string(),
            vendor: "Ladder FX".to_string(),
            unique_id: 0x4C64_4678,
            version: 100,

            parameters: ParameterId::COUNT as i32,
            inputs: 2,
            outputs: 2,
            category: Category::Effect,

            preset_chunks: true,

            ..Info::default()
        }
    }

    fn check_layout(&self, layout: &BusLayout) -> Result<(), LayoutError> {
        let result = layout.check_mono_or_stereo();
        match result {
            Ok(()) => debug!("Accepting {}-channel layout.", layout.output.size()),
            Err(ref e) => info!("Refusing layout: {}", e),
        }
        result
    }

    fn prepare(&mut self, spec: ProcessSpec) {
        self.processor.prepare(spec);
    }

    fn release_resources(&mut self) {
        self.processor.release();
    }

    fn process(&mut self, buffer: &mut AudioBuffer<f32>, _events: &[Event]) {
        self.processor.process(buffer);
    }

    fn get_parameter_object(&mut self) -> Arc<dyn PluginParameters> {
        Arc::clone(&self.params) as Arc<dyn PluginParameters>
    }

    fn can_do(&self, can_do: CanDo) -> Supported {
        match can_do {
            // MIDI is accepted so hosts can route it, but never consumed.
            CanDo::ReceiveEvents | CanDo::ReceiveMidiEvent => Supported::Maybe,
            _ => Supported::No,
        }
    }

    fn get_editor(&mut self) -> Option<Box<dyn Editor>> {
        Some(Box::new(FilterEditor::new(
            Arc::clone(self.params.store()),
            self.processor.mode_selector(),
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::LadderEffect;
    use crate::mode::FilterMode;
    use crate::params::ParameterId;
    use crate::plugin::{Plugin, PluginParameters};
    use crate::util::test_util::{assert_f32_equal, CountingKernel};

    #[test]
    fn host_surface_names_and_labels() {
        let mut effect = LadderEffect::with_kernel(CountingKernel::default());
        let params = effect.get_parameter_object();

        let names: Vec<_> = (0..4).map(|i| params.get_parameter_name(i)).collect();
        assert_eq!(names, ["Cutoff", "Resonance", "Drive", "Type"]);
        assert_eq!(params.get_parameter_label(0), "Hz");
        assert_eq!(params.get_parameter_text(0), "2000");
        assert_eq!(params.get_parameter_text(3), "LPF12");
        assert_eq!(params.get_parameter_name(9), "");
        assert!(params.can_be_automated(3));
        assert!(!params.can_be_automated(4));
    }

    #[test]
    fn normalized_writes_use_the_ranges() {
        let effect = LadderEffect::with_kernel(CountingKernel::default());
        let params = effect.parameters();

        params.set_parameter(1, 1.0);
        assert_eq!(params.get_value(ParameterId::Resonance), 0.75);
        params.set_parameter(2, 0.0);
        assert_eq!(params.get_value(ParameterId::Drive), 1.0);
        params.set_parameter(0, 1.0);
        assert_f32_equal(params.get_parameter(0), 1.0);
    }

    #[test]
    fn host_mode_write_is_immediate() {
        let effect = LadderEffect::with_kernel(CountingKernel::default());
        let params = effect.parameters();

        params.set_parameter(3, 1.0);
        assert_eq!(params.current_mode(), FilterMode::Bpf24);
        assert_eq!(effect.processor().kernel().current_mode(), FilterMode::Bpf24);
        assert_eq!(params.get_parameter_text(3), "BPF24");
    }

    #[test]
    fn text_entry() {
        let effect = LadderEffect::with_kernel(CountingKernel::default());
        let params = effect.parameters();

        assert!(params.string_to_parameter(0, "440 Hz".to_string()));
        assert_eq!(params.get_value(ParameterId::Cutoff), 440.0);
        assert!(params.string_to_parameter(3, "hpf24".to_string()));
        assert_eq!(params.current_mode(), FilterMode::Hpf24);
        assert!(!params.string_to_parameter(2, "loud".to_string()));
        assert!(!params.string_to_parameter(7, "1".to_string()));
    }
}
