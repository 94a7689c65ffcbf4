//! Editor support.
//!
//! [`FilterEditor`] is the control model behind the plugin's window: it owns the state of the three
//! sliders and the mode selector, writes user gestures into the parameter store, and pulls
//! external changes (automation, state restore) back into its controls on `idle`. It draws
//! nothing; a windowing layer renders its values. The same model runs with no window at all.

use std::ffi::c_void;
use std::sync::Arc;

use crate::mode::{FilterMode, ModeSelector};
use crate::params::ParameterId;
use crate::store::ParameterStore;

/// Implemented by plugin editors.
pub trait Editor: Send {
    /// Size of the editor window in pixels.
    fn size(&self) -> (i32, i32);

    /// Position of the editor window.
    fn position(&self) -> (i32, i32);

    /// Open inside `parent`, a platform window handle (e.g. `HWND` on Windows). Returns whether
    /// the editor opened.
    fn open(&mut self, parent: *mut c_void) -> bool;

    /// Close the editor window.
    fn close(&mut self);

    /// Whether the window is currently open.
    fn is_open(&self) -> bool;

    /// Periodic call from the host's UI thread.
    fn idle(&mut self);
}

/// Editor window size.
pub const EDITOR_SIZE: (i32, i32) = (400, 400);

/// The plugin's control model.
pub struct FilterEditor {
    store: Arc<ParameterStore>,
    selector: ModeSelector,
    controls: [f32; ParameterId::COUNT],
    open: bool,
}

impl FilterEditor {
    /// A model bound to `store`, raising selection events through `selector`.
    pub fn new(store: Arc<ParameterStore>, selector: ModeSelector) -> FilterEditor {
        let controls = store.values();
        FilterEditor {
            store,
            selector,
            controls,
            open: false,
        }
    }

    /// Value a control currently shows.
    pub fn control(&self, id: ParameterId) -> f32 {
        self.controls[id.index()]
    }

    /// Mode the selector currently shows.
    pub fn selected_mode(&self) -> FilterMode {
        FilterMode::from_choice(self.control(ParameterId::Type).round() as i32)
    }

    /// The user moved a slider. Takes effect in the kernel at the next block.
    pub fn set_control(&mut self, id: ParameterId, value: f32) {
        if id == ParameterId::Type {
            self.select_mode(value.round() as i32);
            return;
        }
        if let Some(stored) = self.store.set(id, value) {
            self.controls[id.index()] = stored;
        }
    }

    /// The user picked entry `choice` (1-indexed) in the mode selector.
    ///
    /// The mode goes into the kernel immediately; the choice is stored so the host sees it.
    pub fn select_mode(&mut self, choice: i32) -> FilterMode {
        let mode = self.selector.select(choice);
        self.store.set(ParameterId::Type, mode.choice() as f32);
        self.controls[ParameterId::Type.index()] = mode.choice() as f32;
        debug!("Mode selected: {} (choice {})", mode, choice);
        mode
    }

    /// Pull changed store values into the controls.
    ///
    /// A changed mode choice is raised as a selection event, so a restored or automated mode
    /// reaches the kernel even if nothing else pushed it.
    pub fn rehydrate(&mut self) {
        let mut mode_changed = None;
        for (id, value) in self.store.changed(true) {
            self.controls[id.index()] = value;
            if id == ParameterId::Type {
                mode_changed = Some(value);
            }
        }

        if let Some(choice) = mode_changed {
            let mode = self.selector.select(choice.round() as i32);
            trace!("Rehydrated mode selector: {}", mode);
        }
    }
}

impl Editor for FilterEditor {
    fn size(&self) -> (i32, i32) {
        EDITOR_SIZE
    }

    fn position(&self) -> (i32, i32) {
        (0, 0)
    }

    fn open(&mut self, _parent: *mut c_void) -> bool {
        // Controls may be stale if the window was closed during automation.
        self.controls = self.store.values();
        self.open = true;
        true
    }

    fn close(&mut self) {
        self.open = false;
    }

    fn is_open(&self) -> bool {
        self.open
    }

    fn idle(&mut self) {
        self.rehydrate();
    }
}
