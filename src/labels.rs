//! Control-panel label banks and their state helpers.
//!
//! Every bezel key has a matching on-screen label. A label's [`LabelState`]
//! decides how it is drawn and whether it reacts to touch:
//!
//! - `Hidden` and `Disabled` are sticky. Only explicit assignment changes them.
//! - `Enabled`, `EnabledSelected` and `EnabledSelectedChanging` are moved between
//!   by the helpers below, and the `reset_*` helpers only ever demote.
//!
//! Three banks exist on screen:
//!
//! - [`FunctionSelect`]: the 8 area-select labels across the top.
//! - [`FunctionKeys`]: 6 labels down each side (F1..F6 left, F7..F12 right).
//! - [`CommonTaskKeys`]: the 8 task labels along the bottom (F13..F20).

use tracing::warn;

/// Maximum label text length in bytes.
pub const LABEL_TEXT_LEN: usize = 32;

/// Fixed-capacity label text.
pub type LabelText = heapless::String<LABEL_TEXT_LEN>;

/// Build label text, truncating at a character boundary when too long.
pub fn label_text(s: &str) -> LabelText {
    let mut text = LabelText::new();
    for c in s.chars() {
        if text.push(c).is_err() {
            break;
        }
    }
    text
}

// =============================================================================
// Label State
// =============================================================================

/// Per-slot label state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
pub enum LabelState {
    Hidden,
    Disabled,
    #[default]
    Enabled,
    EnabledSelected,
    EnabledSelectedChanging,
}

impl LabelState {
    /// Visible and accepting input.
    #[inline]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Disabled | Self::Hidden)
    }

    /// Select this slot unless it is disabled or hidden.
    #[inline]
    pub fn select(&mut self) {
        if self.is_active() {
            *self = Self::EnabledSelected;
        }
    }

    /// Enter the transient "key held" state unless disabled or hidden.
    #[inline]
    pub fn begin_change(&mut self) {
        if self.is_active() {
            *self = Self::EnabledSelectedChanging;
        }
    }

    /// Demote any selection back to `Enabled`.
    #[inline]
    pub fn reset_enabled(&mut self) {
        if matches!(self, Self::EnabledSelected | Self::EnabledSelectedChanging) {
            *self = Self::Enabled;
        }
    }

    /// Demote `EnabledSelected` only.
    #[inline]
    pub fn reset_enabled_selected(&mut self) {
        if *self == Self::EnabledSelected {
            *self = Self::Enabled;
        }
    }

    /// Demote `EnabledSelectedChanging` only.
    #[inline]
    pub fn reset_enabled_selected_changing(&mut self) {
        if *self == Self::EnabledSelectedChanging {
            *self = Self::Enabled;
        }
    }
}

/// Label visibility mode, cycled by the labels key (F19).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum LabelMode {
    /// All labels, the status bar and the compass are shown.
    #[default]
    All,
    /// Only the status bar remains.
    StatusOnly,
    /// Nothing but the canvas.
    Minimal,
}

impl LabelMode {
    /// Next mode in the All → StatusOnly → Minimal → All cycle.
    #[inline]
    pub const fn next(self) -> Self {
        match self {
            Self::All => Self::StatusOnly,
            Self::StatusOnly => Self::Minimal,
            Self::Minimal => Self::All,
        }
    }
}

// =============================================================================
// Label Slots
// =============================================================================

/// Anything carrying a [`LabelState`].
pub trait Slot {
    fn state(&self) -> LabelState;
    fn state_mut(&mut self) -> &mut LabelState;
}

/// A plain text label (top bar and bottom bar).
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TextLabel {
    pub state: LabelState,
    pub text: LabelText,
}

impl TextLabel {
    pub fn new(state: LabelState, text: &str) -> Self {
        Self { state, text: label_text(text) }
    }
}

impl Slot for TextLabel {
    #[inline]
    fn state(&self) -> LabelState {
        self.state
    }

    #[inline]
    fn state_mut(&mut self) -> &mut LabelState {
        &mut self.state
    }
}

/// A side-panel function key label with an optional two-way toggle.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct FunctionKeyLabel {
    pub state: LabelState,
    pub text: LabelText,
    /// Draw the toggle boxes under the text.
    pub toggle_active: bool,
    /// Which toggle box is lit (first when true).
    pub toggle_on: bool,
    pub toggle_text1: LabelText,
    pub toggle_text2: LabelText,
}

impl FunctionKeyLabel {
    pub fn new(state: LabelState, text: &str) -> Self {
        Self { state, text: label_text(text), ..Self::default() }
    }

    /// Label with a toggle pair such as "On"/"Off".
    pub fn with_toggle(state: LabelState, text: &str, on: &str, off: &str, toggle_on: bool) -> Self {
        Self {
            state,
            text: label_text(text),
            toggle_active: true,
            toggle_on,
            toggle_text1: label_text(on),
            toggle_text2: label_text(off),
        }
    }
}

impl Slot for FunctionKeyLabel {
    #[inline]
    fn state(&self) -> LabelState {
        self.state
    }

    #[inline]
    fn state_mut(&mut self) -> &mut LabelState {
        &mut self.state
    }
}

// =============================================================================
// Label Banks
// =============================================================================

/// A fixed-size bank of label slots.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Bank<T, const N: usize> {
    pub visible: bool,
    pub labels: [T; N],
}

/// Top bar: 8 area-select labels.
pub type FunctionSelect = Bank<TextLabel, 8>;

/// Left or right side panel: 6 function key labels.
pub type FunctionKeys = Bank<FunctionKeyLabel, 6>;

/// Bottom bar: 8 common task labels.
pub type CommonTaskKeys = Bank<TextLabel, 8>;

impl<T: Slot, const N: usize> Bank<T, N> {
    pub const fn new(labels: [T; N]) -> Self {
        Self { visible: true, labels }
    }

    /// Number of slots in the bank.
    #[inline]
    pub const fn len(&self) -> usize {
        N
    }

    /// Always false; banks have a fixed non-zero size.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// State of slot `i`, or `None` when out of range.
    #[inline]
    pub fn state(&self, i: usize) -> Option<LabelState> {
        self.labels.get(i).map(Slot::state)
    }

    /// Assign a state outright. The only way out of Hidden/Disabled.
    pub fn set_state(&mut self, i: usize, state: LabelState) {
        if let Some(slot) = self.slot_mut(i) {
            *slot.state_mut() = state;
        }
    }

    /// Slot `i` is neither hidden nor disabled.
    pub fn active(&self, i: usize) -> bool {
        self.state(i).is_some_and(LabelState::is_active)
    }

    /// Demote every slot then select slot `i`.
    pub fn set_enabled(&mut self, i: usize) {
        self.reset_all_enabled();
        if let Some(slot) = self.slot_mut(i) {
            slot.state_mut().select();
        }
    }

    /// Put slot `i` into the transient "key held" state.
    pub fn set_enabled_changing(&mut self, i: usize) {
        if let Some(slot) = self.slot_mut(i) {
            slot.state_mut().begin_change();
        }
    }

    /// Demote every selected or changing slot to `Enabled`. Idempotent.
    pub fn reset_all_enabled(&mut self) {
        for label in &mut self.labels {
            label.state_mut().reset_enabled();
        }
    }

    /// Demote every `EnabledSelected` slot and make the bank visible.
    pub fn reset_all_enabled_selected(&mut self) {
        self.visible = true;
        for label in &mut self.labels {
            label.state_mut().reset_enabled_selected();
        }
    }

    /// Demote every `EnabledSelectedChanging` slot.
    pub fn reset_all_enabled_selected_changing(&mut self) {
        for label in &mut self.labels {
            label.state_mut().reset_enabled_selected_changing();
        }
    }

    fn slot_mut(&mut self, i: usize) -> Option<&mut T> {
        let slot = self.labels.get_mut(i);
        if slot.is_none() {
            warn!(slot = i, size = N, "label slot out of range");
        }
        slot
    }
}

impl<const N: usize> Bank<TextLabel, N> {
    /// Text of slot `i` (empty when out of range).
    pub fn text(&self, i: usize) -> &str {
        self.labels.get(i).map_or("", |l| l.text.as_str())
    }

    pub fn set_text(&mut self, i: usize, text: &str) {
        if let Some(slot) = self.slot_mut(i) {
            slot.text = label_text(text);
        }
    }
}

impl FunctionKeys {
    /// Text of slot `i` (empty when out of range).
    pub fn text(&self, i: usize) -> &str {
        self.labels.get(i).map_or("", |l| l.text.as_str())
    }

    pub fn set_text(&mut self, i: usize, text: &str) {
        if let Some(slot) = self.slot_mut(i) {
            slot.text = label_text(text);
        }
    }

    /// Flip the toggle of slot `i` if it has one.
    pub fn toggle(&mut self, i: usize) {
        if let Some(slot) = self.slot_mut(i)
            && slot.toggle_active
        {
            slot.toggle_on = !slot.toggle_on;
        }
    }
}

impl CommonTaskKeys {
    /// Enter the changing state after demoting any other selection.
    ///
    /// The bottom bar only ever shows one pressed key at a time.
    pub fn set_enabled_changing_exclusive(&mut self, i: usize) {
        self.reset_all_enabled_selected();
        self.set_enabled_changing(i);
    }

    /// Select slot `i` without touching the others.
    pub fn set_enabled_selected(&mut self, i: usize) {
        if let Some(slot) = self.slot_mut(i) {
            slot.state.select();
        }
    }

    /// Force slot `i` to `Enabled`, even from Hidden or Disabled.
    pub fn force_enabled(&mut self, i: usize) {
        self.set_state(i, LabelState::Enabled);
    }

    /// Force slot `i` to `Disabled`.
    pub fn set_disabled(&mut self, i: usize) {
        self.set_state(i, LabelState::Disabled);
    }
}
