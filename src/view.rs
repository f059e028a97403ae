//! Per-area view registry.
//!
//! Each functional area owns a pair of side panels. The top and bottom bars
//! are shared by every area, so they live on the [`ScreenConfiguration`]
//! itself and a view only carries the panels that differ.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::{
    labels::FunctionKeys,
    screen::{FunctionalState, ScreenConfiguration},
};

/// Side panels bound to one functional area.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ViewDescriptor {
    pub state: FunctionalState,
    pub left: FunctionKeys,
    pub right: FunctionKeys,
}

/// Views registered at power-on, read-only afterwards.
#[derive(Clone, Debug, Default)]
pub struct ViewRegistry {
    views: BTreeMap<FunctionalState, ViewDescriptor>,
}

impl ViewRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the panels for `state`, replacing any earlier registration.
    pub fn add_view(&mut self, state: FunctionalState, left: FunctionKeys, right: FunctionKeys) {
        if self.views.insert(state, ViewDescriptor { state, left, right }).is_some() {
            warn!(?state, "view registered twice, keeping the latest");
        }
    }

    pub fn get(&self, state: FunctionalState) -> Option<&ViewDescriptor> {
        self.views.get(&state)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.views.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.views.is_empty()
    }

    /// Copy the panels for `state` onto `screen` and make it current.
    ///
    /// Returns false and leaves the screen alone if nothing is registered.
    pub fn apply(&self, state: FunctionalState, screen: &mut ScreenConfiguration) -> bool {
        let Some(view) = self.views.get(&state) else {
            warn!(?state, "no view registered");
            return false;
        };
        screen.left.clone_from(&view.left);
        screen.right.clone_from(&view.right);
        screen.current = state;
        debug!(?state, "view applied");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{defaults, labels::LabelState};

    #[test]
    fn test_apply_copies_panels() {
        let mut views = ViewRegistry::new();
        let (left, right) = defaults::systems();
        views.add_view(FunctionalState::Systems, left.clone(), right.clone());

        let mut screen = defaults::screen();
        assert!(views.apply(FunctionalState::Systems, &mut screen));
        assert_eq!(screen.left, left);
        assert_eq!(screen.right, right);
        assert_eq!(screen.current, FunctionalState::Systems);
    }

    #[test]
    fn test_apply_restores_defaults_after_edits() {
        let mut views = ViewRegistry::new();
        let (left, right) = defaults::alarms();
        views.add_view(FunctionalState::Alarms, left, right);

        let mut screen = defaults::screen();
        views.apply(FunctionalState::Alarms, &mut screen);
        screen.left.set_text(0, "Sort.Descending");
        screen.left.set_state(1, LabelState::Hidden);
        views.apply(FunctionalState::Alarms, &mut screen);
        assert_eq!(screen.left.text(0), "Sort.Ascending", "registry copy untouched");
        assert_eq!(screen.left.state(1), Some(LabelState::Enabled));
    }

    #[test]
    fn test_apply_unknown_state_is_noop() {
        let views = ViewRegistry::new();
        let mut screen = defaults::screen();
        let before = screen.left.clone();
        assert!(!views.apply(FunctionalState::Weapon, &mut screen));
        assert_eq!(screen.current, FunctionalState::Off);
        assert_eq!(screen.left, before);
    }

    #[test]
    fn test_shared_bars_survive_apply() {
        let mut views = ViewRegistry::new();
        defaults::register_views(&mut views, true);
        let mut screen = defaults::screen();
        screen.top.set_enabled(0);
        views.apply(FunctionalState::Weapon, &mut screen);
        assert_eq!(screen.top.state(0), Some(LabelState::EnabledSelected), "top bar is not per view");
        assert_eq!(views.len(), 9);
    }
}
