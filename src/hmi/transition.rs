//! Pure mode transitions.
//!
//! [`transition`] decides where an event leads and which entry, exit and key
//! actions run, in order, without touching the screen. [`Hmi`](super::Hmi)
//! applies the effects.
//!
//! | Event | From | To |
//! |-------|------|----|
//! | `PowerOn` | any | `On`, then `Systems` |
//! | `PowerOff` | any but `Off` | `Off` |
//! | `Select(area)` | any but `Off` | `area` |
//! | `Alarms` | any area | `Alarms` |
//! | `Alarms` | `Alarms` | previous area, else `Systems` |
//! | `Key(NextLabel)` / `Key(PreviousLabel)` | an area | neighbouring area, none past the ends |
//! | `Key(other)` | any but `Off`/`On` | unchanged, key handled |

use crate::{keys::Key, screen::FunctionalState};

/// Most effects a single event produces.
pub const MAX_EFFECTS: usize = 4;

/// Events the mode state machine reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HmiEvent {
    PowerOn,
    PowerOff,
    /// One of the eight area-select keys.
    Select(FunctionalState),
    /// Toggle the alarms overlay.
    Alarms,
    /// Any other key, handled by the current state.
    Key(Key),
}

impl HmiEvent {
    /// Event for an area-select key, `None` for every other key.
    pub fn area(key: Key) -> Option<Self> {
        key.area_index().and_then(FunctionalState::from_slot).map(Self::Select)
    }
}

/// The machine's own state: where it is and the area the alarms overlay returns to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeState {
    pub current: FunctionalState,
    pub last_area: Option<FunctionalState>,
}

impl ModeState {
    pub const fn off() -> Self {
        Self { current: FunctionalState::Off, last_area: None }
    }

    const fn goto(self, next: FunctionalState) -> Self {
        let last_area = if next.top_slot().is_some() { Some(next) } else { self.last_area };
        Self { current: next, last_area }
    }
}

impl Default for ModeState {
    fn default() -> Self {
        Self::off()
    }
}

/// One action the controller performs while applying a transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Effect {
    Exit(FunctionalState),
    Enter(FunctionalState),
    /// Run the state's key handler.
    HandleKey(FunctionalState, Key),
    /// The event means nothing here.
    Ignored,
}

pub type Effects = heapless::Vec<Effect, MAX_EFFECTS>;

/// Result of [`transition`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub next: ModeState,
    pub effects: Effects,
}

impl Transition {
    fn stay(state: ModeState, effects: &[Effect]) -> Self {
        Self { next: state, effects: collect(effects) }
    }

    fn ignored(state: ModeState) -> Self {
        Self::stay(state, &[Effect::Ignored])
    }

    /// Leave the current state and enter `next`.
    fn change(state: ModeState, next: FunctionalState, before: &[Effect]) -> Self {
        let mut effects = collect(before);
        for effect in [Effect::Exit(state.current), Effect::Enter(next)] {
            if effects.push(effect).is_err() {
                break;
            }
        }
        Self { next: state.goto(next), effects }
    }

    /// True when the state changed.
    pub fn moved(&self, from: ModeState) -> bool {
        self.next.current != from.current
    }
}

fn collect(effects: &[Effect]) -> Effects {
    effects.iter().copied().take(MAX_EFFECTS).collect()
}

/// Where `event` leads from `state`.
pub fn transition(state: ModeState, event: HmiEvent) -> Transition {
    use FunctionalState as S;

    match (state.current, event) {
        // Power-on runs the bootstrap, which always lands in Systems
        (S::Off, HmiEvent::PowerOn) => {
            let effects = collect(&[Effect::Enter(S::On), Effect::Exit(S::On), Effect::Enter(S::Systems)]);
            Transition { next: state.goto(S::Systems), effects }
        }
        (current, HmiEvent::PowerOn) => {
            let effects = collect(&[
                Effect::Exit(current),
                Effect::Enter(S::On),
                Effect::Exit(S::On),
                Effect::Enter(S::Systems),
            ]);
            Transition { next: ModeState::off().goto(S::Systems), effects }
        }
        (S::Off, _) => Transition::ignored(state),
        (_, HmiEvent::PowerOff) => Transition { next: ModeState::off(), effects: collect(&[Effect::Exit(state.current), Effect::Enter(S::Off)]) },
        (_, HmiEvent::Select(area)) if area.top_slot().is_some() => Transition::change(state, area, &[]),
        (_, HmiEvent::Select(_)) => Transition::ignored(state),
        (S::Alarms, HmiEvent::Alarms) => Transition::change(state, state.last_area.unwrap_or(S::Systems), &[]),
        (_, HmiEvent::Alarms) => {
            let mut next = Transition::change(state, S::Alarms, &[]);
            next.next.last_area = state.current.top_slot().map(|_| state.current).or(state.last_area);
            next
        }
        (S::On, HmiEvent::Key(_)) => Transition::ignored(state),
        (current, HmiEvent::Key(key)) => {
            let handled = [Effect::HandleKey(current, key)];
            let lateral = match key {
                Key::NextLabel => current.next_area(),
                Key::PreviousLabel => current.previous_area(),
                _ => None,
            };
            match lateral {
                Some(next) => Transition::change(state, next, &handled),
                None => Transition::stay(state, &handled),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use proptest::prelude::*;

    use super::*;
    use crate::keys::AREA_KEYS;

    fn at(current: FunctionalState) -> ModeState {
        ModeState { current, last_area: current.top_slot().map(|_| current) }
    }

    fn any_state() -> impl Strategy<Value = FunctionalState> {
        prop::sample::select(vec![
            FunctionalState::SituationalAwareness,
            FunctionalState::Weapon,
            FunctionalState::DefensiveSystems,
            FunctionalState::Systems,
            FunctionalState::Driver,
            FunctionalState::SpecialToRole,
            FunctionalState::Communications,
            FunctionalState::BattlefieldManagement,
            FunctionalState::Alarms,
        ])
    }

    // -------------------------------------------------------------------------
    // Power
    // -------------------------------------------------------------------------

    #[test]
    fn test_power_on_bootstraps_to_systems() {
        let t = transition(ModeState::off(), HmiEvent::PowerOn);
        assert_eq!(t.next.current, FunctionalState::Systems);
        assert_eq!(
            t.effects.as_slice(),
            &[Effect::Enter(FunctionalState::On), Effect::Exit(FunctionalState::On), Effect::Enter(FunctionalState::Systems)],
            "bootstrap passes through On"
        );
    }

    #[test]
    fn test_off_ignores_everything_but_power_on() {
        for event in [HmiEvent::Alarms, HmiEvent::Key(Key::F1), HmiEvent::Select(FunctionalState::Weapon), HmiEvent::PowerOff] {
            let t = transition(ModeState::off(), event);
            assert_eq!(t.next, ModeState::off(), "{event:?} from off");
            assert_eq!(t.effects.as_slice(), &[Effect::Ignored]);
        }
    }

    #[test]
    fn test_power_off_exits_current() {
        let t = transition(at(FunctionalState::Driver), HmiEvent::PowerOff);
        assert_eq!(t.next, ModeState::off());
        assert_eq!(t.effects.first(), Some(&Effect::Exit(FunctionalState::Driver)));
    }

    // -------------------------------------------------------------------------
    // Lateral navigation
    // -------------------------------------------------------------------------

    #[test]
    fn test_next_label_visits_each_area_once() {
        let mut state = at(FunctionalState::SituationalAwareness);
        let mut visited = vec![state.current];
        for _ in 0..10 {
            let t = transition(state, HmiEvent::Key(Key::NextLabel));
            if t.moved(state) {
                visited.push(t.next.current);
            }
            state = t.next;
        }
        assert_eq!(visited, FunctionalState::AREAS.to_vec(), "SA to BMS, no wraparound");
    }

    #[test]
    fn test_previous_label_stops_at_sa() {
        let state = at(FunctionalState::SituationalAwareness);
        let t = transition(state, HmiEvent::Key(Key::PreviousLabel));
        assert_eq!(t.next, state);
        assert_eq!(t.effects.as_slice(), &[Effect::HandleKey(FunctionalState::SituationalAwareness, Key::PreviousLabel)]);
    }

    #[test]
    fn test_lateral_key_handled_before_leaving() {
        let t = transition(at(FunctionalState::Systems), HmiEvent::Key(Key::NextLabel));
        assert_eq!(
            t.effects.as_slice(),
            &[
                Effect::HandleKey(FunctionalState::Systems, Key::NextLabel),
                Effect::Exit(FunctionalState::Systems),
                Effect::Enter(FunctionalState::Driver),
            ]
        );
    }

    // -------------------------------------------------------------------------
    // Alarms overlay
    // -------------------------------------------------------------------------

    #[test]
    fn test_alarms_returns_to_previous_area() {
        let t = transition(at(FunctionalState::Weapon), HmiEvent::Alarms);
        assert_eq!(t.next.current, FunctionalState::Alarms);
        let back = transition(t.next, HmiEvent::Alarms);
        assert_eq!(back.next.current, FunctionalState::Weapon);
    }

    #[test]
    fn test_alarms_without_history_returns_to_systems() {
        let state = ModeState { current: FunctionalState::Alarms, last_area: None };
        assert_eq!(transition(state, HmiEvent::Alarms).next.current, FunctionalState::Systems);
    }

    #[test]
    fn test_alarms_has_no_lateral_moves() {
        let state = ModeState { current: FunctionalState::Alarms, last_area: Some(FunctionalState::Driver) };
        let t = transition(state, HmiEvent::Key(Key::NextLabel));
        assert_eq!(t.next, state);
    }

    // -------------------------------------------------------------------------
    // Properties
    // -------------------------------------------------------------------------

    proptest! {
        #[test]
        fn test_area_select_lands_on_bound_state(from in any_state(), slot in 0usize..8) {
            let event = HmiEvent::area(AREA_KEYS[slot]);
            prop_assert!(event.is_some());
            if let Some(event) = event {
                let t = transition(at(from), event);
                prop_assert_eq!(Some(t.next.current), FunctionalState::from_slot(slot));
                prop_assert_eq!(t.effects.last().copied(), FunctionalState::from_slot(slot).map(Effect::Enter));
            }
        }

        #[test]
        fn test_power_on_always_lands_in_systems(from in any_state()) {
            prop_assert_eq!(transition(at(from), HmiEvent::PowerOn).next.current, FunctionalState::Systems);
        }
    }
}
