//! Logical bezel keys and the keyboard-name bindings that produce them.
//!
//! The physical console has eight area-select keys across the top, six function
//! keys down each side (F1..F6 left, F7..F12 right) and eight common task keys
//! along the bottom (F13..F20). The simulator also emulates a handful of
//! software-only keys (fullscreen, on-screen keyboard, bearing adjust).
//!
//! # Default bindings
//!
//! | Keyboard | Logical key |
//! |----------|-------------|
//! | `1`..`8` | SA, WPN, DEF, SYS, DRV, STR, COM, BMS |
//! | `F1`..`F12` | F1..F12 |
//! | `A` | F14 (alarms) |
//! | `L` | F19 (label mode) |
//! | `B` | Blackout |
//! | `K` | On-screen keyboard |
//! | `F` | Fullscreen |
//! | `N` / `P` | Next / previous label |
//! | `+` / `-` | Compass bearing |
//! | `<` / `>` | Sight bearing |
//! | arrows | Brightness (left/right) |
//! | `Escape` | Quit |

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::warn;

/// A logical key on the console bezel (or an emulated software key).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum Key {
    #[default]
    Unknown,
    /// Situational awareness.
    Sa,
    /// Weapon.
    Wpn,
    /// Defensive systems.
    Def,
    /// Systems.
    Sys,
    /// Driver.
    Drv,
    /// Special to role.
    Str,
    /// Communications.
    Com,
    /// Battlefield management system.
    Bms,
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,
    F13,
    F14,
    F15,
    F16,
    F17,
    F18,
    F19,
    F20,
    F21,
    F22,
    Blackout,
    Power,
    BrightnessUp,
    BrightnessDown,
    Escape,
    Fullscreen,
    Plus,
    Minus,
    UpArrow,
    DownArrow,
    LeftArrow,
    RightArrow,
    GreaterThan,
    LessThan,
    Keyboard,
    PreviousLabel,
    NextLabel,
}

/// Area-select keys in top-bar slot order.
pub const AREA_KEYS: [Key; 8] = [Key::Sa, Key::Wpn, Key::Def, Key::Sys, Key::Drv, Key::Str, Key::Com, Key::Bms];

/// Function keys in numeric order, F1 first.
const FUNCTION_KEYS: [Key; 22] = [
    Key::F1,
    Key::F2,
    Key::F3,
    Key::F4,
    Key::F5,
    Key::F6,
    Key::F7,
    Key::F8,
    Key::F9,
    Key::F10,
    Key::F11,
    Key::F12,
    Key::F13,
    Key::F14,
    Key::F15,
    Key::F16,
    Key::F17,
    Key::F18,
    Key::F19,
    Key::F20,
    Key::F21,
    Key::F22,
];

impl Key {
    /// Function key by number (1-based). `None` outside F1..F22.
    pub fn function(n: usize) -> Option<Self> {
        n.checked_sub(1).and_then(|i| FUNCTION_KEYS.get(i).copied())
    }

    /// Function key number (1-based), if this is a function key.
    pub fn function_number(self) -> Option<usize> {
        FUNCTION_KEYS.iter().position(|k| *k == self).map(|i| i + 1)
    }

    /// Top-bar slot index (0..8), if this is an area-select key.
    pub fn area_index(self) -> Option<usize> {
        AREA_KEYS.iter().position(|k| *k == self)
    }

    /// Left panel slot (0..6) for F1..F6.
    pub fn left_slot(self) -> Option<usize> {
        self.function_number().filter(|n| (1..=6).contains(n)).map(|n| n - 1)
    }

    /// Right panel slot (0..6) for F7..F12.
    pub fn right_slot(self) -> Option<usize> {
        self.function_number().filter(|n| (7..=12).contains(n)).map(|n| n - 7)
    }

    /// Bottom bar slot (0..8) for F13..F20.
    pub fn bottom_slot(self) -> Option<usize> {
        self.function_number().filter(|n| (13..=20).contains(n)).map(|n| n - 13)
    }
}

// =============================================================================
// Keyboard Bindings
// =============================================================================

/// Maps keyboard key names (as reported by the windowing layer) to logical keys.
///
/// Lookups are case-insensitive. Bindings from the `[keys]` configuration table
/// are layered over the defaults.
#[derive(Clone, Debug)]
pub struct KeyBindings {
    map: BTreeMap<String, Key>,
}

impl KeyBindings {
    /// Default bindings for a desktop keyboard.
    pub fn new() -> Self {
        let mut map = BTreeMap::new();
        for (i, key) in AREA_KEYS.iter().enumerate() {
            map.insert((i + 1).to_string(), *key);
        }
        for n in 1..=12 {
            if let Some(key) = Key::function(n) {
                map.insert(format!("f{n}"), key);
            }
        }
        let extra = [
            ("a", Key::F14),
            ("l", Key::F19),
            ("b", Key::Blackout),
            ("k", Key::Keyboard),
            ("f", Key::Fullscreen),
            ("n", Key::NextLabel),
            ("p", Key::PreviousLabel),
            ("+", Key::Plus),
            ("=", Key::Plus),
            ("-", Key::Minus),
            ("<", Key::LessThan),
            (",", Key::LessThan),
            (">", Key::GreaterThan),
            (".", Key::GreaterThan),
            ("left", Key::LeftArrow),
            ("right", Key::RightArrow),
            ("up", Key::UpArrow),
            ("down", Key::DownArrow),
            ("escape", Key::Escape),
        ];
        for (name, key) in extra {
            map.insert(name.to_string(), key);
        }
        Self { map }
    }

    /// Default bindings with `overrides` layered on top.
    pub fn with_overrides(overrides: &BTreeMap<String, Key>) -> Self {
        let mut bindings = Self::new();
        for (name, key) in overrides {
            bindings.map.insert(name.to_lowercase(), *key);
        }
        bindings
    }

    /// Translate a key name. Unbound names map to [`Key::Unknown`].
    pub fn translate(&self, name: &str) -> Key {
        if let Some(key) = self.map.get(&name.to_lowercase()) {
            return *key;
        }
        warn!(name, "no binding for keyboard key");
        Key::Unknown
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new()
    }
}
