// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Backend-agnostic user input.
//!
//! Keyboard and gamepad events are folded into a [`KeyboardState`] and an optional
//! [`GamepadSnapshot`]; once per tick the simulation samples them into an
//! [`InputSnapshot`] which is all the control code ever sees.

mod bindings;
mod command;
mod gamepad;
mod keyboard;

pub use self::bindings::{AxisButtons, KeyBindings};
pub use self::command::Command;
pub use self::gamepad::{GamepadButton, GamepadSnapshot, GAMEPAD_DEAD_ZONE, GAMEPAD_SATURATION};
pub use self::keyboard::KeyboardState;

/// A user input event delivered by the front end.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// A key was pressed.
    KeyPressed {
        /// Name of the key, e.g. `"w"` or `"ArrowUp"`.
        key: String,
    },
    /// A key was released.
    KeyReleased {
        /// Name of the key.
        key: String,
    },
    /// The window lost focus; every held key is released.
    FocusLost,
    /// The window regained focus.
    FocusGained,
    /// A new gamepad sample, or `None` when the pad disconnected.
    Gamepad(Option<GamepadSnapshot>),
}

/// Logical input for a single tick.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct InputSnapshot {
    /// Keys held during this tick.
    pub keys: KeyboardState,
    /// Conditioned gamepad vector `[forward, right, rotate, grip]`, if a pad is connected.
    pub gamepad: Option<[f32; 4]>,
}

impl InputSnapshot {
    /// A snapshot with only the given keys held and no gamepad.
    pub fn with_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut state = KeyboardState::default();
        for key in keys {
            state.press(key);
        }
        Self {
            keys: state,
            gamepad: None,
        }
    }

    /// Returns `true` if `key` is held.
    #[inline]
    pub fn is_held(&self, key: &str) -> bool {
        self.keys.is_held(key)
    }

    /// Gamepad weight on axis `axis`, zero without a pad.
    #[inline]
    pub fn gamepad_axis(&self, axis: usize) -> f32 {
        self.gamepad
            .and_then(|g| g.get(axis).copied())
            .unwrap_or(0.0)
    }

    /// Returns `true` if any of the first `axis_count` adaptive axes is being driven,
    /// by keyboard or by gamepad.
    pub fn any_adaptive_active(&self, bindings: &KeyBindings, axis_count: usize) -> bool {
        let keys = bindings
            .adaptive
            .iter()
            .take(axis_count)
            .any(|axis| self.is_held(&axis.positive) || self.is_held(&axis.negative));
        keys || (0..axis_count.min(4)).any(|i| self.gamepad_axis(i) != 0.0)
    }
}
