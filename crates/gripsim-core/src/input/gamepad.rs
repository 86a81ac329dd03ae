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

use serde::{Deserialize, Serialize};

/// Magnitudes below this are treated as zero.
pub const GAMEPAD_DEAD_ZONE: f32 = 0.01;
/// Magnitudes above this snap to full deflection.
pub const GAMEPAD_SATURATION: f32 = 0.99;

const BUTTON_TRIGGER_LEFT: usize = 6;
const BUTTON_TRIGGER_RIGHT: usize = 7;

/// State of one gamepad button.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GamepadButton {
    /// Digital state.
    pub pressed: bool,
    /// Analog value in `[0, 1]` (triggers).
    pub value: f32,
}

/// Raw gamepad sample in the standard mapping.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct GamepadSnapshot {
    /// Stick axes: left X, left Y, right X, right Y.
    pub axes: [f32; 4],
    /// Buttons in standard order.
    pub buttons: Vec<GamepadButton>,
}

impl GamepadSnapshot {
    /// Returns `true` if button `index` exists and is pressed.
    pub fn is_pressed(&self, index: usize) -> bool {
        self.buttons.get(index).is_some_and(|b| b.pressed)
    }

    fn button_value(&self, index: usize) -> f32 {
        self.buttons.get(index).map_or(0.0, |b| b.value)
    }

    /// Control vector `[-leftY, leftX, rightX, rightTrigger - leftTrigger]` with the
    /// dead zone and saturation applied.
    pub fn control_vector(&self) -> [f32; 4] {
        let trigger =
            self.button_value(BUTTON_TRIGGER_RIGHT) - self.button_value(BUTTON_TRIGGER_LEFT);
        [-self.axes[1], self.axes[0], self.axes[2], trigger].map(condition_axis)
    }
}

/// Applies the dead zone and saturation to one axis value.
pub(crate) fn condition_axis(v: f32) -> f32 {
    if v.abs() < GAMEPAD_DEAD_ZONE {
        0.0
    } else if v.abs() > GAMEPAD_SATURATION {
        v.signum()
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_condition_axis() {
        assert_eq!(condition_axis(0.005), 0.0);
        assert_eq!(condition_axis(-0.009), 0.0);
        assert_eq!(condition_axis(0.5), 0.5);
        assert_eq!(condition_axis(0.995), 1.0);
        assert_eq!(condition_axis(-0.999), -1.0);
    }

    #[test]
    fn test_control_vector_mapping() {
        let mut buttons = vec![GamepadButton::default(); 10];
        buttons[6].value = 0.25;
        buttons[7].value = 0.75;
        let pad = GamepadSnapshot {
            axes: [0.3, -0.4, 1.0, 0.0],
            buttons,
        };
        assert_eq!(pad.control_vector(), [0.4, 0.3, 1.0, 0.5]);
    }

    #[test]
    fn test_missing_buttons_read_as_released() {
        let pad = GamepadSnapshot::default();
        assert!(!pad.is_pressed(9));
        assert_eq!(pad.control_vector(), [0.0; 4]);
    }
}
