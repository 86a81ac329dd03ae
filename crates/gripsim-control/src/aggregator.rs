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

//! Turns one tick of user input into a gripper velocity command.

use gripsim_core::control::{ChosenDofs, DofSet, SpeedConfig};
use gripsim_core::input::{InputSnapshot, KeyBindings};
use gripsim_core::math::{DofVector, Vec2};

/// Fixed directions of the standard axes: translate X, translate Y, rotate, grip.
const STANDARD_DOFS: [DofVector; 4] = [
    DofVector::TRANSLATE_X,
    DofVector::TRANSLATE_Y,
    DofVector::ROTATE,
    DofVector::GRIP,
];

/// A scaled velocity in the gripper frame.
///
/// Components are `[px/s, px/s, deg/s, finger motor m/s]`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct VelocityCommand {
    /// The command in the gripper's local frame.
    pub local: DofVector,
}

impl VelocityCommand {
    /// Translational velocity rotated into the world by the gripper orientation.
    pub fn world_translation(&self, gripper_angle: f32) -> Vec2 {
        self.local.translation().rotate(gripper_angle)
    }

    /// Angular velocity in degrees per second.
    pub fn angular_deg(&self) -> f32 {
        self.local.drot
    }

    /// Finger motor speed.
    pub fn grip(&self) -> f32 {
        self.local.dgrip
    }
}

/// Sums the unscaled velocity requested by keyboard and gamepad.
///
/// With adaptive control, adaptive axis `i` (keys or gamepad axis `i`) moves along
/// `dofs[chosen[i]]`; otherwise the gamepad drives the standard axes directly. The
/// standard keys are always active.
pub fn raw_velocity(
    input: &InputSnapshot,
    bindings: &KeyBindings,
    dofs: &DofSet,
    chosen: &ChosenDofs,
    adaptive_enabled: bool,
) -> DofVector {
    let mut velocity = DofVector::ZERO;

    if adaptive_enabled {
        for (axis, &slot) in chosen.as_slice().iter().enumerate() {
            let dof = dofs[slot];
            let keys = &bindings.adaptive[axis];
            if input.is_held(&keys.positive) {
                velocity += dof;
            }
            if input.is_held(&keys.negative) {
                velocity -= dof;
            }
            velocity += dof * input.gamepad_axis(axis);
        }
    } else if let Some(pad) = input.gamepad {
        velocity += DofVector::from(pad);
    }

    for (axis, dof) in STANDARD_DOFS.iter().enumerate() {
        let positive = bindings
            .standard
            .iter()
            .any(|layout| input.is_held(&layout[axis].positive));
        let negative = bindings
            .standard
            .iter()
            .any(|layout| input.is_held(&layout[axis].negative));
        if positive {
            velocity += *dof;
        }
        if negative {
            velocity -= *dof;
        }
    }

    velocity
}

/// Computes the scaled local velocity command for this tick.
pub fn compute_velocity(
    input: &InputSnapshot,
    bindings: &KeyBindings,
    dofs: &DofSet,
    chosen: &ChosenDofs,
    adaptive_enabled: bool,
    speeds: &SpeedConfig,
) -> VelocityCommand {
    let raw = raw_velocity(input, bindings, dofs, chosen, adaptive_enabled);
    VelocityCommand {
        local: speeds.scale(raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use gripsim_core::math::PI;

    fn run(keys: &[&str], adaptive: bool) -> VelocityCommand {
        compute_velocity(
            &InputSnapshot::with_keys(keys.iter().copied()),
            &KeyBindings::default(),
            &DofSet::initial(),
            &ChosenDofs::canonical(2),
            adaptive,
            &SpeedConfig::default(),
        )
    }

    #[test]
    fn test_no_input_is_zero() {
        assert_eq!(run(&[], true).local, DofVector::ZERO);
    }

    #[test]
    fn test_adaptive_axis_uses_chosen_dof() {
        let v = run(&["w"], true);
        assert_abs_diff_eq!(v.local, DofVector::new(0.0, 0.0, 70.0, 0.0));
        let v = run(&["a"], true);
        let diag = 0.5 / 0.5_f32.sqrt();
        let expected = SpeedConfig::default().scale(-DofVector::new(diag, diag, 0.8, 0.0));
        assert_abs_diff_eq!(v.local, expected, epsilon = 1e-4);
    }

    #[test]
    fn test_adaptive_keys_ignored_when_disabled() {
        assert_eq!(run(&["w", "d"], false).local, DofVector::ZERO);
    }

    #[test]
    fn test_unbound_adaptive_axis_is_ignored() {
        // "z" drives axis 3, which is inactive with two axes.
        assert_eq!(run(&["z"], true).local, DofVector::ZERO);
    }

    #[test]
    fn test_standard_layouts_do_not_double_count() {
        let v = run(&["ArrowUp", "i"], true);
        assert_abs_diff_eq!(v.local, DofVector::new(50.0, 0.0, 0.0, 0.0));
        let v = run(&["ArrowUp", "k"], true);
        assert_eq!(v.local, DofVector::ZERO);
    }

    #[test]
    fn test_diagonal_translation_is_clamped() {
        let v = run(&["ArrowUp", "ArrowRight", "3"], true);
        assert_abs_diff_eq!(v.local.translation().length(), 50.0, epsilon = 1e-3);
        assert_abs_diff_eq!(v.grip(), 0.05);
    }

    #[test]
    fn test_gamepad_weights_adaptive_axis() {
        let input = InputSnapshot {
            gamepad: Some([0.5, 0.0, 1.0, 1.0]),
            ..InputSnapshot::default()
        };
        let v = compute_velocity(
            &input,
            &KeyBindings::default(),
            &DofSet::initial(),
            &ChosenDofs::canonical(2),
            true,
            &SpeedConfig::default(),
        );
        // Only the first two pad axes are adaptive; they weight dofs[0] and dofs[1].
        assert_abs_diff_eq!(v.local, DofVector::new(0.0, 0.0, 35.0, 0.0));
    }

    #[test]
    fn test_gamepad_drives_standard_axes_without_adaptive() {
        let input = InputSnapshot {
            gamepad: Some([1.0, 0.0, -0.5, 1.0]),
            ..InputSnapshot::default()
        };
        let v = compute_velocity(
            &input,
            &KeyBindings::default(),
            &DofSet::initial(),
            &ChosenDofs::canonical(2),
            false,
            &SpeedConfig::default(),
        );
        assert_abs_diff_eq!(v.local, DofVector::new(50.0, 0.0, -35.0, 0.05));
    }

    #[test]
    fn test_world_translation_rotates() {
        let cmd = VelocityCommand {
            local: DofVector::new(50.0, 0.0, 0.0, 0.0),
        };
        assert_abs_diff_eq!(cmd.world_translation(PI / 2.0), Vec2::new(0.0, 50.0), epsilon = 1e-4);
    }
}
