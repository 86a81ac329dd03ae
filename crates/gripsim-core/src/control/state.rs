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

use crate::math::{normalize_angle, DofVector, Vec2};

/// Position and orientation of an object, usually expressed in the gripper frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ObjectPose {
    /// Position in pixels.
    pub position: Vec2,
    /// Orientation in radians.
    pub angle: f32,
}

impl ObjectPose {
    /// Creates a new pose.
    pub const fn new(position: Vec2, angle: f32) -> Self {
        Self { position, angle }
    }
}

/// The 8 environment values sent to the model with every DoF query.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryState(pub [f32; 8]);

/// Gripper-centric snapshot of the scene.
///
/// Layout when flattened: `[vx, vy, vrot, vgrip, targetX, targetY, box1X, box1Y,
/// box1Rot, box2X, box2Y, box2Rot]`.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct GripperState {
    /// Last velocity command applied to the gripper, in its local frame.
    pub velocity: DofVector,
    /// Target position in the gripper frame.
    pub target: Vec2,
    /// Box poses in the gripper frame, relative angles in `(-PI, PI]`.
    pub boxes: [ObjectPose; 2],
}

impl GripperState {
    /// Number of values in the flattened state.
    pub const LEN: usize = 12;

    /// Builds a state, normalising the relative box angles.
    pub fn new(velocity: DofVector, target: Vec2, boxes: [ObjectPose; 2]) -> Self {
        let boxes = boxes.map(|b| ObjectPose::new(b.position, normalize_angle(b.angle)));
        Self {
            velocity,
            target,
            boxes,
        }
    }

    /// Flattens the state in wire order.
    pub fn to_array(&self) -> [f32; Self::LEN] {
        let [b1, b2] = self.boxes;
        [
            self.velocity.dx,
            self.velocity.dy,
            self.velocity.drot,
            self.velocity.dgrip,
            self.target.x,
            self.target.y,
            b1.position.x,
            b1.position.y,
            b1.angle,
            b2.position.x,
            b2.position.y,
            b2.angle,
        ]
    }

    /// The state without its leading velocity components.
    pub fn query_state(&self) -> QueryState {
        let full = self.to_array();
        let mut tail = [0.0; 8];
        tail.copy_from_slice(&full[4..]);
        QueryState(tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::PI;

    #[test]
    fn test_layout_and_query_tail() {
        let state = GripperState::new(
            DofVector::new(1.0, 2.0, 3.0, 4.0),
            Vec2::new(5.0, 6.0),
            [
                ObjectPose::new(Vec2::new(7.0, 8.0), 0.5),
                ObjectPose::new(Vec2::new(10.0, 11.0), -0.25),
            ],
        );
        assert_eq!(
            state.to_array(),
            [1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 0.5, 10.0, 11.0, -0.25]
        );
        assert_eq!(
            state.query_state(),
            QueryState([5.0, 6.0, 7.0, 8.0, 0.5, 10.0, 11.0, -0.25])
        );
    }

    #[test]
    fn test_box_angles_are_normalised() {
        let state = GripperState::new(
            DofVector::ZERO,
            Vec2::ZERO,
            [
                ObjectPose::new(Vec2::ZERO, 1.5 * PI),
                ObjectPose::new(Vec2::ZERO, -2.25 * PI),
            ],
        );
        assert!((state.boxes[0].angle + 0.5 * PI).abs() < 1e-5);
        assert!((state.boxes[1].angle + 0.25 * PI).abs() < 1e-5);
    }
}
