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

//! A rigid 2D transform made of a translation and a rotation angle.

use serde::{Deserialize, Serialize};

use super::Vec2;

/// Position and orientation of a rigid body in the plane.
#[derive(Debug, Default, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pose2 {
    /// Translation of the local origin.
    pub translation: Vec2,
    /// Rotation in radians, counter-clockwise.
    pub angle: f32,
}

impl Pose2 {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        translation: Vec2::ZERO,
        angle: 0.0,
    };

    /// Creates a new pose.
    #[inline]
    pub const fn new(translation: Vec2, angle: f32) -> Self {
        Self { translation, angle }
    }

    /// Maps a point from local to world coordinates.
    #[inline]
    pub fn transform_point(&self, local: Vec2) -> Vec2 {
        local.rotate(self.angle) + self.translation
    }

    /// Maps a point from world to local coordinates.
    #[inline]
    pub fn inverse_transform_point(&self, world: Vec2) -> Vec2 {
        (world - self.translation).rotate(-self.angle)
    }

    /// Rotates a direction from local to world coordinates.
    #[inline]
    pub fn transform_vector(&self, local: Vec2) -> Vec2 {
        local.rotate(self.angle)
    }

    /// Rotates a direction from world to local coordinates.
    #[inline]
    pub fn inverse_transform_vector(&self, world: Vec2) -> Vec2 {
        world.rotate(-self.angle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::PI;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_point_round_trip() {
        let pose = Pose2::new(Vec2::new(10.0, -4.0), 0.7);
        let p = Vec2::new(3.0, 2.0);
        assert_abs_diff_eq!(
            pose.inverse_transform_point(pose.transform_point(p)),
            p,
            epsilon = 1e-4
        );
    }

    #[test]
    fn test_quarter_turn() {
        let pose = Pose2::new(Vec2::new(1.0, 1.0), PI / 2.0);
        assert_abs_diff_eq!(pose.transform_point(Vec2::X), Vec2::new(1.0, 2.0));
        assert_abs_diff_eq!(pose.transform_vector(Vec2::X), Vec2::Y);
        assert_abs_diff_eq!(pose.inverse_transform_vector(Vec2::Y), Vec2::X);
    }
}
