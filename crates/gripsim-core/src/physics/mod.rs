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

//! # Physics Abstractions
//!
//! Universal traits and types for 2D physics simulation providers.
//!
//! All quantities crossing this boundary are in physics units (meters, radians,
//! kilograms). Conversion from screen pixels happens in the simulation layer.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::math::{Pose2, Vec2};

/// Opaque handle to a rigid body in the physics engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BodyHandle(pub u64);

/// Opaque handle to a collider in the physics engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColliderHandle(pub u64);

/// Opaque handle to a joint in the physics engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JointHandle(pub u64);

/// Errors reported by a physics provider.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhysicsError {
    /// The body handle does not refer to a live body.
    #[error("unknown rigid body {0:?}")]
    UnknownBody(BodyHandle),
    /// The collider handle does not refer to a live collider.
    #[error("unknown collider {0:?}")]
    UnknownCollider(ColliderHandle),
    /// The joint handle does not refer to a live joint.
    #[error("unknown joint {0:?}")]
    UnknownJoint(JointHandle),
    /// The joint exists but has no motor on the requested axis.
    #[error("joint {0:?} has no motor")]
    NoMotor(JointHandle),
}

/// Defines the type of a rigid body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyType {
    /// Responds to forces and collisions.
    Dynamic,
    /// Fixed in place, does not move.
    Static,
    /// Moved by velocity commands only.
    Kinematic,
}

/// Material of a collider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Material {
    /// Mass per area, kg/m².
    pub density: f32,
    /// Coulomb friction coefficient.
    pub friction: f32,
    /// Bounciness.
    pub restitution: f32,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            density: 1.0,
            friction: 0.3,
            restitution: 0.5,
        }
    }
}

/// Description for creating a rectangular rigid body with one collider.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BodyDesc {
    /// Initial pose.
    pub pose: Pose2,
    /// Half width and half height of the box collider.
    pub half_extents: Vec2,
    /// Collider material.
    pub material: Material,
    /// Body type.
    pub body_type: BodyType,
}

impl BodyDesc {
    /// Mass implied by the collider, zero for non-dynamic bodies.
    pub fn mass(&self) -> f32 {
        match self.body_type {
            BodyType::Dynamic => {
                self.material.density * 4.0 * self.half_extents.x * self.half_extents.y
            }
            _ => 0.0,
        }
    }

    /// Angular inertia of the box about its center.
    pub fn angular_inertia(&self) -> f32 {
        let w = 2.0 * self.half_extents.x;
        let h = 2.0 * self.half_extents.y;
        self.mass() * (w * w + h * h) / 12.0
    }
}

/// Description of an extra box collider attached to an existing body.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColliderDesc {
    /// Half extents of the box.
    pub half_extents: Vec2,
    /// Offset of the collider center in the body frame.
    pub offset: Vec2,
    /// Collider material.
    pub material: Material,
}

/// A prismatic joint with limits and a velocity motor along its axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PrismaticJointDesc {
    /// First body; the axis and its anchor live in this body's frame.
    pub body1: BodyHandle,
    /// Second body.
    pub body2: BodyHandle,
    /// Sliding axis in the frame of `body1`.
    pub axis: Vec2,
    /// Anchor in the frame of `body1`.
    pub anchor1: Vec2,
    /// Anchor in the frame of `body2`.
    pub anchor2: Vec2,
    /// Translation limits along the axis.
    pub limits: [f32; 2],
    /// Maximum force the motor may apply.
    pub max_motor_force: f32,
}

/// Planar friction against a static ground body.
///
/// Each step the body's velocities are reduced by at most what `max_force` and
/// `max_torque` can remove in that step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrictionJointDesc {
    /// The body being slowed down.
    pub body: BodyHandle,
    /// The static body it rubs against.
    pub ground: BodyHandle,
    /// Maximum friction force.
    pub max_force: f32,
    /// Maximum friction torque.
    pub max_torque: f32,
}

/// Interface contract for any 2D physics engine implementation (e.g., Rapier).
pub trait PhysicsProvider: Send {
    /// Advances the simulation by `dt` seconds.
    fn step(&mut self, dt: f32);

    /// Sets the global gravity vector.
    fn set_gravity(&mut self, gravity: Vec2);

    /// Adds a rigid body with its box collider.
    fn add_body(&mut self, desc: &BodyDesc) -> BodyHandle;

    /// Adds a collider-less static body, used as the anchor of friction joints.
    fn add_ground(&mut self) -> BodyHandle;

    /// Attaches an extra collider to `body`.
    fn add_collider(
        &mut self,
        body: BodyHandle,
        desc: &ColliderDesc,
    ) -> Result<ColliderHandle, PhysicsError>;

    /// Removes a collider previously added with [`PhysicsProvider::add_collider`].
    fn remove_collider(&mut self, handle: ColliderHandle) -> Result<(), PhysicsError>;

    /// Adds a prismatic joint with a velocity motor.
    fn add_prismatic_joint(
        &mut self,
        desc: &PrismaticJointDesc,
    ) -> Result<JointHandle, PhysicsError>;

    /// Sets the target velocity of a prismatic joint's motor.
    fn set_motor_speed(&mut self, joint: JointHandle, speed: f32) -> Result<(), PhysicsError>;

    /// Adds top-down friction between a dynamic body and the ground.
    fn add_friction_joint(&mut self, desc: &FrictionJointDesc) -> Result<(), PhysicsError>;

    /// Reads the pose of a body.
    fn body_pose(&self, body: BodyHandle) -> Result<Pose2, PhysicsError>;

    /// Teleports a body.
    fn set_body_pose(&mut self, body: BodyHandle, pose: Pose2) -> Result<(), PhysicsError>;

    /// Sets linear (m/s) and angular (rad/s) velocity.
    fn set_velocity(
        &mut self,
        body: BodyHandle,
        linear: Vec2,
        angular: f32,
    ) -> Result<(), PhysicsError>;

    /// Reads linear (m/s) and angular (rad/s) velocity.
    fn velocity(&self, body: BodyHandle) -> Result<(Vec2, f32), PhysicsError>;

    /// Number of live bodies.
    fn body_count(&self) -> usize;

    /// Maps a point in the body frame to world coordinates.
    fn world_point(&self, body: BodyHandle, local: Vec2) -> Result<Vec2, PhysicsError> {
        Ok(self.body_pose(body)?.transform_point(local))
    }

    /// Maps a world point into the body frame.
    fn local_point(&self, body: BodyHandle, world: Vec2) -> Result<Vec2, PhysicsError> {
        Ok(self.body_pose(body)?.inverse_transform_point(world))
    }

    /// Rotates a body-frame direction into world coordinates.
    fn world_vector(&self, body: BodyHandle, local: Vec2) -> Result<Vec2, PhysicsError> {
        Ok(self.body_pose(body)?.transform_vector(local))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_box_mass_properties() {
        let desc = BodyDesc {
            pose: Pose2::IDENTITY,
            half_extents: Vec2::new(1.0, 0.5),
            material: Material::default(),
            body_type: BodyType::Dynamic,
        };
        assert_eq!(desc.mass(), 2.0);
        assert!((desc.angular_inertia() - 2.0 * 5.0 / 12.0).abs() < 1e-6);

        let fixed = BodyDesc {
            body_type: BodyType::Static,
            ..desc
        };
        assert_eq!(fixed.mass(), 0.0);
    }
}
