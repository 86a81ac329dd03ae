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

//! The physical and visual objects of the scene.
//!
//! Everything here works in screen units (pixels, degrees per second); the
//! physics provider only ever sees meters and radians.

mod camera;
mod grasp_box;
mod gripper;
mod target;
mod walls;

pub use self::camera::RecordingCamera;
pub use self::grasp_box::{GraspBox, POLE_SIZE};
pub use self::gripper::{Finger, Gripper, FINGER_MOTOR_FORCE, FINGER_SIZE, GRIPPER_SIZE};
pub use self::target::{Target, TARGET_RADIUS};
pub use self::walls::{add_walls, WALL_THICKNESS};

use gripsim_core::draw::{Canvas, Color, RectStyle};
use gripsim_core::math::{degrees_to_radians, Pose2, Vec2};
use gripsim_core::physics::{
    BodyDesc, BodyHandle, BodyType, FrictionJointDesc, Material, PhysicsError, PhysicsProvider,
};

/// Screen pixels per physics meter.
pub const PIXELS_PER_METER: f32 = 300.0;

/// Distance from the canvas border that bodies are kept within.
pub const VIEW_MARGIN: f32 = 25.0;

/// Converts a length in pixels to meters.
#[inline]
pub fn to_meters(v: Vec2) -> Vec2 {
    v * (1.0 / PIXELS_PER_METER)
}

/// Converts a length in meters to pixels.
#[inline]
pub fn to_pixels(v: Vec2) -> Vec2 {
    v * PIXELS_PER_METER
}

/// A rectangular body, addressed in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimBody {
    handle: BodyHandle,
    size: Vec2,
    color: Color,
}

impl SimBody {
    /// Adds a `size` pixel box at `position` to the physics world.
    pub fn spawn(
        physics: &mut dyn PhysicsProvider,
        position: Vec2,
        angle: f32,
        size: Vec2,
        color: Color,
        body_type: BodyType,
    ) -> Self {
        let desc = BodyDesc {
            pose: Pose2::new(to_meters(position), angle),
            half_extents: to_meters(size * 0.5),
            material: Material::default(),
            body_type,
        };
        Self {
            handle: physics.add_body(&desc),
            size,
            color,
        }
    }

    /// Slows the body down against `ground`, as if it was resting on it.
    ///
    /// `footprint` overrides the contact area used to size the friction.
    /// Bodies that are not dynamic are left alone.
    pub fn add_ground_friction(
        &self,
        physics: &mut dyn PhysicsProvider,
        ground: BodyHandle,
        body_type: BodyType,
        footprint: Option<Vec2>,
    ) -> Result<(), PhysicsError> {
        if body_type != BodyType::Dynamic {
            return Ok(());
        }
        let area = to_meters(footprint.unwrap_or(self.size));
        let max_force = area.x * area.y * 10.0;
        let max_torque = max_force * area.length() / 3.0 * 0.3;
        physics.add_friction_joint(&FrictionJointDesc {
            body: self.handle,
            ground,
            max_force,
            max_torque,
        })
    }

    /// Physics handle of the body.
    pub fn handle(&self) -> BodyHandle {
        self.handle
    }

    /// Width and height in pixels.
    pub fn size(&self) -> Vec2 {
        self.size
    }

    /// Fill color.
    pub fn color(&self) -> Color {
        self.color
    }

    /// Position in pixels and orientation in radians.
    pub fn pose(&self, physics: &dyn PhysicsProvider) -> Result<Pose2, PhysicsError> {
        let pose = physics.body_pose(self.handle)?;
        Ok(Pose2::new(to_pixels(pose.translation), pose.angle))
    }

    /// Position in pixels.
    pub fn position(&self, physics: &dyn PhysicsProvider) -> Result<Vec2, PhysicsError> {
        Ok(self.pose(physics)?.translation)
    }

    /// Orientation in radians.
    pub fn angle(&self, physics: &dyn PhysicsProvider) -> Result<f32, PhysicsError> {
        Ok(physics.body_pose(self.handle)?.angle)
    }

    /// Maps a point in the body frame (pixels) to the world (pixels).
    pub fn world_point(
        &self,
        physics: &dyn PhysicsProvider,
        local: Vec2,
    ) -> Result<Vec2, PhysicsError> {
        Ok(to_pixels(physics.world_point(self.handle, to_meters(local))?))
    }

    /// Maps a world point (pixels) into the body frame (pixels).
    pub fn local_point(
        &self,
        physics: &dyn PhysicsProvider,
        world: Vec2,
    ) -> Result<Vec2, PhysicsError> {
        Ok(to_pixels(physics.local_point(self.handle, to_meters(world))?))
    }

    /// Rotates a body-frame direction into the world.
    pub fn world_vector(
        &self,
        physics: &dyn PhysicsProvider,
        local: Vec2,
    ) -> Result<Vec2, PhysicsError> {
        physics.world_vector(self.handle, local)
    }

    /// Pose of a world object (pixels, radians) as seen from this body.
    ///
    /// The relative angle is left unnormalised.
    pub fn local_pose(
        &self,
        physics: &dyn PhysicsProvider,
        world: Pose2,
    ) -> Result<Pose2, PhysicsError> {
        let position = self.local_point(physics, world.translation)?;
        Ok(Pose2::new(position, world.angle - self.angle(physics)?))
    }

    /// Sets the velocity from pixels per second and degrees per second.
    pub fn set_velocity(
        &self,
        physics: &mut dyn PhysicsProvider,
        linear: Vec2,
        angular_deg: f32,
    ) -> Result<(), PhysicsError> {
        physics.set_velocity(
            self.handle,
            to_meters(linear),
            degrees_to_radians(angular_deg),
        )
    }

    /// Moves the body back inside the canvas if it left it.
    ///
    /// Returns `true` if the body was moved.
    pub fn return_to_view(
        &self,
        physics: &mut dyn PhysicsProvider,
        canvas: Vec2,
    ) -> Result<bool, PhysicsError> {
        let mut pose = physics.body_pose(self.handle)?;
        let min = VIEW_MARGIN / PIXELS_PER_METER;
        let max = to_meters(canvas - Vec2::new(VIEW_MARGIN, VIEW_MARGIN));
        let clamped = Vec2::new(
            pose.translation.x.clamp(min, max.x),
            pose.translation.y.clamp(min, max.y),
        );
        if clamped == pose.translation {
            return Ok(false);
        }
        pose.translation = clamped;
        physics.set_body_pose(self.handle, pose)?;
        Ok(true)
    }

    /// Draws the body as an outlined rectangle.
    pub fn draw<C: Canvas>(
        &self,
        physics: &dyn PhysicsProvider,
        canvas: &mut C,
    ) -> Result<(), PhysicsError> {
        let pose = self.pose(physics)?;
        canvas.rect(
            pose.translation,
            self.size,
            pose.angle,
            RectStyle::outlined(self.color),
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gripsim_infra::RapierPhysicsWorld;

    #[test]
    fn test_pixel_round_trip_through_physics() {
        let mut physics = RapierPhysicsWorld::new();
        let body = SimBody::spawn(
            &mut physics,
            Vec2::new(150.0, 300.0),
            0.0,
            Vec2::new(20.0, 20.0),
            Color::BLUE,
            BodyType::Static,
        );
        let pose = physics.body_pose(body.handle()).unwrap();
        assert!((pose.translation.x - 0.5).abs() < 1e-6);
        let pos = body.position(&physics).unwrap();
        assert!((pos.x - 150.0).abs() < 1e-3 && (pos.y - 300.0).abs() < 1e-3);
        let local = body.local_point(&physics, Vec2::new(160.0, 300.0)).unwrap();
        assert!((local.x - 10.0).abs() < 1e-3 && local.y.abs() < 1e-3);
    }

    #[test]
    fn test_local_pose_and_world_vector_follow_rotation() {
        let mut physics = RapierPhysicsWorld::new();
        let body = SimBody::spawn(
            &mut physics,
            Vec2::new(300.0, 300.0),
            std::f32::consts::FRAC_PI_2,
            Vec2::new(20.0, 20.0),
            Color::BLUE,
            BodyType::Static,
        );
        let v = body.world_vector(&physics, Vec2::new(1.0, 0.0)).unwrap();
        assert!(v.x.abs() < 1e-5 && (v.y - 1.0).abs() < 1e-5);

        let seen = body
            .local_pose(&physics, Pose2::new(Vec2::new(300.0, 330.0), 2.0))
            .unwrap();
        assert!((seen.translation.x - 30.0).abs() < 1e-3);
        assert!(seen.translation.y.abs() < 1e-3);
        assert!((seen.angle - (2.0 - std::f32::consts::FRAC_PI_2)).abs() < 1e-5);
    }

    #[test]
    fn test_return_to_view_clamps_into_margin() {
        let mut physics = RapierPhysicsWorld::new();
        let canvas = Vec2::new(400.0, 300.0);
        let body = SimBody::spawn(
            &mut physics,
            Vec2::new(-40.0, 500.0),
            0.3,
            Vec2::new(20.0, 20.0),
            Color::BLUE,
            BodyType::Kinematic,
        );
        assert!(body.return_to_view(&mut physics, canvas).unwrap());
        let pose = body.pose(&physics).unwrap();
        assert!((pose.translation.x - 25.0).abs() < 1e-3);
        assert!((pose.translation.y - 275.0).abs() < 1e-3);
        assert!((pose.angle - 0.3).abs() < 1e-6);
        assert!(!body.return_to_view(&mut physics, canvas).unwrap());
    }
}
