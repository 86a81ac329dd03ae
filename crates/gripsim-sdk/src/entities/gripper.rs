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

use std::time::Instant;

use gripsim_control::{compute_velocity, AdaptiveController, DofChannel, VelocityCommand};
use gripsim_core::control::{ControlConfig, GripperState, ObjectPose, QueryState, SpeedConfig};
use gripsim_core::draw::{Canvas, Color};
use gripsim_core::input::{InputSnapshot, KeyBindings};
use gripsim_core::math::{Pose2, Vec2};
use gripsim_core::physics::{
    BodyType, JointHandle, PhysicsError, PhysicsProvider, PrismaticJointDesc,
};

use super::{to_meters, SimBody, PIXELS_PER_METER};

/// Width and height of the gripper palm, in pixels.
pub const GRIPPER_SIZE: Vec2 = Vec2::new(15.0, 90.0);
/// Width and height of a finger, in pixels.
pub const FINGER_SIZE: Vec2 = Vec2::new(30.0, 15.0);
/// Maximum force of a finger motor.
pub const FINGER_MOTOR_FORCE: f32 = 50.0;

/// One finger, sliding on a motorised prismatic joint along the palm.
#[derive(Debug, Clone, Copy)]
pub struct Finger {
    body: SimBody,
    joint: JointHandle,
    direction: f32,
    max_y: f32,
}

impl Finger {
    fn spawn(
        physics: &mut dyn PhysicsProvider,
        palm: &SimBody,
        right: bool,
    ) -> Result<Self, PhysicsError> {
        let direction = if right { 1.0 } else { -1.0 };
        let max_y = direction * (GRIPPER_SIZE.y - FINGER_SIZE.y) / 2.0;
        let position = palm.world_point(
            physics,
            Vec2::new((GRIPPER_SIZE.x + FINGER_SIZE.x) / 2.0, max_y),
        )?;
        let angle = palm.angle(physics)?;
        let body = SimBody::spawn(
            physics,
            position,
            angle,
            FINGER_SIZE,
            Color::BLACK,
            BodyType::Dynamic,
        );

        let joint = physics.add_prismatic_joint(&PrismaticJointDesc {
            body1: palm.handle(),
            body2: body.handle(),
            axis: Vec2::new(0.0, direction),
            anchor1: to_meters(Vec2::new(GRIPPER_SIZE.x / 2.0, 0.0)),
            anchor2: to_meters(Vec2::new(-FINGER_SIZE.x / 2.0, 0.0)),
            limits: [
                FINGER_SIZE.y / 2.0 / PIXELS_PER_METER,
                max_y.abs() / PIXELS_PER_METER,
            ],
            max_motor_force: FINGER_MOTOR_FORCE,
        })?;

        Ok(Self {
            body,
            joint,
            direction,
            max_y,
        })
    }

    /// The finger body.
    pub fn body(&self) -> &SimBody {
        &self.body
    }

    /// `+1` for the finger on the palm's positive Y side, `-1` otherwise.
    pub fn direction(&self) -> f32 {
        self.direction
    }

    /// Local Y of the finger when fully open, in pixels.
    pub fn max_y(&self) -> f32 {
        self.max_y
    }

    /// Drives the finger. Positive grip speeds close the hand.
    pub fn set_grip_speed(
        &self,
        physics: &mut dyn PhysicsProvider,
        speed: f32,
    ) -> Result<(), PhysicsError> {
        physics.set_motor_speed(self.joint, -speed)
    }
}

/// The user controlled gripper: a kinematic palm with two fingers.
///
/// Owns the adaptive controller and the velocity command applied last tick.
#[derive(Debug)]
pub struct Gripper {
    body: SimBody,
    fingers: [Finger; 2],
    controller: AdaptiveController,
    command: VelocityCommand,
}

impl Gripper {
    /// Builds the palm and both fingers.
    pub fn spawn(
        physics: &mut dyn PhysicsProvider,
        position: Vec2,
        angle: f32,
        control: &ControlConfig,
        now: Instant,
    ) -> Result<Self, PhysicsError> {
        let body = SimBody::spawn(
            physics,
            position,
            angle,
            GRIPPER_SIZE,
            Color::RED,
            BodyType::Kinematic,
        );
        let fingers = [
            Finger::spawn(physics, &body, false)?,
            Finger::spawn(physics, &body, true)?,
        ];
        Ok(Self {
            body,
            fingers,
            controller: AdaptiveController::new(control, now),
            command: VelocityCommand::default(),
        })
    }

    /// The palm body.
    pub fn body(&self) -> &SimBody {
        &self.body
    }

    /// Left and right finger.
    pub fn fingers(&self) -> &[Finger; 2] {
        &self.fingers
    }

    /// The adaptive DoF controller.
    pub fn controller(&self) -> &AdaptiveController {
        &self.controller
    }

    /// Mutable access to the adaptive DoF controller.
    pub fn controller_mut(&mut self) -> &mut AdaptiveController {
        &mut self.controller
    }

    /// The velocity command applied last tick, in the gripper frame.
    pub fn command(&self) -> VelocityCommand {
        self.command
    }

    /// Describes the scene from the gripper's point of view.
    pub fn state(
        &self,
        physics: &dyn PhysicsProvider,
        target: Vec2,
        boxes: [Pose2; 2],
    ) -> Result<GripperState, PhysicsError> {
        let target = self.body.local_point(physics, target)?;
        let mut relative = [ObjectPose::default(); 2];
        for (slot, pose) in relative.iter_mut().zip(boxes) {
            let seen = self.body.local_pose(physics, pose)?;
            *slot = ObjectPose::new(seen.translation, seen.angle);
        }
        Ok(GripperState::new(self.command.local, target, relative))
    }

    /// Runs the adaptive controller and applies this tick's velocity.
    #[allow(clippy::too_many_arguments)]
    pub fn update(
        &mut self,
        physics: &mut dyn PhysicsProvider,
        now: Instant,
        input: &InputSnapshot,
        bindings: &KeyBindings,
        control: &ControlConfig,
        speeds: &SpeedConfig,
        query: QueryState,
        channel: &mut dyn DofChannel,
    ) -> Result<(), PhysicsError> {
        self.controller
            .tick(now, input, bindings, control, query, channel);

        let store = self.controller.store();
        self.command = compute_velocity(
            input,
            bindings,
            store.dofs(),
            store.chosen(),
            control.adaptive_enabled,
            speeds,
        );
        log::trace!("Gripper command {:?}", self.command.local);

        let angle = self.body.angle(physics)?;
        self.body.set_velocity(
            physics,
            self.command.world_translation(angle),
            self.command.angular_deg(),
        )?;
        for finger in &self.fingers {
            finger.set_grip_speed(physics, self.command.grip())?;
        }
        Ok(())
    }

    /// Draws the palm and the fingers.
    pub fn draw<C: Canvas>(
        &self,
        physics: &dyn PhysicsProvider,
        canvas: &mut C,
    ) -> Result<(), PhysicsError> {
        self.body.draw(physics, canvas)?;
        for finger in &self.fingers {
            finger.body.draw(physics, canvas)?;
        }
        Ok(())
    }
}
