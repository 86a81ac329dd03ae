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

//! [`PhysicsProvider`] backed by `rapier2d`.

mod conversions;

use std::collections::HashMap;
use std::num::NonZeroUsize;

use gripsim_core::math::{Pose2, Vec2};
use gripsim_core::physics::{
    BodyDesc, BodyHandle, BodyType, ColliderDesc, ColliderHandle, FrictionJointDesc,
    JointHandle, PhysicsError, PhysicsProvider, PrismaticJointDesc,
};
use rapier2d::prelude::*;

use self::conversions::*;

/// Velocity solver iterations per step.
pub const VELOCITY_ITERATIONS: usize = 10;
/// Damping factor of the prismatic velocity motors.
const MOTOR_FACTOR: Real = 1.0;

#[derive(Debug, Clone, Copy)]
struct FrictionLink {
    body: RigidBodyHandle,
    max_force: Real,
    max_torque: Real,
}

#[derive(Debug, Clone, Copy)]
struct MassInfo {
    mass: Real,
    inertia: Real,
}

/// A complete top-down rapier world.
pub struct RapierPhysicsWorld {
    rigid_body_set: RigidBodySet,
    collider_set: ColliderSet,
    gravity: Vector<Real>,
    integration_parameters: IntegrationParameters,
    physics_pipeline: PhysicsPipeline,
    island_manager: IslandManager,
    broad_phase: BroadPhaseMultiSap,
    narrow_phase: NarrowPhase,
    impulse_joint_set: ImpulseJointSet,
    multibody_joint_set: MultibodyJointSet,
    ccd_solver: CCDSolver,
    friction_links: Vec<FrictionLink>,
    mass_info: HashMap<RigidBodyHandle, MassInfo>,
}

impl Default for RapierPhysicsWorld {
    fn default() -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        if let Some(iterations) = NonZeroUsize::new(VELOCITY_ITERATIONS) {
            integration_parameters.num_solver_iterations = iterations;
        }
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: vector![0.0, 0.0],
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: BroadPhaseMultiSap::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            friction_links: Vec::new(),
            mass_info: HashMap::new(),
        }
    }
}

impl RapierPhysicsWorld {
    /// Creates an empty world without gravity.
    pub fn new() -> Self {
        Self::default()
    }

    fn body(&self, handle: BodyHandle) -> Result<&RigidBody, PhysicsError> {
        self.rigid_body_set
            .get(from_body_handle(handle))
            .ok_or(PhysicsError::UnknownBody(handle))
    }

    fn body_mut(&mut self, handle: BodyHandle) -> Result<&mut RigidBody, PhysicsError> {
        self.rigid_body_set
            .get_mut(from_body_handle(handle))
            .ok_or(PhysicsError::UnknownBody(handle))
    }

    /// Removes the velocity that ground friction can absorb during `dt`.
    fn apply_ground_friction(&mut self, dt: Real) {
        for link in &self.friction_links {
            let Some(info) = self.mass_info.get(&link.body) else {
                continue;
            };
            let Some(rb) = self.rigid_body_set.get_mut(link.body) else {
                continue;
            };

            if info.mass > 0.0 {
                let linvel = *rb.linvel();
                let speed = linvel.norm();
                let budget = link.max_force * dt / info.mass;
                let reduced = if speed <= budget {
                    vector![0.0, 0.0]
                } else {
                    linvel * (1.0 - budget / speed)
                };
                rb.set_linvel(reduced, false);
            }

            if info.inertia > 0.0 {
                let angvel = rb.angvel();
                let budget = link.max_torque * dt / info.inertia;
                let reduced = if angvel.abs() <= budget {
                    0.0
                } else {
                    angvel - angvel.signum() * budget
                };
                rb.set_angvel(reduced, false);
            }
        }
    }
}

impl PhysicsProvider for RapierPhysicsWorld {
    fn step(&mut self, dt: f32) {
        self.integration_parameters.dt = dt;
        self.apply_ground_friction(dt);
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );
    }

    fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = to_rapier_vec(gravity);
    }

    fn add_body(&mut self, desc: &BodyDesc) -> BodyHandle {
        let rb_type = match desc.body_type {
            BodyType::Dynamic => RigidBodyType::Dynamic,
            BodyType::Static => RigidBodyType::Fixed,
            BodyType::Kinematic => RigidBodyType::KinematicVelocityBased,
        };
        let rigid_body = RigidBodyBuilder::new(rb_type)
            .position(to_rapier_iso(desc.pose))
            .linear_damping(0.0)
            .angular_damping(0.0)
            .can_sleep(false)
            .build();
        let handle = self.rigid_body_set.insert(rigid_body);

        let collider = ColliderBuilder::cuboid(desc.half_extents.x, desc.half_extents.y)
            .density(desc.material.density)
            .friction(desc.material.friction)
            .restitution(desc.material.restitution)
            .build();
        self.collider_set
            .insert_with_parent(collider, handle, &mut self.rigid_body_set);

        self.mass_info.insert(
            handle,
            MassInfo {
                mass: desc.mass(),
                inertia: desc.angular_inertia(),
            },
        );
        to_body_handle(handle)
    }

    fn add_ground(&mut self) -> BodyHandle {
        let handle = self.rigid_body_set.insert(RigidBodyBuilder::fixed().build());
        to_body_handle(handle)
    }

    fn add_collider(
        &mut self,
        body: BodyHandle,
        desc: &ColliderDesc,
    ) -> Result<ColliderHandle, PhysicsError> {
        self.body(body)?;
        let collider = ColliderBuilder::cuboid(desc.half_extents.x, desc.half_extents.y)
            .translation(to_rapier_vec(desc.offset))
            .density(desc.material.density)
            .friction(desc.material.friction)
            .restitution(desc.material.restitution)
            .build();
        let handle = self.collider_set.insert_with_parent(
            collider,
            from_body_handle(body),
            &mut self.rigid_body_set,
        );
        Ok(to_collider_handle(handle))
    }

    fn remove_collider(&mut self, handle: ColliderHandle) -> Result<(), PhysicsError> {
        self.collider_set
            .remove(
                from_collider_handle(handle),
                &mut self.island_manager,
                &mut self.rigid_body_set,
                true,
            )
            .map(|_| ())
            .ok_or(PhysicsError::UnknownCollider(handle))
    }

    fn add_prismatic_joint(
        &mut self,
        desc: &PrismaticJointDesc,
    ) -> Result<JointHandle, PhysicsError> {
        self.body(desc.body1)?;
        self.body(desc.body2)?;
        let axis = UnitVector::new_normalize(to_rapier_vec(desc.axis));
        let joint = PrismaticJointBuilder::new(axis)
            .local_anchor1(to_rapier_point(desc.anchor1))
            .local_anchor2(to_rapier_point(desc.anchor2))
            .limits(desc.limits)
            .motor_velocity(0.0, MOTOR_FACTOR)
            .motor_max_force(desc.max_motor_force)
            .contacts_enabled(false)
            .build();
        let handle = self.impulse_joint_set.insert(
            from_body_handle(desc.body1),
            from_body_handle(desc.body2),
            joint,
            true,
        );
        Ok(to_joint_handle(handle))
    }

    fn set_motor_speed(&mut self, joint: JointHandle, speed: f32) -> Result<(), PhysicsError> {
        let handle = from_joint_handle(joint);
        let joint_ref = self
            .impulse_joint_set
            .get_mut(handle)
            .ok_or(PhysicsError::UnknownJoint(joint))?;
        if joint_ref.data.motor(JointAxis::LinX).is_none() {
            return Err(PhysicsError::NoMotor(joint));
        }
        joint_ref
            .data
            .set_motor_velocity(JointAxis::LinX, speed, MOTOR_FACTOR);
        Ok(())
    }

    fn add_friction_joint(&mut self, desc: &FrictionJointDesc) -> Result<(), PhysicsError> {
        self.body(desc.body)?;
        self.body(desc.ground)?;
        self.friction_links.push(FrictionLink {
            body: from_body_handle(desc.body),
            max_force: desc.max_force,
            max_torque: desc.max_torque,
        });
        Ok(())
    }

    fn body_pose(&self, body: BodyHandle) -> Result<Pose2, PhysicsError> {
        Ok(from_rapier_iso(self.body(body)?.position()))
    }

    fn set_body_pose(&mut self, body: BodyHandle, pose: Pose2) -> Result<(), PhysicsError> {
        self.body_mut(body)?.set_position(to_rapier_iso(pose), true);
        Ok(())
    }

    fn set_velocity(
        &mut self,
        body: BodyHandle,
        linear: Vec2,
        angular: f32,
    ) -> Result<(), PhysicsError> {
        let rb = self.body_mut(body)?;
        rb.set_linvel(to_rapier_vec(linear), true);
        rb.set_angvel(angular, true);
        Ok(())
    }

    fn velocity(&self, body: BodyHandle) -> Result<(Vec2, f32), PhysicsError> {
        let rb = self.body(body)?;
        Ok((from_rapier_vec(rb.linvel()), rb.angvel()))
    }

    fn body_count(&self) -> usize {
        self.rigid_body_set.len()
    }

    fn world_point(&self, body: BodyHandle, local: Vec2) -> Result<Vec2, PhysicsError> {
        let p = self.body(body)?.position() * to_rapier_point(local);
        Ok(Vec2::new(p.x, p.y))
    }

    fn local_point(&self, body: BodyHandle, world: Vec2) -> Result<Vec2, PhysicsError> {
        let p = self
            .body(body)?
            .position()
            .inverse_transform_point(&to_rapier_point(world));
        Ok(Vec2::new(p.x, p.y))
    }

    fn world_vector(&self, body: BodyHandle, local: Vec2) -> Result<Vec2, PhysicsError> {
        let v = self.body(body)?.position() * to_rapier_vec(local);
        Ok(from_rapier_vec(&v))
    }
}
