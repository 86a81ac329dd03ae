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

use gripsim_core::math::{Pose2, Vec2};
use gripsim_core::physics::{BodyHandle, ColliderHandle, JointHandle};
use rapier2d::prelude::{
    ColliderHandle as RapierColliderHandle, ImpulseJointHandle, Isometry, Point, Real,
    RigidBodyHandle, Vector,
};

pub fn to_rapier_vec(v: Vec2) -> Vector<Real> {
    Vector::new(v.x, v.y)
}

pub fn to_rapier_point(v: Vec2) -> Point<Real> {
    Point::new(v.x, v.y)
}

pub fn to_rapier_iso(pose: Pose2) -> Isometry<Real> {
    Isometry::new(to_rapier_vec(pose.translation), pose.angle)
}

pub fn from_rapier_vec(v: &Vector<Real>) -> Vec2 {
    Vec2::new(v.x, v.y)
}

pub fn from_rapier_iso(iso: &Isometry<Real>) -> Pose2 {
    Pose2::new(from_rapier_vec(&iso.translation.vector), iso.rotation.angle())
}

fn pack(index: u32, generation: u32) -> u64 {
    (u64::from(generation) << 32) | u64::from(index)
}

fn unpack(raw: u64) -> (u32, u32) {
    (raw as u32, (raw >> 32) as u32)
}

pub fn to_body_handle(handle: RigidBodyHandle) -> BodyHandle {
    let (index, generation) = handle.into_raw_parts();
    BodyHandle(pack(index, generation))
}

pub fn from_body_handle(handle: BodyHandle) -> RigidBodyHandle {
    let (index, generation) = unpack(handle.0);
    RigidBodyHandle::from_raw_parts(index, generation)
}

pub fn to_collider_handle(handle: RapierColliderHandle) -> ColliderHandle {
    let (index, generation) = handle.into_raw_parts();
    ColliderHandle(pack(index, generation))
}

pub fn from_collider_handle(handle: ColliderHandle) -> RapierColliderHandle {
    let (index, generation) = unpack(handle.0);
    RapierColliderHandle::from_raw_parts(index, generation)
}

pub fn to_joint_handle(handle: ImpulseJointHandle) -> JointHandle {
    let (index, generation) = handle.into_raw_parts();
    JointHandle(pack(index, generation))
}

pub fn from_joint_handle(handle: JointHandle) -> ImpulseJointHandle {
    let (index, generation) = unpack(handle.0);
    ImpulseJointHandle::from_raw_parts(index, generation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handle_packing_keeps_generation() {
        let raw = RigidBodyHandle::from_raw_parts(7, 3);
        let packed = to_body_handle(raw);
        assert_eq!(packed.0, (3u64 << 32) | 7);
        assert_eq!(from_body_handle(packed), raw);
    }

    #[test]
    fn test_iso_round_trip() {
        let pose = Pose2::new(Vec2::new(1.5, -2.0), 0.3);
        let back = from_rapier_iso(&to_rapier_iso(pose));
        assert!((back.translation.x - 1.5).abs() < 1e-6);
        assert!((back.angle - 0.3).abs() < 1e-6);
    }
}
