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

use gripsim_core::draw::{Canvas, Color, RectStyle};
use gripsim_core::math::Vec2;
use gripsim_core::physics::{
    BodyHandle, BodyType, ColliderDesc, ColliderHandle, Material, PhysicsError, PhysicsProvider,
};

use super::{to_meters, SimBody};

/// Length and thickness of a pole, in pixels.
pub const POLE_SIZE: Vec2 = Vec2::new(30.0, 5.0);

/// Contact area used for the ground friction of every box.
const FRICTION_FOOTPRINT: Vec2 = Vec2::new(20.0, 20.0);

/// A box to be pushed around, optionally carrying a pole along its local X axis.
#[derive(Debug, Clone, Copy)]
pub struct GraspBox {
    body: SimBody,
    pole: Option<ColliderHandle>,
}

impl GraspBox {
    /// Adds a dynamic box resting on `ground`.
    pub fn spawn(
        physics: &mut dyn PhysicsProvider,
        ground: BodyHandle,
        position: Vec2,
        angle: f32,
        size: Vec2,
        poles: bool,
    ) -> Result<Self, PhysicsError> {
        let body = SimBody::spawn(
            physics,
            position,
            angle,
            size,
            Color::BLUE,
            BodyType::Dynamic,
        );
        body.add_ground_friction(physics, ground, BodyType::Dynamic, Some(FRICTION_FOOTPRINT))?;
        let mut grasp_box = Self { body, pole: None };
        grasp_box.set_pole(physics, poles)?;
        Ok(grasp_box)
    }

    /// The box body.
    pub fn body(&self) -> &SimBody {
        &self.body
    }

    /// Returns `true` if the box currently has a pole.
    pub fn has_pole(&self) -> bool {
        self.pole.is_some()
    }

    fn pole_offset(&self) -> Vec2 {
        Vec2::new((self.body.size().x + POLE_SIZE.x) / 2.0, 0.0)
    }

    /// Adds or removes the pole.
    pub fn set_pole(
        &mut self,
        physics: &mut dyn PhysicsProvider,
        enabled: bool,
    ) -> Result<(), PhysicsError> {
        match (enabled, self.pole) {
            (true, None) => {
                let desc = ColliderDesc {
                    half_extents: to_meters(POLE_SIZE * 0.5),
                    offset: to_meters(self.pole_offset()),
                    material: Material::default(),
                };
                self.pole = Some(physics.add_collider(self.body.handle(), &desc)?);
            }
            (false, Some(pole)) => {
                physics.remove_collider(pole)?;
                self.pole = None;
            }
            _ => {}
        }
        Ok(())
    }

    /// Draws the box and its pole.
    pub fn draw<C: Canvas>(
        &self,
        physics: &dyn PhysicsProvider,
        canvas: &mut C,
    ) -> Result<(), PhysicsError> {
        self.body.draw(physics, canvas)?;
        if self.pole.is_some() {
            let center = self.body.world_point(physics, self.pole_offset())?;
            canvas.rect(
                center,
                POLE_SIZE,
                self.body.angle(physics)?,
                RectStyle::outlined(self.body.color()),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gripsim_core::draw::{DrawCommand, DrawList};
    use gripsim_infra::RapierPhysicsWorld;

    #[test]
    fn test_pole_toggles_collider_and_drawing() {
        let mut physics = RapierPhysicsWorld::new();
        let ground = physics.add_ground();
        let mut b = GraspBox::spawn(
            &mut physics,
            ground,
            Vec2::new(100.0, 100.0),
            0.0,
            Vec2::new(30.0, 30.0),
            true,
        )
        .unwrap();
        assert!(b.has_pole());

        let mut list = DrawList::new(Vec2::new(400.0, 400.0));
        b.draw(&physics, &mut list).unwrap();
        assert_eq!(list.commands().len(), 2);
        match &list.commands()[1] {
            DrawCommand::Rect { center, size, .. } => {
                assert!((center.x - 130.0).abs() < 1e-3);
                assert_eq!(*size, POLE_SIZE);
            }
            other => panic!("unexpected {other:?}"),
        }

        b.set_pole(&mut physics, false).unwrap();
        assert!(!b.has_pole());
        b.set_pole(&mut physics, false).unwrap();
        let mut list = DrawList::new(Vec2::new(400.0, 400.0));
        b.draw(&physics, &mut list).unwrap();
        assert_eq!(list.commands().len(), 1);
    }
}
