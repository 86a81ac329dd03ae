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

use gripsim_core::draw::Color;
use gripsim_core::math::Vec2;
use gripsim_core::physics::{BodyType, PhysicsProvider};

use super::SimBody;

/// Thickness of the walls around the canvas, in pixels.
///
/// Thick walls keep fast bodies from tunnelling out of the scene.
pub const WALL_THICKNESS: f32 = 100.0;

/// Surrounds the canvas with four static walls lying just outside of it.
pub fn add_walls(physics: &mut dyn PhysicsProvider, canvas: Vec2) -> [SimBody; 4] {
    let (w, h, t) = (canvas.x, canvas.y, WALL_THICKNESS);
    let walls = [
        (Vec2::new(-t / 2.0, h / 2.0), Vec2::new(t, h)),
        (Vec2::new(w + t / 2.0, h / 2.0), Vec2::new(t, h)),
        (Vec2::new(w / 2.0, -t / 2.0), Vec2::new(w, t)),
        (Vec2::new(w / 2.0, h + t / 2.0), Vec2::new(w, t)),
    ];
    walls.map(|(center, size)| {
        SimBody::spawn(physics, center, 0.0, size, Color::WHITE, BodyType::Static)
    })
}
