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

use gripsim_core::draw::{Canvas, Color};
use gripsim_core::math::Vec2;

/// Radius of the target marker, in pixels.
pub const TARGET_RADIUS: f32 = 10.0;

/// Where the boxes should end up. Purely visual, it has no body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Target {
    /// Position in pixels.
    pub position: Vec2,
}

impl Target {
    /// Places the target.
    pub fn new(position: Vec2) -> Self {
        Self { position }
    }

    /// Draws the target as a red disc.
    pub fn draw<C: Canvas>(&self, canvas: &mut C) {
        canvas.circle(self.position, TARGET_RADIUS, Color::RED);
    }
}
