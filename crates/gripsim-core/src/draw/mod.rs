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

//! Renderer-agnostic draw commands.
//!
//! The simulation never talks to a graphics API. Every frame it emits an ordered
//! list of [`DrawCommand`]s into a [`Canvas`]; a front end replays them.

use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// An opaque RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Color {
    /// Black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);
    /// White.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Red.
    pub const RED: Self = Self::rgb(255, 0, 0);
    /// Blue.
    pub const BLUE: Self = Self::rgb(0, 0, 255);

    /// Creates a color from its channels.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "rgb({},{},{})", self.r, self.g, self.b)
    }
}

/// How a rectangle is painted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RectStyle {
    /// Fill color.
    pub fill: Color,
    /// Draw a thin black outline.
    pub outline: bool,
}

impl RectStyle {
    /// A filled rectangle with outline.
    pub const fn outlined(fill: Color) -> Self {
        Self {
            fill,
            outline: true,
        }
    }

    /// A filled rectangle without outline.
    pub const fn filled(fill: Color) -> Self {
        Self {
            fill,
            outline: false,
        }
    }
}

/// Horizontal anchoring of text.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextAlign {
    /// Anchor at the left edge.
    #[default]
    Left,
    /// Anchor at the center.
    Center,
    /// Anchor at the right edge.
    Right,
}

/// Vertical anchoring of text.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TextBaseline {
    /// Anchor at the top.
    #[default]
    Top,
    /// Anchor at the middle.
    Middle,
    /// Anchor at the bottom.
    Bottom,
}

/// How a text is painted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Text color.
    pub color: Color,
    /// Horizontal anchoring.
    pub align: TextAlign,
    /// Vertical anchoring.
    pub baseline: TextBaseline,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            align: TextAlign::Left,
            baseline: TextBaseline::Top,
        }
    }
}

impl TextStyle {
    /// Overrides the alignment.
    pub const fn align(mut self, align: TextAlign) -> Self {
        self.align = align;
        self
    }

    /// Overrides the baseline.
    pub const fn baseline(mut self, baseline: TextBaseline) -> Self {
        self.baseline = baseline;
        self
    }

    /// Overrides the color.
    pub const fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }
}

/// A single drawing instruction in screen pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    /// Clear the whole canvas.
    Clear,
    /// A rotated rectangle.
    Rect {
        /// Center of the rectangle.
        center: Vec2,
        /// Width and height.
        size: Vec2,
        /// Rotation in radians.
        angle: f32,
        /// Paint style.
        style: RectStyle,
    },
    /// A filled, outlined circle.
    Circle {
        /// Center of the circle.
        center: Vec2,
        /// Radius.
        radius: f32,
        /// Fill color.
        color: Color,
    },
    /// A line of text.
    Text {
        /// Anchor point.
        position: Vec2,
        /// The text.
        text: String,
        /// Paint style.
        style: TextStyle,
    },
    /// Connected line segments.
    Polyline {
        /// Vertices in order.
        points: Vec<Vec2>,
        /// Stroke color.
        color: Color,
        /// Stroke width.
        width: f32,
    },
}

/// A target for draw commands.
pub trait Canvas {
    /// Canvas width and height in pixels.
    fn size(&self) -> Vec2;

    /// Records one command.
    fn submit(&mut self, command: DrawCommand);

    /// Clears the canvas.
    fn clear(&mut self) {
        self.submit(DrawCommand::Clear);
    }

    /// Draws a rotated rectangle.
    fn rect(&mut self, center: Vec2, size: Vec2, angle: f32, style: RectStyle) {
        self.submit(DrawCommand::Rect {
            center,
            size,
            angle,
            style,
        });
    }

    /// Draws a circle.
    fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        self.submit(DrawCommand::Circle {
            center,
            radius,
            color,
        });
    }

    /// Writes a line of text.
    fn text(&mut self, position: Vec2, text: impl Into<String>, style: TextStyle)
    where
        Self: Sized,
    {
        self.submit(DrawCommand::Text {
            position,
            text: text.into(),
            style,
        });
    }

    /// Draws connected line segments.
    fn polyline(&mut self, points: Vec<Vec2>, color: Color, width: f32) {
        self.submit(DrawCommand::Polyline {
            points,
            color,
            width,
        });
    }
}

/// A [`Canvas`] that simply collects the commands of a frame.
#[derive(Debug, Clone, PartialEq)]
pub struct DrawList {
    size: Vec2,
    commands: Vec<DrawCommand>,
}

impl DrawList {
    /// Creates an empty list for a canvas of `size` pixels.
    pub fn new(size: Vec2) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    /// The commands recorded so far.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Removes and returns the recorded commands.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        std::mem::take(&mut self.commands)
    }

    /// Iterates over the texts written so far.
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Canvas for DrawList {
    fn size(&self) -> Vec2 {
        self.size
    }

    fn submit(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }
}
