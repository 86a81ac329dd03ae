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

//! The heads-up display: DoF table, DoF arrows, frame rate.

use std::time::{Duration, Instant};

use gripsim_core::control::{ChosenDofs, DofSet, EigVals, SpeedConfig, DOF_COUNT};
use gripsim_core::draw::{Canvas, Color, RectStyle, TextAlign, TextBaseline, TextStyle};
use gripsim_core::math::{degrees_to_radians, DofVector, Pose2, Vec2};

/// Highlight colors of the adaptive axes, in axis order.
pub const AXIS_COLORS: [Color; DOF_COUNT] = [
    Color::rgb(0, 127, 255),
    Color::rgb(172, 229, 238),
    Color::rgb(255, 165, 0),
    Color::rgb(50, 205, 50),
];

/// Number of integration steps of a DoF arrow.
const ARROW_STEPS: usize = 10;
/// Arrow length relative to one second of motion.
const ARROW_SCALE: f32 = 0.2;
/// Opening angle of an arrow head, in degrees.
const ARROW_HEAD_DEG: f32 = 20.0;
/// Length of a finger arrow per unit of grip.
const FINGER_ARROW_LENGTH: f32 = 30.0;
const LINE_WIDTH: f32 = 4.0;

/// Counts frames and reports the rate once per second.
#[derive(Debug, Clone, Copy)]
pub struct FpsCounter {
    frames: u32,
    since: Instant,
    fps: f32,
}

impl FpsCounter {
    /// Starts counting at `now`.
    pub fn new(now: Instant) -> Self {
        Self {
            frames: 0,
            since: now,
            fps: 0.0,
        }
    }

    /// Registers a frame and returns the last measured rate.
    pub fn tick(&mut self, now: Instant) -> f32 {
        self.frames += 1;
        let elapsed = now.saturating_duration_since(self.since);
        if elapsed > Duration::from_secs(1) {
            self.fps = self.frames as f32 / elapsed.as_secs_f32();
            self.since = now;
            self.frames = 0;
        }
        self.fps
    }

    /// The last measured rate.
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

/// Where the gripper and its fingers are, for drawing the DoF arrows.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GripperPose {
    /// Palm pose in pixels.
    pub palm: Pose2,
    /// Local Y of each finger when fully open.
    pub finger_max_y: [f32; 2],
    /// Finger poses in pixels.
    pub fingers: [Pose2; 2],
    /// Opening direction of each finger.
    pub finger_directions: [f32; 2],
}

/// Adds an arrow head to the end of `line`.
///
/// The head's legs are `scale` times the last segment, turned by the head angle.
fn with_arrow_head(mut line: Vec<Vec2>, scale: f32) -> Vec<Vec2> {
    if line.len() < 2 {
        return line;
    }
    let tip = line[line.len() - 1];
    let back = (line[line.len() - 2] - tip) * scale;
    let head = degrees_to_radians(ARROW_HEAD_DEG);
    line.push(tip + back.rotate(head));
    line.push(tip + back.rotate(-head));
    line.push(tip);
    line
}

/// Draws where the gripper would go by following `dof`.
pub fn draw_dof_arrow<C: Canvas>(
    canvas: &mut C,
    gripper: &GripperPose,
    dof: DofVector,
    speeds: &SpeedConfig,
    color: Color,
) {
    let step = speeds.scale(dof) * ARROW_SCALE;

    let mut centers = Vec::with_capacity(ARROW_STEPS + 1);
    let mut angles = Vec::with_capacity(ARROW_STEPS + 1);
    centers.push(gripper.palm.translation);
    angles.push(gripper.palm.angle);
    for i in 0..ARROW_STEPS {
        centers.push(centers[i] + step.translation().rotate(angles[i]));
        angles.push(angles[i] + degrees_to_radians(step.drot));
    }

    for max_y in gripper.finger_max_y {
        let edge = Vec2::new(0.0, max_y);
        let line = centers
            .iter()
            .zip(&angles)
            .map(|(&c, &a)| c + edge.rotate(a))
            .collect();
        canvas.polyline(with_arrow_head(line, 1.0), color, LINE_WIDTH);
    }

    if dof.dgrip != 0.0 {
        for (pose, direction) in gripper.fingers.iter().zip(gripper.finger_directions) {
            let reach = Vec2::new(0.0, direction * dof.dgrip.abs() * FINGER_ARROW_LENGTH)
                .rotate(pose.angle);
            let mut line = vec![pose.translation + reach, pose.translation];
            if dof.dgrip < 0.0 {
                line.reverse();
            }
            canvas.polyline(with_arrow_head(line, 0.5), color, LINE_WIDTH);
        }
    }
}

/// Draws the DoF table with highlighted chosen slots, and the arrows of the chosen DoFs.
pub fn draw_dofs<C: Canvas>(
    canvas: &mut C,
    gripper: &GripperPose,
    dofs: &DofSet,
    eig_vals: &EigVals,
    chosen: &ChosenDofs,
    speeds: &SpeedConfig,
) {
    let right = TextStyle::default().align(TextAlign::Right);
    for slot in (0..DOF_COUNT).rev() {
        let dof = dofs[slot];
        let column = slot as f32 * 50.0;
        if let Some(axis) = chosen.axis_of(slot) {
            let color = AXIS_COLORS[axis];
            canvas.rect(
                Vec2::new(33.0 + column, 58.0),
                Vec2::new(45.0, 80.0),
                0.0,
                RectStyle::filled(color),
            );
            draw_dof_arrow(canvas, gripper, dof, speeds, color);
        }
        for (row, value) in dof.to_array().iter().enumerate() {
            canvas.text(
                Vec2::new(55.0 + column, 20.0 + row as f32 * 20.0),
                format!("{value:.2}"),
                right,
            );
        }
        canvas.text(
            Vec2::new(55.0 + column, 105.0),
            format!("{:.2}", eig_vals[slot]),
            right,
        );
    }
}

/// Writes the frame rate in the bottom right corner.
pub fn draw_fps<C: Canvas>(canvas: &mut C, fps: f32) {
    let size = canvas.size();
    canvas.text(
        size,
        format!("{fps:.2} FPS"),
        TextStyle::default()
            .align(TextAlign::Right)
            .baseline(TextBaseline::Bottom),
    );
}

/// Writes the stop notice in the top right corner.
pub fn draw_stopped<C: Canvas>(canvas: &mut C) {
    let size = canvas.size();
    canvas.text(
        Vec2::new(size.x, 0.0),
        "SIMULATION STOPPED!",
        TextStyle::default()
            .align(TextAlign::Right)
            .baseline(TextBaseline::Top)
            .color(Color::RED),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use gripsim_core::draw::{DrawCommand, DrawList};

    fn pose() -> GripperPose {
        GripperPose {
            palm: Pose2::new(Vec2::new(100.0, 100.0), 0.0),
            finger_max_y: [-37.5, 37.5],
            fingers: [
                Pose2::new(Vec2::new(122.5, 62.5), 0.0),
                Pose2::new(Vec2::new(122.5, 137.5), 0.0),
            ],
            finger_directions: [-1.0, 1.0],
        }
    }

    fn polylines(list: &DrawList) -> Vec<&Vec<Vec2>> {
        list.commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Polyline { points, .. } => Some(points),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_translation_arrow_integrates_ten_steps() {
        let mut list = DrawList::new(Vec2::new(800.0, 600.0));
        let speeds = SpeedConfig::default();
        draw_dof_arrow(&mut list, &pose(), DofVector::TRANSLATE_X, &speeds, Color::BLUE);
        let lines = polylines(&list);
        assert_eq!(lines.len(), 2);
        // 11 path points plus the three points of the head.
        assert_eq!(lines[0].len(), ARROW_STEPS + 1 + 3);
        let end = lines[0][ARROW_STEPS];
        assert!((end.x - 200.0).abs() < 1e-3, "{end:?}");
        assert!((end.y - 62.5).abs() < 1e-3);
    }

    #[test]
    fn test_grip_dof_adds_finger_arrows() {
        let mut list = DrawList::new(Vec2::new(800.0, 600.0));
        let speeds = SpeedConfig::default();
        draw_dof_arrow(&mut list, &pose(), DofVector::GRIP, &speeds, Color::BLUE);
        let lines = polylines(&list);
        assert_eq!(lines.len(), 4);
        // Closing: the arrow runs from outside the finger towards it.
        assert_eq!(lines[3][0], Vec2::new(122.5, 167.5));
        assert_eq!(lines[3][1], Vec2::new(122.5, 137.5));
    }

    #[test]
    fn test_table_highlights_chosen_slots() {
        let mut list = DrawList::new(Vec2::new(800.0, 600.0));
        let chosen = ChosenDofs::new(&[2, 0]).unwrap();
        draw_dofs(
            &mut list,
            &pose(),
            &DofSet::initial(),
            &[4.0, 3.0, 2.0, 1.0],
            &chosen,
            &SpeedConfig::default(),
        );
        let highlights: Vec<_> = list
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Rect { center, style, .. } => Some((center.x, style.fill)),
                _ => None,
            })
            .collect();
        // Slots are drawn from last to first.
        assert_eq!(highlights, vec![(133.0, AXIS_COLORS[0]), (33.0, AXIS_COLORS[1])]);
        let texts: Vec<_> = list.texts().collect();
        assert_eq!(texts.len(), 4 * 5);
        assert!(texts.contains(&"0.71"));
        assert!(texts.contains(&"4.00"));
    }

    #[test]
    fn test_fps_counter_updates_once_per_second() {
        let t0 = Instant::now();
        let mut counter = FpsCounter::new(t0);
        for i in 1..=30 {
            counter.tick(t0 + Duration::from_millis(i * 34));
        }
        assert!(counter.fps() > 0.0);
        assert!((counter.fps() - 30.0 / 1.02).abs() < 0.1);
    }

    #[test]
    fn test_stopped_notice() {
        let mut list = DrawList::new(Vec2::new(800.0, 600.0));
        draw_stopped(&mut list);
        assert_eq!(list.texts().collect::<Vec<_>>(), vec!["SIMULATION STOPPED!"]);
    }
}
