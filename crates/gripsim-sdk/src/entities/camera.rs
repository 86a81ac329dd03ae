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

use gripsim_core::control::GripperState;
use gripsim_core::draw::{Canvas, TextAlign, TextBaseline, TextStyle};
use gripsim_core::math::Vec2;
use gripsim_core::recording::RecordingEvent;

/// Streams the gripper state to the recorder and counts runs.
///
/// A run is one scene between two restarts. The counter survives restarts and
/// goes back to zero whenever recording is off.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RecordingCamera {
    run: u32,
}

impl RecordingCamera {
    /// Creates a camera at run zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current run number.
    pub fn run(&self) -> u32 {
        self.run
    }

    /// Called once per tick with the current state.
    pub fn update(
        &mut self,
        recording: bool,
        state: &GripperState,
        sink: &flume::Sender<RecordingEvent>,
    ) {
        if recording {
            if sink.send(RecordingEvent::StoreState(state.to_array())).is_err() {
                log::debug!("No recorder attached, state dropped.");
            }
        } else {
            self.run = 0;
        }
    }

    /// Called when the scene restarts.
    pub fn count_restart(&mut self) {
        self.run += 1;
    }

    /// Shows the run number while recording.
    pub fn draw<C: Canvas>(&self, recording: bool, canvas: &mut C) {
        if recording {
            let size = canvas.size();
            canvas.text(
                Vec2::new(size.x, 0.0),
                format!("Recording run #{}", self.run),
                TextStyle::default()
                    .align(TextAlign::Right)
                    .baseline(TextBaseline::Top),
            );
        }
    }
}
