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

//! Recording of gripper states for offline training.
//!
//! The simulation publishes [`RecordingEvent`]s on an event bus; a [`Recorder`]
//! consumes them on its own thread.

use std::path::PathBuf;

use thiserror::Error;

use crate::control::GripperState;

/// CSV header of a recording, in [`GripperState`] order.
pub const RECORDING_HEADER: [&str; GripperState::LEN] = [
    "gripperX",
    "gripperY",
    "gripperRot",
    "gripperGrasp",
    "targetX",
    "targetY",
    "box1X",
    "box1Y",
    "box1Rot",
    "box2X",
    "box2Y",
    "box2Rot",
];

/// Reply sent back when a recording has been written.
pub const STOP_CONFIRMATION: &str = "Recording Stored";

/// Appends the pole marker to a recording comment.
pub fn annotate_comment(comment: &str, poles: bool) -> String {
    let marker = if poles { "; poles used" } else { "; no poles" };
    format!("{comment}{marker}")
}

/// Events sent from the simulation to the recorder.
#[derive(Debug, Clone)]
pub enum RecordingEvent {
    /// Start a new, empty log.
    StartRecording,
    /// Append one state row.
    StoreState([f32; GripperState::LEN]),
    /// Write the log with a comment. The confirmation text is sent on `reply`.
    StopRecording {
        /// Free text stored next to the log.
        comment: String,
        /// Receives the confirmation, if the caller wants one.
        reply: Option<flume::Sender<String>>,
    },
    /// The scene restarted; separates runs with a row of zeros.
    RestartingSimulation,
}

/// Errors raised while persisting a recording.
#[derive(Debug, Error)]
pub enum RecordingError {
    /// Writing a file failed.
    #[error("failed to write recording {path:?}: {source}")]
    Io {
        /// The file being written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Storage for recorded runs.
pub trait Recorder: Send {
    /// Starts a new log, discarding any unsaved one.
    fn start(&mut self);

    /// Appends a row if recording.
    fn store_state(&mut self, state: &[f32; GripperState::LEN]);

    /// Marks a restart with a zero row, if recording and the log is not empty.
    fn restart(&mut self);

    /// Persists the log. Returns `Ok(None)` if nothing was being recorded.
    fn stop(&mut self, comment: &str) -> Result<Option<String>, RecordingError>;

    /// Returns `true` while a log is open.
    fn is_recording(&self) -> bool;

    /// Dispatches one event to the matching method.
    fn handle(&mut self, event: RecordingEvent) -> Result<(), RecordingError> {
        match event {
            RecordingEvent::StartRecording => self.start(),
            RecordingEvent::StoreState(state) => self.store_state(&state),
            RecordingEvent::RestartingSimulation => self.restart(),
            RecordingEvent::StopRecording { comment, reply } => {
                if let Some(confirmation) = self.stop(&comment)? {
                    if let Some(reply) = reply {
                        // The requester may have gone away; the log is stored either way.
                        let _ = reply.send(confirmation);
                    }
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MemoryRecorder {
        rows: Option<Vec<[f32; GripperState::LEN]>>,
        stored: Vec<(String, usize)>,
    }

    impl Recorder for MemoryRecorder {
        fn start(&mut self) {
            self.rows = Some(Vec::new());
        }
        fn store_state(&mut self, state: &[f32; GripperState::LEN]) {
            if let Some(rows) = self.rows.as_mut() {
                rows.push(*state);
            }
        }
        fn restart(&mut self) {
            if let Some(rows) = self.rows.as_mut() {
                if !rows.is_empty() {
                    rows.push([0.0; GripperState::LEN]);
                }
            }
        }
        fn stop(&mut self, comment: &str) -> Result<Option<String>, RecordingError> {
            Ok(self.rows.take().map(|rows| {
                self.stored.push((comment.to_string(), rows.len()));
                STOP_CONFIRMATION.to_string()
            }))
        }
        fn is_recording(&self) -> bool {
            self.rows.is_some()
        }
    }

    #[test]
    fn test_handle_dispatches_and_replies() {
        let mut recorder = MemoryRecorder::default();
        let (tx, rx) = flume::unbounded();
        recorder.handle(RecordingEvent::RestartingSimulation).unwrap();
        recorder.handle(RecordingEvent::StartRecording).unwrap();
        recorder.handle(RecordingEvent::RestartingSimulation).unwrap();
        recorder.handle(RecordingEvent::StoreState([1.0; 12])).unwrap();
        recorder.handle(RecordingEvent::RestartingSimulation).unwrap();
        recorder
            .handle(RecordingEvent::StopRecording {
                comment: "run".into(),
                reply: Some(tx),
            })
            .unwrap();
        assert_eq!(recorder.stored, vec![("run".to_string(), 2)]);
        assert_eq!(rx.try_recv().unwrap(), STOP_CONFIRMATION);
        assert!(!recorder.is_recording());
    }

    #[test]
    fn test_annotate_comment() {
        assert_eq!(annotate_comment("grasp", true), "grasp; poles used");
        assert_eq!(annotate_comment("grasp", false), "grasp; no poles");
    }
}
