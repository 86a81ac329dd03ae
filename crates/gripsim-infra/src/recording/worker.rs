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

use std::thread::{self, JoinHandle};

use gripsim_core::recording::{Recorder, RecordingEvent};

/// Runs a [`Recorder`] on a dedicated thread, fed by a recording event channel.
///
/// The thread exits once every sender of the channel has been dropped; the
/// recorder is dropped on that thread.
pub struct RecorderWorker {
    handle: Option<JoinHandle<()>>,
}

impl RecorderWorker {
    /// Spawns the worker thread.
    pub fn spawn(
        mut recorder: Box<dyn Recorder>,
        events: flume::Receiver<RecordingEvent>,
    ) -> std::io::Result<Self> {
        let handle = thread::Builder::new()
            .name("gripsim-recorder".into())
            .spawn(move || {
                log::debug!("Recorder thread started.");
                for event in events.iter() {
                    log::trace!("Recorder event: {:?}", event);
                    if let Err(e) = recorder.handle(event) {
                        log::error!("{e}");
                    }
                }
                log::debug!("Recorder thread stopped.");
            })?;
        Ok(Self {
            handle: Some(handle),
        })
    }

    /// Waits for the worker to drain its channel and exit.
    ///
    /// Blocks until every sender feeding the worker is gone.
    pub fn join(mut self) {
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                log::error!("Recorder thread panicked.");
            }
        }
    }
}

impl std::fmt::Debug for RecorderWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecorderWorker")
            .field("running", &self.handle.is_some())
            .finish()
    }
}
