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

use std::fs;
use std::time::Duration;

use gripsim_core::event::EventBus;
use gripsim_core::recording::{annotate_comment, RecordingEvent, STOP_CONFIRMATION};
use gripsim_infra::{CsvRecorder, RecorderWorker};

#[test]
fn test_worker_stores_recording_and_replies() {
    let tmp = tempfile::tempdir().unwrap();
    let bus = EventBus::<RecordingEvent>::default();
    let worker =
        RecorderWorker::spawn(Box::new(CsvRecorder::new(tmp.path())), bus.subscriber()).unwrap();

    bus.publish(RecordingEvent::StartRecording);
    bus.publish(RecordingEvent::StoreState([1.0; 12]));
    bus.publish(RecordingEvent::RestartingSimulation);
    bus.publish(RecordingEvent::StoreState([2.0; 12]));
    let (reply_tx, reply_rx) = flume::bounded(1);
    bus.publish(RecordingEvent::StopRecording {
        comment: annotate_comment("lift", true),
        reply: Some(reply_tx),
    });

    let reply = reply_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    assert_eq!(reply, STOP_CONFIRMATION);

    drop(bus);
    worker.join();

    let mut csv = None;
    let mut comment = None;
    for entry in fs::read_dir(tmp.path()).unwrap() {
        let path = entry.unwrap().path();
        match path.extension().and_then(|e| e.to_str()) {
            Some("csv") => csv = Some(path),
            Some("comment") => comment = Some(path),
            _ => {}
        }
    }
    let rows = fs::read_to_string(csv.unwrap()).unwrap();
    assert_eq!(rows.lines().count(), 4);
    assert_eq!(
        fs::read_to_string(comment.unwrap()).unwrap(),
        "lift; poles used"
    );
}

#[test]
fn test_worker_flushes_open_log_on_shutdown() {
    let tmp = tempfile::tempdir().unwrap();
    let bus = EventBus::<RecordingEvent>::default();
    let worker =
        RecorderWorker::spawn(Box::new(CsvRecorder::new(tmp.path())), bus.subscriber()).unwrap();
    bus.publish(RecordingEvent::StartRecording);
    bus.publish(RecordingEvent::StoreState([5.0; 12]));
    drop(bus);
    worker.join();

    let names: Vec<String> = fs::read_dir(tmp.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names.len(), 1);
    assert!(names[0].ends_with("_disconnect.csv"));
}
