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

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use gripsim_core::control::GripperState;
use gripsim_core::recording::{Recorder, RecordingError, RECORDING_HEADER, STOP_CONFIRMATION};

type Row = [f32; GripperState::LEN];

/// Comment written when the user did not supply one.
const EMPTY_COMMENT: &str = "(no comment)";

/// Writes recordings as CSV files into a directory.
///
/// A stopped recording produces `<stamp>.csv` and `<stamp>.comment`, where the
/// stamp is the number of milliseconds since the Unix epoch. A recording still
/// open when the recorder is dropped is flushed to `<stamp>_disconnect.csv`.
#[derive(Debug)]
pub struct CsvRecorder {
    dir: PathBuf,
    rows: Option<Vec<Row>>,
}

impl CsvRecorder {
    /// Creates a recorder writing into `dir`. The directory is created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            rows: None,
        }
    }

    /// Directory the recordings are written to.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Number of rows in the open log, if any.
    pub fn row_count(&self) -> Option<usize> {
        self.rows.as_ref().map(Vec::len)
    }

    fn stamp() -> u128 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis())
            .unwrap_or_default()
    }

    fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> RecordingError + '_ {
        move |source| RecordingError::Io {
            path: path.to_path_buf(),
            source,
        }
    }

    fn write_csv(&self, path: &Path, rows: &[Row]) -> Result<(), RecordingError> {
        fs::create_dir_all(&self.dir).map_err(Self::io_error(&self.dir))?;
        let file = File::create(path).map_err(Self::io_error(path))?;
        let mut out = BufWriter::new(file);
        writeln!(out, "{}", RECORDING_HEADER.join(",")).map_err(Self::io_error(path))?;
        for row in rows {
            let line = row
                .iter()
                .map(|v| v.to_string())
                .collect::<Vec<_>>()
                .join(",");
            writeln!(out, "{line}").map_err(Self::io_error(path))?;
        }
        out.flush().map_err(Self::io_error(path))
    }
}

impl Recorder for CsvRecorder {
    fn start(&mut self) {
        if self.rows.is_some() {
            log::warn!("Recording restarted before being stored; discarding the open log.");
        }
        self.rows = Some(Vec::new());
        log::info!("Recording started.");
    }

    fn store_state(&mut self, state: &Row) {
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
        let Some(rows) = self.rows.as_ref() else {
            log::warn!("Stop requested but nothing is being recorded.");
            return Ok(None);
        };

        let comment = if comment.trim().is_empty() {
            log::warn!("Recording stored without a comment.");
            EMPTY_COMMENT
        } else {
            comment
        };

        let stamp = Self::stamp();
        let csv_path = self.dir.join(format!("{stamp}.csv"));
        self.write_csv(&csv_path, rows)?;
        let comment_path = self.dir.join(format!("{stamp}.comment"));
        fs::write(&comment_path, comment).map_err(Self::io_error(&comment_path))?;

        // The log stays open until both files are on disk.
        let stored = self.rows.take().map_or(0, |rows| rows.len());
        log::info!("Recording of {stored} rows stored in {:?}.", csv_path);
        Ok(Some(STOP_CONFIRMATION.to_string()))
    }

    fn is_recording(&self) -> bool {
        self.rows.is_some()
    }
}

impl Drop for CsvRecorder {
    fn drop(&mut self) {
        if let Some(rows) = self.rows.take() {
            let path = self.dir.join(format!("{}_disconnect.csv", Self::stamp()));
            match self.write_csv(&path, &rows) {
                Ok(()) => log::info!("Open recording flushed to {:?}.", path),
                Err(e) => log::error!("{e}"),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn files_with_extension(dir: &Path, ext: &str) -> Vec<PathBuf> {
        fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().path())
            .filter(|p| p.extension().is_some_and(|e| e == ext))
            .collect()
    }

    #[test]
    fn test_stop_writes_csv_and_comment() {
        let tmp = tempfile::tempdir().unwrap();
        let mut recorder = CsvRecorder::new(tmp.path().join("logs"));
        recorder.start();
        recorder.store_state(&[1.5; 12]);
        recorder.restart();
        recorder.store_state(&[2.0; 12]);
        let reply = recorder.stop("push; no poles").unwrap();
        assert_eq!(reply.as_deref(), Some(STOP_CONFIRMATION));

        let dir = recorder.dir().to_path_buf();
        let csv = files_with_extension(&dir, "csv");
        assert_eq!(csv.len(), 1);
        let text = fs::read_to_string(&csv[0]).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], RECORDING_HEADER.join(","));
        assert_eq!(lines.len(), 4);
        assert!(lines[1].starts_with("1.5,1.5"));
        assert_eq!(lines[2], vec!["0"; 12].join(","));

        let comment = files_with_extension(&dir, "comment");
        assert_eq!(fs::read_to_string(&comment[0]).unwrap(), "push; no poles");
    }

    #[test]
    fn test_restart_on_empty_log_adds_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let mut recorder = CsvRecorder::new(tmp.path());
        recorder.restart();
        assert_eq!(recorder.row_count(), None);
        recorder.start();
        recorder.restart();
        assert_eq!(recorder.row_count(), Some(0));
    }

    #[test]
    fn test_stop_without_recording_writes_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let mut recorder = CsvRecorder::new(tmp.path());
        assert_eq!(recorder.stop("x").unwrap(), None);
        assert!(fs::read_dir(tmp.path()).unwrap().next().is_none());
    }

    #[test]
    fn test_failed_stop_keeps_the_log_open() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not_a_dir");
        fs::write(&blocker, "").unwrap();

        let mut recorder = CsvRecorder::new(&blocker);
        recorder.start();
        recorder.store_state(&[1.0; 12]);
        assert!(matches!(recorder.stop("c"), Err(RecordingError::Io { .. })));
        assert!(recorder.is_recording());
        assert_eq!(recorder.row_count(), Some(1));

        recorder.dir = tmp.path().join("logs");
        assert_eq!(recorder.stop("c").unwrap().as_deref(), Some(STOP_CONFIRMATION));
        assert!(!recorder.is_recording());
        assert_eq!(files_with_extension(&tmp.path().join("logs"), "csv").len(), 1);
    }

    #[test]
    fn test_drop_while_recording_flushes_disconnect_log() {
        let tmp = tempfile::tempdir().unwrap();
        {
            let mut recorder = CsvRecorder::new(tmp.path());
            recorder.start();
            recorder.store_state(&[3.0; 12]);
        }
        let csv = files_with_extension(tmp.path(), "csv");
        assert_eq!(csv.len(), 1);
        let name = csv[0].file_name().unwrap().to_string_lossy().into_owned();
        assert!(name.ends_with("_disconnect.csv"), "{name}");
    }
}
