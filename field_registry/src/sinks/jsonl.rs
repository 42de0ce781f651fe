//! JSON-lines structured-log writer.
//!
//! Writes one JSON object per record to a buffered file, suitable for
//! offline 3D replay tooling:
//!
//! ```text
//! {"path":"/Field/GamePiece","poses":[{"x":..,"y":..,"z":..,"rotation":{..}}]}
//! {"path":"/Field/Robot","pose":{"x":..,"y":..,"theta":..}}
//! ```
//!
//! The writer is best-effort: a failed write never reaches the publish
//! cycle. Failures increment a dropped-record counter and emit a warning.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use serde::Serialize;
use tracing::warn;

use field_common::geometry::{Pose2d, Pose3d};

use super::{SinkError, TelemetrySink};

#[derive(Serialize)]
struct ArrayRecord<'a> {
    path: &'a str,
    poses: &'a [Pose3d],
}

#[derive(Serialize)]
struct PoseRecord<'a> {
    path: &'a str,
    pose: Pose2d,
}

/// Buffered JSON-lines telemetry sink.
pub struct JsonlTelemetry {
    writer: BufWriter<File>,
    dropped: u64,
}

impl JsonlTelemetry {
    /// Create (or truncate) the output file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`SinkError::Open`] when the file cannot be created.
    pub fn create(path: &Path) -> Result<Self, SinkError> {
        let file = File::create(path).map_err(|source| SinkError::Open {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self {
            writer: BufWriter::new(file),
            dropped: 0,
        })
    }

    /// Flush buffered records to disk. Call at shutdown and at match
    /// boundaries; records are otherwise flushed whenever the buffer
    /// fills.
    pub fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }

    /// Number of records lost to write failures.
    pub fn dropped_records(&self) -> u64 {
        self.dropped
    }

    fn write_line<R: Serialize>(&mut self, record: &R) {
        let result = serde_json::to_writer(&mut self.writer, record)
            .map_err(io::Error::from)
            .and_then(|()| self.writer.write_all(b"\n"));
        if let Err(e) = result {
            self.dropped += 1;
            warn!("telemetry record dropped: {e}");
        }
    }
}

impl TelemetrySink for JsonlTelemetry {
    fn record_poses(&mut self, path: &str, poses: &[Pose3d]) {
        self.write_line(&ArrayRecord { path, poses });
    }

    fn record_pose(&mut self, path: &str, pose: Pose2d) {
        self.write_line(&PoseRecord { path, pose });
    }
}
