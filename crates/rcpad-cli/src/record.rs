//! NDJSON recording of dispatched commands.

use rcpad::Command;
use serde::Serialize;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

/// One line of a recording.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct EventRecord {
    /// Milliseconds since the recorder was created.
    pub elapsed_ms: u64,
    pub command: Command,
}

/// Appends one JSON object per command to a file.
#[derive(Debug)]
pub struct EventRecorder {
    started: Instant,
    out: Mutex<BufWriter<File>>,
}

impl EventRecorder {
    /// Open `path` for appending, creating it if needed.
    pub fn create(path: &Path) -> io::Result<Self> {
        let file = File::options().create(true).append(true).open(path)?;
        Ok(Self {
            started: Instant::now(),
            out: Mutex::new(BufWriter::new(file)),
        })
    }

    pub fn record(&self, command: Command) -> io::Result<()> {
        let record = EventRecord {
            elapsed_ms: u64::try_from(self.started.elapsed().as_millis()).unwrap_or(u64::MAX),
            command,
        };
        let mut out = self.out.lock().unwrap_or_else(PoisonError::into_inner);
        serde_json::to_writer(&mut *out, &record)?;
        out.write_all(b"\n")?;
        out.flush()
    }
}
