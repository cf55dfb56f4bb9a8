use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::ecs::resources::EventLog;

/// Write an iterator of serializable items to a JSONL file (one JSON object per line).
fn write_jsonl<T: Serialize>(path: &Path, items: impl Iterator<Item = T>) -> io::Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    for item in items {
        serde_json::to_writer(&mut writer, &item)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}

/// Write the session's event log to `events.jsonl` in `output_dir`, one entry
/// per line in recording order. Creates the directory if it does not exist.
/// Returns the path written.
pub fn flush_event_log(log: &EventLog, output_dir: &Path) -> io::Result<PathBuf> {
    fs::create_dir_all(output_dir)?;
    let path = output_dir.join("events.jsonl");
    write_jsonl(&path, log.entries.iter())?;
    tracing::info!(path = %path.display(), entries = log.entries.len(), "event log flushed");
    Ok(path)
}
