use crate::storage::{RunRecord, StorageError, StorageResult};
use crate::{WriteError, WriteResult};
use chrono::{DateTime, Utc};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::path::Path;

/// Appends one run record to the history store
///
/// The file is created if missing and opened in append mode; earlier records
/// are never touched. The whole line is written while holding an exclusive
/// lock on the file.
///
/// # Arguments
///
/// * `timestamp` - When the run completed
/// * `count` - Number of URLs the run wrote to the sitemap
/// * `path` - Path to the history store
pub fn append_record(timestamp: DateTime<Utc>, count: usize, path: &Path) -> WriteResult<()> {
    let record = RunRecord {
        timestamp,
        url_count: count,
    };
    let line = format!("{}\n", record.to_line());

    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| WriteError::io(path, e))?;

    FileExt::lock_exclusive(&file).map_err(|e| WriteError::io(path, e))?;

    let written = file
        .write_all(line.as_bytes())
        .and_then(|_| file.sync_data());
    let unlocked = FileExt::unlock(&file);

    written.map_err(|e| WriteError::io(path, e))?;
    unlocked.map_err(|e| WriteError::io(path, e))?;

    tracing::debug!("Appended history record {}", record);
    Ok(())
}

/// Loads every record from the history store, oldest first
///
/// A missing file is an empty history. Blank lines are skipped, and a line
/// that does not parse (usually a torn write) is logged and skipped.
pub fn load_history(path: &Path) -> StorageResult<Vec<RunRecord>> {
    let io_error = |source| StorageError::Io {
        path: path.display().to_string(),
        source,
    };

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(io_error(e)),
    };

    FileExt::lock_shared(&file).map_err(io_error)?;
    let records = read_records(&file);
    FileExt::unlock(&file).map_err(io_error)?;

    records
}

fn read_records(file: &File) -> StorageResult<Vec<RunRecord>> {
    let mut records = Vec::new();

    for (index, line) in BufReader::new(file).lines().enumerate() {
        let line = line.map_err(|source| StorageError::Io {
            path: String::from("history store"),
            source,
        })?;

        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<RunRecord>() {
            Ok(record) => records.push(record),
            Err(reason) => {
                tracing::warn!("Skipping unreadable history line {}: {}", index + 1, reason)
            }
        }
    }

    Ok(records)
}
