use crate::crawler::RowRecord;
use crate::SweepError;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Column names, in output order
pub const HEADER: [&str; 5] = ["No.", "Title", "User", "View", "Link"];

/// Writes the header and one row per record to any writer
///
/// Records are written in the order given; sorting is the caller's job.
/// Missing numbers and links become empty cells.
pub fn write_records<W: Write>(records: &[RowRecord], writer: W) -> Result<(), csv::Error> {
    let mut csv_writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);

    csv_writer.write_record(HEADER)?;
    for record in records {
        csv_writer.serialize(record)?;
    }
    csv_writer.flush()?;

    Ok(())
}

/// Writes the table to `path`
///
/// The table is first written to a `.part` sibling and then renamed into
/// place, so a failed write never leaves a partial table at `path`.
///
/// # Errors
///
/// Returns `SweepError::Write` on any I/O or encoding failure.
pub fn write_table(records: &[RowRecord], path: &Path) -> Result<(), SweepError> {
    let partial = partial_path(path);
    let write_error = |message: String| SweepError::Write {
        path: path.display().to_string(),
        message,
    };

    let result = fs::File::create(&partial)
        .map_err(csv::Error::from)
        .and_then(|file| write_records(records, io::BufWriter::new(file)))
        .map_err(|e| write_error(e.to_string()))
        .and_then(|()| fs::rename(&partial, path).map_err(|e| write_error(e.to_string())));

    if result.is_err() {
        let _ = fs::remove_file(&partial);
    }

    result
}

/// Reads a table written by [`write_table`]
///
/// Page indices are not stored, so every returned record has `page == 0`.
pub fn read_table(path: &Path) -> Result<Vec<RowRecord>, SweepError> {
    let mut reader = csv::Reader::from_path(path)?;
    let mut records = Vec::new();

    for record in reader.deserialize() {
        records.push(record?);
    }

    Ok(records)
}

/// Removes a served table; a table that is already gone is not an error
pub fn discard_table(path: &Path) -> Result<(), SweepError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

fn partial_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    path.with_file_name(name)
}
