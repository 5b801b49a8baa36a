//! CSV encoding and decoding of whole record files.
//!
//! Files are a header row followed by one row per record. Quoting and
//! escaping of embedded delimiters is left to the `csv` crate.

use std::io;

use tracing::warn;

use super::record::Record;

/// The records read from a file, plus how many rows were skipped.
#[derive(Debug, Clone)]
pub struct Decoded<T> {
    /// Records that parsed and passed validation, in file order.
    pub records: Vec<T>,
    /// Rows that were malformed or repeated an earlier key.
    pub skipped: usize,
}

/// Serializes `records` (with the header row) into CSV bytes.
pub fn encode<T: Record>(records: &[T]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = csv::WriterBuilder::new().from_writer(Vec::new());
    writer.write_record(T::HEADER)?;
    for record in records {
        writer.write_record(record.to_row())?;
    }
    writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))
}

/// Parses a CSV file produced by [`encode`].
///
/// Malformed rows and rows whose key already appeared are skipped with a
/// warning. Only I/O errors abort the read.
pub fn decode<T: Record, R: io::Read>(reader: R) -> Result<Decoded<T>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut records: Vec<T> = Vec::new();
    let mut skipped = 0;

    for (index, row) in reader.records().enumerate() {
        // header is line 1
        let line = index + 2;
        let row = match row {
            Ok(row) => row,
            Err(err) if err.is_io_error() => return Err(err),
            Err(err) => {
                warn!(entity = T::ENTITY, line, error = %err, "Skipping unreadable row");
                skipped += 1;
                continue;
            }
        };

        match T::from_row(&row) {
            Ok(record) => {
                let key = record.key();
                if records.iter().any(|r| r.key() == key) {
                    warn!(entity = T::ENTITY, line, key = %key, "Skipping duplicate row");
                    skipped += 1;
                } else {
                    records.push(record);
                }
            }
            Err(err) => {
                warn!(entity = T::ENTITY, line, error = %err, "Skipping malformed row");
                skipped += 1;
            }
        }
    }

    Ok(Decoded { records, skipped })
}
