//! CSV export.
//!
//! The header row is the key sequence of the first record and every row is
//! written in that column order. Records are expected to share one schema:
//! a field missing from a later record becomes an empty cell, and a field the
//! first record lacks is dropped with a warning. A first record with no
//! fields gives no header to write and is treated like empty input.

use std::io::Write;
use std::path::Path;

use csv::Writer;
use tokio::fs;
use tracing::{info, instrument, warn};

use crate::error::ExportError;
use crate::models::Record;
use crate::utils::ensure_parent_dir;

/// Serialize `records` to `out`.
///
/// # Returns
///
/// The number of data rows written, or [`ExportError::EmptyInput`] when there
/// is no record or the first record has no fields.
pub fn write_csv<W: Write>(records: &[Record], out: W) -> Result<usize, ExportError> {
    let Some(first) = records.first().filter(|r| !r.is_empty()) else {
        return Err(ExportError::EmptyInput);
    };
    let header: Vec<&str> = first.keys().collect();

    let mut writer = Writer::from_writer(out);
    writer.write_record(&header)?;

    for (index, record) in records.iter().enumerate() {
        let dropped: Vec<&str> = record.keys().filter(|k| !header.contains(k)).collect();
        if !dropped.is_empty() {
            warn!(index, ?dropped, "Record has fields outside the header; dropping them");
        }
        writer.write_record(header.iter().map(|field| record.value(field).unwrap_or("")))?;
    }

    writer.flush().map_err(csv::Error::from)?;
    Ok(records.len())
}

/// Write `records` to `path` as UTF-8 CSV.
///
/// The table is rendered in memory first, so a failure never leaves a
/// partially written file behind.
///
/// # Arguments
///
/// * `records` - Rows to write; the first record's keys become the header
/// * `path` - Destination file; missing parent directories are created
///
/// # Returns
///
/// The number of data rows written. Empty input is not an error: nothing is
/// written and `Ok(0)` is returned.
#[instrument(level = "info", skip_all, fields(path = %path.as_ref().display(), count = records.len()))]
pub async fn export_csv(records: &[Record], path: impl AsRef<Path>) -> Result<usize, ExportError> {
    let path = path.as_ref();
    let mut buf = Vec::new();
    let rows = match write_csv(records, &mut buf) {
        Ok(rows) => rows,
        Err(ExportError::EmptyInput) => {
            warn!("No data to save");
            return Ok(0);
        }
        Err(e) => return Err(e),
    };

    let io_err = |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };
    ensure_parent_dir(path).await.map_err(io_err)?;
    fs::write(path, buf).await.map_err(io_err)?;

    info!(rows, "Data saved");
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(pairs: &[(&str, &str)]) -> Record {
        pairs.iter().map(|(k, v)| (*k, Some(*v))).collect()
    }

    fn render(records: &[Record]) -> String {
        let mut buf = Vec::new();
        write_csv(records, &mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_missing_field_is_empty_cell() {
        let records = vec![record(&[("a", "1"), ("b", "2")]), record(&[("a", "3")])];
        assert_eq!(render(&records), "a,b\n1,2\n3,\n");
    }

    #[test]
    fn test_absent_value_is_empty_cell() {
        let records: Vec<Record> = vec![[("title", Some("T")), ("date", None)].into_iter().collect()];
        assert_eq!(render(&records), "title,date\nT,\n");
    }

    #[test]
    fn test_extra_fields_are_dropped() {
        let records = vec![
            record(&[("a", "1")]),
            record(&[("b", "x"), ("a", "2")]),
        ];
        assert_eq!(render(&records), "a\n1\n2\n");
    }

    #[test]
    fn test_quoting_and_unicode() {
        let records = vec![record(&[("name", "Zoë, \"the\" dev"), ("city", "Zürich")])];
        assert_eq!(
            render(&records),
            "name,city\n\"Zoë, \"\"the\"\" dev\",Zürich\n"
        );
    }

    #[test]
    fn test_write_csv_rejects_empty() {
        let err = write_csv(&[], Vec::new()).unwrap_err();
        assert!(matches!(err, ExportError::EmptyInput));
    }

    #[test]
    fn test_write_csv_rejects_keyless_first_record() {
        let err = write_csv(&[Record::new(), Record::new()], Vec::new()).unwrap_err();
        assert!(matches!(err, ExportError::EmptyInput));

        let err = write_csv(&[Record::new(), record(&[("a", "1")])], Vec::new()).unwrap_err();
        assert!(matches!(err, ExportError::EmptyInput));
    }

    #[tokio::test]
    async fn test_export_empty_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let rows = export_csv(&[], &path).await.unwrap();
        assert_eq!(rows, 0);
        assert!(!path.exists());

        let rows = export_csv(&[Record::new()], &path).await.unwrap();
        assert_eq!(rows, 0);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_export_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/scraped_data.csv");
        let records = vec![
            record(&[("title", "Ünïcødé"), ("date", "2024-01-01"), ("note", "line\nbreak")]),
            record(&[("title", "Second"), ("date", "2024-02-02"), ("note", "")]),
            record(&[("title", "Third"), ("date", "2024-03-03")]),
        ];

        let rows = export_csv(&records, &path).await.unwrap();
        assert_eq!(rows, 3);

        let mut reader = csv::Reader::from_path(&path).unwrap();
        assert_eq!(
            reader.headers().unwrap().iter().collect::<Vec<_>>(),
            vec!["title", "date", "note"]
        );
        let read: Vec<Vec<String>> = reader
            .records()
            .map(|r| r.unwrap().iter().map(str::to_string).collect())
            .collect();
        assert_eq!(read.len(), records.len());
        for (row, original) in read.iter().zip(&records) {
            for (cell, field) in row.iter().zip(["title", "date", "note"]) {
                assert_eq!(cell, original.value(field).unwrap_or(""));
            }
        }
    }
}
