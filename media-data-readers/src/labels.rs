//! Label files: CSV rows of `id,label,...`, label taken from the second column
//!
//! Row order must match the sorted discovery order of the dataset the labels
//! are attached to. Nothing in the file ties a row to a particular datapoint.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use media_data_core::Label;

use crate::error::{Error, Result};

/// Column holding the label in each row
pub const LABEL_COLUMN: usize = 1;

/// Read the label column of every row from a CSV file
pub fn read_label_file(path: &Path, has_header: bool) -> Result<Vec<Label>> {
    let file = File::open(path)?;
    let labels = read_labels(file, has_header).map_err(|err| match err {
        Error::MissingLabelColumn { row, .. } => Error::MissingLabelColumn {
            path: path.to_path_buf(),
            row,
        },
        other => other,
    })?;
    tracing::debug!(path = %path.display(), labels = labels.len(), "read label file");
    Ok(labels)
}

/// Read the label column of every row from CSV data
pub fn read_labels<R: Read>(reader: R, has_header: bool) -> Result<Vec<Label>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(has_header)
        .flexible(true)
        .from_reader(reader);

    let mut labels = Vec::new();
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let label = record.get(LABEL_COLUMN).ok_or_else(|| Error::MissingLabelColumn {
            path: Default::default(),
            row,
        })?;
        labels.push(Label::Text(label.to_string()));
    }
    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_reads_second_column_in_order() {
        let csv_data = "\
0,happy,extra
1,sad
2,3.5
";
        let labels = read_labels(Cursor::new(csv_data.as_bytes()), false).unwrap();
        assert_eq!(
            labels,
            vec![Label::from("happy"), Label::from("sad"), Label::from("3.5")]
        );
    }

    #[test]
    fn test_header_row_is_skipped() {
        let csv_data = "\
id,label
0,cat
1,dog
";
        let labels = read_labels(Cursor::new(csv_data.as_bytes()), true).unwrap();
        assert_eq!(labels, vec![Label::from("cat"), Label::from("dog")]);
    }

    #[test]
    fn test_header_row_kept_by_default() {
        let csv_data = "id,label\n0,cat\n";
        let labels = read_labels(Cursor::new(csv_data.as_bytes()), false).unwrap();
        assert_eq!(labels.len(), 2);
    }

    #[test]
    fn test_row_without_label_column() {
        let csv_data = "0,cat\n1\n";
        let err = read_labels(Cursor::new(csv_data.as_bytes()), false).unwrap_err();
        assert!(matches!(err, Error::MissingLabelColumn { row: 1, .. }));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = read_label_file(&dir.path().join("labels.csv"), false).unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
