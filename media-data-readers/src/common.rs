//! Options and file discovery shared by the loader strategies

use std::cmp::Ordering;
use std::fs;
use std::path::{Path, PathBuf};

use media_data_core::{DataType, LoadingMethod};
use serde::{Deserialize, Serialize};

/// Options for opening a dataset from a directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetOptions {
    /// Kind of media to discover
    pub data_type: DataType,

    /// Decode up front or on access
    pub loading_method: LoadingMethod,

    /// Read labels from the label file next to the root (flat-folder layout only)
    pub load_labels: bool,

    /// Label file name, looked up in the parent directory of the root
    pub labels_file: String,

    /// Whether the label file starts with a header row to skip
    pub labels_have_header: bool,
}

impl DatasetOptions {
    /// Options for the given data type and loading method, defaults otherwise
    pub fn new(data_type: DataType, loading_method: LoadingMethod) -> Self {
        Self {
            data_type,
            loading_method,
            ..Default::default()
        }
    }
}

impl Default for DatasetOptions {
    fn default() -> Self {
        Self {
            data_type: DataType::Image,
            loading_method: LoadingMethod::Lazy,
            load_labels: false,
            labels_file: "labels.csv".to_string(),
            labels_have_header: false,
        }
    }
}

/// Files directly inside `dir` whose extension matches `data_type`, in
/// filesystem enumeration order. Hidden files (names starting with `.`, such
/// as `._img1.jpg` resource forks) are skipped.
pub fn list_matching_files(dir: &Path, data_type: DataType) -> std::io::Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_file() && data_type.matches(&path) {
            files.push(path);
        }
    }
    Ok(files)
}

/// A run of decimal digits compared by numeric value, without overflow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitRun(String);

impl DigitRun {
    fn new(digits: &str) -> Self {
        let trimmed = digits.trim_start_matches('0');
        Self(if trimmed.is_empty() { "0".to_string() } else { trimmed.to_string() })
    }
}

impl Ord for DigitRun {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0
            .len()
            .cmp(&other.0.len())
            .then_with(|| self.0.cmp(&other.0))
    }
}

impl PartialOrd for DigitRun {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Every digit run in `name`, in order, as numbers. `"img10_2.jpg"` gives `[10, 2]`.
pub fn numeric_sort_key(name: &str) -> Vec<DigitRun> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, c) in name.char_indices() {
        match (c.is_ascii_digit(), start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push(DigitRun::new(&name[s..i]));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push(DigitRun::new(&name[s..]));
    }
    runs
}

/// Sort paths by the numbers embedded in their file names; ties fall back to
/// the file name itself
pub fn sort_numerically(paths: &mut [PathBuf]) {
    paths.sort_by_cached_key(|path| {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        (numeric_sort_key(&name), name)
    });
}
