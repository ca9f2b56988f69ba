//! Flat-folder datasets: every matching file directly under the root
//!
//! ```text
//! parent/
//!   labels.csv        optional, one row per file in sorted order
//!   root/
//!     img1.jpg
//!     img2.jpg
//!     img10.jpg
//! ```
//!
//! Files are ordered by the numbers in their names, so `img2.jpg` comes before
//! `img10.jpg` and lines up with row 2 of the label file.

use std::path::{Path, PathBuf};

use media_data_core::{dispatch_load, Dataset, DatasetCore, Label};

use crate::common::{list_matching_files, sort_numerically, DatasetOptions};
use crate::error::Result;
use crate::labels::read_label_file;

/// A dataset discovered from the files directly under one directory
#[derive(Debug, Clone)]
pub struct FlatFolderDataset {
    /// Backing store
    core: DatasetCore,

    /// Label file next to the root
    label_path: PathBuf,

    /// Whether labels were requested from the label file
    load_labels: bool,

    /// Whether the label file has a header row
    labels_have_header: bool,
}

impl FlatFolderDataset {
    /// Discover files under `root`, then read labels from the label file in
    /// the root's parent directory when `options.load_labels` is set
    pub fn open<P: AsRef<Path>>(root: P, options: &DatasetOptions) -> Result<Self> {
        let mut dataset = Self::unpopulated(root.as_ref(), options);
        dataset.load_data()?;

        if dataset.load_labels {
            let labels = read_label_file(&dataset.label_path, dataset.labels_have_header)?;
            dataset.core.attach_labels(labels)?;
        }

        Ok(dataset)
    }

    /// Discover files under `root` and attach caller-supplied labels in
    /// discovery order. The label file is not read.
    pub fn open_with_labels<P: AsRef<Path>>(root: P, options: &DatasetOptions, labels: Vec<Label>) -> Result<Self> {
        let mut dataset = Self::unpopulated(root.as_ref(), options);
        dataset.load_data()?;
        dataset.core.attach_labels(labels)?;
        Ok(dataset)
    }

    fn unpopulated(root: &Path, options: &DatasetOptions) -> Self {
        let label_path = root
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(&options.labels_file);

        Self {
            core: DatasetCore::new(root, options.data_type, options.loading_method),
            label_path,
            load_labels: options.load_labels,
            labels_have_header: options.labels_have_header,
        }
    }

    /// Path of the label file
    pub fn label_path(&self) -> &Path {
        &self.label_path
    }

    /// Whether labels were requested from the label file
    pub fn load_labels(&self) -> bool {
        self.load_labels
    }
}

impl Dataset for FlatFolderDataset {
    fn core(&self) -> &DatasetCore {
        &self.core
    }

    fn load_data(&mut self) -> media_data_core::Result<()> {
        let data_type = self.core.data_type();
        let decoder = data_type.decoder();

        let mut files = list_matching_files(self.core.root(), data_type)?;
        sort_numerically(&mut files);
        tracing::debug!(root = %self.core.root().display(), files = files.len(), "discovered flat-folder files");

        for path in files {
            dispatch_load(&mut self.core, decoder, path)?;
        }
        self.core.finish_loading()
    }

    fn from_core(&self, core: DatasetCore) -> Self {
        Self {
            core,
            label_path: self.label_path.clone(),
            load_labels: self.load_labels,
            labels_have_header: self.labels_have_header,
        }
    }
}
