//! Class-folder datasets: one subdirectory per class
//!
//! ```text
//! root/
//!   cat/  a.jpg b.jpg
//!   dog/  c.jpg d.jpg e.jpg
//! ```
//!
//! Every datapoint is labeled with the name of the directory it was found in.
//! Classes and files are taken in filesystem enumeration order; no sort is
//! applied, so the order can differ between platforms and runs.

use std::fs;
use std::path::Path;

use media_data_core::{dispatch_load, Dataset, DatasetCore, Label};

use crate::common::{list_matching_files, DatasetOptions};
use crate::error::Result;

/// A dataset whose labels come from class subdirectories
#[derive(Debug, Clone)]
pub struct ClassFolderDataset {
    core: DatasetCore,
}

impl ClassFolderDataset {
    /// Discover every matching file in every immediate subdirectory of `root`
    pub fn open<P: AsRef<Path>>(root: P, options: &DatasetOptions) -> Result<Self> {
        let mut dataset = Self {
            core: DatasetCore::new(root, options.data_type, options.loading_method),
        };
        dataset.load_data()?;
        Ok(dataset)
    }

    /// Distinct class names, in first-seen order
    pub fn classes(&self) -> Vec<&Label> {
        let mut classes: Vec<&Label> = Vec::new();
        for label in self.core.labels() {
            if !classes.contains(&label) {
                classes.push(label);
            }
        }
        classes
    }
}

impl Dataset for ClassFolderDataset {
    fn core(&self) -> &DatasetCore {
        &self.core
    }

    fn load_data(&mut self) -> media_data_core::Result<()> {
        let data_type = self.core.data_type();
        let decoder = data_type.decoder();

        for entry in fs::read_dir(self.core.root())? {
            let entry = entry?;
            let class_path = entry.path();
            if !class_path.is_dir() {
                continue;
            }

            let class_name = entry.file_name().to_string_lossy().into_owned();
            let files = list_matching_files(&class_path, data_type)?;
            tracing::debug!(class = %class_name, files = files.len(), "discovered class directory");

            for path in files {
                dispatch_load(&mut self.core, decoder, path)?;
                self.core.push_label(Label::Text(class_name.clone()))?;
            }
        }
        self.core.finish_loading()
    }

    fn from_core(&self, core: DatasetCore) -> Self {
        Self { core }
    }
}
