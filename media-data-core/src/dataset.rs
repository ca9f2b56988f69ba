//! Dataset trait and the shared backing store every loader strategy fills

use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::datapoint::{DataType, Decoded, Item, Label, LoadingMethod};
use crate::decode::Decoder;
use crate::error::{Error, Result};

/// One stored datapoint: already decoded (eager) or a path waiting to be
/// decoded on every read (lazy)
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    /// Decoded at population time
    Decoded(Decoded),
    /// Path to decode on access
    Pending(PathBuf),
}

/// Lifecycle of a dataset's backing store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetState {
    /// Constructed, discovery has not run yet
    Unpopulated,
    /// Discovery finished (or data was supplied up front)
    Populated,
}

/// The backing store of a dataset: configuration plus parallel entries and labels
#[derive(Debug, Clone)]
pub struct DatasetCore {
    /// Directory the dataset was discovered from
    root: PathBuf,

    /// Kind of media, fixes extension and decoder
    data_type: DataType,

    /// Whether entries are decoded up front or on access
    loading_method: LoadingMethod,

    /// Stored datapoints
    entries: Vec<Entry>,

    /// Labels parallel to `entries`; empty means "no labels"
    labels: Vec<Label>,

    /// Lifecycle state
    state: DatasetState,
}

impl DatasetCore {
    /// Create an empty, unpopulated store
    pub fn new<P: AsRef<Path>>(root: P, data_type: DataType, loading_method: LoadingMethod) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            data_type,
            loading_method,
            entries: Vec::new(),
            labels: Vec::new(),
            state: DatasetState::Unpopulated,
        }
    }

    /// Create a populated store from entries and labels that are already known,
    /// skipping disk discovery
    pub fn from_parts<P: AsRef<Path>>(
        root: P,
        data_type: DataType,
        loading_method: LoadingMethod,
        entries: Vec<Entry>,
        labels: Vec<Label>,
    ) -> Result<Self> {
        check_labels(labels.len(), entries.len())?;
        Ok(Self {
            root: root.as_ref().to_path_buf(),
            data_type,
            loading_method,
            entries,
            labels,
            state: DatasetState::Populated,
        })
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Data type
    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    /// Loading method
    pub fn loading_method(&self) -> LoadingMethod {
        self.loading_method
    }

    /// Stored entries
    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Labels, empty when the dataset is unlabeled
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Lifecycle state
    pub fn state(&self) -> DatasetState {
        self.state
    }

    /// Number of stored datapoints
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no datapoints
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append a label for the most recently discovered datapoint
    pub fn push_label(&mut self, label: Label) -> Result<()> {
        self.ensure_unpopulated("push_label")?;
        self.labels.push(label);
        Ok(())
    }

    /// Mark discovery as finished. Labels, if any, must line up with the entries.
    pub fn finish_loading(&mut self) -> Result<()> {
        self.ensure_unpopulated("finish_loading")?;
        check_labels(self.labels.len(), self.entries.len())?;
        self.state = DatasetState::Populated;
        tracing::info!(
            root = %self.root.display(),
            data_type = %self.data_type,
            loading_method = %self.loading_method,
            datapoints = self.entries.len(),
            labeled = !self.labels.is_empty(),
            "dataset populated"
        );
        Ok(())
    }

    /// One-time label attachment right after population, used for label files
    /// read alongside the data
    pub fn attach_labels(&mut self, labels: Vec<Label>) -> Result<()> {
        if !self.labels.is_empty() {
            return Err(Error::InvalidOperation("dataset already has labels".into()));
        }
        check_labels(labels.len(), self.entries.len())?;
        self.labels = labels;
        Ok(())
    }

    /// Indexed read
    ///
    /// Eager entries are returned as stored. Lazy entries are decoded on every
    /// call; nothing is cached. Decode failures come back as
    /// [`Decoded::Failed`], never as an `Err`.
    pub fn get(&self, index: usize) -> Result<Item> {
        let entry = self.entries.get(index).ok_or(Error::IndexOutOfBounds {
            index,
            len: self.entries.len(),
        })?;

        let data = match entry {
            Entry::Decoded(decoded) => decoded.clone(),
            Entry::Pending(path) => Decoded::from_path(self.data_type.decoder(), path),
        };

        Ok(Item {
            data,
            label: self.labels.get(index).cloned(),
        })
    }

    /// Randomly partition into train and test stores using the thread-local
    /// generator
    pub fn split(&self, train_fraction: f64) -> Result<(DatasetCore, DatasetCore)> {
        self.split_with_rng(train_fraction, &mut rand::thread_rng())
    }

    /// Randomly partition into train and test stores
    ///
    /// Positions are permuted as a whole, so every datapoint keeps its label.
    /// The first `floor(len * train_fraction)` permuted positions form the
    /// train store, the rest the test store.
    pub fn split_with_rng<R: Rng + ?Sized>(
        &self,
        train_fraction: f64,
        rng: &mut R,
    ) -> Result<(DatasetCore, DatasetCore)> {
        if !(train_fraction > 0.0 && train_fraction < 1.0) {
            return Err(Error::InvalidArgument(format!(
                "train fraction must be in (0, 1), got {train_fraction}"
            )));
        }

        let mut order: Vec<usize> = (0..self.entries.len()).collect();
        order.shuffle(rng);

        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let split_at = (self.entries.len() as f64 * train_fraction).floor() as usize;
        let (train_order, test_order) = order.split_at(split_at);

        let train = self.select(train_order)?;
        let test = self.select(test_order)?;

        tracing::info!(train = train.len(), test = test.len(), "dataset split");
        Ok((train, test))
    }

    fn select(&self, positions: &[usize]) -> Result<DatasetCore> {
        let entries = positions.iter().map(|&i| self.entries[i].clone()).collect();
        let labels = if self.labels.is_empty() {
            Vec::new()
        } else {
            positions.iter().map(|&i| self.labels[i].clone()).collect()
        };
        DatasetCore::from_parts(&self.root, self.data_type, self.loading_method, entries, labels)
    }

    fn ensure_unpopulated(&self, operation: &str) -> Result<()> {
        if self.state == DatasetState::Populated {
            return Err(Error::InvalidOperation(format!(
                "{operation} called on a populated dataset"
            )));
        }
        Ok(())
    }
}

/// Store one discovered file according to the dataset's loading method:
/// decode now (eager) or keep the path for later (lazy).
///
/// Every loader strategy goes through this function so lazy and eager
/// behave the same regardless of how files were discovered.
pub fn dispatch_load(core: &mut DatasetCore, decoder: Decoder, path: PathBuf) -> Result<()> {
    core.ensure_unpopulated("dispatch_load")?;
    let entry = match core.loading_method {
        LoadingMethod::Eager => Entry::Decoded(Decoded::from_path(decoder, &path)),
        LoadingMethod::Lazy => Entry::Pending(path),
    };
    core.entries.push(entry);
    Ok(())
}

fn check_labels(labels: usize, datapoints: usize) -> Result<()> {
    if labels != 0 && labels != datapoints {
        return Err(Error::LabelMismatch { labels, datapoints });
    }
    Ok(())
}

/// A dataset: a populated [`DatasetCore`] plus the discovery strategy that
/// filled it
pub trait Dataset {
    /// The backing store
    fn core(&self) -> &DatasetCore;

    /// Populate the backing store from disk. Called once by each strategy's
    /// constructor; strategies must route every file through [`dispatch_load`].
    fn load_data(&mut self) -> Result<()>;

    /// Build a dataset of the same strategy around an already-populated store,
    /// without touching the disk
    fn from_core(&self, core: DatasetCore) -> Self
    where
        Self: Sized;

    /// Number of datapoints
    fn len(&self) -> usize {
        self.core().len()
    }

    /// Whether the dataset is empty
    fn is_empty(&self) -> bool {
        self.core().is_empty()
    }

    /// Indexed read; see [`DatasetCore::get`]
    fn get(&self, index: usize) -> Result<Item> {
        self.core().get(index)
    }

    /// Root directory
    fn root(&self) -> &Path {
        self.core().root()
    }

    /// Data type
    fn data_type(&self) -> DataType {
        self.core().data_type()
    }

    /// Loading method
    fn loading_method(&self) -> LoadingMethod {
        self.core().loading_method()
    }

    /// Labels, empty when unlabeled
    fn labels(&self) -> &[Label] {
        self.core().labels()
    }

    /// Read every position in order
    fn iter(&self) -> Box<dyn Iterator<Item = Result<Item>> + '_> {
        Box::new((0..self.len()).map(move |i| self.get(i)))
    }

    /// Split into train and test datasets of the same strategy
    fn split(&self, train_fraction: f64) -> Result<(Self, Self)>
    where
        Self: Sized,
    {
        self.split_with_rng(train_fraction, &mut rand::thread_rng())
    }

    /// Split with an explicit random source
    fn split_with_rng<R: Rng + ?Sized>(&self, train_fraction: f64, rng: &mut R) -> Result<(Self, Self)>
    where
        Self: Sized,
    {
        let (train, test) = self.core().split_with_rng(train_fraction, rng)?;
        Ok((self.from_core(train), self.from_core(test)))
    }
}

/// A dataset built directly from entries and labels, with no discovery step
#[derive(Debug, Clone)]
pub struct InMemoryDataset {
    core: DatasetCore,
}

impl InMemoryDataset {
    /// Wrap an existing store
    pub fn new(core: DatasetCore) -> Self {
        Self { core }
    }
}

impl Dataset for InMemoryDataset {
    fn core(&self) -> &DatasetCore {
        &self.core
    }

    fn load_data(&mut self) -> Result<()> {
        Ok(())
    }

    fn from_core(&self, core: DatasetCore) -> Self {
        Self { core }
    }
}
