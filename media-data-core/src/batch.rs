//! Batch loading over a dataset

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::datapoint::Item;
use crate::dataset::Dataset;
use crate::error::{Error, Result};

/// Options for a batch loader
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchLoaderOptions {
    /// Datapoints per batch, must be positive
    pub batch_size: usize,

    /// Draw a fresh random order on every pass
    pub shuffle: bool,

    /// Yield the trailing batch when it is smaller than `batch_size`
    pub include_last_batch: bool,
}

impl Default for BatchLoaderOptions {
    fn default() -> Self {
        Self {
            batch_size: 32,
            shuffle: true,
            include_last_batch: true,
        }
    }
}

/// A group of resolved datapoints
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    /// Dataset positions in this batch, in yield order
    pub indices: Vec<usize>,
    /// Resolved datapoints, parallel to `indices`
    pub items: Vec<Item>,
}

impl Batch {
    /// Number of datapoints in the batch
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the batch is empty
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl IntoIterator for Batch {
    type Item = Item;
    type IntoIter = std::vec::IntoIter<Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

/// Iterates a shared dataset in fixed-size batches
///
/// The loader borrows the dataset and never mutates it; several loaders can
/// read the same dataset. Each call to [`BatchLoader::iter`] starts an
/// independent pass with its own order.
pub struct BatchLoader<'a, D: ?Sized> {
    dataset: &'a D,
    options: BatchLoaderOptions,
}

impl<'a, D: Dataset + ?Sized> BatchLoader<'a, D> {
    /// Create a loader, rejecting a zero batch size
    pub fn new(dataset: &'a D, options: BatchLoaderOptions) -> Result<Self> {
        check_batch_size(options.batch_size)?;
        Ok(Self { dataset, options })
    }

    /// The wrapped dataset
    pub fn dataset(&self) -> &'a D {
        self.dataset
    }

    /// Current options
    pub fn options(&self) -> BatchLoaderOptions {
        self.options
    }

    /// Batch size
    pub fn batch_size(&self) -> usize {
        self.options.batch_size
    }

    /// Whether passes are shuffled
    pub fn shuffle(&self) -> bool {
        self.options.shuffle
    }

    /// Whether the trailing partial batch is yielded
    pub fn include_last_batch(&self) -> bool {
        self.options.include_last_batch
    }

    /// Change the batch size
    pub fn set_batch_size(&mut self, batch_size: usize) -> Result<()> {
        check_batch_size(batch_size)?;
        self.options.batch_size = batch_size;
        Ok(())
    }

    /// Turn shuffling on or off
    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.options.shuffle = shuffle;
    }

    /// Include or drop the trailing partial batch
    pub fn set_include_last_batch(&mut self, include_last_batch: bool) {
        self.options.include_last_batch = include_last_batch;
    }

    /// Number of batches one pass yields
    pub fn len(&self) -> usize {
        let n = self.dataset.len();
        let full = n / self.options.batch_size;
        if self.options.include_last_batch && n % self.options.batch_size != 0 {
            full + 1
        } else {
            full
        }
    }

    /// Whether a pass yields no batches
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Start a pass, shuffling with the thread-local generator when enabled
    pub fn iter(&self) -> Batches<'a, D> {
        self.iter_with_rng(&mut rand::thread_rng())
    }

    /// Start a pass, shuffling with `rng` when enabled
    pub fn iter_with_rng<R: Rng + ?Sized>(&self, rng: &mut R) -> Batches<'a, D> {
        let mut order: Vec<usize> = (0..self.dataset.len()).collect();
        if self.options.shuffle {
            order.shuffle(rng);
        }

        let batch_size = self.options.batch_size;
        let usable = if self.options.include_last_batch {
            order.len()
        } else {
            order.len() - order.len() % batch_size
        };
        order.truncate(usable);

        tracing::debug!(
            datapoints = self.dataset.len(),
            batch_size,
            batches = self.len(),
            shuffle = self.options.shuffle,
            "starting batch pass"
        );

        Batches {
            dataset: self.dataset,
            order,
            batch_size,
            position: 0,
        }
    }
}

impl<'a, 'b, D: Dataset + ?Sized> IntoIterator for &'b BatchLoader<'a, D> {
    type Item = Result<Batch>;
    type IntoIter = Batches<'a, D>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn check_batch_size(batch_size: usize) -> Result<()> {
    if batch_size == 0 {
        return Err(Error::InvalidArgument("batch_size must be a positive integer".into()));
    }
    Ok(())
}

/// One pass over a dataset in batches
pub struct Batches<'a, D: ?Sized> {
    dataset: &'a D,
    order: Vec<usize>,
    batch_size: usize,
    position: usize,
}

impl<'a, D: Dataset + ?Sized> Iterator for Batches<'a, D> {
    type Item = Result<Batch>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.position >= self.order.len() {
            return None;
        }

        let end = (self.position + self.batch_size).min(self.order.len());
        let indices = self.order[self.position..end].to_vec();
        self.position = end;

        let items = indices
            .iter()
            .map(|&i| self.dataset.get(i))
            .collect::<Result<Vec<_>>>();

        Some(items.map(|items| Batch { indices, items }))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.order.len() - self.position).div_ceil(self.batch_size);
        (remaining, Some(remaining))
    }
}

impl<'a, D: Dataset + ?Sized> ExactSizeIterator for Batches<'a, D> {}
