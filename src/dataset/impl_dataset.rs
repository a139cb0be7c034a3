use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2, Axis};
use rand::seq::SliceRandom;
use rand::Rng;

use super::{DatasetBase, Float};
use crate::error::{Error, Result};

impl<F: Float> DatasetBase<Array2<F>, Array1<F>> {
    /// Create a new dataset from records and targets
    ///
    /// The number of records has to match the number of targets, see
    /// [`try_new`](DatasetBase::try_new) for a checked version.
    pub fn new(records: Array2<F>, targets: Array1<F>) -> Self {
        debug_assert_eq!(records.nrows(), targets.len());

        DatasetBase {
            records,
            targets,
            feature_names: Vec::new(),
        }
    }

    /// Create a new dataset, failing when records and targets disagree in their number of samples
    pub fn try_new(records: Array2<F>, targets: Array1<F>) -> Result<Self> {
        if records.nrows() != targets.len() {
            return Err(Error::MismatchedShapes(records.nrows(), targets.len()));
        }

        Ok(Self::new(records, targets))
    }

    /// Number of samples in the dataset
    pub fn nsamples(&self) -> usize {
        self.records.nrows()
    }

    /// Number of features per sample
    pub fn nfeatures(&self) -> usize {
        self.records.ncols()
    }

    /// Return the records as a two-dimensional view
    pub fn records(&self) -> ArrayView2<'_, F> {
        self.records.view()
    }

    /// Return the targets as a one-dimensional view
    pub fn targets(&self) -> ArrayView1<'_, F> {
        self.targets.view()
    }

    /// Returns feature names
    ///
    /// A feature name gives a human-readable string describing the purpose of a single
    /// feature. Generic names `feature-<index>` are returned if none were set.
    pub fn feature_names(&self) -> Vec<String> {
        if !self.feature_names.is_empty() {
            self.feature_names.clone()
        } else {
            (0..self.nfeatures())
                .map(|idx| format!("feature-{}", idx))
                .collect()
        }
    }

    /// Updates the feature names of a dataset
    pub fn with_feature_names<I: Into<String>>(mut self, names: Vec<I>) -> Self {
        self.feature_names = names.into_iter().map(|x| x.into()).collect();
        self
    }

    /// Split dataset into two disjoint chunks
    ///
    /// The first chunk contains the leading `ratio` share of samples, the second one the rest.
    /// Samples are not shuffled before splitting.
    pub fn split_with_ratio(self, ratio: f32) -> (Self, Self) {
        let n = (self.nsamples() as f32 * ratio).ceil() as usize;
        let n = n.min(self.nsamples());

        let first = DatasetBase {
            records: self.records.slice(s![..n, ..]).to_owned(),
            targets: self.targets.slice(s![..n]).to_owned(),
            feature_names: self.feature_names.clone(),
        };
        let second = DatasetBase {
            records: self.records.slice(s![n.., ..]).to_owned(),
            targets: self.targets.slice(s![n..]).to_owned(),
            feature_names: self.feature_names,
        };

        (first, second)
    }

    /// Shuffle the order of samples, keeping records and targets paired
    pub fn shuffle<R: Rng>(self, rng: &mut R) -> Self {
        let mut indices = (0..self.nsamples()).collect::<Vec<_>>();
        indices.shuffle(rng);

        DatasetBase {
            records: self.records.select(Axis(0), &indices),
            targets: self.targets.select(Axis(0), &indices),
            feature_names: self.feature_names,
        }
    }
}
