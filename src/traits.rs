//! Provide traits for different classes of algorithms
//!

use crate::dataset::DatasetBase;
use std::convert::From;

/// Transformation algorithms
///
/// A transformer takes a dataset or record and transforms it into something else. Fitted
/// scalers and encoders implement this trait after learning their state from a batch.
pub trait Transformer<R, T> {
    fn transform(&self, x: R) -> T;
}

/// Fittable algorithms
///
/// A fittable algorithm takes a dataset and creates a concept of some kind about it. For example
/// a regressor learns a function mapping feature rows to targets.
pub trait Fit<R, T, E: std::error::Error + From<crate::error::Error>> {
    type Object;

    fn fit(&self, dataset: &DatasetBase<R, T>) -> Result<Self::Object, E>;
}

/// Predict with model
///
/// This trait assumes the `PredictInplace` implementation and provides additional input/output
/// combinations.
pub trait Predict<R, T> {
    fn predict(&self, x: R) -> T;
}

/// Predict with model into a mutable reference of targets.
pub trait PredictInplace<R, T> {
    /// Predict something in place
    fn predict_inplace(&self, x: &R, y: &mut T);

    /// Create targets that `predict_inplace` works with.
    fn default_target(&self, x: &R) -> T;
}

impl<'a, R, T, O> Predict<&'a R, T> for O
where
    O: PredictInplace<R, T>,
{
    fn predict(&self, records: &'a R) -> T {
        let mut targets = self.default_target(records);
        self.predict_inplace(records, &mut targets);
        targets
    }
}
