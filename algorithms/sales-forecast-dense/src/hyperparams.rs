use crate::error::DenseError;
use sales_forecast::{Float, ParamGuard};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Hyperparameters of a [`DenseRegressor`](crate::DenseRegressor)
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct DenseParams<F: Float>(pub(crate) DenseValidParams<F>);

/// A verified hyper-parameter set ready for training a dense regressor
///
/// See [`DenseParams`](crate::DenseParams) for more information.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct DenseValidParams<F: Float> {
    pub(crate) hidden_units: usize,
    pub(crate) epochs: usize,
    pub(crate) batch_size: usize,
    pub(crate) learning_rate: F,
    pub(crate) validation_split: f32,
    pub(crate) shuffle: bool,
    pub(crate) seed: u64,
}

impl<F: Float> ParamGuard for DenseParams<F> {
    type Checked = DenseValidParams<F>;
    type Error = DenseError;

    fn check_ref(&self) -> Result<&Self::Checked, Self::Error> {
        if self.0.hidden_units == 0 {
            Err(DenseError::InvalidHiddenUnits)
        } else if self.0.epochs == 0 {
            Err(DenseError::InvalidEpochs)
        } else if self.0.batch_size == 0 {
            Err(DenseError::InvalidBatchSize)
        } else if !self.0.learning_rate.is_finite() || self.0.learning_rate <= F::zero() {
            Err(DenseError::InvalidLearningRate(
                self.0.learning_rate.to_f32().unwrap_or(f32::NAN),
            ))
        } else if !(0.0..1.0).contains(&self.0.validation_split) {
            Err(DenseError::InvalidValidationSplit(self.0.validation_split))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked, Self::Error> {
        self.check_ref()?;
        Ok(self.0)
    }
}

impl<F: Float> Default for DenseParams<F> {
    fn default() -> Self {
        Self(DenseValidParams {
            hidden_units: 10,
            epochs: 50,
            batch_size: 32,
            learning_rate: F::cast(0.001),
            validation_split: 0.2,
            shuffle: true,
            seed: 42,
        })
    }
}

impl<F: Float> DenseValidParams<F> {
    pub fn hidden_units(&self) -> usize {
        self.hidden_units
    }

    pub fn epochs(&self) -> usize {
        self.epochs
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn learning_rate(&self) -> F {
        self.learning_rate
    }

    pub fn validation_split(&self) -> f32 {
        self.validation_split
    }

    pub fn shuffle(&self) -> bool {
        self.shuffle
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }
}

impl<F: Float> DenseParams<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the width of the hidden layer.
    ///
    /// Defaults to `10` if not set
    pub fn hidden_units(mut self, hidden_units: usize) -> Self {
        self.0.hidden_units = hidden_units;
        self
    }

    /// Set the number of passes over the training samples.
    ///
    /// Defaults to `50` if not set
    pub fn epochs(mut self, epochs: usize) -> Self {
        self.0.epochs = epochs;
        self
    }

    /// Set the number of samples per gradient step.
    ///
    /// Defaults to `32` if not set
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.0.batch_size = batch_size;
        self
    }

    /// Set the step size of the Adam optimizer.
    ///
    /// Defaults to `0.001` if not set
    ///
    /// `learning_rate` must be positive and finite
    pub fn learning_rate(mut self, learning_rate: F) -> Self {
        self.0.learning_rate = learning_rate;
        self
    }

    /// Set the trailing share of samples held out for validation.
    ///
    /// Defaults to `0.2` if not set
    ///
    /// `validation_split` must be in `[0, 1)`. The held out samples are taken from the end of
    /// the dataset, before any shuffling, and their count is rounded down.
    pub fn validation_split(mut self, validation_split: f32) -> Self {
        self.0.validation_split = validation_split;
        self
    }

    /// Shuffle the training samples before every epoch.
    ///
    /// Defaults to `true` if not set
    pub fn shuffle(mut self, shuffle: bool) -> Self {
        self.0.shuffle = shuffle;
        self
    }

    /// Set the seed of the random number generator used for weight initialization and shuffling.
    ///
    /// Defaults to `42` if not set
    pub fn seed(mut self, seed: u64) -> Self {
        self.0.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_params_are_valid() {
        let params = DenseParams::<f64>::default().check().unwrap();
        assert_eq!(params.hidden_units(), 10);
        assert_eq!(params.epochs(), 50);
        assert_eq!(params.batch_size(), 32);
        assert!(params.shuffle());
    }

    #[test]
    fn invalid_params_are_rejected() {
        assert!(matches!(
            DenseParams::<f64>::new().hidden_units(0).check(),
            Err(DenseError::InvalidHiddenUnits)
        ));
        assert!(matches!(
            DenseParams::<f64>::new().epochs(0).check(),
            Err(DenseError::InvalidEpochs)
        ));
        assert!(matches!(
            DenseParams::<f64>::new().batch_size(0).check(),
            Err(DenseError::InvalidBatchSize)
        ));
        assert!(matches!(
            DenseParams::<f64>::new().learning_rate(-0.1).check(),
            Err(DenseError::InvalidLearningRate(_))
        ));
        assert!(matches!(
            DenseParams::<f64>::new().validation_split(1.0).check(),
            Err(DenseError::InvalidValidationSplit(_))
        ));
    }
}
