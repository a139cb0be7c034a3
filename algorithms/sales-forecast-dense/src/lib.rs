//! # Dense regressor
//!
//! `sales-forecast-dense` provides the model engine of the sales forecasting toolkit: a
//! feed-forward network with one ReLU hidden layer and a single linear output, trained with the
//! Adam optimizer on the mean squared error.
//!
//! Records are standardized inside the model with the per-feature mean and standard deviation
//! seen during training, so raw features of very different magnitude, like epoch timestamps next
//! to one-hot columns, can be fed in directly.
//!
//! ## Example
//!
//! ```
//! use ndarray::array;
//! use sales_forecast::prelude::*;
//! use sales_forecast_dense::DenseRegressor;
//!
//! let dataset = Dataset::new(
//!     array![[0., 1.], [1., 1.], [2., 0.], [3., 0.]],
//!     array![0.0, 0.2, 0.4, 0.6],
//! );
//! let model = DenseRegressor::params()
//!     .epochs(20)
//!     .validation_split(0.25)
//!     .fit(&dataset)
//!     .unwrap();
//!
//! assert_eq!(model.history().training().len(), 20);
//! let predictions = model.predict(&array![[4., 0.]]);
//! assert_eq!(predictions.len(), 1);
//! ```
mod adam;
mod algorithm;
mod error;
mod hyperparams;

pub use algorithm::Result;
pub use error::DenseError;
pub use hyperparams::{DenseParams, DenseValidParams};

use ndarray::{Array0, Array1, Array2};
use sales_forecast::Float;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Per-epoch mean squared errors recorded while training
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LossHistory<F> {
    training: Vec<F>,
    validation: Vec<F>,
}

impl<F: Float> LossHistory<F> {
    /// Loss on the training samples after every epoch
    pub fn training(&self) -> &[F] {
        &self.training
    }

    /// Loss on the held out samples after every epoch, empty without validation samples
    pub fn validation(&self) -> &[F] {
        &self.validation
    }
}

/// A fitted feed-forward regressor
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Clone, Debug, PartialEq)]
pub struct DenseRegressor<F: Float> {
    mean: Array1<F>,
    scale: Array1<F>,
    hidden_weights: Array2<F>,
    hidden_bias: Array1<F>,
    output_weights: Array1<F>,
    output_bias: Array0<F>,
    history: LossHistory<F>,
}

impl<F: Float> DenseRegressor<F> {
    /// Create default hyperparameters
    pub fn params() -> DenseParams<F> {
        DenseParams::default()
    }
}
