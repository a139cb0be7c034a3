//! `sales-forecast` provides the shared building blocks of a small sales forecasting toolkit.
//!
//! The toolkit turns an uploaded table of sales records into clean, encoded training data,
//! fits a tiny regression model on it and projects the results into chart-ready series.
//!
//! ## The Big Picture
//!
//! The functionality is split across several crates, in the same way a classical ML toolkit
//! separates its core from the algorithms:
//!
//! * `sales-forecast` (this crate): the dataset container, the `Float` bound, the
//!   hyperparameter guard and the `Fit`/`Predict`/`Transformer` traits every other crate
//!   implements, plus regression metrics
//! * `sales-forecast-preprocessing`: date parsing, one-hot encoding of product descriptions,
//!   min-max scaling of quantities and the pipeline tying them together
//! * `sales-forecast-dense`: a small feed-forward regressor used as the model engine
//! * `sales-forecast-datasets`: CSV ingestion of raw sales rows
//!
//! ## Example
//!
//! ```
//! use sales_forecast::prelude::*;
//! use ndarray::array;
//!
//! let dataset = Dataset::new(array![[1., 0.], [2., 1.]], array![0.5, 1.0])
//!     .with_feature_names(vec!["sales_date", "product=Widget"]);
//!
//! assert_eq!(dataset.nsamples(), 2);
//! assert_eq!(dataset.nfeatures(), 2);
//! ```

pub mod benchmarks;
pub mod dataset;
pub mod error;
mod metrics_regression;
pub mod param_guard;
pub mod prelude;
pub mod traits;

pub use dataset::{Dataset, DatasetBase, Float};
pub use param_guard::ParamGuard;

/// Common metrics functions for regression
pub mod metrics {
    pub use crate::metrics_regression::Regression;
}
