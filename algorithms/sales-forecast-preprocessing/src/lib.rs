//! # Preprocessing
//! `sales-forecast-preprocessing` turns raw sales rows into model-ready records.
//!
//! Each row holds a sales date, a product description and a quantity. The pipeline
//!
//! * parses `D/M/YYYY` dates into epoch milliseconds at UTC midnight, see [`DateNormalizer`]
//! * one-hot encodes product descriptions against a vocabulary in first-appearance order, see
//!   [`CategoryEncoder`]
//! * min-max scales quantities into `[0, 1]`, see [`RangeScaler`]
//! * drops every row with a defect left and reports it as a [`Warning`]
//!
//! The clean records are then turned into a training [`Dataset`](sales_forecast::Dataset) and
//! synthetic future rows by the [`ForecastInputBuilder`].
//!
//! ## Example
//!
//! ```
//! use sales_forecast::ParamGuard;
//! use sales_forecast_preprocessing::{
//!     ForecastInputBuilder, ForecastParams, PreprocessingPipeline, RawRecord,
//! };
//!
//! let raw = vec![
//!     RawRecord::new("1/1/2023", "Widget", 10.0),
//!     RawRecord::new("2/1/2023", "Gadget", 20.0),
//! ];
//! let output = PreprocessingPipeline::default().run(&raw).unwrap();
//! assert_eq!(output.records().len(), 2);
//!
//! let builder = ForecastInputBuilder::new(&output);
//! let dataset = builder.training_dataset::<f64>().unwrap();
//! assert_eq!(dataset.nfeatures(), 3);
//!
//! let params = ForecastParams::new().horizon(3).check().unwrap();
//! let future = builder.future_inputs::<f64>(&params).unwrap();
//! assert_eq!(future.records().nrows(), 3);
//! ```

pub mod category_encoder;
pub mod chart;
pub mod date_normalizer;
pub mod error;
pub mod forecast_input;
pub mod pipeline;
pub mod range_scaler;
pub mod record;
pub mod warning;

pub use category_encoder::{CategoryEncoder, CategoryVocabulary};
pub use chart::{actual_series, forecast_series, Point};
pub use date_normalizer::DateNormalizer;
pub use error::{Error, Result};
pub use forecast_input::{
    Forecast, ForecastInputBuilder, ForecastParams, ForecastValidParams, FutureInputs, Period,
    ProductChoice,
};
pub use pipeline::{Preprocessed, PreprocessingPipeline};
pub use range_scaler::{FittedRangeScaler, RangeScaler, ScaleBounds};
pub use record::{CleanRecord, Field, RawRecord};
pub use warning::{Defect, Warning};
