//! Model inputs built from clean records
//!
//! The [`ForecastInputBuilder`] turns clean records into a training [`Dataset`] and produces
//! synthetic feature rows for dates following the last known sale. It does no training or
//! inference itself; predictions for the synthetic rows are paired back up with their dates via
//! [`FutureInputs::align`].
use std::convert::TryFrom;

use chrono::{Days, Months, NaiveDate};
use ndarray::{Array1, Array2};
use sales_forecast::{Dataset, Float, ParamGuard};

use crate::category_encoder::CategoryVocabulary;
use crate::date_normalizer::{date_of, timestamp_millis};
use crate::error::{Error, Result};
use crate::pipeline::Preprocessed;
use crate::record::{CleanRecord, SALES_DATE};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Distance between two consecutive forecast rows
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day,
    Week,
    /// Calendar month, days past the end of the target month are clamped to its last day
    Month,
}

impl Period {
    fn advance(self, date: NaiveDate, steps: u32) -> Option<NaiveDate> {
        match self {
            Period::Day => date.checked_add_days(Days::new(u64::from(steps))),
            Period::Week => date.checked_add_days(Days::new(7 * u64::from(steps))),
            Period::Month => date.checked_add_months(Months::new(steps)),
        }
    }
}

impl std::str::FromStr for Period {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "day" | "days" | "daily" => Ok(Period::Day),
            "week" | "weeks" | "weekly" => Ok(Period::Week),
            "month" | "months" | "monthly" => Ok(Period::Month),
            other => Err(format!("unknown period `{}`", other)),
        }
    }
}

/// Product whose encoding is reused for every forecast row
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub enum ProductChoice {
    /// Product of the first clean record
    First,
    /// Product of the last clean record
    Last,
    /// Product with the given description
    Named(String),
}

/// Forecast parameters
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastParams(ForecastValidParams);

/// A verified forecast parameter set
///
/// See [`ForecastParams`] for more information.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastValidParams {
    horizon: usize,
    period: Period,
    step: u32,
    product: ProductChoice,
}

impl Default for ForecastParams {
    fn default() -> Self {
        Self(ForecastValidParams {
            horizon: 6,
            period: Period::Month,
            step: 1,
            product: ProductChoice::First,
        })
    }
}

impl ForecastParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of future rows.
    ///
    /// Defaults to `6` if not set
    pub fn horizon(mut self, horizon: usize) -> Self {
        self.0.horizon = horizon;
        self
    }

    /// Set the period between two rows.
    ///
    /// Defaults to `Period::Month` if not set
    pub fn period(mut self, period: Period) -> Self {
        self.0.period = period;
        self
    }

    /// Set how many periods lie between two rows.
    ///
    /// Defaults to `1` if not set
    pub fn step(mut self, step: u32) -> Self {
        self.0.step = step;
        self
    }

    /// Set the product whose encoding is reused.
    ///
    /// Defaults to `ProductChoice::First` if not set
    pub fn product(mut self, product: ProductChoice) -> Self {
        self.0.product = product;
        self
    }
}

impl ForecastValidParams {
    pub fn horizon(&self) -> usize {
        self.horizon
    }

    pub fn period(&self) -> Period {
        self.period
    }

    pub fn step(&self) -> u32 {
        self.step
    }

    pub fn product(&self) -> &ProductChoice {
        &self.product
    }
}

impl ParamGuard for ForecastParams {
    type Checked = ForecastValidParams;
    type Error = Error;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.horizon == 0 {
            Err(Error::InvalidHorizon)
        } else if self.0.step == 0 {
            Err(Error::InvalidStep)
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

/// Builds model inputs from the clean records of one batch
#[derive(Debug, Clone, Copy)]
pub struct ForecastInputBuilder<'a> {
    records: &'a [CleanRecord],
    vocabulary: &'a CategoryVocabulary,
}

impl<'a> ForecastInputBuilder<'a> {
    pub fn new(preprocessed: &'a Preprocessed) -> Self {
        Self::from_parts(preprocessed.records(), preprocessed.vocabulary())
    }

    pub fn from_parts(records: &'a [CleanRecord], vocabulary: &'a CategoryVocabulary) -> Self {
        ForecastInputBuilder {
            records,
            vocabulary,
        }
    }

    /// Number of features per row: the date followed by one column per product
    pub fn nfeatures(&self) -> usize {
        1 + self.vocabulary.len()
    }

    /// `sales_date` followed by `product=<description>` for every vocabulary entry
    pub fn feature_names(&self) -> Vec<String> {
        std::iter::once(SALES_DATE.to_string())
            .chain(
                self.vocabulary
                    .iter()
                    .map(|entry| format!("product={}", entry)),
            )
            .collect()
    }

    /// Training records `[nrecords, 1 + vocabulary]` with scaled quantities as targets
    pub fn training_dataset<F: Float>(&self) -> Result<Dataset<F>> {
        if self.records.is_empty() {
            return Err(Error::NoCleanRecords);
        }

        let mut records = Array2::zeros((self.records.len(), self.nfeatures()));
        for (mut row, record) in records.outer_iter_mut().zip(self.records) {
            write_features(
                row.view_mut(),
                record.sales_date,
                &record.product_description,
            );
        }
        let targets = self
            .records
            .iter()
            .map(|record| F::cast(record.quantity_sold))
            .collect::<Array1<F>>();

        Ok(Dataset::try_new(records, targets)?.with_feature_names(self.feature_names()))
    }

    /// Feature rows for the dates after the last clean record
    pub fn future_inputs<F: Float>(
        &self,
        params: &ForecastValidParams,
    ) -> Result<FutureInputs<F>> {
        let reference = self.records.last().ok_or(Error::NoCleanRecords)?;
        self.future_inputs_from(reference, params)
    }

    /// Feature rows for the `horizon` dates after `reference`
    ///
    /// Row `k` (starting at one) lies `k * step` periods after the reference date. Every row
    /// reuses the product encoding chosen by the parameters.
    pub fn future_inputs_from<F: Float>(
        &self,
        reference: &CleanRecord,
        params: &ForecastValidParams,
    ) -> Result<FutureInputs<F>> {
        let product = self.product_encoding(params.product())?;
        let start = date_of(reference.sales_date).ok_or(Error::DateOverflow(reference.sales_date))?;

        let timestamps = (1..=params.horizon())
            .map(|k| {
                u32::try_from(k)
                    .ok()
                    .and_then(|k| k.checked_mul(params.step()))
                    .and_then(|steps| params.period().advance(start, steps))
                    .map(timestamp_millis)
                    .ok_or(Error::DateOverflow(reference.sales_date))
            })
            .collect::<Result<Vec<_>>>()?;

        let mut records = Array2::zeros((timestamps.len(), self.nfeatures()));
        for (mut row, timestamp) in records.outer_iter_mut().zip(&timestamps) {
            write_features(row.view_mut(), *timestamp, &product);
        }

        tracing::debug!(horizon = params.horizon(), "built future feature rows");
        Ok(FutureInputs {
            timestamps,
            records,
        })
    }

    fn product_encoding(&self, choice: &ProductChoice) -> Result<Array1<f64>> {
        match choice {
            ProductChoice::First => self
                .records
                .first()
                .map(|record| record.product_description.clone())
                .ok_or(Error::NoCleanRecords),
            ProductChoice::Last => self
                .records
                .last()
                .map(|record| record.product_description.clone())
                .ok_or(Error::NoCleanRecords),
            ProductChoice::Named(name) => self
                .vocabulary
                .one_hot(name)
                .ok_or_else(|| Error::UnknownProduct(name.clone())),
        }
    }
}

fn write_features<F: Float>(
    mut row: ndarray::ArrayViewMut1<'_, F>,
    timestamp: i64,
    product: &Array1<f64>,
) {
    row[0] = F::cast(timestamp);
    for (cell, value) in row.iter_mut().skip(1).zip(product) {
        *cell = F::cast(*value);
    }
}

/// Synthetic feature rows for future dates
#[derive(Debug, Clone, PartialEq)]
pub struct FutureInputs<F> {
    timestamps: Vec<i64>,
    records: Array2<F>,
}

impl<F: Float> FutureInputs<F> {
    /// Epoch milliseconds of every row, in row order
    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    /// Feature matrix `[horizon, nfeatures]`
    pub fn records(&self) -> &Array2<F> {
        &self.records
    }

    /// Pair predictions with the dates of the rows they were computed from
    ///
    /// The model has to return exactly one prediction per row, in row order.
    pub fn align(&self, predictions: Array1<F>) -> Result<Forecast<F>> {
        if predictions.len() != self.timestamps.len() {
            return Err(Error::MisalignedPredictions(
                predictions.len(),
                self.timestamps.len(),
            ));
        }

        Ok(Forecast {
            timestamps: self.timestamps.clone(),
            values: predictions,
        })
    }
}

/// Predictions aligned with the dates they forecast
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast<F> {
    timestamps: Vec<i64>,
    values: Array1<F>,
}

impl<F: Float> Forecast<F> {
    pub fn timestamps(&self) -> &[i64] {
        &self.timestamps
    }

    pub fn values(&self) -> &Array1<F> {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    /// `(timestamp, prediction)` pairs in date order
    pub fn iter(&self) -> impl Iterator<Item = (i64, F)> + '_ {
        self.timestamps
            .iter()
            .copied()
            .zip(self.values.iter().copied())
    }

    /// Apply `f` to every prediction, e.g. to map scaled values back to units sold
    pub fn map_values<G: FnMut(F) -> F>(mut self, f: G) -> Self {
        self.values.mapv_inplace(f);
        self
    }
}
