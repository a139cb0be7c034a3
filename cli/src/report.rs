use sales_forecast_dense::LossHistory;
use sales_forecast_preprocessing::{
    actual_series, forecast_series, Forecast, FittedRangeScaler, Point, Preprocessed, Warning,
};
use serde::Serialize;

/// JSON document printed after a successful run
#[derive(Debug, Serialize)]
pub struct Report {
    pub rows: usize,
    pub clean_rows: usize,
    pub vocabulary: Vec<String>,
    pub warnings: Vec<WarningEntry>,
    pub training: TrainingSummary,
    /// Scaled quantities of the clean records
    pub actual: Vec<Point>,
    /// Scaled predictions
    pub forecast: Vec<Point>,
    /// Predictions mapped back to units sold
    pub forecast_quantities: Vec<Point>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct WarningEntry {
    pub row: Option<usize>,
    pub message: String,
}

impl From<&Warning> for WarningEntry {
    fn from(warning: &Warning) -> Self {
        WarningEntry {
            row: warning.row_index(),
            message: warning.to_string(),
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct TrainingSummary {
    pub epochs: usize,
    pub training_loss: Option<f64>,
    pub validation_loss: Option<f64>,
    /// R squared of the model on its own training records
    pub r2: Option<f64>,
}

impl From<&LossHistory<f64>> for TrainingSummary {
    fn from(history: &LossHistory<f64>) -> Self {
        TrainingSummary {
            epochs: history.training().len(),
            training_loss: history.training().last().copied(),
            validation_loss: history.validation().last().copied(),
            r2: None,
        }
    }
}

impl Report {
    pub fn new(
        preprocessed: &Preprocessed,
        history: &LossHistory<f64>,
        forecast: &Forecast<f64>,
    ) -> Self {
        let quantities = unscaled(forecast, preprocessed.scaler());

        Report {
            rows: preprocessed.nrows(),
            clean_rows: preprocessed.records().len(),
            vocabulary: preprocessed.vocabulary().entries().to_vec(),
            warnings: preprocessed.warnings().iter().map(Into::into).collect(),
            training: history.into(),
            actual: actual_series(preprocessed.records()),
            forecast: forecast_series(forecast),
            forecast_quantities: forecast_series(&quantities),
        }
    }
}

fn unscaled(forecast: &Forecast<f64>, scaler: &FittedRangeScaler<f64>) -> Forecast<f64> {
    forecast
        .clone()
        .map_values(|value| scaler.unscale_value(value))
}
