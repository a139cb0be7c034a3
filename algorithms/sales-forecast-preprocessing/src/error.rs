//! Error definitions for preprocessing
use thiserror::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that abort a preprocessing or forecast-input run
///
/// Problems with single rows never surface here, they are reported as
/// [`Warning`](crate::Warning)s instead.
#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("empty batch: expected at least one sales record")]
    EmptyBatch,
    #[error("missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("no clean records available")]
    NoCleanRecords,
    #[error("forecast horizon must be greater than zero")]
    InvalidHorizon,
    #[error("period step must be greater than zero")]
    InvalidStep,
    #[error("product `{0}` is not in the vocabulary")]
    UnknownProduct(String),
    #[error("advancing timestamp {0} leaves the supported date range")]
    DateOverflow(i64),
    #[error("number of predictions ({0}) does not match number of future rows ({1})")]
    MisalignedPredictions(usize, usize),
    #[error(transparent)]
    RegexError(#[from] regex::Error),
    #[error(transparent)]
    BaseCrateError(#[from] sales_forecast::error::Error),
}
