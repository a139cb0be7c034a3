//! Row-level defects and the warnings reported for them
use thiserror::Error;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Reason a single field of a row could not be used
///
/// A defect never aborts a batch. Date and quantity defects mark the offending field and the row
/// is dropped by the final completeness filter. Category defects only produce a warning, the row
/// is kept with an all-zero product vector.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Defect {
    #[error("missing sales_date")]
    MissingDate,
    #[error("sales_date `{0}` does not match D/M/YYYY")]
    MalformedDate(String),
    #[error("sales_date `{0}` is not a calendar date")]
    InvalidCalendarDate(String),
    #[error("missing product_description")]
    MissingCategory,
    #[error("product_description `{0}` is not in the vocabulary")]
    UnknownCategory(String),
    #[error("missing quantity_sold")]
    MissingQuantity,
    #[error("quantity_sold `{0}` is not a finite number")]
    NonNumericQuantity(String),
}

/// Non-fatal finding of a preprocessing run
///
/// Row numbers in messages are 1-based, the `row` field itself is the 0-based index into the
/// input batch.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Warning {
    #[error("row {line}: {defect}", line = .row + 1)]
    Row { row: usize, defect: Defect },
    #[error("no valid quantities found, normalization skipped")]
    NoValidQuantities,
    #[error("all quantities are equal to {0}, normalization skipped")]
    ConstantQuantities(f64),
}

impl Warning {
    pub(crate) fn row(row: usize, defect: Defect) -> Self {
        Warning::Row { row, defect }
    }

    /// Index of the input row this warning refers to, `None` for batch-level warnings
    pub fn row_index(&self) -> Option<usize> {
        match self {
            Warning::Row { row, .. } => Some(*row),
            _ => None,
        }
    }

    /// The defect behind a row-level warning
    pub fn defect(&self) -> Option<&Defect> {
        match self {
            Warning::Row { defect, .. } => Some(defect),
            _ => None,
        }
    }
}
