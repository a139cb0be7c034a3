//! Min-max scaling of quantities into `[0, 1]`
use ndarray::{Array1, ArrayBase, Data, Ix1};
use sales_forecast::traits::Transformer;
use sales_forecast::Float;

use crate::record::{EncodedRecord, Field, ScaledRecord};
use crate::warning::{Defect, Warning};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Range observed while fitting a [`RangeScaler`]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScaleBounds<F> {
    /// No valid value was seen, values pass through unchanged
    Empty,
    /// Every valid value was equal to this one, values map to one
    Constant(F),
    Range { min: F, max: F },
}

/// Min-max scaler learning the range of a single column
///
/// Fitting is a full pass over the batch, the fitted scaler then maps `min` to zero and `max` to
/// one. A column with a single distinct value cannot be normalized, every value maps to exactly
/// one in that case.
#[derive(Debug, Clone, Default)]
pub struct RangeScaler;

impl RangeScaler {
    /// Learn the range of all finite values, non-finite values are ignored
    pub fn fit<F: Float, I: IntoIterator<Item = F>>(&self, values: I) -> FittedRangeScaler<F> {
        let bounds = values
            .into_iter()
            .filter(|value| value.is_finite())
            .fold(None, |bounds: Option<(F, F)>, value| match bounds {
                None => Some((value, value)),
                Some((min, max)) => Some((min.min(value), max.max(value))),
            });

        let bounds = match bounds {
            None => ScaleBounds::Empty,
            Some((min, max)) if min == max => ScaleBounds::Constant(min),
            Some((min, max)) => ScaleBounds::Range { min, max },
        };
        FittedRangeScaler { bounds }
    }

    /// Scale the `quantity_sold` column of a batch
    ///
    /// Missing or non-numeric quantities become a [`Defect`] and are reported per row. A batch
    /// without any valid quantity, or with a single distinct one, is reported with a batch-level
    /// warning but never rejected.
    pub fn scale(
        &self,
        records: Vec<EncodedRecord>,
    ) -> (Vec<ScaledRecord>, FittedRangeScaler<f64>, Vec<Warning>) {
        let mut warnings = Vec::new();
        let quantities = records
            .iter()
            .map(|record| parse_quantity(&record.quantity_sold))
            .collect::<Vec<_>>();

        let scaler = self.fit(quantities.iter().filter_map(|q| q.as_ref().ok().copied()));

        for (record, quantity) in records.iter().zip(&quantities) {
            if let Err(defect) = quantity {
                warnings.push(Warning::row(record.row, defect.clone()));
            }
        }
        match scaler.bounds() {
            ScaleBounds::Empty => warnings.push(Warning::NoValidQuantities),
            ScaleBounds::Constant(value) => warnings.push(Warning::ConstantQuantities(value)),
            ScaleBounds::Range { min, max } => {
                tracing::debug!(min, max, "fitted quantity range")
            }
        }

        let scaled = records
            .into_iter()
            .zip(quantities)
            .map(|(record, quantity)| ScaledRecord {
                row: record.row,
                sales_date: record.sales_date,
                product_description: record.product_description,
                quantity_sold: quantity.map(|value| scaler.scale_value(value)),
            })
            .collect();

        (scaled, scaler, warnings)
    }
}

/// Interpret a quantity cell as a finite number
///
/// Text is trimmed before parsing, blank text counts as missing.
pub fn parse_quantity(field: &Field) -> Result<f64, Defect> {
    match field {
        Field::Number(value) if value.is_finite() => Ok(*value),
        Field::Number(value) => Err(Defect::NonNumericQuantity(value.to_string())),
        field => {
            let text = field.as_text().ok_or(Defect::MissingQuantity)?;
            text.parse::<f64>()
                .ok()
                .filter(|value| value.is_finite())
                .ok_or_else(|| Defect::NonNumericQuantity(text.to_string()))
        }
    }
}

/// Min-max scaler with a learned range
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct FittedRangeScaler<F> {
    bounds: ScaleBounds<F>,
}

impl<F: Float> FittedRangeScaler<F> {
    pub fn bounds(&self) -> ScaleBounds<F> {
        self.bounds
    }

    pub fn scale_value(&self, value: F) -> F {
        match self.bounds {
            ScaleBounds::Empty => value,
            ScaleBounds::Constant(_) => F::one(),
            ScaleBounds::Range { min, max } => (value - min) / (max - min),
        }
    }

    /// Map a scaled value back into the original units
    ///
    /// For a constant column every value maps back to the constant.
    pub fn unscale_value(&self, value: F) -> F {
        match self.bounds {
            ScaleBounds::Empty => value,
            ScaleBounds::Constant(constant) => constant,
            ScaleBounds::Range { min, max } => value * (max - min) + min,
        }
    }

    pub fn inverse_transform<D: Data<Elem = F>>(&self, x: &ArrayBase<D, Ix1>) -> Array1<F> {
        x.mapv(|value| self.unscale_value(value))
    }
}

impl<'a, F: Float, D: Data<Elem = F>> Transformer<&'a ArrayBase<D, Ix1>, Array1<F>>
    for FittedRangeScaler<F>
{
    fn transform(&self, x: &'a ArrayBase<D, Ix1>) -> Array1<F> {
        x.mapv(|value| self.scale_value(value))
    }
}
