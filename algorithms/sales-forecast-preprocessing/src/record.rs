//! Record types flowing through the preprocessing stages
//!
//! A batch starts as [`RawRecord`]s and is refined stage by stage: dates are parsed
//! ([`ParsedRecord`]), product descriptions are one-hot encoded ([`EncodedRecord`]) and quantities
//! are scaled ([`ScaledRecord`]). Rows where every field survived become [`CleanRecord`]s.
//! Fields that could not be processed carry a [`Defect`] instead of a value.
use std::collections::HashMap;

use ndarray::Array1;

use crate::error::{Error, Result};
use crate::warning::Defect;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Column holding the sale date
pub const SALES_DATE: &str = "sales_date";
/// Column holding the product description
pub const PRODUCT_DESCRIPTION: &str = "product_description";
/// Column holding the number of sold units
pub const QUANTITY_SOLD: &str = "quantity_sold";

/// Columns every input row has to provide
pub const REQUIRED_COLUMNS: [&str; 3] = [SALES_DATE, PRODUCT_DESCRIPTION, QUANTITY_SOLD];

/// A single raw cell value
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub enum Field {
    Missing,
    Text(String),
    Number(f64),
}

impl Field {
    /// Returns the trimmed text of the cell, `None` for numbers and blank or missing cells
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Field::Text(text) if !text.trim().is_empty() => Some(text.trim()),
            _ => None,
        }
    }

    /// A cell is missing if it was never set or only contains whitespace
    pub fn is_missing(&self) -> bool {
        match self {
            Field::Missing => true,
            Field::Text(text) => text.trim().is_empty(),
            Field::Number(_) => false,
        }
    }
}

impl Default for Field {
    fn default() -> Self {
        Field::Missing
    }
}

impl From<&str> for Field {
    fn from(text: &str) -> Self {
        Field::Text(text.to_string())
    }
}

impl From<String> for Field {
    fn from(text: String) -> Self {
        Field::Text(text)
    }
}

impl From<f64> for Field {
    fn from(value: f64) -> Self {
        Field::Number(value)
    }
}

impl From<i64> for Field {
    fn from(value: i64) -> Self {
        Field::Number(value as f64)
    }
}

impl<T: Into<Field>> From<Option<T>> for Field {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Field::Missing)
    }
}

/// One input row as delivered by the upload component
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawRecord {
    pub sales_date: Field,
    pub product_description: Field,
    pub quantity_sold: Field,
}

impl RawRecord {
    pub fn new<D, P, Q>(sales_date: D, product_description: P, quantity_sold: Q) -> Self
    where
        D: Into<Field>,
        P: Into<Field>,
        Q: Into<Field>,
    {
        RawRecord {
            sales_date: sales_date.into(),
            product_description: product_description.into(),
            quantity_sold: quantity_sold.into(),
        }
    }

    /// Build a record from a column name to cell mapping
    ///
    /// Column names are matched case-insensitively after trimming whitespace, additional columns
    /// are ignored. Fails with [`Error::MissingColumns`] if a required column is absent.
    pub fn from_row(row: &HashMap<String, Field>) -> Result<Self> {
        let normalized = row
            .iter()
            .map(|(name, value)| (name.trim().to_lowercase(), value))
            .collect::<HashMap<_, _>>();

        let missing = REQUIRED_COLUMNS
            .iter()
            .filter(|name| !normalized.contains_key(**name))
            .map(|name| name.to_string())
            .collect::<Vec<_>>();
        if !missing.is_empty() {
            return Err(Error::MissingColumns(missing));
        }

        let take = |name: &str| {
            normalized
                .get(name)
                .map(|value| (*value).clone())
                .unwrap_or_default()
        };

        Ok(RawRecord {
            sales_date: take(SALES_DATE),
            product_description: take(PRODUCT_DESCRIPTION),
            quantity_sold: take(QUANTITY_SOLD),
        })
    }
}

/// A record with its sale date parsed into epoch milliseconds (UTC midnight)
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedRecord {
    pub row: usize,
    pub sales_date: std::result::Result<i64, Defect>,
    pub product_description: Field,
    pub quantity_sold: Field,
}

/// A parsed record with its product description replaced by a one-hot vector
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedRecord {
    pub row: usize,
    pub sales_date: std::result::Result<i64, Defect>,
    pub product_description: std::result::Result<Array1<f64>, Defect>,
    pub quantity_sold: Field,
}

/// An encoded record with its quantity scaled into `[0, 1]`
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledRecord {
    pub row: usize,
    pub sales_date: std::result::Result<i64, Defect>,
    pub product_description: std::result::Result<Array1<f64>, Defect>,
    pub quantity_sold: std::result::Result<f64, Defect>,
}

impl ScaledRecord {
    /// Converts into a [`CleanRecord`] if no field carries a defect, otherwise returns `self`
    pub fn into_clean(self) -> std::result::Result<CleanRecord, ScaledRecord> {
        if let (Ok(date), Ok(product), Ok(quantity)) = (
            &self.sales_date,
            &self.product_description,
            &self.quantity_sold,
        ) {
            return Ok(CleanRecord {
                row: self.row,
                sales_date: *date,
                product_description: product.clone(),
                quantity_sold: *quantity,
            });
        }
        Err(self)
    }

    /// The defects of this record, in column order
    pub fn defects(&self) -> Vec<&Defect> {
        let mut defects = Vec::new();
        if let Err(defect) = &self.sales_date {
            defects.push(defect);
        }
        if let Err(defect) = &self.product_description {
            defects.push(defect);
        }
        if let Err(defect) = &self.quantity_sold {
            defects.push(defect);
        }
        defects
    }
}

/// A fully processed row, ready to be turned into model inputs
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq)]
pub struct CleanRecord {
    /// 0-based index of the row in the input batch
    pub row: usize,
    /// Epoch milliseconds at UTC midnight
    pub sales_date: i64,
    pub product_description: Array1<f64>,
    /// Quantity scaled into `[0, 1]`
    pub quantity_sold: f64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn blank_text_is_missing() {
        assert!(Field::from("   ").is_missing());
        assert!(Field::Missing.is_missing());
        assert!(!Field::from(0.0).is_missing());
        assert_eq!(Field::from(" Widget ").as_text(), Some("Widget"));
        assert_eq!(Field::from(None::<f64>), Field::Missing);
    }

    #[test]
    fn row_columns_are_matched_case_insensitively() {
        let mut row = HashMap::new();
        row.insert(" Sales_Date ".to_string(), Field::from("1/1/2023"));
        row.insert("PRODUCT_DESCRIPTION".to_string(), Field::from("Widget"));
        row.insert("quantity_sold".to_string(), Field::from(10.0));
        row.insert("region".to_string(), Field::from("north"));

        let record = RawRecord::from_row(&row).unwrap();
        assert_eq!(record, RawRecord::new("1/1/2023", "Widget", 10.0));
    }

    #[test]
    fn row_without_required_columns_is_rejected() {
        let mut row = HashMap::new();
        row.insert("sales_date".to_string(), Field::from("1/1/2023"));

        match RawRecord::from_row(&row) {
            Err(Error::MissingColumns(missing)) => {
                assert_eq!(missing, vec![PRODUCT_DESCRIPTION, QUANTITY_SOLD])
            }
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn incomplete_record_is_not_clean() {
        let record = ScaledRecord {
            row: 3,
            sales_date: Err(Defect::MissingDate),
            product_description: Ok(array![1., 0.]),
            quantity_sold: Ok(0.5),
        };
        assert_eq!(record.defects(), vec![&Defect::MissingDate]);
        assert!(record.into_clean().is_err());

        let record = ScaledRecord {
            row: 4,
            sales_date: Ok(0),
            product_description: Ok(array![0., 1.]),
            quantity_sold: Ok(0.5),
        };
        let clean = record.into_clean().unwrap();
        assert_eq!(clean.row, 4);
        assert_eq!(clean.product_description, array![0., 1.]);
    }
}
