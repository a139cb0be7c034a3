//! One-hot encoding of product descriptions
use std::collections::HashMap;

use ndarray::Array1;

use crate::record::{EncodedRecord, Field, ParsedRecord};
use crate::warning::{Defect, Warning};

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// Ordered mapping from product description to one-hot index
///
/// Entries keep the order in which they were first encountered, so indices are contiguous from
/// zero and identical input order always produces an identical vocabulary.
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryVocabulary {
    entries: Vec<String>,
    index: HashMap<String, usize>,
}

impl CategoryVocabulary {
    /// Build a vocabulary from descriptions, ignoring repeated ones
    pub fn from_descriptions<I, S>(descriptions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut vocabulary = CategoryVocabulary::default();
        for description in descriptions {
            vocabulary.insert(description.into());
        }
        vocabulary
    }

    fn insert(&mut self, description: String) {
        if !self.index.contains_key(&description) {
            self.index.insert(description.clone(), self.entries.len());
            self.entries.push(description);
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn index_of(&self, description: &str) -> Option<usize> {
        self.index.get(description).copied()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.entries.get(index).map(String::as_str)
    }

    /// Contains all vocabulary entries, in index order
    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    /// One-hot vector of a known description
    pub fn one_hot(&self, description: &str) -> Option<Array1<f64>> {
        self.index_of(description).map(|index| {
            let mut encoded = Array1::zeros(self.len());
            encoded[index] = 1.;
            encoded
        })
    }

    /// Reverse lookup of a one-hot vector, `None` for all-zero vectors
    pub fn decode(&self, encoded: &Array1<f64>) -> Option<&str> {
        encoded
            .iter()
            .position(|value| *value == 1.)
            .and_then(|index| self.get(index))
    }
}

/// Key of a description cell, `None` if the cell is missing
pub(crate) fn description_key(field: &Field) -> Option<String> {
    match field {
        Field::Number(value) => Some(value.to_string()),
        field => field.as_text().map(str::to_string),
    }
}

/// Encodes the `product_description` column of a batch as one-hot vectors
#[derive(Debug, Clone, Default)]
pub struct CategoryEncoder;

impl CategoryEncoder {
    /// Learn the vocabulary of all distinct, present descriptions in the batch
    pub fn build_vocabulary(&self, records: &[ParsedRecord]) -> CategoryVocabulary {
        let vocabulary = CategoryVocabulary::from_descriptions(
            records
                .iter()
                .filter_map(|record| description_key(&record.product_description)),
        );
        tracing::debug!(entries = vocabulary.len(), "built product vocabulary");
        vocabulary
    }

    /// Replace descriptions by one-hot vectors of length `vocabulary.len()`
    ///
    /// Missing descriptions and descriptions absent from the vocabulary are encoded as an
    /// all-zero vector and reported as [`Defect::MissingCategory`] or
    /// [`Defect::UnknownCategory`]. The row itself is kept.
    pub fn encode(
        &self,
        records: Vec<ParsedRecord>,
        vocabulary: &CategoryVocabulary,
    ) -> (Vec<EncodedRecord>, Vec<Warning>) {
        let mut warnings = Vec::new();
        let encoded = records
            .into_iter()
            .map(|record| {
                let one_hot = match description_key(&record.product_description) {
                    None => Err(Defect::MissingCategory),
                    Some(key) => vocabulary
                        .one_hot(&key)
                        .ok_or(Defect::UnknownCategory(key)),
                };
                let product_description = one_hot.unwrap_or_else(|defect| {
                    warnings.push(Warning::row(record.row, defect));
                    Array1::zeros(vocabulary.len())
                });
                EncodedRecord {
                    row: record.row,
                    sales_date: record.sales_date,
                    product_description: Ok(product_description),
                    quantity_sold: record.quantity_sold,
                }
            })
            .collect();

        (encoded, warnings)
    }
}
