//! The preprocessing pipeline: parse dates, encode products, scale quantities, drop incomplete
//! rows
use std::collections::HashMap;

use crate::category_encoder::{CategoryEncoder, CategoryVocabulary};
use crate::date_normalizer::DateNormalizer;
use crate::error::{Error, Result};
use crate::range_scaler::{FittedRangeScaler, RangeScaler};
use crate::record::{CleanRecord, Field, RawRecord, ScaledRecord};
use crate::warning::Warning;

/// Runs the preprocessing stages over a batch of raw records
///
/// The stages always run in the same order: [`DateNormalizer`], [`CategoryEncoder`] (vocabulary
/// first, then encoding) and [`RangeScaler`]. Every run derives its vocabulary and scaling range
/// from its own batch, nothing is shared between runs.
///
/// ### Attributes
///
/// * `log_warnings`: forward every warning to the `tracing` warn level. Defaults to `true`.
/// * `keep_rejected`: keep the rows dropped by the completeness filter in the output, for
///   inspection. Defaults to `false`.
#[derive(Debug, Clone)]
pub struct PreprocessingPipeline {
    log_warnings: bool,
    keep_rejected: bool,
}

impl Default for PreprocessingPipeline {
    fn default() -> Self {
        PreprocessingPipeline {
            log_warnings: true,
            keep_rejected: false,
        }
    }
}

impl PreprocessingPipeline {
    pub fn log_warnings(mut self, log_warnings: bool) -> Self {
        self.log_warnings = log_warnings;
        self
    }

    pub fn keep_rejected(mut self, keep_rejected: bool) -> Self {
        self.keep_rejected = keep_rejected;
        self
    }

    /// Preprocess a batch of raw records
    ///
    /// Returns [`Error::EmptyBatch`] if there is nothing to process. Row-level problems never
    /// fail the run, they are collected in [`Preprocessed::warnings`] and the affected rows are
    /// left out of the clean records. Surviving rows keep their input order.
    pub fn run(&self, raw: &[RawRecord]) -> Result<Preprocessed> {
        if raw.is_empty() {
            tracing::error!("invalid or empty raw data");
            return Err(Error::EmptyBatch);
        }
        tracing::info!(rows = raw.len(), "starting preprocessing");

        let (parsed, mut warnings) = DateNormalizer::new()?.normalize(raw);

        let encoder = CategoryEncoder::default();
        let vocabulary = encoder.build_vocabulary(&parsed);
        let (encoded, encoding_warnings) = encoder.encode(parsed, &vocabulary);
        warnings.extend(encoding_warnings);

        let (scaled, scaler, scaling_warnings) = RangeScaler::default().scale(encoded);
        warnings.extend(scaling_warnings);

        let mut records = Vec::with_capacity(scaled.len());
        let mut rejected = Vec::new();
        for record in scaled {
            match record.into_clean() {
                Ok(clean) => records.push(clean),
                Err(incomplete) if self.keep_rejected => rejected.push(incomplete),
                Err(_) => {}
            }
        }

        if self.log_warnings {
            for warning in &warnings {
                tracing::warn!("{}", warning);
            }
        }
        tracing::info!(
            rows = raw.len(),
            clean = records.len(),
            products = vocabulary.len(),
            warnings = warnings.len(),
            "completed preprocessing"
        );

        Ok(Preprocessed {
            records,
            rejected,
            vocabulary,
            scaler,
            warnings,
            nrows: raw.len(),
        })
    }

    /// Preprocess rows given as column name to cell mappings
    ///
    /// Fails with [`Error::MissingColumns`] if any row lacks a required column, see
    /// [`RawRecord::from_row`].
    pub fn run_rows(&self, rows: &[HashMap<String, Field>]) -> Result<Preprocessed> {
        let raw = rows
            .iter()
            .map(RawRecord::from_row)
            .collect::<Result<Vec<_>>>()
            .map_err(|err| {
                tracing::error!("{}", err);
                err
            })?;
        self.run(&raw)
    }
}

/// Output of a [`PreprocessingPipeline`] run
#[derive(Debug, Clone)]
pub struct Preprocessed {
    records: Vec<CleanRecord>,
    rejected: Vec<ScaledRecord>,
    vocabulary: CategoryVocabulary,
    scaler: FittedRangeScaler<f64>,
    warnings: Vec<Warning>,
    nrows: usize,
}

impl Preprocessed {
    /// Rows that survived every stage, in input order
    pub fn records(&self) -> &[CleanRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<CleanRecord> {
        self.records
    }

    /// Rows dropped by the completeness filter, only filled when `keep_rejected` is set
    pub fn rejected(&self) -> &[ScaledRecord] {
        &self.rejected
    }

    pub fn vocabulary(&self) -> &CategoryVocabulary {
        &self.vocabulary
    }

    /// Scaler fitted on the batch quantities, maps scaled values back to units sold
    pub fn scaler(&self) -> &FittedRangeScaler<f64> {
        &self.scaler
    }

    pub fn warnings(&self) -> &[Warning] {
        &self.warnings
    }

    /// Number of rows in the input batch
    pub fn nrows(&self) -> usize {
        self.nrows
    }
}
