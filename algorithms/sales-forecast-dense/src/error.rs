use thiserror::Error;

#[derive(Error, Debug, Clone)]
pub enum DenseError {
    #[error("number of hidden units must be bigger than 0")]
    InvalidHiddenUnits,
    #[error("number of epochs must be bigger than 0")]
    InvalidEpochs,
    #[error("batch size must be bigger than 0")]
    InvalidBatchSize,
    #[error("learning rate should be positive and finite, but is {0}")]
    InvalidLearningRate(f32),
    #[error("validation split should be in range [0, 1), but is {0}")]
    InvalidValidationSplit(f32),
    #[error("at least one sample is needed for training")]
    NotEnoughSamples,
    #[error("records and targets must be finite")]
    NonFiniteValues,
    #[error("model was trained with {expected} features, but records have {found}")]
    FeatureMismatch { expected: usize, found: usize },
    #[error(transparent)]
    BaseCrateError(#[from] sales_forecast::error::Error),
}
