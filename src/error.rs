//! Error types shared by the sales-forecast crates
//!

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone)]
pub enum Error {
    #[error("number of records ({0}) does not match number of targets ({1})")]
    MismatchedShapes(usize, usize),
    #[error("not enough samples")]
    NotEnoughSamples,
}
