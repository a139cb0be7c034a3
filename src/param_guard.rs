//! Hyperparameter validation
//!
//! Parameter sets are built from unchecked values through builder-style setters. A reference to
//! the checked parameters can only be obtained after validation has completed.

use std::error::Error;

use crate::dataset::DatasetBase;
use crate::traits::Fit;

/// A set of parameters whose values have not been checked for validity.
///
/// Implementors wrap their checked parameter struct and expose it only through `check_ref` or
/// `check`. If `Fit` is implemented on the checked parameters, it is also implemented on the
/// unchecked ones with the checking step done automatically.
pub trait ParamGuard {
    /// The checked parameters
    type Checked;
    /// Error type resulting from failed checking
    type Error: Error;

    /// Checks the parameters and returns a reference to the checked parameters if successful
    fn check_ref(&self) -> Result<&Self::Checked, Self::Error>;

    /// Checks the parameters and returns the checked parameters if successful
    fn check(self) -> Result<Self::Checked, Self::Error>;
}

/// Performs checking step and calls `fit` on the checked hyperparameters. If checking failed, the
/// checking error is converted to the original error type of `Fit` and returned.
impl<R, T, E, P: ParamGuard> Fit<R, T, E> for P
where
    P::Checked: Fit<R, T, E>,
    E: Error + From<crate::error::Error> + From<P::Error>,
{
    type Object = <<P as ParamGuard>::Checked as Fit<R, T, E>>::Object;

    fn fit(&self, dataset: &DatasetBase<R, T>) -> Result<Self::Object, E> {
        let checked = self.check_ref()?;
        checked.fit(dataset)
    }
}
