//! Common metrics for regression
//!
//! This module implements common comparison metrices for continuous variables, used to report
//! the fit of forecasting models.

use ndarray::{ArrayBase, ArrayView1, Data, Ix1};

use crate::error::{Error, Result};
use crate::Float;

/// Regression metrices trait
pub trait Regression<F: Float> {
    /// Mean squared error between two continuous variables
    fn mean_squared_error(&self, compare_to: ArrayView1<'_, F>) -> Result<F>;
    /// R squared coefficient, is the proportion of the variance in the dependent variable that is
    /// predictable from the independent variable.
    ///
    /// To evaluate the accuracy of a prediction, use
    /// ```ignore
    /// prediction.r2(ground_truth.view())
    /// ```
    fn r2(&self, compare_to: ArrayView1<'_, F>) -> Result<F>;
}

impl<F: Float, D: Data<Elem = F>> Regression<F> for ArrayBase<D, Ix1> {
    fn mean_squared_error(&self, compare_to: ArrayView1<'_, F>) -> Result<F> {
        check_shapes(self.len(), compare_to.len())?;

        let sum = self
            .iter()
            .zip(compare_to.iter())
            .map(|(a, b)| (*a - *b) * (*a - *b))
            .sum::<F>();
        Ok(sum / F::cast(self.len()))
    }

    // r2 = 1 - sum((pred_i - y_i)^2)/sum((mean_y - y_i)^2)
    // the mean is taken over `compare_to`, the ground truth
    fn r2(&self, compare_to: ArrayView1<'_, F>) -> Result<F> {
        check_shapes(self.len(), compare_to.len())?;

        let mean = compare_to.sum() / F::cast(compare_to.len());
        let residual = self
            .iter()
            .zip(compare_to.iter())
            .map(|(a, b)| (*a - *b) * (*a - *b))
            .sum::<F>();
        let total = compare_to.iter().map(|x| (*x - mean) * (*x - mean)).sum::<F>();

        Ok(F::one() - residual / (total + F::cast(1e-10)))
    }
}

fn check_shapes(lhs: usize, rhs: usize) -> Result<()> {
    if lhs != rhs {
        return Err(Error::MismatchedShapes(lhs, rhs));
    }
    if lhs == 0 {
        return Err(Error::NotEnoughSamples);
    }
    Ok(())
}
