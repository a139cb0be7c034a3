use crate::adam::Adam;
use crate::error::DenseError;
use crate::hyperparams::DenseValidParams;
use crate::{DenseRegressor, LossHistory};
use ndarray::{
    arr0, Array0, Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Axis, Data, Ix1, Ix2, Zip,
};
use ndarray_rand::rand_distr::Uniform;
use ndarray_rand::RandomExt;
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256Plus;
use sales_forecast::traits::{Fit, PredictInplace};
use sales_forecast::{Dataset, DatasetBase, Float};

/// Simplified `Result` using [`DenseError`](crate::DenseError) as error type
pub type Result<T> = std::result::Result<T, DenseError>;

/// Gradients of the mean squared error with respect to every parameter
pub(crate) struct Gradients<F> {
    pub(crate) hidden_weights: Array2<F>,
    pub(crate) hidden_bias: Array1<F>,
    pub(crate) output_weights: Array1<F>,
    pub(crate) output_bias: Array0<F>,
}

impl<F, D, T> Fit<ArrayBase<D, Ix2>, ArrayBase<T, Ix1>, DenseError> for DenseValidParams<F>
where
    F: Float,
    D: Data<Elem = F>,
    T: Data<Elem = F>,
{
    type Object = DenseRegressor<F>;

    /// Train a dense regressor given a feature matrix `x` and a target variable `y`.
    ///
    /// The feature matrix `x` must have shape `(n_samples, n_features)`
    ///
    /// The target variable `y` must have shape `(n_samples)`
    ///
    /// The trailing `validation_split` share of samples, rounded down, is only used to report the
    /// validation loss. At least one sample is always trained on.
    fn fit(
        &self,
        dataset: &DatasetBase<ArrayBase<D, Ix2>, ArrayBase<T, Ix1>>,
    ) -> Result<Self::Object> {
        let (records, targets) = (&dataset.records, &dataset.targets);
        if records.nrows() != targets.len() {
            return Err(sales_forecast::error::Error::MismatchedShapes(
                records.nrows(),
                targets.len(),
            )
            .into());
        }
        if records.nrows() == 0 {
            return Err(DenseError::NotEnoughSamples);
        }
        if !records.iter().chain(targets.iter()).all(|value| value.is_finite()) {
            return Err(DenseError::NonFiniteValues);
        }

        let mut rng = Xoshiro256Plus::seed_from_u64(self.seed);
        let (mean, scale) = standardization(records);
        let mut model = DenseRegressor::initialize(mean, scale, self.hidden_units, &mut rng);

        let standardized = Dataset::new(model.standardize(records), targets.to_owned());
        let (mut train, valid) = standardized.split_with_ratio(1.0 - self.validation_split);

        tracing::debug!(
            train = train.nsamples(),
            validation = valid.nsamples(),
            features = train.nfeatures(),
            "training dense regressor"
        );

        let mut optimizer = Adam::new(&model, self.learning_rate);
        for epoch in 0..self.epochs {
            if self.shuffle {
                train = train.shuffle(&mut rng);
            }
            let batches = train
                .records
                .axis_chunks_iter(Axis(0), self.batch_size)
                .zip(train.targets.axis_chunks_iter(Axis(0), self.batch_size));
            for (x_batch, y_batch) in batches {
                let gradients = model.gradients(x_batch, y_batch);
                optimizer.step(&mut model, &gradients);
            }

            let training = model.loss(train.records(), train.targets());
            model.history.training.push(training);
            if valid.nsamples() > 0 {
                let validation = model.loss(valid.records(), valid.targets());
                model.history.validation.push(validation);
                tracing::trace!(epoch, %training, %validation, "epoch finished");
            } else {
                tracing::trace!(epoch, %training, "epoch finished");
            }
        }

        Ok(model)
    }
}

impl<F: Float, D: Data<Elem = F>> PredictInplace<ArrayBase<D, Ix2>, Array1<F>>
    for DenseRegressor<F>
{
    /// Given an input matrix `X`, with shape `(n_samples, n_features)`,
    /// `predict` returns one value per row, in row order.
    fn predict_inplace(&self, x: &ArrayBase<D, Ix2>, y: &mut Array1<F>) {
        assert_eq!(
            x.nrows(),
            y.len(),
            "The number of data points must match the number of output targets."
        );

        assert_eq!(
            x.ncols(),
            self.nfeatures(),
            "Number of data features must match the number of features the model was trained with."
        );

        let x = self.standardize(x);
        y.assign(&self.forward(x.view()).1);
    }

    fn default_target(&self, x: &ArrayBase<D, Ix2>) -> Array1<F> {
        Array1::zeros(x.nrows())
    }
}

/// View the fitted parameters and make predictions with a fitted dense regressor
impl<F: Float> DenseRegressor<F> {
    /// Number of features the model was trained with
    pub fn nfeatures(&self) -> usize {
        self.hidden_weights.nrows()
    }

    pub fn hidden_units(&self) -> usize {
        self.hidden_weights.ncols()
    }

    /// Losses recorded after every training epoch
    pub fn history(&self) -> &LossHistory<F> {
        &self.history
    }

    /// Predict one value per row, failing if the number of features does not match
    pub fn try_predict<D: Data<Elem = F>>(&self, x: &ArrayBase<D, Ix2>) -> Result<Array1<F>> {
        if x.ncols() != self.nfeatures() {
            return Err(DenseError::FeatureMismatch {
                expected: self.nfeatures(),
                found: x.ncols(),
            });
        }

        let x = self.standardize(x);
        Ok(self.forward(x.view()).1)
    }

    fn initialize<R: Rng>(
        mean: Array1<F>,
        scale: Array1<F>,
        hidden_units: usize,
        rng: &mut R,
    ) -> Self {
        let nfeatures = mean.len();
        let hidden_limit = glorot_limit::<F>(nfeatures, hidden_units);
        let output_limit = glorot_limit::<F>(hidden_units, 1);

        DenseRegressor {
            mean,
            scale,
            hidden_weights: Array2::random_using(
                (nfeatures, hidden_units),
                Uniform::new_inclusive(-hidden_limit, hidden_limit),
                rng,
            ),
            hidden_bias: Array1::zeros(hidden_units),
            output_weights: Array1::random_using(
                hidden_units,
                Uniform::new_inclusive(-output_limit, output_limit),
                rng,
            ),
            output_bias: arr0(F::zero()),
            history: LossHistory::default(),
        }
    }

    fn standardize<D: Data<Elem = F>>(&self, x: &ArrayBase<D, Ix2>) -> Array2<F> {
        (x - &self.mean) / &self.scale
    }

    /// Returns the hidden pre-activations and the outputs
    fn forward(&self, x: ArrayView2<F>) -> (Array2<F>, Array1<F>) {
        let hidden = x.dot(&self.hidden_weights) + &self.hidden_bias;
        let output = hidden.mapv(relu).dot(&self.output_weights) + self.output_bias[()];
        (hidden, output)
    }

    fn loss(&self, x: ArrayView2<F>, y: ArrayView1<F>) -> F {
        let (_, output) = self.forward(x);
        let error = output - y;
        error.mapv(|e| e * e).sum() / F::cast(y.len())
    }

    pub(crate) fn gradients(&self, x: ArrayView2<F>, y: ArrayView1<F>) -> Gradients<F> {
        let (hidden, output) = self.forward(x);
        let activations = hidden.mapv(relu);
        let d_output = (output - y) * (F::cast(2.) / F::cast(y.len()));

        let mut d_hidden = d_output
            .view()
            .insert_axis(Axis(1))
            .dot(&self.output_weights.view().insert_axis(Axis(0)));
        Zip::from(&mut d_hidden).and(&hidden).for_each(|d, &h| {
            if h <= F::zero() {
                *d = F::zero();
            }
        });

        Gradients {
            hidden_weights: x.t().dot(&d_hidden),
            hidden_bias: d_hidden.sum_axis(Axis(0)),
            output_weights: activations.t().dot(&d_output),
            output_bias: arr0(d_output.sum()),
        }
    }
}

/// Per-feature mean and standard deviation, constant features are passed through unchanged
fn standardization<F: Float, D: Data<Elem = F>>(
    records: &ArrayBase<D, Ix2>,
) -> (Array1<F>, Array1<F>) {
    let mut mean = records
        .mean_axis(Axis(0))
        .unwrap_or_else(|| Array1::zeros(records.ncols()));
    let mut scale = records.std_axis(Axis(0), F::zero());

    Zip::from(&mut mean).and(&mut scale).for_each(|mean, scale| {
        if *scale <= F::epsilon() * mean.abs().max(F::one()) {
            *mean = F::zero();
            *scale = F::one();
        }
    });
    (mean, scale)
}

fn glorot_limit<F: Float>(fan_in: usize, fan_out: usize) -> F {
    F::cast(6.0 / (fan_in + fan_out) as f64).sqrt()
}

fn relu<F: Float>(x: F) -> F {
    x.max(F::zero())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DenseParams;
    use approx::assert_abs_diff_eq;
    use ndarray::array;
    use sales_forecast::prelude::*;

    fn linear_dataset() -> Dataset<f64> {
        let records = Array2::from_shape_fn((40, 2), |(i, j)| {
            if j == 0 {
                1_672_531_200_000. + i as f64 * 86_400_000.
            } else {
                (i % 2) as f64
            }
        });
        let targets = Array1::from_shape_fn(40, |i| i as f64 / 39.);
        Dataset::new(records, targets)
    }

    #[test]
    fn relu_works() {
        assert_abs_diff_eq!(relu(-2.0), 0.0);
        assert_abs_diff_eq!(relu(3.0), 3.0);
    }

    #[test]
    fn standardization_skips_constant_features() {
        let records = array![[1., 5., 10.], [3., 5., 10.]];
        let (mean, scale) = standardization(&records);
        assert_abs_diff_eq!(mean, array![2., 0., 0.]);
        assert_abs_diff_eq!(scale, array![1., 1., 1.]);

        let records = array![[0., 1.], [4., 1.]];
        let (mean, scale) = standardization(&records);
        assert_abs_diff_eq!(mean, array![2., 0.]);
        assert_abs_diff_eq!(scale, array![2., 1.]);
    }

    #[test]
    fn gradients_match_finite_differences() {
        let dataset = linear_dataset();
        let mut rng = Xoshiro256Plus::seed_from_u64(3);
        let (mean, scale) = standardization(&dataset.records);
        let model = DenseRegressor::initialize(mean, scale, 4, &mut rng);
        let x = model.standardize(&dataset.records);
        let y = dataset.targets();

        let gradients = model.gradients(x.view(), y);
        let h = 1e-6;
        for (i, j) in [(0, 0), (1, 2), (0, 3)] {
            let mut plus = model.clone();
            plus.hidden_weights[(i, j)] += h;
            let mut minus = model.clone();
            minus.hidden_weights[(i, j)] -= h;
            let numeric = (plus.loss(x.view(), y) - minus.loss(x.view(), y)) / (2. * h);
            assert_abs_diff_eq!(gradients.hidden_weights[(i, j)], numeric, epsilon = 1e-5);
        }

        let mut plus = model.clone();
        plus.output_bias[()] += h;
        let mut minus = model.clone();
        minus.output_bias[()] -= h;
        let numeric = (plus.loss(x.view(), y) - minus.loss(x.view(), y)) / (2. * h);
        assert_abs_diff_eq!(gradients.output_bias[()], numeric, epsilon = 1e-5);
    }

    #[test]
    fn training_reduces_loss() {
        let dataset = linear_dataset();
        let model = DenseParams::new()
            .hidden_units(8)
            .epochs(200)
            .batch_size(8)
            .learning_rate(0.01)
            .fit(&dataset)
            .unwrap();

        let training = model.history().training();
        let validation = model.history().validation();
        assert_eq!(training.len(), 200);
        assert_eq!(validation.len(), 200);
        assert!(training[199] < training[0]);
        assert!(training[199] < 0.05);

        let predictions = model.predict(&dataset.records);
        let mse = predictions.mean_squared_error(dataset.targets()).unwrap();
        assert!(mse < 0.05);
    }

    #[test]
    fn training_is_reproducible_with_seed() {
        let dataset = linear_dataset();
        let params = DenseParams::new().epochs(5).seed(7);
        let first = params.fit(&dataset).unwrap();
        let second = params.fit(&dataset).unwrap();
        assert_eq!(first, second);

        let other = params.clone().seed(8).fit(&dataset).unwrap();
        assert_ne!(first, other);
    }

    #[test]
    fn predictions_preserve_row_order() {
        let dataset = linear_dataset();
        let model = DenseParams::new().epochs(3).fit(&dataset).unwrap();

        let rows = dataset.records().slice(ndarray::s![..3, ..]).to_owned();
        let predictions = model.predict(&rows);
        assert_eq!(predictions.len(), 3);
        for (i, row) in rows.outer_iter().enumerate() {
            let single = model.predict(&row.insert_axis(Axis(0)).to_owned());
            assert_abs_diff_eq!(single[0], predictions[i], epsilon = 1e-12);
        }

        assert!(matches!(
            model.try_predict(&array![[1., 2., 3.]]),
            Err(DenseError::FeatureMismatch {
                expected: 2,
                found: 3
            })
        ));
    }

    #[test]
    fn validation_loss_uses_trailing_samples() {
        let dataset = linear_dataset();
        let model = DenseParams::new()
            .epochs(4)
            .validation_split(0.25)
            .fit(&dataset)
            .unwrap();
        assert_eq!(model.history().validation().len(), 4);

        // 40 samples with a 0.25 split hold out the last ten
        let tail = dataset.records().slice(ndarray::s![30.., ..]).to_owned();
        let predictions = model.predict(&tail);
        let expected = predictions
            .mean_squared_error(dataset.targets().slice(ndarray::s![30..]))
            .unwrap();
        assert_abs_diff_eq!(model.history().validation()[3], expected, epsilon = 1e-10);

        // a large split on two samples still trains on the first one
        let pair = Dataset::new(array![[1., 0.], [2., 1.]], array![0., 1.]);
        let model = DenseParams::new()
            .epochs(3)
            .validation_split(0.9)
            .shuffle(false)
            .fit(&pair)
            .unwrap();
        assert_eq!(model.history().training().len(), 3);
        assert_eq!(model.history().validation().len(), 3);
    }

    #[test]
    fn small_or_invalid_datasets() {
        let single = Dataset::new(array![[1., 0.]], array![0.5]);
        let model = DenseParams::new().epochs(2).fit(&single).unwrap();
        assert_eq!(model.history().training().len(), 2);
        assert!(model.history().validation().is_empty());

        let empty = Dataset::new(Array2::<f64>::zeros((0, 2)), Array1::zeros(0));
        assert!(matches!(
            DenseParams::new().fit(&empty),
            Err(DenseError::NotEnoughSamples)
        ));

        let nan = Dataset::new(array![[1., f64::NAN]], array![0.5]);
        assert!(matches!(
            DenseParams::new().fit(&nan),
            Err(DenseError::NonFiniteValues)
        ));

        assert!(matches!(
            DenseParams::new().hidden_units(0).fit(&single),
            Err(DenseError::InvalidHiddenUnits)
        ));
    }
}
