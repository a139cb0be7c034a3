use ndarray::{Array, Dimension, Zip};
use sales_forecast::Float;

use crate::algorithm::Gradients;
use crate::DenseRegressor;

const BETA1: f64 = 0.9;
const BETA2: f64 = 0.999;
const EPSILON: f64 = 1e-7;

/// First and second moment estimates of a single parameter array
struct Moments<F, D: Dimension> {
    first: Array<F, D>,
    second: Array<F, D>,
}

impl<F: Float, D: Dimension> Moments<F, D> {
    fn new(param: &Array<F, D>) -> Self {
        Moments {
            first: Array::zeros(param.raw_dim()),
            second: Array::zeros(param.raw_dim()),
        }
    }

    fn update(&mut self, param: &mut Array<F, D>, gradient: &Array<F, D>, rate: &StepRate<F>) {
        let (beta1, beta2) = (F::cast(BETA1), F::cast(BETA2));
        let epsilon = F::cast(EPSILON);

        Zip::from(param)
            .and(&mut self.first)
            .and(&mut self.second)
            .and(gradient)
            .for_each(|param, first, second, &gradient| {
                *first = beta1 * *first + (F::one() - beta1) * gradient;
                *second = beta2 * *second + (F::one() - beta2) * gradient * gradient;
                let first_hat = *first / rate.first_correction;
                let second_hat = *second / rate.second_correction;
                *param -= rate.learning_rate * first_hat / (second_hat.sqrt() + epsilon);
            });
    }
}

struct StepRate<F> {
    learning_rate: F,
    first_correction: F,
    second_correction: F,
}

/// Adam optimizer state for all parameters of a [`DenseRegressor`]
pub(crate) struct Adam<F: Float> {
    learning_rate: F,
    step: i32,
    hidden_weights: Moments<F, ndarray::Ix2>,
    hidden_bias: Moments<F, ndarray::Ix1>,
    output_weights: Moments<F, ndarray::Ix1>,
    output_bias: Moments<F, ndarray::Ix0>,
}

impl<F: Float> Adam<F> {
    pub(crate) fn new(model: &DenseRegressor<F>, learning_rate: F) -> Self {
        Adam {
            learning_rate,
            step: 0,
            hidden_weights: Moments::new(&model.hidden_weights),
            hidden_bias: Moments::new(&model.hidden_bias),
            output_weights: Moments::new(&model.output_weights),
            output_bias: Moments::new(&model.output_bias),
        }
    }

    pub(crate) fn step(&mut self, model: &mut DenseRegressor<F>, gradients: &Gradients<F>) {
        self.step = self.step.saturating_add(1);
        let rate = StepRate {
            learning_rate: self.learning_rate,
            first_correction: F::one() - F::cast(BETA1).powi(self.step),
            second_correction: F::one() - F::cast(BETA2).powi(self.step),
        };

        self.hidden_weights
            .update(&mut model.hidden_weights, &gradients.hidden_weights, &rate);
        self.hidden_bias
            .update(&mut model.hidden_bias, &gradients.hidden_bias, &rate);
        self.output_weights
            .update(&mut model.output_weights, &gradients.output_weights, &rate);
        self.output_bias
            .update(&mut model.output_bias, &gradients.output_bias, &rate);
    }
}
