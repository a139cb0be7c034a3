//! Projection of records and forecasts into plottable point series
use sales_forecast::Float;

use crate::forecast_input::Forecast;
use crate::record::CleanRecord;

#[cfg(feature = "serde")]
use serde_crate::{Deserialize, Serialize};

/// A single chart point, `x` holds epoch milliseconds
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(crate = "serde_crate")
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: i64,
    pub y: f64,
}

/// Scaled quantities of the clean records, in record order
pub fn actual_series(records: &[CleanRecord]) -> Vec<Point> {
    records
        .iter()
        .map(|record| Point {
            x: record.sales_date,
            y: record.quantity_sold,
        })
        .collect()
}

/// Forecast values at their forecast dates
pub fn forecast_series<F: Float>(forecast: &Forecast<F>) -> Vec<Point> {
    forecast
        .iter()
        .map(|(x, y)| Point {
            x,
            y: y.to_f64().unwrap_or(f64::NAN),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::category_encoder::CategoryVocabulary;
    use crate::forecast_input::{ForecastInputBuilder, ForecastParams};
    use ndarray::array;
    use sales_forecast::ParamGuard;

    #[test]
    fn series_follow_records_and_forecast() {
        let vocabulary = CategoryVocabulary::from_descriptions(vec!["Widget"]);
        let records = vec![
            CleanRecord {
                row: 0,
                sales_date: 1_672_531_200_000,
                product_description: array![1.],
                quantity_sold: 0.,
            },
            CleanRecord {
                row: 1,
                sales_date: 1_675_209_600_000,
                product_description: array![1.],
                quantity_sold: 1.,
            },
        ];

        assert_eq!(
            actual_series(&records),
            vec![
                Point {
                    x: 1_672_531_200_000,
                    y: 0.
                },
                Point {
                    x: 1_675_209_600_000,
                    y: 1.
                }
            ]
        );

        let params = ForecastParams::new().horizon(2).check().unwrap();
        let future = ForecastInputBuilder::from_parts(&records, &vocabulary)
            .future_inputs::<f32>(&params)
            .unwrap();
        let forecast = future.align(array![0.5f32, 0.25]).unwrap();
        let points = forecast_series(&forecast);

        assert_eq!(points.len(), 2);
        // 2023-03-01 and 2023-04-01
        assert_eq!(points[0].x, 1_677_628_800_000);
        assert_eq!(points[1].x, 1_680_307_200_000);
        assert_eq!(points[0].y, 0.5);
        assert_eq!(points[1].y, 0.25);
    }
}
