use std::collections::HashMap;

use approx::assert_abs_diff_eq;
use ndarray::array;
use sales_forecast::ParamGuard;
use sales_forecast_preprocessing::{
    actual_series, date_normalizer::format_timestamp, forecast_series, Defect, Field,
    ForecastInputBuilder, ForecastParams, Period, PreprocessingPipeline, ProductChoice,
    RawRecord, Warning,
};

fn mixed_batch() -> Vec<RawRecord> {
    vec![
        RawRecord::new("15/1/2023", "Widget", 10.0),
        RawRecord::new("2023-02-15", "Widget", 12.0),
        RawRecord::new("15/2/2023", "Gadget", 30.0),
        RawRecord::new("15/3/2023", " Widget ", "not a number"),
        RawRecord::new("15/4/2023", "Gadget", Field::Missing),
        RawRecord::new("15/5/2023", "Widget", 20.0),
    ]
}

#[test]
fn defective_rows_are_reported_and_dropped() {
    let output = PreprocessingPipeline::default()
        .log_warnings(false)
        .run(&mixed_batch())
        .unwrap();

    assert_eq!(output.nrows(), 6);
    assert_eq!(
        output.records().iter().map(|r| r.row).collect::<Vec<_>>(),
        vec![0, 2, 5]
    );
    assert_eq!(output.vocabulary().entries(), &["Widget", "Gadget"]);

    let rows = output
        .warnings()
        .iter()
        .filter_map(|warning| warning.row_index())
        .collect::<Vec<_>>();
    assert_eq!(rows, vec![1, 3, 4]);
    assert_eq!(
        output.warnings()[0],
        Warning::Row {
            row: 1,
            defect: Defect::MalformedDate("2023-02-15".to_string())
        }
    );
    assert_eq!(
        output.warnings()[0].to_string(),
        "row 2: sales_date `2023-02-15` does not match D/M/YYYY"
    );

    // the malformed-date row still contributes to the quantity range
    let quantities = output
        .records()
        .iter()
        .map(|r| r.quantity_sold)
        .collect::<Vec<_>>();
    assert_abs_diff_eq!(quantities[0], 0.0);
    assert_abs_diff_eq!(quantities[1], 1.0);
    assert_abs_diff_eq!(quantities[2], 0.5);
}

#[test]
fn csv_like_rows_feed_the_forecast_inputs() {
    let rows = vec![("31/1/2023", "Widget", "5"), ("31/3/2023", "Gadget", "15")]
        .into_iter()
        .map(|(date, product, quantity)| {
            let mut row = HashMap::new();
            row.insert("Sales_Date".to_string(), Field::from(date));
            row.insert("Product_Description".to_string(), Field::from(product));
            row.insert("Quantity_Sold".to_string(), Field::from(quantity));
            row
        })
        .collect::<Vec<_>>();

    let output = PreprocessingPipeline::default().run_rows(&rows).unwrap();
    let builder = ForecastInputBuilder::new(&output);

    let dataset = builder.training_dataset::<f64>().unwrap();
    assert_eq!(dataset.records().dim(), (2, 3));
    let expected = array![0., 1.];
    assert_abs_diff_eq!(dataset.targets(), expected.view());

    let params = ForecastParams::new()
        .horizon(2)
        .period(Period::Month)
        .product(ProductChoice::Last)
        .check()
        .unwrap();
    let future = builder.future_inputs::<f64>(&params).unwrap();
    let dates = future
        .timestamps()
        .iter()
        .map(|t| format_timestamp(*t).unwrap())
        .collect::<Vec<_>>();
    assert_eq!(dates, vec!["2023-04-30", "2023-05-31"]);
    assert_eq!(future.records().column(2), array![1., 1.]);

    let forecast = future
        .align(array![0.5, 0.75])
        .unwrap()
        .map_values(|value| output.scaler().unscale_value(value));
    let points = forecast_series(&forecast);
    assert_abs_diff_eq!(points[0].y, 10.0, epsilon = 1e-9);
    assert_abs_diff_eq!(points[1].y, 12.5, epsilon = 1e-9);

    let actual = actual_series(output.records());
    assert_eq!(actual.len(), 2);
    assert_eq!(actual[1].y, 1.0);
}

#[test]
fn degenerate_quantity_batches_are_kept_with_a_warning() {
    let constant = vec![
        RawRecord::new("1/1/2023", "Widget", 7.0),
        RawRecord::new("1/2/2023", "Gadget", "7"),
        RawRecord::new("1/3/2023", "Widget", Field::Missing),
        RawRecord::new("1/4/2023", "Gadget", 7.0),
    ];
    let output = PreprocessingPipeline::default()
        .log_warnings(false)
        .run(&constant)
        .unwrap();

    assert_eq!(
        output.records().iter().map(|r| r.row).collect::<Vec<_>>(),
        vec![0, 1, 3]
    );
    for record in output.records() {
        assert_abs_diff_eq!(record.quantity_sold, 1.0);
    }
    assert!(output
        .warnings()
        .contains(&Warning::ConstantQuantities(7.0)));
    assert!(output.warnings().contains(&Warning::Row {
        row: 2,
        defect: Defect::MissingQuantity
    }));

    let invalid = vec![
        RawRecord::new("1/1/2023", "Widget", "ten"),
        RawRecord::new("1/2/2023", "Gadget", Field::Missing),
    ];
    let output = PreprocessingPipeline::default()
        .log_warnings(false)
        .run(&invalid)
        .unwrap();

    assert_eq!(output.nrows(), 2);
    assert!(output.records().is_empty());
    assert_eq!(output.vocabulary().entries(), &["Widget", "Gadget"]);
    assert_eq!(
        output.warnings(),
        &[
            Warning::Row {
                row: 0,
                defect: Defect::NonNumericQuantity("ten".to_string())
            },
            Warning::Row {
                row: 1,
                defect: Defect::MissingQuantity
            },
            Warning::NoValidQuantities,
        ]
    );
    assert!(ForecastInputBuilder::new(&output)
        .training_dataset::<f64>()
        .is_err());
}
