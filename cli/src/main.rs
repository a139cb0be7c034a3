use std::path::PathBuf;

use anyhow::Context;
use sales_forecast::prelude::*;
use sales_forecast_datasets::read_sales_file;
use sales_forecast_dense::DenseRegressor;
use sales_forecast_preprocessing::{
    ForecastInputBuilder, ForecastParams, Period, PreprocessingPipeline, ProductChoice,
};
use structopt::StructOpt;
use tracing_subscriber::EnvFilter;

mod report;

use report::Report;

/// Forecast future sales quantities from a CSV file of past sales
#[derive(Debug, StructOpt)]
#[structopt(name = "sales-forecast")]
struct Options {
    #[structopt(parse(from_os_str))]
    /// CSV file with sales_date, product_description and quantity_sold columns, may be gzipped
    input: PathBuf,
    #[structopt(long, default_value = "6")]
    /// Number of future periods to forecast
    horizon: usize,
    #[structopt(long, default_value = "month")]
    /// Distance between forecast dates: day, week or month
    period: Period,
    #[structopt(long)]
    /// Product to forecast, defaults to the product of the first clean row
    product: Option<String>,
    #[structopt(long, default_value = "50")]
    /// Training epochs
    epochs: usize,
    #[structopt(long, default_value = "10")]
    /// Width of the hidden layer
    hidden: usize,
    #[structopt(long, default_value = "42")]
    /// Seed for weight initialization and shuffling
    seed: u64,
    #[structopt(short, long)]
    /// Log debug output
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let options = Options::from_args();
    init_tracing(options.verbose);

    let raw = read_sales_file(&options.input)
        .with_context(|| format!("failed to load {}", options.input.display()))?;
    let preprocessed = PreprocessingPipeline::default()
        .run(&raw)
        .context("failed to preprocess sales data")?;

    let builder = ForecastInputBuilder::new(&preprocessed);
    let dataset = builder.training_dataset::<f64>()?;
    let params = DenseRegressor::params()
        .hidden_units(options.hidden)
        .epochs(options.epochs)
        .seed(options.seed);

    let (model, dataset) =
        tokio::task::spawn_blocking(move || params.fit(&dataset).map(|model| (model, dataset)))
            .await
            .context("training task failed")?
            .context("failed to train the model")?;
    let r2 = model
        .try_predict(&dataset.records)?
        .r2(dataset.targets())?;
    tracing::info!(epochs = options.epochs, r2, "model trained");

    let product = options
        .product
        .map(ProductChoice::Named)
        .unwrap_or(ProductChoice::First);
    let forecast_params = ForecastParams::new()
        .horizon(options.horizon)
        .period(options.period)
        .product(product)
        .check()?;
    let future = builder.future_inputs::<f64>(&forecast_params)?;
    let predictions = model.try_predict(future.records())?;
    let forecast = future.align(predictions)?;

    let mut report = Report::new(&preprocessed, model.history(), &forecast);
    report.training.r2 = Some(r2);
    let stdout = std::io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), &report)?;
    println!();

    Ok(())
}
