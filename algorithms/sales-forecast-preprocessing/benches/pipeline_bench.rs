use criterion::{
    black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput,
};
use sales_forecast::benchmarks::config;
use sales_forecast_preprocessing::{ForecastInputBuilder, PreprocessingPipeline, RawRecord};

fn make_batch(nrows: usize, nproducts: usize) -> Vec<RawRecord> {
    (0..nrows)
        .map(|i| {
            let date = format!("{}/{}/{}", i % 28 + 1, i % 12 + 1, 2000 + i / 336);
            let product = format!("product-{}", i % nproducts);
            RawRecord::new(date, product, (i * 7 % 113) as f64)
        })
        .collect()
}

fn bench(c: &mut Criterion) {
    let mut benchmark = c.benchmark_group("preprocessing pipeline");
    let pipeline = PreprocessingPipeline::default().log_warnings(false);

    for nproducts in [1, 10, 100] {
        for size in [1_000, 10_000] {
            let batch = make_batch(size, nproducts);
            benchmark.throughput(Throughput::Elements(size as u64));
            benchmark.bench_function(
                BenchmarkId::new("run", format!("{}x{}", nproducts, size)),
                |bencher| {
                    bencher.iter(|| {
                        let output = pipeline.run(black_box(&batch)).unwrap();
                        ForecastInputBuilder::new(&output)
                            .training_dataset::<f64>()
                            .unwrap()
                    });
                },
            );
        }
    }
}

criterion_group! {
    name = benches;
    config = config::criterion();
    targets = bench
}

criterion_main!(benches);
