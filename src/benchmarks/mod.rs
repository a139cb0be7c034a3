//! Criterion settings shared by the benchmarks of the workspace crates

#[cfg(feature = "benchmarks")]
pub mod config {
    use criterion::Criterion;
    #[cfg(not(target_os = "windows"))]
    use pprof::criterion::{Output, PProfProfiler};
    use std::time::Duration;

    /// Sampling frequency of the flamegraph profiler in Hz
    #[cfg(not(target_os = "windows"))]
    const PROFILER_FREQUENCY: i32 = 100;

    /// Short runs, pipeline and training batches are measured in milliseconds
    pub fn criterion() -> Criterion {
        let criterion = Criterion::default()
            .sample_size(30)
            .warm_up_time(Duration::from_secs(1))
            .measurement_time(Duration::from_secs(5))
            .noise_threshold(0.05);

        with_profiler(criterion)
    }

    #[cfg(not(target_os = "windows"))]
    fn with_profiler(criterion: Criterion) -> Criterion {
        criterion.with_profiler(PProfProfiler::new(
            PROFILER_FREQUENCY,
            Output::Flamegraph(None),
        ))
    }

    // pprof does not build on windows
    #[cfg(target_os = "windows")]
    fn with_profiler(criterion: Criterion) -> Criterion {
        criterion
    }
}
