use super::{Benchmark, BenchmarkError, BenchmarkSummary};
use std::hint::black_box;
use std::time::{Duration, Instant};

type TestCase<'a, I, O> = Box<dyn FnMut(I, &mut IterationContext) -> O + 'a>;
type DataProvider<'a, I> = Box<dyn FnMut(usize) -> I + 'a>;
type Callback<'a> = Box<dyn FnMut() + 'a>;

/// Per-iteration handle given to the test case.
///
/// Time spent inside [`pause`](Self::pause) and [`consume`](Self::consume) is
/// subtracted from the iteration sample.
#[derive(Debug, Default)]
pub struct IterationContext {
    paused: Duration,
    warmup: bool,
    excluded: bool,
}

impl IterationContext {
    fn warmup() -> Self {
        Self {
            warmup: true,
            ..Self::default()
        }
    }

    /// Runs `f` off the clock. During warm-up nothing is recorded.
    pub fn pause<R>(&mut self, f: impl FnOnce() -> R) -> R {
        if self.warmup {
            return f();
        }
        let start = Instant::now();
        let result = f();
        self.paused += start.elapsed();
        result
    }

    /// Keeps the optimizer from discarding `value`, off the clock.
    pub fn consume<T>(&mut self, value: T) {
        let start = Instant::now();
        black_box(value);
        self.paused += start.elapsed();
    }

    /// Drops this iteration from the average, e.g. a cache hit in a miss scenario.
    pub fn exclude_result(&mut self) {
        self.excluded = true;
    }

    pub fn is_warmup(&self) -> bool {
        self.warmup
    }

    pub fn total_pause(&self) -> Duration {
        self.paused
    }
}

/// Averages wall-clock time of `test_case` over a number of iterations after
/// an unmeasured warm-up.
pub struct AvgTimeBenchmark<'a, I, O> {
    warm_up_iterations: usize,
    test_case_iterations: usize,
    test_case: TestCase<'a, I, O>,
    data_provider: DataProvider<'a, I>,
    before_test_callback: Callback<'a>,
    after_warm_up_callback: Callback<'a>,
    times: Vec<Duration>,
}

impl<'a, I, O> AvgTimeBenchmark<'a, I, O> {
    pub fn builder() -> AvgTimeBenchmarkBuilder<'a, I, O> {
        AvgTimeBenchmarkBuilder::new()
    }

    /// Like [`Benchmark::run`] but returns the full sample distribution.
    pub fn run_detailed(&mut self) -> BenchmarkSummary {
        self.times.clear();

        for i in 0..self.warm_up_iterations {
            (self.before_test_callback)();
            self.warm_up_iteration(i);
        }

        (self.after_warm_up_callback)();

        for i in 0..self.test_case_iterations {
            (self.before_test_callback)();
            self.iteration(i);
        }

        tracing::trace!(
            "Benchmark finished: {} warm-up, {} measured, {} recorded",
            self.warm_up_iterations,
            self.test_case_iterations,
            self.times.len()
        );

        BenchmarkSummary::from_samples(&self.times)
    }

    pub fn samples(&self) -> &[Duration] {
        &self.times
    }

    fn iteration(&mut self, iteration: usize) {
        let mut context = IterationContext::default();
        let input = (self.data_provider)(iteration);

        let start = Instant::now();
        let result = (self.test_case)(input, &mut context);
        let elapsed = start.elapsed().saturating_sub(context.total_pause());

        if !context.excluded {
            self.times.push(elapsed);
        }
        black_box(result);
    }

    fn warm_up_iteration(&mut self, iteration: usize) {
        let mut context = IterationContext::warmup();
        let input = (self.data_provider)(iteration);
        let result = (self.test_case)(input, &mut context);
        black_box(result);
    }
}

impl<'a, I, O> Benchmark for AvgTimeBenchmark<'a, I, O> {
    fn run(&mut self) -> Duration {
        self.run_detailed().mean
    }
}

pub struct AvgTimeBenchmarkBuilder<'a, I, O> {
    warm_up_iterations: usize,
    test_case_iterations: usize,
    test_case: Option<TestCase<'a, I, O>>,
    data_provider: Option<DataProvider<'a, I>>,
    before_test_callback: Callback<'a>,
    after_warm_up_callback: Callback<'a>,
}

impl<'a, I, O> Default for AvgTimeBenchmarkBuilder<'a, I, O> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, I, O> AvgTimeBenchmarkBuilder<'a, I, O> {
    pub fn new() -> Self {
        Self {
            warm_up_iterations: 0,
            test_case_iterations: 0,
            test_case: None,
            data_provider: None,
            before_test_callback: Box::new(|| {}),
            after_warm_up_callback: Box::new(|| {}),
        }
    }

    pub fn warm_up_iterations(mut self, warm_up_iterations: usize) -> Self {
        self.warm_up_iterations = warm_up_iterations;
        self
    }

    pub fn test_case_iterations(mut self, test_case_iterations: usize) -> Self {
        self.test_case_iterations = test_case_iterations;
        self
    }

    pub fn test_case(mut self, test_case: impl FnMut(I, &mut IterationContext) -> O + 'a) -> Self {
        self.test_case = Some(Box::new(test_case));
        self
    }

    pub fn data_provider(mut self, data_provider: impl FnMut(usize) -> I + 'a) -> Self {
        self.data_provider = Some(Box::new(data_provider));
        self
    }

    pub fn before_test_callback(mut self, callback: impl FnMut() + 'a) -> Self {
        self.before_test_callback = Box::new(callback);
        self
    }

    pub fn after_warm_up_callback(mut self, callback: impl FnMut() + 'a) -> Self {
        self.after_warm_up_callback = Box::new(callback);
        self
    }

    pub fn build(self) -> Result<AvgTimeBenchmark<'a, I, O>, BenchmarkError> {
        let test_case = self.test_case.ok_or(BenchmarkError::MissingTestCase)?;
        let data_provider = self
            .data_provider
            .ok_or(BenchmarkError::MissingDataProvider)?;

        Ok(AvgTimeBenchmark {
            warm_up_iterations: self.warm_up_iterations,
            test_case_iterations: self.test_case_iterations,
            test_case,
            data_provider,
            before_test_callback: self.before_test_callback,
            after_warm_up_callback: self.after_warm_up_callback,
            times: Vec::with_capacity(self.test_case_iterations),
        })
    }
}

impl<'a, O> AvgTimeBenchmarkBuilder<'a, (), O> {
    /// For test cases that take no input.
    pub fn no_input(self) -> Self {
        self.data_provider(|_| ())
    }
}
