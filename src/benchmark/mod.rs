pub mod avg_time;

pub use avg_time::{AvgTimeBenchmark, AvgTimeBenchmarkBuilder, IterationContext};

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BenchmarkError {
    #[error("benchmark has no test case")]
    MissingTestCase,

    #[error("benchmark has no data provider")]
    MissingDataProvider,
}

pub trait Benchmark {
    /// Runs warm-up and measured iterations and returns the mean iteration time.
    fn run(&mut self) -> Duration;
}

/// Distribution of the measured (non-excluded) iteration times of one run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkSummary {
    pub samples: usize,
    pub mean: Duration,
    pub min: Duration,
    pub max: Duration,
    pub median: Duration,
    pub std_dev: Duration,
}

impl BenchmarkSummary {
    pub fn from_samples(samples: &[Duration]) -> Self {
        if samples.is_empty() {
            return Self::default();
        }

        let mut nanos: Vec<u128> = samples.iter().map(Duration::as_nanos).collect();
        nanos.sort_unstable();

        let count = nanos.len();
        let mean = nanos.iter().sum::<u128>() as f64 / count as f64;
        let median = if count % 2 == 0 {
            (nanos[count / 2 - 1] + nanos[count / 2]) as f64 / 2.0
        } else {
            nanos[count / 2] as f64
        };
        let variance = nanos
            .iter()
            .map(|&n| {
                let diff = n as f64 - mean;
                diff * diff
            })
            .sum::<f64>()
            / count as f64;

        Self {
            samples: count,
            mean: nanos_to_duration(mean),
            min: nanos_to_duration(nanos[0] as f64),
            max: nanos_to_duration(nanos[count - 1] as f64),
            median: nanos_to_duration(median),
            std_dev: nanos_to_duration(variance.sqrt()),
        }
    }
}

fn nanos_to_duration(nanos: f64) -> Duration {
    Duration::from_nanos(nanos.round().max(0.0) as u64)
}
