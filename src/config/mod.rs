pub mod cli;
pub mod toml_config;

use crate::cache::CachePolicy;
use crate::core::ConfigProvider;
use crate::domain::model::{CacheRun, CollectionFamily, CollectionRun, ReportFormat, SuiteKind};
use crate::utils::error::{BenchError, Result};
use crate::utils::validation;
#[cfg(feature = "cli")]
use crate::utils::validation::Validate;
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_DATA_SIZE: u32 = 15_000;
pub const DEFAULT_OUTPUT_PATH: &str = ".";
pub const DEFAULT_COLLECTION_SIZES: [usize; 5] = [10, 100, 1000, 10_000, 100_000];

pub fn default_suites() -> Vec<SuiteKind> {
    vec![SuiteKind::Cache, SuiteKind::Collection]
}

pub fn default_formats() -> Vec<ReportFormat> {
    vec![ReportFormat::Text]
}

/// Cache capacity when none is configured: a quarter of the key space.
pub fn default_capacity(data_size: u32) -> usize {
    (data_size as usize / 4).max(1)
}

/// Every warm-up paired with every test count.
pub fn cache_grid(warm_ups: &[usize], tests: &[usize]) -> Vec<CacheRun> {
    warm_ups
        .iter()
        .flat_map(|&warm_up| tests.iter().map(move |&tests| CacheRun { warm_up, tests }))
        .collect()
}

/// Every warm-up x test count x collection size.
pub fn collection_grid(warm_ups: &[usize], tests: &[usize], sizes: &[usize]) -> Vec<CollectionRun> {
    let mut runs = Vec::with_capacity(warm_ups.len() * tests.len() * sizes.len());
    for &warm_up in warm_ups {
        for &tests in tests {
            for &size in sizes {
                runs.push(CollectionRun {
                    warm_up,
                    tests,
                    size,
                });
            }
        }
    }
    runs
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "cachebench")]
#[command(about = "Micro-benchmarks for eviction-policy caches and standard collections")]
pub struct CliConfig {
    #[arg(long, value_delimiter = ',', default_value = "cache,collection")]
    pub suites: Vec<SuiteKind>,

    #[arg(long, default_value = "data/values.csv", help = "key;value CSV backing the cache suite")]
    pub data_file: String,

    #[arg(long, default_value_t = DEFAULT_DATA_SIZE)]
    pub data_size: u32,

    #[arg(long, help = "Write a fresh random data file before running")]
    pub generate_data: bool,

    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    #[arg(long, value_delimiter = ',', default_value = "fifo,lfru,lru,rr")]
    pub policies: Vec<CachePolicy>,

    #[arg(long, help = "Cache capacity [default: data size / 4]")]
    pub capacity: Option<usize>,

    #[arg(long, value_delimiter = ',', default_value = "0,10000")]
    pub cache_warmups: Vec<usize>,

    #[arg(long, value_delimiter = ',', default_value = "1000")]
    pub cache_tests: Vec<usize>,

    #[arg(long, value_delimiter = ',', default_value = "list,set,queue,deque")]
    pub collections: Vec<CollectionFamily>,

    #[arg(long, value_delimiter = ',', default_value = "0,100")]
    pub collection_warmups: Vec<usize>,

    #[arg(long, value_delimiter = ',', default_value = "10")]
    pub collection_tests: Vec<usize>,

    #[arg(long, value_delimiter = ',', default_value = "10,100,1000,10000,100000")]
    pub collection_sizes: Vec<usize>,

    #[arg(long, default_value = DEFAULT_OUTPUT_PATH)]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "text")]
    pub formats: Vec<ReportFormat>,

    #[arg(long, help = "Also write a zip archive of this run's reports")]
    pub archive: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage after each phase")]
    pub monitor: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn data_file(&self) -> &str {
        &self.data_file
    }

    fn data_size(&self) -> u32 {
        self.data_size
    }

    fn generate_data(&self) -> bool {
        self.generate_data
    }

    fn seed(&self) -> u64 {
        self.seed
    }

    fn suites(&self) -> Vec<SuiteKind> {
        self.suites.clone()
    }

    fn cache_policies(&self) -> Vec<CachePolicy> {
        self.policies.clone()
    }

    fn cache_capacity(&self) -> usize {
        self.capacity
            .unwrap_or_else(|| default_capacity(self.data_size))
    }

    fn cache_runs(&self) -> Vec<CacheRun> {
        cache_grid(&self.cache_warmups, &self.cache_tests)
    }

    fn collection_families(&self) -> Vec<CollectionFamily> {
        self.collections.clone()
    }

    fn collection_runs(&self) -> Vec<CollectionRun> {
        collection_grid(
            &self.collection_warmups,
            &self.collection_tests,
            &self.collection_sizes,
        )
    }

    fn report_formats(&self) -> Vec<ReportFormat> {
        self.formats.clone()
    }

    fn archive_reports(&self) -> bool {
        self.archive
    }
}

/// Checks shared by every configuration source.
pub fn validate_provider<C: ConfigProvider + ?Sized>(config: &C) -> Result<()> {
    validation::validate_path("output_path", config.output_path())?;

    let suites = config.suites();
    validation::validate_non_empty("suites", &suites)?;
    validation::validate_unique("suites", &suites)?;
    validation::validate_non_empty("report.formats", &config.report_formats())?;
    validation::validate_unique("report.formats", &config.report_formats())?;

    if suites.contains(&SuiteKind::Cache) {
        validation::validate_path("data.file", config.data_file())?;
        validation::validate_positive_number("data.size", config.data_size() as usize, 1)?;
        validation::validate_positive_number("cache.capacity", config.cache_capacity(), 1)?;

        let policies = config.cache_policies();
        validation::validate_non_empty("cache.policies", &policies)?;
        validation::validate_unique("cache.policies", &policies)?;
        validation::validate_non_empty("cache.runs", &config.cache_runs())?;

        if !config.generate_data() && !std::path::Path::new(config.data_file()).exists() {
            return Err(BenchError::ConfigValidationError {
                field: "data.file".to_string(),
                message: format!(
                    "'{}' does not exist; pass --generate-data to create it",
                    config.data_file()
                ),
            });
        }
    }

    if suites.contains(&SuiteKind::Collection) {
        let families = config.collection_families();
        validation::validate_non_empty("collection.families", &families)?;
        validation::validate_unique("collection.families", &families)?;

        let runs = config.collection_runs();
        validation::validate_non_empty("collection.runs", &runs)?;
        for run in &runs {
            validation::validate_positive_number("collection.sizes", run.size, 1)?;
        }
    }

    Ok(())
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)
    }
}
