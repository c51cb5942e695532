//! Benchmark suites: the scenario grids behind every report entry.

pub mod cache;
pub mod collection;

pub use cache::{run_cache_suite, CacheScenario};
pub use collection::run_collection_suite;

use crate::cache::CachePolicy;
use crate::data::CsvRepo;
use crate::domain::model::{CacheRun, CollectionFamily, CollectionRun, SuiteKind};
use crate::domain::ports::ConfigProvider;
use chrono::{DateTime, Local};
use serde::Serialize;

/// Fully resolved, owned description of what a run will execute.
#[derive(Debug, Clone, Serialize)]
pub struct SuitePlan {
    pub suites: Vec<SuiteKind>,
    pub seed: u64,
    pub data_size: u32,
    pub cache_policies: Vec<CachePolicy>,
    pub cache_capacity: usize,
    pub cache_runs: Vec<CacheRun>,
    pub collection_families: Vec<CollectionFamily>,
    pub collection_runs: Vec<CollectionRun>,
}

impl SuitePlan {
    pub fn from_config<C: ConfigProvider + ?Sized>(config: &C) -> Self {
        Self {
            suites: config.suites(),
            seed: config.seed(),
            data_size: config.data_size(),
            cache_policies: config.cache_policies(),
            cache_capacity: config.cache_capacity(),
            cache_runs: config.cache_runs(),
            collection_families: config.collection_families(),
            collection_runs: config.collection_runs(),
        }
    }

    pub fn runs_suite(&self, kind: SuiteKind) -> bool {
        self.suites.contains(&kind)
    }

    /// Number of report entries the cache suite will produce.
    pub fn cache_scenario_count(&self) -> usize {
        if !self.runs_suite(SuiteKind::Cache) {
            return 0;
        }
        self.cache_policies.len() * self.cache_runs.len() * CacheScenario::ALL.len()
    }

    /// Number of report entries the collection suite will produce.
    pub fn collection_scenario_count(&self) -> usize {
        if !self.runs_suite(SuiteKind::Collection) {
            return 0;
        }
        let per_run: usize = self
            .collection_families
            .iter()
            .map(|family| family.kinds().len() * collection::operations(*family).len())
            .sum();
        per_run * self.collection_runs.len()
    }
}

/// Output of the prepare phase.
#[derive(Debug, Clone)]
pub struct PreparedRun {
    pub plan: SuitePlan,
    pub repo: Option<CsvRepo>,
    pub started_at: DateTime<Local>,
}
