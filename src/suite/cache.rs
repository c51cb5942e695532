use crate::benchmark::{AvgTimeBenchmark, BenchmarkSummary, IterationContext};
use crate::cache::{build_cache, Cache, CachePolicy, CacheStats};
use crate::data::{CsvRepo, DataError, KeyDistribution, KeyGenerator};
use crate::domain::model::{CacheReportEntry, CacheRun};
use crate::suite::SuitePlan;
use crate::utils::error::Result;
use std::cell::RefCell;

/// Which lookups a scenario times.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheScenario {
    /// Misses only: lookup plus backing store read plus insert.
    MissLoad(KeyDistribution),
    /// Hits only.
    HitLoad(KeyDistribution),
    /// Every lookup.
    MissAndHitLoad(KeyDistribution),
}

impl CacheScenario {
    pub const ALL: [CacheScenario; 6] = [
        CacheScenario::MissLoad(KeyDistribution::Linear),
        CacheScenario::MissLoad(KeyDistribution::Gaussian),
        CacheScenario::HitLoad(KeyDistribution::Linear),
        CacheScenario::HitLoad(KeyDistribution::Gaussian),
        CacheScenario::MissAndHitLoad(KeyDistribution::Linear),
        CacheScenario::MissAndHitLoad(KeyDistribution::Gaussian),
    ];

    pub fn distribution(&self) -> KeyDistribution {
        match self {
            CacheScenario::MissLoad(d) | CacheScenario::HitLoad(d) | CacheScenario::MissAndHitLoad(d) => *d,
        }
    }

    pub fn method_name(&self) -> String {
        let kind = match self {
            CacheScenario::MissLoad(_) => "MissLoadTime",
            CacheScenario::HitLoad(_) => "HitLoadTime",
            CacheScenario::MissAndHitLoad(_) => "MissAndHitLoadTime",
        };
        format!("averageCache{}{}", kind, self.distribution().label())
    }

    fn times_hits(&self) -> bool {
        !matches!(self, CacheScenario::MissLoad(_))
    }

    fn times_misses(&self) -> bool {
        !matches!(self, CacheScenario::HitLoad(_))
    }
}

/// Runs every policy x run shape x scenario in `plan` against `repo`.
pub fn run_cache_suite(plan: &SuitePlan, repo: &CsvRepo) -> Result<Vec<CacheReportEntry>> {
    let mut entries = Vec::with_capacity(plan.cache_scenario_count());

    for &policy in &plan.cache_policies {
        tracing::info!(
            "🗄️ Benchmarking {} cache (capacity {})",
            policy.type_name(),
            plan.cache_capacity
        );
        for run in &plan.cache_runs {
            for scenario in CacheScenario::ALL {
                let entry = run_scenario(plan, repo, policy, scenario, run)?;
                tracing::debug!(
                    "{} {} warmup={} tests={}: avg {:?}, hit {:.1}%, evicted {}",
                    policy.type_name(),
                    entry.method,
                    entry.warmup,
                    entry.tests,
                    entry.avg_read_time,
                    entry.hit_percentage,
                    entry.evicted
                );
                entries.push(entry);
            }
        }
    }

    Ok(entries)
}

/// One scenario on a fresh cache. Every policy sees the same key sequence.
pub fn run_scenario(
    plan: &SuitePlan,
    repo: &CsvRepo,
    policy: CachePolicy,
    scenario: CacheScenario,
    run: &CacheRun,
) -> Result<CacheReportEntry> {
    let (summary, stats) = measure(plan, repo, policy, scenario, run)?;
    Ok(CacheReportEntry::new(
        scenario.method_name(),
        policy,
        run.warm_up,
        run.tests,
        stats.missed,
        stats.evicted,
        summary.mean,
    ))
}

/// Samples only cover the lookups `scenario` times; the rest are excluded.
fn measure(
    plan: &SuitePlan,
    repo: &CsvRepo,
    policy: CachePolicy,
    scenario: CacheScenario,
    run: &CacheRun,
) -> Result<(BenchmarkSummary, CacheStats)> {
    let cache = RefCell::new(build_cache::<u32, String>(
        policy,
        plan.cache_capacity,
        plan.seed,
    )?);
    let keys = RefCell::new(KeyGenerator::new(
        scenario.distribution(),
        plan.data_size,
        plan.seed,
    )?);
    let failure: RefCell<Option<DataError>> = RefCell::new(None);

    let mut benchmark = AvgTimeBenchmark::builder()
        .warm_up_iterations(run.warm_up)
        .test_case_iterations(run.tests)
        .after_warm_up_callback(|| cache.borrow_mut().clear_stats())
        .data_provider(|_| keys.borrow_mut().next_key())
        .test_case(|key: u32, ctx: &mut IterationContext| {
            let mut cache = cache.borrow_mut();

            let hit = match cache.load(&key) {
                Some(value) => {
                    if scenario.times_hits() {
                        ctx.consume(value);
                    } else {
                        ctx.exclude_result();
                    }
                    true
                }
                None => false,
            };

            if !hit {
                if !scenario.times_misses() {
                    ctx.exclude_result();
                }
                match repo.load(key) {
                    Ok(value) => cache.cache(key, value),
                    Err(e) => {
                        ctx.exclude_result();
                        failure.borrow_mut().get_or_insert(e);
                    }
                }
            }

            cache.len()
        })
        .build()?;

    let summary = benchmark.run_detailed();
    drop(benchmark);

    if let Some(e) = failure.into_inner() {
        return Err(e.into());
    }

    let stats = cache.borrow().stats();
    Ok((summary, stats))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::SuiteKind;
    use std::time::Duration;
    use tempfile::TempDir;

    fn plan(data_size: u32, capacity: usize) -> SuitePlan {
        SuitePlan {
            suites: vec![SuiteKind::Cache],
            seed: 17,
            data_size,
            cache_policies: vec![CachePolicy::Lru],
            cache_capacity: capacity,
            cache_runs: vec![CacheRun {
                warm_up: 50,
                tests: 40,
            }],
            collection_families: vec![],
            collection_runs: vec![],
        }
    }

    #[test]
    fn test_method_names() {
        assert_eq!(
            CacheScenario::MissLoad(KeyDistribution::Linear).method_name(),
            "averageCacheMissLoadTimeLinearRandom"
        );
        assert_eq!(
            CacheScenario::MissAndHitLoad(KeyDistribution::Gaussian).method_name(),
            "averageCacheMissAndHitLoadTimeGaussianRandom"
        );
    }

    #[test]
    fn test_whole_key_space_cached_never_misses_after_warm_up() {
        let dir = TempDir::new().unwrap();
        let repo = CsvRepo::generate(dir.path().join("values.csv"), 5, 1).unwrap();
        let plan = plan(5, 5);

        // 暖身後 5 個 key 全部在快取內
        let entry = run_scenario(
            &plan,
            &repo,
            CachePolicy::Lru,
            CacheScenario::HitLoad(KeyDistribution::Linear),
            &plan.cache_runs[0],
        )
        .unwrap();

        assert_eq!(entry.missed, 0);
        assert_eq!(entry.hit, 40);
        assert_eq!(entry.evicted, 0);
        assert_eq!(entry.hit_percentage, 100.0);
    }

    #[test]
    fn test_small_cache_counts_misses_and_evictions() {
        let dir = TempDir::new().unwrap();
        let repo = CsvRepo::generate(dir.path().join("values.csv"), 200, 1).unwrap();
        let plan = plan(200, 2);

        let entry = run_scenario(
            &plan,
            &repo,
            CachePolicy::Fifo,
            CacheScenario::MissLoad(KeyDistribution::Linear),
            &plan.cache_runs[0],
        )
        .unwrap();

        assert!(entry.missed > 0);
        assert!(entry.evicted > 0);
        assert_eq!(entry.hit + entry.missed, entry.tests);
        assert_eq!(entry.policy, CachePolicy::Fifo);
    }

    #[test]
    fn test_miss_scenario_on_cached_key_space_records_nothing() {
        let dir = TempDir::new().unwrap();
        let repo = CsvRepo::generate(dir.path().join("values.csv"), 5, 1).unwrap();
        let plan = plan(5, 5);
        let scenario = CacheScenario::MissLoad(KeyDistribution::Linear);

        let (summary, stats) =
            measure(&plan, &repo, CachePolicy::Lru, scenario, &plan.cache_runs[0]).unwrap();
        assert_eq!(stats.missed, 0);
        assert_eq!(summary.samples, 0);

        let entry =
            run_scenario(&plan, &repo, CachePolicy::Lru, scenario, &plan.cache_runs[0]).unwrap();
        assert_eq!(entry.avg_read_time, Duration::ZERO);
        assert_eq!(entry.hit, 40);
    }

    #[test]
    fn test_hit_scenario_excludes_misses() {
        let dir = TempDir::new().unwrap();
        let repo = CsvRepo::generate(dir.path().join("values.csv"), 200, 1).unwrap();
        let plan = plan(200, 20);
        let run = &plan.cache_runs[0];

        let (summary, stats) = measure(
            &plan,
            &repo,
            CachePolicy::Lru,
            CacheScenario::HitLoad(KeyDistribution::Gaussian),
            run,
        )
        .unwrap();
        assert!(stats.missed > 0);
        assert_eq!(summary.samples, run.tests - stats.missed);

        let (summary, stats) = measure(
            &plan,
            &repo,
            CachePolicy::Lru,
            CacheScenario::MissLoad(KeyDistribution::Gaussian),
            run,
        )
        .unwrap();
        assert_eq!(summary.samples, stats.missed);

        let (summary, _) = measure(
            &plan,
            &repo,
            CachePolicy::Lru,
            CacheScenario::MissAndHitLoad(KeyDistribution::Gaussian),
            run,
        )
        .unwrap();
        assert_eq!(summary.samples, run.tests);
    }

    #[test]
    fn test_missing_backing_row_fails_scenario() {
        let dir = TempDir::new().unwrap();
        let repo = CsvRepo::generate(dir.path().join("values.csv"), 3, 1).unwrap();
        // key space larger than the file
        let plan = plan(50, 10);

        let result = run_scenario(
            &plan,
            &repo,
            CachePolicy::Lfru,
            CacheScenario::MissAndHitLoad(KeyDistribution::Linear),
            &plan.cache_runs[0],
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_suite_produces_every_scenario() {
        let dir = TempDir::new().unwrap();
        let repo = CsvRepo::generate(dir.path().join("values.csv"), 30, 1).unwrap();
        let mut plan = plan(30, 8);
        plan.cache_policies = CachePolicy::ALL.to_vec();
        plan.cache_runs = vec![CacheRun {
            warm_up: 5,
            tests: 5,
        }];

        let entries = run_cache_suite(&plan, &repo).unwrap();
        assert_eq!(entries.len(), plan.cache_scenario_count());
        assert!(entries.iter().all(|e| e.tests == 5));
    }
}
