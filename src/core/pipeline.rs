use crate::core::{ConfigProvider, Pipeline, Storage, SuiteResults};
use crate::data::CsvRepo;
use crate::domain::model::SuiteKind;
use crate::report;
use crate::suite::{self, PreparedRun, SuitePlan};
use crate::utils::error::{BenchError, Result};
use chrono::Local;
use std::path::Path;

pub struct BenchPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> BenchPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    pub fn config(&self) -> &C {
        &self.config
    }
}

fn join_error(e: tokio::task::JoinError) -> BenchError {
    BenchError::ExecutionError {
        message: format!("benchmark task did not complete: {}", e),
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> Pipeline for BenchPipeline<S, C> {
    async fn prepare(&self) -> Result<PreparedRun> {
        let plan = SuitePlan::from_config(&self.config);

        let repo = if plan.runs_suite(SuiteKind::Cache) {
            let path = self.config.data_file().to_string();
            let generate = self.config.generate_data();
            let (size, seed) = (plan.data_size, plan.seed);

            let repo = tokio::task::spawn_blocking(move || {
                if generate {
                    tracing::info!("Generating {} rows into {}", size, path);
                    CsvRepo::generate(&path, size, seed)
                } else {
                    tracing::debug!("Using existing data file {}", path);
                    CsvRepo::open(&path)
                }
            })
            .await
            .map_err(join_error)??;
            Some(repo)
        } else {
            None
        };

        Ok(PreparedRun {
            plan,
            repo,
            started_at: Local::now(),
        })
    }

    async fn execute(&self, prepared: PreparedRun) -> Result<SuiteResults> {
        let PreparedRun {
            plan,
            repo,
            started_at,
        } = prepared;

        // 計時不能和 async runtime 共用執行緒
        tokio::task::spawn_blocking(move || {
            let mut results = SuiteResults::new(started_at);

            if plan.runs_suite(SuiteKind::Cache) {
                let repo = repo.ok_or_else(|| BenchError::ExecutionError {
                    message: "cache suite requested without a data set".to_string(),
                })?;
                results.cache_entries = suite::run_cache_suite(&plan, &repo)?;
            }

            if plan.runs_suite(SuiteKind::Collection) {
                results.collection_entries = suite::run_collection_suite(&plan)?;
            }

            Ok::<_, BenchError>(results)
        })
        .await
        .map_err(join_error)?
    }

    async fn publish(&self, results: SuiteResults) -> Result<String> {
        let reports = report::build_reports(&results, &self.config.report_formats())?;

        for report in &reports {
            tracing::debug!(
                "{} {} ({} bytes)",
                if report.append { "Appending to" } else { "Writing" },
                report.path,
                report.contents.len()
            );
            if report.append {
                self.storage
                    .append_file(&report.path, &report.contents)
                    .await?;
            } else {
                self.storage
                    .write_file(&report.path, &report.contents)
                    .await?;
            }
        }

        if self.config.archive_reports() && !reports.is_empty() {
            let zip_data = report::archive::archive(&reports)?;
            let archive_path =
                report::archive::archive_path(&report::timestamp(&results.started_at));
            tracing::debug!("Writing ZIP file ({} bytes) to storage", zip_data.len());
            self.storage.write_file(&archive_path, &zip_data).await?;
        }

        let output_path = Path::new(self.config.output_path()).join("results");
        Ok(output_path.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CachePolicy;
    use crate::domain::model::{
        CacheReportEntry, CacheRun, CollectionFamily, CollectionRun, ReportFormat,
    };
    use std::collections::HashMap;
    use std::sync::Arc;
    use std::time::Duration;
    use tempfile::TempDir;
    use tokio::sync::Mutex;

    #[derive(Clone)]
    struct MockStorage {
        files: Arc<Mutex<HashMap<String, Vec<u8>>>>,
    }

    impl MockStorage {
        fn new() -> Self {
            Self {
                files: Arc::new(Mutex::new(HashMap::new())),
            }
        }

        async fn get_file(&self, path: &str) -> Option<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned()
        }

        async fn paths(&self) -> Vec<String> {
            let files = self.files.lock().await;
            let mut paths: Vec<String> = files.keys().cloned().collect();
            paths.sort();
            paths
        }
    }

    impl Storage for MockStorage {
        async fn read_file(&self, path: &str) -> Result<Vec<u8>> {
            let files = self.files.lock().await;
            files.get(path).cloned().ok_or_else(|| {
                BenchError::IoError(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("File not found: {}", path),
                ))
            })
        }

        async fn write_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files.insert(path.to_string(), data.to_vec());
            Ok(())
        }

        async fn append_file(&self, path: &str, data: &[u8]) -> Result<()> {
            let mut files = self.files.lock().await;
            files
                .entry(path.to_string())
                .or_default()
                .extend_from_slice(data);
            Ok(())
        }
    }

    struct MockConfig {
        data_file: String,
        suites: Vec<SuiteKind>,
        formats: Vec<ReportFormat>,
        archive: bool,
    }

    impl MockConfig {
        fn new(data_file: String, suites: Vec<SuiteKind>) -> Self {
            Self {
                data_file,
                suites,
                formats: vec![ReportFormat::Text],
                archive: false,
            }
        }
    }

    impl ConfigProvider for MockConfig {
        fn output_path(&self) -> &str {
            "test_output"
        }

        fn data_file(&self) -> &str {
            &self.data_file
        }

        fn data_size(&self) -> u32 {
            40
        }

        fn generate_data(&self) -> bool {
            true
        }

        fn seed(&self) -> u64 {
            9
        }

        fn suites(&self) -> Vec<SuiteKind> {
            self.suites.clone()
        }

        fn cache_policies(&self) -> Vec<CachePolicy> {
            vec![CachePolicy::Lru, CachePolicy::Fifo]
        }

        fn cache_capacity(&self) -> usize {
            10
        }

        fn cache_runs(&self) -> Vec<CacheRun> {
            vec![CacheRun {
                warm_up: 5,
                tests: 20,
            }]
        }

        fn collection_families(&self) -> Vec<CollectionFamily> {
            vec![CollectionFamily::Deque]
        }

        fn collection_runs(&self) -> Vec<CollectionRun> {
            vec![CollectionRun {
                warm_up: 1,
                tests: 2,
                size: 8,
            }]
        }

        fn report_formats(&self) -> Vec<ReportFormat> {
            self.formats.clone()
        }

        fn archive_reports(&self) -> bool {
            self.archive
        }
    }

    fn data_file(dir: &TempDir) -> String {
        dir.path().join("values.csv").to_string_lossy().to_string()
    }

    #[tokio::test]
    async fn test_prepare_generates_data_for_cache_suite() {
        let dir = TempDir::new().unwrap();
        let config = MockConfig::new(data_file(&dir), vec![SuiteKind::Cache]);
        let pipeline = BenchPipeline::new(MockStorage::new(), config);

        let prepared = pipeline.prepare().await.unwrap();

        let repo = prepared.repo.expect("cache suite needs a repo");
        assert_eq!(repo.load_all().unwrap().len(), 40);
        assert_eq!(prepared.plan.cache_scenario_count(), 2 * 6);
    }

    #[tokio::test]
    async fn test_prepare_skips_data_for_collection_suite() {
        let dir = TempDir::new().unwrap();
        let config = MockConfig::new(data_file(&dir), vec![SuiteKind::Collection]);
        let pipeline = BenchPipeline::new(MockStorage::new(), config);

        let prepared = pipeline.prepare().await.unwrap();

        assert!(prepared.repo.is_none());
        assert!(!dir.path().join("values.csv").exists());
    }

    #[tokio::test]
    async fn test_execute_runs_both_suites() {
        let dir = TempDir::new().unwrap();
        let config = MockConfig::new(
            data_file(&dir),
            vec![SuiteKind::Cache, SuiteKind::Collection],
        );
        let pipeline = BenchPipeline::new(MockStorage::new(), config);

        let prepared = pipeline.prepare().await.unwrap();
        let results = pipeline.execute(prepared).await.unwrap();

        assert_eq!(results.cache_entries.len(), 12);
        // deque: 2 implementations x 6 operations
        assert_eq!(results.collection_entries.len(), 12);
    }

    #[tokio::test]
    async fn test_execute_without_repo_fails() {
        let dir = TempDir::new().unwrap();
        let config = MockConfig::new(data_file(&dir), vec![SuiteKind::Cache]);
        let pipeline = BenchPipeline::new(MockStorage::new(), config);

        let mut prepared = pipeline.prepare().await.unwrap();
        prepared.repo = None;

        let result = pipeline.execute(prepared).await;
        assert!(matches!(result, Err(BenchError::ExecutionError { .. })));
    }

    #[tokio::test]
    async fn test_publish_appends_text_and_archives() {
        let storage = MockStorage::new();
        let mut config = MockConfig::new(String::new(), vec![SuiteKind::Cache]);
        config.formats = vec![ReportFormat::Text, ReportFormat::Json];
        config.archive = true;
        let pipeline = BenchPipeline::new(storage.clone(), config);

        let mut results = SuiteResults::new(Local::now());
        results.cache_entries.push(CacheReportEntry::new(
            "averageCacheHitLoadTimeLinearRandom",
            CachePolicy::Lru,
            0,
            10,
            2,
            0,
            Duration::from_nanos(100),
        ));
        let ts = report::timestamp(&results.started_at);

        let output = pipeline.publish(results.clone()).await.unwrap();
        pipeline.publish(results).await.unwrap();

        assert_eq!(
            output,
            Path::new("test_output").join("results").display().to_string()
        );

        let text_path = format!("results/cache/cacheLRUCache{}.txt", ts);
        let text = String::from_utf8(storage.get_file(&text_path).await.unwrap()).unwrap();
        assert_eq!(text.matches("method='averageCacheHitLoadTimeLinearRandom'").count(), 2);

        let json_path = format!("results/cache/cacheLRUCache{}.json", ts);
        let json: serde_json::Value =
            serde_json::from_slice(&storage.get_file(&json_path).await.unwrap()).unwrap();
        assert_eq!(json.as_array().map(Vec::len), Some(1));

        let paths = storage.paths().await;
        assert!(paths.contains(&report::archive::archive_path(&ts)));
        assert_eq!(paths.len(), 3);
    }

    #[tokio::test]
    async fn test_publish_empty_results_writes_nothing() {
        let storage = MockStorage::new();
        let mut config = MockConfig::new(String::new(), vec![SuiteKind::Collection]);
        config.archive = true;
        let pipeline = BenchPipeline::new(storage.clone(), config);

        pipeline
            .publish(SuiteResults::new(Local::now()))
            .await
            .unwrap();

        assert!(storage.paths().await.is_empty());
    }
}
