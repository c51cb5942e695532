use crate::core::Pipeline;
use crate::utils::error::Result;
use crate::utils::monitor::SystemMonitor;

/// Drives a [`Pipeline`] through prepare, execute and publish.
pub struct BenchmarkEngine<P: Pipeline> {
    pipeline: P,
    monitor: SystemMonitor,
}

impl<P: Pipeline> BenchmarkEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: SystemMonitor::new(monitor_enabled),
        }
    }

    pub async fn run(&self) -> Result<String> {
        tracing::info!("Starting benchmark run...");

        // Prepare
        let prepared = self.pipeline.prepare().await?;
        tracing::info!(
            "Prepared {} cache and {} collection scenarios",
            prepared.plan.cache_scenario_count(),
            prepared.plan.collection_scenario_count()
        );
        if let Some(repo) = &prepared.repo {
            tracing::debug!("Backing data set: {}", repo.path().display());
        }
        self.monitor.log_stats("Prepare");

        // Execute
        let results = self.pipeline.execute(prepared).await?;
        tracing::info!(
            "Measured {} scenarios ({} cache, {} collection)",
            results.len(),
            results.cache_entries.len(),
            results.collection_entries.len()
        );
        self.monitor.log_stats("Execute");

        // Publish
        let output_path = self.pipeline.publish(results).await?;
        tracing::info!("Reports written to: {}", output_path);
        self.monitor.log_stats("Publish");
        self.monitor.log_final_stats();

        Ok(output_path)
    }
}
