use crate::cache::CachePolicy;
use crate::domain::model::{
    CacheRun, CollectionFamily, CollectionRun, ReportFormat, SuiteKind, SuiteResults,
};
use crate::suite::PreparedRun;
use crate::utils::error::Result;
use async_trait::async_trait;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
    fn append_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn output_path(&self) -> &str;
    fn data_file(&self) -> &str;
    fn data_size(&self) -> u32;
    fn generate_data(&self) -> bool;
    fn seed(&self) -> u64;
    fn suites(&self) -> Vec<SuiteKind>;
    fn cache_policies(&self) -> Vec<CachePolicy>;
    fn cache_capacity(&self) -> usize;
    fn cache_runs(&self) -> Vec<CacheRun>;
    fn collection_families(&self) -> Vec<CollectionFamily>;
    fn collection_runs(&self) -> Vec<CollectionRun>;
    fn report_formats(&self) -> Vec<ReportFormat>;
    fn archive_reports(&self) -> bool;
}

#[async_trait]
pub trait Pipeline: Send + Sync {
    async fn prepare(&self) -> Result<PreparedRun>;
    async fn execute(&self, prepared: PreparedRun) -> Result<SuiteResults>;
    async fn publish(&self, results: SuiteResults) -> Result<String>;
}
