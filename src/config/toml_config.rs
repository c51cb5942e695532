use crate::cache::CachePolicy;
use crate::config::{
    cache_grid, collection_grid, default_capacity, default_formats, default_suites,
    validate_provider, DEFAULT_COLLECTION_SIZES, DEFAULT_DATA_SIZE, DEFAULT_OUTPUT_PATH,
};
use crate::core::ConfigProvider;
use crate::domain::model::{CacheRun, CollectionFamily, CollectionRun, ReportFormat, SuiteKind};
use crate::utils::error::{BenchError, Result};
use crate::utils::validation::Validate;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub suite: SuiteConfig,
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub collection: CollectionConfig,
    #[serde(default)]
    pub report: ReportConfig,
    pub monitoring: Option<MonitoringConfig>,
}

// 未設定的欄位沿用 CLI 預設值
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteConfig {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_suites")]
    pub run: Vec<SuiteKind>,
    pub seed: Option<u64>,
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            description: None,
            run: default_suites(),
            seed: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DataConfig {
    pub file: Option<String>,
    pub size: Option<u32>,
    pub generate: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CacheConfig {
    pub policies: Option<Vec<CachePolicy>>,
    pub capacity: Option<usize>,
    pub warmups: Option<Vec<usize>>,
    pub tests: Option<Vec<usize>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CollectionConfig {
    pub families: Option<Vec<CollectionFamily>>,
    pub warmups: Option<Vec<usize>>,
    pub tests: Option<Vec<usize>>,
    pub sizes: Option<Vec<usize>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    #[serde(default = "default_output_path")]
    pub output_path: String,
    #[serde(default = "default_formats")]
    pub formats: Vec<ReportFormat>,
    #[serde(default)]
    pub archive: bool,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            output_path: default_output_path(),
            formats: default_formats(),
            archive: false,
        }
    }
}

fn default_output_path() -> String {
    DEFAULT_OUTPUT_PATH.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    #[serde(default)]
    pub enabled: bool,
    pub log_level: Option<String>,
    pub log_json: Option<bool>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(BenchError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| BenchError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${DATA_DIR})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}")
            .map_err(|e| BenchError::config(format!("invalid substitution pattern: {}", e)))?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn name(&self) -> &str {
        &self.suite.name
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_json(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_json)
            .unwrap_or(false)
    }

    pub fn verbose(&self) -> bool {
        self.monitoring
            .as_ref()
            .and_then(|m| m.log_level.as_deref())
            .map(|level| matches!(level, "debug" | "trace"))
            .unwrap_or(false)
    }
}

impl ConfigProvider for TomlConfig {
    fn output_path(&self) -> &str {
        &self.report.output_path
    }

    fn data_file(&self) -> &str {
        self.data.file.as_deref().unwrap_or("data/values.csv")
    }

    fn data_size(&self) -> u32 {
        self.data.size.unwrap_or(DEFAULT_DATA_SIZE)
    }

    fn generate_data(&self) -> bool {
        self.data.generate.unwrap_or(false)
    }

    fn seed(&self) -> u64 {
        self.suite.seed.unwrap_or(42)
    }

    fn suites(&self) -> Vec<SuiteKind> {
        self.suite.run.clone()
    }

    fn cache_policies(&self) -> Vec<CachePolicy> {
        self.cache
            .policies
            .clone()
            .unwrap_or_else(|| CachePolicy::ALL.to_vec())
    }

    fn cache_capacity(&self) -> usize {
        self.cache
            .capacity
            .unwrap_or_else(|| default_capacity(self.data_size()))
    }

    fn cache_runs(&self) -> Vec<CacheRun> {
        let warm_ups = self.cache.warmups.clone().unwrap_or_else(|| vec![0, 10_000]);
        let tests = self.cache.tests.clone().unwrap_or_else(|| vec![1000]);
        cache_grid(&warm_ups, &tests)
    }

    fn collection_families(&self) -> Vec<CollectionFamily> {
        self.collection
            .families
            .clone()
            .unwrap_or_else(|| CollectionFamily::ALL.to_vec())
    }

    fn collection_runs(&self) -> Vec<CollectionRun> {
        let warm_ups = self.collection.warmups.clone().unwrap_or_else(|| vec![0, 100]);
        let tests = self.collection.tests.clone().unwrap_or_else(|| vec![10]);
        let sizes = self
            .collection
            .sizes
            .clone()
            .unwrap_or_else(|| DEFAULT_COLLECTION_SIZES.to_vec());
        collection_grid(&warm_ups, &tests, &sizes)
    }

    fn report_formats(&self) -> Vec<ReportFormat> {
        self.report.formats.clone()
    }

    fn archive_reports(&self) -> bool {
        self.report.archive
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        if self.suite.name.trim().is_empty() {
            return Err(BenchError::MissingConfigError {
                field: "suite.name".to_string(),
            });
        }
        validate_provider(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[suite]
name = "nightly"
run = ["cache", "collection"]
seed = 7

[data]
size = 2000
generate = true

[cache]
policies = ["lru", "rr"]
warmups = [0, 500]
tests = [100]

[collection]
families = ["list"]
sizes = [10, 20, 30]

[report]
output_path = "./bench-output"
formats = ["text", "json"]
archive = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.name(), "nightly");
        assert_eq!(config.seed(), 7);
        assert_eq!(config.cache_policies(), vec![CachePolicy::Lru, CachePolicy::Random]);
        assert_eq!(config.cache_capacity(), 500);
        assert_eq!(config.cache_runs().len(), 2);
        assert_eq!(config.collection_families(), vec![CollectionFamily::List]);
        assert_eq!(config.collection_runs().len(), 2 * 3);
        assert!(config.archive_reports());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_sections_fall_back_to_defaults() {
        let toml_content = r#"
[suite]
name = "defaults"
run = ["collection"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.output_path(), ".");
        assert_eq!(config.report_formats(), vec![ReportFormat::Text]);
        assert_eq!(config.collection_families().len(), 4);
        assert_eq!(config.collection_runs().len(), 2 * 5);
        assert_eq!(config.data_size(), DEFAULT_DATA_SIZE);
        assert!(!config.monitoring_enabled());
    }

    #[test]
    fn test_partial_report_section_keeps_defaults() {
        let toml_content = r#"
[suite]
name = "partial"
run = ["collection"]

[report]
output_path = "./out"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output_path(), "./out");
        assert_eq!(config.report_formats(), vec![ReportFormat::Text]);
        assert!(!config.archive_reports());

        let toml_content = r#"
[suite]
name = "archive-only"
run = ["collection"]

[report]
archive = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output_path(), ".");
        assert!(config.archive_reports());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_suite_and_monitoring_sections() {
        let toml_content = r#"
[suite]
name = "both"

[monitoring]
log_level = "debug"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.suites(), vec![SuiteKind::Cache, SuiteKind::Collection]);
        assert!(!config.monitoring_enabled());
        assert!(config.verbose());

        let config = TomlConfig::from_toml_str("[collection]\nsizes = [5]\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(BenchError::MissingConfigError { .. })
        ));
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("CACHEBENCH_TEST_OUTPUT", "/tmp/cachebench-out");

        let toml_content = r#"
[suite]
name = "env"
run = ["collection"]

[report]
output_path = "${CACHEBENCH_TEST_OUTPUT}"
formats = ["csv"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output_path(), "/tmp/cachebench-out");

        std::env::remove_var("CACHEBENCH_TEST_OUTPUT");
    }

    #[test]
    fn test_unknown_policy_fails_to_parse() {
        let toml_content = r#"
[suite]
name = "bad"
run = ["cache"]

[cache]
policies = ["mru"]
"#;

        assert!(TomlConfig::from_toml_str(toml_content).is_err());
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[suite]
name = "empty"
run = []
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_monitoring_section() {
        let toml_content = r#"
[suite]
name = "monitored"
run = ["collection"]

[monitoring]
enabled = true
log_level = "debug"
log_json = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.monitoring_enabled());
        assert!(config.verbose());
        assert!(config.log_json());
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[suite]
name = "file-test"
run = ["collection"]
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.name(), "file-test");
    }
}
