use cachebench::config::toml_config::TomlConfig;
use cachebench::utils::validation::Validate;
use cachebench::{BenchPipeline, BenchmarkEngine, CliConfig, LocalStorage};
use clap::Parser;
use std::path::Path;
use tempfile::TempDir;

fn files_under(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.file_name().to_string_lossy().to_string())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}

#[tokio::test]
async fn test_end_to_end_cache_and_collection_suites() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();
    let data_file = temp_dir.path().join("values.csv");

    let config = CliConfig::parse_from([
        "cachebench",
        "--data-file",
        data_file.to_str().unwrap(),
        "--data-size",
        "200",
        "--generate-data",
        "--policies",
        "lru,lfru",
        "--capacity",
        "50",
        "--cache-warmups",
        "0,20",
        "--cache-tests",
        "30",
        "--collections",
        "list,set",
        "--collection-warmups",
        "1",
        "--collection-tests",
        "2",
        "--collection-sizes",
        "16",
        "--formats",
        "text,csv",
        "--archive",
        "--output-path",
        &output_path,
    ]);
    config.validate().unwrap();

    let storage = LocalStorage::new(output_path.clone());
    let pipeline = BenchPipeline::new(storage, config);
    let engine = BenchmarkEngine::new_with_monitoring(pipeline, false);

    let result = engine.run().await.unwrap();
    assert!(result.ends_with("results"));

    // 每個策略兩種格式
    let cache_files = files_under(&temp_dir.path().join("results/cache"));
    assert_eq!(cache_files.len(), 4);
    assert!(cache_files.iter().any(|f| f.starts_with("cacheLRUCache") && f.ends_with(".txt")));
    assert!(cache_files.iter().any(|f| f.starts_with("cacheLFRUCache") && f.ends_with(".csv")));

    // list: Vec, LinkedList; set: HashSet, BTreeSet, IndexSet
    let list_files = files_under(&temp_dir.path().join("results/collection/list"));
    assert_eq!(list_files.len(), 4);
    let set_files = files_under(&temp_dir.path().join("results/collection/set"));
    assert_eq!(set_files.len(), 6);
    assert!(set_files
        .iter()
        .any(|f| f.starts_with("benchmarkBTreeSet") && f.ends_with(".txt")));
    assert!(set_files
        .iter()
        .any(|f| f.starts_with("benchmarkIndexSet") && f.ends_with(".csv")));

    let lru_csv = cache_files
        .iter()
        .find(|f| f.starts_with("cacheLRUCache") && f.ends_with(".csv"))
        .unwrap();
    let csv = std::fs::read_to_string(temp_dir.path().join("results/cache").join(lru_csv)).unwrap();
    // header + 2 runs x 6 scenarios
    assert_eq!(csv.lines().count(), 1 + 12);

    let archives: Vec<String> = files_under(&temp_dir.path().join("results"))
        .into_iter()
        .filter(|f| f.ends_with(".zip"))
        .collect();
    assert_eq!(archives.len(), 1);
}

#[tokio::test]
async fn test_toml_configured_collection_run() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();

    let toml_content = format!(
        r#"
[suite]
name = "integration"
run = ["collection"]
seed = 1

[collection]
families = ["queue"]
warmups = [0]
tests = [3]
sizes = [12]

[report]
output_path = "{}"
formats = ["json"]
"#,
        output_path.replace('\\', "\\\\")
    );

    let config = TomlConfig::from_toml_str(&toml_content).unwrap();
    config.validate().unwrap();

    let storage = LocalStorage::new(output_path.clone());
    let pipeline = BenchPipeline::new(storage, config);
    let engine = BenchmarkEngine::new(pipeline);
    engine.run().await.unwrap();

    let collection_dir = temp_dir.path().join("results/collection/queue");
    let files = files_under(&collection_dir);
    assert_eq!(files.len(), 2);

    let heap_report = files
        .iter()
        .find(|f| f.starts_with("benchmarkBinaryHeap"))
        .unwrap();
    let json: serde_json::Value =
        serde_json::from_slice(&std::fs::read(collection_dir.join(heap_report)).unwrap()).unwrap();
    let entries = json.as_array().unwrap();
    assert_eq!(entries.len(), 5);
    assert!(entries.iter().all(|e| e["size"] == 12 && e["tests"] == 3));
    assert!(!temp_dir.path().join("results/cache").exists());
}

#[tokio::test]
async fn test_missing_data_file_fails_prepare() {
    let temp_dir = TempDir::new().unwrap();
    let output_path = temp_dir.path().to_str().unwrap().to_string();
    let missing = temp_dir.path().join("nope.csv");

    let config = CliConfig::parse_from([
        "cachebench",
        "--suites",
        "cache",
        "--data-file",
        missing.to_str().unwrap(),
        "--output-path",
        &output_path,
    ]);
    // 驗證會先擋下
    assert!(config.validate().is_err());

    let pipeline = BenchPipeline::new(LocalStorage::new(output_path), config);
    let result = BenchmarkEngine::new(pipeline).run().await;

    let err = result.unwrap_err();
    assert_eq!(err.category(), cachebench::utils::error::ErrorCategory::Data);
}
