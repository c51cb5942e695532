use anyhow::Context;
use cachebench::config::toml_config::TomlConfig;
use cachebench::core::ConfigProvider;
use cachebench::domain::model::SuiteKind;
use cachebench::suite::collection::operations;
use cachebench::suite::SuitePlan;
use cachebench::utils::error::ErrorSeverity;
use cachebench::utils::{logger, validation::Validate};
use cachebench::{BenchPipeline, BenchmarkEngine, LocalStorage};
use clap::Parser;

#[derive(Parser)]
#[command(name = "toml-bench")]
#[command(about = "Run cachebench suites from a TOML configuration file")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "bench-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override monitoring setting from config
    #[arg(long)]
    monitor: Option<bool>,

    /// Override the output path from config
    #[arg(long)]
    output_path: Option<String>,

    /// Dry run - show the scenario grid without measuring anything
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = TomlConfig::from_file(&args.config)
        .with_context(|| format!("Failed to load config file '{}'", args.config))?;

    logger::init_logger(args.verbose || config.verbose(), config.log_json());
    tracing::info!("🚀 Starting TOML-based benchmark run");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 應用命令列覆蓋設定
    if let Some(output_path) = &args.output_path {
        config.report.output_path = output_path.clone();
        tracing::info!("🔧 Output path overridden to: {}", output_path);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    tracing::info!("✅ Configuration loaded and validated successfully");
    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be measured");
        perform_dry_run(&config);
        return Ok(());
    }

    let monitor_enabled = args.monitor.unwrap_or_else(|| config.monitoring_enabled());
    if monitor_enabled {
        tracing::info!("🔍 System monitoring enabled");
    }

    let storage = LocalStorage::new(config.output_path().to_string());
    let pipeline = BenchPipeline::new(storage, config);
    let engine = BenchmarkEngine::new_with_monitoring(pipeline, monitor_enabled);

    match engine.run().await {
        Ok(output_path) => {
            tracing::info!("✅ Benchmark run completed successfully!");
            println!("✅ Benchmark run completed successfully!");
            println!("📁 Reports saved to: {}", output_path);
        }
        Err(e) => {
            tracing::error!(
                "❌ Benchmark run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 建議: {}", e.recovery_suggestion());

            let exit_code = match e.severity() {
                ErrorSeverity::Low => 0,
                ErrorSeverity::Medium => 2,
                ErrorSeverity::High => 1,
                ErrorSeverity::Critical => 3,
            };

            if exit_code > 0 {
                std::process::exit(exit_code);
            }
        }
    }

    Ok(())
}

fn join<T: std::fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Suite: {}", config.name());
    if let Some(description) = &config.suite.description {
        println!("  Description: {}", description);
    }
    println!("  Runs: {}", join(&config.suites()));
    println!("  Seed: {}", config.seed());
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", join(&config.report_formats()));

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) {
    let plan = SuitePlan::from_config(config);

    println!("🔍 Dry Run Analysis:");
    println!();

    if plan.runs_suite(SuiteKind::Cache) {
        println!("🗄️ Cache Suite:");
        println!(
            "  Data: {} ({} keys, {})",
            config.data_file(),
            plan.data_size,
            if config.generate_data() {
                "regenerated"
            } else {
                "existing file"
            }
        );
        println!("  Capacity: {}", plan.cache_capacity);
        println!(
            "  Policies: {}",
            plan.cache_policies
                .iter()
                .map(|p| p.type_name())
                .collect::<Vec<_>>()
                .join(", ")
        );
        for run in &plan.cache_runs {
            println!("  warm-up {:>6} / tests {:>6}", run.warm_up, run.tests);
        }
        println!("  📊 Scenarios: {}", plan.cache_scenario_count());
        println!();
    }

    if plan.runs_suite(SuiteKind::Collection) {
        println!("📚 Collection Suite:");
        for family in &plan.collection_families {
            println!(
                "  {} [{}]: {}",
                family,
                join(family.kinds()),
                operations(*family).join(", ")
            );
        }
        for run in &plan.collection_runs {
            println!(
                "  warm-up {:>6} / tests {:>6} / n {:>6}",
                run.warm_up, run.tests, run.size
            );
        }
        println!("  📊 Scenarios: {}", plan.collection_scenario_count());
        println!();
    }

    println!("💾 Output Configuration:");
    println!("  Path: {}", config.output_path());
    if config.archive_reports() {
        println!("  Archive: results/reports<timestamp>.zip");
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");
}
