pub mod benchmark;
pub mod cache;
pub mod config;
pub mod core;
pub mod data;
pub mod domain;
pub mod report;
pub mod suite;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::{cli::LocalStorage, CliConfig};

pub use cache::{build_cache, Cache, CachePolicy, CacheStats};
pub use core::{engine::BenchmarkEngine, pipeline::BenchPipeline};
pub use utils::error::{BenchError, Result};
