use crate::cache::CachePolicy;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SuiteKind {
    Cache,
    Collection,
}

impl FromStr for SuiteKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cache" => Ok(SuiteKind::Cache),
            "collection" | "collections" => Ok(SuiteKind::Collection),
            other => Err(format!("unknown suite '{}' (expected cache or collection)", other)),
        }
    }
}

impl fmt::Display for SuiteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SuiteKind::Cache => f.write_str("cache"),
            SuiteKind::Collection => f.write_str("collection"),
        }
    }
}

/// Collection interface under test; each family runs against several
/// implementations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionFamily {
    List,
    Set,
    Queue,
    Deque,
}

impl CollectionFamily {
    pub const ALL: [CollectionFamily; 4] = [
        CollectionFamily::List,
        CollectionFamily::Set,
        CollectionFamily::Queue,
        CollectionFamily::Deque,
    ];

    pub fn kinds(&self) -> &'static [CollectionKind] {
        match self {
            CollectionFamily::List => &[CollectionKind::Vec, CollectionKind::LinkedList],
            CollectionFamily::Set => &[
                CollectionKind::HashSet,
                CollectionKind::BTreeSet,
                CollectionKind::IndexSet,
            ],
            CollectionFamily::Queue => &[CollectionKind::VecDeque, CollectionKind::BinaryHeap],
            CollectionFamily::Deque => &[CollectionKind::VecDeque, CollectionKind::LinkedList],
        }
    }
}

impl FromStr for CollectionFamily {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "list" => Ok(CollectionFamily::List),
            "set" => Ok(CollectionFamily::Set),
            "queue" => Ok(CollectionFamily::Queue),
            "deque" => Ok(CollectionFamily::Deque),
            other => Err(format!(
                "unknown collection family '{}' (expected list, set, queue or deque)",
                other
            )),
        }
    }
}

impl fmt::Display for CollectionFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CollectionFamily::List => "list",
            CollectionFamily::Set => "set",
            CollectionFamily::Queue => "queue",
            CollectionFamily::Deque => "deque",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CollectionKind {
    Vec,
    LinkedList,
    VecDeque,
    HashSet,
    BTreeSet,
    /// Insertion-ordered hash set.
    IndexSet,
    BinaryHeap,
}

impl CollectionKind {
    pub fn type_name(&self) -> &'static str {
        match self {
            CollectionKind::Vec => "Vec",
            CollectionKind::LinkedList => "LinkedList",
            CollectionKind::VecDeque => "VecDeque",
            CollectionKind::HashSet => "HashSet",
            CollectionKind::BTreeSet => "BTreeSet",
            CollectionKind::IndexSet => "IndexSet",
            CollectionKind::BinaryHeap => "BinaryHeap",
        }
    }
}

impl fmt::Display for CollectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRun {
    pub warm_up: usize,
    pub tests: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionRun {
    pub warm_up: usize,
    pub tests: usize,
    pub size: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Text,
    Json,
    Csv,
}

impl ReportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ReportFormat::Text => "txt",
            ReportFormat::Json => "json",
            ReportFormat::Csv => "csv",
        }
    }
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(ReportFormat::Text),
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            other => Err(format!(
                "unsupported report format '{}' (expected text, json or csv)",
                other
            )),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Text => f.write_str("text"),
            ReportFormat::Json => f.write_str("json"),
            ReportFormat::Csv => f.write_str("csv"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CacheReportEntry {
    pub method: String,
    pub policy: CachePolicy,
    pub warmup: usize,
    pub tests: usize,
    pub missed: usize,
    pub hit: usize,
    pub hit_percentage: f64,
    pub evicted: usize,
    #[serde(with = "duration_nanos")]
    pub avg_read_time: Duration,
}

impl CacheReportEntry {
    /// `hit` and `hit_percentage` are derived from `tests` and `missed`.
    pub fn new(
        method: impl Into<String>,
        policy: CachePolicy,
        warmup: usize,
        tests: usize,
        missed: usize,
        evicted: usize,
        avg_read_time: Duration,
    ) -> Self {
        let hit = tests.saturating_sub(missed);
        let hit_percentage = if tests == 0 {
            0.0
        } else {
            hit as f64 / tests as f64 * 100.0
        };
        Self {
            method: method.into(),
            policy,
            warmup,
            tests,
            missed,
            hit,
            hit_percentage,
            evicted,
            avg_read_time,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectionReportEntry {
    pub method: String,
    pub family: CollectionFamily,
    pub collection: CollectionKind,
    pub warmup: usize,
    pub tests: usize,
    pub size: usize,
    #[serde(with = "duration_nanos")]
    pub avg_time: Duration,
}

/// Everything one run produced; `started_at` stamps every report file name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteResults {
    pub started_at: DateTime<Local>,
    pub cache_entries: Vec<CacheReportEntry>,
    pub collection_entries: Vec<CollectionReportEntry>,
}

impl SuiteResults {
    pub fn new(started_at: DateTime<Local>) -> Self {
        Self {
            started_at,
            cache_entries: Vec::new(),
            collection_entries: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.cache_entries.len() + self.collection_entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A rendered report ready for storage.
#[derive(Debug, Clone)]
pub struct ReportFile {
    pub path: String,
    pub contents: Vec<u8>,
    pub append: bool,
}

pub(crate) mod duration_nanos {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_nanos().min(u64::MAX as u128) as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_nanos)
    }
}
