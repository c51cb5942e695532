use crate::domain::model::{CacheReportEntry, CollectionFamily, CollectionReportEntry, ReportFormat};
use crate::utils::error::Result;
use serde::Serialize;
use std::fmt::Write;

pub fn cache_entries(entries: &[&CacheReportEntry], format: ReportFormat) -> Result<Vec<u8>> {
    match format {
        ReportFormat::Text => Ok(cache_text(entries).into_bytes()),
        ReportFormat::Json => Ok(serde_json::to_vec_pretty(entries)?),
        ReportFormat::Csv => to_csv(entries.iter().map(|e| CacheRow::from(*e))),
    }
}

pub fn collection_entries(
    entries: &[&CollectionReportEntry],
    format: ReportFormat,
) -> Result<Vec<u8>> {
    match format {
        ReportFormat::Text => Ok(collection_text(entries).into_bytes()),
        ReportFormat::Json => Ok(serde_json::to_vec_pretty(entries)?),
        ReportFormat::Csv => to_csv(entries.iter().map(|e| CollectionRow::from(*e))),
    }
}

// 文字格式：每筆一個 { ... } 區塊
fn cache_text(entries: &[&CacheReportEntry]) -> String {
    let mut out = String::new();
    for e in entries {
        let _ = writeln!(
            out,
            "{{\nmethod='{}'\nwarmup={}\ntests={}\nmissed={}\nhit={}\nhitPercentage={:.1}\nevicted={}\navgReadTime={:?}\n}}",
            e.method, e.warmup, e.tests, e.missed, e.hit, e.hit_percentage, e.evicted, e.avg_read_time
        );
    }
    out
}

fn collection_text(entries: &[&CollectionReportEntry]) -> String {
    let mut out = String::new();
    for e in entries {
        let _ = writeln!(
            out,
            "{{\nwarmupIterations = {}\ntestIterations = {}\ncollectionSize = {}\navgTime = {:?}\ntestedMethod = '{}'\n}}",
            e.warmup, e.tests, e.size, e.avg_time, e.method
        );
    }
    out
}

#[derive(Serialize)]
struct CacheRow<'a> {
    method: &'a str,
    policy: &'a str,
    warmup: usize,
    tests: usize,
    missed: usize,
    hit: usize,
    hit_percentage: f64,
    evicted: usize,
    avg_read_time_ns: u64,
}

impl<'a> From<&'a CacheReportEntry> for CacheRow<'a> {
    fn from(e: &'a CacheReportEntry) -> Self {
        Self {
            method: &e.method,
            policy: e.policy.type_name(),
            warmup: e.warmup,
            tests: e.tests,
            missed: e.missed,
            hit: e.hit,
            hit_percentage: e.hit_percentage,
            evicted: e.evicted,
            avg_read_time_ns: nanos(e.avg_read_time),
        }
    }
}

#[derive(Serialize)]
struct CollectionRow<'a> {
    method: &'a str,
    family: CollectionFamily,
    collection: &'a str,
    warmup: usize,
    tests: usize,
    size: usize,
    avg_time_ns: u64,
}

impl<'a> From<&'a CollectionReportEntry> for CollectionRow<'a> {
    fn from(e: &'a CollectionReportEntry) -> Self {
        Self {
            method: &e.method,
            family: e.family,
            collection: e.collection.type_name(),
            warmup: e.warmup,
            tests: e.tests,
            size: e.size,
            avg_time_ns: nanos(e.avg_time),
        }
    }
}

fn nanos(d: std::time::Duration) -> u64 {
    d.as_nanos().min(u64::MAX as u128) as u64
}

fn to_csv<R: Serialize>(rows: impl Iterator<Item = R>) -> Result<Vec<u8>> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    writer
        .into_inner()
        .map_err(|e| crate::utils::error::BenchError::ReportError {
            message: format!("Failed to flush CSV report: {}", e),
        })
}
