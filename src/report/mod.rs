//! Turns suite results into report files.
//!
//! One file per cache policy and per collection implementation within each
//! family, in every configured format, all stamped with the suite start time.

pub mod archive;
pub mod render;

use crate::cache::CachePolicy;
use crate::domain::model::{
    CacheReportEntry, CollectionFamily, CollectionKind, CollectionReportEntry, ReportFile, ReportFormat, SuiteResults,
};
use crate::utils::error::Result;
use chrono::{DateTime, Local};

pub const CACHE_REPORT_DIR: &str = "results/cache";
pub const COLLECTION_REPORT_DIR: &str = "results/collection";

pub fn timestamp(started_at: &DateTime<Local>) -> String {
    started_at.format("%Y%m%dT%H%M%S").to_string()
}

pub fn cache_report_path(policy: CachePolicy, timestamp: &str, format: ReportFormat) -> String {
    format!(
        "{}/cache{}{}.{}",
        CACHE_REPORT_DIR,
        policy.type_name(),
        timestamp,
        format.extension()
    )
}

/// `VecDeque` runs as both queue and deque, so the family gets its own directory.
pub fn collection_report_path(
    family: CollectionFamily,
    kind: CollectionKind,
    timestamp: &str,
    format: ReportFormat,
) -> String {
    format!(
        "{}/{}/benchmark{}{}.{}",
        COLLECTION_REPORT_DIR,
        family,
        kind.type_name(),
        timestamp,
        format.extension()
    )
}

/// Groups `items` by `key`, keeping first-seen order of both groups and items.
fn group_by<T, K: PartialEq + Copy>(items: &[T], key: impl Fn(&T) -> K) -> Vec<(K, Vec<&T>)> {
    let mut groups: Vec<(K, Vec<&T>)> = Vec::new();
    for item in items {
        let k = key(item);
        match groups.iter_mut().find(|(g, _)| *g == k) {
            Some((_, members)) => members.push(item),
            None => groups.push((k, vec![item])),
        }
    }
    groups
}

/// Renders every report of a run. Text reports are marked for appending.
pub fn build_reports(results: &SuiteResults, formats: &[ReportFormat]) -> Result<Vec<ReportFile>> {
    let ts = timestamp(&results.started_at);
    let mut files = Vec::new();

    for (policy, entries) in group_by(&results.cache_entries, |e: &CacheReportEntry| e.policy) {
        for &format in formats {
            files.push(ReportFile {
                path: cache_report_path(policy, &ts, format),
                contents: render::cache_entries(&entries, format)?,
                append: format == ReportFormat::Text,
            });
        }
    }

    for ((family, kind), entries) in
        group_by(&results.collection_entries, |e: &CollectionReportEntry| {
            (e.family, e.collection)
        })
    {
        for &format in formats {
            files.push(ReportFile {
                path: collection_report_path(family, kind, &ts, format),
                contents: render::collection_entries(&entries, format)?,
                append: format == ReportFormat::Text,
            });
        }
    }

    tracing::debug!("Rendered {} report files for run {}", files.len(), ts);
    Ok(files)
}
