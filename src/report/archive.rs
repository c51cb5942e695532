use crate::domain::model::ReportFile;
use crate::utils::error::Result;
use std::io::Write;
use zip::write::{FileOptions, ZipWriter};

pub fn archive_path(timestamp: &str) -> String {
    format!("results/reports{}.zip", timestamp)
}

/// Zips the reports of one run under their relative paths.
pub fn archive(reports: &[ReportFile]) -> Result<Vec<u8>> {
    let mut zip = ZipWriter::new(std::io::Cursor::new(Vec::new()));

    for report in reports {
        zip.start_file::<_, ()>(report.path.as_str(), FileOptions::default())?;
        zip.write_all(&report.contents)?;
    }

    // 完成並取回底層 Vec<u8>
    let cursor = zip.finish()?;
    let data = cursor.into_inner();
    tracing::debug!("Archived {} reports ({} bytes)", reports.len(), data.len());
    Ok(data)
}
