use super::DataError;
use rand::distributions::Alphanumeric;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

const BOM: char = '\u{feff}';
const VALUE_LENGTH: usize = 16;

/// Slow key/value store backed by a header-less `key;value` CSV file.
///
/// `load` re-reads the file on every call. That is what the cache suite
/// measures against: a miss must cost a real lookup.
#[derive(Debug, Clone)]
pub struct CsvRepo {
    path: PathBuf,
}

impl CsvRepo {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, DataError> {
        let path = path.as_ref().to_path_buf();
        // 提早發現檔案不存在
        std::fs::metadata(&path)?;
        Ok(Self { path })
    }

    /// Writes `size` rows with keys `0..size` and random alphanumeric values.
    pub fn generate<P: AsRef<Path>>(path: P, size: u32, seed: u64) -> Result<Self, DataError> {
        if size == 0 {
            return Err(DataError::EmptyDataSet);
        }

        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut rng = StdRng::seed_from_u64(seed);
        let mut writer = csv::WriterBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .from_path(path)?;

        for key in 0..size {
            let value: String = (&mut rng)
                .sample_iter(&Alphanumeric)
                .take(VALUE_LENGTH)
                .map(char::from)
                .collect();
            writer.write_record([key.to_string(), value])?;
        }
        writer.flush()?;

        tracing::debug!("Generated {} rows into {}", size, path.display());
        Self::open(path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self, key: u32) -> Result<String, DataError> {
        let mut reader = self.reader()?;
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            let line = index as u64 + 1;
            if parse_key(&record, line)? == key {
                return record
                    .get(1)
                    .map(str::to_string)
                    .ok_or(DataError::MalformedRow { line });
            }
        }
        Err(DataError::KeyNotFound(key))
    }

    pub fn load_all(&self) -> Result<HashMap<u32, String>, DataError> {
        let mut reader = self.reader()?;
        let mut rows = HashMap::new();
        for (index, record) in reader.records().enumerate() {
            let record = record?;
            let line = index as u64 + 1;
            let key = parse_key(&record, line)?;
            let value = record.get(1).ok_or(DataError::MalformedRow { line })?;
            rows.insert(key, value.to_string());
        }
        Ok(rows)
    }

    fn reader(&self) -> Result<csv::Reader<std::fs::File>, DataError> {
        Ok(csv::ReaderBuilder::new()
            .delimiter(b';')
            .has_headers(false)
            .flexible(true)
            .from_path(&self.path)?)
    }
}

fn parse_key(record: &csv::StringRecord, line: u64) -> Result<u32, DataError> {
    let raw = record.get(0).unwrap_or_default();
    let cleaned = raw.trim_start_matches(BOM).trim();
    cleaned.parse().map_err(|_| DataError::InvalidKey {
        line,
        value: raw.to_string(),
    })
}
