//! Reference table loader: reads the industry cycle CSV, normalizes it, and
//! caches the parsed table per source path keyed by a content fingerprint.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use csv::ReaderBuilder;
use thiserror::Error;
use tracing::{debug, info};

use crate::industry::models::{IndustryRecord, IndustryTable, NO_COMMENT_PLACEHOLDER};

#[derive(Debug, Error)]
pub enum DataError {
    #[error("Data source '{path}' is unavailable: {reason}")]
    DataSource { path: String, reason: String },

    #[error("Data source is missing required column: {missing}")]
    Schema { missing: String },
}

/// Required fields as (canonical header, english alias).
const SEQUENCE_ID: (&str, &str) = ("序号", "sequence_id");
const NAME: (&str, &str) = ("行业名称", "name");
const LIFECYCLE_STAGE: (&str, &str) = ("当前周期阶段", "lifecycle_stage");
const SENTIMENT_LABEL: (&str, &str) = ("未来1-3年景气度", "sentiment_label");
const COMMENTARY: (&str, &str) = ("评价", "commentary");

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

fn read_source(path: &Path) -> Result<Vec<u8>, DataError> {
    std::fs::read(path).map_err(|e| DataError::DataSource {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Parses CSV bytes into a normalized table. `origin` is only used in error messages.
pub fn parse_table(bytes: &[u8], origin: &str) -> Result<IndustryTable, DataError> {
    let bytes = bytes.strip_prefix(UTF8_BOM).unwrap_or(bytes);
    let source_error = |e: csv::Error| DataError::DataSource {
        path: origin.to_string(),
        reason: e.to_string(),
    };

    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    // Keep only named columns; blank or `Unnamed*` headers come from trailing separators.
    let kept: Vec<(usize, String)> = reader
        .headers()
        .map_err(source_error)?
        .iter()
        .enumerate()
        .map(|(idx, h)| (idx, h.trim().to_string()))
        .filter(|(_, h)| !h.is_empty() && !h.starts_with("Unnamed"))
        .collect();

    let column = |field: (&str, &str)| -> Result<usize, DataError> {
        kept.iter()
            .position(|(_, h)| h == field.0 || h.eq_ignore_ascii_case(field.1))
            .ok_or_else(|| DataError::Schema {
                missing: format!("{} ({})", field.0, field.1),
            })
    };
    let sequence_col = column(SEQUENCE_ID)?;
    let name_col = column(NAME)?;
    let stage_col = column(LIFECYCLE_STAGE)?;
    let sentiment_col = column(SENTIMENT_LABEL)?;
    let commentary_col = column(COMMENTARY)?;

    let mut records = Vec::new();
    for result in reader.records() {
        let row = result.map_err(source_error)?;
        let cells: Vec<&str> = kept
            .iter()
            .map(|(idx, _)| row.get(*idx).unwrap_or("").trim())
            .collect();

        if cells.iter().all(|c| c.is_empty()) {
            continue;
        }

        let cell = |col: usize| -> String {
            match cells[col] {
                "" => NO_COMMENT_PLACEHOLDER.to_string(),
                value => value.to_string(),
            }
        };

        records.push(IndustryRecord {
            sequence_id: cell(sequence_col),
            name: cell(name_col),
            lifecycle_stage: cell(stage_col),
            sentiment_label: cell(sentiment_col),
            commentary: cell(commentary_col),
        });
    }

    Ok(IndustryTable::new(records))
}

struct CachedTable {
    fingerprint: blake3::Hash,
    table: Arc<IndustryTable>,
}

/// Process-wide table cache. One entry per source path; an entry is replaced
/// whenever the file's content fingerprint changes.
#[derive(Default)]
pub struct TableCache {
    entries: RwLock<HashMap<PathBuf, CachedTable>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(&self, path: &Path) -> Result<Arc<IndustryTable>, DataError> {
        let bytes = read_source(path)?;
        let fingerprint = blake3::hash(&bytes);
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());

        {
            let entries = self.entries.read().unwrap_or_else(|e| e.into_inner());
            if let Some(cached) = entries.get(&key) {
                if cached.fingerprint == fingerprint {
                    debug!("Industry table cache hit for {}", key.display());
                    return Ok(Arc::clone(&cached.table));
                }
                info!("Industry table at {} changed, reloading", key.display());
            }
        }

        let table = Arc::new(parse_table(&bytes, &path.display().to_string())?);
        info!(
            "Loaded {} industry records from {}",
            table.len(),
            key.display()
        );

        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        entries.insert(
            key,
            CachedTable {
                fingerprint,
                table: Arc::clone(&table),
            },
        );
        Ok(table)
    }

    /// Drops the cached entry for `path`, forcing the next `load` to reparse.
    pub fn invalidate(&self, path: &Path) {
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let mut entries = self.entries.write().unwrap_or_else(|e| e.into_inner());
        if entries.remove(&key).is_some() {
            info!("Invalidated industry table cache for {}", key.display());
        }
    }
}
