//! Reference table mapping title identifiers to display names.
//!
//! The table is a pipe-delimited text file with one `id|name|publisher` row
//! per title and no header. Rows with any other number of fields are
//! skipped. Lookups never fail; an unknown identifier is simply absent.

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use crate::error::CatalogError;

/// Name and publisher for one title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleInfo {
    pub name: String,
    pub publisher: String,
}

/// Identifier → title lookup, loaded once per build.
#[derive(Debug, Clone, Default)]
pub struct TitlesDb {
    entries: HashMap<String, TitleInfo>,
}

impl TitlesDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a table from disk. A missing file yields an empty table.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if !path.is_file() {
            log::warn!(
                "Reference table {} not found; display names will come from filenames",
                path.display()
            );
            return Ok(Self::new());
        }
        let file = std::fs::File::open(path)?;
        let db = Self::from_reader(file)?;
        log::debug!("Loaded {} titles from {}", db.len(), path.display());
        Ok(db)
    }

    /// Parse a table from any reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self, CatalogError> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(b'|')
            .has_headers(false)
            .flexible(true)
            .quoting(false)
            .from_reader(reader);

        let mut entries = HashMap::new();
        for result in reader.records() {
            let record = match result {
                Ok(r) => r,
                Err(e) => {
                    log::warn!("Skipping malformed reference table row: {e}");
                    continue;
                }
            };
            if record.len() != 3 {
                continue;
            }
            // Whole-line whitespace only; inner fields are kept verbatim
            let id = record[0].trim_start().to_string();
            entries.insert(
                id,
                TitleInfo {
                    name: record[1].to_string(),
                    publisher: record[2].trim_end().to_string(),
                },
            );
        }

        Ok(Self { entries })
    }

    pub fn get(&self, id: &str) -> Option<&TitleInfo> {
        self.entries.get(id)
    }

    pub fn insert(
        &mut self,
        id: impl Into<String>,
        name: impl Into<String>,
        publisher: impl Into<String>,
    ) {
        self.entries.insert(
            id.into(),
            TitleInfo {
                name: name.into(),
                publisher: publisher.into(),
            },
        );
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
