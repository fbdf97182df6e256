//! Catalog records and the append-only catalog writer.
//!
//! A catalog is UTF-8 text with one record per line:
//!
//! ```text
//! displayName|identifier|publisher|folderTag|filename
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use disc_list_core::TitleId;
use disc_list_core::identifier::{DOT_INDEX, SEPARATOR_INDEX};

use crate::titles::TitlesDb;

/// Field separator in catalog lines.
pub const FIELD_SEPARATOR: char = '|';

/// One catalog line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub display_name: String,
    pub id: TitleId,
    pub publisher: String,
    /// Top-level image folder (`DVD`, `CD`, `POPS`).
    pub folder_tag: String,
    pub filename: String,
}

impl CatalogEntry {
    /// Build an entry, taking the name and publisher from the reference
    /// table when it has a non-empty name for `id`.
    ///
    /// `stem` is the image filename without its extension; it supplies the
    /// display name when the table does not.
    pub fn describe(
        id: TitleId,
        titles: &TitlesDb,
        stem: &str,
        folder_tag: impl Into<String>,
        filename: impl Into<String>,
    ) -> Self {
        let (display_name, publisher) = match titles.get(id.as_str()) {
            Some(info) if !info.name.is_empty() => (info.name.clone(), info.publisher.clone()),
            Some(_) => {
                log::debug!("{} has no title in the reference table", id);
                (display_name_from_stem(stem).to_string(), String::new())
            }
            None => (display_name_from_stem(stem).to_string(), String::new()),
        };

        Self {
            display_name,
            id,
            publisher,
            folder_tag: folder_tag.into(),
            filename: filename.into(),
        }
    }

    /// Render the record without a trailing newline.
    ///
    /// Separators and line breaks inside fields become spaces so every line
    /// has exactly five fields.
    pub fn to_line(&self) -> String {
        [
            self.display_name.as_str(),
            self.id.as_str(),
            self.publisher.as_str(),
            self.folder_tag.as_str(),
            self.filename.as_str(),
        ]
        .iter()
        .map(|field| sanitize_field(field))
        .collect::<Vec<_>>()
        .join("|")
    }
}

/// Replace characters that would break the line format.
pub fn sanitize_field(field: &str) -> String {
    field
        .chars()
        .map(|c| match c {
            FIELD_SEPARATOR | '\n' | '\r' => ' ',
            c => c,
        })
        .collect()
}

/// Display name for an image with no reference table title.
///
/// Stems that start with an identifier and a dot (`SLUS_203.12.Gran
/// Turismo 4`) yield the part after it; any other stem is used as is.
pub fn display_name_from_stem(stem: &str) -> &str {
    const NAME_START: usize = 12;
    let chars: Vec<(usize, char)> = stem.char_indices().take(NAME_START + 1).collect();
    let id_prefixed = chars.len() >= NAME_START
        && chars[SEPARATOR_INDEX].1 == '_'
        && chars[DOT_INDEX].1 == '.'
        && chars[NAME_START - 1].1 == '.';
    if !id_prefixed {
        return stem;
    }
    match chars.get(NAME_START) {
        Some(&(offset, _)) => &stem[offset..],
        None => "",
    }
}

/// Appends records to a catalog file one line at a time.
///
/// Every record is flushed as soon as it is written, so an interrupted
/// build leaves a truncated catalog whose lines are all complete.
pub struct CatalogWriter {
    path: PathBuf,
    out: BufWriter<File>,
    written: usize,
}

impl CatalogWriter {
    /// Open `path` for appending, creating it if needed.
    pub fn append(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            path: path.to_path_buf(),
            out: BufWriter::new(file),
            written: 0,
        })
    }

    pub fn write(&mut self, entry: &CatalogEntry) -> io::Result<()> {
        writeln!(self.out, "{}", entry.to_line())?;
        self.out.flush()?;
        self.written += 1;
        Ok(())
    }

    /// Number of records written by this writer.
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Delete an existing catalog. A missing file is not an error.
pub fn remove_catalog(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Ok(()) => {
            log::debug!("Removed existing catalog {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e),
    }
}

#[cfg(test)]
#[path = "tests/catalog_tests.rs"]
mod tests;
