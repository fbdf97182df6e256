//! Catalog builder: scans a platform's image folders and writes one catalog
//! record per image.
//!
//! The build is sequential. Counters and status travel in a [`BuildContext`]
//! that is threaded through [`process_image`] and returned as a
//! [`BuildSummary`], so the builder keeps no state between runs.

use std::fs;
use std::path::{Path, PathBuf};

use disc_list_core::platform::is_compressed;
use disc_list_core::resolver::filename_stem;
use disc_list_core::{EngineConfig, IdSource, ImageFolder, Platform, Resolution, Resolver, TitleId};

use crate::catalog::{CatalogEntry, CatalogWriter, remove_catalog};
use crate::convert::{ImageConverter, TempImage};
use crate::error::CatalogError;
use crate::sorter::{SortRules, sort_catalog};
use crate::titles::TitlesDb;

/// Options controlling a catalog build.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    pub platform: Platform,
    pub engine: EngineConfig,
    /// Rename converted images to `{id}.{original name}` so later builds
    /// resolve them from the filename.
    pub rename_converted: bool,
    /// Sort rules applied after the build; `None` leaves build order.
    pub sort: Option<SortRules>,
}

impl BuildOptions {
    pub fn new(platform: Platform) -> Self {
        Self {
            platform,
            engine: EngineConfig::default(),
            rename_converted: true,
            sort: Some(SortRules::builtin()),
        }
    }

    pub fn engine(mut self, engine: EngineConfig) -> Self {
        self.engine = engine;
        self
    }

    pub fn rename_converted(mut self, rename: bool) -> Self {
        self.rename_converted = rename;
        self
    }

    pub fn sort(mut self, rules: Option<SortRules>) -> Self {
        self.sort = rules;
        self
    }
}

/// Progress information for callbacks.
#[derive(Debug, Clone)]
pub enum BuildProgress {
    /// All folders counted.
    Counted { total: usize },
    /// Starting on an image.
    Processing {
        folder: String,
        file_name: String,
        file_index: usize,
        total: usize,
    },
    /// Expanding a compressed image before scanning it.
    Converting { file_name: String },
    /// An identifier was assigned.
    Resolved {
        file_name: String,
        id: TitleId,
        source: IdSource,
    },
    /// Sorting the finished catalog.
    Sorting,
    Done,
}

/// How a build ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildStatus {
    /// Nothing was processed yet.
    Pending,
    /// The folders held no images; no catalog was written.
    NoImages,
    Done,
}

/// Per-build counters, threaded through each image's processing.
#[derive(Debug, Clone)]
pub struct BuildContext {
    pub total: usize,
    pub processed: usize,
    by_source: [usize; IdSource::ALL.len()],
    pub converted: usize,
    pub renamed: usize,
    pub status: BuildStatus,
}

impl BuildContext {
    pub fn new(total: usize) -> Self {
        Self {
            total,
            processed: 0,
            by_source: [0; IdSource::ALL.len()],
            converted: 0,
            renamed: 0,
            status: BuildStatus::Pending,
        }
    }

    fn record(&mut self, source: IdSource) {
        self.processed += 1;
        if let Some(i) = IdSource::ALL.iter().position(|s| *s == source) {
            self.by_source[i] += 1;
        }
    }

    /// Percentage complete before the next image, as the build log shows it.
    pub fn percent_complete(&self) -> usize {
        if self.total == 0 {
            return 100;
        }
        self.processed * 100 / self.total
    }

    pub fn into_summary(self, list_path: &Path, sorted: bool) -> BuildSummary {
        BuildSummary {
            list_path: list_path.to_path_buf(),
            total: self.total,
            written: self.processed,
            by_source: IdSource::ALL.into_iter().zip(self.by_source).collect(),
            converted: self.converted,
            renamed: self.renamed,
            sorted,
            status: self.status,
        }
    }
}

/// Summary of a finished build.
#[derive(Debug, Clone)]
pub struct BuildSummary {
    pub list_path: PathBuf,
    /// Images found across all folders.
    pub total: usize,
    /// Records written to the catalog.
    pub written: usize,
    /// Records per resolution stage, in priority order.
    pub by_source: Vec<(IdSource, usize)>,
    pub converted: usize,
    pub renamed: usize,
    pub sorted: bool,
    pub status: BuildStatus,
}

impl BuildSummary {
    pub fn count(&self, source: IdSource) -> usize {
        self.by_source
            .iter()
            .find(|(s, _)| *s == source)
            .map(|(_, n)| *n)
            .unwrap_or(0)
    }
}

/// Image files in one folder, sorted by name. Hidden files are skipped.
pub fn collect_images(dir: &Path, folder: &ImageFolder) -> Result<Vec<PathBuf>, CatalogError> {
    let mut images = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let Some(name) = name.to_str() else {
            log::warn!("Skipping non-UTF-8 filename {:?}", name);
            continue;
        };
        if name.starts_with('.') || !folder.matches(name) {
            continue;
        }
        if entry.file_type()?.is_file() {
            images.push(entry.path());
        }
    }
    images.sort();
    Ok(images)
}

/// Build the catalog at `list_path` from the platform folders under
/// `game_root`.
///
/// Any existing catalog is deleted first. Every platform folder must exist.
/// A conversion or read failure aborts the build; records already written
/// stay in the catalog.
pub fn build_catalog(
    game_root: &Path,
    list_path: &Path,
    titles: &TitlesDb,
    options: &BuildOptions,
    converter: &dyn ImageConverter,
    progress: &dyn Fn(BuildProgress),
) -> Result<BuildSummary, CatalogError> {
    remove_catalog(list_path)?;

    let mut folders = Vec::new();
    for folder in options.platform.folders() {
        let dir = game_root.join(folder.name);
        if !dir.is_dir() {
            return Err(CatalogError::MissingFolder {
                folder: folder.name.to_string(),
                root: game_root.to_path_buf(),
            });
        }
        let images = collect_images(&dir, folder)?;
        log::debug!("{}: {} images", dir.display(), images.len());
        folders.push((folder, images));
    }

    let total = folders.iter().map(|(_, images)| images.len()).sum();
    progress(BuildProgress::Counted { total });

    let mut ctx = BuildContext::new(total);
    if total == 0 {
        ctx.status = BuildStatus::NoImages;
        progress(BuildProgress::Done);
        return Ok(ctx.into_summary(list_path, false));
    }

    let resolver = Resolver::new(options.engine.clone());
    let mut writer = CatalogWriter::append(list_path)?;

    for (folder, images) in &folders {
        for path in images {
            let entry = process_image(
                &mut ctx, &resolver, titles, folder, path, options, converter, progress,
            )?;
            writer.write(&entry)?;
        }
    }
    log::debug!("Appended {} entries to {}", writer.written(), writer.path().display());
    drop(writer);

    let sorted = match &options.sort {
        Some(rules) => {
            progress(BuildProgress::Sorting);
            sort_catalog(list_path, rules)?;
            true
        }
        None => false,
    };

    ctx.status = BuildStatus::Done;
    progress(BuildProgress::Done);
    Ok(ctx.into_summary(list_path, sorted))
}

/// Resolve one image and describe it as a catalog entry.
#[allow(clippy::too_many_arguments)]
pub fn process_image(
    ctx: &mut BuildContext,
    resolver: &Resolver,
    titles: &TitlesDb,
    folder: &ImageFolder,
    path: &Path,
    options: &BuildOptions,
    converter: &dyn ImageConverter,
    progress: &dyn Fn(BuildProgress),
) -> Result<CatalogEntry, CatalogError> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    log::info!("{}% complete", ctx.percent_complete());
    progress(BuildProgress::Processing {
        folder: folder.name.to_string(),
        file_name: file_name.clone(),
        file_index: ctx.processed,
        total: ctx.total,
    });

    let mut catalog_name = file_name.clone();
    let resolution = match resolver.probe(&file_name) {
        Some(resolution) => resolution,
        None if is_compressed(&file_name) => {
            progress(BuildProgress::Converting {
                file_name: file_name.clone(),
            });
            let resolution = resolve_compressed(resolver, path, &file_name, converter)?;
            ctx.converted += 1;

            if options.rename_converted {
                let renamed = format!("{}.{}", resolution.id, file_name);
                let target = path.with_file_name(&renamed);
                if target.exists() {
                    log::warn!("{}: {} already exists, not renaming", file_name, renamed);
                } else {
                    fs::rename(path, &target)?;
                    log::info!("Renamed {} to {}", file_name, renamed);
                    ctx.renamed += 1;
                    catalog_name = renamed;
                }
            }
            resolution
        }
        None => {
            let file = fs::File::open(path).map_err(|e| CatalogError::unreadable(path, e))?;
            resolver
                .resolve_reader(&file_name, file)
                .map_err(|e| CatalogError::unreadable(path, e))?
        }
    };

    for rejected in &resolution.rejected {
        log::debug!(
            "{}: rejected {} candidate '{}'",
            file_name,
            rejected.source,
            rejected.value.escape_debug()
        );
    }
    if resolution.source == IdSource::Synthetic {
        log::warn!("{}: no identifier found, using {}", file_name, resolution.id);
    }
    log::info!("{}: {} ({})", file_name, resolution.id, resolution.source);

    ctx.record(resolution.source);
    progress(BuildProgress::Resolved {
        file_name: file_name.clone(),
        id: resolution.id.clone(),
        source: resolution.source,
    });

    // Display names come from the original name, even after a rename
    Ok(CatalogEntry::describe(
        resolution.id,
        titles,
        filename_stem(&file_name),
        folder.name,
        catalog_name,
    ))
}

/// Expand a compressed image into a temporary raw image and scan that.
fn resolve_compressed(
    resolver: &Resolver,
    path: &Path,
    file_name: &str,
    converter: &dyn ImageConverter,
) -> Result<Resolution, CatalogError> {
    let temp = TempImage::beside(path);
    log::info!("Converting {} for scanning", file_name);
    converter.convert(path, temp.path())?;

    let file = fs::File::open(temp.path()).map_err(|e| CatalogError::unreadable(temp.path(), e))?;
    resolver
        .resolve_reader(file_name, file)
        .map_err(|e| CatalogError::unreadable(temp.path(), e))
}

#[cfg(test)]
#[path = "tests/builder_tests.rs"]
mod tests;
