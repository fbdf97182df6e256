//! Catalog building on top of the identifier engine: reference tables,
//! catalog records, conversion of compressed images, sorting and settings.

pub mod builder;
pub mod catalog;
pub mod convert;
pub mod error;
pub mod settings;
pub mod sorter;
pub mod titles;

pub use builder::{BuildOptions, BuildProgress, BuildStatus, BuildSummary, build_catalog};
pub use catalog::{CatalogEntry, CatalogWriter};
pub use convert::{CommandConverter, ImageConverter};
pub use error::CatalogError;
pub use settings::Settings;
pub use sorter::{SortRules, sort_catalog};
pub use titles::{TitleInfo, TitlesDb};

pub use disc_list_core::{EngineConfig, IdSource, Platform, TitleId};
