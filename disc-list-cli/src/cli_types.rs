//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use disc_list_lib::{EngineConfig, Platform};

#[derive(Parser)]
#[command(name = "disc-list")]
#[command(about = "Build game catalogs from PS1 and PS2 disc images", long_about = None)]
pub(crate) struct Cli {
    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Write log output to a file (ANSI codes stripped)
    #[arg(long, global = true)]
    pub logfile: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Options for the identifier resolver, shared by `build` and `resolve`.
#[derive(Args, Clone, Debug)]
pub(crate) struct ResolverArgs {
    /// Bytes scanned per image when looking for an embedded identifier
    #[arg(long, value_name = "BYTES")]
    pub scan_limit: Option<u64>,

    /// Scan whole images instead of a bounded window
    #[arg(long, conflicts_with = "scan_limit")]
    pub no_scan_limit: bool,

    /// Keep the case of identifiers taken from filenames
    #[arg(long)]
    pub keep_case: bool,

    /// Accept a 12th qualifier character on identifiers in filenames
    #[arg(long)]
    pub allow_qualifier: bool,
}

impl ResolverArgs {
    /// Apply flags that were given on top of `config`.
    pub fn apply(&self, mut config: EngineConfig) -> EngineConfig {
        if self.no_scan_limit {
            config = config.scan_byte_limit(None);
        } else if let Some(limit) = self.scan_limit {
            config = config.scan_byte_limit((limit > 0).then_some(limit));
        }
        if self.keep_case {
            config = config.uppercase_filename_ids(false);
        }
        if self.allow_qualifier {
            config = config.allow_filename_qualifier(true);
        }
        config
    }
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Build a catalog from the image folders under a game directory
    Build {
        /// Directory holding the platform's image folders (DVD, CD or POPS)
        game_path: PathBuf,

        /// Catalog file to write (replaced if it exists)
        list_path: PathBuf,

        /// Console profile (ps1, ps2); inferred from the catalog name when omitted
        #[arg(short, long)]
        platform: Option<Platform>,

        /// Reference table mapping identifiers to titles
        #[arg(long)]
        titles_db: Option<PathBuf>,

        #[command(flatten)]
        resolver: ResolverArgs,

        /// Leave the catalog in build order
        #[arg(long)]
        no_sort: bool,

        /// Sort rule file replacing the built-in rules
        #[arg(long, conflicts_with = "no_sort")]
        rules: Option<PathBuf>,

        /// Don't rename converted images to carry their identifier
        #[arg(long)]
        no_rename: bool,

        /// Command that expands a compressed image, e.g. "maxcso --decompress {input} -o {output}"
        #[arg(long)]
        converter: Option<String>,
    },

    /// Sort an existing catalog in place
    Sort {
        /// Catalog file to sort
        list_path: PathBuf,

        /// Sort rule file replacing the built-in rules
        #[arg(long)]
        rules: Option<PathBuf>,
    },

    /// Show the identifier each image resolves to, and which stage found it
    Resolve {
        /// Image files to inspect
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[command(flatten)]
        resolver: ResolverArgs,
    },

    /// Convert a PS2 icon.sys save descriptor to icon.txt
    Icon {
        /// The icon.sys file to read
        icon_sys: PathBuf,

        /// Output path (default: icon.txt next to the input)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Inspect the settings file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show effective settings and where they come from
    Show,

    /// Print the settings file path
    Path,
}
