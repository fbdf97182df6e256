//! disc-list CLI
//!
//! Builds OPL-style game catalogs from PS1 and PS2 disc images.

mod cli_types;
mod commands;
mod error;
mod logger;

use clap::Parser;

use cli_types::{Cli, Commands, ConfigAction};
use commands::build::BuildArgs;

pub(crate) use error::CliError;

fn main() {
    let cli = Cli::parse();

    if let Err(e) = logger::init(cli.quiet, cli.verbose, cli.logfile.as_deref()) {
        eprintln!("Cannot open log file: {e}");
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Build {
            game_path,
            list_path,
            platform,
            titles_db,
            resolver,
            no_sort,
            rules,
            no_rename,
            converter,
        } => commands::build::run_build(
            BuildArgs {
                game_path,
                list_path,
                platform,
                titles_db,
                resolver,
                no_sort,
                rules,
                no_rename,
                converter,
            },
            cli.quiet,
        ),
        Commands::Sort { list_path, rules } => commands::sort::run_sort(&list_path, rules),
        Commands::Resolve { files, resolver } => commands::resolve::run_resolve(&files, &resolver),
        Commands::Icon { icon_sys, output } => commands::icon::run_icon(&icon_sys, output),
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(),
            ConfigAction::Path => {
                commands::config::run_config_path();
                Ok(())
            }
        },
    };

    if let Err(e) = result {
        log::error!("{e}");
        std::process::exit(1);
    }
}

/// Emit an empty line through the logger.
pub(crate) fn log_blank() {
    log::info!("");
}
