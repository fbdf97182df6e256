use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use disc_list_lib::{Settings, SortRules, sort_catalog};

use crate::CliError;

/// Pick the sort rules: `--rules` file, then the settings file's
/// `catalog.sort_rules`, then the built-in set.
pub(crate) fn load_rules(
    cli_rules: Option<PathBuf>,
    settings: &Settings,
) -> Result<SortRules, CliError> {
    let path = cli_rules.or_else(|| settings.catalog.sort_rules.clone());
    match path {
        Some(p) => {
            log::debug!("Sort rules from {}", p.display());
            Ok(SortRules::load(&p)?)
        }
        None => Ok(SortRules::builtin()),
    }
}

/// Run the sort command.
pub(crate) fn run_sort(list_path: &Path, rules: Option<PathBuf>) -> Result<(), CliError> {
    let settings = Settings::load()?;
    let rules = load_rules(rules, &settings)?;

    let count = sort_catalog(list_path, &rules)?;
    log::info!(
        "  {} Sorted {} entries in {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        count,
        list_path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}
