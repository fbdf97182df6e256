use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use disc_list_lib::settings::{Settings, load_settings_string, settings_path};
use disc_list_lib::{EngineConfig, Platform};

use crate::CliError;

/// Show the settings file and the values a build would use.
pub(crate) fn run_config_show() -> Result<(), CliError> {
    let path = settings_path();
    let settings = Settings::load()?;

    log::info!(
        "{}",
        "disc-list Configuration".if_supports_color(Stdout, |t| t.bold()),
    );
    crate::log_blank();

    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    crate::log_blank();

    let engine = settings.engine_config(EngineConfig::default());
    let scan_limit = match engine.scan_byte_limit {
        Some(n) => format!("{} bytes", n),
        None => "whole image".to_string(),
    };
    let fields = [
        ("scan_byte_limit", scan_limit),
        (
            "uppercase_filename_ids",
            engine.uppercase_filename_ids.to_string(),
        ),
        (
            "allow_filename_qualifier",
            engine.allow_filename_qualifier.to_string(),
        ),
        (
            "sort",
            settings.catalog.sort.unwrap_or(true).to_string(),
        ),
        (
            "sort_rules",
            settings
                .catalog
                .sort_rules
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "built-in".to_string()),
        ),
        (
            "rename_converted",
            settings.catalog.rename_converted.unwrap_or(true).to_string(),
        ),
        ("converter", settings.converter().display()),
    ];
    for (name, value) in &fields {
        log::info!(
            "  {:<26} {}",
            name,
            value.if_supports_color(Stdout, |t| t.green()),
        );
    }
    for platform in Platform::all() {
        log::info!(
            "  {:<26} {}",
            format!("titles_db ({})", platform.short_name()),
            settings
                .titles_db_path(None, *platform)
                .display()
                .if_supports_color(Stdout, |t| t.green()),
        );
    }

    if let Some(contents) = load_settings_string() {
        crate::log_blank();
        log::info!("{}", "Settings file contents:".if_supports_color(Stdout, |t| t.bold()));
        for line in contents.lines() {
            log::info!("  {}", line.if_supports_color(Stdout, |t| t.dimmed()));
        }
    }
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path() {
    log::info!("{}", settings_path().display());
}
