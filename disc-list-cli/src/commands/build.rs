use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use log::Level;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use disc_list_core::util::format_bytes;
use disc_list_lib::builder::{BuildOptions, BuildProgress, BuildStatus, BuildSummary, build_catalog};
use disc_list_lib::{CommandConverter, EngineConfig, IdSource, Platform, Settings, TitlesDb};

use crate::CliError;
use crate::cli_types::ResolverArgs;

/// Arguments of the build command.
pub(crate) struct BuildArgs {
    pub game_path: PathBuf,
    pub list_path: PathBuf,
    pub platform: Option<Platform>,
    pub titles_db: Option<PathBuf>,
    pub resolver: ResolverArgs,
    pub no_sort: bool,
    pub rules: Option<PathBuf>,
    pub no_rename: bool,
    pub converter: Option<String>,
}

/// Run the build command.
pub(crate) fn run_build(args: BuildArgs, quiet: bool) -> Result<(), CliError> {
    let settings = Settings::load()?;

    let platform = match args.platform {
        Some(p) => p,
        None => Platform::from_list_path(&args.list_path).ok_or_else(|| {
            CliError::config(format!(
                "Cannot tell the platform from {}; pass --platform",
                args.list_path.display()
            ))
        })?,
    };

    let engine = args
        .resolver
        .apply(settings.engine_config(EngineConfig::default()));
    let sort = if args.no_sort || settings.catalog.sort == Some(false) {
        None
    } else {
        Some(crate::commands::sort::load_rules(args.rules, &settings)?)
    };
    let rename = !args.no_rename && settings.catalog.rename_converted.unwrap_or(true);
    let converter = match &args.converter {
        Some(line) => CommandConverter::from_command_line(line)?,
        None => settings.converter(),
    };

    let titles_path = settings.titles_db_path(args.titles_db, platform);
    let titles = TitlesDb::load(&titles_path)?;

    log::info!(
        "Building {} catalog from: {}",
        platform.display_name().if_supports_color(Stdout, |t| t.bold()),
        args.game_path
            .display()
            .if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!(
        "{}",
        format!(
            "Catalog: {}  Titles: {} ({} entries)",
            args.list_path.display(),
            titles_path.display(),
            titles.len()
        )
        .if_supports_color(Stdout, |t| t.dimmed()),
    );
    let limit = match engine.scan_byte_limit {
        Some(n) => format_bytes(n),
        None => "whole image".to_string(),
    };
    log::info!(
        "{}",
        format!("Scan window: {}", limit).if_supports_color(Stdout, |t| t.dimmed()),
    );
    log::debug!("Converter: {}", converter.display());
    crate::log_blank();

    let options = BuildOptions::new(platform)
        .engine(engine)
        .rename_converted(rename)
        .sort(sort);

    let pb = if quiet {
        ProgressBar::hidden()
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("  {spinner:.cyan} {msg}")
                .expect("static pattern")
                .tick_chars("/-\\|"),
        );
        pb
    };

    let progress_callback = |progress: BuildProgress| match progress {
        BuildProgress::Counted { total } => {
            pb.set_message(format!("Found {total} images"));
            pb.tick();
        }
        BuildProgress::Processing {
            ref folder,
            ref file_name,
            file_index,
            total,
        } => {
            pb.set_message(format!(
                "[{}/{}] {}/{}",
                file_index + 1,
                total,
                folder,
                file_name
            ));
            pb.tick();
        }
        BuildProgress::Converting { ref file_name } => {
            pb.set_message(format!("Expanding {}", file_name));
            pb.tick();
        }
        BuildProgress::Resolved { .. } => {
            pb.tick();
        }
        BuildProgress::Sorting => {
            pb.set_message("Sorting catalog");
            pb.tick();
        }
        BuildProgress::Done => {
            pb.finish_and_clear();
        }
    };

    let result = build_catalog(
        &args.game_path,
        &args.list_path,
        &titles,
        &options,
        &converter,
        &progress_callback,
    );
    pb.finish_and_clear();

    let summary = result?;
    print_summary(&summary);
    Ok(())
}

/// Print the outcome of a build.
fn print_summary(summary: &BuildSummary) {
    if summary.status == BuildStatus::NoImages {
        log::warn!(
            "{} No images found; {} was not written",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            summary.list_path.display(),
        );
        return;
    }

    crate::log_blank();
    let synthetic = summary.count(IdSource::Synthetic);
    let header_level = if synthetic > 0 { Level::Warn } else { Level::Info };
    log::log!(
        header_level,
        "{} {}",
        "Summary:".if_supports_color(Stdout, |t| t.bold()),
        summary
            .list_path
            .display()
            .if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!(
        "  {} {} of {} images catalogued",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        summary.written,
        summary.total,
    );
    for (source, count) in &summary.by_source {
        if *count == 0 || *source == IdSource::Synthetic {
            continue;
        }
        log::info!(
            "    {} {}",
            count,
            format!("from {}", source).if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    if synthetic > 0 {
        log::warn!(
            "  {} {} with no identifier (synthetic ids used)",
            "?".if_supports_color(Stdout, |t| t.yellow()),
            synthetic,
        );
    }
    if summary.converted > 0 {
        log::info!(
            "  {} {} compressed images expanded, {} renamed",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            summary.converted,
            summary.renamed,
        );
    }
    if summary.sorted {
        log::info!(
            "  {} Sorted",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        );
    }
}
