use std::fs::File;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use disc_list_core::Resolver;
use disc_list_core::platform::is_compressed;
use disc_list_core::util::format_bytes_approx;
use disc_list_lib::{EngineConfig, IdSource, Settings};

use crate::CliError;
use crate::cli_types::ResolverArgs;

/// Run the resolve command: show the identifier of each file without
/// writing anything. Compressed images are only probed by filename.
pub(crate) fn run_resolve(files: &[PathBuf], resolver_args: &ResolverArgs) -> Result<(), CliError> {
    let settings = Settings::load()?;
    let config = resolver_args.apply(settings.engine_config(EngineConfig::default()));
    let resolver = Resolver::new(config);

    let mut failures = 0usize;
    for path in files {
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let resolution = match resolver.probe(&file_name) {
            Some(r) => r,
            None if is_compressed(&file_name) => {
                log::warn!(
                    "  {} {} {}",
                    "?".if_supports_color(Stdout, |t| t.yellow()),
                    file_name.if_supports_color(Stdout, |t| t.bold()),
                    "(compressed; expand it or run build)"
                        .if_supports_color(Stdout, |t| t.dimmed()),
                );
                continue;
            }
            None => match File::open(path).and_then(|f| resolver.resolve_reader(&file_name, f)) {
                Ok(r) => r,
                Err(e) => {
                    failures += 1;
                    log::warn!(
                        "  {} {}: {}",
                        "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                        file_name.if_supports_color(Stdout, |t| t.dimmed()),
                        e,
                    );
                    continue;
                }
            },
        };

        let marker = if resolution.source == IdSource::Synthetic {
            "?".if_supports_color(Stdout, |t| t.yellow()).to_string()
        } else {
            "\u{2714}".if_supports_color(Stdout, |t| t.green()).to_string()
        };
        log::info!(
            "  {} {} {} {} [{}]",
            marker,
            file_name.if_supports_color(Stdout, |t| t.bold()),
            "\u{2192}".if_supports_color(Stdout, |t| t.green()),
            resolution.id,
            resolution.source.if_supports_color(Stdout, |t| t.dimmed()),
        );
        log::debug!("    scanned {}", format_bytes_approx(resolution.bytes_scanned));
        for rejected in &resolution.rejected {
            log::info!(
                "    {} rejected {} candidate '{}'",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                rejected.source,
                rejected.value.escape_debug(),
            );
        }
    }

    if failures > 0 {
        log::warn!("{} of {} files could not be read", failures, files.len());
    }
    Ok(())
}
