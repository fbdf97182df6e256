use std::fs;
use std::path::{Path, PathBuf};

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use disc_list_core::icon_sys::parse_icon_sys;

use crate::CliError;

/// Default output: `icon.txt` in the same directory as the input.
pub(crate) fn default_output(icon_sys: &Path) -> PathBuf {
    icon_sys.with_file_name("icon.txt")
}

/// Run the icon command.
pub(crate) fn run_icon(icon_sys: &Path, output: Option<PathBuf>) -> Result<(), CliError> {
    let data = fs::read(icon_sys)?;
    let icon = parse_icon_sys(&data)?;
    let output = output.unwrap_or_else(|| default_output(icon_sys));

    fs::write(&output, icon.to_icon_txt())?;

    let title = format!("{} {}", icon.title0, icon.title1);
    log::info!(
        "  {} {} {} {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        title.trim().if_supports_color(Stdout, |t| t.bold()),
        "\u{2192}".if_supports_color(Stdout, |t| t.green()),
        output.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}
