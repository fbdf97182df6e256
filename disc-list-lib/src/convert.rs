//! Expanding compressed images so they can be scanned.
//!
//! Compressed images (`.zso`) hide the identifier behind compression, so the
//! builder asks an [`ImageConverter`] for a raw copy, scans it and deletes it
//! again. The copy is owned by a [`TempImage`] guard; a crash between
//! conversion and cleanup can still leave the file behind.

use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::CatalogError;

/// Placeholder replaced by the compressed image path.
pub const INPUT_PLACEHOLDER: &str = "{input}";
/// Placeholder replaced by the raw image path.
pub const OUTPUT_PLACEHOLDER: &str = "{output}";

/// Produces a raw image at `target` from the compressed image at `source`.
///
/// Implementations must not leave a partial `target` behind on failure.
pub trait ImageConverter {
    fn convert(&self, source: &Path, target: &Path) -> Result<(), CatalogError>;
}

/// Runs an external program, without a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandConverter {
    program: String,
    args: Vec<String>,
}

impl Default for CommandConverter {
    /// `python3 ./helper/ziso.py -c 0 {input} {output}`
    fn default() -> Self {
        Self::new(
            "python3",
            ["./helper/ziso.py", "-c", "0", INPUT_PLACEHOLDER, OUTPUT_PLACEHOLDER],
        )
    }
}

impl CommandConverter {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Parse a whitespace-separated command line such as
    /// `maxcso --decompress {input} -o {output}`. No quoting is supported;
    /// use [`CommandConverter::new`] for arguments containing spaces.
    pub fn from_command_line(line: &str) -> Result<Self, CatalogError> {
        let mut parts = line.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| CatalogError::config("converter command is empty"))?;
        let args: Vec<&str> = parts.collect();
        if !args.iter().any(|a| a.contains(INPUT_PLACEHOLDER)) {
            return Err(CatalogError::config(format!(
                "converter command must contain {}",
                INPUT_PLACEHOLDER
            )));
        }
        if !args.iter().any(|a| a.contains(OUTPUT_PLACEHOLDER)) {
            return Err(CatalogError::config(format!(
                "converter command must contain {}",
                OUTPUT_PLACEHOLDER
            )));
        }
        Ok(Self::new(program, args))
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments with placeholders substituted.
    pub fn expand_args(&self, source: &Path, target: &Path) -> Vec<OsString> {
        self.args
            .iter()
            .map(|arg| match arg.as_str() {
                INPUT_PLACEHOLDER => source.as_os_str().to_os_string(),
                OUTPUT_PLACEHOLDER => target.as_os_str().to_os_string(),
                other => OsString::from(
                    other
                        .replace(INPUT_PLACEHOLDER, &source.to_string_lossy())
                        .replace(OUTPUT_PLACEHOLDER, &target.to_string_lossy()),
                ),
            })
            .collect()
    }

    /// The command as it would be shown to a user.
    pub fn display(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl ImageConverter for CommandConverter {
    fn convert(&self, source: &Path, target: &Path) -> Result<(), CatalogError> {
        log::debug!(
            "Running {} {:?}",
            self.program,
            self.expand_args(source, target)
        );
        let output = Command::new(&self.program)
            .args(self.expand_args(source, target))
            .output();

        let failure = match output {
            Ok(out) if out.status.success() => return Ok(()),
            Ok(out) => {
                let stderr = String::from_utf8_lossy(&out.stderr);
                match stderr.lines().rev().find(|l| !l.trim().is_empty()) {
                    Some(last) => {
                        format!("{} exited with {}: {}", self.program, out.status, last.trim())
                    }
                    None => format!("{} exited with {}", self.program, out.status),
                }
            }
            Err(e) => format!("could not run {}: {}", self.program, e),
        };

        remove_partial(target);
        Err(CatalogError::conversion(source, failure))
    }
}

/// Best-effort removal of a file that may or may not exist.
fn remove_partial(path: &Path) {
    match fs::remove_file(path) {
        Ok(()) => log::debug!("Removed partial output {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => log::warn!("Could not remove {}: {}", path.display(), e),
    }
}

/// A raw image produced for scanning, deleted when dropped.
#[derive(Debug)]
pub struct TempImage {
    path: PathBuf,
}

impl TempImage {
    /// Scratch path for expanding `source`: a hidden file next to it, so
    /// it is never counted as an image and never clobbers a real one.
    pub fn beside(source: &Path) -> Self {
        let stem = source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let name = format!(".{}.disc-list.iso", stem);
        let path = match source.parent() {
            Some(dir) => dir.join(name),
            None => PathBuf::from(name),
        };
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for TempImage {
    fn drop(&mut self) {
        remove_partial(&self.path);
    }
}

#[cfg(test)]
#[path = "tests/convert_tests.rs"]
mod tests;
