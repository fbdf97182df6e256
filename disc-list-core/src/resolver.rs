//! The identifier resolution chain.
//!
//! ```text
//! filename probe ─hit─▶ resolved
//!      │miss
//! stream scan ────hit─▶ resolved
//!      │miss
//! boot marker ────hit─▶ resolved
//!      │miss
//! synthetic ──────────▶ resolved
//! ```
//!
//! The first stage whose candidate passes normalization wins. The stream
//! and boot marker stages share a single sequential read of the image,
//! bounded by [`EngineConfig::scan_byte_limit`].

use std::io::{self, Read};
use std::path::Path;

use crate::EngineConfig;
use crate::boot_marker::BootMarkerScanner;
use crate::identifier::{Candidate, IdSource, TitleId};
use crate::normalize::normalize;
use crate::probe::probe_filename;
use crate::stream::StreamScanner;
use crate::synthetic::synthesize;

/// Read size used when scanning an image.
const CHUNK_SIZE: usize = 64 * 1024;

/// The outcome of resolving one image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    /// The accepted identifier.
    pub id: TitleId,
    /// The stage that produced it.
    pub source: IdSource,
    /// Bytes of image content examined (0 when the filename decided).
    pub bytes_scanned: u64,
    /// Candidates from earlier stages that failed normalization.
    pub rejected: Vec<Candidate>,
}

/// Resolve an identifier from a filename and an in-memory image.
///
/// Convenience wrapper around [`Resolver::resolve_bytes`].
pub fn resolve_identifier(filename: &str, data: &[u8], config: &EngineConfig) -> Resolution {
    Resolver::new(config.clone()).resolve_bytes(filename, data)
}

/// Strip the extension from a filename (`Game.iso` → `Game`).
pub fn filename_stem(filename: &str) -> &str {
    Path::new(filename)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(filename)
}

/// Runs the resolution chain with a fixed configuration.
///
/// Holds no per-image state, so one resolver can be reused for a whole batch.
#[derive(Debug, Clone, Default)]
pub struct Resolver {
    config: EngineConfig,
}

impl Resolver {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run only the filename stage. Callers use this to decide whether an
    /// image needs to be opened (or decompressed) at all.
    pub fn probe(&self, filename: &str) -> Option<Resolution> {
        let candidate = probe_filename(filename_stem(filename), &self.config)?;
        match normalize(&candidate, &self.config) {
            Some(id) => {
                log::debug!("{}: identifier {} from filename", filename, id);
                Some(Resolution {
                    id,
                    source: IdSource::Filename,
                    bytes_scanned: 0,
                    rejected: Vec::new(),
                })
            }
            None => {
                log::debug!(
                    "{}: filename candidate '{}' is malformed",
                    filename,
                    candidate.value
                );
                None
            }
        }
    }

    /// Resolve an image held in memory. Never fails.
    pub fn resolve_bytes(&self, filename: &str, data: &[u8]) -> Resolution {
        if let Some(resolution) = self.probe(filename) {
            return resolution;
        }

        let window = match self.config.scan_byte_limit {
            Some(limit) => &data[..data.len().min(usize::try_from(limit).unwrap_or(usize::MAX))],
            None => data,
        };

        let mut scan = WindowScan::new(filename);
        for chunk in window.chunks(CHUNK_SIZE) {
            if scan.push(chunk, &self.config) {
                break;
            }
        }
        scan.finish(&self.config)
    }

    /// Resolve an image from a reader, reading at most `scan_byte_limit`
    /// bytes sequentially. Only I/O errors from the reader are returned;
    /// resolution itself cannot fail.
    pub fn resolve_reader<R: Read>(&self, filename: &str, reader: R) -> io::Result<Resolution> {
        if let Some(resolution) = self.probe(filename) {
            return Ok(resolution);
        }

        match self.config.scan_byte_limit {
            Some(limit) => self.scan_reader(filename, reader.take(limit)),
            None => self.scan_reader(filename, reader),
        }
    }

    fn scan_reader<R: Read>(&self, filename: &str, mut reader: R) -> io::Result<Resolution> {
        let mut scan = WindowScan::new(filename);
        let mut buf = vec![0u8; CHUNK_SIZE];
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            if scan.push(&buf[..n], &self.config) {
                break;
            }
        }
        Ok(scan.finish(&self.config))
    }
}

/// Stream and boot marker stages running over the same bytes.
struct WindowScan<'a> {
    filename: &'a str,
    stream: StreamScanner,
    /// Set once the stream stage has produced a candidate, accepted or not.
    stream_done: bool,
    boot: BootMarkerScanner,
    bytes_scanned: u64,
    resolved: Option<TitleId>,
    rejected: Vec<Candidate>,
}

impl<'a> WindowScan<'a> {
    fn new(filename: &'a str) -> Self {
        Self {
            filename,
            stream: StreamScanner::new(),
            stream_done: false,
            boot: BootMarkerScanner::new(),
            bytes_scanned: 0,
            resolved: None,
            rejected: Vec::new(),
        }
    }

    /// Feed the next chunk. Returns true when the stream stage has resolved
    /// the identifier and no further reading is needed.
    fn push(&mut self, chunk: &[u8], config: &EngineConfig) -> bool {
        if !self.stream_done
            && let Some(consumed) = self.stream.scan(chunk)
        {
            self.stream_done = true;
            // The automaton stops at one candidate, so the stream stage ends here.
            if let Some(candidate) = self.stream.candidate() {
                match normalize(&candidate, config) {
                    Some(id) => {
                        self.bytes_scanned += consumed as u64;
                        self.resolved = Some(id);
                        return true;
                    }
                    None => {
                        log::debug!(
                            "{}: stream candidate '{}' is malformed",
                            self.filename,
                            candidate.value.escape_debug()
                        );
                        self.rejected.push(candidate);
                    }
                }
            }
        }

        self.boot.push(chunk);
        self.bytes_scanned += chunk.len() as u64;
        false
    }

    fn finish(self, config: &EngineConfig) -> Resolution {
        let WindowScan {
            filename,
            boot,
            bytes_scanned,
            resolved,
            mut rejected,
            ..
        } = self;

        if let Some(id) = resolved {
            log::debug!("{}: identifier {} from directory record", filename, id);
            return Resolution {
                id,
                source: IdSource::Stream,
                bytes_scanned,
                rejected,
            };
        }

        if let Some(candidate) = boot.finish() {
            match normalize(&candidate, config) {
                Some(id) => {
                    log::debug!("{}: identifier {} from boot declaration", filename, id);
                    return Resolution {
                        id,
                        source: IdSource::BootMarker,
                        bytes_scanned,
                        rejected,
                    };
                }
                None => {
                    log::debug!(
                        "{}: boot candidate '{}' is malformed",
                        filename,
                        candidate.value.escape_debug()
                    );
                    rejected.push(candidate);
                }
            }
        }

        let id = synthesize(filename_stem(filename));
        log::debug!(
            "{}: no embedded identifier in {} bytes, synthesized {}",
            filename,
            bytes_scanned,
            id
        );
        Resolution {
            id,
            source: IdSource::Synthetic,
            bytes_scanned,
            rejected,
        }
    }
}

#[cfg(test)]
#[path = "tests/resolver_tests.rs"]
mod tests;
