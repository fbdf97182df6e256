//! `SYSTEM.CNF` boot declaration scanner.
//!
//! PlayStation discs declare their boot executable in `SYSTEM.CNF` as
//! `BOOT2 = cdrom0:\SLUS_203.12;1`. The file is small and sits near the start
//! of the disc, so a plain substring search over raw image bytes finds it
//! without parsing the filesystem.

use crate::identifier::{Candidate, ID_LEN, IdSource, SEPARATOR_INDEX, decode_lossy};

/// Boot declaration prefixes, in priority order.
pub const BOOT_MARKERS: [&[u8]; 4] = [
    b"BOOT = cdrom:\\",
    b"BOOT2 = cdrom0:\\",
    b"BOOT=cdrom:\\",
    b"BOOT2=cdrom0:\\",
];

/// Number of bytes taken after a marker.
pub const BOOT_PAYLOAD_LEN: usize = 12;

/// Build a candidate from the bytes that follow a boot marker.
///
/// The payload is cut at the first `;` (ISO version suffix), decoded, and an
/// 11-character value with the wrong separator at index 4 has it forced to
/// `_`. Only an 11-character result is marked valid.
pub fn candidate_from_payload(payload: &[u8]) -> Candidate {
    let end = payload
        .iter()
        .position(|&b| b == b';')
        .unwrap_or(payload.len());
    let decoded = decode_lossy(&payload[..end]);

    let mut chars: Vec<char> = decoded.chars().collect();
    if chars.len() == ID_LEN && chars[SEPARATOR_INDEX] != '_' {
        chars[SEPARATOR_INDEX] = '_';
    }
    let valid = chars.len() == ID_LEN;

    Candidate::new(chars.into_iter().collect::<String>(), IdSource::BootMarker, valid)
}

/// Search a complete buffer for a boot declaration.
///
/// Markers are tried in priority order; the first marker present anywhere in
/// the buffer supplies the candidate, even if a lower-priority marker occurs
/// earlier.
pub fn scan_boot_marker(data: &[u8]) -> Option<Candidate> {
    let mut scanner = BootMarkerScanner::new();
    scanner.push(data);
    scanner.finish()
}

/// Incremental boot marker search over chunks of a byte stream.
///
/// The tail of each chunk is carried into the next so a marker or its
/// payload split across a chunk boundary is still found.
#[derive(Debug, Clone)]
pub struct BootMarkerScanner {
    carry: Vec<u8>,
    found: [Option<Vec<u8>>; BOOT_MARKERS.len()],
}

impl Default for BootMarkerScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl BootMarkerScanner {
    pub fn new() -> Self {
        Self {
            carry: Vec::new(),
            found: Default::default(),
        }
    }

    /// Bytes kept between chunks: enough for the longest marker plus all but
    /// the last payload byte.
    fn overlap() -> usize {
        let longest = BOOT_MARKERS.iter().map(|m| m.len()).max().unwrap_or(0);
        longest + BOOT_PAYLOAD_LEN - 1
    }

    /// Feed the next chunk of the stream.
    pub fn push(&mut self, chunk: &[u8]) {
        let mut window = std::mem::take(&mut self.carry);
        window.extend_from_slice(chunk);
        self.search(&window, false);

        let keep = window.len().min(Self::overlap());
        self.carry = window.split_off(window.len() - keep);
    }

    /// End of stream: accept markers whose payload was cut short, then pick
    /// the highest-priority marker found.
    pub fn finish(mut self) -> Option<Candidate> {
        let window = std::mem::take(&mut self.carry);
        self.search(&window, true);

        self.found
            .iter()
            .flatten()
            .next()
            .map(|payload| candidate_from_payload(payload))
    }

    fn search(&mut self, window: &[u8], at_end: bool) {
        for (slot, marker) in self.found.iter_mut().zip(BOOT_MARKERS.iter()) {
            if slot.is_some() {
                continue;
            }
            let Some(pos) = find(window, marker) else {
                continue;
            };
            let start = pos + marker.len();
            let end = start + BOOT_PAYLOAD_LEN;
            if end <= window.len() {
                *slot = Some(window[start..end].to_vec());
            } else if at_end {
                *slot = Some(window[start..].to_vec());
            }
            // Otherwise the occurrence lies in the carried tail and is
            // re-examined with the next chunk.
        }
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

#[cfg(test)]
#[path = "tests/boot_marker_tests.rs"]
mod tests;
