//! PS2 save icon descriptor (`icon.sys`) decoder.
//!
//! `icon.sys` is a fixed-layout binary file with a `PS2D` magic. Launchers
//! that browse installed games want the same information as `icon.txt`, a
//! `key=value` text file with a `PS2X` header. [`IconSys::to_icon_txt`]
//! renders that form.
//!
//! Layout (offsets in bytes):
//!
//! | offset | size | field |
//! |--------|------|-------|
//! | 0x00 | 4 | magic `PS2D` |
//! | 0x06 | 2 | title line break offset (u16 LE) |
//! | 0x0C | 1 | background alpha |
//! | 0x10 | 4 × 16 | background colours, R/G/B at +0/+4/+8 |
//! | 0x50 | 3 × 16 | light directions, f32 LE × 3 |
//! | 0x80 | 3 × 16 | light colours, f32 LE × 3 |
//! | 0xB0 | 16 | ambient light colour, f32 LE × 3 |
//! | 0xC0 | 68 | title, Shift-JIS |

use unicode_normalization::UnicodeNormalization;

use crate::error::ImageError;
use crate::util::{read_f32_le, read_u16_le};

pub const ICON_SYS_MAGIC: &[u8; 4] = b"PS2D";
pub const ICON_TXT_MAGIC: &str = "PS2X";

const SPLIT_OFFSET: usize = 0x06;
const BG_ALPHA_OFFSET: usize = 0x0C;
const BG_COLOR_OFFSETS: [usize; 4] = [0x10, 0x20, 0x30, 0x40];
const LIGHT_DIR_OFFSETS: [usize; 3] = [0x50, 0x60, 0x70];
const LIGHT_COLOR_OFFSETS: [usize; 3] = [0x80, 0x90, 0xA0];
const AMBIENT_OFFSET: usize = 0xB0;
const TITLE_OFFSET: usize = 0xC0;
const TITLE_LEN: usize = 68;

/// Smallest input that holds every decoded field.
pub const MIN_ICON_SYS_LEN: usize = TITLE_OFFSET + TITLE_LEN;

/// Decoded `icon.sys` contents.
#[derive(Debug, Clone, PartialEq)]
pub struct IconSys {
    /// First title line.
    pub title0: String,
    /// Second title line (may be empty).
    pub title1: String,
    pub bg_alpha: u8,
    pub bg_colors: [[u8; 3]; 4],
    pub light_dirs: [[f32; 3]; 3],
    /// Light colours scaled to 0..=127.
    pub light_colors: [[u8; 3]; 3],
    pub ambient: [u8; 3],
}

/// Decode an `icon.sys` buffer.
pub fn parse_icon_sys(data: &[u8]) -> Result<IconSys, ImageError> {
    if data.len() < ICON_SYS_MAGIC.len() || &data[..ICON_SYS_MAGIC.len()] != ICON_SYS_MAGIC {
        return Err(ImageError::invalid_format("missing PS2D header"));
    }
    if data.len() < MIN_ICON_SYS_LEN {
        return Err(ImageError::TooSmall {
            expected: MIN_ICON_SYS_LEN as u64,
            actual: data.len() as u64,
        });
    }

    let (title0, title1) = decode_title_pair(data);

    Ok(IconSys {
        title0,
        title1,
        bg_alpha: data[BG_ALPHA_OFFSET],
        bg_colors: BG_COLOR_OFFSETS.map(|off| [data[off], data[off + 4], data[off + 8]]),
        light_dirs: LIGHT_DIR_OFFSETS.map(|off| read_vec3(data, off)),
        light_colors: LIGHT_COLOR_OFFSETS.map(|off| read_vec3(data, off).map(scale_light)),
        ambient: read_vec3(data, AMBIENT_OFFSET).map(scale_light),
    })
}

impl IconSys {
    /// Render the `icon.txt` form. Lines are joined with `\n` and there is
    /// no trailing newline.
    pub fn to_icon_txt(&self) -> String {
        let mut lines = vec![
            ICON_TXT_MAGIC.to_string(),
            format!("title0={}", self.title0),
            format!("title1={}", self.title1),
            format!("bgcola={}", self.bg_alpha),
        ];
        for (i, color) in self.bg_colors.iter().enumerate() {
            lines.push(format!("bgcol{}={}", i, join(color)));
        }
        for (i, dir) in self.light_dirs.iter().enumerate() {
            let parts: Vec<String> = dir.iter().map(|v| format!("{:.4}", v)).collect();
            lines.push(format!("lightdir{}={}", i, parts.join(",")));
        }
        lines.push(format!("lightcolamb={}", join(&self.ambient)));
        for (i, color) in self.light_colors.iter().enumerate() {
            lines.push(format!("lightcol{}={}", i, join(color)));
        }
        for i in 0..3 {
            lines.push(format!("uninstallmes{}=", i));
        }
        lines.join("\n")
    }
}

fn join(values: &[u8; 3]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

fn read_vec3(data: &[u8], offset: usize) -> [f32; 3] {
    [0, 4, 8].map(|i| read_f32_le(data, offset + i))
}

/// Map a 0.0..=1.0 light intensity to 0..=127, rounding half to even.
fn scale_light(value: f32) -> u8 {
    // NaN saturates to 0 in the cast
    (f64::from(value) * 127.0).round_ties_even().clamp(0.0, 127.0) as u8
}

/// Split the title block at the stored line break offset and decode both
/// halves.
fn decode_title_pair(data: &[u8]) -> (String, String) {
    let block = &data[TITLE_OFFSET..TITLE_OFFSET + TITLE_LEN];
    let split = usize::from(read_u16_le(data, SPLIT_OFFSET)).min(block.len());
    let (first, second) = block.split_at(split);
    (decode_title(first), decode_title(second))
}

/// Decode one NUL-terminated Shift-JIS title line.
///
/// Undecodable bytes are dropped rather than replaced, and the result is
/// NFKC-normalized so full-width Latin letters become ASCII.
fn decode_title(bytes: &[u8]) -> String {
    let end = bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len());
    let (text, _had_errors) = encoding_rs::SHIFT_JIS.decode_without_bom_handling(&bytes[..end]);
    let cleaned: String = text.chars().filter(|&c| c != char::REPLACEMENT_CHARACTER).collect();
    cleaned.trim().nfkc().collect()
}

#[cfg(test)]
#[path = "tests/icon_sys_tests.rs"]
mod tests;
