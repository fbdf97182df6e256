//! Catalog ordering.
//!
//! Lines are ordered by a normalized title key, then by identifier, using
//! natural ordering (digit runs compare by value, so `Tekken 10` sorts after
//! `Tekken 9`). The rule tables that steer franchises into release order are
//! data ([`SortRules`]), loaded from TOML. A built-in set ships with the crate.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::error::CatalogError;

const BUILTIN_RULES: &str = include_str!("../data/sort_rules.toml");

/// Whole-word Roman numerals I to XX, in value order.
const ROMAN_NUMERALS: [&str; 20] = [
    "i", "ii", "iii", "iv", "v", "vi", "vii", "viii", "ix", "x", "xi", "xii", "xiii", "xiv", "xv",
    "xvi", "xvii", "xviii", "xix", "xx",
];

/// Swappable title rewrite tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortRules {
    /// Exact-match rewrites applied to the lowercased title before
    /// parenthesised suffixes are removed.
    #[serde(default)]
    pub early_overrides: HashMap<String, String>,

    /// Exact-match rewrites applied after suffix and article removal.
    #[serde(default)]
    pub overrides: HashMap<String, String>,

    /// A key starting with one of these is cut down to it. First match wins.
    #[serde(default)]
    pub truncate_prefixes: Vec<String>,
}

impl SortRules {
    /// The rule set bundled with the crate.
    pub fn builtin() -> Self {
        toml::from_str(BUILTIN_RULES).expect("bundled sort rules are valid TOML")
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, CatalogError> {
        toml::from_str(contents)
            .map_err(|e| CatalogError::config(format!("invalid sort rules: {e}")))
    }

    /// Load a rule file, replacing the built-in set entirely.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Normalized sort key for a display name.
    pub fn title_key(&self, title: &str) -> String {
        let mut key = title.trim().to_lowercase();

        if let Some(replacement) = self.early_overrides.get(&key) {
            key = replacement.clone();
        }

        if let Some(pos) = key.find('(') {
            key = key[..pos].trim().to_string();
        }

        if let Some(rest) = key.strip_prefix("the ") {
            key = rest.trim().to_string();
        }

        if let Some(replacement) = self.overrides.get(&key) {
            key = replacement.clone();
        }

        let lower = key.to_lowercase();
        if let Some(prefix) = self
            .truncate_prefixes
            .iter()
            .find(|p| lower.starts_with(p.as_str()))
        {
            key = prefix.clone();
        }

        if let Some(pos) = key.find(':') {
            key = key[..pos].trim().to_string();
        }

        let stripped: String = key.nfd().filter(|c| !is_combining_mark(*c)).collect();
        let numbered = replace_roman_numerals(&stripped);

        numbered
            .chars()
            .filter(|c| c.is_alphanumeric() || c.is_whitespace())
            .collect::<String>()
            .to_lowercase()
    }

    /// Sort key for a catalog line: `(title key, identifier lowercased)`.
    pub fn line_key(&self, line: &str) -> (String, String) {
        let mut fields = line.trim().split('|');
        let title = fields.next().unwrap_or("").trim();
        let id = fields.next().unwrap_or("").trim();
        (self.title_key(title), id.to_lowercase())
    }

    /// Order catalog lines. Equal keys keep their input order.
    pub fn sort_lines<S: AsRef<str>>(&self, lines: &[S]) -> Vec<String> {
        let mut keyed: Vec<((String, String), &str)> = lines
            .iter()
            .map(|l| (self.line_key(l.as_ref()), l.as_ref()))
            .collect();
        keyed.sort_by(|(a, _), (b, _)| {
            natural_cmp(&a.0, &b.0).then_with(|| natural_cmp(&a.1, &b.1))
        });
        keyed.into_iter().map(|(_, line)| line.to_string()).collect()
    }
}

/// Replace whole-word Roman numerals (I to XX, any case) with digits.
fn replace_roman_numerals(text: &str) -> String {
    fn flush(word: &mut String, out: &mut String) {
        match ROMAN_NUMERALS
            .iter()
            .position(|r| word.eq_ignore_ascii_case(r))
        {
            Some(i) => out.push_str(&(i + 1).to_string()),
            None => out.push_str(word),
        }
        word.clear();
    }

    let mut out = String::with_capacity(text.len());
    let mut word = String::new();
    for c in text.chars() {
        if c.is_alphanumeric() || c == '_' {
            word.push(c);
        } else {
            flush(&mut word, &mut out);
            out.push(c);
        }
    }
    flush(&mut word, &mut out);
    out
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Chunk<'a> {
    Text(&'a str),
    Number(&'a str),
}

/// Split into alternating text and digit runs. A string that starts with a
/// digit gets an empty leading text chunk so runs line up position by position.
fn chunks(s: &str) -> Vec<Chunk<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_digits = None;
    for (i, c) in s.char_indices() {
        let digit = c.is_ascii_digit();
        match in_digits {
            None => {
                if digit {
                    out.push(Chunk::Text(""));
                }
                in_digits = Some(digit);
            }
            Some(prev) if prev != digit => {
                out.push(make_chunk(&s[start..i], prev));
                start = i;
                in_digits = Some(digit);
            }
            Some(_) => {}
        }
    }
    if let Some(prev) = in_digits {
        out.push(make_chunk(&s[start..], prev));
    }
    out
}

fn make_chunk(run: &str, digits: bool) -> Chunk<'_> {
    if digits {
        Chunk::Number(run)
    } else {
        Chunk::Text(run)
    }
}

fn compare_numbers(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Natural string ordering: digit runs compare by numeric value, everything
/// else by code point.
pub fn natural_cmp(a: &str, b: &str) -> Ordering {
    let left = chunks(a);
    let right = chunks(b);
    for (x, y) in left.iter().zip(right.iter()) {
        let ord = match (x, y) {
            (Chunk::Text(x), Chunk::Text(y)) => x.cmp(y),
            (Chunk::Number(x), Chunk::Number(y)) => compare_numbers(x, y),
            (Chunk::Text(_), Chunk::Number(_)) => Ordering::Less,
            (Chunk::Number(_), Chunk::Text(_)) => Ordering::Greater,
        };
        if ord != Ordering::Equal {
            return ord;
        }
    }
    left.len().cmp(&right.len())
}

/// Sort a catalog file in place. Blank lines are dropped and every line is
/// newline-terminated. The new contents are written to a sibling temp file
/// and renamed over the original. Returns the number of lines written.
pub fn sort_catalog(path: &Path, rules: &SortRules) -> Result<usize, CatalogError> {
    let contents = fs::read_to_string(path)?;
    let lines: Vec<&str> = contents.lines().filter(|l| !l.trim().is_empty()).collect();
    let sorted = rules.sort_lines(&lines);

    let mut out = String::with_capacity(contents.len() + 1);
    for line in &sorted {
        out.push_str(line);
        out.push('\n');
    }

    let tmp = temp_path(path);
    fs::write(&tmp, out)?;
    if let Err(e) = fs::rename(&tmp, path) {
        let _ = fs::remove_file(&tmp);
        return Err(e.into());
    }

    log::debug!("Sorted {} lines in {}", sorted.len(), path.display());
    Ok(sorted.len())
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name: OsString = path.as_os_str().to_owned();
    name.push(".tmp");
    PathBuf::from(name)
}

#[cfg(test)]
#[path = "tests/sorter_tests.rs"]
mod tests;
