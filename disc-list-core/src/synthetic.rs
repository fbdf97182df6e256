//! Synthetic identifiers for images that carry none.

use crate::identifier::{ID_LEN, TitleId};

/// Alphanumeric characters carried by an identifier (`AAAABBBCC`).
const PAYLOAD_LEN: usize = 9;

/// Derive an identifier from a filename stem.
///
/// The stem is uppercased, reduced to `[A-Z0-9]`, cut or zero-padded to nine
/// characters and re-punctuated as `AAAA_BBB.CC`. Deterministic and total.
pub fn synthesize(stem: &str) -> TitleId {
    let mut payload: String = stem
        .to_uppercase()
        .chars()
        .filter(|c| c.is_ascii_uppercase() || c.is_ascii_digit())
        .take(PAYLOAD_LEN)
        .collect();
    while payload.len() < PAYLOAD_LEN {
        payload.push('0');
    }

    let mut id = format!("{}_{}.{}", &payload[..4], &payload[4..7], &payload[7..]);
    id.truncate(ID_LEN);
    TitleId::new_unchecked(id)
}
