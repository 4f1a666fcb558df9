// src/process/mod.rs
pub mod columns;
pub mod numeric;
pub mod raw_table;
pub mod term;

use tracing::warn;

pub use numeric::{coerce_grouped_numeric, coerce_impression_count, try_impression_count};
pub use raw_table::{Cell, RawTable};
pub use term::normalize;

const BOM: char = '\u{feff}';

/// Decode an uploaded export into text.
///
/// Invalid UTF-8 is replaced rather than rejected, and a leading byte-order
/// mark is dropped so the first line compares cleanly.
pub fn decode_export(bytes: &[u8]) -> String {
    let text = String::from_utf8_lossy(bytes);
    if let std::borrow::Cow::Owned(_) = text {
        warn!("export is not valid UTF-8; invalid sequences were replaced");
    }
    let text = text.into_owned();
    match text.strip_prefix(BOM) {
        Some(rest) => rest.to_string(),
        None => text,
    }
}
