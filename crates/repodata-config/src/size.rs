//! Human readable byte sizes for size-typed settings.

use crate::error::{ConfigError, Result};

const UNITS: [&str; 7] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB", "EiB"];

/// Formats a byte count with binary units, e.g. `1.50 KiB`.
pub fn format_size(bytes: u64, precision: usize) -> String {
    let unit = 1024.0_f64;
    let idx = if bytes == 0 {
        0
    } else {
        ((bytes as f64).log(unit).floor() as usize).min(UNITS.len() - 1)
    };

    format!(
        "{:.*} {}",
        precision,
        bytes as f64 / unit.powi(idx as i32),
        UNITS[idx]
    )
}

/// Parses a byte count such as `4096`, `64MiB` or `1.5 KB`.
///
/// Binary suffixes (`KiB`, `MiB`, ...) scale by 1024, decimal ones (`KB`,
/// `MB`, ...) by 1000. Matching is case-insensitive.
pub fn parse_size(s: &str) -> Result<u64> {
    let invalid = |reason: &str| {
        ConfigError::InvalidSize {
            input: s.to_string(),
            reason: reason.to_string(),
        }
    };

    let mut size = s.trim().to_uppercase();
    if let Ok(v) = size.parse::<u64>() {
        return Ok(v);
    }

    let base: f64 = if size.ends_with("IB") {
        size.truncate(size.len() - 2);
        1024.0
    } else if size.ends_with('B') {
        size.truncate(size.len() - 1);
        1000.0
    } else {
        return Err(invalid("invalid suffix"));
    };

    let prefixes = ["", "K", "M", "G", "T", "P", "E"];
    let bytes = prefixes
        .iter()
        .enumerate()
        .rev()
        .find_map(|(i, p)| {
            size.strip_suffix(p).and_then(|num| {
                num.trim()
                    .parse::<f64>()
                    .ok()
                    .filter(|n| n.is_finite() && *n >= 0.0)
                    .map(|n| (n * base.powi(i as i32)).round())
            })
        })
        .ok_or_else(|| invalid("unrecognized size format"))?;

    // u64::MAX is not representable as f64; the nearest value is 2^64.
    if bytes >= u64::MAX as f64 {
        return Err(invalid("size out of range"));
    }
    Ok(bytes as u64)
}
