//! Writing destination values back out as repository data.
//!
//! Entries are written in schema order, one property list per entry, into a
//! tar archive wrapped in the requested compression frame.

use std::io::Write;

use tracing::debug;

use crate::{
    decode::{Destination, Route},
    error::{ErrorContext, RepodataError, Result},
    reader::Compression,
};

/// Collects the entries `src` encodes to, in archive order.
pub fn entries<D: Destination>(src: &D) -> Result<Vec<(String, Vec<u8>)>> {
    match D::route() {
        Route::Fields(schema) => {
            let mut entries = Vec::with_capacity(schema.len());
            for field in schema.fields() {
                let encoded = field.encode_from(src).map_err(|source| {
                    RepodataError::RecordEncode {
                        entry: field.name().to_string(),
                        path: field.path(),
                        source,
                    }
                })?;
                match encoded {
                    Some(payload) => entries.push((field.name().to_string(), payload)),
                    None => debug!(entry = field.name(), "omitting empty entry"),
                }
            }
            Ok(entries)
        }
        Route::Whole(whole) => {
            let payload = (whole.encode)(src).map_err(|source| {
                RepodataError::RecordEncode {
                    entry: whole.entry.to_string(),
                    path: "self".to_string(),
                    source,
                }
            })?;
            Ok(vec![(whole.entry.to_string(), payload)])
        }
    }
}

fn write_archive<W: Write>(writer: W, entries: &[(String, Vec<u8>)]) -> Result<W> {
    let mut builder = tar::Builder::new(writer);
    for (name, payload) in entries {
        let mut header = tar::Header::new_ustar();
        header.set_size(payload.len() as u64);
        header.set_mode(0o644);
        builder
            .append_data(&mut header, name, payload.as_slice())
            .with_context(|| format!("writing entry {name}"))?;
    }
    builder
        .into_inner()
        .with_context(|| "finishing archive".to_string())
}

/// Encodes `src` as repository data into `writer`.
///
/// Returns the writer once the archive and its compression frame are
/// complete.
pub fn encode<W: Write, D: Destination>(writer: W, src: &D, compression: Compression) -> Result<W> {
    let entries = entries(src)?;
    debug!(entries = entries.len(), compression = %compression, "encoding repository data");

    match compression {
        Compression::None => write_archive(writer, &entries),
        #[cfg(feature = "zstd")]
        Compression::Zstd => {
            let encoder = zstd::stream::write::Encoder::new(writer, 0)
                .with_context(|| "creating zstd encoder".to_string())?;
            write_archive(encoder, &entries)?
                .finish()
                .with_context(|| "finishing zstd frame".to_string())
        }
        #[cfg(feature = "gzip")]
        Compression::Gzip => {
            let encoder = flate2::write::GzEncoder::new(writer, flate2::Compression::default());
            write_archive(encoder, &entries)?
                .finish()
                .with_context(|| "finishing gzip stream".to_string())
        }
        other => Err(RepodataError::UnsupportedCompression(other)),
    }
}
