//! Error types for the repodata crate.
//!
//! This module defines [`RepodataError`], the error type used throughout
//! the crate, along with helper traits for error context.

use miette::Diagnostic;
use thiserror::Error;

use crate::reader::Compression;

/// Errors that can occur while reading or writing repository data.
///
/// Every variant is terminal for the decode call that produced it. The
/// destination may be partially populated afterwards and must not be used.
#[derive(Error, Diagnostic, Debug)]
pub enum RepodataError {
    #[error("repodata: invalid {format}: {source}")]
    #[diagnostic(
        code(repodata::archive),
        help("The repository data file is truncated or is not a valid archive")
    )]
    Archive {
        format: &'static str,
        source: std::io::Error,
    },

    #[error("repodata: {0} compression is not supported")]
    #[diagnostic(
        code(repodata::unsupported_compression),
        help("Recompress the repository data with zstd or gzip")
    )]
    UnsupportedCompression(Compression),

    #[error("repodata: failed to decode entry `{entry}` into `{path}`: {source}")]
    #[diagnostic(
        code(repodata::record),
        help("The entry does not match the expected record shape")
    )]
    Record {
        entry: String,
        path: String,
        source: plist::Error,
    },

    #[error("repodata: failed to encode `{path}` as entry `{entry}`: {source}")]
    #[diagnostic(code(repodata::record_encode))]
    RecordEncode {
        entry: String,
        path: String,
        source: plist::Error,
    },

    #[error("repodata: ambiguous binding for entry `{entry}` in `{shape}`")]
    #[diagnostic(
        code(repodata::schema_conflict),
        help("Two fields at the same embedding depth bind the same entry name")
    )]
    SchemaConflict { shape: &'static str, entry: String },

    #[error("repodata: cannot reach `{path}` for entry `{entry}`: {reason}")]
    #[diagnostic(code(repodata::navigation))]
    Navigation {
        entry: String,
        path: String,
        reason: String,
    },

    #[error("repodata: entry `{entry}` exceeds the size limit of {limit} bytes")]
    #[diagnostic(
        code(repodata::entry_too_large),
        help("Raise `max_entry_size` in the configuration if the file is trusted")
    )]
    EntryTooLarge { entry: String, limit: u64 },

    #[error("Error while {action}: {source}")]
    #[diagnostic(code(repodata::io))]
    IoError {
        action: String,
        source: std::io::Error,
    },
}

/// A specialized Result type for repodata operations.
pub type Result<T> = std::result::Result<T, RepodataError>;

/// Extension trait for adding context to I/O errors.
pub trait ErrorContext<T> {
    /// Adds context to an error, describing what action was being performed.
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: FnOnce() -> String;
}

impl<T> ErrorContext<T> for std::io::Result<T> {
    fn with_context<C>(self, context: C) -> Result<T>
    where
        C: FnOnce() -> String,
    {
        self.map_err(|err| {
            RepodataError::IoError {
                action: context(),
                source: err,
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = RepodataError::Archive {
            format: "tar",
            source: std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "unexpected EOF"),
        };
        assert_eq!(err.to_string(), "repodata: invalid tar: unexpected EOF");

        let err = RepodataError::UnsupportedCompression(Compression::Xz);
        assert_eq!(err.to_string(), "repodata: xz compression is not supported");

        let err = RepodataError::EntryTooLarge {
            entry: "index.plist".to_string(),
            limit: 16,
        };
        assert_eq!(
            err.to_string(),
            "repodata: entry `index.plist` exceeds the size limit of 16 bytes"
        );
    }

    #[test]
    fn test_with_context() {
        let res: std::io::Result<()> = Err(std::io::Error::other("boom"));
        let err = res.with_context(|| "seeking source".to_string()).unwrap_err();
        assert_eq!(err.to_string(), "Error while seeking source: boom");
    }
}
