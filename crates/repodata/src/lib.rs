//! Reader for xbps repository data.
//!
//! Repository data is a tar archive, optionally compressed with zstd or
//! gzip, holding one property list per entry:
//!
//! - `index.plist`: the package index
//! - `stage.plist`: staged packages, present while a repository is staged
//! - `index-meta.plist`: the legacy RSA signing key metadata
//!
//! Entries are mapped onto destination values through declared binding
//! tables (see [`Shape`]), so callers can decode into their own types and
//! skip entries they do not care about.
//!
//! # Example
//!
//! ```no_run
//! use std::fs::File;
//!
//! use repodata::{ErrorContext, RepoData};
//!
//! fn main() -> repodata::Result<()> {
//!     let file = File::open("x86_64-repodata")
//!         .with_context(|| "opening x86_64-repodata".to_string())?;
//!     let data = RepoData::read(file)?;
//!     for (name, pkg) in &data.index {
//!         println!("{name}: {}", pkg.pkgver);
//!     }
//!     Ok(())
//! }
//! ```

pub mod codec;
pub mod decode;
pub mod encode;
pub mod error;
pub mod reader;
pub mod repository;
pub mod schema;

#[cfg(test)]
mod test_utils;

pub use decode::{decode, ConflictPolicy, DecodeOptions, Decoder, Destination, Route, WholeEntry};
pub use encode::encode;
pub use error::{ErrorContext, RepodataError, Result};
pub use reader::{Compression, ContainerReader, EntryCursor, Next, ZST_MAGIC_BYTES};
pub use repository::{Index, Meta, Package, RepoData, INDEX_ENTRY, META_ENTRY, STAGE_ENTRY};
pub use schema::{cached, Conflict, FieldDescriptor, SchemaBuilder, Shape, TypeSchema};
