//! Decoding repository data into destination values.
//!
//! [`Decoder`] probes the source once, resolves the destination's schema and
//! then walks the archive, handing every bound entry to the record codec.
//! Entries without a binding are skipped so newer archives with extra
//! entries still decode.

use std::{
    collections::{BTreeMap, HashMap},
    io::{Read, Seek},
    sync::Arc,
};

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{debug, trace};

use crate::{
    codec,
    error::{RepodataError, Result},
    reader::{ContainerReader, EntryCursor, Next},
    schema::{self, Shape, TypeSchema},
    INDEX_ENTRY,
};

/// Path reported for values bound as a whole.
const WHOLE_PATH: &str = "self";

/// A destination bound as a whole to a single entry.
pub struct WholeEntry<T> {
    pub entry: &'static str,
    pub decode: fn(&mut T, &[u8]) -> std::result::Result<(), plist::Error>,
    pub encode: fn(&T) -> std::result::Result<Vec<u8>, plist::Error>,
}

/// How archive entries reach a destination.
pub enum Route<T> {
    /// Entries are matched against the fields of a resolved schema.
    Fields(Arc<TypeSchema<T>>),
    /// One entry populates the whole destination; there is no schema.
    Whole(WholeEntry<T>),
}

impl<T: Shape> Route<T> {
    /// Routes through the cached schema of `T`.
    pub fn fields() -> Self {
        Route::Fields(schema::cached::<T>())
    }
}

/// A value repository data can be decoded into.
pub trait Destination: Sized + 'static {
    fn route() -> Route<Self>;
}

fn decode_whole<T: DeserializeOwned>(
    dest: &mut T,
    payload: &[u8],
) -> std::result::Result<(), plist::Error> {
    *dest = codec::decode_record(payload)?;
    Ok(())
}

impl<V> Destination for BTreeMap<String, V>
where
    V: DeserializeOwned + Serialize + 'static,
{
    fn route() -> Route<Self> {
        Route::Whole(WholeEntry {
            entry: INDEX_ENTRY,
            decode: decode_whole::<Self>,
            encode: codec::encode_record::<Self>,
        })
    }
}

impl<V> Destination for HashMap<String, V>
where
    V: DeserializeOwned + Serialize + 'static,
{
    fn route() -> Route<Self> {
        Route::Whole(WholeEntry {
            entry: INDEX_ENTRY,
            decode: decode_whole::<Self>,
            encode: codec::encode_record::<Self>,
        })
    }
}

/// What to do when a schema binds one entry name twice at the same depth.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConflictPolicy {
    /// Keep the binding declared first.
    #[default]
    FirstDeclared,
    /// Refuse to decode into the shape.
    Reject,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodeOptions {
    /// Upper bound for a single entry payload, in bytes.
    pub max_entry_size: Option<u64>,
    pub conflict_policy: ConflictPolicy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DispatchState {
    AwaitingEntry,
    HaveEntry,
    Done,
}

/// Repository data decoder.
pub struct Decoder<R> {
    reader: R,
    options: DecodeOptions,
}

impl<R: Read + Seek> Decoder<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            options: DecodeOptions::default(),
        }
    }

    pub fn options(mut self, options: DecodeOptions) -> Self {
        self.options = options;
        self
    }

    /// Decodes the whole archive into `dest`.
    ///
    /// Returns the number of bytes consumed from the source. On error the
    /// contents of `dest` are unspecified.
    pub fn decode<D: Destination>(self, dest: &mut D) -> Result<u64> {
        let mut container =
            ContainerReader::new(self.reader)?.max_entry_size(self.options.max_entry_size);

        let route = D::route();
        if let Route::Fields(schema) = &route {
            if self.options.conflict_policy == ConflictPolicy::Reject {
                if let Some(conflict) = schema.conflicts().first() {
                    return Err(RepodataError::SchemaConflict {
                        shape: schema.shape(),
                        entry: conflict.entry.clone(),
                    });
                }
            }
        }

        let mut cursor = container.cursor()?;
        dispatch(&mut cursor, &route, dest)?;
        drop(cursor);

        Ok(container.bytes_read())
    }
}

/// Decodes repository data from `source` into `dest`.
pub fn decode<R: Read + Seek, D: Destination>(source: R, dest: &mut D) -> Result<()> {
    Decoder::new(source).decode(dest)?;
    Ok(())
}

fn dispatch<R: Read, D: Destination>(
    cursor: &mut EntryCursor<'_, R>,
    route: &Route<D>,
    dest: &mut D,
) -> Result<()> {
    let mut state = DispatchState::AwaitingEntry;
    loop {
        let next = match state {
            DispatchState::AwaitingEntry => {
                match cursor.advance()? {
                    Next::Entry(_) => DispatchState::HaveEntry,
                    Next::End => DispatchState::Done,
                }
            }
            DispatchState::HaveEntry => {
                consume(cursor, route, dest)?;
                DispatchState::AwaitingEntry
            }
            DispatchState::Done => return Ok(()),
        };
        trace!(from = ?state, to = ?next, "dispatch");
        state = next;
    }
}

fn consume<R: Read, D: Destination>(
    cursor: &mut EntryCursor<'_, R>,
    route: &Route<D>,
    dest: &mut D,
) -> Result<()> {
    let Some(entry) = cursor.name().map(str::to_owned) else {
        return Ok(());
    };

    match route {
        Route::Fields(schema) => {
            let Some(field) = schema.lookup(&entry) else {
                debug!(entry = %entry, "skipping unbound entry");
                cursor.skip();
                return Ok(());
            };
            let path = field.path();
            trace!(entry = %entry, path = %path, "decoding entry");
            let payload = cursor.read_payload()?;
            field
                .decode_into(dest, &payload)
                .map_err(|fault| fault.into_error(&entry, &path))
        }
        Route::Whole(whole) => {
            if entry != whole.entry {
                debug!(entry = %entry, "skipping unbound entry");
                cursor.skip();
                return Ok(());
            }
            let payload = cursor.read_payload()?;
            (whole.decode)(dest, &payload).map_err(|source| {
                RepodataError::Record {
                    entry,
                    path: WHOLE_PATH.to_string(),
                    source,
                }
            })
        }
    }
}
