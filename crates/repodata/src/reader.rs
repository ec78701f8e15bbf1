//! Container reader.
//!
//! Repository data is a tar archive, optionally wrapped in a compression
//! frame. [`ContainerReader`] sniffs the first bytes of the source exactly
//! once, wraps it in the matching streaming decompressor and hands out an
//! [`EntryCursor`] that walks the archive one named entry at a time.

use std::{
    fmt,
    io::{self, Read, Seek, SeekFrom},
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
    },
};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{ErrorContext, RepodataError, Result};

/// Number of bytes inspected when probing for a compression frame.
pub const PROBE_LEN: usize = 4;

/// Magic bytes for Zstandard frames.
pub const ZST_MAGIC_BYTES: [u8; 4] = [0x28, 0xb5, 0x2f, 0xfd];

/// Magic bytes for gzip members using deflate.
pub const GZIP_MAGIC_BYTES: [u8; 3] = [0x1f, 0x8b, 0x08];

/// Leading magic bytes for xz streams.
pub const XZ_MAGIC_BYTES: [u8; 4] = [0xfd, 0x37, 0x7a, 0x58];

/// Magic bytes for LZ4 frames.
pub const LZ4_MAGIC_BYTES: [u8; 4] = [0x04, 0x22, 0x4d, 0x18];

const ARCHIVE_FORMAT: &str = "tar";

/// Upper bound on buffer space reserved up front from a header's declared size.
const MAX_PREALLOC: u64 = 1 << 20;

/// Compression framing around the archive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    /// Plain, uncompressed archive.
    #[default]
    None,
    Zstd,
    Gzip,
    /// Recognized, but never decompressed.
    Xz,
    /// Recognized, but never decompressed.
    Lz4,
}

impl Compression {
    /// Identifies the compression frame from the leading bytes of a stream.
    ///
    /// Prefixes shorter than a signature never match it.
    pub fn detect(prefix: &[u8]) -> Self {
        if prefix.starts_with(&ZST_MAGIC_BYTES) {
            Compression::Zstd
        } else if prefix.starts_with(&GZIP_MAGIC_BYTES) {
            Compression::Gzip
        } else if prefix.starts_with(&XZ_MAGIC_BYTES) {
            Compression::Xz
        } else if prefix.starts_with(&LZ4_MAGIC_BYTES) {
            Compression::Lz4
        } else {
            Compression::None
        }
    }

    /// Whether a streaming decompressor is compiled in for this frame.
    pub fn is_supported(self) -> bool {
        match self {
            Compression::None => true,
            Compression::Zstd => cfg!(feature = "zstd"),
            Compression::Gzip => cfg!(feature = "gzip"),
            Compression::Xz | Compression::Lz4 => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Compression::None => "none",
            Compression::Zstd => "zstd",
            Compression::Gzip => "gzip",
            Compression::Xz => "xz",
            Compression::Lz4 => "lz4",
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reader wrapper that counts the bytes pulled from the underlying source.
struct CountingReader<R> {
    inner: R,
    count: Arc<AtomicU64>,
}

impl<R: Read> Read for CountingReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        self.count.fetch_add(n as u64, Ordering::Relaxed);
        Ok(n)
    }
}

enum Stream<R: Read> {
    Raw(CountingReader<R>),
    #[cfg(feature = "zstd")]
    Zstd(zstd::stream::read::Decoder<'static, io::BufReader<CountingReader<R>>>),
    #[cfg(feature = "gzip")]
    Gzip(flate2::read::GzDecoder<CountingReader<R>>),
}

impl<R: Read> Read for Stream<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            Stream::Raw(r) => r.read(buf),
            #[cfg(feature = "zstd")]
            Stream::Zstd(r) => r.read(buf),
            #[cfg(feature = "gzip")]
            Stream::Gzip(r) => r.read(buf),
        }
    }
}

/// Reads up to `buf.len()` bytes, stopping early only at end of stream.
fn read_signature<R: Read>(source: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match source.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}

/// Peeks at the start of `source` and rewinds it to where it was.
pub fn probe<R: Read + Seek>(source: &mut R) -> Result<Compression> {
    let start = source
        .stream_position()
        .with_context(|| "querying source position".to_string())?;
    let mut magic = [0u8; PROBE_LEN];
    let n = read_signature(source, &mut magic)
        .with_context(|| "reading compression signature".to_string())?;
    source
        .seek(SeekFrom::Start(start))
        .with_context(|| "rewinding source after probe".to_string())?;
    Ok(Compression::detect(&magic[..n]))
}

/// Result of advancing an [`EntryCursor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Next {
    /// A new entry is selected; its name is returned.
    Entry(String),
    /// The archive is exhausted.
    End,
}

/// An archive source with its compression frame resolved.
///
/// The reader owns the decompressor for its whole lifetime; dropping it
/// releases the decompressor and the source.
pub struct ContainerReader<R: Read> {
    archive: tar::Archive<Stream<R>>,
    compression: Compression,
    count: Arc<AtomicU64>,
    max_entry_size: Option<u64>,
}

impl<R: Read + Seek> ContainerReader<R> {
    /// Probes `source` for a compression frame and wraps it accordingly.
    ///
    /// # Errors
    ///
    /// * [`RepodataError::IoError`] if the probe or the rewind fails.
    /// * [`RepodataError::UnsupportedCompression`] if the signature is known
    ///   but no decompressor is available for it.
    pub fn new(mut source: R) -> Result<Self> {
        let compression = probe(&mut source)?;
        debug!(compression = %compression, "probed repository data");

        let count = Arc::new(AtomicU64::new(0));
        let counted = CountingReader {
            inner: source,
            count: Arc::clone(&count),
        };

        let stream = match compression {
            Compression::None => Stream::Raw(counted),
            #[cfg(feature = "zstd")]
            Compression::Zstd => {
                Stream::Zstd(
                    zstd::stream::read::Decoder::new(counted)
                        .with_context(|| "creating zstd decoder".to_string())?,
                )
            }
            #[cfg(feature = "gzip")]
            Compression::Gzip => Stream::Gzip(flate2::read::GzDecoder::new(counted)),
            other => return Err(RepodataError::UnsupportedCompression(other)),
        };

        Ok(Self {
            archive: tar::Archive::new(stream),
            compression,
            count,
            max_entry_size: None,
        })
    }
}

impl<R: Read> ContainerReader<R> {
    /// Caps the number of bytes a single entry payload may hold.
    pub fn max_entry_size(mut self, limit: Option<u64>) -> Self {
        self.max_entry_size = limit;
        self
    }

    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Bytes consumed from the underlying source so far.
    pub fn bytes_read(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Starts walking the archive entries.
    pub fn cursor(&mut self) -> Result<EntryCursor<'_, R>> {
        let limit = self.max_entry_size;
        let entries = self.archive.entries().map_err(|source| {
            RepodataError::Archive {
                format: ARCHIVE_FORMAT,
                source,
            }
        })?;
        Ok(EntryCursor {
            entries,
            current: None,
            name: String::new(),
            limit,
        })
    }
}

/// Sequential cursor over the named entries of an archive.
///
/// The selected entry stays valid until the next call to
/// [`advance`](EntryCursor::advance).
pub struct EntryCursor<'a, R: Read> {
    entries: tar::Entries<'a, Stream<R>>,
    current: Option<tar::Entry<'a, Stream<R>>>,
    name: String,
    limit: Option<u64>,
}

impl<R: Read> EntryCursor<'_, R> {
    /// Moves to the next entry, discarding whatever is left of the current one.
    pub fn advance(&mut self) -> Result<Next> {
        self.current = None;
        match self.entries.next() {
            None => {
                trace!("end of archive");
                Ok(Next::End)
            }
            Some(Err(source)) => {
                Err(RepodataError::Archive {
                    format: ARCHIVE_FORMAT,
                    source,
                })
            }
            Some(Ok(entry)) => {
                self.name = String::from_utf8_lossy(&entry.path_bytes()).into_owned();
                trace!(entry = %self.name, size = entry.size(), "selected entry");
                self.current = Some(entry);
                Ok(Next::Entry(self.name.clone()))
            }
        }
    }

    /// Name of the selected entry, if any.
    pub fn name(&self) -> Option<&str> {
        self.current.as_ref().map(|_| self.name.as_str())
    }

    /// Declared payload size of the selected entry.
    pub fn size(&self) -> Option<u64> {
        self.current.as_ref().map(|entry| entry.size())
    }

    /// Reads the full payload of the selected entry.
    ///
    /// Returns an empty buffer if no entry is selected.
    pub fn read_payload(&mut self) -> Result<Vec<u8>> {
        let Some(entry) = self.current.as_mut() else {
            return Ok(Vec::new());
        };

        let declared = entry.size();
        let mut buf = Vec::new();
        match self.limit {
            Some(limit) => {
                if declared > limit {
                    return Err(RepodataError::EntryTooLarge {
                        entry: self.name.clone(),
                        limit,
                    });
                }
                buf.reserve(declared.min(MAX_PREALLOC) as usize);
                entry
                    .by_ref()
                    .take(limit.saturating_add(1))
                    .read_to_end(&mut buf)
                    .map_err(|source| {
                        RepodataError::Archive {
                            format: ARCHIVE_FORMAT,
                            source,
                        }
                    })?;
                if buf.len() as u64 > limit {
                    return Err(RepodataError::EntryTooLarge {
                        entry: self.name.clone(),
                        limit,
                    });
                }
            }
            None => {
                entry.read_to_end(&mut buf).map_err(|source| {
                    RepodataError::Archive {
                        format: ARCHIVE_FORMAT,
                        source,
                    }
                })?;
            }
        }
        Ok(buf)
    }

    /// Discards the selected entry without reading it.
    pub fn skip(&mut self) {
        self.current = None;
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::test_utils::{gzip, zstd, TarFixture};

    fn entry_names<R: Read + Seek>(source: R) -> Result<Vec<String>> {
        let mut reader = ContainerReader::new(source)?;
        let mut cursor = reader.cursor()?;
        let mut names = Vec::new();
        while let Next::Entry(name) = cursor.advance()? {
            names.push(name);
        }
        Ok(names)
    }

    #[test]
    fn test_detect() {
        assert_eq!(Compression::detect(&ZST_MAGIC_BYTES), Compression::Zstd);
        assert_eq!(Compression::detect(&[0x1f, 0x8b, 0x08, 0x00]), Compression::Gzip);
        assert_eq!(Compression::detect(&XZ_MAGIC_BYTES), Compression::Xz);
        assert_eq!(Compression::detect(&LZ4_MAGIC_BYTES), Compression::Lz4);
        assert_eq!(Compression::detect(b"inde"), Compression::None);
        assert_eq!(Compression::detect(&ZST_MAGIC_BYTES[..3]), Compression::None);
        assert_eq!(Compression::detect(&[]), Compression::None);
    }

    #[test]
    fn test_probe_rewinds_to_start_position() {
        let mut source = Cursor::new(b"xx\x28\xb5\x2f\xfdrest".to_vec());
        source.set_position(2);
        assert_eq!(probe(&mut source).unwrap(), Compression::Zstd);
        assert_eq!(source.position(), 2);
    }

    #[test]
    fn test_probe_short_source() {
        let mut source = Cursor::new(vec![0x28, 0xb5]);
        assert_eq!(probe(&mut source).unwrap(), Compression::None);
        assert_eq!(source.position(), 0);
    }

    #[test]
    fn test_raw_archive_entries() {
        let tar = TarFixture::new()
            .entry("index.plist", b"a")
            .entry("stage.plist", b"bb")
            .finish();
        let names = entry_names(Cursor::new(tar)).unwrap();
        assert_eq!(names, vec!["index.plist", "stage.plist"]);
    }

    #[test]
    fn test_compressed_archive_entries() {
        let tar = TarFixture::new()
            .entry("index.plist", b"a")
            .entry("index-meta.plist", b"b")
            .finish();

        let reader = ContainerReader::new(Cursor::new(zstd(&tar))).unwrap();
        assert_eq!(reader.compression(), Compression::Zstd);
        drop(reader);

        assert_eq!(
            entry_names(Cursor::new(zstd(&tar))).unwrap(),
            vec!["index.plist", "index-meta.plist"]
        );
        assert_eq!(
            entry_names(Cursor::new(gzip(&tar))).unwrap(),
            vec!["index.plist", "index-meta.plist"]
        );
    }

    #[test]
    fn test_unsupported_compression() {
        let mut data = XZ_MAGIC_BYTES.to_vec();
        data.extend_from_slice(&[0u8; 64]);
        let err = ContainerReader::new(Cursor::new(data)).err().unwrap();
        assert!(matches!(
            err,
            RepodataError::UnsupportedCompression(Compression::Xz)
        ));
    }

    #[test]
    fn test_empty_source_is_empty_archive() {
        assert!(entry_names(Cursor::new(Vec::new())).unwrap().is_empty());
    }

    #[test]
    fn test_truncated_header() {
        let mut tar = TarFixture::new().entry("index.plist", b"payload").finish();
        tar.truncate(100);
        let err = entry_names(Cursor::new(tar)).unwrap_err();
        assert!(matches!(err, RepodataError::Archive { format: "tar", .. }));
    }

    #[test]
    fn test_read_payload_and_skip() {
        let tar = TarFixture::new()
            .entry("a", b"first")
            .entry("b", b"second")
            .entry("c", b"third")
            .finish();
        let mut reader = ContainerReader::new(Cursor::new(tar)).unwrap();
        let mut cursor = reader.cursor().unwrap();

        assert_eq!(cursor.advance().unwrap(), Next::Entry("a".into()));
        assert_eq!(cursor.size(), Some(5));
        cursor.skip();
        assert_eq!(cursor.name(), None);

        assert_eq!(cursor.advance().unwrap(), Next::Entry("b".into()));
        assert_eq!(cursor.read_payload().unwrap(), b"second");

        assert_eq!(cursor.advance().unwrap(), Next::Entry("c".into()));
        assert_eq!(cursor.read_payload().unwrap(), b"third");
        assert_eq!(cursor.advance().unwrap(), Next::End);
    }

    #[test]
    fn test_entry_size_limit() {
        let tar = TarFixture::new().entry("index.plist", b"0123456789").finish();
        let mut reader = ContainerReader::new(Cursor::new(tar))
            .unwrap()
            .max_entry_size(Some(4));
        let mut cursor = reader.cursor().unwrap();
        cursor.advance().unwrap();
        let err = cursor.read_payload().unwrap_err();
        assert!(matches!(err, RepodataError::EntryTooLarge { limit: 4, .. }));
    }

    #[test]
    fn test_unbounded_entry_size_limit() {
        let tar = TarFixture::new().entry("index.plist", b"0123456789").finish();
        let mut reader = ContainerReader::new(Cursor::new(tar))
            .unwrap()
            .max_entry_size(Some(u64::MAX));
        let mut cursor = reader.cursor().unwrap();
        cursor.advance().unwrap();
        assert_eq!(cursor.read_payload().unwrap(), b"0123456789");
    }

    #[test]
    fn test_entry_exactly_at_limit() {
        let tar = TarFixture::new().entry("index.plist", b"0123").finish();
        let mut reader = ContainerReader::new(Cursor::new(tar))
            .unwrap()
            .max_entry_size(Some(4));
        let mut cursor = reader.cursor().unwrap();
        cursor.advance().unwrap();
        assert_eq!(cursor.read_payload().unwrap(), b"0123");
    }

    #[test]
    fn test_bytes_read() {
        let tar = TarFixture::new().entry("index.plist", b"abc").finish();
        let len = tar.len() as u64;
        let mut reader = ContainerReader::new(Cursor::new(tar)).unwrap();
        {
            let mut cursor = reader.cursor().unwrap();
            while let Next::Entry(_) = cursor.advance().unwrap() {}
        }
        assert!(reader.bytes_read() > 0);
        assert!(reader.bytes_read() <= len);
    }
}
