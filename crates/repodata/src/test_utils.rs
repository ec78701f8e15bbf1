use std::io::Write;

/// Builds an in-memory tar archive entry by entry.
pub struct TarFixture {
    builder: tar::Builder<Vec<u8>>,
}

impl Default for TarFixture {
    fn default() -> Self {
        Self {
            builder: tar::Builder::new(Vec::new()),
        }
    }
}

impl TarFixture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entry(mut self, name: &str, data: impl AsRef<[u8]>) -> Self {
        let data = data.as_ref();
        let mut header = tar::Header::new_gnu();
        header.set_size(data.len() as u64);
        header.set_mode(0o644);
        self.builder.append_data(&mut header, name, data).unwrap();
        self
    }

    pub fn finish(self) -> Vec<u8> {
        self.builder.into_inner().unwrap()
    }
}

pub fn zstd(data: &[u8]) -> Vec<u8> {
    ::zstd::encode_all(data, 0).unwrap()
}

pub fn gzip(data: &[u8]) -> Vec<u8> {
    let mut encoder =
        flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    encoder.write_all(data).unwrap();
    encoder.finish().unwrap()
}

pub fn to_plist<T: serde::Serialize>(value: &T) -> Vec<u8> {
    let mut buf = Vec::new();
    plist::to_writer_xml(&mut buf, value).unwrap();
    buf
}
