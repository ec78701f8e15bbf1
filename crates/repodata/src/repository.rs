//! Repository data shapes.
//!
//! [`RepoData`] is the decoded form of a repository's `<arch>-repodata`
//! file: the package index, the optional staging index and the legacy
//! signing key metadata.

use std::{
    collections::BTreeMap,
    io::{Read, Seek},
};

use serde::{Deserialize, Serialize};

use crate::{
    decode::{Decoder, DecodeOptions, Destination, Route},
    error::Result,
    schema::{SchemaBuilder, Shape},
};

/// Entry holding the package index.
pub const INDEX_ENTRY: &str = "index.plist";

/// Entry holding the staged packages.
pub const STAGE_ENTRY: &str = "stage.plist";

/// Entry holding the legacy signing key metadata.
pub const META_ENTRY: &str = "index-meta.plist";

/// A package record as stored in a repository index.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Package {
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub alternatives: BTreeMap<String, Vec<String>>,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub architecture: String,

    #[serde(rename = "build-date", skip_serializing_if = "String::is_empty")]
    pub build_date: String,

    #[serde(rename = "build-options", skip_serializing_if = "String::is_empty")]
    pub build_options: String,

    #[serde(rename = "conf_files", skip_serializing_if = "Vec::is_empty")]
    pub conf_files: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub conflicts: Vec<String>,

    #[serde(rename = "filename-sha256", skip_serializing_if = "String::is_empty")]
    pub filename_sha256: String,

    #[serde(rename = "filename-size")]
    pub filename_size: i64,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub homepage: String,

    #[serde(rename = "installed_size")]
    pub installed_size: i64,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub license: String,

    #[serde(skip_serializing_if = "String::is_empty")]
    pub maintainer: String,

    pub pkgver: String,

    pub preserve: bool,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub replaces: Vec<String>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub reverts: Vec<String>,

    #[serde(rename = "run_depends", skip_serializing_if = "Vec::is_empty")]
    pub run_depends: Vec<String>,

    #[serde(rename = "shlib-provides", skip_serializing_if = "Vec::is_empty")]
    pub shlib_provides: Vec<String>,

    #[serde(rename = "shlib-requires", skip_serializing_if = "Vec::is_empty")]
    pub shlib_requires: Vec<String>,

    #[serde(rename = "short_desc", skip_serializing_if = "String::is_empty")]
    pub short_desc: String,

    #[serde(rename = "source-revisions", skip_serializing_if = "String::is_empty")]
    pub source_revisions: String,

    #[serde(rename = "sourcepkg", skip_serializing_if = "String::is_empty")]
    pub source_pkg: String,
}

/// Legacy RSA signing key descriptor embedded in the repository data.
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Meta {
    /// PEM encoded public key.
    #[serde(rename = "public-key", with = "serde_bytes")]
    pub key: Vec<u8>,

    /// Key size in bits.
    #[serde(rename = "public-key-size")]
    pub size: u16,

    #[serde(rename = "signature-by")]
    pub signed_by: String,
}

/// Package index, mapping package names to packages.
pub type Index = BTreeMap<String, Package>;

/// Decoded repository data.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RepoData {
    pub index: Index,
    /// Staged packages; empty when the repository is not staged.
    pub stage: Index,
    pub meta: Option<Meta>,
}

impl Shape for RepoData {
    fn declare(schema: &mut SchemaBuilder<Self>) {
        schema
            .field(INDEX_ENTRY, "index", |r| &mut r.index, |r| &r.index)
            .field("stage.plist,omitempty", "stage", |r| &mut r.stage, |r| &r.stage)
            .optional(META_ENTRY, "meta", |r| &mut r.meta, |r| &r.meta);
    }
}

impl Destination for RepoData {
    fn route() -> Route<Self> {
        Route::fields()
    }
}

impl RepoData {
    /// Reads repository data from `source`.
    pub fn read<R: Read + Seek>(source: R) -> Result<Self> {
        Self::read_with(source, DecodeOptions::default()).map(|(data, _)| data)
    }

    /// Reads repository data, also returning how many bytes were consumed.
    pub fn read_with<R: Read + Seek>(source: R, options: DecodeOptions) -> Result<(Self, u64)> {
        let mut data = Self::default();
        let read = Decoder::new(source).options(options).decode(&mut data)?;
        Ok((data, read))
    }

    pub fn is_staged(&self) -> bool {
        !self.stage.is_empty()
    }

    /// Looks up a package, preferring the staged version.
    pub fn package(&self, name: &str) -> Option<&Package> {
        self.stage.get(name).or_else(|| self.index.get(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::cached;

    #[test]
    fn test_schema_bindings() {
        let schema = cached::<RepoData>();
        let bindings: Vec<_> = schema
            .fields()
            .iter()
            .map(|f| (f.name(), f.path(), f.omit_empty()))
            .collect();
        assert_eq!(
            bindings,
            vec![
                (INDEX_ENTRY, "index".to_string(), false),
                (STAGE_ENTRY, "stage".to_string(), true),
                (META_ENTRY, "meta".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_package_prefers_stage() {
        let mut data = RepoData::default();
        data.index.insert(
            "foo".into(),
            Package {
                pkgver: "foo-1.0_1".into(),
                ..Default::default()
            },
        );
        assert!(!data.is_staged());
        assert_eq!(data.package("foo").unwrap().pkgver, "foo-1.0_1");

        data.stage.insert(
            "foo".into(),
            Package {
                pkgver: "foo-2.0_1".into(),
                ..Default::default()
            },
        );
        assert!(data.is_staged());
        assert_eq!(data.package("foo").unwrap().pkgver, "foo-2.0_1");
        assert!(data.package("bar").is_none());
    }
}
