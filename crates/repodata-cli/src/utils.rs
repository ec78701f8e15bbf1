use std::{
    fmt::Display,
    fs::File,
    io::BufReader,
    path::PathBuf,
    sync::{LazyLock, PoisonError, RwLock},
};

use nu_ansi_term::Color;
use repodata::{DecodeOptions, ErrorContext, RepoData};
use repodata_config::config::Config;
use tracing::debug;

use crate::error::{CliError, CliResult};

pub static COLOR: LazyLock<RwLock<bool>> = LazyLock::new(|| RwLock::new(true));

pub fn set_color(enabled: bool) {
    *COLOR.write().unwrap_or_else(PoisonError::into_inner) = enabled;
}

pub struct Colored<T: Display>(pub Color, pub T);

impl<T: Display> Display for Colored<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let color = COLOR.read().unwrap_or_else(PoisonError::into_inner);
        if *color {
            write!(f, "{}", self.0.prefix())?;
            self.1.fmt(f)?;
            write!(f, "{}", self.0.suffix())
        } else {
            self.1.fmt(f)
        }
    }
}

/// Resolves a command line source to a file path.
///
/// `@name` refers to a repository from the configuration, anything else is
/// taken as a path.
pub fn resolve_source(config: &Config, source: &str) -> CliResult<PathBuf> {
    match source.strip_prefix('@') {
        Some(name) => Ok(config.get_repository(name)?.path()),
        None => Ok(PathBuf::from(source)),
    }
}

pub fn open_source(config: &Config, source: &str) -> CliResult<BufReader<File>> {
    let path = resolve_source(config, source)?;
    debug!(path = %path.display(), "opening repository data");
    let file = File::open(&path).with_context(|| format!("opening {}", path.display()))?;
    Ok(BufReader::new(file))
}

pub fn read_repodata(config: &Config, source: &str) -> CliResult<RepoData> {
    let options: DecodeOptions = config.decode_options()?;
    let reader = open_source(config, source)?;
    let (data, read) = RepoData::read_with(reader, options)?;
    debug!(source, bytes = read, "decoded repository data");
    Ok(data)
}

/// Decodes a standalone property list file.
pub fn read_plist<V: serde::de::DeserializeOwned>(path: &str) -> CliResult<V> {
    let payload = std::fs::read(path).with_context(|| format!("reading {path}"))?;
    repodata::codec::decode_record(&payload).map_err(|source| {
        CliError::PropertyList {
            path: path.to_string(),
            source,
        }
    })
}
