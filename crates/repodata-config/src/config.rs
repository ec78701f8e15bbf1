use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
    sync::{LazyLock, PoisonError, RwLock},
};

use repodata::{Compression, ConflictPolicy, DecodeOptions};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    error::{ConfigError, Result},
    size::parse_size,
};

/// Size setting, either a plain byte count or a human readable string.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum SizeValue {
    Bytes(u64),
    Human(String),
}

impl SizeValue {
    pub fn bytes(&self) -> Result<u64> {
        match self {
            SizeValue::Bytes(n) => Ok(*n),
            SizeValue::Human(s) => parse_size(s),
        }
    }
}

/// A named local repository data file.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Repository {
    /// Name used to refer to the repository as `@name`.
    pub name: String,

    /// Path to the repository data file, e.g. `x86_64-repodata`.
    /// A leading `~/` is expanded to the home directory.
    pub path: String,
}

impl Repository {
    pub fn path(&self) -> PathBuf {
        expand_home(&self.path)
    }
}

/// Application's configuration
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Largest entry payload accepted while decoding.
    /// Default: unlimited
    pub max_entry_size: Option<SizeValue>,

    /// How ambiguous same-depth bindings are treated.
    /// Default: first-declared
    pub conflict_policy: Option<ConflictPolicy>,

    /// Compression used when packing repository data.
    /// Default: zstd
    pub compression: Option<Compression>,

    /// List of configured repositories.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub repositories: Vec<Repository>,
}

pub static CONFIG_PATH: LazyLock<RwLock<PathBuf>> = LazyLock::new(|| {
    RwLock::new(match std::env::var("REPODATA_CONFIG") {
        Ok(path_str) => PathBuf::from(path_str),
        Err(_) => xdg_config_home().join("repodata").join("config.toml"),
    })
});

fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

fn xdg_config_home() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None => PathBuf::from(path),
    }
}

/// Path the configuration is loaded from.
pub fn config_path() -> PathBuf {
    CONFIG_PATH
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
}

/// Overrides the configuration path, e.g. from a command line flag.
pub fn set_config_path<P: Into<PathBuf>>(path: P) {
    let mut guard = CONFIG_PATH.write().unwrap_or_else(PoisonError::into_inner);
    *guard = path.into();
}

impl Config {
    /// Loads the configuration from [`config_path`].
    /// If the configuration file is not found, the defaults are used.
    pub fn new() -> Result<Self> {
        Self::load(&config_path())
    }

    pub fn load(path: &Path) -> Result<Self> {
        let config = match fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "config file not found, using defaults");
                Self::default()
            }
            Err(err) => return Err(ConfigError::IoError(err)),
        };
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Config = toml::from_str(content)?;
        config.resolve()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn resolve(&mut self) -> Result<()> {
        if let Some(size) = &self.max_entry_size {
            size.bytes()?;
        }

        if let Some(compression) = self.compression {
            if !compression.is_supported() {
                return Err(ConfigError::UnsupportedCompression(compression));
            }
        }

        let mut seen_repos = HashSet::new();
        for repo in &self.repositories {
            if repo.name.trim().is_empty() {
                return Err(ConfigError::EmptyRepositoryName);
            }
            if !seen_repos.insert(repo.name.as_str()) {
                return Err(ConfigError::DuplicateRepositoryName(repo.name.clone()));
            }
        }

        Ok(())
    }

    pub fn max_entry_size(&self) -> Result<Option<u64>> {
        self.max_entry_size.as_ref().map(SizeValue::bytes).transpose()
    }

    pub fn conflict_policy(&self) -> ConflictPolicy {
        self.conflict_policy.unwrap_or_default()
    }

    pub fn compression(&self) -> Compression {
        self.compression.unwrap_or(Compression::Zstd)
    }

    pub fn decode_options(&self) -> Result<DecodeOptions> {
        Ok(DecodeOptions {
            max_entry_size: self.max_entry_size()?,
            conflict_policy: self.conflict_policy(),
        })
    }

    pub fn get_repository(&self, name: &str) -> Result<&Repository> {
        self.repositories
            .iter()
            .find(|repo| repo.name == name)
            .ok_or_else(|| ConfigError::MissingRepository(name.to_string()))
    }
}
