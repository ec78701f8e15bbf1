use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum ConfigError {
    #[error("TOML serialization error: {0}")]
    #[diagnostic(
        code(repodata_config::toml_serialize),
        help("Check your configuration structure for invalid values")
    )]
    TomlSerError(#[from] toml::ser::Error),

    #[error("TOML deserialization error: {0}")]
    #[diagnostic(
        code(repodata_config::toml_deserialize),
        help("Check your config.toml syntax and structure")
    )]
    TomlDeError(#[from] toml::de::Error),

    #[error("Invalid size `{input}`: {reason}")]
    #[diagnostic(
        code(repodata_config::invalid_size),
        help("Use a plain byte count or a value like `64MiB` or `512KB`")
    )]
    InvalidSize { input: String, reason: String },

    #[error("Unsupported compression for packing: {0}")]
    #[diagnostic(
        code(repodata_config::unsupported_compression),
        help("Use one of `zstd`, `gzip` or `none`")
    )]
    UnsupportedCompression(repodata::Compression),

    #[error("Repository name cannot be empty")]
    #[diagnostic(
        code(repodata_config::empty_repo_name),
        help("Give every [[repositories]] entry a name")
    )]
    EmptyRepositoryName,

    #[error("Duplicate repository name: {0}")]
    #[diagnostic(
        code(repodata_config::duplicate_repo),
        help("Each repository must have a unique name")
    )]
    DuplicateRepositoryName(String),

    #[error("Missing repository: {0}")]
    #[diagnostic(
        code(repodata_config::missing_repo),
        help("Add the repository to your configuration or use a file path")
    )]
    MissingRepository(String),

    #[error("IO error: {0}")]
    #[diagnostic(code(repodata_config::io))]
    IoError(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ConfigError>;
