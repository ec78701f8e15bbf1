use miette::Diagnostic;
use repodata::RepodataError;
use repodata_config::error::ConfigError;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Repodata(#[from] RepodataError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Package not found: {0}")]
    #[diagnostic(
        code(repodata_cli::package_not_found),
        help("Run `repodata list` to see the available packages")
    )]
    PackageNotFound(String),

    #[error("Failed to decode property list `{path}`: {source}")]
    #[diagnostic(code(repodata_cli::plist))]
    PropertyList { path: String, source: plist::Error },

    #[error("JSON serialization error: {0}")]
    #[diagnostic(code(repodata_cli::json))]
    Json(#[from] serde_json::Error),
}

pub type CliResult<T> = std::result::Result<T, CliError>;
