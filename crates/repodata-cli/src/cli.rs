use clap::{ArgAction, Parser, Subcommand, ValueHint};
use repodata::Compression;

#[derive(Parser)]
#[command(
    author,
    version,
    about,
    help_template = "{before-help}{name} {version}
{author-with-newline}{about-with-newline}
{usage-heading} {usage}

{all-args}{after-help}",
    arg_required_else_help = true
)]
pub struct Args {
    /// Set output verbosity
    #[arg(short = 'v', long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress outputs
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output as json
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Disable colors in output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Provide custom config file
    #[arg(short, long, global = true, value_hint = ValueHint::FilePath)]
    pub config: Option<String>,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print the effective configuration
    Config,

    /// List the raw entries of a repository data file
    #[command(arg_required_else_help = true)]
    Entries {
        /// Repository data file, or @name of a configured repository
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        source: String,
    },

    /// List packages in the index
    #[command(arg_required_else_help = true)]
    #[clap(name = "list", visible_alias = "ls")]
    List {
        /// Repository data file, or @name of a configured repository
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        source: String,

        /// List staged packages instead of the index
        #[arg(required = false, short, long)]
        stage: bool,
    },

    /// Show a single package record
    #[command(arg_required_else_help = true)]
    #[clap(name = "show", visible_alias = "info")]
    Show {
        /// Repository data file, or @name of a configured repository
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        source: String,

        /// Package name
        #[arg(required = true)]
        package: String,
    },

    /// Show the signing key metadata
    #[command(arg_required_else_help = true)]
    Meta {
        /// Repository data file, or @name of a configured repository
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        source: String,
    },

    /// Build a repository data file from property lists
    #[command(arg_required_else_help = true)]
    Pack {
        /// Package index property list
        #[arg(required = true, value_hint = ValueHint::FilePath)]
        index: String,

        /// Output file
        #[arg(required = true, short, long, value_hint = ValueHint::FilePath)]
        output: String,

        /// Staged packages property list
        #[arg(required = false, short, long, value_hint = ValueHint::FilePath)]
        stage: Option<String>,

        /// Signing key metadata property list
        #[arg(required = false, short, long, value_hint = ValueHint::FilePath)]
        meta: Option<String>,

        /// Compression to use, overriding the configured one
        #[arg(required = false, short = 'C', long, value_parser = parse_compression)]
        compression: Option<Compression>,
    },
}

fn parse_compression(value: &str) -> Result<Compression, String> {
    match value {
        "zstd" => Ok(Compression::Zstd),
        "gzip" => Ok(Compression::Gzip),
        "none" => Ok(Compression::None),
        other => Err(format!("unsupported compression `{other}`, expected zstd, gzip or none")),
    }
}
