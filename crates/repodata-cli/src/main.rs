use clap::Parser;
use cli::{Args, Commands};
use error::CliResult;
use inspect::{list_entries, show_meta, show_package};
use list::list_packages;
use logging::setup_logging;
use pack::pack;
use repodata_config::config::{config_path, set_config_path, Config};
use tracing::{debug, info};
use utils::set_color;

mod cli;
mod error;
mod inspect;
mod list;
mod logging;
mod pack;
mod utils;

fn handle_cli() -> CliResult<()> {
    let args = Args::parse();

    setup_logging(&args);

    if args.no_color {
        set_color(false);
    }

    if let Some(path) = &args.config {
        set_config_path(path);
    }

    let config = Config::new()?;
    debug!(path = %config_path().display(), "configuration loaded");

    match args.command {
        Commands::Config => {
            info!("# {}", config_path().display());
            info!("{}", config.to_toml()?.trim_end());
        }
        Commands::Entries {
            source,
        } => list_entries(&config, &source)?,
        Commands::List {
            source,
            stage,
        } => list_packages(&config, &source, stage)?,
        Commands::Show {
            source,
            package,
        } => show_package(&config, &source, &package, args.json)?,
        Commands::Meta {
            source,
        } => show_meta(&config, &source, args.json)?,
        Commands::Pack {
            index,
            output,
            stage,
            meta,
            compression,
        } => {
            pack(
                &config,
                &index,
                &output,
                stage.as_deref(),
                meta.as_deref(),
                compression,
            )?
        }
    }

    Ok(())
}

fn main() {
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))
    .ok();

    if let Err(err) = handle_cli() {
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(1);
    }
}
