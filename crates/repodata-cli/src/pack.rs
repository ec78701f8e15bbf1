use std::{
    fs::File,
    io::{BufWriter, Write},
};

use nu_ansi_term::Color::{Blue, Green};
use repodata::{encode, Compression, ErrorContext, Index, Meta, RepoData};
use repodata_config::config::Config;
use tracing::{debug, info};

use crate::{
    error::CliResult,
    utils::{read_plist, Colored},
};

/// Builds a repository data file from standalone property lists.
pub fn pack(
    config: &Config,
    index: &str,
    output: &str,
    stage: Option<&str>,
    meta: Option<&str>,
    compression: Option<Compression>,
) -> CliResult<()> {
    let data = RepoData {
        index: read_plist::<Index>(index)?,
        stage: stage.map(read_plist::<Index>).transpose()?.unwrap_or_default(),
        meta: meta.map(read_plist::<Meta>).transpose()?,
    };
    let compression = compression.unwrap_or_else(|| config.compression());
    debug!(
        packages = data.index.len(),
        staged = data.stage.len(),
        compression = %compression,
        "packing repository data"
    );

    let file = File::create(output).with_context(|| format!("creating {output}"))?;
    let mut writer = encode(BufWriter::new(file), &data, compression)?;
    writer
        .flush()
        .with_context(|| format!("writing {output}"))?;

    info!(
        output = output,
        packages = data.index.len(),
        "{} {} ({} packages, {})",
        Colored(Green, "Packed"),
        Colored(Blue, output),
        data.index.len(),
        compression
    );
    Ok(())
}
