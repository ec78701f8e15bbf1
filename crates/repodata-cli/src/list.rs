use nu_ansi_term::Color::{Blue, Cyan, Green};
use repodata_config::config::Config;
use tracing::info;

use crate::{
    error::CliResult,
    utils::{read_repodata, Colored},
};

pub fn list_packages(config: &Config, source: &str, stage: bool) -> CliResult<()> {
    let data = read_repodata(config, source)?;
    let (label, packages) = if stage {
        ("staged", &data.stage)
    } else {
        ("indexed", &data.index)
    };

    for (name, pkg) in packages {
        info!(
            pkg_name = %name,
            pkgver = %pkg.pkgver,
            architecture = %pkg.architecture,
            short_desc = %pkg.short_desc,
            "{} [{}] - {}",
            Colored(Blue, &pkg.pkgver),
            Colored(Cyan, &pkg.architecture),
            pkg.short_desc
        );
    }

    info!(
        count = packages.len(),
        "{} {} packages",
        Colored(Green, packages.len()),
        label
    );
    Ok(())
}
