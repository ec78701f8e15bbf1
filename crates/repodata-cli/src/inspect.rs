use nu_ansi_term::Color::{Blue, Cyan, Green, Yellow};
use repodata::{ContainerReader, Next, Package};
use repodata_config::{config::Config, size::format_size};
use tracing::{debug, info};

use crate::{
    error::{CliError, CliResult},
    utils::{open_source, read_repodata, Colored},
};

/// Prints every archive entry with its declared size, without decoding.
pub fn list_entries(config: &Config, source: &str) -> CliResult<()> {
    let reader = open_source(config, source)?;
    let mut container = ContainerReader::new(reader)?.max_entry_size(config.max_entry_size()?);
    let compression = container.compression();

    info!(
        compression = %compression,
        "{} {}",
        Colored(Cyan, "Compression:"),
        compression
    );

    let mut count = 0usize;
    {
        let mut cursor = container.cursor()?;
        while let Next::Entry(name) = cursor.advance()? {
            let size = cursor.size().unwrap_or_default();
            info!(
                entry = %name,
                size = size,
                "  {} ({})",
                Colored(Blue, &name),
                format_size(size, 2)
            );
            count += 1;
        }
    }

    debug!(bytes_read = container.bytes_read(), "archive consumed");
    info!(entries = count, "{} entries", Colored(Green, count));
    Ok(())
}

fn print_list(label: &str, values: &[String]) {
    if values.is_empty() {
        return;
    }
    info!("{}", Colored(Cyan, label));
    for value in values {
        info!("  {value}");
    }
}

fn print_field(label: &str, value: &str) {
    if !value.is_empty() {
        info!("{} {}", Colored(Cyan, label), value);
    }
}

fn print_package(pkg: &Package) {
    info!("{}", Colored(Blue, &pkg.pkgver));
    print_field("Architecture:", &pkg.architecture);
    print_field("Description:", &pkg.short_desc);
    print_field("Homepage:", &pkg.homepage);
    print_field("License:", &pkg.license);
    print_field("Maintainer:", &pkg.maintainer);
    print_field("Build date:", &pkg.build_date);
    print_field("Source package:", &pkg.source_pkg);
    print_field("SHA256:", &pkg.filename_sha256);
    info!(
        "{} {} ({} installed)",
        Colored(Cyan, "Size:"),
        format_size(pkg.filename_size.max(0) as u64, 2),
        format_size(pkg.installed_size.max(0) as u64, 2)
    );
    if pkg.preserve {
        info!("{}", Colored(Yellow, "Preserved on update"));
    }
    print_list("Depends:", &pkg.run_depends);
    print_list("Conflicts:", &pkg.conflicts);
    print_list("Replaces:", &pkg.replaces);
    print_list("Provides shlibs:", &pkg.shlib_provides);
    print_list("Requires shlibs:", &pkg.shlib_requires);
    print_list("Config files:", &pkg.conf_files);
    for (group, alternatives) in &pkg.alternatives {
        print_list(&format!("Alternatives ({group}):"), alternatives);
    }
}

/// Prints one package record, preferring a staged version over the index.
pub fn show_package(config: &Config, source: &str, name: &str, json: bool) -> CliResult<()> {
    let data = read_repodata(config, source)?;
    let pkg = data
        .package(name)
        .ok_or_else(|| CliError::PackageNotFound(name.to_string()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(pkg)?);
    } else {
        if data.stage.contains_key(name) {
            info!("{}", Colored(Yellow, "[staged]"));
        }
        print_package(pkg);
    }
    Ok(())
}

/// Prints the legacy signing key metadata.
pub fn show_meta(config: &Config, source: &str, json: bool) -> CliResult<()> {
    let data = read_repodata(config, source)?;
    let Some(meta) = data.meta else {
        info!("No signing key metadata in {}", source);
        return Ok(());
    };

    let key = String::from_utf8_lossy(&meta.key);
    if json {
        let value = serde_json::json!({
            "signed_by": meta.signed_by,
            "key_size": meta.size,
            "public_key": key,
        });
        println!("{}", serde_json::to_string_pretty(&value)?);
    } else {
        print_field("Signed by:", &meta.signed_by);
        info!("{} {} bits", Colored(Cyan, "Key size:"), meta.size);
        info!("{}", key.trim_end());
    }
    Ok(())
}
