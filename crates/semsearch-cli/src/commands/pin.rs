use anyhow::{Context, Result};
use semsearch_core::Config;
use semsearch_pin::{update_requirements_file, SitePackages};

pub fn run_pin(config: &Config) -> Result<()> {
    let manifest = &config.requirements_path;
    log::info!("Pinning {}", manifest.display());

    let installed = SitePackages::discover(&config.python, &config.site_packages)
        .context("Failed to locate installed Python packages")?;
    log::debug!(
        "Resolved {} installed distributions from {} directories",
        installed.len(),
        installed.searched().len()
    );

    let report = update_requirements_file(manifest, &installed)
        .with_context(|| format!("Failed to pin {}", manifest.display()))?;

    println!(
        "✓ {} updated: {} pinned, {} not installed",
        manifest.display(),
        report.pinned().len(),
        report.unresolved().len()
    );
    for name in report.unresolved() {
        println!("  - {} (left unchanged)", name);
    }

    Ok(())
}
