use std::path::PathBuf;

use anyhow::Context;

use storefront_api::{SeedDocument, Storefront};
use storefront_infra::StorefrontConfig;

/// Load a seed document (first argument, else `STOREFRONT_SEED_FILE`), apply it
/// to a fresh store and print what was inserted.
fn main() -> anyhow::Result<()> {
    storefront_observability::init();

    let config = StorefrontConfig::from_env();
    let path = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .or_else(|| config.seed_file.clone())
        .context("no seed document: pass a path or set STOREFRONT_SEED_FILE")?;

    let document = SeedDocument::load(&path)
        .with_context(|| format!("loading seed document {}", path.display()))?;

    let storefront = Storefront::in_memory(config);
    let report = storefront.seed(&document)?;
    tracing::info!(path = %path.display(), "seeding finished");

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
