//! CLI command implementations

use crate::output::{format_videos, OutputFormat};
use anyhow::Context;
use retrovue_core::{CatalogProvider, PlayerConfig, StaticCatalog};
use std::path::Path;

/// Load the catalog dataset
pub fn load_catalog(path: &Path) -> anyhow::Result<StaticCatalog> {
    StaticCatalog::load(path)
        .with_context(|| format!("failed to load catalog from {}", path.display()))
}

/// Load the player configuration, falling back to defaults
pub fn load_config(path: Option<&Path>) -> anyhow::Result<PlayerConfig> {
    match path {
        Some(path) => PlayerConfig::load(path)
            .with_context(|| format!("failed to load config from {}", path.display())),
        None => Ok(PlayerConfig::default()),
    }
}

/// List the catalog grouped by category
pub fn catalog(catalog: &StaticCatalog, format: &str) -> anyhow::Result<()> {
    match OutputFormat::from(format) {
        OutputFormat::Text => {
            println!("Catalog: {} videos", catalog.len());
            for group in catalog.grouped() {
                println!("\n{} ({})", group.name, group.videos.len());
                println!("{}", format_videos(&group.videos, format));
            }
        }
        _ => println!("{}", format_videos(catalog.list_all(), format)),
    }
    Ok(())
}

/// Show the related videos for `id`
pub fn related(catalog: &StaticCatalog, id: &str, format: &str) -> anyhow::Result<()> {
    let video = catalog.get(id)?;
    let related = catalog.related_to(video);

    if matches!(OutputFormat::from(format), OutputFormat::Text) {
        println!("Related to {}:", video);
        if related.is_empty() {
            println!("  (nothing else in {})", video.category);
            return Ok(());
        }
    }
    println!("{}", format_videos(&related, format));
    Ok(())
}

/// Show the autoplay successor of `id`
pub fn next(catalog: &StaticCatalog, id: &str, format: &str) -> anyhow::Result<()> {
    let video = catalog.get(id)?;
    let next = catalog.next_in_category(video);

    match (OutputFormat::from(format), next) {
        (OutputFormat::Text, Some(next)) => println!("Up next after {}: {}", video, next),
        (OutputFormat::Text, None) => println!("No autoplay after {}", video),
        (_, next) => println!("{}", format_videos(next.as_ref(), format)),
    }
    Ok(())
}
