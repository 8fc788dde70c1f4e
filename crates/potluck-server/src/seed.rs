//! Catalog seeding from JSON files.
//!
//! Startup seeding only fills empty collections; the `import_catalog` binary
//! loads the files into whatever is already there and skips entries that
//! already exist.

use std::{collections::HashSet, path::Path};

use potluck_core::{CoreError, NewIngredient, NewTag, RecipeStore};
use serde::de::DeserializeOwned;

use crate::{error::Result, settings::SeedCfg};

/// Counts of newly inserted catalog entries
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub tags: usize,
    pub ingredients: usize,
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let raw = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&raw)?)
}

/// Loads the configured tag and ingredient files.
///
/// With `only_if_empty` set, a collection that already holds entries is left
/// untouched.
pub async fn load_catalog(
    store: &dyn RecipeStore,
    cfg: &SeedCfg,
    only_if_empty: bool,
) -> Result<SeedReport> {
    let mut report = SeedReport::default();

    if let Some(path) = &cfg.tags_path {
        if only_if_empty && !store.list_tags().await?.is_empty() {
            tracing::info!("Tags already present, skipping seed");
        } else {
            report.tags = load_tags(store, path).await?;
        }
    }

    if let Some(path) = &cfg.ingredients_path {
        if only_if_empty && !store.list_ingredients(None).await?.is_empty() {
            tracing::info!("Ingredients already present, skipping seed");
        } else {
            report.ingredients = load_ingredients(store, path).await?;
        }
    }

    Ok(report)
}

async fn load_tags(store: &dyn RecipeStore, path: &Path) -> Result<usize> {
    let tags: Vec<NewTag> = read_json(path).await?;
    let mut inserted = 0;
    for tag in tags {
        let slug = tag.slug.clone();
        match store.insert_tag(tag.into_tag()).await {
            Ok(_) => inserted += 1,
            Err(CoreError::Conflict(reason)) => {
                tracing::warn!(slug, "skipping tag: {reason}");
            }
            Err(e) => return Err(e.into()),
        }
    }
    tracing::info!("Loaded {inserted} tags from {}", path.display());
    Ok(inserted)
}

async fn load_ingredients(store: &dyn RecipeStore, path: &Path) -> Result<usize> {
    let ingredients: Vec<NewIngredient> = read_json(path).await?;
    let existing = store.list_ingredients(None).await?;
    let mut known: HashSet<(String, String)> = existing
        .into_iter()
        .map(|i| (i.name, i.measurement_unit))
        .collect();

    let mut inserted = 0;
    for ingredient in ingredients {
        let key = (ingredient.name.clone(), ingredient.measurement_unit.clone());
        if !known.insert(key) {
            continue;
        }
        store.insert_ingredient(ingredient.into_ingredient()).await?;
        inserted += 1;
    }
    tracing::info!("Loaded {inserted} ingredients from {}", path.display());
    Ok(inserted)
}
