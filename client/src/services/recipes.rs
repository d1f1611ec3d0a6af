//! Recipe catalogue service
//!
//! Catalogue files are JSON arrays in a storage bucket. Each file is
//! downloaded once and then served from a flat cache directory.

use crate::config::RecipesConfig;
use crate::error::ClientResult;
use crate::supabase::SupabaseClient;
use cookcraft_shared::models::{MealType, Recipe};
use futures::future::join_all;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};
use uuid::Uuid;

/// File of culturally specific meals merged into every category
pub const CULTURAL_MEALS_FILE: &str = "cultural_meals_enriched.json";

/// Recipe catalogue with cache-or-download loading
#[derive(Clone)]
pub struct RecipeService {
    client: SupabaseClient,
    bucket: String,
    cache_dir: PathBuf,
}

impl RecipeService {
    pub fn new(client: SupabaseClient, config: &RecipesConfig) -> Self {
        Self {
            client,
            bucket: config.bucket.clone(),
            cache_dir: config.cache_dir.clone(),
        }
    }

    pub fn cache_dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Load one catalogue file, from the cache when present
    pub async fn load_file(&self, file: &str) -> ClientResult<Vec<Recipe>> {
        let cached = self.cache_dir.join(file);

        let data = if fs::try_exists(&cached).await.unwrap_or(false) {
            debug!(file, "Recipe cache hit");
            fs::read(&cached).await?
        } else {
            debug!(file, bucket = %self.bucket, "Recipe cache miss, downloading");
            let data = self.client.download(&self.bucket, file).await?;
            if let Err(err) = self.write_cache(&cached, &data).await {
                warn!(file, error = %err, "Failed to cache recipe file");
            }
            data
        };

        Ok(serde_json::from_slice(&data)?)
    }

    /// Write via a temp file and rename so readers never see partial data
    async fn write_cache(&self, path: &Path, data: &[u8]) -> std::io::Result<()> {
        fs::create_dir_all(&self.cache_dir).await?;
        let tmp = self.cache_dir.join(format!(".{}.tmp", Uuid::new_v4()));
        fs::write(&tmp, data).await?;
        if let Err(err) = fs::rename(&tmp, path).await {
            let _ = fs::remove_file(&tmp).await;
            return Err(err);
        }
        Ok(())
    }

    /// Recipes for a category screen, restricted to one meal type.
    ///
    /// Cultural meals come first; category recipes are tagged with
    /// `category_name`; duplicates by name are dropped.
    pub async fn fetch_category_strict(
        &self,
        category_file: &str,
        category_name: &str,
        meal_type: MealType,
    ) -> ClientResult<Vec<Recipe>> {
        let cultural = self.load_file(CULTURAL_MEALS_FILE).await?;
        let category = self.load_file(category_file).await?;

        let cultural = cultural.into_iter().filter(|r| r.matches_meal_type(meal_type));
        let category = category
            .into_iter()
            .filter(|r| r.matches_meal_type(meal_type))
            .map(|mut r| {
                r.category = Some(category_name.to_string());
                r
            });

        Ok(dedup_by_name(cultural.chain(category)))
    }

    /// Every catalogue file, loaded concurrently; failing files are skipped
    pub async fn fetch_all(&self) -> Vec<Recipe> {
        let files: Vec<String> = std::iter::once(CULTURAL_MEALS_FILE.to_string())
            .chain(MealType::ALL.iter().map(MealType::catalogue_file))
            .collect();

        let loads = files.iter().map(|file| async move {
            match self.load_file(file).await {
                Ok(recipes) => recipes,
                Err(err) => {
                    warn!(file = %file, error = %err, "Skipped recipe file");
                    Vec::new()
                }
            }
        });

        let batches = join_all(loads).await;
        dedup_by_name(batches.into_iter().flatten())
    }
}

/// Keep the first recipe for each case-insensitive name
pub fn dedup_by_name(recipes: impl IntoIterator<Item = Recipe>) -> Vec<Recipe> {
    let mut seen = HashSet::new();
    recipes
        .into_iter()
        .filter(|r| seen.insert(r.dedup_key()))
        .collect()
}

/// Case-insensitive match on name or any ingredient
pub fn search<'a>(recipes: &'a [Recipe], query: &str) -> Vec<&'a Recipe> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return recipes.iter().collect();
    }
    recipes
        .iter()
        .filter(|r| {
            r.name.to_lowercase().contains(&needle)
                || r.ingredients.iter().any(|i| i.to_lowercase().contains(&needle))
        })
        .collect()
}
