//! Breed reference lookup with a fixed fallback when the external source is
//! unreachable.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

const DEFAULT_BREED_API_BASE: &str = "https://api.thecatapi.com/v1";

/// Names offered when the external breed catalog cannot be reached.
pub const FALLBACK_BREEDS: [&str; 12] = [
    "Abyssinian",
    "American Bobtail",
    "American Curl",
    "American Shorthair",
    "Bengal",
    "British Shorthair",
    "Maine Coon",
    "Persian",
    "Ragdoll",
    "Russian Blue",
    "Siamese",
    "Sphynx",
];

#[async_trait]
pub trait BreedSource: Send + Sync {
    async fn list_breed_names(&self) -> Result<Vec<String>>;
}

#[derive(Debug, Deserialize)]
struct BreedRecord {
    name: String,
}

/// Best-effort client for the public breed catalog. No authentication, no
/// caching, no invalidation.
pub struct CatApiBreedSource {
    http: Client,
    base_url: String,
}

impl CatApiBreedSource {
    pub fn new() -> Self {
        Self::with_base_url(DEFAULT_BREED_API_BASE)
    }

    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            http: Client::new(),
            base_url,
        }
    }
}

impl Default for CatApiBreedSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BreedSource for CatApiBreedSource {
    async fn list_breed_names(&self) -> Result<Vec<String>> {
        let breeds: Vec<BreedRecord> = self
            .http
            .get(format!("{}/breeds", self.base_url))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        Ok(breeds.into_iter().map(|breed| breed.name).collect())
    }
}

/// One-shot resolution of the offerable breed set. Every failure mode
/// degrades to [`FALLBACK_BREEDS`]; degradation is logged, never surfaced to
/// the user.
pub async fn resolve_breed_options(source: &dyn BreedSource) -> Vec<String> {
    match source.list_breed_names().await {
        Ok(names) => names,
        Err(err) => {
            warn!("breeds: external breed list unavailable, using fallback: {err}");
            FALLBACK_BREEDS
                .iter()
                .map(|name| (*name).to_string())
                .collect()
        }
    }
}

#[cfg(test)]
#[path = "tests/breeds_tests.rs"]
mod tests;
