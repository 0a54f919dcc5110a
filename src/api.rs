// 🐱 Cat API Client
// Wire payloads and HTTP calls for the breed-and-image lookup service.
// Two read-only operations: the breed catalog (once per session) and a
// random image search scoped to one breed (once per draw attempt).

use anyhow::{bail, Context, Result};
use reqwest::blocking::{Client, RequestBuilder};
use serde::{Deserialize, Serialize};

use crate::config::Config;

// ============================================================================
// WIRE PAYLOADS
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiWeight {
    /// "min - max" in pounds
    #[serde(default)]
    pub imperial: String,
    /// "min - max" in kilograms
    #[serde(default)]
    pub metric: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiBreed {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub origin: String,
    /// "min - max" in years
    #[serde(default)]
    pub life_span: String,
    pub weight: ApiWeight,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiImage {
    pub id: Option<String>,
    pub url: String,
    /// Empty for images the service has no breed metadata for
    #[serde(default)]
    pub breeds: Vec<ApiBreed>,
}

// ============================================================================
// CLIENT
// ============================================================================

pub struct CatApiClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl CatApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("veni-vici/", env!("CARGO_PKG_VERSION")))
            .timeout(config.request_timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(CatApiClient {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    fn get(&self, path: &str) -> RequestBuilder {
        let mut request = self.client.get(format!("{}{}", self.base_url, path));
        if let Some(key) = &self.api_key {
            request = request.header("x-api-key", key);
        }
        request
    }

    /// Fetch the full breed catalog. Called exactly once per session.
    pub fn list_breeds(&self) -> Result<Vec<ApiBreed>> {
        let breeds: Vec<ApiBreed> = self
            .get("/breeds")
            .send()
            .context("Breed list request failed")?
            .error_for_status()
            .context("Breed list request rejected")?
            .json()
            .context("Breed list payload did not parse")?;
        Ok(breeds)
    }

    /// Fetch one random image+metadata record for the given breed.
    /// An empty result set or a result without breed metadata is an error,
    /// not an empty success: the caller needs all four attributes.
    pub fn search_image(&self, breed_id: &str) -> Result<ApiImage> {
        let mut images: Vec<ApiImage> = self
            .get("/images/search")
            .query(&[("breed_ids", breed_id)])
            .send()
            .with_context(|| format!("Image search for breed '{}' failed", breed_id))?
            .error_for_status()
            .with_context(|| format!("Image search for breed '{}' rejected", breed_id))?
            .json()
            .with_context(|| format!("Image search payload for breed '{}' did not parse", breed_id))?;

        if images.is_empty() {
            bail!("Image search for breed '{}' returned no results", breed_id);
        }

        let image = images.remove(0);
        if image.breeds.is_empty() {
            bail!("Image search for breed '{}' returned no breed metadata", breed_id);
        }

        Ok(image)
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breed_payload_parses() {
        let json = r#"{
            "id": "pers",
            "name": "Persian",
            "origin": "Iran (Persia)",
            "life_span": "14 - 15",
            "weight": { "imperial": "7 - 12", "metric": "3 - 5" },
            "temperament": "Affectionate, loyal"
        }"#;

        let breed: ApiBreed = serde_json::from_str(json).unwrap();
        assert_eq!(breed.id, "pers");
        assert_eq!(breed.name, "Persian");
        assert_eq!(breed.weight.metric, "3 - 5");
        assert_eq!(breed.life_span, "14 - 15");
    }

    #[test]
    fn test_breed_payload_missing_optional_fields() {
        let json = r#"{
            "id": "x",
            "name": "Mystery",
            "weight": { "metric": "3 - 5" }
        }"#;

        let breed: ApiBreed = serde_json::from_str(json).unwrap();
        assert_eq!(breed.origin, "");
        assert_eq!(breed.life_span, "");
        assert_eq!(breed.weight.imperial, "");
    }

    #[test]
    fn test_image_payload_without_breeds() {
        let json = r#"[{ "id": "abc", "url": "https://cdn2.thecatapi.com/images/abc.jpg" }]"#;

        let images: Vec<ApiImage> = serde_json::from_str(json).unwrap();
        assert_eq!(images.len(), 1);
        assert!(images[0].breeds.is_empty(), "breeds should default to empty");
    }

    #[test]
    fn test_image_payload_with_breeds() {
        let json = r#"[{
            "id": "abc",
            "url": "https://cdn2.thecatapi.com/images/abc.jpg",
            "breeds": [{
                "id": "beng",
                "name": "Bengal",
                "origin": "United States",
                "life_span": "12 - 15",
                "weight": { "imperial": "6 - 12", "metric": "3 - 7" }
            }]
        }]"#;

        let images: Vec<ApiImage> = serde_json::from_str(json).unwrap();
        assert_eq!(images[0].breeds[0].name, "Bengal");
        assert_eq!(images[0].url, "https://cdn2.thecatapi.com/images/abc.jpg");
    }
}
