// 📇 Cat Record
// The display record built from one successful fetch. Created fresh per
// accepted draw, never mutated afterwards.

use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::ApiImage;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatRecord {
    pub image_url: String,
    pub breed: String,
    pub origin: String,
    /// "min - max", years
    pub lifespan: String,
    /// "min - max", kilograms
    pub weight: String,
    pub fetched_at: DateTime<Utc>,
}

impl CatRecord {
    /// Build a record from an image-search payload. The service attaches at
    /// most one breed entry per image; a payload without one cannot be
    /// displayed or ban-checked and counts as a fetch failure.
    pub fn from_image(image: ApiImage) -> Result<Self> {
        let breed = match image.breeds.into_iter().next() {
            Some(breed) => breed,
            None => bail!("Image payload is missing breed metadata"),
        };

        Ok(CatRecord {
            image_url: image.url,
            breed: breed.name,
            origin: breed.origin,
            lifespan: breed.life_span,
            weight: breed.weight.metric,
            fetched_at: Utc::now(),
        })
    }

    /// The four clickable attributes, in display order:
    /// breed, origin, lifespan, weight.
    pub fn bannable_tokens(&self) -> [&str; 4] {
        [&self.breed, &self.origin, &self.lifespan, &self.weight]
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{ApiBreed, ApiWeight};

    fn sample_image() -> ApiImage {
        ApiImage {
            id: Some("abc".to_string()),
            url: "https://cdn2.thecatapi.com/images/abc.jpg".to_string(),
            breeds: vec![ApiBreed {
                id: "pers".to_string(),
                name: "Persian".to_string(),
                origin: "Iran (Persia)".to_string(),
                life_span: "14 - 15".to_string(),
                weight: ApiWeight {
                    imperial: "7 - 12".to_string(),
                    metric: "3 - 5".to_string(),
                },
            }],
        }
    }

    #[test]
    fn test_from_image() {
        let record = CatRecord::from_image(sample_image()).unwrap();
        assert_eq!(record.breed, "Persian");
        assert_eq!(record.origin, "Iran (Persia)");
        assert_eq!(record.lifespan, "14 - 15");
        assert_eq!(record.weight, "3 - 5");
        assert_eq!(record.image_url, "https://cdn2.thecatapi.com/images/abc.jpg");
    }

    #[test]
    fn test_from_image_without_breeds_is_error() {
        let mut image = sample_image();
        image.breeds.clear();
        assert!(CatRecord::from_image(image).is_err());
    }

    #[test]
    fn test_bannable_tokens_order() {
        let record = CatRecord::from_image(sample_image()).unwrap();
        let tokens = record.bannable_tokens();
        assert_eq!(tokens, ["Persian", "Iran (Persia)", "14 - 15", "3 - 5"]);
    }
}
