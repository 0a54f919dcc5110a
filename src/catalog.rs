// 📚 Breed Catalog
// The static list of breed identifiers, fetched once per session. If the
// load fails the catalog stays empty and draws are disabled for the rest
// of the session.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::api::ApiBreed;

/// Opaque breed identifier from the catalog.
pub type BreedId = String;

#[derive(Debug, Clone, Default)]
pub struct BreedCatalog {
    ids: Vec<BreedId>,
}

impl BreedCatalog {
    pub fn new(ids: Vec<BreedId>) -> Self {
        BreedCatalog { ids }
    }

    /// Breedless placeholder for sessions where the catalog load failed.
    pub fn empty() -> Self {
        BreedCatalog { ids: Vec::new() }
    }

    pub fn from_breeds(breeds: &[ApiBreed]) -> Self {
        BreedCatalog {
            ids: breeds.iter().map(|breed| breed.id.clone()).collect(),
        }
    }

    pub fn is_ready(&self) -> bool {
        !self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn ids(&self) -> &[BreedId] {
        &self.ids
    }

    /// Uniform random pick. None only when the catalog is empty.
    pub fn pick_random<R: Rng>(&self, rng: &mut R) -> Option<&BreedId> {
        self.ids.choose(rng)
    }
}

// ============================================================================
// TESTS
// ============================================================================
