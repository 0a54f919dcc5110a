// Veni Vici - Core Library
// Breed catalog, ban list, and the draw-and-filter picker.
// Exposed for the TUI binary, the headless `draw` mode, and tests.

pub mod api;
pub mod ban;
pub mod catalog;
pub mod config;
pub mod picker;
pub mod record;
pub mod state;

// Re-export commonly used types
pub use api::{ApiBreed, ApiImage, ApiWeight, CatApiClient};
pub use ban::{BanList, NumericRange};
pub use catalog::{BreedCatalog, BreedId};
pub use config::Config;
pub use picker::{draw, DrawOutcome, DrawPolicy, RecordSource};
pub use record::CatRecord;
pub use state::AppState;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
