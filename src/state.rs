// 🗂️ Application State
// One explicit struct owns everything a session mutates: the catalog, the
// ban list, the current item, the history, and the last error message.
// All state is in-memory and lost when the process ends.

use crate::ban::BanList;
use crate::catalog::BreedCatalog;
use crate::record::CatRecord;

#[derive(Debug, Default)]
pub struct AppState {
    pub catalog: BreedCatalog,
    pub ban_list: BanList,
    /// Accepted records, most recent first. Append-only, never trimmed.
    history: Vec<CatRecord>,
    current: Option<CatRecord>,
    last_error: Option<String>,
}

impl AppState {
    pub fn new(catalog: BreedCatalog) -> Self {
        AppState {
            catalog,
            ban_list: BanList::new(),
            history: Vec::new(),
            current: None,
            last_error: None,
        }
    }

    /// Commit an accepted record: it becomes the current item and lands at
    /// the head of history. A successful draw also clears any error.
    pub fn accept(&mut self, record: CatRecord) {
        self.history.insert(0, record.clone());
        self.current = Some(record);
        self.last_error = None;
    }

    /// Flip a token in the ban list. Banning never retroactively evicts the
    /// current item or history entries; the list only gates future draws.
    pub fn toggle_ban(&mut self, token: &str) {
        self.ban_list.toggle(token);
    }

    pub fn current(&self) -> Option<&CatRecord> {
        self.current.as_ref()
    }

    pub fn history(&self) -> &[CatRecord] {
        &self.history
    }

    pub fn record_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    pub fn clear_error(&mut self) {
        self.last_error = None;
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }
}

// ============================================================================
// TESTS
// ============================================================================
