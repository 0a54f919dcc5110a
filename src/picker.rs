// 🎲 Draw-and-Filter Picker
// One draw keeps pulling random records until one clears the ban list.
//
// The observed behavior in the wild is an unbounded recursion: a banned
// result refetches immediately, a failed fetch refetches after one second,
// forever. Both loops are reframed here as a bounded pass with distinct
// terminal outcomes, so a ban list broad enough to exclude everything
// reports "no eligible record" instead of silently burning network calls,
// and a dead network reports a failure instead of retrying for eternity.

use std::thread;
use std::time::Duration;

use anyhow::Result;
use rand::Rng;

use crate::api::CatApiClient;
use crate::ban::BanList;
use crate::catalog::BreedCatalog;
use crate::config::Config;
use crate::record::CatRecord;

/// Source of one image+metadata record per breed. Seam for tests.
pub trait RecordSource {
    fn fetch_record(&self, breed_id: &str) -> Result<CatRecord>;
}

impl RecordSource for CatApiClient {
    fn fetch_record(&self, breed_id: &str) -> Result<CatRecord> {
        CatRecord::from_image(self.search_image(breed_id)?)
    }
}

// ============================================================================
// DRAW POLICY
// ============================================================================

#[derive(Debug, Clone)]
pub struct DrawPolicy {
    /// Total fetch attempts per draw before reporting Exhausted
    pub max_attempts: u32,
    /// Fetch failures tolerated within one draw before reporting Failed
    pub max_fetch_failures: u32,
    /// Pause between failure retries (observed cadence: one second)
    pub failure_delay: Duration,
}

impl Default for DrawPolicy {
    fn default() -> Self {
        DrawPolicy {
            max_attempts: 40,
            max_fetch_failures: 3,
            failure_delay: Duration::from_secs(1),
        }
    }
}

impl DrawPolicy {
    pub fn from_config(config: &Config) -> Self {
        DrawPolicy {
            max_attempts: config.max_attempts,
            max_fetch_failures: config.max_fetch_failures,
            failure_delay: config.failure_delay(),
        }
    }
}

// ============================================================================
// DRAW
// ============================================================================

#[derive(Debug)]
pub enum DrawOutcome {
    /// Catalog not loaded; no network call was made
    NotReady,
    /// First record that cleared the ban list
    Accepted(CatRecord),
    /// Every attempt drew a banned record ("no eligible record found")
    Exhausted { attempts: u32 },
    /// Fetch failure budget spent
    Failed { attempts: u32, source: anyhow::Error },
}

/// Run one end-to-end draw: pick a breed uniformly at random, fetch one
/// record for it, and repeat until a record clears the ban list or the
/// policy budget runs out. Banned rejections retry immediately; fetch
/// failures sleep `failure_delay` first.
///
/// Draws are synchronous, so a caller on the event thread can never have
/// two in flight at once.
pub fn draw<S: RecordSource, R: Rng>(
    source: &S,
    catalog: &BreedCatalog,
    ban_list: &BanList,
    policy: &DrawPolicy,
    rng: &mut R,
) -> DrawOutcome {
    if !catalog.is_ready() {
        return DrawOutcome::NotReady;
    }

    let mut attempts = 0;
    let mut failures = 0;

    while attempts < policy.max_attempts {
        attempts += 1;

        let breed_id = match catalog.pick_random(rng) {
            Some(id) => id,
            None => return DrawOutcome::NotReady,
        };

        match source.fetch_record(breed_id) {
            Ok(record) => {
                if ban_list.is_banned(&record) {
                    // Rejected: straight back for another pick, no delay.
                    continue;
                }
                return DrawOutcome::Accepted(record);
            }
            Err(err) => {
                failures += 1;
                if failures >= policy.max_fetch_failures {
                    return DrawOutcome::Failed {
                        attempts,
                        source: err,
                    };
                }
                thread::sleep(policy.failure_delay);
            }
        }
    }

    DrawOutcome::Exhausted { attempts }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use chrono::Utc;
    use std::cell::{Cell, RefCell};
    use std::collections::VecDeque;

    fn record(breed: &str, weight: &str) -> CatRecord {
        CatRecord {
            image_url: "https://cdn2.thecatapi.com/images/abc.jpg".to_string(),
            breed: breed.to_string(),
            origin: "Nowhere".to_string(),
            lifespan: "10 - 12".to_string(),
            weight: weight.to_string(),
            fetched_at: Utc::now(),
        }
    }

    fn catalog() -> BreedCatalog {
        BreedCatalog::new(vec!["pers".to_string(), "beng".to_string()])
    }

    fn fast_policy(max_attempts: u32, max_fetch_failures: u32) -> DrawPolicy {
        DrawPolicy {
            max_attempts,
            max_fetch_failures,
            failure_delay: Duration::from_millis(0),
        }
    }

    /// Replays a scripted sequence of fetch results and counts calls.
    struct ScriptedSource {
        responses: RefCell<VecDeque<Result<CatRecord>>>,
        calls: Cell<u32>,
    }

    impl ScriptedSource {
        fn new(responses: Vec<Result<CatRecord>>) -> Self {
            ScriptedSource {
                responses: RefCell::new(responses.into()),
                calls: Cell::new(0),
            }
        }
    }

    impl RecordSource for ScriptedSource {
        fn fetch_record(&self, _breed_id: &str) -> Result<CatRecord> {
            self.calls.set(self.calls.get() + 1);
            self.responses
                .borrow_mut()
                .pop_front()
                .unwrap_or_else(|| Err(anyhow!("script exhausted")))
        }
    }

    #[test]
    fn test_empty_catalog_is_noop() {
        let source = ScriptedSource::new(vec![Ok(record("Persian", "3 - 5"))]);
        let outcome = draw(
            &source,
            &BreedCatalog::empty(),
            &BanList::new(),
            &fast_policy(10, 3),
            &mut rand::thread_rng(),
        );

        assert!(matches!(outcome, DrawOutcome::NotReady));
        assert_eq!(source.calls.get(), 0, "no network call may be issued");
    }

    #[test]
    fn test_first_unbanned_record_is_accepted() {
        let source = ScriptedSource::new(vec![Ok(record("Persian", "3 - 5"))]);
        let outcome = draw(
            &source,
            &catalog(),
            &BanList::new(),
            &fast_policy(10, 3),
            &mut rand::thread_rng(),
        );

        match outcome {
            DrawOutcome::Accepted(r) => assert_eq!(r.breed, "Persian"),
            other => panic!("expected Accepted, got {:?}", other),
        }
        assert_eq!(source.calls.get(), 1);
    }

    #[test]
    fn test_banned_record_triggers_retry() {
        let mut bans = BanList::new();
        bans.toggle("Persian");

        let source = ScriptedSource::new(vec![
            Ok(record("Persian", "3 - 5")),
            Ok(record("Bengal", "3 - 7")),
        ]);
        let outcome = draw(
            &source,
            &catalog(),
            &bans,
            &fast_policy(10, 3),
            &mut rand::thread_rng(),
        );

        match outcome {
            DrawOutcome::Accepted(r) => assert_eq!(r.breed, "Bengal"),
            other => panic!("expected Accepted, got {:?}", other),
        }
        assert_eq!(source.calls.get(), 2, "banned draw must refetch");
    }

    #[test]
    fn test_range_banned_record_triggers_retry() {
        let mut bans = BanList::new();
        bans.toggle("3 - 5");

        let source = ScriptedSource::new(vec![
            Ok(record("Bengal", "4 - 6")),
            Ok(record("Savannah", "6 - 8")),
        ]);
        let outcome = draw(
            &source,
            &catalog(),
            &bans,
            &fast_policy(10, 3),
            &mut rand::thread_rng(),
        );

        match outcome {
            DrawOutcome::Accepted(r) => assert_eq!(r.breed, "Savannah"),
            other => panic!("expected Accepted, got {:?}", other),
        }
    }

    #[test]
    fn test_all_banned_reports_exhausted() {
        let mut bans = BanList::new();
        bans.toggle("Persian");

        let source = ScriptedSource::new(vec![
            Ok(record("Persian", "3 - 5")),
            Ok(record("Persian", "3 - 5")),
            Ok(record("Persian", "3 - 5")),
        ]);
        let outcome = draw(
            &source,
            &catalog(),
            &bans,
            &fast_policy(3, 3),
            &mut rand::thread_rng(),
        );

        match outcome {
            DrawOutcome::Exhausted { attempts } => assert_eq!(attempts, 3),
            other => panic!("expected Exhausted, got {:?}", other),
        }
    }

    #[test]
    fn test_failure_budget_reports_failed() {
        let source = ScriptedSource::new(vec![
            Err(anyhow!("connection refused")),
            Err(anyhow!("connection refused")),
        ]);
        let outcome = draw(
            &source,
            &catalog(),
            &BanList::new(),
            &fast_policy(10, 2),
            &mut rand::thread_rng(),
        );

        match outcome {
            DrawOutcome::Failed { attempts, .. } => assert_eq!(attempts, 2),
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    #[test]
    fn test_single_failure_then_success_recovers() {
        let source = ScriptedSource::new(vec![
            Err(anyhow!("timed out")),
            Ok(record("Bengal", "3 - 7")),
        ]);
        let outcome = draw(
            &source,
            &catalog(),
            &BanList::new(),
            &fast_policy(10, 3),
            &mut rand::thread_rng(),
        );

        assert!(matches!(outcome, DrawOutcome::Accepted(_)));
        assert_eq!(source.calls.get(), 2);
    }

    #[test]
    fn test_policy_from_config() {
        let config = Config::default();
        let policy = DrawPolicy::from_config(&config);
        assert_eq!(policy.max_attempts, config.max_attempts);
        assert_eq!(policy.failure_delay, config.failure_delay());
    }
}
