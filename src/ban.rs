// 🚫 Ban List
// User-curated attribute tokens and the predicate that rejects candidate
// records. String tokens match breed/origin exactly; tokens that parse as
// numeric ranges are additionally tested for interval overlap against the
// candidate's weight and lifespan.

use serde::{Deserialize, Serialize};

use crate::record::CatRecord;

// ============================================================================
// NUMERIC RANGES
// ============================================================================

/// A closed numeric interval parsed from a "min - max" string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumericRange {
    pub min: f64,
    pub max: f64,
}

impl NumericRange {
    /// Parse a "min - max" string. Anything malformed or non-numeric is
    /// None, never an error: such tokens simply never overlap, and are only
    /// tested via the exact-string rules.
    pub fn parse(text: &str) -> Option<Self> {
        let (min_part, max_part) = text.split_once(" - ")?;
        let min = min_part.trim().parse::<f64>().ok()?;
        let max = max_part.trim().parse::<f64>().ok()?;
        Some(NumericRange { min, max })
    }

    /// Interval intersection: symmetric and reflexive.
    pub fn overlaps(&self, other: &NumericRange) -> bool {
        self.min <= other.max && self.max >= other.min
    }
}

fn range_token_overlaps(token: &str, candidate: &str) -> bool {
    match (NumericRange::parse(candidate), NumericRange::parse(token)) {
        (Some(candidate), Some(token)) => candidate.overlaps(&token),
        _ => false,
    }
}

// ============================================================================
// BAN LIST
// ============================================================================

/// Ordered, duplicate-free set of banned attribute tokens.
/// Session-scoped; mutated only through explicit toggles.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BanList {
    tokens: Vec<String>,
}

impl BanList {
    pub fn new() -> Self {
        BanList { tokens: Vec::new() }
    }

    /// Flip membership: remove every copy if present, append otherwise.
    /// Two consecutive toggles of the same token are a no-op.
    pub fn toggle(&mut self, token: &str) {
        if self.contains(token) {
            self.tokens.retain(|t| t != token);
        } else {
            self.tokens.push(token.to_string());
        }
    }

    pub fn contains(&self, token: &str) -> bool {
        self.tokens.iter().any(|t| t == token)
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }

    /// A record is banned if any token matches its breed or origin exactly,
    /// or parses as a range that overlaps its weight or lifespan range.
    pub fn is_banned(&self, record: &CatRecord) -> bool {
        self.tokens.iter().any(|token| {
            token == &record.breed
                || token == &record.origin
                || range_token_overlaps(token, &record.weight)
                || range_token_overlaps(token, &record.lifespan)
        })
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(breed: &str, origin: &str, lifespan: &str, weight: &str) -> CatRecord {
        CatRecord {
            image_url: "https://cdn2.thecatapi.com/images/abc.jpg".to_string(),
            breed: breed.to_string(),
            origin: origin.to_string(),
            lifespan: lifespan.to_string(),
            weight: weight.to_string(),
            fetched_at: Utc::now(),
        }
    }

    #[test]
    fn test_range_parse() {
        let range = NumericRange::parse("3 - 5").unwrap();
        assert_eq!(range.min, 3.0);
        assert_eq!(range.max, 5.0);
    }

    #[test]
    fn test_range_parse_malformed() {
        assert!(NumericRange::parse("Persian").is_none());
        assert!(NumericRange::parse("").is_none());
        assert!(NumericRange::parse("3 -").is_none());
        assert!(NumericRange::parse("three - five").is_none());
        assert!(NumericRange::parse("3-5").is_none(), "separator is ' - '");
    }

    #[test]
    fn test_overlap_is_reflexive() {
        let range = NumericRange::parse("3 - 5").unwrap();
        assert!(range.overlaps(&range));
    }

    #[test]
    fn test_overlap_is_symmetric() {
        let a = NumericRange::parse("3 - 5").unwrap();
        let b = NumericRange::parse("4 - 6").unwrap();
        let c = NumericRange::parse("6 - 8").unwrap();
        assert_eq!(a.overlaps(&b), b.overlaps(&a));
        assert_eq!(a.overlaps(&c), c.overlaps(&a));
    }

    #[test]
    fn test_toggle_adds_then_removes() {
        let mut bans = BanList::new();
        bans.toggle("Persian");
        assert!(bans.contains("Persian"));
        assert_eq!(bans.len(), 1);

        bans.toggle("Persian");
        assert!(!bans.contains("Persian"));
        assert!(bans.is_empty());
    }

    #[test]
    fn test_toggle_is_involution() {
        let mut bans = BanList::new();
        bans.toggle("Egypt");
        bans.toggle("3 - 5");

        let before = bans.tokens().to_vec();
        bans.toggle("Persian");
        bans.toggle("Persian");
        assert_eq!(bans.tokens(), before.as_slice());
    }

    #[test]
    fn test_banned_by_breed() {
        let mut bans = BanList::new();
        bans.toggle("Persian");
        assert!(bans.is_banned(&record("Persian", "Iran (Persia)", "14 - 15", "3 - 5")));
        assert!(!bans.is_banned(&record("Bengal", "United States", "12 - 15", "3 - 7")));
    }

    #[test]
    fn test_banned_by_origin() {
        let mut bans = BanList::new();
        bans.toggle("Egypt");
        assert!(bans.is_banned(&record("Chausie", "Egypt", "12 - 14", "4 - 7")));
        assert!(!bans.is_banned(&record("Chausie", "France", "12 - 14", "4 - 7")));
    }

    #[test]
    fn test_banned_by_weight_overlap() {
        let mut bans = BanList::new();
        bans.toggle("3 - 5");

        // 4 <= 5 and 6 >= 3: overlap
        assert!(bans.is_banned(&record("Bengal", "United States", "20 - 22", "4 - 6")));
        // 6 <= 5 fails: no overlap
        assert!(!bans.is_banned(&record("Bengal", "United States", "20 - 22", "6 - 8")));
    }

    #[test]
    fn test_banned_by_lifespan_overlap() {
        let mut bans = BanList::new();
        bans.toggle("14 - 15");
        assert!(bans.is_banned(&record("Persian", "Iran (Persia)", "14 - 15", "30 - 40")));
        assert!(!bans.is_banned(&record("Bengal", "United States", "10 - 12", "30 - 40")));
    }

    #[test]
    fn test_plain_string_token_never_range_matches() {
        let mut bans = BanList::new();
        bans.toggle("Persian");
        // A record whose weight string can't parse is still only matched
        // by the exact-string rules.
        assert!(!bans.is_banned(&record("Bengal", "United States", "12 - 15", "Persian-ish")));
    }

    #[test]
    fn test_malformed_candidate_range_never_overlaps() {
        let mut bans = BanList::new();
        bans.toggle("3 - 5");
        assert!(!bans.is_banned(&record("Bengal", "United States", "", "")));
    }

    #[test]
    fn test_empty_ban_list_bans_nothing() {
        let bans = BanList::new();
        assert!(!bans.is_banned(&record("Persian", "Iran (Persia)", "14 - 15", "3 - 5")));
    }
}
