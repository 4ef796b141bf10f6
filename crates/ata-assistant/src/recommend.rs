//! Article recommendations from the static catalog.

use serde::{Deserialize, Serialize};

use ata_core::config::ContentConfig;
use ata_core::types::CatalogEntry;

/// Number of recommendations shown by default.
pub const DEFAULT_LIMIT: usize = 3;

/// What the reader likes and has already read.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestProfile {
    pub viewed_titles: Vec<String>,
    pub interests: Vec<String>,
}

impl InterestProfile {
    pub fn from_content(content: &ContentConfig) -> Self {
        Self {
            viewed_titles: content.viewed_titles.clone(),
            interests: content.interests.clone(),
        }
    }

    fn shares_interest(&self, entry: &CatalogEntry) -> bool {
        entry.tags.iter().any(|t| self.interests.contains(t))
    }

    fn has_viewed(&self, entry: &CatalogEntry) -> bool {
        self.viewed_titles.contains(&entry.title)
    }
}

/// Up to `limit` entries, in catalog order, that either share a tag with the
/// reader's interests or have not been viewed yet.
///
/// Note the rule is inclusive: with a sparse history almost every entry
/// passes, so the limit does most of the filtering.
pub fn recommend(
    catalog: &[CatalogEntry],
    profile: &InterestProfile,
    limit: usize,
) -> Vec<CatalogEntry> {
    catalog
        .iter()
        .filter(|entry| profile.shares_interest(entry) || !profile.has_viewed(entry))
        .take(limit)
        .cloned()
        .collect()
}
