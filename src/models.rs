use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lookup alias for the aggregate world-wide row, regardless of its
/// display label on the page.
pub const TOTAL_ALIAS: &str = "total";

/// One row of the statistics table.
///
/// Cells the source leaves empty or fills with a placeholder are normalized
/// to 0 at extraction time, so sorting never has to deal with missing fields.
/// `new_cases`/`new_deaths` are signed because the source occasionally
/// publishes negative corrections.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CountryRecord {
    pub name: String,
    pub cases: u64,
    pub new_cases: i64,
    pub deaths: u64,
    pub new_deaths: i64,
    pub recovered: u64,
    pub active: u64,
    pub serious: u64,
    /// Cases per one million population. Fractional for small ratios.
    pub cases_per_million: f64,
}

impl CountryRecord {
    /// Cases closed either by death or by recovery.
    pub fn closed(&self) -> u64 {
        self.cases.saturating_sub(self.active)
    }
}

/// One entry of the chronological news feed. Position within the containing
/// sequence is the scraped order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsItem {
    pub text: String,
    /// True when the source marks the entry with an alert indicator.
    pub important: bool,
}

/// One immutable, timestamped extraction result. Replaced wholesale on the
/// next successful live fetch, never merged field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub fetched_at: DateTime<Utc>,
    pub countries: Vec<CountryRecord>,
    pub news: Vec<NewsItem>,
}

impl Snapshot {
    /// The aggregate row. Guaranteed present in any snapshot produced by the
    /// extractor; hand-built snapshots may lack it.
    pub fn aggregate(&self) -> Option<&CountryRecord> {
        self.countries
            .iter()
            .find(|c| normalize_name(&c.name) == TOTAL_ALIAS)
    }
}

/// Canonical form used for all name comparisons: trimmed and lowercased.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_lowercase()
}
