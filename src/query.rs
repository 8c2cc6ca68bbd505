//! Pure query functions over an already-loaded [`Snapshot`]. No I/O here.

use crate::error::Error;
use crate::models::{CountryRecord, NewsItem, Snapshot, TOTAL_ALIAS, normalize_name};
use std::ops::Range;
use std::str::FromStr;

/// Case-insensitive, whitespace-trimmed lookup. An empty name or the
/// `total` alias resolves to the aggregate row. No fuzzy matching.
pub fn resolve_country<'a>(
    snapshot: &'a Snapshot,
    name: &str,
) -> Result<&'a CountryRecord, Error> {
    let wanted = normalize_name(name);
    if wanted.is_empty() || wanted == TOTAL_ALIAS {
        return snapshot
            .aggregate()
            .ok_or_else(|| Error::CountryNotFound(TOTAL_ALIAS.into()));
    }
    snapshot
        .countries
        .iter()
        .find(|c| normalize_name(&c.name) == wanted)
        .ok_or_else(|| Error::CountryNotFound(name.trim().to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    Cases,
    NewCases,
    Deaths,
    NewDeaths,
    Recovered,
    Active,
    Serious,
    Name,
}

/// A sort key plus an optional direction flip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub key: SortKey,
    pub reversed: bool,
}

impl Default for SortSpec {
    /// Cases, largest first.
    fn default() -> Self {
        Self {
            key: SortKey::Cases,
            reversed: false,
        }
    }
}

impl SortSpec {
    /// Parse `KEY[:asc]`. An unrecognized key degrades to the default
    /// (cases descending) instead of failing — a bad sort never aborts a
    /// whole request.
    pub fn parse(s: &str) -> Self {
        let s = s.trim().to_lowercase();
        let (key_part, reversed) = match s.split_once(':') {
            Some((k, modifier)) => (k, modifier == "asc"),
            None => (s.as_str(), false),
        };
        let key = match key_part {
            "cases" => SortKey::Cases,
            "new-cases" | "new_cases" | "newcases" => SortKey::NewCases,
            "deaths" => SortKey::Deaths,
            "new-deaths" | "new_deaths" | "newdeaths" => SortKey::NewDeaths,
            "recovered" => SortKey::Recovered,
            "active" => SortKey::Active,
            "serious" => SortKey::Serious,
            "name" => SortKey::Name,
            _ => return Self::default(),
        };
        Self { key, reversed }
    }
}

/// Stable sort of the table. Numeric keys order descending (largest impact
/// first); the name key orders descending alphabetically. `reversed` flips
/// either. Ties keep snapshot order, so equal inputs sort identically
/// across runs.
pub fn sort_table(records: &[CountryRecord], spec: SortSpec) -> Vec<CountryRecord> {
    let mut out = records.to_vec();
    out.sort_by(|a, b| {
        let ord = match spec.key {
            SortKey::Cases => b.cases.cmp(&a.cases),
            SortKey::NewCases => b.new_cases.cmp(&a.new_cases),
            SortKey::Deaths => b.deaths.cmp(&a.deaths),
            SortKey::NewDeaths => b.new_deaths.cmp(&a.new_deaths),
            SortKey::Recovered => b.recovered.cmp(&a.recovered),
            SortKey::Active => b.active.cmp(&a.active),
            SortKey::Serious => b.serious.cmp(&a.serious),
            SortKey::Name => normalize_name(&b.name).cmp(&normalize_name(&a.name)),
        };
        if spec.reversed { ord.reverse() } else { ord }
    });
    out
}

/// A `start:end` range selector with Python-slice semantics: half-open,
/// omitted endpoints default to the full extent, negative endpoints count
/// from the back, out-of-bounds clamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SliceSpec {
    pub start: Option<i64>,
    pub end: Option<i64>,
}

impl FromStr for SliceSpec {
    type Err = Error;

    /// Accepts `N` (first N items, same as `:N`) or `START:END` with either
    /// endpoint omitted.
    fn from_str(s: &str) -> Result<Self, Error> {
        let trimmed = s.trim();
        let endpoint = |part: &str| -> Result<Option<i64>, Error> {
            if part.trim().is_empty() {
                Ok(None)
            } else {
                part.trim()
                    .parse()
                    .map(Some)
                    .map_err(|_| Error::InvalidSlice(s.to_string()))
            }
        };
        match trimmed.split_once(':') {
            Some((a, b)) => Ok(Self {
                start: endpoint(a)?,
                end: endpoint(b)?,
            }),
            None => Ok(Self {
                start: None,
                end: endpoint(trimmed)?,
            }),
        }
    }
}

impl SliceSpec {
    /// Normalize to concrete clamped indices for a sequence of `len` items.
    /// Shared by table and news slicing.
    pub fn resolve(&self, len: usize) -> Range<usize> {
        let clamp = |v: i64| -> usize {
            if v < 0 {
                len.saturating_sub(v.unsigned_abs() as usize)
            } else {
                (v as usize).min(len)
            }
        };
        let start = self.start.map_or(0, clamp);
        let end = self.end.map_or(len, clamp);
        start..end.max(start)
    }
}

/// Apply a slice spec. An empty result is valid, not an error.
pub fn slice<T: Clone>(items: &[T], spec: SliceSpec) -> Vec<T> {
    items[spec.resolve(items.len())].to_vec()
}

/// Keep only items flagged important, in their original relative order.
pub fn filter_important(items: &[NewsItem]) -> Vec<NewsItem> {
    items.iter().filter(|n| n.important).cloned().collect()
}

/// Scalar views over one record, one per single-value CLI mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    /// Today's new cases.
    Latest,
    Active,
    Closed,
    Dead,
    Recovered,
    Serious,
}

pub fn metric_value(record: &CountryRecord, metric: Metric) -> i64 {
    // Counts near i64::MAX don't occur in practice; saturate rather than
    // wrap if the source ever produces one.
    let saturating = |v: u64| i64::try_from(v).unwrap_or(i64::MAX);
    match metric {
        Metric::Latest => record.new_cases,
        Metric::Active => saturating(record.active),
        Metric::Closed => saturating(record.closed()),
        Metric::Dead => saturating(record.deaths),
        Metric::Recovered => saturating(record.recovered),
        Metric::Serious => saturating(record.serious),
    }
}
