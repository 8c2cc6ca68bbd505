//! Markup extraction for the outbreak page.
//!
//! All coupling to the page layout lives here: the anchors below and the
//! column table in [`col`] are the only things that need touching when the
//! page changes. A missing anchor is a hard [`Error::Extraction`] — the
//! extractor never returns a partial snapshot.

use crate::error::Error;
use crate::models::{CountryRecord, NewsItem, Snapshot, normalize_name};
use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html, Selector};
use std::collections::HashMap;

/// Structural anchors. Identity-based, not positional, so unrelated page
/// edits don't shift them.
const STATS_TABLE: &str = "table#main_table_countries_today";
const NEWS_CONTAINER: &str = "#news_block";
const NEWS_ITEM: &str = "div.news_post";
const NEWS_ALERT: &str = ".alert";

/// Cell positions within a statistics row. Column 0 is the name cell.
mod col {
    pub const CASES: usize = 1;
    pub const NEW_CASES: usize = 2;
    pub const DEATHS: usize = 3;
    pub const NEW_DEATHS: usize = 4;
    pub const RECOVERED: usize = 5;
    pub const ACTIVE: usize = 6;
    pub const SERIOUS: usize = 7;
    pub const CASES_PER_1M: usize = 8;
}

/// Parse raw page markup into a [`Snapshot`] stamped with `fetched_at`.
pub fn extract(html: &str, fetched_at: DateTime<Utc>) -> Result<Snapshot, Error> {
    let doc = Html::parse_document(html);
    let countries = extract_table(&doc)?;
    let news = extract_news(&doc)?;
    Ok(Snapshot {
        fetched_at,
        countries,
        news,
    })
}

fn extract_table(doc: &Html) -> Result<Vec<CountryRecord>, Error> {
    let table_sel = Selector::parse(STATS_TABLE).unwrap();
    let row_sel = Selector::parse("tr").unwrap();
    let cell_sel = Selector::parse("td").unwrap();

    let table = doc
        .select(&table_sel)
        .next()
        .ok_or_else(|| Error::Extraction("statistics table not found".into()))?;

    // Keyed by normalized name: a duplicate row overwrites its predecessor
    // instead of producing two entries.
    let mut order: Vec<String> = Vec::new();
    let mut by_name: HashMap<String, CountryRecord> = HashMap::new();

    for row in table.select(&row_sel) {
        let cells: Vec<String> = row.select(&cell_sel).map(cell_text).collect();
        let Some(record) = record_from_cells(&cells) else {
            continue; // header rows carry <th> cells, not <td>
        };
        let key = normalize_name(&record.name);
        if by_name.insert(key.clone(), record).is_none() {
            order.push(key);
        }
    }

    let countries: Vec<CountryRecord> = order
        .iter()
        .filter_map(|key| by_name.remove(key))
        .collect();

    if !countries
        .iter()
        .any(|c| normalize_name(&c.name) == crate::models::TOTAL_ALIAS)
    {
        return Err(Error::Extraction("aggregate total row not found".into()));
    }
    Ok(countries)
}

fn record_from_cells(cells: &[String]) -> Option<CountryRecord> {
    // The aggregate row is labeled "Total:"; normalize the label so lookups
    // see a plain name.
    let name = cells.first()?.trim().trim_end_matches(':').trim();
    if name.is_empty() {
        return None;
    }

    let cell = |i: usize| cells.get(i).map(String::as_str).unwrap_or("");
    let cases = parse_count(cell(col::CASES));
    let deaths = parse_count(cell(col::DEATHS));
    let recovered = parse_count(cell(col::RECOVERED));
    // Placeholder active cell: fall back to the identity
    // active = cases - recovered - deaths.
    let active = parse_opt(cell(col::ACTIVE))
        .unwrap_or_else(|| cases.saturating_sub(recovered).saturating_sub(deaths));

    Some(CountryRecord {
        name: name.to_string(),
        cases,
        new_cases: parse_delta(cell(col::NEW_CASES)),
        deaths,
        new_deaths: parse_delta(cell(col::NEW_DEATHS)),
        recovered,
        active,
        serious: parse_count(cell(col::SERIOUS)),
        cases_per_million: parse_ratio(cell(col::CASES_PER_1M)),
    })
}

fn extract_news(doc: &Html) -> Result<Vec<NewsItem>, Error> {
    let container_sel = Selector::parse(NEWS_CONTAINER).unwrap();
    let item_sel = Selector::parse(NEWS_ITEM).unwrap();
    let alert_sel = Selector::parse(NEWS_ALERT).unwrap();

    let container = doc
        .select(&container_sel)
        .next()
        .ok_or_else(|| Error::Extraction("news container not found".into()))?;

    let mut news = Vec::new();
    for item in container.select(&item_sel) {
        let text = collapse_whitespace(&item.text().collect::<String>());
        if text.is_empty() {
            continue;
        }
        let important = item.select(&alert_sel).next().is_some();
        news.push(NewsItem { text, important });
    }
    Ok(news)
}

fn cell_text(cell: ElementRef) -> String {
    cell.text().collect()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Strip the formatting the page applies to numbers (`+`, thousands commas).
fn clean_number(cell: &str) -> String {
    cell.trim().trim_start_matches('+').replace(',', "")
}

/// Numeric cell, `None` for empty or placeholder content ("N/A", "-").
fn parse_opt(cell: &str) -> Option<u64> {
    clean_number(cell).parse().ok()
}

fn parse_count(cell: &str) -> u64 {
    parse_opt(cell).unwrap_or(0)
}

/// Like [`parse_count`] but signed, for the daily-change columns.
fn parse_delta(cell: &str) -> i64 {
    clean_number(cell).parse().unwrap_or(0)
}

/// Fractional cell, for the cases-per-million column.
fn parse_ratio(cell: &str) -> f64 {
    clean_number(cell).parse().unwrap_or(0.0)
}
