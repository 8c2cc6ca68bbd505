use anyhow::Result;
use clap::Parser;
use corona_rs::api::Client;
use corona_rs::models::CountryRecord;
use corona_rs::query::{self, Metric, SliceSpec, SortSpec};
use corona_rs::service::{DataService, Provenance};
use corona_rs::storage::CacheStore;
use num_format::{Locale, ToFormattedString};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "corona",
    version,
    about = "Get up-to-date statistics about the Coronavirus outbreak"
)]
struct Cli {
    /// Today's incidents (new cases and new deaths)
    #[arg(short, long)]
    latest: bool,
    /// Run in offline mode (cached data only, no fetch)
    #[arg(short, long)]
    offline: bool,
    /// Number of closed cases, closed either by death or by recovery
    #[arg(short, long)]
    closed: bool,
    /// Number of patients in treatment
    #[arg(short, long)]
    active: bool,
    /// Number of recovered patients
    #[arg(short, long)]
    recovered: bool,
    /// Number of deaths that have occurred
    #[arg(short, long)]
    dead: bool,
    /// Number of patients in critical or serious condition
    #[arg(short, long)]
    serious: bool,
    /// Per-country table view
    #[arg(long)]
    table: bool,
    /// Chronological news feed
    #[arg(long)]
    news: bool,
    /// Sort key for --table: cases, new-cases, deaths, new-deaths,
    /// recovered, active, serious or name; append :asc to flip direction
    #[arg(long, value_name = "KEY")]
    sort: Option<String>,
    /// Slice for --table/--news: N or START:END (negative counts from the back)
    #[arg(long, value_name = "SPEC", allow_hyphen_values = true)]
    slice: Option<SliceSpec>,
    /// Only news items flagged important
    #[arg(long)]
    important: bool,
    /// Override the cache directory
    #[arg(long, value_name = "DIR")]
    cache_dir: Option<PathBuf>,
    /// Country to show data of; if not given, global stats are shown
    country: Option<String>,
}

fn main() -> Result<()> {
    env_logger::init();
    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    let cache = match &cli.cache_dir {
        Some(dir) => CacheStore::new(dir),
        None => CacheStore::default_location()
            .ok_or_else(|| anyhow::anyhow!("no platform cache directory; pass --cache-dir"))?,
    };
    let service = DataService::new(Client::default(), cache);
    let dataset = service.get_snapshot(cli.offline)?;

    if dataset.provenance == Provenance::StaleFallback {
        eprintln!(
            "Network issue detected. Showing cached data from {}.",
            dataset.snapshot.fetched_at.format("%Y-%m-%d %H:%M UTC")
        );
    }
    let snapshot = &dataset.snapshot;

    if cli.news {
        let mut items = if cli.important {
            query::filter_important(&snapshot.news)
        } else {
            snapshot.news.clone()
        };
        if let Some(spec) = cli.slice {
            items = query::slice(&items, spec);
        }
        for item in &items {
            let marker = if item.important { "!" } else { "-" };
            println!("{marker} {}", item.text);
        }
        return Ok(());
    }

    if cli.table {
        // A country filter restricts the table to that one row before
        // sorting and slicing.
        let rows = match &cli.country {
            Some(name) => vec![query::resolve_country(snapshot, name)?.clone()],
            None => snapshot.countries.clone(),
        };
        let sort = cli.sort.as_deref().map(SortSpec::parse).unwrap_or_default();
        let mut rows = query::sort_table(&rows, sort);
        if let Some(spec) = cli.slice {
            rows = query::slice(&rows, spec);
        }
        print_table(&rows);
        return Ok(());
    }

    let row = query::resolve_country(snapshot, cli.country.as_deref().unwrap_or(""))?;

    let mut lines: Vec<(&str, String)> = Vec::new();
    if cli.active {
        lines.push(("Active Cases:", fmt(query::metric_value(row, Metric::Active))));
    }
    if cli.latest {
        lines.push(("New Cases:", fmt(row.new_cases)));
        lines.push(("New Deaths:", fmt(row.new_deaths)));
    }
    if cli.dead {
        lines.push(("Total Deaths:", fmt(query::metric_value(row, Metric::Dead))));
    }
    if cli.serious {
        lines.push(("Serious Cases:", fmt(query::metric_value(row, Metric::Serious))));
    }
    if cli.recovered {
        lines.push((
            "Total Recovered:",
            fmt(query::metric_value(row, Metric::Recovered)),
        ));
    }
    if cli.closed {
        lines.push(("Closed Cases:", fmt(query::metric_value(row, Metric::Closed))));
    }

    if lines.is_empty() {
        print_summary(row);
    } else {
        print_pairs(&lines);
    }
    Ok(())
}

fn fmt(n: i64) -> String {
    n.to_formatted_string(&Locale::en)
}

/// The no-flags overview, one labeled count per line.
fn print_summary(row: &CountryRecord) {
    let pairs: Vec<(&str, String)> = vec![
        ("Total Cases:", row.cases.to_formatted_string(&Locale::en)),
        ("New Cases:", fmt(row.new_cases)),
        ("Total Deaths:", row.deaths.to_formatted_string(&Locale::en)),
        ("New Deaths:", fmt(row.new_deaths)),
        (
            "Total Recovered:",
            row.recovered.to_formatted_string(&Locale::en),
        ),
        ("Active Cases:", row.active.to_formatted_string(&Locale::en)),
        (
            "Serious or Critical:",
            row.serious.to_formatted_string(&Locale::en),
        ),
        (
            "Total Closed Cases:",
            row.closed().to_formatted_string(&Locale::en),
        ),
        ("Cases/1M Pop:", fmt_ratio(row.cases_per_million)),
    ];
    print_pairs(&pairs);
}

/// Whole ratios get thousands separators; fractional ones keep one decimal.
fn fmt_ratio(v: f64) -> String {
    if v.fract() == 0.0 && v >= 0.0 && v <= u64::MAX as f64 {
        (v as u64).to_formatted_string(&Locale::en)
    } else {
        format!("{v:.1}")
    }
}

fn print_pairs(pairs: &[(&str, String)]) {
    let label_w = pairs.iter().map(|(l, _)| l.len()).max().unwrap_or(0);
    let value_w = pairs.iter().map(|(_, v)| v.len()).max().unwrap_or(0);
    for (label, value) in pairs {
        println!("{label:<label_w$}  {value:>value_w$}");
    }
}

fn print_table(rows: &[CountryRecord]) {
    const N: usize = 8;
    let header: [String; N] = [
        "Country".into(),
        "Cases".into(),
        "New Cases".into(),
        "Deaths".into(),
        "New Deaths".into(),
        "Recovered".into(),
        "Active".into(),
        "Serious".into(),
    ];
    let body: Vec<[String; N]> = rows
        .iter()
        .map(|r| {
            [
                r.name.clone(),
                r.cases.to_formatted_string(&Locale::en),
                fmt(r.new_cases),
                r.deaths.to_formatted_string(&Locale::en),
                fmt(r.new_deaths),
                r.recovered.to_formatted_string(&Locale::en),
                r.active.to_formatted_string(&Locale::en),
                r.serious.to_formatted_string(&Locale::en),
            ]
        })
        .collect();

    let mut widths: [usize; N] = [0; N];
    for row in std::iter::once(&header).chain(body.iter()) {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.len());
        }
    }

    let print_row = |cells: &[String; N]| {
        let mut line = String::new();
        for (i, (cell, w)) in cells.iter().zip(widths).enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            if i == 0 {
                line.push_str(&format!("{cell:<w$}"));
            } else {
                line.push_str(&format!("{cell:>w$}"));
            }
        }
        println!("{}", line.trim_end());
    };

    print_row(&header);
    for row in &body {
        print_row(row);
    }
}
