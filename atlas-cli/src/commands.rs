//! Subcommand implementations.
//!
//! Every command writes one JSON document to the given writer, except
//! `export-csv` without `--output`, which streams CSV.

use atlas_common::prelude::*;
use atlas_core::timeline::{self, QUARTER_COUNT};
use atlas_core::{
    CountTarget, Dimension, EngineSettings, PolicyArea, PolicyAtlas, SourceFilter, SourceType,
    ViewMode,
};
use clap::Subcommand;
use serde::Serialize;
use serde_json::json;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

#[derive(Subcommand, Debug, Clone, PartialEq)]
pub enum Command {
    /// Dataset totals and unresolved names in the built-in tables
    Summary,

    /// Show one parsed entry of a country's policy area
    Entry {
        /// Country (any known spelling)
        country: String,

        /// Policy area name or scoring dimension (e.g. "LAWS", "Ethics")
        #[arg(value_parser = parse_area)]
        area: PolicyArea,

        /// Zero-based position across the area's source lists
        index: usize,
    },

    /// Policy similarity of two countries (one year, or the whole series)
    Similarity {
        a: String,
        b: String,

        /// Year to break down (default: 2016-2025 series)
        #[arg(long)]
        year: Option<i32>,
    },

    /// Mean similarity within a grouping or alliance
    Group {
        /// Grouping ("NATO Members", "Five Eyes") or alliance ("FVEY")
        name: String,

        #[arg(long)]
        year: Option<i32>,
    },

    /// Momentum classification (all countries, or one)
    Momentum {
        #[arg(long)]
        country: Option<String>,
    },

    /// Quarterly entry counts of a country
    Timeline {
        country: String,

        /// cumulative or yearly
        #[arg(long, default_value = "cumulative")]
        mode: ViewMode,
    },

    /// World map snapshot at a quarter (0 = 2016 Q1, 39 = 2025 Q4)
    Map {
        #[arg(long, default_value_t = QUARTER_COUNT - 1)]
        quarter: usize,

        #[arg(long, default_value = "cumulative")]
        mode: ViewMode,
    },

    /// Entry counts by year, quarter and dimension
    Growth,

    /// Alliance roster coverage and member contributions
    Alliance {
        name: String,

        /// Restrict counts to a source type (repeatable)
        #[arg(long = "source", value_parser = parse_source)]
        sources: Vec<SourceType>,
    },

    /// Search entry text for a keyword
    Search { keyword: String },

    /// Find countries by partial name
    Find { query: String },

    /// Export every entry as CSV
    ExportCsv {
        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Resolve raw country names to canonical keys
    Names {
        #[arg(required = true)]
        raw: Vec<String>,
    },
}

/// Accept a full area name or a dimension short name.
pub fn parse_area(s: &str) -> std::result::Result<PolicyArea, String> {
    PolicyArea::from_name(s)
        .or_else(|| Dimension::from_short_name(s).map(|d| d.area()))
        .ok_or_else(|| format!("unknown policy area: {s}"))
}

fn parse_source(s: &str) -> std::result::Result<SourceType, String> {
    let wanted = s.trim().replace('-', "_").to_lowercase();
    SourceType::ALL
        .into_iter()
        .find(|source| source.key() == wanted)
        .ok_or_else(|| format!("unknown source type: {s}"))
}

/// Read the dataset file and build the engine.
pub fn load_atlas(path: &Path, settings: EngineSettings) -> Result<PolicyAtlas> {
    let json = fs::read_to_string(path)
        .context(format!("Failed to read dataset {}", path.display()))?;
    let atlas = PolicyAtlas::from_json_str(&json, settings)
        .context(format!("Failed to load dataset {}", path.display()))?;
    debug!(path = %path.display(), "Dataset ready");
    Ok(atlas)
}

#[derive(Debug, Serialize)]
struct QuarterPoint {
    quarter: usize,
    label: String,
    count: usize,
}

#[derive(Debug, Serialize)]
struct NameResolution<'a> {
    raw: &'a str,
    canonical: Option<&'a str>,
    display_name: Option<&'a str>,
    in_dataset: bool,
    alliances: Vec<&'a str>,
}

fn write_json<W: Write, T: Serialize + ?Sized>(out: &mut W, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

fn source_filter(sources: &[SourceType]) -> SourceFilter {
    if sources.is_empty() {
        return SourceFilter::all();
    }
    sources
        .iter()
        .fold(SourceFilter::none(), |filter, source| filter.with(*source, true))
}

fn require_country<'a>(atlas: &'a PolicyAtlas, country: &'a str) -> Result<&'a str> {
    let key = atlas.resolve(country);
    if atlas.dataset().has_country(key) {
        Ok(key)
    } else {
        Err(Error::NotFound(format!("country {country}")))
    }
}

/// Run one subcommand against a loaded atlas.
pub fn execute<W: Write>(atlas: &PolicyAtlas, command: &Command, out: &mut W) -> Result<()> {
    match command {
        Command::Summary => write_json(out, &atlas.overview()),

        Command::Entry {
            country,
            area,
            index,
        } => {
            let key = require_country(atlas, country)?;
            let (source, entry) = atlas.entry(key, *area, *index).ok_or_else(|| {
                Error::NotFound(format!("entry {index} of {} for {key}", area.name()))
            })?;
            write_json(
                out,
                &json!({
                    "country": key,
                    "display_name": atlas.display_name(key),
                    "area": area.name(),
                    "source": source.long_label(),
                    "url": entry.resolved_url(),
                    "parsed": atlas.parse_entry(&entry.text),
                }),
            )
        }

        Command::Similarity { a, b, year } => {
            let (a, b) = (require_country(atlas, a)?, require_country(atlas, b)?);
            match year {
                Some(year) => write_json(
                    out,
                    &json!({
                        "a": a,
                        "b": b,
                        "year": year,
                        "breakdown": atlas.similarity_breakdown(a, b, *year),
                    }),
                ),
                None => write_json(
                    out,
                    &json!({ "a": a, "b": b, "series": atlas.similarity_series(a, b) }),
                ),
            }
        }

        Command::Group { name, year } => {
            let grouping = atlas
                .groupings()
                .grouping(name)
                .or_else(|| atlas.groupings().grouping_for_alliance(name))
                .ok_or_else(|| Error::NotFound(format!("grouping {name}")))?;
            let members = grouping.member_refs();
            match year {
                Some(year) => write_json(
                    out,
                    &json!({
                        "group": grouping.name,
                        "members": members,
                        "year": year,
                        "similarity": atlas.group_similarity(&members, *year),
                    }),
                ),
                None => write_json(
                    out,
                    &json!({
                        "group": grouping.name,
                        "members": members,
                        "series": atlas.group_similarity_series(&members),
                    }),
                ),
            }
        }

        Command::Momentum { country } => match country {
            Some(country) => {
                let key = require_country(atlas, country)?;
                write_json(out, &atlas.classify_momentum(key))
            }
            None => write_json(out, &atlas.momentum()),
        },

        Command::Timeline { country, mode } => {
            let key = require_country(atlas, country)?;
            let quarters: Vec<QuarterPoint> = atlas
                .quarter_series(key, *mode)
                .into_iter()
                .enumerate()
                .map(|(quarter, count)| QuarterPoint {
                    quarter,
                    label: format!("{} Q{}", timeline::quarter_label(quarter), quarter % 4 + 1),
                    count,
                })
                .collect();
            let emergence: BTreeMap<&str, Option<i32>> = Dimension::ALL
                .into_iter()
                .map(|dim| (dim.short_name(), atlas.area_emergence_year(key, dim)))
                .collect();
            let up_to_year: BTreeMap<i32, usize> = timeline::horizon_years()
                .map(|year| (year, atlas.entries_up_to_year(key, year)))
                .collect();
            write_json(
                out,
                &json!({
                    "country": key,
                    "mode": mode,
                    "quarters": quarters,
                    "emergence": emergence,
                    "entries_up_to_year": up_to_year,
                }),
            )
        }

        Command::Map { quarter, mode } => {
            if *quarter >= QUARTER_COUNT {
                return Err(Error::InvalidInput(format!(
                    "quarter {quarter} is outside 0..{QUARTER_COUNT}"
                )));
            }
            write_json(out, &atlas.map_snapshot(*quarter, *mode))
        }

        Command::Growth => write_json(out, atlas.growth()),

        Command::Alliance { name, sources } => {
            let filter = source_filter(sources);
            let coverage = atlas
                .alliance_coverage(name)
                .ok_or_else(|| Error::NotFound(format!("alliance {name}")))?;
            let contributions = atlas.member_contributions(name, &filter).unwrap_or_default();
            let own_entries = atlas.count_entries(
                &CountTarget::Alliance {
                    alliance: coverage.name.clone(),
                },
                &filter,
            );
            write_json(
                out,
                &json!({
                    "coverage": coverage,
                    "alliance_entries": own_entries,
                    "contributions": contributions,
                }),
            )
        }

        Command::Search { keyword } => {
            let results = atlas
                .keyword_search(keyword)
                .map_err(|e| Error::InvalidInput(e.to_string()))?;
            write_json(out, &results)
        }

        Command::Find { query } => write_json(out, &atlas.country_search(query)),

        Command::ExportCsv { output } => match output {
            Some(path) => {
                let file = File::create(path)
                    .context(format!("Failed to create {}", path.display()))?;
                let rows = atlas.write_csv(BufWriter::new(file))?;
                debug!(rows, path = %path.display(), "Wrote CSV file");
                write_json(out, &json!({ "rows": rows, "output": path }))
            }
            None => {
                let rows = atlas.write_csv(&mut *out)?;
                debug!(rows, "Exported CSV to stdout");
                Ok(())
            }
        },

        Command::Names { raw } => {
            let resolutions: Vec<NameResolution<'_>> = raw
                .iter()
                .map(|raw| {
                    let canonical = atlas.names().resolve(raw);
                    NameResolution {
                        raw,
                        canonical,
                        display_name: canonical.map(|key| atlas.names().display_name(key)),
                        in_dataset: canonical.is_some_and(|key| atlas.dataset().has_country(key)),
                        alliances: canonical
                            .map(|key| atlas.groupings().memberships(key))
                            .unwrap_or_default(),
                    }
                })
                .collect();
            write_json(out, &resolutions)
        }
    }
}
