//! Full-database CSV export.

use atlas_common::util::truncate_chars;
use atlas_common::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use tracing::info;

use crate::annotation::{description, extract_date, title_without_date};
use crate::model::{CountryProfile, SourceType};
use crate::names::NameRegistry;

pub const CSV_HEADERS: [&str; 7] = [
    "Country",
    "Policy Area",
    "Source Type",
    "Title",
    "Date",
    "Description",
    "URL",
];

/// Description column is cut to this many characters.
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// One exported entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRow {
    pub country: String,
    pub area: String,
    pub source: &'static str,
    pub title: String,
    pub date: String,
    pub description: String,
    pub url: String,
}

impl ExportRow {
    fn fields(&self) -> [&str; 7] {
        [
            self.country.as_str(),
            self.area.as_str(),
            self.source,
            self.title.as_str(),
            self.date.as_str(),
            self.description.as_str(),
            self.url.as_str(),
        ]
    }
}

/// One row per entry over every area (unrecognised keys included) of every
/// country, countries in key order.
pub fn export_rows(
    countries: &BTreeMap<String, CountryProfile>,
    names: &NameRegistry,
) -> Vec<ExportRow> {
    let mut rows = Vec::new();
    for (country, profile) in countries {
        let display = names.display_name(country);
        for (area, entries) in profile.all_areas() {
            for source in SourceType::ALL {
                for entry in entries.entries(source) {
                    let text = entry.text.as_str();
                    rows.push(ExportRow {
                        country: display.to_string(),
                        area: area.to_string(),
                        source: source.long_label(),
                        title: title_without_date(text),
                        date: extract_date(text).unwrap_or_default(),
                        description: truncate_chars(&description(text), DESCRIPTION_MAX_CHARS)
                            .to_string(),
                        url: entry.resolved_url().unwrap_or_default(),
                    });
                }
            }
        }
    }
    rows
}

/// Write the export with every field quoted. Returns the number of data rows.
pub fn write_csv<W: Write>(
    countries: &BTreeMap<String, CountryProfile>,
    names: &NameRegistry,
    writer: W,
) -> Result<usize> {
    let mut csv = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .from_writer(writer);

    csv.write_record(CSV_HEADERS).map_err(std::io::Error::from)?;
    let rows = export_rows(countries, names);
    for row in &rows {
        csv.write_record(row.fields()).map_err(std::io::Error::from)?;
    }
    csv.flush()?;

    info!(rows = rows.len(), "Exported policy database to CSV");
    Ok(rows.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn countries() -> BTreeMap<String, CountryProfile> {
        let json = r#"{
            "UK": {
                "Ethical Guidelines & Restrictions": {
                    "policy_documents": [
                        "Ambitious, Safe, Responsible (Jun 2022)\n- Sets out the \"ASR\" approach https://gov.example/asr"
                    ],
                    "public_statements": [
                        { "text": "Speech (2023)", "url": "https://gov.example/speech" }
                    ]
                },
                "Legacy Notes": { "legal_directives": ["Undated memo"] }
            }
        }"#;
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_export_rows() {
        let names = NameRegistry::builtin();
        let rows = export_rows(&countries(), &names);
        assert_eq!(rows.len(), 3);

        let doc = &rows[0];
        assert_eq!(doc.country, "United Kingdom");
        assert_eq!(doc.area, "Ethical Guidelines & Restrictions");
        assert_eq!(doc.source, "Policy Document");
        assert_eq!(doc.title, "Ambitious, Safe, Responsible");
        assert_eq!(doc.date, "Jun 2022");
        assert!(doc.description.starts_with("- Sets out"));
        assert_eq!(doc.url, "https://gov.example/asr");

        assert_eq!(rows[1].url, "https://gov.example/speech");
        assert_eq!(rows[2].area, "Legacy Notes");
        assert_eq!(rows[2].date, "");
    }

    #[test]
    fn test_description_is_truncated() {
        let mut profile = CountryProfile::new();
        let long = format!("Title (2020)\n{}", "x".repeat(800));
        profile.push(
            crate::model::PolicyArea::Acquisition,
            SourceType::LegalDirectives,
            crate::model::PolicyEntry::new(long),
        );
        let data: BTreeMap<String, CountryProfile> =
            [("Peru".to_string(), profile)].into_iter().collect();
        let rows = export_rows(&data, &NameRegistry::builtin());
        assert_eq!(rows[0].description.chars().count(), DESCRIPTION_MAX_CHARS);
        assert_eq!(rows[0].country, "Peru");
    }

    #[test]
    fn test_write_csv_quotes_every_field() {
        let mut out = Vec::new();
        let written = write_csv(&countries(), &NameRegistry::builtin(), &mut out).unwrap();
        assert_eq!(written, 3);

        let text = String::from_utf8(out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next().unwrap(),
            r#""Country","Policy Area","Source Type","Title","Date","Description","URL""#
        );
        let first = lines.next().unwrap();
        assert!(first.starts_with(r#""United Kingdom","Ethical Guidelines & Restrictions","Policy Document""#));
        assert!(first.contains(r#"the ""ASR"" approach"#));
    }
}
