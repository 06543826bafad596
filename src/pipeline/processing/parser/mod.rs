pub mod schema;

use csv::{ByteRecord, ReaderBuilder};
use serde::Deserialize;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info, warn};
use zip::ZipArchive;

use crate::error::{ReportError, Result};
pub use schema::{Schema, SchemaRecord};

/// What to do with a row that does not fit its schema
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParsePolicy {
    /// Drop the row, count it, keep going
    #[default]
    Skip,
    /// Abort the run on the first malformed row
    FailFast,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseReport {
    pub dataset: &'static str,
    pub rows_read: u64,
    pub rows_kept: u64,
    pub rows_skipped: u64,
}

#[derive(Debug)]
pub struct Parsed<R> {
    pub records: Vec<R>,
    pub report: ParseReport,
}

/// Reads header-less, pipe-delimited FEC bulk files into typed records
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedSchemaParser {
    policy: ParsePolicy,
}

impl FixedSchemaParser {
    pub fn new(policy: ParsePolicy) -> Self {
        Self { policy }
    }

    /// Parse the data entry of a bulk-download ZIP archive
    pub fn parse_archive<R: SchemaRecord>(&self, path: &Path) -> Result<Parsed<R>> {
        let file = File::open(path)?;
        let mut archive =
            ZipArchive::new(BufReader::new(file)).map_err(|source| ReportError::Archive {
                path: path.to_path_buf(),
                source,
            })?;

        let names: Vec<String> = archive.file_names().map(str::to_string).collect();
        let entry_name = data_entry_name(&names).ok_or_else(|| ReportError::EmptyArchive {
            path: path.to_path_buf(),
        })?;

        debug!(
            "{}: reading entry '{}' from {}",
            R::schema().dataset,
            entry_name,
            path.display()
        );
        let entry = archive
            .by_name(&entry_name)
            .map_err(|source| ReportError::Archive {
                path: path.to_path_buf(),
                source,
            })?;

        self.parse_reader::<R, _>(entry)
    }

    /// Parse raw pipe-delimited text one row at a time
    pub fn parse_reader<R: SchemaRecord, Rd: Read>(&self, reader: Rd) -> Result<Parsed<R>> {
        let schema = R::schema();
        let mut rdr = ReaderBuilder::new()
            .delimiter(b'|')
            .has_headers(false)
            .flexible(true)
            // FEC names carry literal quotes, e.g. SMITH, JOHN "JACK"
            .quoting(false)
            .from_reader(reader);

        let mut report = ParseReport {
            dataset: schema.dataset,
            rows_read: 0,
            rows_kept: 0,
            rows_skipped: 0,
        };
        let mut records = Vec::new();
        let mut record = ByteRecord::new();

        while rdr.read_byte_record(&mut record)? {
            report.rows_read += 1;
            let line = record
                .position()
                .map(|p| p.line())
                .unwrap_or(report.rows_read);

            let parsed = schema
                .extract(&record)
                .and_then(|row| R::from_fields(&row));

            match parsed {
                Ok(value) => {
                    records.push(value);
                    report.rows_kept += 1;
                }
                Err(reason) => match self.policy {
                    ParsePolicy::FailFast => {
                        return Err(ReportError::MalformedRow {
                            dataset: schema.dataset,
                            line,
                            reason,
                        });
                    }
                    ParsePolicy::Skip => {
                        debug!("{}: skipping line {}: {}", schema.dataset, line, reason);
                        report.rows_skipped += 1;
                    }
                },
            }
        }

        if report.rows_skipped > 0 {
            warn!(
                "⚠️ {}: skipped {} malformed rows of {}",
                schema.dataset, report.rows_skipped, report.rows_read
            );
        }
        info!(
            "{}: parsed {} records ({} rows read)",
            schema.dataset, report.rows_kept, report.rows_read
        );

        Ok(Parsed { records, report })
    }
}

/// First `.txt` entry, else the first non-directory entry
fn data_entry_name(names: &[String]) -> Option<String> {
    names
        .iter()
        .find(|n| n.to_ascii_lowercase().ends_with(".txt"))
        .or_else(|| names.iter().find(|n| !n.ends_with('/')))
        .cloned()
}
