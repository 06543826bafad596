//! Column layouts of the FEC bulk files.
//!
//! Positions are 1-based, as in the FEC data dictionaries. Only the columns
//! listed here are read; everything else in a row is dropped.

use csv::ByteRecord;
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;

use crate::constants::{CANDIDATES_DATASET, COMMITTEES_DATASET, CONTRIBUTIONS_DATASET};
use crate::domain::{
    full_name_from_raw, parse_transaction_date, CandidateFinancialSummary, CommitteeRecord,
    ContributionRecord,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Text,
    Decimal,
}

#[derive(Debug, Clone, Copy)]
pub struct Column {
    pub position: usize,
    pub name: &'static str,
    pub kind: ColumnKind,
}

const fn text(position: usize, name: &'static str) -> Column {
    Column {
        position,
        name,
        kind: ColumnKind::Text,
    }
}

const fn decimal(position: usize, name: &'static str) -> Column {
    Column {
        position,
        name,
        kind: ColumnKind::Decimal,
    }
}

#[derive(Debug)]
pub struct Schema {
    pub dataset: &'static str,
    /// Archive file name on the bulk download server
    pub archive: &'static str,
    pub columns: &'static [Column],
}

/// weball06: all candidates, financial summary per candidate
pub static CANDIDATE_SUMMARY: Schema = Schema {
    dataset: CANDIDATES_DATASET,
    archive: "weball06.zip",
    columns: &[
        text(1, "CAND_ID"),
        text(2, "CAND_NAME"),
        text(5, "CAND_PTY_AFFILIATION"),
        decimal(11, "COH_COP"),
        text(19, "CAND_OFFICE_ST"),
    ],
};

/// cm06: committee master
pub static COMMITTEE_MASTER: Schema = Schema {
    dataset: COMMITTEES_DATASET,
    archive: "cm06.zip",
    columns: &[
        text(1, "CMTE_ID"),
        text(11, "CMTE_PTY_AFFILIATION"),
        text(15, "CAND_ID"),
    ],
};

/// indiv06: contributions by individuals
pub static INDIVIDUAL_CONTRIBUTIONS: Schema = Schema {
    dataset: CONTRIBUTIONS_DATASET,
    archive: "indiv06.zip",
    columns: &[
        text(1, "CMTE_ID"),
        text(12, "EMPLOYER"),
        text(13, "OCCUPATION"),
        text(14, "TRANSACTION_DT"),
        decimal(15, "TRANSACTION_AMT"),
    ],
};

pub fn all_schemas() -> [&'static Schema; 3] {
    [&CANDIDATE_SUMMARY, &COMMITTEE_MASTER, &INDIVIDUAL_CONTRIBUTIONS]
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(Option<String>),
    Decimal(Option<Decimal>),
}

/// The mapped fields of one row, in schema column order
#[derive(Debug)]
pub struct FieldRow<'s> {
    schema: &'s Schema,
    values: Vec<FieldValue>,
}

impl Schema {
    /// Rows shorter than this cannot hold every mapped column
    pub fn min_fields(&self) -> usize {
        self.columns.iter().map(|c| c.position).max().unwrap_or(0)
    }

    /// Pull the mapped columns out of a raw row.
    ///
    /// Fields are decoded lossily and trimmed; empty fields become `None`.
    pub fn extract(&self, record: &ByteRecord) -> Result<FieldRow<'_>, String> {
        if record.len() < self.min_fields() {
            return Err(format!(
                "expected at least {} fields, found {}",
                self.min_fields(),
                record.len()
            ));
        }

        let mut values = Vec::with_capacity(self.columns.len());
        for column in self.columns {
            let raw = record
                .get(column.position - 1)
                .map(|bytes| String::from_utf8_lossy(bytes).trim().to_string())
                .filter(|s| !s.is_empty());

            let value = match (column.kind, raw) {
                (ColumnKind::Text, raw) => FieldValue::Text(raw),
                (ColumnKind::Decimal, None) => FieldValue::Decimal(None),
                (ColumnKind::Decimal, Some(raw)) => {
                    let parsed = Decimal::from_str(&raw).map_err(|_| {
                        format!("column {} is not numeric: {:?}", column.name, raw)
                    })?;
                    FieldValue::Decimal(Some(parsed))
                }
            };
            values.push(value);
        }

        Ok(FieldRow {
            schema: self,
            values,
        })
    }
}

impl fmt::Display for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} ({})", self.dataset, self.archive)?;
        for column in self.columns {
            let kind = match column.kind {
                ColumnKind::Text => "text",
                ColumnKind::Decimal => "decimal",
            };
            writeln!(f, "  {:>3}  {:<22} {}", column.position, column.name, kind)?;
        }
        Ok(())
    }
}

impl FieldRow<'_> {
    fn slot(&self, name: &str) -> Option<&FieldValue> {
        let index = self.schema.columns.iter().position(|c| c.name == name)?;
        self.values.get(index)
    }

    pub fn text(&self, name: &str) -> Option<String> {
        match self.slot(name) {
            Some(FieldValue::Text(value)) => value.clone(),
            _ => None,
        }
    }

    pub fn decimal(&self, name: &str) -> Option<Decimal> {
        match self.slot(name) {
            Some(FieldValue::Decimal(value)) => *value,
            _ => None,
        }
    }

    pub fn required_text(&self, name: &str) -> Result<String, String> {
        self.text(name).ok_or_else(|| format!("missing {}", name))
    }
}

/// A record type that can be built from one schema row
pub trait SchemaRecord: Sized + Send + 'static {
    fn schema() -> &'static Schema;
    fn from_fields(row: &FieldRow<'_>) -> Result<Self, String>;
}

impl SchemaRecord for CandidateFinancialSummary {
    fn schema() -> &'static Schema {
        &CANDIDATE_SUMMARY
    }

    fn from_fields(row: &FieldRow<'_>) -> Result<Self, String> {
        Ok(Self {
            candidate_id: row.required_text("CAND_ID")?,
            full_name: row
                .text("CAND_NAME")
                .map(|raw| full_name_from_raw(&raw))
                .unwrap_or_default(),
            party: row.text("CAND_PTY_AFFILIATION"),
            cash_on_hand: row.decimal("COH_COP"),
            state: row.text("CAND_OFFICE_ST"),
        })
    }
}

impl SchemaRecord for CommitteeRecord {
    fn schema() -> &'static Schema {
        &COMMITTEE_MASTER
    }

    fn from_fields(row: &FieldRow<'_>) -> Result<Self, String> {
        Ok(Self {
            committee_id: row.required_text("CMTE_ID")?,
            party: row.text("CMTE_PTY_AFFILIATION"),
            candidate_id: row.text("CAND_ID"),
        })
    }
}

impl SchemaRecord for ContributionRecord {
    fn schema() -> &'static Schema {
        &INDIVIDUAL_CONTRIBUTIONS
    }

    fn from_fields(row: &FieldRow<'_>) -> Result<Self, String> {
        let transaction_date = row.text("TRANSACTION_DT");
        let date = transaction_date.as_deref().and_then(parse_transaction_date);
        Ok(Self {
            committee_id: row.required_text("CMTE_ID")?,
            transaction_date,
            date,
            amount: row.decimal("TRANSACTION_AMT"),
            employer: row.text("EMPLOYER"),
            occupation: row.text("OCCUPATION"),
        })
    }
}
