use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use std::fmt;

use crate::constants::TRANSACTION_DATE_FORMAT;

/// One row of the "all candidates" summary file
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFinancialSummary {
    pub candidate_id: String,
    /// "FIRST LAST", derived from the raw "LAST, FIRST" name
    pub full_name: String,
    pub party: Option<String>,
    /// Cash on hand at the close of the coverage period
    pub cash_on_hand: Option<Decimal>,
    pub state: Option<String>,
}

/// One row of the committee master file
#[derive(Debug, Clone, PartialEq)]
pub struct CommitteeRecord {
    pub committee_id: String,
    pub party: Option<String>,
    pub candidate_id: Option<String>,
}

/// One row of the individual contributions file
#[derive(Debug, Clone, PartialEq)]
pub struct ContributionRecord {
    pub committee_id: String,
    /// Raw MMDDYYYY text as filed
    pub transaction_date: Option<String>,
    pub date: Option<NaiveDate>,
    pub amount: Option<Decimal>,
    pub employer: Option<String>,
    pub occupation: Option<String>,
}

/// Turns the FEC "LAST, FIRST MIDDLE" form into "FIRST MIDDLE LAST".
///
/// Text without a comma is returned trimmed.
pub fn full_name_from_raw(raw: &str) -> String {
    match raw.split_once(',') {
        Some((last, first)) => {
            let last = last.trim();
            let first = first.trim();
            match (first.is_empty(), last.is_empty()) {
                (true, _) => last.to_string(),
                (false, true) => first.to_string(),
                (false, false) => format!("{} {}", first, last),
            }
        }
        None => raw.trim().to_string(),
    }
}

pub fn parse_transaction_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), TRANSACTION_DATE_FORMAT).ok()
}

/// A calendar quarter, the time bucket of the donation-distribution dataset
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Quarter {
    pub year: i32,
    /// 1..=4
    pub quarter: u32,
}

impl Quarter {
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            quarter: (date.month0() / 3) + 1,
        }
    }

    /// The date truncated to the quarter boundary
    pub fn start_date(&self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, (self.quarter - 1) * 3 + 1, 1)
            .unwrap_or(NaiveDate::MIN)
    }

    /// Consecutive quarters map to consecutive integers (chart x axis)
    pub fn index(&self) -> i32 {
        self.year * 4 + (self.quarter as i32 - 1)
    }

    pub fn from_index(index: i32) -> Self {
        Self {
            year: index.div_euclid(4),
            quarter: index.rem_euclid(4) as u32 + 1,
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-Q{}", self.year, self.quarter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_name_reorders_last_first() {
        assert_eq!(full_name_from_raw("SMITH, JOHN A"), "JOHN A SMITH");
        assert_eq!(full_name_from_raw("  CLINTON ,HILLARY RODHAM "), "HILLARY RODHAM CLINTON");
        assert_eq!(full_name_from_raw("O'BRIEN, PAT, JR"), "PAT, JR O'BRIEN");
    }

    #[test]
    fn test_full_name_without_comma_is_trimmed() {
        assert_eq!(full_name_from_raw("  CHER "), "CHER");
        assert_eq!(full_name_from_raw("SMITH,"), "SMITH");
    }

    #[test]
    fn test_transaction_date_is_mmddyyyy() {
        assert_eq!(
            parse_transaction_date("03312006"),
            NaiveDate::from_ymd_opt(2006, 3, 31)
        );
        assert_eq!(parse_transaction_date("2006-03-31"), None);
        assert_eq!(parse_transaction_date("13012006"), None);
    }

    #[test]
    fn test_quarter_truncates_to_boundary() {
        let q = Quarter::from_date(NaiveDate::from_ymd_opt(2006, 5, 17).unwrap());
        assert_eq!(q, Quarter { year: 2006, quarter: 2 });
        assert_eq!(q.start_date(), NaiveDate::from_ymd_opt(2006, 4, 1).unwrap());
        assert_eq!(q.to_string(), "2006-Q2");

        let dec = Quarter::from_date(NaiveDate::from_ymd_opt(2005, 12, 31).unwrap());
        assert_eq!(dec.start_date(), NaiveDate::from_ymd_opt(2005, 10, 1).unwrap());
    }

    #[test]
    fn test_quarter_index_is_consecutive() {
        let q4 = Quarter { year: 2005, quarter: 4 };
        let q1 = Quarter { year: 2006, quarter: 1 };
        assert_eq!(q1.index() - q4.index(), 1);
        assert_eq!(Quarter::from_index(q4.index()), q4);
        assert_eq!(Quarter::from_index(q1.index()), q1);
    }
}
