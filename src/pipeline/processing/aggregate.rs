//! Grouped sums and counts over the joined tables.
//!
//! Missing values never count as zero: a missing amount is left out of the
//! sum, and a group only exists when at least one row contributes to it.

use rust_decimal::Decimal;
use std::collections::{BTreeMap, HashMap, HashSet};

use super::join::JoinedRow;
use super::normalize::{display_party, donation_party, DonationParty};
use crate::domain::{CandidateFinancialSummary, Quarter};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyCash {
    pub party: String,
    pub total_cash: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartyCounts {
    pub party: String,
    pub committees: usize,
    pub candidates: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationBucket {
    pub quarter: Quarter,
    pub party: DonationParty,
    pub total: Decimal,
    pub contributions: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientTotal {
    pub candidate_id: String,
    pub name: String,
    pub state: Option<String>,
    pub party: String,
    pub total: Decimal,
    pub contributions: usize,
}

/// End-of-period cash summed by party, largest first, at most `top_n` rows
pub fn cash_holdings(candidates: &[CandidateFinancialSummary], top_n: usize) -> Vec<PartyCash> {
    let mut totals: HashMap<String, Decimal> = HashMap::new();
    for candidate in candidates {
        if let Some(cash) = candidate.cash_on_hand {
            *totals
                .entry(display_party(candidate.party.as_deref()))
                .or_default() += cash;
        }
    }

    let mut rows: Vec<PartyCash> = totals
        .into_iter()
        .map(|(party, total_cash)| PartyCash { party, total_cash })
        .collect();
    rows.sort_by(|a, b| {
        b.total_cash
            .cmp(&a.total_cash)
            .then_with(|| a.party.cmp(&b.party))
    });
    rows.truncate(top_n);
    rows
}

/// Distinct committees and candidates per committee party, most committees first
pub fn committee_counts(rows: &[JoinedRow<'_>]) -> Vec<PartyCounts> {
    let mut groups: HashMap<String, (HashSet<&str>, HashSet<&str>)> = HashMap::new();
    for row in rows {
        let (committees, candidates) = groups
            .entry(display_party(row.committee.party.as_deref()))
            .or_default();
        committees.insert(row.committee.committee_id.as_str());
        if let Some(candidate_id) = row.committee.candidate_id.as_deref() {
            candidates.insert(candidate_id);
        }
    }

    let mut counts: Vec<PartyCounts> = groups
        .into_iter()
        .map(|(party, (committees, candidates))| PartyCounts {
            party,
            committees: committees.len(),
            candidates: candidates.len(),
        })
        .collect();
    counts.sort_by(|a, b| {
        b.committees
            .cmp(&a.committees)
            .then_with(|| a.party.cmp(&b.party))
    });
    counts
}

fn employer_contributions<'r, 'a>(
    rows: &'r [JoinedRow<'a>],
    employer: &'r str,
) -> impl Iterator<Item = (&'r JoinedRow<'a>, Decimal)> + 'r {
    rows.iter().filter_map(move |row| {
        let contribution = row.contribution?;
        if contribution.employer.as_deref() != Some(employer) {
            return None;
        }
        contribution.amount.map(|amount| (row, amount))
    })
}

/// Contributions from one employer summed by quarter and donation category.
///
/// Rows without a parsed date or an amount are left out. Sorted by quarter,
/// then category.
pub fn donation_distribution(rows: &[JoinedRow<'_>], employer: &str) -> Vec<DonationBucket> {
    let mut buckets: BTreeMap<(Quarter, DonationParty), (Decimal, usize)> = BTreeMap::new();
    for (row, amount) in employer_contributions(rows, employer) {
        let Some(date) = row.contribution.and_then(|c| c.date) else {
            continue;
        };
        let key = (
            Quarter::from_date(date),
            donation_party(row.committee.party.as_deref()),
        );
        let (total, count) = buckets.entry(key).or_default();
        *total += amount;
        *count += 1;
    }

    buckets
        .into_iter()
        .map(|((quarter, party), (total, contributions))| DonationBucket {
            quarter,
            party,
            total,
            contributions,
        })
        .collect()
}

/// Candidates receiving the most money from one employer's staff
pub fn top_recipients(rows: &[JoinedRow<'_>], employer: &str, n: usize) -> Vec<RecipientTotal> {
    let mut totals: HashMap<&str, RecipientTotal> = HashMap::new();
    for (row, amount) in employer_contributions(rows, employer) {
        let Some(candidate) = row.candidate else {
            continue;
        };
        let entry = totals
            .entry(candidate.candidate_id.as_str())
            .or_insert_with(|| RecipientTotal {
                candidate_id: candidate.candidate_id.clone(),
                name: candidate.full_name.clone(),
                state: candidate.state.clone(),
                party: display_party(candidate.party.as_deref()),
                total: Decimal::ZERO,
                contributions: 0,
            });
        entry.total += amount;
        entry.contributions += 1;
    }

    let mut recipients: Vec<RecipientTotal> = totals.into_values().collect();
    recipients.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.name.cmp(&b.name)));
    recipients.truncate(n);
    recipients
}
