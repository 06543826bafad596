//! Left joins across the three bulk tables.
//!
//! Rows borrow from the parsed record sets; nothing is copied. Unmatched
//! left-hand rows are kept with `None` on the right.

use std::collections::HashMap;

use crate::domain::{CandidateFinancialSummary, CommitteeRecord, ContributionRecord};

#[derive(Debug, Clone, Copy)]
pub struct CommitteeContribution<'a> {
    pub committee: &'a CommitteeRecord,
    pub contribution: Option<&'a ContributionRecord>,
}

#[derive(Debug, Clone, Copy)]
pub struct JoinedRow<'a> {
    pub committee: &'a CommitteeRecord,
    pub contribution: Option<&'a ContributionRecord>,
    pub candidate: Option<&'a CandidateFinancialSummary>,
}

/// Group items by a borrowed string key, keeping input order within a key
fn index_by<'a, T, F>(items: &'a [T], key: F) -> HashMap<&'a str, Vec<&'a T>>
where
    F: Fn(&'a T) -> Option<&'a str>,
{
    let mut index: HashMap<&'a str, Vec<&'a T>> = HashMap::new();
    for item in items {
        if let Some(k) = key(item) {
            index.entry(k).or_default().push(item);
        }
    }
    index
}

/// Committees left-joined to contributions on committee identifier
pub fn join_committee_contributions<'a>(
    committees: &'a [CommitteeRecord],
    contributions: &'a [ContributionRecord],
) -> Vec<CommitteeContribution<'a>> {
    let by_committee = index_by(contributions, |c| Some(c.committee_id.as_str()));

    let mut rows = Vec::with_capacity(committees.len().max(contributions.len()));
    for committee in committees {
        match by_committee.get(committee.committee_id.as_str()) {
            Some(matches) => rows.extend(matches.iter().map(|contribution| {
                CommitteeContribution {
                    committee,
                    contribution: Some(*contribution),
                }
            })),
            None => rows.push(CommitteeContribution {
                committee,
                contribution: None,
            }),
        }
    }
    rows
}

/// Committee/contribution rows left-joined to candidate summaries on the
/// committee's candidate identifier
pub fn join_candidates<'a>(
    rows: &[CommitteeContribution<'a>],
    candidates: &'a [CandidateFinancialSummary],
) -> Vec<JoinedRow<'a>> {
    let by_candidate = index_by(candidates, |c| Some(c.candidate_id.as_str()));

    let mut joined = Vec::with_capacity(rows.len());
    for row in rows {
        let matches = row
            .committee
            .candidate_id
            .as_deref()
            .and_then(|id| by_candidate.get(id));

        match matches {
            Some(candidates) => joined.extend(candidates.iter().map(|candidate| JoinedRow {
                committee: row.committee,
                contribution: row.contribution,
                candidate: Some(*candidate),
            })),
            None => joined.push(JoinedRow {
                committee: row.committee,
                contribution: row.contribution,
                candidate: None,
            }),
        }
    }
    joined
}
