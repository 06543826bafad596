// Report pipeline: fetch, parse, join, aggregate

pub mod ingestion;
pub mod processing;

use std::sync::Arc;
use std::time::Instant;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::app::ports::{BulkSourcePort, DatasetSource};
use crate::config::Config;
use crate::constants::{CANDIDATES_DATASET, COMMITTEES_DATASET, CONTRIBUTIONS_DATASET};
use crate::domain::{CandidateFinancialSummary, CommitteeRecord, ContributionRecord};
use crate::error::Result;
use crate::metrics;
use processing::aggregate::{
    cash_holdings, committee_counts, donation_distribution, top_recipients, DonationBucket,
    PartyCash, PartyCounts, RecipientTotal,
};
use processing::join::{join_candidates, join_committee_contributions};
use processing::parser::{FixedSchemaParser, ParsePolicy, ParseReport, SchemaRecord};

/// What was ingested for one dataset
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSummary {
    pub parse: ParseReport,
    pub archive_bytes: u64,
    pub sha256: String,
}

/// Everything the renderers need
#[derive(Debug, Clone, PartialEq)]
pub struct ElectionReport {
    pub cycle: String,
    pub employer: String,
    pub top_parties: usize,
    pub cash_holdings: Vec<PartyCash>,
    pub committee_counts: Vec<PartyCounts>,
    pub donations: Vec<DonationBucket>,
    pub top_recipients: Vec<RecipientTotal>,
    pub datasets: Vec<DatasetSummary>,
}

struct Loaded<R> {
    records: Vec<R>,
    summary: DatasetSummary,
}

pub struct Pipeline {
    source: Arc<dyn BulkSourcePort>,
    parser: FixedSchemaParser,
}

impl Pipeline {
    pub fn new(source: Arc<dyn BulkSourcePort>, policy: ParsePolicy) -> Self {
        Self {
            source,
            parser: FixedSchemaParser::new(policy),
        }
    }

    /// Fetch one archive and parse it on the blocking pool.
    ///
    /// The parse task owns the transient archive, so the file is gone once
    /// the task ends, whatever the outcome.
    #[instrument(skip(self, source), fields(dataset = source.dataset))]
    async fn load<R: SchemaRecord>(&self, source: DatasetSource) -> Result<Loaded<R>> {
        let t_fetch = Instant::now();
        let archive = self.source.fetch(&source).await?;
        info!(
            "📦 {}: {} bytes, sha256 {}",
            source.dataset,
            archive.bytes(),
            archive.sha256()
        );
        metrics::record_fetch(
            source.dataset,
            archive.bytes(),
            t_fetch.elapsed().as_secs_f64(),
        );

        let parser = self.parser;
        let t_parse = Instant::now();
        let (parsed, archive_bytes, sha256) = tokio::task::spawn_blocking(move || {
            let parsed = parser.parse_archive::<R>(archive.path());
            (parsed, archive.bytes(), archive.sha256().to_string())
        })
        .await?;
        let parsed = parsed?;

        metrics::record_parse(
            source.dataset,
            parsed.report.rows_kept,
            parsed.report.rows_skipped,
            t_parse.elapsed().as_secs_f64(),
        );

        Ok(Loaded {
            records: parsed.records,
            summary: DatasetSummary {
                parse: parsed.report,
                archive_bytes,
                sha256,
            },
        })
    }

    /// Run the whole report: three concurrent loads, then join and aggregate
    #[instrument(skip_all, fields(run_id = %Uuid::new_v4(), cycle = %config.cycle))]
    pub async fn run(&self, config: &Config) -> Result<ElectionReport> {
        info!("🚀 Starting FEC report pipeline for {}", config.cycle);
        let t_pipeline = Instant::now();

        let (candidates, committees, contributions) = tokio::try_join!(
            self.load::<CandidateFinancialSummary>(DatasetSource::new(
                CANDIDATES_DATASET,
                config.sources.candidates.as_str(),
            )),
            self.load::<CommitteeRecord>(DatasetSource::new(
                COMMITTEES_DATASET,
                config.sources.committees.as_str(),
            )),
            self.load::<ContributionRecord>(DatasetSource::new(
                CONTRIBUTIONS_DATASET,
                config.sources.contributions.as_str(),
            )),
        )?;

        let settings = config.clone();
        let report = tokio::task::spawn_blocking(move || {
            build_report(
                &settings,
                &candidates.records,
                &committees.records,
                &contributions.records,
                vec![candidates.summary, committees.summary, contributions.summary],
            )
        })
        .await?;

        let duration = t_pipeline.elapsed().as_secs_f64();
        metrics::record_run(duration);
        info!("🎉 Pipeline finished in {:.1}s", duration);
        Ok(report)
    }
}

/// Join the three tables and compute every aggregate
pub fn build_report(
    config: &Config,
    candidates: &[CandidateFinancialSummary],
    committees: &[CommitteeRecord],
    contributions: &[ContributionRecord],
    datasets: Vec<DatasetSummary>,
) -> ElectionReport {
    let committee_rows = join_committee_contributions(committees, contributions);
    let joined = join_candidates(&committee_rows, candidates);
    info!(
        "🔗 Joined {} committees, {} contributions, {} candidates into {} rows",
        committees.len(),
        contributions.len(),
        candidates.len(),
        joined.len()
    );

    let employer = config.report.employer.as_str();
    ElectionReport {
        cycle: config.cycle.clone(),
        employer: employer.to_string(),
        top_parties: config.report.top_parties,
        cash_holdings: cash_holdings(candidates, config.report.top_parties),
        committee_counts: committee_counts(&joined),
        donations: donation_distribution(&joined, employer),
        top_recipients: top_recipients(&joined, employer, config.report.top_recipients),
        datasets,
    }
}
