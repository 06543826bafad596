use clap::{Parser, Subcommand};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info};

use fec_report::app::ports::BulkSourcePort;
use fec_report::config::Config;
use fec_report::constants;
use fec_report::infra::{LocalArchiveSource, ReqwestBulkSource};
use fec_report::logging;
use fec_report::metrics;
use fec_report::pipeline::processing::parser::{schema::all_schemas, ParsePolicy};
use fec_report::pipeline::{ElectionReport, Pipeline};
use fec_report::report::chart::{render_chart, ChartOptions};
use fec_report::report::render_tables;

#[derive(Parser)]
#[command(name = "fec_report")]
#[command(about = "FEC bulk data join-and-report pipeline")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch the bulk archives, join them, print the report and draw the chart
    Run {
        /// TOML config file (defaults to ./fec_report.toml when present)
        #[arg(long)]
        config: Option<PathBuf>,
        /// Read weball06.zip, cm06.zip and indiv06.zip from this directory instead of downloading
        #[arg(long)]
        from_dir: Option<PathBuf>,
        /// Employer to filter donations by
        #[arg(long)]
        employer: Option<String>,
        /// Abort on the first malformed row
        #[arg(long)]
        fail_fast: bool,
        /// Where to write the SVG chart
        #[arg(long, conflicts_with = "no_chart")]
        chart: Option<PathBuf>,
        /// Skip the chart
        #[arg(long)]
        no_chart: bool,
        /// Also write the tables to this file
        #[arg(long)]
        report_out: Option<PathBuf>,
        /// Write Prometheus text exposition of run metrics to this file
        #[arg(long)]
        metrics_out: Option<PathBuf>,
    },
    /// Print the column layout read from each bulk file
    Schema,
}

struct RunArgs {
    config: Option<PathBuf>,
    from_dir: Option<PathBuf>,
    employer: Option<String>,
    fail_fast: bool,
    chart: Option<PathBuf>,
    no_chart: bool,
    report_out: Option<PathBuf>,
    metrics_out: Option<PathBuf>,
}

fn resolve_config(args: &RunArgs) -> fec_report::error::Result<Config> {
    let mut config = Config::load(args.config.as_deref())?;
    if let Some(employer) = &args.employer {
        config.report.employer = employer.clone();
    }
    if args.fail_fast {
        config.parse.policy = ParsePolicy::FailFast;
    }
    if args.no_chart {
        config.report.chart_path = None;
    } else if let Some(chart) = &args.chart {
        config.report.chart_path = Some(chart.clone());
    }
    config.validate()?;
    Ok(config)
}

fn build_source(config: &Config, from_dir: Option<&Path>) -> fec_report::error::Result<Arc<dyn BulkSourcePort>> {
    let download_dir = config.fetch.download_dir.clone();
    Ok(match from_dir {
        Some(dir) => {
            info!("📂 Reading archives from {}", dir.display());
            Arc::new(LocalArchiveSource::new(dir, download_dir))
        }
        None => Arc::new(ReqwestBulkSource::new(
            Duration::from_secs(config.fetch.timeout_seconds),
            download_dir,
        )?),
    })
}

fn write_report(report: &ElectionReport, report_out: Option<&Path>) -> anyhow::Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();
    render_tables(&mut out, report)?;
    out.flush()?;

    if let Some(path) = report_out {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = BufWriter::new(File::create(path)?);
        render_tables(&mut file, report)?;
        file.flush()?;
        info!("📝 Report written to {}", path.display());
    }
    Ok(())
}

async fn run(args: RunArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args)?;
    let prometheus = match &args.metrics_out {
        Some(_) => Some(metrics::install_prometheus()?),
        None => None,
    };

    let source = build_source(&config, args.from_dir.as_deref())?;
    let pipeline = Pipeline::new(source, config.parse.policy);
    let report = pipeline.run(&config).await?;

    write_report(&report, args.report_out.as_deref())?;

    if let Some(path) = &config.report.chart_path {
        let options = ChartOptions {
            title: format!("Donations from {} employees, {}", report.employer, report.cycle),
            width: config.report.chart_width,
            height: config.report.chart_height,
        };
        if render_chart(&report.donations, path, &options)? {
            println!("📊 Chart: {}", path.display());
        }
    }

    if let (Some(handle), Some(path)) = (&prometheus, &args.metrics_out) {
        metrics::write_exposition(handle, path)?;
        info!("📈 Metrics written to {}", path.display());
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            config,
            from_dir,
            employer,
            fail_fast,
            chart,
            no_chart,
            report_out,
            metrics_out,
        } => {
            dotenv::dotenv().ok();
            let _log_guard = logging::init_logging(Path::new(constants::DEFAULT_LOG_DIR));

            let args = RunArgs {
                config,
                from_dir,
                employer,
                fail_fast,
                chart,
                no_chart,
                report_out,
                metrics_out,
            };
            if let Err(e) = run(args).await {
                error!("❌ Run failed: {:#}", e);
                return ExitCode::FAILURE;
            }
        }
        Commands::Schema => {
            for schema in all_schemas() {
                println!("{}", schema);
            }
        }
    }
    ExitCode::SUCCESS
}
