/// Dataset names, used in logs, metrics labels and parse reports
pub const CANDIDATES_DATASET: &str = "candidates";
pub const COMMITTEES_DATASET: &str = "committees";
pub const CONTRIBUTIONS_DATASET: &str = "contributions";

/// FEC bulk downloads for the 2005-2006 cycle
pub const CANDIDATES_URL: &str = "https://www.fec.gov/files/bulk-downloads/2006/weball06.zip";
pub const COMMITTEES_URL: &str = "https://www.fec.gov/files/bulk-downloads/2006/cm06.zip";
pub const CONTRIBUTIONS_URL: &str = "https://www.fec.gov/files/bulk-downloads/2006/indiv06.zip";

pub const DEFAULT_CYCLE: &str = "2005-2006";

/// Employer literal for the donation-distribution dataset; matched exactly
pub const DEFAULT_EMPLOYER: &str = "HARVARD UNIVERSITY";

pub const DEFAULT_TOP_PARTIES: usize = 5;
pub const DEFAULT_TOP_RECIPIENTS: usize = 10;

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 300;

pub const DEFAULT_CHART_PATH: &str = "output/harvard_donations.svg";
pub const DEFAULT_CHART_WIDTH: u32 = 1200;
pub const DEFAULT_CHART_HEIGHT: u32 = 700;

pub const DEFAULT_CONFIG_FILE: &str = "fec_report.toml";
pub const DEFAULT_LOG_DIR: &str = "logs";

/// FEC transaction dates are MMDDYYYY
pub const TRANSACTION_DATE_FORMAT: &str = "%m%d%Y";
