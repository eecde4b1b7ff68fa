use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::catalog::{DEFAULT_CATALOG_URL, DEFAULT_TIMEOUT_SECS};

#[derive(Debug, Parser)]
#[command(author, version, about = "Analyze pipe-delimited sales ledgers", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the full pipeline and render the analytics report
    Report(ReportArgs),
    /// Validate a ledger and show the record counts and filter options
    Validate(ValidateArgs),
    /// Print the aggregate tables without the report wrapper
    Summary(SummaryArgs),
    /// Enrich a ledger against the product catalog and write the result
    Enrich(EnrichArgs),
    /// Preview the first few parsed records in a formatted table
    Preview(PreviewArgs),
}

#[derive(Debug, Args)]
pub struct ReportArgs {
    /// Input ledger file ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Report file path (stdout if omitted)
    #[arg(short = 'o', long = "report")]
    pub report: Option<PathBuf>,
    /// Also write the enriched pipe-delimited data file
    #[arg(long = "enriched")]
    pub enriched: Option<PathBuf>,
    /// Local catalog JSON file used instead of fetching
    #[arg(long = "catalog")]
    pub catalog: Option<PathBuf>,
    /// Catalog endpoint to fetch product metadata from
    #[arg(long = "catalog-url", default_value = DEFAULT_CATALOG_URL)]
    pub catalog_url: String,
    /// Skip the catalog fetch entirely
    #[arg(long)]
    pub offline: bool,
    /// Catalog fetch timeout in seconds
    #[arg(long = "timeout-secs", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
    /// Keep only records from this region (exact match)
    #[arg(long)]
    pub region: Option<String>,
    /// Keep only records with amount at or above this value
    #[arg(long = "min-amount")]
    pub min_amount: Option<f64>,
    /// Keep only records with amount at or below this value
    #[arg(long = "max-amount")]
    pub max_amount: Option<f64>,
    /// Number of products and customers to rank
    #[arg(long, default_value_t = 5)]
    pub top: usize,
    /// Quantity below which a product counts as a low performer
    #[arg(long = "low-threshold", default_value_t = 10)]
    pub low_threshold: i64,
    /// Character encoding of the input file (defaults to utf-8 with a
    /// windows-1252 fallback)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct ValidateArgs {
    /// Input ledger file ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Keep only records from this region (exact match)
    #[arg(long)]
    pub region: Option<String>,
    /// Keep only records with amount at or above this value
    #[arg(long = "min-amount")]
    pub min_amount: Option<f64>,
    /// Keep only records with amount at or below this value
    #[arg(long = "max-amount")]
    pub max_amount: Option<f64>,
    /// Character encoding of the input file (defaults to utf-8 with a
    /// windows-1252 fallback)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Input ledger file ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Keep only records from this region (exact match)
    #[arg(long)]
    pub region: Option<String>,
    /// Keep only records with amount at or above this value
    #[arg(long = "min-amount")]
    pub min_amount: Option<f64>,
    /// Keep only records with amount at or below this value
    #[arg(long = "max-amount")]
    pub max_amount: Option<f64>,
    /// Number of products and customers to rank
    #[arg(long, default_value_t = 5)]
    pub top: usize,
    /// Quantity below which a product counts as a low performer
    #[arg(long = "low-threshold", default_value_t = 10)]
    pub low_threshold: i64,
    /// Character encoding of the input file (defaults to utf-8 with a
    /// windows-1252 fallback)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct EnrichArgs {
    /// Input ledger file ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Destination for the enriched pipe-delimited file
    #[arg(short = 'o', long = "output")]
    pub output: PathBuf,
    /// Local catalog JSON file used instead of fetching
    #[arg(long = "catalog")]
    pub catalog: Option<PathBuf>,
    /// Catalog endpoint to fetch product metadata from
    #[arg(long = "catalog-url", default_value = DEFAULT_CATALOG_URL)]
    pub catalog_url: String,
    /// Skip the catalog fetch entirely
    #[arg(long)]
    pub offline: bool,
    /// Catalog fetch timeout in seconds
    #[arg(long = "timeout-secs", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
    /// Character encoding of the input file (defaults to utf-8 with a
    /// windows-1252 fallback)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}

#[derive(Debug, Args)]
pub struct PreviewArgs {
    /// Input ledger file ('-' reads stdin)
    #[arg(short = 'i', long = "input")]
    pub input: PathBuf,
    /// Number of records to display
    #[arg(long, default_value_t = 10)]
    pub rows: usize,
    /// Character encoding of the input file (defaults to utf-8 with a
    /// windows-1252 fallback)
    #[arg(long = "input-encoding")]
    pub input_encoding: Option<String>,
}
