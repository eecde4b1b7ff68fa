//! Structural validation and optional record filtering.

use anyhow::Result;
use itertools::{Itertools, MinMaxResult};
use log::{debug, info};

use crate::cli::ValidateArgs;
use crate::format::format_amount;
use crate::io_utils;
use crate::record::{
    self, CUSTOMER_ID_PREFIX, PRODUCT_ID_PREFIX, TRANSACTION_ID_PREFIX, Transaction,
};
use crate::table::{Align, print_table};

/// Inclusive amount filter. `None` means unbounded on that side; `Some(0.0)`
/// is a genuine bound at zero, distinct from "unset".
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AmountBounds {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl AmountBounds {
    pub fn contains(&self, amount: f64) -> bool {
        if let Some(min) = self.min
            && amount < min
        {
            return false;
        }
        if let Some(max) = self.max
            && amount > max
        {
            return false;
        }
        true
    }

    pub fn is_unbounded(&self) -> bool {
        self.min.is_none() && self.max.is_none()
    }
}

/// Counts from one validation pass. Records excluded by the optional filters
/// are neither invalid nor final-valid; their count is the remainder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidationSummary {
    pub total_input: usize,
    pub invalid_records: usize,
    pub final_valid: usize,
}

impl ValidationSummary {
    pub fn filtered_out(&self) -> usize {
        self.total_input - self.invalid_records - self.final_valid
    }
}

/// Applies the five structural checks, then the optional region and amount
/// filters, preserving input order. Filter exclusions are not counted as
/// invalid.
pub fn validate_and_filter(
    transactions: Vec<Transaction>,
    region: Option<&str>,
    bounds: &AmountBounds,
) -> (Vec<Transaction>, ValidationSummary) {
    let total_input = transactions.len();
    let mut invalid_records = 0usize;
    let mut valid = Vec::with_capacity(total_input);
    for tx in transactions {
        if !is_structurally_valid(&tx) {
            debug!("rejecting invalid record {}", tx.transaction_id);
            invalid_records += 1;
            continue;
        }
        if let Some(region) = region
            && tx.region != region
        {
            continue;
        }
        if !bounds.contains(tx.amount()) {
            continue;
        }
        valid.push(tx);
    }
    let summary = ValidationSummary {
        total_input,
        invalid_records,
        final_valid: valid.len(),
    };
    (valid, summary)
}

fn is_structurally_valid(tx: &Transaction) -> bool {
    tx.quantity > 0
        && tx.unit_price > 0.0
        && tx.transaction_id.starts_with(TRANSACTION_ID_PREFIX)
        && tx.product_id.starts_with(PRODUCT_ID_PREFIX)
        && tx.customer_id.starts_with(CUSTOMER_ID_PREFIX)
        && !tx.region.is_empty()
}

/// `validate` subcommand: parse the ledger, run the checks, print the counts
/// and, when no filters were requested, the filterable value ranges found in
/// the valid records.
pub fn execute(args: &ValidateArgs) -> Result<()> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let lines = io_utils::read_input_lines(&args.input, encoding)?;
    let parsed = record::parse_transactions(&lines);
    let bounds = AmountBounds {
        min: args.min_amount,
        max: args.max_amount,
    };
    let (valid, summary) = validate_and_filter(parsed, args.region.as_deref(), &bounds);
    info!(
        "{} of {} records valid ({} invalid, {} filtered out)",
        summary.final_valid,
        summary.total_input,
        summary.invalid_records,
        summary.filtered_out()
    );

    let headers = vec!["metric".to_string(), "value".to_string()];
    let rows = vec![
        row("records parsed", summary.total_input),
        row("invalid records", summary.invalid_records),
        row("excluded by filters", summary.filtered_out()),
        row("valid records", summary.final_valid),
    ];
    print_table(&headers, &rows, &[Align::Left, Align::Right]);

    if args.region.is_none() && bounds.is_unbounded() {
        println!();
        println!("Filterable regions: {}", region_options(&valid));
        println!("Amount range: {}", amount_range(&valid));
    }
    Ok(())
}

fn row(metric: &str, value: usize) -> Vec<String> {
    vec![metric.to_string(), value.to_string()]
}

fn region_options(transactions: &[Transaction]) -> String {
    let regions = transactions
        .iter()
        .map(|tx| tx.region.as_str())
        .unique()
        .sorted()
        .join(", ");
    if regions.is_empty() {
        "none".to_string()
    } else {
        regions
    }
}

fn amount_range(transactions: &[Transaction]) -> String {
    match transactions
        .iter()
        .map(Transaction::amount)
        .minmax_by(|a, b| a.total_cmp(b))
    {
        MinMaxResult::NoElements => "n/a".to_string(),
        MinMaxResult::OneElement(only) => format_amount(only),
        MinMaxResult::MinMax(lo, hi) => {
            format!("{} to {}", format_amount(lo), format_amount(hi))
        }
    }
}
