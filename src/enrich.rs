//! Joins validated transactions to catalog metadata and writes the enriched
//! pipe-delimited output file.

use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use itertools::Itertools;
use log::info;

use crate::catalog::{self, CatalogMap};
use crate::cli::EnrichArgs;
use crate::io_utils;
use crate::record::{self, Transaction};
use crate::validate::{self, AmountBounds};

pub const ENRICHED_HEADERS: [&str; 12] = [
    "TransactionID",
    "Date",
    "ProductID",
    "ProductName",
    "Quantity",
    "UnitPrice",
    "CustomerID",
    "Region",
    "API_Category",
    "API_Brand",
    "API_Rating",
    "API_Match",
];

/// A transaction with whatever catalog metadata its product id resolved to.
/// `api_match` records the join outcome; the metadata fields stay optional
/// even on a match because the upstream catalog has nullable columns.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedTransaction {
    pub transaction: Transaction,
    pub api_category: Option<String>,
    pub api_brand: Option<String>,
    pub api_rating: Option<f64>,
    pub api_match: bool,
}

/// The numeric join key of a product id: leading non-digits stripped, the
/// remainder parsed as an integer. Anything unparseable simply never
/// matches.
pub fn numeric_product_key(product_id: &str) -> Option<u64> {
    product_id
        .trim_start_matches(|c: char| !c.is_ascii_digit())
        .parse()
        .ok()
}

pub fn enrich_transactions(
    transactions: &[Transaction],
    mapping: &CatalogMap,
) -> Vec<EnrichedTransaction> {
    transactions
        .iter()
        .map(|tx| {
            let entry = numeric_product_key(&tx.product_id).and_then(|key| mapping.get(&key));
            match entry {
                Some(entry) => EnrichedTransaction {
                    transaction: tx.clone(),
                    api_category: entry.category.clone(),
                    api_brand: entry.brand.clone(),
                    api_rating: entry.rating,
                    api_match: true,
                },
                None => EnrichedTransaction {
                    transaction: tx.clone(),
                    api_category: None,
                    api_brand: None,
                    api_rating: None,
                    api_match: false,
                },
            }
        })
        .collect()
}

pub fn match_count(enriched: &[EnrichedTransaction]) -> usize {
    enriched.iter().filter(|row| row.api_match).count()
}

/// Distinct product names that found no catalog entry, lexically sorted.
pub fn unenriched_product_names(enriched: &[EnrichedTransaction]) -> Vec<String> {
    enriched
        .iter()
        .filter(|row| !row.api_match)
        .map(|row| row.transaction.product_name.clone())
        .unique()
        .sorted()
        .collect()
}

/// Writes the full enriched file: fixed header row, then one pipe-delimited
/// record per transaction. `None` metadata renders as an empty field and the
/// match flag as `true`/`false`.
pub fn write_enriched_data(path: &Path, enriched: &[EnrichedTransaction]) -> Result<()> {
    let mut writer = io_utils::open_pipe_writer(path)?;
    writer
        .write_record(ENRICHED_HEADERS)
        .with_context(|| format!("Writing enriched file {path:?}"))?;
    for row in enriched {
        let tx = &row.transaction;
        let fields = [
            tx.transaction_id.clone(),
            tx.date.clone(),
            tx.product_id.clone(),
            tx.product_name.clone(),
            tx.quantity.to_string(),
            tx.unit_price.to_string(),
            tx.customer_id.clone(),
            tx.region.clone(),
            row.api_category.clone().unwrap_or_default(),
            row.api_brand.clone().unwrap_or_default(),
            row.api_rating.map(|rating| rating.to_string()).unwrap_or_default(),
            row.api_match.to_string(),
        ];
        writer
            .write_record(&fields)
            .with_context(|| format!("Writing enriched file {path:?}"))?;
    }
    writer
        .flush()
        .with_context(|| format!("Writing enriched file {path:?}"))?;
    Ok(())
}

/// `enrich` subcommand: parse, validate, join against the chosen catalog
/// source, write the enriched file.
pub fn execute(args: &EnrichArgs) -> Result<()> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let lines = io_utils::read_input_lines(&args.input, encoding)?;
    let parsed = record::parse_transactions(&lines);
    let (valid, summary) = validate::validate_and_filter(parsed, None, &AmountBounds::default());
    info!(
        "{} valid records ({} invalid dropped)",
        summary.final_valid, summary.invalid_records
    );

    let products = catalog::resolve_products(
        args.catalog.as_deref(),
        &args.catalog_url,
        Duration::from_secs(args.timeout_secs),
        args.offline,
    )?;
    let mapping = catalog::product_mapping(&products);
    let enriched = enrich_transactions(&valid, &mapping);
    write_enriched_data(&args.output, &enriched)?;
    println!(
        "Wrote {} records ({} enriched) to {}",
        enriched.len(),
        match_count(&enriched),
        args.output.display()
    );
    Ok(())
}
