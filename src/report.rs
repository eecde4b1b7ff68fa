//! The full-pipeline subcommand and the textual report layout.
//!
//! `render_report` is a pure function over the validated and enriched record
//! sets; the generation timestamp comes in as a preformatted string so tests
//! can pin the output byte for byte. The table builders are shared with the
//! `summary` subcommand, which prints the same sections straight to stdout.

use std::fmt::Write as _;
use std::time::Duration;

use anyhow::Result;
use chrono::Local;
use itertools::{Itertools, MinMaxResult};
use log::info;

use crate::aggregate::{self, CustomerStat, DailyStat, ProductStat, RegionStat};
use crate::catalog;
use crate::cli::ReportArgs;
use crate::enrich::{self, EnrichedTransaction};
use crate::format::{format_amount, format_percent, format_rate};
use crate::io_utils;
use crate::record::{self, Transaction};
use crate::table::{Align, render_table};
use crate::validate::{self, AmountBounds};

pub const REPORT_WIDTH: usize = 60;
const REPORT_TITLE: &str = "SALES ANALYTICS REPORT";

/// Renders the complete report. Section order and wording are fixed; every
/// ordering inside comes from the aggregation functions, so the same input
/// always produces the same bytes.
pub fn render_report(
    valid: &[Transaction],
    enriched: &[EnrichedTransaction],
    generated_at: &str,
    top_count: usize,
    low_quantity_threshold: i64,
) -> String {
    let total = aggregate::total_revenue(valid);
    let regions = aggregate::region_wise_sales(valid);
    let trend = aggregate::daily_sales_trend(valid);
    let peak = aggregate::peak_sales_day(valid);
    let top_products = aggregate::top_selling_products(valid, top_count);
    let low_products = aggregate::low_performing_products(valid, low_quantity_threshold);
    let customers = aggregate::customer_analysis(valid);
    let top_customers = &customers[..customers.len().min(top_count)];

    let banner = "=".repeat(REPORT_WIDTH);
    let mut out = String::new();
    let _ = writeln!(out, "{banner}");
    let centered = format!("{REPORT_TITLE:^width$}", width = REPORT_WIDTH);
    let _ = writeln!(out, "{}", centered.trim_end());
    let _ = writeln!(out, "{banner}");
    let _ = writeln!(out, "Generated: {generated_at}");
    let _ = writeln!(out, "Records analyzed: {}", valid.len());

    push_section(&mut out, "OVERALL SUMMARY");
    let _ = writeln!(out, "Total revenue: {}", format_amount(total));
    let _ = writeln!(out, "Transactions: {}", valid.len());
    let average = if valid.is_empty() {
        0.0
    } else {
        total / valid.len() as f64
    };
    let _ = writeln!(out, "Average order value: {}", format_amount(average));
    let _ = writeln!(out, "Date range: {}", date_range(valid));

    push_section(&mut out, "REGION-WISE SALES");
    let (headers, rows, aligns) = region_table(&regions);
    out.push_str(&render_table(&headers, &rows, &aligns));

    push_section(&mut out, &format!("TOP {top_count} PRODUCTS BY QUANTITY"));
    let (headers, rows, aligns) = top_products_table(&top_products);
    out.push_str(&render_table(&headers, &rows, &aligns));

    push_section(&mut out, &format!("TOP {top_count} CUSTOMERS BY SPEND"));
    let (headers, rows, aligns) = top_customers_table(top_customers);
    out.push_str(&render_table(&headers, &rows, &aligns));

    push_section(&mut out, "DAILY SALES TREND");
    let (headers, rows, aligns) = daily_trend_table(&trend);
    out.push_str(&render_table(&headers, &rows, &aligns));

    push_section(&mut out, "PRODUCT PERFORMANCE");
    match &peak {
        Some(day) => {
            let _ = writeln!(
                out,
                "Peak sales day: {} ({})",
                day.date,
                format_amount(day.revenue)
            );
        }
        None => {
            let _ = writeln!(out, "Peak sales day: n/a");
        }
    }
    let _ = writeln!(
        out,
        "Low performers (quantity < {low_quantity_threshold}): {}",
        name_list(&low_products)
    );
    out.push('\n');
    let (headers, rows, aligns) = region_average_table(&regions);
    out.push_str(&render_table(&headers, &rows, &aligns));

    push_section(&mut out, "ENRICHMENT SUMMARY");
    let matched = enrich::match_count(enriched);
    let rate = if enriched.is_empty() {
        0.0
    } else {
        matched as f64 / enriched.len() as f64 * 100.0
    };
    let _ = writeln!(
        out,
        "Enriched: {matched} of {} ({})",
        enriched.len(),
        format_rate(rate)
    );
    let missing = enrich::unenriched_product_names(enriched);
    let missing_list = if missing.is_empty() {
        "none".to_string()
    } else {
        missing.join(", ")
    };
    let _ = writeln!(out, "Unenriched products: {missing_list}");

    out.push('\n');
    let _ = writeln!(out, "{banner}");
    out
}

pub(crate) fn region_table(regions: &[RegionStat]) -> TableParts {
    let rows = regions
        .iter()
        .map(|stat| {
            vec![
                stat.region.clone(),
                format_amount(stat.total_sales),
                format_percent(stat.percent_of_total),
                stat.transaction_count.to_string(),
            ]
        })
        .collect();
    (
        headers(["region", "sales", "share", "transactions"]),
        rows,
        vec![Align::Left, Align::Right, Align::Right, Align::Right],
    )
}

pub(crate) fn top_products_table(products: &[ProductStat]) -> TableParts {
    let rows = products
        .iter()
        .enumerate()
        .map(|(idx, stat)| {
            vec![
                (idx + 1).to_string(),
                stat.product_name.clone(),
                stat.total_quantity.to_string(),
                format_amount(stat.total_revenue),
            ]
        })
        .collect();
    (
        headers(["rank", "product", "quantity", "revenue"]),
        rows,
        vec![Align::Right, Align::Left, Align::Right, Align::Right],
    )
}

pub(crate) fn top_customers_table(customers: &[CustomerStat]) -> TableParts {
    let rows = customers
        .iter()
        .enumerate()
        .map(|(idx, stat)| {
            vec![
                (idx + 1).to_string(),
                stat.customer_id.clone(),
                format_amount(stat.total_spent),
                stat.purchase_count.to_string(),
            ]
        })
        .collect();
    (
        headers(["rank", "customer", "spent", "orders"]),
        rows,
        vec![Align::Right, Align::Left, Align::Right, Align::Right],
    )
}

pub(crate) fn daily_trend_table(trend: &[DailyStat]) -> TableParts {
    let rows = trend
        .iter()
        .map(|stat| {
            vec![
                stat.date.clone(),
                format_amount(stat.revenue),
                stat.transaction_count.to_string(),
                stat.distinct_customers.to_string(),
            ]
        })
        .collect();
    (
        headers(["date", "revenue", "transactions", "customers"]),
        rows,
        vec![Align::Left, Align::Right, Align::Right, Align::Right],
    )
}

pub(crate) fn region_average_table(regions: &[RegionStat]) -> TableParts {
    let rows = regions
        .iter()
        .map(|stat| {
            vec![
                stat.region.clone(),
                format_amount(stat.total_sales / stat.transaction_count as f64),
            ]
        })
        .collect();
    (
        headers(["region", "avg transaction"]),
        rows,
        vec![Align::Left, Align::Right],
    )
}

pub(crate) type TableParts = (Vec<String>, Vec<Vec<String>>, Vec<Align>);

fn headers<const N: usize>(names: [&str; N]) -> Vec<String> {
    names.into_iter().map(str::to_string).collect()
}

fn push_section(out: &mut String, title: &str) {
    out.push('\n');
    out.push_str(title);
    out.push('\n');
    out.push_str(&"-".repeat(title.chars().count()));
    out.push('\n');
}

pub(crate) fn date_range(transactions: &[Transaction]) -> String {
    match transactions.iter().map(|tx| tx.date.as_str()).minmax() {
        MinMaxResult::NoElements => "n/a".to_string(),
        MinMaxResult::OneElement(only) => format!("{only} to {only}"),
        MinMaxResult::MinMax(first, last) => format!("{first} to {last}"),
    }
}

pub(crate) fn name_list(products: &[ProductStat]) -> String {
    if products.is_empty() {
        "none".to_string()
    } else {
        products.iter().map(|p| p.product_name.as_str()).join(", ")
    }
}

/// `report` subcommand: the whole pipeline, ending in the rendered report on
/// stdout or at `--report`.
pub fn execute(args: &ReportArgs) -> Result<()> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    info!("Reading ledger {}", args.input.display());
    let lines = io_utils::read_input_lines(&args.input, encoding)?;
    info!("Parsing {} lines", lines.len());
    let parsed = record::parse_transactions(&lines);
    info!("Validating {} parsed records", parsed.len());
    let bounds = AmountBounds {
        min: args.min_amount,
        max: args.max_amount,
    };
    let (valid, summary) = validate::validate_and_filter(parsed, args.region.as_deref(), &bounds);
    info!(
        "{} valid records ({} invalid, {} excluded by filters)",
        summary.final_valid,
        summary.invalid_records,
        summary.filtered_out()
    );

    let products = catalog::resolve_products(
        args.catalog.as_deref(),
        &args.catalog_url,
        Duration::from_secs(args.timeout_secs),
        args.offline,
    )?;
    let mapping = catalog::product_mapping(&products);
    info!(
        "Enriching {} records against {} catalog products",
        valid.len(),
        mapping.len()
    );
    let enriched = enrich::enrich_transactions(&valid, &mapping);
    if let Some(path) = &args.enriched {
        enrich::write_enriched_data(path, &enriched)?;
        println!("Enriched data written to {}", path.display());
    }

    let generated_at = Local::now().format("%Y-%m-%d %H:%M:%S").to_string();
    let report = render_report(
        &valid,
        &enriched,
        &generated_at,
        args.top,
        args.low_threshold,
    );
    match &args.report {
        Some(path) => {
            io_utils::write_text(path, &report)?;
            println!("Report written to {}", path.display());
        }
        None => print!("{report}"),
    }
    Ok(())
}
