//! `summary` subcommand: the aggregate battery straight to stdout, without
//! the report banners or the enrichment stage.

use anyhow::Result;
use log::info;

use crate::aggregate;
use crate::cli::SummaryArgs;
use crate::format::format_amount;
use crate::io_utils;
use crate::record;
use crate::report;
use crate::table::print_table;
use crate::validate::{self, AmountBounds};

pub fn execute(args: &SummaryArgs) -> Result<()> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let lines = io_utils::read_input_lines(&args.input, encoding)?;
    let parsed = record::parse_transactions(&lines);
    let bounds = AmountBounds {
        min: args.min_amount,
        max: args.max_amount,
    };
    let (valid, counts) = validate::validate_and_filter(parsed, args.region.as_deref(), &bounds);
    info!(
        "{} valid records ({} invalid, {} excluded by filters)",
        counts.final_valid,
        counts.invalid_records,
        counts.filtered_out()
    );

    let total = aggregate::total_revenue(&valid);
    let average = if valid.is_empty() {
        0.0
    } else {
        total / valid.len() as f64
    };
    println!("Total revenue: {}", format_amount(total));
    println!("Transactions: {}", valid.len());
    println!("Average order value: {}", format_amount(average));
    println!("Date range: {}", report::date_range(&valid));

    let regions = aggregate::region_wise_sales(&valid);
    println!();
    let (headers, rows, aligns) = report::region_table(&regions);
    print_table(&headers, &rows, &aligns);

    let trend = aggregate::daily_sales_trend(&valid);
    println!();
    let (headers, rows, aligns) = report::daily_trend_table(&trend);
    print_table(&headers, &rows, &aligns);

    let top_products = aggregate::top_selling_products(&valid, args.top);
    println!();
    let (headers, rows, aligns) = report::top_products_table(&top_products);
    print_table(&headers, &rows, &aligns);

    let low_products = aggregate::low_performing_products(&valid, args.low_threshold);
    println!();
    println!(
        "Low performers (quantity < {}): {}",
        args.low_threshold,
        report::name_list(&low_products)
    );

    let customers = aggregate::customer_analysis(&valid);
    let top_customers = &customers[..customers.len().min(args.top)];
    println!();
    let (headers, rows, aligns) = report::top_customers_table(top_customers);
    print_table(&headers, &rows, &aligns);
    Ok(())
}
