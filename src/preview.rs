use anyhow::Result;
use log::info;

use crate::cli::PreviewArgs;
use crate::format::format_amount;
use crate::io_utils;
use crate::record;
use crate::table::{Align, print_table};

pub fn execute(args: &PreviewArgs) -> Result<()> {
    let encoding = io_utils::resolve_encoding(args.input_encoding.as_deref())?;
    let lines = io_utils::read_input_lines(&args.input, encoding)?;
    let parsed = record::parse_transactions(&lines);

    let headers: Vec<String> = [
        "transaction",
        "date",
        "product",
        "quantity",
        "unit price",
        "amount",
        "customer",
        "region",
    ]
    .into_iter()
    .map(str::to_string)
    .collect();
    let rows: Vec<Vec<String>> = parsed
        .iter()
        .take(args.rows)
        .map(|tx| {
            vec![
                tx.transaction_id.clone(),
                tx.date.clone(),
                tx.product_name.clone(),
                tx.quantity.to_string(),
                format_amount(tx.unit_price),
                format_amount(tx.amount()),
                tx.customer_id.clone(),
                tx.region.clone(),
            ]
        })
        .collect();
    let aligns = [
        Align::Left,
        Align::Left,
        Align::Left,
        Align::Right,
        Align::Right,
        Align::Right,
        Align::Left,
        Align::Left,
    ];

    print_table(&headers, &rows, &aligns);
    info!(
        "Displayed {} of {} parsed record(s) from {:?}",
        rows.len(),
        parsed.len(),
        args.input
    );
    Ok(())
}
