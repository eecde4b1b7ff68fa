//! Transaction model and ledger-line parsing.
//!
//! A sales ledger is a pipe-delimited text file: one header line followed by
//! one record per line with exactly eight fields (TransactionID, Date,
//! ProductID, ProductName, Quantity, UnitPrice, CustomerID, Region). Parsing
//! cleans each field (whitespace trim, thousands-separator removal) and
//! silently drops lines that are not syntactically a record; domain rules are
//! enforced later by the validator.

use log::debug;

pub const TRANSACTION_ID_PREFIX: char = 'T';
pub const PRODUCT_ID_PREFIX: char = 'P';
pub const CUSTOMER_ID_PREFIX: char = 'C';

const LEDGER_FIELD_COUNT: usize = 8;

/// A single parsed ledger row. Dates stay raw strings: they are only grouped
/// and sorted lexically, never calendar-validated.
#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub transaction_id: String,
    pub date: String,
    pub product_id: String,
    pub product_name: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub customer_id: String,
    pub region: String,
}

impl Transaction {
    /// Line total, recomputed on demand so it can never go stale.
    pub fn amount(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

/// Parses raw ledger lines into transactions. The first line is the column
/// header and is always skipped; malformed lines (wrong field count,
/// unparseable quantity or unit price) are dropped without error.
pub fn parse_transactions(lines: &[String]) -> Vec<Transaction> {
    let mut transactions = Vec::new();
    for (line_idx, line) in lines.iter().enumerate().skip(1) {
        match parse_line(line) {
            Some(transaction) => transactions.push(transaction),
            None => debug!("Dropping malformed ledger line {}", line_idx + 1),
        }
    }
    transactions
}

fn parse_line(line: &str) -> Option<Transaction> {
    let fields: Vec<&str> = line.split('|').map(str::trim).collect();
    if fields.len() != LEDGER_FIELD_COUNT {
        return None;
    }
    let quantity: i64 = fields[4].replace(',', "").parse().ok()?;
    let unit_price: f64 = fields[5].replace(',', "").parse().ok()?;
    Some(Transaction {
        transaction_id: fields[0].to_string(),
        date: fields[1].to_string(),
        product_id: fields[2].to_string(),
        product_name: fields[3].replace(',', ""),
        quantity,
        unit_price,
        customer_id: fields[6].to_string(),
        region: fields[7].to_string(),
    })
}
