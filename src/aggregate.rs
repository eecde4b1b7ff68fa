//! Pure aggregation functions over validated transactions.
//!
//! Every function here assumes its input already passed validation and never
//! re-checks domain rules. Grouping is a single pass that accumulates into a
//! vector in first-encounter order (with a key-to-slot map for lookups), then
//! applies an explicit stable sort for the documented ordering; ties resolve
//! to the earlier-encountered group.

use std::collections::{BTreeSet, HashMap, HashSet};

use crate::record::Transaction;

/// One region's share of the ledger: accumulated sales, transaction count,
/// and percentage of the grand total (0.0 when the grand total is zero).
#[derive(Debug, Clone, PartialEq)]
pub struct RegionStat {
    pub region: String,
    pub total_sales: f64,
    pub transaction_count: usize,
    pub percent_of_total: f64,
}

/// One calendar day's revenue, transaction count, and distinct buyers.
#[derive(Debug, Clone, PartialEq)]
pub struct DailyStat {
    pub date: String,
    pub revenue: f64,
    pub transaction_count: usize,
    pub distinct_customers: usize,
}

/// Quantity and revenue totals for one product name; used by the ranking
/// functions only.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductStat {
    pub product_name: String,
    pub total_quantity: i64,
    pub total_revenue: f64,
}

/// Per-customer rollup. `products` holds the distinct product names the
/// customer bought, in lexical order for determinism.
#[derive(Debug, Clone, PartialEq)]
pub struct CustomerStat {
    pub customer_id: String,
    pub total_spent: f64,
    pub purchase_count: usize,
    pub average_order_value: f64,
    pub products: Vec<String>,
}

/// Sum of `quantity * unit_price` over the whole slice; 0.0 when empty.
pub fn total_revenue(transactions: &[Transaction]) -> f64 {
    transactions.iter().map(Transaction::amount).sum()
}

/// Groups by region and attaches each region's percentage of the grand
/// total. Sorted by total sales descending; equal sales keep first-encounter
/// order.
pub fn region_wise_sales(transactions: &[Transaction]) -> Vec<RegionStat> {
    let grand_total = total_revenue(transactions);
    let mut stats: Vec<RegionStat> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();
    for tx in transactions {
        let stat = slot(&mut stats, &mut slots, &tx.region, || RegionStat {
            region: tx.region.clone(),
            total_sales: 0.0,
            transaction_count: 0,
            percent_of_total: 0.0,
        });
        stat.total_sales += tx.amount();
        stat.transaction_count += 1;
    }
    for stat in &mut stats {
        stat.percent_of_total = if grand_total > 0.0 {
            stat.total_sales / grand_total * 100.0
        } else {
            0.0
        };
    }
    stats.sort_by(|a, b| b.total_sales.total_cmp(&a.total_sales));
    stats
}

/// Groups by date string and counts distinct customers per day. Sorted by
/// date ascending; the lexical order matches chronological order for
/// zero-padded ISO-style dates, which is all the ledger format carries.
pub fn daily_sales_trend(transactions: &[Transaction]) -> Vec<DailyStat> {
    struct DayAcc {
        date: String,
        revenue: f64,
        transactions: usize,
        customers: HashSet<String>,
    }

    let mut groups: Vec<DayAcc> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();
    for tx in transactions {
        let group = slot(&mut groups, &mut slots, &tx.date, || DayAcc {
            date: tx.date.clone(),
            revenue: 0.0,
            transactions: 0,
            customers: HashSet::new(),
        });
        group.revenue += tx.amount();
        group.transactions += 1;
        group.customers.insert(tx.customer_id.clone());
    }
    let mut stats: Vec<DailyStat> = groups
        .into_iter()
        .map(|group| DailyStat {
            date: group.date,
            revenue: group.revenue,
            transaction_count: group.transactions,
            distinct_customers: group.customers.len(),
        })
        .collect();
    stats.sort_by(|a, b| a.date.cmp(&b.date));
    stats
}

/// The day with the highest revenue. Revenue ties resolve to the earliest
/// date: the trend is date-ascending and only a strictly greater revenue
/// replaces the running maximum.
pub fn peak_sales_day(transactions: &[Transaction]) -> Option<DailyStat> {
    daily_sales_trend(transactions).into_iter().reduce(|best, candidate| {
        if candidate.revenue > best.revenue {
            candidate
        } else {
            best
        }
    })
}

/// The `count` products with the highest total quantity, quantity
/// descending; equal quantities keep first-encounter order.
pub fn top_selling_products(transactions: &[Transaction], count: usize) -> Vec<ProductStat> {
    let mut stats = product_totals(transactions);
    stats.sort_by(|a, b| b.total_quantity.cmp(&a.total_quantity));
    stats.truncate(count);
    stats
}

/// Products whose total quantity is strictly below `threshold`, quantity
/// ascending; equal quantities keep first-encounter order.
pub fn low_performing_products(transactions: &[Transaction], threshold: i64) -> Vec<ProductStat> {
    let mut stats: Vec<ProductStat> = product_totals(transactions)
        .into_iter()
        .filter(|stat| stat.total_quantity < threshold)
        .collect();
    stats.sort_by(|a, b| a.total_quantity.cmp(&b.total_quantity));
    stats
}

/// Per-customer rollups sorted by total spent descending (stable), so the
/// renderer's top-N is taken straight off the front. A grouped customer has
/// at least one purchase, so the average never divides by zero.
pub fn customer_analysis(transactions: &[Transaction]) -> Vec<CustomerStat> {
    struct CustomerAcc {
        customer_id: String,
        total_spent: f64,
        purchase_count: usize,
        products: BTreeSet<String>,
    }

    let mut groups: Vec<CustomerAcc> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();
    for tx in transactions {
        let group = slot(&mut groups, &mut slots, &tx.customer_id, || CustomerAcc {
            customer_id: tx.customer_id.clone(),
            total_spent: 0.0,
            purchase_count: 0,
            products: BTreeSet::new(),
        });
        group.total_spent += tx.amount();
        group.purchase_count += 1;
        group.products.insert(tx.product_name.clone());
    }
    let mut stats: Vec<CustomerStat> = groups
        .into_iter()
        .map(|group| CustomerStat {
            customer_id: group.customer_id,
            total_spent: group.total_spent,
            purchase_count: group.purchase_count,
            average_order_value: group.total_spent / group.purchase_count as f64,
            products: group.products.into_iter().collect(),
        })
        .collect();
    stats.sort_by(|a, b| b.total_spent.total_cmp(&a.total_spent));
    stats
}

fn product_totals(transactions: &[Transaction]) -> Vec<ProductStat> {
    let mut stats: Vec<ProductStat> = Vec::new();
    let mut slots: HashMap<String, usize> = HashMap::new();
    for tx in transactions {
        let stat = slot(&mut stats, &mut slots, &tx.product_name, || ProductStat {
            product_name: tx.product_name.clone(),
            total_quantity: 0,
            total_revenue: 0.0,
        });
        stat.total_quantity += tx.quantity;
        stat.total_revenue += tx.amount();
    }
    stats
}

/// Returns the accumulator slot for `key`, appending a fresh group the first
/// time the key is seen so `order` stays in first-encounter order.
fn slot<'a, T>(
    order: &'a mut Vec<T>,
    slots: &mut HashMap<String, usize>,
    key: &str,
    new: impl FnOnce() -> T,
) -> &'a mut T {
    let position = match slots.get(key) {
        Some(&position) => position,
        None => {
            order.push(new());
            slots.insert(key.to_string(), order.len() - 1);
            order.len() - 1
        }
    };
    &mut order[position]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(
        id: &str,
        date: &str,
        product_id: &str,
        product: &str,
        quantity: i64,
        unit_price: f64,
        customer: &str,
        region: &str,
    ) -> Transaction {
        Transaction {
            transaction_id: id.to_string(),
            date: date.to_string(),
            product_id: product_id.to_string(),
            product_name: product.to_string(),
            quantity,
            unit_price,
            customer_id: customer.to_string(),
            region: region.to_string(),
        }
    }

    fn two_record_ledger() -> Vec<Transaction> {
        vec![
            tx("T1", "2024-01-01", "P101", "Widget", 5, 100.0, "C1", "North"),
            tx("T2", "2024-01-01", "P102", "Gadget", 3, 200.0, "C1", "North"),
        ]
    }

    #[test]
    fn total_revenue_sums_amounts() {
        assert_eq!(total_revenue(&two_record_ledger()), 1100.0);
        assert_eq!(total_revenue(&[]), 0.0);
    }

    #[test]
    fn region_stats_cover_the_whole_total() {
        let regions = region_wise_sales(&two_record_ledger());
        assert_eq!(regions.len(), 1);
        assert_eq!(regions[0].region, "North");
        assert_eq!(regions[0].total_sales, 1100.0);
        assert_eq!(regions[0].transaction_count, 2);
        assert!((regions[0].percent_of_total - 100.0).abs() < 1e-9);
    }

    #[test]
    fn region_stats_sort_by_sales_descending() {
        let ledger = vec![
            tx("T1", "2024-01-01", "P1", "A", 1, 10.0, "C1", "East"),
            tx("T2", "2024-01-01", "P2", "B", 1, 500.0, "C2", "West"),
            tx("T3", "2024-01-01", "P3", "C", 1, 40.0, "C3", "East"),
        ];
        let regions = region_wise_sales(&ledger);
        assert_eq!(regions[0].region, "West");
        assert_eq!(regions[1].region, "East");
        assert_eq!(regions[1].total_sales, 50.0);
    }

    #[test]
    fn zero_grand_total_yields_zero_percentages() {
        // The reducers never re-validate, so a zero-priced slice is legal here
        // and must not divide by zero.
        let ledger = vec![
            tx("T1", "2024-01-01", "P1", "A", 1, 0.0, "C1", "East"),
            tx("T2", "2024-01-01", "P2", "B", 2, 0.0, "C2", "West"),
        ];
        let regions = region_wise_sales(&ledger);
        assert!(regions.iter().all(|r| r.percent_of_total == 0.0));
    }

    #[test]
    fn equal_sales_keep_first_encounter_order() {
        let ledger = vec![
            tx("T1", "2024-01-01", "P1", "A", 1, 100.0, "C1", "South"),
            tx("T2", "2024-01-01", "P2", "B", 1, 100.0, "C2", "North"),
        ];
        let regions = region_wise_sales(&ledger);
        assert_eq!(regions[0].region, "South");
        assert_eq!(regions[1].region, "North");
    }

    #[test]
    fn daily_trend_counts_distinct_customers() {
        let trend = daily_sales_trend(&two_record_ledger());
        assert_eq!(trend.len(), 1);
        assert_eq!(trend[0].date, "2024-01-01");
        assert_eq!(trend[0].revenue, 1100.0);
        assert_eq!(trend[0].transaction_count, 2);
        assert_eq!(trend[0].distinct_customers, 1);
    }

    #[test]
    fn daily_trend_sorts_dates_ascending() {
        let ledger = vec![
            tx("T1", "2024-02-01", "P1", "A", 1, 10.0, "C1", "East"),
            tx("T2", "2024-01-09", "P2", "B", 1, 20.0, "C2", "East"),
            tx("T3", "2024-01-10", "P3", "C", 1, 30.0, "C3", "East"),
        ];
        let trend = daily_sales_trend(&ledger);
        let dates: Vec<&str> = trend.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, vec!["2024-01-09", "2024-01-10", "2024-02-01"]);
    }

    #[test]
    fn peak_day_breaks_revenue_ties_toward_the_earliest_date() {
        let ledger = vec![
            tx("T1", "2024-01-02", "P1", "A", 1, 100.0, "C1", "East"),
            tx("T2", "2024-01-01", "P2", "B", 1, 100.0, "C2", "East"),
        ];
        let peak = peak_sales_day(&ledger).expect("non-empty ledger");
        assert_eq!(peak.date, "2024-01-01");
        assert_eq!(peak.revenue, 100.0);
    }

    #[test]
    fn peak_day_of_empty_ledger_is_none() {
        assert_eq!(peak_sales_day(&[]), None);
    }

    #[test]
    fn top_products_rank_by_quantity() {
        let top = top_selling_products(&two_record_ledger(), 5);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].product_name, "Widget");
        assert_eq!(top[0].total_quantity, 5);
        assert_eq!(top[0].total_revenue, 500.0);
        assert_eq!(top[1].product_name, "Gadget");
    }

    #[test]
    fn top_products_truncate_and_keep_tie_order() {
        let ledger = vec![
            tx("T1", "2024-01-01", "P1", "A", 4, 1.0, "C1", "East"),
            tx("T2", "2024-01-01", "P2", "B", 4, 1.0, "C2", "East"),
            tx("T3", "2024-01-01", "P3", "C", 9, 1.0, "C3", "East"),
        ];
        let top = top_selling_products(&ledger, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].product_name, "C");
        assert_eq!(top[1].product_name, "A");
    }

    #[test]
    fn low_performers_sit_strictly_below_the_threshold() {
        let ledger = vec![
            tx("T1", "2024-01-01", "P1", "A", 10, 1.0, "C1", "East"),
            tx("T2", "2024-01-01", "P2", "B", 9, 1.0, "C2", "East"),
            tx("T3", "2024-01-01", "P3", "C", 2, 1.0, "C3", "East"),
        ];
        let low = low_performing_products(&ledger, 10);
        let names: Vec<&str> = low.iter().map(|p| p.product_name.as_str()).collect();
        assert_eq!(names, vec!["C", "B"]);
    }

    #[test]
    fn customer_analysis_rolls_up_spend_and_products() {
        let ledger = vec![
            tx("T1", "2024-01-01", "P1", "Widget", 5, 100.0, "C1", "North"),
            tx("T2", "2024-01-02", "P2", "Gadget", 3, 200.0, "C1", "North"),
            tx("T3", "2024-01-02", "P1", "Widget", 1, 100.0, "C2", "South"),
        ];
        let customers = customer_analysis(&ledger);
        assert_eq!(customers.len(), 2);
        assert_eq!(customers[0].customer_id, "C1");
        assert_eq!(customers[0].total_spent, 1100.0);
        assert_eq!(customers[0].purchase_count, 2);
        assert_eq!(customers[0].average_order_value, 550.0);
        assert_eq!(customers[0].products, vec!["Gadget", "Widget"]);
        assert_eq!(customers[1].customer_id, "C2");
        assert_eq!(customers[1].purchase_count, 1);
        assert_eq!(customers[1].average_order_value, 100.0);
    }

    #[test]
    fn aggregates_agree_on_the_grand_total() {
        let ledger = vec![
            tx("T1", "2024-01-01", "P1", "A", 2, 12.5, "C1", "North"),
            tx("T2", "2024-01-02", "P2", "B", 3, 40.0, "C2", "South"),
            tx("T3", "2024-01-02", "P3", "C", 1, 99.0, "C1", "North"),
        ];
        let total = total_revenue(&ledger);
        let by_region: f64 = region_wise_sales(&ledger).iter().map(|r| r.total_sales).sum();
        let by_day: f64 = daily_sales_trend(&ledger).iter().map(|d| d.revenue).sum();
        assert!((by_region - total).abs() < 1e-9);
        assert!((by_day - total).abs() < 1e-9);
    }
}
