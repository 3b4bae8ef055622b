//! Aggregate shipment line items into one row per (Delivery Number, Product ID).
//!
//! ```text
//! Input (line items)                     →  Output (one row per key)
//! ┌───────────────────────────────────┐     ┌──────────────────────────────┐
//! │ D1, P1, qty 3, carrier UPS        │     │ D1, P1, qty 5, cond. UPS     │
//! │ D1, P1, qty 2, carrier FedEx      │  →  ├──────────────────────────────┤
//! │ D1, P2, qty 1, carrier DHL        │     │ D1, P2, qty 1, cond. DHL     │
//! └───────────────────────────────────┘     └──────────────────────────────┘
//! ```
//!
//! Quantities are summed; every other field comes from the first line of the
//! group in input order.

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::config::GroupOrder;
use crate::models::{ShipmentLine, ShipmentRow};

/// Group line items into output rows.
pub fn group_lines(lines: &[ShipmentLine], order: GroupOrder) -> Vec<ShipmentRow> {
    let mut positions: HashMap<(String, String), usize> = HashMap::new();
    let mut rows: Vec<ShipmentRow> = Vec::new();

    for line in lines {
        let (delivery, product) = line.key();
        let key = (delivery.to_string(), product.to_string());

        match positions.get(&key) {
            Some(&pos) => {
                let row = &mut rows[pos];
                row.quantity = row.quantity + line.quantity;
            }
            None => {
                positions.insert(key, rows.len());
                rows.push(ShipmentRow::from_first_line(line));
            }
        }
    }

    if order == GroupOrder::Sorted {
        let numeric_delivery = rows.iter().all(|r| is_integer(&r.delivery_number));
        let numeric_product = rows.iter().all(|r| is_integer(&r.product_id));

        rows.sort_by(|a, b| {
            compare_key_part(&a.delivery_number, &b.delivery_number, numeric_delivery)
                .then_with(|| compare_key_part(&a.product_id, &b.product_id, numeric_product))
        });
    }

    rows
}

fn is_integer(value: &str) -> bool {
    value.parse::<i64>().is_ok()
}

/// Compare one key part. A column sorts numerically only when every value in
/// it is an integer; otherwise the whole column sorts as text, so `"10"`
/// comes before `"9"`. Equal numbers with different spellings fall back to
/// text order.
fn compare_key_part(a: &str, b: &str, numeric: bool) -> Ordering {
    if !numeric {
        return a.cmp(b);
    }
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y).then_with(|| a.cmp(b)),
        _ => a.cmp(b),
    }
}
