//! Shipment table transformation.
//!
//! - Dates: `yyyymmdd` to `mm/dd/yyyy`
//! - Schema: required columns and typed line items
//! - Grouper: one row per (Delivery Number, Product ID)
//! - Pipeline: parse, transform and serialize in one call

pub mod dates;
pub mod grouper;
pub mod pipeline;
pub mod schema;

pub use dates::{parse_ship_date, reformat_ship_date};
pub use grouper::group_lines;
pub use pipeline::*;
pub use schema::ColumnIndex;

use crate::config::TransformOptions;
use crate::error::TransformResult;
use crate::models::{ShipmentLine, ShipmentRow, Table};

/// Transform a shipment export table into the aggregated export layout.
///
/// All rows are validated before anything is produced: the first missing
/// column, bad date or bad quantity aborts the whole run. Pure function, no
/// logging or I/O.
pub fn transform(table: &Table, options: &TransformOptions) -> TransformResult<Vec<ShipmentRow>> {
    let columns = ColumnIndex::resolve(&table.headers)?;

    let lines = table
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| columns.read_line(row, table.line_of(i)))
        .collect::<TransformResult<Vec<ShipmentLine>>>()?;

    Ok(group_lines(&lines, options.group_order))
}
