//! Input schema: resolves required columns and reads typed line items.

use crate::error::{TransformError, TransformResult};
use crate::models::{self, Quantity, ShipmentLine};

use super::dates::parse_ship_date;

/// Positions of every required column in the input header row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIndex {
    delivery_number: usize,
    company_name: usize,
    address_1: usize,
    address_2: usize,
    address_3: usize,
    city: usize,
    state: usize,
    postal_code: usize,
    country: usize,
    product_id: usize,
    quantity: usize,
    sales_order: usize,
    delivery_instructions: usize,
    carrier: usize,
    planned_ship_date: usize,
}

impl ColumnIndex {
    /// Locate all required columns. Extra columns are ignored; the first
    /// missing column in [`models::REQUIRED_COLUMNS`] order is reported.
    pub fn resolve(headers: &[String]) -> TransformResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| TransformError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            delivery_number: find(models::DELIVERY_NUMBER)?,
            company_name: find(models::COMPANY_NAME)?,
            address_1: find(models::ADDRESS_1)?,
            address_2: find(models::ADDRESS_2)?,
            address_3: find(models::ADDRESS_3)?,
            city: find(models::CITY)?,
            state: find(models::STATE)?,
            postal_code: find(models::POSTAL_CODE)?,
            country: find(models::COUNTRY)?,
            product_id: find(models::PRODUCT_ID)?,
            quantity: find(models::QUANTITY)?,
            sales_order: find(models::SALES_ORDER)?,
            delivery_instructions: find(models::DELIVERY_INSTRUCTIONS)?,
            carrier: find(models::CARRIER)?,
            planned_ship_date: find(models::PLANNED_SHIP_DATE)?,
        })
    }

    /// Read one data row. `line` is the CSV line number used in errors.
    ///
    /// The ship date is checked before the quantity.
    pub fn read_line(&self, row: &[String], line: usize) -> TransformResult<ShipmentLine> {
        let cell = |idx: usize| row.get(idx).map(String::as_str).unwrap_or("");

        let raw_date = cell(self.planned_ship_date);
        let planned_ship_date =
            parse_ship_date(raw_date).ok_or_else(|| TransformError::DateFormat {
                line,
                value: raw_date.to_string(),
            })?;

        let raw_quantity = cell(self.quantity);
        let quantity =
            Quantity::parse(raw_quantity).ok_or_else(|| TransformError::Aggregation {
                line,
                value: raw_quantity.to_string(),
            })?;

        Ok(ShipmentLine {
            delivery_number: cell(self.delivery_number).to_string(),
            company_name: cell(self.company_name).to_string(),
            address_1: cell(self.address_1).to_string(),
            address_2: cell(self.address_2).to_string(),
            address_3: cell(self.address_3).to_string(),
            city: cell(self.city).to_string(),
            state: cell(self.state).to_string(),
            postal_code: cell(self.postal_code).to_string(),
            country: cell(self.country).to_string(),
            product_id: cell(self.product_id).to_string(),
            quantity,
            sales_order: cell(self.sales_order).to_string(),
            delivery_instructions: cell(self.delivery_instructions).to_string(),
            carrier: cell(self.carrier).to_string(),
            planned_ship_date,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::REQUIRED_COLUMNS;

    fn headers() -> Vec<String> {
        REQUIRED_COLUMNS.iter().map(|c| c.to_string()).collect()
    }

    fn row(quantity: &str, date: &str) -> Vec<String> {
        REQUIRED_COLUMNS
            .iter()
            .map(|c| match *c {
                models::QUANTITY => quantity.to_string(),
                models::PLANNED_SHIP_DATE => date.to_string(),
                other => format!("{} value", other),
            })
            .collect()
    }

    #[test]
    fn test_resolve_ignores_extra_and_reordered_columns() {
        let mut cols = headers();
        cols.reverse();
        cols.insert(3, "Weight".to_string());

        let index = ColumnIndex::resolve(&cols).unwrap();
        let mut values = row("4", "20240115");
        values.reverse();
        values.insert(3, "12kg".to_string());

        let line = index.read_line(&values, 2).unwrap();
        assert_eq!(line.delivery_number, "Delivery Number value");
        assert_eq!(line.carrier, "Carrier value");
        assert_eq!(line.quantity, Quantity::Int(4));
    }

    #[test]
    fn test_missing_column_named() {
        let cols: Vec<String> = headers()
            .into_iter()
            .filter(|c| c != models::PRODUCT_ID)
            .collect();

        match ColumnIndex::resolve(&cols) {
            Err(TransformError::MissingColumn(name)) => assert_eq!(name, "Product ID"),
            other => panic!("expected MissingColumn, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_date_reports_line_and_value() {
        let index = ColumnIndex::resolve(&headers()).unwrap();
        let err = index.read_line(&row("1", "20241301"), 7).unwrap_err();

        match err {
            TransformError::DateFormat { line, value } => {
                assert_eq!(line, 7);
                assert_eq!(value, "20241301");
            }
            other => panic!("expected DateFormat, got {:?}", other),
        }
    }

    #[test]
    fn test_bad_quantity_is_aggregation_error() {
        let index = ColumnIndex::resolve(&headers()).unwrap();

        assert!(matches!(
            index.read_line(&row("lots", "20240115"), 2),
            Err(TransformError::Aggregation { line: 2, .. })
        ));
        assert!(matches!(
            index.read_line(&row("", "20240115"), 3),
            Err(TransformError::Aggregation { line: 3, .. })
        ));
    }
}
