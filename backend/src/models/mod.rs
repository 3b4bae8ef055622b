//! Domain models for the Shipmerge transformation pipeline.
//!
//! - [`Table`] - Untyped parsed CSV (headers + string cells)
//! - [`ShipmentLine`] - One validated input line item
//! - [`ShipmentRow`] - One aggregated output line, in the fixed export layout
//! - [`Quantity`] - Integer or decimal quantity with promotion on sum
//! - [`ShipDate`] - Planned ship date (`yyyymmdd` in, `mm/dd/yyyy` out)

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::ops::Add;

// =============================================================================
// Column names
// =============================================================================

pub const DELIVERY_NUMBER: &str = "Delivery Number";
pub const COMPANY_NAME: &str = "Company Name/Contact Name";
pub const ADDRESS_1: &str = "Address 1";
pub const ADDRESS_2: &str = "Address 2";
pub const ADDRESS_3: &str = "Address 3";
pub const CITY: &str = "City";
pub const STATE: &str = "State";
pub const POSTAL_CODE: &str = "Postal Code";
pub const COUNTRY: &str = "Country";
pub const PRODUCT_ID: &str = "Product ID";
pub const QUANTITY: &str = "Quantity";
pub const SALES_ORDER: &str = "Sales Order";
pub const SHIPPING_CONDITIONS: &str = "Shipping Conditions";
pub const DELIVERY_INSTRUCTIONS: &str = "Delivery Instructions";
pub const CARRIER: &str = "Carrier";
pub const PLANNED_SHIP_DATE: &str = "Planned Ship Date";

/// Columns the input file must carry, in the order they are checked.
pub const REQUIRED_COLUMNS: [&str; 15] = [
    DELIVERY_NUMBER,
    COMPANY_NAME,
    ADDRESS_1,
    ADDRESS_2,
    ADDRESS_3,
    CITY,
    STATE,
    POSTAL_CODE,
    COUNTRY,
    PRODUCT_ID,
    QUANTITY,
    SALES_ORDER,
    DELIVERY_INSTRUCTIONS,
    CARRIER,
    PLANNED_SHIP_DATE,
];

/// Output layout. Must stay in sync with the field order of [`ShipmentRow`].
pub const OUTPUT_COLUMNS: [&str; 16] = [
    DELIVERY_NUMBER,
    COMPANY_NAME,
    ADDRESS_1,
    ADDRESS_2,
    ADDRESS_3,
    CITY,
    STATE,
    POSTAL_CODE,
    COUNTRY,
    PRODUCT_ID,
    QUANTITY,
    SALES_ORDER,
    SHIPPING_CONDITIONS,
    DELIVERY_INSTRUCTIONS,
    CARRIER,
    PLANNED_SHIP_DATE,
];

// =============================================================================
// Table
// =============================================================================

/// A parsed CSV table. Every row has exactly `headers.len()` cells.
///
/// `lines[i]` is the file line on which `rows[i]` starts (header is line 1).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub lines: Vec<usize>,
}

impl Table {
    pub fn new(headers: Vec<String>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
            lines: Vec::new(),
        }
    }

    /// Append a row starting on file line `line`, padding short rows to the
    /// header width. Callers reject rows wider than the header.
    pub fn push_row(&mut self, mut row: Vec<String>, line: usize) {
        row.resize(self.headers.len(), String::new());
        self.rows.push(row);
        self.lines.push(line);
    }

    /// File line of row `index`. Tables built by hand without line
    /// information count one line per row after the header.
    pub fn line_of(&self, index: usize) -> usize {
        self.lines.get(index).copied().unwrap_or(index + 2)
    }

    /// Position of a column by exact (trimmed) name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// =============================================================================
// Quantity
// =============================================================================

/// Line item quantity.
///
/// Integers stay integers when summed; any decimal promotes the sum to a
/// float, the same way a numeric column would.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Quantity {
    Int(i64),
    Float(f64),
}

impl Quantity {
    /// Parse a cell. Returns `None` for empty, non-numeric or non-finite text.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        if let Ok(n) = raw.parse::<i64>() {
            return Some(Quantity::Int(n));
        }
        raw.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite())
            .map(Quantity::Float)
    }

    pub fn as_f64(&self) -> f64 {
        match *self {
            Quantity::Int(n) => n as f64,
            Quantity::Float(f) => f,
        }
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Quantity::Int(0)
    }
}

impl Add for Quantity {
    type Output = Quantity;

    fn add(self, rhs: Quantity) -> Quantity {
        match (self, rhs) {
            (Quantity::Int(a), Quantity::Int(b)) => a
                .checked_add(b)
                .map(Quantity::Int)
                .unwrap_or(Quantity::Float(a as f64 + b as f64)),
            (a, b) => Quantity::Float(a.as_f64() + b.as_f64()),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Quantity::Int(n) => write!(f, "{}", n),
            Quantity::Float(v) if v.fract() == 0.0 => write!(f, "{:.1}", v),
            Quantity::Float(v) => write!(f, "{}", v),
        }
    }
}

// =============================================================================
// Ship Date
// =============================================================================

/// Planned ship date. Parsed from `yyyymmdd`, rendered as `mm/dd/yyyy`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ShipDate(pub NaiveDate);

impl fmt::Display for ShipDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%m/%d/%Y"))
    }
}

impl Serialize for ShipDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// =============================================================================
// Input line
// =============================================================================

/// One validated shipment line item.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentLine {
    pub delivery_number: String,
    pub company_name: String,
    pub address_1: String,
    pub address_2: String,
    pub address_3: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    pub product_id: String,
    pub quantity: Quantity,
    pub sales_order: String,
    pub delivery_instructions: String,
    pub carrier: String,
    pub planned_ship_date: ShipDate,
}

impl ShipmentLine {
    /// Aggregation key.
    pub fn key(&self) -> (&str, &str) {
        (&self.delivery_number, &self.product_id)
    }
}

// =============================================================================
// Output row
// =============================================================================

/// One aggregated shipment/product line in the export layout.
///
/// Field order and serde names define the CSV header, so they must match
/// [`OUTPUT_COLUMNS`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShipmentRow {
    #[serde(rename = "Delivery Number")]
    pub delivery_number: String,
    #[serde(rename = "Company Name/Contact Name")]
    pub company_name: String,
    #[serde(rename = "Address 1")]
    pub address_1: String,
    #[serde(rename = "Address 2")]
    pub address_2: String,
    #[serde(rename = "Address 3")]
    pub address_3: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Postal Code")]
    pub postal_code: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Product ID")]
    pub product_id: String,
    #[serde(rename = "Quantity")]
    pub quantity: Quantity,
    #[serde(rename = "Sales Order")]
    pub sales_order: String,
    #[serde(rename = "Shipping Conditions")]
    pub shipping_conditions: String,
    #[serde(rename = "Delivery Instructions")]
    pub delivery_instructions: String,
    #[serde(rename = "Carrier")]
    pub carrier: String,
    #[serde(rename = "Planned Ship Date")]
    pub planned_ship_date: ShipDate,
}

impl ShipmentRow {
    /// Start an output row from the first line of a group.
    ///
    /// The carrier moves to `Shipping Conditions` and `Carrier` is cleared.
    pub fn from_first_line(line: &ShipmentLine) -> Self {
        Self {
            delivery_number: line.delivery_number.clone(),
            company_name: line.company_name.clone(),
            address_1: line.address_1.clone(),
            address_2: line.address_2.clone(),
            address_3: line.address_3.clone(),
            city: line.city.clone(),
            state: line.state.clone(),
            postal_code: line.postal_code.clone(),
            country: line.country.clone(),
            product_id: line.product_id.clone(),
            quantity: line.quantity,
            sales_order: line.sales_order.clone(),
            shipping_conditions: line.carrier.clone(),
            delivery_instructions: line.delivery_instructions.clone(),
            carrier: String::new(),
            planned_ship_date: line.planned_ship_date,
        }
    }

    /// Cells as display strings, in [`OUTPUT_COLUMNS`] order.
    pub fn cells(&self) -> Vec<String> {
        vec![
            self.delivery_number.clone(),
            self.company_name.clone(),
            self.address_1.clone(),
            self.address_2.clone(),
            self.address_3.clone(),
            self.city.clone(),
            self.state.clone(),
            self.postal_code.clone(),
            self.country.clone(),
            self.product_id.clone(),
            self.quantity.to_string(),
            self.sales_order.clone(),
            self.shipping_conditions.clone(),
            self.delivery_instructions.clone(),
            self.carrier.clone(),
            self.planned_ship_date.to_string(),
        ]
    }
}
