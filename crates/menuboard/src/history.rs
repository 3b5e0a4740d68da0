//! The order history surface.
//!
//! A read-only rendering of the ledger: one row per order in placement
//! order, with the line total computed as unit price times quantity.

use std::fmt::Write as _;

use serde::Serialize;

use crate::catalog::Price;
use crate::error::Result;
use crate::format::{money, write_rows, OutputFormat};
use crate::ledger::Ledger;

/// Heading shown above the history.
pub const TITLE: &str = "See all Orders";

/// Shown instead of a table when no orders exist.
pub const EMPTY_PLACEHOLDER: &str = "No orders placed yet.";

const HEADER: [&str; 4] = ["Item Name", "Quantity", "Per Quantity Price", "Total Cost"];

/// One rendered order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HistoryRow {
    /// Item name at the time of ordering.
    pub name: String,
    /// Quantity ordered.
    pub quantity: u32,
    /// Unit price at the time of ordering.
    pub unit_price: Price,
    /// `unit_price * quantity`.
    pub total: u64,
}

/// The history of a ledger, ready to display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryTable {
    rows: Vec<HistoryRow>,
}

impl HistoryTable {
    /// Build the table for `ledger`.
    #[must_use]
    pub fn from_ledger(ledger: &Ledger) -> Self {
        let rows = ledger
            .iter()
            .map(|order| HistoryRow {
                name: order.item.name.clone(),
                quantity: order.quantity.get(),
                unit_price: order.item.price,
                total: order.line_total(),
            })
            .collect();
        Self { rows }
    }

    /// Rows in ledger order.
    #[must_use]
    pub fn rows(&self) -> &[HistoryRow] {
        &self.rows
    }

    /// Whether there is nothing to show.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of all row totals.
    #[must_use]
    pub fn grand_total(&self) -> u128 {
        self.rows.iter().map(|row| u128::from(row.total)).sum()
    }

    /// Render the history with prices prefixed by `currency`.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render(&self, format: OutputFormat, currency: &str) -> Result<String> {
        if format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(&self.rows)?);
        }

        let mut out = String::new();
        let _ = writeln!(out, "{TITLE}");
        if self.rows.is_empty() {
            let _ = writeln!(out, "{EMPTY_PLACEHOLDER}");
            return Ok(out);
        }

        let cells: Vec<Vec<String>> = self
            .rows
            .iter()
            .map(|row| {
                vec![
                    row.name.clone(),
                    row.quantity.to_string(),
                    money(currency, row.unit_price),
                    money(currency, row.total),
                ]
            })
            .collect();
        write_rows(&mut out, &HEADER, &cells, format == OutputFormat::Table);
        let _ = writeln!(out, "Grand total: {}", money(currency, self.grand_total()));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MenuEntry;
    use crate::ledger::{Order, Quantity};

    fn order(name: &str, price: Price, quantity: u32) -> Order {
        Order::new(&MenuEntry::new(name, price), Quantity::new(quantity).unwrap())
    }

    #[test]
    fn test_empty_ledger_shows_placeholder() {
        let table = HistoryTable::from_ledger(&Ledger::new());
        assert!(table.is_empty());

        let out = table.render(OutputFormat::Plain, "₹").unwrap();
        assert_eq!(out, "See all Orders\nNo orders placed yet.\n");
        assert!(!out.contains("Item Name"));
    }

    #[test]
    fn test_empty_ledger_json() {
        let table = HistoryTable::from_ledger(&Ledger::new());
        assert_eq!(table.render(OutputFormat::Json, "₹").unwrap(), "[]");
    }

    #[test]
    fn test_sundal_row() {
        let ledger: Ledger = vec![order("Sundal", 30, 2)].into_iter().collect();
        let out = HistoryTable::from_ledger(&ledger)
            .render(OutputFormat::Plain, "₹")
            .unwrap();

        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines[0], "See all Orders");
        assert_eq!(lines[1], "Item Name | Quantity | Per Quantity Price | Total Cost");
        assert_eq!(lines[2], "Sundal | 2 | ₹30 | ₹60");
        assert_eq!(lines[3], "Grand total: ₹60");
    }

    #[test]
    fn test_line_totals() {
        let ledger: Ledger = vec![
            order("Free Water", 0, 3),
            order("Sundal", 30, 1),
            order("Pani Puri", 70, 10),
        ]
        .into_iter()
        .collect();
        let table = HistoryTable::from_ledger(&ledger);

        for row in table.rows() {
            assert_eq!(row.total, u64::from(row.unit_price) * u64::from(row.quantity));
        }
        let totals: Vec<_> = table.rows().iter().map(|r| r.total).collect();
        assert_eq!(totals, vec![0, 30, 700]);
        assert_eq!(table.grand_total(), 730);
    }

    #[test]
    fn test_grand_total_past_u64() {
        let ledger: Ledger = vec![
            order("Feast", u32::MAX, u32::MAX),
            order("Feast", u32::MAX, u32::MAX),
        ]
        .into_iter()
        .collect();
        let table = HistoryTable::from_ledger(&ledger);

        for row in table.rows() {
            assert_eq!(row.total, 18_446_744_065_119_617_025);
        }
        assert_eq!(table.grand_total(), 36_893_488_130_239_234_050);

        let out = table.render(OutputFormat::Plain, "₹").unwrap();
        assert!(out.ends_with("Grand total: ₹36893488130239234050\n"));
    }

    #[test]
    fn test_rows_follow_ledger_order() {
        let ledger: Ledger = vec![order("B", 1, 1), order("A", 2, 1), order("B", 1, 2)]
            .into_iter()
            .collect();
        let names: Vec<_> = HistoryTable::from_ledger(&ledger)
            .rows()
            .iter()
            .map(|r| r.name.clone())
            .collect();
        assert_eq!(names, vec!["B", "A", "B"]);
    }

    #[test]
    fn test_render_table_aligned() {
        let ledger: Ledger = vec![order("Sundal", 30, 2), order("Gulab Jamun", 130, 10)]
            .into_iter()
            .collect();
        let out = HistoryTable::from_ledger(&ledger)
            .render(OutputFormat::Table, "₹")
            .unwrap();
        assert!(out.contains("Sundal      | 2        | ₹30                | ₹60"));
        assert!(out.contains("Gulab Jamun | 10       | ₹130               | ₹1300"));
        assert!(out.contains("Grand total: ₹1360"));
    }

    #[test]
    fn test_render_json() {
        let ledger: Ledger = vec![order("Sundal", 30, 2)].into_iter().collect();
        let out = HistoryTable::from_ledger(&ledger)
            .render(OutputFormat::Json, "₹")
            .unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value[0]["name"], "Sundal");
        assert_eq!(value[0]["quantity"], 2);
        assert_eq!(value[0]["unit_price"], 30);
        assert_eq!(value[0]["total"], 60);
    }

    #[test]
    fn test_custom_currency() {
        let ledger: Ledger = vec![order("Sundal", 30, 2)].into_iter().collect();
        let out = HistoryTable::from_ledger(&ledger)
            .render(OutputFormat::Plain, "Rs.")
            .unwrap();
        assert!(out.contains("Sundal | 2 | Rs.30 | Rs.60"));
    }
}
