//! Text rendering shared by the menu and history views.

use std::fmt::Write as _;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    /// Pipe separated rows
    #[default]
    Plain,
    /// Column aligned table
    Table,
    /// JSON output
    Json,
}

/// Format an amount with its currency symbol, e.g. `₹60`.
#[must_use]
pub fn money(symbol: &str, amount: impl std::fmt::Display) -> String {
    format!("{symbol}{amount}")
}

/// Shorten `name` to `limit` characters followed by `...`.
///
/// Names of at most `limit` characters are returned unchanged.
#[must_use]
pub fn display_name(name: &str, limit: usize) -> String {
    if name.chars().count() > limit {
        let head: String = name.chars().take(limit).collect();
        format!("{head}...")
    } else {
        name.to_string()
    }
}

/// Append a header and rows to `out`, one line each, cells joined by ` | `.
///
/// With `aligned`, columns are padded to a common character width and the
/// header is underlined.
pub fn write_rows(out: &mut String, header: &[&str], rows: &[Vec<String>], aligned: bool) {
    if !aligned {
        let _ = writeln!(out, "{}", header.join(" | "));
        for row in rows {
            let _ = writeln!(out, "{}", row.join(" | "));
        }
        return;
    }

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let _ = writeln!(out, "{}", pad_cells(header.iter().copied(), &widths));
    let rule = widths
        .iter()
        .map(|&w| "-".repeat(w))
        .collect::<Vec<_>>()
        .join("-+-");
    let _ = writeln!(out, "{rule}");
    for row in rows {
        let _ = writeln!(out, "{}", pad_cells(row.iter().map(String::as_str), &widths));
    }
}

fn pad_cells<'a>(cells: impl Iterator<Item = &'a str>, widths: &[usize]) -> String {
    let line = cells
        .zip(widths)
        .map(|(cell, &width)| {
            let fill = width.saturating_sub(cell.chars().count());
            format!("{cell}{}", " ".repeat(fill))
        })
        .collect::<Vec<_>>()
        .join(" | ");
    line.trim_end().to_string()
}
