// 📂 ServQuick Export Parser - CSV with preamble → SalesTable
// ServQuick exports put a human-readable banner above the real header row,
// so the reader skips a configurable number of lines before the header.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

// ============================================================================
// SALES TABLE
// ============================================================================

/// A parsed ServQuick export: one header row plus string cells.
///
/// Cells stay as raw strings here; numeric/date coercion happens later in
/// the normalizer and row mapper, which own the error semantics.
#[derive(Debug, Clone, PartialEq)]
pub struct SalesTable {
    /// Column names from the header row, surrounding whitespace trimmed
    pub columns: Vec<String>,

    /// Data rows, each padded/truncated to the header width
    pub rows: Vec<Vec<String>>,
}

impl SalesTable {
    /// Parse a ServQuick CSV export from any reader.
    ///
    /// # Arguments
    /// * `reader` - Raw CSV bytes
    /// * `preamble_rows` - Lines to skip before the header row
    pub fn from_reader<R: Read>(reader: R, preamble_rows: usize) -> Result<SalesTable> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut columns: Vec<String> = Vec::new();
        let mut rows: Vec<Vec<String>> = Vec::new();

        for (index, record) in csv_reader.records().enumerate() {
            let record = record.with_context(|| format!("Failed to read CSV line {}", index + 1))?;

            if index < preamble_rows {
                // Preamble banner, not data
                continue;
            }

            if index == preamble_rows {
                columns = record.iter().map(|cell| cell.trim().to_string()).collect();
                continue;
            }

            let mut row: Vec<String> = record.iter().map(|cell| cell.to_string()).collect();
            row.resize(columns.len(), String::new());
            rows.push(row);
        }

        if columns.is_empty() {
            anyhow::bail!(
                "CSV has no header row after skipping {} preamble line(s)",
                preamble_rows
            );
        }

        Ok(SalesTable { columns, rows })
    }

    /// Parse a ServQuick CSV export from disk
    pub fn from_path(path: &Path, preamble_rows: usize) -> Result<SalesTable> {
        let file = File::open(path)
            .with_context(|| format!("Failed to open file: {}", path.display()))?;
        Self::from_reader(file, preamble_rows)
            .with_context(|| format!("Failed to parse CSV: {}", path.display()))
    }

    /// Index of a column by exact (trimmed) name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|col| col == name)
    }

    /// Cell value by row index and column name
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row).and_then(|r| r.get(col)).map(|s| s.as_str())
    }
}

// ============================================================================
// IMPORT ROW
// ============================================================================

/// One source record from the export. Immutable once parsed; this is the
/// source of truth for exactly one sales receipt.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    pub location_name: String,
    pub sales_date: String,
    pub payment_name: String,
    pub payment_type: String,
    /// Raw amount cell; the normalizer has already proven it numeric and
    /// non-zero, the row mapper coerces it to a fixed-precision decimal
    pub payment_amount: String,
    pub tender_tax_amount: Option<String>,
}

/// Convert a validated, normalized table into typed import rows.
///
/// Expects the required columns to be present (run the schema validator
/// first); errors if they are not.
pub fn import_rows(table: &SalesTable) -> Result<Vec<ImportRow>> {
    let col = |name: &str| {
        table
            .column_index(name)
            .with_context(|| format!("Column '{}' not found in table", name))
    };

    let location = col("Location name")?;
    let date = col("Sales date")?;
    let payment_name = col("Payment name")?;
    let payment_type = col("Payment type")?;
    let amount = col("Payment amount")?;
    let tax = col("Tender tax amount")?;

    let rows = table
        .rows
        .iter()
        .map(|row| {
            let cell = |idx: usize| row.get(idx).map(|s| s.trim()).unwrap_or("").to_string();
            let tax_cell = cell(tax);

            ImportRow {
                location_name: cell(location),
                sales_date: cell(date),
                payment_name: cell(payment_name),
                payment_type: cell(payment_type),
                payment_amount: cell(amount),
                tender_tax_amount: if tax_cell.is_empty() { None } else { Some(tax_cell) },
            }
        })
        .collect();

    Ok(rows)
}

// ============================================================================
// TESTS
// ============================================================================
