// 🧹 Row Normalizer - Strip summary and zero-amount rows
// ServQuick exports end with subtotal/summary lines that have no payment
// amount; those and explicit zero-amount rows never become receipts.

use crate::errors::FatalRunError;
use crate::parser::SalesTable;

/// Drop rows whose `Payment amount` is absent or zero.
///
/// Returns a new table; the input is left untouched. Order among surviving
/// rows is preserved.
///
/// A non-empty amount cell that does not parse as a number means the file
/// is structurally wrong, which is fatal for the whole run rather than a
/// per-row condition.
pub fn normalize(table: &SalesTable) -> Result<SalesTable, FatalRunError> {
    let amount_col = match table.column_index("Payment amount") {
        Some(idx) => idx,
        // Schema validation happens before normalization; a table without
        // the column has no rows worth keeping
        None => {
            return Ok(SalesTable {
                columns: table.columns.clone(),
                rows: Vec::new(),
            })
        }
    };

    let mut surviving: Vec<Vec<String>> = Vec::new();

    for (index, row) in table.rows.iter().enumerate() {
        let cell = row.get(amount_col).map(|s| s.trim()).unwrap_or("");

        if cell.is_empty() {
            continue;
        }

        let amount: f64 = cell.parse().map_err(|_| FatalRunError::MalformedAmountColumn {
            row: index + 1,
            value: cell.to_string(),
        })?;

        if amount == 0.0 {
            continue;
        }

        surviving.push(row.clone());
    }

    Ok(SalesTable {
        columns: table.columns.clone(),
        rows: surviving,
    })
}

// ============================================================================
// TESTS
// ============================================================================
