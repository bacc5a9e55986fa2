// 🧾 Row Mapper - ImportRow + resolved refs → ReceiptDraft
// Pure construction: no remote calls, deterministic for a given input

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::str::FromStr;

use crate::errors::RowError;
use crate::parser::ImportRow;
use crate::quickbooks::api::EntityRef;

/// The one date format ServQuick exports use
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// RECEIPT DRAFT
// ============================================================================

/// A sales receipt ready to send, built from one import row plus the three
/// resolved entity refs. Sent to QuickBooks exactly once; after the remote
/// id is assigned the receipt lives only on the remote side.
#[derive(Debug, Clone, PartialEq)]
pub struct ReceiptDraft {
    pub customer: EntityRef,
    pub deposit_account: EntityRef,
    pub item: EntityRef,
    pub txn_date: NaiveDate,
    /// Line amount; also the unit price since quantity is fixed at 1
    pub amount: Decimal,
    pub quantity: u32,
    pub private_note: String,
}

/// Build a receipt draft from a validated row.
///
/// Fails per-row (never fatally) when the date or amount cell cannot be
/// coerced.
pub fn map_row(
    row: &ImportRow,
    customer: EntityRef,
    deposit_account: EntityRef,
    item: EntityRef,
) -> Result<ReceiptDraft, RowError> {
    let txn_date = NaiveDate::parse_from_str(&row.sales_date, DATE_FORMAT).map_err(|_| {
        RowError::DateParse {
            value: row.sales_date.clone(),
        }
    })?;

    let amount = Decimal::from_str(&row.payment_amount).map_err(|_| RowError::AmountParse {
        value: row.payment_amount.clone(),
    })?;

    Ok(ReceiptDraft {
        customer,
        deposit_account,
        item,
        txn_date,
        amount,
        quantity: 1,
        private_note: format!("Imported from ServQuick: {}", row.payment_name),
    })
}

// ============================================================================
// TESTS
// ============================================================================
