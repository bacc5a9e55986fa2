// 📥 Import Orchestrator - Rows → sales receipts, one outcome per row
// Row-level failures never abort the run; the only remote failure that
// does is the one-time resolution of the shared sales item.

use std::fmt;
use std::path::Path;

use anyhow::Result;

use crate::config::ImportConfig;
use crate::errors::{FatalRunError, RowError};
use crate::normalize::normalize;
use crate::parser::{import_rows, ImportRow, SalesTable};
use crate::quickbooks::api::{AccountingService, EntityRef};
use crate::receipt::map_row;
use crate::resolver::EntityResolver;
use crate::schema::SchemaValidator;

// ============================================================================
// ROW OUTCOME
// ============================================================================

/// Terminal state of one input row. Exactly one outcome per row, produced
/// in row order.
#[derive(Debug, Clone, PartialEq)]
pub enum RowOutcome {
    /// Receipt persisted remotely
    Imported { receipt_id: String },

    /// Row intentionally not imported (unknown payment name, unresolvable
    /// account or customer)
    Skipped { reason: String },

    /// Row should have imported but did not (parse or save failure)
    Failed { kind: String, message: String },
}

impl fmt::Display for RowOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowOutcome::Imported { receipt_id } => {
                write!(f, "Imported successfully as SalesReceipt #{}.", receipt_id)
            }
            RowOutcome::Skipped { reason } => write!(f, "{}. Skipped.", reason),
            RowOutcome::Failed { kind, message } => {
                write!(f, "Failed to import. Error ({}): {}", kind, message)
            }
        }
    }
}

// ============================================================================
// IMPORT REPORT
// ============================================================================

/// Ordered per-row outcomes for one run
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    pub outcomes: Vec<RowOutcome>,
}

impl ImportReport {
    /// One display line per input row, 1-indexed, in row order
    pub fn log_lines(&self) -> Vec<String> {
        self.outcomes
            .iter()
            .enumerate()
            .map(|(index, outcome)| format!("Row {}: {}", index + 1, outcome))
            .collect()
    }

    pub fn imported(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RowOutcome::Imported { .. }))
            .count()
    }

    pub fn skipped(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RowOutcome::Skipped { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|o| matches!(o, RowOutcome::Failed { .. }))
            .count()
    }
}

// ============================================================================
// IMPORT ENGINE
// ============================================================================

/// Drives one run: resolve the shared item, then walk the rows in order,
/// resolving entities and saving one receipt per row.
pub struct ImportEngine<'a, S: AccountingService> {
    service: &'a S,
    config: &'a ImportConfig,
}

impl<'a, S: AccountingService> ImportEngine<'a, S> {
    pub fn new(service: &'a S, config: &'a ImportConfig) -> Self {
        ImportEngine { service, config }
    }

    /// Import every row, producing exactly one outcome per row.
    ///
    /// Fails only when the shared item cannot be resolved; everything after
    /// that is recorded per row and the loop keeps going.
    pub fn run(&self, rows: &[ImportRow]) -> Result<ImportReport, FatalRunError> {
        let mut resolver = EntityResolver::new(self.service, self.config);

        // Run-level precondition: no receipts without the shared item
        let item = resolver
            .resolve_item()
            .map_err(FatalRunError::ItemResolution)?;

        let mut outcomes = Vec::with_capacity(rows.len());
        for row in rows {
            outcomes.push(self.import_row(row, &mut resolver, &item));
        }

        Ok(ImportReport { outcomes })
    }

    fn import_row(
        &self,
        row: &ImportRow,
        resolver: &mut EntityResolver<'a, S>,
        item: &EntityRef,
    ) -> RowOutcome {
        // 1. Payment name → deposit account name. A miss is terminal for the
        //    row before any remote call is made.
        let account_name = match self.config.deposit_account_for(&row.payment_name) {
            Some(name) => name.to_string(),
            None => {
                return skipped(RowError::UnknownPaymentName {
                    name: row.payment_name.clone(),
                })
            }
        };

        // 2. Deposit account
        let deposit_account = match resolver.resolve_account(&account_name) {
            Ok(entity_ref) => entity_ref,
            Err(source) => {
                return skipped(RowError::AccountResolution {
                    name: account_name,
                    source,
                })
            }
        };

        // 3. Customer. One synthetic customer per payment channel; the row's
        //    location name is deliberately not used here.
        let customer = match resolver.resolve_customer(&row.payment_name) {
            Ok(entity_ref) => entity_ref,
            Err(source) => {
                return skipped(RowError::CustomerResolution {
                    name: row.payment_name.clone(),
                    source,
                })
            }
        };

        // 4. Map to a receipt draft
        let draft = match map_row(row, customer, deposit_account, item.clone()) {
            Ok(draft) => draft,
            Err(error) => return failed(error),
        };

        // 5. Persist
        match self.service.save_receipt(&draft) {
            Ok(receipt_id) => RowOutcome::Imported { receipt_id },
            Err(source) => failed(RowError::Save(source)),
        }
    }
}

fn skipped(error: RowError) -> RowOutcome {
    RowOutcome::Skipped {
        reason: error.to_string(),
    }
}

fn failed(error: RowError) -> RowOutcome {
    RowOutcome::Failed {
        kind: error.kind().to_string(),
        message: error.to_string(),
    }
}

// ============================================================================
// FULL PIPELINE
// ============================================================================

/// Run the whole pipeline against a ServQuick export on disk:
/// parse → validate schema → normalize → import.
pub fn run_import<S: AccountingService>(
    path: &Path,
    service: &S,
    config: &ImportConfig,
) -> Result<ImportReport> {
    let table = SalesTable::from_path(path, config.preamble_rows)?;

    let missing = SchemaValidator::new().validate(&table);
    if !missing.is_empty() {
        return Err(FatalRunError::MissingColumns {
            missing,
            found: table.columns.clone(),
        }
        .into());
    }

    let normalized = normalize(&table)?;
    let rows = import_rows(&normalized)?;

    let report = ImportEngine::new(service, config).run(&rows)?;
    Ok(report)
}

// ============================================================================
// TESTS
// ============================================================================
