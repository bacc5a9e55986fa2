// ServQuick → QuickBooks Online Importer - Core Library
// Exposes the import pipeline for use in the CLI and tests

pub mod config;
pub mod errors;
pub mod import;
pub mod normalize;
pub mod parser;
pub mod quickbooks;
pub mod receipt;
pub mod resolver;
pub mod schema;

// Re-export commonly used types
pub use config::ImportConfig;
pub use errors::{ApiError, AuthError, FatalRunError, RowError};
pub use import::{run_import, ImportEngine, ImportReport, RowOutcome};
pub use normalize::normalize;
pub use parser::{import_rows, ImportRow, SalesTable};
pub use quickbooks::{
    AccountingService, AuthConfig, EntityRef, EntityType, OAuthToken, QbAuthProvider,
    QbEnvironment, QbOnlineClient,
};
pub use receipt::{map_row, ReceiptDraft};
pub use resolver::{EntityCache, EntityResolver};
pub use schema::{SchemaValidator, REQUIRED_COLUMNS};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
