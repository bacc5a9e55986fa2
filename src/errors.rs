// 🚨 Error Taxonomy - Fatal vs per-row
// A run halts only on FatalRunError; every RowError becomes one outcome
// for its row and the loop moves on.

use thiserror::Error;

// ============================================================================
// FATAL RUN ERRORS
// ============================================================================

/// Errors that abort the whole import run.
///
/// Rows not yet processed get no outcome; the caller receives a single
/// message instead of a partial log.
#[derive(Debug, Error)]
pub enum FatalRunError {
    #[error("Missing columns: {}. Found columns: {}. Please upload a standardized file.",
        .missing.join(", "), .found.join(", "))]
    MissingColumns {
        missing: Vec<String>,
        found: Vec<String>,
    },

    #[error("Row {row}: payment amount '{value}' is not numeric. The file is malformed.")]
    MalformedAmountColumn { row: usize, value: String },

    #[error("Could not resolve the shared sales item: {0}")]
    ItemResolution(#[source] ApiError),
}

// ============================================================================
// PER-ROW ERRORS
// ============================================================================

/// Errors scoped to a single row.
///
/// The orchestrator converts each of these into a Skipped or Failed outcome
/// and continues with the next row.
#[derive(Debug, Error)]
pub enum RowError {
    #[error("Unknown payment name '{name}'")]
    UnknownPaymentName { name: String },

    #[error("Could not resolve deposit account '{name}': {source}")]
    AccountResolution { name: String, source: ApiError },

    #[error("Could not resolve customer '{name}': {source}")]
    CustomerResolution { name: String, source: ApiError },

    #[error("Invalid sales date '{value}' (expected YYYY-MM-DD)")]
    DateParse { value: String },

    #[error("Invalid payment amount '{value}'")]
    AmountParse { value: String },

    #[error("Failed to save sales receipt: {0}")]
    Save(#[source] ApiError),
}

impl RowError {
    /// Stable kind label for the outcome log
    pub fn kind(&self) -> &'static str {
        match self {
            RowError::UnknownPaymentName { .. } => "UnknownPaymentName",
            RowError::AccountResolution { .. } => "AccountResolution",
            RowError::CustomerResolution { .. } => "CustomerResolution",
            RowError::DateParse { .. } => "DateParse",
            RowError::AmountParse { .. } => "AmountParse",
            RowError::Save(source) => source.kind(),
        }
    }
}

// ============================================================================
// REMOTE API ERRORS
// ============================================================================

/// Errors surfaced by the QuickBooks Online collaborator.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Network / TLS / timeout failure before a response arrived
    #[error("http transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// QuickBooks answered with a non-success status
    #[error("QuickBooks rejected the request (HTTP {status}): {message}")]
    Remote { status: u16, message: String },

    /// Response body did not have the shape we expect
    #[error("unexpected QuickBooks response: {0}")]
    Response(String),

    /// An entity the run requires to pre-exist is absent remotely
    #[error("required {entity} '{name}' does not exist in QuickBooks")]
    NotFound { entity: &'static str, name: String },
}

impl ApiError {
    /// Stable kind label, so outcomes can report "kind: message" without
    /// the caller matching on variants.
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Transport(_) => "Transport",
            ApiError::Remote { .. } => "Remote",
            ApiError::Response(_) => "Response",
            ApiError::NotFound { .. } => "NotFound",
        }
    }
}

// ============================================================================
// AUTH ERRORS
// ============================================================================

/// Errors from the OAuth2 collaborator (authorization + token storage).
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Missing environment variable: {var}")]
    MissingConfig { var: String },

    #[error("Token exchange failed (HTTP {status}): {message}")]
    TokenExchange { status: u16, message: String },

    #[error("http transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Could not read/write token file: {0}")]
    TokenFile(#[from] std::io::Error),

    #[error("Token file is not valid JSON: {0}")]
    TokenFormat(#[from] serde_json::Error),

    #[error("Not authenticated with QuickBooks. Run the auth flow first.")]
    NotAuthenticated,
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_columns_message_lists_both_sides() {
        let err = FatalRunError::MissingColumns {
            missing: vec!["Payment amount".to_string()],
            found: vec!["Location name".to_string(), "Sales date".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("Payment amount"));
        assert!(msg.contains("Location name, Sales date"));
    }

    #[test]
    fn test_unknown_payment_name_message() {
        let err = RowError::UnknownPaymentName {
            name: "Bitcoin".to_string(),
        };
        assert_eq!(err.to_string(), "Unknown payment name 'Bitcoin'");
    }

    #[test]
    fn test_api_error_kind_labels() {
        let remote = ApiError::Remote {
            status: 400,
            message: "ValidationFault".to_string(),
        };
        assert_eq!(remote.kind(), "Remote");

        let response = ApiError::Response("no Id field".to_string());
        assert_eq!(response.kind(), "Response");
    }
}
