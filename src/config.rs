// ⚙️ Import Configuration - Fixed run constants as data
// The payment-method → deposit-account table is owned configuration passed
// into the resolver and engine, never module-level mutable state.

use std::collections::HashMap;

// ============================================================================
// IMPORT CONFIG
// ============================================================================

/// Configuration for one import run.
///
/// Immutable once built. Tests substitute their own table instead of
/// monkey-patching a global.
#[derive(Debug, Clone)]
pub struct ImportConfig {
    /// Payment method name → QuickBooks deposit account display name.
    /// A payment name absent from this table is a per-row skip, not an error.
    pub payment_accounts: HashMap<String, String>,

    /// AccountType used when a deposit account has to be created
    pub default_account_type: String,

    /// Display name of the shared service item, resolved once per run
    pub item_name: String,

    /// Income account the shared item posts to (must already exist)
    pub item_income_account: String,

    /// Human-readable preamble lines before the header row in the export
    pub preamble_rows: usize,
}

impl ImportConfig {
    /// Create an empty config (no payment mappings)
    pub fn new() -> Self {
        ImportConfig {
            payment_accounts: HashMap::new(),
            default_account_type: "Bank".to_string(),
            item_name: "ServQuick Sale".to_string(),
            item_income_account: "Sales of Product Income".to_string(),
            preamble_rows: 2,
        }
    }

    /// Config with the payment mappings used by the finance team's
    /// ServQuick deployment pre-loaded.
    pub fn with_defaults() -> Self {
        let mut config = ImportConfig::new();
        config.register_default_mappings();
        config
    }

    fn register_default_mappings(&mut self) {
        self.map_payment("Cash", "Cash on hand");
        self.map_payment("Card", "Bank Account");
        self.map_payment("Credit", "Accounts Receivable");
        self.map_payment("Bkash", "Bkash Account");
        self.map_payment("E-Gen", "E-Gen Account");
    }

    /// Add (or replace) one payment-name → deposit-account mapping
    pub fn map_payment(&mut self, payment_name: &str, account_name: &str) {
        self.payment_accounts
            .insert(payment_name.to_string(), account_name.to_string());
    }

    /// Look up the deposit account for a payment name (exact match)
    pub fn deposit_account_for(&self, payment_name: &str) -> Option<&str> {
        self.payment_accounts.get(payment_name).map(|s| s.as_str())
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self::with_defaults()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_cover_known_payment_names() {
        let config = ImportConfig::with_defaults();

        assert_eq!(config.deposit_account_for("Cash"), Some("Cash on hand"));
        assert_eq!(config.deposit_account_for("Card"), Some("Bank Account"));
        assert_eq!(
            config.deposit_account_for("Credit"),
            Some("Accounts Receivable")
        );
        assert_eq!(config.deposit_account_for("Bkash"), Some("Bkash Account"));
        assert_eq!(config.deposit_account_for("E-Gen"), Some("E-Gen Account"));
    }

    #[test]
    fn test_unknown_payment_name_is_none() {
        let config = ImportConfig::with_defaults();
        assert_eq!(config.deposit_account_for("Bitcoin"), None);
    }

    #[test]
    fn test_map_payment_replaces_existing() {
        let mut config = ImportConfig::with_defaults();
        config.map_payment("Cash", "Petty Cash");
        assert_eq!(config.deposit_account_for("Cash"), Some("Petty Cash"));
    }

    #[test]
    fn test_run_constants() {
        let config = ImportConfig::with_defaults();
        assert_eq!(config.default_account_type, "Bank");
        assert_eq!(config.item_name, "ServQuick Sale");
        assert_eq!(config.item_income_account, "Sales of Product Income");
        assert_eq!(config.preamble_rows, 2);
    }
}
