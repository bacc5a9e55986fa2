// 📐 Schema Validation - Required columns for a ServQuick export
// Validates the uploaded table's shape before any row is touched

use crate::parser::SalesTable;

// ============================================================================
// REQUIRED COLUMNS
// ============================================================================

/// Columns a standardized ServQuick payment export must carry.
/// Compared exactly, after trimming surrounding whitespace at parse time.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "Location name",
    "Sales date",
    "Payment name",
    "Payment type",
    "Payment amount",
    "Tender tax amount",
];

// ============================================================================
// SCHEMA VALIDATOR
// ============================================================================

pub struct SchemaValidator {
    required: Vec<String>,
}

impl SchemaValidator {
    /// Validator for the standard ServQuick export schema
    pub fn new() -> Self {
        SchemaValidator {
            required: REQUIRED_COLUMNS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Validator with a custom required-column set
    pub fn with_required(required: Vec<String>) -> Self {
        SchemaValidator { required }
    }

    /// Check the table against the required columns.
    ///
    /// # Returns
    /// * Empty vec - all required columns present, pipeline may proceed
    /// * Missing names - the run must halt and report them alongside the
    ///   table's actual columns so an operator can diagnose the export
    pub fn validate(&self, table: &SalesTable) -> Vec<String> {
        self.required
            .iter()
            .filter(|name| table.column_index(name).is_none())
            .cloned()
            .collect()
    }
}

impl Default for SchemaValidator {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn table_with_columns(columns: &[&str]) -> SalesTable {
        SalesTable {
            columns: columns.iter().map(|s| s.to_string()).collect(),
            rows: Vec::new(),
        }
    }

    #[test]
    fn test_all_columns_present() {
        let table = table_with_columns(&REQUIRED_COLUMNS);
        let validator = SchemaValidator::new();

        assert!(validator.validate(&table).is_empty());
    }

    #[test]
    fn test_reports_exactly_the_missing_columns() {
        let table = table_with_columns(&[
            "Location name",
            "Sales date",
            "Payment name",
            "Payment type",
        ]);
        let validator = SchemaValidator::new();

        let missing = validator.validate(&table);
        assert_eq!(missing, vec!["Payment amount", "Tender tax amount"]);
    }

    #[test]
    fn test_extra_columns_are_fine() {
        let mut columns: Vec<&str> = REQUIRED_COLUMNS.to_vec();
        columns.push("Store code");
        let table = table_with_columns(&columns);
        let validator = SchemaValidator::new();

        assert!(validator.validate(&table).is_empty());
    }

    #[test]
    fn test_match_is_case_sensitive() {
        let table = table_with_columns(&[
            "location name",
            "Sales date",
            "Payment name",
            "Payment type",
            "Payment amount",
            "Tender tax amount",
        ]);
        let validator = SchemaValidator::new();

        let missing = validator.validate(&table);
        assert_eq!(missing, vec!["Location name"]);
    }

    #[test]
    fn test_custom_required_set() {
        let table = table_with_columns(&["A"]);
        let validator = SchemaValidator::with_required(vec!["A".to_string(), "B".to_string()]);

        assert_eq!(validator.validate(&table), vec!["B"]);
    }
}
