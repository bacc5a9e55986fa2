// 🔌 Accounting Service Interface
// The one seam between the import pipeline and QuickBooks Online.
// Production uses the REST client in http.rs; tests plug in mocks.

use serde::{Deserialize, Serialize};

use crate::errors::ApiError;
use crate::receipt::ReceiptDraft;

// ============================================================================
// ENTITY TYPES
// ============================================================================

/// Remote entity kinds this pipeline touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Account,
    Customer,
    Item,
}

impl EntityType {
    /// QuickBooks entity name (also the REST resource in lowercase)
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityType::Account => "Account",
            EntityType::Customer => "Customer",
            EntityType::Item => "Item",
        }
    }

    /// Field the entity's display name lives in, for query building
    pub fn name_field(&self) -> &'static str {
        match self {
            EntityType::Account => "Name",
            EntityType::Customer => "DisplayName",
            EntityType::Item => "Name",
        }
    }
}

// ============================================================================
// ENTITY REF
// ============================================================================

/// A (remote id, entity type) pair identifying one QuickBooks entity.
///
/// Never built by the pipeline directly; always handed out by the service
/// or the entity resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRef {
    pub id: String,
    pub entity_type: EntityType,
}

impl EntityRef {
    pub fn new(id: String, entity_type: EntityType) -> Self {
        EntityRef { id, entity_type }
    }
}

// ============================================================================
// ACCOUNTING SERVICE TRAIT
// ============================================================================

/// Operations the import pipeline needs from the accounting backend.
///
/// Every call is blocking and must complete (success or error) before the
/// pipeline moves on; there is no retry layer.
pub trait AccountingService {
    /// Find an entity by its display name. `Ok(None)` means "not there",
    /// which is not an error: the resolver creates it next.
    fn search_by_name(&self, entity: EntityType, name: &str)
        -> Result<Option<EntityRef>, ApiError>;

    /// Create an entity from a JSON field map and return its new ref
    fn create(&self, entity: EntityType, fields: &serde_json::Value)
        -> Result<EntityRef, ApiError>;

    /// Persist a sales receipt draft; returns the remote receipt id
    fn save_receipt(&self, draft: &ReceiptDraft) -> Result<String, ApiError>;
}

// ============================================================================
// TEST DOUBLE
// ============================================================================

/// In-memory stand-in for QuickBooks Online, shared by the resolver and
/// orchestrator unit tests. Counts remote calls so tests can assert the
/// cache short-circuits them.
#[cfg(test)]
pub(crate) mod mock {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::Value;
    use std::cell::RefCell;
    use std::collections::HashMap;

    pub struct MockService {
        existing: RefCell<HashMap<(EntityType, String), String>>,
        searches: RefCell<usize>,
        creates: RefCell<Vec<(EntityType, String)>>,
        saved: RefCell<Vec<ReceiptDraft>>,
        failing_amount: Option<Decimal>,
        next_id: RefCell<u32>,
    }

    impl MockService {
        pub fn new() -> Self {
            MockService {
                existing: RefCell::new(HashMap::new()),
                searches: RefCell::new(0),
                creates: RefCell::new(Vec::new()),
                saved: RefCell::new(Vec::new()),
                failing_amount: None,
                next_id: RefCell::new(100),
            }
        }

        /// Pre-seed a remote entity
        pub fn with_entity(self, entity: EntityType, name: &str, id: &str) -> Self {
            self.existing
                .borrow_mut()
                .insert((entity, name.to_string()), id.to_string());
            self
        }

        /// Make save_receipt fail for drafts with this exact amount
        pub fn with_failing_amount(mut self, amount: Decimal) -> Self {
            self.failing_amount = Some(amount);
            self
        }

        pub fn search_count(&self) -> usize {
            *self.searches.borrow()
        }

        pub fn created(&self) -> Vec<(EntityType, String)> {
            self.creates.borrow().clone()
        }

        pub fn saved(&self) -> Vec<ReceiptDraft> {
            self.saved.borrow().clone()
        }
    }

    impl AccountingService for MockService {
        fn search_by_name(
            &self,
            entity: EntityType,
            name: &str,
        ) -> Result<Option<EntityRef>, ApiError> {
            *self.searches.borrow_mut() += 1;
            Ok(self
                .existing
                .borrow()
                .get(&(entity, name.to_string()))
                .map(|id| EntityRef::new(id.clone(), entity)))
        }

        fn create(&self, entity: EntityType, fields: &Value) -> Result<EntityRef, ApiError> {
            let name = fields
                .get(entity.name_field())
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_string();

            let mut next = self.next_id.borrow_mut();
            let id = next.to_string();
            *next += 1;

            self.creates.borrow_mut().push((entity, name.clone()));
            self.existing
                .borrow_mut()
                .insert((entity, name), id.clone());

            Ok(EntityRef::new(id, entity))
        }

        fn save_receipt(&self, draft: &ReceiptDraft) -> Result<String, ApiError> {
            if self.failing_amount == Some(draft.amount) {
                return Err(ApiError::Remote {
                    status: 400,
                    message: "Business Validation Error".to_string(),
                });
            }

            let mut next = self.next_id.borrow_mut();
            let id = next.to_string();
            *next += 1;

            self.saved.borrow_mut().push(draft.clone());
            Ok(id)
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
