// 🗂️ Entity Resolver - Name → remote ref, creating on first reference
// One in-run cache keyed by (entity type, trimmed name) so the same name
// costs at most one search (plus one create) per run.

use serde_json::json;
use std::collections::HashMap;

use crate::config::ImportConfig;
use crate::errors::ApiError;
use crate::quickbooks::api::{AccountingService, EntityRef, EntityType};

// ============================================================================
// ENTITY CACHE
// ============================================================================

/// Run-scoped cache of resolved refs.
///
/// Created when the resolver is built, dropped with it at run end. Owned
/// exclusively by the resolver; nothing else reads or writes it.
#[derive(Debug, Default)]
pub struct EntityCache {
    entries: HashMap<(EntityType, String), EntityRef>,
}

impl EntityCache {
    pub fn new() -> Self {
        EntityCache {
            entries: HashMap::new(),
        }
    }

    fn key(entity: EntityType, name: &str) -> (EntityType, String) {
        (entity, name.trim().to_string())
    }

    pub fn get(&self, entity: EntityType, name: &str) -> Option<&EntityRef> {
        self.entries.get(&Self::key(entity, name))
    }

    pub fn insert(&mut self, entity: EntityType, name: &str, entity_ref: EntityRef) {
        self.entries.insert(Self::key(entity, name), entity_ref);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

// ============================================================================
// ENTITY RESOLVER
// ============================================================================

/// Resolves accounts, customers and the shared sales item against the
/// accounting service, creating entities the first time a name appears.
pub struct EntityResolver<'a, S: AccountingService> {
    service: &'a S,
    config: &'a ImportConfig,
    cache: EntityCache,
}

impl<'a, S: AccountingService> EntityResolver<'a, S> {
    pub fn new(service: &'a S, config: &'a ImportConfig) -> Self {
        EntityResolver {
            service,
            config,
            cache: EntityCache::new(),
        }
    }

    /// Resolve a deposit account by display name.
    ///
    /// Search first; if absent, create an account of the configured default
    /// type. The caller treats a failure here as a reason to skip the
    /// current row, not to abort the run.
    pub fn resolve_account(&mut self, name: &str) -> Result<EntityRef, ApiError> {
        if let Some(cached) = self.cache.get(EntityType::Account, name) {
            return Ok(cached.clone());
        }

        let entity_ref = match self.service.search_by_name(EntityType::Account, name)? {
            Some(found) => found,
            None => self.service.create(
                EntityType::Account,
                &json!({
                    "Name": name,
                    "AccountType": self.config.default_account_type,
                }),
            )?,
        };

        self.cache.insert(EntityType::Account, name, entity_ref.clone());
        Ok(entity_ref)
    }

    /// Resolve a customer by display name, creating it if absent
    pub fn resolve_customer(&mut self, name: &str) -> Result<EntityRef, ApiError> {
        if let Some(cached) = self.cache.get(EntityType::Customer, name) {
            return Ok(cached.clone());
        }

        let entity_ref = match self.service.search_by_name(EntityType::Customer, name)? {
            Some(found) => found,
            None => self
                .service
                .create(EntityType::Customer, &json!({ "DisplayName": name }))?,
        };

        self.cache.insert(EntityType::Customer, name, entity_ref.clone());
        Ok(entity_ref)
    }

    /// Resolve the shared service item all receipts in a run bill against.
    ///
    /// Resolved at most once per run (cache hit afterwards). If the item has
    /// to be created, its income account must already exist; inventing an
    /// income account would post revenue to a ledger account of the wrong
    /// type, so that case fails instead.
    pub fn resolve_item(&mut self) -> Result<EntityRef, ApiError> {
        let item_name = self.config.item_name.clone();

        if let Some(cached) = self.cache.get(EntityType::Item, &item_name) {
            return Ok(cached.clone());
        }

        let entity_ref = match self.service.search_by_name(EntityType::Item, &item_name)? {
            Some(found) => found,
            None => {
                let income_name = &self.config.item_income_account;
                let income = self
                    .service
                    .search_by_name(EntityType::Account, income_name)?
                    .ok_or_else(|| ApiError::NotFound {
                        entity: "Account",
                        name: income_name.clone(),
                    })?;

                self.service.create(
                    EntityType::Item,
                    &json!({
                        "Name": item_name,
                        "Type": "Service",
                        "IncomeAccountRef": { "value": income.id },
                    }),
                )?
            }
        };

        self.cache.insert(EntityType::Item, &item_name, entity_ref.clone());
        Ok(entity_ref)
    }

    /// Number of distinct refs resolved so far this run
    pub fn cached_entities(&self) -> usize {
        self.cache.len()
    }
}

// ============================================================================
// TESTS
// ============================================================================
