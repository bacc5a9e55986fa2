// 🌐 QuickBooks Online REST Client - Blocking v3 API calls
// Search goes through the query endpoint (SQL-ish SELECT), creates and
// receipt saves are plain POSTs. One call, one result, no retries.

use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::Value;

use crate::errors::ApiError;
use crate::quickbooks::api::{AccountingService, EntityRef, EntityType};
use crate::receipt::ReceiptDraft;

/// Minor version pinned so response shapes stay stable
const MINOR_VERSION: &str = "65";

// ============================================================================
// CLIENT
// ============================================================================

/// Authenticated handle to one QuickBooks company file
pub struct QbOnlineClient {
    http: reqwest::blocking::Client,
    access_token: String,
    realm_id: String,
    base_url: String,
}

impl QbOnlineClient {
    pub fn new(access_token: String, realm_id: String, base_url: String) -> Self {
        QbOnlineClient {
            http: reqwest::blocking::Client::new(),
            access_token,
            realm_id,
            base_url,
        }
    }

    fn company_url(&self, resource: &str) -> String {
        format!(
            "{}/v3/company/{}/{}?minorversion={}",
            self.base_url, self.realm_id, resource, MINOR_VERSION
        )
    }

    fn get_json(&self, url: &str) -> Result<Value, ApiError> {
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()?;

        Self::json_or_remote_error(response)
    }

    fn post_json<B: Serialize>(&self, url: &str, body: &B) -> Result<Value, ApiError> {
        let response = self
            .http
            .post(url)
            .bearer_auth(&self.access_token)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()?;

        Self::json_or_remote_error(response)
    }

    fn json_or_remote_error(response: reqwest::blocking::Response) -> Result<Value, ApiError> {
        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_else(|_| String::new());
            return Err(ApiError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json::<Value>()?)
    }
}

// ============================================================================
// QUERY / RESPONSE HELPERS
// ============================================================================

/// Build the query-endpoint SELECT for an exact display-name match.
/// Single quotes in the name are escaped per the QuickBooks query grammar.
fn select_query(entity: EntityType, name: &str) -> String {
    let escaped = name.replace('\'', "\\'");
    format!(
        "SELECT * FROM {} WHERE {} = '{}'",
        entity.as_str(),
        entity.name_field(),
        escaped
    )
}

/// Pull the first entity ref out of a query response.
/// An absent or empty entity array means "no match", not an error.
fn query_response_ref(body: &Value, entity: EntityType) -> Result<Option<EntityRef>, ApiError> {
    let query_response = body
        .get("QueryResponse")
        .ok_or_else(|| ApiError::Response("missing 'QueryResponse' object".to_string()))?;

    let entities = match query_response.get(entity.as_str()).and_then(Value::as_array) {
        Some(list) if !list.is_empty() => list,
        _ => return Ok(None),
    };

    let id = entities[0]
        .get("Id")
        .and_then(Value::as_str)
        .ok_or_else(|| {
            ApiError::Response(format!("{} result has no 'Id' field", entity.as_str()))
        })?;

    Ok(Some(EntityRef::new(id.to_string(), entity)))
}

/// Pull the new entity ref out of a create response
fn create_response_ref(body: &Value, entity: EntityType) -> Result<EntityRef, ApiError> {
    let id = body
        .get(entity.as_str())
        .and_then(|e| e.get("Id"))
        .and_then(Value::as_str)
        .ok_or_else(|| {
            ApiError::Response(format!(
                "create response has no '{}.Id' field",
                entity.as_str()
            ))
        })?;

    Ok(EntityRef::new(id.to_string(), entity))
}

// ============================================================================
// RECEIPT PAYLOAD
// ============================================================================

#[derive(Serialize)]
struct RefValue<'a> {
    value: &'a str,
}

#[derive(Serialize)]
struct SalesItemDetail<'a> {
    #[serde(rename = "ItemRef")]
    item_ref: RefValue<'a>,
    #[serde(rename = "Qty")]
    qty: u32,
    #[serde(rename = "UnitPrice", with = "rust_decimal::serde::float")]
    unit_price: Decimal,
}

#[derive(Serialize)]
struct ReceiptLine<'a> {
    #[serde(rename = "DetailType")]
    detail_type: &'static str,
    #[serde(rename = "Amount", with = "rust_decimal::serde::float")]
    amount: Decimal,
    #[serde(rename = "SalesItemLineDetail")]
    detail: SalesItemDetail<'a>,
}

#[derive(Serialize)]
struct ReceiptPayload<'a> {
    #[serde(rename = "CustomerRef")]
    customer_ref: RefValue<'a>,
    #[serde(rename = "DepositToAccountRef")]
    deposit_to_account_ref: RefValue<'a>,
    #[serde(rename = "TxnDate")]
    txn_date: String,
    #[serde(rename = "PrivateNote")]
    private_note: &'a str,
    #[serde(rename = "Line")]
    line: Vec<ReceiptLine<'a>>,
}

fn receipt_payload(draft: &ReceiptDraft) -> ReceiptPayload<'_> {
    ReceiptPayload {
        customer_ref: RefValue {
            value: &draft.customer.id,
        },
        deposit_to_account_ref: RefValue {
            value: &draft.deposit_account.id,
        },
        txn_date: draft.txn_date.format("%Y-%m-%d").to_string(),
        private_note: &draft.private_note,
        line: vec![ReceiptLine {
            detail_type: "SalesItemLineDetail",
            amount: draft.amount,
            detail: SalesItemDetail {
                item_ref: RefValue {
                    value: &draft.item.id,
                },
                qty: draft.quantity,
                unit_price: draft.amount,
            },
        }],
    }
}

// ============================================================================
// ACCOUNTING SERVICE IMPL
// ============================================================================

impl AccountingService for QbOnlineClient {
    fn search_by_name(
        &self,
        entity: EntityType,
        name: &str,
    ) -> Result<Option<EntityRef>, ApiError> {
        let query = select_query(entity, name);
        let url = format!(
            "{}/v3/company/{}/query?query={}&minorversion={}",
            self.base_url,
            self.realm_id,
            urlencoding::encode(&query),
            MINOR_VERSION
        );

        let body = self.get_json(&url)?;
        query_response_ref(&body, entity)
    }

    fn create(&self, entity: EntityType, fields: &Value) -> Result<EntityRef, ApiError> {
        let resource = entity.as_str().to_lowercase();
        let url = self.company_url(&resource);

        let body = self.post_json(&url, fields)?;
        create_response_ref(&body, entity)
    }

    fn save_receipt(&self, draft: &ReceiptDraft) -> Result<String, ApiError> {
        let url = self.company_url("salesreceipt");
        let payload = receipt_payload(draft);

        let body = self.post_json(&url, &payload)?;

        // SalesReceipt is not an EntityType the resolver tracks, so pull the
        // id out directly instead of reusing create_response_ref
        let id = body
            .get("SalesReceipt")
            .and_then(|r| r.get("Id"))
            .and_then(Value::as_str)
            .ok_or_else(|| {
                ApiError::Response("save response has no 'SalesReceipt.Id' field".to_string())
            })?;

        Ok(id.to_string())
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    #[test]
    fn test_select_query_shapes() {
        assert_eq!(
            select_query(EntityType::Account, "Cash on hand"),
            "SELECT * FROM Account WHERE Name = 'Cash on hand'"
        );
        assert_eq!(
            select_query(EntityType::Customer, "Cash"),
            "SELECT * FROM Customer WHERE DisplayName = 'Cash'"
        );
    }

    #[test]
    fn test_select_query_escapes_quotes() {
        assert_eq!(
            select_query(EntityType::Customer, "O'Brien's"),
            "SELECT * FROM Customer WHERE DisplayName = 'O\\'Brien\\'s'"
        );
    }

    #[test]
    fn test_query_response_with_match() {
        let body = serde_json::json!({
            "QueryResponse": { "Account": [ { "Id": "35", "Name": "Cash on hand" } ] }
        });

        let entity_ref = query_response_ref(&body, EntityType::Account).unwrap();
        assert_eq!(
            entity_ref,
            Some(EntityRef::new("35".to_string(), EntityType::Account))
        );
    }

    #[test]
    fn test_query_response_no_match_is_none() {
        // QuickBooks omits the entity array entirely when nothing matched
        let body = serde_json::json!({ "QueryResponse": {} });
        assert_eq!(query_response_ref(&body, EntityType::Customer).unwrap(), None);
    }

    #[test]
    fn test_query_response_missing_wrapper_is_error() {
        let body = serde_json::json!({ "Fault": {} });
        assert!(query_response_ref(&body, EntityType::Account).is_err());
    }

    #[test]
    fn test_create_response_ref() {
        let body = serde_json::json!({
            "Customer": { "Id": "67", "DisplayName": "Cash" }
        });

        let entity_ref = create_response_ref(&body, EntityType::Customer).unwrap();
        assert_eq!(entity_ref.id, "67");
        assert_eq!(entity_ref.entity_type, EntityType::Customer);
    }

    #[test]
    fn test_receipt_payload_serialization() {
        let draft = ReceiptDraft {
            customer: EntityRef::new("67".to_string(), EntityType::Customer),
            deposit_account: EntityRef::new("35".to_string(), EntityType::Account),
            item: EntityRef::new("11".to_string(), EntityType::Item),
            txn_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            amount: Decimal::from_str("25.50").unwrap(),
            quantity: 1,
            private_note: "Imported from ServQuick: Cash".to_string(),
        };

        let value = serde_json::to_value(receipt_payload(&draft)).unwrap();

        assert_eq!(value["CustomerRef"]["value"], "67");
        assert_eq!(value["DepositToAccountRef"]["value"], "35");
        assert_eq!(value["TxnDate"], "2024-03-01");
        assert_eq!(value["PrivateNote"], "Imported from ServQuick: Cash");
        assert_eq!(value["Line"][0]["DetailType"], "SalesItemLineDetail");
        assert_eq!(value["Line"][0]["Amount"], 25.5);
        assert_eq!(value["Line"][0]["SalesItemLineDetail"]["ItemRef"]["value"], "11");
        assert_eq!(value["Line"][0]["SalesItemLineDetail"]["Qty"], 1);
        assert_eq!(value["Line"][0]["SalesItemLineDetail"]["UnitPrice"], 25.5);
    }
}
