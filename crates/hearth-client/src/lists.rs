// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shopping and todo lists, and the items on them.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use hearth_core::{HearthError, ResourceKey, ResourceKind};
use hearth_gateway::ApiGateway;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Kind of list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum ListType {
    Shopping,
    Todo,
}

/// Item priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Medium,
    Low,
}

/// A list as returned by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct List {
    pub id: i64,
    pub group_id: i64,
    pub name: String,
    #[serde(rename = "type")]
    pub list_type: ListType,
    pub deadline: Option<DateTime<Utc>>,
    pub store_name: Option<String>,
    pub estimated_total: Option<f64>,
    pub created_by_id: Option<i64>,
    pub is_archived: bool,
    pub archived_at: Option<DateTime<Utc>>,
    /// Optimistic-lock token; echo on every update.
    pub version_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl List {
    /// Coordinator key for this list.
    pub fn key(&self) -> ResourceKey {
        ResourceKey::persistent(ResourceKind::List, self.id)
    }
}

/// Body for creating a list. The group comes from the request scope.
#[derive(Debug, Clone, Serialize)]
pub struct NewList {
    pub name: String,
    #[serde(rename = "type")]
    pub list_type: ListType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_total: Option<f64>,
}

/// Partial update for a list. `version_id` is the echoed lock token.
#[derive(Debug, Clone, Serialize)]
pub struct ListPatch {
    pub version_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub store_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_archived: Option<bool>,
}

impl ListPatch {
    /// An empty patch echoing the given version.
    pub fn at_version(version_id: i64) -> Self {
        Self {
            version_id,
            name: None,
            deadline: None,
            store_name: None,
            estimated_total: None,
            is_archived: None,
        }
    }
}

/// An item on a list.
#[derive(Debug, Clone, Deserialize)]
pub struct Item {
    pub id: i64,
    pub list_id: i64,
    pub name: String,
    pub quantity_value: Option<f64>,
    pub quantity_unit: Option<String>,
    pub is_checked: bool,
    pub checked_at: Option<DateTime<Utc>>,
    pub price_estimate: Option<f64>,
    pub priority: Option<Priority>,
    pub notes: Option<String>,
    pub added_by_id: Option<i64>,
    pub assigned_to_id: Option<i64>,
    /// Optimistic-lock token; echo on every update.
    pub version_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Item {
    /// Coordinator key for this item.
    pub fn key(&self) -> ResourceKey {
        ResourceKey::persistent(ResourceKind::Item, self.id)
    }
}

/// Body for adding an item.
#[derive(Debug, Clone, Serialize)]
pub struct NewItem {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_estimate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl NewItem {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            quantity_value: None,
            quantity_unit: None,
            price_estimate: None,
            priority: None,
            notes: None,
        }
    }
}

/// Partial update for an item. `version_id` is the echoed lock token.
#[derive(Debug, Clone, Serialize)]
pub struct ItemPatch {
    pub version_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity_unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_checked: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_estimate: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ItemPatch {
    /// An empty patch echoing the given version.
    pub fn at_version(version_id: i64) -> Self {
        Self {
            version_id,
            name: None,
            quantity_value: None,
            quantity_unit: None,
            is_checked: None,
            price_estimate: None,
            priority: None,
            notes: None,
        }
    }

    pub fn checked(mut self, is_checked: bool) -> Self {
        self.is_checked = Some(is_checked);
        self
    }
}

#[derive(Debug, Serialize)]
struct BulkItems<'a> {
    items: &'a [NewItem],
}

#[derive(Debug, Deserialize)]
struct BulkItemsResponse {
    items: Vec<Item>,
}

/// Client for `/lists` and nested `/items` endpoints.
#[derive(Debug, Clone)]
pub struct ListsClient {
    gateway: Arc<ApiGateway>,
}

impl ListsClient {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// Lists the group's lists, optionally filtered.
    pub async fn list(
        &self,
        is_archived: Option<bool>,
        list_type: Option<ListType>,
    ) -> Result<Vec<List>, HearthError> {
        self.gateway
            .get("/lists")
            .query_opt("is_archived", is_archived)
            .query_opt("list_type", list_type)
            .send()
            .await
    }

    pub async fn get(&self, list_id: i64) -> Result<List, HearthError> {
        self.gateway.get(format!("/lists/{list_id}")).send().await
    }

    pub async fn create(&self, new_list: &NewList) -> Result<List, HearthError> {
        self.gateway.post("/lists").json(new_list).send().await
    }

    pub async fn update(&self, list_id: i64, patch: &ListPatch) -> Result<List, HearthError> {
        self.gateway
            .patch(format!("/lists/{list_id}"))
            .json(patch)
            .send()
            .await
    }

    pub async fn items(&self, list_id: i64) -> Result<Vec<Item>, HearthError> {
        self.gateway
            .get(format!("/lists/{list_id}/items"))
            .send()
            .await
    }

    pub async fn add_item(&self, list_id: i64, item: &NewItem) -> Result<Item, HearthError> {
        self.gateway
            .post(format!("/lists/{list_id}/items"))
            .json(item)
            .send()
            .await
    }

    pub async fn update_item(
        &self,
        list_id: i64,
        item_id: i64,
        patch: &ItemPatch,
    ) -> Result<Item, HearthError> {
        self.gateway
            .patch(format!("/lists/{list_id}/items/{item_id}"))
            .json(patch)
            .send()
            .await
    }

    pub async fn delete_item(&self, list_id: i64, item_id: i64) -> Result<(), HearthError> {
        self.gateway
            .delete(format!("/lists/{list_id}/items/{item_id}"))
            .send_unit()
            .await
    }

    /// Adds up to 100 items in one request.
    pub async fn bulk_add_items(
        &self,
        list_id: i64,
        items: &[NewItem],
    ) -> Result<Vec<Item>, HearthError> {
        let response: BulkItemsResponse = self
            .gateway
            .post(format!("/lists/{list_id}/items/bulk"))
            .json(&BulkItems { items })
            .send()
            .await?;
        Ok(response.items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_test_utils::test_gateway;
    use wiremock::matchers::{body_partial_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn item_json(id: i64, version: i64, checked: bool) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "list_id": 3,
            "name": "milk",
            "quantity_value": 1.0,
            "quantity_unit": "l",
            "is_checked": checked,
            "checked_at": null,
            "price_estimate": null,
            "priority": "MEDIUM",
            "notes": null,
            "added_by_id": 1,
            "assigned_to_id": null,
            "version_id": version,
            "created_at": "2026-08-01T10:00:00Z",
            "updated_at": "2026-08-01T10:00:00Z"
        })
    }

    #[tokio::test]
    async fn list_builds_filter_query() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/lists"))
            .and(query_param("is_archived", "false"))
            .and(query_param("list_type", "SHOPPING"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let client = ListsClient::new(test_gateway(&server.uri()));
        let lists = client
            .list(Some(false), Some(ListType::Shopping))
            .await
            .unwrap();
        assert!(lists.is_empty());
    }

    #[tokio::test]
    async fn update_item_echoes_version() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/lists/3/items/5"))
            .and(body_partial_json(
                serde_json::json!({"version_id": 3, "is_checked": true}),
            ))
            .respond_with(ResponseTemplate::new(200).set_body_json(item_json(5, 4, true)))
            .expect(1)
            .mount(&server)
            .await;

        let client = ListsClient::new(test_gateway(&server.uri()));
        let item = client
            .update_item(3, 5, &ItemPatch::at_version(3).checked(true))
            .await
            .unwrap();
        assert_eq!(item.version_id, 4);
        assert!(item.is_checked);
        assert_eq!(item.key().to_string(), "item:5");
    }

    #[tokio::test]
    async fn bulk_add_unwraps_envelope() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/lists/3/items/bulk"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "items": [item_json(5, 1, false), item_json(6, 1, false)]
            })))
            .mount(&server)
            .await;

        let client = ListsClient::new(test_gateway(&server.uri()));
        let items = client
            .bulk_add_items(3, &[NewItem::named("milk"), NewItem::named("eggs")])
            .await
            .unwrap();
        assert_eq!(items.len(), 2);
    }

    #[tokio::test]
    async fn delete_item_sends_no_body() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/lists/3/items/5"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        let client = ListsClient::new(test_gateway(&server.uri()));
        client.delete_item(3, 5).await.unwrap();
    }
}
