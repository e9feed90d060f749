// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared expenses, settlements, and the group balance summary.
//!
//! Balance computation lives on the backend; this client only moves typed
//! records. Expense listing is one of the endpoints that takes the group as
//! a `group_id` query parameter instead of the header.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use hearth_core::{HearthError, Paginated, ResourceKey, ResourceKind};
use hearth_gateway::{ApiGateway, TenantScope};
use serde::{Deserialize, Serialize};

/// One member's share of an expense.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExpenseSplit {
    pub user_id: i64,
    pub owed_amount: f64,
}

/// A shared expense as returned by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub group_id: i64,
    pub description: String,
    pub amount: f64,
    pub paid_by_user_id: i64,
    pub category_id: Option<i64>,
    pub expense_date: DateTime<Utc>,
    #[serde(default)]
    pub splits: Vec<ExpenseSplit>,
    /// Optimistic-lock token; echo on every update.
    pub version_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// Coordinator key for this expense.
    pub fn key(&self) -> ResourceKey {
        ResourceKey::persistent(ResourceKind::Expense, self.id)
    }
}

/// Body for recording an expense. Payer and group come from the session.
#[derive(Debug, Clone, Serialize)]
pub struct NewExpense {
    pub description: String,
    pub amount: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    pub expense_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub splits: Vec<ExpenseSplit>,
}

/// Partial update for an expense. `version_id` is the echoed lock token.
#[derive(Debug, Clone, Serialize)]
pub struct ExpensePatch {
    pub version_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expense_date: Option<DateTime<Utc>>,
}

impl ExpensePatch {
    /// An empty patch echoing the given version.
    pub fn at_version(version_id: i64) -> Self {
        Self {
            version_id,
            description: None,
            amount: None,
            category_id: None,
            expense_date: None,
        }
    }
}

/// A settlement payment between two members.
#[derive(Debug, Clone, Deserialize)]
pub struct Settlement {
    pub id: i64,
    pub group_id: i64,
    pub payer_id: i64,
    pub payee_id: i64,
    pub amount: f64,
    pub settled_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Body for recording a settlement. Payer comes from the session.
#[derive(Debug, Clone, Serialize)]
pub struct NewSettlement {
    pub payee_id: i64,
    pub amount: f64,
}

/// One member's net position within the group.
#[derive(Debug, Clone, Deserialize)]
pub struct MemberBalance {
    pub user_id: i64,
    /// Positive: the group owes this member. Negative: they owe the group.
    pub net_amount: f64,
}

/// Server-computed balance summary for the active group.
#[derive(Debug, Clone, Deserialize)]
pub struct BalanceSummary {
    pub group_id: i64,
    pub balances: Vec<MemberBalance>,
}

/// Client for `/expenses`, `/settlements`, and `/finance` endpoints.
#[derive(Debug, Clone)]
pub struct FinanceClient {
    gateway: Arc<ApiGateway>,
}

impl FinanceClient {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    /// Pages through the group's expenses. This endpoint reads the group
    /// from the `group_id` query parameter.
    pub async fn list_expenses(
        &self,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Paginated<Expense>, HearthError> {
        self.gateway
            .get("/expenses")
            .tenant(TenantScope::QueryParam)
            .query_opt("limit", limit)
            .query_opt("offset", offset)
            .send()
            .await
    }

    pub async fn get_expense(&self, expense_id: i64) -> Result<Expense, HearthError> {
        self.gateway
            .get(format!("/expenses/{expense_id}"))
            .send()
            .await
    }

    pub async fn create_expense(&self, expense: &NewExpense) -> Result<Expense, HearthError> {
        self.gateway.post("/expenses").json(expense).send().await
    }

    pub async fn update_expense(
        &self,
        expense_id: i64,
        patch: &ExpensePatch,
    ) -> Result<Expense, HearthError> {
        self.gateway
            .patch(format!("/expenses/{expense_id}"))
            .json(patch)
            .send()
            .await
    }

    pub async fn list_settlements(&self) -> Result<Vec<Settlement>, HearthError> {
        self.gateway.get("/settlements").send().await
    }

    pub async fn create_settlement(
        &self,
        settlement: &NewSettlement,
    ) -> Result<Settlement, HearthError> {
        self.gateway
            .post("/settlements")
            .json(settlement)
            .send()
            .await
    }

    /// Server-computed net balances for the active group.
    pub async fn balance_summary(&self) -> Result<BalanceSummary, HearthError> {
        self.gateway.get("/finance/balances").send().await
    }
}
