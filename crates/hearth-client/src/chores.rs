// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Chores and their rotating assignments. Rotation scheduling is backend
//! logic; assignments arrive already assigned.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use hearth_core::{HearthError, ResourceKey, ResourceKind};
use hearth_gateway::ApiGateway;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Lifecycle of one chore assignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssignmentStatus {
    Pending,
    InProgress,
    Completed,
    Skipped,
}

/// A recurring chore definition.
#[derive(Debug, Clone, Deserialize)]
pub struct Chore {
    pub id: i64,
    pub group_id: i64,
    pub name: String,
    pub description: Option<String>,
    /// Recurrence rule as the backend reports it (e.g. `WEEKLY`).
    pub frequency: String,
    pub points: Option<i32>,
    pub is_active: bool,
    /// Optimistic-lock token; echo on every update.
    pub version_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chore {
    /// Coordinator key for this chore.
    pub fn key(&self) -> ResourceKey {
        ResourceKey::persistent(ResourceKind::Chore, self.id)
    }
}

/// Body for creating a chore.
#[derive(Debug, Clone, Serialize)]
pub struct NewChore {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub frequency: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<i32>,
}

/// Partial update for a chore. `version_id` is the echoed lock token.
#[derive(Debug, Clone, Serialize)]
pub struct ChorePatch {
    pub version_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub frequency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub points: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// One occurrence of a chore, assigned to a member.
#[derive(Debug, Clone, Deserialize)]
pub struct ChoreAssignment {
    pub id: i64,
    pub chore_id: i64,
    pub assigned_to_id: i64,
    pub due_date: NaiveDate,
    pub status: AssignmentStatus,
    pub completed_at: Option<DateTime<Utc>>,
    pub version_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ChoreAssignment {
    /// Coordinator key for this assignment.
    pub fn key(&self) -> ResourceKey {
        ResourceKey::persistent(ResourceKind::Assignment, self.id)
    }
}

/// Body for completing an assignment.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CompleteAssignment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

/// Body for handing an assignment to another member.
#[derive(Debug, Clone, Serialize)]
pub struct ReassignAssignment {
    pub assigned_to_id: i64,
}

/// Client for `/chores` and `/chores/assignments` endpoints.
#[derive(Debug, Clone)]
pub struct ChoresClient {
    gateway: Arc<ApiGateway>,
}

impl ChoresClient {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self, active_only: Option<bool>) -> Result<Vec<Chore>, HearthError> {
        self.gateway
            .get("/chores")
            .query_opt("active_only", active_only)
            .send()
            .await
    }

    pub async fn create(&self, chore: &NewChore) -> Result<Chore, HearthError> {
        self.gateway.post("/chores").json(chore).send().await
    }

    pub async fn update(&self, chore_id: i64, patch: &ChorePatch) -> Result<Chore, HearthError> {
        self.gateway
            .patch(format!("/chores/{chore_id}"))
            .json(patch)
            .send()
            .await
    }

    pub async fn delete(&self, chore_id: i64) -> Result<(), HearthError> {
        self.gateway
            .delete(format!("/chores/{chore_id}"))
            .send_unit()
            .await
    }

    /// Lists assignments, optionally narrowed by due date and status.
    pub async fn assignments(
        &self,
        due_date: Option<NaiveDate>,
        status: Option<AssignmentStatus>,
    ) -> Result<Vec<ChoreAssignment>, HearthError> {
        self.gateway
            .get("/chores/assignments")
            .query_opt("due_date", due_date)
            .query_opt("status_filter", status)
            .send()
            .await
    }

    pub async fn complete_assignment(
        &self,
        assignment_id: i64,
        body: &CompleteAssignment,
    ) -> Result<ChoreAssignment, HearthError> {
        self.gateway
            .patch(format!("/chores/assignments/{assignment_id}/complete"))
            .json(body)
            .send()
            .await
    }

    pub async fn skip_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<ChoreAssignment, HearthError> {
        self.gateway
            .patch(format!("/chores/assignments/{assignment_id}/skip"))
            .send()
            .await
    }

    pub async fn reassign_assignment(
        &self,
        assignment_id: i64,
        body: &ReassignAssignment,
    ) -> Result<ChoreAssignment, HearthError> {
        self.gateway
            .patch(format!("/chores/assignments/{assignment_id}/reassign"))
            .json(body)
            .send()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_test_utils::test_gateway;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn assignment_json(id: i64, status: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "chore_id": 2,
            "assigned_to_id": 4,
            "due_date": "2026-08-24",
            "status": status,
            "completed_at": null,
            "version_id": 1,
            "created_at": "2026-08-17T08:00:00Z",
            "updated_at": "2026-08-17T08:00:00Z"
        })
    }

    #[tokio::test]
    async fn assignments_filter_by_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/chores/assignments"))
            .and(query_param("status_filter", "PENDING"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([assignment_json(7, "PENDING")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ChoresClient::new(test_gateway(&server.uri()));
        let assignments = client
            .assignments(None, Some(AssignmentStatus::Pending))
            .await
            .unwrap();
        assert_eq!(assignments.len(), 1);
        assert_eq!(assignments[0].status, AssignmentStatus::Pending);
        assert_eq!(assignments[0].key().to_string(), "assignment:7");
    }

    #[tokio::test]
    async fn complete_assignment_hits_action_path() {
        let server = MockServer::start().await;
        Mock::given(method("PATCH"))
            .and(path("/chores/assignments/7/complete"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(assignment_json(7, "COMPLETED")),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = ChoresClient::new(test_gateway(&server.uri()));
        let done = client
            .complete_assignment(7, &CompleteAssignment::default())
            .await
            .unwrap();
        assert_eq!(done.status, AssignmentStatus::Completed);
    }
}
