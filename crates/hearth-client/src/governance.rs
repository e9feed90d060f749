// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Household governance: proposals, ballots, and votes. Tallying (including
//! ranked choice) is computed server-side; the client only casts and reads.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use hearth_core::{HearthError, ResourceKey, ResourceKind};
use hearth_gateway::ApiGateway;
use serde::{Deserialize, Serialize};
use strum::Display;

/// Proposal lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProposalStatus {
    Draft,
    Open,
    Closed,
    Executed,
    Cancelled,
}

/// A governance proposal.
#[derive(Debug, Clone, Deserialize)]
pub struct Proposal {
    pub id: i64,
    pub group_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: ProposalStatus,
    /// Voting method as the backend reports it (e.g. `RANKED_CHOICE`).
    pub voting_method: String,
    pub created_by_id: i64,
    pub closes_at: Option<DateTime<Utc>>,
    /// Optimistic-lock token; echo on every update.
    pub version_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Proposal {
    /// Coordinator key for this proposal.
    pub fn key(&self) -> ResourceKey {
        ResourceKey::persistent(ResourceKind::Proposal, self.id)
    }
}

/// A ballot option attached to a proposal.
#[derive(Debug, Clone, Deserialize)]
pub struct BallotOption {
    pub id: i64,
    pub proposal_id: i64,
    pub label: String,
}

/// Body for drafting a proposal.
#[derive(Debug, Clone, Serialize)]
pub struct NewProposal {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub voting_method: String,
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closes_at: Option<DateTime<Utc>>,
}

/// Partial update for a draft proposal. `version_id` is the echoed lock token.
#[derive(Debug, Clone, Serialize)]
pub struct ProposalPatch {
    pub version_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub closes_at: Option<DateTime<Utc>>,
}

/// A recorded vote.
#[derive(Debug, Clone, Deserialize)]
pub struct Vote {
    pub id: i64,
    pub proposal_id: i64,
    pub option_id: i64,
    pub voter_id: i64,
    /// 1-based rank for ranked-choice ballots; absent for simple votes.
    pub rank: Option<i32>,
    pub created_at: DateTime<Utc>,
}

/// Body for a simple single-option vote.
#[derive(Debug, Clone, Serialize)]
pub struct NewVote {
    pub option_id: i64,
}

/// Body for a ranked-choice ballot: option ids in preference order.
#[derive(Debug, Clone, Serialize)]
pub struct NewRankedVote {
    pub ranked_option_ids: Vec<i64>,
}

/// Per-option tally in a result.
#[derive(Debug, Clone, Deserialize)]
pub struct OptionTally {
    pub option_id: i64,
    pub votes: u64,
}

/// Server-computed result of a closed proposal.
#[derive(Debug, Clone, Deserialize)]
pub struct ProposalResult {
    pub proposal_id: i64,
    pub winner_option_id: Option<i64>,
    pub tallies: Vec<OptionTally>,
}

/// Client for `/proposals` endpoints.
#[derive(Debug, Clone)]
pub struct GovernanceClient {
    gateway: Arc<ApiGateway>,
}

impl GovernanceClient {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list_proposals(
        &self,
        status: Option<ProposalStatus>,
        limit: Option<u32>,
        offset: Option<u32>,
    ) -> Result<Vec<Proposal>, HearthError> {
        self.gateway
            .get("/proposals")
            .query_opt("status_filter", status)
            .query_opt("limit", limit)
            .query_opt("offset", offset)
            .send()
            .await
    }

    pub async fn get_proposal(&self, proposal_id: i64) -> Result<Proposal, HearthError> {
        self.gateway
            .get(format!("/proposals/{proposal_id}"))
            .send()
            .await
    }

    pub async fn create_proposal(&self, proposal: &NewProposal) -> Result<Proposal, HearthError> {
        self.gateway.post("/proposals").json(proposal).send().await
    }

    pub async fn update_proposal(
        &self,
        proposal_id: i64,
        patch: &ProposalPatch,
    ) -> Result<Proposal, HearthError> {
        self.gateway
            .patch(format!("/proposals/{proposal_id}"))
            .json(patch)
            .send()
            .await
    }

    /// Opens a draft proposal for voting.
    pub async fn open_proposal(&self, proposal_id: i64) -> Result<Proposal, HearthError> {
        self.gateway
            .post(format!("/proposals/{proposal_id}/open"))
            .send()
            .await
    }

    /// Closes voting on a proposal.
    pub async fn close_proposal(&self, proposal_id: i64) -> Result<Proposal, HearthError> {
        self.gateway
            .post(format!("/proposals/{proposal_id}/close"))
            .send()
            .await
    }

    pub async fn options(&self, proposal_id: i64) -> Result<Vec<BallotOption>, HearthError> {
        self.gateway
            .get(format!("/proposals/{proposal_id}/options"))
            .send()
            .await
    }

    pub async fn cast_vote(&self, proposal_id: i64, vote: &NewVote) -> Result<Vote, HearthError> {
        self.gateway
            .post(format!("/proposals/{proposal_id}/vote"))
            .json(vote)
            .send()
            .await
    }

    pub async fn cast_ranked_vote(
        &self,
        proposal_id: i64,
        ballot: &NewRankedVote,
    ) -> Result<Vec<Vote>, HearthError> {
        self.gateway
            .post(format!("/proposals/{proposal_id}/vote/ranked"))
            .json(ballot)
            .send()
            .await
    }

    pub async fn results(&self, proposal_id: i64) -> Result<ProposalResult, HearthError> {
        self.gateway
            .get(format!("/proposals/{proposal_id}/results"))
            .send()
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hearth_test_utils::test_gateway;
    use wiremock::matchers::{body_json, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn proposal_json(id: i64, status: &str) -> serde_json::Value {
        serde_json::json!({
            "id": id,
            "group_id": 1,
            "title": "Quiet hours from 22:00",
            "description": null,
            "status": status,
            "voting_method": "RANKED_CHOICE",
            "created_by_id": 2,
            "closes_at": "2026-08-30T20:00:00Z",
            "version_id": 1,
            "created_at": "2026-08-20T09:00:00Z",
            "updated_at": "2026-08-20T09:00:00Z"
        })
    }

    #[tokio::test]
    async fn list_proposals_filters_by_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/proposals"))
            .and(query_param("status_filter", "OPEN"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!([proposal_json(4, "OPEN")])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = GovernanceClient::new(test_gateway(&server.uri()));
        let proposals = client
            .list_proposals(Some(ProposalStatus::Open), None, None)
            .await
            .unwrap();
        assert_eq!(proposals.len(), 1);
        assert_eq!(proposals[0].status, ProposalStatus::Open);
        assert_eq!(proposals[0].key().to_string(), "proposal:4");
    }

    #[tokio::test]
    async fn ranked_vote_posts_preference_order() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/proposals/4/vote/ranked"))
            .and(body_json(
                serde_json::json!({"ranked_option_ids": [12, 10, 11]}),
            ))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!([
                {"id": 1, "proposal_id": 4, "option_id": 12, "voter_id": 2, "rank": 1,
                 "created_at": "2026-08-21T10:00:00Z"},
                {"id": 2, "proposal_id": 4, "option_id": 10, "voter_id": 2, "rank": 2,
                 "created_at": "2026-08-21T10:00:00Z"},
                {"id": 3, "proposal_id": 4, "option_id": 11, "voter_id": 2, "rank": 3,
                 "created_at": "2026-08-21T10:00:00Z"}
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let client = GovernanceClient::new(test_gateway(&server.uri()));
        let votes = client
            .cast_ranked_vote(
                4,
                &NewRankedVote {
                    ranked_option_ids: vec![12, 10, 11],
                },
            )
            .await
            .unwrap();
        assert_eq!(votes.len(), 3);
        assert_eq!(votes[0].rank, Some(1));
    }

    #[tokio::test]
    async fn results_decode_winner() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/proposals/4/results"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "proposal_id": 4,
                "winner_option_id": 12,
                "tallies": [{"option_id": 12, "votes": 3}, {"option_id": 10, "votes": 1}]
            })))
            .mount(&server)
            .await;

        let client = GovernanceClient::new(test_gateway(&server.uri()));
        let result = client.results(4).await.unwrap();
        assert_eq!(result.winner_option_id, Some(12));
        assert_eq!(result.tallies.len(), 2);
    }
}
