// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Shared documents: metadata records plus presigned upload/download URLs.
//! File bytes move directly between the caller and object storage; this
//! client never streams content.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use hearth_core::{HearthError, ResourceKey, ResourceKind};
use hearth_gateway::ApiGateway;
use serde::{Deserialize, Serialize};

/// A document metadata record as returned by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct Document {
    pub id: i64,
    pub group_id: i64,
    pub uploaded_by_id: i64,
    pub file_name: String,
    pub mime_type: String,
    pub folder_path: Option<String>,
    /// Free-form tag object; the backend does not constrain its shape.
    pub tags: Option<serde_json::Value>,
    pub is_encrypted: bool,
    /// Object-storage key; opaque to clients.
    pub file_key: String,
    pub file_size_bytes: i64,
    /// Optimistic-lock token; echo on every metadata update.
    pub version_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Document {
    /// Coordinator key for this document.
    pub fn key(&self) -> ResourceKey {
        ResourceKey::persistent(ResourceKind::Document, self.id)
    }
}

/// Body for requesting a presigned upload URL. The group comes from the
/// request scope; the backend creates the metadata record alongside the URL.
#[derive(Debug, Clone, Serialize)]
pub struct NewDocumentUpload {
    pub file_name: String,
    pub mime_type: String,
    pub file_size_bytes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_path: Option<String>,
}

/// Presigned upload URL response.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentUpload {
    pub upload_url: String,
    pub file_key: String,
    pub expires_in_seconds: i64,
}

/// Presigned download URL response.
#[derive(Debug, Clone, Deserialize)]
pub struct DocumentDownload {
    pub download_url: String,
    pub expires_in_seconds: i64,
}

/// Partial metadata update (rename, move, retag). `version_id` is the
/// echoed lock token.
#[derive(Debug, Clone, Serialize)]
pub struct DocumentPatch {
    pub version_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub folder_path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<serde_json::Value>,
}

impl DocumentPatch {
    /// An empty patch echoing the given version.
    pub fn at_version(version_id: i64) -> Self {
        Self {
            version_id,
            file_name: None,
            folder_path: None,
            tags: None,
        }
    }
}

/// Client for `/documents` endpoints.
#[derive(Debug, Clone)]
pub struct DocumentsClient {
    gateway: Arc<ApiGateway>,
}

impl DocumentsClient {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> Result<Vec<Document>, HearthError> {
        self.gateway.get("/documents").send().await
    }

    /// Requests a presigned upload URL and the metadata record that goes
    /// with it. The caller PUTs the bytes to `upload_url` itself.
    pub async fn request_upload(
        &self,
        upload: &NewDocumentUpload,
    ) -> Result<DocumentUpload, HearthError> {
        self.gateway
            .post("/documents/upload")
            .json(upload)
            .send()
            .await
    }

    pub async fn download_url(&self, document_id: i64) -> Result<DocumentDownload, HearthError> {
        self.gateway
            .get(format!("/documents/{document_id}/download"))
            .send()
            .await
    }

    pub async fn update(
        &self,
        document_id: i64,
        patch: &DocumentPatch,
    ) -> Result<Document, HearthError> {
        self.gateway
            .patch(format!("/documents/{document_id}"))
            .json(patch)
            .send()
            .await
    }

    pub async fn delete(&self, document_id: i64) -> Result<(), HearthError> {
        self.gateway
            .delete(format!("/documents/{document_id}"))
            .send_unit()
            .await
    }
}
