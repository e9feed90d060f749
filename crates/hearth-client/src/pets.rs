// SPDX-FileCopyrightText: 2026 Hearth Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Household pets: profiles, medical records, and expiring-vaccine lookups.
//! Reminder scheduling is backend logic; this client only reads and records.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, Utc};
use hearth_core::{HearthError, ResourceKey, ResourceKind};
use hearth_gateway::ApiGateway;
use serde::{Deserialize, Serialize};

/// A pet profile as returned by the server.
#[derive(Debug, Clone, Deserialize)]
pub struct Pet {
    pub id: i64,
    pub group_id: i64,
    pub name: String,
    /// Species as the backend reports it (e.g. `DOG`, `CAT`).
    pub species: String,
    pub breed: Option<String>,
    pub sex: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub chip_id: Option<String>,
    pub weight_kg: Option<f64>,
    pub photo_url: Option<String>,
    pub is_alive: bool,
    pub died_at: Option<DateTime<Utc>>,
    /// Optimistic-lock token; echo on every update.
    pub version_id: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Pet {
    /// Coordinator key for this pet.
    pub fn key(&self) -> ResourceKey {
        ResourceKey::persistent(ResourceKind::Pet, self.id)
    }
}

/// Body for registering a pet. The group comes from the request scope.
#[derive(Debug, Clone, Serialize)]
pub struct NewPet {
    pub name: String,
    pub species: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chip_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl NewPet {
    pub fn new(name: impl Into<String>, species: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            species: species.into(),
            breed: None,
            sex: None,
            date_of_birth: None,
            chip_id: None,
            weight_kg: None,
            photo_url: None,
        }
    }
}

/// Partial update for a pet. `version_id` is the echoed lock token.
#[derive(Debug, Clone, Serialize)]
pub struct PetPatch {
    pub version_id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chip_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
}

impl PetPatch {
    /// An empty patch echoing the given version.
    pub fn at_version(version_id: i64) -> Self {
        Self {
            version_id,
            name: None,
            breed: None,
            sex: None,
            chip_id: None,
            weight_kg: None,
            photo_url: None,
        }
    }
}

/// Body for marking a pet deceased.
#[derive(Debug, Clone, Serialize)]
pub struct MarkDeceased {
    pub died_at: DateTime<Utc>,
}

/// A vet-visit, vaccine, or other medical record for a pet.
#[derive(Debug, Clone, Deserialize)]
pub struct MedicalRecord {
    pub id: i64,
    pub pet_id: i64,
    /// Record kind as the backend reports it (e.g. `VACCINE`, `CHECKUP`).
    #[serde(rename = "type")]
    pub record_type: String,
    pub description: Option<String>,
    pub performed_at: Option<DateTime<Utc>>,
    pub performed_by: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
    pub reminder_days_before: Option<i32>,
    pub notes: Option<String>,
    pub document_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for adding a medical record.
#[derive(Debug, Clone, Serialize)]
pub struct NewMedicalRecord {
    #[serde(rename = "type")]
    pub record_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performed_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub performed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reminder_days_before: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_id: Option<i64>,
}

/// Client for `/pets` endpoints.
#[derive(Debug, Clone)]
pub struct PetsClient {
    gateway: Arc<ApiGateway>,
}

impl PetsClient {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    pub async fn list(&self) -> Result<Vec<Pet>, HearthError> {
        self.gateway.get("/pets").send().await
    }

    pub async fn get(&self, pet_id: i64) -> Result<Pet, HearthError> {
        self.gateway.get(format!("/pets/{pet_id}")).send().await
    }

    pub async fn create(&self, pet: &NewPet) -> Result<Pet, HearthError> {
        self.gateway.post("/pets").json(pet).send().await
    }

    pub async fn update(&self, pet_id: i64, patch: &PetPatch) -> Result<Pet, HearthError> {
        self.gateway
            .patch(format!("/pets/{pet_id}"))
            .json(patch)
            .send()
            .await
    }

    pub async fn mark_deceased(
        &self,
        pet_id: i64,
        body: &MarkDeceased,
    ) -> Result<Pet, HearthError> {
        self.gateway
            .post(format!("/pets/{pet_id}/mark-deceased"))
            .json(body)
            .send()
            .await
    }

    pub async fn medical_records(&self, pet_id: i64) -> Result<Vec<MedicalRecord>, HearthError> {
        self.gateway
            .get(format!("/pets/{pet_id}/medical"))
            .send()
            .await
    }

    pub async fn add_medical_record(
        &self,
        pet_id: i64,
        record: &NewMedicalRecord,
    ) -> Result<MedicalRecord, HearthError> {
        self.gateway
            .post(format!("/pets/{pet_id}/medical"))
            .json(record)
            .send()
            .await
    }

    /// Vaccines expiring within `days_ahead` days, across the group's pets.
    pub async fn expiring_vaccines(
        &self,
        days_ahead: Option<u32>,
    ) -> Result<Vec<MedicalRecord>, HearthError> {
        self.gateway
            .get("/pets/vaccines/expiring")
            .query_opt("days_ahead", days_ahead)
            .send()
            .await
    }
}
