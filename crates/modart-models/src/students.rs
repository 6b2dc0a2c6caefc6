//! Batch student provisioning types.
//!
//! The batch request keeps `students` as raw JSON so each entry can be
//! validated independently and echoed back exactly as submitted.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// Upper bound on entries in one batch request.
pub const MAX_BATCH_SIZE: usize = 100;

/// Entry-level rules are applied per student by the provisioning workflow.
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct BatchCreateRequest {
    /// Array of student records, see [`StudentInput`].
    #[serde(default)]
    #[schema(value_type = Vec<StudentInput>)]
    pub students: serde_json::Value,
}

/// Shape expected for each entry of a batch request.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentInput {
    #[schema(example = "Jeanne")]
    pub first_name: String,
    #[schema(example = "Lanvin")]
    pub last_name: String,
    #[schema(example = "jeanne.lanvin@modart.fr")]
    pub email: String,
}

/// Outcome of one batch entry.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StudentCreationResult {
    /// The entry as received.
    pub student: serde_json::Value,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub email_sent: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email_error: Option<String>,
}

impl StudentCreationResult {
    pub fn failed(student: serde_json::Value, error: impl Into<String>) -> Self {
        Self {
            student,
            success: false,
            user_id: None,
            error: Some(error.into()),
            email_sent: false,
            email_error: None,
        }
    }

    pub fn created(student: serde_json::Value, user_id: Uuid) -> Self {
        Self {
            student,
            success: true,
            user_id: Some(user_id),
            error: None,
            email_sent: false,
            email_error: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BatchCreateResponse {
    pub summary: BatchSummary,
    pub results: Vec<StudentCreationResult>,
}

impl BatchCreateResponse {
    pub fn from_results(results: Vec<StudentCreationResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.success).count();
        Self {
            summary: BatchSummary {
                total: results.len(),
                succeeded,
                failed: results.len() - succeeded,
            },
            results,
        }
    }
}
