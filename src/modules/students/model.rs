//! Batch provisioning DTOs, re-exported from `modart-models`.

pub use modart_models::accounts::StudentStats;
pub use modart_models::students::*;

/// A batch entry that passed shape validation, after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentCandidate {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
}
