//! Event DTOs, re-exported from `modart-models`.

pub use modart_models::events::*;
