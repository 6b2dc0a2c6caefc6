//! Project DTOs, re-exported from `modart-models`.

pub use modart_models::projects::*;
