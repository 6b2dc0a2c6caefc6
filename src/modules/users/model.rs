//! User management DTOs, re-exported from `modart-models`.

pub use modart_models::accounts::{Account, AccountChanges, CreateUserDto, UpdateUserDto};
pub use modart_models::projects::Project;
