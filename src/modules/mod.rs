//! Feature modules. Each one has a `controller`, `model`, `router` and
//! `service`.

pub mod auth;
pub mod events;
pub mod projects;
pub mod students;
pub mod users;
