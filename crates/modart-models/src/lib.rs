//! # Mod'Art Models
//!
//! Domain models and DTOs for the Mod'Art API.
//!
//! # Modules
//!
//! - [`accounts`]: Accounts, authentication requests and user management DTOs
//! - [`events`]: Events (fashion shows, galas) and their DTOs
//! - [`projects`]: Student portfolio projects
//! - [`students`]: Batch provisioning request and report types
//!
//! Request DTOs derive [`validator::Validate`]; every JSON body uses camelCase
//! field names.

pub mod accounts;
pub mod events;
pub mod projects;
pub mod students;

pub use accounts::{
    Account, AccountChanges, AccountRecord, AccountSummary, AuthResponse, ChangePasswordRequest,
    CreateUserDto, LoginRequest, LoginResponse, NewAccount, ProfileResponse, RefreshRequest,
    RegisterRequest, StudentStats, TokenPair, UpdateUserDto,
};
pub use events::{CreateEventDto, Event, EventWithUsers, UpdateEventDto};
pub use projects::{CreateProjectDto, Project, ProjectWithCreator, UpdateProjectDto};
pub use students::{
    BatchCreateRequest, BatchCreateResponse, BatchSummary, MAX_BATCH_SIZE, StudentCreationResult,
    StudentInput,
};
