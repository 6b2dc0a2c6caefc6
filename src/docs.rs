use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use modart_auth::Role;
use modart_core::ErrorResponse;
use modart_models::accounts::{
    Account, AccountSummary, AuthResponse, ChangePasswordRequest, CreateUserDto, LoginRequest,
    LoginResponse, ProfileResponse, RefreshRequest, RegisterRequest, StudentStats, TokenPair,
    UpdateUserDto,
};
use modart_models::events::{CreateEventDto, Event, EventWithUsers, UpdateEventDto};
use modart_models::projects::{CreateProjectDto, Project, ProjectWithCreator, UpdateProjectDto};
use modart_models::students::{
    BatchCreateRequest, BatchCreateResponse, BatchSummary, StudentCreationResult, StudentInput,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::modules::auth::controller::register,
        crate::modules::auth::controller::login,
        crate::modules::auth::controller::get_profile,
        crate::modules::auth::controller::change_password,
        crate::modules::auth::controller::refresh_token,
        crate::modules::auth::controller::logout,
        crate::modules::users::controller::create_user,
        crate::modules::users::controller::get_users,
        crate::modules::users::controller::get_user,
        crate::modules::users::controller::update_user,
        crate::modules::users::controller::deactivate_user,
        crate::modules::users::controller::delete_user,
        crate::modules::users::controller::get_user_projects,
        crate::modules::events::controller::create_event,
        crate::modules::events::controller::get_events,
        crate::modules::events::controller::get_active_events,
        crate::modules::events::controller::get_event,
        crate::modules::events::controller::update_event,
        crate::modules::events::controller::delete_event,
        crate::modules::projects::controller::create_project,
        crate::modules::projects::controller::get_projects,
        crate::modules::projects::controller::get_project,
        crate::modules::projects::controller::update_project,
        crate::modules::projects::controller::delete_project,
        crate::modules::students::controller::batch_create_students,
        crate::modules::students::controller::get_student_stats,
    ),
    components(
        schemas(
            Role,
            Account,
            AccountSummary,
            RegisterRequest,
            LoginRequest,
            ChangePasswordRequest,
            RefreshRequest,
            AuthResponse,
            LoginResponse,
            TokenPair,
            ProfileResponse,
            CreateUserDto,
            UpdateUserDto,
            StudentStats,
            Event,
            EventWithUsers,
            CreateEventDto,
            UpdateEventDto,
            Project,
            ProjectWithCreator,
            CreateProjectDto,
            UpdateProjectDto,
            BatchCreateRequest,
            BatchCreateResponse,
            BatchSummary,
            StudentInput,
            StudentCreationResult,
            ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Registration, login and token management"),
        (name = "Users", description = "User management endpoints"),
        (name = "Events", description = "School events"),
        (name = "Projects", description = "Student and staff projects"),
        (name = "Students", description = "Batch student provisioning")
    ),
    info(
        title = "Mod'Art API",
        version = "0.1.0",
        description = "Backend for the Mod'Art International fashion school, built with Rust, Axum and PostgreSQL.",
        license(
            name = "MIT"
        )
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_lists_every_module() {
        let doc = ApiDoc::openapi();
        for path in [
            "/api/auth/login",
            "/api/auth/refresh",
            "/api/users/{id}/deactivate",
            "/api/events/active",
            "/api/projects/{id}",
            "/api/students/batch-create",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }

    #[test]
    fn test_bearer_scheme_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
