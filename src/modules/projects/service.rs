use std::collections::HashMap;

use anyhow::anyhow;
use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use modart_core::AppError;
use modart_models::accounts::AccountSummary;

use super::model::{CreateProjectDto, Project, ProjectWithCreator, UpdateProjectDto};
use crate::store::AccountStore;

const PROJECT_COLUMNS: &str =
    "id, title, description, external_url, created_by, created_at, updated_at";

pub struct ProjectService;

impl ProjectService {
    /// Attaches creator summaries, fetched in one store lookup.
    async fn with_creators(
        accounts: &dyn AccountStore,
        projects: Vec<Project>,
    ) -> Result<Vec<ProjectWithCreator>, AppError> {
        let mut ids: Vec<Uuid> = projects.iter().map(|p| p.created_by).collect();
        ids.sort_unstable();
        ids.dedup();

        let creators: HashMap<Uuid, AccountSummary> = accounts
            .find_many(&ids)
            .await?
            .iter()
            .map(|account| (account.id, AccountSummary::from(account)))
            .collect();

        Ok(projects
            .into_iter()
            .map(|project| ProjectWithCreator {
                creator: creators.get(&project.created_by).cloned(),
                project,
            })
            .collect())
    }

    async fn find(db: &PgPool, id: Uuid) -> Result<Project, AppError> {
        sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Project not found")))
    }

    #[instrument(skip(db, accounts, dto))]
    pub async fn create_project(
        db: &PgPool,
        accounts: &dyn AccountStore,
        dto: CreateProjectDto,
        created_by: Uuid,
    ) -> Result<ProjectWithCreator, AppError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "INSERT INTO projects (title, description, external_url, created_by)
             VALUES ($1, $2, $3, $4)
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(dto.title.trim())
        .bind(&dto.description)
        .bind(&dto.external_url)
        .bind(created_by)
        .fetch_one(db)
        .await?;

        info!(project_id = %project.id, "Project created");
        let mut enriched = Self::with_creators(accounts, vec![project]).await?;
        enriched
            .pop()
            .ok_or_else(|| AppError::internal_error("Created project missing".to_string()))
    }

    #[instrument(skip(db, accounts))]
    pub async fn get_projects(
        db: &PgPool,
        accounts: &dyn AccountStore,
    ) -> Result<Vec<ProjectWithCreator>, AppError> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects ORDER BY created_at DESC"
        ))
        .fetch_all(db)
        .await?;

        Self::with_creators(accounts, projects).await
    }

    #[instrument(skip(db, accounts))]
    pub async fn get_project(
        db: &PgPool,
        accounts: &dyn AccountStore,
        id: Uuid,
    ) -> Result<ProjectWithCreator, AppError> {
        let project = Self::find(db, id).await?;
        let mut enriched = Self::with_creators(accounts, vec![project]).await?;
        enriched
            .pop()
            .ok_or_else(|| AppError::not_found(anyhow!("Project not found")))
    }

    #[instrument(skip(db))]
    pub async fn get_projects_by_creator(
        db: &PgPool,
        created_by: Uuid,
    ) -> Result<Vec<Project>, AppError> {
        let projects = sqlx::query_as::<_, Project>(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects WHERE created_by = $1 ORDER BY created_at DESC"
        ))
        .bind(created_by)
        .fetch_all(db)
        .await?;

        Ok(projects)
    }

    /// Returns the project's creator, for ownership checks.
    #[instrument(skip(db))]
    pub async fn get_owner(db: &PgPool, id: Uuid) -> Result<Uuid, AppError> {
        Ok(Self::find(db, id).await?.created_by)
    }

    #[instrument(skip(db, accounts, dto))]
    pub async fn update_project(
        db: &PgPool,
        accounts: &dyn AccountStore,
        id: Uuid,
        dto: UpdateProjectDto,
    ) -> Result<ProjectWithCreator, AppError> {
        let project = sqlx::query_as::<_, Project>(&format!(
            "UPDATE projects SET
                title = COALESCE($2, title),
                description = COALESCE($3, description),
                external_url = COALESCE($4, external_url),
                updated_at = NOW()
             WHERE id = $1
             RETURNING {PROJECT_COLUMNS}"
        ))
        .bind(id)
        .bind(dto.title.as_deref().map(str::trim))
        .bind(&dto.description)
        .bind(&dto.external_url)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow!("Project not found")))?;

        let mut enriched = Self::with_creators(accounts, vec![project]).await?;
        enriched
            .pop()
            .ok_or_else(|| AppError::not_found(anyhow!("Project not found")))
    }

    #[instrument(skip(db))]
    pub async fn delete_project(db: &PgPool, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM projects WHERE id = $1")
            .bind(id)
            .execute(db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found(anyhow!("Project not found")));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::PgAccountStore;
    use axum::http::StatusCode;
    use modart_auth::Role;
    use modart_models::accounts::NewAccount;

    async fn create_student(store: &PgAccountStore, email: &str) -> Uuid {
        store
            .create(NewAccount {
                name: "Yves Saint Laurent".to_string(),
                email: email.to_string(),
                password_hash: "hashed".to_string(),
                age: Some(20),
                role: Role::Student,
                is_temporary_password: false,
                must_change_password: false,
            })
            .await
            .unwrap()
            .id
    }

    fn create_dto(title: &str) -> CreateProjectDto {
        CreateProjectDto {
            title: title.to_string(),
            description: "Upcycled denim collection".to_string(),
            external_url: Some("https://portfolio.example.com/denim".to_string()),
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_create_project_with_creator(pool: PgPool) {
        let store = PgAccountStore::new(pool.clone());
        let student_id = create_student(&store, "yves@modart.fr").await;

        let created =
            ProjectService::create_project(&pool, &store, create_dto(" Denim "), student_id)
                .await
                .unwrap();
        assert_eq!(created.project.title, "Denim");
        assert_eq!(created.project.created_by, student_id);
        assert_eq!(created.creator.unwrap().email, "yves@modart.fr");

        assert_eq!(
            ProjectService::get_owner(&pool, created.project.id)
                .await
                .unwrap(),
            student_id
        );
        let fetched = ProjectService::get_project(&pool, &store, created.project.id)
            .await
            .unwrap();
        assert_eq!(fetched.project, created.project);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_projects_by_creator(pool: PgPool) {
        let store = PgAccountStore::new(pool.clone());
        let yves = create_student(&store, "yves@modart.fr").await;
        let coco = create_student(&store, "coco@modart.fr").await;

        ProjectService::create_project(&pool, &store, create_dto("Denim"), yves)
            .await
            .unwrap();
        ProjectService::create_project(&pool, &store, create_dto("Tweed"), coco)
            .await
            .unwrap();

        let projects = ProjectService::get_projects_by_creator(&pool, yves)
            .await
            .unwrap();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].title, "Denim");

        let all = ProjectService::get_projects(&pool, &store).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_partial_update(pool: PgPool) {
        let store = PgAccountStore::new(pool.clone());
        let student_id = create_student(&store, "yves@modart.fr").await;
        let created =
            ProjectService::create_project(&pool, &store, create_dto("Denim"), student_id)
                .await
                .unwrap();

        let updated = ProjectService::update_project(
            &pool,
            &store,
            created.project.id,
            UpdateProjectDto {
                description: Some("Reworked denim".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.project.title, "Denim");
        assert_eq!(updated.project.description, "Reworked denim");
        assert_eq!(updated.project.external_url, created.project.external_url);

        let err = ProjectService::update_project(
            &pool,
            &store,
            Uuid::new_v4(),
            UpdateProjectDto::default(),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn test_delete_project_and_creator_cascade(pool: PgPool) {
        let store = PgAccountStore::new(pool.clone());
        let student_id = create_student(&store, "yves@modart.fr").await;
        let first =
            ProjectService::create_project(&pool, &store, create_dto("Denim"), student_id)
                .await
                .unwrap();
        let second =
            ProjectService::create_project(&pool, &store, create_dto("Tweed"), student_id)
                .await
                .unwrap();

        ProjectService::delete_project(&pool, first.project.id)
            .await
            .unwrap();
        let err = ProjectService::delete_project(&pool, first.project.id)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);

        assert!(store.delete(student_id).await.unwrap());
        let err = ProjectService::get_project(&pool, &store, second.project.id)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::NOT_FOUND);
    }
}
