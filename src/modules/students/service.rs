use anyhow::anyhow;
use chrono::Datelike;
use rand::Rng;
use rand::seq::SliceRandom;
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use modart_auth::Role;
use modart_config::EmailConfig;
use modart_core::{AppError, hash_password};
use modart_models::accounts::NewAccount;

use super::model::{
    BatchCreateResponse, MAX_BATCH_SIZE, StudentCandidate, StudentCreationResult, StudentStats,
};
use crate::modules::auth::model::normalize_email;
use crate::store::{AccountStore, DUPLICATE_EMAIL_MESSAGE};
use crate::utils::email::{Mailer, welcome_email};

const PASSWORD_ADJECTIVES: [&str; 6] = ["Smart", "Bright", "Creative", "Art", "Design", "Mod"];
const PASSWORD_SYMBOLS: &[u8] = b"!@#$%^&*";

/// Generates a temporary password such as `Creative2026!4F37`: an adjective,
/// the current year, a symbol, two upper-case hex characters and a number in
/// `10..=99`.
pub fn generate_temporary_password() -> String {
    let mut rng = rand::thread_rng();
    let adjective = PASSWORD_ADJECTIVES.choose(&mut rng).copied().unwrap_or("Mod");
    let symbol = PASSWORD_SYMBOLS
        .choose(&mut rng)
        .map(|&b| b as char)
        .unwrap_or('!');
    let hex = format!("{:02X}", rng.r#gen::<u8>());
    let number: u8 = rng.gen_range(10..=99);

    format!(
        "{adjective}{year}{symbol}{hex}{number}",
        year = chrono::Utc::now().year()
    )
}

/// Matches `^[^\s@]+@[^\s@]+\.[^\s@]+$`.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

fn name_field<'a>(student: &'a Value, field: &str) -> Option<&'a str> {
    student
        .get(field)
        .and_then(Value::as_str)
        .filter(|name| name.trim().chars().count() >= 2)
}

/// Checks the shape of one batch entry and normalizes it.
pub fn parse_candidate(student: &Value) -> Result<StudentCandidate, String> {
    if !student.is_object() {
        return Err("Student record must be an object".to_string());
    }

    let first_name = name_field(student, "firstName")
        .ok_or("First name must be at least 2 characters")?;
    let last_name =
        name_field(student, "lastName").ok_or("Last name must be at least 2 characters")?;
    let email = student
        .get("email")
        .and_then(Value::as_str)
        .filter(|email| !email.is_empty())
        .ok_or("Email is required")?;

    if !is_valid_email(email) {
        return Err("Invalid email format".to_string());
    }

    Ok(StudentCandidate {
        first_name: first_name.trim().to_string(),
        last_name: last_name.trim().to_string(),
        email: normalize_email(email),
    })
}

pub struct StudentService;

impl StudentService {
    /// Provisions student accounts one entry at a time, in input order.
    ///
    /// Only a malformed request as a whole fails; per-entry problems are
    /// recorded on that entry's result. A failed welcome email never undoes
    /// the account it was sent for.
    #[instrument(skip_all)]
    pub async fn batch_create(
        accounts: &dyn AccountStore,
        mailer: &dyn Mailer,
        email_config: &EmailConfig,
        students: &Value,
    ) -> Result<BatchCreateResponse, AppError> {
        let students = match students.as_array() {
            Some(students) if !students.is_empty() => students,
            _ => {
                return Err(AppError::bad_request(anyhow!(
                    "A non-empty array of students is required"
                )));
            }
        };

        if students.len() > MAX_BATCH_SIZE {
            return Err(AppError::bad_request(anyhow!(
                "Maximum {} students per batch",
                MAX_BATCH_SIZE
            )));
        }

        info!(count = students.len(), "Starting batch student creation");

        let login_url = email_config.login_url();
        let mut results = Vec::with_capacity(students.len());

        for student in students {
            let result = Self::provision_one(accounts, mailer, &login_url, student).await;
            results.push(result);
        }

        let response = BatchCreateResponse::from_results(results);
        info!(
            total = response.summary.total,
            succeeded = response.summary.succeeded,
            failed = response.summary.failed,
            "Batch student creation finished"
        );
        Ok(response)
    }

    async fn provision_one(
        accounts: &dyn AccountStore,
        mailer: &dyn Mailer,
        login_url: &str,
        student: &Value,
    ) -> StudentCreationResult {
        let candidate = match parse_candidate(student) {
            Ok(candidate) => candidate,
            Err(message) => return StudentCreationResult::failed(student.clone(), message),
        };

        match accounts.email_exists(&candidate.email).await {
            Ok(false) => {}
            Ok(true) => {
                return StudentCreationResult::failed(student.clone(), DUPLICATE_EMAIL_MESSAGE);
            }
            Err(e) => return StudentCreationResult::failed(student.clone(), e.public_message()),
        }

        let temporary_password = generate_temporary_password();
        let created = match hash_password(&temporary_password) {
            Ok(password_hash) => {
                accounts
                    .create(NewAccount {
                        name: format!("{} {}", candidate.first_name, candidate.last_name),
                        email: candidate.email.clone(),
                        password_hash,
                        age: None,
                        role: Role::Student,
                        is_temporary_password: true,
                        must_change_password: true,
                    })
                    .await
            }
            Err(e) => Err(e),
        };

        let account = match created {
            Ok(account) => account,
            Err(e) => {
                error!(email = %candidate.email, error = %e, "Failed to create student");
                return StudentCreationResult::failed(student.clone(), e.public_message());
            }
        };

        info!(user_id = %account.id, email = %account.email, "Student created");
        let mut result = StudentCreationResult::created(student.clone(), account.id);

        let email = welcome_email(
            &candidate.email,
            &candidate.first_name,
            &candidate.last_name,
            &temporary_password,
            login_url,
        );
        match mailer.send(email).await {
            Ok(()) => result.email_sent = true,
            Err(e) => {
                warn!(email = %candidate.email, error = %e.error, "Welcome email failed");
                result.email_error = Some(e.error.to_string());
            }
        }

        result
    }

    #[instrument(skip(accounts))]
    pub async fn stats(accounts: &dyn AccountStore) -> Result<StudentStats, AppError> {
        accounts.student_stats().await
    }
}
