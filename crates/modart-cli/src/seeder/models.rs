//! Seed records and seeding configuration.

use chrono::{DateTime, Utc};

/// Email domain shared by every seeded account, used to find them again
/// when clearing.
pub const SEED_EMAIL_DOMAIN: &str = "example.com";

/// Seed data for creating an account.
pub struct UserSeed {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: &'static str,
    pub age: Option<i32>,
    pub is_temporary_password: bool,
}

/// Seed data for creating an event.
pub struct EventSeed {
    pub title: String,
    pub description: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub location: String,
}

/// How much data `seed_all` creates.
#[derive(Clone, Debug)]
pub struct SeedConfig {
    pub admins: usize,
    pub students: usize,
    pub events: usize,
    /// Share of students created with a temporary password, in percent.
    pub temporary_password_percent: u8,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            admins: 1,
            students: 50,
            events: 10,
            temporary_password_percent: 20,
        }
    }
}

impl SeedConfig {
    pub fn new(students: usize) -> Self {
        Self {
            students,
            ..Default::default()
        }
    }

    pub fn with_admins(mut self, admins: usize) -> Self {
        self.admins = admins;
        self
    }

    pub fn with_events(mut self, events: usize) -> Self {
        self.events = events;
        self
    }

    pub fn total_users(&self) -> usize {
        self.admins + self.students
    }
}
