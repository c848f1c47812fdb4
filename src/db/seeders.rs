//! Database seeders for built-in data
//!
//! Ensures the default administrator account exists. Running it again is a
//! no-op: an existing account is reported and left untouched.

use anyhow::{Context, Result};
use sqlx::SqlitePool;
use tracing::info;

use super::models::{NewUser, Role, User};

pub const ADMIN_EMAIL: &str = "admin@school.com";
pub const ADMIN_PASSWORD: &str = "admin123";

const ADMIN_FIRST_NAME: &str = "System";
const ADMIN_LAST_NAME: &str = "Administrator";

/// bcrypt work factor for seeded credentials
const BCRYPT_COST: u32 = 12;

#[derive(Debug)]
pub enum SeedOutcome {
    Created(User),
    AlreadyExists(User),
}

impl SeedOutcome {
    pub fn user(&self) -> &User {
        match self {
            SeedOutcome::Created(user) | SeedOutcome::AlreadyExists(user) => user,
        }
    }
}

/// Human-readable status lines for a seed run
pub fn report(outcome: &SeedOutcome) -> Vec<String> {
    match outcome {
        SeedOutcome::Created(user) => vec![
            "Admin user created successfully!".to_string(),
            format!("Email: {}", user.email),
            format!("Password: {}", ADMIN_PASSWORD),
            format!("Role: {}", user.role),
        ],
        SeedOutcome::AlreadyExists(user) => vec![
            "Admin user already exists!".to_string(),
            format!("Email: {}", user.email),
            format!("Password: {} (unless changed)", ADMIN_PASSWORD),
            format!("Name: {}", user.full_name()),
            format!("Role: {}", user.role),
        ],
    }
}

/// Migrate, seed and describe the result. Failures become an error line
/// rather than propagating, so callers always reach their cleanup.
pub async fn seed_and_report(pool: &SqlitePool) -> Vec<String> {
    match migrate_and_seed(pool).await {
        Ok(outcome) => report(&outcome),
        Err(e) => {
            tracing::error!("Seeding failed: {:#}", e);
            vec![format!("Error seeding database: {:#}", e)]
        }
    }
}

async fn migrate_and_seed(pool: &SqlitePool) -> Result<SeedOutcome> {
    super::run_migrations(pool).await?;
    seed_admin_user(pool).await
}

/// Create the default admin user unless one with [`ADMIN_EMAIL`] exists
pub async fn seed_admin_user(pool: &SqlitePool) -> Result<SeedOutcome> {
    if let Some(existing) = User::find_by_email(pool, ADMIN_EMAIL)
        .await
        .context("Failed to look up admin user")?
    {
        info!(email = %existing.email, "Admin user already present, skipping");
        return Ok(SeedOutcome::AlreadyExists(existing));
    }

    let password_hash =
        bcrypt::hash(ADMIN_PASSWORD, BCRYPT_COST).context("Failed to hash admin password")?;

    let user = User::create(
        pool,
        &NewUser {
            email: ADMIN_EMAIL.to_string(),
            first_name: ADMIN_FIRST_NAME.to_string(),
            last_name: ADMIN_LAST_NAME.to_string(),
            password_hash,
            role: Role::Admin,
        },
    )
    .await
    .context("Failed to insert admin user")?;

    info!(email = %user.email, id = %user.id, "Created admin user");
    Ok(SeedOutcome::Created(user))
}
