//! Class (school section) models and queries.

use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use thiserror::Error;
use uuid::Uuid;

/// Capacity assigned when a create request leaves it out
pub const DEFAULT_CAPACITY: i64 = 40;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    pub id: String,
    pub name: String,
    pub level: i64,
    pub capacity: i64,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
}

/// Integer field as sent by forms and JS clients: a JSON number or a numeric string
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum IntegerInput {
    Int(i64),
    Float(f64),
    Text(String),
}

impl IntegerInput {
    /// Whole-number value, if the input represents one
    pub fn to_i64(&self) -> Option<i64> {
        match self {
            IntegerInput::Int(n) => Some(*n),
            // `i64::MAX as f64` rounds up to 2^63, so the upper bound is exclusive
            IntegerInput::Float(f)
                if f.fract() == 0.0 && *f >= i64::MIN as f64 && *f < i64::MAX as f64 =>
            {
                Some(*f as i64)
            }
            IntegerInput::Float(_) => None,
            IntegerInput::Text(s) => s.trim().parse().ok(),
        }
    }

    /// Empty or whitespace-only text, as sent by an untouched form field
    pub fn is_blank(&self) -> bool {
        matches!(self, IntegerInput::Text(s) if s.trim().is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct CreateClassRequest {
    pub name: Option<String>,
    pub level: Option<IntegerInput>,
    pub capacity: Option<IntegerInput>,
}

/// A validated class ready to be inserted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClass {
    pub name: String,
    pub level: i64,
    pub capacity: i64,
}

#[derive(Error, Debug)]
pub enum CreateClassError {
    #[error("class with this name and level already exists")]
    Duplicate,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl Class {
    /// Active classes ordered by level, then name
    pub async fn list_active(db: &SqlitePool) -> Result<Vec<Class>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT id, name, level, capacity, is_active, created_at, updated_at
            FROM classes
            WHERE is_active = 1
            ORDER BY level ASC, name ASC
            "#,
        )
        .fetch_all(db)
        .await
    }

    pub async fn get(db: &SqlitePool, id: &str) -> Result<Option<Class>, sqlx::Error> {
        sqlx::query_as("SELECT * FROM classes WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Look up a class by case-insensitive name and exact level, active or not
    pub async fn find_by_name_and_level(
        db: &SqlitePool,
        name: &str,
        level: i64,
    ) -> Result<Option<Class>, sqlx::Error> {
        sqlx::query_as(
            r#"
            SELECT id, name, level, capacity, is_active, created_at, updated_at
            FROM classes
            WHERE LOWER(name) = LOWER(?) AND level = ?
            LIMIT 1
            "#,
        )
        .bind(name)
        .bind(level)
        .fetch_optional(db)
        .await
    }

    /// Insert an active class.
    ///
    /// The unique index on `(name COLLATE NOCASE, level)` decides duplicates;
    /// a violation comes back as [`CreateClassError::Duplicate`].
    pub async fn create(db: &SqlitePool, new: &NewClass) -> Result<Class, CreateClassError> {
        let id = Uuid::new_v4().to_string();
        let now = chrono::Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO classes (id, name, level, capacity, is_active, created_at, updated_at)
            VALUES (?, ?, ?, ?, 1, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&new.name)
        .bind(new.level)
        .bind(new.capacity)
        .bind(&now)
        .bind(&now)
        .execute(db)
        .await
        .map_err(|e| match &e {
            sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
                CreateClassError::Duplicate
            }
            _ => CreateClassError::Database(e),
        })?;

        let class = Self::get(db, &id).await?.ok_or(sqlx::Error::RowNotFound)?;
        Ok(class)
    }

    /// Toggle visibility in listings. Classes are never deleted.
    pub async fn set_active(db: &SqlitePool, id: &str, active: bool) -> Result<bool, sqlx::Error> {
        let now = chrono::Utc::now().to_rfc3339();
        let result = sqlx::query("UPDATE classes SET is_active = ?, updated_at = ? WHERE id = ?")
            .bind(active)
            .bind(&now)
            .bind(id)
            .execute(db)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
