//! Classes API endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;

use crate::db::{Class, CreateClassError, CreateClassRequest, NewClass, DEFAULT_CAPACITY};
use crate::AppState;

use super::error::ApiError;
use super::validation::{positive_integer, required_text};

pub const MSG_FETCH_FAILED: &str = "Failed to fetch classes";
pub const MSG_CREATE_FAILED: &str = "Failed to create class";
pub const MSG_REQUIRED: &str = "Name and level are required";
pub const MSG_DUPLICATE: &str = "Class with this name and level already exists";
pub const MSG_INVALID_CAPACITY: &str = "Capacity must be a positive integer";

/// Validate a CreateClassRequest and normalise it for insertion
fn validate_create_request(req: &CreateClassRequest) -> Result<NewClass, ApiError> {
    let name = required_text(req.name.as_deref());
    let level = positive_integer(req.level.as_ref()).ok().flatten();

    let (name, level) = match (name, level) {
        (Some(name), Some(level)) => (name, level),
        _ => return Err(ApiError::validation(MSG_REQUIRED)),
    };

    // A blank capacity is treated as left out
    let capacity = req.capacity.as_ref().filter(|c| !c.is_blank());
    let capacity = positive_integer(capacity)
        .map_err(|_| ApiError::validation(MSG_INVALID_CAPACITY))?
        .unwrap_or(DEFAULT_CAPACITY);

    Ok(NewClass {
        name: name.to_string(),
        level,
        capacity,
    })
}

/// List active classes ordered by level
pub async fn list_classes(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Class>>, ApiError> {
    let classes = Class::list_active(&state.db).await.map_err(|e| {
        tracing::error!("Failed to fetch classes: {}", e);
        ApiError::persistence(MSG_FETCH_FAILED)
    })?;

    Ok(Json(classes))
}

/// Create a new class
pub async fn create_class(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<CreateClassRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Class>), ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        tracing::debug!("Rejected class payload: {}", rejection);
        ApiError::validation(MSG_REQUIRED)
    })?;

    let new_class = validate_create_request(&req)?;

    // Fast path; the unique index still has the final word below
    let existing = Class::find_by_name_and_level(&state.db, &new_class.name, new_class.level)
        .await
        .map_err(|e| {
            tracing::error!("Failed to check for duplicate class: {}", e);
            ApiError::persistence(MSG_CREATE_FAILED)
        })?;
    if existing.is_some() {
        return Err(ApiError::conflict(MSG_DUPLICATE));
    }

    let class = Class::create(&state.db, &new_class)
        .await
        .map_err(|e| match e {
            CreateClassError::Duplicate => {
                tracing::warn!(
                    name = %new_class.name,
                    level = new_class.level,
                    "Duplicate class rejected by unique index"
                );
                ApiError::conflict(MSG_DUPLICATE)
            }
            CreateClassError::Database(e) => {
                tracing::error!("Failed to create class: {}", e);
                ApiError::persistence(MSG_CREATE_FAILED)
            }
        })?;

    tracing::info!(id = %class.id, name = %class.name, level = class.level, "Created class");

    Ok((StatusCode::CREATED, Json(class)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::create_router;
    use crate::config::Config;
    use crate::db::{test_pool, DbPool};
    use axum::{
        body::Body,
        http::{header, Method, Request},
        Router,
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    async fn test_app() -> (Router, DbPool) {
        let pool = test_pool().await;
        let state = Arc::new(AppState::new(Config::default(), pool.clone()));
        (create_router(state), pool)
    }

    async fn send(app: &Router, method: Method, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri("/api/classes");
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app
            .clone()
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    async fn count_classes(pool: &DbPool) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM classes")
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[test]
    fn test_validate_defaults_capacity() {
        let req = CreateClassRequest {
            name: Some(" Grade 4 ".to_string()),
            level: Some(crate::db::IntegerInput::Int(4)),
            capacity: None,
        };
        let new_class = validate_create_request(&req).unwrap();
        assert_eq!(
            new_class,
            NewClass {
                name: "Grade 4".to_string(),
                level: 4,
                capacity: DEFAULT_CAPACITY,
            }
        );
    }

    #[tokio::test]
    async fn test_create_with_string_numbers() {
        let (app, _pool) = test_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            Some(json!({ "name": "Grade 1", "level": "1", "capacity": "30" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["name"], "Grade 1");
        assert_eq!(body["level"], 1);
        assert_eq!(body["capacity"], 30);
        assert_eq!(body["isActive"], true);
        assert!(body["id"].is_string());
    }

    #[tokio::test]
    async fn test_duplicate_create_rejected() {
        let (app, pool) = test_app().await;
        let payload = json!({ "name": "Grade 1", "level": "1", "capacity": "30" });

        let (status, _) = send(&app, Method::POST, Some(payload.clone())).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, Method::POST, Some(payload)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": MSG_DUPLICATE }));
        assert_eq!(count_classes(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_check_is_case_insensitive() {
        let (app, pool) = test_app().await;

        let (status, _) = send(&app, Method::POST, Some(json!({ "name": "Grade 1", "level": 1 }))).await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = send(&app, Method::POST, Some(json!({ "name": "grade 1", "level": 1 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], MSG_DUPLICATE);
        assert_eq!(count_classes(&pool).await, 1);
    }

    #[tokio::test]
    async fn test_duplicate_of_inactive_class_rejected() {
        let (app, pool) = test_app().await;

        let (_, body) = send(&app, Method::POST, Some(json!({ "name": "Grade 2", "level": 2 }))).await;
        let id = body["id"].as_str().unwrap().to_string();
        Class::set_active(&pool, &id, false).await.unwrap();

        let (status, body) = send(&app, Method::POST, Some(json!({ "name": "Grade 2", "level": 2 }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], MSG_DUPLICATE);
    }

    #[tokio::test]
    async fn test_missing_fields_rejected() {
        let (app, pool) = test_app().await;

        for payload in [
            json!({ "name": "", "level": 1 }),
            json!({ "name": "   ", "level": 1 }),
            json!({ "name": "Grade 1" }),
            json!({ "level": 1 }),
            json!({ "name": "Grade 1", "level": null }),
            json!({ "name": "Grade 1", "level": "abc" }),
            json!({ "name": "Grade 1", "level": 0 }),
            json!({ "name": "Big", "level": 18446744073709551615u64 }),
            json!({ "name": "Huge", "level": 1e30 }),
            json!({ "name": "Str", "level": "18446744073709551615" }),
            json!({ "name": 12, "level": 1 }),
            json!([]),
        ] {
            let (status, body) = send(&app, Method::POST, Some(payload.clone())).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "payload: {}", payload);
            assert_eq!(body, json!({ "error": MSG_REQUIRED }), "payload: {}", payload);
        }

        assert_eq!(count_classes(&pool).await, 0);
    }

    #[tokio::test]
    async fn test_missing_body_rejected() {
        let (app, _pool) = test_app().await;
        let (status, body) = send(&app, Method::POST, None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], MSG_REQUIRED);
    }

    #[tokio::test]
    async fn test_invalid_capacity_rejected() {
        let (app, pool) = test_app().await;

        let (status, body) = send(
            &app,
            Method::POST,
            Some(json!({ "name": "Grade 1", "level": 1, "capacity": "lots" })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], MSG_INVALID_CAPACITY);
        assert_eq!(count_classes(&pool).await, 0);
    }

    #[tokio::test]
    async fn test_capacity_defaults_to_forty() {
        let (app, _pool) = test_app().await;
        let (status, body) = send(&app, Method::POST, Some(json!({ "name": "Grade 5", "level": 5 }))).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["capacity"], 40);

        for (level, capacity) in [(6, json!("")), (7, json!("  ")), (8, Value::Null)] {
            let (status, body) = send(
                &app,
                Method::POST,
                Some(json!({ "name": "Grade", "level": level, "capacity": capacity })),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED, "capacity: {}", capacity);
            assert_eq!(body["capacity"], 40);
        }
    }

    #[tokio::test]
    async fn test_created_class_appears_in_listing_by_level() {
        let (app, _pool) = test_app().await;

        for (name, level) in [("Grade 3", 3), ("Grade 1", 1), ("Grade 2", 2)] {
            let (status, _) = send(&app, Method::POST, Some(json!({ "name": name, "level": level }))).await;
            assert_eq!(status, StatusCode::CREATED);
        }

        let (status, body) = send(&app, Method::GET, None).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Grade 1", "Grade 2", "Grade 3"]);
    }

    #[tokio::test]
    async fn test_listing_hides_inactive_classes() {
        let (app, pool) = test_app().await;

        let (_, keep) = send(&app, Method::POST, Some(json!({ "name": "Grade 1", "level": 1 }))).await;
        for level in 2..5 {
            let (_, body) = send(
                &app,
                Method::POST,
                Some(json!({ "name": format!("Grade {}", level), "level": level })),
            )
            .await;
            Class::set_active(&pool, body["id"].as_str().unwrap(), false)
                .await
                .unwrap();
        }

        let (status, body) = send(&app, Method::GET, None).await;
        assert_eq!(status, StatusCode::OK);
        let listed = body.as_array().unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0]["id"], keep["id"]);
        assert!(listed.iter().all(|c| c["isActive"] == true));
    }

    #[tokio::test]
    async fn test_persistence_failure_is_opaque() {
        let (app, pool) = test_app().await;
        sqlx::query("DROP TABLE classes").execute(&pool).await.unwrap();

        let (status, body) = send(&app, Method::GET, None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": MSG_FETCH_FAILED }));

        let (status, body) = send(&app, Method::POST, Some(json!({ "name": "Grade 1", "level": 1 }))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": MSG_CREATE_FAILED }));
    }
}
