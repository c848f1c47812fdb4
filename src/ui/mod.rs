// Server-rendered pages. Uses Askama templates; every page renders inside
// the layout shell (session context outside theme context).

mod context;
mod templates;

use askama::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use axum_extra::extract::{
    cookie::{Cookie, SameSite},
    CookieJar,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::db::Class;
use crate::AppState;

pub use context::*;
pub use templates::*;

// Helper to render templates and handle errors
fn render_template<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(home))
        .route("/classes", get(classes_page))
        .route("/theme", post(set_theme))
        .layer(TraceLayer::new_for_http())
}

async fn home(shell: Shell) -> Response {
    render_template(HomeTemplate {
        shell,
        themes: Theme::all(),
    })
}

async fn classes_page(State(state): State<Arc<AppState>>, shell: Shell) -> Response {
    let (classes, error) = match Class::list_active(&state.db).await {
        Ok(classes) => (classes, None),
        Err(e) => {
            tracing::error!("Failed to fetch classes for page: {}", e);
            (Vec::new(), Some("Failed to fetch classes".to_string()))
        }
    };

    render_template(ClassesTemplate {
        shell,
        classes,
        error,
    })
}

#[derive(Deserialize)]
struct ThemeForm {
    theme: Theme,
}

async fn set_theme(jar: CookieJar, Form(form): Form<ThemeForm>) -> impl IntoResponse {
    let jar = jar.add(
        Cookie::build((THEME_COOKIE, form.theme.as_str()))
            .path("/")
            .same_site(SameSite::Lax)
            .build(),
    );
    (jar, Redirect::to("/"))
}
