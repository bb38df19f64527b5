use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Path, Request, State};
use axum::http::{StatusCode, header};
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use vaultvoice::{
    AppendOutcome, AppendRequest, DailyStore, Error, NoteDocument, RecentNote, TagCount, TodoEntry,
};

#[derive(Clone)]
struct AppState {
    store: Arc<DailyStore>,
    api_key: Arc<String>,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

/// Typed store error carried out of a handler, mapped to a status code.
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            error!(error = %self.0, "request failed");
        }
        (
            status,
            Json(ErrorBody {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::InvalidDate(_)
        | Error::EmptyContent
        | Error::InvalidLineIndex { .. }
        | Error::NotATodoLine { .. } => StatusCode::BAD_REQUEST,
        Error::NotFound(_) => StatusCode::NOT_FOUND,
        Error::VaultNotFound(_) | Error::Io { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

pub async fn run(vault_path: PathBuf, bind: SocketAddr, api_key: String) -> anyhow::Result<()> {
    let store = DailyStore::open(&vault_path)?;
    info!(path = %vault_path.display(), "opened daily note store");

    let state = AppState {
        store: Arc::new(store),
        api_key: Arc::new(api_key),
    };

    let app = Router::new()
        .route("/api/daily/:date", get(read_note).post(append_entry))
        .route("/api/daily/:date/todos", get(list_todos))
        .route("/api/daily/:date/todos/:line/toggle", post(toggle_todo))
        .route("/api/tags", get(tag_counts))
        .route("/api/notes/recent", get(recent_notes))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ))
        .route("/api/health", get(health))
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!(%bind, "api listening");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn require_auth(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let header_value = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok());
    if authorized(header_value, &state.api_key) {
        next.run(req).await
    } else {
        (
            StatusCode::UNAUTHORIZED,
            Json(ErrorBody {
                error: "unauthorized".into(),
            }),
        )
            .into_response()
    }
}

fn authorized(header: Option<&str>, api_key: &str) -> bool {
    let Some(header) = header else {
        return false;
    };
    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
    !api_key.is_empty() && token == api_key
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    vault: bool,
    daily_dir: bool,
    vault_path: String,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let health = state.store.health();
    Json(HealthResponse {
        status: "ok",
        vault: health.vault,
        daily_dir: health.daily_dir,
        vault_path: state.store.root().display().to_string(),
    })
}

async fn read_note(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<NoteDocument>, ApiError> {
    Ok(Json(state.store.read(&date)?))
}

#[derive(Debug, Deserialize)]
struct AppendBody {
    #[serde(default)]
    content: String,
    #[serde(default)]
    tags: Vec<String>,
    section: Option<String>,
    priority: Option<String>,
    due: Option<String>,
    #[serde(default)]
    attachments: Vec<String>,
}

#[derive(Serialize)]
struct AppendResponse {
    success: bool,
    date: String,
    section: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    created: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    updated: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tags_added: Option<Vec<String>>,
}

async fn append_entry(
    State(state): State<AppState>,
    Path(date): Path<String>,
    Json(body): Json<AppendBody>,
) -> Result<Json<AppendResponse>, ApiError> {
    let section = body
        .section
        .clone()
        .unwrap_or_else(|| state.store.config().default_section.clone());
    let req = AppendRequest {
        date: date.clone(),
        content: body.content,
        tags: body.tags,
        section: body.section,
        priority: body.priority,
        due: body.due,
        attachments: body.attachments,
    };

    let response = match state.store.append(&req)? {
        AppendOutcome::Created => AppendResponse {
            success: true,
            date,
            section,
            created: Some(true),
            updated: None,
            tags_added: None,
        },
        AppendOutcome::Updated { tags_added } => AppendResponse {
            success: true,
            date,
            section,
            created: None,
            updated: Some(true),
            tags_added: Some(tags_added),
        },
    };
    Ok(Json(response))
}

#[derive(Serialize)]
struct TodosResponse {
    date: String,
    todos: Vec<TodoEntry>,
}

async fn list_todos(
    State(state): State<AppState>,
    Path(date): Path<String>,
) -> Result<Json<TodosResponse>, ApiError> {
    let todos = state.store.list_todos(&date)?;
    Ok(Json(TodosResponse { date, todos }))
}

#[derive(Serialize)]
struct ToggleResponse {
    date: String,
    toggled: usize,
}

async fn toggle_todo(
    State(state): State<AppState>,
    Path((date, line)): Path<(String, usize)>,
) -> Result<Json<ToggleResponse>, ApiError> {
    let toggled = state.store.toggle_todo(&date, line)?;
    Ok(Json(ToggleResponse { date, toggled }))
}

#[derive(Serialize)]
struct TagsResponse {
    tags: Vec<TagCount>,
}

async fn tag_counts(State(state): State<AppState>) -> Result<Json<TagsResponse>, ApiError> {
    Ok(Json(TagsResponse {
        tags: state.store.tag_counts()?,
    }))
}

#[derive(Serialize)]
struct RecentResponse {
    notes: Vec<RecentNote>,
}

async fn recent_notes(State(state): State<AppState>) -> Result<Json<RecentResponse>, ApiError> {
    Ok(Json(RecentResponse {
        notes: state.store.recent_notes()?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_tokens_are_checked_exactly() {
        assert!(authorized(Some("Bearer secret"), "secret"));
        assert!(authorized(Some("secret"), "secret"));
        assert!(authorized(Some("Bearer  secret "), "secret"));
        assert!(!authorized(Some("Bearer wrong"), "secret"));
        assert!(!authorized(None, "secret"));
        assert!(!authorized(Some("Bearer "), "secret"));
        assert!(!authorized(Some(""), ""));
    }

    #[test]
    fn store_errors_map_to_request_or_server_faults() {
        assert_eq!(
            status_for(&Error::InvalidDate("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(status_for(&Error::EmptyContent), StatusCode::BAD_REQUEST);
        assert_eq!(
            status_for(&Error::NotFound("2025-01-01".into())),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_for(&Error::NotATodoLine { index: 3 }),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&Error::Io {
                path: "/tmp/x".into(),
                source: std::io::Error::other("boom"),
            }),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
