use std::sync::Arc;

use axum::{
    extract::{Form, State},
    http::{header::SET_COOKIE, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use ns_core::{Error, Topic};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::render;
use crate::session::{session_cookie, session_id, SharedSlot};
use crate::state::{Action, AppState};

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Core(#[from] Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            ApiError::Core(Error::UnknownTopic(_)) => StatusCode::BAD_REQUEST,
            ApiError::Core(Error::NoActiveTopic) => StatusCode::CONFLICT,
            ApiError::Core(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        warn!("⚠️ Rejected request: {}", self);
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Debug, Deserialize)]
pub struct TopicForm {
    pub topic: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TopicInfo {
    pub slug: String,
    pub name: String,
}

struct Session {
    id: Uuid,
    slot: SharedSlot,
    created: bool,
}

impl Session {
    async fn open(state: &AppState, headers: &HeaderMap) -> Self {
        let (id, slot, created) = state.sessions.open(session_id(headers)).await;
        Self { id, slot, created }
    }

    /// Attaches the session cookie when this request started the session.
    fn respond(&self, body: impl IntoResponse) -> Response {
        let mut response = body.into_response();
        if self.created {
            if let Some(cookie) = session_cookie(self.id) {
                response.headers_mut().insert(SET_COOKIE, cookie);
            }
        }
        response
    }
}

pub async fn index(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let session = Session::open(&state, &headers).await;
    let view = {
        let mut slot = session.slot.lock().await;
        slot.touch();
        slot.state.view()
    };
    session.respond(Html(render::page(&view)))
}

pub async fn fetch_form(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Form(form): Form<TopicForm>,
) -> Result<Response, ApiError> {
    let topic: Topic = form.topic.parse()?;
    let session = Session::open(&state, &headers).await;
    debug!("🔍 Fetch {} for session {}", topic, session.id);
    state.run(session.slot.clone(), Action::Fetch(topic)).await;
    Ok(session.respond(Redirect::to("/")))
}

pub async fn more_form(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let session = Session::open(&state, &headers).await;
    debug!("📥 Load more for session {}", session.id);
    state.run(session.slot.clone(), Action::LoadMore).await;
    session.respond(Redirect::to("/"))
}

pub async fn api_topics() -> Json<Vec<TopicInfo>> {
    Json(
        Topic::ALL
            .iter()
            .map(|topic| TopicInfo {
                slug: topic.slug().to_string(),
                name: topic.display_name().to_string(),
            })
            .collect(),
    )
}

pub async fn api_session(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let session = Session::open(&state, &headers).await;
    let view = session.slot.lock().await.state.view();
    session.respond(Json(view))
}

pub async fn api_fetch(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<TopicForm>,
) -> Result<Response, ApiError> {
    let topic: Topic = request.topic.parse()?;
    let session = Session::open(&state, &headers).await;
    let view = state.run(session.slot.clone(), Action::Fetch(topic)).await;
    Ok(session.respond(Json(view)))
}

pub async fn api_more(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let session = Session::open(&state, &headers).await;
    let view = state.run(session.slot.clone(), Action::LoadMore).await;
    session.respond(Json(view))
}

pub async fn health() -> &'static str {
    "OK"
}
