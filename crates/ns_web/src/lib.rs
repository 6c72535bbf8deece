use axum::{
    routing::{get, post},
    Router,
};
use std::future::Future;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

pub mod handlers;
pub mod render;
pub mod session;
pub mod state;

pub use session::{SessionRegistry, SESSION_COOKIE};
pub use state::{spawn_session_evictor, Action, AppState};

pub fn create_app(state: AppState) -> Router {
    let api = Router::new()
        .route("/topics", get(handlers::api_topics))
        .route("/session", get(handlers::api_session))
        .route("/fetch", post(handlers::api_fetch))
        .route("/more", post(handlers::api_more))
        .layer(CorsLayer::permissive());

    Router::new()
        .route("/", get(handlers::index))
        .route("/fetch", post(handlers::fetch_form))
        .route("/more", post(handlers::more_form))
        .route("/health", get(handlers::health))
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(Arc::new(state))
}

/// Serves the dashboard on `bind` until `shutdown` resolves.
pub async fn serve<F>(state: AppState, bind: &str, shutdown: F) -> ns_core::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let listener = tokio::net::TcpListener::bind(bind).await?;
    info!("🌐 Dashboard listening on http://{}", listener.local_addr()?);
    axum::serve(listener, create_app(state))
        .with_graceful_shutdown(shutdown)
        .await?;
    info!("👋 Dashboard stopped");
    Ok(())
}

pub mod prelude {
    pub use crate::{create_app, serve, AppState};
    pub use ns_core::{Error, Result};
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request, StatusCode};
    use ns_core::config::Config;
    use ns_core::Topic;
    use ns_inference::LexiconModel;
    use ns_scrapers::StaticSource;
    use ns_session::{Dashboard, DashboardView};
    use std::time::Duration;
    use tower::ServiceExt;

    fn app() -> Router {
        let dashboard = Dashboard::from_config(
            Arc::new(StaticSource::demo()),
            Arc::new(LexiconModel::new()),
            &Config::default(),
        );
        create_app(AppState::new(dashboard, Duration::from_secs(60)))
    }

    fn cookie_of(response: &axum::response::Response) -> String {
        let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        set_cookie.split(';').next().unwrap().to_string()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_health() {
        let response = app()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "OK");
    }

    #[tokio::test]
    async fn test_index_starts_a_session() {
        let response = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(cookie_of(&response).starts_with("ns_session="));
        let html = body_string(response).await;
        assert!(html.contains("🔍 Fetch News"));
        assert!(!html.contains("📥 Load More"));
    }

    #[tokio::test]
    async fn test_fetch_form_redirects_and_renders() {
        let app = app();
        let response = app
            .clone()
            .oneshot(
                Request::post("/fetch")
                    .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                    .body(Body::from("topic=cryptocurrency"))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/");
        let cookie = cookie_of(&response);

        let response = app
            .oneshot(
                Request::get("/")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert!(response.headers().get(header::SET_COOKIE).is_none());
        let html = body_string(response).await;
        assert!(html.contains("1. "));
        assert!(html.contains("10. "));
        assert!(html.contains("📥 Load More"));
        assert!(html.contains(r#"<option value="cryptocurrency" selected>"#));
    }

    #[tokio::test]
    async fn test_api_fetch_and_more() {
        let app = app();
        let response = app
            .clone()
            .oneshot(
                Request::post("/api/fetch")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"topic": "IPO"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let cookie = cookie_of(&response);
        let view: DashboardView = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(view.topic, Some(Topic::Ipo));
        assert_eq!(view.cards.len(), 10);

        let response = app
            .oneshot(
                Request::post("/api/more")
                    .header(header::COOKIE, cookie)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        let view: DashboardView = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(view.cards.len(), 20);
        let numbers: Vec<usize> = view.cards.iter().map(|c| c.number).collect();
        assert_eq!(numbers, (1..=20).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn test_api_more_without_topic() {
        let response = app()
            .oneshot(Request::post("/api/more").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let view: DashboardView = serde_json::from_str(&body_string(response).await).unwrap();
        assert!(view.cards.is_empty());
        assert_eq!(view.notice, Some(ns_session::Notice::NoActiveTopic));
    }

    #[tokio::test]
    async fn test_unknown_topic_is_rejected() {
        let response = app()
            .oneshot(
                Request::post("/api/fetch")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"topic": "weather"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_api_topics() {
        let response = app()
            .oneshot(Request::get("/api/topics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let topics: Vec<handlers::TopicInfo> = serde_json::from_str(&body_string(response).await).unwrap();
        assert_eq!(topics.len(), 8);
        assert_eq!(topics[0].slug, "stock-market");
        assert_eq!(topics[6].name, "IPO");
    }
}
