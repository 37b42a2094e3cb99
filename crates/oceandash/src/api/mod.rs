//! HTTP surface of oceandash.
//!
//! | Method | Path | |
//! |---|---|---|
//! | GET | `/` | status message |
//! | GET | `/test` | store diagnostics |
//! | POST, GET | `/api/vessels` | create, list |
//! | POST, GET | `/api/missions` | create, list |
//! | POST, GET | `/api/logs` | create, list |
//! | POST, GET | `/api/telemetry` | create, list |
//! | POST | `/api/weather` | sea-state lookup |

mod error;
mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

pub use error::{ApiError, ApiResult};
pub use handlers::{Created, ListParams, ROOT_MESSAGE};

use crate::config::{CorsConfig, ListLimits};
use crate::gateway::PersistenceGateway;
use crate::model::{CrewLog, Mission, Telemetry, Vessel};

/// Shared state handed to every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Access to the document store.
    pub gateway: PersistenceGateway,
    /// Default list sizes.
    pub limits: ListLimits,
}

impl AppState {
    /// Create state with the given gateway and limits.
    #[must_use]
    pub fn new(gateway: PersistenceGateway, limits: ListLimits) -> Self {
        Self { gateway, limits }
    }
}

/// Build the application router.
#[must_use]
pub fn router(state: AppState, cors: &CorsConfig) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/test", get(handlers::diagnostics))
        .route(
            "/api/vessels",
            post(handlers::create::<Vessel>).get(handlers::list::<Vessel>),
        )
        .route(
            "/api/missions",
            post(handlers::create::<Mission>).get(handlers::list::<Mission>),
        )
        .route(
            "/api/logs",
            post(handlers::create::<CrewLog>).get(handlers::list::<CrewLog>),
        )
        .route(
            "/api/telemetry",
            post(handlers::create::<Telemetry>).get(handlers::list::<Telemetry>),
        )
        .route("/api/weather", post(handlers::weather))
        .layer(cors_layer(cors))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Any origin, method and header is accepted. Wildcards cannot be combined
/// with credentials, so the request's own values are echoed back.
fn cors_layer(config: &CorsConfig) -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(config.allow_credentials)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::DocumentStore;
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use tower::ServiceExt;

    fn app() -> Router {
        let store = DocumentStore::open_in_memory("oceandash").unwrap();
        let state = AppState::new(
            PersistenceGateway::from_store(store),
            ListLimits::default(),
        );
        router(state, &CorsConfig::default())
    }

    #[tokio::test]
    async fn test_root_route() {
        let response = app()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = app()
            .oneshot(Request::get("/api/whales").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_preflight_mirrors_origin_with_credentials() {
        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/api/vessels")
            .header(header::ORIGIN, "https://dashboard.example.org")
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();
        let headers = response.headers();
        assert_eq!(
            headers[header::ACCESS_CONTROL_ALLOW_ORIGIN],
            "https://dashboard.example.org"
        );
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_METHODS], "POST");
    }
}
