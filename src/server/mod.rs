// HTTP server - Axum JSON API for the TuneDrop UI
// Serves the catalog, AI playlists and simulated downloads, plus the built
// UI bundle when one is configured.

pub mod error;
pub mod routes;

use axum::{
    extract::Request,
    http::{HeaderValue, Method},
    middleware::{self, Next},
    response::Response,
    Router,
};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};

use crate::catalog::Catalog;
use crate::downloads::DownloadQueue;
use crate::playlist::PlaylistService;

/// Shared state for all handlers
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub playlists: PlaylistService,
    pub downloads: Arc<DownloadQueue>,
    /// Whether an API key was found at startup
    pub ai_enabled: bool,
}

/// Holds the running server's shutdown mechanism
pub struct RunningServer {
    pub shutdown_tx: oneshot::Sender<()>,
    pub addr: SocketAddr,
    pub handle: tokio::task::JoinHandle<()>,
}

/// Request logging middleware
async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let response = next.run(request).await;
    log::info!("{} {} -> {}", method, path, response.status().as_u16());
    response
}

/// Build the full router: API routes, optional static UI, CORS and logging
pub fn build_router(state: Arc<AppState>, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([axum::http::header::CONTENT_TYPE])
        .allow_origin(HeaderValue::from_static("*"));

    let api_routes = routes::api_routes().with_state(state);

    let app = match static_dir.filter(|p| p.exists()) {
        Some(dist_path) => {
            log::info!("[server] Serving UI from {:?}", dist_path);
            let index_html = dist_path.join("index.html");
            api_routes.fallback_service(ServeDir::new(&dist_path).fallback(ServeFile::new(index_html)))
        }
        None => {
            log::info!("[server] No UI bundle found, API-only mode");
            api_routes
        }
    };

    app.layer(middleware::from_fn(log_requests)).layer(cors)
}

/// Start the HTTP server. Returns the running server handle (for shutdown)
/// or an error.
pub async fn start_server(
    bind_addr: &str,
    port: u16,
    state: Arc<AppState>,
    static_dir: Option<PathBuf>,
) -> Result<RunningServer, std::io::Error> {
    let app = build_router(state, static_dir);

    let listener = try_bind(bind_addr, port).await?;
    let actual_addr = listener.local_addr()?;
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    log::info!("[server] Listening on http://{}", actual_addr);

    let handle = tokio::spawn(async move {
        let result = axum::serve(listener, app)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
                log::info!("[server] Shutdown signal received, draining connections...");
            })
            .await;
        if let Err(e) = result {
            log::error!("[server] Server error: {}", e);
        }
        log::info!("[server] Server stopped");
    });

    Ok(RunningServer {
        shutdown_tx,
        addr: actual_addr,
        handle,
    })
}

/// Bind the given port, falling back to the next ten ports and then to an
/// OS-assigned one
async fn try_bind(bind_addr: &str, preferred_port: u16) -> Result<TcpListener, std::io::Error> {
    match TcpListener::bind((bind_addr, preferred_port)).await {
        Ok(listener) => return Ok(listener),
        Err(e) => log::debug!("[server] Port {} unavailable: {}", preferred_port, e),
    }

    for offset in 1..=10u16 {
        let port = preferred_port.saturating_add(offset);
        if let Ok(listener) = TcpListener::bind((bind_addr, port)).await {
            log::warn!("[server] Port {} unavailable, using {}", preferred_port, port);
            return Ok(listener);
        }
    }

    let listener = TcpListener::bind((bind_addr, 0u16)).await?;
    log::warn!(
        "[server] All preferred ports unavailable, OS assigned port {}",
        listener.local_addr()?.port()
    );
    Ok(listener)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{GenerationBackend, GenerationClient, GenerationError, GenerationRequest};
    use crate::playlist::GENERATION_FAILED_MESSAGE;
    use async_trait::async_trait;
    use axum::body::{to_bytes, Body};
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct StubBackend(Result<&'static str, &'static str>);

    #[async_trait]
    impl GenerationBackend for StubBackend {
        async fn complete(&self, _request: &GenerationRequest) -> Result<String, GenerationError> {
            self.0
                .map(str::to_string)
                .map_err(|e| GenerationError::Unavailable(e.to_string()))
        }
    }

    fn app(reply: Result<&'static str, &'static str>) -> Router {
        let catalog = Arc::new(Catalog::demo());
        let client = GenerationClient::new(Arc::new(StubBackend(reply)));
        let state = Arc::new(AppState {
            playlists: PlaylistService::new(catalog.clone(), client),
            catalog,
            downloads: Arc::new(DownloadQueue::new(20.0)),
            ai_enabled: true,
        });
        build_router(state, None)
    }

    async fn send(app: Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = axum::http::Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_status() {
        let (status, body) = send(app(Ok("{}")), "GET", "/api/status", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["name"], "TuneDrop");
        assert_eq!(body["track_count"], 12);
    }

    #[tokio::test]
    async fn test_search_and_lookup() {
        let (status, body) = send(app(Ok("{}")), "GET", "/api/tracks/search?q=owl", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body[0]["title"], "Jazz Club");

        let (status, body) = send(app(Ok("{}")), "GET", "/api/tracks/search", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 12);

        let (status, body) = send(app(Ok("{}")), "GET", "/api/tracks/7", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["previewUrl"], "https://cdn.pixabay.com/audio/2023/11/17/audio_b29c9b986f.mp3");

        let (status, _) = send(app(Ok("{}")), "GET", "/api/tracks/404", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_playlist_success_drops_unknown_titles() {
        let app = app(Ok(r#"{"playlist": ["Future Funk", "Nonexistent Song"]}"#));
        let (status, body) = send(
            app,
            "POST",
            "/api/playlist",
            Some(json!({"seedSong": "Daft Punk", "moodPrompt": "uplifting summer drive"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        let playlist = body["playlist"].as_array().unwrap();
        assert_eq!(playlist.len(), 1);
        assert_eq!(playlist[0]["title"], "Future Funk");
    }

    #[tokio::test]
    async fn test_playlist_empty_is_ok() {
        let (status, body) = send(
            app(Ok(r#"{"playlist": []}"#)),
            "POST",
            "/api/playlist",
            Some(json!({"seedSong": "Daft Punk", "moodPrompt": "uplifting summer drive"})),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"playlist": []}));
    }

    #[tokio::test]
    async fn test_playlist_invalid_input() {
        let (status, body) = send(
            app(Ok(r#"{"playlist": []}"#)),
            "POST",
            "/api/playlist",
            Some(json!({"seedSong": "D", "moodPrompt": "uplifting summer drive"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Please enter a song or artist.");
    }

    async fn post_raw(
        app: Router,
        uri: &str,
        content_type: Option<&str>,
        body: &str,
    ) -> (StatusCode, Value) {
        let mut builder = axum::http::Request::builder().method("POST").uri(uri);
        if let Some(content_type) = content_type {
            builder = builder.header("content-type", content_type);
        }
        let response = app
            .oneshot(builder.body(Body::from(body.to_string())).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_playlist_rejected_bodies_use_error_shape() {
        let cases = [
            (
                Some("application/json"),
                r#"{"seedSong": 5, "moodPrompt": "uplifting summer drive"}"#,
            ),
            (None, r#"{"seedSong": "Daft Punk", "moodPrompt": "uplifting summer drive"}"#),
            (Some("application/json"), "not json"),
        ];

        for (content_type, body) in cases {
            let (status, body) =
                post_raw(app(Ok(r#"{"playlist": []}"#)), "/api/playlist", content_type, body).await;
            assert_eq!(status, StatusCode::BAD_REQUEST, "body: {}", body);
            assert!(body["error"].is_string(), "body: {}", body);
            assert!(body.get("playlist").is_none());
        }
    }

    #[tokio::test]
    async fn test_playlist_missing_field_is_validation_error() {
        let (status, body) = post_raw(
            app(Ok(r#"{"playlist": []}"#)),
            "/api/playlist",
            Some("application/json"),
            r#"{"moodPrompt": "uplifting summer drive"}"#,
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Please enter a song or artist.");
    }

    #[tokio::test]
    async fn test_download_rejected_body_uses_error_shape() {
        let (status, body) = post_raw(
            app(Ok("{}")),
            "/api/downloads",
            Some("application/json"),
            r#"{"trackId": 5}"#,
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].is_string());
    }

    #[tokio::test]
    async fn test_playlist_backend_failure_hides_cause() {
        let (status, body) = send(
            app(Err("upstream 529 overloaded")),
            "POST",
            "/api/playlist",
            Some(json!({"seedSong": "Daft Punk", "moodPrompt": "uplifting summer drive"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body, json!({"error": GENERATION_FAILED_MESSAGE}));
    }

    #[tokio::test]
    async fn test_download_lifecycle() {
        let app = app(Ok("{}"));

        let (status, body) =
            send(app.clone(), "POST", "/api/downloads", Some(json!({"trackId": "5"}))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "downloading");
        assert_eq!(body["progress"], 0.0);

        let (status, body) =
            send(app.clone(), "POST", "/api/downloads", Some(json!({"trackId": "5"}))).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "\"Morning Mist\" is already in your download queue.");

        let (status, body) = send(app.clone(), "POST", "/api/downloads/5/pause", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "paused");

        let (status, body) = send(app.clone(), "GET", "/api/downloads", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.as_array().unwrap().len(), 1);

        let (status, _) =
            send(app.clone(), "POST", "/api/downloads", Some(json!({"trackId": "nope"}))).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(app, "POST", "/api/downloads/6/resume", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_try_bind_falls_back_when_port_taken() {
        let taken = TcpListener::bind(("127.0.0.1", 0u16)).await.unwrap();
        let port = taken.local_addr().unwrap().port();

        let listener = try_bind("127.0.0.1", port).await.unwrap();
        assert_ne!(listener.local_addr().unwrap().port(), port);
    }
}
