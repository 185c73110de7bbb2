//! Web server module for T2S.
//!
//! Serves a single route: `GET /` answers with the static greeting and
//! records one access-log event per request. Everything else (routing, HTTP
//! parsing, connection handling) is delegated to axum.
//!
use axum::{Router, routing::get};
use tokio::net::TcpListener;

use crate::config::CONFIG;

/// Greeting returned by the home route
const WELCOME: &str = "Welcome to T2S!";

/// Build the application router
pub fn router() -> Router {
    Router::new().route("/", get(home))
}

/// Bind the configured address and serve until the process is stopped
pub async fn run() -> anyhow::Result<()> {
    serve(CONFIG.bind_addr()).await
}

/// Bind `addr` and serve the router; bind errors propagate to the caller
async fn serve(addr: String) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&addr).await?;
    tracing::info!("🌐 T2S web server listening on {addr}");

    axum::serve(listener, router()).await?;
    Ok(())
}

/// Home route: greet the caller and record the access
async fn home() -> &'static str {
    tracing::info!(target: "access", "Homepage accessed");
    WELCOME
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::RotatingFileWriter;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use http_body_util::BodyExt;
    use std::sync::Mutex;
    use tower::ServiceExt;
    use tracing::instrument::WithSubscriber;
    use tracing_subscriber::{Layer, filter::filter_fn, fmt, layer::SubscriberExt};

    fn get_root() -> Request<Body> {
        Request::builder().uri("/").body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn home_returns_greeting() {
        let response = router().oneshot(get_root()).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .unwrap()
            .to_str()
            .unwrap()
            .to_owned();
        assert!(content_type.starts_with("text/plain"));

        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"Welcome to T2S!");
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let request = Request::builder()
            .uri("/missing")
            .body(Body::empty())
            .unwrap();
        let response = router().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn each_request_appends_one_access_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t2s.log");
        let writer = RotatingFileWriter::open(&path, 10_000, 3).unwrap();

        let subscriber = tracing_subscriber::registry().with(
            fmt::layer()
                .with_ansi(false)
                .with_target(false)
                .with_writer(Mutex::new(writer))
                .with_filter(filter_fn(|meta| meta.target() == "access")),
        );

        async {
            for _ in 0..3 {
                let response = router().oneshot(get_root()).await.unwrap();
                assert_eq!(response.status(), StatusCode::OK);
            }
        }
        .with_subscriber(subscriber)
        .await;

        let contents = std::fs::read_to_string(&path).unwrap();
        let access_lines = contents
            .lines()
            .filter(|line| line.contains("Homepage accessed"))
            .count();
        assert_eq!(access_lines, 3);
        assert_eq!(contents.lines().count(), 3);
    }

    #[tokio::test]
    async fn bind_failure_surfaces_as_error() {
        let holder = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = holder.local_addr().unwrap();

        let result = serve(addr.to_string()).await;
        assert!(result.is_err());
    }
}
