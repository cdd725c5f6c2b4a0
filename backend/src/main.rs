use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{header, HeaderValue, Method, Request, Response};
use axum::routing::{get, post};
use axum::{middleware, Router};
use once_cell::sync::Lazy;
use tokio::net::TcpListener;
use tower::Layer;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::{error, info, warn};

use shared::constants::{
    HEALTH_CHECK_ENDPOINT, MODES_ENDPOINT, NOTIFY_ENDPOINT, NOTIFY_STATUS_ENDPOINT, TOTP_SETUP_ENDPOINT,
};

use crate::config::{NotifierConfig, ServerConfig};
use crate::services::notify_service::{DiscordWebhook, WebhookNotifier};

mod config;
mod error;
mod handlers;
mod logging;
mod services;

#[derive(Clone)]
pub struct AppState {
    notifier: Arc<WebhookNotifier<DiscordWebhook>>,
    trust_proxy_headers: bool,
}

// Time before we log the same IP again (in seconds)
const IP_LOG_EXPIRY: u64 = 3600;
// Upper bound on remembered addresses
const MAX_TRACKED_IPS: usize = 10_000;

/// Remembers when each client address was last logged.
#[derive(Debug, Default)]
struct VisitLog {
    seen: HashMap<String, u64>,
}

impl VisitLog {
    fn should_log(&mut self, ip: &str, now: u64) -> bool {
        if let Some(last_time) = self.seen.get(ip) {
            if now.saturating_sub(*last_time) <= IP_LOG_EXPIRY {
                return false;
            }
        } else if self.seen.len() >= MAX_TRACKED_IPS {
            self.seen
                .retain(|_, last_time| now.saturating_sub(*last_time) <= IP_LOG_EXPIRY);
            // Still full of recent visitors: stay quiet rather than grow
            if self.seen.len() >= MAX_TRACKED_IPS {
                return false;
            }
        }

        self.seen.insert(ip.to_string(), now);
        true
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.seen.len()
    }
}

static LOGGED_IPS: Lazy<Mutex<VisitLog>> = Lazy::new(|| Mutex::new(VisitLog::default()));

/// Proxy headers are client-controlled, so they are only read when the
/// deployment says a trusted proxy sets them.
fn client_ip(request: &Request<Body>, trust_proxy_headers: bool) -> String {
    if trust_proxy_headers {
        let forwarded = ["cf-connecting-ip", "x-forwarded-for", "x-real-ip"]
            .iter()
            .find_map(|name| request.headers().get(*name))
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.split(',').next())
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        if let Some(ip) = forwarded {
            return ip;
        }
    }

    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(peer)| peer.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

async fn log_visit_middleware(
    State(state): State<AppState>,
    request: Request<Body>,
    next: middleware::Next,
) -> Response<Body> {
    let ip = client_ip(&request, state.trust_proxy_headers);
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::from_secs(0))
        .as_secs();

    let should_log = match LOGGED_IPS.lock() {
        Ok(mut logged_ips) => logged_ips.should_log(&ip, now),
        Err(_) => false,
    };

    if should_log {
        info!("👋 Website visit: {} {}", ip, request.uri().path());
    }

    next.run(request).await
}

pub fn create_router(state: AppState, frontend_dist: &Path) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(vec![
            HeaderValue::from_static("http://127.0.0.1:8080"),
            HeaderValue::from_static("http://127.0.0.1:3000"),
        ])
        .allow_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(vec![header::CONTENT_TYPE]);

    // Unknown paths get index.html so the single page can take over.
    let static_service = ServeDir::new(frontend_dist).fallback(ServeFile::new(frontend_dist.join("index.html")));
    let cache_control_layer =
        SetResponseHeaderLayer::if_not_present(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));

    let api_routes = Router::new()
        .route(HEALTH_CHECK_ENDPOINT, get(handlers::health_check))
        .route(NOTIFY_STATUS_ENDPOINT, get(handlers::notify_status))
        .route(MODES_ENDPOINT, get(handlers::list_modes))
        .route(NOTIFY_ENDPOINT, post(handlers::notify))
        .layer(cors);

    Router::new()
        .merge(api_routes)
        .fallback_service(cache_control_layer.layer(static_service))
        .layer(middleware::from_fn_with_state(state.clone(), log_visit_middleware))
        .with_state(state)
}

/// Authenticator setup, served on its own loopback listener.
pub fn create_setup_router(state: AppState) -> Router {
    Router::new()
        .route(TOTP_SETUP_ENDPOINT, get(handlers::totp_setup))
        .with_state(state)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    logging::setup();

    let server_config = ServerConfig::from_env()?;
    let notifier = WebhookNotifier::from_config(&NotifierConfig::from_env());
    if notifier.is_enabled() {
        info!("Discord integration enabled");
    }

    let state = AppState {
        notifier: Arc::new(notifier),
        trust_proxy_headers: server_config.trust_proxy_headers,
    };

    if let Some(setup_addr) = server_config.totp_setup_addr {
        if state.notifier.is_enabled() {
            let setup_app = create_setup_router(state.clone());
            let setup_listener = TcpListener::bind(setup_addr).await?;
            info!("Authenticator setup at http://{}{}", setup_addr, TOTP_SETUP_ENDPOINT);
            tokio::spawn(async move {
                let served = axum::serve(
                    setup_listener,
                    setup_app.into_make_service_with_connect_info::<SocketAddr>(),
                )
                .await;
                if let Err(e) = served {
                    error!("Setup listener stopped: {}", e);
                }
            });
        } else {
            warn!("TOTP_SETUP_ADDR is set but the Discord integration is disabled");
        }
    }

    let app = create_router(state, &server_config.frontend_dist);

    info!("listening on {}", server_config.bind_addr);
    let listener = TcpListener::bind(server_config.bind_addr).await?;
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>()).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;
    use shared::totp::TotpVerifier;
    use tower::ServiceExt;

    const SECRET: &str = "GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ";

    fn disabled_state() -> AppState {
        AppState {
            notifier: Arc::new(WebhookNotifier::disabled()),
            trust_proxy_headers: false,
        }
    }

    fn enabled_state() -> AppState {
        let verifier = TotpVerifier::from_base32(SECRET).unwrap();
        // Port 9 is discard; these tests never get past the code check.
        let sink = DiscordWebhook::new("http://127.0.0.1:9/webhook".to_string());
        AppState {
            notifier: Arc::new(WebhookNotifier::new(Some(verifier), Some(sink))),
            trust_proxy_headers: false,
        }
    }

    fn disabled_app() -> Router {
        create_router(disabled_state(), Path::new("does-not-exist"))
    }

    fn enabled_app() -> Router {
        create_router(enabled_state(), Path::new("does-not-exist"))
    }

    async fn text_body(response: Response<Body>) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_from(uri: &str, peer: [u8; 4]) -> Request<Body> {
        let mut request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        request
            .extensions_mut()
            .insert(ConnectInfo(SocketAddr::from((peer, 40000))));
        request
    }

    async fn json_body(response: Response<Body>) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = disabled_app()
            .oneshot(get_from(HEALTH_CHECK_ENDPOINT, [127, 0, 0, 1]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn test_status_reports_disabled() {
        let response = disabled_app()
            .oneshot(get_from(NOTIFY_STATUS_ENDPOINT, [127, 0, 0, 1]))
            .await
            .unwrap();
        assert_eq!(json_body(response).await, serde_json::json!({ "enabled": false }));

        let response = enabled_app()
            .oneshot(get_from(NOTIFY_STATUS_ENDPOINT, [127, 0, 0, 1]))
            .await
            .unwrap();
        assert_eq!(json_body(response).await, serde_json::json!({ "enabled": true }));
    }

    #[tokio::test]
    async fn test_modes_listing() {
        let response = disabled_app()
            .oneshot(get_from(MODES_ENDPOINT, [127, 0, 0, 1]))
            .await
            .unwrap();
        let body = json_body(response).await;
        assert_eq!(body.as_array().unwrap().len(), 3);
        assert_eq!(body[2]["mode"], "solos");
    }

    #[tokio::test]
    async fn test_notify_disabled_wins_over_bad_code() {
        let body = serde_json::json!({ "mode": "teams", "item": "Nex", "code": "nope" });
        let response = disabled_app().oneshot(post_json(NOTIFY_ENDPOINT, body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({ "error": "Discord integration is disabled" })
        );
    }

    #[tokio::test]
    async fn test_notify_rejects_invalid_code() {
        let body = serde_json::json!({ "mode": "teams", "item": "Nex", "code": "12345" });
        let response = enabled_app().oneshot(post_json(NOTIFY_ENDPOINT, body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(json_body(response).await, serde_json::json!({ "error": "Invalid code" }));
    }

    #[tokio::test]
    async fn test_notify_unknown_mode_and_item() {
        let body = serde_json::json!({ "mode": "raids", "item": "Nex", "code": "123456" });
        let response = enabled_app().oneshot(post_json(NOTIFY_ENDPOINT, body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        // Zulrah is only on the solo wheel.
        let body = serde_json::json!({ "mode": "teams", "item": "Zulrah", "code": "123456" });
        let response = enabled_app().oneshot(post_json(NOTIFY_ENDPOINT, body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await, serde_json::json!({ "error": "Unknown wheel item" }));
    }

    #[tokio::test]
    async fn test_notify_disabled_wins_over_unknown_item() {
        let body = serde_json::json!({ "mode": "teams", "item": "Not A Boss", "code": "123456" });
        let response = disabled_app().oneshot(post_json(NOTIFY_ENDPOINT, body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let body = serde_json::json!({ "mode": "raids", "item": "Nex", "code": "123456" });
        let response = disabled_app().oneshot(post_json(NOTIFY_ENDPOINT, body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            json_body(response).await,
            serde_json::json!({ "error": "Discord integration is disabled" })
        );
    }

    #[tokio::test]
    async fn test_setup_page_not_served_on_public_router() {
        // A local reverse proxy makes every visitor look like loopback
        let mut request = get_from(TOTP_SETUP_ENDPOINT, [127, 0, 0, 1]);
        request
            .headers_mut()
            .insert("x-forwarded-for", HeaderValue::from_static("203.0.113.5"));
        request
            .headers_mut()
            .insert("cf-connecting-ip", HeaderValue::from_static("203.0.113.5"));

        let response = enabled_app().oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let page = text_body(response).await;
        assert!(!page.contains(SECRET));
        assert!(!page.contains("otpauth://"));
    }

    #[tokio::test]
    async fn test_totp_setup_is_loopback_only() {
        let response = create_setup_router(enabled_state())
            .oneshot(get_from(TOTP_SETUP_ENDPOINT, [192, 168, 1, 20]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = create_setup_router(enabled_state())
            .oneshot(get_from(TOTP_SETUP_ENDPOINT, [127, 0, 0, 1]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let page = text_body(response).await;
        assert!(page.contains("otpauth://totp/OSRS%20Boss%20Wheel?secret=GEZDGNBVGY3TQOJQGEZDGNBVGY3TQOJQ"));
        assert!(page.contains("<svg"));
    }

    #[tokio::test]
    async fn test_totp_setup_hidden_when_disabled() {
        let response = create_setup_router(disabled_state())
            .oneshot(get_from(TOTP_SETUP_ENDPOINT, [127, 0, 0, 1]))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_visit_log_skips_recent_repeats() {
        let mut log = VisitLog::default();
        assert!(log.should_log("198.51.100.7", 1_000));
        assert!(!log.should_log("198.51.100.7", 1_000 + IP_LOG_EXPIRY));
        assert!(log.should_log("198.51.100.7", 1_000 + IP_LOG_EXPIRY + 1));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_visit_log_stays_bounded() {
        let mut log = VisitLog::default();
        for n in 0..MAX_TRACKED_IPS + 500 {
            log.should_log(&format!("spoofed-{}", n), 1_000);
        }
        assert_eq!(log.len(), MAX_TRACKED_IPS);
        assert!(!log.should_log("203.0.113.5", 1_000));
        assert_eq!(log.len(), MAX_TRACKED_IPS);
    }

    #[test]
    fn test_visit_log_prunes_expired_entries_when_full() {
        let mut log = VisitLog::default();
        for n in 0..MAX_TRACKED_IPS {
            log.should_log(&format!("old-{}", n), 1_000);
        }
        assert!(log.should_log("203.0.113.5", 1_000 + IP_LOG_EXPIRY + 1));
        assert_eq!(log.len(), 1);
    }

    #[test]
    fn test_client_ip_ignores_forwarded_headers_unless_trusted() {
        let mut request = get_from("/", [192, 0, 2, 10]);
        request
            .headers_mut()
            .insert("x-forwarded-for", HeaderValue::from_static("203.0.113.5, 10.0.0.1"));

        assert_eq!(client_ip(&request, false), "192.0.2.10");
        assert_eq!(client_ip(&request, true), "203.0.113.5");

        let bare = Request::builder().uri("/").body(Body::empty()).unwrap();
        assert_eq!(client_ip(&bare, false), "unknown");
    }
}
