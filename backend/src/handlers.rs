use std::net::SocketAddr;

use axum::extract::{ConnectInfo, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse};
use axum::Json;
use qrcode::render::svg;
use qrcode::QrCode;
use tracing::{debug, warn};
use validator::Validate;

use shared::constants::APP_TITLE;
use shared::notify::{ModeEntry, NotifyError, NotifyRequest, NotifyResponse, NotifyStatusResponse};
use shared::wheel_modes::WheelMode;

use crate::error::AppError;
use crate::AppState;

pub async fn health_check() -> impl IntoResponse {
    "OK"
}

pub async fn notify_status(State(state): State<AppState>) -> Json<NotifyStatusResponse> {
    Json(NotifyStatusResponse {
        enabled: state.notifier.is_enabled(),
    })
}

pub async fn list_modes() -> Json<Vec<ModeEntry>> {
    Json(ModeEntry::all())
}

#[axum::debug_handler]
pub async fn notify(
    State(state): State<AppState>,
    Json(request): Json<NotifyRequest>,
) -> Result<Json<NotifyResponse>, AppError> {
    // A disabled integration answers the same way whatever the request holds
    if !state.notifier.is_enabled() {
        return Err(NotifyError::Disabled.into());
    }

    let mode: WheelMode = request.mode.parse().map_err(|_| AppError::UnknownMode)?;
    request
        .validate()
        .map_err(|e| AppError::InvalidRequest(format!("Invalid request: {}", e)))?;

    let configuration = mode.configuration();
    let item = configuration.item(&request.item).ok_or(AppError::UnknownItem)?;

    // Only images that belong to the item may be embedded.
    let asset = match request.asset.as_deref() {
        Some(asset) if item.has_asset(asset) => Some(asset),
        Some(asset) => {
            warn!("Dropping foreign asset {} for {}", asset, item.name);
            None
        }
        None => None,
    };

    state.notifier.notify(item, mode, &request.code, asset).await?;

    Ok(Json(NotifyResponse {
        success: true,
        message: format!("Posted {} to Discord", item.name),
    }))
}

/// Authenticator enrolment page. Mounted only on the loopback setup
/// listener, never on the public router.
pub async fn totp_setup(
    State(state): State<AppState>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
) -> Result<Html<String>, StatusCode> {
    if !peer.ip().is_loopback() {
        debug!("Refusing TOTP setup page to {}", peer);
        return Err(StatusCode::NOT_FOUND);
    }

    let verifier = state.notifier.verifier().ok_or(StatusCode::NOT_FOUND)?;
    let uri = verifier.provisioning_uri(APP_TITLE, APP_TITLE);

    Ok(Html(render_setup_page(&uri, verifier.secret_base32())))
}

/// Inline SVG of the provisioning URI, or nothing if it does not fit a QR code.
fn qr_svg(uri: &str) -> String {
    match QrCode::new(uri.as_bytes()) {
        Ok(code) => {
            let image = code
                .render::<svg::Color>()
                .min_dimensions(240, 240)
                .dark_color(svg::Color("#000000"))
                .light_color(svg::Color("#ffffff"))
                .build();
            // Drop the XML prolog, the SVG is embedded in HTML
            image.find("<svg").map(|start| image[start..].to_string()).unwrap_or(image)
        }
        Err(e) => {
            warn!("Could not render setup QR code: {:?}", e);
            String::new()
        }
    }
}

fn render_setup_page(uri: &str, secret: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <title>{title} - TOTP Setup</title>
  <style>
    body {{ font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif; background: linear-gradient(135deg, #1a1a1a 0%, #2d2d2d 100%); color: #fff; min-height: 100vh; display: flex; align-items: center; justify-content: center; margin: 0; padding: 2rem; }}
    .container {{ background: #333; border-radius: 12px; padding: 3rem; max-width: 600px; box-shadow: 0 10px 30px rgba(0, 0, 0, 0.5); }}
    h1, h2, .label {{ color: #FFFF00; }}
    .box {{ background: #2a2a2a; padding: 1rem; border-radius: 8px; font-family: 'Courier New', monospace; word-break: break-all; border: 2px dashed #555; margin-bottom: 1.5rem; }}
    .qr {{ background: #fff; padding: 1rem; border-radius: 8px; width: fit-content; margin: 0 auto 1.5rem; }}
    .secret {{ color: #0f0; font-size: 1.2rem; letter-spacing: 2px; }}
    a {{ color: #FFFF00; }}
  </style>
</head>
<body>
  <div class="container">
    <h1>{title}</h1>
    <p>Authenticator setup for Discord announcements</p>
    <h2>Instructions</h2>
    <ol>
      <li>Open your authenticator app</li>
      <li>Scan the QR code, or add an account using the link or the secret below</li>
      <li>Enter the 6-digit code when posting a result</li>
    </ol>
    <div class="qr">{qr}</div>
    <span class="label">Setup link</span>
    <div class="box"><a href="{uri}">{uri}</a></div>
    <span class="label">Manual entry key</span>
    <div class="box secret">{secret}</div>
  </div>
</body>
</html>"#,
        title = APP_TITLE,
        uri = uri,
        secret = secret,
        qr = qr_svg(uri),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_setup_page_has_qr_code() {
        let uri = "otpauth://totp/OSRS%20Boss%20Wheel?secret=GEZDGNBVGY3TQOJQ&issuer=OSRS%20Boss%20Wheel";
        let page = render_setup_page(uri, "GEZDGNBVGY3TQOJQ");
        assert!(page.contains("<div class=\"qr\"><svg"));
        assert!(!page.contains("<?xml"));
        assert!(page.contains("GEZDGNBVGY3TQOJQ"));
    }
}
