use gloo_net::http::{Request, Response};
use shared::constants::{NETWORK_ERROR, NOTIFY_ENDPOINT, NOTIFY_STATUS_ENDPOINT};
use shared::notify::{ErrorResponse, NotifyRequest, NotifyResponse, NotifyStatusResponse};

use crate::config::api_url;

async fn error_message(response: Response) -> String {
    match response.json::<ErrorResponse>().await {
        Ok(body) => body.error,
        Err(_) => format!("Error status: {}", response.status()),
    }
}

/// Whether the backend has the Discord integration configured.
pub async fn fetch_notify_status() -> Result<bool, String> {
    let response = Request::get(&api_url(NOTIFY_STATUS_ENDPOINT))
        .send()
        .await
        .map_err(|e| format!("{}: {:?}", NETWORK_ERROR, e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    response
        .json::<NotifyStatusResponse>()
        .await
        .map(|status| status.enabled)
        .map_err(|e| format!("Error parsing status response: {:?}", e))
}

pub async fn post_notify(request: &NotifyRequest) -> Result<NotifyResponse, String> {
    let response = Request::post(&api_url(NOTIFY_ENDPOINT))
        .json(request)
        .map_err(|e| format!("Failed to build request: {:?}", e))?
        .send()
        .await
        .map_err(|e| format!("{}: {:?}", NETWORK_ERROR, e))?;

    if !response.ok() {
        return Err(error_message(response).await);
    }

    response
        .json::<NotifyResponse>()
        .await
        .map_err(|e| format!("Error parsing notify response: {:?}", e))
}
