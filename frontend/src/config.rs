use web_sys::window;

const DEV_SERVER_PORT: &str = "8080";
const DEV_API_BASE: &str = "http://127.0.0.1:3000";

pub fn get_api_base_url() -> String {
    if let Some(window) = window() {
        let location = window.location();
        if let Ok(port) = location.port() {
            // trunk serve runs on its own port, the API stays on the backend
            if port == DEV_SERVER_PORT {
                return DEV_API_BASE.to_string();
            }
        }

        // Served by the backend itself: same origin
        if let Ok(host) = location.host() {
            let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
            return format!("{}//{}", protocol, host);
        }
    }

    DEV_API_BASE.to_string()
}

pub fn api_url(path: &str) -> String {
    format!("{}{}", get_api_base_url(), path)
}
