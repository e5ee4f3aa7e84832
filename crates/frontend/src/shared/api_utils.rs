//! REST paths of the master-data and permission services.

/// `{protocol}//{hostname}:3000`, or empty (relative URLs) outside a browser.
pub fn api_base() -> String {
    let Some(window) = web_sys::window() else {
        return String::new();
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

pub const PERMISSIONS_PATH: &str = "/api/permissions/my_permissions/";

/// `/api/master/{endpoint}/`
pub fn master_collection_path(endpoint: &str) -> String {
    format!("/api/master/{}/", endpoint)
}

/// `/api/master/{endpoint}/{id}/`
pub fn master_item_path(endpoint: &str, id: &str) -> String {
    format!(
        "/api/master/{}/{}/",
        endpoint,
        urlencoding::encode(id)
    )
}

/// `/api/master/{endpoint}/?k=v&...`; without params this is the collection path.
pub fn master_scoped_path(endpoint: &str, params: &[(String, String)]) -> String {
    let base = master_collection_path(endpoint);
    if params.is_empty() {
        return base;
    }
    let query = params
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");
    format!("{}?{}", base, query)
}
