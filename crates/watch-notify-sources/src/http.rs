use reqwest::Client;

const USER_AGENT: &str = concat!("watchpost/", env!("CARGO_PKG_VERSION"));

/// Shared HTTP client used by every provider
pub fn create_client() -> Client {
    Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Read the body of a failed response for error reporting, truncated so logs stay readable
pub async fn error_body(response: reqwest::Response) -> String {
    let mut text = response.text().await.unwrap_or_default();
    if text.len() > 500 {
        let mut cut = 500;
        while !text.is_char_boundary(cut) {
            cut -= 1;
        }
        text.truncate(cut);
        text.push('…');
    }
    text
}
