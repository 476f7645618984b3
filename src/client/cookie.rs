// src/client/cookie.rs
// =============================================================================
// A cookie store that always sends the same cookies.
//
// With --cookie but without --use-cookie-jar, the user wants their cookies
// on every request and does not want the server to change them.
// =============================================================================

use reqwest::cookie::CookieStore;
use reqwest::header::HeaderValue;
use url::Url;

#[derive(Debug, Clone, Default)]
pub struct StatelessJar {
    header: Option<HeaderValue>,
}

impl StatelessJar {
    // `cookies` are (name, value) pairs
    pub fn new(cookies: &[(String, String)]) -> Self {
        if cookies.is_empty() {
            return Self::default();
        }

        let joined = cookies
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join("; ");

        Self {
            header: HeaderValue::from_str(&joined).ok(),
        }
    }
}

impl CookieStore for StatelessJar {
    // Set-Cookie from the server is ignored
    fn set_cookies(&self, _cookie_headers: &mut dyn Iterator<Item = &HeaderValue>, _url: &Url) {}

    fn cookies(&self, _url: &Url) -> Option<HeaderValue> {
        self.header.clone()
    }
}
