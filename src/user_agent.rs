//! Shared User-Agent string for page and image requests.

/// Project URL for User-Agent identification (good citizenship; RFC 9308).
const PROJECT_UA_URL: &str = "https://github.com/fierce/imgfetch";

/// Default User-Agent for every request the tool makes.
#[must_use]
pub(crate) fn default_user_agent() -> String {
    let version = env!("CARGO_PKG_VERSION");
    format!("imgfetch/{version} (+{PROJECT_UA_URL})")
}
