//! Secret handling utilities.
//!
//! Re-exports secrecy types and builds the token-bearing Bot API base URL
//! without ever formatting the token into a log line.

pub use secrecy::{ExposeSecret, SecretString};

/// Base URL for Bot API method calls: `{api_url}/bot{token}`.
///
/// The result embeds the token, so it is returned as a secret too.
pub fn bot_api_base(api_url: &str, token: &SecretString) -> SecretString {
    SecretString::from(format!(
        "{}/bot{}",
        api_url.trim_end_matches('/'),
        token.expose_secret()
    ))
}
