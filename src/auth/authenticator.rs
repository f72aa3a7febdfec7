//! Authenticator implementation
//!
//! Builds the Basic `Authorization` header and applies it to requests.

use crate::types::StringMap;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use reqwest::RequestBuilder;

/// Name of the header carrying the credentials
pub const AUTHORIZATION: &str = "Authorization";

/// Build the Basic-Auth header for an application id and secret.
///
/// Inputs are not validated: empty values still produce a header, and the
/// API's 401 is the only signal that they were wrong.
pub fn build_auth_header(app_id: &str, secret: &str) -> StringMap {
    let credentials = STANDARD.encode(format!("{app_id}:{secret}"));
    let mut headers = StringMap::new();
    headers.insert(AUTHORIZATION.to_string(), format!("Basic {credentials}"));
    headers
}

/// Authenticator holding the application credentials
#[derive(Clone)]
pub struct BasicAuthenticator {
    app_id: String,
    secret: String,
}

impl BasicAuthenticator {
    /// Create a new authenticator
    pub fn new(app_id: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            secret: secret.into(),
        }
    }

    /// The application id (the secret is never exposed)
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    /// Headers to attach to every request
    pub fn auth_headers(&self) -> StringMap {
        build_auth_header(&self.app_id, &self.secret)
    }

    /// Apply authentication to a request builder
    pub fn apply(&self, req: RequestBuilder) -> RequestBuilder {
        self.auth_headers()
            .into_iter()
            .fold(req, |req, (key, value)| req.header(key, value))
    }
}

impl std::fmt::Debug for BasicAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuthenticator")
            .field("app_id", &self.app_id)
            .field("secret", &"***")
            .finish()
    }
}
