use std::fmt;
use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::HeaderValue;
use secrecy::{ExposeSecret, SecretString};
use url::Url;

/// Username/password pair posted to the controller's login endpoint.
#[derive(Debug, Clone)]
pub struct ControllerCredentials {
    pub username: String,
    pub password: SecretString,
}

impl ControllerCredentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

/// An authenticated controller session: `(controller id, cookie jar, token)`.
///
/// Obtained from [`OmadaClient::login`](crate::OmadaClient::login) and
/// passed by reference to every authenticated call of one pipeline run.
/// Never persisted and never shared between runs. The jar belongs to the
/// session rather than the `reqwest::Client`, so concurrent runs on one
/// client never see each other's cookies.
#[derive(Clone)]
pub struct Session {
    controller_id: String,
    jar: Arc<Jar>,
    token: SecretString,
}

impl Session {
    pub fn new(controller_id: impl Into<String>, jar: Arc<Jar>, token: SecretString) -> Self {
        Self {
            controller_id: controller_id.into(),
            jar,
            token,
        }
    }

    /// The `omadacId` used as the first path segment of every v2 URL.
    pub fn controller_id(&self) -> &str {
        &self.controller_id
    }

    /// The `Cookie` request header for `url`, if the jar holds any live
    /// cookie that applies to it.
    pub fn cookie_header(&self, url: &Url) -> Option<HeaderValue> {
        self.jar.cookies(url)
    }

    /// The login token, sent as the `Csrf-Token` header.
    pub fn token(&self) -> &str {
        self.token.expose_secret()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("controller_id", &self.controller_id)
            .field("cookies", &"[REDACTED]")
            .field("token", &"[REDACTED]")
            .finish()
    }
}
