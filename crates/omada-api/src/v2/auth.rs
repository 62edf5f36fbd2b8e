// v2 API authentication
//
// Controller identity discovery, login and logout. Login captures the
// session cookies from `Set-Cookie` into a per-session cookie jar and the
// token from the envelope into a `Session` value; nothing is stored on the
// client itself.

use std::sync::Arc;

use reqwest::cookie::{CookieStore, Jar};
use reqwest::header::SET_COOKIE;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use tracing::debug;

use crate::auth::Session;
use crate::error::Error;
use crate::v2::client::OmadaClient;
use crate::v2::models::{ControllerInfo, LoginResult};

impl OmadaClient {
    /// Fetch controller identity.
    ///
    /// `GET /api/info` (unauthenticated)
    pub async fn controller_info(&self) -> Result<ControllerInfo, Error> {
        let url = self.url_for(["api", "info"])?;
        debug!("fetching controller info");
        self.get_public(url)
            .await?
            .ok_or(Error::MissingResult { endpoint: "api/info" })
    }

    /// Discover the `omadacId` that prefixes every later v2 path.
    pub async fn controller_id(&self) -> Result<String, Error> {
        self.controller_info()
            .await?
            .omadac_id
            .filter(|id| !id.is_empty())
            .ok_or(Error::MissingResult { endpoint: "api/info" })
    }

    /// Authenticate with the configured username/password.
    ///
    /// `POST /{omadacId}/api/v2/login`
    ///
    /// Fails with [`Error::MissingResult`] when no token comes back and with
    /// [`Error::Authentication`] when the controller sets no session cookie.
    pub async fn login(&self, controller_id: &str) -> Result<Session, Error> {
        let url = self.api_url(controller_id, &["login"])?;
        debug!("logging in at {}", url);

        let credentials = self.credentials();
        let body = json!({
            "username": credentials.username,
            "password": credentials.password.expose_secret(),
        });

        let resp = self.http().post(url).json(&body).send().await?;
        let (result, headers): (Option<LoginResult>, _) = self.parse_envelope(resp).await?;

        let token = result
            .and_then(|r| r.token)
            .filter(|t| !t.is_empty())
            .ok_or(Error::MissingResult { endpoint: "login" })?;

        let jar = Arc::new(Jar::default());
        jar.set_cookies(&mut headers.get_all(SET_COOKIE).iter(), self.base_url());

        if jar.cookies(self.base_url()).is_none() {
            return Err(Error::Authentication {
                message: "login response set no session cookie".into(),
            });
        }

        debug!("login successful");
        Ok(Session::new(controller_id, jar, SecretString::from(token)))
    }

    /// End the session.
    ///
    /// `POST /{omadacId}/api/v2/logout`
    pub async fn logout(&self, session: &Session) -> Result<(), Error> {
        let url = self.api_url(session.controller_id(), &["logout"])?;
        debug!("logging out at {}", url);
        let _: Option<serde_json::Value> = self.post(session, url, &json!({})).await?;
        Ok(())
    }
}
