// v2 API HTTP client
//
// Wraps `reqwest::Client` with Omada-specific URL construction, session
// header injection, bounded body reads, and `{errorCode, msg, result}`
// envelope unwrapping. Endpoint groups (auth, sites, wlans, profiles,
// firewall) are implemented as inherent methods in separate files to keep
// this module focused on transport mechanics.

use reqwest::header::{CONTENT_TYPE, COOKIE};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::auth::{ControllerCredentials, Session};
use crate::error::Error;
use crate::transport::TransportConfig;
use crate::v2::models::Envelope;

/// Header carrying the login token on authenticated requests.
pub(crate) const TOKEN_HEADER: &str = "Csrf-Token";

/// Raw HTTP client for one Omada controller.
///
/// Cheap to clone: the underlying `reqwest::Client` is reference counted and
/// holds no per-session state, so one instance serves concurrent pipelines.
#[derive(Clone)]
pub struct OmadaClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: ControllerCredentials,
    max_body_bytes: usize,
}

impl OmadaClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the controller root (e.g. `https://10.0.0.2:8043`).
    pub fn new(
        base_url: Url,
        credentials: ControllerCredentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(
            http,
            base_url,
            credentials,
            transport.max_body_bytes,
        ))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        credentials: ControllerCredentials,
        max_body_bytes: usize,
    ) -> Self {
        Self {
            http,
            base_url,
            credentials,
            max_body_bytes,
        }
    }

    /// The controller base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub(crate) fn credentials(&self) -> &ControllerCredentials {
        &self.credentials
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Append raw path segments to the base URL, percent-encoding each one.
    pub(crate) fn url_for<'a>(
        &self,
        segments: impl IntoIterator<Item = &'a str>,
    ) -> Result<Url, Error> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| Error::InvalidUrl(url::ParseError::RelativeUrlWithCannotBeABaseBase))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// `{base}/{omadacId}/api/v2/{path...}`
    pub(crate) fn api_url(&self, controller_id: &str, path: &[&str]) -> Result<Url, Error> {
        self.url_for(
            [controller_id, "api", "v2"]
                .into_iter()
                .chain(path.iter().copied()),
        )
    }

    /// `{base}/{omadacId}/api/v2/sites/{siteId}/{path...}`
    ///
    /// Every endpoint the pipeline touches below the site listing is site-scoped.
    pub(crate) fn site_url(
        &self,
        session: &Session,
        site_id: &str,
        path: &[&str],
    ) -> Result<Url, Error> {
        self.url_for(
            [session.controller_id(), "api", "v2", "sites", site_id]
                .into_iter()
                .chain(path.iter().copied()),
        )
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Start a request carrying the session token and whichever jar cookies
    /// apply to `url`.
    fn authorized(
        &self,
        method: reqwest::Method,
        url: Url,
        session: &Session,
    ) -> reqwest::RequestBuilder {
        let cookie = session.cookie_header(&url);
        let builder = self
            .http
            .request(method, url)
            .header(TOKEN_HEADER, session.token());
        match cookie {
            Some(cookie) => builder.header(COOKIE, cookie),
            None => builder,
        }
    }

    /// Send an unauthenticated GET and unwrap the envelope.
    pub(crate) async fn get_public<T: DeserializeOwned>(&self, url: Url) -> Result<Option<T>, Error> {
        debug!("GET {}", url);
        let resp = self.http.get(url).send().await?;
        self.parse_envelope(resp).await.map(|(result, _)| result)
    }

    /// Send an authenticated GET and unwrap the envelope.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        session: &Session,
        url: Url,
    ) -> Result<Option<T>, Error> {
        debug!("GET {}", url);
        let builder = self.authorized(reqwest::Method::GET, url, session);
        let resp = builder.send().await?;
        self.parse_envelope(resp).await.map(|(result, _)| result)
    }

    /// Send an authenticated POST with JSON body and unwrap the envelope.
    pub(crate) async fn post<T: DeserializeOwned>(
        &self,
        session: &Session,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<Option<T>, Error> {
        debug!("POST {}", url);
        let builder = self.authorized(reqwest::Method::POST, url, session).json(body);
        let resp = builder.send().await?;
        self.parse_envelope(resp).await.map(|(result, _)| result)
    }

    /// Send an authenticated PATCH with JSON body and unwrap the envelope.
    pub(crate) async fn patch<T: DeserializeOwned>(
        &self,
        session: &Session,
        url: Url,
        body: &(impl Serialize + Sync),
    ) -> Result<Option<T>, Error> {
        debug!("PATCH {}", url);
        let builder = self.authorized(reqwest::Method::PATCH, url, session).json(body);
        let resp = builder.send().await?;
        self.parse_envelope(resp).await.map(|(result, _)| result)
    }

    /// Send an authenticated DELETE and unwrap the envelope.
    pub(crate) async fn delete<T: DeserializeOwned>(
        &self,
        session: &Session,
        url: Url,
    ) -> Result<Option<T>, Error> {
        debug!("DELETE {}", url);
        let builder = self
            .authorized(reqwest::Method::DELETE, url, session)
            .header(CONTENT_TYPE, "application/json");
        let resp = builder.send().await?;
        self.parse_envelope(resp).await.map(|(result, _)| result)
    }

    /// Read the body, refusing to buffer more than `max_body_bytes`.
    pub(crate) async fn read_bounded(&self, mut resp: reqwest::Response) -> Result<Vec<u8>, Error> {
        let limit = self.max_body_bytes;
        if resp
            .content_length()
            .is_some_and(|len| usize::try_from(len).map_or(true, |len| len > limit))
        {
            return Err(Error::ResponseTooLarge { limit });
        }

        let mut body = Vec::new();
        while let Some(chunk) = resp.chunk().await? {
            if body.len() + chunk.len() > limit {
                return Err(Error::ResponseTooLarge { limit });
            }
            body.extend_from_slice(&chunk);
        }
        Ok(body)
    }

    /// Parse the `{ errorCode, msg, result }` envelope.
    ///
    /// Returns the decoded `result` (absent when the controller sent none)
    /// together with the response headers, which login needs for cookies.
    /// An `errorCode != 0` is a failure even when the HTTP status is 200.
    pub(crate) async fn parse_envelope<T: DeserializeOwned>(
        &self,
        resp: reqwest::Response,
    ) -> Result<(Option<T>, reqwest::header::HeaderMap), Error> {
        let status = resp.status();
        let headers = resp.headers().clone();

        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(Error::Authentication {
                message: format!("controller refused the session (HTTP {status})"),
            });
        }

        let bytes = self.read_bounded(resp).await?;
        let body = String::from_utf8_lossy(&bytes);

        if !status.is_success() {
            let preview: String = body.chars().take(200).collect();
            return Err(Error::Controller {
                code: i64::from(status.as_u16()),
                msg: Some(format!("HTTP {status}: {preview}")),
            });
        }

        let envelope: Envelope<serde_json::Value> =
            serde_json::from_slice(&bytes).map_err(|e| deserialization_error(&e, &body))?;

        if envelope.error_code != 0 {
            return Err(Error::Controller {
                code: envelope.error_code,
                msg: envelope.msg,
            });
        }

        trace!(msg = ?envelope.msg, "envelope ok");

        let result = match envelope.result {
            None | Some(serde_json::Value::Null) => None,
            Some(value) => {
                Some(serde_json::from_value(value).map_err(|e| deserialization_error(&e, &body))?)
            }
        };
        Ok((result, headers))
    }
}

fn deserialization_error(err: &serde_json::Error, body: &str) -> Error {
    let preview: String = body.chars().take(200).collect();
    Error::Deserialization {
        message: format!("{err} (body preview: {preview:?})"),
        body: body.to_owned(),
    }
}
