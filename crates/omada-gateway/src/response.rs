//! JSON envelopes: `{ "data": ... }` on success, `{ "error": { code, message } }` on failure.

use serde::Serialize;

use omada_core::{UrlFilter, WifiState, WifiUpdateOutcome};

#[derive(Debug, Serialize)]
pub struct Data<T> {
    pub data: T,
}

impl<T> Data<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorEnvelope {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    /// HTTP status number.
    pub code: u16,
    pub message: String,
}

/// Body of a successful `POST /api/v1/networks/wifis/{ssid}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WifiUpdated {
    pub updated: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub url_filters: Vec<UrlFilter>,
}

impl From<WifiUpdateOutcome> for WifiUpdated {
    fn from(outcome: WifiUpdateOutcome) -> Self {
        Self {
            updated: outcome.updated,
            url_filters: outcome.url_filters,
        }
    }
}

/// Body of `GET /api/v1/networks/wifis/{ssid}`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WifiView {
    pub ssid: String,
    pub upload_rate_limit: i64,
    pub download_rate_limit: i64,
    pub url_filters: Vec<UrlFilter>,
}

impl From<WifiState> for WifiView {
    fn from(state: WifiState) -> Self {
        Self {
            ssid: state.ssid,
            upload_rate_limit: state.upload_rate_limit,
            download_rate_limit: state.download_rate_limit,
            url_filters: state.url_filters,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Health {
    pub status: &'static str,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_filter_list_is_omitted() {
        let body = Data::new(WifiUpdated {
            updated: true,
            url_filters: Vec::new(),
        });
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({ "data": { "updated": true } })
        );
    }

    #[test]
    fn filters_use_wire_names() {
        let body = Data::new(WifiUpdated {
            updated: true,
            url_filters: vec![UrlFilter {
                name: "ads".into(),
                bypass: false,
                urls: vec!["a.com".into()],
            }],
        });
        assert_eq!(
            serde_json::to_value(body).unwrap(),
            json!({ "data": { "updated": true, "urlFilters": [
                { "name": "ads", "bypassFilter": false, "urls": ["a.com"] }
            ] } })
        );
    }
}
