// v2 API wire types
//
// Every v2 response is wrapped in `Envelope<T>`. Fields the controller may
// omit are `Option` so that presence survives decoding: callers such as the
// rate-limit codec need to tell "absent" apart from zero or false.

use serde::{Deserialize, Serialize};

// ── Response Envelope ────────────────────────────────────────────────

/// Standard v2 response envelope.
///
/// ```json
/// { "errorCode": 0, "msg": "Success.", "result": { ... } }
/// ```
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Envelope<T> {
    pub error_code: i64,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub result: Option<T>,
}

/// List payloads come back either as a bare array or as a page object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ListResult<T> {
    Plain(Vec<T>),
    Paged(Page<T>),
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default)]
    pub total_rows: Option<u64>,
    #[serde(default)]
    pub current_page: Option<u64>,
    #[serde(default)]
    pub current_size: Option<u64>,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}

impl<T> ListResult<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Self::Paged(page) => page.data,
            Self::Plain(items) => items,
        }
    }
}

// ── Controller identity / login ─────────────────────────────────────

/// `GET /api/info` (unauthenticated).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControllerInfo {
    #[serde(default)]
    pub omadac_id: Option<String>,
    #[serde(default)]
    pub controller_ver: Option<String>,
    #[serde(default)]
    pub api_ver: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResult {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub role_type: Option<i32>,
}

// ── Sites / WLAN groups / SSIDs ─────────────────────────────────────

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A WLAN group inside a site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wlan {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub primary: Option<bool>,
}

/// SSID-level bandwidth caps. `*Type` is the unit (0=Kbps, 1=Mbps, 2=Gbps).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SsidRateLimit {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_limit_enable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub down_limit_type: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up_limit_enable: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up_limit: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub up_limit_type: Option<i64>,
}

/// One SSID record from `.../wlans/{wlanId}/ssids`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SsidData {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub wlan_schedule_enable: Option<bool>,
    #[serde(default)]
    pub schedule_id: Option<String>,
    #[serde(default)]
    pub action: Option<i32>,
    #[serde(default)]
    pub rate_limit: Option<SsidRateLimit>,
}

/// Partial SSID update sent with `PATCH .../ssids/{ssidName}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SsidUpdate {
    pub wlan_schedule_enable: bool,
    /// 0 = allow traffic during the schedule.
    pub action: i32,
    pub schedule_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<SsidRateLimit>,
}

// ── Time range profiles ─────────────────────────────────────────────

/// One interval of a time range. `end_hour == 24` means end of day.
///
/// Bounds are optional so that a malformed range elsewhere on the site
/// decodes and is simply never matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    #[serde(default)]
    pub day_type: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_hour: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_min: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_hour: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_min: Option<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[allow(clippy::struct_excessive_bools)]
pub struct TimeRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    /// 0 = custom per-day selection.
    #[serde(default)]
    pub day_mode: i32,
    #[serde(default)]
    pub day_mon: bool,
    #[serde(default)]
    pub day_tue: bool,
    #[serde(default)]
    pub day_wed: bool,
    #[serde(default)]
    pub day_thu: bool,
    #[serde(default)]
    pub day_fri: bool,
    #[serde(default)]
    pub day_sat: bool,
    #[serde(default)]
    pub day_sun: bool,
    #[serde(default)]
    pub time_list: Vec<TimeSlot>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedProfile {
    #[serde(default)]
    pub profile_id: Option<String>,
}

// ── URL filters ─────────────────────────────────────────────────────

/// A controller-side URL filter rule.
///
/// Fields this crate does not model are kept in `extra` so that an
/// update sends the controller's record back intact.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlFilterData {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<bool>,
    /// 0 = block, 1 = allow.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<i32>,
    /// 2 = SSID.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<i32>,
    #[serde(default)]
    pub source_ids: Vec<String>,
    #[serde(default)]
    pub urls: Vec<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// `POST .../urlfilters` may echo the new rule id.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedUrlFilter {
    #[serde(default)]
    pub id: Option<String>,
}
