//! Bandwidth cap encoding.
//!
//! The controller stores a cap as `(enable, value, unit)` per direction with
//! `unit` in {0=Kbps, 1=Mbps, 2=Gbps}; callers speak plain Kbps with `-1`
//! meaning "no limit". The semantic value is `value * 1024^unit`.

use omada_api::models::SsidRateLimit;
use thiserror::Error;

/// Kbps sentinel for "no limit" at the API boundary.
pub const DISABLED: i64 = -1;

const UNIT_STEP: i64 = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum RateLimitError {
    #[error("rate limit is enabled but has no value")]
    MissingValue,
    #[error("rate limit is enabled but has no unit")]
    MissingUnit,
    #[error("unknown rate limit unit {0}")]
    InvalidUnit(i64),
    #[error("rate limit overflows Kbps range")]
    Overflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitUnit {
    Kbps = 0,
    Mbps = 1,
    Gbps = 2,
}

impl RateLimitUnit {
    pub fn from_code(code: i64) -> Result<Self, RateLimitError> {
        match code {
            0 => Ok(Self::Kbps),
            1 => Ok(Self::Mbps),
            2 => Ok(Self::Gbps),
            other => Err(RateLimitError::InvalidUnit(other)),
        }
    }

    pub fn code(self) -> i64 {
        match self {
            Self::Kbps => 0,
            Self::Mbps => 1,
            Self::Gbps => 2,
        }
    }

    /// Kbps per one unit.
    pub fn kbps(self) -> i64 {
        match self {
            Self::Kbps => 1,
            Self::Mbps => UNIT_STEP,
            Self::Gbps => UNIT_STEP * UNIT_STEP,
        }
    }
}

/// One direction of a stored cap, with field presence preserved.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodedRateLimit {
    pub enable: Option<bool>,
    pub value: Option<i64>,
    pub unit: Option<i64>,
}

impl EncodedRateLimit {
    pub fn new(enable: Option<bool>, value: Option<i64>, unit: Option<i64>) -> Self {
        Self {
            enable,
            value,
            unit,
        }
    }

    fn enabled(&self) -> bool {
        self.enable.unwrap_or(false)
    }

    /// Decode to Kbps; [`DISABLED`] when the cap is off.
    pub fn to_kbps(&self) -> Result<i64, RateLimitError> {
        if !self.enabled() {
            return Ok(DISABLED);
        }
        let value = self.value.ok_or(RateLimitError::MissingValue)?;
        let unit = RateLimitUnit::from_code(self.unit.ok_or(RateLimitError::MissingUnit)?)?;
        value
            .checked_mul(unit.kbps())
            .ok_or(RateLimitError::Overflow)
    }

    /// Whether this stored cap already satisfies `requested` (Kbps).
    ///
    /// `None` means the caller did not ask for a change; anything below 1
    /// asks for no limit.
    pub fn matches(&self, requested: Option<i64>) -> bool {
        let Some(requested) = requested else {
            return true;
        };
        if requested < 1 {
            return !self.enabled();
        }
        self.enabled() && self.to_kbps().is_ok_and(|kbps| kbps == requested)
    }

    /// Encode a Kbps request using the largest unit that divides it exactly.
    pub fn from_kbps(kbps: i64) -> Self {
        if kbps < 1 {
            return Self {
                enable: Some(false),
                value: None,
                unit: None,
            };
        }
        let unit = [RateLimitUnit::Gbps, RateLimitUnit::Mbps]
            .into_iter()
            .find(|unit| kbps % unit.kbps() == 0)
            .unwrap_or(RateLimitUnit::Kbps);
        Self {
            enable: Some(true),
            value: Some(kbps / unit.kbps()),
            unit: Some(unit.code()),
        }
    }
}

/// Upload triple of an SSID's stored caps (absent record → all absent).
pub fn extract_upload(limit: Option<&SsidRateLimit>) -> EncodedRateLimit {
    limit.map_or_else(EncodedRateLimit::default, |l| {
        EncodedRateLimit::new(l.up_limit_enable, l.up_limit, l.up_limit_type)
    })
}

/// Download triple of an SSID's stored caps.
pub fn extract_download(limit: Option<&SsidRateLimit>) -> EncodedRateLimit {
    limit.map_or_else(EncodedRateLimit::default, |l| {
        EncodedRateLimit::new(l.down_limit_enable, l.down_limit, l.down_limit_type)
    })
}

/// Build the `rateLimit` object for an SSID update, or `None` when both
/// directions already match the request.
///
/// A direction that already matches is copied from `stored` unchanged so the
/// controller never receives half an object.
pub fn rate_limit_patch(
    stored: Option<&SsidRateLimit>,
    upload: Option<i64>,
    download: Option<i64>,
) -> Option<SsidRateLimit> {
    let up_matches = extract_upload(stored).matches(upload);
    let down_matches = extract_download(stored).matches(download);
    if up_matches && down_matches {
        return None;
    }

    let mut patch = stored.cloned().unwrap_or_default();
    if let (false, Some(kbps)) = (up_matches, upload) {
        let encoded = EncodedRateLimit::from_kbps(kbps);
        patch.up_limit_enable = encoded.enable;
        patch.up_limit = encoded.value.or(patch.up_limit);
        patch.up_limit_type = encoded.unit.or(patch.up_limit_type);
    }
    if let (false, Some(kbps)) = (down_matches, download) {
        let encoded = EncodedRateLimit::from_kbps(kbps);
        patch.down_limit_enable = encoded.enable;
        patch.down_limit = encoded.value.or(patch.down_limit);
        patch.down_limit_type = encoded.unit.or(patch.down_limit_type);
    }
    Some(patch)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn on(value: i64, unit: i64) -> EncodedRateLimit {
        EncodedRateLimit::new(Some(true), Some(value), Some(unit))
    }

    #[test]
    fn decodes_each_unit() {
        assert_eq!(on(7, 0).to_kbps(), Ok(7));
        assert_eq!(on(7, 1).to_kbps(), Ok(7 * 1024));
        assert_eq!(on(7, 2).to_kbps(), Ok(7 * 1024 * 1024));
        assert_eq!(on(0, 1).to_kbps(), Ok(0));
    }

    #[test]
    fn disabled_decodes_to_sentinel() {
        let off = EncodedRateLimit::new(Some(false), Some(10), Some(1));
        assert_eq!(off.to_kbps(), Ok(DISABLED));
        assert_eq!(EncodedRateLimit::default().to_kbps(), Ok(DISABLED));
    }

    #[test]
    fn enabled_without_fields_is_an_error() {
        let no_value = EncodedRateLimit::new(Some(true), None, Some(1));
        let no_unit = EncodedRateLimit::new(Some(true), Some(5), None);
        assert_eq!(no_value.to_kbps(), Err(RateLimitError::MissingValue));
        assert_eq!(no_unit.to_kbps(), Err(RateLimitError::MissingUnit));
        assert_eq!(on(1, 3).to_kbps(), Err(RateLimitError::InvalidUnit(3)));
    }

    #[test]
    fn unrequested_always_matches() {
        assert!(on(5, 1).matches(None));
        assert!(EncodedRateLimit::default().matches(None));
    }

    #[test]
    fn sub_one_request_means_no_limit() {
        assert!(EncodedRateLimit::new(Some(false), None, None).matches(Some(-1)));
        assert!(EncodedRateLimit::default().matches(Some(0)));
        assert!(!on(5, 1).matches(Some(-1)));
    }

    #[test]
    fn positive_request_compares_in_kbps() {
        assert!(on(2, 1).matches(Some(2048)));
        assert!(!on(2, 1).matches(Some(2000)));
        assert!(!EncodedRateLimit::new(Some(false), Some(2048), Some(0)).matches(Some(2048)));
        assert!(!EncodedRateLimit::new(Some(true), None, Some(0)).matches(Some(2048)));
    }

    #[test]
    fn encodes_with_largest_exact_unit() {
        assert_eq!(EncodedRateLimit::from_kbps(3 * 1024 * 1024), on(3, 2));
        assert_eq!(EncodedRateLimit::from_kbps(5 * 1024), on(5, 1));
        assert_eq!(EncodedRateLimit::from_kbps(1500), on(1500, 0));
        assert_eq!(
            EncodedRateLimit::from_kbps(DISABLED),
            EncodedRateLimit::new(Some(false), None, None)
        );
    }

    #[test]
    fn encoded_request_matches_itself() {
        for kbps in [1, 1023, 1024, 1025, 4096, 1024 * 1024, 3 * 1024 * 1024 + 1] {
            assert!(EncodedRateLimit::from_kbps(kbps).matches(Some(kbps)), "kbps={kbps}");
        }
    }

    #[test]
    fn patch_skipped_when_everything_matches() {
        let stored = SsidRateLimit {
            up_limit_enable: Some(true),
            up_limit: Some(1),
            up_limit_type: Some(1),
            down_limit_enable: Some(false),
            ..SsidRateLimit::default()
        };
        assert_eq!(rate_limit_patch(Some(&stored), Some(1024), Some(-1)), None);
        assert_eq!(rate_limit_patch(None, None, None), None);
    }

    #[test]
    fn patch_changes_only_differing_direction() {
        let stored = SsidRateLimit {
            up_limit_enable: Some(true),
            up_limit: Some(1),
            up_limit_type: Some(1),
            down_limit_enable: Some(true),
            down_limit: Some(10),
            down_limit_type: Some(0),
        };
        let patch = rate_limit_patch(Some(&stored), None, Some(2048)).expect("download differs");
        assert_eq!(patch.up_limit, Some(1));
        assert_eq!(patch.up_limit_type, Some(1));
        assert_eq!(patch.down_limit_enable, Some(true));
        assert_eq!(patch.down_limit, Some(2));
        assert_eq!(patch.down_limit_type, Some(1));
    }

    #[test]
    fn patch_disables_upload() {
        let stored = SsidRateLimit {
            up_limit_enable: Some(true),
            up_limit: Some(4),
            up_limit_type: Some(1),
            ..SsidRateLimit::default()
        };
        let patch = rate_limit_patch(Some(&stored), Some(DISABLED), None).expect("upload differs");
        assert_eq!(patch.up_limit_enable, Some(false));
        assert_eq!(patch.up_limit, Some(4));
    }
}
