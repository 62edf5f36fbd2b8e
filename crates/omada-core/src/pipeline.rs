// ── SSID update pipeline ──
//
// One public call = one fresh controller session. Steps run strictly in
// order because each consumes what the previous produced; every controller
// call races the caller's cancellation token and the run's deadline, so a
// disconnect or an exhausted budget aborts the in-flight request and skips
// the rest. Nothing is rolled back: a time range created before a failure is
// left in place and reused by the next run.

use std::future::Future;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use omada_api::models::{SsidData, SsidUpdate, TimeRange, TimeSlot};
use omada_api::{OmadaClient, Session};

use crate::config::DEFAULT_PIPELINE_TIMEOUT;
use crate::error::{CoreError, PipelineStep, StepResultExt};
use crate::rate_limit::{EncodedRateLimit, extract_download, extract_upload, rate_limit_patch};
use crate::url_filter::{UrlFilter, UrlFilterReconciler};

/// Name given to the shared always-on schedule when it has to be created.
pub const ALWAYS_ON_RANGE_NAME: &str = "Night and Day";

/// SSID `action` value: allow traffic while the schedule is active.
const SCHEDULE_ACTION_ALLOW: i32 = 0;

/// Time range `dayMode` value: custom per-day selection.
const DAY_MODE_CUSTOM: i32 = 0;

const ALL_DAY: TimeSlot = TimeSlot {
    day_type: 0,
    start_hour: Some(0),
    start_min: Some(0),
    end_hour: Some(24),
    end_min: Some(0),
};

/// Requested changes for one SSID. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WifiPatch {
    /// Kbps; `-1` for no limit.
    #[serde(default)]
    pub upload_rate_limit: Option<i64>,
    /// Kbps; `-1` for no limit.
    #[serde(default)]
    pub download_rate_limit: Option<i64>,
    #[serde(default)]
    pub url_filters: Option<Vec<UrlFilter>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiUpdateOutcome {
    pub updated: bool,
    pub url_filters: Vec<UrlFilter>,
}

/// Read-only view of an SSID's managed settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiState {
    pub ssid: String,
    /// Kbps; `-1` when disabled.
    pub upload_rate_limit: i64,
    /// Kbps; `-1` when disabled.
    pub download_rate_limit: i64,
    pub url_filters: Vec<UrlFilter>,
}

/// The canonical every-day, all-day range.
pub fn always_on_range() -> TimeRange {
    TimeRange {
        id: None,
        name: ALWAYS_ON_RANGE_NAME.into(),
        day_mode: DAY_MODE_CUSTOM,
        day_mon: true,
        day_tue: true,
        day_wed: true,
        day_thu: true,
        day_fri: true,
        day_sat: true,
        day_sun: true,
        time_list: vec![ALL_DAY],
    }
}

/// Id of an existing range usable as the always-on schedule.
pub fn find_always_on(ranges: &[TimeRange]) -> Option<&str> {
    ranges
        .iter()
        .filter(|range| range.day_mode == DAY_MODE_CUSTOM)
        .filter(|range| range.time_list.iter().copied().any(covers_whole_day))
        .find_map(|range| range.id.as_deref())
}

fn covers_whole_day(slot: TimeSlot) -> bool {
    (slot.start_hour, slot.start_min, slot.end_hour, slot.end_min)
        == (ALL_DAY.start_hour, ALL_DAY.start_min, ALL_DAY.end_hour, ALL_DAY.end_min)
}

/// Output of steps 4–6: where the SSID lives.
struct Located {
    site_id: String,
    wlan_id: String,
    ssid: SsidData,
}

/// Per-run context: cancellation and deadline shared by every step.
struct Run<'a> {
    cancel: &'a CancellationToken,
    deadline: Instant,
    budget: Duration,
}

impl Run<'_> {
    /// Await one controller call, racing cancellation and the deadline.
    async fn step<T, F>(&self, step: PipelineStep, fut: F) -> Result<T, CoreError>
    where
        F: Future<Output = Result<T, omada_api::Error>>,
    {
        debug!(%step, "pipeline step");
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(CoreError::Canceled { step }),
            () = tokio::time::sleep_until(self.deadline) => Err(CoreError::DeadlineExceeded {
                step,
                budget: self.budget,
            }),
            res = fut => res.at(step),
        }
    }

    fn is_over(&self) -> bool {
        self.cancel.is_cancelled() || Instant::now() >= self.deadline
    }
}

/// Orchestrates "apply always-on schedule, rate limits and URL filters to SSID X".
///
/// Cheap to clone; holds no per-run state.
#[derive(Clone)]
pub struct SsidUpdatePipeline {
    client: OmadaClient,
    budget: Duration,
}

impl SsidUpdatePipeline {
    pub fn new(client: OmadaClient) -> Self {
        Self {
            client,
            budget: DEFAULT_PIPELINE_TIMEOUT,
        }
    }

    /// Override the end-to-end budget of one run.
    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    fn run<'a>(&self, cancel: &'a CancellationToken) -> Run<'a> {
        Run {
            cancel,
            deadline: Instant::now() + self.budget,
            budget: self.budget,
        }
    }

    /// Apply `patch` to the SSID named `ssid_name`.
    pub async fn update_wifi(
        &self,
        ssid_name: &str,
        patch: &WifiPatch,
        cancel: &CancellationToken,
    ) -> Result<WifiUpdateOutcome, CoreError> {
        let run = self.run(cancel);
        let session = self.open(&run, ssid_name).await?;
        let result = match self.locate(&run, &session, ssid_name).await {
            Ok(located) => self.apply(&run, &session, &located, patch).await,
            Err(e) => Err(e),
        };
        self.release(&run, &session).await;

        let outcome = result?;
        info!(
            ssid = ssid_name,
            updated = outcome.updated,
            filters = outcome.url_filters.len(),
            "wifi update complete"
        );
        Ok(outcome)
    }

    /// Report the managed settings of the SSID named `ssid_name`.
    pub async fn read_wifi(
        &self,
        ssid_name: &str,
        cancel: &CancellationToken,
    ) -> Result<WifiState, CoreError> {
        let run = self.run(cancel);
        let session = self.open(&run, ssid_name).await?;
        let result = match self.locate(&run, &session, ssid_name).await {
            Ok(located) => self.inspect(&run, &session, &located).await,
            Err(e) => Err(e),
        };
        self.release(&run, &session).await;
        result
    }

    /// Steps 1–3: validate, identify the controller, log in.
    async fn open(&self, run: &Run<'_>, ssid_name: &str) -> Result<Session, CoreError> {
        if ssid_name.is_empty() {
            return Err(CoreError::BadRequest {
                message: "ssid must not be empty".into(),
            });
        }

        let controller_id = run
            .step(PipelineStep::ControllerInfo, self.client.controller_id())
            .await?;
        run.step(PipelineStep::Login, self.client.login(&controller_id))
            .await
    }

    /// Steps 4–6: pick site and WLAN group, find the SSID by name.
    async fn locate(
        &self,
        run: &Run<'_>,
        session: &Session,
        ssid_name: &str,
    ) -> Result<Located, CoreError> {
        let sites = run
            .step(PipelineStep::Sites, self.client.list_sites(session))
            .await?;
        let Some(site) = sites.into_iter().next() else {
            return Err(CoreError::unexpected(
                PipelineStep::Sites,
                "controller has no sites",
            ));
        };

        let wlans = run
            .step(
                PipelineStep::Wlans,
                self.client.list_wlans(session, &site.id),
            )
            .await?;
        let Some(wlan) = wlans.into_iter().next() else {
            return Err(CoreError::unexpected(
                PipelineStep::Wlans,
                format!("site {} has no wlan groups", site.id),
            ));
        };

        let ssids = run
            .step(
                PipelineStep::Ssids,
                self.client.list_ssids(session, &site.id, &wlan.id),
            )
            .await?;
        if ssids.is_empty() {
            return Err(CoreError::unexpected(
                PipelineStep::Ssids,
                format!("wlan group {} has no ssids", wlan.id),
            ));
        }
        let Some(ssid) = ssids.into_iter().find(|s| s.name == ssid_name) else {
            return Err(CoreError::SsidNotFound {
                name: ssid_name.to_owned(),
            });
        };

        debug!(site_id = %site.id, wlan_id = %wlan.id, ssid_id = %ssid.id, "ssid located");
        Ok(Located {
            site_id: site.id,
            wlan_id: wlan.id,
            ssid,
        })
    }

    /// Steps 7–9.
    async fn apply(
        &self,
        run: &Run<'_>,
        session: &Session,
        located: &Located,
        patch: &WifiPatch,
    ) -> Result<WifiUpdateOutcome, CoreError> {
        let Located {
            site_id,
            wlan_id,
            ssid,
        } = located;

        let schedule_id = self.schedule_id(run, session, site_id).await?;

        let update = SsidUpdate {
            wlan_schedule_enable: true,
            action: SCHEDULE_ACTION_ALLOW,
            schedule_id,
            rate_limit: rate_limit_patch(
                ssid.rate_limit.as_ref(),
                patch.upload_rate_limit,
                patch.download_rate_limit,
            ),
        };
        run.step(
            PipelineStep::UpdateSsid,
            self.client
                .update_ssid(session, site_id, wlan_id, &ssid.name, &update),
        )
        .await?;

        let reconciler = UrlFilterReconciler::new(&self.client, session, site_id);
        let reconciled = run
            .step(
                PipelineStep::UrlFilters,
                reconciler.reconcile(&ssid.id, patch.url_filters.as_deref()),
            )
            .await?;

        Ok(WifiUpdateOutcome {
            // The SSID update above is always issued.
            updated: true,
            url_filters: reconciled.filters,
        })
    }

    /// Step 7: reuse the site's always-on range or create it.
    async fn schedule_id(
        &self,
        run: &Run<'_>,
        session: &Session,
        site_id: &str,
    ) -> Result<String, CoreError> {
        let ranges = run
            .step(
                PipelineStep::Schedule,
                self.client.list_time_ranges(session, site_id),
            )
            .await?;
        if let Some(id) = find_always_on(&ranges) {
            debug!(schedule_id = id, "reusing always-on time range");
            return Ok(id.to_owned());
        }

        let id = run
            .step(
                PipelineStep::Schedule,
                self.client
                    .create_time_range(session, site_id, &always_on_range()),
            )
            .await?;
        info!(schedule_id = %id, site_id, "created always-on time range");
        Ok(id)
    }

    async fn inspect(
        &self,
        run: &Run<'_>,
        session: &Session,
        located: &Located,
    ) -> Result<WifiState, CoreError> {
        let stored = located.ssid.rate_limit.as_ref();
        let decode = |encoded: EncodedRateLimit| {
            encoded
                .to_kbps()
                .map_err(|e| CoreError::unexpected(PipelineStep::Ssids, e.to_string()))
        };
        let upload_rate_limit = decode(extract_upload(stored))?;
        let download_rate_limit = decode(extract_download(stored))?;

        let reconciler = UrlFilterReconciler::new(&self.client, session, &located.site_id);
        let url_filters = run
            .step(PipelineStep::UrlFilters, reconciler.read(&located.ssid.id))
            .await?;

        Ok(WifiState {
            ssid: located.ssid.name.clone(),
            upload_rate_limit,
            download_rate_limit,
            url_filters,
        })
    }

    /// Best-effort logout; skipped once the run is canceled or out of time.
    async fn release(&self, run: &Run<'_>, session: &Session) {
        if run.is_over() {
            return;
        }
        if let Err(e) = run
            .step(PipelineStep::Logout, self.client.logout(session))
            .await
        {
            warn!(error = %e, "controller logout failed");
        }
    }
}
