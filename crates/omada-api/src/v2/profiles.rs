// v2 API time range profiles

use tracing::{debug, info};

use crate::auth::Session;
use crate::error::Error;
use crate::v2::client::OmadaClient;
use crate::v2::models::{CreatedProfile, ListResult, TimeRange};

impl OmadaClient {
    /// List time range profiles of a site.
    ///
    /// `GET .../sites/{siteId}/setting/profiles/timeranges`
    pub async fn list_time_ranges(
        &self,
        session: &Session,
        site_id: &str,
    ) -> Result<Vec<TimeRange>, Error> {
        let url = self.site_url(session, site_id, &["setting", "profiles", "timeranges"])?;
        debug!(site_id, "listing time ranges");
        let result: Option<ListResult<TimeRange>> = self.get(session, url).await?;
        Ok(result.map(ListResult::into_vec).unwrap_or_default())
    }

    /// Create a time range profile and return its id.
    ///
    /// `POST .../sites/{siteId}/setting/profiles/timeranges`
    pub async fn create_time_range(
        &self,
        session: &Session,
        site_id: &str,
        range: &TimeRange,
    ) -> Result<String, Error> {
        let url = self.site_url(session, site_id, &["setting", "profiles", "timeranges"])?;
        info!(site_id, name = %range.name, "creating time range");
        let result: Option<CreatedProfile> = self.post(session, url, range).await?;
        result
            .and_then(|r| r.profile_id)
            .ok_or(Error::MissingResult {
                endpoint: "setting/profiles/timeranges",
            })
    }
}
