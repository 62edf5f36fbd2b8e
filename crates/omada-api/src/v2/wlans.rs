// v2 API WLAN group and SSID endpoints

use tracing::{debug, info};

use crate::auth::Session;
use crate::error::Error;
use crate::v2::client::OmadaClient;
use crate::v2::models::{ListResult, SsidData, SsidUpdate, Wlan};
use crate::v2::sites::PAGE_SIZE;

impl OmadaClient {
    /// List WLAN groups of a site.
    ///
    /// `GET .../sites/{siteId}/setting/wlans`
    pub async fn list_wlans(&self, session: &Session, site_id: &str) -> Result<Vec<Wlan>, Error> {
        let url = self.site_url(session, site_id, &["setting", "wlans"])?;
        debug!(site_id, "listing wlan groups");
        let result: Option<ListResult<Wlan>> = self.get(session, url).await?;
        Ok(result.map(ListResult::into_vec).unwrap_or_default())
    }

    /// List SSIDs of a WLAN group.
    ///
    /// `GET .../sites/{siteId}/setting/wlans/{wlanId}/ssids`
    pub async fn list_ssids(
        &self,
        session: &Session,
        site_id: &str,
        wlan_id: &str,
    ) -> Result<Vec<SsidData>, Error> {
        let mut url = self.site_url(session, site_id, &["setting", "wlans", wlan_id, "ssids"])?;
        url.query_pairs_mut()
            .append_pair("currentPage", "1")
            .append_pair("currentPageSize", PAGE_SIZE);
        debug!(site_id, wlan_id, "listing ssids");
        let result: Option<ListResult<SsidData>> = self.get(session, url).await?;
        Ok(result.map(ListResult::into_vec).unwrap_or_default())
    }

    /// Apply a partial update to one SSID.
    ///
    /// `PATCH .../sites/{siteId}/setting/wlans/{wlanId}/ssids/{ssidName}`
    pub async fn update_ssid(
        &self,
        session: &Session,
        site_id: &str,
        wlan_id: &str,
        ssid_name: &str,
        patch: &SsidUpdate,
    ) -> Result<(), Error> {
        let url = self.site_url(
            session,
            site_id,
            &["setting", "wlans", wlan_id, "ssids", ssid_name],
        )?;
        info!(site_id, wlan_id, ssid_name, schedule_id = %patch.schedule_id, "updating ssid");
        let _: Option<serde_json::Value> = self.patch(session, url, patch).await?;
        Ok(())
    }
}
