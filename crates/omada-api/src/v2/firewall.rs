// v2 API URL filter rules
//
// `.../sites/{siteId}/setting/firewall/urlfilters[/{id}]`

use tracing::{debug, info};

use crate::auth::Session;
use crate::error::Error;
use crate::v2::client::OmadaClient;
use crate::v2::models::{CreatedUrlFilter, ListResult, UrlFilterData};
use crate::v2::sites::PAGE_SIZE;

const URL_FILTERS: [&str; 3] = ["setting", "firewall", "urlfilters"];

impl OmadaClient {
    /// List every URL filter rule of a site.
    pub async fn list_url_filters(
        &self,
        session: &Session,
        site_id: &str,
    ) -> Result<Vec<UrlFilterData>, Error> {
        let mut url = self.site_url(session, site_id, &URL_FILTERS)?;
        url.query_pairs_mut()
            .append_pair("currentPage", "1")
            .append_pair("currentPageSize", PAGE_SIZE);
        debug!(site_id, "listing url filters");
        let result: Option<ListResult<UrlFilterData>> = self.get(session, url).await?;
        Ok(result.map(ListResult::into_vec).unwrap_or_default())
    }

    /// Create a URL filter rule. Returns the new id if the controller echoes one.
    pub async fn create_url_filter(
        &self,
        session: &Session,
        site_id: &str,
        filter: &UrlFilterData,
    ) -> Result<Option<String>, Error> {
        let url = self.site_url(session, site_id, &URL_FILTERS)?;
        info!(site_id, name = %filter.name, "creating url filter");
        let result: Option<CreatedUrlFilter> = self.post(session, url, filter).await?;
        Ok(result.and_then(|r| r.id))
    }

    /// Replace a URL filter rule.
    pub async fn update_url_filter(
        &self,
        session: &Session,
        site_id: &str,
        filter_id: &str,
        filter: &UrlFilterData,
    ) -> Result<(), Error> {
        let url = self.site_url(
            session,
            site_id,
            &[URL_FILTERS[0], URL_FILTERS[1], URL_FILTERS[2], filter_id],
        )?;
        info!(site_id, filter_id, sources = ?filter.source_ids, "updating url filter");
        let _: Option<serde_json::Value> = self.patch(session, url, filter).await?;
        Ok(())
    }

    /// Delete a URL filter rule.
    pub async fn delete_url_filter(
        &self,
        session: &Session,
        site_id: &str,
        filter_id: &str,
    ) -> Result<(), Error> {
        let url = self.site_url(
            session,
            site_id,
            &[URL_FILTERS[0], URL_FILTERS[1], URL_FILTERS[2], filter_id],
        )?;
        info!(site_id, filter_id, "deleting url filter");
        let _: Option<serde_json::Value> = self.delete(session, url).await?;
        Ok(())
    }
}
