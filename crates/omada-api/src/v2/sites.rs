// v2 API site endpoints
//
// Site listing is controller-scoped (`/{omadacId}/api/v2/sites`), unlike
// everything below it which lives under `/sites/{siteId}/...`.

use tracing::debug;

use crate::auth::Session;
use crate::error::Error;
use crate::v2::client::OmadaClient;
use crate::v2::models::{ListResult, Site};

/// Page size requested for list endpoints; large enough to avoid paging.
pub(crate) const PAGE_SIZE: &str = "1000";

impl OmadaClient {
    /// List all sites visible to the session.
    ///
    /// `GET /{omadacId}/api/v2/sites`
    pub async fn list_sites(&self, session: &Session) -> Result<Vec<Site>, Error> {
        let mut url = self.api_url(session.controller_id(), &["sites"])?;
        url.query_pairs_mut()
            .append_pair("currentPage", "1")
            .append_pair("currentPageSize", PAGE_SIZE);
        debug!("listing sites");
        let result: Option<ListResult<Site>> = self.get(session, url).await?;
        Ok(result.map(ListResult::into_vec).unwrap_or_default())
    }
}
