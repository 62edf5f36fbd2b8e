// ── URL filter reconciliation ──
//
// The controller keeps one rule per (policy, URL set) and binds it to any
// number of SSIDs through `sourceIds`. A request speaks per-SSID logical
// filters instead: "block these URLs on this SSID" or "stop blocking them".
// Planning is pure over an in-memory copy of the rule list; the reconciler
// issues the resulting operations one at a time and folds each one back into
// that copy, so the projection it returns reflects the post-mutation state.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use omada_api::models::UrlFilterData;
use omada_api::{OmadaClient, Session};

/// `sourceType` value binding a rule to SSIDs.
pub const SSID_SOURCE_TYPE: i32 = 2;

/// Rule policy as stored on the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterPolicy {
    /// Block the listed URLs (filtering enabled).
    Block,
    /// Allow the listed URLs (filtering bypassed).
    Allow,
}

impl FilterPolicy {
    pub fn code(self) -> i32 {
        match self {
            Self::Block => 0,
            Self::Allow => 1,
        }
    }
}

/// Logical, per-SSID view of a URL filter rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UrlFilter {
    pub name: String,
    #[serde(rename = "bypassFilter", default)]
    pub bypass: bool,
    #[serde(default)]
    pub urls: Vec<String>,
}

/// One controller mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterOp {
    Create(UrlFilterData),
    Update { id: String, rule: UrlFilterData },
    Delete { id: String },
}

/// Result of reconciling one SSID.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    pub filters: Vec<UrlFilter>,
    pub updated: bool,
}

fn binds_ssid(rule: &UrlFilterData, ssid_id: &str) -> bool {
    rule.source_type == Some(SSID_SOURCE_TYPE) && rule.source_ids.iter().any(|id| id == ssid_id)
}

fn sorted(urls: &[String]) -> Vec<&str> {
    let mut urls: Vec<&str> = urls.iter().map(String::as_str).collect();
    urls.sort_unstable();
    urls
}

/// An active SSID-scoped blocking rule over exactly `urls` (duplicates count).
fn is_block_candidate(rule: &UrlFilterData, urls: &[&str]) -> bool {
    rule.source_type == Some(SSID_SOURCE_TYPE)
        && rule.status == Some(true)
        && rule.policy == Some(FilterPolicy::Block.code())
        && sorted(&rule.urls) == urls
}

/// The rules visible to `ssid_id`, in logical form.
pub fn project(rules: &[UrlFilterData], ssid_id: &str) -> Vec<UrlFilter> {
    rules
        .iter()
        .filter(|rule| binds_ssid(rule, ssid_id))
        .map(|rule| UrlFilter {
            name: rule.name.clone(),
            bypass: rule.policy == Some(FilterPolicy::Allow.code()),
            urls: rule.urls.clone(),
        })
        .collect()
}

/// Operations needed to bring one requested filter into effect for `ssid_id`.
pub fn plan_filter(rules: &[UrlFilterData], ssid_id: &str, requested: &UrlFilter) -> Vec<FilterOp> {
    let wanted = sorted(&requested.urls);
    let candidates = rules.iter().filter(|rule| is_block_candidate(rule, &wanted));

    if requested.bypass {
        return candidates
            .filter(|rule| binds_ssid(rule, ssid_id))
            .filter_map(|rule| {
                let Some(id) = rule.id.clone() else {
                    warn!(name = %rule.name, "matching url filter has no id; skipping");
                    return None;
                };
                let mut trimmed = rule.clone();
                trimmed.source_ids.retain(|sid| sid != ssid_id);
                if trimmed.source_ids.is_empty() {
                    Some(FilterOp::Delete { id })
                } else {
                    Some(FilterOp::Update { id, rule: trimmed })
                }
            })
            .collect();
    }

    let candidates: Vec<&UrlFilterData> = candidates.collect();
    if candidates.iter().any(|rule| binds_ssid(rule, ssid_id)) {
        return Vec::new();
    }

    match candidates.first() {
        Some(rule) => {
            let Some(id) = rule.id.clone() else {
                warn!(name = %rule.name, "matching url filter has no id; skipping");
                return Vec::new();
            };
            let mut extended = (*rule).clone();
            extended.source_ids.push(ssid_id.to_owned());
            vec![FilterOp::Update { id, rule: extended }]
        }
        None => vec![FilterOp::Create(UrlFilterData {
            id: None,
            name: requested.name.clone(),
            status: Some(true),
            policy: Some(FilterPolicy::Block.code()),
            source_type: Some(SSID_SOURCE_TYPE),
            source_ids: vec![ssid_id.to_owned()],
            urls: requested.urls.clone(),
            extra: serde_json::Map::new(),
        })],
    }
}

/// Fold an issued operation into the in-memory rule list.
///
/// `created_id` is the id the controller returned for a `Create`, if any.
pub fn apply_op(rules: &mut Vec<UrlFilterData>, op: &FilterOp, created_id: Option<String>) {
    match op {
        FilterOp::Create(rule) => {
            let mut rule = rule.clone();
            rule.id = created_id;
            rules.push(rule);
        }
        FilterOp::Update { id, rule } => {
            if let Some(slot) = rules.iter_mut().find(|r| r.id.as_deref() == Some(id)) {
                *slot = rule.clone();
            }
        }
        FilterOp::Delete { id } => rules.retain(|r| r.id.as_deref() != Some(id)),
    }
}

/// Plan every requested filter in order against an evolving copy of `rules`.
///
/// Returns the operations and the resulting rule list.
pub fn plan(
    mut rules: Vec<UrlFilterData>,
    ssid_id: &str,
    requested: &[UrlFilter],
) -> (Vec<FilterOp>, Vec<UrlFilterData>) {
    let mut ops = Vec::new();
    for filter in requested {
        for op in plan_filter(&rules, ssid_id, filter) {
            apply_op(&mut rules, &op, None);
            ops.push(op);
        }
    }
    (ops, rules)
}

// ── Reconciler ───────────────────────────────────────────────────

/// Applies requested URL filters for one SSID of one site.
pub struct UrlFilterReconciler<'a> {
    client: &'a OmadaClient,
    session: &'a Session,
    site_id: &'a str,
}

impl<'a> UrlFilterReconciler<'a> {
    pub fn new(client: &'a OmadaClient, session: &'a Session, site_id: &'a str) -> Self {
        Self {
            client,
            session,
            site_id,
        }
    }

    /// Current filters visible to `ssid_id`, without mutating anything.
    pub async fn read(&self, ssid_id: &str) -> Result<Vec<UrlFilter>, omada_api::Error> {
        let rules = self
            .client
            .list_url_filters(self.session, self.site_id)
            .await?;
        Ok(project(&rules, ssid_id))
    }

    /// Reconcile `requested` for `ssid_id`; `None` is the read path.
    pub async fn reconcile(
        &self,
        ssid_id: &str,
        requested: Option<&[UrlFilter]>,
    ) -> Result<Reconciled, omada_api::Error> {
        let Some(requested) = requested else {
            return Ok(Reconciled {
                filters: self.read(ssid_id).await?,
                updated: false,
            });
        };

        let mut rules = self
            .client
            .list_url_filters(self.session, self.site_id)
            .await?;
        let mut updated = false;

        for filter in requested {
            let ops = plan_filter(&rules, ssid_id, filter);
            if ops.is_empty() {
                debug!(name = %filter.name, bypass = filter.bypass, "url filter already in effect");
            }
            for op in ops {
                let created_id = self.issue(&op).await?;
                apply_op(&mut rules, &op, created_id);
                updated = true;
            }
        }

        if updated {
            info!(site_id = self.site_id, ssid_id, "url filters reconciled");
        }
        Ok(Reconciled {
            filters: project(&rules, ssid_id),
            updated,
        })
    }

    async fn issue(&self, op: &FilterOp) -> Result<Option<String>, omada_api::Error> {
        match op {
            FilterOp::Create(rule) => {
                self.client
                    .create_url_filter(self.session, self.site_id, rule)
                    .await
            }
            FilterOp::Update { id, rule } => {
                self.client
                    .update_url_filter(self.session, self.site_id, id, rule)
                    .await?;
                Ok(None)
            }
            FilterOp::Delete { id } => {
                self.client
                    .delete_url_filter(self.session, self.site_id, id)
                    .await?;
                Ok(None)
            }
        }
    }
}
