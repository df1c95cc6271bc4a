//! Owners document and endpoint URL

use crate::error::OwnersError;
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Who may approve a pull request and how many LGTMs it needs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owners {
    /// Identities allowed to grant or revoke the gate label
    #[serde(default)]
    pub approvers: BTreeSet<String>,

    /// Identities whose review counts towards the LGTM label
    #[serde(default)]
    pub reviewers: BTreeSet<String>,

    /// Exact number of LGTMs required before the gate label may be added
    #[serde(rename = "needsLgtm")]
    pub needs_lgtm: u32,
}

impl Owners {
    pub fn new(approvers: &[&str], needs_lgtm: u32) -> Self {
        let approvers: BTreeSet<String> = approvers.iter().map(|a| a.to_string()).collect();
        Self {
            reviewers: approvers.clone(),
            approvers,
            needs_lgtm,
        }
    }

    pub fn is_approver(&self, login: &str) -> bool {
        self.approvers.contains(login)
    }
}

/// The owners service answers either with the bare document or wrapped in
/// a `{"data": ..., "message": ...}` envelope.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum OwnersBody {
    Envelope { data: Owners },
    Bare(Owners),
}

/// Decode a response body
pub(crate) fn parse_owners(body: &[u8]) -> Result<Owners, serde_json::Error> {
    let owners = match serde_json::from_slice::<OwnersBody>(body)? {
        OwnersBody::Envelope { data } => data,
        OwnersBody::Bare(owners) => owners,
    };
    Ok(owners)
}

/// Build `<endpoint>?org=<org>&repo=<repo>&pr=<number>`
///
/// Query pairs already present on the endpoint are kept.
pub fn owners_url(endpoint: &str, org: &str, repo: &str, number: u64) -> Result<Url, OwnersError> {
    let mut url = Url::parse(endpoint).map_err(|e| OwnersError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })?;
    url.query_pairs_mut()
        .append_pair("org", org)
        .append_pair("repo", repo)
        .append_pair("pr", &number.to_string());
    Ok(url)
}
