// ── Write-and-verify ──
//
// One partial-update write: build the minimal document for a path, POST it,
// then find the one result in the panel's batched reply that belongs to the
// requested property. The panel echoes unrelated properties in the same
// batch, so neither list position nor HTTP success says anything about the
// property that was written.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use tswlink_api::{ActionResult, DeviceClient, Endpoint, UpdateResponse};

use crate::error::CoreError;
use crate::path::ValuePath;

/// Where a write is submitted, and what the panel reports on success there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WriteTarget {
    /// `POST /Device`; success is `StatusId == 0`.
    Device,
    /// `POST /Device/ThirdPartyApplications`; success is `StatusId == 1`.
    ThirdPartyApplications,
}

impl WriteTarget {
    pub fn endpoint(self) -> Endpoint {
        match self {
            Self::Device => Endpoint::Device,
            Self::ThirdPartyApplications => Endpoint::ThirdPartyApplications,
        }
    }

    /// The `StatusId` that means the property was applied.
    pub fn success_status(self) -> i64 {
        match self {
            Self::Device => 0,
            Self::ThirdPartyApplications => 1,
        }
    }
}

/// The result entry the panel reported for the written property.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WriteResult {
    /// The panel's own dotted path for the changed object.
    pub path: String,
    pub property: String,
    /// `None` when the panel omitted the status code.
    pub status_id: Option<i64>,
    pub status_info: Option<String>,
}

impl From<&ActionResult> for WriteResult {
    fn from(r: &ActionResult) -> Self {
        Self {
            path: r.path.clone(),
            property: r.property.clone(),
            status_id: r.status_id,
            status_info: r.status_info.clone(),
        }
    }
}

/// Outcome of a write whose HTTP exchange completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriteOutcome {
    /// The matching result carries the success status.
    Accepted(WriteResult),
    /// The matching result carries any other status.
    Rejected(WriteResult),
    /// The reply could not be decoded or held no result for the property.
    Unmatched { detail: String },
}

impl WriteOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Accepted(_))
    }

    /// Human-readable detail: the panel's status info, or why no result
    /// could be matched.
    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::Accepted(r) | Self::Rejected(r) => r.status_info.as_deref(),
            Self::Unmatched { detail } => Some(detail.as_str()),
        }
    }

    pub fn result(&self) -> Option<&WriteResult> {
        match self {
            Self::Accepted(r) | Self::Rejected(r) => Some(r),
            Self::Unmatched { .. } => None,
        }
    }
}

/// Submits single-property writes. Cheap to clone.
#[derive(Debug, Clone)]
pub struct WriteGateway {
    client: DeviceClient,
}

impl WriteGateway {
    pub fn new(client: DeviceClient) -> Self {
        Self { client }
    }

    /// Write `value` at `path` and report what the panel said about it.
    ///
    /// Only transport failures and non-2xx statuses are returned as `Err`.
    /// A reply that is not JSON, or that has no entry for the property,
    /// becomes [`WriteOutcome::Unmatched`].
    pub async fn write(
        &self,
        target: WriteTarget,
        path: &ValuePath,
        value: Value,
    ) -> Result<WriteOutcome, CoreError> {
        let payload = path.build_partial(value);
        debug!(%path, ?target, %payload, "writing device property");

        let response = match self.client.post_update(target.endpoint(), &payload).await {
            Ok(response) => response,
            Err(tswlink_api::Error::Deserialization { message, body }) => {
                debug!(%path, error = %message, %body, "undecodable write response");
                return Ok(WriteOutcome::Unmatched {
                    detail: format!("unexpected response format: {message}"),
                });
            }
            Err(err) => {
                let err = CoreError::from(err);
                debug!(%path, error = %err, "write request failed");
                return Err(err);
            }
        };

        let outcome = match_result(&response, target, path);
        debug!(%path, ?outcome, "write outcome");
        Ok(outcome)
    }
}

/// Locate the result for `path` in a batched reply and classify it.
///
/// A result belongs to the request when its `Property` is the path's leaf and
/// its `Path` is either the full dotted path or its dotted parent; the panel
/// uses both shapes depending on subsystem. The first such result decides.
pub fn match_result(response: &UpdateResponse, target: WriteTarget, path: &ValuePath) -> WriteOutcome {
    let full = path.to_string();
    let parent = path.parent_dotted();

    let Some(found) = response
        .results()
        .find(|r| r.property == path.leaf() && (r.path == full || r.path == parent))
    else {
        return WriteOutcome::Unmatched {
            detail: format!("unexpected response format: no result for {full}"),
        };
    };

    let result = WriteResult::from(found);
    if found.status_id == Some(target.success_status()) {
        WriteOutcome::Accepted(result)
    } else {
        WriteOutcome::Rejected(result)
    }
}
