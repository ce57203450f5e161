// Panel HTTP client
//
// Wraps `reqwest::Client` with /Device URL construction, status checking,
// and tolerant body decoding. Bodies are read as text first so that a
// decoding failure can carry the raw payload for debugging.

use serde::Serialize;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::models::UpdateResponse;
use crate::relaxed;
use crate::transport::TransportConfig;

/// Panel resources that accept partial-update POSTs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Endpoint {
    /// `/Device`: the full state tree; general property writes.
    Device,
    /// `/Device/ThirdPartyApplications`: EMS and other integrations.
    ThirdPartyApplications,
}

impl Endpoint {
    /// Path relative to the panel root.
    pub fn path(self) -> &'static str {
        match self {
            Self::Device => "Device",
            Self::ThirdPartyApplications => "Device/ThirdPartyApplications",
        }
    }
}

/// Raw HTTP client for one panel.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct DeviceClient {
    http: reqwest::Client,
    base_url: Url,
}

impl DeviceClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the panel root, e.g. `http://192.168.1.40`.
    pub fn new(base_url: Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self { http, base_url })
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// The panel base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the full URL of an endpoint: `{base}/{endpoint}`.
    pub fn endpoint_url(&self, endpoint: Endpoint) -> Result<Url, Error> {
        let full = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            endpoint.path()
        );
        Ok(Url::parse(&full)?)
    }

    // ── Operations ───────────────────────────────────────────────────

    /// Fetch the panel's complete state tree.
    ///
    /// `GET /Device`
    pub async fn fetch_state(&self) -> Result<Value, Error> {
        let url = self.endpoint_url(Endpoint::Device)?;
        debug!(%url, "GET");

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;
        let body = Self::checked_body(resp).await?;
        debug!(bytes = body.len(), "received device state");

        relaxed::from_str(&body).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body,
        })
    }

    /// Submit a partial-update document and decode the result batch.
    ///
    /// `POST /Device` or `POST /Device/ThirdPartyApplications`
    pub async fn post_update(
        &self,
        endpoint: Endpoint,
        body: &impl Serialize,
    ) -> Result<UpdateResponse, Error> {
        let url = self.endpoint_url(endpoint)?;
        debug!(%url, "POST");

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(Error::Transport)?;
        let text = Self::checked_body(resp).await?;
        debug!(body = %text, "received update response");

        let value = relaxed::from_str(&text).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: text.clone(),
        })?;
        serde_json::from_value(value).map_err(|e| Error::Deserialization {
            message: e.to_string(),
            body: text,
        })
    }

    /// Read the body, turning non-2xx statuses into `Error::Http`.
    async fn checked_body(resp: reqwest::Response) -> Result<String, Error> {
        let status = resp.status();
        let body = resp.text().await.map_err(Error::Transport)?;

        if status.is_success() {
            Ok(body)
        } else {
            Err(Error::Http {
                status: status.as_u16(),
                body,
            })
        }
    }
}
