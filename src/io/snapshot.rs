//! Snapshot acquisition from the gate device
//!
//! The device exposes a `/gates` HTTP endpoint returning the latest
//! reading per gate as JSON with string-encoded fields. The adapter
//! translates that wire shape into engine observations; unparsable
//! fields survive as flagged observations rather than failing the fetch.

use crate::domain::types::{GatesResponse, RawObservation};
use crate::infra::config::Config;
use anyhow::Context;
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// Injected fetch capability for the poll driver
#[async_trait]
pub trait SnapshotSource: Send + Sync {
    async fn fetch(&self) -> anyhow::Result<Vec<RawObservation>>;
}

pub struct HttpSnapshotSource {
    // Client is built once so connections are pooled across polls
    client: reqwest::Client,
    url: String,
}

impl HttpSnapshotSource {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms()))
            .http1_only()
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self { client, url: config.source_url().to_string() })
    }
}

#[async_trait]
impl SnapshotSource for HttpSnapshotSource {
    async fn fetch(&self) -> anyhow::Result<Vec<RawObservation>> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .context("gates request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("gates request returned {}", status);
        }

        let body: GatesResponse =
            response.json().await.context("failed to decode gates response")?;

        debug!(gates = body.gates.len(), "gates_snapshot_received");
        Ok(body.gates.into_iter().map(|g| g.into_observation()).collect())
    }
}
