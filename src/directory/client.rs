//! Agent directory trait and HTTP client
//!
//! Abstracts the listing operation so the aggregator can run against the
//! real platform API or an in-memory double in tests.

use anyhow::{Context, Result};

use super::types::{AgentRecord, RawAgent};

/// Trait for the agent directory collaborator.
///
/// One listing operation returning all known agents. Invoked once per
/// aggregation pass; a failure here is fatal to the request.
#[async_trait::async_trait]
pub trait AgentDirectory: Send + Sync {
    /// List all known agents
    async fn list_agents(&self) -> Result<Vec<AgentRecord>>;
}

/// HTTP-backed agent directory
pub struct HttpAgentDirectory {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl HttpAgentDirectory {
    /// Create a directory client for the given platform base URL
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn agents_url(&self) -> String {
        format!("{}/v1/agents", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait::async_trait]
impl AgentDirectory for HttpAgentDirectory {
    async fn list_agents(&self) -> Result<Vec<AgentRecord>> {
        let url = self.agents_url();
        tracing::debug!("Listing agents from {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.api_key)
            .header("Content-Type", "application/json")
            .send()
            .await
            .context("Failed to reach agent directory")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("Agent directory returned {}", status);
        }

        let raw: Vec<RawAgent> = response
            .json()
            .await
            .context("Failed to decode agent listing")?;

        let agents: Vec<AgentRecord> = raw.into_iter().map(RawAgent::normalize).collect();
        tracing::info!("Directory listed {} agents", agents.len());

        Ok(agents)
    }
}
