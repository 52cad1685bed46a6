use async_trait::async_trait;
use reqwest::header::{REFERER, USER_AGENT};

use super::strategy::{Strategy, StrategyResult, read_artifact};
use crate::models::AcquisitionRequest;

/// Fetch the resource straight from its origin, presenting a referer and a
/// desktop browser user-agent to get past simple hotlink checks
pub struct DirectStrategy {
    client: reqwest::Client,
    referer: String,
    user_agent: String,
}

impl DirectStrategy {
    pub fn new(client: reqwest::Client, referer: String, user_agent: String) -> Self {
        DirectStrategy {
            client,
            referer,
            user_agent,
        }
    }
}

#[async_trait]
impl Strategy for DirectStrategy {
    fn name(&self) -> &'static str {
        "direct"
    }

    fn announce(&self) -> &'static str {
        "Downloading directly..."
    }

    fn fallback_notice(&self) -> &'static str {
        "Direct download failed, trying fallback..."
    }

    async fn attempt(&self, request: &AcquisitionRequest) -> StrategyResult {
        let response = self
            .client
            .get(request.resource_url.clone())
            .header(REFERER, self.referer.as_str())
            .header(USER_AGENT, self.user_agent.as_str())
            .send()
            .await;
        read_artifact(response).await
    }
}
