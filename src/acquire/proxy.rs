use async_trait::async_trait;
use serde::Serialize;

use super::strategy::{Strategy, StrategyResult, read_artifact};
use crate::models::AcquisitionRequest;

#[derive(Serialize)]
struct ProxyPayload<'a> {
    video_url: &'a str,
}

/// Ask the backend proxy to fetch the resource for us.
/// Only applies when a proxy endpoint is configured.
pub struct ProxyStrategy {
    client: reqwest::Client,
}

impl ProxyStrategy {
    pub fn new(client: reqwest::Client) -> Self {
        ProxyStrategy { client }
    }
}

#[async_trait]
impl Strategy for ProxyStrategy {
    fn name(&self) -> &'static str {
        "proxy"
    }

    fn applies(&self, request: &AcquisitionRequest) -> bool {
        request.proxy_endpoint.is_some()
    }

    fn announce(&self) -> &'static str {
        "Downloading via server proxy..."
    }

    fn fallback_notice(&self) -> &'static str {
        "Server proxy failed, trying other methods..."
    }

    async fn attempt(&self, request: &AcquisitionRequest) -> StrategyResult {
        let Some(endpoint) = &request.proxy_endpoint else {
            return StrategyResult::NotApplicable;
        };

        let payload = ProxyPayload {
            video_url: request.resource_url.as_str(),
        };
        let response = self.client.post(endpoint.clone()).json(&payload).send().await;
        read_artifact(response).await
    }
}
