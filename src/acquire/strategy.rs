use async_trait::async_trait;

use super::error::AcquireError;
use crate::models::AcquisitionRequest;

/// Result of one strategy attempt
#[derive(Debug)]
pub enum StrategyResult {
    /// The artifact bytes were obtained
    Success(Vec<u8>),
    /// The attempt completed but its effect cannot be observed
    Unconfirmed,
    /// The attempt failed; the chain moves on
    Failure(AcquireError),
    /// The strategy does not apply to this request
    NotApplicable,
}

/// One self-contained way of acquiring the resource.
///
/// Strategies never return errors: every cause is normalized into
/// [`StrategyResult::Failure`]. Status text is owned by the strategy but
/// emitted by the engine.
#[async_trait]
pub trait Strategy: Send + Sync {
    /// Short name for logs
    fn name(&self) -> &'static str;

    /// Whether the strategy can run for this request
    fn applies(&self, _request: &AcquisitionRequest) -> bool {
        true
    }

    /// Status shown while the attempt runs
    fn announce(&self) -> &'static str;

    /// Status shown when the attempt failed and a later strategy follows
    fn fallback_notice(&self) -> &'static str;

    /// Status shown when the attempt ended without a confirmable effect
    fn unconfirmed_notice(&self) -> &'static str {
        "The download may not have started"
    }

    /// Run the attempt
    async fn attempt(&self, request: &AcquisitionRequest) -> StrategyResult;
}

/// Turn an HTTP exchange into a strategy result: success status plus a
/// readable body is the artifact, anything else is a failure
pub(crate) async fn read_artifact(response: reqwest::Result<reqwest::Response>) -> StrategyResult {
    let response = match response {
        Ok(response) => response,
        Err(e) => return StrategyResult::Failure(e.into()),
    };

    let status = response.status();
    if !status.is_success() {
        return StrategyResult::Failure(AcquireError::ServerFailure {
            status: status.as_u16(),
        });
    }

    match response.bytes().await {
        Ok(body) => StrategyResult::Success(body.to_vec()),
        Err(e) => StrategyResult::Failure(e.into()),
    }
}
