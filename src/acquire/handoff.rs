use async_trait::async_trait;
use std::sync::Arc;

use super::error::AcquireError;
use super::strategy::{Strategy, StrategyResult};
use crate::launcher::Launcher;
use crate::models::AcquisitionRequest;

/// Hand the raw URL to the system opener and let it download.
///
/// No headers can be attached at this layer and the outcome cannot be
/// observed, so a started hand-off is only ever `Unconfirmed`.
pub struct HandOffStrategy {
    launcher: Arc<dyn Launcher>,
}

impl HandOffStrategy {
    pub fn new(launcher: Arc<dyn Launcher>) -> Self {
        HandOffStrategy { launcher }
    }
}

#[async_trait]
impl Strategy for HandOffStrategy {
    fn name(&self) -> &'static str {
        "hand-off"
    }

    fn announce(&self) -> &'static str {
        "Trying direct link download..."
    }

    fn fallback_notice(&self) -> &'static str {
        "Direct link download failed"
    }

    fn unconfirmed_notice(&self) -> &'static str {
        "If the download did not start, it may have been blocked by hotlink protection"
    }

    async fn attempt(&self, request: &AcquisitionRequest) -> StrategyResult {
        match self.launcher.hand_off(&request.resource_url) {
            Ok(()) => {
                log::debug!(
                    "{}; {} launcher",
                    AcquireError::UncertainDelivery,
                    self.launcher.name()
                );
                StrategyResult::Unconfirmed
            }
            Err(e) => StrategyResult::Failure(AcquireError::ConstructionFailure(e.to_string())),
        }
    }
}
