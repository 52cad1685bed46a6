//! Resilient acquisition of hotlink-protected media.
//!
//! An [`Engine`] walks an ordered list of [`Strategy`] values, one at a time,
//! until one yields bytes (saved through the shared [`ArtifactSaver`]), one
//! ends in a qualified success, or all fail and the operator picks a manual
//! route.

pub mod delivery;
pub mod direct;
pub mod error;
pub mod handoff;
pub mod proxy;
pub mod status;
pub mod strategy;

pub use delivery::{ArtifactSaver, artifact_filename};
pub use direct::DirectStrategy;
pub use error::AcquireError;
pub use handoff::HandOffStrategy;
pub use proxy::ProxyStrategy;
pub use status::{RunGuard, StatusBoard};
pub use strategy::{Strategy, StrategyResult};

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::clipboard::ClipboardWriter;
use crate::launcher::Launcher;
use crate::models::{AcquisitionOutcome, AcquisitionRequest, FallbackChoice};
use crate::operator::Operator;
use crate::storage::AcquisitionConfig;

const PROCESSING: &str = "Processing video file...";
const SUCCEEDED: &str = "Download succeeded!";
const LINK_COPIED: &str = "Link copied to clipboard";
const OPENED: &str = "Opened video in a new window";

const FALLBACK_PROMPT: &str = concat!(
    "All download methods failed, probably because of hotlink protection.\n\n",
    "Choose:\n",
    "  copy - copy the link and download it manually\n",
    "  open - open the video in a new window",
);

const MANUAL_DOWNLOAD_ADVICE: &str = concat!(
    "The video link is on your clipboard.\n\n",
    "Ways to download it:\n",
    "  1. Use a download manager\n",
    "  2. Use a browser extension\n",
    "  3. Open it and save manually\n",
    "  4. Configure a backend proxy (api_base_url)",
);

/// Fixed delays around a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Pause after a failure notice so it is readable before the next attempt
    pub retry_delay: Duration,
    /// How long the final status stays up before it is cleared
    pub status_linger: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Timing {
            retry_delay: Duration::from_millis(1000),
            status_linger: Duration::from_millis(3000),
        }
    }
}

/// Everything an engine talks to besides the network
pub struct Collaborators {
    pub saver: ArtifactSaver,
    pub launcher: Arc<dyn Launcher>,
    pub operator: Arc<dyn Operator>,
    pub clipboard: ClipboardWriter,
}

/// Drives the strategy chain for one request at a time
pub struct Engine {
    strategies: Vec<Box<dyn Strategy>>,
    saver: ArtifactSaver,
    launcher: Arc<dyn Launcher>,
    operator: Arc<dyn Operator>,
    clipboard: Mutex<ClipboardWriter>,
    timing: Timing,
}

impl Engine {
    /// Build an engine over an explicit strategy order
    pub fn new(strategies: Vec<Box<dyn Strategy>>, collaborators: Collaborators, timing: Timing) -> Self {
        Engine {
            strategies,
            saver: collaborators.saver,
            launcher: collaborators.launcher,
            operator: collaborators.operator,
            clipboard: Mutex::new(collaborators.clipboard),
            timing,
        }
    }

    /// The production chain: backend proxy, direct fetch, system hand-off
    pub fn standard(settings: &AcquisitionConfig, collaborators: Collaborators) -> Result<Self, reqwest::Error> {
        // Idle limits only: a video body may stream for longer than any fixed deadline
        let idle = Duration::from_secs(settings.request_timeout_secs);
        let client = reqwest::Client::builder()
            .connect_timeout(idle)
            .read_timeout(idle)
            .build()?;

        let strategies: Vec<Box<dyn Strategy>> = vec![
            Box::new(ProxyStrategy::new(client.clone())),
            Box::new(DirectStrategy::new(
                client,
                settings.referer.clone(),
                settings.user_agent.clone(),
            )),
            Box::new(HandOffStrategy::new(Arc::clone(&collaborators.launcher))),
        ];

        Ok(Engine::new(strategies, collaborators, settings.timing()))
    }

    /// Names of the strategies in the order they are tried
    #[cfg(test)]
    fn strategy_names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name()).collect()
    }

    /// Acquire `request.resource_url`, reporting progress on `status`.
    ///
    /// Always resolves to exactly one outcome. The in-progress flag is
    /// released before the final status lingers for `status_linger` and is
    /// then cleared.
    pub async fn acquire(&self, request: &AcquisitionRequest, status: &StatusBoard) -> AcquisitionOutcome {
        let Some(guard) = status.begin() else {
            log::warn!(
                "Download already in progress, ignoring {}",
                request.resource_url
            );
            return AcquisitionOutcome::Abandoned;
        };

        log::info!("Acquiring {}", request.resource_url);
        let outcome = self.run_chain(request, status).await;
        log::info!("Acquisition of {} ended: {:?}", request.resource_url, outcome);

        guard.settle();
        tokio::time::sleep(self.timing.status_linger).await;
        // A newer run owns the board now; leave its status alone
        if !status.is_in_progress() {
            status.clear();
        }

        outcome
    }

    async fn run_chain(&self, request: &AcquisitionRequest, status: &StatusBoard) -> AcquisitionOutcome {
        let last = self.strategies.len().saturating_sub(1);

        for (index, strategy) in self.strategies.iter().enumerate() {
            if !strategy.applies(request) {
                log::debug!("Skipping {} strategy: not applicable", strategy.name());
                continue;
            }

            status.emit(strategy.announce());
            let failure = match strategy.attempt(request).await {
                StrategyResult::Success(bytes) => match self.deliver(&bytes, status) {
                    Ok(outcome) => return outcome,
                    Err(e) => e,
                },
                StrategyResult::Unconfirmed => {
                    status.emit(strategy.unconfirmed_notice());
                    return AcquisitionOutcome::Unconfirmed;
                }
                StrategyResult::NotApplicable => {
                    log::debug!("Skipping {} strategy: not applicable", strategy.name());
                    continue;
                }
                StrategyResult::Failure(e) => e,
            };

            log::info!("{} strategy failed: {}", strategy.name(), failure);
            if index < last {
                status.emit(strategy.fallback_notice());
                tokio::time::sleep(self.timing.retry_delay).await;
            }
        }

        status.clear();
        self.interactive_fallback(request, status)
    }

    /// Shared delivery step for every strategy that produced bytes
    fn deliver(&self, bytes: &[u8], status: &StatusBoard) -> Result<AcquisitionOutcome, AcquireError> {
        status.emit(PROCESSING);
        let path = self.saver.deliver(bytes)?;
        status.emit(SUCCEEDED);
        Ok(AcquisitionOutcome::Delivered(path))
    }

    fn interactive_fallback(&self, request: &AcquisitionRequest, status: &StatusBoard) -> AcquisitionOutcome {
        let url = &request.resource_url;

        let Some(choice) = self.operator.choose_fallback(FALLBACK_PROMPT) else {
            log::warn!("No fallback chosen for {}, giving up", url);
            return AcquisitionOutcome::Abandoned;
        };
        log::info!("Operator chose to {}", choice);

        match choice {
            FallbackChoice::CopyLink => {
                self.clipboard
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .copy_to_clipboard(url.as_str(), self.operator.as_ref());
                self.operator.notify(MANUAL_DOWNLOAD_ADVICE);
                status.emit(LINK_COPIED);
            }
            FallbackChoice::OpenInNewContext => match self.launcher.open_detached(url) {
                Ok(()) => status.emit(OPENED),
                Err(e) => {
                    log::warn!("Failed to open {} with {} launcher: {}", url, self.launcher.name(), e);
                    status.emit("Could not open a new window");
                }
            },
        }

        AcquisitionOutcome::UserDeferred(choice)
    }
}
