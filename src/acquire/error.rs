use thiserror::Error;

/// Why a single acquisition attempt did not produce a confirmed artifact.
///
/// The driver never branches on the variant: any of these advances the chain.
/// They only shape log lines and status text.
#[derive(Debug, Error)]
pub enum AcquireError {
    /// Network unreachable, TLS failure, connection reset, timeout
    #[error("transport failure: {0}")]
    TransportFailure(String),

    /// Proxy or origin answered with a non-success status
    #[error("server answered with status {status}")]
    ServerFailure { status: u16 },

    /// The hand-off ran but its effect cannot be observed
    #[error("delivery could not be confirmed")]
    UncertainDelivery,

    /// The download trigger could not be built or invoked
    #[error("could not start download hand-off: {0}")]
    ConstructionFailure(String),

    /// Staging or persisting the downloaded bytes failed
    #[error("could not save downloaded file: {0}")]
    DeliveryFailure(#[from] std::io::Error),

    /// Primary clipboard capability missing or rejecting
    #[error("system clipboard unavailable: {0}")]
    ClipboardUnavailable(String),
}

impl From<reqwest::Error> for AcquireError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => AcquireError::ServerFailure {
                status: status.as_u16(),
            },
            None => AcquireError::TransportFailure(err.to_string()),
        }
    }
}
