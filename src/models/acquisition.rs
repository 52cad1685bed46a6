use std::fmt;
use std::path::PathBuf;
use url::Url;

/// One acquisition run's input. Never mutated once the run starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcquisitionRequest {
    /// The protected media URL
    pub resource_url: Url,
    /// Backend proxy that fetches the resource on our behalf, if configured
    pub proxy_endpoint: Option<Url>,
}

impl AcquisitionRequest {
    /// Create a request without a proxy
    pub fn new(resource_url: Url) -> Self {
        AcquisitionRequest {
            resource_url,
            proxy_endpoint: None,
        }
    }

    /// Attach a proxy endpoint
    pub fn with_proxy(mut self, proxy_endpoint: Option<Url>) -> Self {
        self.proxy_endpoint = proxy_endpoint;
        self
    }
}

/// Operator decision once every automated strategy has failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackChoice {
    /// Copy the resource URL for a manual download
    CopyLink,
    /// Open the resource URL in a new, detached browsing context
    OpenInNewContext,
}

impl fmt::Display for FallbackChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FallbackChoice::CopyLink => write!(f, "copy link"),
            FallbackChoice::OpenInNewContext => write!(f, "open in new window"),
        }
    }
}

/// Terminal result of one acquisition run. Exactly one per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionOutcome {
    /// Bytes were fetched and saved to this path
    Delivered(PathBuf),
    /// The URL was handed to the system opener; whether a file was saved is unknown
    Unconfirmed,
    /// Automation gave up and the operator picked a manual route
    UserDeferred(FallbackChoice),
    /// Nothing happened: the run could not start or no decision was obtained
    Abandoned,
}

impl AcquisitionOutcome {
    /// Whether the artifact is known to be on disk
    pub fn is_delivered(&self) -> bool {
        matches!(self, AcquisitionOutcome::Delivered(_))
    }

    /// Path of the saved artifact, if delivered
    pub fn delivered_path(&self) -> Option<&PathBuf> {
        match self {
            AcquisitionOutcome::Delivered(path) => Some(path),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_to_no_proxy() {
        let url = Url::parse("https://v.example.com/video.mp4").unwrap();
        let request = AcquisitionRequest::new(url.clone());
        assert_eq!(request.resource_url, url);
        assert!(request.proxy_endpoint.is_none());

        let proxy = Url::parse("https://api.example.com/download_video").unwrap();
        let request = request.with_proxy(Some(proxy.clone()));
        assert_eq!(request.proxy_endpoint, Some(proxy));
    }

    #[test]
    fn test_outcome_accessors() {
        let outcome = AcquisitionOutcome::Delivered(PathBuf::from("/tmp/a.mp4"));
        assert!(outcome.is_delivered());
        assert_eq!(outcome.delivered_path(), Some(&PathBuf::from("/tmp/a.mp4")));

        assert!(!AcquisitionOutcome::Unconfirmed.is_delivered());
        assert!(AcquisitionOutcome::Abandoned.delivered_path().is_none());
    }
}
