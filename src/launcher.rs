//! Hands URLs to the desktop's default handler.

use std::io;
use url::Url;

/// Opens URLs outside this process.
///
/// Neither call can observe what the handler does with the URL; `Ok` only
/// means the handler was started.
pub trait Launcher: Send + Sync {
    /// Ask the system to fetch `url` itself (browser download hand-off)
    fn hand_off(&self, url: &Url) -> io::Result<()>;

    /// Show `url` in a new browsing context that holds no handle back to us
    fn open_detached(&self, url: &Url) -> io::Result<()>;

    /// Launcher name (for logging/debugging)
    fn name(&self) -> &'static str;
}

/// Launcher backed by the platform opener (`xdg-open`, `open`, `start`)
pub struct SystemLauncher;

impl Launcher for SystemLauncher {
    fn hand_off(&self, url: &Url) -> io::Result<()> {
        // Detached so the opener outlives us and shares no stdio
        open::that_detached(url.as_str())?;
        log::debug!("Handed {} to the system opener", url);
        Ok(())
    }

    fn open_detached(&self, url: &Url) -> io::Result<()> {
        open::that_detached(url.as_str())?;
        log::debug!("Opened {} in a new window", url);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "system"
    }
}
