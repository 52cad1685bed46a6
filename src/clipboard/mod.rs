pub mod backend;
pub mod holder;
pub mod osc52;
pub mod system;

pub use backend::ClipboardBackend;
pub use holder::{HolderProcess, SelectionKeeper, serve_held_selection};
pub use osc52::Osc52Backend;
pub use system::SystemBackend;

use crate::acquire::AcquireError;
use crate::operator::Operator;

/// Confirmation shown after every copy, whichever backend ran
pub const COPIED_MESSAGE: &str = "Copied to clipboard";

/// Copies text to the clipboard and always confirms to the operator.
///
/// The primary backend is chosen by probing at construction. When it is
/// missing, or rejects a write, the legacy backend takes that write. Callers
/// never see an error and cannot tell which backend ran.
pub struct ClipboardWriter {
    primary: Option<Box<dyn ClipboardBackend>>,
    legacy: Box<dyn ClipboardBackend>,
}

impl ClipboardWriter {
    /// Build a writer from explicit backends
    pub fn new(primary: Option<Box<dyn ClipboardBackend>>, legacy: Box<dyn ClipboardBackend>) -> Self {
        ClipboardWriter { primary, legacy }
    }

    /// Probe the system clipboard and fall back to OSC 52 when it is unavailable
    pub fn probe() -> Self {
        let primary: Option<Box<dyn ClipboardBackend>> = match SystemBackend::new() {
            Ok(backend) => Some(Box::new(backend)),
            Err(e) => {
                log::info!("{}", AcquireError::ClipboardUnavailable(format!("{:#}", e)));
                None
            }
        };
        ClipboardWriter::new(primary, Box::new(Osc52Backend::stderr()))
    }

    /// Name of the backend that will be tried first
    #[cfg(test)]
    fn preferred_backend(&self) -> &'static str {
        self.primary
            .as_ref()
            .map_or_else(|| self.legacy.name(), |b| b.name())
    }

    /// Copy `text` and confirm to the operator
    pub fn copy_to_clipboard(&mut self, text: &str, operator: &dyn Operator) {
        let primary_result = self
            .primary
            .as_mut()
            .map(|backend| (backend.name(), backend.write_text(text)));

        match primary_result {
            Some((name, Ok(()))) => log::debug!("Copied via {} backend", name),
            Some((name, Err(e))) => {
                log::warn!(
                    "{} ({} backend), using fallback",
                    AcquireError::ClipboardUnavailable(format!("{:#}", e)),
                    name
                );
                self.write_legacy(text);
            }
            None => self.write_legacy(text),
        }

        operator.notify(COPIED_MESSAGE);
    }

    fn write_legacy(&mut self, text: &str) {
        // Best effort: the legacy path has no way to report whether the copy landed
        match self.legacy.write_text(text) {
            Ok(()) => log::debug!("Copied via {} backend", self.legacy.name()),
            Err(e) => log::warn!("{} backend failed: {:#}", self.legacy.name(), e),
        }
    }
}
