use anyhow::Result;

/// Trait for clipboard backend abstraction
/// Implemented by the system clipboard (arboard) and the OSC 52 terminal fallback
/// Backends are write-only
pub trait ClipboardBackend: Send {
    /// Write text to clipboard
    fn write_text(&mut self, text: &str) -> Result<()>;

    /// Get the backend name (for logging/debugging)
    fn name(&self) -> &'static str;
}
