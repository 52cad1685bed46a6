use anyhow::{Context, Result};

use super::backend::ClipboardBackend;
use super::holder::SelectionKeeper;

/// Who owns the selection after a write
enum Owner {
    InProcess(arboard::Clipboard),
    Detached(Box<dyn SelectionKeeper>),
}

/// System clipboard backend using arboard
/// Initialization fails on headless sessions, which is how capability probing
/// detects that the primary path is unavailable
pub struct SystemBackend {
    owner: Owner,
}

impl SystemBackend {
    /// Connect to the system clipboard
    pub fn new() -> Result<Self> {
        let clipboard = arboard::Clipboard::new().context("Failed to open system clipboard")?;
        log::debug!("SystemBackend initialized successfully");
        Ok(SystemBackend {
            owner: owner_for(clipboard),
        })
    }

    /// Backend whose writes are handed to `keeper`
    pub fn detached(keeper: Box<dyn SelectionKeeper>) -> Self {
        SystemBackend {
            owner: Owner::Detached(keeper),
        }
    }
}

// X11 and Wayland drop the selection when the owning process exits, and the
// CLI exits right after copying
#[cfg(target_os = "linux")]
fn owner_for(clipboard: arboard::Clipboard) -> Owner {
    match super::holder::HolderProcess::current_exe() {
        Ok(holder) => Owner::Detached(Box::new(holder)),
        Err(e) => {
            log::warn!("Clipboard holder unavailable, copy may not outlive dylink: {:#}", e);
            Owner::InProcess(clipboard)
        }
    }
}

#[cfg(not(target_os = "linux"))]
fn owner_for(clipboard: arboard::Clipboard) -> Owner {
    Owner::InProcess(clipboard)
}

impl ClipboardBackend for SystemBackend {
    fn write_text(&mut self, text: &str) -> Result<()> {
        match &mut self.owner {
            Owner::InProcess(clipboard) => clipboard
                .set_text(text.to_owned())
                .context("System clipboard rejected text")?,
            Owner::Detached(keeper) => keeper.keep(text)?,
        }
        log::debug!("Wrote {} bytes text to system clipboard", text.len());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "system"
    }
}
