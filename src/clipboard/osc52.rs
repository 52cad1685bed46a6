use anyhow::{Context, Result};
use base64::Engine;
use std::io::{self, Write};

use super::backend::ClipboardBackend;

const OSC52_OPEN: &[u8] = b"\x1b]52;c;";
const OSC52_CLOSE: &[u8] = b"\x07";

/// Legacy clipboard backend using the OSC 52 terminal escape sequence
/// The terminal emulator sets the clipboard; there is no acknowledgement, so a
/// successful write only means the bytes reached the terminal
pub struct Osc52Backend {
    out: Box<dyn Write + Send>,
}

impl Osc52Backend {
    /// Write sequences to the given sink
    pub fn new(out: Box<dyn Write + Send>) -> Self {
        Osc52Backend { out }
    }

    /// Write sequences to stderr, which stays on the terminal when stdout is piped
    pub fn stderr() -> Self {
        Osc52Backend::new(Box::new(io::stderr()))
    }
}

/// An open OSC 52 sequence.
///
/// Dropping it always writes the terminator and flushes, so the terminal is
/// never left inside an unterminated escape sequence, even when the payload
/// write fails halfway.
struct Osc52Sequence<'a> {
    out: &'a mut (dyn Write + Send),
}

impl<'a> Osc52Sequence<'a> {
    fn open(out: &'a mut (dyn Write + Send)) -> io::Result<Self> {
        out.write_all(OSC52_OPEN)?;
        Ok(Osc52Sequence { out })
    }

    fn payload(&mut self, text: &str) -> io::Result<()> {
        let encoded = base64::engine::general_purpose::STANDARD.encode(text);
        self.out.write_all(encoded.as_bytes())
    }
}

impl Drop for Osc52Sequence<'_> {
    fn drop(&mut self) {
        let _ = self.out.write_all(OSC52_CLOSE);
        let _ = self.out.flush();
    }
}

impl ClipboardBackend for Osc52Backend {
    fn write_text(&mut self, text: &str) -> Result<()> {
        let mut sequence =
            Osc52Sequence::open(self.out.as_mut()).context("Failed to start OSC 52 sequence")?;
        sequence
            .payload(text)
            .context("Failed to write OSC 52 payload")?;
        drop(sequence);

        log::debug!("Wrote {} bytes text via OSC 52", text.len());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "osc52"
    }
}
