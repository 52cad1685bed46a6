use anyhow::{Context, Result, anyhow};
use std::ffi::OsString;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Hidden subcommand the holder process runs
pub const HOLD_COMMAND: &str = "hold-clipboard";

/// Keeps a clipboard selection owned after the writing process has exited
pub trait SelectionKeeper: Send {
    fn keep(&self, text: &str) -> Result<()>;
}

/// Hands the text to a detached process that owns the selection until another
/// application replaces it
pub struct HolderProcess {
    program: PathBuf,
    args: Vec<OsString>,
}

impl HolderProcess {
    pub fn new(program: impl Into<PathBuf>, args: impl IntoIterator<Item = impl Into<OsString>>) -> Self {
        HolderProcess {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Re-run this binary with the hidden hold subcommand
    pub fn current_exe() -> Result<Self> {
        let exe = std::env::current_exe().context("Failed to get current executable path")?;
        Ok(HolderProcess::new(exe, [HOLD_COMMAND]))
    }
}

impl SelectionKeeper for HolderProcess {
    #[allow(clippy::zombie_processes)]
    fn keep(&self, text: &str) -> Result<()> {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::null());
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            // New process group so the holder survives the terminal closing the session
            command.process_group(0);
        }

        let mut child = command.spawn().context("Failed to spawn clipboard holder")?;
        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| anyhow!("Clipboard holder has no stdin"))?;
        stdin
            .write_all(text.as_bytes())
            .context("Failed to hand text to clipboard holder")?;
        // EOF tells the holder the text is complete; it is never waited on
        drop(stdin);

        log::debug!("Clipboard holder {} took {} bytes", child.id(), text.len());
        Ok(())
    }
}

/// Body of the holder process: read the text from stdin, own the selection,
/// and return once another application takes it over
#[cfg(target_os = "linux")]
pub fn serve_held_selection() -> Result<()> {
    use arboard::SetExtLinux;
    use std::io::Read;

    let mut text = String::new();
    std::io::stdin()
        .read_to_string(&mut text)
        .context("Failed to read text for clipboard holder")?;

    arboard::Clipboard::new()
        .context("Failed to open system clipboard")?
        .set()
        .wait()
        .text(text)
        .context("System clipboard rejected text")?;
    Ok(())
}

#[cfg(not(target_os = "linux"))]
pub fn serve_held_selection() -> Result<()> {
    Err(anyhow!("The clipboard holder is only used on Linux"))
}
