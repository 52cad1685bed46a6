#![allow(dead_code)]

use anyhow::{Result, anyhow};
use std::io;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

use dylink::acquire::{ArtifactSaver, Collaborators, Engine, StatusBoard};
use dylink::clipboard::{ClipboardBackend, ClipboardWriter};
use dylink::launcher::Launcher;
use dylink::models::FallbackChoice;
use dylink::operator::Operator;
use dylink::storage::AcquisitionConfig;

/// Shared, cloneable list of recorded strings
#[derive(Clone, Default)]
pub struct Journal(Arc<Mutex<Vec<String>>>);

impl Journal {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

pub struct RecordingLauncher {
    pub hand_offs: Journal,
    pub opened: Journal,
    pub fail_hand_off: bool,
}

impl Launcher for RecordingLauncher {
    fn hand_off(&self, url: &Url) -> io::Result<()> {
        if self.fail_hand_off {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no opener installed"));
        }
        self.hand_offs.push(url.as_str());
        Ok(())
    }

    fn open_detached(&self, url: &Url) -> io::Result<()> {
        self.opened.push(url.as_str());
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

pub struct ScriptedOperator {
    pub choice: Option<FallbackChoice>,
    pub prompts: Journal,
    pub notices: Journal,
}

impl Operator for ScriptedOperator {
    fn choose_fallback(&self, prompt: &str) -> Option<FallbackChoice> {
        self.prompts.push(prompt);
        self.choice
    }

    fn notify(&self, message: &str) {
        self.notices.push(message);
    }
}

pub struct RecordingClipboard {
    pub writes: Journal,
    pub fail: bool,
}

impl ClipboardBackend for RecordingClipboard {
    fn write_text(&mut self, text: &str) -> Result<()> {
        if self.fail {
            return Err(anyhow!("clipboard access denied"));
        }
        self.writes.push(text);
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}

/// Engine wired to recording doubles, plus handles to inspect them
pub struct Harness {
    pub engine: Engine,
    pub board: StatusBoard,
    pub statuses: Journal,
    pub hand_offs: Journal,
    pub opened: Journal,
    pub prompts: Journal,
    pub notices: Journal,
    pub clipboard: Journal,
}

pub struct HarnessOptions {
    pub fail_hand_off: bool,
    pub choice: Option<FallbackChoice>,
    pub request_timeout_secs: u64,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        HarnessOptions {
            fail_hand_off: false,
            choice: Some(FallbackChoice::CopyLink),
            request_timeout_secs: 5,
        }
    }
}

/// Config with delays short enough for tests
pub fn fast_config() -> AcquisitionConfig {
    AcquisitionConfig {
        request_timeout_secs: 5,
        retry_delay_ms: 5,
        status_linger_ms: 5,
        ..AcquisitionConfig::default()
    }
}

pub fn harness(download_dir: &Path, options: HarnessOptions) -> Harness {
    let statuses = Journal::default();
    let hand_offs = Journal::default();
    let opened = Journal::default();
    let prompts = Journal::default();
    let notices = Journal::default();
    let clipboard = Journal::default();

    let collaborators = Collaborators {
        saver: ArtifactSaver::new(download_dir.to_path_buf()),
        launcher: Arc::new(RecordingLauncher {
            hand_offs: hand_offs.clone(),
            opened: opened.clone(),
            fail_hand_off: options.fail_hand_off,
        }),
        operator: Arc::new(ScriptedOperator {
            choice: options.choice,
            prompts: prompts.clone(),
            notices: notices.clone(),
        }),
        clipboard: ClipboardWriter::new(
            Some(Box::new(RecordingClipboard {
                writes: clipboard.clone(),
                fail: false,
            })),
            Box::new(RecordingClipboard {
                writes: clipboard.clone(),
                fail: false,
            }),
        ),
    };

    let config = AcquisitionConfig {
        request_timeout_secs: options.request_timeout_secs,
        ..fast_config()
    };
    let engine = Engine::standard(&config, collaborators).expect("client builds");

    let sink = statuses.clone();
    let board = StatusBoard::with_renderer(Box::new(move |status: Option<&str>| {
        sink.push(status.unwrap_or("<cleared>"));
    }));

    Harness {
        engine,
        board,
        statuses,
        hand_offs,
        opened,
        prompts,
        notices,
        clipboard,
    }
}

/// Upper bound for a run whose delays come from `fast_config`
pub const RUN_DEADLINE: Duration = Duration::from_secs(10);

pub fn dir_entries(dir: &Path) -> Vec<String> {
    match std::fs::read_dir(dir) {
        Ok(entries) => entries
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect(),
        Err(_) => Vec::new(),
    }
}
