use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

/// Callback invoked with the new latest status (`None` when cleared)
pub type StatusRenderer = Box<dyn Fn(Option<&str>) + Send + Sync>;

/// Live progress surface for one trigger: an in-progress flag plus the latest
/// status line.
///
/// Only the latest message is kept. The acquisition engine is the sole writer
/// while a run is active.
pub struct StatusBoard {
    in_progress: AtomicBool,
    last: Mutex<Option<String>>,
    renderer: Option<StatusRenderer>,
}

impl StatusBoard {
    /// Create a board that only stores state
    pub fn new() -> Self {
        StatusBoard {
            in_progress: AtomicBool::new(false),
            last: Mutex::new(None),
            renderer: None,
        }
    }

    /// Create a board that also renders every change
    pub fn with_renderer(renderer: StatusRenderer) -> Self {
        StatusBoard {
            renderer: Some(renderer),
            ..StatusBoard::new()
        }
    }

    /// Whether a run currently holds the board
    pub fn is_in_progress(&self) -> bool {
        self.in_progress.load(Ordering::SeqCst)
    }

    /// Latest status message, if any
    pub fn current(&self) -> Option<String> {
        self.last.lock().ok().and_then(|last| last.clone())
    }

    /// Replace the latest status message
    pub fn emit(&self, message: &str) {
        log::info!("{}", message);
        if let Ok(mut last) = self.last.lock() {
            *last = Some(message.to_string());
        }
        if let Some(render) = &self.renderer {
            render(Some(message));
        }
    }

    /// Clear the latest status message
    pub fn clear(&self) {
        let had_message = match self.last.lock() {
            Ok(mut last) => last.take().is_some(),
            Err(_) => false,
        };
        if had_message {
            if let Some(render) = &self.renderer {
                render(None);
            }
        }
    }

    /// Claim the board for a run.
    ///
    /// Returns `None` if another run already holds it. The previous status is
    /// cleared so the new run starts from a clean slate.
    pub fn begin(&self) -> Option<RunGuard<'_>> {
        if self
            .in_progress
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return None;
        }
        self.clear();
        Some(RunGuard {
            board: self,
            settled: false,
        })
    }
}

impl Default for StatusBoard {
    fn default() -> Self {
        StatusBoard::new()
    }
}

/// Holds the in-progress flag for one run and releases it on drop.
///
/// A run that is dropped before `settle` (cancelled mid-flight) also has its
/// status cleared immediately.
pub struct RunGuard<'a> {
    board: &'a StatusBoard,
    settled: bool,
}

impl RunGuard<'_> {
    /// Release the in-progress flag, leaving the last status visible
    pub fn settle(mut self) {
        self.settled = true;
        self.board.in_progress.store(false, Ordering::SeqCst);
    }
}

impl Drop for RunGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            self.board.in_progress.store(false, Ordering::SeqCst);
            self.board.clear();
        }
    }
}
