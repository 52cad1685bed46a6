//! Human-in-the-loop surface: blocking prompts and notices.

use std::io::{self, BufRead, BufReader, IsTerminal, Write};
use std::sync::Mutex;

use crate::models::FallbackChoice;

/// The person driving the client
pub trait Operator: Send + Sync {
    /// Ask for the manual fallback route. `None` when nobody can answer.
    fn choose_fallback(&self, prompt: &str) -> Option<FallbackChoice>;

    /// Show a message that needs no answer
    fn notify(&self, message: &str);
}

/// Operator on the controlling terminal.
///
/// Prompts and notices go to the writer (stderr by default) so stdout stays
/// clean for command output.
pub struct ConsoleOperator<R, W> {
    input: Mutex<R>,
    output: Mutex<W>,
    interactive: bool,
}

impl ConsoleOperator<BufReader<io::Stdin>, io::Stderr> {
    /// Operator on stdin/stderr; prompts are skipped when stdin is not a tty
    pub fn stdio() -> Self {
        let interactive = io::stdin().is_terminal();
        ConsoleOperator::new(BufReader::new(io::stdin()), io::stderr(), interactive)
    }
}

impl<R: BufRead, W: Write> ConsoleOperator<R, W> {
    pub fn new(input: R, output: W, interactive: bool) -> Self {
        ConsoleOperator {
            input: Mutex::new(input),
            output: Mutex::new(output),
            interactive,
        }
    }
}

/// Map an answer line to a choice; OK (the default) copies the link
fn parse_choice(line: &str) -> Option<FallbackChoice> {
    match line.trim().to_lowercase().as_str() {
        "" | "c" | "copy" | "y" | "yes" => Some(FallbackChoice::CopyLink),
        "o" | "open" | "n" | "no" => Some(FallbackChoice::OpenInNewContext),
        _ => None,
    }
}

impl<R: BufRead + Send, W: Write + Send> Operator for ConsoleOperator<R, W> {
    fn choose_fallback(&self, prompt: &str) -> Option<FallbackChoice> {
        if !self.interactive {
            log::warn!("No interactive terminal, skipping fallback prompt");
            return None;
        }

        let mut input = self.input.lock().ok()?;
        let mut output = self.output.lock().ok()?;

        let _ = writeln!(output, "{}", prompt);
        loop {
            let _ = write!(output, "[C]opy link / [o]pen in new window: ");
            let _ = output.flush();

            let mut line = String::new();
            match input.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {
                    if let Some(choice) = parse_choice(&line) {
                        return Some(choice);
                    }
                    let _ = writeln!(output, "Please answer 'c' or 'o'.");
                }
                Err(e) => {
                    log::warn!("Failed to read fallback answer: {}", e);
                    return None;
                }
            }
        }
    }

    fn notify(&self, message: &str) {
        if let Ok(mut output) = self.output.lock() {
            let _ = writeln!(output, "{}", message);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn operator(answers: &str, interactive: bool) -> ConsoleOperator<Cursor<Vec<u8>>, Vec<u8>> {
        ConsoleOperator::new(Cursor::new(answers.as_bytes().to_vec()), Vec::new(), interactive)
    }

    fn written(op: ConsoleOperator<Cursor<Vec<u8>>, Vec<u8>>) -> String {
        String::from_utf8(op.output.into_inner().unwrap()).unwrap()
    }

    #[test]
    fn test_parse_choice() {
        assert_eq!(parse_choice("\n"), Some(FallbackChoice::CopyLink));
        assert_eq!(parse_choice(" C \n"), Some(FallbackChoice::CopyLink));
        assert_eq!(parse_choice("open"), Some(FallbackChoice::OpenInNewContext));
        assert_eq!(parse_choice("maybe"), None);
    }

    #[test]
    fn test_reprompts_until_valid() {
        let op = operator("what\no\n", true);
        assert_eq!(
            op.choose_fallback("All downloads failed"),
            Some(FallbackChoice::OpenInNewContext)
        );
        let out = written(op);
        assert!(out.starts_with("All downloads failed\n"));
        assert!(out.contains("Please answer 'c' or 'o'."));
    }

    #[test]
    fn test_eof_means_no_answer() {
        let op = operator("", true);
        assert_eq!(op.choose_fallback("prompt"), None);
    }

    #[test]
    fn test_non_interactive_never_prompts() {
        let op = operator("c\n", false);
        assert_eq!(op.choose_fallback("prompt"), None);
        assert!(written(op).is_empty());
    }

    #[test]
    fn test_notify_writes_line() {
        let op = operator("", false);
        op.notify("Copied to clipboard");
        assert_eq!(written(op), "Copied to clipboard\n");
    }
}
