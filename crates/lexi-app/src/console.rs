use std::io::{self, Write};
use std::time::Duration;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

const BUSY_TICK: Duration = Duration::from_secs(1);

#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    #[error("interrupted")]
    Interrupted,

    #[error("end of input")]
    Eof,

    #[error("console I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Interaction primitives the card controller drives
#[async_trait]
pub trait Console: Send + Sync {
    /// Shows `items` under `label` and returns the index of the chosen one.
    async fn select(&self, label: &str, items: &[String]) -> Result<usize, ConsoleError>;

    /// Reads a line of text, `default` being kept when nothing is typed.
    async fn prompt(&self, label: &str, default: &str) -> Result<String, ConsoleError>;

    /// Completes once the user asked to stop the session.
    async fn interrupted(&self);

    /// Starts a progress indicator running until `stop` is cancelled.
    /// The returned handle completes once the indicator is fully stopped.
    fn busy(&self, stop: CancellationToken) -> JoinHandle<()>;

    fn print(&self, text: &str);
}

/// Line-oriented console over the process stdin/stdout.
///
/// Ctrl-C is watched for the whole session, not only while a line is read.
/// Must be created inside the tokio runtime.
pub struct TerminalConsole {
    lines: Mutex<Lines<BufReader<Stdin>>>,
    interrupt: CancellationToken,
}

impl TerminalConsole {
    pub fn new() -> Self {
        let interrupt = CancellationToken::new();

        let token = interrupt.clone();
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::warn!("Interrupted by user");
                    token.cancel();
                }
                Err(e) => tracing::error!("Unable to listen for Ctrl-C: {e}"),
            }
        });

        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
            interrupt,
        }
    }

    async fn read_line(&self, prefix: &str) -> Result<String, ConsoleError> {
        write_out(prefix)?;

        let mut lines = self.lines.lock().await;

        tokio::select! {
            line = lines.next_line() => match line? {
                Some(line) => Ok(line),
                None => Err(ConsoleError::Eof),
            },
            _ = self.interrupt.cancelled() => Err(ConsoleError::Interrupted),
        }
    }
}

impl Default for TerminalConsole {
    fn default() -> Self {
        Self::new()
    }
}

fn write_out(text: &str) -> io::Result<()> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    stdout.flush()
}

/// 1-based choice typed by the user, `None` when it names no item.
fn parse_choice(input: &str, count: usize) -> Option<usize> {
    match input.trim().parse::<usize>() {
        Ok(n) if (1..=count).contains(&n) => Some(n - 1),
        _ => None,
    }
}

#[async_trait]
impl Console for TerminalConsole {
    async fn select(&self, label: &str, items: &[String]) -> Result<usize, ConsoleError> {
        if items.is_empty() {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "nothing to select").into());
        }

        let mut menu = format!(">> {label}\n");
        for (i, item) in items.iter().enumerate() {
            menu.push_str(&format!("  {:>2}) {item}\n", i + 1));
        }
        write_out(&menu)?;

        loop {
            let input = self.read_line("> ").await?;
            if let Some(index) = parse_choice(&input, items.len()) {
                return Ok(index);
            }
            write_out(&format!("Type a number between 1 and {}\n", items.len()))?;
        }
    }

    async fn prompt(&self, label: &str, default: &str) -> Result<String, ConsoleError> {
        let prefix = if default.is_empty() {
            format!("{label}: ")
        } else {
            format!("{label} [{default}]: ")
        };

        let input = self.read_line(&prefix).await?;
        let input = input.trim();

        if input.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(input.to_string())
        }
    }

    async fn interrupted(&self) {
        self.interrupt.cancelled().await
    }

    fn busy(&self, stop: CancellationToken) -> JoinHandle<()> {
        // Dots would only pollute redirected output
        let visible = atty::is(atty::Stream::Stdout);

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(BUSY_TICK);
            ticker.tick().await;
            let mut ticked = false;

            loop {
                tokio::select! {
                    _ = stop.cancelled() => break,
                    _ = ticker.tick() => {
                        if visible {
                            if let Err(e) = write_out(".") {
                                tracing::error!("Failed to write busy indicator: {e}");
                            }
                            ticked = true;
                        }
                    }
                }
            }

            if ticked && let Err(e) = write_out("\n") {
                tracing::error!("Failed to write busy indicator: {e}");
            }
        })
    }

    fn print(&self, text: &str) {
        if let Err(e) = write_out(&format!("{text}\n")) {
            tracing::error!("Failed to write to console: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn choices_are_one_based() {
        assert_eq!(parse_choice("1", 3), Some(0));
        assert_eq!(parse_choice(" 3 ", 3), Some(2));
    }

    #[test]
    fn out_of_range_or_garbage_is_refused() {
        assert_eq!(parse_choice("0", 3), None);
        assert_eq!(parse_choice("4", 3), None);
        assert_eq!(parse_choice("two", 3), None);
        assert_eq!(parse_choice("", 3), None);
    }
}
