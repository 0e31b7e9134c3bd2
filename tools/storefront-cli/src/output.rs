//! Output formatting for the CLI.

use std::sync::{Mutex, PoisonError};

use console::{style, Term};
use indicatif::{ProgressBar, ProgressStyle};
use storefront_commerce::cart::CartItem;
use storefront_sync::{Notice, Notifier};

/// Output handler for CLI messages.
#[derive(Clone)]
pub struct Output {
    verbose: bool,
    json: bool,
    term: Term,
}

impl Output {
    /// Create a new output handler.
    pub fn new(verbose: bool, json: bool) -> Self {
        Self {
            verbose,
            json,
            term: Term::stderr(),
        }
    }

    /// Print an info message.
    pub fn info(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("ℹ").blue(), msg);
    }

    /// Print a success message.
    pub fn success(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("{} {}", style("✓").green(), msg);
    }

    /// Print a warning message.
    pub fn warn(&self, msg: &str) {
        if self.json {
            return;
        }
        eprintln!("{} {}", style("⚠").yellow(), msg);
    }

    /// Print an error message.
    pub fn error(&self, msg: &str) {
        if self.json {
            eprintln!("{}", serde_json::json!({ "error": msg }));
            return;
        }
        eprintln!("{} {}", style("✗").red(), style(msg).red());
    }

    /// Print a debug message (only in verbose mode).
    pub fn debug(&self, msg: &str) {
        if !self.verbose || self.json {
            return;
        }
        eprintln!("{} {}", style("→").dim(), style(msg).dim());
    }

    /// Print a header/title.
    pub fn header(&self, msg: &str) {
        if self.json {
            return;
        }
        println!("\n{}", style(msg).bold().underlined());
    }

    /// Print JSON output.
    pub fn json<T: serde::Serialize>(&self, value: &T) {
        if let Ok(json) = serde_json::to_string_pretty(value) {
            println!("{}", json);
        }
    }

    /// Print a key-value pair.
    pub fn kv(&self, key: &str, value: &str) {
        if self.json {
            return;
        }
        println!("  {}: {}", style(key).dim(), value);
    }

    /// Print a list item.
    pub fn list_item(&self, item: &str) {
        if self.json {
            return;
        }
        println!("  {} {}", style("•").dim(), item);
    }

    /// Print a table row.
    pub fn table_row(&self, cols: &[&str], widths: &[usize]) {
        if self.json {
            return;
        }
        let formatted: Vec<String> = cols
            .iter()
            .zip(widths.iter())
            .map(|(col, width)| format!("{:width$}", col, width = width))
            .collect();
        println!("  {}", formatted.join("  "));
    }

    /// Create a spinner for indeterminate progress.
    pub fn spinner(&self, msg: &str) -> ProgressBar {
        if self.json || !self.term.is_term() {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) =
            ProgressStyle::default_spinner().template("{spinner:.green} {msg}")
        {
            pb.set_style(spinner_style);
        }
        pb.set_message(msg.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }

    /// Check if JSON mode is enabled.
    pub fn is_json(&self) -> bool {
        self.json
    }
}

/// Shows notices on the terminal and a spinner while the cart is busy.
pub struct ConsoleNotifier {
    output: Output,
    spinner: Mutex<Option<ProgressBar>>,
}

impl ConsoleNotifier {
    pub fn new(output: Output) -> Self {
        Self {
            output,
            spinner: Mutex::new(None),
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, notice: Notice) {
        tracing::debug!(kind = notice.kind(), "Notice");
        let message = notice.message();
        if notice.is_error() {
            self.output.warn(&message);
        } else {
            self.output.success(&message);
        }
    }

    fn set_busy(&self, busy: bool) {
        let mut spinner = self.spinner.lock().unwrap_or_else(PoisonError::into_inner);
        if busy {
            if spinner.is_none() {
                *spinner = Some(self.output.spinner("Updating cart..."));
            }
        } else if let Some(pb) = spinner.take() {
            pb.finish_and_clear();
        }
    }
}

/// Quantity with the steps still open, e.g. `- 3 +`.
pub fn stepper(item: &CartItem) -> String {
    let minus = if item.can_decrease() { '-' } else { ' ' };
    let plus = if item.can_increase() { '+' } else { ' ' };
    format!("{} {} {}", minus, item.quantity, plus)
}

/// Stock label for a variant.
pub fn stock_badge(stock: u32) -> String {
    match stock {
        0 => style("out of stock").red().to_string(),
        1..=5 => style(format!("{} left", stock)).yellow().to_string(),
        _ => style(format!("{} in stock", stock)).green().to_string(),
    }
}
