// src/infrastructure/terminal.rs
use crate::application::Confirm;
use anyhow::{Context, Result};
use std::io::{self, BufRead, Write};

/// Confirmation on the controlling terminal, or unconditional with `--yes`.
#[derive(Debug, Clone, Copy)]
pub struct TerminalConfirm {
    assume_yes: bool,
}

impl TerminalConfirm {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Confirm for TerminalConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        match prompt_line(&format!("{prompt} [y/N] ")) {
            Ok(answer) => is_yes(&answer),
            Err(_) => false,
        }
    }
}

/// Prints `label` to stderr and reads one line from stdin.
pub fn prompt_line(label: &str) -> Result<String> {
    let mut stderr = io::stderr();
    write!(stderr, "{label}").context("Failed to write prompt")?;
    stderr.flush().context("Failed to flush prompt")?;

    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read from stdin")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Reads a secret from the terminal without echoing it.
pub fn prompt_password(label: &str) -> Result<String> {
    rpassword::prompt_password(label).context("Failed to read password")
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
