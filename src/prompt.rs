//! Blocking terminal prompts.
//!
//! Used when a decision needs a confirmation or a reason the actor did not
//! pass on the command line. With stdin closed every prompt reads as "no" or
//! as an empty answer, which the decision model then rejects.
use crate::decision::Confirm;
use std::io::{self, BufRead, Write};

pub struct TerminalPrompt {
    assume_yes: bool,
}

impl TerminalPrompt {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }

    /// Ask for a line of text; `None` when stdin is closed or unreadable.
    pub fn ask_text(&mut self, label: &str) -> Option<String> {
        eprint!("{label}: ");
        io::stderr().flush().ok()?;
        read_line(&mut io::stdin().lock())
    }

    /// Use `provided` when present, otherwise ask.
    pub fn text_or_ask(&mut self, provided: Option<String>, label: &str) -> Option<String> {
        match provided {
            Some(value) => Some(value),
            None => self.ask_text(label),
        }
    }
}

impl Confirm for TerminalPrompt {
    fn confirm(&mut self, title: &str, detail: &str) -> bool {
        if self.assume_yes {
            tracing::debug!(title, "confirmation assumed by --yes");
            return true;
        }
        eprint!("{title}. {detail} [y/N]: ");
        if io::stderr().flush().is_err() {
            return false;
        }
        read_line(&mut io::stdin().lock())
            .map(|answer| is_yes(&answer))
            .unwrap_or(false)
    }
}

fn read_line(reader: &mut impl BufRead) -> Option<String> {
    let mut line = String::new();
    match reader.read_line(&mut line) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}
