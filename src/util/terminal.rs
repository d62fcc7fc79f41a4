//! Operator input.

use crate::core::context::Prompt;
use anyhow::{Context, Result};
use dialoguer::Input;
use std::io::{self, BufRead, IsTerminal};

/// Reads answers from the terminal, or from stdin when it is piped.
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn ask(&self, question: &str) -> Result<String> {
        if io::stdin().is_terminal() {
            return Input::<String>::new()
                .with_prompt(question)
                .allow_empty(true)
                .interact_text()
                .context("read confirmation");
        }

        eprintln!("{}", question);
        let mut line = String::new();
        io::stdin()
            .lock()
            .read_line(&mut line)
            .context("read confirmation from stdin")?;
        Ok(line)
    }
}
