use std::io::{self, BufRead, IsTerminal, Write};

use crate::error::{Error, Result};

/// Terminal styling, decided once at startup instead of mutated globally.
#[derive(Debug, Clone, Copy)]
pub struct PromptStyle {
    pub color: bool,
}

impl PromptStyle {
    pub fn detect(no_color: bool) -> Self {
        Self {
            color: !no_color && io::stdout().is_terminal(),
        }
    }

    fn label(&self, text: &str) -> String {
        if self.color {
            format!("\x1b[1;36m{}\x1b[0m", text)
        } else {
            text.to_string()
        }
    }
}

fn read_line() -> Result<String> {
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Ask for an optional value; empty input means "no answer".
pub fn ask(style: &PromptStyle, label: &str) -> Result<Option<String>> {
    print!("{}: ", style.label(label));
    io::stdout().flush()?;
    let answer = read_line()?;
    Ok(if answer.is_empty() { None } else { Some(answer) })
}

/// Ask for a required value; empty input is fatal, not re-prompted.
pub fn ask_required(style: &PromptStyle, label: &str) -> Result<String> {
    ask(style, label)?.ok_or_else(|| Error::Input(format!("{} is required", label)))
}

/// Yes/no question with a default for empty input.
pub fn confirm(style: &PromptStyle, label: &str, default: bool) -> Result<bool> {
    let hint = if default { "[Y/n]" } else { "[y/N]" };
    print!("{} {}: ", style.label(label), hint);
    io::stdout().flush()?;
    let answer = read_line()?;
    Ok(match answer.to_lowercase().as_str() {
        "" => default,
        "y" | "yes" => true,
        _ => false,
    })
}
