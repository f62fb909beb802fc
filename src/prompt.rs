//! Interactive prompt primitives.
//!
//! Three operations cover every stage of the wizard: free text with a
//! default, a closed choice list, and masked secret input.

use std::io::{self, Write};

use anyhow::Result;

pub trait Prompt {
    /// Free-text input; empty input takes the default.
    fn ask(&mut self, label: &str, default: &str) -> Result<String>;

    /// Closed choice list; input is the option number, empty takes the
    /// default.
    fn choose(&mut self, label: &str, options: &[&str], default: usize) -> Result<String>;

    /// Masked input, never echoed.
    fn secret(&mut self, label: &str) -> Result<String>;
}

/// Stdin/stdout prompter used by the real command.
pub struct StdPrompt;

impl Prompt for StdPrompt {
    fn ask(&mut self, label: &str, default: &str) -> Result<String> {
        if default.is_empty() {
            print!("{label}: ");
        } else {
            print!("{label} [{default}]: ");
        }
        io::stdout().flush()?;

        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        let input = input.trim();
        Ok(if input.is_empty() {
            default.to_string()
        } else {
            input.to_string()
        })
    }

    fn choose(&mut self, label: &str, options: &[&str], default: usize) -> Result<String> {
        println!("{label}:");
        for (index, option) in options.iter().enumerate() {
            if index == default {
                println!("  [{index}] {option} (default)");
            } else {
                println!("  [{index}] {option}");
            }
        }

        loop {
            print!("> ");
            io::stdout().flush()?;

            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            let input = input.trim();
            if input.is_empty() {
                return Ok(options[default].to_string());
            }
            match input.parse::<usize>() {
                Ok(index) if index < options.len() => return Ok(options[index].to_string()),
                _ => println!("  ⚠️  Enter a number between 0 and {}", options.len() - 1),
            }
        }
    }

    fn secret(&mut self, label: &str) -> Result<String> {
        if atty::is(atty::Stream::Stdin) {
            print!("{label} (hidden): ");
            io::stdout().flush()?;
            let value = console::Term::stdout().read_secure_line()?;
            Ok(value.trim().to_string())
        } else {
            // Piped input (scripts, tests) cannot be masked.
            let mut input = String::new();
            io::stdin().read_line(&mut input)?;
            Ok(input.trim().to_string())
        }
    }
}
