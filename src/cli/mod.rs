//! CLI module for chatstream.
//!
//! This module provides command-line interface functionality including:
//! - Argument parsing
//! - Version display
//! - Token printing for streamed turns
//!
//! # Usage
//!
//! ```ignore
//! use chatstream::cli::{parse_args, run_cli_command, CliCommand};
//!
//! let command = parse_args(std::env::args());
//! if let Some(result) = run_cli_command(&command) {
//!     // Handled without streaming
//! }
//! ```

pub mod args;
pub mod printer;
pub mod version;

pub use args::{parse_args, ChatArgs, CliCommand, USAGE};
pub use printer::PrintingObserver;
pub use version::{handle_version_command, VERSION};

use color_eyre::eyre::eyre;
use color_eyre::Result;

/// Run a CLI command if it needs no chat session.
///
/// # Returns
///
/// * `None` - If the command is `Chat` (the caller streams it)
/// * `Some(Ok(()))` - If the command was handled
/// * `Some(Err(e))` - If the arguments were invalid
///
/// # Note
///
/// The `Version` command never returns as it calls `std::process::exit(0)`.
pub fn run_cli_command(command: &CliCommand) -> Option<Result<()>> {
    match command {
        CliCommand::Version => {
            handle_version_command();
        }
        CliCommand::Help => {
            println!("{}", USAGE);
            Some(Ok(()))
        }
        CliCommand::Invalid(message) => {
            eprintln!("{}", USAGE);
            Some(Err(eyre!("{}", message)))
        }
        CliCommand::Chat(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chat_returns_none() {
        let command = CliCommand::Chat(ChatArgs::default());
        assert!(run_cli_command(&command).is_none());
    }

    #[test]
    fn test_invalid_returns_error() {
        let command = CliCommand::Invalid("bad".to_string());
        let result = run_cli_command(&command).unwrap();
        assert_eq!(result.unwrap_err().to_string(), "bad");
    }
}
