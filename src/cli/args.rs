//! Command-line argument parsing for the chatstream CLI.
//!
//! Arguments are parsed by hand; there are few enough flags that a parser
//! crate would not pay for itself.

use std::time::Duration;

use crate::config::ClientConfig;
use crate::models::{AgentOverride, StreamRequest};
use crate::transport::{TransportMode, TransportStrategy};

pub const USAGE: &str = "\
Usage: chatstream [OPTIONS] <MESSAGE>...

Options:
  --sse                   Use SSE only
  --ws                    Use WebSocket only
  --timeout <SECS>        Session deadline in seconds
  --conversation <ID>     Continue a conversation
  --agent <NAME>          Force an agent (general, research, code, data, creative)
  -V, --version           Print version
  -h, --help              Print help";

/// Options for one streamed chat turn
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ChatArgs {
    pub message: String,
    /// Forced transport; `None` keeps the configured strategy
    pub transport: Option<TransportMode>,
    pub timeout: Option<Duration>,
    pub conversation_id: Option<String>,
    pub agent: Option<AgentOverride>,
}

impl ChatArgs {
    pub fn request(&self) -> StreamRequest {
        let mut request = StreamRequest::new(self.message.clone());
        if let Some(conversation_id) = &self.conversation_id {
            request = request.with_conversation(conversation_id.clone());
        }
        if let Some(agent) = self.agent {
            request = request.with_agent_override(agent);
        }
        request
    }

    /// Apply the flags on top of `config`
    pub fn apply(&self, mut config: ClientConfig) -> ClientConfig {
        if let Some(mode) = self.transport {
            config = config.with_strategy(TransportStrategy::single(mode));
        }
        if let Some(timeout) = self.timeout {
            config = config.with_timeout(timeout);
        }
        config
    }
}

/// Parsed CLI command to execute.
#[derive(Debug, Clone, PartialEq)]
pub enum CliCommand {
    /// Show version information
    Version,
    /// Show usage
    Help,
    /// Stream one chat turn
    Chat(ChatArgs),
    /// Arguments could not be parsed
    Invalid(String),
}

/// Parse command-line arguments and return the appropriate command.
///
/// # Examples
///
/// ```
/// use chatstream::cli::args::{parse_args, CliCommand};
///
/// let args = vec!["chatstream".to_string(), "--version".to_string()];
/// assert_eq!(parse_args(args.into_iter()), CliCommand::Version);
/// ```
pub fn parse_args<I>(args: I) -> CliCommand
where
    I: Iterator<Item = String>,
{
    let mut chat = ChatArgs::default();
    let mut words: Vec<String> = Vec::new();
    // Skip the program name
    let mut args = args.skip(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--version" | "-V" => return CliCommand::Version,
            "--help" | "-h" => return CliCommand::Help,
            "--sse" => chat.transport = Some(TransportMode::Sse),
            "--ws" | "--websocket" => chat.transport = Some(TransportMode::WebSocket),
            "--timeout" => {
                let Some(value) = args.next() else {
                    return CliCommand::Invalid("--timeout needs a value".to_string());
                };
                match value.parse::<u64>() {
                    Ok(secs) if secs > 0 => chat.timeout = Some(Duration::from_secs(secs)),
                    _ => return CliCommand::Invalid(format!("invalid timeout '{}'", value)),
                }
            }
            "--conversation" => match args.next() {
                Some(id) => chat.conversation_id = Some(id),
                None => return CliCommand::Invalid("--conversation needs a value".to_string()),
            },
            "--agent" => {
                let Some(value) = args.next() else {
                    return CliCommand::Invalid("--agent needs a value".to_string());
                };
                match value.parse::<AgentOverride>() {
                    Ok(agent) => chat.agent = Some(agent),
                    Err(e) => return CliCommand::Invalid(e),
                }
            }
            flag if flag.starts_with("--") => {
                return CliCommand::Invalid(format!("unknown flag '{}'", flag));
            }
            _ => words.push(arg),
        }
    }

    if words.is_empty() {
        return CliCommand::Help;
    }
    chat.message = words.join(" ");
    CliCommand::Chat(chat)
}
