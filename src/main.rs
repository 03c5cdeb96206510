use chatstream::cli::{parse_args, run_cli_command, CliCommand, PrintingObserver};
use chatstream::{ChatClient, ClientConfig, SessionOutcome};

use color_eyre::eyre::eyre;
use color_eyre::Result;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_LOG_FILTER: &str = "chatstream=info";

#[tokio::main]
async fn main() -> Result<()> {
    let command = parse_args(std::env::args());
    if let Some(result) = run_cli_command(&command) {
        return result;
    }
    let CliCommand::Chat(chat) = command else {
        return Ok(());
    };

    color_eyre::install()?;

    // Tokens go to stdout, logs to stderr
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = chat.apply(ClientConfig::from_env()?);
    info!(base_url = %config.base_url, strategy = ?config.strategy.steps(), "Starting chat turn");

    let client = ChatClient::new(config);
    let mut session = client.session();

    let cancel = session.cancel_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, cancelling session");
            cancel.cancel();
        }
    });

    let mut observer = PrintingObserver::stdio();
    match session.send(chat.request(), &mut observer).await {
        SessionOutcome::Completed(_) | SessionOutcome::Degraded(_) => Ok(()),
        SessionOutcome::Cancelled => {
            eprintln!("Cancelled");
            std::process::exit(130);
        }
        SessionOutcome::Failed(error) => Err(eyre!(error)),
    }
}
