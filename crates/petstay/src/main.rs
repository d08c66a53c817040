mod cli;
mod commands;
mod error;
mod output;

use clap::Parser;
use secrecy::SecretString;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity
    init_tracing(cli.global.verbose);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        // Config commands don't need a backend connection
        Command::Config(args) => commands::config_cmd::handle(args, &cli.global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "petstay", &mut std::io::stdout());
            Ok(())
        }

        Command::Quote(args) => {
            let (_, client_config) = resolve_config(&cli.global)?;
            commands::quote::handle(args, &cli.global, &client_config).await
        }

        Command::Order(args) => {
            let (file_config, client_config) = resolve_config(&cli.global)?;
            let storage_path = petstay_config::countdown_storage_path(&file_config);
            commands::orders::handle(args, &cli.global, &client_config, storage_path).await
        }
    }
}

/// Load the config file and apply CLI flag overrides on top.
fn resolve_config(
    global: &cli::GlobalOpts,
) -> Result<(petstay_config::Config, petstay_core::ClientConfig), CliError> {
    let mut cfg = petstay_config::load_config_or_default();

    if let Some(ref server) = global.server {
        cfg.server = Some(server.clone());
    }
    if let Some(ref token) = global.token {
        cfg.token = Some(token.clone());
    }
    cfg.defaults.timeout = global.timeout;

    let mut client = petstay_config::to_client_config(&cfg)?;

    // A token passed on the command line beats every other source.
    if let Some(ref token) = global.token {
        client.token = SecretString::from(token.clone());
    }

    Ok((cfg, client))
}
