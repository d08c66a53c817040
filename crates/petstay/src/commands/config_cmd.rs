//! Config command handlers.

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => show(global),
        ConfigCommand::Path => {
            output::print_output(
                &petstay_config::config_path().display().to_string(),
                global.quiet,
            );
            Ok(())
        }
        ConfigCommand::SetToken { token } => set_token(token, global),
    }
}

fn show(global: &GlobalOpts) -> Result<(), CliError> {
    let mut config = petstay_config::load_config_or_default();

    // Never echo a stored secret.
    if config.token.is_some() {
        config.token = Some("[redacted]".into());
    }

    let rendered = toml::to_string_pretty(&config)
        .map_err(|e| CliError::General(format!("failed to render config: {e}")))?;
    output::print_output(rendered.trim_end(), global.quiet);
    Ok(())
}

fn set_token(token: Option<String>, global: &GlobalOpts) -> Result<(), CliError> {
    let token = match token {
        Some(value) => value,
        None => rpassword::prompt_password("API token: ")
            .map_err(|e| CliError::General(format!("failed to read token: {e}")))?,
    };

    if token.trim().is_empty() {
        return Err(CliError::Validation {
            field: "token".into(),
            reason: "token must not be empty".into(),
        });
    }

    petstay_config::store_token(token.trim())?;
    output::print_output("Token stored in the system keyring.", global.quiet);
    Ok(())
}
