//! Command handlers, one module per command group.

pub mod config_cmd;
pub mod orders;
pub mod quote;

use std::sync::Arc;
use std::time::Duration;

use petstay_api::ApiClient;
use petstay_core::ClientConfig;

use crate::error::CliError;

/// Build the API client every network-touching command shares.
pub(crate) fn build_api(config: &ClientConfig) -> Result<Arc<ApiClient>, CliError> {
    let client = ApiClient::new(
        config.server.clone(),
        config.token.clone(),
        config.timeout.max(Duration::from_secs(1)),
    )?;
    Ok(Arc::new(client))
}
