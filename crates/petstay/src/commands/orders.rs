//! Order command handlers: status, list, and the live countdown watch.

use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;

use tabled::Tabled;

use petstay_core::model::{OrderStatus, OrderSummary};
use petstay_core::store::JsonFileStorage;
use petstay_core::watcher::{PaymentOrder, PaymentWatcher, WatcherConfig};
use petstay_core::{ClientConfig, CountdownStore, convert};

use crate::cli::{GlobalOpts, OrderArgs, OrderCommand};
use crate::error::CliError;
use crate::output;

pub async fn handle(
    args: OrderArgs,
    global: &GlobalOpts,
    config: &ClientConfig,
    storage_path: PathBuf,
) -> Result<(), CliError> {
    match args.command {
        OrderCommand::Status { order_id } => status(&order_id, global, config).await,
        OrderCommand::List { state } => list(state, global, config).await,
        OrderCommand::Watch { order_id } => watch(&order_id, global, config, storage_path).await,
    }
}

// ── Status ──────────────────────────────────────────────────────────

fn status_detail(status: &OrderStatus) -> String {
    let remaining = status
        .expire_seconds
        .map_or_else(|| "-".to_owned(), output::format_countdown);
    let created = status
        .create_time
        .map_or_else(|| "-".to_owned(), |t| t.to_rfc3339());

    [
        format!("Order:          {}", status.order_id),
        format!("State:          {}", status.state),
        format!(
            "Deposit paid:   {}",
            if status.deposit_paid { "yes" } else { "no" }
        ),
        format!("Time to pay:    {remaining}"),
        format!("Created:        {created}"),
        format!(
            "Total price:    {}",
            status
                .total_price
                .map_or_else(|| "-".to_owned(), |p| format!("{p:.2}"))
        ),
    ]
    .join("\n")
}

async fn status(order_id: &str, global: &GlobalOpts, config: &ClientConfig) -> Result<(), CliError> {
    let api = super::build_api(config)?;

    let dto = api.order_status(order_id).await.map_err(|e| {
        if e.is_not_found() {
            CliError::NotFound {
                resource_type: "order".into(),
                identifier: order_id.to_owned(),
            }
        } else {
            e.into()
        }
    })?;
    let status = convert::order_status_from_dto(order_id, dto);

    let out = output::render_single(&global.output, &status, status_detail, |s| {
        s.order_id.clone()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── List ────────────────────────────────────────────────────────────

#[derive(Tabled)]
struct OrderRow {
    #[tabled(rename = "ORDER")]
    order: String,
    #[tabled(rename = "STATE")]
    state: String,
    #[tabled(rename = "STORE")]
    store: String,
    #[tabled(rename = "PET")]
    pet: String,
    #[tabled(rename = "TIME TO PAY")]
    remaining: String,
    #[tabled(rename = "TOTAL")]
    total: String,
}

fn to_row(summary: &OrderSummary) -> OrderRow {
    OrderRow {
        order: summary.order_id.clone(),
        state: summary.state.to_string(),
        store: summary.store_name.clone().unwrap_or_else(|| "-".into()),
        pet: summary.pet_name.clone().unwrap_or_else(|| "-".into()),
        remaining: summary
            .expire_seconds
            .map_or_else(|| "-".to_owned(), output::format_countdown),
        total: summary
            .total_price
            .map_or_else(|| "-".to_owned(), |p| format!("{p:.2}")),
    }
}

async fn list(state: i32, global: &GlobalOpts, config: &ClientConfig) -> Result<(), CliError> {
    let api = super::build_api(config)?;

    let rows = api.orders_by_state(state).await?;
    let summaries: Vec<OrderSummary> = rows
        .into_iter()
        .filter_map(convert::order_summary_from_dto)
        .collect();

    let out = output::render_list(&global.output, &summaries, to_row, |s| s.order_id.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}

// ── Watch ───────────────────────────────────────────────────────────

/// Track one order's payment countdown until it ends or Ctrl-C.
///
/// The countdown store is file-backed, so a restarted watch resumes from
/// the persisted expiry without waiting for the server.
async fn watch(
    order_id: &str,
    global: &GlobalOpts,
    config: &ClientConfig,
    storage_path: PathBuf,
) -> Result<(), CliError> {
    let api = super::build_api(config)?;
    let store = Arc::new(CountdownStore::with_storage(JsonFileStorage::new(
        storage_path,
    )));

    let watcher = PaymentWatcher::spawn(
        api,
        Arc::clone(&store),
        PaymentOrder::new(order_id),
        WatcherConfig::from(config),
    );
    let mut remaining_rx = watcher.remaining();

    if !global.quiet {
        println!("Tracking payment countdown for order {order_id} (Ctrl-C to stop)");
    }

    let mut outcome: Option<&str> = None;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            changed = remaining_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let value = *remaining_rx.borrow_and_update();
                match value {
                    Some(secs) if secs > 0 => {
                        if !global.quiet {
                            print!("\rTime remaining: {}    ", output::format_countdown(secs));
                            let _ = std::io::stdout().flush();
                        }
                    }
                    Some(_) => {
                        outcome = Some("Countdown ended: order expired or no longer awaiting payment.");
                        break;
                    }
                    None => {
                        if !global.quiet {
                            print!("\rTime remaining: unknown ");
                            let _ = std::io::stdout().flush();
                        }
                    }
                }
            }
        }
    }

    watcher.stop().await;

    if !global.quiet {
        println!();
        if let Some(message) = outcome {
            println!("{message}");
        }
    }
    Ok(())
}
