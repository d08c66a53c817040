//! Clap derive structures for the `petstay` CLI.
//!
//! Defines the command tree, global flags, and shared option types.

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// petstay -- command-line client for the Petstay boarding marketplace
#[derive(Debug, Parser)]
#[command(
    name = "petstay",
    version,
    about = "Quote boarding stays and track order payments from the command line",
    long_about = "A command-line client for the Petstay pet-boarding marketplace.\n\n\
        Quotes stays against a store's tiered price table, inspects order\n\
        status, and tracks payment countdowns that survive restarts.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend root URL (overrides the config file)
    #[arg(long, short = 's', env = "PETSTAY_SERVER", global = true)]
    pub server: Option<String>,

    /// API bearer token
    #[arg(long, env = "PETSTAY_TOKEN", global = true, hide_env = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "PETSTAY_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Request timeout in seconds
    #[arg(long, env = "PETSTAY_TIMEOUT", default_value = "30", global = true)]
    pub timeout: u64,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// One identifier per line
    Plain,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

// ── Commands ─────────────────────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Quote a boarding stay against a store's price table
    Quote(QuoteArgs),

    /// Inspect and track boarding orders
    Order(OrderArgs),

    /// Inspect or edit the configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Quote ────────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct QuoteArgs {
    /// Store to quote against
    #[arg(long)]
    pub store: i64,

    /// Pet species (e.g. "dog", "cat")
    #[arg(long)]
    pub pet_type: Option<String>,

    /// Pet weight in kilograms
    #[arg(long)]
    pub weight: Option<f64>,

    /// Stay start (RFC 3339, or YYYY-MM-DD for midnight UTC)
    #[arg(long)]
    pub start: Option<String>,

    /// Stay end (RFC 3339, or YYYY-MM-DD for midnight UTC)
    #[arg(long)]
    pub end: Option<String>,

    /// Add-on service selection as id=quantity (repeatable)
    #[arg(long = "service", value_name = "ID=QTY")]
    pub services: Vec<String>,
}

// ── Orders ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct OrderArgs {
    #[command(subcommand)]
    pub command: OrderCommand,
}

#[derive(Debug, Subcommand)]
pub enum OrderCommand {
    /// Fetch the live status of one order
    Status {
        /// Order identifier
        order_id: String,
    },

    /// List orders in a given state
    List {
        /// Numeric order state (1 = awaiting confirmation)
        #[arg(long, default_value = "1")]
        state: i32,
    },

    /// Track an order's payment countdown live until it ends
    Watch {
        /// Order identifier
        order_id: String,
    },
}

// ── Config ───────────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Print the resolved configuration (token redacted)
    Show,

    /// Print the config file path
    Path,

    /// Store the API token in the system keyring
    SetToken {
        /// Token value (prompted when omitted)
        #[arg(long)]
        token: Option<String>,
    },
}

// ── Completions ──────────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
