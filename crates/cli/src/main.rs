//! aCommerce CLI - inspect and drive an aCommerce account from the shell.
//!
//! # Usage
//!
//! ```bash
//! # Check the credentials in .env
//! acom token
//!
//! # List merchants on a channel
//! acom merchants ufc
//!
//! # Every allocation updated since May, against the sandbox
//! acom --sandbox inventory ufc 1234 --since 2024-05-01T00:00:00Z --all
//!
//! # Create a sales order from a file, or from stdin with `-`
//! acom order put ufc SO-1 order.json
//! cat shipment.json | acom shipping put kerry SH-9 -
//! ```
//!
//! Configuration comes from `ACOM_*` environment variables (see
//! `acommerce_client::config`). Results are printed as pretty JSON on stdout.

#![cfg_attr(not(test), forbid(unsafe_code))]

use acommerce_core::{ChannelId, OrderId, PartnerId, ShippingOrderId, ShippingPartnerId};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod commands;

#[derive(Parser)]
#[command(name = "acom")]
#[command(author, version, about = "aCommerce API tools")]
struct Cli {
    /// Use sandbox hosts regardless of `ACOM_PRODUCTION`
    #[arg(long, global = true)]
    sandbox: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authenticate and report whether a token was issued
    Token {
        /// Print the token itself
        #[arg(long)]
        show: bool,
    },
    /// List merchants on a sales channel
    Merchants {
        /// Sales channel ID
        channel: ChannelId,
    },
    /// Show inventory allocated to a channel by a partner
    Inventory {
        /// Sales channel ID
        channel: ChannelId,

        /// Partner (merchant) ID
        partner: PartnerId,

        /// Only allocations updated after this instant (RFC 3339)
        #[arg(long)]
        since: Option<DateTime<Utc>>,

        /// Page to fetch, or to start from with `--all`
        #[arg(long)]
        page: Option<u32>,

        /// Follow pagination and print every allocation
        #[arg(long)]
        all: bool,
    },
    /// Sales orders
    Order {
        #[command(subcommand)]
        action: OrderAction,
    },
    /// Shipping orders
    Shipping {
        #[command(subcommand)]
        action: ShippingAction,
    },
}

#[derive(Subcommand)]
enum OrderAction {
    /// Fetch a sales order
    Get { channel: ChannelId, order: OrderId },
    /// Create a sales order from a JSON file (`-` for stdin)
    Put {
        channel: ChannelId,
        order: OrderId,
        file: String,
    },
}

#[derive(Subcommand)]
enum ShippingAction {
    /// Fetch a shipping order
    Get {
        partner: ShippingPartnerId,
        order: ShippingOrderId,
    },
    /// Create a shipping order from a JSON file (`-` for stdin)
    Put {
        partner: ShippingPartnerId,
        order: ShippingOrderId,
        file: String,
    },
}

#[tokio::main]
async fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

/// Text logs on stderr by default, JSON when `LOG_FORMAT=json`.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "acommerce_client=info,acom=info".into());

    let is_json = std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json");
    let json_layer = is_json.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer =
        (!is_json).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let client = commands::client(cli.sandbox)?;

    match cli.command {
        Commands::Token { show } => commands::token::check(&client, show).await?,
        Commands::Merchants { channel } => commands::merchants::list(&client, &channel).await?,
        Commands::Inventory {
            channel,
            partner,
            since,
            page,
            all,
        } => {
            let since = since.map(acommerce_core::format_since);
            if all {
                commands::inventory::all(&client, &channel, &partner, since.as_deref(), page)
                    .await?;
            } else {
                commands::inventory::page(&client, &channel, &partner, since.as_deref(), page)
                    .await?;
            }
        }
        Commands::Order { action } => match action {
            OrderAction::Get { channel, order } => {
                commands::orders::get(&client, &channel, &order).await?;
            }
            OrderAction::Put {
                channel,
                order,
                file,
            } => commands::orders::put(&client, &channel, &order, &file).await?,
        },
        Commands::Shipping { action } => match action {
            ShippingAction::Get { partner, order } => {
                commands::shipping::get(&client, &partner, &order).await?;
            }
            ShippingAction::Put {
                partner,
                order,
                file,
            } => commands::shipping::put(&client, &partner, &order, &file).await?,
        },
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_sandbox_flag_after_subcommand() {
        let cli = Cli::try_parse_from(["acom", "merchants", "ufc", "--sandbox"]).unwrap();
        assert!(cli.sandbox);
        assert!(matches!(cli.command, Commands::Merchants { .. }));
    }

    #[test]
    fn test_inventory_args() {
        let cli = Cli::try_parse_from([
            "acom",
            "inventory",
            "ufc",
            "1234",
            "--since",
            "2024-05-01T00:00:00Z",
            "--page",
            "3",
            "--all",
        ])
        .unwrap();

        let Commands::Inventory {
            channel,
            partner,
            since,
            page,
            all,
        } = cli.command
        else {
            panic!("expected inventory command");
        };
        assert_eq!(channel.as_str(), "ufc");
        assert_eq!(partner.as_str(), "1234");
        assert_eq!(
            since.map(acommerce_core::format_since).as_deref(),
            Some("2024-05-01T00:00:00.000Z")
        );
        assert_eq!(page, Some(3));
        assert!(all);
    }

    #[test]
    fn test_order_put_reads_stdin_marker() {
        let cli = Cli::try_parse_from(["acom", "order", "put", "ufc", "SO-1", "-"]).unwrap();
        let Commands::Order {
            action: OrderAction::Put { file, .. },
        } = cli.command
        else {
            panic!("expected order put");
        };
        assert_eq!(file, "-");
    }
}
