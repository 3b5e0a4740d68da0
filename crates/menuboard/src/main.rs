//! `menuboard` - CLI for browsing the menu and placing orders
//!
//! This binary provides the interactive session and one-shot commands over
//! the menuboard library.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::io::IsTerminal;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::error;

use menuboard::cli::{
    Cli, Command, ConfigCommand, HistoryCommand, MenuCommand, OrderCommand, ShellCommand,
};
use menuboard::input::parse_quantity;
use menuboard::ledger::{Ledger, LedgerCell};
use menuboard::{
    init_logging, Catalog, Config, Dashboard, KeyValueStore, MemoryStore, Session, Shell,
    SqliteStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbosity());

    // Load configuration
    let config = Config::load_from(cli.config.clone())?;

    // Execute the command
    match cli.command {
        Command::Shell(cmd) => handle_shell(config, cli.ephemeral, &cmd).await,
        Command::Menu(cmd) => handle_menu(&config, &cmd),
        Command::Order(cmd) => handle_order(config, cli.ephemeral, &cmd).await,
        Command::History(cmd) => handle_history(config, cli.ephemeral, &cmd).await,
        Command::Status(cmd) => handle_status(&config, cli.ephemeral, cmd.json).await,
        Command::Config(cmd) => handle_config(&config, cmd),
    }
}

/// Open the configured store, or an in-memory one.
///
/// A database that cannot be opened is logged and replaced by memory so the
/// session still works; its orders are lost on exit.
fn open_store(config: &Config, ephemeral: bool) -> Arc<dyn KeyValueStore> {
    if ephemeral {
        return Arc::new(MemoryStore::new());
    }
    match SqliteStore::open(config.database_path()) {
        Ok(store) => Arc::new(store),
        Err(e) => {
            error!("{e}; orders will not be saved");
            Arc::new(MemoryStore::new())
        }
    }
}

async fn start_shell(config: Config, ephemeral: bool) -> Shell {
    let store = open_store(&config, ephemeral);
    Shell::start(store, config).await
}

async fn handle_shell(config: Config, ephemeral: bool, cmd: &ShellCommand) -> anyhow::Result<()> {
    let shell = start_shell(config, ephemeral).await;
    let input = tokio::io::BufReader::new(tokio::io::stdin());
    let interactive = std::io::stdin().is_terminal();

    let shell = Session::new(shell, std::io::stdout())
        .with_format(cmd.format)
        .with_prompt(interactive)
        .run(input)
        .await?;
    shell.shutdown().await;
    Ok(())
}

fn handle_menu(config: &Config, cmd: &MenuCommand) -> anyhow::Result<()> {
    // Nothing is ordered here, so the sink goes nowhere.
    let mut dashboard = Dashboard::new(
        Catalog::seeded(),
        LedgerCell::default().sink(),
        config.display.clone(),
    );
    if let Some(query) = &cmd.search {
        dashboard.filter(query);
    }
    print!("{}", dashboard.render_menu(cmd.format)?);
    Ok(())
}

async fn handle_order(config: Config, ephemeral: bool, cmd: &OrderCommand) -> anyhow::Result<()> {
    let quantity = parse_quantity(&cmd.quantity)?;
    let mut shell = start_shell(config, ephemeral).await;

    let dashboard = shell.dashboard_mut();
    if dashboard.select_for_order(&cmd.item).is_none() {
        shell.shutdown().await;
        bail!("No menu item named \"{}\"", cmd.item);
    }
    if let Some(notice) = dashboard.confirm_order_with(quantity) {
        println!("{notice}");
    }
    shell.shutdown().await;
    Ok(())
}

async fn handle_history(
    config: Config,
    ephemeral: bool,
    cmd: &HistoryCommand,
) -> anyhow::Result<()> {
    let shell = start_shell(config, ephemeral).await;
    let rendered = shell.render_history(cmd.format);
    shell.shutdown().await;

    let rendered = rendered?;
    print!("{rendered}");
    if !rendered.ends_with('\n') {
        println!();
    }
    Ok(())
}

async fn handle_status(config: &Config, ephemeral: bool, json: bool) -> anyhow::Result<()> {
    if ephemeral {
        println!("Orders are kept in memory for --ephemeral runs; nothing is stored.");
        return Ok(());
    }

    let path = config.database_path();
    let store = SqliteStore::open(&path)
        .with_context(|| format!("failed to open store at {}", path.display()))?;
    let key = config.orders_key();

    let raw = store.get(key).await?;
    let orders = raw.as_deref().map(|raw| Ledger::from_json(key, raw));
    let updated_at = store.updated_at(key).await?;
    let stats = store.stats().await?;

    let (order_count, grand_total, ledger_state) = match &orders {
        None => (0, 0, "empty"),
        Some(Ok(ledger)) => (ledger.len(), ledger.grand_total(), "ok"),
        Some(Err(_)) => (0, 0, "malformed"),
    };

    if json {
        let status = serde_json::json!({
            "database_path": path,
            "orders_key": key,
            "ledger": ledger_state,
            "orders": order_count,
            "grand_total": json_amount(grand_total),
            "last_saved": updated_at.map(|t| t.to_rfc3339()),
            "total_keys": stats.total_keys,
            "db_size_bytes": stats.db_size_bytes,
        });
        println!("{}", serde_json::to_string_pretty(&status)?);
    } else {
        let currency = &config.display.currency_symbol;
        println!("menuboard status");
        println!("----------------");
        println!("Database:      {}", path.display());
        println!("Orders key:    {key}");
        println!("Ledger:        {ledger_state}");
        println!("Orders:        {order_count}");
        println!("Grand total:   {currency}{grand_total}");
        match updated_at {
            Some(t) => println!("Last saved:    {}", t.format("%Y-%m-%d %H:%M:%S UTC")),
            None => println!("Last saved:    never"),
        }
        println!("Stored keys:   {}", stats.total_keys);
        println!("Database size: {} bytes", stats.db_size_bytes);
    }
    Ok(())
}

/// A JSON number when it fits in `u64`, otherwise its decimal string.
fn json_amount(amount: u128) -> serde_json::Value {
    u64::try_from(amount).map_or_else(
        |_| serde_json::Value::String(amount.to_string()),
        serde_json::Value::from,
    )
}

fn handle_config(config: &Config, cmd: ConfigCommand) -> anyhow::Result<()> {
    match cmd {
        ConfigCommand::Show { json } => {
            if json {
                println!("{}", serde_json::to_string_pretty(config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Storage]");
                println!("  Database path:      {}", config.database_path().display());
                println!("  Orders key:         {}", config.orders_key());
                println!();
                println!("[Ledger]");
                println!("  On malformed:       {}", config.ledger.on_malformed);
                println!();
                println!("[Display]");
                println!("  Currency symbol:    {}", config.display.currency_symbol);
                println!("  Name limit:         {}", config.display.name_limit);
                println!("  Placeholder image:  {}", config.display.placeholder_image);
            }
        }
        ConfigCommand::Path => {
            println!("{}", Config::default_config_path().display());
        }
        ConfigCommand::Validate { file } => {
            let path = file.unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            match Config::load_from(Some(path)) {
                Ok(_) => println!("Configuration is valid."),
                Err(e) => println!("Configuration error: {e}"),
            }
        }
    }
    Ok(())
}
