//! The application shell.
//!
//! [`Shell`] owns the authoritative ledger. On start it hydrates the ledger
//! from the store, then a background task writes the full ledger back under
//! the orders key after every change. The dashboard gets an append-only
//! sink, the history surface a read-only view. Store failures are logged
//! here and never reach the user.

use std::sync::Arc;

use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};

use crate::catalog::Catalog;
use crate::config::{Config, MalformedPolicy};
use crate::dashboard::Dashboard;
use crate::error::Result;
use crate::format::OutputFormat;
use crate::history::HistoryTable;
use crate::ledger::{Ledger, LedgerCell, LedgerView};
use crate::storage::KeyValueStore;

/// A navigation destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    /// Menu browsing and ordering.
    #[default]
    Dashboard,
    /// The order history table.
    OrderHistory,
}

impl Tab {
    /// Every destination, in display order.
    pub const ALL: [Self; 2] = [Self::Dashboard, Self::OrderHistory];

    /// The destination's display name.
    #[must_use]
    pub fn title(self) -> &'static str {
        match self {
            Self::Dashboard => "Dashboard",
            Self::OrderHistory => "Order History",
        }
    }
}

impl std::fmt::Display for Tab {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.title())
    }
}

impl std::str::FromStr for Tab {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        if let Some(tab) = Self::ALL
            .into_iter()
            .find(|tab| tab.title().to_lowercase() == wanted)
        {
            return Ok(tab);
        }
        match wanted.as_str() {
            "menu" => Ok(Self::Dashboard),
            "history" | "order-history" | "orders" => Ok(Self::OrderHistory),
            _ => Err(format!(
                "unknown tab: {wanted} (expected one of: {})",
                Self::ALL.map(Self::title).join(", ")
            )),
        }
    }
}

/// Store key that receives a persisted value rejected during load.
#[must_use]
pub fn rejected_key(key: &str) -> String {
    format!("{key}.rejected")
}

/// Read the ledger stored under `key`.
///
/// A missing value or a failed read yields an empty ledger. A value that
/// does not decode is handled per `policy`, and the raw text is copied to
/// [`rejected_key`] before anything overwrites it.
pub async fn load_orders(store: &dyn KeyValueStore, key: &str, policy: MalformedPolicy) -> Ledger {
    let raw = match store.get(key).await {
        Ok(Some(raw)) => raw,
        Ok(None) => {
            debug!("No saved orders under {key:?}");
            return Ledger::new();
        }
        Err(e) => {
            error!("Failed to load orders from storage: {e}");
            return Ledger::new();
        }
    };

    let decoded = match policy {
        MalformedPolicy::Reset => Ledger::from_json(key, &raw).map(|ledger| (ledger, 0)),
        MalformedPolicy::SkipInvalid => Ledger::from_json_lenient(key, &raw),
    };

    match decoded {
        Ok((ledger, 0)) => {
            info!("Loaded {} saved orders", ledger.len());
            ledger
        }
        Ok((ledger, dropped)) => {
            warn!(
                "Loaded {} saved orders, dropped {dropped} that did not decode",
                ledger.len()
            );
            preserve_rejected(store, key, &raw).await;
            ledger
        }
        Err(e) => {
            warn!("Discarding saved orders ({policy}): {e}");
            preserve_rejected(store, key, &raw).await;
            Ledger::new()
        }
    }
}

async fn preserve_rejected(store: &dyn KeyValueStore, key: &str, raw: &str) {
    let target = rejected_key(key);
    match store.set(&target, raw).await {
        Ok(()) => info!("Kept the rejected value under {target:?}"),
        Err(e) => error!("Failed to keep the rejected value under {target:?}: {e}"),
    }
}

/// Write the full ledger under `key`.
///
/// Returns whether the write succeeded. Failures are logged, not retried.
pub async fn save_orders(store: &dyn KeyValueStore, key: &str, ledger: &Ledger) -> bool {
    let written = match ledger.to_json() {
        Ok(raw) => store.set(key, &raw).await,
        Err(e) => Err(e),
    };
    match written {
        Ok(()) => {
            debug!("Saved {} orders under {key:?}", ledger.len());
            true
        }
        Err(e) => {
            error!("Failed to save orders: {e}");
            false
        }
    }
}

/// Save the latest ledger each time it changes, until told to stop.
async fn persist_changes(
    store: Arc<dyn KeyValueStore>,
    key: String,
    mut rx: watch::Receiver<Ledger>,
    mut stop: oneshot::Receiver<()>,
) {
    loop {
        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let ledger = rx.borrow_and_update().clone();
                save_orders(store.as_ref(), &key, &ledger).await;
            }
            _ = &mut stop => {
                if rx.has_changed().unwrap_or(true) {
                    let ledger = rx.borrow_and_update().clone();
                    save_orders(store.as_ref(), &key, &ledger).await;
                }
                break;
            }
        }
    }
    debug!("Persistence task for {key:?} finished");
}

/// The running application: ledger owner, persistence and navigation.
#[derive(Debug)]
pub struct Shell {
    config: Config,
    stop: Option<oneshot::Sender<()>>,
    persister: Option<JoinHandle<()>>,
    cell: LedgerCell,
    view: LedgerView,
    dashboard: Dashboard,
    tab: Tab,
}

impl Shell {
    /// Start with the built-in catalog.
    pub async fn start(store: Arc<dyn KeyValueStore>, config: Config) -> Self {
        Self::start_with_catalog(store, config, Catalog::seeded()).await
    }

    /// Hydrate the ledger from `store`, start persisting and open the dashboard.
    ///
    /// Hydration completes before this returns, so no order can be placed
    /// against a ledger that is still loading.
    pub async fn start_with_catalog(
        store: Arc<dyn KeyValueStore>,
        config: Config,
        catalog: Catalog,
    ) -> Self {
        let key = config.orders_key().to_string();
        let loaded = load_orders(store.as_ref(), &key, config.ledger.on_malformed).await;

        let cell = LedgerCell::default();
        let (stop_tx, stop_rx) = oneshot::channel();
        let persister = tokio::spawn(persist_changes(store, key, cell.subscribe(), stop_rx));
        cell.replace(loaded);

        let dashboard = Dashboard::new(catalog, cell.sink(), config.display.clone());
        let view = cell.view();

        Self {
            config,
            stop: Some(stop_tx),
            persister: Some(persister),
            cell,
            view,
            dashboard,
            tab: Tab::default(),
        }
    }

    /// The configuration the shell was started with.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The selected destination.
    #[must_use]
    pub fn tab(&self) -> Tab {
        self.tab
    }

    /// Switch destination.
    pub fn select_tab(&mut self, tab: Tab) {
        debug!("Switched to {tab}");
        self.tab = tab;
    }

    /// The ordering surface.
    #[must_use]
    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// The ordering surface, mutably.
    pub fn dashboard_mut(&mut self) -> &mut Dashboard {
        &mut self.dashboard
    }

    /// Read-only view of the ledger.
    #[must_use]
    pub fn ledger(&self) -> &LedgerView {
        &self.view
    }

    /// The history surface for the current ledger.
    #[must_use]
    pub fn history(&self) -> HistoryTable {
        self.view.with(HistoryTable::from_ledger)
    }

    /// Render the history surface.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_history(&self, format: OutputFormat) -> Result<String> {
        self.history()
            .render(format, &self.config.display.currency_symbol)
    }

    /// Render whichever destination is selected.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_tab(&self, format: OutputFormat) -> Result<String> {
        match self.tab {
            Tab::Dashboard => self.dashboard.render_menu(format),
            Tab::OrderHistory => self.render_history(format),
        }
    }

    /// Stop persisting after writing any unsaved change.
    pub async fn shutdown(mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(persister) = self.persister.take() {
            if let Err(e) = persister.await {
                error!("Persistence task failed: {e}");
            }
        }
        debug!(
            "Shell stopped with {} orders",
            self.cell.view().with(Ledger::len)
        );
    }
}
