//! Line-oriented interactive session over a [`Shell`].
//!
//! Each input line is one command. User mistakes (unknown items, bad
//! numbers, duplicate names) are reported on the output and the session
//! carries on; only I/O failures end it early.

use std::io::Write;

use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::debug;

use crate::catalog::Price;
use crate::error::Result;
use crate::format::{money, OutputFormat};
use crate::input::{parse_name, parse_price, parse_quantity};
use crate::shell::{Shell, Tab};

const HELP: &str = "\
Commands:
  tab <dashboard|history>   switch destination and show it
  dashboard | history       same as tab
  menu                      show the menu
  search [text]             filter the menu (no text clears the filter)
  order <item>              open the order view for an item
  quantity <n>              set the quantity of the open order
  confirm [n]               place the open order
  edit <item>               open the edit view for an item
  name <text>               set the new name in the edit view
  price <n>                 set the new price in the edit view
  save                      apply the open edit
  cancel                    close the open view
  help                      show this help
  quit | exit               leave";

/// Whether the session should keep reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    /// Read the next line.
    Continue,
    /// Stop reading.
    Quit,
}

/// An interactive session writing to `W`.
#[derive(Debug)]
pub struct Session<W> {
    shell: Shell,
    out: W,
    format: OutputFormat,
    prompt: bool,
}

impl<W: Write> Session<W> {
    /// Create a session over `shell`, writing plain output to `out`.
    pub fn new(shell: Shell, out: W) -> Self {
        Self {
            shell,
            out,
            format: OutputFormat::Plain,
            prompt: false,
        }
    }

    /// Render menus and history in `format`.
    #[must_use]
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }

    /// Print a `> ` prompt before each line.
    #[must_use]
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    /// The shell driven by this session.
    #[must_use]
    pub fn shell(&self) -> &Shell {
        &self.shell
    }

    /// Read commands from `input` until it ends or the user quits.
    ///
    /// Returns the shell so the caller can shut it down.
    ///
    /// # Errors
    ///
    /// Returns an error if reading input or writing output fails.
    pub async fn run<R>(mut self, input: R) -> Result<Shell>
    where
        R: AsyncBufRead + Unpin,
    {
        let mut lines = input.lines();
        self.show_tab()?;
        loop {
            if self.prompt {
                write!(self.out, "> ")?;
                self.out.flush()?;
            }
            let Some(line) = lines.next_line().await? else {
                debug!("Input closed");
                break;
            };
            if self.handle_line(&line)? == Step::Quit {
                break;
            }
        }
        self.out.flush()?;
        Ok(self.shell)
    }

    /// Execute one command line.
    ///
    /// # Errors
    ///
    /// Returns an error only if writing output fails.
    pub fn handle_line(&mut self, line: &str) -> Result<Step> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(Step::Continue);
        }
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };
        debug!("Session command {command:?}");

        match self.dispatch(&command.to_lowercase(), rest) {
            Ok(step) => Ok(step),
            Err(e) if e.is_input_error() => {
                writeln!(self.out, "{e}")?;
                Ok(Step::Continue)
            }
            Err(e) => Err(e),
        }
    }

    fn dispatch(&mut self, command: &str, rest: &str) -> Result<Step> {
        match command {
            "quit" | "exit" => return Ok(Step::Quit),
            "help" | "?" => writeln!(self.out, "{HELP}")?,
            "tab" => match rest.parse::<Tab>() {
                Ok(tab) => self.open_tab(tab)?,
                Err(message) => writeln!(self.out, "{message}")?,
            },
            "dashboard" | "menu" => self.open_tab(Tab::Dashboard)?,
            "history" => self.open_tab(Tab::OrderHistory)?,
            "search" => {
                self.shell.dashboard_mut().filter(rest);
                self.open_tab(Tab::Dashboard)?;
            }
            "order" => self.open_order(rest)?,
            "quantity" | "qty" => {
                let quantity = parse_quantity(rest)?;
                if self.shell.dashboard_mut().set_quantity(quantity) {
                    writeln!(self.out, "Quantity: {quantity}")?;
                } else {
                    writeln!(self.out, "No order in progress.")?;
                }
            }
            "confirm" => {
                let dashboard = self.shell.dashboard_mut();
                let notice = if rest.is_empty() {
                    dashboard.confirm_order()
                } else if dashboard.order_draft().is_some() {
                    dashboard.confirm_order_with(parse_quantity(rest)?)
                } else {
                    None
                };
                match notice {
                    Some(notice) => writeln!(self.out, "{notice}")?,
                    None => writeln!(self.out, "No order in progress.")?,
                }
            }
            "edit" => self.open_edit(rest)?,
            "name" => {
                let name = parse_name(rest)?;
                if self.shell.dashboard_mut().set_edit_name(name.clone()) {
                    writeln!(self.out, "Name: {name}")?;
                } else {
                    writeln!(self.out, "No edit in progress.")?;
                }
            }
            "price" => {
                let price = parse_price(rest)?;
                if self.shell.dashboard_mut().set_edit_price(price) {
                    writeln!(self.out, "Price: {}", self.price_text(price))?;
                } else {
                    writeln!(self.out, "No edit in progress.")?;
                }
            }
            "save" => match self.shell.dashboard_mut().save_edit()? {
                Some(notice) => writeln!(self.out, "{notice}")?,
                None => writeln!(self.out, "No edit in progress.")?,
            },
            "cancel" => {
                if self.shell.dashboard_mut().cancel() {
                    writeln!(self.out, "Cancelled.")?;
                } else {
                    writeln!(self.out, "Nothing to cancel.")?;
                }
            }
            other => writeln!(
                self.out,
                "Unknown command \"{other}\". Type \"help\" for commands."
            )?,
        }
        Ok(Step::Continue)
    }

    fn open_tab(&mut self, tab: Tab) -> Result<()> {
        self.shell.select_tab(tab);
        self.show_tab()
    }

    fn show_tab(&mut self) -> Result<()> {
        let body = self.shell.render_tab(self.format)?;
        writeln!(self.out, "== {} ==", self.shell.tab())?;
        write!(self.out, "{body}")?;
        if !body.ends_with('\n') {
            writeln!(self.out)?;
        }
        Ok(())
    }

    fn open_order(&mut self, name: &str) -> Result<()> {
        self.shell.select_tab(Tab::Dashboard);
        let symbol = self.shell.config().display.currency_symbol.clone();
        let opened = self.shell.dashboard_mut().select_for_order(name).map(|draft| {
            format!(
                "Ordering {} at {}. Quantity: {} (use \"quantity <n>\", then \"confirm\")",
                draft.entry.name,
                money(&symbol, draft.entry.price),
                draft.quantity
            )
        });
        self.report_opened(opened, name)
    }

    fn open_edit(&mut self, name: &str) -> Result<()> {
        self.shell.select_tab(Tab::Dashboard);
        let symbol = self.shell.config().display.currency_symbol.clone();
        let opened = self.shell.dashboard_mut().select_for_edit(name).map(|draft| {
            format!(
                "Editing {} at {} (use \"name <text>\" and \"price <n>\", then \"save\")",
                draft.name,
                money(&symbol, draft.price)
            )
        });
        self.report_opened(opened, name)
    }

    fn report_opened(&mut self, opened: Option<String>, name: &str) -> Result<()> {
        match opened {
            Some(line) => writeln!(self.out, "{line}")?,
            None => writeln!(self.out, "No menu item named \"{name}\".")?,
        }
        Ok(())
    }

    fn price_text(&self, price: Price) -> String {
        money(&self.shell.config().display.currency_symbol, price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::storage::{KeyValueStore, MemoryStore};
    use std::sync::Arc;

    async fn session_on(store: &Arc<MemoryStore>) -> Session<Vec<u8>> {
        let dyn_store: Arc<dyn KeyValueStore> = Arc::clone(store) as Arc<dyn KeyValueStore>;
        let shell = Shell::start(dyn_store, Config::default()).await;
        Session::new(shell, Vec::new())
    }

    fn output(session: &Session<Vec<u8>>) -> String {
        String::from_utf8(session.out.clone()).unwrap()
    }

    #[tokio::test]
    async fn test_order_flow() {
        let store = Arc::new(MemoryStore::new());
        let mut session = session_on(&store).await;

        session.handle_line("order sundal").unwrap();
        session.handle_line("quantity 2").unwrap();
        session.handle_line("confirm").unwrap();

        let out = output(&session);
        assert!(out.contains("Ordering Sundal at ₹30. Quantity: 1"));
        assert!(out.contains("Quantity: 2"));
        assert!(out.contains("Order placed! You ordered 2 of Sundal"));
        assert_eq!(session.shell().ledger().snapshot().len(), 1);
        session.shell.shutdown().await;
    }

    #[tokio::test]
    async fn test_confirm_with_quantity() {
        let store = Arc::new(MemoryStore::new());
        let mut session = session_on(&store).await;

        session.handle_line("order Pani Puri").unwrap();
        session.handle_line("confirm 3").unwrap();
        session.handle_line("history").unwrap();

        let out = output(&session);
        assert!(out.contains("== Order History =="));
        assert!(out.contains("Pani Puri | 3 | ₹70 | ₹210"));
        session.shell.shutdown().await;
    }

    #[tokio::test]
    async fn test_bad_quantity_keeps_order_open() {
        let store = Arc::new(MemoryStore::new());
        let mut session = session_on(&store).await;

        session.handle_line("order Sundal").unwrap();
        assert_eq!(session.handle_line("quantity 0").unwrap(), Step::Continue);
        assert_eq!(session.handle_line("quantity two").unwrap(), Step::Continue);

        let out = output(&session);
        assert!(out.contains("invalid quantity '0'"));
        assert!(out.contains("invalid quantity 'two'"));
        assert!(session.shell().dashboard().order_draft().is_some());
        assert!(session.shell().ledger().snapshot().is_empty());
        session.shell.shutdown().await;
    }

    #[tokio::test]
    async fn test_confirm_without_order() {
        let store = Arc::new(MemoryStore::new());
        let mut session = session_on(&store).await;

        session.handle_line("confirm").unwrap();
        session.handle_line("confirm 4").unwrap();
        assert_eq!(output(&session).matches("No order in progress.").count(), 2);
        assert!(session.shell().ledger().snapshot().is_empty());
        session.shell.shutdown().await;
    }

    #[tokio::test]
    async fn test_edit_flow() {
        let store = Arc::new(MemoryStore::new());
        let mut session = session_on(&store).await;

        session.handle_line("edit Sundal").unwrap();
        session.handle_line("name Chana Sundal").unwrap();
        session.handle_line("price 35").unwrap();
        session.handle_line("save").unwrap();

        let out = output(&session);
        assert!(out.contains("Editing Sundal at ₹30"));
        assert!(out.contains("Price: ₹35"));
        assert!(out.contains("Item updated! You updated Chana Sundal"));
        let entry = session.shell().dashboard().catalog().get("Chana Sundal").unwrap();
        assert_eq!(entry.price, 35);
        session.shell.shutdown().await;
    }

    #[tokio::test]
    async fn test_duplicate_name_is_reported() {
        let store = Arc::new(MemoryStore::new());
        let mut session = session_on(&store).await;

        session.handle_line("edit Sundal").unwrap();
        session.handle_line("name Pav Bhaji").unwrap();
        session.handle_line("save").unwrap();

        assert!(output(&session).contains("a menu item named 'Pav Bhaji' already exists"));
        assert!(session.shell().dashboard().edit_draft().is_some());
        session.shell.shutdown().await;
    }

    #[tokio::test]
    async fn test_unknown_item_and_command() {
        let store = Arc::new(MemoryStore::new());
        let mut session = session_on(&store).await;

        session.handle_line("order Pizza").unwrap();
        session.handle_line("dance").unwrap();

        let out = output(&session);
        assert!(out.contains("No menu item named \"Pizza\"."));
        assert!(out.contains("Unknown command \"dance\""));
        session.shell.shutdown().await;
    }

    #[tokio::test]
    async fn test_search_filters_menu() {
        let store = Arc::new(MemoryStore::new());
        let mut session = session_on(&store).await;

        session.handle_line("search bhaji").unwrap();
        let out = output(&session);
        assert!(out.contains("Pav Bhaji | ₹60"));
        assert!(!out.contains("Sundal"));
        session.shell.shutdown().await;
    }

    #[tokio::test]
    async fn test_cancel() {
        let store = Arc::new(MemoryStore::new());
        let mut session = session_on(&store).await;

        session.handle_line("cancel").unwrap();
        session.handle_line("order Sundal").unwrap();
        session.handle_line("cancel").unwrap();

        let out = output(&session);
        assert!(out.contains("Nothing to cancel."));
        assert!(out.contains("Cancelled."));
        assert!(session.shell().dashboard().order_draft().is_none());
        session.shell.shutdown().await;
    }

    #[tokio::test]
    async fn test_quit() {
        let store = Arc::new(MemoryStore::new());
        let mut session = session_on(&store).await;
        assert_eq!(session.handle_line("  ").unwrap(), Step::Continue);
        assert_eq!(session.handle_line("QUIT").unwrap(), Step::Quit);
        session.shell.shutdown().await;
    }

    #[tokio::test]
    async fn test_run_reads_until_quit_and_persists() {
        let store = Arc::new(MemoryStore::new());
        let session = session_on(&store).await;

        let script: &[u8] = b"order Sundal\nconfirm 2\nquit\norder Sharbat\nconfirm\n";
        let shell = session.run(script).await.unwrap();
        assert_eq!(shell.ledger().snapshot().len(), 1);
        shell.shutdown().await;

        assert_eq!(
            store.get("orders").await.unwrap().as_deref(),
            Some(r#"[{"item":{"name":"Sundal","price":30},"quantity":2}]"#)
        );
    }

    #[tokio::test]
    async fn test_run_starts_on_dashboard() {
        let store = Arc::new(MemoryStore::new());
        let session = session_on(&store).await;

        let mut out = Vec::new();
        let shell = Session::new(session.shell, &mut out)
            .run(&b""[..])
            .await
            .unwrap();
        shell.shutdown().await;

        let out = String::from_utf8(out).unwrap();
        assert!(out.starts_with("== Dashboard ==\nItem | Price | Image\n"));
    }
}
