//! The menu browsing and ordering surface.
//!
//! [`Dashboard`] owns the session's [`Catalog`], the search query and at most
//! one open view: an order draft or an edit draft. Confirmed orders leave
//! through the injected [`OrderSink`]; the dashboard never reads the ledger.

use serde::Serialize;
use tracing::{debug, info};

use crate::catalog::{Catalog, MenuEntry, Price};
use crate::config::DisplayConfig;
use crate::error::Result;
use crate::format::{display_name, money, write_rows, OutputFormat};
use crate::ledger::{Order, OrderSink, Quantity};

/// A confirmation shown to the user after an action succeeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    /// Short headline.
    pub title: &'static str,
    /// Detail line.
    pub message: String,
}

impl std::fmt::Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.title, self.message)
    }
}

/// The open order view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDraft {
    /// The entry as it was when selected.
    pub entry: MenuEntry,
    /// Quantity to order.
    pub quantity: Quantity,
}

/// The open edit view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditDraft {
    /// Name of the entry being edited, as it was when selected.
    pub original_name: String,
    /// New name.
    pub name: String,
    /// New price.
    pub price: Price,
}

/// One menu tile as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tile {
    /// Full stored name.
    pub name: String,
    /// Name shortened for display.
    pub label: String,
    /// Unit price.
    pub price: Price,
    /// Image asset or the placeholder.
    pub image: String,
}

/// Menu browsing and ordering state for one session.
#[derive(Debug)]
pub struct Dashboard {
    catalog: Catalog,
    query: String,
    order: Option<OrderDraft>,
    edit: Option<EditDraft>,
    sink: OrderSink,
    display: DisplayConfig,
}

impl Dashboard {
    /// Create a dashboard over `catalog` that places orders into `sink`.
    #[must_use]
    pub fn new(catalog: Catalog, sink: OrderSink, display: DisplayConfig) -> Self {
        Self {
            catalog,
            query: String::new(),
            order: None,
            edit: None,
            sink,
            display,
        }
    }

    /// The catalog as currently edited.
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The current search query.
    #[must_use]
    pub fn query(&self) -> &str {
        &self.query
    }

    /// Set the search query and return the entries that match it.
    pub fn filter(&mut self, query: &str) -> Vec<&MenuEntry> {
        query.clone_into(&mut self.query);
        self.visible()
    }

    /// Entries matching the current query, in catalog order.
    #[must_use]
    pub fn visible(&self) -> Vec<&MenuEntry> {
        self.catalog.filter(&self.query)
    }

    /// Tiles for the visible entries.
    #[must_use]
    pub fn tiles(&self) -> Vec<Tile> {
        self.visible()
            .into_iter()
            .map(|entry| Tile {
                name: entry.name.clone(),
                label: display_name(&entry.name, self.display.name_limit),
                price: entry.price,
                image: entry.image_or(&self.display.placeholder_image).to_string(),
            })
            .collect()
    }

    /// Render the visible tiles.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn render_menu(&self, format: OutputFormat) -> Result<String> {
        let tiles = self.tiles();
        if format == OutputFormat::Json {
            return Ok(serde_json::to_string_pretty(&tiles)?);
        }

        if tiles.is_empty() {
            return Ok(format!("No menu items match \"{}\".\n", self.query));
        }

        let rows: Vec<Vec<String>> = tiles
            .into_iter()
            .map(|tile| {
                vec![
                    tile.label,
                    money(&self.display.currency_symbol, tile.price),
                    tile.image,
                ]
            })
            .collect();
        let mut out = String::new();
        write_rows(
            &mut out,
            &["Item", "Price", "Image"],
            &rows,
            format == OutputFormat::Table,
        );
        Ok(out)
    }

    /// Open the order view for the entry named `name`, quantity 1.
    ///
    /// Any open edit view is closed. Returns `None` if there is no such entry.
    pub fn select_for_order(&mut self, name: &str) -> Option<&OrderDraft> {
        let entry = self.catalog.lookup(name)?.clone();
        debug!("Order view opened for {:?}", entry.name);
        self.edit = None;
        self.order = Some(OrderDraft {
            entry,
            quantity: Quantity::ONE,
        });
        self.order.as_ref()
    }

    /// The open order view, if any.
    #[must_use]
    pub fn order_draft(&self) -> Option<&OrderDraft> {
        self.order.as_ref()
    }

    /// Change the quantity in the open order view.
    ///
    /// Returns `false` if no order view is open.
    pub fn set_quantity(&mut self, quantity: Quantity) -> bool {
        match self.order.as_mut() {
            Some(draft) => {
                draft.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Place the open order with the drafted quantity.
    ///
    /// Returns `None` without side effects if no order view is open.
    pub fn confirm_order(&mut self) -> Option<Notice> {
        let draft = self.order.take()?;
        let order = Order::new(&draft.entry, draft.quantity);
        info!("Placing order: {} x {}", order.quantity, order.item.name);
        self.sink.append(order);

        Some(Notice {
            title: "Order placed!",
            message: format!("You ordered {} of {}", draft.quantity, draft.entry.name),
        })
    }

    /// Place the open order with `quantity`.
    pub fn confirm_order_with(&mut self, quantity: Quantity) -> Option<Notice> {
        if self.set_quantity(quantity) {
            self.confirm_order()
        } else {
            None
        }
    }

    /// Open the edit view for the entry named `name`.
    ///
    /// Any open order view is closed. Returns `None` if there is no such entry.
    pub fn select_for_edit(&mut self, name: &str) -> Option<&EditDraft> {
        let entry = self.catalog.lookup(name)?;
        debug!("Edit view opened for {:?}", entry.name);
        let draft = EditDraft {
            original_name: entry.name.clone(),
            name: entry.name.clone(),
            price: entry.price,
        };
        self.order = None;
        self.edit = Some(draft);
        self.edit.as_ref()
    }

    /// The open edit view, if any.
    #[must_use]
    pub fn edit_draft(&self) -> Option<&EditDraft> {
        self.edit.as_ref()
    }

    /// Change the name in the open edit view.
    ///
    /// Returns `false` if no edit view is open.
    pub fn set_edit_name(&mut self, name: String) -> bool {
        match self.edit.as_mut() {
            Some(draft) => {
                draft.name = name;
                true
            }
            None => false,
        }
    }

    /// Change the price in the open edit view.
    ///
    /// Returns `false` if no edit view is open.
    pub fn set_edit_price(&mut self, price: Price) -> bool {
        match self.edit.as_mut() {
            Some(draft) => {
                draft.price = price;
                true
            }
            None => false,
        }
    }

    /// Apply the open edit to the catalog.
    ///
    /// Returns `Ok(None)` if no edit view is open, or if the original entry
    /// no longer exists (the view is closed in that case).
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidName`] for a blank name and
    /// [`crate::Error::DuplicateName`] if another entry already has the new
    /// name; the edit view stays open in both cases.
    pub fn save_edit(&mut self) -> Result<Option<Notice>> {
        let Some(draft) = self.edit.as_ref() else {
            return Ok(None);
        };

        let updated = self
            .catalog
            .update(&draft.original_name, &draft.name, draft.price)?;
        let notice = updated.then(|| Notice {
            title: "Item updated!",
            message: format!("You updated {}", draft.name.trim()),
        });
        if updated {
            info!(
                "Menu item {:?} saved as {:?} at {}",
                draft.original_name, draft.name, draft.price
            );
        }
        self.edit = None;
        Ok(notice)
    }

    /// Close whichever view is open.
    ///
    /// Returns `false` if nothing was open.
    pub fn cancel(&mut self) -> bool {
        let was_open = self.order.is_some() || self.edit.is_some();
        self.order = None;
        self.edit = None;
        was_open
    }
}
