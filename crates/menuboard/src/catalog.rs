//! The menu catalog.
//!
//! The catalog is an in-memory list of [`MenuEntry`] values seeded from the
//! built-in menu. Entries are identified by name, edited in place and never
//! removed.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::DEFAULT_PLACEHOLDER_IMAGE;
use crate::error::{Error, Result};

/// A price in whole rupees.
pub type Price = u32;

/// One orderable item on the menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    /// Display name, unique within the catalog.
    pub name: String,

    /// Unit price.
    pub price: Price,

    /// Image asset, if the item has its own picture.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl MenuEntry {
    /// Create an entry without an image.
    #[must_use]
    pub fn new(name: impl Into<String>, price: Price) -> Self {
        Self {
            name: name.into(),
            price,
            image: None,
        }
    }

    /// Attach an image asset.
    #[must_use]
    pub fn with_image(mut self, image: impl Into<String>) -> Self {
        self.image = Some(image.into());
        self
    }

    /// The entry's image, or the default placeholder asset.
    #[must_use]
    pub fn image_or_placeholder(&self) -> &str {
        self.image_or(DEFAULT_PLACEHOLDER_IMAGE)
    }

    /// The entry's image, or `placeholder`.
    #[must_use]
    pub fn image_or<'a>(&'a self, placeholder: &'a str) -> &'a str {
        self.image.as_deref().unwrap_or(placeholder)
    }

    /// Case-insensitive substring match on the name.
    #[must_use]
    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(&query.to_lowercase())
    }
}

/// The built-in menu.
const SEED: &[(&str, Price, Option<&str>)] = &[
    ("Sundal", 30, Some("chana.png")),
    ("Paniyaram/Ponganalu and Chutney", 40, None),
    ("Salem Tatta", 50, None),
    ("Pav Bhaji", 60, Some("Pav.png")),
    ("Pani Puri", 70, None),
    ("Maggie (Plain)", 80, None),
    ("Maggie (Paneer)", 90, None),
    ("Maggie (Cheese)", 100, None),
    ("Maggie (Vegetable)", 110, None),
    ("Poli/Holige", 120, None),
    ("Gulab Jamun", 130, None),
    ("Buttermilk", 140, None),
    ("Ice Cream - Vanilla", 150, None),
    ("Ice Cream - Strawberry", 160, None),
    ("Ice Cream - Butterscotch", 170, None),
    ("Sharbat", 180, None),
];

/// The editable list of menu entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    entries: Vec<MenuEntry>,
}

impl Default for Catalog {
    fn default() -> Self {
        Self::seeded()
    }
}

impl Catalog {
    /// Build a catalog from the built-in menu.
    #[must_use]
    pub fn seeded() -> Self {
        let entries = SEED
            .iter()
            .map(|&(name, price, image)| MenuEntry {
                name: name.to_string(),
                price,
                image: image.map(str::to_string),
            })
            .collect();
        Self { entries }
    }

    /// Build a catalog from explicit entries.
    #[must_use]
    pub fn from_entries(entries: Vec<MenuEntry>) -> Self {
        Self { entries }
    }

    /// All entries in catalog order.
    #[must_use]
    pub fn entries(&self) -> &[MenuEntry] {
        &self.entries
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries whose name contains `query`, ignoring case.
    ///
    /// An empty query returns every entry. Order is preserved.
    #[must_use]
    pub fn filter(&self, query: &str) -> Vec<&MenuEntry> {
        self.entries.iter().filter(|e| e.matches(query)).collect()
    }

    /// Find an entry by exact name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&MenuEntry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Find an entry by exact name, falling back to a case-insensitive match.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&MenuEntry> {
        self.get(name).or_else(|| {
            let wanted = name.to_lowercase();
            self.entries.iter().find(|e| e.name.to_lowercase() == wanted)
        })
    }

    /// Replace the name and price of the entry currently named `original`.
    ///
    /// The new name is trimmed. Returns `Ok(false)` when no entry has the
    /// original name. The image is kept.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidName`] if `name` is blank, or
    /// [`Error::DuplicateName`] if another entry already has `name`,
    /// ignoring case.
    pub fn update(&mut self, original: &str, name: &str, price: Price) -> Result<bool> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidName);
        }

        let Some(index) = self.entries.iter().position(|e| e.name == original) else {
            debug!("No catalog entry named {original:?}, edit ignored");
            return Ok(false);
        };

        let wanted = name.to_lowercase();
        let taken = self
            .entries
            .iter()
            .enumerate()
            .any(|(i, e)| i != index && e.name.to_lowercase() == wanted);
        if taken {
            return Err(Error::DuplicateName {
                name: name.to_string(),
            });
        }

        let entry = &mut self.entries[index];
        entry.name = name.to_string();
        entry.price = price;
        debug!("Updated catalog entry {original:?} -> {name:?} at {price}");
        Ok(true)
    }
}
