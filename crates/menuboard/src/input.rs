//! Parsing of text typed into quantity, price and name fields.

use crate::catalog::Price;
use crate::error::{Error, Result};
use crate::ledger::Quantity;

/// Parse a quantity of at least one.
///
/// # Errors
///
/// Returns [`Error::InvalidQuantity`] for anything but a positive integer.
pub fn parse_quantity(text: &str) -> Result<Quantity> {
    text.trim()
        .parse::<u32>()
        .ok()
        .and_then(Quantity::new)
        .ok_or_else(|| Error::InvalidQuantity {
            input: text.to_string(),
        })
}

/// Parse a non-negative whole price.
///
/// # Errors
///
/// Returns [`Error::InvalidPrice`] for anything but a non-negative integer.
pub fn parse_price(text: &str) -> Result<Price> {
    text.trim().parse::<Price>().map_err(|_| Error::InvalidPrice {
        input: text.to_string(),
    })
}

/// Parse a menu item name.
///
/// # Errors
///
/// Returns [`Error::InvalidName`] if the name is blank.
pub fn parse_name(text: &str) -> Result<String> {
    let name = text.trim();
    if name.is_empty() {
        return Err(Error::InvalidName);
    }
    Ok(name.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quantity_accepts_positive() {
        assert_eq!(parse_quantity("1").unwrap().get(), 1);
        assert_eq!(parse_quantity(" 3 ").unwrap().get(), 3);
        assert_eq!(parse_quantity("10").unwrap().get(), 10);
    }

    #[test]
    fn test_parse_quantity_rejects_garbage() {
        for text in ["", "abc", "0", "-1", "2.5", "1e3", "NaN", "99999999999"] {
            let err = parse_quantity(text).unwrap_err();
            assert!(matches!(err, Error::InvalidQuantity { .. }), "accepted {text:?}");
        }
    }

    #[test]
    fn test_parse_price() {
        assert_eq!(parse_price("0").unwrap(), 0);
        assert_eq!(parse_price(" 45\n").unwrap(), 45);
        for text in ["", "abc", "-5", "12.50", "₹30"] {
            assert!(
                matches!(parse_price(text), Err(Error::InvalidPrice { .. })),
                "accepted {text:?}"
            );
        }
    }

    #[test]
    fn test_parse_name() {
        assert_eq!(parse_name("  Masala Dosa ").unwrap(), "Masala Dosa");
        assert!(matches!(parse_name("   "), Err(Error::InvalidName)));
    }
}
