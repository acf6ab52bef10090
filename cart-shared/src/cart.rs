//! Cart contents and checkout arithmetic.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// IVA (Mexican VAT) applied on checkout.
pub const IVA_RATE: f64 = 0.16;

/// A product as captured from the AddProduct slots.
///
/// Every field is optional: slot resolution can leave any of them empty and
/// the product is still kept so the cart mirrors what the user said.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub price: Option<f64>,
    /// Captured but not part of the subtotal.
    #[serde(default, deserialize_with = "lenient_number")]
    pub amount: Option<f64>,
}

impl Product {
    /// Build a product from raw slot text.
    pub fn from_slots(name: Option<&str>, price: Option<&str>, amount: Option<&str>) -> Self {
        Self {
            name: name
                .map(str::trim)
                .filter(|name| !name.is_empty())
                .map(String::from),
            price: price.and_then(parse_number),
            amount: amount.and_then(parse_number),
        }
    }
}

/// Parse spoken-number slot text; `None` for anything that is not a finite number.
///
/// A comma is accepted only as the single decimal separator. Input that
/// looks digit-grouped (`1,000`, `1,000.5`, `1,000,000`) is rejected rather
/// than misread.
pub fn parse_number(text: &str) -> Option<f64> {
    let text = text.trim();
    let normalized = match text.split_once(',') {
        None => text.to_string(),
        Some((whole, fraction)) => {
            if text.contains('.') || fraction.contains(',') || is_thousands_group(fraction) {
                return None;
            }
            format!("{}.{}", whole, fraction)
        }
    };

    normalized.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn is_thousands_group(fraction: &str) -> bool {
    fraction.len() == 3 && fraction.bytes().all(|b| b.is_ascii_digit())
}

/// Older records stored slot text verbatim, so numbers may arrive as strings.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_number(&s),
        _ => None,
    })
}

/// Checkout figures for a cart.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CartTotals {
    pub subtotal: f64,
    pub iva: f64,
    pub total: f64,
}

impl CartTotals {
    /// Subtotal is the plain sum of prices; `amount` does not multiply it.
    pub fn from_products(products: &[Product]) -> Self {
        let subtotal: f64 = products
            .iter()
            .enumerate()
            .map(|(position, product)| match product.price {
                Some(price) => price,
                None => {
                    warn!(position, name = ?product.name, "Product without price left out of subtotal");
                    0.0
                }
            })
            .sum();

        let iva = subtotal * IVA_RATE;

        Self {
            subtotal,
            iva,
            total: subtotal + iva,
        }
    }
}

/// Render an amount for speech: cents precision, no trailing zeros.
pub fn format_amount(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    if rounded.fract() == 0.0 {
        format!("{:.0}", rounded)
    } else {
        format!("{}", rounded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn priced(price: f64) -> Product {
        Product {
            name: Some("item".to_string()),
            price: Some(price),
            amount: Some(3.0),
        }
    }

    #[test]
    fn test_totals_ignore_amount() {
        let totals = CartTotals::from_products(&[priced(10.0), priced(20.0), priced(30.0)]);
        assert_eq!(totals.subtotal, 60.0);
        assert!((totals.total - 69.6).abs() < 1e-9);
        assert!((totals.iva - 9.6).abs() < 1e-9);
    }

    #[test]
    fn test_totals_of_empty_cart() {
        let totals = CartTotals::from_products(&[]);
        assert_eq!(totals.subtotal, 0.0);
        assert_eq!(totals.total, 0.0);
    }

    #[test]
    fn test_missing_price_counts_as_zero() {
        let totals = CartTotals::from_products(&[priced(10.0), Product::default()]);
        assert_eq!(totals.subtotal, 10.0);
    }

    #[test]
    fn test_from_slots() {
        let product = Product::from_slots(Some("leche"), Some("25,5"), Some("dos"));
        assert_eq!(product.name.as_deref(), Some("leche"));
        assert_eq!(product.price, Some(25.5));
        assert_eq!(product.amount, None);

        let empty = Product::from_slots(None, Some("?"), None);
        assert_eq!(empty, Product::default());
    }

    #[test]
    fn test_parse_number_rejects_non_finite() {
        assert_eq!(parse_number(" 12 "), Some(12.0));
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_parse_number_comma_is_decimal_only() {
        assert_eq!(parse_number("25,5"), Some(25.5));
        assert_eq!(parse_number("0,75"), Some(0.75));
        assert_eq!(parse_number("1,000"), None);
        assert_eq!(parse_number("1,000.5"), None);
        assert_eq!(parse_number("1,000,000"), None);
        assert_eq!(parse_number("1.5,2"), None);
        assert_eq!(parse_number("1e20"), Some(1e20));
    }

    #[test]
    fn test_reads_string_prices() {
        let product: Product =
            serde_json::from_value(json!({ "name": "pan", "price": "15", "amount": "2" })).unwrap();
        assert_eq!(product.price, Some(15.0));
        assert_eq!(product.amount, Some(2.0));

        let product: Product = serde_json::from_value(json!({ "price": null })).unwrap();
        assert_eq!(product, Product::default());
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(format_amount(60.0), "60");
        assert_eq!(format_amount(60.0 + 60.0 * IVA_RATE), "69.6");
        assert_eq!(format_amount(IVA_RATE * 100.0), "16");
        assert_eq!(format_amount(1.999), "2");
        assert_eq!(format_amount(2.5), "2.5");
        assert_eq!(format_amount(0.1 + 0.2), "0.3");
        assert_eq!(format_amount(1e20), "100000000000000000000");
    }
}
