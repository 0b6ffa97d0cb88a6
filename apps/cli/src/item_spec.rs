//! # Item Spec Parser
//!
//! Parses the compact `--item` argument into a [`CartLine`].
//!
//! ## Format
//! ```text
//! product=<id>,qty=<n>[,size=P|M|G][,crust=<id>][,extras=<id>+<id>]
//! ```
//!
//! `product` and `qty` are mandatory; `size`, `crust` and `extras` only
//! make sense on pizza lines (the pricing engine rejects them elsewhere).
//! Extras are `+`-separated so the whole spec stays one shell word.

use pizzaria_core::{CartLine, PizzaSize, ValidationError};

/// Parses one `--item` spec into an unpriced cart line.
///
/// Unknown keys and duplicate keys are rejected rather than ignored, so
/// a typo like `qtd=2` fails loudly instead of silently ordering one.
pub fn parse_item_spec(spec: &str) -> Result<CartLine, ValidationError> {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "item".to_string(),
        reason: reason.to_string(),
    };

    let mut product_id: Option<String> = None;
    let mut quantity: Option<i64> = None;
    let mut size: Option<PizzaSize> = None;
    let mut crust_id: Option<String> = None;
    let mut extra_ids: Option<Vec<String>> = None;

    for part in spec.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (key, value) = part
            .split_once('=')
            .ok_or_else(|| invalid(&format!("expected key=value, got '{part}'")))?;
        let value = value.trim();
        if value.is_empty() {
            return Err(invalid(&format!("'{key}' has an empty value")));
        }

        match key.trim() {
            "product" => {
                if product_id.replace(value.to_string()).is_some() {
                    return Err(invalid("'product' given twice"));
                }
            }
            "qty" => {
                let qty = value
                    .parse::<i64>()
                    .map_err(|_| invalid(&format!("'qty' is not an integer: '{value}'")))?;
                if quantity.replace(qty).is_some() {
                    return Err(invalid("'qty' given twice"));
                }
            }
            "size" => {
                if size.replace(PizzaSize::parse(value)?).is_some() {
                    return Err(invalid("'size' given twice"));
                }
            }
            "crust" => {
                if crust_id.replace(value.to_string()).is_some() {
                    return Err(invalid("'crust' given twice"));
                }
            }
            "extras" => {
                let ids: Vec<String> = value
                    .split('+')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect();
                if ids.is_empty() {
                    return Err(invalid("'extras' has no ids"));
                }
                if extra_ids.replace(ids).is_some() {
                    return Err(invalid("'extras' given twice"));
                }
            }
            other => {
                return Err(invalid(&format!(
                    "unknown key '{other}' (expected product, qty, size, crust, extras)"
                )))
            }
        }
    }

    let product_id = product_id.ok_or_else(|| invalid("'product' is required"))?;
    let quantity = quantity.ok_or_else(|| invalid("'qty' is required"))?;

    Ok(CartLine {
        product_id,
        quantity,
        size,
        crust_id,
        extra_ids: extra_ids.unwrap_or_default(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_spec() {
        let line = parse_item_spec("product=dk-soda,qty=2").unwrap();
        assert_eq!(line.product_id, "dk-soda");
        assert_eq!(line.quantity, 2);
        assert!(line.size.is_none());
        assert!(line.crust_id.is_none());
        assert!(line.extra_ids.is_empty());
    }

    #[test]
    fn test_full_pizza_spec() {
        let line = parse_item_spec(
            "product=pz-1,qty=1,size=G,crust=cr-1,extras=xt-1+xt-2",
        )
        .unwrap();
        assert_eq!(line.size, Some(PizzaSize::G));
        assert_eq!(line.crust_id.as_deref(), Some("cr-1"));
        assert_eq!(line.extra_ids, vec!["xt-1", "xt-2"]);
    }

    #[test]
    fn test_whitespace_is_tolerated() {
        let line = parse_item_spec(" product = pz-1 , qty = 3 , size = m ").unwrap();
        assert_eq!(line.product_id, "pz-1");
        assert_eq!(line.quantity, 3);
        assert_eq!(line.size, Some(PizzaSize::M));
    }

    #[test]
    fn test_missing_required_keys() {
        assert!(parse_item_spec("qty=2").is_err());
        assert!(parse_item_spec("product=pz-1").is_err());
        assert!(parse_item_spec("").is_err());
    }

    #[test]
    fn test_rejects_unknown_and_duplicate_keys() {
        assert!(parse_item_spec("product=pz-1,qtd=2").is_err());
        assert!(parse_item_spec("product=pz-1,qty=2,qty=3").is_err());
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(parse_item_spec("product=pz-1,qty=two").is_err());
        assert!(parse_item_spec("product=pz-1,qty=1,size=XL").is_err());
        assert!(parse_item_spec("product=pz-1,qty=1,extras=").is_err());
    }
}
