//! Domain invariant checks over already-fetched cart data.
//!
//! Pure functions: they take a parsed [`CartSnapshot`] and a set of
//! expected products, and report the first mismatch with the offending
//! entity, field, and both values. Each check is independent;
//! [`check_cart`] composes them all.

use crate::parse::normalize_ws;
use crate::result::{ComprarError, ComprarResult};

/// A product as the test expects it in the cart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductInfo {
    /// Product name as rendered
    pub name: String,
    /// Unit price, integer minor-unit-free currency
    pub price: i64,
    /// Expected quantity
    pub qty: i64,
}

impl ProductInfo {
    /// Create an expected product
    #[must_use]
    pub fn new(name: impl Into<String>, price: i64, qty: i64) -> Self {
        Self {
            name: name.into(),
            price,
            qty,
        }
    }

    /// Expected line total
    #[must_use]
    pub const fn line_total(&self) -> i64 {
        self.price * self.qty
    }

    /// Same product with a different expected quantity
    #[must_use]
    pub fn with_qty(&self, qty: i64) -> Self {
        Self {
            name: self.name.clone(),
            price: self.price,
            qty,
        }
    }
}

/// One parsed cart row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartRowData {
    /// Product name
    pub name: String,
    /// Category line
    pub category: String,
    /// Unit price
    pub price: i64,
    /// Quantity
    pub quantity: i64,
    /// Rendered line total
    pub line_total: i64,
}

/// A parsed cart table
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CartSnapshot {
    rows: Vec<CartRowData>,
}

impl CartSnapshot {
    /// Wrap parsed rows
    #[must_use]
    pub fn new(rows: Vec<CartRowData>) -> Self {
        Self { rows }
    }

    /// The parsed rows
    #[must_use]
    pub fn rows(&self) -> &[CartRowData] {
        &self.rows
    }

    /// Sum of rendered line totals
    #[must_use]
    pub fn total(&self) -> i64 {
        self.rows.iter().map(|r| r.line_total).sum()
    }

    /// Row matching a product name, whitespace-normalized
    #[must_use]
    pub fn row_named(&self, name: &str) -> Option<&CartRowData> {
        let want = normalize_ws(name);
        self.rows.iter().find(|r| normalize_ws(&r.name) == want)
    }
}

fn missing(name: &str) -> ComprarError {
    ComprarError::Mismatch {
        entity: name.to_string(),
        field: "presence".to_string(),
        expected: "in cart".to_string(),
        actual: "absent".to_string(),
    }
}

fn mismatch(entity: &str, field: &str, expected: i64, actual: i64) -> ComprarError {
    ComprarError::Mismatch {
        entity: entity.to_string(),
        field: field.to_string(),
        expected: expected.to_string(),
        actual: actual.to_string(),
    }
}

/// Every expected product name appears in the cart
pub fn check_row_names(cart: &CartSnapshot, expected: &[ProductInfo]) -> ComprarResult<()> {
    for product in expected {
        if cart.row_named(&product.name).is_none() {
            return Err(missing(&product.name));
        }
    }
    Ok(())
}

/// Every expected product has the expected quantity
pub fn check_row_quantities(cart: &CartSnapshot, expected: &[ProductInfo]) -> ComprarResult<()> {
    for product in expected {
        let row = cart.row_named(&product.name).ok_or_else(|| missing(&product.name))?;
        if row.quantity != product.qty {
            return Err(mismatch(&product.name, "quantity", product.qty, row.quantity));
        }
    }
    Ok(())
}

/// Every expected product has the expected unit price
pub fn check_row_prices(cart: &CartSnapshot, expected: &[ProductInfo]) -> ComprarResult<()> {
    for product in expected {
        let row = cart.row_named(&product.name).ok_or_else(|| missing(&product.name))?;
        if row.price != product.price {
            return Err(mismatch(&product.name, "price", product.price, row.price));
        }
    }
    Ok(())
}

/// Every expected product's rendered line total equals `qty * price`
pub fn check_line_totals(cart: &CartSnapshot, expected: &[ProductInfo]) -> ComprarResult<()> {
    for product in expected {
        let row = cart.row_named(&product.name).ok_or_else(|| missing(&product.name))?;
        if row.line_total != product.line_total() {
            return Err(mismatch(
                &product.name,
                "line total",
                product.line_total(),
                row.line_total,
            ));
        }
    }
    Ok(())
}

/// Every row's own `line_total == price * quantity`, regardless of
/// expectations
pub fn check_row_invariants(cart: &CartSnapshot) -> ComprarResult<()> {
    for row in cart.rows() {
        if row.line_total != row.price * row.quantity {
            return Err(mismatch(
                &row.name,
                "line total",
                row.price * row.quantity,
                row.line_total,
            ));
        }
    }
    Ok(())
}

/// The cart-wide total equals the sum of expected `qty * price`
pub fn check_cart_total(cart: &CartSnapshot, expected: &[ProductInfo]) -> ComprarResult<()> {
    let want: i64 = expected.iter().map(ProductInfo::line_total).sum();
    let got = cart.total();
    if got != want {
        return Err(mismatch("cart", "total", want, got));
    }
    Ok(())
}

/// All of the above, in order
pub fn check_cart(cart: &CartSnapshot, expected: &[ProductInfo]) -> ComprarResult<()> {
    check_row_names(cart, expected)?;
    check_row_quantities(cart, expected)?;
    check_row_prices(cart, expected)?;
    check_line_totals(cart, expected)?;
    check_row_invariants(cart)?;
    check_cart_total(cart, expected)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;

    fn row(name: &str, price: i64, qty: i64) -> CartRowData {
        CartRowData {
            name: name.to_string(),
            category: "Women > Tops".to_string(),
            price,
            quantity: qty,
            line_total: price * qty,
        }
    }

    fn cart() -> CartSnapshot {
        CartSnapshot::new(vec![row("Blue Top", 500, 1), row("Men Tshirt", 400, 3)])
    }

    #[test]
    fn test_check_cart_passes_on_matching_state() {
        let expected = [
            ProductInfo::new("Blue Top", 500, 1),
            ProductInfo::new("Men Tshirt", 400, 3),
        ];
        check_cart(&cart(), &expected).unwrap();
    }

    #[test]
    fn test_name_matching_is_whitespace_normalized() {
        let expected = [ProductInfo::new("Blue  Top", 500, 1)];
        check_row_names(&cart(), &expected).unwrap();
    }

    #[test]
    fn test_missing_product_reports_presence() {
        let expected = [ProductInfo::new("Winter Coat", 900, 1)];
        match check_row_names(&cart(), &expected) {
            Err(ComprarError::Mismatch { entity, field, .. }) => {
                assert_eq!(entity, "Winter Coat");
                assert_eq!(field, "presence");
            }
            other => panic!("expected Mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_quantity_mismatch_carries_both_values() {
        let expected = [ProductInfo::new("Blue Top", 500, 4)];
        match check_row_quantities(&cart(), &expected) {
            Err(ComprarError::Mismatch {
                field,
                expected,
                actual,
                ..
            }) => {
                assert_eq!(field, "quantity");
                assert_eq!(expected, "4");
                assert_eq!(actual, "1");
            }
            other => panic!("expected Mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_price_mismatch() {
        let expected = [ProductInfo::new("Blue Top", 999, 1)];
        assert!(check_row_prices(&cart(), &expected).is_err());
    }

    #[test]
    fn test_line_total_mismatch() {
        let mut broken = cart();
        broken.rows[0].line_total = 123;
        let expected = [ProductInfo::new("Blue Top", 500, 1)];
        assert!(check_line_totals(&broken, &expected).is_err());
        assert!(check_row_invariants(&broken).is_err());
    }

    #[test]
    fn test_cart_total_sums_line_totals() {
        let expected = [
            ProductInfo::new("Blue Top", 500, 1),
            ProductInfo::new("Men Tshirt", 400, 3),
        ];
        check_cart_total(&cart(), &expected).unwrap();
        assert_eq!(cart().total(), 1700);
    }

    #[test]
    fn test_cart_total_mismatch() {
        let expected = [ProductInfo::new("Blue Top", 500, 1)];
        match check_cart_total(&cart(), &expected) {
            Err(ComprarError::Mismatch { entity, field, .. }) => {
                assert_eq!(entity, "cart");
                assert_eq!(field, "total");
            }
            other => panic!("expected Mismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_product_info_line_total() {
        let product = ProductInfo::new("Blue Top", 500, 4);
        assert_eq!(product.line_total(), 2000);
        assert_eq!(product.with_qty(2).line_total(), 1000);
    }
}
