//! Shopping cart page.
//!
//! Rows are keyed by product id (`tr#product-<id>`); a [`CartRow`] derives
//! its cell locators from that root, and [`CartPage::snapshot`] parses the
//! whole table into plain values for the domain checks.

use crate::checks::{CartRowData, CartSnapshot};
use crate::components::NavMenu;
use crate::locator::Locator;
use crate::parse;
use crate::result::{ComprarError, ComprarResult};
use crate::session::Session;

/// Selector table for the cart table
pub mod sel {
    /// The cart table
    pub const TABLE: &str = "table.table.table-condensed";
    /// All product rows
    pub const ROWS: &str = "table.table.table-condensed tr[id^='product-']";
    /// Row-relative: product name link
    pub const ROW_NAME: &str = ".cart_description h4 a";
    /// Row-relative: category line
    pub const ROW_CATEGORY: &str = ".cart_description p";
    /// Row-relative: unit price cell
    pub const ROW_PRICE: &str = ".cart_price p";
    /// Row-relative: quantity button
    pub const ROW_QUANTITY: &str = ".cart_quantity button";
    /// Row-relative: line total cell
    pub const ROW_TOTAL: &str = ".cart_total_price";
    /// Row-relative: delete button
    pub const ROW_DELETE: &str = ".cart_quantity_delete";
}

/// One row of the cart table
#[derive(Debug, Clone, Copy)]
pub struct CartRow<'a> {
    session: &'a Session,
    product_id: i64,
}

impl<'a> CartRow<'a> {
    /// Bind to a row by product id
    #[must_use]
    pub const fn new(session: &'a Session, product_id: i64) -> Self {
        Self {
            session,
            product_id,
        }
    }

    /// The product id this row belongs to
    #[must_use]
    pub const fn product_id(&self) -> i64 {
        self.product_id
    }

    fn root(&self) -> Locator {
        Locator::css(format!("tr#product-{}", self.product_id))
    }

    fn cell(&self, relative: &str) -> Locator {
        self.root().child(relative)
    }

    /// Product name, whitespace-normalized
    pub fn name(&self) -> ComprarResult<String> {
        let text = self.session.waiter().text_of(&self.cell(sel::ROW_NAME))?;
        Ok(parse::normalize_ws(&text))
    }

    /// Category line
    pub fn category(&self) -> ComprarResult<String> {
        let text = self
            .session
            .waiter()
            .text_of(&self.cell(sel::ROW_CATEGORY))?;
        Ok(parse::normalize_ws(&text))
    }

    /// Unit price parsed to an integer
    pub fn price(&self) -> ComprarResult<i64> {
        let text = self.session.waiter().text_of(&self.cell(sel::ROW_PRICE))?;
        parse::parse_price(&text)
    }

    /// Quantity parsed to an integer
    pub fn quantity(&self) -> ComprarResult<i64> {
        let text = self
            .session
            .waiter()
            .text_of(&self.cell(sel::ROW_QUANTITY))?;
        parse::parse_quantity(&text)
    }

    /// Line total parsed to an integer
    pub fn line_total(&self) -> ComprarResult<i64> {
        let text = self.session.waiter().text_of(&self.cell(sel::ROW_TOTAL))?;
        parse::parse_price(&text)
    }

    /// Click the row's delete button and wait for the row to detach
    pub fn delete(&self) -> ComprarResult<()> {
        let row = self.session.waiter().present(&self.root())?;
        self.session.waiter().click(&self.cell(sel::ROW_DELETE))?;
        self.session.waiter().stale(&row)
    }

    /// Parse the whole row into plain values
    pub fn data(&self) -> ComprarResult<CartRowData> {
        Ok(CartRowData {
            name: self.name()?,
            category: self.category()?,
            price: self.price()?,
            quantity: self.quantity()?,
            line_total: self.line_total()?,
        })
    }
}

/// The cart page
#[derive(Debug, Clone, Copy)]
pub struct CartPage<'a> {
    session: &'a Session,
}

impl<'a> CartPage<'a> {
    /// Path under the base address
    pub const PATH: &'static str = "/view_cart";

    /// Bind to a session
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Open the cart via the nav menu and wait for the table
    pub fn open(session: &'a Session) -> ComprarResult<Self> {
        NavMenu::new(session).open_cart()?;
        let page = Self::new(session);
        session.waiter().present(&Locator::css(sel::TABLE))?;
        Ok(page)
    }

    /// Rows currently in the table. Waits for the table, not for rows: an
    /// empty cart yields an empty list.
    pub fn rows(&self) -> ComprarResult<Vec<CartRow<'a>>> {
        self.session.waiter().present(&Locator::css(sel::TABLE))?;
        let handles = self.session.driver().find_all(&Locator::css(sel::ROWS))?;
        let mut rows = Vec::with_capacity(handles.len());
        for handle in &handles {
            let id_attr = self
                .session
                .driver()
                .attribute(handle, "id")?
                .ok_or(ComprarError::FieldAbsent {
                    field: "id attribute on cart row".to_string(),
                })?;
            let product_id = id_attr
                .strip_prefix("product-")
                .and_then(|s| s.parse().ok())
                .ok_or(ComprarError::FieldAbsent {
                    field: format!("product id in row id {id_attr:?}"),
                })?;
            rows.push(CartRow::new(self.session, product_id));
        }
        Ok(rows)
    }

    /// Row for a specific product id
    #[must_use]
    pub const fn row(&self, product_id: i64) -> CartRow<'a> {
        CartRow::new(self.session, product_id)
    }

    /// Parse the whole table into plain values for the domain checks
    pub fn snapshot(&self) -> ComprarResult<CartSnapshot> {
        let mut rows = Vec::new();
        for row in self.rows()? {
            rows.push(row.data()?);
        }
        Ok(CartSnapshot::new(rows))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::sim::{SimDom, SimDriver, SimNode};
    use std::time::Duration;

    fn insert_row(dom: &mut SimDom, id: i64, name: &str, price: i64, qty: i64) {
        let root = format!("tr#product-{id}");
        let _ = dom.insert(
            SimNode::new([root.clone(), sel::ROWS.to_string()])
                .with_attr("id", format!("product-{id}")),
        );
        let _ = dom.insert(SimNode::new([format!("{root} {}", sel::ROW_NAME)]).with_text(name));
        let _ = dom.insert(
            SimNode::new([format!("{root} {}", sel::ROW_CATEGORY)]).with_text("Women > Tops"),
        );
        let _ = dom.insert(
            SimNode::new([format!("{root} {}", sel::ROW_PRICE)]).with_text(format!("Rs. {price}")),
        );
        let _ = dom.insert(
            SimNode::new([format!("{root} {}", sel::ROW_QUANTITY)]).with_text(qty.to_string()),
        );
        let _ = dom.insert(
            SimNode::new([format!("{root} {}", sel::ROW_TOTAL)])
                .with_text(format!("Rs. {}", price * qty)),
        );
        let _ = dom.insert(SimNode::new([format!("{root} {}", sel::ROW_DELETE)]));
    }

    fn cart_session() -> (Session, crate::sim::SimHandle) {
        let driver = SimDriver::new();
        let handle = driver.handle();
        {
            let mut dom = handle.dom();
            let _ = dom.insert(SimNode::new([sel::TABLE]));
            insert_row(&mut dom, 1, "Blue Top", 500, 1);
            insert_row(&mut dom, 2, "Men Tshirt", 400, 3);
        }
        let config = Config::new("https://shop.test")
            .unwrap()
            .with_default_timeout(Duration::from_millis(200))
            .with_quick_timeout(Duration::from_millis(100))
            .with_poll_interval(Duration::from_millis(10));
        (Session::new(Box::new(driver), config), handle)
    }

    #[test]
    fn test_rows_discovers_product_ids() {
        let (session, _) = cart_session();
        let cart = CartPage::new(&session);
        let ids: Vec<i64> = cart.rows().unwrap().iter().map(CartRow::product_id).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn test_row_parses_cells() {
        let (session, _) = cart_session();
        let cart = CartPage::new(&session);
        let row = cart.row(2);
        assert_eq!(row.name().unwrap(), "Men Tshirt");
        assert_eq!(row.price().unwrap(), 400);
        assert_eq!(row.quantity().unwrap(), 3);
        assert_eq!(row.line_total().unwrap(), 1200);
        assert_eq!(row.category().unwrap(), "Women > Tops");
    }

    #[test]
    fn test_snapshot_holds_all_rows() {
        let (session, _) = cart_session();
        let snapshot = CartPage::new(&session).snapshot().unwrap();
        assert_eq!(snapshot.rows().len(), 2);
        assert_eq!(snapshot.total(), 500 + 1200);
    }

    #[test]
    fn test_empty_cart_is_empty_not_error() {
        let driver = SimDriver::new();
        let handle = driver.handle();
        let _ = handle.dom().insert(SimNode::new([sel::TABLE]));
        let config = Config::new("https://shop.test")
            .unwrap()
            .with_default_timeout(Duration::from_millis(100))
            .with_poll_interval(Duration::from_millis(10));
        let session = Session::new(Box::new(driver), config);
        assert!(CartPage::new(&session).rows().unwrap().is_empty());
    }

    #[test]
    fn test_delete_waits_for_staleness() {
        let (session, handle) = cart_session();
        let cart = CartPage::new(&session);

        // Wire the delete button to detach the row.
        let delete_key = format!("tr#product-1 {}", sel::ROW_DELETE);
        let del_id = handle.dom().find(&delete_key)[0];
        handle.on_click(del_id, |dom| dom.remove("tr#product-1"));

        cart.row(1).delete().unwrap();
        let ids: Vec<i64> = cart.rows().unwrap().iter().map(CartRow::product_id).collect();
        assert_eq!(ids, vec![2]);
    }
}
