//! Product details page.

use crate::components::CartModal;
use crate::locator::Locator;
use crate::parse;
use crate::result::ComprarResult;
use crate::session::Session;

/// Selector table for the details section
pub mod sel {
    /// Details container
    pub const COMPONENT: &str = ".product-information";
    /// Product name heading
    pub const NAME: &str = ".product-information h2";
    /// Rendered price
    pub const PRICE: &str = ".product-information span span";
    /// Quantity input
    pub const QUANTITY_INPUT: &str = ".product-information #quantity";
    /// Add-to-cart button
    pub const ADD_TO_CART: &str = ".product-information button.cart";
    /// Info paragraphs (Availability / Condition / Brand / Category)
    pub const INFO_FIELDS: &str = ".product-information p";
}

/// The details page of one product
#[derive(Debug, Clone, Copy)]
pub struct ProductDetailsPage<'a> {
    session: &'a Session,
}

impl<'a> ProductDetailsPage<'a> {
    /// Bind to a session
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Wait for the details section to render
    pub fn wait_loaded(&self) -> ComprarResult<()> {
        self.session.waiter().visible(&Locator::css(sel::NAME))?;
        Ok(())
    }

    /// Product name, whitespace-normalized
    pub fn name(&self) -> ComprarResult<String> {
        let text = self.session.waiter().text_of(&Locator::css(sel::NAME))?;
        Ok(parse::normalize_ws(&text))
    }

    /// Price parsed to an integer
    pub fn price(&self) -> ComprarResult<i64> {
        let text = self.session.waiter().text_of(&Locator::css(sel::PRICE))?;
        parse::parse_price(&text)
    }

    /// Value of an info paragraph like `"Condition: New"` → `"New"`.
    /// Empty when no paragraph carries the label.
    pub fn info_field(&self, label: &str) -> ComprarResult<String> {
        let texts = self
            .session
            .waiter()
            .texts_of_all(&Locator::css(sel::INFO_FIELDS))?;
        Ok(texts
            .iter()
            .find(|t| t.contains(label))
            .and_then(|t| t.split_once(':'))
            .map(|(_, v)| v.trim().to_string())
            .unwrap_or_default())
    }

    /// Category info field
    pub fn category(&self) -> ComprarResult<String> {
        self.info_field("Category")
    }

    /// Availability info field
    pub fn availability(&self) -> ComprarResult<String> {
        self.info_field("Availability")
    }

    /// Condition info field
    pub fn condition(&self) -> ComprarResult<String> {
        self.info_field("Condition")
    }

    /// Brand info field
    pub fn brand(&self) -> ComprarResult<String> {
        self.info_field("Brand")
    }

    /// Set the quantity with fill semantics; returns the value the field
    /// actually stored.
    pub fn set_quantity(&self, qty: &str) -> ComprarResult<String> {
        let locator = Locator::css(sel::QUANTITY_INPUT);
        self.session.waiter().fill(&locator, qty)?;
        self.session.waiter().value_of(&locator)
    }

    /// Set the quantity character by character; returns the stored value.
    ///
    /// The per-keystroke path exercises the field's own masking and length
    /// limit, which a single-shot fill bypasses.
    pub fn type_quantity(&self, qty: &str) -> ComprarResult<String> {
        let locator = Locator::css(sel::QUANTITY_INPUT);
        self.session.waiter().fill_chars(&locator, qty)?;
        self.session.waiter().value_of(&locator)
    }

    /// Current stored quantity as an integer
    pub fn quantity(&self) -> ComprarResult<i64> {
        let value = self
            .session
            .waiter()
            .value_of(&Locator::css(sel::QUANTITY_INPUT))?;
        parse::parse_quantity(&value)
    }

    /// Click add-to-cart and handle the confirmation modal.
    pub fn add_to_cart(&self, close_modal: bool) -> ComprarResult<()> {
        self.session.waiter().click(&Locator::css(sel::ADD_TO_CART))?;
        let modal = CartModal::new(self.session);
        modal.wait_until_visible()?;
        if close_modal {
            modal.continue_shopping()?;
        }
        Ok(())
    }

    /// Click add-to-cart and follow the modal's "View Cart" link
    pub fn add_to_cart_and_view_cart(&self) -> ComprarResult<()> {
        self.session.waiter().click(&Locator::css(sel::ADD_TO_CART))?;
        let modal = CartModal::new(self.session);
        modal.wait_until_visible()?;
        modal.view_cart()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::sim::{SimDriver, SimNode};
    use std::time::Duration;

    fn details_session() -> (Session, crate::sim::SimHandle) {
        let driver = SimDriver::new();
        let handle = driver.handle();
        {
            let mut dom = handle.dom();
            let _ = dom.insert(SimNode::new([sel::NAME]).with_text("Blue Top"));
            let _ = dom.insert(SimNode::new([sel::PRICE]).with_text("Rs. 500"));
            let _ = dom.insert(
                SimNode::new([sel::QUANTITY_INPUT])
                    .with_value("1")
                    .with_attr("type", "number")
                    .with_attr("maxlength", "3"),
            );
            let _ = dom.insert(SimNode::new([sel::INFO_FIELDS]).with_text("Availability: In Stock"));
            let _ = dom.insert(SimNode::new([sel::INFO_FIELDS]).with_text("Condition: New"));
            let _ = dom.insert(SimNode::new([sel::INFO_FIELDS]).with_text("Brand: Polo"));
        }
        let config = Config::new("https://shop.test")
            .unwrap()
            .with_default_timeout(Duration::from_millis(200))
            .with_quick_timeout(Duration::from_millis(100))
            .with_poll_interval(Duration::from_millis(10));
        (Session::new(Box::new(driver), config), handle)
    }

    #[test]
    fn test_getters_parse_domain_values() {
        let (session, _) = details_session();
        let details = ProductDetailsPage::new(&session);
        assert_eq!(details.name().unwrap(), "Blue Top");
        assert_eq!(details.price().unwrap(), 500);
        assert_eq!(details.availability().unwrap(), "In Stock");
        assert_eq!(details.condition().unwrap(), "New");
        assert_eq!(details.brand().unwrap(), "Polo");
        assert_eq!(details.category().unwrap(), "");
    }

    #[test]
    fn test_set_quantity_reports_stored_value() {
        let (session, _) = details_session();
        let details = ProductDetailsPage::new(&session);
        assert_eq!(details.set_quantity("3").unwrap(), "3");
        assert_eq!(details.quantity().unwrap(), 3);
    }

    #[test]
    fn test_set_quantity_truncated_by_field_limit() {
        let (session, _) = details_session();
        let details = ProductDetailsPage::new(&session);
        let stored = details.set_quantity("99999").unwrap();
        assert!(stored.len() <= 3);
    }

    #[test]
    fn test_type_quantity_filters_per_keystroke() {
        let (session, _) = details_session();
        let details = ProductDetailsPage::new(&session);
        assert_eq!(details.type_quantity("7").unwrap(), "7");
        assert_eq!(details.type_quantity("abc").unwrap(), "");
    }
}
