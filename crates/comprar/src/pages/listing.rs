//! Product listing (the "Features Items" grid on the home page).
//!
//! Add-to-cart on the grid is hover-driven: the button lives in an overlay
//! revealed when the pointer enters a product card, so the flow is hover →
//! secondary wait for the overlay → click, each step with its own deadline.

use crate::components::{CartModal, ConsentPopup};
use crate::locator::Locator;
use crate::parse;
use crate::result::ComprarResult;
use crate::session::Session;

/// Selector table for the product grid
pub mod sel {
    /// One card per product
    pub const PRODUCT_CARDS: &str = ".features_items .product-image-wrapper";
    /// Product name inside a card
    pub const PRODUCT_NAMES: &str = ".features_items .productinfo p";
    /// Rendered price inside a card
    pub const PRODUCT_PRICES: &str = ".features_items .productinfo h2";
    /// Add-to-cart link in the hover overlay
    pub const OVERLAY_ADD_TO_CART: &str =
        ".features_items .product-overlay .overlay-content a.add-to-cart";
    /// "View Product" link under a card
    pub const VIEW_PRODUCT: &str = ".features_items .choose a";
}

/// The home-page product grid
#[derive(Debug, Clone, Copy)]
pub struct ListingPage<'a> {
    session: &'a Session,
}

impl<'a> ListingPage<'a> {
    /// Bind to a session
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Navigate to the base address, dismiss the consent overlay and wait
    /// for the grid to render.
    pub fn load(&self) -> ComprarResult<()> {
        self.session.goto_base()?;
        ConsentPopup::new(self.session).accept()?;
        self.session
            .waiter()
            .visible(&Locator::css(sel::PRODUCT_CARDS))?;
        Ok(())
    }

    /// Product name at an index, whitespace-normalized
    pub fn product_name(&self, index: usize) -> ComprarResult<String> {
        let text = self
            .session
            .waiter()
            .text_of_nth(&Locator::css(sel::PRODUCT_NAMES), index)?;
        Ok(parse::normalize_ws(&text))
    }

    /// Product price at an index, parsed to an integer
    pub fn product_price(&self, index: usize) -> ComprarResult<i64> {
        let text = self
            .session
            .waiter()
            .text_of_nth(&Locator::css(sel::PRODUCT_PRICES), index)?;
        parse::parse_price(&text)
    }

    /// Open the details page of the product at an index
    pub fn view_product(&self, index: usize) -> ComprarResult<()> {
        self.session
            .waiter()
            .click_nth(&Locator::css(sel::VIEW_PRODUCT), index)?;
        self.session.quick().url_contains("/product_details")
    }

    /// Hover the card at an index until its overlay add-to-cart appears,
    /// click it, and handle the confirmation modal.
    ///
    /// Returns the added product as seen on the card. With `close_modal`
    /// the modal is dismissed via "Continue Shopping"; otherwise it is left
    /// open for the caller.
    pub fn add_to_cart_by_hover(
        &self,
        index: usize,
        close_modal: bool,
    ) -> ComprarResult<crate::checks::ProductInfo> {
        let name = self.product_name(index)?;
        let price = self.product_price(index)?;

        let waiter = self.session.waiter();
        let _ = waiter.hover_nth(&Locator::css(sel::PRODUCT_CARDS), index)?;
        // Overlay reveal runs on the short deadline, separate from the move.
        self.session
            .quick()
            .visible_nth(&Locator::css(sel::OVERLAY_ADD_TO_CART), index)?;
        waiter.click_nth(&Locator::css(sel::OVERLAY_ADD_TO_CART), index)?;

        let modal = CartModal::new(self.session);
        modal.wait_until_visible()?;
        if close_modal {
            modal.continue_shopping()?;
        }
        Ok(crate::checks::ProductInfo::new(name, price, 1))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::result::ComprarError;
    use crate::sim::{SimDriver, SimNode};
    use std::time::Duration;

    fn listing_session() -> (Session, crate::sim::SimHandle) {
        let driver = SimDriver::new();
        let handle = driver.handle();
        {
            let mut dom = handle.dom();
            for (name, price) in [("Blue Top", "Rs. 500"), ("Men Tshirt", "Rs. 400")] {
                let _ = dom.insert(SimNode::new([sel::PRODUCT_CARDS]));
                let _ = dom.insert(SimNode::new([sel::PRODUCT_NAMES]).with_text(name));
                let _ = dom.insert(SimNode::new([sel::PRODUCT_PRICES]).with_text(price));
            }
        }
        let config = Config::new("https://shop.test")
            .unwrap()
            .with_default_timeout(Duration::from_millis(200))
            .with_quick_timeout(Duration::from_millis(100))
            .with_poll_interval(Duration::from_millis(10));
        (Session::new(Box::new(driver), config), handle)
    }

    #[test]
    fn test_product_getters_parse_domain_values() {
        let (session, _) = listing_session();
        let listing = ListingPage::new(&session);
        assert_eq!(listing.product_name(0).unwrap(), "Blue Top");
        assert_eq!(listing.product_price(0).unwrap(), 500);
        assert_eq!(listing.product_name(1).unwrap(), "Men Tshirt");
        assert_eq!(listing.product_price(1).unwrap(), 400);
    }

    #[test]
    fn test_out_of_range_product_is_fatal() {
        let (session, _) = listing_session();
        let listing = ListingPage::new(&session);
        assert!(matches!(
            listing.product_name(9),
            Err(ComprarError::IndexOutOfBounds { .. })
        ));
    }

    #[test]
    fn test_load_waits_for_grid() {
        let (session, _) = listing_session();
        ListingPage::new(&session).load().unwrap();
        assert_eq!(session.current_url().unwrap(), "https://shop.test/");
    }
}
