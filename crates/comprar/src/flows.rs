//! Reusable multi-page flows for cart scenarios.

use crate::checks::ProductInfo;
use crate::pages::{CartPage, ListingPage, ProductDetailsPage};
use crate::parse;
use crate::result::ComprarResult;
use crate::session::Session;

/// Add a product from the listing grid (quantity 1) and return its info.
pub fn add_from_listing(session: &Session, index: usize) -> ComprarResult<ProductInfo> {
    ListingPage::new(session).add_to_cart_by_hover(index, true)
}

/// Open a product's details page, set a quantity, add to cart, and return
/// the product as the page reported it, including the quantity the field
/// actually stored, which the cart is expected to reflect.
pub fn add_from_details(
    session: &Session,
    index: usize,
    qty: &str,
    back_to_listing: bool,
) -> ComprarResult<ProductInfo> {
    let listing = ListingPage::new(session);
    listing.view_product(index)?;

    let details = ProductDetailsPage::new(session);
    details.wait_loaded()?;
    let stored = details.set_quantity(qty)?;
    let name = details.name()?;
    let price = details.price()?;
    details.add_to_cart(true)?;

    if back_to_listing {
        session.goto_base()?;
    }
    Ok(ProductInfo::new(name, price, parse::parse_quantity(&stored)?))
}

/// Open the cart via the nav menu
pub fn open_cart(session: &Session) -> ComprarResult<CartPage<'_>> {
    CartPage::open(session)
}
