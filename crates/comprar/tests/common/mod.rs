//! Scripted storefront fixture for hermetic scenario tests.
//!
//! Wires a [`SimDriver`] DOM with the same selectors the page objects use:
//! a three-product listing with hover overlays, a details section, the
//! add-to-cart modal, and a cart table that merges quantities per product,
//! the same behavior the real storefront implements server-side.

use comprar::components::{consent, modal, nav};
use comprar::pages::{cart, listing, product};
use comprar::sim::{SimDom, SimDriver, SimHandle, SimNode};
use comprar::{Config, Session};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Base address the fixture pretends to serve
pub const BASE: &str = "https://shop.test";

/// One catalog product
#[derive(Debug, Clone, Copy)]
pub struct CatalogEntry {
    /// Product id as used in cart row ids
    pub id: i64,
    /// Rendered name
    pub name: &'static str,
    /// Unit price
    pub price: i64,
}

/// The fixture's product catalog
pub const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        id: 1,
        name: "Blue Top",
        price: 500,
    },
    CatalogEntry {
        id: 2,
        name: "Men Tshirt",
        price: 400,
    },
    CatalogEntry {
        id: 3,
        name: "Sleeveless Dress",
        price: 1000,
    },
];

#[derive(Debug, Clone)]
struct CartItem {
    id: i64,
    name: String,
    price: i64,
    qty: i64,
}

fn show_modal(dom: &mut SimDom) {
    dom.show(modal::sel::MODAL);
    dom.show(modal::sel::CONTINUE_SHOPPING);
    dom.show(modal::sel::VIEW_CART);
}

fn hide_modal(dom: &mut SimDom) {
    dom.hide(modal::sel::MODAL);
    dom.hide(modal::sel::CONTINUE_SHOPPING);
    dom.hide(modal::sel::VIEW_CART);
}

fn upsert_row(dom: &mut SimDom, item: &CartItem) {
    let root = format!("tr#product-{}", item.id);
    let qty_key = format!("{root} {}", cart::sel::ROW_QUANTITY);
    let total_key = format!("{root} {}", cart::sel::ROW_TOTAL);
    if dom.find(&root).is_empty() {
        let _ = dom.insert(
            SimNode::new([root.clone(), cart::sel::ROWS.to_string()])
                .with_attr("id", format!("product-{}", item.id)),
        );
        let _ = dom.insert(
            SimNode::new([format!("{root} {}", cart::sel::ROW_NAME)]).with_text(item.name.clone()),
        );
        let _ = dom.insert(
            SimNode::new([format!("{root} {}", cart::sel::ROW_CATEGORY)])
                .with_text("Women > Tops"),
        );
        let _ = dom.insert(
            SimNode::new([format!("{root} {}", cart::sel::ROW_PRICE)])
                .with_text(format!("Rs. {}", item.price)),
        );
        let _ = dom.insert(SimNode::new([qty_key]).with_text(item.qty.to_string()));
        let _ =
            dom.insert(SimNode::new([total_key]).with_text(format!("Rs. {}", item.price * item.qty)));
        let _ = dom.insert(SimNode::new([format!("{root} {}", cart::sel::ROW_DELETE)]));
    } else {
        dom.set_text(&qty_key, item.qty.to_string());
        dom.set_text(&total_key, format!("Rs. {}", item.price * item.qty));
    }
}

/// Merge a product into the cart (same product sums quantities, one row per
/// product) and pop the confirmation modal.
fn add_item(
    items: &Arc<Mutex<Vec<CartItem>>>,
    dom: &mut SimDom,
    entry: &CatalogEntry,
    qty: i64,
) {
    let mut items = items.lock().unwrap();
    if let Some(item) = items.iter_mut().find(|i| i.id == entry.id) {
        item.qty += qty;
        upsert_row(dom, item);
    } else {
        let item = CartItem {
            id: entry.id,
            name: entry.name.to_string(),
            price: entry.price,
            qty,
        };
        upsert_row(dom, &item);
        items.push(item);
    }
    show_modal(dom);
}

/// Build the scripted store and a session over it
pub fn demo_store() -> (Session, SimHandle) {
    let driver = SimDriver::new();
    let handle = driver.handle();
    let items: Arc<Mutex<Vec<CartItem>>> = Arc::default();
    let current_details: Arc<Mutex<usize>> = Arc::default();

    let cart_link;
    let home_link;
    let consent_btn;
    let continue_btn;
    let view_cart_btn;
    let add_btn;
    let mut card_ids = Vec::new();
    let mut overlay_ids = Vec::new();
    let mut view_ids = Vec::new();
    {
        let mut dom = handle.dom();
        dom.set_url(format!("{BASE}/"));
        dom.set_title("Automation Exercise");

        cart_link = dom.insert(SimNode::new([nav::sel::CART]));
        home_link = dom.insert(SimNode::new([nav::sel::HOME]));
        consent_btn = dom.insert(SimNode::new([consent::sel::CONSENT_BTN]));
        let _ = dom.insert(SimNode::new([cart::sel::TABLE]));

        let _ = dom.insert(SimNode::new([modal::sel::MODAL]).hidden());
        continue_btn = dom.insert(SimNode::new([modal::sel::CONTINUE_SHOPPING]).hidden());
        view_cart_btn = dom.insert(SimNode::new([modal::sel::VIEW_CART]).hidden());

        // Details section, populated when a product is viewed.
        let _ = dom.insert(SimNode::new([product::sel::NAME]));
        let _ = dom.insert(SimNode::new([product::sel::PRICE]));
        let _ = dom.insert(
            SimNode::new([product::sel::QUANTITY_INPUT])
                .with_value("1")
                .with_attr("type", "number")
                .with_attr("maxlength", "3"),
        );
        let _ = dom.insert(
            SimNode::new([product::sel::INFO_FIELDS]).with_text("Availability: In Stock"),
        );
        add_btn = dom.insert(SimNode::new([product::sel::ADD_TO_CART]));

        for entry in CATALOG {
            card_ids.push(dom.insert(SimNode::new([listing::sel::PRODUCT_CARDS])));
            let _ = dom.insert(SimNode::new([listing::sel::PRODUCT_NAMES]).with_text(entry.name));
            let _ = dom.insert(
                SimNode::new([listing::sel::PRODUCT_PRICES])
                    .with_text(format!("Rs. {}", entry.price)),
            );
            overlay_ids.push(dom.insert(SimNode::new([listing::sel::OVERLAY_ADD_TO_CART]).hidden()));
            view_ids.push(dom.insert(SimNode::new([listing::sel::VIEW_PRODUCT])));
        }
    }

    handle.on_click(cart_link, |dom| dom.set_url(format!("{BASE}/view_cart")));
    handle.on_click(home_link, |dom| dom.set_url(format!("{BASE}/")));
    handle.on_click(consent_btn, |dom| dom.hide(consent::sel::CONSENT_BTN));
    handle.on_click(continue_btn, hide_modal);
    handle.on_click(view_cart_btn, |dom| {
        hide_modal(dom);
        dom.set_url(format!("{BASE}/view_cart"));
    });

    for (idx, entry) in CATALOG.iter().enumerate() {
        handle.on_hover(card_ids[idx], move |dom| {
            dom.show_nth(listing::sel::OVERLAY_ADD_TO_CART, idx);
        });

        let items_for_overlay = Arc::clone(&items);
        handle.on_click(overlay_ids[idx], move |dom| {
            add_item(&items_for_overlay, dom, entry, 1);
        });

        let current = Arc::clone(&current_details);
        handle.on_click(view_ids[idx], move |dom| {
            *current.lock().unwrap() = idx;
            dom.set_url(format!("{BASE}/product_details/{}", entry.id));
            dom.set_text(product::sel::NAME, entry.name);
            dom.set_text(product::sel::PRICE, format!("Rs. {}", entry.price));
            dom.set_value(product::sel::QUANTITY_INPUT, "1");
        });
    }

    let items_for_details = Arc::clone(&items);
    let current = Arc::clone(&current_details);
    handle.on_click(add_btn, move |dom| {
        let entry = &CATALOG[*current.lock().unwrap()];
        let qty = dom
            .value_of(product::sel::QUANTITY_INPUT)
            .and_then(|v| v.parse().ok())
            .unwrap_or(1);
        add_item(&items_for_details, dom, entry, qty);
    });

    let config = Config::new(BASE)
        .unwrap()
        .with_default_timeout(Duration::from_secs(2))
        .with_quick_timeout(Duration::from_millis(300))
        .with_poll_interval(Duration::from_millis(10));
    (Session::new(Box::new(driver), config), handle)
}
