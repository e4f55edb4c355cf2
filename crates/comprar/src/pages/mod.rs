//! Page objects, one per screen of the storefront.

pub mod account;
pub mod cart;
pub mod listing;
pub mod login;
pub mod product;

pub use account::DeleteAccountPage;
pub use cart::{CartPage, CartRow};
pub use listing::ListingPage;
pub use login::LoginPage;
pub use product::ProductDetailsPage;
