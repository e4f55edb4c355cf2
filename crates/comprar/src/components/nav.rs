//! Top navigation menu.

use crate::locator::Locator;
use crate::result::ComprarResult;
use crate::session::Session;

/// Selector table for the shop menu
pub mod sel {
    /// Home link
    pub const HOME: &str = ".shop-menu a[href='/']";
    /// Cart link
    pub const CART: &str = ".shop-menu a[href='/view_cart']";
    /// Login/signup link
    pub const LOGIN: &str = ".shop-menu a[href='/login']";
    /// Logout link, only rendered when logged in
    pub const LOGOUT: &str = ".shop-menu a[href='/logout']";
    /// Delete-account link, only rendered when logged in
    pub const DELETE_ACCOUNT: &str = ".shop-menu a[href='/delete_account']";
}

/// The shop menu present on every page
#[derive(Debug, Clone, Copy)]
pub struct NavMenu<'a> {
    session: &'a Session,
}

impl<'a> NavMenu<'a> {
    /// Bind to a session
    #[must_use]
    pub const fn new(session: &'a Session) -> Self {
        Self { session }
    }

    /// Click the cart link and wait for the cart URL
    pub fn open_cart(&self) -> ComprarResult<()> {
        self.session.waiter().click(&Locator::css(sel::CART))?;
        self.session.quick().url_contains("/view_cart")
    }

    /// Click the home link
    pub fn go_home(&self) -> ComprarResult<()> {
        self.session.waiter().click(&Locator::css(sel::HOME))
    }

    /// Click the login link
    pub fn open_login(&self) -> ComprarResult<()> {
        self.session.waiter().click(&Locator::css(sel::LOGIN))
    }

    /// Click the logout link
    pub fn click_logout(&self) -> ComprarResult<()> {
        self.session.waiter().click(&Locator::css(sel::LOGOUT))
    }

    /// Click the delete-account link
    pub fn click_delete_account(&self) -> ComprarResult<()> {
        self.session
            .waiter()
            .click(&Locator::css(sel::DELETE_ACCOUNT))
    }

    /// Whether the logout link is currently displayed
    pub fn logout_displayed(&self) -> ComprarResult<bool> {
        self.session.is_displayed(&Locator::css(sel::LOGOUT))
    }

    /// Whether the delete-account link is currently displayed
    pub fn delete_account_displayed(&self) -> ComprarResult<bool> {
        self.session.is_displayed(&Locator::css(sel::DELETE_ACCOUNT))
    }
}
