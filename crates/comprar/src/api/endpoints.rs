//! Typed wrappers for the storefront API surface.
//!
//! Each function returns a configured [`Request`]; the caller decides when
//! to `send`. The API reports its real outcome in the JSON `responseCode`
//! field, so callers branch on [`crate::api::ApiResponse::response_code`]
//! rather than solely on the HTTP status.

use crate::api::payload::User;
use crate::api::request::{Method, Request};
use crate::config::Config;

/// `GET /api/productsList`
#[must_use]
pub fn get_all_products(config: &Config) -> Request {
    Request::from_config(Method::Get, config).path("/api/productsList")
}

/// `POST /api/productsList`: unsupported method, expected 405
#[must_use]
pub fn post_to_products_list(config: &Config) -> Request {
    Request::from_config(Method::Post, config).path("/api/productsList")
}

/// `GET /api/brandsList`
#[must_use]
pub fn get_all_brands(config: &Config) -> Request {
    Request::from_config(Method::Get, config).path("/api/brandsList")
}

/// `PUT /api/brandsList`: unsupported method, expected 405
#[must_use]
pub fn put_to_brands_list(config: &Config) -> Request {
    Request::from_config(Method::Put, config).path("/api/brandsList")
}

/// `POST /api/searchProduct`
#[must_use]
pub fn search_product(config: &Config, search_term: &str) -> Request {
    Request::from_config(Method::Post, config)
        .path("/api/searchProduct")
        .form([("search_product", search_term)])
}

/// `POST /api/searchProduct` without the parameter, expected 400
#[must_use]
pub fn search_product_no_param(config: &Config) -> Request {
    Request::from_config(Method::Post, config).path("/api/searchProduct")
}

/// `POST /api/verifyLogin` with both credentials
#[must_use]
pub fn verify_login(config: &Config, email: &str, password: &str) -> Request {
    Request::from_config(Method::Post, config)
        .path("/api/verifyLogin")
        .form([("email", email), ("password", password)])
}

/// `POST /api/verifyLogin` without the e-mail, expected 400
#[must_use]
pub fn verify_login_no_email(config: &Config, password: &str) -> Request {
    Request::from_config(Method::Post, config)
        .path("/api/verifyLogin")
        .form([("password", password)])
}

/// `POST /api/verifyLogin` without the password, expected 400
#[must_use]
pub fn verify_login_no_password(config: &Config, email: &str) -> Request {
    Request::from_config(Method::Post, config)
        .path("/api/verifyLogin")
        .form([("email", email)])
}

/// `POST /api/verifyLogin` with no body at all
#[must_use]
pub fn verify_login_empty(config: &Config) -> Request {
    Request::from_config(Method::Post, config).path("/api/verifyLogin")
}

/// `DELETE /api/verifyLogin`: unsupported method, expected 405
#[must_use]
pub fn verify_login_delete(config: &Config) -> Request {
    Request::from_config(Method::Delete, config).path("/api/verifyLogin")
}

/// `POST /api/createAccount`
#[must_use]
pub fn create_account(config: &Config, user: &User) -> Request {
    Request::from_config(Method::Post, config)
        .path("/api/createAccount")
        .form(user.to_form())
}

/// `DELETE /api/deleteAccount`
#[must_use]
pub fn delete_account(config: &Config, email: &str, password: &str) -> Request {
    Request::from_config(Method::Delete, config)
        .path("/api/deleteAccount")
        .form([("email", email), ("password", password)])
}

/// `PUT /api/updateAccount`
#[must_use]
pub fn update_account(config: &Config, user: &User) -> Request {
    Request::from_config(Method::Put, config)
        .path("/api/updateAccount")
        .form(user.to_form())
}

/// `GET /api/getUserDetailByEmail`
#[must_use]
pub fn get_user_detail_by_email(config: &Config, email: &str) -> Request {
    Request::from_config(Method::Get, config)
        .path("/api/getUserDetailByEmail")
        .params([("email", email)])
}
