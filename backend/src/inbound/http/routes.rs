//! Route table for the REST API.
//!
//! Both the server binary and the integration tests mount the API through
//! [`configure`], so the routes under test are the routes in production.

use actix_web::web;

use super::error::{form_error_handler, json_error_handler, path_error_handler};
use super::{records, users};

/// Version prefix shared by every API route.
pub const API_PREFIX: &str = "/api/v1";

/// Mount the API under [`API_PREFIX`] together with extractor error
/// handlers that keep failures in the JSON error envelope.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use clinic_backend::inbound::http::routes::configure;
///
/// let _app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::FormConfig::default().error_handler(form_error_handler))
        .app_data(web::PathConfig::default().error_handler(path_error_handler))
        .service(
            web::scope(API_PREFIX)
                .service(users::signup)
                .service(users::login)
                .service(users::current_user)
                .service(users::reset_password)
                .service(users::list_users)
                .service(users::get_user)
                .service(users::update_user)
                .service(users::delete_user)
                .configure(records::configure),
        );
}
