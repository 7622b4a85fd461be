//! HTTP inbound adapter exposing the REST endpoints.

use actix_web::web;

pub mod auth;
pub mod error;
pub mod health;
pub mod parcels;
pub mod payments;
pub mod riders;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub(crate) mod validation;

/// Register every endpoint on an app or scope.
///
/// Health probes need `web::Data<HealthState>` and the other handlers need
/// `web::Data<HttpState>`; both are supplied by the caller.
///
/// ```
/// use actix_web::App;
/// use swift_parcel::inbound::http::configure;
///
/// let _app = App::new().configure(configure);
/// ```
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health::banner)
        .service(health::ready)
        .service(health::live)
        .service(users::register_user)
        .service(parcels::list_parcels)
        .service(parcels::get_parcel)
        .service(parcels::create_parcel)
        .service(parcels::delete_parcel)
        .service(payments::create_checkout_session)
        .service(payments::settle_payment)
        .service(payments::list_payments)
        .service(riders::apply_as_rider)
        .service(riders::list_riders)
        .service(riders::update_rider_status);
}
