//! Bearer authentication for the endpoints that need an identity.
//!
//! Handlers opt in by taking an [`Authenticated`] argument; endpoints without
//! it never look at the `Authorization` header.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;
use tracing::error;

use crate::domain::{Error, VerifiedIdentity};

use super::state::HttpState;

/// Identity proven by the request's bearer token.
#[derive(Debug, Clone)]
pub struct Authenticated(pub VerifiedIdentity);

impl Authenticated {
    pub fn identity(&self) -> &VerifiedIdentity {
        &self.0
    }

    pub fn into_inner(self) -> VerifiedIdentity {
        self.0
    }
}

impl FromRequest for Authenticated {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<HttpState>>() else {
            error!("HttpState missing from app data");
            return Box::pin(async { Err(Error::internal("HTTP state is not configured")) });
        };
        let guard = state.access_guard.clone();
        // A header that is not visible ASCII cannot hold a bearer token.
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .map(|value| value.to_str().unwrap_or_default().to_owned());
        Box::pin(async move {
            guard
                .authorize(header.as_deref())
                .await
                .map(Authenticated)
        })
    }
}
