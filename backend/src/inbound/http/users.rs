//! User registration handler.
//!
//! ```text
//! POST /users {"email":"ada@example.com","name":"Ada"}
//! ```

use actix_web::{HttpResponse, post, web};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::ports::RegistrationOutcome;
use crate::domain::{ApiResult, Error, PassthroughFields, USER_RESERVED_FIELDS, UserDraft};
use crate::inbound::http::schemas::{InsertOutcomeSchema, UserRegistrationSchema};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, require_email};

/// Reply sent when the email is already registered.
pub const USER_EXISTS_MESSAGE: &str = "user already exists";

/// Body returned instead of an insert acknowledgement for known emails.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct UserExistsResponse {
    #[schema(example = "user already exists")]
    pub messege: &'static str,
}

/// Register a user with role `user`.
///
/// Registering a known email is not an error: the reply is
/// `{"messege":"user already exists"}` and nothing is written.
#[utoipa::path(
    post,
    path = "/users",
    request_body = UserRegistrationSchema,
    responses(
        (status = 200, description = "Inserted id, or the already-exists notice", body = InsertOutcomeSchema),
        (status = 400, description = "Missing or invalid email", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["users"],
    operation_id = "registerUser",
    security([])
)]
#[post("/users")]
pub async fn register_user(
    state: web::Data<HttpState>,
    payload: web::Json<Map<String, Value>>,
) -> ApiResult<HttpResponse> {
    let body = payload.into_inner();
    let email = require_email(&body, FieldName::new("email"))?;
    let draft = UserDraft {
        email,
        details: PassthroughFields::from_map(body, USER_RESERVED_FIELDS),
    };
    Ok(match state.registration.register(draft).await? {
        RegistrationOutcome::Created(outcome) => HttpResponse::Ok().json(outcome),
        RegistrationOutcome::AlreadyExists => HttpResponse::Ok().json(UserExistsResponse {
            messege: USER_EXISTS_MESSAGE,
        }),
    })
}

#[cfg(test)]
mod tests;
