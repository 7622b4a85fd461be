//! Rider application handlers.
//!
//! ```text
//! POST  /riders {"email":"rider@example.com","region":"North"}
//! GET   /riders?status=pending
//! PATCH /riders/{id} {"status":"approved","email":"rider@example.com"}   (Authorization: Bearer …)
//! ```

use actix_web::{get, patch, post, web};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::ports::{RiderStatusOutcome, RiderStatusUpdate};
use crate::domain::{
    ApiResult, Error, InsertOutcome, PassthroughFields, RIDER_RESERVED_FIELDS, Rider, RiderDraft,
    RiderId,
};
use crate::inbound::http::auth::Authenticated;
use crate::inbound::http::schemas::{
    InsertOutcomeSchema, RiderApplicationSchema, RiderSchema, RiderStatusOutcomeSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, missing_field_error, parse_email_filter, parse_record_id, parse_rider_status,
    require_email,
};

/// Query string for `GET /riders`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct RiderListQuery {
    /// `pending`, `approved` or `rejected`.
    pub status: Option<String>,
}

/// Body of `PATCH /riders/{id}`.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct RiderStatusRequest {
    #[schema(example = "approved")]
    pub status: Option<String>,
    /// Applicant to promote; required when approving.
    #[schema(example = "rider@example.com")]
    pub email: Option<String>,
}

/// Submit a rider application; it starts `pending`.
#[utoipa::path(
    post,
    path = "/riders",
    request_body = RiderApplicationSchema,
    responses(
        (status = 200, description = "Inserted id", body = InsertOutcomeSchema),
        (status = 400, description = "Missing or invalid email", body = Error)
    ),
    tags = ["riders"],
    operation_id = "applyAsRider",
    security([])
)]
#[post("/riders")]
pub async fn apply_as_rider(
    state: web::Data<HttpState>,
    payload: web::Json<Map<String, Value>>,
) -> ApiResult<web::Json<InsertOutcome>> {
    let body = payload.into_inner();
    let email = require_email(&body, FieldName::new("email"))?;
    let draft = RiderDraft {
        email,
        details: PassthroughFields::from_map(body, RIDER_RESERVED_FIELDS),
    };
    Ok(web::Json(state.riders.apply(draft).await?))
}

/// List rider applications, optionally by status.
#[utoipa::path(
    get,
    path = "/riders",
    params(RiderListQuery),
    responses(
        (status = 200, description = "Applications", body = [RiderSchema]),
        (status = 400, description = "Unknown status", body = Error)
    ),
    tags = ["riders"],
    operation_id = "listRiders",
    security([])
)]
#[get("/riders")]
pub async fn list_riders(
    state: web::Data<HttpState>,
    query: web::Query<RiderListQuery>,
) -> ApiResult<web::Json<Vec<Rider>>> {
    let status = match query.status.as_deref().map(str::trim) {
        None | Some("") => None,
        Some(raw) => Some(parse_rider_status(raw, FieldName::new("status"))?),
    };
    Ok(web::Json(state.riders.list(status).await?))
}

/// Record a review decision.
///
/// Approving also gives the user registered under `email` the rider role,
/// in the same write as the status change.
#[utoipa::path(
    patch,
    path = "/riders/{id}",
    params(("id" = String, Path, description = "Rider application id")),
    request_body = RiderStatusRequest,
    responses(
        (status = 200, description = "Update outcome", body = RiderStatusOutcomeSchema),
        (status = 400, description = "Invalid status, or approval without email", body = Error),
        (status = 401, description = "Missing or invalid bearer token", body = Error),
        (status = 409, description = "Application already decided the other way", body = Error)
    ),
    tags = ["riders"],
    operation_id = "updateRiderStatus",
    security(("BearerAuth" = []))
)]
#[patch("/riders/{id}")]
pub async fn update_rider_status(
    _auth: Authenticated,
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<RiderStatusRequest>,
) -> ApiResult<web::Json<RiderStatusOutcome>> {
    let rider_id: RiderId = parse_record_id(&path, FieldName::new("id"))?;
    let RiderStatusRequest { status, email } = payload.into_inner();
    let status_field = FieldName::new("status");
    let status = status
        .as_deref()
        .ok_or_else(|| missing_field_error(status_field))
        .and_then(|raw| parse_rider_status(raw, status_field))?;
    let email = parse_email_filter(email.as_deref(), FieldName::new("email"))?;
    let outcome = state
        .riders
        .set_status(RiderStatusUpdate {
            rider_id,
            status,
            email,
        })
        .await?;
    Ok(web::Json(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::UserRepository;
    use crate::domain::{EmailAddress, UpdateOutcome, UserRole};
    use crate::inbound::http::test_utils::{MockPorts, OWNER_TOKEN, harness, test_app};
    use crate::test_support::StaticIdentityVerifier;
    use actix_web::http::StatusCode;
    use actix_web::http::header::AUTHORIZATION;
    use actix_web::test as actix_test;
    use rstest::rstest;
    use serde_json::json;

    fn bearer() -> (actix_web::http::header::HeaderName, String) {
        (AUTHORIZATION, format!("Bearer {OWNER_TOKEN}"))
    }

    #[actix_web::test]
    async fn approval_promotes_the_registered_user() {
        let harness = harness();
        let store = harness.store.clone();
        let app = actix_test::init_service(test_app(harness.state)).await;

        let req = actix_test::TestRequest::post()
            .uri("/users")
            .set_json(json!({ "email": "rider@example.com" }))
            .to_request();
        actix_test::call_service(&app, req).await;
        let req = actix_test::TestRequest::post()
            .uri("/riders")
            .set_json(json!({ "email": "rider@example.com", "region": "North", "status": "approved" }))
            .to_request();
        let created: Value = actix_test::call_and_read_body_json(&app, req).await;
        let rider_id = created["insertedId"].as_str().expect("rider id").to_owned();

        let req = actix_test::TestRequest::get()
            .uri("/riders?status=pending")
            .to_request();
        let pending: Vec<Value> = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0]["region"], "North");

        let req = actix_test::TestRequest::patch()
            .uri(&format!("/riders/{rider_id}"))
            .insert_header(bearer())
            .set_json(json!({ "status": "approved", "email": "rider@example.com" }))
            .to_request();
        let outcome: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(
            outcome,
            json!({
                "matchedCount": 1,
                "modifiedCount": 1,
                "userPromotion": { "matchedCount": 1, "modifiedCount": 1 }
            })
        );

        let user = store
            .find_by_email(&EmailAddress::new("rider@example.com").expect("valid email"))
            .await
            .expect("lookup")
            .expect("user present");
        assert_eq!(user.role(), UserRole::Rider);
    }

    #[actix_web::test]
    async fn status_changes_need_a_bearer_token() {
        let mut ports = MockPorts::default();
        ports.riders.expect_set_status().never();
        let app =
            actix_test::init_service(test_app(ports.into_state(StaticIdentityVerifier::default())))
                .await;

        let req = actix_test::TestRequest::patch()
            .uri(&format!("/riders/{}", RiderId::random()))
            .set_json(json!({ "status": "rejected" }))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[case(json!({}))]
    #[case(json!({ "status": "hired" }))]
    #[case(json!({ "status": "approved" }))]
    #[actix_web::test]
    async fn invalid_decisions_are_bad_requests(#[case] body: Value) {
        let app = actix_test::init_service(test_app(harness().state)).await;
        let req = actix_test::TestRequest::patch()
            .uri(&format!("/riders/{}", RiderId::random()))
            .insert_header(bearer())
            .set_json(body)
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn rejections_never_touch_users() {
        let mut ports = MockPorts::default();
        ports
            .riders
            .expect_set_status()
            .withf(|update| update.email.is_none())
            .times(1)
            .return_once(|_| {
                Ok(RiderStatusOutcome {
                    rider_update: UpdateOutcome::matched(true),
                    user_promotion: None,
                })
            });
        let verifier = StaticIdentityVerifier::default().with_token(OWNER_TOKEN, "ada@example.com");
        let app = actix_test::init_service(test_app(ports.into_state(verifier))).await;

        let req = actix_test::TestRequest::patch()
            .uri(&format!("/riders/{}", RiderId::random()))
            .insert_header(bearer())
            .set_json(json!({ "status": "rejected" }))
            .to_request();
        let outcome: Value = actix_test::call_and_read_body_json(&app, req).await;
        assert_eq!(outcome, json!({ "matchedCount": 1, "modifiedCount": 1 }));
    }

    #[actix_web::test]
    async fn unknown_status_filters_are_rejected() {
        let app = actix_test::init_service(test_app(harness().state)).await;
        let req = actix_test::TestRequest::get()
            .uri("/riders?status=hired")
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
