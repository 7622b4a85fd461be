//! Tests for the registration handler.

use super::*;
use crate::domain::{InsertOutcome, UserRole};
use crate::inbound::http::test_utils::{MockPorts, harness, test_app};
use crate::test_support::StaticIdentityVerifier;
use actix_web::http::StatusCode;
use actix_web::test as actix_test;
use rstest::rstest;
use serde_json::json;

#[actix_web::test]
async fn first_registration_inserts_a_user() {
    let harness = harness();
    let store = harness.store.clone();
    let app = actix_test::init_service(test_app(harness.state)).await;

    let req = actix_test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "email": "ada@example.com", "displayName": "Ada", "role": "admin" }))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;

    assert!(body.get("insertedId").and_then(Value::as_str).is_some());
    let user = crate::domain::ports::UserRepository::find_by_email(
        store.as_ref(),
        &crate::domain::EmailAddress::new("ada@example.com").expect("valid email"),
    )
    .await
    .expect("lookup")
    .expect("user stored");
    assert_eq!(user.role(), UserRole::User);
    assert_eq!(user.details().get("displayName"), Some(&json!("Ada")));
}

#[actix_web::test]
async fn known_emails_get_the_exists_notice() {
    let app = actix_test::init_service(test_app(harness().state)).await;
    for _ in 0..2 {
        let req = actix_test::TestRequest::post()
            .uri("/users")
            .set_json(json!({ "email": "ada@example.com" }))
            .to_request();
        actix_test::call_service(&app, req).await;
    }

    let req = actix_test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "email": "ada@example.com" }))
        .to_request();
    let res = actix_test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(res).await;
    assert_eq!(body, json!({ "messege": USER_EXISTS_MESSAGE }));
}

#[rstest]
#[case(json!({ "name": "Ada" }), "missing_field")]
#[case(json!({ "email": "not-an-email" }), "invalid_email")]
#[actix_web::test]
async fn bad_emails_are_rejected_before_the_service(#[case] body: Value, #[case] code: &str) {
    let mut ports = MockPorts::default();
    ports.registration.expect_register().never();
    let app =
        actix_test::init_service(test_app(ports.into_state(StaticIdentityVerifier::default())))
            .await;

    let req = actix_test::TestRequest::post()
        .uri("/users")
        .set_json(body)
        .to_request();
    let res = actix_test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let value: Value = actix_test::read_body_json(res).await;
    assert_eq!(value["code"], "invalid_request");
    assert_eq!(value["details"]["code"], code);
}

#[actix_web::test]
async fn created_outcome_is_returned_verbatim() {
    let mut ports = MockPorts::default();
    ports
        .registration
        .expect_register()
        .times(1)
        .return_once(|_| Ok(RegistrationOutcome::Created(InsertOutcome::new("u-1"))));
    let app =
        actix_test::init_service(test_app(ports.into_state(StaticIdentityVerifier::default())))
            .await;

    let req = actix_test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "email": "ada@example.com" }))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "insertedId": "u-1" }));
}
