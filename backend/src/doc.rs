//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every REST endpoint, the record schemas from
//! [`crate::inbound::http::schemas`], and the bearer scheme used by the two
//! authenticated endpoints. Swagger UI serves it in debug builds.

use crate::domain::{Error, ErrorCode};
use crate::inbound::http::payments::{
    CheckoutRequestSchema, CheckoutResponse, DuplicateSettlement, NoSettlement,
    RecordedSettlement, SettlementResponse,
};
use crate::inbound::http::riders::RiderStatusRequest;
use crate::inbound::http::schemas::{
    DeleteOutcomeSchema, InsertOutcomeSchema, ParcelSchema, ParcelSubmissionSchema, PaymentSchema,
    RiderApplicationSchema, RiderSchema, RiderStatusOutcomeSchema, UpdateOutcomeSchema,
    UserRegistrationSchema,
};
use crate::inbound::http::users::UserExistsResponse;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the bearer security scheme referenced by handlers.
pub const BEARER_SCHEME: &str = "BearerAuth";

/// Enrich the generated document with the bearer ID-token scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            BEARER_SCHEME,
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .description(Some("Identity-provider ID token carrying an email claim."))
                    .build(),
            ),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "SwiftParcel backend API",
        description = "Parcels, rider applications, and checkout settlement."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::health::banner,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::users::register_user,
        crate::inbound::http::parcels::list_parcels,
        crate::inbound::http::parcels::get_parcel,
        crate::inbound::http::parcels::create_parcel,
        crate::inbound::http::parcels::delete_parcel,
        crate::inbound::http::payments::create_checkout_session,
        crate::inbound::http::payments::settle_payment,
        crate::inbound::http::payments::list_payments,
        crate::inbound::http::riders::apply_as_rider,
        crate::inbound::http::riders::list_riders,
        crate::inbound::http::riders::update_rider_status,
    ),
    components(schemas(
        Error,
        ErrorCode,
        ParcelSchema,
        PaymentSchema,
        RiderSchema,
        InsertOutcomeSchema,
        UpdateOutcomeSchema,
        DeleteOutcomeSchema,
        RiderStatusOutcomeSchema,
        UserRegistrationSchema,
        UserExistsResponse,
        ParcelSubmissionSchema,
        RiderApplicationSchema,
        RiderStatusRequest,
        CheckoutRequestSchema,
        CheckoutResponse,
        SettlementResponse,
        DuplicateSettlement,
        RecordedSettlement,
        NoSettlement,
    )),
    tags(
        (name = "users", description = "Account registration"),
        (name = "parcels", description = "Parcel submission and lookup"),
        (name = "payments", description = "Checkout, settlement and payment history"),
        (name = "riders", description = "Rider applications and review"),
        (name = "health", description = "Probes and banner")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const PARCEL_SCHEMA_NAME: &str = "crate.domain.Parcel";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn parcel_schema_uses_wire_names() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let parcel = schemas.get(PARCEL_SCHEMA_NAME).expect("Parcel schema");

        assert_object_schema_has_field(parcel, "senderEmail");
        assert_object_schema_has_field(parcel, "paymentStatus");
    }

    #[test]
    fn bearer_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.as_ref().expect("components");
        assert!(components.security_schemes.contains_key(BEARER_SCHEME));
    }

    #[test]
    fn every_route_is_documented() {
        let doc = ApiDoc::openapi();
        for path in [
            "/",
            "/users",
            "/parcels",
            "/parcels/{id}",
            "/create-checkout-session",
            "/payment-success",
            "/payments",
            "/riders",
            "/riders/{id}",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
