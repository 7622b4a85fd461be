//! Parcel handlers.
//!
//! ```text
//! GET    /parcels?email=ada@example.com
//! GET    /parcels/{id}
//! POST   /parcels {"senderEmail":"ada@example.com","cost":"12.50","parcelName":"Books"}
//! DELETE /parcels/{id}
//! ```

use actix_web::{delete, get, post, web};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::{
    ApiResult, DeleteOutcome, Error, InsertOutcome, PARCEL_RESERVED_FIELDS, Parcel, ParcelDraft,
    ParcelId, PassthroughFields,
};
use crate::inbound::http::schemas::{
    DeleteOutcomeSchema, InsertOutcomeSchema, ParcelSchema, ParcelSubmissionSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_email_filter, parse_record_id, require_amount, require_email,
};

/// Query string for `GET /parcels`.
#[derive(Debug, Deserialize, utoipa::IntoParams)]
pub struct ParcelListQuery {
    /// Only parcels sent by this address.
    pub email: Option<String>,
}

/// List parcels, newest first.
#[utoipa::path(
    get,
    path = "/parcels",
    params(ParcelListQuery),
    responses(
        (status = 200, description = "Parcels, newest first", body = [ParcelSchema]),
        (status = 400, description = "Invalid email filter", body = Error),
        (status = 500, description = "Internal server error", body = Error)
    ),
    tags = ["parcels"],
    operation_id = "listParcels",
    security([])
)]
#[get("/parcels")]
pub async fn list_parcels(
    state: web::Data<HttpState>,
    query: web::Query<ParcelListQuery>,
) -> ApiResult<web::Json<Vec<Parcel>>> {
    let sender = parse_email_filter(query.email.as_deref(), FieldName::new("email"))?;
    Ok(web::Json(state.parcels.list(sender).await?))
}

/// Fetch one parcel; an unknown id yields `null`.
#[utoipa::path(
    get,
    path = "/parcels/{id}",
    params(("id" = String, Path, description = "Parcel id")),
    responses(
        (status = 200, description = "The parcel, or null", body = Option<ParcelSchema>),
        (status = 400, description = "Malformed id", body = Error)
    ),
    tags = ["parcels"],
    operation_id = "getParcel",
    security([])
)]
#[get("/parcels/{id}")]
pub async fn get_parcel(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Option<Parcel>>> {
    let id: ParcelId = parse_record_id(&path, FieldName::new("id"))?;
    Ok(web::Json(state.parcels.find(&id).await?))
}

/// Submit a parcel; the server stamps `createdAt` and marks it unpaid.
#[utoipa::path(
    post,
    path = "/parcels",
    request_body = ParcelSubmissionSchema,
    responses(
        (status = 200, description = "Inserted id", body = InsertOutcomeSchema),
        (status = 400, description = "Missing sender or invalid cost", body = Error)
    ),
    tags = ["parcels"],
    operation_id = "createParcel",
    security([])
)]
#[post("/parcels")]
pub async fn create_parcel(
    state: web::Data<HttpState>,
    payload: web::Json<Map<String, Value>>,
) -> ApiResult<web::Json<InsertOutcome>> {
    let body = payload.into_inner();
    let sender_email = require_email(&body, FieldName::new("senderEmail"))?;
    let cost = require_amount(body.get("cost"), FieldName::new("cost"))?;
    let draft = ParcelDraft {
        sender_email,
        cost,
        details: PassthroughFields::from_map(body, PARCEL_RESERVED_FIELDS),
    };
    Ok(web::Json(state.parcels.submit(draft).await?))
}

/// Delete a parcel; deleting an unknown id reports zero.
#[utoipa::path(
    delete,
    path = "/parcels/{id}",
    params(("id" = String, Path, description = "Parcel id")),
    responses(
        (status = 200, description = "Number of parcels removed", body = DeleteOutcomeSchema),
        (status = 400, description = "Malformed id", body = Error)
    ),
    tags = ["parcels"],
    operation_id = "deleteParcel",
    security([])
)]
#[delete("/parcels/{id}")]
pub async fn delete_parcel(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeleteOutcome>> {
    let id: ParcelId = parse_record_id(&path, FieldName::new("id"))?;
    Ok(web::Json(state.parcels.delete(&id).await?))
}
