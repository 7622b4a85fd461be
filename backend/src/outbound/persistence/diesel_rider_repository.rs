//! PostgreSQL-backed `RiderRepository`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{
    RiderRepository, RiderRepositoryError, RiderStatusChange, RiderStatusWrite,
};
use crate::domain::{
    EmailAddress, InsertOutcome, PassthroughFields, Rider, RiderDraft, RiderId, RiderStatus,
    UpdateOutcome, UserRole,
};

use super::diesel_error_mapping::map_basic_diesel_error;
use super::models::{NewRiderRow, RiderRow};
use super::pool::{DbPool, PoolError};
use super::schema::{riders, users};

/// Diesel implementation of [`RiderRepository`].
#[derive(Clone)]
pub struct DieselRiderRepository {
    pool: DbPool,
}

impl DieselRiderRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RiderRepositoryError {
    RiderRepositoryError::connection(error.message())
}

fn map_diesel_error(error: diesel::result::Error) -> RiderRepositoryError {
    map_basic_diesel_error(
        &error,
        RiderRepositoryError::query,
        RiderRepositoryError::connection,
    )
}

fn row_to_rider(row: RiderRow) -> Result<Rider, RiderRepositoryError> {
    let email = EmailAddress::new(&row.email).map_err(|err| {
        RiderRepositoryError::query(format!("rider {} has invalid email: {err}", row.id))
    })?;
    let status: RiderStatus = row.status.parse().map_err(|err| {
        RiderRepositoryError::query(format!("rider {} has invalid status: {err}", row.id))
    })?;
    Ok(Rider::restore(
        RiderId::from_uuid(row.id),
        RiderDraft {
            email,
            details: PassthroughFields::from_stored(row.details),
        },
        status,
        row.created_at,
    ))
}

/// Failure inside the status transaction.
#[derive(Debug)]
enum StatusWriteError {
    Diesel(diesel::result::Error),
    Rider(RiderRepositoryError),
}

impl From<diesel::result::Error> for StatusWriteError {
    fn from(error: diesel::result::Error) -> Self {
        Self::Diesel(error)
    }
}

impl From<StatusWriteError> for RiderRepositoryError {
    fn from(error: StatusWriteError) -> Self {
        match error {
            StatusWriteError::Diesel(error) => map_diesel_error(error),
            StatusWriteError::Rider(error) => error,
        }
    }
}

async fn write_status(
    conn: &mut AsyncPgConnection,
    change: &RiderStatusChange,
) -> Result<UpdateOutcome, StatusWriteError> {
    let current: Option<String> = riders::table
        .filter(riders::id.eq(change.rider_id.as_uuid()))
        .select(riders::status)
        .for_update()
        .first(conn)
        .await
        .optional()?;
    let Some(current) = current else {
        return Ok(UpdateOutcome::UNMATCHED);
    };
    let current: RiderStatus = current.parse().map_err(|err| {
        StatusWriteError::Rider(RiderRepositoryError::query(format!(
            "rider {} has invalid status: {err}",
            change.rider_id
        )))
    })?;
    if !current.allows_transition_to(change.status) {
        return Err(StatusWriteError::Rider(
            RiderRepositoryError::invalid_transition(current.as_str(), change.status.as_str()),
        ));
    }
    diesel::update(riders::table.filter(riders::id.eq(change.rider_id.as_uuid())))
        .set(riders::status.eq(change.status.as_str()))
        .execute(conn)
        .await?;
    Ok(UpdateOutcome::matched(current != change.status))
}

async fn promote_user(
    conn: &mut AsyncPgConnection,
    email: &EmailAddress,
) -> Result<UpdateOutcome, diesel::result::Error> {
    let current: Option<String> = users::table
        .filter(users::email.eq(email.as_ref()))
        .select(users::role)
        .for_update()
        .first(conn)
        .await
        .optional()?;
    let Some(current) = current else {
        return Ok(UpdateOutcome::UNMATCHED);
    };
    let rider = UserRole::Rider.as_str();
    diesel::update(users::table.filter(users::email.eq(email.as_ref())))
        .set(users::role.eq(rider))
        .execute(conn)
        .await?;
    Ok(UpdateOutcome::matched(current != rider))
}

#[async_trait]
impl RiderRepository for DieselRiderRepository {
    async fn insert(&self, rider: &Rider) -> Result<InsertOutcome, RiderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewRiderRow {
            id: *rider.id().as_uuid(),
            email: rider.email().as_ref(),
            status: rider.status().as_str(),
            created_at: rider.created_at(),
            details: rider.details().clone().into_value(),
        };
        diesel::insert_into(riders::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(InsertOutcome::new(rider.id()))
    }

    async fn list(&self, status: Option<RiderStatus>) -> Result<Vec<Rider>, RiderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = riders::table
            .select(RiderRow::as_select())
            .order_by((riders::created_at.desc(), riders::id))
            .into_boxed();
        if let Some(status) = status {
            query = query.filter(riders::status.eq(status.as_str()));
        }
        let rows: Vec<RiderRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_rider).collect()
    }

    async fn apply_status(
        &self,
        change: &RiderStatusChange,
    ) -> Result<RiderStatusWrite, RiderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        conn.transaction(|conn| {
            async move {
                let rider_update = write_status(conn, change).await?;
                let promotion = match &change.promote {
                    Some(email) if rider_update.matched_count > 0 => {
                        Some(promote_user(conn, email).await?)
                    }
                    _ => None,
                };
                Ok::<_, StatusWriteError>(RiderStatusWrite {
                    rider_update,
                    promotion,
                })
            }
            .scope_boxed()
        })
        .await
        .map_err(RiderRepositoryError::from)
    }
}
