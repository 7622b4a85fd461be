//! PostgreSQL-backed `UserRepository`.
//!
//! Email uniqueness is enforced by the `users_email_key` index; inserts that
//! trip it surface as [`UserPersistenceError::DuplicateEmail`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    EmailAddress, InsertOutcome, PassthroughFields, User, UserDraft, UserId, UserRole,
};

use super::diesel_error_mapping::{DieselFailure, classify};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel implementation of [`UserRepository`].
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    UserPersistenceError::connection(error.message())
}

fn map_diesel_error(error: diesel::result::Error, email: &EmailAddress) -> UserPersistenceError {
    match classify(&error) {
        DieselFailure::Connection(message) => UserPersistenceError::connection(message),
        DieselFailure::UniqueViolation => UserPersistenceError::duplicate_email(email.to_string()),
        DieselFailure::Query(message) => UserPersistenceError::query(message),
    }
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let email = EmailAddress::new(&row.email).map_err(|err| {
        UserPersistenceError::query(format!("user {} has invalid email: {err}", row.id))
    })?;
    let role: UserRole = row.role.parse().map_err(|err| {
        UserPersistenceError::query(format!("user {} has invalid role: {err}", row.id))
    })?;
    Ok(User::restore(
        UserId::from_uuid(row.id),
        UserDraft {
            email,
            details: PassthroughFields::from_stored(row.details),
        },
        role,
        row.created_at,
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn find_by_email(
        &self,
        email: &EmailAddress,
    ) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::email.eq(email.as_ref()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(|err| map_diesel_error(err, email))?;
        row.map(row_to_user).transpose()
    }

    async fn insert(&self, user: &User) -> Result<InsertOutcome, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            email: user.email().as_ref(),
            role: user.role().as_str(),
            created_at: user.created_at(),
            details: user.details().clone().into_value(),
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map_err(|err| map_diesel_error(err, user.email()))?;
        Ok(InsertOutcome::new(user.id()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;
    use serde_json::json;
    use uuid::Uuid;

    fn row(role: &str) -> UserRow {
        UserRow {
            id: Uuid::nil(),
            email: "a@x.com".to_owned(),
            role: role.to_owned(),
            created_at: Utc::now(),
            details: json!({"name": "Ada"}),
        }
    }

    #[rstest]
    #[case("user", UserRole::User)]
    #[case("rider", UserRole::Rider)]
    #[case("admin", UserRole::Admin)]
    fn stored_roles_are_restored(#[case] raw: &str, #[case] expected: UserRole) {
        let user = row_to_user(row(raw)).expect("valid row");
        assert_eq!(user.role(), expected);
        assert_eq!(user.details().get("name"), Some(&json!("Ada")));
    }

    #[rstest]
    fn unknown_roles_are_query_errors() {
        let err = row_to_user(row("superuser")).expect_err("corrupt row");
        assert!(matches!(err, UserPersistenceError::Query { .. }));
    }
}
