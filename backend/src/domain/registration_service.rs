//! Account registration.
//!
//! Registration is keyed by email and is a no-op for known emails. The store
//! enforces email uniqueness, so two concurrent registrations of one email
//! store a single account and both callers see a success.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::debug;

use crate::domain::ports::{
    RegistrationOutcome, UserPersistenceError, UserRegistration, UserRepository,
};
use crate::domain::{Error, User, UserDraft, UserId};

fn map_repository_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail { email } => {
            Error::conflict(format!("user {email} already exists"))
        }
    }
}

/// Registration service implementing [`UserRegistration`].
#[derive(Clone)]
pub struct RegistrationService<U> {
    users: Arc<U>,
    clock: Arc<dyn Clock>,
}

impl<U> RegistrationService<U> {
    pub fn new(users: Arc<U>, clock: Arc<dyn Clock>) -> Self {
        Self { users, clock }
    }
}

#[async_trait]
impl<U> UserRegistration for RegistrationService<U>
where
    U: UserRepository,
{
    async fn register(&self, draft: UserDraft) -> Result<RegistrationOutcome, Error> {
        if self
            .users
            .find_by_email(&draft.email)
            .await
            .map_err(map_repository_error)?
            .is_some()
        {
            return Ok(RegistrationOutcome::AlreadyExists);
        }

        let user = User::register(UserId::random(), draft, self.clock.utc());
        match self.users.insert(&user).await {
            Ok(outcome) => Ok(RegistrationOutcome::Created(outcome)),
            Err(UserPersistenceError::DuplicateEmail { email }) => {
                debug!(user = %email, "concurrent registration already stored this email");
                Ok(RegistrationOutcome::AlreadyExists)
            }
            Err(err) => Err(map_repository_error(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::MockUserRepository;
    use crate::domain::{EmailAddress, InsertOutcome, PassthroughFields, UserRole};
    use crate::test_support::FixedClock;
    use chrono::Utc;
    use rstest::rstest;

    fn draft() -> UserDraft {
        UserDraft {
            email: EmailAddress::new("a@x.com").expect("valid email"),
            details: PassthroughFields::default(),
        }
    }

    fn service(repo: MockUserRepository) -> RegistrationService<MockUserRepository> {
        RegistrationService::new(Arc::new(repo), Arc::new(FixedClock::new(Utc::now())))
    }

    #[rstest]
    #[tokio::test]
    async fn new_emails_are_stored_with_the_user_role() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().times(1).return_once(|_| Ok(None));
        repo.expect_insert()
            .withf(|user| user.role() == UserRole::User)
            .times(1)
            .return_once(|user| Ok(InsertOutcome::new(user.id())));

        let outcome = service(repo).register(draft()).await.expect("registered");
        assert!(matches!(outcome, RegistrationOutcome::Created(_)));
    }

    #[rstest]
    #[tokio::test]
    async fn known_emails_are_a_no_op() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().times(1).return_once(|_| {
            Ok(Some(User::register(UserId::random(), draft(), Utc::now())))
        });
        repo.expect_insert().never();

        let outcome = service(repo).register(draft()).await.expect("no-op");
        assert_eq!(outcome, RegistrationOutcome::AlreadyExists);
    }

    #[rstest]
    #[tokio::test]
    async fn losing_a_registration_race_is_a_no_op() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().times(1).return_once(|_| Ok(None));
        repo.expect_insert()
            .times(1)
            .return_once(|_| Err(UserPersistenceError::duplicate_email("a@x.com")));

        let outcome = service(repo).register(draft()).await.expect("no-op");
        assert_eq!(outcome, RegistrationOutcome::AlreadyExists);
    }
}
