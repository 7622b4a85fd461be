//! `DieselRiderRepository` status changes against embedded PostgreSQL.
//!
//! A status write and the applicant's promotion share one transaction; a
//! refused transition must leave both tables untouched.

use chrono::{TimeZone, Utc};
use rstest::{fixture, rstest};

use swift_parcel::domain::ports::{
    RiderRepository, RiderRepositoryError, RiderStatusChange, UserRepository,
};
use swift_parcel::domain::{
    EmailAddress, PassthroughFields, Rider, RiderDraft, RiderId, RiderStatus, UpdateOutcome, User,
    UserDraft, UserId, UserRole,
};
use swift_parcel::outbound::persistence::{DieselRiderRepository, DieselUserRepository};

mod support;

use support::{TestDatabase, handle_cluster_setup_failure, provision_database};

const APPLICANT: &str = "rider@example.com";

struct Repositories {
    db: TestDatabase,
    riders: DieselRiderRepository,
    users: DieselUserRepository,
}

#[fixture]
fn repos() -> Option<Repositories> {
    match provision_database() {
        Ok(db) => Some(Repositories {
            riders: DieselRiderRepository::new(db.pool.clone()),
            users: DieselUserRepository::new(db.pool.clone()),
            db,
        }),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

fn email() -> EmailAddress {
    EmailAddress::new(APPLICANT).expect("valid email")
}

async fn seed(repos: &Repositories) -> RiderId {
    let now = Utc
        .with_ymd_and_hms(2025, 3, 7, 9, 0, 0)
        .single()
        .expect("valid timestamp");
    let user = User::register(
        UserId::random(),
        UserDraft {
            email: email(),
            details: PassthroughFields::default(),
        },
        now,
    );
    repos.users.insert(&user).await.expect("user stored");
    let rider = Rider::apply(
        RiderId::random(),
        RiderDraft {
            email: email(),
            details: PassthroughFields::default(),
        },
        now,
    );
    repos.riders.insert(&rider).await.expect("rider stored");
    rider.id()
}

async fn role(repos: &Repositories) -> UserRole {
    repos
        .users
        .find_by_email(&email())
        .await
        .expect("lookup")
        .expect("user present")
        .role()
}

fn approve(rider_id: RiderId) -> RiderStatusChange {
    RiderStatusChange {
        rider_id,
        status: RiderStatus::Approved,
        promote: Some(email()),
    }
}

#[rstest]
fn approval_promotes_the_applicant(repos: Option<Repositories>) {
    let Some(repos) = repos else {
        return;
    };
    repos.db.runtime.block_on(async {
        let rider_id = seed(&repos).await;

        let first = repos.riders.apply_status(&approve(rider_id)).await.expect("approved");
        let again = repos
            .riders
            .apply_status(&approve(rider_id))
            .await
            .expect("re-approved");

        assert_eq!(first.rider_update, UpdateOutcome::matched(true));
        assert_eq!(first.promotion, Some(UpdateOutcome::matched(true)));
        assert_eq!(again.rider_update, UpdateOutcome::matched(false));
        assert_eq!(again.promotion, Some(UpdateOutcome::matched(false)));
        assert_eq!(role(&repos).await, UserRole::Rider);
    });
}

#[rstest]
fn reversing_a_decision_writes_nothing(repos: Option<Repositories>) {
    let Some(repos) = repos else {
        return;
    };
    repos.db.runtime.block_on(async {
        let rider_id = seed(&repos).await;
        repos
            .riders
            .apply_status(&RiderStatusChange {
                rider_id,
                status: RiderStatus::Rejected,
                promote: None,
            })
            .await
            .expect("rejected");

        let err = repos
            .riders
            .apply_status(&approve(rider_id))
            .await
            .expect_err("reversal refused");

        assert_eq!(
            err,
            RiderRepositoryError::invalid_transition("rejected", "approved")
        );
        let rejected = repos
            .riders
            .list(Some(RiderStatus::Rejected))
            .await
            .expect("list");
        assert_eq!(rejected.len(), 1);
        assert_eq!(role(&repos).await, UserRole::User);
    });
}

#[rstest]
fn unknown_riders_promote_nobody(repos: Option<Repositories>) {
    let Some(repos) = repos else {
        return;
    };
    repos.db.runtime.block_on(async {
        seed(&repos).await;

        let write = repos
            .riders
            .apply_status(&approve(RiderId::random()))
            .await
            .expect("no-op");

        assert_eq!(write.rider_update, UpdateOutcome::UNMATCHED);
        assert!(write.promotion.is_none());
        assert_eq!(role(&repos).await, UserRole::User);
    });
}
