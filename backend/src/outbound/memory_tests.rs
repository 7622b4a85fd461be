//! Behavioural coverage for the in-memory store.

use chrono::{DateTime, Duration, TimeZone, Utc};
use rstest::{fixture, rstest};

use super::*;
use crate::domain::{
    GatewayPaymentStatus, MinorUnits, ParcelDraft, PassthroughFields, PaymentId, PaymentStatus,
    RiderDraft, RiderId, TrackingId, UserDraft, UserId,
};

fn at(hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 7, hour, 0, 0)
        .single()
        .expect("valid timestamp")
}

fn email(raw: &str) -> EmailAddress {
    EmailAddress::new(raw).expect("valid email")
}

fn parcel(sender: &str, created_at: DateTime<Utc>) -> Parcel {
    Parcel::submit(
        ParcelId::random(),
        ParcelDraft {
            sender_email: email(sender),
            cost: MinorUnits::new(1000).expect("non-negative"),
            details: PassthroughFields::default(),
        },
        created_at,
    )
}

fn payment(parcel_id: ParcelId, txn: &str, tracking: &str) -> Payment {
    Payment {
        id: PaymentId::random(),
        transaction_id: TransactionId::new(txn).expect("valid transaction"),
        amount: MinorUnits::new(1000).expect("non-negative"),
        currency: "eur".to_owned(),
        customer_email: Some(email("a@x.com")),
        parcel_id,
        parcel_name: Some("Books".to_owned()),
        payment_status: GatewayPaymentStatus::Paid,
        paid_at: at(12),
        tracking_id: TrackingId::parse(tracking).expect("valid tracking id"),
    }
}

#[fixture]
fn store() -> InMemoryStore {
    InMemoryStore::new()
}

#[rstest]
#[tokio::test]
async fn settlement_marks_the_parcel_and_records_the_payment(store: InMemoryStore) {
    let stored = parcel("a@x.com", at(9));
    ParcelRepository::insert(&store, &stored)
        .await
        .expect("parcel stored");

    let write = store
        .record_settlement(&payment(stored.id(), "pi_1", "SWIFT-20250307-AAAAAA"))
        .await
        .expect("settled");

    assert_eq!(write.parcel_update, UpdateOutcome::matched(true));
    let reloaded = store
        .find_by_id(&stored.id())
        .await
        .expect("lookup")
        .expect("parcel present");
    assert_eq!(reloaded.payment_status(), PaymentStatus::Paid);
    assert_eq!(reloaded.tracking_id(), Some(&write.payment.tracking_id));
}

#[rstest]
#[tokio::test]
async fn second_settlement_of_a_transaction_is_rejected_without_writes(store: InMemoryStore) {
    let stored = parcel("a@x.com", at(9));
    ParcelRepository::insert(&store, &stored)
        .await
        .expect("parcel stored");
    store
        .record_settlement(&payment(stored.id(), "pi_1", "SWIFT-20250307-AAAAAA"))
        .await
        .expect("first settlement");

    let err = store
        .record_settlement(&payment(stored.id(), "pi_1", "SWIFT-20250307-BBBBBB"))
        .await
        .expect_err("duplicate");

    assert_eq!(err, PaymentRepositoryError::duplicate_transaction("pi_1"));
    let payments = PaymentRepository::list(&store, None).await.expect("list");
    assert_eq!(payments.len(), 1);
    let reloaded = store
        .find_by_id(&stored.id())
        .await
        .expect("lookup")
        .expect("parcel present");
    assert_eq!(
        reloaded.tracking_id().map(AsRef::as_ref),
        Some("SWIFT-20250307-AAAAAA")
    );
}

#[rstest]
#[tokio::test]
async fn a_paid_parcel_keeps_its_first_tracking_id(store: InMemoryStore) {
    let stored = parcel("a@x.com", at(9));
    ParcelRepository::insert(&store, &stored)
        .await
        .expect("parcel stored");
    store
        .record_settlement(&payment(stored.id(), "pi_1", "SWIFT-20250307-AAAAAA"))
        .await
        .expect("first settlement");

    let write = store
        .record_settlement(&payment(stored.id(), "pi_2", "SWIFT-20250307-BBBBBB"))
        .await
        .expect("second transaction settles");

    assert_eq!(write.parcel_update, UpdateOutcome::matched(false));
    assert_eq!(write.payment.tracking_id.as_ref(), "SWIFT-20250307-AAAAAA");
}

#[rstest]
#[tokio::test]
async fn settling_a_deleted_parcel_still_records_the_payment(store: InMemoryStore) {
    let write = store
        .record_settlement(&payment(ParcelId::random(), "pi_9", "SWIFT-20250307-CCCCCC"))
        .await
        .expect("payment recorded");
    assert_eq!(write.parcel_update, UpdateOutcome::UNMATCHED);
    assert!(
        store
            .find_by_transaction_id(&write.payment.transaction_id)
            .await
            .expect("lookup")
            .is_some()
    );
}

#[rstest]
#[tokio::test]
async fn parcels_list_newest_first_and_filter_by_sender(store: InMemoryStore) {
    for (sender, hour) in [("a@x.com", 8), ("b@x.com", 9), ("a@x.com", 10)] {
        ParcelRepository::insert(&store, &parcel(sender, at(hour)))
            .await
            .expect("parcel stored");
    }

    let all = ParcelRepository::list(&store, None).await.expect("list");
    let times: Vec<_> = all.iter().map(Parcel::created_at).collect();
    assert_eq!(times, vec![at(10), at(9), at(8)]);

    let mine = ParcelRepository::list(&store, Some(email("a@x.com")))
        .await
        .expect("list");
    assert_eq!(mine.len(), 2);
    assert!(mine.iter().all(|p| p.sender_email().as_ref() == "a@x.com"));
}

#[rstest]
#[tokio::test]
async fn deleting_reports_how_many_parcels_went(store: InMemoryStore) {
    let stored = parcel("a@x.com", at(9));
    ParcelRepository::insert(&store, &stored)
        .await
        .expect("parcel stored");
    assert_eq!(store.delete(&stored.id()).await.expect("delete").deleted_count, 1);
    assert_eq!(store.delete(&stored.id()).await.expect("delete").deleted_count, 0);
}

#[rstest]
#[tokio::test]
async fn payments_list_most_recent_first(store: InMemoryStore) {
    for (txn, offset) in [("pi_old", 0), ("pi_new", 2)] {
        let mut entry = payment(ParcelId::random(), txn, "SWIFT-20250307-DDDDDD");
        entry.paid_at = at(12) + Duration::hours(offset);
        store.record_settlement(&entry).await.expect("recorded");
    }
    let listed = PaymentRepository::list(&store, Some(email("a@x.com")))
        .await
        .expect("list");
    let txns: Vec<_> = listed
        .iter()
        .map(|p| p.transaction_id.as_ref().to_owned())
        .collect();
    assert_eq!(txns, vec!["pi_new".to_owned(), "pi_old".to_owned()]);
}

#[rstest]
#[tokio::test]
async fn duplicate_emails_are_refused(store: InMemoryStore) {
    let draft = UserDraft {
        email: email("a@x.com"),
        details: PassthroughFields::default(),
    };
    UserRepository::insert(&store, &User::register(UserId::random(), draft.clone(), at(8)))
        .await
        .expect("first registration");
    let err = UserRepository::insert(&store, &User::register(UserId::random(), draft, at(9)))
        .await
        .expect_err("duplicate");
    assert_eq!(err, UserPersistenceError::duplicate_email("a@x.com"));
}

async fn seed_rider_and_user(store: &InMemoryStore) -> RiderId {
    UserRepository::insert(
        store,
        &User::register(
            UserId::random(),
            UserDraft {
                email: email("r@x.com"),
                details: PassthroughFields::default(),
            },
            at(8),
        ),
    )
    .await
    .expect("user stored");
    let rider = Rider::apply(
        RiderId::random(),
        RiderDraft {
            email: email("r@x.com"),
            details: PassthroughFields::default(),
        },
        at(9),
    );
    RiderRepository::insert(store, &rider)
        .await
        .expect("rider stored");
    rider.id()
}

#[rstest]
#[tokio::test]
async fn approval_promotes_once_in_effect(store: InMemoryStore) {
    let rider_id = seed_rider_and_user(&store).await;
    let change = RiderStatusChange {
        rider_id,
        status: RiderStatus::Approved,
        promote: Some(email("r@x.com")),
    };

    let first = store.apply_status(&change).await.expect("approved");
    let second = store.apply_status(&change).await.expect("re-approved");

    assert_eq!(first.promotion, Some(UpdateOutcome::matched(true)));
    assert_eq!(second.rider_update, UpdateOutcome::matched(false));
    assert_eq!(second.promotion, Some(UpdateOutcome::matched(false)));
    let user = store
        .find_by_email(&email("r@x.com"))
        .await
        .expect("lookup")
        .expect("user present");
    assert_eq!(user.role(), UserRole::Rider);
}

#[rstest]
#[tokio::test]
async fn decided_applications_cannot_be_reversed(store: InMemoryStore) {
    let rider_id = seed_rider_and_user(&store).await;
    store
        .apply_status(&RiderStatusChange {
            rider_id,
            status: RiderStatus::Approved,
            promote: Some(email("r@x.com")),
        })
        .await
        .expect("approved");

    let err = store
        .apply_status(&RiderStatusChange {
            rider_id,
            status: RiderStatus::Rejected,
            promote: None,
        })
        .await
        .expect_err("reversal refused");

    assert_eq!(
        err,
        RiderRepositoryError::invalid_transition("approved", "rejected")
    );
    let approved = RiderRepository::list(&store, Some(RiderStatus::Approved))
        .await
        .expect("list");
    assert_eq!(approved.len(), 1);
}

#[rstest]
#[tokio::test]
async fn unknown_riders_promote_nobody(store: InMemoryStore) {
    seed_rider_and_user(&store).await;
    let write = store
        .apply_status(&RiderStatusChange {
            rider_id: RiderId::random(),
            status: RiderStatus::Approved,
            promote: Some(email("r@x.com")),
        })
        .await
        .expect("no-op");
    assert_eq!(write.rider_update, UpdateOutcome::UNMATCHED);
    assert!(write.promotion.is_none());
    let user = store
        .find_by_email(&email("r@x.com"))
        .await
        .expect("lookup")
        .expect("user present");
    assert_eq!(user.role(), UserRole::User);
}

#[rstest]
#[tokio::test]
async fn riders_filter_by_status(store: InMemoryStore) {
    let rider_id = seed_rider_and_user(&store).await;
    store
        .apply_status(&RiderStatusChange {
            rider_id,
            status: RiderStatus::Rejected,
            promote: None,
        })
        .await
        .expect("rejected");
    assert!(
        RiderRepository::list(&store, Some(RiderStatus::Pending))
            .await
            .expect("list")
            .is_empty()
    );
    assert_eq!(
        RiderRepository::list(&store, Some(RiderStatus::Rejected))
            .await
            .expect("list")
            .len(),
        1
    );
}
